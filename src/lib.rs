//! # network-communities
//!
//! Random graph generation, centrality metrics and Girvan–Newman community
//! detection on `petgraph` graphs.
//!
//! The pieces form a pipeline with explicit inputs and outputs:
//!
//! 1. [`generate`] builds a seeded G(n, p) random graph.
//! 2. [`NetworkAnalysis`] computes degree, betweenness and clustering.
//! 3. [`CommunityDetector`] yields increasingly fine [`Partition`]s by
//!    removing the edges of highest edge betweenness.
//! 4. [`render`] and [`report`] turn the results into Graphviz files, console
//!    tables and CSV.

pub mod analysis;
pub mod betweenness;
pub mod detector;
pub mod error;
pub mod generate;
pub mod graph;
pub mod partition;
pub mod render;
pub mod report;

pub use analysis::{HistogramBin, NetworkAnalysis};
pub use detector::{highest_betweenness, max_betweenness, CommunityDetector, TiePolicy, BETWEENNESS_TIE_EPSILON};
pub use error::{Error, Result};
pub use generate::{gnp_directed, gnp_undirected, to_undirected};
pub use partition::Partition;
pub use render::{Layout, NodeStyle};
