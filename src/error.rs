use thiserror::Error;

/// Result alias for `network-communities`.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by graph generation, detection and rendering.
#[derive(Debug, Error)]
pub enum Error {
    /// The graph has no nodes, so there is nothing to partition.
    #[error("invalid graph: a graph with zero nodes has no partition")]
    InvalidGraph,

    /// An edge connects a node to itself.
    #[error("invalid graph: self-loop on node {node}")]
    SelfLoop { node: usize },

    /// The same unordered pair appears more than once.
    #[error("invalid graph: duplicate edge between nodes {a} and {b}")]
    DuplicateEdge { a: usize, b: usize },

    #[error("invalid parameter '{name}': {message}")]
    InvalidParameter {
        name: &'static str,
        message: String,
    },

    /// Graphviz could not be run or exited with a failure.
    #[error("render failed: {0}")]
    Render(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}
