//! Girvan–Newman community detection.
//!
//! The detector repeatedly removes the edges of highest edge betweenness from
//! a private copy of the input graph. Each call to [`Iterator::next`] keeps
//! removing until the graph falls into more connected components than it had
//! before, then yields the new components as a [`Partition`]. Partitions only
//! ever get finer: components never merge between steps.
//!
//! Betweenness is recomputed from scratch after every removal, because one
//! removed edge can reroute every shortest path in its component.
//!
//! ```rust
//! use network_communities::CommunityDetector;
//! use petgraph::graph::UnGraph;
//!
//! // Two triangles joined by a bridge.
//! let graph = UnGraph::<(), ()>::from_edges([
//!     (0, 1), (1, 2), (2, 0),
//!     (3, 4), (4, 5), (5, 3),
//!     (2, 3),
//! ]);
//!
//! let mut detector = CommunityDetector::new(&graph).unwrap();
//! let first = detector.next().unwrap();
//! assert_eq!(first.sizes(), vec![3, 3]);
//! ```

use crate::betweenness::edge_betweenness;
use crate::error::Result;
use crate::graph::{connected_components, validate_simple, working_copy, WorkingGraph};
use crate::partition::Partition;
use petgraph::graph::{EdgeIndex, UnGraph};
use std::iter::FusedIterator;
use tracing::debug;

/// Relative tolerance for treating two betweenness scores as tied.
///
/// A score `s` ties the maximum `m` when `m - s <= BETWEENNESS_TIE_EPSILON *
/// max(1, m)`.
pub const BETWEENNESS_TIE_EPSILON: f64 = 1e-9;

/// What to remove when several edges share the highest betweenness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TiePolicy {
    /// Remove every tied edge in the same step.
    #[default]
    RemoveAll,
    /// Remove only the tied edge with the lowest edge index.
    RemoveFirst,
}

/// Lazy sequence of increasingly fine partitions of an undirected graph.
///
/// Not restartable: build a new detector to start over. The caller's graph
/// is never touched.
#[derive(Debug, Clone)]
pub struct CommunityDetector {
    graph: WorkingGraph,
    tie_policy: TiePolicy,
    /// Component count of the last yielded partition (or of the input).
    components: usize,
    /// Edges removed so far.
    removed: usize,
    finished: bool,
}

impl CommunityDetector {
    /// Build a detector over a copy of `graph`.
    ///
    /// Fails with [`Error::InvalidGraph`](crate::Error::InvalidGraph) on a
    /// graph without nodes, and with a validation error when the graph has a
    /// self-loop or more than one edge between the same pair of nodes.
    pub fn new<N, E>(graph: &UnGraph<N, E>) -> Result<Self> {
        validate_simple(graph)?;
        let graph = working_copy(graph);
        let components = connected_components(&graph).len();
        debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            components,
            "community detector ready"
        );
        Ok(Self {
            graph,
            tie_policy: TiePolicy::default(),
            components,
            removed: 0,
            finished: false,
        })
    }

    /// Set the tie policy.
    pub fn with_tie_policy(mut self, tie_policy: TiePolicy) -> Self {
        self.tie_policy = tie_policy;
        self
    }

    pub fn tie_policy(&self) -> TiePolicy {
        self.tie_policy
    }

    /// Edges still present in the working graph.
    pub fn working_edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Edges removed so far.
    pub fn removed_edges(&self) -> usize {
        self.removed
    }

    fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Remove the highest-betweenness edge(s). Returns how many were removed
    /// and the score they shared.
    fn remove_central_edges(&mut self) -> (usize, f64) {
        let scores = edge_betweenness(&self.graph);
        let max_score = max_betweenness(&scores).unwrap_or(0.0);
        let targets = highest_betweenness(&scores, self.tie_policy);
        for &edge in &targets {
            self.graph.remove_edge(edge);
        }
        self.removed += targets.len();
        (targets.len(), max_score)
    }
}

impl Iterator for CommunityDetector {
    type Item = Partition;

    fn next(&mut self) -> Option<Partition> {
        if self.finished {
            return None;
        }

        // Only reachable for an input without edges: every node stands alone.
        if self.graph.edge_count() == 0 {
            self.finished = true;
            return Some(Partition::singletons(self.node_count()));
        }

        let before = self.components;
        let components = loop {
            let (removed, max_score) = self.remove_central_edges();
            let components = connected_components(&self.graph);
            debug!(
                removed,
                max_score,
                components = components.len(),
                remaining = self.graph.edge_count(),
                "removed highest-betweenness edges"
            );
            if removed == 0 || components.len() > before || self.graph.edge_count() == 0 {
                break components;
            }
        };

        self.components = components.len();
        if self.graph.edge_count() == 0 {
            self.finished = true;
        }
        debug!(
            components = self.components,
            removed = self.removed,
            "graph split"
        );
        Some(Partition::from_components(components, self.node_count()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.finished {
            (0, Some(0))
        } else {
            (1, Some(self.graph.edge_count().max(1)))
        }
    }
}

impl FusedIterator for CommunityDetector {}

/// Highest score in `scores`, or `None` when there are no edges.
pub fn max_betweenness(scores: &[(EdgeIndex, f64)]) -> Option<f64> {
    scores.iter().map(|&(_, s)| s).reduce(f64::max)
}

/// Edges whose score ties the maximum, in ascending edge index order.
///
/// Under [`TiePolicy::RemoveFirst`] at most one edge is returned.
pub fn highest_betweenness(scores: &[(EdgeIndex, f64)], tie_policy: TiePolicy) -> Vec<EdgeIndex> {
    let Some(max) = max_betweenness(scores) else {
        return Vec::new();
    };
    let tolerance = BETWEENNESS_TIE_EPSILON * max.abs().max(1.0);

    let mut tied: Vec<EdgeIndex> = scores
        .iter()
        .filter(|&&(_, s)| max - s <= tolerance)
        .map(|&(e, _)| e)
        .collect();
    tied.sort_unstable();

    if tie_policy == TiePolicy::RemoveFirst {
        tied.truncate(1);
    }
    tied
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use petgraph::graph::NodeIndex;

    fn e(i: usize) -> EdgeIndex {
        EdgeIndex::new(i)
    }

    fn n(ids: &[usize]) -> Vec<NodeIndex> {
        ids.iter().copied().map(NodeIndex::new).collect()
    }

    #[test]
    fn test_highest_betweenness_ties_within_epsilon() {
        let scores = [(e(0), 10.0), (e(1), 10.0 - 1e-12), (e(2), 9.0)];
        assert_eq!(
            highest_betweenness(&scores, TiePolicy::RemoveAll),
            vec![e(0), e(1)]
        );
        assert_eq!(
            highest_betweenness(&scores, TiePolicy::RemoveFirst),
            vec![e(0)]
        );
    }

    #[test]
    fn test_highest_betweenness_outside_epsilon() {
        let gap = 100.0 * BETWEENNESS_TIE_EPSILON;
        let scores = [(e(3), 10.0 - gap), (e(5), 10.0)];
        assert_eq!(
            highest_betweenness(&scores, TiePolicy::RemoveAll),
            vec![e(5)]
        );
    }

    #[test]
    fn test_highest_betweenness_small_scores_use_absolute_tolerance() {
        let scores = [(e(0), 0.0), (e(1), 0.5 * BETWEENNESS_TIE_EPSILON)];
        assert_eq!(highest_betweenness(&scores, TiePolicy::RemoveAll).len(), 2);
    }

    #[test]
    fn test_highest_betweenness_empty() {
        assert!(highest_betweenness(&[], TiePolicy::RemoveAll).is_empty());
        assert_eq!(max_betweenness(&[]), None);
    }

    #[test]
    fn test_removal_reports_shared_max_score() {
        let scores = [(e(0), 6.0), (e(1), 8.0), (e(2), 6.0)];
        assert_eq!(max_betweenness(&scores), Some(8.0));

        // Path 0-1-2-3: the middle edge carries 8 of the ordered-pair paths.
        let graph = UnGraph::<(), ()>::from_edges([(0, 1), (1, 2), (2, 3)]);
        let mut detector = CommunityDetector::new(&graph).unwrap();
        let (removed, max_score) = detector.remove_central_edges();
        assert_eq!(removed, 1);
        assert!((max_score - 8.0).abs() < 1e-12);
        assert_eq!(detector.working_edge_count(), 2);
    }

    #[test]
    fn test_rejects_empty_graph() {
        let graph = UnGraph::<(), ()>::new_undirected();
        assert!(matches!(
            CommunityDetector::new(&graph),
            Err(Error::InvalidGraph)
        ));
    }

    #[test]
    fn test_path_splits_in_the_middle() {
        let graph = UnGraph::<(), ()>::from_edges([(0, 1), (1, 2), (2, 3)]);
        let mut detector = CommunityDetector::new(&graph).unwrap();

        let first = detector.next().unwrap();
        assert_eq!(first.components(), &[n(&[0, 1]), n(&[2, 3])]);
        assert_eq!(detector.removed_edges(), 1);
    }

    #[test]
    fn test_remove_first_on_star() {
        let graph = UnGraph::<(), ()>::from_edges([(0, 1), (0, 2), (0, 3)]);
        let mut detector = CommunityDetector::new(&graph)
            .unwrap()
            .with_tie_policy(TiePolicy::RemoveFirst);

        let first = detector.next().unwrap();
        assert_eq!(first.len(), 2);
        assert_eq!(detector.removed_edges(), 1);
        assert_eq!(detector.working_edge_count(), 2);
    }

    #[test]
    fn test_single_node() {
        let mut graph = UnGraph::<(), ()>::new_undirected();
        graph.add_node(());
        let partitions: Vec<_> = CommunityDetector::new(&graph).unwrap().collect();
        assert_eq!(partitions, vec![Partition::singletons(1)]);
    }

    #[test]
    fn test_fused_after_exhaustion() {
        let graph = UnGraph::<(), ()>::from_edges([(0, 1)]);
        let mut detector = CommunityDetector::new(&graph).unwrap();
        assert_eq!(detector.next(), Some(Partition::singletons(2)));
        assert_eq!(detector.next(), None);
        assert_eq!(detector.next(), None);
        assert_eq!(detector.size_hint(), (0, Some(0)));
    }
}
