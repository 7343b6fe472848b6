//! Per-node graph metrics: degree, betweenness and clustering coefficient.

use crate::betweenness::node_betweenness;
use crate::error::{Error, Result};
use petgraph::graph::{Graph, NodeIndex};
use petgraph::EdgeType;
use rayon::prelude::*;
use std::collections::HashSet;
use tracing::info;

/// Metrics for every node of one graph, indexed by node index.
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkAnalysis {
    degree: Vec<usize>,
    betweenness: Vec<f64>,
    clustering: Vec<f64>,
}

/// One bar of a degree histogram, covering `[low, high)` (the last bar also
/// includes `high`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistogramBin {
    pub low: f64,
    pub high: f64,
    pub count: usize,
}

impl NetworkAnalysis {
    /// Analyse `graph`.
    ///
    /// Degree counts every incident edge (in + out for directed graphs).
    /// Betweenness follows edge direction and is normalized. Clustering is
    /// measured on the undirected projection.
    pub fn new<N, E, Ty>(graph: &Graph<N, E, Ty>) -> Self
    where
        N: Sync,
        E: Sync,
        Ty: EdgeType + Sync,
    {
        let degree = graph
            .node_indices()
            .map(|v| graph.neighbors_undirected(v).count())
            .collect();
        let betweenness = node_betweenness(graph, true);
        let clustering = clustering_coefficients(graph);

        info!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "computed degree, betweenness and clustering"
        );
        Self {
            degree,
            betweenness,
            clustering,
        }
    }

    pub fn node_count(&self) -> usize {
        self.degree.len()
    }

    pub fn degree(&self) -> &[usize] {
        &self.degree
    }

    pub fn betweenness(&self) -> &[f64] {
        &self.betweenness
    }

    pub fn clustering(&self) -> &[f64] {
        &self.clustering
    }

    /// Mean clustering coefficient over all nodes.
    pub fn average_clustering(&self) -> f64 {
        if self.clustering.is_empty() {
            return 0.0;
        }
        self.clustering.iter().sum::<f64>() / self.clustering.len() as f64
    }

    /// The `k` nodes of highest betweenness, highest first. Equal scores are
    /// ordered by node index.
    pub fn top_by_betweenness(&self, k: usize) -> Vec<(NodeIndex, f64)> {
        let mut ranked: Vec<(NodeIndex, f64)> = self
            .betweenness
            .iter()
            .enumerate()
            .map(|(i, &b)| (NodeIndex::new(i), b))
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
        ranked.truncate(k);
        ranked
    }

    /// Equal-width histogram of node degrees over `[min, max]`.
    ///
    /// When every node has the same degree the range is widened by half a
    /// unit on each side.
    pub fn degree_histogram(&self, bins: usize) -> Result<Vec<HistogramBin>> {
        if bins == 0 {
            return Err(Error::InvalidParameter {
                name: "bins",
                message: "histogram needs at least one bin".to_string(),
            });
        }
        let (Some(&min), Some(&max)) = (self.degree.iter().min(), self.degree.iter().max()) else {
            return Ok(Vec::new());
        };

        let (low, high) = if min == max {
            (min as f64 - 0.5, max as f64 + 0.5)
        } else {
            (min as f64, max as f64)
        };
        let width = (high - low) / bins as f64;

        let mut counts = vec![0usize; bins];
        for &d in &self.degree {
            let slot = ((d as f64 - low) / width) as usize;
            counts[slot.min(bins - 1)] += 1;
        }

        Ok(counts
            .into_iter()
            .enumerate()
            .map(|(i, count)| HistogramBin {
                low: low + i as f64 * width,
                high: low + (i + 1) as f64 * width,
                count,
            })
            .collect())
    }
}

/// Local clustering coefficient of every node on the undirected projection:
/// closed neighbour pairs over possible neighbour pairs.
fn clustering_coefficients<N, E, Ty>(graph: &Graph<N, E, Ty>) -> Vec<f64>
where
    N: Sync,
    E: Sync,
    Ty: EdgeType + Sync,
{
    let neighbours: Vec<HashSet<usize>> = graph
        .node_indices()
        .map(|v| {
            graph
                .neighbors_undirected(v)
                .filter(|&w| w != v)
                .map(|w| w.index())
                .collect()
        })
        .collect();

    neighbours
        .par_iter()
        .map(|adjacent| {
            let k = adjacent.len();
            if k < 2 {
                return 0.0;
            }
            let ordered: Vec<usize> = adjacent.iter().copied().collect();
            let mut closed = 0usize;
            for (i, &u) in ordered.iter().enumerate() {
                for &w in &ordered[i + 1..] {
                    if neighbours[u].contains(&w) {
                        closed += 1;
                    }
                }
            }
            2.0 * closed as f64 / (k * (k - 1)) as f64
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use petgraph::graph::{DiGraph, UnGraph};

    #[test]
    fn test_degree_sum_is_twice_edge_count() {
        let graph = DiGraph::<(), ()>::from_edges([(0, 1), (1, 0), (1, 2), (3, 1)]);
        let analysis = NetworkAnalysis::new(&graph);
        assert_eq!(analysis.degree(), &[2, 4, 1, 1]);
        assert_eq!(analysis.degree().iter().sum::<usize>(), 2 * graph.edge_count());
    }

    #[test]
    fn test_clustering_triangle_with_tail() {
        let graph = UnGraph::<(), ()>::from_edges([(0, 1), (1, 2), (2, 0), (2, 3)]);
        let analysis = NetworkAnalysis::new(&graph);
        let c = analysis.clustering();
        assert_eq!(c[0], 1.0);
        assert_eq!(c[1], 1.0);
        assert!((c[2] - 1.0 / 3.0).abs() < 1e-12);
        assert_eq!(c[3], 0.0);
    }

    #[test]
    fn test_clustering_ignores_direction() {
        let graph = DiGraph::<(), ()>::from_edges([(0, 1), (1, 2), (2, 0)]);
        let analysis = NetworkAnalysis::new(&graph);
        assert_eq!(analysis.clustering(), &[1.0, 1.0, 1.0]);
        assert_eq!(analysis.average_clustering(), 1.0);
    }

    #[test]
    fn test_top_by_betweenness() {
        let graph = UnGraph::<(), ()>::from_edges([(0, 1), (1, 2), (2, 3), (3, 4)]);
        let analysis = NetworkAnalysis::new(&graph);
        let top = analysis.top_by_betweenness(3);
        let order: Vec<usize> = top.iter().map(|(n, _)| n.index()).collect();
        // Centre first, then the two symmetric inner nodes by index.
        assert_eq!(order, vec![2, 1, 3]);
    }

    #[test]
    fn test_degree_histogram() {
        let graph = UnGraph::<(), ()>::from_edges([(0, 1), (0, 2), (0, 3)]);
        let analysis = NetworkAnalysis::new(&graph);
        let bins = analysis.degree_histogram(2).unwrap();
        assert_eq!(bins.len(), 2);
        assert_eq!(bins[0].count, 3);
        assert_eq!(bins[1].count, 1);
        assert_eq!(bins[0].low, 1.0);
        assert_eq!(bins[1].high, 3.0);
        assert!(analysis.degree_histogram(0).is_err());
    }

    #[test]
    fn test_degree_histogram_constant_degree() {
        let graph = UnGraph::<(), ()>::from_edges([(0, 1), (2, 3)]);
        let analysis = NetworkAnalysis::new(&graph);
        let bins = analysis.degree_histogram(1).unwrap();
        assert_eq!(bins, vec![HistogramBin { low: 0.5, high: 1.5, count: 4 }]);
    }
}
