//! Shortest-path betweenness (Brandes 2001), unit edge weights.
//!
//! Both measures run one breadth-first search per source node, count the
//! shortest paths `σ` reaching every node, then walk the nodes back in order
//! of decreasing distance accumulating dependencies `δ`. Cost is O(V·E).

use crate::graph::WorkingGraph;
use petgraph::graph::{EdgeIndex, Graph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::EdgeType;
use rayon::prelude::*;
use std::collections::VecDeque;

/// Edge betweenness of every edge in the working graph.
///
/// The score of an edge is the sum over ordered pairs of distinct nodes
/// `(s, t)` of the fraction of shortest `s`–`t` paths that use the edge.
/// Unreachable pairs contribute nothing. Scores are not normalized.
///
/// Returned in ascending edge index order.
pub fn edge_betweenness(graph: &WorkingGraph) -> Vec<(EdgeIndex, f64)> {
    let bound = graph.node_indices().map(|v| v.index() + 1).max().unwrap_or(0);
    let edge_bound = graph.edge_indices().map(|e| e.index() + 1).max().unwrap_or(0);
    let mut scores = vec![0.0; edge_bound];

    let mut sigma = vec![0.0_f64; bound];
    let mut dist: Vec<Option<usize>> = vec![None; bound];
    let mut delta = vec![0.0_f64; bound];
    let mut preds: Vec<Vec<(NodeIndex, EdgeIndex)>> = vec![Vec::new(); bound];
    let mut order: Vec<NodeIndex> = Vec::with_capacity(bound);
    let mut queue = VecDeque::new();

    for source in graph.node_indices() {
        sigma.fill(0.0);
        dist.fill(None);
        delta.fill(0.0);
        preds.iter_mut().for_each(Vec::clear);

        sigma[source.index()] = 1.0;
        dist[source.index()] = Some(0);
        queue.push_back(source);

        while let Some(v) = queue.pop_front() {
            order.push(v);
            let next = dist[v.index()].map_or(0, |d| d + 1);
            for edge in graph.edges(v) {
                let w = if edge.source() == v {
                    edge.target()
                } else {
                    edge.source()
                };
                if dist[w.index()].is_none() {
                    dist[w.index()] = Some(next);
                    queue.push_back(w);
                }
                if dist[w.index()] == Some(next) {
                    sigma[w.index()] += sigma[v.index()];
                    preds[w.index()].push((v, edge.id()));
                }
            }
        }

        while let Some(w) = order.pop() {
            let w = w.index();
            for &(v, e) in &preds[w] {
                let c = sigma[v.index()] / sigma[w] * (1.0 + delta[w]);
                scores[e.index()] += c;
                delta[v.index()] += c;
            }
        }
    }

    graph
        .edge_indices()
        .map(|e| (e, scores[e.index()]))
        .collect()
}

/// Node betweenness of every node, indexed by node index.
///
/// Directed graphs follow edge direction. With `normalized`, scores are
/// scaled by `1 / ((n - 1)(n - 2))`; graphs with fewer than three nodes score
/// zero everywhere. Sources are processed in parallel.
pub fn node_betweenness<N, E, Ty>(graph: &Graph<N, E, Ty>, normalized: bool) -> Vec<f64>
where
    N: Sync,
    E: Sync,
    Ty: EdgeType + Sync,
{
    let n = graph.node_count();
    if n < 3 {
        return vec![0.0; n];
    }

    let mut centrality = (0..n)
        .into_par_iter()
        .map(|s| single_source_dependencies(graph, NodeIndex::new(s)))
        .reduce(
            || vec![0.0; n],
            |mut acc, dep| {
                acc.iter_mut().zip(dep).for_each(|(a, d)| *a += d);
                acc
            },
        );

    if normalized {
        let scale = 1.0 / ((n - 1) * (n - 2)) as f64;
        centrality.iter_mut().for_each(|c| *c *= scale);
    }
    centrality
}

/// Dependency of `source` on every other node.
fn single_source_dependencies<N, E, Ty: EdgeType>(
    graph: &Graph<N, E, Ty>,
    source: NodeIndex,
) -> Vec<f64> {
    let n = graph.node_count();
    let mut sigma = vec![0.0_f64; n];
    let mut dist: Vec<Option<usize>> = vec![None; n];
    let mut preds: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut order = Vec::with_capacity(n);
    let mut queue = VecDeque::new();

    sigma[source.index()] = 1.0;
    dist[source.index()] = Some(0);
    queue.push_back(source);

    while let Some(v) = queue.pop_front() {
        order.push(v.index());
        let next = dist[v.index()].map_or(0, |d| d + 1);
        for w in graph.neighbors(v) {
            if w == v {
                continue;
            }
            if dist[w.index()].is_none() {
                dist[w.index()] = Some(next);
                queue.push_back(w);
            }
            if dist[w.index()] == Some(next) {
                sigma[w.index()] += sigma[v.index()];
                preds[w.index()].push(v.index());
            }
        }
    }

    let mut delta = vec![0.0_f64; n];
    let mut dependencies = vec![0.0_f64; n];
    while let Some(w) = order.pop() {
        for &v in &preds[w] {
            delta[v] += sigma[v] / sigma[w] * (1.0 + delta[w]);
        }
        if w != source.index() {
            dependencies[w] = delta[w];
        }
    }
    dependencies
}
