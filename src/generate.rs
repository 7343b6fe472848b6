//! Erdős–Rényi G(n, p) random graphs.
//!
//! Every candidate edge is kept independently with probability `p`. Rows
//! (one per source node) are sampled in parallel, each from its own RNG
//! seeded from the base seed and the row number, so a seeded run produces
//! the same graph whatever the thread count.

use crate::error::{Error, Result};
use petgraph::graph::{DiGraph, NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use std::collections::BTreeSet;
use tracing::debug;

/// Directed G(n, p): each ordered pair `(u, v)`, `u != v`, becomes an arc.
///
/// Node weights are node numbers `0..n`. With `seed = None` a fresh seed is
/// drawn.
pub fn gnp_directed(n: usize, p: f64, seed: Option<u64>) -> Result<DiGraph<usize, ()>> {
    let edges = sample_edges(n, p, seed, true)?;
    let mut graph = DiGraph::with_capacity(n, edges.len());
    for i in 0..n {
        graph.add_node(i);
    }
    for (u, v) in edges {
        graph.add_edge(NodeIndex::new(u), NodeIndex::new(v), ());
    }
    debug!(nodes = n, edges = graph.edge_count(), "generated directed G(n, p)");
    Ok(graph)
}

/// Undirected G(n, p): each unordered pair becomes an edge.
pub fn gnp_undirected(n: usize, p: f64, seed: Option<u64>) -> Result<UnGraph<usize, ()>> {
    let edges = sample_edges(n, p, seed, false)?;
    let mut graph = UnGraph::with_capacity(n, edges.len());
    for i in 0..n {
        graph.add_node(i);
    }
    for (u, v) in edges {
        graph.add_edge(NodeIndex::new(u), NodeIndex::new(v), ());
    }
    debug!(nodes = n, edges = graph.edge_count(), "generated undirected G(n, p)");
    Ok(graph)
}

/// Undirected projection of a directed graph.
///
/// Nodes keep their weights and indices. Every pair joined by an arc in
/// either direction gets exactly one undirected edge; self-loops are dropped
/// so the result is always a simple graph.
pub fn to_undirected<N: Clone, E>(graph: &DiGraph<N, E>) -> UnGraph<N, ()> {
    let pairs: BTreeSet<(usize, usize)> = graph
        .edge_references()
        .map(|e| (e.source().index(), e.target().index()))
        .filter(|(a, b)| a != b)
        .map(|(a, b)| (a.min(b), a.max(b)))
        .collect();

    let mut undirected = UnGraph::with_capacity(graph.node_count(), pairs.len());
    for node in graph.node_indices() {
        undirected.add_node(graph[node].clone());
    }
    for (a, b) in pairs {
        undirected.add_edge(NodeIndex::new(a), NodeIndex::new(b), ());
    }
    undirected
}

fn sample_edges(n: usize, p: f64, seed: Option<u64>, directed: bool) -> Result<Vec<(usize, usize)>> {
    if !(0.0..=1.0).contains(&p) {
        return Err(Error::InvalidParameter {
            name: "p",
            message: format!("edge probability must lie in [0, 1], got {p}"),
        });
    }
    let base = seed.unwrap_or_else(rand::random);

    let edges = (0..n)
        .into_par_iter()
        .flat_map_iter(|u| {
            let mut rng = StdRng::seed_from_u64(row_seed(base, u));
            let start = if directed { 0 } else { u + 1 };
            let mut row = Vec::new();
            for v in start..n {
                if v != u && rng.gen_bool(p) {
                    row.push((u, v));
                }
            }
            row
        })
        .collect();
    Ok(edges)
}

fn row_seed(base: u64, row: usize) -> u64 {
    base ^ (row as u64).wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}
