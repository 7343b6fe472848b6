//! Simple undirected graph checks and the detector's working copy.

use crate::error::{Error, Result};
use petgraph::algo::tarjan_scc;
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::stable_graph::StableUnGraph;
use petgraph::visit::EdgeRef;
use std::collections::HashSet;

/// Edge-removable copy of an input graph.
///
/// A stable graph keeps node and edge indices valid after removals, so node
/// indices here are the same as in the graph the copy was taken from.
pub type WorkingGraph = StableUnGraph<(), ()>;

/// Check that `graph` is a non-empty simple graph: no self-loops and at most
/// one edge per unordered node pair.
pub fn validate_simple<N, E>(graph: &UnGraph<N, E>) -> Result<()> {
    if graph.node_count() == 0 {
        return Err(Error::InvalidGraph);
    }

    let mut seen = HashSet::with_capacity(graph.edge_count());
    for edge in graph.edge_references() {
        let (a, b) = (edge.source().index(), edge.target().index());
        if a == b {
            return Err(Error::SelfLoop { node: a });
        }
        let key = (a.min(b), a.max(b));
        if !seen.insert(key) {
            return Err(Error::DuplicateEdge { a: key.0, b: key.1 });
        }
    }
    Ok(())
}

/// Copy the topology of `graph`, dropping weights.
pub fn working_copy<N, E>(graph: &UnGraph<N, E>) -> WorkingGraph {
    let mut work = WorkingGraph::with_capacity(graph.node_count(), graph.edge_count());
    for _ in graph.node_indices() {
        work.add_node(());
    }
    for edge in graph.edge_references() {
        work.add_edge(edge.source(), edge.target(), ());
    }
    work
}

/// Connected components of the working graph.
///
/// On an undirected graph every strongly connected component is a connected
/// component, so Tarjan's SCC pass gives the components directly.
pub fn connected_components(graph: &WorkingGraph) -> Vec<Vec<NodeIndex>> {
    tarjan_scc(graph)
}
