//! Partitions of a node set into connected components.

use petgraph::graph::NodeIndex;

/// A complete, disjoint division of a graph's nodes into components.
///
/// Components are kept in canonical order: members ascending, components
/// ordered by their smallest member. Two partitions of the same graph compare
/// equal exactly when they group the nodes the same way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    components: Vec<Vec<NodeIndex>>,
    node_count: usize,
}

impl Partition {
    pub(crate) fn from_components(mut components: Vec<Vec<NodeIndex>>, node_count: usize) -> Self {
        for component in &mut components {
            component.sort_unstable();
        }
        components.retain(|c| !c.is_empty());
        components.sort_unstable_by_key(|c| c[0]);
        Self {
            components,
            node_count,
        }
    }

    /// One singleton component per node.
    pub fn singletons(node_count: usize) -> Self {
        let components = (0..node_count).map(|i| vec![NodeIndex::new(i)]).collect();
        Self {
            components,
            node_count,
        }
    }

    pub fn components(&self) -> &[Vec<NodeIndex>] {
        &self.components
    }

    pub fn into_components(self) -> Vec<Vec<NodeIndex>> {
        self.components
    }

    /// Number of components.
    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Number of nodes covered by the partition.
    pub fn node_count(&self) -> usize {
        self.node_count
    }

    /// Component sizes, in component order.
    pub fn sizes(&self) -> Vec<usize> {
        self.components.iter().map(Vec::len).collect()
    }

    /// Community number of every node, indexed by node index.
    ///
    /// Community numbers follow component order, so they are small integers
    /// suitable as colour indices.
    pub fn membership(&self) -> Vec<usize> {
        let mut membership = vec![0; self.node_count];
        for (community, component) in self.components.iter().enumerate() {
            for node in component {
                membership[node.index()] = community;
            }
        }
        membership
    }

    /// Component number of `node`, if the node belongs to this partition.
    pub fn community_of(&self, node: NodeIndex) -> Option<usize> {
        self.components
            .iter()
            .position(|component| component.binary_search(&node).is_ok())
    }

    /// True if every component of `self` lies inside a single component of
    /// `coarser`.
    pub fn refines(&self, coarser: &Partition) -> bool {
        if self.node_count != coarser.node_count {
            return false;
        }
        let coarse = coarser.membership();
        self.components.iter().all(|component| {
            let first = coarse[component[0].index()];
            component.iter().all(|node| coarse[node.index()] == first)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nodes(ids: &[usize]) -> Vec<NodeIndex> {
        ids.iter().copied().map(NodeIndex::new).collect()
    }

    #[test]
    fn test_canonical_order() {
        let a = Partition::from_components(vec![nodes(&[3, 2]), nodes(&[1, 0])], 4);
        let b = Partition::from_components(vec![nodes(&[0, 1]), nodes(&[2, 3])], 4);
        assert_eq!(a, b);
        assert_eq!(a.components()[0], nodes(&[0, 1]));
    }

    #[test]
    fn test_membership() {
        let p = Partition::from_components(vec![nodes(&[2]), nodes(&[0, 3]), nodes(&[1])], 4);
        assert_eq!(p.membership(), vec![0, 1, 2, 0]);
        assert_eq!(p.community_of(NodeIndex::new(3)), Some(0));
        assert_eq!(p.community_of(NodeIndex::new(9)), None);
        assert_eq!(p.sizes(), vec![2, 1, 1]);
    }

    #[test]
    fn test_refines() {
        let coarse = Partition::from_components(vec![nodes(&[0, 1, 2]), nodes(&[3])], 4);
        let fine = Partition::from_components(vec![nodes(&[0, 1]), nodes(&[2]), nodes(&[3])], 4);
        let crossing = Partition::from_components(vec![nodes(&[0]), nodes(&[1, 2, 3])], 4);

        assert!(fine.refines(&coarse));
        assert!(coarse.refines(&coarse));
        assert!(!coarse.refines(&fine));
        assert!(!crossing.refines(&coarse));
        assert!(Partition::singletons(4).refines(&crossing));
    }
}
