use crate::{errors::InvariantCheck, graph::*};
use rand::Rng;
use std::io::Write;
use thiserror::Error;

/// Marks a node that is not part of the set in `DominatingSet::position`
const NOT_IN_SET: Node = Node::MAX;

/// A set of nodes of a graph with `number_of_nodes` nodes.
///
/// The members are kept in a dense vector together with an index from node to position in
/// that vector. Membership tests, insertions, removals (swap-remove) and drawing a uniformly
/// random member all take constant time. The order of [`DominatingSet::iter`] is an
/// implementation detail and changes with removals.
#[derive(Clone, Debug)]
pub struct DominatingSet {
    set: Vec<Node>,
    position: Vec<Node>,
}

impl DominatingSet {
    pub fn new(number_of_nodes: Node) -> Self {
        Self {
            set: Vec::new(),
            position: vec![NOT_IN_SET; number_of_nodes as usize],
        }
    }

    /// Creates a set containing every node of the graph.
    pub fn new_all(number_of_nodes: Node) -> Self {
        let mut domset = Self::new(number_of_nodes);
        domset.add_nodes(0..number_of_nodes);
        domset
    }

    pub fn number_of_nodes(&self) -> NumNodes {
        self.position.len() as NumNodes
    }

    /// Adds a node to the dominating set.
    /// ** Panics if the node is already contained or out of range **
    ///
    /// # Example
    /// ```
    /// use dsanneal::utils::DominatingSet;
    /// let mut domset = DominatingSet::new(5);
    /// domset.add_node(0);
    /// assert!(domset.is_in_domset(0));
    /// ```
    pub fn add_node(&mut self, node: Node) {
        assert!(self.try_add_node(node));
    }

    /// Adds a node to the dominating set and returns *true* if it was not contained before.
    /// ** Panics if the node is out of range **
    pub fn try_add_node(&mut self, node: Node) -> bool {
        assert!(node < self.number_of_nodes());
        if self.is_in_domset(node) {
            return false;
        }

        self.position[node as usize] = self.set.len() as Node;
        self.set.push(node);
        true
    }

    /// Adds multiple nodes to the dominating set; nodes already contained are skipped.
    ///
    /// # Example
    /// ```
    /// use dsanneal::utils::DominatingSet;
    /// let mut domset = DominatingSet::new(5);
    /// domset.add_nodes([0, 1, 2, 1]);
    /// assert_eq!(domset.len(), 3);
    /// ```
    pub fn add_nodes(&mut self, nodes: impl IntoIterator<Item = Node>) {
        for u in nodes {
            self.try_add_node(u);
        }
    }

    /// Removes a node from the dominating set.
    /// ** Panics if the node is not contained **
    pub fn remove_node(&mut self, node: Node) {
        assert!(self.try_remove_node(node));
    }

    /// Removes a node from the dominating set and returns *true* if it was contained.
    pub fn try_remove_node(&mut self, node: Node) -> bool {
        let pos = self.position[node as usize];
        if pos == NOT_IN_SET {
            return false;
        }

        self.set.swap_remove(pos as usize);
        if let Some(&moved) = self.set.get(pos as usize) {
            self.position[moved as usize] = pos;
        }
        self.position[node as usize] = NOT_IN_SET;
        true
    }

    /// Removes all nodes from the set
    pub fn clear(&mut self) {
        for &u in &self.set {
            self.position[u as usize] = NOT_IN_SET;
        }
        self.set.clear();
    }

    #[inline(always)]
    pub fn is_in_domset(&self, node: Node) -> bool {
        self.position[node as usize] != NOT_IN_SET
    }

    /// Returns true if the dominating set is empty.
    ///
    /// # Example
    /// ```
    /// use dsanneal::utils::DominatingSet;
    /// let mut domset = DominatingSet::new(5);
    /// assert!(domset.is_empty());
    /// domset.add_node(0);
    /// assert!(!domset.is_empty());
    /// ```
    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }

    /// Returns the number of nodes in the dominating set.
    pub fn len(&self) -> usize {
        self.set.len()
    }

    /// Returns the i-th node of the internal order
    pub fn ith_node(&self, i: usize) -> Node {
        self.set[i]
    }

    /// Returns an iterator over the nodes in the dominating set.
    pub fn iter(&self) -> impl Iterator<Item = Node> + '_ {
        self.set.iter().copied()
    }

    /// Draws a member uniformly at random; None if the set is empty
    pub fn sample<R: Rng>(&self, rng: &mut R) -> Option<Node> {
        if self.set.is_empty() {
            None
        } else {
            Some(self.set[rng.gen_range(0..self.set.len())])
        }
    }

    /// Writes the dominating set to a writer using 1-based indexing,
    /// as required by the PACE competition.
    ///
    /// ```
    /// use dsanneal::utils::DominatingSet;
    /// let mut domset = DominatingSet::new(5);
    /// domset.add_node(2);
    /// domset.add_node(4);
    ///
    /// let mut buffer: Vec<u8> = Vec::new(); // implements Write
    /// domset.write(&mut buffer).unwrap();
    /// let expected = b"2\n3\n5\n";
    /// assert_eq!(buffer, expected);
    /// ```
    pub fn write<W: Write>(&self, mut writer: W) -> std::io::Result<()> {
        writeln!(&mut writer, "{}", self.set.len())?;
        for u in &self.set {
            writeln!(&mut writer, "{}", u + 1)?;
        }
        Ok(())
    }

    /// Returns true if `u` is in the set or has a neighbor in the set
    #[inline]
    pub fn dominates(&self, graph: &impl AdjacencyList, u: Node) -> bool {
        self.is_in_domset(u) || graph.neighbors_of(u).iter().any(|&v| self.is_in_domset(v))
    }

    /// Returns the smallest node that is neither in the set nor adjacent to it
    pub fn first_undominated(&self, graph: &impl AdjacencyList) -> Option<Node> {
        debug_assert_eq!(graph.number_of_nodes(), self.number_of_nodes());
        graph.vertices().find(|&u| !self.dominates(graph, u))
    }

    /// Returns true if the dominating set is valid, i.e. every node is in the set or has a
    /// neighbor in the set. Stops at the first violation.
    pub fn is_valid(&self, graph: &impl AdjacencyList) -> bool {
        self.first_undominated(graph).is_none()
    }
}

#[derive(Debug, Error)]
pub enum DomSetInvariantError {
    #[error("node {node} stored at position {position} but the index says {indexed}")]
    PositionMismatch {
        node: Node,
        position: usize,
        indexed: Node,
    },
    #[error("index contains {indexed} members but the set holds {stored}")]
    CardinalityMismatch { indexed: usize, stored: usize },
}

impl InvariantCheck<DomSetInvariantError> for DominatingSet {
    fn is_correct(&self) -> Result<(), DomSetInvariantError> {
        for (position, &node) in self.set.iter().enumerate() {
            let indexed = self.position[node as usize];
            if indexed as usize != position {
                return Err(DomSetInvariantError::PositionMismatch {
                    node,
                    position,
                    indexed,
                });
            }
        }

        let indexed = self.position.iter().filter(|&&p| p != NOT_IN_SET).count();
        if indexed != self.set.len() {
            return Err(DomSetInvariantError::CardinalityMismatch {
                indexed,
                stored: self.set.len(),
            });
        }

        Ok(())
    }
}
