pub mod adj_array;
pub mod edge;
pub mod gnp;

pub type Node = u32;
pub type NumNodes = Node;
pub type NumEdges = u64;

use std::ops::Range;

pub use adj_array::*;
pub use edge::*;
pub use gnp::*;

/// Provides getters pertaining to the size of a graph
pub trait GraphNodeOrder {
    type VertexIter<'a>: Iterator<Item = Node>
    where
        Self: 'a;

    /// Returns the number of nodes of the graph
    fn number_of_nodes(&self) -> Node;

    /// Return the number of nodes as usize
    fn len(&self) -> usize {
        self.number_of_nodes() as usize
    }

    /// Returns an iterator over V.
    fn vertices(&self) -> Self::VertexIter<'_>;

    /// Returns a range of vertices.
    /// In contrast to self.vertices(), the range returned by self.vertices_ranges() does
    /// not borrow self and hence may be used where additional mutable references of self are needed
    fn vertices_range(&self) -> Range<Node> {
        0..self.number_of_nodes()
    }

    /// Returns true if the graph has no nodes (and thus no edges)
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub trait GraphEdgeOrder {
    /// Returns the number of edges of the graph
    fn number_of_edges(&self) -> NumEdges;
}

#[macro_export]
macro_rules! node_iterator {
    ($iter : ident, $single : ident, $type : ty) => {
        fn $iter(&self) -> impl Iterator<Item = $type> + '_ {
            self.vertices().map(|u| self.$single(u))
        }
    };
}

/// Read-only neighborhood queries. This is the only view of a graph the search engine gets.
pub trait AdjacencyList: GraphNodeOrder + Sized {
    /// Returns a slice of neighbors of a given vertex. The order is fixed for the lifetime
    /// of the graph.
    /// ** Panics if the v >= n **
    fn neighbors_of(&self, u: Node) -> &[Node];

    /// Returns the number of neighbors of from [`u`]
    fn degree_of(&self, u: Node) -> NumNodes {
        self.neighbors_of(u).len() as NumNodes
    }

    /// Returns the largest degree of any node (0 for the empty graph)
    fn max_degree(&self) -> NumNodes {
        self.degrees().max().unwrap_or(0)
    }

    node_iterator!(degrees, degree_of, NumNodes);
}

/// Provides efficient tests whether an edge exists
pub trait AdjacencyTest {
    /// Returns *true* exactly if the graph contains the edge {u, v}
    fn has_edge(&self, u: Node, v: Node) -> bool;
}

pub trait GraphNew {
    /// Creates an empty graph with n singleton nodes
    fn new(n: NumNodes) -> Self;
}

/// Provides functions to insert edges
pub trait GraphEdgeEditing: GraphNew {
    /// Adds the undirected edge *{u,v}* to the graph.
    /// ** Panics if the edge is already contained, is a loop, or possibly if u, v >= n **
    fn add_edge(&mut self, u: Node, v: Node) {
        assert!(self.try_add_edge(u, v))
    }

    /// Adds the undirected edge *{u,v}* to the graph.
    /// Returns *true* exactly if the edge was not present previously and is not a loop.
    /// ** Can panic if u, v >= n, depending on implementation **
    fn try_add_edge(&mut self, u: Node, v: Node) -> bool;

    fn add_edges(&mut self, edges: impl IntoIterator<Item = impl Into<Edge>>) {
        for Edge(u, v) in edges.into_iter().map(|d| d.into()) {
            self.add_edge(u, v);
        }
    }
}
