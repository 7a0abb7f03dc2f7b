use super::*;
use itertools::Itertools;
use std::fmt;

/// Adjacency-array representation of a simple undirected graph on the nodes `0..n`.
///
/// Each node stores its neighbors in insertion order; the order never changes once the
/// graph has been built, so repeated queries enumerate neighbors identically.
#[derive(Clone)]
pub struct AdjArray {
    adj: Vec<Vec<Node>>,
    number_of_edges: NumEdges,
}

impl GraphNodeOrder for AdjArray {
    type VertexIter<'a> = Range<Node>;

    fn number_of_nodes(&self) -> NumNodes {
        self.adj.len() as NumNodes
    }

    fn vertices(&self) -> Self::VertexIter<'_> {
        self.vertices_range()
    }
}

impl GraphEdgeOrder for AdjArray {
    fn number_of_edges(&self) -> NumEdges {
        self.number_of_edges
    }
}

impl AdjacencyList for AdjArray {
    #[inline(always)]
    fn neighbors_of(&self, u: Node) -> &[Node] {
        &self.adj[u as usize]
    }
}

impl AdjacencyTest for AdjArray {
    fn has_edge(&self, u: Node, v: Node) -> bool {
        // scan the shorter list
        let (u, v) = if self.adj[u as usize].len() <= self.adj[v as usize].len() {
            (u, v)
        } else {
            (v, u)
        };
        self.adj[u as usize].contains(&v)
    }
}

impl GraphNew for AdjArray {
    fn new(number_of_nodes: NumNodes) -> Self {
        Self {
            adj: vec![Default::default(); number_of_nodes as usize],
            number_of_edges: 0,
        }
    }
}

impl GraphEdgeEditing for AdjArray {
    fn try_add_edge(&mut self, u: Node, v: Node) -> bool {
        if u == v || self.has_edge(u, v) {
            return false;
        }

        self.adj[u as usize].push(v);
        self.adj[v as usize].push(u);
        self.number_of_edges += 1;

        true
    }
}

impl AdjArray {
    /// Iterates over every edge exactly once, as `Edge(u, v)` with `u < v`
    pub fn ordered_edges(&self) -> impl Iterator<Item = Edge> + '_ {
        self.vertices_range().flat_map(|u| {
            self.neighbors_of(u)
                .iter()
                .filter(move |&&v| u < v)
                .map(move |&v| Edge(u, v))
        })
    }

    /// Builds a graph from an edge list; the number of nodes is one more than the largest
    /// endpoint.
    pub fn test_only_from(edges: impl Clone + IntoIterator<Item = impl Into<Edge>>) -> Self {
        let n = edges
            .clone()
            .into_iter()
            .map(|e| e.into())
            .map(|e| e.0.max(e.1) + 1)
            .max()
            .unwrap_or(0);
        let mut graph = Self::new(n as NumNodes);

        graph.add_edges(edges);

        graph
    }

    /// Path `0 - 1 - ... - (n-1)`
    pub fn path(n: NumNodes) -> Self {
        let mut graph = Self::new(n);
        for u in 1..n {
            graph.add_edge(u - 1, u);
        }
        graph
    }

    /// Cycle `0 - 1 - ... - (n-1) - 0`; requires `n >= 3`
    pub fn cycle(n: NumNodes) -> Self {
        assert!(n >= 3);
        let mut graph = Self::path(n);
        graph.add_edge(n - 1, 0);
        graph
    }

    /// Star with center `0` and leaves `1..n`
    pub fn star(n: NumNodes) -> Self {
        let mut graph = Self::new(n);
        for u in 1..n {
            graph.add_edge(0, u);
        }
        graph
    }
}

impl fmt::Debug for AdjArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "AdjArray {{ n: {}, edges: [{}] }}",
            self.number_of_nodes(),
            self.ordered_edges()
                .map(|Edge(u, v)| format!("{u}-{v}"))
                .join(", ")
        )
    }
}

super::graph_tests::impl_graph_tests!(AdjArray);
