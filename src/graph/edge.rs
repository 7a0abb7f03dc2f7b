use super::*;

/// An undirected edge; `Edge(u, v)` and `Edge(v, u)` denote the same edge of a graph
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Hash)]
pub struct Edge(pub Node, pub Node);

impl Edge {
    pub fn is_loop(&self) -> bool {
        self.0 == self.1
    }
}

impl From<(Node, Node)> for Edge {
    fn from(value: (Node, Node)) -> Self {
        Edge(value.0, value.1)
    }
}
