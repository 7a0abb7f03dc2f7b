use std::error::Error;

use thiserror::Error;

use crate::graph::{Node, NumNodes};

/// Trait for checking invariants in datastructures
pub trait InvariantCheck<E: Error> {
    fn is_correct(&self) -> Result<(), E>;
}

/// Hard failures of the search engine. Rejected moves, an expired time budget or a reached
/// temperature floor are regular control flow and never show up here.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EngineError {
    #[error("unknown construction strategy `{0}`; expected one of ln, two-approx, greedy, trivial, lp-rounding")]
    UnknownConstruction(String),

    #[error("unknown cooling schedule `{0}`; expected one of exp, poly, step")]
    UnknownSchedule(String),

    #[error("unknown prune mode `{0}`; expected one of single-pass, fixpoint")]
    UnknownPruneMode(String),

    #[error("invalid annealing configuration: {0}")]
    InvalidConfig(String),

    #[error("node {node} does not exist in a graph with {number_of_nodes} nodes")]
    InvalidNode { node: Node, number_of_nodes: NumNodes },

    #[error("LP relaxation could not be solved to optimality: {0}")]
    LpFailed(String),

    #[error("construction `{strategy}` produced a set that does not dominate node {witness}")]
    InfeasibleConstruction { strategy: String, witness: Node },
}
