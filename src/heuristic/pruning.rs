//! Removal of dominating nodes that other members make unnecessary.
//!
//! A member `v` is *locally redundant* if
//!  - some neighbor of `v` is a member (so `v` stays dominated without itself), and
//!  - every neighbor `u` of `v` that is not a member has another member neighbor `w != v`.
//!
//! The test only looks at the 1-hop neighborhood of `v`. Removing a single locally redundant
//! node keeps a dominating set dominating, but removing several of them at once does not:
//! two adjacent members that only cover each other are both locally redundant, and
//! removing both leaves them undominated. [`PruneMode`] selects between the cheap snapshot
//! variant that accepts this risk and a variant that re-evaluates after every removal.

use std::{fmt, str::FromStr};

use log::debug;
use serde::Serialize;

use crate::{errors::EngineError, graph::*, utils::DominatingSet};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub enum PruneMode {
    /// Evaluate every member against the unmodified set, then remove all redundant members.
    /// May return a set that is no longer dominating.
    SinglePass,
    /// Remove redundant members one at a time against the current set until none is left.
    /// Always keeps the set dominating.
    #[default]
    Fixpoint,
}

impl PruneMode {
    pub fn name(&self) -> &'static str {
        match self {
            PruneMode::SinglePass => "single-pass",
            PruneMode::Fixpoint => "fixpoint",
        }
    }
}

impl fmt::Display for PruneMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PruneMode {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "single-pass" | "single" | "fast" => Ok(PruneMode::SinglePass),
            "fixpoint" | "safe" => Ok(PruneMode::Fixpoint),
            _ => Err(EngineError::UnknownPruneMode(s.to_string())),
        }
    }
}

/// Returns true if member `v` passes the local redundancy test described in the module docs
pub fn is_locally_redundant(graph: &impl AdjacencyList, domset: &DominatingSet, v: Node) -> bool {
    debug_assert!(domset.is_in_domset(v));

    let mut has_ds_neighbor = false;
    for &u in graph.neighbors_of(v) {
        if u == v {
            continue;
        }

        if domset.is_in_domset(u) {
            has_ds_neighbor = true;
        } else if !graph
            .neighbors_of(u)
            .iter()
            .any(|&w| w != v && w != u && domset.is_in_domset(w))
        {
            return false;
        }
    }

    has_ds_neighbor
}

/// Removes locally redundant members from `domset` and returns how many were removed.
pub fn prune(graph: &impl AdjacencyList, domset: &mut DominatingSet, mode: PruneMode) -> NumNodes {
    let before = domset.len();

    match mode {
        PruneMode::SinglePass => {
            let removable: Vec<Node> = domset
                .iter()
                .filter(|&v| is_locally_redundant(graph, domset, v))
                .collect();

            for v in removable {
                domset.remove_node(v);
            }
        }

        PruneMode::Fixpoint => {
            // Shrinking the set never makes another member redundant, so a member rejected
            // once stays rejected and a single sweep already reaches the fixpoint.
            let mut index = 0;
            while index < domset.len() {
                let v = domset.ith_node(index);
                if is_locally_redundant(graph, domset, v) {
                    // swap-remove moves an unvisited member to `index`
                    domset.remove_node(v);
                    continue;
                }
                index += 1;
            }

            debug_assert!(
                domset
                    .iter()
                    .all(|v| !is_locally_redundant(graph, domset, v))
            );
        }
    }

    let removed = (before - domset.len()) as NumNodes;
    debug!("Pruning ({mode}) removed {removed} of {before} nodes");
    removed
}
