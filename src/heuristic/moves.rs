//! The local-search move of the annealing search.
//!
//! A move removes a uniformly random member `ver` of a feasible DomSet `D` and repairs the
//! resulting set `D' = D \ {ver}`:
//!  - every neighbor of `ver` that is neither in `D'` nor adjacent to a member of `D'` joins
//!    `D'` (members added earlier in the same repair count),
//!  - if `ver` itself has no neighbor in `D'` afterwards, its first neighbor joins `D'`, or
//!    `ver` is re-inserted if it is isolated.
//!
//! Only nodes in `N[ver]` can lose their dominator when `ver` leaves, so `D'` is feasible
//! whenever `D` is.

use rand::Rng;
use smallvec::SmallVec;

use crate::{graph::*, utils::DominatingSet};

/// A proposed change of a DomSet: one removal followed by the repair insertions
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Move {
    removed: Node,
    added: SmallVec<[Node; 4]>,
}

impl Move {
    pub fn removed(&self) -> Node {
        self.removed
    }

    pub fn added(&self) -> &[Node] {
        &self.added
    }

    /// Size of the candidate set if the move is applied to a set of size `current_len`
    pub fn candidate_len(&self, current_len: usize) -> usize {
        current_len - 1 + self.added.len()
    }

    /// Turns `domset` (the set the move was proposed for) into the candidate set
    pub fn apply(&self, domset: &mut DominatingSet) {
        domset.remove_node(self.removed);
        for &u in &self.added {
            domset.add_node(u);
        }
    }

    /// Returns a copy of the candidate set, leaving `domset` untouched
    pub fn candidate(&self, domset: &DominatingSet) -> DominatingSet {
        let mut candidate = domset.clone();
        self.apply(&mut candidate);
        candidate
    }
}

/// Proposes moves; keeps a scratch marker so that proposals do not allocate `O(n)` memory.
pub struct MoveGenerator {
    marks: Vec<bool>,
}

impl MoveGenerator {
    pub fn new(number_of_nodes: NumNodes) -> Self {
        Self {
            marks: vec![false; number_of_nodes as usize],
        }
    }

    /// Membership in `domset \ {ver}` plus the repair insertions made so far
    #[inline]
    fn in_candidate(&self, domset: &DominatingSet, ver: Node, u: Node) -> bool {
        self.marks[u as usize] || (u != ver && domset.is_in_domset(u))
    }

    /// Proposes a move for `domset`; returns `None` iff `domset` is empty.
    pub fn propose<R: Rng>(
        &mut self,
        graph: &impl AdjacencyList,
        domset: &DominatingSet,
        rng: &mut R,
    ) -> Option<Move> {
        debug_assert_eq!(self.marks.len(), graph.len());

        let ver = domset.sample(rng)?;
        let mut added: SmallVec<[Node; 4]> = SmallVec::new();

        for &w in graph.neighbors_of(ver) {
            if w == ver || self.in_candidate(domset, ver, w) {
                continue;
            }

            if !graph
                .neighbors_of(w)
                .iter()
                .any(|&x| self.in_candidate(domset, ver, x))
            {
                self.marks[w as usize] = true;
                added.push(w);
            }
        }

        if !graph
            .neighbors_of(ver)
            .iter()
            .any(|&x| self.in_candidate(domset, ver, x))
        {
            let replacement = graph
                .neighbors_of(ver)
                .iter()
                .copied()
                .find(|&u| u != ver)
                .unwrap_or(ver);
            added.push(replacement);
        }

        for &u in &added {
            self.marks[u as usize] = false;
        }

        Some(Move {
            removed: ver,
            added,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::random_instances;
    use rand::SeedableRng;
    use rand_pcg::Pcg64Mcg;

    #[test]
    fn empty_set_has_no_move() {
        let mut rng = Pcg64Mcg::seed_from_u64(1);
        let graph = AdjArray::path(3);
        let mut moves = MoveGenerator::new(3);
        let domset = DominatingSet::new(3);
        assert!(moves.propose(&graph, &domset, &mut rng).is_none());
    }

    #[test]
    fn isolated_member_is_reinserted() {
        let mut rng = Pcg64Mcg::seed_from_u64(2);
        let graph = AdjArray::new(1);
        let mut domset = DominatingSet::new_all(1);
        let mut moves = MoveGenerator::new(1);

        let mv = moves.propose(&graph, &domset, &mut rng).unwrap();
        assert_eq!(mv.removed(), 0);
        assert_eq!(mv.added(), [0]);
        assert_eq!(mv.candidate_len(domset.len()), 1);

        mv.apply(&mut domset);
        assert!(domset.is_valid(&graph));
    }

    #[test]
    fn star_center_is_replaced_by_its_leaves() {
        let mut rng = Pcg64Mcg::seed_from_u64(3);
        let graph = AdjArray::star(5);
        let mut domset = DominatingSet::new(5);
        domset.add_node(0);
        let mut moves = MoveGenerator::new(5);

        let mv = moves.propose(&graph, &domset, &mut rng).unwrap();
        assert_eq!(mv.removed(), 0);
        assert_eq!(mv.added(), [1, 2, 3, 4]);

        let candidate = mv.candidate(&domset);
        assert_eq!(candidate.len(), 4);
        assert!(candidate.is_valid(&graph));
        assert_eq!(domset.len(), 1);
    }

    #[test]
    fn redundant_member_is_dropped() {
        let mut rng = Pcg64Mcg::seed_from_u64(4);
        // path 0-1-2 with members {0, 1}: removing either keeps the set feasible
        let graph = AdjArray::path(3);
        let mut domset = DominatingSet::new(3);
        domset.add_nodes([0, 1]);
        let mut moves = MoveGenerator::new(3);

        for _ in 0..20 {
            let mv = moves.propose(&graph, &domset, &mut rng).unwrap();
            let candidate = mv.candidate(&domset);
            assert!(candidate.is_valid(&graph));
            if mv.removed() == 0 {
                assert!(mv.added().is_empty());
                assert_eq!(mv.candidate_len(domset.len()), 1);
            }
        }
    }

    #[test]
    fn moves_preserve_feasibility() {
        let mut rng = Pcg64Mcg::seed_from_u64(5);
        let mut move_rng = Pcg64Mcg::seed_from_u64(6);

        for (graph, mut domset) in random_instances(&mut rng, 1..50, 3.0).take(200) {
            let mut moves = MoveGenerator::new(graph.number_of_nodes());
            for _ in 0..50 {
                let len = domset.len();
                let mv = moves.propose(&graph, &domset, &mut move_rng).unwrap();
                mv.apply(&mut domset);

                assert_eq!(domset.len(), mv.candidate_len(len));
                assert!(domset.is_valid(&graph), "{graph:?}");
            }
        }
    }
}
