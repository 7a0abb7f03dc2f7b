use std::{fmt, str::FromStr, time::Instant};

use log::{info, warn};
use rand::Rng;
use serde::Serialize;

use super::{
    degree_greedy::degree_greedy,
    greedy::greedy_approximation,
    lp::LpRelaxation,
    matching::matching_approximation,
    pruning::{PruneMode, prune},
};
use crate::{errors::EngineError, graph::*, utils::DominatingSet};

/// Strategy that produces the feasible starting point of the annealing search
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub enum Construction {
    /// Degree-greedy with lazily updated residual degrees
    #[default]
    Ln,
    /// Maximal matching of the residual graph, both endpoints per matched edge. The name
    /// follows the vertex cover analogue; for dominating sets no constant factor is guaranteed.
    TwoApprox,
    /// Set-cover greedy on closed neighborhoods followed by pruning
    Greedy,
    /// Every node followed by pruning
    Trivial,
    /// Rounded optimum of the LP relaxation, see [`LpRelaxation::round`]
    LpRounding,
}

impl Construction {
    pub const ALL: [Construction; 5] = [
        Construction::Ln,
        Construction::TwoApprox,
        Construction::Greedy,
        Construction::Trivial,
        Construction::LpRounding,
    ];

    /// Temperature the annealing search starts with when seeded by this strategy
    pub fn initial_temperature(&self) -> f64 {
        match self {
            Construction::Ln => 0.1,
            Construction::TwoApprox => 0.2,
            Construction::Greedy => 0.5,
            Construction::Trivial => 0.1,
            Construction::LpRounding => 0.05,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Construction::Ln => "ln",
            Construction::TwoApprox => "two-approx",
            Construction::Greedy => "greedy",
            Construction::Trivial => "trivial",
            Construction::LpRounding => "lp-rounding",
        }
    }

    /// Builds a dominating set of `graph`.
    ///
    /// Returns [`EngineError::InfeasibleConstruction`] if the result does not dominate the
    /// graph, which indicates a bug in the strategy.
    pub fn build<R: Rng>(
        &self,
        graph: &impl AdjacencyList,
        options: &ConstructionOptions,
        rng: &mut R,
    ) -> Result<DominatingSet, EngineError> {
        let timer = Instant::now();

        let domset = match self {
            Construction::Ln => degree_greedy(graph),
            Construction::TwoApprox => matching_approximation(graph, rng),
            Construction::Greedy => {
                let domset = greedy_approximation(graph);
                prune_keeping_feasibility(graph, domset, options.prune_mode)
            }
            Construction::Trivial => {
                let domset = DominatingSet::new_all(graph.number_of_nodes());
                prune_keeping_feasibility(graph, domset, options.prune_mode)
            }
            Construction::LpRounding => match &options.relaxation {
                Some(lp) if lp.fits(graph) => lp.round(graph),
                _ => LpRelaxation::solve(graph)?.round(graph),
            },
        };

        if let Some(witness) = domset.first_undominated(graph) {
            return Err(EngineError::InfeasibleConstruction {
                strategy: self.name().to_string(),
                witness,
            });
        }

        info!(
            "Construction {} found {} nodes in {}ms",
            self,
            domset.len(),
            timer.elapsed().as_millis()
        );

        Ok(domset)
    }
}

impl fmt::Display for Construction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Construction {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ln" | "ln-degree-greedy" => Ok(Construction::Ln),
            "2" | "two-approx" => Ok(Construction::TwoApprox),
            "greedy" | "greedy-plus-prune" => Ok(Construction::Greedy),
            "no_approx" | "trivial" | "trivial-plus-prune" => Ok(Construction::Trivial),
            "lp" | "lp-rounding" => Ok(Construction::LpRounding),
            _ => Err(EngineError::UnknownConstruction(s.to_string())),
        }
    }
}

/// Tunables of the construction phase
#[derive(Clone, Debug, Default)]
pub struct ConstructionOptions {
    pub prune_mode: PruneMode,
    /// Solved relaxation of the input graph; [`Construction::LpRounding`] solves its own if
    /// missing or computed for another graph
    pub relaxation: Option<LpRelaxation>,
}

impl ConstructionOptions {
    pub fn with_prune_mode(mut self, prune_mode: PruneMode) -> Self {
        self.prune_mode = prune_mode;
        self
    }

    pub fn with_relaxation(mut self, relaxation: LpRelaxation) -> Self {
        self.relaxation = Some(relaxation);
        self
    }
}

/// Prunes `domset`; if the single-pass mode broke feasibility, starts over from the unpruned
/// set in fixpoint mode.
fn prune_keeping_feasibility(
    graph: &impl AdjacencyList,
    domset: DominatingSet,
    mode: PruneMode,
) -> DominatingSet {
    let mut pruned = domset.clone();
    prune(graph, &mut pruned, mode);

    if mode == PruneMode::SinglePass
        && let Some(witness) = pruned.first_undominated(graph)
    {
        warn!("Single-pass pruning left node {witness} undominated; pruning again in fixpoint mode");
        pruned = domset;
        prune(graph, &mut pruned, PruneMode::Fixpoint);
    }

    pruned
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::random_graphs;
    use rand::SeedableRng;
    use rand_pcg::Pcg64Mcg;

    #[test]
    fn parse_names() {
        assert_eq!("ln".parse::<Construction>(), Ok(Construction::Ln));
        assert_eq!("2".parse::<Construction>(), Ok(Construction::TwoApprox));
        assert_eq!("Greedy".parse::<Construction>(), Ok(Construction::Greedy));
        assert_eq!("no_approx".parse::<Construction>(), Ok(Construction::Trivial));
        assert_eq!("lp".parse::<Construction>(), Ok(Construction::LpRounding));
        assert_eq!(
            "random".parse::<Construction>(),
            Err(EngineError::UnknownConstruction("random".into()))
        );

        for c in Construction::ALL {
            assert_eq!(c.to_string().parse::<Construction>(), Ok(c));
        }
    }

    #[test]
    fn initial_temperatures() {
        assert_eq!(Construction::default(), Construction::Ln);
        assert_eq!(Construction::Ln.initial_temperature(), 0.1);
        assert_eq!(Construction::TwoApprox.initial_temperature(), 0.2);
        assert_eq!(Construction::Greedy.initial_temperature(), 0.5);
        assert_eq!(Construction::Trivial.initial_temperature(), 0.1);
        assert_eq!(Construction::LpRounding.initial_temperature(), 0.05);
    }

    #[test]
    fn ln_is_no_worse_than_trivial_on_path() {
        let mut rng = Pcg64Mcg::seed_from_u64(11);
        let path = AdjArray::path(7);
        let options = ConstructionOptions::default();

        let ln = Construction::Ln.build(&path, &options, &mut rng).unwrap();
        let trivial = Construction::Trivial.build(&path, &options, &mut rng).unwrap();

        assert!(ln.is_valid(&path));
        assert!(trivial.is_valid(&path));
        assert!(ln.len() <= trivial.len());
    }

    #[test]
    fn single_pass_trivial_falls_back_to_fixpoint() {
        let mut rng = Pcg64Mcg::seed_from_u64(12);
        // every node of a path is locally redundant when all are selected
        let path = AdjArray::path(5);
        let options = ConstructionOptions::default().with_prune_mode(PruneMode::SinglePass);

        let domset = Construction::Trivial.build(&path, &options, &mut rng).unwrap();
        assert!(domset.is_valid(&path));
        assert!(!domset.is_empty());
    }

    #[test]
    fn all_strategies_are_feasible() {
        let mut rng = Pcg64Mcg::seed_from_u64(13);
        let mut build_rng = Pcg64Mcg::seed_from_u64(14);
        for graph in random_graphs(&mut rng, 1..60, 3.0).take(200) {
            for construction in Construction::ALL {
                for prune_mode in [PruneMode::SinglePass, PruneMode::Fixpoint] {
                    let options = ConstructionOptions::default().with_prune_mode(prune_mode);
                    let domset = construction
                        .build(&graph, &options, &mut build_rng)
                        .unwrap();
                    assert!(domset.is_valid(&graph), "{construction} {graph:?}");
                }
            }
        }
    }

    #[test]
    fn lp_rounding_reuses_matching_relaxation() {
        let mut rng = Pcg64Mcg::seed_from_u64(15);
        let star = AdjArray::star(6);
        let relaxation = LpRelaxation::solve(&star).unwrap();

        let options = ConstructionOptions::default().with_relaxation(relaxation);
        let domset = Construction::LpRounding.build(&star, &options, &mut rng).unwrap();
        assert_eq!(domset.iter().collect::<Vec<_>>(), [0]);

        // a relaxation of another graph is ignored
        let path = AdjArray::path(9);
        let domset = Construction::LpRounding.build(&path, &options, &mut rng).unwrap();
        assert!(domset.is_valid(&path));
        assert_eq!(domset.number_of_nodes(), 9);
    }
}
