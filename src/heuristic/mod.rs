//! Construction heuristics and the simulated-annealing local search on top of them.

pub mod annealing;
pub mod construction;
pub mod degree_greedy;
pub mod greedy;
pub mod lp;
pub mod matching;
pub mod moves;
pub mod pruning;

pub use annealing::{
    AnnealingConfig, AnnealingResult, AnnealingState, AnnealingStats, CoolingSchedule, DsAnnealing,
};
pub use construction::{Construction, ConstructionOptions};
pub use lp::LpRelaxation;
pub use moves::{Move, MoveGenerator};
pub use pruning::{PruneMode, prune};
