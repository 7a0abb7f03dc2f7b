//! Simulated annealing on feasible dominating sets.
//!
//! Starting from a construction, [`DsAnnealing`] repeatedly proposes a [`Move`] and accepts it
//! with the Metropolis probability `min(1, exp(delta / T))`, where `delta = |D| - |D'|` is
//! positive for improvements. Every step consists of [`TRIALS_PER_STEP`] trials followed by
//! one cooling update of the temperature `T`. A run ends when the time limit is exhausted,
//! the temperature reaches the floor, or a termination signal was received.
//!
//! Since every move keeps the set dominating, so does every state of the search; the final
//! feasibility check only guards against bugs.
//!
//! [`Move`]: super::moves::Move

use std::{
    fmt,
    str::FromStr,
    time::{Duration, Instant},
};

use log::{debug, error, info};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64Mcg;
use serde::Serialize;

use super::{
    construction::{Construction, ConstructionOptions},
    moves::MoveGenerator,
};
use crate::{
    algorithm::{IterativeAlgorithm, TerminatingIterativeAlgorithm},
    errors::{EngineError, InvariantCheck},
    graph::*,
    utils::{DominatingSet, signal_handling},
};

/// Number of proposed moves per temperature step
pub const TRIALS_PER_STEP: usize = 300;

const POLYNOMIAL_EXPONENT: f64 = 0.8;
const STEP_PERIOD: u64 = 5;

/// Rule that lowers the temperature after every step
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub enum CoolingSchedule {
    /// `T_k = rate * T_{k-1}`
    Exponential,
    /// `T_k = T_0 / k^0.8`
    #[default]
    Polynomial,
    /// `T_k = rate * T_{k-1}` if `k` is a multiple of 5, otherwise unchanged
    Step,
}

impl CoolingSchedule {
    pub fn name(&self) -> &'static str {
        match self {
            CoolingSchedule::Exponential => "exponential",
            CoolingSchedule::Polynomial => "polynomial",
            CoolingSchedule::Step => "step",
        }
    }

    /// Temperature after step `round` (counting from 1), given the temperature `current`
    /// before that step and the start temperature `start`.
    pub fn next_temperature(&self, current: f64, start: f64, round: u64, cooling_rate: f64) -> f64 {
        debug_assert!(round > 0);
        match self {
            CoolingSchedule::Exponential => current * cooling_rate,
            CoolingSchedule::Polynomial => start / (round as f64).powf(POLYNOMIAL_EXPONENT),
            CoolingSchedule::Step => {
                if round % STEP_PERIOD == 0 {
                    current * cooling_rate
                } else {
                    current
                }
            }
        }
    }
}

impl fmt::Display for CoolingSchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CoolingSchedule {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "exp" | "exponential" => Ok(CoolingSchedule::Exponential),
            "poly" | "polynomial" => Ok(CoolingSchedule::Polynomial),
            "step" => Ok(CoolingSchedule::Step),
            _ => Err(EngineError::UnknownSchedule(s.to_string())),
        }
    }
}

/// Parameters of a single [`DsAnnealing::anneal`] run
///
/// # Example
/// ```
/// use std::time::Duration;
/// use dsanneal::heuristic::annealing::{AnnealingConfig, CoolingSchedule};
///
/// let config = AnnealingConfig::default()
///     .with_schedule(CoolingSchedule::Exponential)
///     .with_cooling_rate(0.9)
///     .with_time_limit(Duration::from_secs(10));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Debug)]
pub struct AnnealingConfig {
    pub schedule: CoolingSchedule,
    /// The run ends once the temperature is at most this value
    pub min_temperature: f64,
    /// Only used by [`CoolingSchedule::Exponential`] and [`CoolingSchedule::Step`]
    pub cooling_rate: f64,
    pub time_limit: Duration,
}

impl Default for AnnealingConfig {
    fn default() -> Self {
        Self {
            schedule: CoolingSchedule::default(),
            min_temperature: 0.001,
            cooling_rate: 0.95,
            time_limit: Duration::from_secs(120),
        }
    }
}

impl AnnealingConfig {
    pub fn with_schedule(mut self, schedule: CoolingSchedule) -> Self {
        self.schedule = schedule;
        self
    }

    pub fn with_min_temperature(mut self, min_temperature: f64) -> Self {
        self.min_temperature = min_temperature;
        self
    }

    pub fn with_cooling_rate(mut self, cooling_rate: f64) -> Self {
        self.cooling_rate = cooling_rate;
        self
    }

    pub fn with_time_limit(mut self, time_limit: Duration) -> Self {
        self.time_limit = time_limit;
        self
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if !(self.min_temperature.is_finite() && self.min_temperature > 0.0) {
            return Err(EngineError::InvalidConfig(format!(
                "min_temperature must be positive, got {}",
                self.min_temperature
            )));
        }

        if !(self.cooling_rate > 0.0 && self.cooling_rate < 1.0) {
            return Err(EngineError::InvalidConfig(format!(
                "cooling_rate must be in (0, 1), got {}",
                self.cooling_rate
            )));
        }

        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum AnnealingState {
    Running,
    TimeExpired,
    TemperatureFloorReached,
    Interrupted,
}

impl AnnealingState {
    pub fn is_terminal(&self) -> bool {
        *self != AnnealingState::Running
    }
}

impl fmt::Display for AnnealingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AnnealingState::Running => "running",
            AnnealingState::TimeExpired => "time expired",
            AnnealingState::TemperatureFloorReached => "temperature floor reached",
            AnnealingState::Interrupted => "interrupted",
        })
    }
}

/// Outcome of a run. An infeasible final set is reported as its own variant and never as a
/// size; its textual form is `-1`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnnealingResult {
    Dominating { size: NumNodes },
    NotDominating,
}

impl AnnealingResult {
    pub fn size(&self) -> Option<NumNodes> {
        match self {
            AnnealingResult::Dominating { size } => Some(*size),
            AnnealingResult::NotDominating => None,
        }
    }

    pub fn is_dominating(&self) -> bool {
        matches!(self, AnnealingResult::Dominating { .. })
    }
}

impl fmt::Display for AnnealingResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnnealingResult::Dominating { size } => write!(f, "{size}"),
            AnnealingResult::NotDominating => write!(f, "-1"),
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct AnnealingStats {
    pub steps: u64,
    pub trials: u64,
    pub accepted_moves: u64,
    pub improving_moves: u64,
    pub initial_size: usize,
    pub final_size: usize,
    pub initial_temperature: f64,
    pub final_temperature: f64,
    pub elapsed_seconds: f64,
    pub state: AnnealingState,
}

/// Metropolis acceptance probability `exp(min(delta / T, 0))` of a move that shrinks the set
/// by `delta` nodes at temperature `temperature`
#[inline]
pub fn acceptance_probability(delta: f64, temperature: f64) -> f64 {
    (delta / temperature).min(0.0).exp()
}

pub struct DsAnnealing<'a, G> {
    graph: &'a G,
    construction: Option<Construction>,

    solution: DominatingSet,
    moves: MoveGenerator,
    rng: Pcg64Mcg,

    config: AnnealingConfig,
    start_temperature: f64,
    temperature: f64,
    round: u64,

    state: AnnealingState,
    stats: AnnealingStats,
}

impl<'a, G: AdjacencyList> DsAnnealing<'a, G> {
    /// Builds the starting point with `construction`; the generator is seeded from OS entropy.
    pub fn new(graph: &'a G, construction: Construction) -> Result<Self, EngineError> {
        Self::with_options(graph, construction, &ConstructionOptions::default(), None)
    }

    pub fn with_seed(graph: &'a G, construction: Construction, seed: u64) -> Result<Self, EngineError> {
        Self::with_options(graph, construction, &ConstructionOptions::default(), Some(seed))
    }

    pub fn with_options(
        graph: &'a G,
        construction: Construction,
        options: &ConstructionOptions,
        seed: Option<u64>,
    ) -> Result<Self, EngineError> {
        let mut rng = seed.map_or_else(Pcg64Mcg::from_entropy, Pcg64Mcg::seed_from_u64);
        let solution = construction.build(graph, options, &mut rng)?;

        Ok(Self::from_parts(
            graph,
            Some(construction),
            solution,
            construction.initial_temperature(),
            rng,
        ))
    }

    /// Starts the search from a caller-provided dominating set.
    pub fn with_initial_nodes(
        graph: &'a G,
        nodes: impl IntoIterator<Item = Node>,
        temperature: f64,
        seed: Option<u64>,
    ) -> Result<Self, EngineError> {
        if !(temperature.is_finite() && temperature > 0.0) {
            return Err(EngineError::InvalidConfig(format!(
                "initial temperature must be positive, got {temperature}"
            )));
        }

        let number_of_nodes = graph.number_of_nodes();
        let mut solution = DominatingSet::new(number_of_nodes);
        for node in nodes {
            if node >= number_of_nodes {
                return Err(EngineError::InvalidNode {
                    node,
                    number_of_nodes,
                });
            }
            solution.try_add_node(node);
        }

        if let Some(witness) = solution.first_undominated(graph) {
            return Err(EngineError::InfeasibleConstruction {
                strategy: "provided".to_string(),
                witness,
            });
        }

        let rng = seed.map_or_else(Pcg64Mcg::from_entropy, Pcg64Mcg::seed_from_u64);
        Ok(Self::from_parts(graph, None, solution, temperature, rng))
    }

    fn from_parts(
        graph: &'a G,
        construction: Option<Construction>,
        solution: DominatingSet,
        temperature: f64,
        rng: Pcg64Mcg,
    ) -> Self {
        let stats = AnnealingStats {
            steps: 0,
            trials: 0,
            accepted_moves: 0,
            improving_moves: 0,
            initial_size: solution.len(),
            final_size: solution.len(),
            initial_temperature: temperature,
            final_temperature: temperature,
            elapsed_seconds: 0.0,
            state: AnnealingState::Running,
        };

        Self {
            graph,
            construction,
            moves: MoveGenerator::new(graph.number_of_nodes()),
            solution,
            rng,
            config: AnnealingConfig::default(),
            start_temperature: temperature,
            temperature,
            round: 0,
            state: AnnealingState::Running,
            stats,
        }
    }

    pub fn construction(&self) -> Option<Construction> {
        self.construction
    }

    pub fn solution(&self) -> &DominatingSet {
        &self.solution
    }

    pub fn into_solution(self) -> DominatingSet {
        self.solution
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    pub fn state(&self) -> AnnealingState {
        self.state
    }

    pub fn stats(&self) -> &AnnealingStats {
        &self.stats
    }

    /// Runs the search until the time limit of `config` is exhausted, the temperature reaches
    /// `config.min_temperature`, or a termination signal was received; then reports the size
    /// of the final set.
    ///
    /// The cooling schedule starts over from the current temperature.
    pub fn anneal(&mut self, config: &AnnealingConfig) -> Result<AnnealingResult, EngineError> {
        config.validate()?;

        self.config = config.clone();
        self.start_temperature = self.temperature;
        self.round = 0;
        self.state = AnnealingState::Running;

        let timer = Instant::now();
        self.run_until_timeout(config.time_limit);

        self.state = if self.is_completed() {
            AnnealingState::TemperatureFloorReached
        } else if signal_handling::received_ctrl_c() {
            AnnealingState::Interrupted
        } else {
            AnnealingState::TimeExpired
        };

        self.stats.final_size = self.solution.len();
        self.stats.final_temperature = self.temperature;
        self.stats.elapsed_seconds = timer.elapsed().as_secs_f64();
        self.stats.state = self.state;

        info!(
            "Annealing ({}) stopped after {} steps in {}ms ({}): size {} -> {}, T = {:.6}",
            config.schedule,
            self.round,
            timer.elapsed().as_millis(),
            self.state,
            self.stats.initial_size,
            self.stats.final_size,
            self.temperature
        );

        debug_assert!(self.solution.is_correct().is_ok());

        if let Some(witness) = self.solution.first_undominated(self.graph) {
            error!("Annealing ended with an infeasible set; node {witness} is not dominated");
            return Ok(AnnealingResult::NotDominating);
        }

        Ok(AnnealingResult::Dominating {
            size: self.solution.len() as NumNodes,
        })
    }
}

impl<G: AdjacencyList> IterativeAlgorithm<DominatingSet> for DsAnnealing<'_, G> {
    fn execute_step(&mut self) {
        for _ in 0..TRIALS_PER_STEP {
            self.stats.trials += 1;

            let Some(mv) = self.moves.propose(self.graph, &self.solution, &mut self.rng) else {
                continue;
            };

            let current = self.solution.len();
            let delta = current as f64 - mv.candidate_len(current) as f64;

            if acceptance_probability(delta, self.temperature) >= self.rng.r#gen::<f64>() {
                mv.apply(&mut self.solution);
                self.stats.accepted_moves += 1;
                self.stats.improving_moves += (delta > 0.0) as u64;
            }
        }

        self.round += 1;
        self.stats.steps += 1;
        self.temperature = self.config.schedule.next_temperature(
            self.temperature,
            self.start_temperature,
            self.round,
            self.config.cooling_rate,
        );

        if self.round % 1000 == 0 {
            debug!(
                "Annealing step {:>8}: T = {:.6}, size = {}, accepted = {}",
                self.round,
                self.temperature,
                self.solution.len(),
                self.stats.accepted_moves
            );
        }
    }

    fn is_completed(&self) -> bool {
        self.temperature <= self.config.min_temperature
    }

    fn best_known_solution(&mut self) -> Option<DominatingSet> {
        Some(self.solution.clone())
    }
}

/// Every schedule eventually drops below any positive floor
impl<G: AdjacencyList> TerminatingIterativeAlgorithm<DominatingSet> for DsAnnealing<'_, G> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::random_graphs;

    fn quick_config() -> AnnealingConfig {
        AnnealingConfig::default()
            .with_schedule(CoolingSchedule::Exponential)
            .with_cooling_rate(0.5)
            .with_min_temperature(0.01)
            .with_time_limit(Duration::from_secs(60))
    }

    #[test]
    fn schedules_never_heat_up() {
        for schedule in [
            CoolingSchedule::Exponential,
            CoolingSchedule::Polynomial,
            CoolingSchedule::Step,
        ] {
            let start = 0.5;
            let mut temperature = start;
            for round in 1..500 {
                let next = schedule.next_temperature(temperature, start, round, 0.95);
                assert!(next <= temperature, "{schedule} round {round}");
                assert!(next > 0.0);
                temperature = next;
            }
            assert!(temperature < start);
        }
    }

    #[test]
    fn polynomial_strictly_decreases() {
        let schedule = CoolingSchedule::Polynomial;
        assert_eq!(schedule.next_temperature(0.2, 0.2, 1, 0.95), 0.2);

        let mut prev = 0.2;
        for round in 2..200 {
            let next = schedule.next_temperature(prev, 0.2, round, 0.95);
            assert!(next < prev);
            prev = next;
        }
    }

    #[test]
    fn step_cools_every_fifth_round() {
        let schedule = CoolingSchedule::Step;
        for round in 1..=20 {
            let next = schedule.next_temperature(1.0, 1.0, round, 0.5);
            assert_eq!(next, if round % 5 == 0 { 0.5 } else { 1.0 });
        }
    }

    #[test]
    fn parse_schedules() {
        assert_eq!("exp".parse::<CoolingSchedule>(), Ok(CoolingSchedule::Exponential));
        assert_eq!("Polynomial".parse::<CoolingSchedule>(), Ok(CoolingSchedule::Polynomial));
        assert_eq!("step".parse::<CoolingSchedule>(), Ok(CoolingSchedule::Step));
        assert_eq!(
            "linear".parse::<CoolingSchedule>(),
            Err(EngineError::UnknownSchedule("linear".into()))
        );
    }

    #[test]
    fn acceptance() {
        assert_eq!(acceptance_probability(1.0, 0.1), 1.0);
        assert_eq!(acceptance_probability(0.0, 0.1), 1.0);
        assert!((acceptance_probability(-1.0, 0.5) - (-2.0f64).exp()).abs() < 1e-12);
        assert!(acceptance_probability(-3.0, 0.001) < 1e-100);
    }

    #[test]
    fn config_validation() {
        assert!(AnnealingConfig::default().validate().is_ok());

        for config in [
            AnnealingConfig::default().with_min_temperature(0.0),
            AnnealingConfig::default().with_min_temperature(f64::NAN),
            AnnealingConfig::default().with_cooling_rate(1.0),
            AnnealingConfig::default().with_cooling_rate(0.0),
        ] {
            assert!(matches!(
                config.validate(),
                Err(EngineError::InvalidConfig(_))
            ));
        }

        let graph = AdjArray::cycle(4);
        let mut algo = DsAnnealing::with_seed(&graph, Construction::Ln, 1).unwrap();
        assert!(
            algo.anneal(&AnnealingConfig::default().with_cooling_rate(2.0))
                .is_err()
        );
    }

    #[test]
    fn zero_time_limit_keeps_construction() {
        let graph = AdjArray::path(7);
        let mut algo = DsAnnealing::with_seed(&graph, Construction::Trivial, 2).unwrap();
        let initial = algo.solution().len() as NumNodes;

        let result = algo
            .anneal(&quick_config().with_time_limit(Duration::ZERO))
            .unwrap();

        assert_eq!(result, AnnealingResult::Dominating { size: initial });
        assert_eq!(algo.state(), AnnealingState::TimeExpired);
        assert_eq!(algo.stats().steps, 0);
        assert_eq!(algo.stats().trials, 0);
    }

    #[test]
    fn expires_within_one_step_of_budget() {
        let mut rng = Pcg64Mcg::seed_from_u64(6);
        let n = 3000;
        let graph = AdjArray::random_gnp(&mut rng, n, 4.0 / n as f64);
        let mut algo = DsAnnealing::with_seed(&graph, Construction::Ln, 6).unwrap();

        let step_timer = Instant::now();
        algo.execute_step();
        let step = step_timer.elapsed();

        // the floor is out of reach within the budget
        let budget = Duration::from_millis(200);
        let config = AnnealingConfig::default()
            .with_schedule(CoolingSchedule::Exponential)
            .with_cooling_rate(0.999_999)
            .with_min_temperature(1e-9)
            .with_time_limit(budget);

        let result = algo.anneal(&config).unwrap();

        assert_eq!(algo.state(), AnnealingState::TimeExpired);
        assert!(result.is_dominating());
        assert!(algo.solution().is_valid(&graph));
        assert!(algo.stats().steps > 1);

        // one step of slack, plus some for scheduling noise
        let elapsed = algo.stats().elapsed_seconds;
        assert!(elapsed >= budget.as_secs_f64());
        assert!(
            elapsed <= (budget + 2 * step + Duration::from_millis(25)).as_secs_f64(),
            "elapsed {elapsed}s, step {step:?}"
        );
    }

    #[test]
    fn stops_at_temperature_floor() {
        let graph = AdjArray::path(10);
        let mut algo = DsAnnealing::with_seed(&graph, Construction::Ln, 3).unwrap();
        assert_eq!(algo.temperature(), 0.1);

        let config = quick_config().with_min_temperature(0.05);
        let result = algo.anneal(&config).unwrap();

        assert!(result.is_dominating());
        assert_eq!(algo.state(), AnnealingState::TemperatureFloorReached);
        assert!(algo.state().is_terminal());
        assert_eq!(algo.stats().steps, 1);
        assert_eq!(algo.stats().trials, TRIALS_PER_STEP as u64);
        assert!(algo.temperature() <= 0.05);
    }

    #[test]
    fn cycle_of_four() {
        let graph = AdjArray::cycle(4);
        let mut algo = DsAnnealing::with_seed(&graph, Construction::Ln, 42).unwrap();
        assert_eq!(algo.solution().len(), 2);

        let config = AnnealingConfig::default()
            .with_schedule(CoolingSchedule::Polynomial)
            .with_min_temperature(0.001)
            .with_time_limit(Duration::from_secs(5));

        let result = algo.anneal(&config).unwrap();
        assert_eq!(result, AnnealingResult::Dominating { size: 2 });
        assert_eq!(result.to_string(), "2");
        assert!(algo.solution().is_valid(&graph));
    }

    #[test]
    fn run_to_completion_uses_default_floor() {
        let graph = AdjArray::cycle(6);
        let mut algo = DsAnnealing::with_seed(&graph, Construction::Trivial, 5).unwrap();

        let solution = algo.run_to_completion().unwrap();
        assert!(solution.is_valid(&graph));
        assert!(algo.temperature() <= AnnealingConfig::default().min_temperature);
    }

    #[test]
    fn all_constructions_and_schedules_stay_feasible() {
        let mut rng = Pcg64Mcg::seed_from_u64(4);
        for (i, graph) in random_graphs(&mut rng, 1..40, 3.0).take(30).enumerate() {
            for construction in Construction::ALL {
                for schedule in [
                    CoolingSchedule::Exponential,
                    CoolingSchedule::Polynomial,
                    CoolingSchedule::Step,
                ] {
                    let mut algo =
                        DsAnnealing::with_seed(&graph, construction, i as u64).unwrap();
                    let initial = algo.solution().len();

                    let config = quick_config().with_schedule(schedule).with_min_temperature(0.02);
                    let result = algo.anneal(&config).unwrap();

                    assert!(result.is_dominating(), "{graph:?}");
                    assert!(algo.solution().is_valid(&graph));
                    assert_eq!(algo.stats().initial_size, initial);
                    assert_eq!(result.size(), Some(algo.solution().len() as NumNodes));
                }
            }
        }
    }

    #[test]
    fn initial_nodes_are_checked() {
        let graph = AdjArray::star(5);

        assert_eq!(
            DsAnnealing::with_initial_nodes(&graph, [7], 0.1, Some(1)).err(),
            Some(EngineError::InvalidNode {
                node: 7,
                number_of_nodes: 5
            })
        );

        assert_eq!(
            DsAnnealing::with_initial_nodes(&graph, [1, 2], 0.1, Some(1)).err(),
            Some(EngineError::InfeasibleConstruction {
                strategy: "provided".into(),
                witness: 3
            })
        );

        assert!(matches!(
            DsAnnealing::with_initial_nodes(&graph, [0], 0.0, Some(1)).err(),
            Some(EngineError::InvalidConfig(_))
        ));

        let mut algo = DsAnnealing::with_initial_nodes(&graph, 0..5, 0.5, Some(1)).unwrap();
        assert_eq!(algo.construction(), None);
        let result = algo.anneal(&quick_config()).unwrap();
        assert!(result.is_dominating());
        assert!(result.size().unwrap() <= 5);
    }

    #[test]
    fn not_dominating_is_rendered_as_sentinel() {
        assert_eq!(AnnealingResult::NotDominating.to_string(), "-1");
        assert_eq!(AnnealingResult::NotDominating.size(), None);
        assert!(!AnnealingResult::NotDominating.is_dominating());
    }
}
