use std::{path::Path, time::Duration};

use dsanneal::prelude::*;
use log::info;
use structopt::StructOpt;

/// Options shared by all annealing executables
#[derive(Debug, StructOpt)]
pub struct EngineOpts {
    /// Construction of the starting set: ln, two-approx, greedy, trivial, lp-rounding
    #[structopt(short = "c", long = "construction", default_value = "ln")]
    pub construction: Construction,

    /// Cooling schedule: exp, poly, step
    #[structopt(short = "s", long = "schedule", default_value = "poly")]
    pub schedule: CoolingSchedule,

    #[structopt(long = "min-temperature", default_value = "0.001")]
    pub min_temperature: f64,

    /// Factor of the exponential and step schedules
    #[structopt(long = "cooling-rate", default_value = "0.95")]
    pub cooling_rate: f64,

    /// Wall-clock budget of the annealing phase in seconds
    #[structopt(short = "T", long = "time-limit", default_value = "120")]
    pub time_limit: f64,

    /// Seed of the random generator; drawn from the OS if omitted
    #[structopt(long = "seed")]
    pub seed: Option<u64>,

    /// Pruning of the greedy and trivial constructions: single-pass, fixpoint
    #[structopt(long = "prune-mode", default_value = "fixpoint")]
    pub prune_mode: PruneMode,

    /// Solve the LP relaxation and report its lower bound next to the result
    #[structopt(long = "lower-bound")]
    pub lower_bound: bool,

    /// Increase log verbosity (-v, -vv)
    #[structopt(short = "v", parse(from_occurrences))]
    pub verbose: usize,
}

impl EngineOpts {
    pub fn annealing_config(&self) -> anyhow::Result<AnnealingConfig> {
        anyhow::ensure!(
            self.time_limit.is_finite() && self.time_limit >= 0.0,
            "time limit must be a non-negative number of seconds"
        );

        let config = AnnealingConfig::default()
            .with_schedule(self.schedule)
            .with_min_temperature(self.min_temperature)
            .with_cooling_rate(self.cooling_rate)
            .with_time_limit(Duration::from_secs_f64(self.time_limit));
        config.validate()?;

        Ok(config)
    }

    pub fn construction_options(&self) -> ConstructionOptions {
        ConstructionOptions::default().with_prune_mode(self.prune_mode)
    }
}

/// Reads the graph from `path` or from stdin
pub fn load_graph(path: Option<&Path>) -> anyhow::Result<AdjArray> {
    if let Some(path) = path {
        Ok(AdjArray::try_read_pace_file(path)?)
    } else {
        let stdin = std::io::stdin().lock();
        Ok(AdjArray::try_read_pace(stdin)?)
    }
}

pub struct Solved<'a> {
    pub algo: DsAnnealing<'a, AdjArray>,
    pub result: AnnealingResult,
    /// Only known if the LP relaxation was solved
    pub lower_bound: Option<NumNodes>,
}

/// Builds the starting set of `graph` and anneals it. The LP relaxation is solved at most once,
/// if either the lower bound or the LP rounding construction asks for it.
pub fn solve<'a>(
    graph: &'a AdjArray,
    opts: &EngineOpts,
    config: &AnnealingConfig,
) -> anyhow::Result<Solved<'a>> {
    let mut options = opts.construction_options();
    let mut lower_bound = None;

    if opts.lower_bound || opts.construction == Construction::LpRounding {
        let relaxation = LpRelaxation::solve(graph)?;
        if opts.lower_bound {
            lower_bound = Some(relaxation.lower_bound());
            info!("LP lower bound: {}", relaxation.lower_bound());
        }
        options = options.with_relaxation(relaxation);
    }

    let mut algo = DsAnnealing::with_options(graph, opts.construction, &options, opts.seed)?;
    let result = algo.anneal(config)?;

    Ok(Solved {
        algo,
        result,
        lower_bound,
    })
}
