use std::{
    fs::File,
    io::{BufWriter, Write},
    path::PathBuf,
};

use dsanneal::{log::build_pace_logger_for_verbosity, prelude::*, utils::signal_handling};
use log::{LevelFilter, info};
use serde::Serialize;
use structopt::StructOpt;

mod common;
use common::{EngineOpts, Solved, load_graph, solve};

#[derive(Debug, StructOpt)]
#[structopt(about = "Approximates a minimum dominating set by simulated annealing")]
struct Opts {
    /// Input graph in PACE format; read from stdin if omitted
    #[structopt(short = "i", parse(from_os_str))]
    input: Option<PathBuf>,

    /// Solution file; written to stdout if omitted
    #[structopt(short = "o", long = "output", parse(from_os_str))]
    output: Option<PathBuf>,

    /// Write a JSON summary of the run to this file
    #[structopt(long = "report", parse(from_os_str))]
    report: Option<PathBuf>,

    #[structopt(flatten)]
    engine: EngineOpts,
}

#[derive(Serialize)]
struct Report<'a> {
    input: Option<&'a PathBuf>,
    number_of_nodes: NumNodes,
    number_of_edges: NumEdges,
    construction: Construction,
    schedule: CoolingSchedule,
    prune_mode: PruneMode,
    seed: Option<u64>,
    result: Option<NumNodes>,
    lower_bound: Option<NumNodes>,
    stats: &'a AnnealingStats,
}

fn main() -> anyhow::Result<()> {
    let opts = Opts::from_args();
    build_pace_logger_for_verbosity(LevelFilter::Warn, opts.engine.verbose);
    signal_handling::initialize();

    let config = opts.engine.annealing_config()?;
    let graph = load_graph(opts.input.as_deref())?;
    info!(
        "Graph loaded: n = {}, m = {}",
        graph.number_of_nodes(),
        graph.number_of_edges()
    );

    let Solved {
        algo,
        result,
        lower_bound,
    } = solve(&graph, &opts.engine, &config)?;

    if let Some(path) = &opts.report {
        let report = Report {
            input: opts.input.as_ref(),
            number_of_nodes: graph.number_of_nodes(),
            number_of_edges: graph.number_of_edges(),
            construction: opts.engine.construction,
            schedule: opts.engine.schedule,
            prune_mode: opts.engine.prune_mode,
            seed: opts.engine.seed,
            result: result.size(),
            lower_bound,
            stats: algo.stats(),
        };
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, &report)?;
    }

    anyhow::ensure!(
        result.is_dominating(),
        "annealing ended with a set that is not dominating"
    );

    let solution = algo.into_solution();
    match &opts.output {
        Some(path) => {
            let mut writer = BufWriter::new(File::create(path)?);
            solution.write(&mut writer)?;
            writer.flush()?;
        }
        None => solution.write(std::io::stdout().lock())?,
    }

    Ok(())
}
