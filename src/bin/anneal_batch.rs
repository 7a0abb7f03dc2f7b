use std::{
    fs::File,
    io::{BufWriter, Write},
    path::PathBuf,
};

use dsanneal::{log::build_pace_logger_for_verbosity, prelude::*, utils::signal_handling};
use log::{LevelFilter, error, info};
use structopt::StructOpt;

mod common;
use common::{EngineOpts, load_graph, solve};

#[derive(Debug, StructOpt)]
#[structopt(about = "Anneals every heuristic_<index>.gr instance of a directory")]
struct Opts {
    /// Directory containing the instances
    #[structopt(parse(from_os_str))]
    input_dir: PathBuf,

    /// One `<name> <size>` line per instance is written here (`<name> <size> <bound>` with
    /// --lower-bound)
    #[structopt(parse(from_os_str))]
    output_file: PathBuf,

    /// Skip instances with a smaller index
    #[structopt(long = "from", default_value = "0")]
    from: u64,

    #[structopt(flatten)]
    engine: EngineOpts,
}

fn main() -> anyhow::Result<()> {
    let opts = Opts::from_args();
    build_pace_logger_for_verbosity(LevelFilter::Warn, opts.engine.verbose);
    signal_handling::initialize();

    let config = opts.engine.annealing_config()?;
    let instances = heuristic_instances(&opts.input_dir, opts.from)?;
    info!("Found {} instances in {:?}", instances.len(), opts.input_dir);

    let mut out = BufWriter::new(File::create(&opts.output_file)?);

    for instance in instances {
        if signal_handling::received_ctrl_c() {
            info!("Termination requested; skip remaining instances");
            break;
        }

        let outcome = load_graph(Some(instance.path.as_path())).and_then(|graph| {
            solve(&graph, &opts.engine, &config).map(|solved| (solved.result, solved.lower_bound))
        });

        let line = match outcome {
            Ok((result, lower_bound)) => {
                ResultLine::solved(&instance.name, result).with_lower_bound(lower_bound)
            }
            Err(e) => {
                error!("Error processing {}: {e:#}", instance.name);
                ResultLine::failed(&instance.name)
            }
        };

        writeln!(out, "{line}")?;
        out.flush()?;
        println!("{line}");
    }

    println!("\nResults saved to: {}", opts.output_file.display());
    Ok(())
}
