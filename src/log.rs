//! Logger setup shared by all binaries. The library itself only talks to the `log` facade.

use std::io::Write;

use env_logger::{Builder, Env};
use log::LevelFilter;

/// Installs a logger that prints `[LEVEL elapsed] message` to stderr at the given level.
/// Values in `RUST_LOG` still take precedence. Calling it more than once is harmless.
pub fn build_pace_logger_for_level(level: LevelFilter) {
    let start = std::time::Instant::now();
    let _ = Builder::new()
        .filter_level(level)
        .parse_env(Env::default())
        .format(move |buf, record| {
            writeln!(
                buf,
                "[{:<5} {:>8.3}s] {}",
                record.level(),
                start.elapsed().as_secs_f64(),
                record.args()
            )
        })
        .try_init();
}

/// Shifts `base` by `verbosity` levels (as given by repeated `-v` flags) and installs the logger.
pub fn build_pace_logger_for_verbosity(base: LevelFilter, verbosity: usize) {
    build_pace_logger_for_level(level_for_verbosity(base, verbosity));
}

fn level_for_verbosity(base: LevelFilter, verbosity: usize) -> LevelFilter {
    const LEVELS: [LevelFilter; 6] = [
        LevelFilter::Off,
        LevelFilter::Error,
        LevelFilter::Warn,
        LevelFilter::Info,
        LevelFilter::Debug,
        LevelFilter::Trace,
    ];

    let base_idx = LEVELS.iter().position(|&l| l == base).unwrap_or(2);
    LEVELS[(base_idx + verbosity).min(LEVELS.len() - 1)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_shifts_level() {
        assert_eq!(level_for_verbosity(LevelFilter::Warn, 0), LevelFilter::Warn);
        assert_eq!(level_for_verbosity(LevelFilter::Warn, 1), LevelFilter::Info);
        assert_eq!(level_for_verbosity(LevelFilter::Warn, 2), LevelFilter::Debug);
        assert_eq!(level_for_verbosity(LevelFilter::Warn, 9), LevelFilter::Trace);
    }
}
