//! Enumeration of benchmark directories and the result lines of the batch runner.

use std::{
    fmt,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use glob::{Pattern, glob};
use log::warn;

use crate::{graph::NumNodes, heuristic::AnnealingResult};

const INSTANCE_PREFIX: &str = "heuristic_";

/// A `heuristic_<index>.gr` file
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Instance {
    pub path: PathBuf,
    /// File stem, e.g. `heuristic_080`
    pub name: String,
    pub index: u64,
}

/// Returns all `heuristic_<index>.gr` files in `dir` with `index >= min_index`, sorted by the
/// numeric value of `index`. Files whose suffix is not a number are skipped with a warning.
pub fn heuristic_instances(dir: impl AsRef<Path>, min_index: u64) -> std::io::Result<Vec<Instance>> {
    let dir = dir.as_ref();
    let pattern = format!(
        "{}/{INSTANCE_PREFIX}*.gr",
        Pattern::escape(&dir.to_string_lossy())
    );

    let paths = glob(&pattern).map_err(|e| std::io::Error::new(ErrorKind::InvalidInput, e))?;

    let mut instances = Vec::new();
    for path in paths {
        let path = path.map_err(std::io::Error::from)?;

        let Some(name) = path.file_stem().map(|s| s.to_string_lossy().into_owned()) else {
            continue;
        };

        let Some(index) = name
            .strip_prefix(INSTANCE_PREFIX)
            .and_then(|suffix| suffix.parse::<u64>().ok())
        else {
            warn!("Skip {path:?}: no numeric index after `{INSTANCE_PREFIX}`");
            continue;
        };

        if index >= min_index {
            instances.push(Instance { path, name, index });
        }
    }

    instances.sort_by(|a, b| a.index.cmp(&b.index).then_with(|| a.name.cmp(&b.name)));
    Ok(instances)
}

/// One line of the batch result file: `<name> <size>`, `<name> -1` or `<name> ERROR`. If an
/// LP lower bound was computed, it follows the size, as in `<name> <size> <bound>`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResultLine {
    pub name: String,
    /// `None` if the instance could not be processed
    pub outcome: Option<AnnealingResult>,
    pub lower_bound: Option<NumNodes>,
}

impl ResultLine {
    pub fn solved(name: impl Into<String>, result: AnnealingResult) -> Self {
        Self {
            name: name.into(),
            outcome: Some(result),
            lower_bound: None,
        }
    }

    pub fn with_lower_bound(mut self, lower_bound: Option<NumNodes>) -> Self {
        self.lower_bound = lower_bound;
        self
    }

    pub fn failed(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            outcome: None,
            lower_bound: None,
        }
    }
}

impl fmt::Display for ResultLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.outcome, self.lower_bound) {
            (Some(result), Some(bound)) => write!(f, "{} {} {}", self.name, result, bound),
            (Some(result), None) => write!(f, "{} {}", self.name, result),
            (None, _) => write!(f, "{} ERROR", self.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::Itertools;
    use regex::Regex;
    use std::fs::File;

    fn create_files(dir: &Path, names: &[&str]) {
        for name in names {
            File::create(dir.join(name)).unwrap();
        }
    }

    #[test]
    fn numeric_order_and_lower_bound() {
        let dir = tempfile::tempdir().unwrap();
        create_files(
            dir.path(),
            &[
                "heuristic_10.gr",
                "heuristic_2.gr",
                "heuristic_080.gr",
                "heuristic_x.gr",
                "heuristic_5.txt",
                "exact_1.gr",
            ],
        );

        let all = heuristic_instances(dir.path(), 0).unwrap();
        assert_eq!(all.iter().map(|i| i.index).collect_vec(), [2, 10, 80]);
        assert_eq!(
            all.iter().map(|i| i.name.as_str()).collect_vec(),
            ["heuristic_2", "heuristic_10", "heuristic_080"]
        );
        assert!(all.iter().all(|i| i.path.starts_with(dir.path())));

        let from = heuristic_instances(dir.path(), 10).unwrap();
        assert_eq!(from.iter().map(|i| i.index).collect_vec(), [10, 80]);
    }

    #[test]
    fn empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(heuristic_instances(dir.path(), 0).unwrap().is_empty());
    }

    #[test]
    fn result_lines() {
        let line_format = Regex::new(r"^heuristic_\d+ (-1|\d+|ERROR)( \d+)?$").unwrap();

        let lines = [
            ResultLine::solved("heuristic_1", AnnealingResult::Dominating { size: 17 }),
            ResultLine::solved("heuristic_2", AnnealingResult::NotDominating),
            ResultLine::failed("heuristic_3"),
            ResultLine::solved("heuristic_4", AnnealingResult::Dominating { size: 9 })
                .with_lower_bound(Some(7)),
            ResultLine::failed("heuristic_5").with_lower_bound(Some(7)),
        ]
        .map(|l| l.to_string());

        assert_eq!(
            lines,
            [
                "heuristic_1 17",
                "heuristic_2 -1",
                "heuristic_3 ERROR",
                "heuristic_4 9 7",
                "heuristic_5 ERROR"
            ]
        );
        assert!(lines.iter().all(|l| line_format.is_match(l)));
    }
}
