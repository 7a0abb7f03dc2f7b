pub mod instances;
pub mod pace_reader;

pub use instances::{Instance, ResultLine, heuristic_instances};
pub use pace_reader::{GraphPaceReader, PaceReader};
