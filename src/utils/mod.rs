pub mod dominating_set;
pub mod radix;
pub mod signal_handling;

pub use dominating_set::*;
