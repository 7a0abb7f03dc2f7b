//! Our search algorithms are implemented using the [`IterativeAlgorithm`] trait.
//!
//! The idea is to allow co-operative scheduling, i.e. an algorithm does some work (say a few
//! milliseconds) and then breaks to yield to its caller. The caller decides, between two steps,
//! whether to continue (time budget, termination signal, ...).

use crate::utils::signal_handling;
use std::time::{Duration, Instant};

/// [`IterativeAlgorithm`] provides a consistent interface to execute all our algorithms. Observe
/// that it does not prescribe any constructor which is left to the algorithm designer as each
/// algorithm has specific parameters et cetera.
///
/// As an adopter of [`IterativeAlgorithm`], you have to implement at least the methods
///   [`IterativeAlgorithm::execute_step`],
///   [`IterativeAlgorithm::is_completed`] and [`IterativeAlgorithm::best_known_solution`].
///
/// # Example
/// ```
/// use dsanneal::algorithm::IterativeAlgorithm;
/// struct Countdown {
///    remaining: u32,
/// }
///
/// impl IterativeAlgorithm<u32> for Countdown {
///     fn execute_step(&mut self) {
///         self.remaining -= 1;
///     }
///
///     fn is_completed(&self) -> bool {
///         self.remaining == 0
///     }
///
///     fn best_known_solution(&mut self) -> Option<u32> {
///         Some(self.remaining)
///     }
/// }
///
/// let mut algo = Countdown { remaining: 10 };
/// algo.run_while(|a| a.remaining > 3);
/// assert_eq!(algo.remaining, 3);
/// ```
pub trait IterativeAlgorithm<Result> {
    /// Advances the computation of this algorithm. The execution should take between on the order of
    /// several milliseconds and not significantly exceed a second for expected inputs.
    fn execute_step(&mut self);

    /// Returns true iff the algorithm is completed and [`IterativeAlgorithm::execute_step`] may not
    /// be called again.
    fn is_completed(&self) -> bool;

    /// Returns the currently best known solution or None if no solution is known yet.
    fn best_known_solution(&mut self) -> Option<Result>;

    /// Keeps calling [`IterativeAlgorithm::execute_step`] as long as `predicate` holds, no
    /// termination signal was received, and [`IterativeAlgorithm::is_completed`] is false.
    /// All three are evaluated *before* each step (in this order), so no step is carried out if
    /// the predicate is false from the start.
    fn run_while<F: FnMut(&mut Self) -> bool>(&mut self, mut predicate: F) {
        while predicate(self) && !self.is_completed() && !signal_handling::received_ctrl_c() {
            self.execute_step();
        }
    }

    /// Execute the algorithm and keeps calling [`IterativeAlgorithm::execute_step`] until either a
    /// timeout occurred, a termination signal was received, or [`IterativeAlgorithm::is_completed`]
    /// is true. Observe that the timeout is guaranteed only in the sense that
    /// [`IterativeAlgorithm::execute_step`] is not called again after the timeout; if the function
    /// should take too long (or not return at all) the timeout will be violated.
    fn run_until_timeout(&mut self, timeout: Duration) {
        let start = Instant::now();
        self.run_while(|_| start.elapsed() < timeout);
    }
}

/// [`TerminatingIterativeAlgorithm`] is a marker trait, i.e. to adopt it, you give an empty `impl`
/// block. Add this trait to algorithms that will eventually terminate (i.e. in contrast to an
/// algorithm does not know when to stop).
pub trait TerminatingIterativeAlgorithm<Result>: IterativeAlgorithm<Result> {
    /// Execute the algorithm until it completed (or the termination signal was received) and
    /// return the solution if it was found.
    fn run_to_completion(&mut self) -> Option<Result> {
        while !self.is_completed() && !signal_handling::received_ctrl_c() {
            self.execute_step();
        }
        self.best_known_solution()
    }
}
