//! The termination module contains the criteria which define when the coordinator
//! should stop driving iterations.

use crate::colony::IterationSummary;
use crate::utils::Float;

/// The observable progress of a run, updated by the coordinator after every closed
/// iteration and consumed by the termination criteria.
#[derive(Clone, Debug, Default)]
pub struct RunState {
    /// Amount of closed iterations.
    pub iterations: usize,
    /// The best reward known so far, if any tour was feasible.
    pub best_reward: Option<Float>,
    /// Amount of consecutive closed iterations without an improvement of the best reward.
    pub iterations_since_improvement: usize,
}

impl RunState {
    /// Folds the summary of a closed iteration into the state.
    pub fn on_iteration(&mut self, summary: &IterationSummary) {
        self.iterations += 1;
        self.best_reward = summary.best_reward;
        if summary.improved {
            self.iterations_since_improvement = 0;
        } else {
            self.iterations_since_improvement += 1;
        }
    }
}

/// A trait which specifies criteria when the colony should stop searching for an
/// improved solution.
pub trait Termination {
    /// Returns true if the termination condition is met.
    fn is_termination(&self, state: &RunState) -> bool;

    /// Returns a relative estimation till termination. Value is in the `[0, 1]` range.
    fn estimate(&self, state: &RunState) -> Float;
}

mod max_iteration;
pub use self::max_iteration::MaxIteration;

mod max_time;
pub use self::max_time::MaxTime;

mod stagnation;
pub use self::stagnation::Stagnation;

/// A termination criteria which encapsulates multiple other criteria and terminates
/// when any of them does.
pub struct CompositeTermination {
    terminations: Vec<Box<dyn Termination + Send + Sync>>,
}

impl CompositeTermination {
    /// Creates a new instance of `CompositeTermination`.
    pub fn new(terminations: Vec<Box<dyn Termination + Send + Sync>>) -> Self {
        Self { terminations }
    }
}

impl Termination for CompositeTermination {
    fn is_termination(&self, state: &RunState) -> bool {
        self.terminations.iter().any(|termination| termination.is_termination(state))
    }

    fn estimate(&self, state: &RunState) -> Float {
        self.terminations.iter().map(|termination| termination.estimate(state)).fold(0., Float::max)
    }
}
