#[cfg(test)]
#[path = "../../tests/unit/termination/stagnation_test.rs"]
mod stagnation_test;

use super::*;

/// A termination criteria which is in terminated state when the best reward has not
/// improved for a configured amount of consecutive iterations.
pub struct Stagnation {
    limit: usize,
}

impl Stagnation {
    /// Creates a new instance of `Stagnation`.
    pub fn new(limit: usize) -> Self {
        Self { limit }
    }
}

impl Termination for Stagnation {
    fn is_termination(&self, state: &RunState) -> bool {
        state.iterations_since_improvement >= self.limit
    }

    fn estimate(&self, state: &RunState) -> Float {
        (state.iterations_since_improvement as Float / self.limit as Float).min(1.)
    }
}
