#[cfg(test)]
#[path = "../../tests/unit/termination/max_iteration_test.rs"]
mod max_iteration_test;

use super::*;

/// A termination criteria which is in terminated state when the maximum amount of
/// iterations is reached.
pub struct MaxIteration {
    limit: usize,
}

impl MaxIteration {
    /// Creates a new instance of `MaxIteration`.
    pub fn new(limit: usize) -> Self {
        Self { limit }
    }
}

impl Termination for MaxIteration {
    fn is_termination(&self, state: &RunState) -> bool {
        state.iterations >= self.limit
    }

    fn estimate(&self, state: &RunState) -> Float {
        (state.iterations as Float / self.limit as Float).min(1.)
    }
}
