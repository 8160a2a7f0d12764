use super::*;
use crate::utils::Timer;

/// A termination criteria which is in terminated state when the wall clock limit has
/// elapsed. The clock starts at construction time.
pub struct MaxTime {
    start: Timer,
    limit_in_secs: Float,
}

impl MaxTime {
    /// Creates a new instance of `MaxTime` with the limit in seconds.
    pub fn new(limit_in_secs: Float) -> Self {
        Self { start: Timer::start(), limit_in_secs }
    }
}

impl Termination for MaxTime {
    fn is_termination(&self, _: &RunState) -> bool {
        self.start.elapsed_secs_as_float() > self.limit_in_secs
    }

    fn estimate(&self, _: &RunState) -> Float {
        (self.start.elapsed_secs_as_float() / self.limit_in_secs).min(1.)
    }
}
