#[cfg(test)]
#[path = "../../tests/unit/models/common_test.rs"]
mod common_test;

use crate::utils::{Float, compare_floats};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Specifies a timestamp in minutes since the start of the planning horizon.
pub type Timestamp = Float;

/// Specifies a cost value: the total elapsed time of a tour in minutes.
pub type Cost = Float;

/// A stable external identity of a location. Never used to address a matrix directly,
/// see [`crate::models::LocationIndex`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocationId(pub u64);

impl fmt::Display for LocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Represents a time window.
#[derive(Clone, Debug)]
pub struct TimeWindow {
    /// Earliest time at which a visit can start.
    pub start: Timestamp,
    /// Latest time at which an arrival is accepted.
    pub end: Timestamp,
}

impl TimeWindow {
    /// Creates a new instance of `TimeWindow`.
    pub fn new(start: Timestamp, end: Timestamp) -> Self {
        Self { start, end }
    }

    /// Returns unlimited time window.
    pub fn max() -> Self {
        Self { start: 0., end: Float::MAX }
    }
}

impl PartialEq<TimeWindow> for TimeWindow {
    fn eq(&self, other: &TimeWindow) -> bool {
        compare_floats(self.start, other.start) == Ordering::Equal
            && compare_floats(self.end, other.end) == Ordering::Equal
    }
}

impl Eq for TimeWindow {}
