//! A solver error taxonomy.
//!
//! Only conditions which are fatal for a run live here. Expected protocol outcomes,
//! such as a deposit arriving for an already closed iteration, are modeled as normal
//! return values at their call sites and never reach this type.

use crate::colony::IterationId;
use crate::models::LocationId;
use thiserror::Error;

/// The top-level error type of the crate.
#[derive(Debug, Error)]
pub enum SolverError {
    /// A location id outside the problem's location set was used. This is a
    /// programming or configuration error, never a transient condition.
    #[error("unknown location: {0}")]
    UnknownLocation(LocationId),

    /// A dense matrix index outside the location set was used.
    #[error("unknown location index: {0}")]
    UnknownIndex(usize),

    /// An iteration advance was requested for an id which is not the currently open one.
    /// Indicates a coordinator/store desynchronization bug.
    #[error("iteration {requested} is not open, current is {current}")]
    IterationNotOpen {
        /// The iteration the advance was requested for.
        requested: IterationId,
        /// The iteration which is actually open.
        current: IterationId,
    },

    /// Too many consecutive iterations ended on the completion barrier safety timeout.
    #[error("colony desynchronized: {0} consecutive iterations ended degraded")]
    Desynchronized(usize),

    /// An actor terminated while the run still needed it.
    #[error("{0} channel closed unexpectedly")]
    ChannelClosed(&'static str),

    /// The configuration failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The input data failed validation or parsing.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An I/O failure while reading input data.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type used across the crate.
pub type SolverResult<T> = Result<T, SolverError>;
