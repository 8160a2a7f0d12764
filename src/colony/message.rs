//! Message types of the colony protocol. Every message which participates in the
//! iteration lifecycle carries the id of the iteration it belongs to, so receivers can
//! reject stale traffic instead of relying on transport ordering.

use crate::models::{LocationId, Tour};
use crate::prelude::SolverResult;
use crate::utils::Float;
use std::fmt;
use tokio::sync::oneshot;

/// Identifies one iteration of the colony. Monotonically increasing, starting at zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IterationId(pub u64);

impl IterationId {
    /// Returns the id of the following iteration.
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for IterationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifies one ant worker within the colony.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WorkerId(pub u32);

impl fmt::Display for WorkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Correlates a pheromone query with its response. Unique per requesting worker.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct QueryId(pub u64);

/// A response to a pheromone query, echoing the correlation id of the request.
#[derive(Clone, Copy, Debug)]
pub struct PheromoneReply {
    /// The correlation id of the query being answered.
    pub query: QueryId,
    /// The pheromone level of the requested edge.
    pub value: Float,
}

/// The outcome of a tour submission.
#[derive(Clone, Debug)]
pub enum DepositOutcome {
    /// The tour was recorded for the currently open iteration.
    Accepted,
    /// The submission referenced an iteration which is no longer open and was
    /// discarded. Expected under normal asynchronous completion, not an error.
    Stale {
        /// The iteration which is actually open.
        current: IterationId,
    },
}

/// A summary of a closed iteration, returned by the advance operation.
#[derive(Clone, Debug)]
pub struct IterationSummary {
    /// The iteration which was closed.
    pub closed: IterationId,
    /// Number of tours which contributed to the pheromone update.
    pub tours_used: usize,
    /// The best reward observed so far across all iterations, if any tour was feasible.
    pub best_reward: Option<Float>,
    /// True when the closed iteration improved the global best.
    pub improved: bool,
}

/// A completion signal sent by a worker to the coordinator, exactly once per
/// iteration the worker participated in, regardless of its deposit outcome.
#[derive(Clone, Copy, Debug)]
pub struct WorkerComplete {
    /// The iteration the worker has finished.
    pub iteration: IterationId,
    /// The reporting worker.
    pub worker: WorkerId,
}

/// A command from the coordinator to a worker.
#[derive(Clone, Copy, Debug)]
pub enum WorkerCommand {
    /// Start constructing a tour for the given iteration.
    StartIteration(IterationId),
}

/// A request processed by the pheromone store. All variants are answered through the
/// attached oneshot channel; the store handles one request at a time, which gives a
/// total order over all queries, deposits and advances.
pub(crate) enum StoreRequest {
    Query {
        query: QueryId,
        iteration: IterationId,
        from: LocationId,
        to: LocationId,
        respond_to: oneshot::Sender<SolverResult<PheromoneReply>>,
    },
    Deposit {
        iteration: IterationId,
        worker: WorkerId,
        tour: Tour,
        respond_to: oneshot::Sender<DepositOutcome>,
    },
    Advance {
        iteration: IterationId,
        respond_to: oneshot::Sender<SolverResult<IterationSummary>>,
    },
    BestTour {
        respond_to: oneshot::Sender<Option<Tour>>,
    },
    Snapshot {
        respond_to: oneshot::Sender<crate::colony::PheromoneSnapshot>,
    },
}
