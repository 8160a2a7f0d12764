#[cfg(test)]
#[path = "../../tests/unit/colony/coordinator_test.rs"]
mod coordinator_test;

use crate::colony::message::{IterationId, WorkerComplete};
use crate::colony::pheromone::{PheromoneHandle, PheromoneSnapshot};
use crate::colony::worker::WorkerHandle;
use crate::models::Tour;
use crate::prelude::{SolverError, SolverResult};
use crate::solver::{ColonyConfig, Telemetry};
use crate::termination::{RunState, Termination};
use crate::utils::Environment;
use rustc_hash::FxHashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{Instant, timeout_at};

/// How many consecutive iterations may end on the barrier safety timeout before the run
/// is considered desynchronized and aborted. A single degraded iteration is a crash
/// recovery path; a streak of them indicates a systemic protocol failure.
pub(crate) const MAX_CONSECUTIVE_DEGRADED: usize = 5;

/// The outcome of one pass over the completion barrier.
pub(crate) struct BarrierOutcome {
    /// How many distinct workers reported completion for the awaited iteration.
    pub completed: usize,
    /// True when the safety timeout elapsed before all expected workers reported.
    pub degraded: bool,
}

/// Collects completion signals for the given iteration until the expected number of
/// distinct workers has reported or the safety timeout elapses. Signals tagged with a
/// foreign iteration id are discarded, duplicates from the same worker count once.
pub(crate) async fn await_completions(
    receiver: &mut mpsc::Receiver<WorkerComplete>,
    iteration: IterationId,
    expected: usize,
    limit: Duration,
) -> SolverResult<BarrierOutcome> {
    let deadline = Instant::now() + limit;
    let mut completed = FxHashSet::default();

    while completed.len() < expected {
        match timeout_at(deadline, receiver.recv()).await {
            Ok(Some(signal)) if signal.iteration == iteration => {
                completed.insert(signal.worker);
            }
            // a stale signal answers an already closed iteration
            Ok(Some(_)) => {}
            Ok(None) => return Err(SolverError::ChannelClosed("worker completions")),
            Err(_) => return Ok(BarrierOutcome { completed: completed.len(), degraded: true }),
        }
    }

    Ok(BarrierOutcome { completed: completed.len(), degraded: false })
}

/// The actor driving the iteration loop. It owns no search state: per iteration it
/// broadcasts the start, waits on the completion barrier, asks the store to advance, and
/// decides whether to continue. All search state lives behind the store handle.
pub(crate) struct IterationCoordinator {
    workers: Vec<WorkerHandle>,
    store: PheromoneHandle,
    completions: mpsc::Receiver<WorkerComplete>,
    config: Arc<ColonyConfig>,
    environment: Arc<Environment>,
}

impl IterationCoordinator {
    /// Creates a new instance of `IterationCoordinator` over already spawned actors.
    pub fn new(
        workers: Vec<WorkerHandle>,
        store: PheromoneHandle,
        completions: mpsc::Receiver<WorkerComplete>,
        config: Arc<ColonyConfig>,
        environment: Arc<Environment>,
    ) -> Self {
        Self { workers, store, completions, config, environment }
    }

    /// Runs iterations until the termination criteria or the environment quota fire,
    /// then returns the best tour found and a snapshot of the final pheromone matrix.
    pub async fn run(
        mut self,
        termination: Box<dyn Termination + Send + Sync>,
        telemetry: &mut Telemetry,
    ) -> SolverResult<(Option<Tour>, PheromoneSnapshot)> {
        let expected = self.workers.len();
        let mut state = RunState::default();
        let mut iteration = IterationId::default();
        let mut consecutive_degraded = 0;

        loop {
            let is_quota_reached = self.environment.quota.as_ref().is_some_and(|quota| quota.is_reached());
            if is_quota_reached || termination.is_termination(&state) {
                break;
            }

            for worker in self.workers.iter() {
                worker.start_iteration(iteration).await?;
            }

            let barrier =
                await_completions(&mut self.completions, iteration, expected, self.config.barrier_timeout).await?;
            if barrier.degraded {
                consecutive_degraded += 1;
                telemetry.log(&format!(
                    "iteration {iteration}: barrier timed out with {} of {expected} workers, proceeding degraded",
                    barrier.completed
                ));
                if consecutive_degraded >= MAX_CONSECUTIVE_DEGRADED {
                    return Err(SolverError::Desynchronized(consecutive_degraded));
                }
            } else {
                consecutive_degraded = 0;
            }

            // no deposit for this id is accepted once this returns: the store has opened
            // the next iteration and rejects the old id as stale
            let summary = self.store.advance(iteration).await?;

            telemetry.on_iteration(&summary, barrier.degraded);
            state.on_iteration(&summary);
            iteration = iteration.next();
        }

        let best = self.store.best_tour().await?;
        let snapshot = self.store.snapshot().await?;

        Ok((best, snapshot))
    }
}
