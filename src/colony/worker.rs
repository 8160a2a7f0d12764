#[cfg(test)]
#[path = "../../tests/unit/colony/worker_test.rs"]
mod worker_test;

use crate::colony::message::{DepositOutcome, IterationId, QueryId, WorkerCommand, WorkerComplete, WorkerId};
use crate::colony::pheromone::PheromoneHandle;
use crate::construction::{desirability, feasible_candidates, heuristic_factor, select_candidate};
use crate::models::{LocationId, Problem, Tour, advance_schedule};
use crate::prelude::{SolverError, SolverResult};
use crate::solver::ColonyConfig;
use crate::utils::{Float, InfoLogger, Random};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::time::timeout;

/// Neutral pheromone guidance used when the store does not answer a query in time or
/// answers it with an error. A silent store degrades guidance, never progress.
pub const FALLBACK_PHEROMONE: Float = 1.0;

const CHANNEL_BUFFER: usize = 4;

/// The actor constructing one tour per iteration. It owns its own random source, so a
/// seeded colony stays reproducible per worker regardless of task interleaving.
struct AntWorker {
    id: WorkerId,
    problem: Arc<Problem>,
    config: Arc<ColonyConfig>,
    store: PheromoneHandle,
    random: Arc<dyn Random + Send + Sync>,
    logger: InfoLogger,
    receiver: mpsc::Receiver<WorkerCommand>,
    completions: mpsc::Sender<WorkerComplete>,
    query_sequence: u64,
}

impl AntWorker {
    async fn run(mut self) {
        while let Some(WorkerCommand::StartIteration(mut iteration)) = self.receiver.recv().await {
            // a lagging worker jumps to the newest queued start: every skipped
            // iteration is already closed and would only produce stale deposits
            while let Ok(WorkerCommand::StartIteration(newer)) = self.receiver.try_recv() {
                iteration = newer;
            }

            match self.construct_tour(iteration).await {
                Ok(tour) => self.deposit_tour(iteration, tour).await,
                Err(err) => {
                    (self.logger)(&format!("worker {}: tour construction failed: {err}", self.id));
                }
            }

            // the completion signal is decoupled from the deposit outcome: the barrier
            // counts participation, not successful deposits
            let complete = WorkerComplete { iteration, worker: self.id };
            if self.completions.send(complete).await.is_err() {
                break;
            }
        }
    }

    /// Builds one tour: repeatedly filters the feasible candidates, weighs them by
    /// pheromone and heuristic guidance, and samples the next move, until no feasible
    /// move remains. The finished visit sequence is then replayed into a [`Tour`].
    async fn construct_tour(&mut self, iteration: IterationId) -> SolverResult<Tour> {
        let problem = self.problem.clone();
        let depot = problem.depot();

        let mut visited = vec![false; problem.size()];
        visited[depot] = true;

        let mut position = depot;
        let mut departure = problem.start_time();
        let mut visits = Vec::new();

        loop {
            let candidates = feasible_candidates(&problem, position, departure, &visited);
            if candidates.is_empty() {
                break;
            }

            let from = problem.location(position).id;
            let mut weights = Vec::with_capacity(candidates.len());
            for candidate in candidates.iter() {
                let to = problem.location(candidate.index).id;
                let pheromone = self.fetch_pheromone(iteration, from, to).await;
                let heuristic = heuristic_factor(&problem, candidate);

                weights.push(desirability(pheromone, heuristic, self.config.alpha, self.config.beta));
            }

            let Some(choice) = select_candidate(&candidates, &weights, self.random.as_ref()) else {
                break;
            };

            let location = problem.location(choice.index);
            let (_, next_departure) =
                advance_schedule(departure, choice.travel, &location.window, location.visit_duration);

            visits.push(location.id);
            visited[choice.index] = true;
            position = choice.index;
            departure = next_departure;
        }

        Tour::evaluate(&problem, &visits)
    }

    /// Queries one edge's pheromone level, falling back to [`FALLBACK_PHEROMONE`] on
    /// timeout, error, or a response with a foreign correlation id.
    async fn fetch_pheromone(&mut self, iteration: IterationId, from: LocationId, to: LocationId) -> Float {
        self.query_sequence += 1;
        let query = QueryId(self.query_sequence);

        match timeout(self.config.query_timeout, self.store.query(query, iteration, from, to)).await {
            Ok(Ok(reply)) if reply.query == query => reply.value,
            Ok(Ok(_)) => {
                (self.logger)(&format!(
                    "worker {}: dropped pheromone response with foreign correlation id, using fallback",
                    self.id
                ));
                FALLBACK_PHEROMONE
            }
            Ok(Err(err)) => {
                (self.logger)(&format!("worker {}: pheromone query failed: {err}, using fallback", self.id));
                FALLBACK_PHEROMONE
            }
            Err(_) => {
                (self.logger)(&format!("worker {}: pheromone query timed out, using fallback", self.id));
                FALLBACK_PHEROMONE
            }
        }
    }

    /// Submits the tour, retrying a bounded number of times on timeout. Retries are
    /// safe: the store keys deposits by worker, so a duplicate replaces, never appends.
    async fn deposit_tour(&self, iteration: IterationId, tour: Tour) {
        let attempts = self.config.deposit_retries + 1;

        for attempt in 1..=attempts {
            match timeout(self.config.deposit_timeout, self.store.submit(iteration, self.id, tour.clone())).await {
                Ok(Ok(DepositOutcome::Accepted)) => return,
                Ok(Ok(DepositOutcome::Stale { current })) => {
                    (self.logger)(&format!(
                        "worker {}: deposit for iteration {iteration} arrived late, store is at {current}",
                        self.id
                    ));
                    return;
                }
                Ok(Err(err)) => {
                    (self.logger)(&format!("worker {}: deposit failed: {err}", self.id));
                    return;
                }
                Err(_) if attempt < attempts => continue,
                Err(_) => {
                    (self.logger)(&format!(
                        "worker {}: deposit timed out {attempts} times, tour for iteration {iteration} dropped",
                        self.id
                    ));
                }
            }
        }
    }
}

/// A handle to a spawned ant worker.
pub(crate) struct WorkerHandle {
    id: WorkerId,
    sender: mpsc::Sender<WorkerCommand>,
}

impl WorkerHandle {
    /// Spawns an ant worker actor and returns a handle to it.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: WorkerId,
        problem: Arc<Problem>,
        config: Arc<ColonyConfig>,
        store: PheromoneHandle,
        random: Arc<dyn Random + Send + Sync>,
        logger: InfoLogger,
        completions: mpsc::Sender<WorkerComplete>,
    ) -> Self {
        let (sender, receiver) = mpsc::channel(CHANNEL_BUFFER);
        let actor =
            AntWorker { id, problem, config, store, random, logger, receiver, completions, query_sequence: 0 };
        tokio::spawn(actor.run());

        Self { id, sender }
    }

    /// Returns the id of the worker behind this handle.
    pub fn id(&self) -> WorkerId {
        self.id
    }

    /// Tells the worker to construct a tour for the given iteration.
    pub async fn start_iteration(&self, iteration: IterationId) -> SolverResult<()> {
        self.sender
            .send(WorkerCommand::StartIteration(iteration))
            .await
            .map_err(|_| SolverError::ChannelClosed("ant worker"))
    }
}
