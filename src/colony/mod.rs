//! This module contains the colony actors and the message protocol which connects them:
//! the pheromone store owning all shared search state, the ant workers constructing one
//! tour each per iteration, and the coordinator driving the iteration loop.

mod message;
pub use self::message::{
    DepositOutcome, IterationId, IterationSummary, PheromoneReply, QueryId, WorkerCommand, WorkerComplete, WorkerId,
};

mod pheromone;
pub use self::pheromone::{DepositPolicy, MIN_PHEROMONE, PheromoneMatrix, PheromoneSnapshot};
pub(crate) use self::pheromone::PheromoneHandle;

mod worker;
pub use self::worker::FALLBACK_PHEROMONE;
pub(crate) use self::worker::WorkerHandle;

mod coordinator;
pub(crate) use self::coordinator::IterationCoordinator;

use crate::models::Problem;
use crate::prelude::SolverResult;
use crate::solver::ColonyConfig;
use crate::utils::{DefaultRandom, Environment, Random};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Spawns the colony: the pheromone store and the configured number of ant workers, all
/// wired to a fresh coordinator. Must be called within a tokio runtime.
pub(crate) fn spawn(
    problem: Arc<Problem>,
    config: Arc<ColonyConfig>,
    environment: Arc<Environment>,
) -> SolverResult<IterationCoordinator> {
    let matrix = PheromoneMatrix::new(problem.index().clone(), config.initial_pheromone)?;
    let store = PheromoneHandle::new(matrix, config.clone());

    let (completion_sender, completion_receiver) = mpsc::channel(config.population_size.max(1));

    let workers = (0..config.population_size)
        .map(|number| {
            // each worker owns its own random source, derived from the configured seed and
            // the worker id, so a seeded run stays reproducible per worker regardless of
            // task interleaving
            let random: Arc<dyn Random + Send + Sync> = match config.random_seed {
                Some(seed) => Arc::new(DefaultRandom::new_with_seed(seed.wrapping_add(number as u64))),
                None => environment.random.clone(),
            };

            WorkerHandle::new(
                WorkerId(number as u32),
                problem.clone(),
                config.clone(),
                store.clone(),
                random,
                environment.logger.clone(),
                completion_sender.clone(),
            )
        })
        .collect::<Vec<_>>();

    Ok(IterationCoordinator::new(workers, store, completion_receiver, config, environment))
}
