#[cfg(test)]
#[path = "../../tests/unit/colony/pheromone_test.rs"]
mod pheromone_test;

use crate::colony::message::{
    DepositOutcome, IterationId, IterationSummary, PheromoneReply, QueryId, StoreRequest, WorkerId,
};
use crate::models::{LocationId, LocationIndex, Tour};
use crate::prelude::{SolverError, SolverResult};
use crate::solver::ColonyConfig;
use crate::utils::{Float, compare_floats};
use rustc_hash::FxHashMap;
use std::cmp::Ordering;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};

/// The lowest value an entry can be evaporated to. Keeps every edge selectable, so the
/// colony cannot lock itself out of a path permanently.
pub const MIN_PHEROMONE: Float = 1e-9;

const STORE_CHANNEL: &str = "pheromone store";
const CHANNEL_BUFFER: usize = 8;

/// Selects which tours of a closed iteration reinforce the pheromone matrix.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DepositPolicy {
    /// Every feasible tour of the iteration deposits. Classic ant system behavior.
    #[default]
    AllTours,
    /// Only the best feasible tour of the iteration deposits.
    IterationBest,
    /// Only the best tour found across all iterations so far deposits.
    GlobalBest,
}

/// A dense pheromone matrix addressed exclusively through a [`LocationIndex`].
pub struct PheromoneMatrix {
    index: Arc<LocationIndex>,
    values: Vec<Float>,
    dimension: usize,
}

impl PheromoneMatrix {
    /// Creates a new instance of `PheromoneMatrix` with every entry set to the initial level.
    pub fn new(index: Arc<LocationIndex>, initial: Float) -> SolverResult<Self> {
        if !initial.is_finite() || initial <= 0. {
            return Err(SolverError::InvalidConfig(format!(
                "initial pheromone is {initial}, expected a positive value"
            )));
        }

        let dimension = index.len();
        Ok(Self { index, values: vec![initial; dimension * dimension], dimension })
    }

    /// Returns the pheromone level of the directed edge between two locations.
    pub fn get(&self, from: LocationId, to: LocationId) -> SolverResult<Float> {
        let from = self.index.index_of(from)?;
        let to = self.index.index_of(to)?;

        Ok(self.values[from * self.dimension + to])
    }

    /// Decays every entry by the evaporation rate, floored at [`MIN_PHEROMONE`].
    pub fn evaporate(&mut self, rho: Float) {
        let keep = 1. - rho;
        self.values.iter_mut().for_each(|value| *value = (*value * keep).max(MIN_PHEROMONE));
    }

    /// Adds the given amount to every directed edge on the tour's path.
    pub fn deposit(&mut self, tour: &Tour, amount: Float) -> SolverResult<()> {
        for (from, to) in tour.edges() {
            let from = self.index.index_of(from)?;
            let to = self.index.index_of(to)?;
            self.values[from * self.dimension + to] += amount;
        }

        Ok(())
    }

    /// Returns an immutable copy of the current matrix state.
    pub fn snapshot(&self) -> PheromoneSnapshot {
        PheromoneSnapshot { index: self.index.clone(), values: self.values.clone(), dimension: self.dimension }
    }
}

/// An immutable copy of the pheromone matrix, exposed for reporting once a run finishes.
#[derive(Clone)]
pub struct PheromoneSnapshot {
    index: Arc<LocationIndex>,
    values: Vec<Float>,
    dimension: usize,
}

impl PheromoneSnapshot {
    /// Returns the pheromone level of the directed edge between two locations.
    pub fn value(&self, from: LocationId, to: LocationId) -> SolverResult<Float> {
        let from = self.index.index_of(from)?;
        let to = self.index.index_of(to)?;

        Ok(self.values[from * self.dimension + to])
    }

    /// Returns the dimension of the matrix.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Iterates over all directed edges with their pheromone levels.
    pub fn entries(&self) -> impl Iterator<Item = (LocationId, LocationId, Float)> + '_ {
        self.index.ids().enumerate().flat_map(move |(from_index, from)| {
            self.index.ids().enumerate().map(move |(to_index, to)| {
                (from, to, self.values[from_index * self.dimension + to_index])
            })
        })
    }
}

/// The actor owning the pheromone matrix, the per-iteration tour collection, and the
/// global best record. Requests are processed strictly one at a time, which makes every
/// advance atomic with respect to all queries and deposits without any locking.
struct PheromoneStore {
    matrix: PheromoneMatrix,
    config: Arc<ColonyConfig>,
    current: IterationId,
    collected: FxHashMap<WorkerId, Tour>,
    best: Option<Tour>,
    receiver: mpsc::Receiver<StoreRequest>,
}

impl PheromoneStore {
    fn handle_message(&mut self, message: StoreRequest) {
        match message {
            StoreRequest::Query { query, iteration: _, from, to, respond_to } => {
                // queries are answered for any iteration id: a stale query only reads
                // slightly outdated guidance, which is harmless
                let reply = self.matrix.get(from, to).map(|value| PheromoneReply { query, value });
                let _ = respond_to.send(reply);
            }
            StoreRequest::Deposit { iteration, worker, tour, respond_to } => {
                let _ = respond_to.send(self.deposit(iteration, worker, tour));
            }
            StoreRequest::Advance { iteration, respond_to } => {
                let _ = respond_to.send(self.advance(iteration));
            }
            StoreRequest::BestTour { respond_to } => {
                let _ = respond_to.send(self.best.clone());
            }
            StoreRequest::Snapshot { respond_to } => {
                let _ = respond_to.send(self.matrix.snapshot());
            }
        }
    }

    fn deposit(&mut self, iteration: IterationId, worker: WorkerId, tour: Tour) -> DepositOutcome {
        if iteration != self.current {
            return DepositOutcome::Stale { current: self.current };
        }

        // keyed by worker: a retried submission replaces the earlier tour, so
        // at-least-once delivery cannot double count
        self.collected.insert(worker, tour);

        DepositOutcome::Accepted
    }

    fn advance(&mut self, iteration: IterationId) -> SolverResult<IterationSummary> {
        if iteration != self.current {
            return Err(SolverError::IterationNotOpen { requested: iteration, current: self.current });
        }

        let mut tours = self.collected.drain().collect::<Vec<_>>();
        tours.sort_unstable_by_key(|(worker, _)| worker.0);
        let tours = tours.into_iter().map(|(_, tour)| tour).collect::<Vec<_>>();

        self.matrix.evaporate(self.config.rho);
        let tours_used = self.reinforce(&tours)?;
        let improved = self.refresh_best(&tours);

        // the collected set is empty again at this point, so the next id opens clean
        self.current = self.current.next();

        Ok(IterationSummary {
            closed: iteration,
            tours_used,
            best_reward: self.best.as_ref().map(|tour| tour.reward()),
            improved,
        })
    }

    /// Deposits pheromone according to the configured policy. Returns how many tours
    /// contributed to the update.
    fn reinforce(&mut self, tours: &[Tour]) -> SolverResult<usize> {
        let selected = match self.config.deposit_policy {
            DepositPolicy::AllTours => tours.iter().filter(|tour| tour.is_feasible()).cloned().collect::<Vec<_>>(),
            DepositPolicy::IterationBest => best_of(tours).cloned().into_iter().collect(),
            DepositPolicy::GlobalBest => self.best.clone().into_iter().collect(),
        };

        let mut used = 0;
        for tour in selected.iter() {
            let amount = deposit_amount(self.config.q, tour);
            if amount > 0. {
                self.matrix.deposit(tour, amount)?;
                used += 1;
            }
        }

        Ok(used)
    }

    fn refresh_best(&mut self, tours: &[Tour]) -> bool {
        let challenger = best_of(tours);
        let improved = match (&challenger, &self.best) {
            (Some(tour), Some(best)) => compare_floats(tour.reward(), best.reward()) == Ordering::Greater,
            (Some(_), None) => true,
            _ => false,
        };

        if improved {
            self.best = challenger.cloned();
        }

        improved
    }
}

/// Returns the highest reward feasible tour, the earliest submission winning ties.
fn best_of(tours: &[Tour]) -> Option<&Tour> {
    tours.iter().filter(|tour| tour.is_feasible()).fold(None, |best, tour| match best {
        Some(current) if compare_floats(tour.reward(), current.reward()) != Ordering::Greater => Some(current),
        _ => Some(tour),
    })
}

/// Computes the deposit for a tour: the configured scale times reward per unit of cost.
/// Tours which collected nothing or went nowhere reinforce nothing.
fn deposit_amount(q: Float, tour: &Tour) -> Float {
    if tour.cost() <= 0. {
        return 0.;
    }

    q * tour.reward() / tour.cost()
}

/// A clonable handle to the pheromone store actor.
#[derive(Clone)]
pub(crate) struct PheromoneHandle {
    sender: mpsc::Sender<StoreRequest>,
}

impl PheromoneHandle {
    /// Spawns the store actor and returns a handle to it.
    pub fn new(matrix: PheromoneMatrix, config: Arc<ColonyConfig>) -> Self {
        let (sender, receiver) = mpsc::channel(CHANNEL_BUFFER);
        let mut actor = PheromoneStore {
            matrix,
            config,
            current: IterationId::default(),
            collected: FxHashMap::default(),
            best: None,
            receiver,
        };
        tokio::spawn(async move {
            while let Some(message) = actor.receiver.recv().await {
                actor.handle_message(message);
            }
        });

        Self { sender }
    }

    /// Requests the pheromone level of a directed edge. The response echoes the
    /// correlation id so the caller can discard foreign responses.
    pub async fn query(
        &self,
        query: QueryId,
        iteration: IterationId,
        from: LocationId,
        to: LocationId,
    ) -> SolverResult<PheromoneReply> {
        let (send, recv) = oneshot::channel();
        let request = StoreRequest::Query { query, iteration, from, to, respond_to: send };

        self.sender.send(request).await.map_err(|_| SolverError::ChannelClosed(STORE_CHANNEL))?;
        recv.await.map_err(|_| SolverError::ChannelClosed(STORE_CHANNEL))?
    }

    /// Submits a tour for the given iteration.
    pub async fn submit(&self, iteration: IterationId, worker: WorkerId, tour: Tour) -> SolverResult<DepositOutcome> {
        let (send, recv) = oneshot::channel();
        let request = StoreRequest::Deposit { iteration, worker, tour, respond_to: send };

        self.sender.send(request).await.map_err(|_| SolverError::ChannelClosed(STORE_CHANNEL))?;
        recv.await.map_err(|_| SolverError::ChannelClosed(STORE_CHANNEL))
    }

    /// Closes the given iteration: evaporates, deposits the collected tours, refreshes
    /// the global best, and opens the next iteration.
    pub async fn advance(&self, iteration: IterationId) -> SolverResult<IterationSummary> {
        let (send, recv) = oneshot::channel();
        let request = StoreRequest::Advance { iteration, respond_to: send };

        self.sender.send(request).await.map_err(|_| SolverError::ChannelClosed(STORE_CHANNEL))?;
        recv.await.map_err(|_| SolverError::ChannelClosed(STORE_CHANNEL))?
    }

    /// Returns the current global best tour, if any iteration produced a feasible one.
    pub async fn best_tour(&self) -> SolverResult<Option<Tour>> {
        let (send, recv) = oneshot::channel();
        let request = StoreRequest::BestTour { respond_to: send };

        self.sender.send(request).await.map_err(|_| SolverError::ChannelClosed(STORE_CHANNEL))?;
        recv.await.map_err(|_| SolverError::ChannelClosed(STORE_CHANNEL))
    }

    /// Returns a copy of the current pheromone matrix.
    pub async fn snapshot(&self) -> SolverResult<PheromoneSnapshot> {
        let (send, recv) = oneshot::channel();
        let request = StoreRequest::Snapshot { respond_to: send };

        self.sender.send(request).await.map_err(|_| SolverError::ChannelClosed(STORE_CHANNEL))?;
        recv.await.map_err(|_| SolverError::ChannelClosed(STORE_CHANNEL))
    }
}
