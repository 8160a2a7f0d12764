//! This module contains the solving facade: the configuration surface, the telemetry,
//! and the `Solver` which spawns the colony on a runtime and drives it to a solution.

#[cfg(test)]
#[path = "../../tests/unit/solver/solver_test.rs"]
mod solver_test;

mod config;
pub use self::config::{ColonyConfig, ColonyConfigBuilder};

mod telemetry;
pub use self::telemetry::{Telemetry, TelemetryIteration, TelemetryMetrics, TelemetryMode};

use crate::colony::{self, PheromoneSnapshot};
use crate::models::{Problem, Tour};
use crate::prelude::SolverResult;
use crate::termination::{CompositeTermination, MaxIteration, MaxTime, Stagnation, Termination};
use crate::utils::{Environment, Float};
use std::sync::Arc;

/// The result of a run: the best tour found, its reward, a snapshot of the final
/// pheromone matrix for downstream inspection, and the run metrics.
pub struct Solution {
    /// The best feasible tour found, or none when no iteration produced one.
    pub tour: Option<Tour>,
    /// The reward of the best tour, or none when no tour was found.
    pub reward: Option<Float>,
    /// The pheromone matrix as it was when the run stopped.
    pub pheromone: PheromoneSnapshot,
    /// Telemetry of the run.
    pub metrics: TelemetryMetrics,
}

/// Solves an OPTW instance by spawning an ant colony and iterating it to convergence.
/// The entry point is synchronous: a multi thread runtime is built internally and all
/// actors live on it for the duration of the run.
pub struct Solver {
    problem: Arc<Problem>,
    config: ColonyConfig,
    environment: Arc<Environment>,
    telemetry_mode: TelemetryMode,
}

impl Solver {
    /// Creates a new instance of `Solver` with a default environment and no telemetry.
    pub fn new(problem: Arc<Problem>, config: ColonyConfig) -> Self {
        Self { problem, config, environment: Arc::new(Environment::default()), telemetry_mode: TelemetryMode::None }
    }

    /// Sets the environment: the random source, an optional quota, and the logger.
    pub fn with_environment(mut self, environment: Arc<Environment>) -> Self {
        self.environment = environment;
        self
    }

    /// Sets the telemetry mode.
    pub fn with_telemetry(mut self, mode: TelemetryMode) -> Self {
        self.telemetry_mode = mode;
        self
    }

    /// Runs the colony until termination and returns the best solution found.
    pub fn solve(self) -> SolverResult<Solution> {
        let config = Arc::new(self.config);
        let termination = create_termination(&config);

        let runtime = tokio::runtime::Builder::new_multi_thread().enable_all().build()?;

        runtime.block_on(async move {
            let mut telemetry = Telemetry::new(self.telemetry_mode);

            let coordinator = colony::spawn(self.problem, config, self.environment)?;
            let (tour, pheromone) = coordinator.run(termination, &mut telemetry).await?;

            let reward = tour.as_ref().map(|tour| tour.reward());

            Ok(Solution { tour, reward, pheromone, metrics: telemetry.take_metrics() })
        })
    }
}

/// Builds the composite termination from the configured limits.
fn create_termination(config: &ColonyConfig) -> Box<dyn Termination + Send + Sync> {
    let mut terminations: Vec<Box<dyn Termination + Send + Sync>> = vec![];

    if let Some(limit) = config.max_iterations {
        terminations.push(Box::new(MaxIteration::new(limit)));
    }
    if let Some(limit) = config.stagnation_limit {
        terminations.push(Box::new(Stagnation::new(limit)));
    }
    if let Some(limit) = config.max_time {
        terminations.push(Box::new(MaxTime::new(limit.as_secs_f64())));
    }

    Box::new(CompositeTermination::new(terminations))
}
