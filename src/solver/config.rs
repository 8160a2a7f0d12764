#[cfg(test)]
#[path = "../../tests/unit/solver/config_test.rs"]
mod config_test;

use crate::colony::DepositPolicy;
use crate::prelude::{SolverError, SolverResult};
use crate::utils::Float;
use std::time::Duration;

/// A configuration which controls the colony behavior: the search parameters of the ACO
/// transition and update rules, the protocol timeouts, and the termination limits.
#[derive(Clone, Debug)]
pub struct ColonyConfig {
    /// Amount of ant workers constructing tours each iteration.
    pub population_size: usize,
    /// Pheromone exponent of the transition rule.
    pub alpha: Float,
    /// Heuristic exponent of the transition rule.
    pub beta: Float,
    /// Evaporation rate: each iteration every matrix entry keeps a `1 - rho` share.
    pub rho: Float,
    /// Deposit scale: a tour reinforces its edges by `q * reward / cost`.
    pub q: Float,
    /// The level every pheromone matrix entry starts at.
    pub initial_pheromone: Float,
    /// Selects which tours of a closed iteration deposit pheromone.
    pub deposit_policy: DepositPolicy,
    /// How long a worker waits for a pheromone query response before it falls back to
    /// neutral guidance.
    pub query_timeout: Duration,
    /// How long a worker waits for a deposit acknowledgment per attempt.
    pub deposit_timeout: Duration,
    /// How many times a worker retries an unacknowledged deposit before giving up.
    pub deposit_retries: usize,
    /// The safety timeout of the completion barrier. Generous by design: it is a crash
    /// recovery fallback, not a tuning knob for normal operation.
    pub barrier_timeout: Duration,
    /// Stop after this many iterations, if set.
    pub max_iterations: Option<usize>,
    /// Stop when the best reward has not improved for this many consecutive iterations,
    /// if set.
    pub stagnation_limit: Option<usize>,
    /// Stop when the run exceeds this wall clock limit, if set.
    pub max_time: Option<Duration>,
    /// Seeds the worker random sources for a reproducible run, if set.
    pub random_seed: Option<u64>,
}

impl Default for ColonyConfig {
    fn default() -> Self {
        Self {
            population_size: 20,
            alpha: 1.,
            beta: 2.,
            rho: 0.1,
            q: 1.,
            initial_pheromone: 1.,
            deposit_policy: DepositPolicy::default(),
            query_timeout: Duration::from_millis(250),
            deposit_timeout: Duration::from_millis(500),
            deposit_retries: 2,
            barrier_timeout: Duration::from_secs(10),
            max_iterations: Some(100),
            stagnation_limit: None,
            max_time: None,
            random_seed: None,
        }
    }
}

/// Provides a configurable way to build a colony configuration using fluent interface style.
#[derive(Default)]
pub struct ColonyConfigBuilder {
    config: ColonyConfig,
}

impl ColonyConfigBuilder {
    /// Creates a new instance of `ColonyConfigBuilder` with default parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the amount of ant workers per iteration.
    pub fn with_population_size(mut self, size: usize) -> Self {
        self.config.population_size = size;
        self
    }

    /// Sets the pheromone exponent of the transition rule.
    pub fn with_alpha(mut self, alpha: Float) -> Self {
        self.config.alpha = alpha;
        self
    }

    /// Sets the heuristic exponent of the transition rule.
    pub fn with_beta(mut self, beta: Float) -> Self {
        self.config.beta = beta;
        self
    }

    /// Sets the evaporation rate.
    pub fn with_rho(mut self, rho: Float) -> Self {
        self.config.rho = rho;
        self
    }

    /// Sets the deposit scale.
    pub fn with_q(mut self, q: Float) -> Self {
        self.config.q = q;
        self
    }

    /// Sets the initial pheromone level.
    pub fn with_initial_pheromone(mut self, initial: Float) -> Self {
        self.config.initial_pheromone = initial;
        self
    }

    /// Sets the deposit policy.
    pub fn with_deposit_policy(mut self, policy: DepositPolicy) -> Self {
        self.config.deposit_policy = policy;
        self
    }

    /// Sets the pheromone query timeout.
    pub fn with_query_timeout(mut self, timeout: Duration) -> Self {
        self.config.query_timeout = timeout;
        self
    }

    /// Sets the deposit acknowledgment timeout and the retry count.
    pub fn with_deposit_timeout(mut self, timeout: Duration, retries: usize) -> Self {
        self.config.deposit_timeout = timeout;
        self.config.deposit_retries = retries;
        self
    }

    /// Sets the completion barrier safety timeout.
    pub fn with_barrier_timeout(mut self, timeout: Duration) -> Self {
        self.config.barrier_timeout = timeout;
        self
    }

    /// Sets the maximum amount of iterations.
    pub fn with_max_iterations(mut self, limit: Option<usize>) -> Self {
        self.config.max_iterations = limit;
        self
    }

    /// Sets the stagnation limit: the run stops when the best reward has not improved
    /// for this many consecutive iterations.
    pub fn with_stagnation_limit(mut self, limit: Option<usize>) -> Self {
        self.config.stagnation_limit = limit;
        self
    }

    /// Sets the wall clock limit of the run.
    pub fn with_max_time(mut self, limit: Option<Duration>) -> Self {
        self.config.max_time = limit;
        self
    }

    /// Sets the random seed for a reproducible run.
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.config.random_seed = seed;
        self
    }

    /// Validates the parameters and builds the configuration.
    pub fn build(self) -> SolverResult<ColonyConfig> {
        let config = self.config;

        if config.population_size == 0 {
            return Err(SolverError::InvalidConfig("population size is zero".to_string()));
        }

        for (name, value) in [("alpha", config.alpha), ("beta", config.beta)] {
            if !value.is_finite() || value < 0. {
                return Err(SolverError::InvalidConfig(format!("{name} is {value}, expected a non negative value")));
            }
        }

        if !config.rho.is_finite() || !(0. ..1.).contains(&config.rho) {
            return Err(SolverError::InvalidConfig(format!("rho is {}, expected a value in [0, 1)", config.rho)));
        }

        for (name, value) in [("q", config.q), ("initial pheromone", config.initial_pheromone)] {
            if !value.is_finite() || value <= 0. {
                return Err(SolverError::InvalidConfig(format!("{name} is {value}, expected a positive value")));
            }
        }

        for (name, value) in [
            ("query timeout", config.query_timeout),
            ("deposit timeout", config.deposit_timeout),
            ("barrier timeout", config.barrier_timeout),
        ] {
            if value.is_zero() {
                return Err(SolverError::InvalidConfig(format!("{name} is zero")));
            }
        }

        if config.max_iterations.is_none() && config.stagnation_limit.is_none() && config.max_time.is_none() {
            return Err(SolverError::InvalidConfig("no termination criterion is set".to_string()));
        }

        Ok(config)
    }
}
