//! Provides the logic to collect metrics about a run and simple logging.

use crate::colony::IterationSummary;
use crate::utils::{Float, InfoLogger, Timer};

/// Encapsulates different measurements regarding a finished run.
pub struct TelemetryMetrics {
    /// Run duration in seconds.
    pub duration: usize,
    /// Total amount of iterations.
    pub iterations: usize,
    /// Speed: iterations per second.
    pub speed: Float,
    /// Per iteration progress, present when metrics collection is enabled.
    pub evolution: Vec<TelemetryIteration>,
}

/// Represents information about one iteration.
pub struct TelemetryIteration {
    /// Iteration sequence number, starting at zero.
    pub number: usize,
    /// Time since the run started, in seconds.
    pub timestamp: Float,
    /// The best reward known after the iteration, if any tour was feasible so far.
    pub best_reward: Option<Float>,
    /// How many tours contributed to the pheromone update.
    pub tours_used: usize,
    /// True when the iteration improved the global best.
    pub is_improvement: bool,
    /// True when the iteration ended on the barrier safety timeout.
    pub is_degraded: bool,
}

/// Specifies a telemetry mode.
#[derive(Clone, Default)]
pub enum TelemetryMode {
    /// No telemetry at all.
    #[default]
    None,
    /// Only logging.
    OnlyLogging {
        /// A logger type.
        logger: InfoLogger,
        /// Specifies how often an iteration is logged; improvements are always logged.
        log_interval: usize,
    },
    /// Only metrics collection.
    OnlyMetrics,
    /// Both logging and metrics collection.
    All {
        /// A logger type.
        logger: InfoLogger,
        /// Specifies how often an iteration is logged; improvements are always logged.
        log_interval: usize,
    },
}

/// Provides a way to collect metrics and write information into the log.
pub struct Telemetry {
    time: Timer,
    mode: TelemetryMode,
    iterations: usize,
    evolution: Vec<TelemetryIteration>,
}

impl Telemetry {
    /// Creates a new instance of `Telemetry`. The run clock starts at the moment of the call.
    pub fn new(mode: TelemetryMode) -> Self {
        Self { time: Timer::start(), mode, iterations: 0, evolution: vec![] }
    }

    /// Records one closed iteration.
    pub fn on_iteration(&mut self, summary: &IterationSummary, is_degraded: bool) {
        let number = self.iterations;
        self.iterations += 1;

        let item = TelemetryIteration {
            number,
            timestamp: self.time.elapsed_secs_as_float(),
            best_reward: summary.best_reward,
            tours_used: summary.tours_used,
            is_improvement: summary.improved,
            is_degraded,
        };

        let (logger, log_interval) = match &self.mode {
            TelemetryMode::None => return,
            TelemetryMode::OnlyMetrics => {
                self.evolution.push(item);
                return;
            }
            TelemetryMode::OnlyLogging { logger, log_interval } => (logger, *log_interval),
            TelemetryMode::All { logger, log_interval } => (logger, *log_interval),
        };

        if item.is_improvement || (log_interval != 0 && number % log_interval == 0) {
            let best = item.best_reward.map_or("none".to_string(), |reward| format!("{reward:.3}"));
            (logger)(&format!(
                "[{}s] iteration {number}: best reward {best}, tours used {}{}",
                self.time.elapsed_secs(),
                item.tours_used,
                if item.is_degraded { ", degraded" } else { "" },
            ));
        }

        if matches!(self.mode, TelemetryMode::All { .. }) {
            self.evolution.push(item);
        }
    }

    /// Writes a message into the log when the mode has a logger.
    pub fn log(&self, message: &str) {
        match &self.mode {
            TelemetryMode::OnlyLogging { logger, .. } | TelemetryMode::All { logger, .. } => (logger)(message),
            _ => {}
        }
    }

    /// Finalizes the collection and returns the run metrics.
    pub fn take_metrics(self) -> TelemetryMetrics {
        let elapsed = self.time.elapsed_secs_as_float();
        let speed = if elapsed > 0. { self.iterations as Float / elapsed } else { 0. };

        TelemetryMetrics {
            duration: self.time.elapsed_secs() as usize,
            iterations: self.iterations,
            speed,
            evolution: self.evolution,
        }
    }
}
