use crate::utils::{DefaultRandom, Float, Random, Timer};
use std::sync::Arc;

/// Specifies a logger type which takes a string message and prints it somewhere.
pub type InfoLogger = Arc<dyn Fn(&str) + Send + Sync>;

/// Specifies a computational quota for the solving process.
/// The main purpose is to allow to stop the algorithm in reaction to external events such
/// as user cancellation, timer, etc.
pub trait Quota {
    /// Returns true when computation should be stopped.
    fn is_reached(&self) -> bool;
}

/// Keeps track of environment specific information which influences algorithm behavior.
#[derive(Clone)]
pub struct Environment {
    /// A wrapper on random generator.
    pub random: Arc<dyn Random + Send + Sync>,

    /// A computational quota.
    pub quota: Option<Arc<dyn Quota + Send + Sync>>,

    /// A logger which writes status messages somewhere.
    pub logger: InfoLogger,
}

impl Environment {
    /// Creates an instance of `Environment` with optional time quota in seconds.
    pub fn new_with_time_quota(max_time: Option<usize>) -> Self {
        Self {
            quota: max_time.map::<Arc<dyn Quota + Send + Sync>, _>(|time| Arc::new(TimeQuota::new(time as Float))),
            ..Self::default()
        }
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            random: Arc::new(DefaultRandom::default()),
            quota: None,
            logger: Arc::new(|msg| println!("{msg}")),
        }
    }
}

/// A time based quota.
pub struct TimeQuota {
    timer: Timer,
    limit_in_secs: Float,
}

impl TimeQuota {
    /// Creates a new instance of `TimeQuota` with limit in seconds.
    pub fn new(limit_in_secs: Float) -> Self {
        Self { timer: Timer::start(), limit_in_secs }
    }
}

impl Quota for TimeQuota {
    fn is_reached(&self) -> bool {
        self.timer.elapsed_secs_as_float() > self.limit_in_secs
    }
}
