//! This module reimports the commonly used types.

pub use crate::error::SolverError;
pub use crate::error::SolverResult;

pub use crate::models::Location;
pub use crate::models::LocationId;
pub use crate::models::LocationIndex;
pub use crate::models::Problem;
pub use crate::models::TimeWindow;
pub use crate::models::Tour;
pub use crate::models::TourStop;
pub use crate::models::TravelTimeMatrix;

pub use crate::colony::DepositPolicy;
pub use crate::colony::IterationId;
pub use crate::colony::PheromoneSnapshot;
pub use crate::colony::WorkerId;

pub use crate::solver::ColonyConfig;
pub use crate::solver::ColonyConfigBuilder;
pub use crate::solver::Solution;
pub use crate::solver::Solver;
pub use crate::solver::TelemetryMode;

pub use crate::termination::Termination;

pub use crate::utils::DefaultRandom;
pub use crate::utils::Environment;
pub use crate::utils::Float;
pub use crate::utils::InfoLogger;
pub use crate::utils::Quota;
pub use crate::utils::Random;
pub use crate::utils::compare_floats;
