//! This crate solves an Orienteering Problem with Time Windows (OPTW) with a distributed
//! Ant Colony Optimization: a colony of independent ant actors constructs candidate tours
//! guided by a shared pheromone matrix, which is owned by a dedicated store actor, while a
//! coordinator actor drives iterations to convergence over a completion barrier.
//!
//! All agents communicate exclusively by asynchronous message passing; every message which
//! participates in the iteration lifecycle carries the iteration id it belongs to, so the
//! protocol stays correct without any ordering guarantees from the transport.

#![warn(missing_docs)]

#[cfg(test)]
#[path = "../tests/helpers/mod.rs"]
#[macro_use]
pub mod helpers;

pub mod colony;
pub mod construction;
pub mod format;
pub mod models;
pub mod prelude;
pub mod solver;
pub mod termination;
pub mod utils;

mod error;
pub use self::error::{SolverError, SolverResult};
