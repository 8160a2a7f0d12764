//! This module contains the problem and solution domain models.

mod common;
pub use self::common::*;

mod problem;
pub use self::problem::*;

mod tour;
pub use self::tour::*;
