//! This module contains the dataset loading collaborator: readers which turn external
//! data documents into a validated [`crate::models::Problem`]. It lives outside the
//! search core and the colony never depends on it.

mod json;
pub use self::json::*;
