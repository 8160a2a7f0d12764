//! This module contains the building blocks of ant tour construction: the feasibility
//! filter over the unvisited locations, the desirability formula which blends pheromone
//! and heuristic guidance, and the roulette wheel transition rule.

#[cfg(test)]
#[path = "../../tests/unit/construction/construction_test.rs"]
mod construction_test;

use crate::models::{Problem, Timestamp, advance_schedule};
use crate::utils::{Float, Random, compare_floats};
use std::cmp::Ordering;

/// Travel times below this floor are clamped when computing the heuristic factor, so
/// co-located points do not produce an infinite desirability.
pub const MIN_TRAVEL_TIME: Float = 1e-6;

/// A move from the current position to an unvisited location which respects the
/// target's time window and leaves enough budget to return to the depot.
#[derive(Clone, Debug)]
pub struct Candidate {
    /// Dense index of the target location.
    pub index: usize,
    /// Travel time from the current position to the target.
    pub travel: Float,
}

/// Computes the feasible candidate set for the next move: all unvisited locations
/// whose arrival fits their window and from which the depot is still reachable within
/// the remaining budget. Candidates are listed in location id order, which makes tie
/// breaking deterministic for a fixed random source.
pub fn feasible_candidates(
    problem: &Problem,
    position: usize,
    departure: Timestamp,
    visited: &[bool],
) -> Vec<Candidate> {
    let deadline = problem.start_time() + problem.time_budget();
    let depot = problem.depot();

    (0..problem.size())
        .filter(|&index| !visited[index])
        .filter_map(|index| {
            let location = problem.location(index);
            let travel = problem.travel_time(position, index);
            let (arrival, next_departure) =
                advance_schedule(departure, travel, &location.window, location.visit_duration);

            if compare_floats(arrival, location.window.end) == Ordering::Greater {
                return None;
            }

            let return_arrival = next_departure + problem.travel_time(index, depot);
            if compare_floats(return_arrival, deadline) == Ordering::Greater {
                return None;
            }

            Some(Candidate { index, travel })
        })
        .collect()
}

/// Computes the static heuristic factor of a move: the reward of the target scaled by
/// the inverse travel time to it.
pub fn heuristic_factor(problem: &Problem, candidate: &Candidate) -> Float {
    problem.location(candidate.index).reward / candidate.travel.max(MIN_TRAVEL_TIME)
}

/// Computes the desirability of a move from its pheromone level and heuristic factor.
pub fn desirability(pheromone: Float, heuristic: Float, alpha: Float, beta: Float) -> Float {
    pheromone.powf(alpha) * heuristic.powf(beta)
}

/// Chooses the next move by roulette wheel sampling proportional to the weights.
/// Degenerate weights (all zero or non finite) fall back to the first candidate,
/// which keeps the choice deterministic in location id order.
pub fn select_candidate<'a>(
    candidates: &'a [Candidate],
    weights: &[Float],
    random: &dyn Random,
) -> Option<&'a Candidate> {
    debug_assert!(candidates.len() == weights.len());

    let total = weights.iter().sum::<Float>();
    if !total.is_finite() || total <= 0. {
        return candidates.first();
    }

    let mut pick = random.uniform_real(0., total);
    for (candidate, &weight) in candidates.iter().zip(weights.iter()) {
        pick -= weight;
        if pick <= 0. {
            return Some(candidate);
        }
    }

    candidates.last()
}
