#[cfg(test)]
#[path = "../../tests/unit/models/tour_test.rs"]
mod tour_test;

use crate::models::common::{Cost, LocationId, TimeWindow, Timestamp};
use crate::models::problem::Problem;
use crate::prelude::SolverResult;
use crate::utils::{Float, compare_floats};
use std::cmp::Ordering;

/// A single stop of a tour with its computed schedule.
#[derive(Clone, Debug)]
pub struct TourStop {
    /// The visited location.
    pub location: LocationId,
    /// Time of arrival, before any waiting for the window to open.
    pub arrival: Timestamp,
    /// Time of departure, after waiting and the visit itself.
    pub departure: Timestamp,
}

/// A depot-to-depot tour with its schedule, collected reward, cost and feasibility.
///
/// A tour can only be obtained from [`Tour::evaluate`], which replays a visit sequence
/// against the problem. The feasibility flag is therefore always derived from the
/// sequence itself and cannot be asserted independently of it.
#[derive(Clone, Debug)]
pub struct Tour {
    stops: Vec<TourStop>,
    reward: Float,
    cost: Cost,
    feasible: bool,
}

/// A schedule step: the arrival at a location and the departure after waiting and service.
pub(crate) fn advance_schedule(
    departure: Timestamp,
    travel: Float,
    window: &TimeWindow,
    visit_duration: Float,
) -> (Timestamp, Timestamp) {
    let arrival = departure + travel;
    let service_start = if arrival < window.start { window.start } else { arrival };

    (arrival, service_start + visit_duration)
}

impl Tour {
    /// Replays a visit sequence against the problem and computes the full stop schedule,
    /// the collected reward, the cost as total elapsed time, and the feasibility flag.
    /// The sequence holds the visited location ids in order, without the depot; the
    /// replay starts at the depot at the opening of its window and ends back at it.
    ///
    /// Fails with `UnknownLocation` when the sequence references an id outside the
    /// problem's location set.
    pub fn evaluate(problem: &Problem, visits: &[LocationId]) -> SolverResult<Self> {
        let start = problem.start_time();
        let depot = problem.depot();

        let mut stops = Vec::with_capacity(visits.len() + 2);
        stops.push(TourStop { location: problem.depot_id(), arrival: start, departure: start });

        let mut position = depot;
        let mut departure = start;
        let mut reward = 0.;
        let mut feasible = true;

        for &id in visits {
            let index = problem.index().index_of(id)?;
            let location = problem.location(index);

            let travel = problem.travel_time(position, index);
            let (arrival, next_departure) =
                advance_schedule(departure, travel, &location.window, location.visit_duration);

            if compare_floats(arrival, location.window.end) == Ordering::Greater {
                feasible = false;
            }

            stops.push(TourStop { location: id, arrival, departure: next_departure });
            reward += location.reward;
            position = index;
            departure = next_departure;
        }

        let return_arrival = departure + problem.travel_time(position, depot);
        stops.push(TourStop { location: problem.depot_id(), arrival: return_arrival, departure: return_arrival });

        let cost = return_arrival - start;
        if compare_floats(cost, problem.time_budget()) == Ordering::Greater {
            feasible = false;
        }

        Ok(Self { stops, reward, cost, feasible })
    }

    /// Returns all stops of the tour, the depot at both ends included.
    pub fn stops(&self) -> &[TourStop] {
        &self.stops
    }

    /// Returns the visited location ids without the enclosing depot stops.
    pub fn visits(&self) -> impl Iterator<Item = LocationId> + '_ {
        self.stops[1..self.stops.len() - 1].iter().map(|stop| stop.location)
    }

    /// Returns the directed edges of the tour path as id pairs.
    pub fn edges(&self) -> impl Iterator<Item = (LocationId, LocationId)> + '_ {
        self.stops.windows(2).map(|pair| (pair[0].location, pair[1].location))
    }

    /// Returns the number of visited locations, the depot excluded.
    pub fn visit_count(&self) -> usize {
        self.stops.len() - 2
    }

    /// Returns the total collected reward.
    pub fn reward(&self) -> Float {
        self.reward
    }

    /// Returns the cost of the tour: total elapsed time from leaving the depot to returning.
    pub fn cost(&self) -> Cost {
        self.cost
    }

    /// Returns true when every arrival respects its window and the cost fits the budget.
    pub fn is_feasible(&self) -> bool {
        self.feasible
    }
}
