#[cfg(test)]
#[path = "../../tests/unit/models/problem_test.rs"]
mod problem_test;

use crate::models::common::{LocationId, TimeWindow, Timestamp};
use crate::prelude::{SolverError, SolverResult};
use crate::utils::Float;
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// A location which can be visited by a tour.
#[derive(Clone, Debug)]
pub struct Location {
    /// A stable external identity.
    pub id: LocationId,
    /// A human readable name, carried for reporting only.
    pub name: String,
    /// Optional coordinates, carried for reporting only.
    pub coordinates: Option<(Float, Float)>,
    /// A reward collected when the location is visited.
    pub reward: Float,
    /// Time spent at the location once a visit starts.
    pub visit_duration: Float,
    /// A time window within which an arrival is accepted.
    pub window: TimeWindow,
}

/// A bijection between stable location ids and dense matrix indices.
///
/// This is the only id to index mapping in the crate: every travel time or pheromone
/// matrix access resolves through it, so there is no second raw-id addressing path
/// which could drift out of sync with deposits.
pub struct LocationIndex {
    ids: Vec<LocationId>,
    indices: FxHashMap<LocationId, usize>,
}

impl LocationIndex {
    /// Creates a new instance of `LocationIndex` from a set of unique ids.
    /// Ids are ordered ascending, so index order is id order.
    pub fn new(ids: impl IntoIterator<Item = LocationId>) -> SolverResult<Self> {
        let mut ids = ids.into_iter().collect::<Vec<_>>();
        ids.sort_unstable();

        let indices = ids.iter().enumerate().map(|(index, &id)| (id, index)).collect::<FxHashMap<_, _>>();
        if indices.len() != ids.len() {
            return Err(SolverError::InvalidInput("location ids are not unique".to_string()));
        }

        Ok(Self { ids, indices })
    }

    /// Resolves a location id to its dense index.
    pub fn index_of(&self, id: LocationId) -> SolverResult<usize> {
        self.indices.get(&id).copied().ok_or(SolverError::UnknownLocation(id))
    }

    /// Resolves a dense index back to its location id.
    pub fn id_of(&self, index: usize) -> SolverResult<LocationId> {
        self.ids.get(index).copied().ok_or(SolverError::UnknownIndex(index))
    }

    /// Iterates over all ids in index order, which is ascending id order.
    pub fn ids(&self) -> impl Iterator<Item = LocationId> + '_ {
        self.ids.iter().copied()
    }

    /// Returns the size of the location set.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns true if the index holds no locations.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// A dense travel time matrix addressed by indices of a [`LocationIndex`].
pub struct TravelTimeMatrix {
    values: Vec<Float>,
    dimension: usize,
}

impl TravelTimeMatrix {
    /// Creates a new instance of `TravelTimeMatrix` from row-major values.
    pub fn new(dimension: usize, values: Vec<Float>) -> SolverResult<Self> {
        if values.len() != dimension * dimension {
            return Err(SolverError::InvalidInput(format!(
                "travel time matrix has {} values, expected {}",
                values.len(),
                dimension * dimension
            )));
        }

        for (position, &value) in values.iter().enumerate() {
            let (from, to) = (position / dimension, position % dimension);
            if !value.is_finite() || value < 0. {
                return Err(SolverError::InvalidInput(format!("travel time from {from} to {to} is {value}")));
            }
            if from == to && value != 0. {
                return Err(SolverError::InvalidInput(format!("travel time diagonal at {from} is {value}, expected 0")));
            }
        }

        Ok(Self { values, dimension })
    }

    /// Returns the travel time between two dense indices.
    /// Indices must come from the matching [`LocationIndex`].
    pub fn get(&self, from: usize, to: usize) -> Float {
        self.values[from * self.dimension + to]
    }

    /// Returns the dimension of the matrix.
    pub fn dimension(&self) -> usize {
        self.dimension
    }
}

/// An orienteering problem instance: a location set with rewards and time windows,
/// a travel time matrix, a depot, and a global time budget.
pub struct Problem {
    locations: Vec<Location>,
    index: Arc<LocationIndex>,
    travel: TravelTimeMatrix,
    depot: usize,
    time_budget: Float,
}

impl Problem {
    /// Creates a new instance of `Problem`, validating all model invariants.
    pub fn new(
        mut locations: Vec<Location>,
        travel: TravelTimeMatrix,
        depot: LocationId,
        time_budget: Float,
    ) -> SolverResult<Self> {
        if locations.is_empty() {
            return Err(SolverError::InvalidInput("location set is empty".to_string()));
        }

        if !time_budget.is_finite() || time_budget <= 0. {
            return Err(SolverError::InvalidInput(format!("time budget is {time_budget}, expected a positive value")));
        }

        for location in locations.iter() {
            if location.window.start > location.window.end {
                return Err(SolverError::InvalidInput(format!(
                    "location {} has window [{}, {}] which never opens",
                    location.id, location.window.start, location.window.end
                )));
            }
            if location.reward < 0. {
                return Err(SolverError::InvalidInput(format!(
                    "location {} has negative reward {}",
                    location.id, location.reward
                )));
            }
            if location.visit_duration < 0. {
                return Err(SolverError::InvalidInput(format!(
                    "location {} has negative visit duration {}",
                    location.id, location.visit_duration
                )));
            }
        }

        if travel.dimension() != locations.len() {
            return Err(SolverError::InvalidInput(format!(
                "travel time matrix dimension is {}, expected {}",
                travel.dimension(),
                locations.len()
            )));
        }

        let index = Arc::new(LocationIndex::new(locations.iter().map(|location| location.id))?);
        // keep the location order aligned with the index so both walk in id order
        locations.sort_unstable_by(|a, b| a.id.cmp(&b.id));
        let depot = index.index_of(depot)?;

        Ok(Self { locations, index, travel, depot, time_budget })
    }

    /// Returns all locations ordered by id.
    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    /// Returns a location by its dense index.
    pub fn location(&self, index: usize) -> &Location {
        &self.locations[index]
    }

    /// Returns the id to index mapping.
    pub fn index(&self) -> &Arc<LocationIndex> {
        &self.index
    }

    /// Returns the travel time between two dense indices.
    pub fn travel_time(&self, from: usize, to: usize) -> Float {
        self.travel.get(from, to)
    }

    /// Returns the travel time between two locations given by id.
    pub fn travel_between(&self, from: LocationId, to: LocationId) -> SolverResult<Float> {
        Ok(self.travel.get(self.index.index_of(from)?, self.index.index_of(to)?))
    }

    /// Returns the dense index of the depot.
    pub fn depot(&self) -> usize {
        self.depot
    }

    /// Returns the id of the depot.
    pub fn depot_id(&self) -> LocationId {
        self.locations[self.depot].id
    }

    /// Returns the time at which every tour starts: the opening of the depot window.
    pub fn start_time(&self) -> Timestamp {
        self.locations[self.depot].window.start
    }

    /// Returns the global time budget for a tour.
    pub fn time_budget(&self) -> Float {
        self.time_budget
    }

    /// Returns the size of the location set, the depot included.
    pub fn size(&self) -> usize {
        self.locations.len()
    }
}
