#[cfg(test)]
#[path = "../../tests/unit/format/json_test.rs"]
mod json_test;

use crate::models::{Location, LocationId, Problem, TimeWindow, TravelTimeMatrix};
use crate::prelude::{SolverError, SolverResult};
use crate::utils::Float;
use rustc_hash::FxHashMap;
use serde::Deserialize;
use std::collections::HashMap;
use std::io::{BufReader, Read};

/// Default reward of a place which does not declare one. With unit rewards the objective
/// degenerates to maximizing the amount of visited places.
const DEFAULT_REWARD: Float = 1.0;

/// Options controlling how the JSON documents are turned into a problem instance.
pub struct ReaderOptions {
    /// The transport mode to pick from the travel time document.
    pub mode: String,
    /// The id of the place every tour starts from and returns to.
    pub depot: LocationId,
    /// The global time budget of a tour, in minutes.
    pub time_budget: Float,
    /// Time spent at every visited place, in minutes. The depot gets none.
    pub visit_duration: Float,
}

/// A place as it appears in the places document.
#[derive(Deserialize)]
struct PlaceDto {
    id: u64,
    #[serde(rename = "Name", default)]
    name: Option<String>,
    /// Opening time as `"HH:MM"`.
    #[serde(rename = "Opens")]
    opens: String,
    /// Closing time as `"HH:MM"`.
    #[serde(rename = "Closes")]
    closes: String,
    #[serde(rename = "Latitude", default)]
    latitude: Option<Float>,
    #[serde(rename = "Longitude", default)]
    longitude: Option<Float>,
    #[serde(default)]
    reward: Option<Float>,
}

/// The travel time document: seconds per transport mode, keyed by from id, then to id.
type TravelTimesDto = HashMap<String, HashMap<String, HashMap<String, Float>>>;

/// Reads an OPTW problem from a places document (a JSON array of places with `"HH:MM"`
/// time windows) and a travel time document (nested JSON of directed travel times in
/// seconds per transport mode). All times are converted to whole minutes. A pair absent
/// from the travel time document, or present without the requested mode, counts as zero
/// travel.
pub fn read_optw_json<P: Read, T: Read>(
    places: BufReader<P>,
    travel_times: BufReader<T>,
    options: &ReaderOptions,
) -> SolverResult<Problem> {
    let places: Vec<PlaceDto> =
        serde_json::from_reader(places).map_err(|err| SolverError::InvalidInput(format!("places: {err}")))?;
    let travel_times: TravelTimesDto = serde_json::from_reader(travel_times)
        .map_err(|err| SolverError::InvalidInput(format!("travel times: {err}")))?;

    let locations = places
        .into_iter()
        .map(|place| {
            let id = LocationId(place.id);
            let window = TimeWindow::new(parse_time(&place.opens)?, parse_time(&place.closes)?);
            let coordinates = place.latitude.zip(place.longitude);
            let visit_duration = if id == options.depot { 0. } else { options.visit_duration };

            Ok(Location {
                id,
                name: place.name.unwrap_or_else(|| place.id.to_string()),
                coordinates,
                reward: place.reward.unwrap_or(DEFAULT_REWARD),
                visit_duration,
                window,
            })
        })
        .collect::<SolverResult<Vec<_>>>()?;

    let travel = create_matrix(&locations, &travel_times, &options.mode)?;

    Problem::new(locations, travel, options.depot, options.time_budget)
}

/// Parses a `"HH:MM"` clock time into minutes since midnight.
fn parse_time(value: &str) -> SolverResult<Float> {
    let invalid = || SolverError::InvalidInput(format!("time '{value}' is not in HH:MM format"));

    let (hours, minutes) = value.split_once(':').ok_or_else(invalid)?;
    let hours: u32 = hours.trim().parse().map_err(|_| invalid())?;
    let minutes: u32 = minutes.trim().parse().map_err(|_| invalid())?;

    if minutes >= 60 {
        return Err(invalid());
    }

    Ok((hours * 60 + minutes) as Float)
}

/// Builds the dense travel time matrix in the id order the location index will use.
/// Every id referenced by the travel time document must belong to the location set.
fn create_matrix(locations: &[Location], travel_times: &TravelTimesDto, mode: &str) -> SolverResult<TravelTimeMatrix> {
    let mut ids = locations.iter().map(|location| location.id).collect::<Vec<_>>();
    ids.sort_unstable();
    let indices = ids.iter().enumerate().map(|(index, &id)| (id, index)).collect::<FxHashMap<_, _>>();

    let dimension = ids.len();
    let mut values = vec![0.; dimension * dimension];

    for (from, destinations) in travel_times.iter() {
        let from = resolve(&indices, from)?;
        for (to, modes) in destinations.iter() {
            let to = resolve(&indices, to)?;
            if from == to {
                continue;
            }

            let seconds = modes.get(mode).copied().unwrap_or(0.);
            values[from * dimension + to] = (seconds / 60.).floor();
        }
    }

    TravelTimeMatrix::new(dimension, values)
}

fn resolve(indices: &FxHashMap<LocationId, usize>, raw: &str) -> SolverResult<usize> {
    let id = raw
        .parse::<u64>()
        .map(LocationId)
        .map_err(|_| SolverError::InvalidInput(format!("travel times reference a non numeric id '{raw}'")))?;

    indices.get(&id).copied().ok_or(SolverError::UnknownLocation(id))
}
