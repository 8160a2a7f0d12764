use super::*;
use std::io::BufReader;

const PLACES: &str = r#"[
    {"id": 1, "Name": "depot", "Opens": "08:00", "Closes": "20:00"},
    {"id": 2, "Name": "market", "Opens": "09:30", "Closes": "17:00", "reward": 4.5,
     "Latitude": 52.52, "Longitude": 13.40},
    {"id": 3, "Opens": "10:00", "Closes": "16:15"}
]"#;

const TRAVEL_TIMES: &str = r#"{
    "1": {"2": {"walking": 600, "transit": 300}, "3": {"walking": 930}},
    "2": {"1": {"walking": 660}, "3": {"transit": 120}},
    "3": {"1": {"walking": 890}, "2": {"walking": 45}}
}"#;

fn create_options() -> ReaderOptions {
    ReaderOptions { mode: "walking".to_string(), depot: LocationId(1), time_budget: 240., visit_duration: 30. }
}

fn read_problem(places: &str, travel_times: &str, options: &ReaderOptions) -> SolverResult<Problem> {
    read_optw_json(BufReader::new(places.as_bytes()), BufReader::new(travel_times.as_bytes()), options)
}

#[test]
fn can_read_problem_from_json_documents() {
    let problem = read_problem(PLACES, TRAVEL_TIMES, &create_options()).unwrap();

    assert_eq!(problem.size(), 3);
    assert_eq!(problem.depot_id(), LocationId(1));
    assert_eq!(problem.time_budget(), 240.);

    let depot = problem.location(problem.index().index_of(LocationId(1)).unwrap());
    assert_eq!(depot.window, TimeWindow::new(480., 1200.));
    assert_eq!(depot.visit_duration, 0.);
    assert_eq!(depot.name, "depot");

    let market = problem.location(problem.index().index_of(LocationId(2)).unwrap());
    assert_eq!(market.window, TimeWindow::new(570., 1020.));
    assert_eq!(market.visit_duration, 30.);
    assert_eq!(market.reward, 4.5);
    assert_eq!(market.coordinates, Some((52.52, 13.40)));

    // a place without a reward defaults to one, without a name to its id
    let nameless = problem.location(problem.index().index_of(LocationId(3)).unwrap());
    assert_eq!(nameless.reward, 1.);
    assert_eq!(nameless.name, "3");
    assert_eq!(nameless.window, TimeWindow::new(600., 975.));
}

#[test]
fn can_convert_travel_seconds_to_whole_minutes() {
    let problem = read_problem(PLACES, TRAVEL_TIMES, &create_options()).unwrap();

    assert_eq!(problem.travel_between(LocationId(1), LocationId(2)).unwrap(), 10.);
    // 930 and 890 seconds floor to 15 and 14 minutes: asymmetry is preserved
    assert_eq!(problem.travel_between(LocationId(1), LocationId(3)).unwrap(), 15.);
    assert_eq!(problem.travel_between(LocationId(3), LocationId(1)).unwrap(), 14.);
    // 45 seconds floor to zero
    assert_eq!(problem.travel_between(LocationId(3), LocationId(2)).unwrap(), 0.);
}

#[test]
fn can_default_missing_mode_to_zero_travel() {
    let problem = read_problem(PLACES, TRAVEL_TIMES, &create_options()).unwrap();

    // the pair 2 -> 3 only declares transit, so walking counts as zero
    assert_eq!(problem.travel_between(LocationId(2), LocationId(3)).unwrap(), 0.);
}

parameterized_test! {can_reject_malformed_time, (value,), {
    can_reject_malformed_time_impl(value);
}}

can_reject_malformed_time! {
    case_01_no_separator: ("0930",),
    case_02_non_numeric: ("9h:30",),
    case_03_minutes_overflow: ("09:75",),
}

fn can_reject_malformed_time_impl(value: &str) {
    let places = format!(r#"[{{"id": 1, "Opens": "{value}", "Closes": "20:00"}}]"#);

    let result = read_problem(&places, "{}", &create_options());

    assert!(matches!(result, Err(SolverError::InvalidInput(_))));
}

#[test]
fn can_reject_travel_times_for_unknown_locations() {
    let travel_times = r#"{"1": {"9": {"walking": 60}}}"#;

    let result = read_problem(PLACES, travel_times, &create_options());

    assert!(matches!(result, Err(SolverError::UnknownLocation(LocationId(9)))));
}

#[test]
fn can_reject_malformed_documents() {
    assert!(matches!(read_problem("not json", TRAVEL_TIMES, &create_options()), Err(SolverError::InvalidInput(_))));
    assert!(matches!(read_problem(PLACES, "not json", &create_options()), Err(SolverError::InvalidInput(_))));
}
