use super::*;
use crate::helpers::{create_symmetric_matrix, create_test_location, create_triangle_problem};
use crate::models::{Location, LocationId, TimeWindow};
use crate::utils::DefaultRandom;

#[test]
fn can_list_candidates_in_id_order() {
    let problem = create_triangle_problem();
    let visited = vec![true, false, false, false];

    let candidates = feasible_candidates(&problem, problem.depot(), problem.start_time(), &visited);

    let ids = candidates.iter().map(|candidate| problem.location(candidate.index).id).collect::<Vec<_>>();
    assert_eq!(ids, vec![LocationId(1), LocationId(2), LocationId(3)]);
}

#[test]
fn can_exclude_visited_locations() {
    let problem = create_triangle_problem();
    let visited = vec![true, false, true, false];

    let candidates = feasible_candidates(&problem, problem.depot(), problem.start_time(), &visited);

    assert_eq!(candidates.len(), 2);
    assert!(candidates.iter().all(|candidate| candidate.index != 2));
}

#[test]
fn can_exclude_closed_windows_and_unreturnable_moves() {
    let depot = create_test_location(0, 0.);
    // closes before the travel time of 10 can be covered
    let closed = Location { window: TimeWindow::new(0., 5.), ..create_test_location(1, 10.) };
    // reachable, but the return would overrun the budget
    let far = Location { visit_duration: 50., ..create_test_location(2, 10.) };
    let travel = create_symmetric_matrix(3, &[((0, 1), 10.), ((0, 2), 30.), ((1, 2), 10.)]);
    let problem = Problem::new(vec![depot, closed, far], travel, LocationId(0), 100.).unwrap();

    let candidates = feasible_candidates(&problem, problem.depot(), problem.start_time(), &[true, false, false]);

    assert!(candidates.is_empty());
}

#[test]
fn can_clamp_heuristic_factor_for_co_located_points() {
    let problem = create_triangle_problem();
    let candidate = Candidate { index: 1, travel: 0. };

    let factor = heuristic_factor(&problem, &candidate);

    assert!(factor.is_finite());
    assert_eq!(factor, 10. / MIN_TRAVEL_TIME);
}

#[test]
fn can_blend_pheromone_and_heuristic_guidance() {
    assert_eq!(desirability(2., 3., 1., 2.), 2. * 9.);
    assert_eq!(desirability(4., 9., 0.5, 0.5), 2. * 3.);
    // alpha zero ignores pheromone entirely
    assert_eq!(desirability(100., 3., 0., 1.), 3.);
}

#[test]
fn can_select_sole_positive_weight() {
    let candidates =
        vec![Candidate { index: 1, travel: 1. }, Candidate { index: 2, travel: 1. }, Candidate { index: 3, travel: 1. }];
    let random = DefaultRandom::new_with_seed(7);

    for _ in 0..10 {
        let choice = select_candidate(&candidates, &[0., 0., 1.], &random).unwrap();
        assert_eq!(choice.index, 3);
    }
}

#[test]
fn can_fall_back_to_first_candidate_on_degenerate_weights() {
    let candidates = vec![Candidate { index: 1, travel: 1. }, Candidate { index: 2, travel: 1. }];
    let random = DefaultRandom::new_with_seed(7);

    assert_eq!(select_candidate(&candidates, &[0., 0.], &random).unwrap().index, 1);
    assert_eq!(select_candidate(&candidates, &[Float::NAN, 1.], &random).unwrap().index, 1);
    assert!(select_candidate(&[], &[], &random).is_none());
}

#[test]
fn can_reproduce_selection_with_same_seed() {
    let candidates =
        vec![Candidate { index: 1, travel: 1. }, Candidate { index: 2, travel: 1. }, Candidate { index: 3, travel: 1. }];
    let weights = [1., 2., 3.];

    let pick_sequence = |seed: u64| {
        let random = DefaultRandom::new_with_seed(seed);
        (0..32).map(|_| select_candidate(&candidates, &weights, &random).unwrap().index).collect::<Vec<_>>()
    };

    assert_eq!(pick_sequence(42), pick_sequence(42));
}
