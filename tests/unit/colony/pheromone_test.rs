use super::*;
use crate::helpers::{create_test_config, create_triangle_problem};
use crate::models::Problem;

fn create_store(config: ColonyConfig) -> (Problem, PheromoneHandle) {
    let problem = create_triangle_problem();
    let matrix = PheromoneMatrix::new(problem.index().clone(), config.initial_pheromone).unwrap();
    let handle = PheromoneHandle::new(matrix, Arc::new(config));

    (problem, handle)
}

fn create_tour(problem: &Problem, visits: &[u64]) -> Tour {
    let visits = visits.iter().map(|&id| LocationId(id)).collect::<Vec<_>>();
    Tour::evaluate(problem, &visits).unwrap()
}

#[test]
fn can_reject_non_positive_initial_level() {
    let problem = create_triangle_problem();

    for initial in [0., -1., Float::NAN] {
        assert!(matches!(
            PheromoneMatrix::new(problem.index().clone(), initial),
            Err(SolverError::InvalidConfig(_))
        ));
    }
}

#[test]
fn can_evaporate_with_floor() {
    let problem = create_triangle_problem();
    let mut matrix = PheromoneMatrix::new(problem.index().clone(), 1.).unwrap();

    matrix.evaporate(0.1);
    assert_eq!(matrix.get(LocationId(0), LocationId(1)).unwrap(), 0.9);

    let mut floored = PheromoneMatrix::new(problem.index().clone(), MIN_PHEROMONE).unwrap();
    floored.evaporate(0.5);
    assert_eq!(floored.get(LocationId(0), LocationId(1)).unwrap(), MIN_PHEROMONE);
}

#[test]
fn can_deposit_on_directed_tour_edges_only() {
    let problem = create_triangle_problem();
    let mut matrix = PheromoneMatrix::new(problem.index().clone(), 1.).unwrap();
    let tour = create_tour(&problem, &[1]);

    matrix.deposit(&tour, 0.5).unwrap();

    assert_eq!(matrix.get(LocationId(0), LocationId(1)).unwrap(), 1.5);
    assert_eq!(matrix.get(LocationId(1), LocationId(0)).unwrap(), 1.5);
    assert_eq!(matrix.get(LocationId(0), LocationId(2)).unwrap(), 1.);
    assert_eq!(matrix.get(LocationId(1), LocationId(2)).unwrap(), 1.);
}

#[tokio::test]
async fn can_answer_queries_with_correlation_id() {
    let (_, handle) = create_store(create_test_config());

    let reply = handle.query(QueryId(7), IterationId(0), LocationId(0), LocationId(1)).await.unwrap();

    assert_eq!(reply.query, QueryId(7));
    assert_eq!(reply.value, 1.);
}

#[tokio::test]
async fn can_fail_queries_for_unknown_locations() {
    let (_, handle) = create_store(create_test_config());

    let result = handle.query(QueryId(1), IterationId(0), LocationId(0), LocationId(42)).await;

    assert!(matches!(result, Err(SolverError::UnknownLocation(LocationId(42)))));
}

#[tokio::test]
async fn can_fence_deposits_by_iteration_id() {
    let (problem, handle) = create_store(create_test_config());
    let tour = create_tour(&problem, &[1]);

    let stale = handle.submit(IterationId(5), WorkerId(0), tour.clone()).await.unwrap();
    assert!(matches!(stale, DepositOutcome::Stale { current: IterationId(0) }));

    let accepted = handle.submit(IterationId(0), WorkerId(0), tour).await.unwrap();
    assert!(matches!(accepted, DepositOutcome::Accepted));
}

#[tokio::test]
async fn can_reject_advance_of_not_open_iteration() {
    let (_, handle) = create_store(create_test_config());

    let result = handle.advance(IterationId(3)).await;

    assert!(matches!(
        result,
        Err(SolverError::IterationNotOpen { requested: IterationId(3), current: IterationId(0) })
    ));
}

#[tokio::test]
async fn can_evaporate_exactly_on_empty_iteration() {
    let (_, handle) = create_store(create_test_config());

    let summary = handle.advance(IterationId(0)).await.unwrap();

    assert_eq!(summary.closed, IterationId(0));
    assert_eq!(summary.tours_used, 0);
    assert_eq!(summary.best_reward, None);
    assert!(!summary.improved);

    let snapshot = handle.snapshot().await.unwrap();
    for (_, _, value) in snapshot.entries() {
        assert!((value - 0.9).abs() < 1e-12);
    }
}

#[tokio::test]
async fn can_reflect_deposit_in_subsequent_query() {
    let (problem, handle) = create_store(create_test_config());
    let tour = create_tour(&problem, &[1]);
    let expected = 0.9 + 1. * tour.reward() / tour.cost();

    handle.submit(IterationId(0), WorkerId(0), tour).await.unwrap();
    handle.advance(IterationId(0)).await.unwrap();

    let reply = handle.query(QueryId(1), IterationId(1), LocationId(0), LocationId(1)).await.unwrap();
    assert!((reply.value - expected).abs() < 1e-12);

    // an edge no accepted tour used only evaporated
    let untouched = handle.query(QueryId(2), IterationId(1), LocationId(2), LocationId(3)).await.unwrap();
    assert!((untouched.value - 0.9).abs() < 1e-12);
}

#[tokio::test]
async fn can_reject_straggler_deposit_after_advance() {
    let (problem, handle) = create_store(create_test_config());
    let tour = create_tour(&problem, &[1]);

    handle.advance(IterationId(0)).await.unwrap();

    // a slow depositor still tagged with the closed iteration must be dropped
    let outcome = handle.submit(IterationId(0), WorkerId(0), tour.clone()).await.unwrap();
    assert!(matches!(outcome, DepositOutcome::Stale { current: IterationId(1) }));

    let outcome = handle.submit(IterationId(1), WorkerId(0), tour).await.unwrap();
    assert!(matches!(outcome, DepositOutcome::Accepted));
}

#[tokio::test]
async fn can_replace_resubmitted_tour_instead_of_appending() {
    let (problem, handle) = create_store(create_test_config());
    let tour = create_tour(&problem, &[1]);

    // an unacknowledged deposit retried under at-least-once delivery
    handle.submit(IterationId(0), WorkerId(0), tour.clone()).await.unwrap();
    handle.submit(IterationId(0), WorkerId(0), tour).await.unwrap();

    let summary = handle.advance(IterationId(0)).await.unwrap();

    assert_eq!(summary.tours_used, 1);
}

#[tokio::test]
async fn can_track_global_best_across_iterations() {
    let (problem, handle) = create_store(create_test_config());

    handle.submit(IterationId(0), WorkerId(0), create_tour(&problem, &[1, 2, 3])).await.unwrap();
    let summary = handle.advance(IterationId(0)).await.unwrap();
    assert_eq!(summary.best_reward, Some(23.));
    assert!(summary.improved);

    handle.submit(IterationId(1), WorkerId(0), create_tour(&problem, &[2])).await.unwrap();
    let summary = handle.advance(IterationId(1)).await.unwrap();
    assert_eq!(summary.best_reward, Some(23.));
    assert!(!summary.improved);

    let best = handle.best_tour().await.unwrap().unwrap();
    assert_eq!(best.reward(), 23.);
    assert_eq!(best.visit_count(), 3);
}

#[tokio::test]
async fn can_limit_deposit_to_iteration_best() {
    let config = ColonyConfig { deposit_policy: DepositPolicy::IterationBest, ..create_test_config() };
    let (problem, handle) = create_store(config);

    handle.submit(IterationId(0), WorkerId(0), create_tour(&problem, &[1])).await.unwrap();
    handle.submit(IterationId(0), WorkerId(1), create_tour(&problem, &[2])).await.unwrap();

    let summary = handle.advance(IterationId(0)).await.unwrap();

    assert_eq!(summary.tours_used, 1);
}

#[tokio::test]
async fn can_deposit_global_best_even_without_new_tours() {
    let config = ColonyConfig { deposit_policy: DepositPolicy::GlobalBest, ..create_test_config() };
    let (problem, handle) = create_store(config);

    handle.submit(IterationId(0), WorkerId(0), create_tour(&problem, &[1])).await.unwrap();
    handle.advance(IterationId(0)).await.unwrap();

    // nothing submitted this iteration, the global best still reinforces
    let summary = handle.advance(IterationId(1)).await.unwrap();

    assert_eq!(summary.tours_used, 1);
}
