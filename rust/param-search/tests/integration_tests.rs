//! Integration tests for the parameter search.

use certificate_core::{ExponentTable, MethodChoice};
use param_search::{best_per_method, search, SearchConfig, SearchGrid};

fn scenario_grid() -> SearchGrid {
    // contains (0.25, 2.0, 0.125) and (0.35, 0.8, 0.10)
    SearchGrid {
        methods: vec![MethodChoice::current()],
        c_values: vec![0.25, 0.35],
        kappa_values: vec![0.8, 2.0],
        r0_values: vec![0.10, 0.125],
    }
}

#[test]
fn test_best_is_feasible_minimum() {
    let outcome = search(&scenario_grid(), &ExponentTable::standard(), &SearchConfig::default()).unwrap();
    assert_eq!(outcome.candidates.len(), 8);
    assert!(outcome.rejected.is_empty());

    let best = outcome.best.as_ref().expect("grid has feasible tuples");
    assert!(best.feasible);
    assert!(best.margin_percent() >= 25.0);
    for c in outcome.feasible() {
        assert!(best.log_t0() <= c.log_t0(), "{} beats the reported best", c.params);
    }
    assert_eq!((best.params.c(), best.params.kappa(), best.params.r0()), (0.35, 0.8, 0.125));

    // the default tuple is evaluated but infeasible at a 25% floor
    let default = outcome
        .candidates
        .iter()
        .find(|c| c.params.c() == 0.25 && c.params.kappa() == 2.0 && c.params.r0() == 0.125)
        .unwrap();
    assert!(!default.feasible);

    let tuned = outcome
        .candidates
        .iter()
        .find(|c| c.params.c() == 0.35 && c.params.kappa() == 0.8 && c.params.r0() == 0.10)
        .unwrap();
    assert!(tuned.feasible);
    assert!(tuned.log_t0() < default.log_t0());
}

#[test]
fn test_parallel_matches_scan_order() {
    let outcome = search(&SearchGrid::quick(), &ExponentTable::standard(), &SearchConfig::default()).unwrap();
    let indices: Vec<usize> = outcome.candidates.iter().map(|c| c.index).collect();
    let expected: Vec<usize> = (0..indices.len()).collect();
    assert_eq!(indices, expected);
}

#[test]
fn test_ties_keep_first_in_scan_order() {
    let grid = SearchGrid {
        methods: vec![MethodChoice::current()],
        c_values: vec![0.35, 0.35],
        kappa_values: vec![0.8],
        r0_values: vec![0.10],
    };
    let outcome = search(&grid, &ExponentTable::standard(), &SearchConfig::default()).unwrap();
    assert_eq!(outcome.feasible_count(), 2);
    assert_eq!(outcome.best.as_ref().unwrap().index, 0);
    assert_eq!(outcome.top(2)[0].index, 0);
}

#[test]
fn test_no_feasible_tuple() {
    let config = SearchConfig {
        min_margin: 99.0,
        ..SearchConfig::default()
    };
    let outcome = search(&scenario_grid(), &ExponentTable::standard(), &config).unwrap();
    assert!(outcome.best.is_none());
    assert_eq!(outcome.feasible_count(), 0);
    assert_eq!(outcome.candidates.len(), 8);
}

#[test]
fn test_invalid_points_are_skipped() {
    let grid = SearchGrid {
        methods: vec![MethodChoice::current(), MethodChoice::Named("vinogradov".into())],
        c_values: vec![0.35],
        kappa_values: vec![0.8],
        r0_values: vec![-0.1, 0.0, 0.10],
    };
    let outcome = search(&grid, &ExponentTable::standard(), &SearchConfig::default()).unwrap();
    assert_eq!(outcome.candidates.len(), 1);
    assert_eq!(outcome.rejected.len(), 5);
    assert!(outcome.rejected.iter().any(|r| r.reason.contains("vinogradov")));
    assert!(outcome.rejected.iter().any(|r| r.reason.contains("R0")));
    assert_eq!(outcome.best.as_ref().unwrap().index, 2);
}

#[test]
fn test_best_per_method() {
    let grid = SearchGrid {
        methods: vec![MethodChoice::current(), MethodChoice::Named("bourgain".into())],
        ..scenario_grid()
    };
    let rows = best_per_method(&grid, &ExponentTable::standard(), &SearchConfig::default()).unwrap();
    assert_eq!(rows.len(), 2);
    let current = rows[0].best.as_ref().unwrap();
    let bourgain = rows[1].best.as_ref().unwrap();
    assert_eq!(bourgain.params.exponent().method, "bourgain");
    assert!(bourgain.log_t0() < current.log_t0());
}

#[test]
fn test_outcome_json() {
    let outcome = search(&scenario_grid(), &ExponentTable::standard(), &SearchConfig::default()).unwrap();
    let json = serde_json::to_value(&outcome).unwrap();
    assert_eq!(json["config"]["min_margin"], 25.0);
    assert!(json["best"]["threshold"]["log_T0"].is_number());
    assert_eq!(json["best"]["margin"]["status"], "OK");
    assert!(json["candidates"].as_array().unwrap().len() == 8);
}
