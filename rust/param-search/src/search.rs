//! Grid search for the smallest threshold subject to a margin floor.

use std::fmt;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use certificate_core::{ExponentTable, MethodChoice, ParameterSet, Result};
use thin_strip::{analyze_margin, compute_threshold, DerivedQuantities, MarginResult, ThresholdResult};

use crate::grid::{GridPoint, SearchConfig, SearchGrid};

/// A fully evaluated tuple.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// Position in scan order.
    pub index: usize,
    pub params: ParameterSet,
    pub derived: DerivedQuantities,
    pub margin: MarginResult,
    pub threshold: ThresholdResult,
    pub feasible: bool,
}

impl Candidate {
    pub fn log_t0(&self) -> f64 {
        self.threshold.log_t0
    }

    /// Margin percentage, with an undefined margin treated as -inf.
    pub fn margin_percent(&self) -> f64 {
        self.margin.margin_percent.unwrap_or(f64::NEG_INFINITY)
    }
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<10} {:<6.3} {:<6.3} {:<6.3} {:<10.1} {:<8.4} {:<10.2e}",
            self.params.exponent().method,
            self.params.c(),
            self.params.kappa(),
            self.params.r0(),
            self.margin_percent(),
            self.threshold.log_t0,
            self.threshold.t0
        )
    }
}

/// A grid point that failed validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rejection {
    pub index: usize,
    pub point: GridPoint,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchOutcome {
    pub config: SearchConfig,
    /// ln T the margins were compared at.
    pub log_t: f64,
    pub candidates: Vec<Candidate>,
    pub rejected: Vec<Rejection>,
    /// Feasible candidate with the smallest log T0; first in scan order on ties.
    pub best: Option<Candidate>,
}

impl SearchOutcome {
    pub fn feasible(&self) -> impl Iterator<Item = &Candidate> {
        self.candidates.iter().filter(|c| c.feasible)
    }

    pub fn feasible_count(&self) -> usize {
        self.feasible().count()
    }

    /// Up to `k` feasible candidates by increasing log T0; scan order breaks ties.
    pub fn top(&self, k: usize) -> Vec<&Candidate> {
        let mut feasible: Vec<&Candidate> = self.feasible().collect();
        feasible.sort_by(|a, b| a.log_t0().total_cmp(&b.log_t0()));
        feasible.truncate(k);
        feasible
    }
}

/// Evaluate one parameter set at a fixed ln T.
pub fn evaluate(index: usize, params: ParameterSet, log_t: f64, config: &SearchConfig) -> Result<Candidate> {
    let derived = DerivedQuantities::at_log(&params, log_t)?;
    let margin = analyze_margin(&derived, config.model, &config.thresholds);
    let threshold = compute_threshold(&params)?;
    let feasible = margin
        .margin_percent
        .map_or(false, |p| p >= config.min_margin);
    Ok(Candidate {
        index,
        params,
        derived,
        margin,
        threshold,
        feasible,
    })
}

fn evaluate_point(index: usize, point: &GridPoint, table: &ExponentTable, log_t: f64, config: &SearchConfig) -> Result<Candidate> {
    let exponent = table.resolve(&point.method)?;
    let params = ParameterSet::new(point.c, point.kappa, point.r0, exponent, config.c_right)?;
    evaluate(index, params, log_t, config)
}

/// Scan the grid and keep the feasible tuple with the smallest log T0.
///
/// Candidates are evaluated in parallel; selection runs over the results in
/// scan order, so the outcome matches a serial scan. Only an invalid margin
/// height is an error; invalid grid points are recorded as rejections.
pub fn search(grid: &SearchGrid, table: &ExponentTable, config: &SearchConfig) -> Result<SearchOutcome> {
    let log_t = config.height.log_t()?;
    let points = grid.points();

    let results: Vec<Result<Candidate>> = points
        .par_iter()
        .enumerate()
        .map(|(i, point)| evaluate_point(i, point, table, log_t, config))
        .collect();

    let mut candidates = Vec::with_capacity(results.len());
    let mut rejected = Vec::new();
    // (position in `candidates`, log T0); strict < keeps the earliest on ties
    let mut best: Option<(usize, f64)> = None;

    for (i, result) in results.into_iter().enumerate() {
        match result {
            Ok(candidate) => {
                let log_t0 = candidate.log_t0();
                if candidate.feasible && best.map_or(true, |(_, b)| log_t0 < b) {
                    best = Some((candidates.len(), log_t0));
                }
                candidates.push(candidate);
            }
            Err(e) => {
                log::debug!("rejected grid point {}: {}", i, e);
                rejected.push(Rejection {
                    index: i,
                    point: points[i].clone(),
                    reason: e.to_string(),
                });
            }
        }
    }

    if !rejected.is_empty() {
        log::warn!("{} of {} grid points rejected", rejected.len(), points.len());
    }
    let best = best.map(|(pos, _)| candidates[pos].clone());
    match &best {
        Some(b) => log::info!(
            "best of {} candidates: {} (log T0 = {:.4}, margin {:.1}%)",
            candidates.len(),
            b.params,
            b.log_t0(),
            b.margin_percent()
        ),
        None => log::warn!("no valid parameters found with margin >= {}%", config.min_margin),
    }

    Ok(SearchOutcome {
        config: config.clone(),
        log_t,
        candidates,
        rejected,
        best,
    })
}

/// Best feasible candidate for each method of the grid, searched separately.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodBest {
    pub method: MethodChoice,
    pub feasible_count: usize,
    pub best: Option<Candidate>,
}

pub fn best_per_method(grid: &SearchGrid, table: &ExponentTable, config: &SearchConfig) -> Result<Vec<MethodBest>> {
    grid.methods
        .iter()
        .map(|method| {
            let single = grid.clone().with_methods(vec![method.clone()]);
            let outcome = search(&single, table, config)?;
            Ok(MethodBest {
                method: method.clone(),
                feasible_count: outcome.feasible_count(),
                best: outcome.best,
            })
        })
        .collect()
}

/// One tuple evaluated next to the default tuple.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Probe {
    pub candidate: Candidate,
    pub baseline: Candidate,
    pub margin_change: f64,
    pub log_t0_change: f64,
}

pub fn probe(params: ParameterSet, config: &SearchConfig) -> Result<Probe> {
    let log_t = config.height.log_t()?;
    let baseline_params = ParameterSet::default().with_c_right(params.c_right())?;
    let baseline = evaluate(0, baseline_params, log_t, config)?;
    let candidate = evaluate(0, params, log_t, config)?;
    Ok(Probe {
        margin_change: candidate.margin_percent() - baseline.margin_percent(),
        log_t0_change: candidate.log_t0() - baseline.log_t0(),
        candidate,
        baseline,
    })
}
