//! Threshold comparisons across parameter sets, exponents and disc radii.

use std::fmt;

use serde::{Deserialize, Serialize};

use certificate_core::{
    linspace, CertError, ExponentTable, MethodChoice, ParameterSet, Result, SubWeylExponent,
};

use crate::threshold::{compute_threshold, ThresholdResult};

/// A labelled parameter set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedParameterSet {
    pub name: String,
    pub params: ParameterSet,
}

/// The reference configurations: paper default, conservative, aggressive,
/// the 30%-margin tuple and the default under Bourgain's exponent.
pub fn literature_parameter_sets(table: &ExponentTable, c_right: f64) -> Result<Vec<NamedParameterSet>> {
    let sets = [
        ("Paper default", 0.25, 2.0, 0.125, "current"),
        ("Conservative", 0.30, 2.5, 0.10, "current"),
        ("Aggressive", 0.20, 1.5, 0.15, "current"),
        ("Optimal (30% margin)", 0.25, 1.0, 0.125, "current"),
        ("With Bourgain", 0.25, 2.0, 0.125, "bourgain"),
    ];
    sets.iter()
        .map(|&(name, c, kappa, r0, method)| {
            let exponent = table.resolve(&MethodChoice::Named(method.to_string()))?;
            Ok(NamedParameterSet {
                name: name.to_string(),
                params: ParameterSet::new(c, kappa, r0, exponent, c_right)?,
            })
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRow {
    pub name: String,
    pub threshold: ThresholdResult,
}

pub fn compare_parameter_sets(sets: &[NamedParameterSet]) -> Result<Vec<ComparisonRow>> {
    sets.iter()
        .map(|s| {
            Ok(ComparisonRow {
                name: s.name.clone(),
                threshold: compute_threshold(&s.params)?,
            })
        })
        .collect()
}

/// Print a comparison table in the same layout as the CLI.
pub struct ComparisonTable<'a>(pub &'a [ComparisonRow]);

impl fmt::Display for ComparisonTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:<25} {:<6} {:<6} {:<6} {:<10} {:<10} {:<12}",
            "Configuration", "c", "kappa", "R0", "Method", "log T0", "T0"
        )?;
        write!(f, "{}", "-".repeat(85))?;
        for row in self.0 {
            let p = &row.threshold.inputs;
            write!(
                f,
                "\n{:<25} {:<6.2} {:<6.1} {:<6.3} {:<10} {:<10.4} {:<12.2e}",
                row.name,
                p.c(),
                p.kappa(),
                p.r0(),
                p.exponent().method,
                row.threshold.log_t0,
                row.threshold.t0
            )?;
        }
        Ok(())
    }
}

/// Threshold for one exponent at a fixed `(c, kappa, R0)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExponentImpact {
    pub name: String,
    pub exponent: f64,
    #[serde(rename = "C_thin_star")]
    pub c_thin_star: f64,
    #[serde(rename = "log_T0")]
    pub log_t0: f64,
    #[serde(rename = "T0")]
    pub t0: f64,
}

/// The table's exponents plus the hypothetical 1/7 and near-optimal 1/10.
pub fn impact_exponents(table: &ExponentTable) -> Vec<(String, f64)> {
    let mut out: Vec<(String, f64)> = table
        .entries()
        .iter()
        .map(|e| (format!("{} ({}/{})", e.name, e.numerator, e.denominator), e.value()))
        .collect();
    out.push(("hypothetical (1/7)".to_string(), 1.0 / 7.0));
    out.push(("near-optimal (1/10)".to_string(), 1.0 / 10.0));
    out
}

/// Re-run the threshold with each exponent substituted into `base`.
pub fn exponent_impact(base: &ParameterSet, exponents: &[(String, f64)]) -> Result<Vec<ExponentImpact>> {
    exponents
        .iter()
        .map(|(name, value)| {
            let exponent = SubWeylExponent::custom(*value)?;
            let params = ParameterSet::new(base.c(), base.kappa(), base.r0(), exponent, base.c_right())?;
            let t = compute_threshold(&params)?;
            Ok(ExponentImpact {
                name: name.clone(),
                exponent: *value,
                c_thin_star: t.constants.c_thin_star,
                log_t0: t.log_t0,
                t0: t.t0,
            })
        })
        .collect()
}

/// Disc radius values scanned by [`r0_sweep`] by default.
pub fn default_r0_values() -> Vec<f64> {
    linspace(0.05, 0.5, 100)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct R0Sweep {
    /// `(R0, log T0)` in scan order.
    pub points: Vec<(f64, f64)>,
    pub best_r0: f64,
    pub best_log_t0: f64,
    /// best log T0 minus log T0 at the base radius.
    pub improvement: f64,
}

/// Scan R0 with everything else fixed. The first minimum wins ties.
pub fn r0_sweep(base: &ParameterSet, r0_values: &[f64]) -> Result<R0Sweep> {
    let base_log_t0 = compute_threshold(base)?.log_t0;
    let mut points = Vec::with_capacity(r0_values.len());
    let mut best: Option<(f64, f64)> = None;

    for &r0 in r0_values {
        let params = ParameterSet::new(base.c(), base.kappa(), r0, base.exponent().clone(), base.c_right())?;
        let log_t0 = compute_threshold(&params)?.log_t0;
        points.push((r0, log_t0));
        if best.map_or(true, |(_, b)| log_t0 < b) {
            best = Some((r0, log_t0));
        }
    }

    let (best_r0, best_log_t0) = best.ok_or(CertError::InvalidParameter {
        name: "R0 grid size",
        value: 0.0,
    })?;
    Ok(R0Sweep {
        points,
        best_r0,
        best_log_t0,
        improvement: best_log_t0 - base_log_t0,
    })
}

/// Change in log T0 from a 10% increase of one input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sensitivity {
    pub parameter: String,
    #[serde(rename = "log_T0")]
    pub log_t0: f64,
    pub change: f64,
    pub percent: f64,
}

pub fn sensitivity(base: &ParameterSet) -> Result<Vec<Sensitivity>> {
    let base_log_t0 = compute_threshold(base)?.log_t0;
    let (c, kappa, r0, e) = (base.c(), base.kappa(), base.r0(), base.exponent().value);
    let bumped = [
        ("c", c * 1.1, kappa, r0, e),
        ("kappa", c, kappa * 1.1, r0, e),
        ("R0", c, kappa, r0 * 1.1, e),
        ("exponent", c, kappa, r0, e * 1.1),
    ];
    bumped
        .iter()
        .map(|&(name, c, kappa, r0, e)| {
            let params = ParameterSet::new(c, kappa, r0, SubWeylExponent::custom(e)?, base.c_right())?;
            let log_t0 = compute_threshold(&params)?.log_t0;
            let change = log_t0 - base_log_t0;
            Ok(Sensitivity {
                parameter: name.to_string(),
                log_t0,
                change,
                percent: 100.0 * change / base_log_t0,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literature_sets() {
        let sets = literature_parameter_sets(&ExponentTable::standard(), 0.569961).unwrap();
        assert_eq!(sets.len(), 5);
        assert_eq!(sets[4].params.exponent().method, "bourgain");
        let rows = compare_parameter_sets(&sets).unwrap();
        // Bourgain's smaller exponent lowers the default threshold.
        assert!(rows[4].threshold.log_t0 < rows[0].threshold.log_t0);
        // kappa = 1 roughly halves it.
        assert!(rows[3].threshold.log_t0 < 0.55 * rows[0].threshold.log_t0);
        let table = ComparisonTable(&rows).to_string();
        assert!(table.contains("With Bourgain"));
    }

    #[test]
    fn test_unknown_method_in_table() {
        let table = ExponentTable::empty().with_entry("current", 27, 164).unwrap();
        assert_eq!(
            literature_parameter_sets(&table, 0.57).unwrap_err(),
            CertError::UnknownMethod("bourgain".to_string())
        );
    }

    #[test]
    fn test_exponent_impact_ordering() {
        let exps = impact_exponents(&ExponentTable::standard());
        assert_eq!(exps.len(), 6);
        let rows = exponent_impact(&ParameterSet::default(), &exps).unwrap();
        let near_optimal = rows.last().unwrap();
        assert!(rows.iter().all(|r| r.log_t0 >= near_optimal.log_t0));
        assert!((rows[0].c_thin_star - 18.5366).abs() < 1e-3);
    }

    #[test]
    fn test_r0_sweep_prefers_large_radius() {
        let values = default_r0_values();
        let sweep = r0_sweep(&ParameterSet::default(), &values).unwrap();
        assert_eq!(sweep.points.len(), 100);
        // log T0 decreases in R0 since C_thin_star = 8 + 8 exponent / R0.
        assert_eq!(sweep.best_r0, 0.5);
        assert!(sweep.improvement < 0.0);
        assert!(r0_sweep(&ParameterSet::default(), &[]).is_err());
    }

    #[test]
    fn test_sensitivity_signs() {
        let rows = sensitivity(&ParameterSet::default()).unwrap();
        let by_name = |n: &str| rows.iter().find(|r| r.parameter == n).unwrap().change;
        assert!(by_name("c") > 0.0);
        assert!(by_name("kappa") > 0.0);
        assert!(by_name("R0") < 0.0);
        assert!(by_name("exponent") > 0.0);
        // log T0 is linear in c
        assert!((rows[0].percent - 10.0).abs() < 1e-9);
    }
}
