//! Threshold height T0 above which the certificate bound stays below pi/2.
//!
//! The window bound is (c / ln T)(C_right + kappa C_thin_star); setting it
//! to pi/2 gives ln T0 = (2c/pi)(C_right + kappa C_thin_star).

use std::f64::consts::PI;
use std::fmt;

use serde::{Deserialize, Serialize};

use certificate_core::{require_positive, CertError, ParameterSet, Result};

use crate::constants::ThinStripConstants;

/// Height up to which zeros have been verified numerically.
pub const VERIFIED_HEIGHT: f64 = 2.4e12;

/// Slack allowed on bound/pi = 1/2 at the threshold, where equality holds
/// algebraically.
pub const SELF_CONSISTENCY_TOLERANCE: f64 = 1e-12;

/// ln T0 from the raw constants.
pub fn log_threshold(c: f64, kappa: f64, c_right: f64, c_thin_star: f64) -> Result<f64> {
    require_positive("c", c)?;
    require_positive("kappa", kappa)?;
    let total = c_right + kappa * c_thin_star;
    if !(total > 0.0) {
        return Err(CertError::DegenerateThreshold(total));
    }
    Ok((2.0 * c / PI) * total)
}

/// Threshold and the window diagnostics at T0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdResult {
    pub inputs: ParameterSet,
    pub constants: ThinStripConstants,
    #[serde(rename = "log_T0")]
    pub log_t0: f64,
    #[serde(rename = "T0")]
    pub t0: f64,
    /// Window height c / ln T0.
    pub h: f64,
    /// Strip width kappa / ln T0.
    pub delta: f64,
    pub bound_at_threshold: f64,
    pub bound_over_pi: f64,
    /// Bound at `log_t0` recomputed from the inputs stays at or below pi/2.
    /// Equality holds algebraically, so this only trips when `log_t0` and the
    /// bound formula disagree.
    pub self_consistent: bool,
}

/// How T0 compares with the numerically verified height.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coverage {
    pub verified_height: f64,
    pub covered: bool,
    /// T* / T0; above 1 when covered.
    pub safety_factor: f64,
}

impl ThresholdResult {
    /// Window bound (c / ln T)(C_right + kappa C_thin_star) at a height above T0.
    pub fn bound_at_height(&self, log_t: f64) -> Result<f64> {
        if !(log_t > 0.0) || !log_t.is_finite() {
            return Err(CertError::InvalidHeight(log_t.exp()));
        }
        let total = self.inputs.c_right() + self.inputs.kappa() * self.constants.c_thin_star;
        Ok(self.inputs.c() / log_t * total)
    }

    /// Re-evaluate the window bound at the stored `log_t0`.
    pub fn check_self_consistency(&self) -> bool {
        self.bound_at_height(self.log_t0)
            .map_or(false, |bound| bound / PI <= 0.5 + SELF_CONSISTENCY_TOLERANCE)
    }

    pub fn coverage(&self, verified_height: f64) -> Coverage {
        let covered = self.t0 < verified_height;
        if !covered {
            log::warn!(
                "T0 = {:.3e} is not below the verified height {:.3e}",
                self.t0,
                verified_height
            );
        }
        Coverage {
            verified_height,
            covered,
            safety_factor: verified_height / self.t0,
        }
    }
}

impl fmt::Display for ThresholdResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Threshold ({})", self.inputs)?;
        writeln!(f, "  C_thin*  = {:.6}", self.constants.c_thin_star)?;
        writeln!(f, "  log T0   = {:.6}", self.log_t0)?;
        writeln!(f, "  T0       = {:.3e}", self.t0)?;
        writeln!(f, "  h(T0)    = {:.6}", self.h)?;
        writeln!(f, "  delta    = {:.6}", self.delta)?;
        writeln!(f, "  Bound    = {:.6}", self.bound_at_threshold)?;
        write!(
            f,
            "  Bound/pi = {:.4} (must be < 0.5) {}",
            self.bound_over_pi,
            if self.self_consistent { "[OK]" } else { "[FAIL]" }
        )
    }
}

/// Compute T0 for a validated parameter set.
pub fn compute_threshold(params: &ParameterSet) -> Result<ThresholdResult> {
    let constants = ThinStripConstants::from_params(params)?;
    threshold_with_constants(params, constants)
}

/// Compute T0 with an explicitly supplied C_thin_star in place of the
/// exponent-derived one.
pub fn compute_threshold_with_c_thin(params: &ParameterSet, c_thin_star: f64) -> Result<ThresholdResult> {
    require_positive("C_thin_star", c_thin_star)?;
    let mut constants = ThinStripConstants::from_params(params)?;
    constants.c_thin_star = c_thin_star;
    threshold_with_constants(params, constants)
}

fn threshold_with_constants(
    params: &ParameterSet,
    constants: ThinStripConstants,
) -> Result<ThresholdResult> {
    let log_t0 = log_threshold(params.c(), params.kappa(), params.c_right(), constants.c_thin_star)?;
    let h = params.c() / log_t0;
    let delta = params.kappa() / log_t0;
    let bound = h * (params.c_right() + params.kappa() * constants.c_thin_star);
    log::debug!("log T0 = {:.6} for {}", log_t0, params);

    let mut result = ThresholdResult {
        inputs: params.clone(),
        constants,
        log_t0,
        t0: log_t0.exp(),
        h,
        delta,
        bound_at_threshold: bound,
        bound_over_pi: bound / PI,
        self_consistent: false,
    };
    result.self_consistent = result.check_self_consistency();
    if !result.self_consistent {
        log::warn!("bound/pi = {:.15} exceeds 1/2 at T0", result.bound_over_pi);
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use certificate_core::SubWeylExponent;

    fn params(c: f64, kappa: f64, r0: f64) -> ParameterSet {
        ParameterSet::new(c, kappa, r0, SubWeylExponent::current(), 0.569961).unwrap()
    }

    #[test]
    fn test_default_threshold() {
        let t = compute_threshold(&ParameterSet::default()).unwrap();
        assert!((t.log_t0 - 5.991).abs() < 1e-3, "log T0 = {}", t.log_t0);
        assert!((t.bound_at_threshold - PI / 2.0).abs() < 1e-12);
        assert!(t.self_consistent);
    }

    #[test]
    fn test_monotone_in_c_and_kappa() {
        let base = compute_threshold(&params(0.25, 2.0, 0.125)).unwrap().log_t0;
        assert!(compute_threshold(&params(0.30, 2.0, 0.125)).unwrap().log_t0 > base);
        assert!(compute_threshold(&params(0.25, 2.5, 0.125)).unwrap().log_t0 > base);
    }

    #[test]
    fn test_monotone_in_c_thin() {
        let p = params(0.25, 2.0, 0.125);
        let a = compute_threshold_with_c_thin(&p, 10.0).unwrap().log_t0;
        let b = compute_threshold_with_c_thin(&p, 20.0).unwrap().log_t0;
        assert!(b > a);
    }

    #[test]
    fn test_degenerate_threshold() {
        let p = ParameterSet::new(0.25, 1.0, 0.125, SubWeylExponent::current(), -100.0).unwrap();
        match compute_threshold(&p) {
            Err(CertError::DegenerateThreshold(total)) => assert!(total < 0.0),
            other => panic!("expected DegenerateThreshold, got {:?}", other),
        }
    }

    #[test]
    fn test_log_threshold_rejects_nonpositive() {
        assert!(matches!(
            log_threshold(0.0, 2.0, 0.57, 18.5),
            Err(CertError::InvalidParameter { name: "c", .. })
        ));
        assert!(matches!(
            log_threshold(0.25, -1.0, 0.57, 18.5),
            Err(CertError::InvalidParameter { name: "kappa", .. })
        ));
    }

    #[test]
    fn test_coverage_and_bound_above_threshold() {
        let t = compute_threshold(&ParameterSet::default()).unwrap();
        let cov = t.coverage(VERIFIED_HEIGHT);
        assert!(cov.covered);
        assert!((cov.safety_factor - VERIFIED_HEIGHT / t.t0).abs() < 1e-3);
        let above = t.bound_at_height(2.0 * t.log_t0).unwrap();
        assert!((above - PI / 4.0).abs() < 1e-12);
        assert!(t.bound_at_height(0.0).is_err());
    }

    #[test]
    fn test_self_consistency_detects_drift() {
        let t = compute_threshold(&params(0.35, 0.8, 0.10)).unwrap();
        assert!(t.check_self_consistency());

        // a threshold 1% too low puts the bound above pi/2
        let mut low = t.clone();
        low.log_t0 *= 0.99;
        assert!(!low.check_self_consistency());

        let mut high = t;
        high.log_t0 *= 1.01;
        assert!(high.check_self_consistency());
    }
}
