//! Derivative envelope for the phase change along a horizontal segment.
//!
//! |Phi(T+h) - Phi(T)| is bounded by h times the largest estimate of
//! |d/dt (f'/f)(sigma + it)| over sigma in [1/2 + delta, 2], t in [T, T+h].

use std::f64::consts::PI;
use std::fmt;

use serde::{Deserialize, Serialize};

use certificate_core::{linspace, require_positive, require_samples, CertError, Result};

use crate::stirling::log_gamma_derivative;

/// Window at height T: h = c / ln T, delta = kappa / ln T.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HorizontalWindow {
    #[serde(rename = "T")]
    pub t: f64,
    pub c: f64,
    pub kappa: f64,
    pub h: f64,
    pub delta: f64,
}

impl HorizontalWindow {
    pub fn new(t: f64, c: f64, kappa: f64) -> Result<Self> {
        if !(t > 1.0) || !t.is_finite() {
            return Err(CertError::InvalidHeight(t));
        }
        require_positive("c", c)?;
        require_positive("kappa", kappa)?;
        let log_t = t.ln();
        Ok(HorizontalWindow {
            t,
            c,
            kappa,
            h: c / log_t,
            delta: kappa / log_t,
        })
    }
}

/// Sampling used by the envelope and the numerical check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HorizontalConfig {
    /// sigma samples between 1/2 + delta and 2.
    pub sigma_samples: usize,
    /// t samples across [T, T+h] for the numerical check.
    pub phase_samples: usize,
    /// Digits requested from the precision provider.
    pub digits: u32,
}

impl HorizontalConfig {
    /// Both grids need their two endpoints: a single sigma misses the
    /// right half of the strip and a single t has no slope.
    pub fn validate(&self) -> Result<()> {
        require_samples("sigma_samples", self.sigma_samples, 2)?;
        require_samples("phase_samples", self.phase_samples, 2)?;
        Ok(())
    }
}

impl Default for HorizontalConfig {
    fn default() -> Self {
        HorizontalConfig {
            sigma_samples: 20,
            phase_samples: 10,
            digits: 50,
        }
    }
}

/// Estimate of |d/dt (f'/f)(sigma + it)| for f(s) = (s - 1) zeta(s).
///
/// Dirichlet-series bound 2/sigma^2 right of 3/2, functional-equation
/// estimate left of 3/4, linear blend in between.
pub fn derivative_bound(sigma: f64, t: f64) -> f64 {
    if sigma > 1.5 {
        return 2.0 / (sigma * sigma);
    }
    let reflected = log_gamma_derivative(0.5 - sigma, t);
    if sigma < 0.75 {
        return reflected.abs() + 1.0 / t.abs();
    }
    let w = (sigma - 0.75) / 0.75;
    (1.0 - w) * (reflected + 1.0 / t.abs()).abs() + w * 2.0 / (sigma * sigma)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HorizontalStatus {
    Controlled,
    Warning,
}

impl fmt::Display for HorizontalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HorizontalStatus::Controlled => f.write_str("CONTROLLED"),
            HorizontalStatus::Warning => f.write_str("WARNING"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvelopeBound {
    pub max_derivative: f64,
    /// h * max_derivative.
    pub envelope_bound: f64,
    /// max_derivative * T.
    #[serde(rename = "C_horiz")]
    pub c_horiz: f64,
    /// C_horiz * h / T.
    pub refined_bound: f64,
    pub bound_over_pi: f64,
    pub status: HorizontalStatus,
}

/// Maximise the derivative estimate over the sigma grid at t = T, T+h/2, T+h.
pub fn envelope(window: &HorizontalWindow, config: &HorizontalConfig) -> Result<EnvelopeBound> {
    config.validate()?;
    let sigmas = linspace(0.5 + window.delta, 2.0, config.sigma_samples);
    let heights = [window.t, window.t + window.h / 2.0, window.t + window.h];

    let max_derivative = heights
        .iter()
        .flat_map(|&t| sigmas.iter().map(move |&sigma| derivative_bound(sigma, t)))
        .fold(0.0f64, f64::max);

    let c_horiz = max_derivative * window.t;
    let refined_bound = c_horiz * window.h / window.t;
    let status = if refined_bound < PI / 2.0 {
        HorizontalStatus::Controlled
    } else {
        log::warn!(
            "horizontal bound {:.6e} >= pi/2 at T={:.2e}",
            refined_bound,
            window.t
        );
        HorizontalStatus::Warning
    };

    Ok(EnvelopeBound {
        max_derivative,
        envelope_bound: window.h * max_derivative,
        c_horiz,
        refined_bound,
        bound_over_pi: refined_bound / PI,
        status,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_validation() {
        assert_eq!(HorizontalWindow::new(1.0, 0.25, 2.0), Err(CertError::InvalidHeight(1.0)));
        assert!(matches!(
            HorizontalWindow::new(1e12, 0.0, 2.0),
            Err(CertError::InvalidParameter { name: "c", .. })
        ));
        assert!(matches!(
            HorizontalWindow::new(1e12, 0.25, -2.0),
            Err(CertError::InvalidParameter { name: "kappa", .. })
        ));
        let w = HorizontalWindow::new(1e12, 0.25, 2.0).unwrap();
        assert!((w.h - 0.25 / 1e12f64.ln()).abs() < 1e-16);
    }

    #[test]
    fn test_derivative_regions() {
        let t = 1e12;
        assert_eq!(derivative_bound(2.0, t), 0.5);
        assert!((derivative_bound(1.6, t) - 2.0 / 2.56).abs() < 1e-15);
        let left = derivative_bound(0.6, t);
        assert!((left - (t.ln() + 1.0 / t)).abs() < 1e-12);
        // blend endpoint at sigma = 3/4 matches the left estimate
        let at_edge = derivative_bound(0.75, t);
        assert!((at_edge - log_gamma_derivative(-0.25, t) - 1.0 / t).abs() < 1e-12);
        let mid = derivative_bound(1.125, t);
        assert!(mid < at_edge && mid > 2.0 / (1.125 * 1.125));
    }

    #[test]
    fn test_envelope_default_window() {
        let w = HorizontalWindow::new(1e12, 0.25, 2.0).unwrap();
        let env = envelope(&w, &HorizontalConfig::default()).unwrap();
        assert!((env.max_derivative - (w.t + w.h).ln()).abs() < 1e-9);
        assert!((env.refined_bound - 0.25).abs() < 1e-9);
        assert!((env.envelope_bound - env.refined_bound).abs() < 1e-12);
        assert_eq!(env.status, HorizontalStatus::Controlled);
    }

    #[test]
    fn test_large_c_warns() {
        let w = HorizontalWindow::new(1e12, 2.0, 2.0).unwrap();
        let env = envelope(&w, &HorizontalConfig::default()).unwrap();
        assert_eq!(env.status, HorizontalStatus::Warning);
    }

    #[test]
    fn test_degenerate_sigma_grid_rejected() {
        let w = HorizontalWindow::new(1e12, 200.0, 2.0).unwrap();
        for n in [0, 1] {
            let config = HorizontalConfig {
                sigma_samples: n,
                ..HorizontalConfig::default()
            };
            assert_eq!(
                envelope(&w, &config),
                Err(CertError::TooFewSamples { name: "sigma_samples", got: n, min: 2 })
            );
        }
        let two = HorizontalConfig {
            sigma_samples: 2,
            ..HorizontalConfig::default()
        };
        assert_eq!(envelope(&w, &two).unwrap().status, HorizontalStatus::Warning);
    }
}
