//! Direct evaluation of Phi(t) = arg f(2 + it) - arg f(1/2 + delta + it)
//! with f(s) = (s - 1) zeta(s), through a precision provider.

use serde::{Deserialize, Serialize};

use certificate_core::complex::{self, Complex};
use certificate_core::{linspace, PrecisionProvider, Result};

use crate::envelope::{HorizontalConfig, HorizontalWindow};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericalCheck {
    pub phi_t: f64,
    pub phi_t_plus_h: f64,
    /// |Phi(T+h) - Phi(T)|.
    pub difference: f64,
    /// Largest |dPhi/dt| over the sample grid.
    pub max_derivative: f64,
    pub sample_points: usize,
}

/// Phi at one height. Arguments are principal values and are not unwrapped.
pub fn phase(provider: &dyn PrecisionProvider, delta: f64, t: f64, digits: u32) -> Result<f64> {
    let f = |s: Complex| -> Result<Complex> {
        let z = provider.zeta(s, digits)?;
        Ok(complex::cmul((s.0 - 1.0, s.1), z))
    };
    let right = f((2.0, t))?;
    let left = f((0.5 + delta, t))?;
    Ok(provider.argument(right) - provider.argument(left))
}

/// Sample-point gradient: central differences inside, one-sided at the ends.
pub fn gradient(values: &[f64], points: &[f64]) -> Vec<f64> {
    let n = values.len().min(points.len());
    if n < 2 {
        return vec![0.0; n];
    }
    (0..n)
        .map(|i| {
            let (lo, hi) = match i {
                0 => (0, 1),
                i if i == n - 1 => (n - 2, n - 1),
                i => (i - 1, i + 1),
            };
            (values[hi] - values[lo]) / (points[hi] - points[lo])
        })
        .collect()
}

/// Evaluate Phi across [T, T+h] and report its largest observed slope.
pub fn numerical_check(
    window: &HorizontalWindow,
    provider: &dyn PrecisionProvider,
    config: &HorizontalConfig,
) -> Result<NumericalCheck> {
    config.validate()?;
    let phi = |t: f64| phase(provider, window.delta, t, config.digits);

    let phi_t = phi(window.t)?;
    let phi_t_plus_h = phi(window.t + window.h)?;

    let points = linspace(window.t, window.t + window.h, config.phase_samples);
    let values = points.iter().map(|&t| phi(t)).collect::<Result<Vec<_>>>()?;
    let max_derivative = gradient(&values, &points)
        .into_iter()
        .map(f64::abs)
        .fold(0.0f64, f64::max);

    log::info!(
        "numerical phase check at T={:.3e}: |dPhi| = {:.3e}, max slope {:.3e}",
        window.t,
        (phi_t_plus_h - phi_t).abs(),
        max_derivative
    );

    Ok(NumericalCheck {
        phi_t,
        phi_t_plus_h,
        difference: (phi_t_plus_h - phi_t).abs(),
        max_derivative,
        sample_points: points.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use certificate_core::{CertError, EulerMaclaurin, Unavailable};

    #[test]
    fn test_gradient_matches_numpy() {
        let points = [0.0, 1.0, 2.0, 3.0];
        let values = [0.0, 1.0, 4.0, 9.0];
        assert_eq!(gradient(&values, &points), vec![1.0, 2.0, 4.0, 5.0]);
        assert_eq!(gradient(&[3.0], &[1.0]), vec![0.0]);
        assert!(gradient(&[], &[]).is_empty());
    }

    #[test]
    fn test_phase_at_moderate_height() {
        let w = HorizontalWindow::new(100.0, 0.25, 2.0).unwrap();
        let check = numerical_check(&w, &EulerMaclaurin::default(), &HorizontalConfig::default()).unwrap();
        assert_eq!(check.sample_points, 10);
        assert!(check.phi_t.is_finite() && check.phi_t_plus_h.is_finite());
        assert!(check.max_derivative.is_finite());
    }

    #[test]
    fn test_unavailable_provider_errors() {
        let w = HorizontalWindow::new(1e12, 0.25, 2.0).unwrap();
        match numerical_check(&w, &Unavailable, &HorizontalConfig::default()) {
            Err(CertError::PrecisionUnavailable(_)) => {}
            other => panic!("expected PrecisionUnavailable, got {:?}", other),
        }
    }

    #[test]
    fn test_single_phase_sample_rejected() {
        let w = HorizontalWindow::new(100.0, 0.25, 2.0).unwrap();
        let config = HorizontalConfig {
            phase_samples: 1,
            ..HorizontalConfig::default()
        };
        assert_eq!(
            numerical_check(&w, &EulerMaclaurin::default(), &config),
            Err(CertError::TooFewSamples { name: "phase_samples", got: 1, min: 2 })
        );
    }
}
