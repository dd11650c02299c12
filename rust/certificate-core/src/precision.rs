//! Optional high-precision numeric capability.
//!
//! Engines never require this backend. They take a `&dyn PrecisionProvider`
//! for their cross-check branches and report [`CrossCheck::Unavailable`]
//! when the provider cannot serve a request. [`Unavailable`] is the default
//! provider. [`EulerMaclaurin`] evaluates zeta in double precision and is
//! limited to moderate heights.

use serde::{Deserialize, Serialize};

use crate::complex::{self, Complex};
use crate::error::{CertError, Result};

/// Digits a double-precision evaluation can honestly claim.
pub const DOUBLE_DIGITS: u32 = 15;

/// Injected numeric backend used by the cross-check branches.
pub trait PrecisionProvider: Send + Sync {
    /// Short identifier recorded in result payloads.
    fn name(&self) -> &'static str;

    /// Digits actually delivered when `requested` digits are asked for.
    fn effective_digits(&self, requested: u32) -> u32;

    /// Smallest finite-difference step the backend resolves.
    fn min_step(&self) -> f64;

    /// Riemann zeta at `s`.
    fn zeta(&self, s: Complex, digits: u32) -> Result<Complex>;

    /// Central-difference derivative of `f` at `s` along the real axis.
    fn derivative(
        &self,
        f: &dyn Fn(Complex) -> Result<Complex>,
        s: Complex,
        step: f64,
    ) -> Result<Complex> {
        let step = step.max(self.min_step());
        let plus = f((s.0 + step, s.1))?;
        let minus = f((s.0 - step, s.1))?;
        Ok(complex::cscale(0.5 / step, complex::csub(plus, minus)))
    }

    /// Principal argument of `z`.
    fn argument(&self, z: Complex) -> f64 {
        complex::carg(z)
    }
}

/// Provider used when no backend is configured: every request fails with
/// [`CertError::PrecisionUnavailable`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Unavailable;

impl PrecisionProvider for Unavailable {
    fn name(&self) -> &'static str {
        "unavailable"
    }

    fn effective_digits(&self, _requested: u32) -> u32 {
        0
    }

    fn min_step(&self) -> f64 {
        f64::EPSILON
    }

    fn zeta(&self, _s: Complex, _digits: u32) -> Result<Complex> {
        Err(CertError::PrecisionUnavailable(
            "no high-precision backend configured".to_string(),
        ))
    }
}

/// B_{2k} / (2k)! for k = 1..=8.
const EM_COEFFS: [f64; 8] = [
    1.0 / 12.0,
    -1.0 / 720.0,
    1.0 / 30_240.0,
    -1.0 / 1_209_600.0,
    1.0 / 47_900_160.0,
    -691.0 / 1_307_674_368_000.0,
    1.0 / 74_724_249_600.0,
    -3617.0 / 10_670_622_842_880_000.0,
];

/// Double-precision zeta via Euler-Maclaurin summation.
///
/// The direct sum needs about `|s|` terms, so requests above `max_height`
/// are refused as unavailable rather than run for hours.
#[derive(Debug, Clone, Copy)]
pub struct EulerMaclaurin {
    pub max_height: f64,
    pub min_terms: usize,
}

impl Default for EulerMaclaurin {
    fn default() -> Self {
        EulerMaclaurin {
            max_height: 1e4,
            min_terms: 32,
        }
    }
}

impl EulerMaclaurin {
    fn evaluate(&self, s: Complex) -> Complex {
        let n_terms = self.min_terms + complex::cabs(s).ceil() as usize;
        let big_n = n_terms as f64;

        let mut sum = complex::ZERO;
        for n in 1..n_terms {
            sum = complex::cadd(sum, complex::real_pow_neg(n as f64, s));
        }

        // N^{-s}, N^{1-s}/(s-1), N^{-s}/2
        let n_pow = complex::real_pow_neg(big_n, s);
        let s_minus_1 = (s.0 - 1.0, s.1);
        sum = complex::cadd(sum, complex::cdiv(complex::cscale(big_n, n_pow), s_minus_1));
        sum = complex::cadd(sum, complex::cscale(0.5, n_pow));

        // Bernoulli corrections: s(s+1)...(s+2k-2) N^{-s-2k+1}
        let mut rising = s;
        let mut n_factor = 1.0 / big_n;
        for (k, coeff) in EM_COEFFS.iter().enumerate() {
            let term = complex::cscale(coeff * n_factor, complex::cmul(rising, n_pow));
            sum = complex::cadd(sum, term);
            let j = (2 * k + 1) as f64;
            rising = complex::cmul(rising, (s.0 + j, s.1));
            rising = complex::cmul(rising, (s.0 + j + 1.0, s.1));
            n_factor /= big_n * big_n;
        }
        sum
    }
}

impl PrecisionProvider for EulerMaclaurin {
    fn name(&self) -> &'static str {
        "euler-maclaurin-f64"
    }

    fn effective_digits(&self, requested: u32) -> u32 {
        requested.min(DOUBLE_DIGITS)
    }

    fn min_step(&self) -> f64 {
        1e-5
    }

    fn zeta(&self, s: Complex, _digits: u32) -> Result<Complex> {
        if s.1.abs() > self.max_height {
            return Err(CertError::PrecisionUnavailable(format!(
                "height {:.3e} exceeds the Euler-Maclaurin limit {:.3e}",
                s.1.abs(),
                self.max_height
            )));
        }
        if (s.0 - 1.0).abs() < 1e-12 && s.1.abs() < 1e-12 {
            return Err(CertError::PrecisionUnavailable("zeta has a pole at s = 1".to_string()));
        }
        Ok(self.evaluate(s))
    }
}

/// Outcome of an optional cross-check branch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CrossCheck<T> {
    Completed {
        provider: String,
        requested_digits: u32,
        effective_digits: u32,
        result: T,
    },
    Unavailable {
        reason: String,
    },
}

impl<T> CrossCheck<T> {
    /// Fold a provider-backed computation into a cross-check record.
    ///
    /// Only [`CertError::PrecisionUnavailable`] degrades to `Unavailable`;
    /// any other error is a real input problem and is returned.
    pub fn from_result(
        provider: &dyn PrecisionProvider,
        requested_digits: u32,
        outcome: Result<T>,
    ) -> Result<Self> {
        match outcome {
            Ok(result) => Ok(CrossCheck::Completed {
                provider: provider.name().to_string(),
                requested_digits,
                effective_digits: provider.effective_digits(requested_digits),
                result,
            }),
            Err(CertError::PrecisionUnavailable(reason)) => {
                log::warn!("cross-check skipped ({}): {}", provider.name(), reason);
                Ok(CrossCheck::Unavailable { reason })
            }
            Err(e) => Err(e),
        }
    }

    pub fn completed(&self) -> Option<&T> {
        match self {
            CrossCheck::Completed { result, .. } => Some(result),
            CrossCheck::Unavailable { .. } => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, CrossCheck::Completed { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_zeta_known_values() {
        let em = EulerMaclaurin::default();
        let z2 = em.zeta((2.0, 0.0), 15).unwrap();
        assert!((z2.0 - PI * PI / 6.0).abs() < 1e-12, "zeta(2) = {}", z2.0);
        assert!(z2.1.abs() < 1e-14);

        let z4 = em.zeta((4.0, 0.0), 15).unwrap();
        assert!((z4.0 - PI.powi(4) / 90.0).abs() < 1e-12);

        // zeta(1/2) = -1.4603545088...
        let zh = em.zeta((0.5, 0.0), 15).unwrap();
        assert!((zh.0 + 1.4603545088095868).abs() < 1e-10, "zeta(1/2) = {}", zh.0);
    }

    #[test]
    fn test_zeta_first_zero() {
        // First nontrivial zero at t = 14.134725141734693...
        let em = EulerMaclaurin::default();
        let z = em.zeta((0.5, 14.134725141734693), 15).unwrap();
        assert!(complex::cabs(z) < 1e-9, "|zeta(rho_1)| = {}", complex::cabs(z));
    }

    #[test]
    fn test_zeta_derivative_at_two() {
        let em = EulerMaclaurin::default();
        let zeta = |s: Complex| em.zeta(s, 15);
        let d = em.derivative(&zeta, (2.0, 0.0), 1e-5).unwrap();
        // zeta'(2) = -0.93754825431584375...
        assert!((d.0 + 0.937_548_254_315_843_8).abs() < 1e-8, "zeta'(2) = {}", d.0);
    }

    #[test]
    fn test_height_limit_and_pole() {
        let em = EulerMaclaurin::default();
        assert!(matches!(
            em.zeta((2.0, 1e12), 15),
            Err(CertError::PrecisionUnavailable(_))
        ));
        assert!(em.zeta((1.0, 0.0), 15).is_err());
    }

    #[test]
    fn test_unavailable_provider() {
        let p = Unavailable;
        assert!(matches!(
            p.zeta((2.0, 0.0), 50),
            Err(CertError::PrecisionUnavailable(_))
        ));
        let check = CrossCheck::from_result(&p, 50, p.zeta((2.0, 0.0), 50)).unwrap();
        assert!(!check.is_available());
        assert!(check.completed().is_none());
    }

    #[test]
    fn test_cross_check_propagates_input_errors() {
        let outcome: Result<f64> = Err(CertError::InvalidHeight(0.5));
        assert!(CrossCheck::from_result(&Unavailable, 15, outcome).is_err());
    }

    #[test]
    fn test_effective_digits_clamped() {
        let em = EulerMaclaurin::default();
        assert_eq!(em.effective_digits(50), DOUBLE_DIGITS);
        assert_eq!(em.effective_digits(10), 10);
    }
}
