//! Right-edge run configuration, high-precision cross-check and the
//! serialisable report that bundles them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use certificate_core::complex::{self, Complex};
use certificate_core::{CertError, CrossCheck, PrecisionProvider, Result};

use crate::sum::{bound, BoundInterval, ReferenceCheck, REFERENCE_C_RIGHT};

/// Sieve cutoff presets, from a quick smoke run to a long one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SieveLevel {
    Quick,
    Medium,
    High,
    Ultra,
}

impl SieveLevel {
    pub fn cutoff(self) -> u64 {
        match self {
            SieveLevel::Quick => 10_000,
            SieveLevel::Medium => 1_000_000,
            SieveLevel::High => 10_000_000,
            SieveLevel::Ultra => 100_000_000,
        }
    }
}

impl FromStr for SieveLevel {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "quick" => Ok(SieveLevel::Quick),
            "medium" => Ok(SieveLevel::Medium),
            "high" => Ok(SieveLevel::High),
            "ultra" => Ok(SieveLevel::Ultra),
            other => Err(format!(
                "unknown sieve level '{}' (expected quick, medium, high or ultra)",
                other
            )),
        }
    }
}

/// Configuration for one right-edge computation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RightEdgeConfig {
    /// Sieve cutoff P.
    pub cutoff: u64,
    /// Value the interval must contain.
    pub reference: f64,
    /// Decimal digits requested from the precision provider.
    pub digits: u32,
}

impl Default for RightEdgeConfig {
    fn default() -> Self {
        RightEdgeConfig {
            cutoff: 2_000_000,
            reference: REFERENCE_C_RIGHT,
            digits: 50,
        }
    }
}

impl RightEdgeConfig {
    pub fn at_level(level: SieveLevel) -> Self {
        RightEdgeConfig {
            cutoff: level.cutoff(),
            ..RightEdgeConfig::default()
        }
    }
}

/// -zeta'(2)/zeta(2) evaluated through a precision provider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HighPrecisionValue {
    pub zeta_2: f64,
    pub zeta_prime_2: f64,
    #[serde(rename = "C_right")]
    pub c_right: f64,
    /// Finite-difference step actually used.
    pub step: f64,
}

/// Compute C_right from zeta and its derivative at s = 2.
///
/// The difference step is 10^{-digits/3}, floored at the provider's
/// resolution.
pub fn high_precision_c_right(
    provider: &dyn PrecisionProvider,
    digits: u32,
) -> Result<HighPrecisionValue> {
    let s: Complex = (2.0, 0.0);
    let step = 10f64.powi(-((digits / 3) as i32)).max(provider.min_step());

    let zeta = |z: Complex| provider.zeta(z, digits);
    let zeta_2 = zeta(s)?;
    let zeta_prime_2 = provider.derivative(&zeta, s, step)?;
    let ratio = complex::cdiv(zeta_prime_2, zeta_2);

    Ok(HighPrecisionValue {
        zeta_2: zeta_2.0,
        zeta_prime_2: zeta_prime_2.0,
        c_right: -ratio.0,
        step,
    })
}

/// Full right-edge payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RightEdgeReport {
    pub config: RightEdgeConfig,
    pub interval: BoundInterval,
    pub reference_check: ReferenceCheck,
    /// Midpoint of the interval, the value downstream engines should use.
    pub recommended_c_right: f64,
    /// Half the interval width.
    pub uncertainty: f64,
    pub high_precision: CrossCheck<HighPrecisionValue>,
    /// Whether the high-precision value falls in the interval; `None` when
    /// the cross-check did not run.
    pub high_precision_contained: Option<bool>,
}

impl RightEdgeReport {
    /// Every check that ran passed.
    pub fn is_valid(&self) -> bool {
        self.reference_check.contained && self.high_precision_contained.unwrap_or(true)
    }
}

impl fmt::Display for RightEdgeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let b = &self.interval;
        writeln!(f, "C_right = -zeta'(2)/zeta(2), P = {}", b.cutoff)?;
        writeln!(f, "  Primes used      = {}", b.prime_count)?;
        writeln!(f, "  Partial sum S(P) = {:.9}", b.partial_sum)?;
        writeln!(f, "  Tail bound       = {:.9e}", b.tail_bound)?;
        writeln!(f, "  C_right in [{:.9}, {:.9}]", b.lower, b.upper)?;
        writeln!(f, "  Interval width   = {:.9e}", b.width())?;
        writeln!(
            f,
            "  Reference {:.12}: {}",
            self.reference_check.value,
            if self.reference_check.contained { "[OK] within bounds" } else { "[FAIL] outside bounds" }
        )?;
        match &self.high_precision {
            CrossCheck::Completed {
                provider,
                effective_digits,
                result,
                ..
            } => {
                writeln!(f, "  High precision ({}, {} digits):", provider, effective_digits)?;
                writeln!(f, "    zeta(2)  = {:.15}", result.zeta_2)?;
                writeln!(f, "    zeta'(2) = {:.15}", result.zeta_prime_2)?;
                writeln!(f, "    C_right  = {:.15}", result.c_right)?;
            }
            CrossCheck::Unavailable { reason } => {
                writeln!(f, "  High precision: unavailable ({})", reason)?;
            }
        }
        write!(
            f,
            "  Use C_right ~= {:.6} +/- {:.2e}",
            self.recommended_c_right, self.uncertainty
        )
    }
}

/// Bound C_right, check the reference value and run the optional cross-check.
pub fn compute_right_edge(
    config: &RightEdgeConfig,
    provider: &dyn PrecisionProvider,
) -> Result<RightEdgeReport> {
    if !config.reference.is_finite() {
        return Err(CertError::InvalidParameter {
            name: "reference",
            value: config.reference,
        });
    }
    let interval = bound(config.cutoff)?;
    let reference_check = interval.check_reference(config.reference);

    let high_precision = CrossCheck::from_result(
        provider,
        config.digits,
        high_precision_c_right(provider, config.digits),
    )?;
    let high_precision_contained = high_precision.completed().map(|hp| {
        let inside = interval.contains(hp.c_right);
        if !inside {
            log::warn!(
                "high-precision C_right {:.15} outside [{:.12}, {:.12}]",
                hp.c_right,
                interval.lower,
                interval.upper
            );
        }
        inside
    });

    log::info!(
        "C_right in [{:.9}, {:.9}] at P={} (width {:.3e})",
        interval.lower,
        interval.upper,
        interval.cutoff,
        interval.width()
    );

    Ok(RightEdgeReport {
        config: config.clone(),
        recommended_c_right: interval.midpoint(),
        uncertainty: 0.5 * interval.width(),
        interval,
        reference_check,
        high_precision,
        high_precision_contained,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use certificate_core::{EulerMaclaurin, Unavailable};

    #[test]
    fn test_sieve_levels() {
        assert_eq!("quick".parse::<SieveLevel>().unwrap().cutoff(), 10_000);
        assert_eq!("Medium".parse::<SieveLevel>().unwrap().cutoff(), 1_000_000);
        assert!("extreme".parse::<SieveLevel>().is_err());
        assert_eq!(RightEdgeConfig::at_level(SieveLevel::High).cutoff, 10_000_000);
    }

    #[test]
    fn test_high_precision_value() {
        let hp = high_precision_c_right(&EulerMaclaurin::default(), 50).unwrap();
        assert_eq!(hp.step, 1e-5);
        assert!((hp.c_right - 0.569_960_993).abs() < 1e-8, "C_right = {}", hp.c_right);
    }

    #[test]
    fn test_report_without_backend() {
        let config = RightEdgeConfig {
            cutoff: 10_000,
            ..RightEdgeConfig::default()
        };
        let report = compute_right_edge(&config, &Unavailable).unwrap();
        assert!(!report.high_precision.is_available());
        assert_eq!(report.high_precision_contained, None);
        assert!(report.reference_check.contained);
        assert!(report.is_valid());
    }

    #[test]
    fn test_report_flags_bad_reference() {
        let config = RightEdgeConfig {
            cutoff: 10_000,
            reference: 0.6,
            ..RightEdgeConfig::default()
        };
        let report = compute_right_edge(&config, &Unavailable).unwrap();
        assert!(!report.reference_check.contained);
        assert!(!report.is_valid());
    }
}
