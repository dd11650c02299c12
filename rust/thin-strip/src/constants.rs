//! Thin-strip constants and the height-dependent window quantities.
//!
//! alpha_star(R0) = exponent + R0 bounds the boundary growth slope and
//! C_thin_star(R0) = (8/R0) alpha_star controls the strip integral.

use serde::{Deserialize, Serialize};

use certificate_core::{require_positive, CertError, ParameterSet, Result};

/// `(alpha_star, C_thin_star)` for one exponent and disc radius.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThinStripConstants {
    pub exponent: f64,
    #[serde(rename = "R0")]
    pub r0: f64,
    pub alpha_star: f64,
    #[serde(rename = "C_thin_star")]
    pub c_thin_star: f64,
}

impl ThinStripConstants {
    pub fn new(exponent: f64, r0: f64) -> Result<Self> {
        require_positive("R0", r0)?;
        if !exponent.is_finite() || exponent < 0.0 {
            return Err(CertError::InvalidParameter {
                name: "exponent",
                value: exponent,
            });
        }
        let alpha_star = exponent + r0;
        Ok(ThinStripConstants {
            exponent,
            r0,
            alpha_star,
            c_thin_star: (8.0 / r0) * alpha_star,
        })
    }

    pub fn from_params(params: &ParameterSet) -> Result<Self> {
        ThinStripConstants::new(params.exponent().value, params.r0())
    }
}

/// Window height, strip width and constants at an evaluation height T.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DerivedQuantities {
    /// ln T.
    pub log_t: f64,
    /// h = c / ln T.
    pub h: f64,
    /// delta = kappa / ln T.
    pub delta: f64,
    pub alpha_star: f64,
    #[serde(rename = "C_thin_star")]
    pub c_thin_star: f64,
}

impl DerivedQuantities {
    /// Quantities at height `t`, which must exceed 1.
    pub fn at(params: &ParameterSet, t: f64) -> Result<Self> {
        if !(t > 1.0) || !t.is_finite() {
            return Err(CertError::InvalidHeight(t));
        }
        DerivedQuantities::at_log(params, t.ln())
    }

    /// Quantities at a given ln T, for models that fix ln T directly.
    pub fn at_log(params: &ParameterSet, log_t: f64) -> Result<Self> {
        if !(log_t > 0.0) || !log_t.is_finite() {
            return Err(CertError::InvalidHeight(log_t.exp()));
        }
        let constants = ThinStripConstants::from_params(params)?;
        Ok(DerivedQuantities {
            log_t,
            h: params.c() / log_t,
            delta: params.kappa() / log_t,
            alpha_star: constants.alpha_star,
            c_thin_star: constants.c_thin_star,
        })
    }

    /// T itself; infinite once ln T exceeds the f64 range.
    pub fn height(&self) -> f64 {
        self.log_t.exp()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use certificate_core::SubWeylExponent;

    #[test]
    fn test_default_constants() {
        let k = ThinStripConstants::new(27.0 / 164.0, 0.125).unwrap();
        assert!((k.alpha_star - 0.289_634_146).abs() < 1e-8, "alpha = {}", k.alpha_star);
        assert!((k.c_thin_star - 18.536_585_37).abs() < 1e-7, "C = {}", k.c_thin_star);
    }

    #[test]
    fn test_rejects_bad_radius() {
        assert_eq!(
            ThinStripConstants::new(0.16, 0.0),
            Err(CertError::InvalidParameter { name: "R0", value: 0.0 })
        );
        assert!(ThinStripConstants::new(0.16, -0.1).is_err());
        assert!(ThinStripConstants::new(f64::NAN, 0.1).is_err());
    }

    #[test]
    fn test_derived_at_height() {
        let params = ParameterSet::default();
        let d = DerivedQuantities::at(&params, 1e12).unwrap();
        let log_t = 1e12f64.ln();
        assert!((d.log_t - log_t).abs() < 1e-12);
        assert!((d.h - 0.25 / log_t).abs() < 1e-15);
        assert!((d.delta - 2.0 / log_t).abs() < 1e-15);
        assert!((d.height() / 1e12 - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_invalid_height() {
        let params = ParameterSet::default();
        assert_eq!(DerivedQuantities::at(&params, 1.0), Err(CertError::InvalidHeight(1.0)));
        assert!(DerivedQuantities::at(&params, -5.0).is_err());
        assert!(DerivedQuantities::at_log(&params, 0.0).is_err());
    }

    #[test]
    fn test_custom_exponent_flows_through() {
        let params = ParameterSet::new(0.25, 2.0, 0.1, SubWeylExponent::custom(0.1).unwrap(), 0.57)
            .unwrap();
        let d = DerivedQuantities::at_log(&params, 30.0).unwrap();
        assert!((d.alpha_star - 0.2).abs() < 1e-15);
        assert!((d.c_thin_star - 16.0).abs() < 1e-12);
    }
}
