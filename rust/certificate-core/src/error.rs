//! Error type shared by every engine in the workspace.
//!
//! Only input-validation failures and an unavailable precision backend are
//! errors. Bound and margin violations are reported through status fields on
//! the result records instead.

/// Failure of a single bound computation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CertError {
    #[error("{name} must be positive, got {value}")]
    InvalidParameter { name: &'static str, value: f64 },

    #[error("{name} = {got} is too few samples, need at least {min}")]
    TooFewSamples {
        name: &'static str,
        got: usize,
        min: usize,
    },

    #[error("sieve cutoff P={0} is too small, a prime sum needs P >= 2")]
    SieveCutoffTooSmall(u64),

    #[error("unknown sub-Weyl method '{0}' and no custom exponent supplied")]
    UnknownMethod(String),

    #[error("unknown averaging model '{0}' (expected toy, realistic or conservative)")]
    UnknownModel(String),

    #[error("evaluation height T={0} must exceed 1")]
    InvalidHeight(f64),

    #[error("threshold is degenerate: C_right + kappa * C_thin_star = {0} <= 0")]
    DegenerateThreshold(f64),

    #[error("high-precision capability unavailable: {0}")]
    PrecisionUnavailable(String),
}

/// Convenience alias used across the workspace.
pub type Result<T> = std::result::Result<T, CertError>;

/// Reject sample counts below `min`.
pub fn require_samples(name: &'static str, got: usize, min: usize) -> Result<usize> {
    if got >= min {
        Ok(got)
    } else {
        Err(CertError::TooFewSamples { name, got, min })
    }
}

/// Reject non-positive (or NaN) values for a named parameter.
pub fn require_positive(name: &'static str, value: f64) -> Result<f64> {
    if value > 0.0 {
        Ok(value)
    } else {
        Err(CertError::InvalidParameter { name, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_positive() {
        assert_eq!(require_positive("c", 0.25), Ok(0.25));
        assert_eq!(
            require_positive("R0", 0.0),
            Err(CertError::InvalidParameter { name: "R0", value: 0.0 })
        );
        assert!(require_positive("kappa", -1.0).is_err());
        assert!(require_positive("kappa", f64::NAN).is_err());
    }

    #[test]
    fn test_error_messages() {
        let e = CertError::InvalidParameter { name: "R0", value: -0.5 };
        assert_eq!(e.to_string(), "R0 must be positive, got -0.5");
        let e = CertError::TooFewSamples {
            name: "sigma_samples",
            got: 1,
            min: 2,
        };
        assert_eq!(e.to_string(), "sigma_samples = 1 is too few samples, need at least 2");
        let e = CertError::SieveCutoffTooSmall(1);
        assert!(e.to_string().contains("P=1"));
    }
}
