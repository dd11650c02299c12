//! Shared types and utilities for the short-window certificate engines.
//!
//! Holds what every engine crate needs: the validated parameter tuple and
//! sub-Weyl exponent table, the prime sieve, the error type, complex helpers
//! and the optional high-precision provider interface.

pub mod complex;
pub mod error;
pub mod params;
pub mod precision;
pub mod sieve;

pub use error::{require_positive, require_samples, CertError, Result};
pub use params::{ExponentTable, MethodChoice, ParameterSet, SubWeylExponent};
pub use precision::{CrossCheck, EulerMaclaurin, PrecisionProvider, Unavailable};
pub use sieve::sieve_primes;

/// `n` evenly spaced values from `start` to `end` inclusive.
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n)
                .map(|i| if i == n - 1 { end } else { start + step * i as f64 })
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linspace() {
        assert!(linspace(0.0, 1.0, 0).is_empty());
        assert_eq!(linspace(0.3, 1.0, 1), vec![0.3]);
        let v = linspace(0.20, 0.45, 20);
        assert_eq!(v.len(), 20);
        assert_eq!(v[0], 0.20);
        assert_eq!(v[19], 0.45);
        assert!(v.windows(2).all(|w| w[1] > w[0]));
    }
}
