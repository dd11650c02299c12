//! Prime sum with rigorous tail for C_right = sum_{n>=2} Lambda(n)/n^2.
//!
//! For each prime p the closed form ln(p)/(p^2 - 1) is the whole geometric
//! series sum_{k>=1} ln(p) p^{-2k}, i.e. every prime power p^k is already
//! counted. Adding a separate loop over p^k, k >= 2 counts those terms twice.

use serde::{Deserialize, Serialize};

use certificate_core::{sieve_primes, CertError, Result};

/// High-precision value of -zeta'(2)/zeta(2), 16 significant digits.
pub const REFERENCE_C_RIGHT: f64 = 0.5699618136104756;

/// Compensated (Neumaier) accumulator.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompensatedSum {
    sum: f64,
    compensation: f64,
}

impl CompensatedSum {
    pub fn add(&mut self, x: f64) {
        let t = self.sum + x;
        if self.sum.abs() >= x.abs() {
            self.compensation += (self.sum - t) + x;
        } else {
            self.compensation += (x - t) + self.sum;
        }
        self.sum = t;
    }

    pub fn value(&self) -> f64 {
        self.sum + self.compensation
    }
}

/// ln(p) / (p^2 - 1): the full prime-power contribution of one prime.
#[inline]
pub fn prime_contribution(p: u64) -> f64 {
    let pf = p as f64;
    pf.ln() / (pf * pf - 1.0)
}

/// S(P) over an already sieved prime list.
pub fn partial_sum(primes: &[u64]) -> f64 {
    let mut acc = CompensatedSum::default();
    for &p in primes {
        acc.add(prime_contribution(p));
    }
    acc.value()
}

/// The same sum expanded term by term, ln(p) p^{-2k} for k = 1, 2, ...
/// until the terms stop contributing. Agrees with [`partial_sum`].
pub fn prime_power_expansion(primes: &[u64]) -> f64 {
    let mut acc = CompensatedSum::default();
    for &p in primes {
        let pf = p as f64;
        let ratio = 1.0 / (pf * pf);
        let mut term = pf.ln() * ratio;
        let mut per_prime = CompensatedSum::default();
        while term > per_prime.value() * f64::EPSILON {
            per_prime.add(term);
            term *= ratio;
        }
        acc.add(per_prime.value());
    }
    acc.value()
}

/// Analytic bound on sum_{n>P} Lambda(n)/n^2: (4/3)(ln P + 1)/P.
pub fn tail_bound(cutoff: u64) -> f64 {
    let p = cutoff as f64;
    (4.0 / 3.0) * (p.ln() + 1.0) / p
}

/// Whether an externally supplied value lies inside a computed interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReferenceCheck {
    pub value: f64,
    pub contained: bool,
    /// Distance to the nearest edge when outside, zero when inside.
    pub distance: f64,
}

/// Two-sided bound on C_right for one sieve cutoff.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundInterval {
    pub cutoff: u64,
    pub prime_count: usize,
    pub partial_sum: f64,
    pub tail_bound: f64,
    pub lower: f64,
    pub upper: f64,
}

impl BoundInterval {
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }

    pub fn midpoint(&self) -> f64 {
        0.5 * (self.lower + self.upper)
    }

    pub fn contains(&self, value: f64) -> bool {
        self.lower <= value && value <= self.upper
    }

    pub fn check_reference(&self, value: f64) -> ReferenceCheck {
        let contained = self.contains(value);
        let distance = if contained {
            0.0
        } else if value < self.lower {
            self.lower - value
        } else {
            value - self.upper
        };
        if !contained {
            log::warn!(
                "reference {:.16} lies outside [{:.12}, {:.12}] (P={})",
                value,
                self.lower,
                self.upper,
                self.cutoff
            );
        }
        ReferenceCheck {
            value,
            contained,
            distance,
        }
    }
}

/// Bound C_right using all primes up to `cutoff`.
pub fn bound(cutoff: u64) -> Result<BoundInterval> {
    if cutoff < 2 {
        return Err(CertError::SieveCutoffTooSmall(cutoff));
    }
    let primes = sieve_primes(cutoff);
    bound_from_primes(cutoff, &primes)
}

/// Bound C_right from a prime list that may extend beyond `cutoff`;
/// only primes `<= cutoff` are summed.
pub fn bound_from_primes(cutoff: u64, primes: &[u64]) -> Result<BoundInterval> {
    if cutoff < 2 {
        return Err(CertError::SieveCutoffTooSmall(cutoff));
    }
    let end = primes.partition_point(|&p| p <= cutoff);
    let used = &primes[..end];
    let partial = partial_sum(used);
    let tail = tail_bound(cutoff);
    log::debug!(
        "P={}: {} primes, S={:.12}, tail={:.3e}",
        cutoff,
        used.len(),
        partial,
        tail
    );
    Ok(BoundInterval {
        cutoff,
        prime_count: used.len(),
        partial_sum: partial,
        tail_bound: tail,
        lower: partial,
        upper: partial + tail,
    })
}
