//! Convergence of the C_right interval as the sieve cutoff grows.

use serde::{Deserialize, Serialize};

use certificate_core::{sieve_primes, Result};

use crate::sum::{bound_from_primes, BoundInterval};

/// Cutoffs used by the verification sweep.
pub const DEFAULT_CUTOFFS: [u64; 4] = [1_000, 10_000, 100_000, 1_000_000];

/// Intervals at increasing cutoffs, sieved once at the largest one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvergenceStudy {
    pub intervals: Vec<BoundInterval>,
    /// width(P_{i+1}) / width(P_i) for consecutive cutoffs.
    pub width_ratios: Vec<f64>,
    /// Every width is strictly smaller than the one before it.
    pub strictly_shrinking: bool,
}

impl ConvergenceStudy {
    pub fn final_ratio(&self) -> Option<f64> {
        self.width_ratios.last().copied()
    }
}

/// Bound C_right at each cutoff. Cutoffs are processed in ascending order.
pub fn convergence_study(cutoffs: &[u64]) -> Result<ConvergenceStudy> {
    let mut sorted = cutoffs.to_vec();
    sorted.sort_unstable();
    sorted.dedup();

    let max_cutoff = sorted.last().copied().unwrap_or(0);
    let primes = sieve_primes(max_cutoff);

    let intervals = sorted
        .iter()
        .map(|&p| bound_from_primes(p, &primes))
        .collect::<Result<Vec<_>>>()?;

    let width_ratios: Vec<f64> = intervals
        .windows(2)
        .map(|w| w[1].width() / w[0].width())
        .collect();
    let strictly_shrinking = intervals.windows(2).all(|w| w[1].width() < w[0].width());

    if !strictly_shrinking {
        log::warn!("interval widths did not shrink monotonically across {:?}", sorted);
    }

    Ok(ConvergenceStudy {
        intervals,
        width_ratios,
        strictly_shrinking,
    })
}
