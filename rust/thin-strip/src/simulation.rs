//! Seeded Monte-Carlo estimate of the strip average of |g_R0|.
//!
//! Samples a two-component mixture scaled by alpha_star ln T: 70% draws
//! Exp(1) * scale/(1+scale) and 30% draws Normal(0.8 scale, 0.1 scale)
//! clipped to [0, 1.2 scale].

use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Exp, Normal};
use serde::{Deserialize, Serialize};

use certificate_core::{CertError, Result};

use crate::constants::DerivedQuantities;
use crate::margin::{bound_rhs, margin_percent, MarginStatus, MarginThresholds};

pub const DEFAULT_SAMPLES: usize = 1000;
pub const DEFAULT_SEED: u64 = 42;

const EXPONENTIAL_SHARE: f64 = 0.7;
const NORMAL_SHARE: f64 = 0.3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StripSimulation {
    pub samples: usize,
    pub seed: u64,
    pub scale: f64,
    pub avg_proxy: f64,
    /// Standard error of the mean, scaled by delta.
    pub std_proxy: f64,
    pub bound_rhs: f64,
    pub margin: f64,
    pub margin_percent: Option<f64>,
    pub status: MarginStatus,
}

/// Draw the mixture and measure its mean against the bound rhs.
pub fn simulate_strip(
    derived: &DerivedQuantities,
    samples: usize,
    seed: u64,
    thresholds: &MarginThresholds,
) -> Result<StripSimulation> {
    let n_exp = (EXPONENTIAL_SHARE * samples as f64) as usize;
    let n_norm = (NORMAL_SHARE * samples as f64) as usize;
    if n_exp + n_norm == 0 {
        return Err(CertError::TooFewSamples {
            name: "samples",
            got: samples,
            min: 2,
        });
    }

    let scale = derived.alpha_star * derived.log_t;
    let exp = Exp::new(1.0).map_err(|_| CertError::InvalidParameter { name: "scale", value: 1.0 })?;
    let normal = Normal::new(0.8 * scale, 0.1 * scale)
        .map_err(|_| CertError::InvalidParameter { name: "scale", value: scale })?;

    let mut rng = StdRng::seed_from_u64(seed);
    let shrink = scale / (1.0 + scale);
    let mut xs: Vec<f64> = Vec::with_capacity(n_exp + n_norm);
    xs.extend((0..n_exp).map(|_| exp.sample(&mut rng) * shrink));
    xs.extend((0..n_norm).map(|_| normal.sample(&mut rng).clamp(0.0, 1.2 * scale)));

    let n = xs.len() as f64;
    let mean = xs.iter().sum::<f64>() / n;
    let var = xs.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;

    let avg_proxy = mean * derived.delta;
    let std_proxy = var.sqrt() * derived.delta / (samples as f64).sqrt();
    let rhs = bound_rhs(derived);
    let percent = margin_percent(rhs, avg_proxy);

    log::info!(
        "strip simulation: {} samples (seed {}), avg {:.6e} vs rhs {:.6e}",
        xs.len(),
        seed,
        avg_proxy,
        rhs
    );

    Ok(StripSimulation {
        samples,
        seed,
        scale,
        avg_proxy,
        std_proxy,
        bound_rhs: rhs,
        margin: rhs - avg_proxy,
        margin_percent: percent,
        status: thresholds.classify(percent),
    })
}
