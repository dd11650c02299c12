//! Horizontal segments of the certificate contour.
//!
//! The phase change across a horizontal segment of height h at T is bounded
//! through a derivative envelope (always available) and optionally checked
//! against a direct zeta evaluation when a precision backend is supplied.

pub mod envelope;
pub mod numerical;
pub mod stirling;

use std::fmt;

use serde::{Deserialize, Serialize};

use certificate_core::{CrossCheck, PrecisionProvider, Result};

pub use envelope::{
    derivative_bound, envelope, EnvelopeBound, HorizontalConfig, HorizontalStatus, HorizontalWindow,
};
pub use numerical::{numerical_check, NumericalCheck};

/// Heights used by the multi-height validation.
pub const DEFAULT_HEIGHTS: [f64; 5] = [1e10, 1e11, 1e12, 1e13, 1e14];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HorizontalReport {
    pub window: HorizontalWindow,
    pub envelope: EnvelopeBound,
    pub numerical: CrossCheck<NumericalCheck>,
}

impl fmt::Display for HorizontalReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let w = &self.window;
        let env = &self.envelope;
        writeln!(f, "Parameters:")?;
        writeln!(f, "  T = {:.2e}", w.t)?;
        writeln!(f, "  c = {}, kappa = {}", w.c, w.kappa)?;
        writeln!(f, "  h = {:.6}, delta = {:.6}", w.h, w.delta)?;
        writeln!(f, "Envelope method:")?;
        writeln!(f, "  Max |d/dt(f'/f)| <= {:.6e}", env.max_derivative)?;
        writeln!(f, "  C_horiz = {:.4}", env.c_horiz)?;
        writeln!(f, "  Bound: |Phi(T+h) - Phi(T)| <= {:.6e}", env.refined_bound)?;
        writeln!(f, "  Bound/pi = {:.6} [{}]", env.bound_over_pi, env.status)?;
        match &self.numerical {
            CrossCheck::Completed { provider, result, .. } => {
                writeln!(f, "Numerical validation ({}):", provider)?;
                writeln!(f, "  Phi(T) = {:.6}", result.phi_t)?;
                writeln!(f, "  Phi(T+h) = {:.6}", result.phi_t_plus_h)?;
                writeln!(f, "  |Phi(T+h) - Phi(T)| = {:.6e}", result.difference)?;
                write!(f, "  Max observed |dPhi/dt| ~= {:.6e}", result.max_derivative)
            }
            CrossCheck::Unavailable { reason } => write!(f, "Numerical validation: unavailable ({})", reason),
        }
    }
}

/// Envelope bound at height T plus the optional numerical check.
pub fn validate_horizontals(
    t: f64,
    c: f64,
    kappa: f64,
    provider: &dyn PrecisionProvider,
    config: &HorizontalConfig,
) -> Result<HorizontalReport> {
    let window = HorizontalWindow::new(t, c, kappa)?;
    let envelope = envelope::envelope(&window, config)?;
    let numerical = CrossCheck::from_result(
        provider,
        config.digits,
        numerical::numerical_check(&window, provider, config),
    )?;
    log::info!(
        "horizontal bound at T={:.2e}: {:.6e} ({})",
        t,
        envelope.refined_bound,
        envelope.status
    );
    Ok(HorizontalReport {
        window,
        envelope,
        numerical,
    })
}

/// Envelope bound at each height; stops at the first invalid height.
pub fn validate_heights(
    heights: &[f64],
    c: f64,
    kappa: f64,
    config: &HorizontalConfig,
) -> Result<Vec<(HorizontalWindow, EnvelopeBound)>> {
    heights
        .iter()
        .map(|&t| {
            let window = HorizontalWindow::new(t, c, kappa)?;
            let bound = envelope::envelope(&window, config)?;
            Ok((window, bound))
        })
        .collect()
}
