//! Thin-strip side of the short-window certificate.
//!
//! - `constants`: alpha_star and C_thin_star from the sub-Weyl exponent and R0,
//!   plus the height-dependent window h and strip width delta
//! - `threshold`: ln T0 = (2c/pi)(C_right + kappa C_thin_star) with diagnostics
//! - `margin`: bound rhs against a modelled strip average
//! - `simulation`: seeded Monte-Carlo version of the strip average
//! - `analysis`: comparison tables over parameter sets, exponents and R0

pub mod analysis;
pub mod constants;
pub mod margin;
pub mod simulation;
pub mod threshold;

pub use constants::{DerivedQuantities, ThinStripConstants};
pub use margin::{analyze_margin, AveragingModel, MarginResult, MarginStatus, MarginThresholds};
pub use simulation::{simulate_strip, StripSimulation};
pub use threshold::{compute_threshold, Coverage, ThresholdResult, VERIFIED_HEIGHT};
