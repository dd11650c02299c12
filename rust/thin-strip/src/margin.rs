//! Margin between the thin-strip bound and the averaged |g_R0| estimate.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use certificate_core::{CertError, Result};

use crate::constants::DerivedQuantities;

/// Relative spread of the averaged estimate.
const SPREAD_FACTOR: f64 = 0.1;

/// Heuristic model for the strip average of |g_R0|.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AveragingModel {
    /// Flat factor 0.5.
    Toy,
    /// 0.58 - 0.08 delta / (delta + 0.1): wider strips average more.
    #[default]
    Realistic,
    /// Flat factor 0.65.
    Conservative,
}

impl AveragingModel {
    pub fn avg_factor(self, delta: f64) -> f64 {
        match self {
            AveragingModel::Toy => 0.5,
            AveragingModel::Realistic => 0.58 - 0.08 * delta / (delta + 0.1),
            AveragingModel::Conservative => 0.65,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            AveragingModel::Toy => "toy",
            AveragingModel::Realistic => "realistic",
            AveragingModel::Conservative => "conservative",
        }
    }
}

impl FromStr for AveragingModel {
    type Err = CertError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "toy" => Ok(AveragingModel::Toy),
            "realistic" => Ok(AveragingModel::Realistic),
            "conservative" => Ok(AveragingModel::Conservative),
            _ => Err(CertError::UnknownModel(s.to_string())),
        }
    }
}

impl fmt::Display for AveragingModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Percentage floor separating MARGINAL from OK.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarginThresholds {
    pub floor_percent: f64,
}

impl Default for MarginThresholds {
    fn default() -> Self {
        MarginThresholds { floor_percent: 20.0 }
    }
}

impl MarginThresholds {
    /// Floor in percent; must be finite and non-negative.
    pub fn new(floor_percent: f64) -> Result<Self> {
        if !floor_percent.is_finite() || floor_percent < 0.0 {
            return Err(CertError::InvalidParameter {
                name: "margin_floor",
                value: floor_percent,
            });
        }
        Ok(MarginThresholds { floor_percent })
    }

    /// Classify a margin percentage; `None` (no positive rhs) and any
    /// negative margin are INVALID whatever the floor.
    pub fn classify(&self, margin_percent: Option<f64>) -> MarginStatus {
        match margin_percent {
            Some(p) if p < 0.0 || p.is_nan() => MarginStatus::Invalid,
            Some(p) if p >= self.floor_percent => MarginStatus::Ok,
            Some(_) => MarginStatus::Marginal,
            None => MarginStatus::Invalid,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MarginStatus {
    Ok,
    Marginal,
    Invalid,
}

impl fmt::Display for MarginStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MarginStatus::Ok => "OK",
            MarginStatus::Marginal => "MARGINAL",
            MarginStatus::Invalid => "INVALID",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarginResult {
    pub derived: DerivedQuantities,
    pub model: AveragingModel,
    pub avg_proxy: f64,
    pub std_proxy: f64,
    /// C_thin_star h delta ln T.
    pub bound_rhs: f64,
    pub margin: f64,
    pub margin_percent: Option<f64>,
    pub status: MarginStatus,
}

impl fmt::Display for MarginResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "  Average |g_R0| estimate = {:.6e} +/- {:.6e} ({} model)",
            self.avg_proxy, self.std_proxy, self.model
        )?;
        writeln!(f, "  Bound RHS = {:.6e}", self.bound_rhs)?;
        match self.margin_percent {
            Some(p) => write!(f, "  Margin = {:.6e} ({:.1}%) [{}]", self.margin, p, self.status),
            None => write!(f, "  Margin = {:.6e} (undefined) [{}]", self.margin, self.status),
        }
    }
}

/// Bound rhs C_thin_star h delta ln T.
pub fn bound_rhs(derived: &DerivedQuantities) -> f64 {
    derived.c_thin_star * derived.h * derived.delta * derived.log_t
}

/// Percentage of `rhs` left after subtracting `avg`; `None` unless rhs > 0.
pub fn margin_percent(rhs: f64, avg: f64) -> Option<f64> {
    if rhs > 0.0 {
        Some(100.0 * (rhs - avg) / rhs)
    } else {
        None
    }
}

/// Compare the modelled strip average with the bound.
pub fn analyze_margin(
    derived: &DerivedQuantities,
    model: AveragingModel,
    thresholds: &MarginThresholds,
) -> MarginResult {
    let scale = derived.alpha_star * derived.log_t;
    let avg_proxy = scale * model.avg_factor(derived.delta) * derived.delta;
    let std_proxy = scale * SPREAD_FACTOR * derived.delta;
    let rhs = bound_rhs(derived);
    let margin = rhs - avg_proxy;
    let percent = margin_percent(rhs, avg_proxy);
    let status = thresholds.classify(percent);

    match status {
        MarginStatus::Invalid => log::warn!("negative margin ({:?}%), parameters need adjustment", percent),
        MarginStatus::Marginal => log::warn!(
            "low margin {:.1}% (< {:.0}%)",
            percent.unwrap_or(0.0),
            thresholds.floor_percent
        ),
        MarginStatus::Ok => log::debug!("margin {:.1}%", percent.unwrap_or(0.0)),
    }

    MarginResult {
        derived: *derived,
        model,
        avg_proxy,
        std_proxy,
        bound_rhs: rhs,
        margin,
        margin_percent: percent,
        status,
    }
}
