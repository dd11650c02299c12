//! Search space and search configuration.

use serde::{Deserialize, Serialize};

use certificate_core::params::{DEFAULT_C_RIGHT, DEFAULT_HEIGHT};
use certificate_core::{linspace, CertError, MethodChoice, Result};
use thin_strip::{AveragingModel, MarginThresholds};

/// Cartesian grid of candidate tuples.
///
/// Scan order is fixed: method (outer), then c, then kappa, then R0 (inner).
/// Tie-breaking in the search depends on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchGrid {
    pub methods: Vec<MethodChoice>,
    pub c_values: Vec<f64>,
    pub kappa_values: Vec<f64>,
    #[serde(rename = "R0_values")]
    pub r0_values: Vec<f64>,
}

impl Default for SearchGrid {
    fn default() -> Self {
        SearchGrid {
            methods: vec![MethodChoice::current()],
            c_values: linspace(0.20, 0.45, 20),
            kappa_values: linspace(0.3, 1.5, 20),
            r0_values: vec![0.08, 0.10, 0.125, 0.15],
        }
    }
}

/// One grid point before validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridPoint {
    pub method: MethodChoice,
    pub c: f64,
    pub kappa: f64,
    #[serde(rename = "R0")]
    pub r0: f64,
}

impl SearchGrid {
    /// Coarse 5 x 5 grid over the same ranges, for smoke runs.
    pub fn quick() -> Self {
        SearchGrid {
            c_values: linspace(0.20, 0.45, 5),
            kappa_values: linspace(0.3, 1.5, 5),
            ..SearchGrid::default()
        }
    }

    pub fn with_methods(mut self, methods: Vec<MethodChoice>) -> Self {
        self.methods = methods;
        self
    }

    pub fn len(&self) -> usize {
        self.methods.len() * self.c_values.len() * self.kappa_values.len() * self.r0_values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every grid point in scan order.
    pub fn points(&self) -> Vec<GridPoint> {
        let mut out = Vec::with_capacity(self.len());
        for method in &self.methods {
            for &c in &self.c_values {
                for &kappa in &self.kappa_values {
                    for &r0 in &self.r0_values {
                        out.push(GridPoint {
                            method: method.clone(),
                            c,
                            kappa,
                            r0,
                        });
                    }
                }
            }
        }
        out
    }
}

/// Height at which candidate margins are compared.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MarginHeight {
    /// Evaluate at ln T for this T.
    Exact(f64),
    /// Use this ln T directly.
    FixedLog(f64),
}

impl Default for MarginHeight {
    fn default() -> Self {
        MarginHeight::Exact(DEFAULT_HEIGHT)
    }
}

impl MarginHeight {
    /// The cheap model ln T ~ 30.
    pub fn approximate() -> Self {
        MarginHeight::FixedLog(30.0)
    }

    pub fn log_t(&self) -> Result<f64> {
        match *self {
            MarginHeight::Exact(t) if t > 1.0 && t.is_finite() => Ok(t.ln()),
            MarginHeight::Exact(t) => Err(CertError::InvalidHeight(t)),
            MarginHeight::FixedLog(l) if l > 0.0 && l.is_finite() => Ok(l),
            MarginHeight::FixedLog(l) => Err(CertError::InvalidHeight(l.exp())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Minimum margin percentage for a feasible candidate.
    pub min_margin: f64,
    pub height: MarginHeight,
    pub model: AveragingModel,
    pub thresholds: MarginThresholds,
    #[serde(rename = "C_right")]
    pub c_right: f64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            min_margin: 25.0,
            height: MarginHeight::default(),
            model: AveragingModel::Realistic,
            thresholds: MarginThresholds::default(),
            c_right: DEFAULT_C_RIGHT,
        }
    }
}
