//! Certificate parameter space: the sub-Weyl exponent table and the
//! validated `(c, kappa, R0, exponent, C_right)` tuple every engine consumes.
//!
//! The exponent table is an ordinary value. Engines and the optimizer take it
//! as an argument, so a search can vary or extend it per run without touching
//! any shared state.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{require_positive, CertError, Result};

/// Window height factor used when none is given.
pub const DEFAULT_C: f64 = 0.25;
/// Strip width factor used when none is given.
pub const DEFAULT_KAPPA: f64 = 2.0;
/// Disc radius used when none is given.
pub const DEFAULT_R0: f64 = 0.125;
/// Right-edge constant used when no sieve run supplies one.
pub const DEFAULT_C_RIGHT: f64 = 0.569961;
/// Evaluation height for margin and horizontal analyses.
pub const DEFAULT_HEIGHT: f64 = 1e12;
/// Exponent assumed for `--method=custom` when no value is given on the CLI.
pub const DEFAULT_CUSTOM_EXPONENT: f64 = 0.15;

/// One named literature exponent, stored as an exact rational.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExponentEntry {
    pub name: String,
    pub numerator: u32,
    pub denominator: u32,
}

impl ExponentEntry {
    pub fn value(&self) -> f64 {
        self.numerator as f64 / self.denominator as f64
    }
}

/// Name -> rational sub-Weyl exponent lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExponentTable {
    entries: Vec<ExponentEntry>,
}

impl ExponentTable {
    /// The literature table: current 27/164, Huxley 32/205, Bourgain 13/84,
    /// and the hypothetical 1/8 kept for experiments.
    pub fn standard() -> Self {
        let entry = |name: &str, numerator, denominator| ExponentEntry {
            name: name.to_string(),
            numerator,
            denominator,
        };
        ExponentTable {
            entries: vec![
                entry("current", 27, 164),
                entry("huxley", 32, 205),
                entry("bourgain", 13, 84),
                entry("hypothetical", 1, 8),
            ],
        }
    }

    pub fn empty() -> Self {
        ExponentTable { entries: Vec::new() }
    }

    /// Add (or replace) a named exponent. Entries keep insertion order.
    pub fn with_entry(mut self, name: &str, numerator: u32, denominator: u32) -> Result<Self> {
        if denominator == 0 {
            return Err(CertError::InvalidParameter {
                name: "denominator",
                value: 0.0,
            });
        }
        let entry = ExponentEntry {
            name: name.to_string(),
            numerator,
            denominator,
        };
        match self.entries.iter_mut().find(|e| e.name == name) {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
        Ok(self)
    }

    pub fn get(&self, name: &str) -> Option<&ExponentEntry> {
        self.entries.iter().find(|e| e.name.eq_ignore_ascii_case(name))
    }

    pub fn entries(&self) -> &[ExponentEntry] {
        &self.entries
    }

    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.name.as_str()).collect()
    }

    /// Resolve a method choice to a concrete exponent.
    pub fn resolve(&self, choice: &MethodChoice) -> Result<SubWeylExponent> {
        match choice {
            MethodChoice::Named(name) => self
                .get(name)
                .map(|e| SubWeylExponent {
                    method: e.name.clone(),
                    value: e.value(),
                })
                .ok_or_else(|| CertError::UnknownMethod(name.clone())),
            MethodChoice::Custom(value) => SubWeylExponent::custom(*value),
        }
    }
}

impl Default for ExponentTable {
    fn default() -> Self {
        ExponentTable::standard()
    }
}

/// How the caller selects the sub-Weyl exponent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MethodChoice {
    /// A name looked up in an [`ExponentTable`].
    Named(String),
    /// A user-supplied numeric exponent.
    Custom(f64),
}

impl MethodChoice {
    /// Build a choice from the `--method` / `--custom-exp` flag pair.
    ///
    /// `custom` is only honoured with `--method=custom`; any other name goes
    /// through the table and fails there if unknown.
    pub fn from_flags(method: &str, custom_exponent: Option<f64>) -> Self {
        match (method.eq_ignore_ascii_case("custom"), custom_exponent) {
            (true, Some(value)) => MethodChoice::Custom(value),
            _ => MethodChoice::Named(method.to_string()),
        }
    }

    pub fn current() -> Self {
        MethodChoice::Named("current".to_string())
    }
}

impl fmt::Display for MethodChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MethodChoice::Named(name) => write!(f, "{}", name),
            MethodChoice::Custom(value) => write!(f, "custom({:.6})", value),
        }
    }
}

/// A resolved exponent together with the method it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubWeylExponent {
    pub method: String,
    pub value: f64,
}

impl SubWeylExponent {
    /// The classical 27/164 bound.
    pub fn current() -> Self {
        SubWeylExponent {
            method: "current".to_string(),
            value: 27.0 / 164.0,
        }
    }

    pub fn custom(value: f64) -> Result<Self> {
        if !value.is_finite() || value < 0.0 {
            return Err(CertError::InvalidParameter {
                name: "exponent",
                value,
            });
        }
        Ok(SubWeylExponent {
            method: "custom".to_string(),
            value,
        })
    }
}

/// Validated certificate parameters.
///
/// Fields are private so the positivity invariants cannot be bypassed; build
/// through [`ParameterSet::new`]. Deserialization goes through the same
/// constructor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawParameterSet")]
pub struct ParameterSet {
    c: f64,
    kappa: f64,
    #[serde(rename = "R0")]
    r0: f64,
    exponent: SubWeylExponent,
    #[serde(rename = "C_right")]
    c_right: f64,
}

impl ParameterSet {
    pub fn new(
        c: f64,
        kappa: f64,
        r0: f64,
        exponent: SubWeylExponent,
        c_right: f64,
    ) -> Result<Self> {
        require_positive("c", c)?;
        require_positive("kappa", kappa)?;
        require_positive("R0", r0)?;
        if !c_right.is_finite() {
            return Err(CertError::InvalidParameter {
                name: "C_right",
                value: c_right,
            });
        }
        Ok(ParameterSet {
            c,
            kappa,
            r0,
            exponent,
            c_right,
        })
    }

    /// Same tuple with a different `C_right` (e.g. a freshly sieved one).
    pub fn with_c_right(&self, c_right: f64) -> Result<Self> {
        ParameterSet::new(self.c, self.kappa, self.r0, self.exponent.clone(), c_right)
    }

    pub fn c(&self) -> f64 {
        self.c
    }

    pub fn kappa(&self) -> f64 {
        self.kappa
    }

    pub fn r0(&self) -> f64 {
        self.r0
    }

    pub fn exponent(&self) -> &SubWeylExponent {
        &self.exponent
    }

    pub fn c_right(&self) -> f64 {
        self.c_right
    }
}

/// Unchecked wire form of [`ParameterSet`].
#[derive(Deserialize)]
struct RawParameterSet {
    c: f64,
    kappa: f64,
    #[serde(rename = "R0")]
    r0: f64,
    exponent: SubWeylExponent,
    #[serde(rename = "C_right")]
    c_right: f64,
}

impl TryFrom<RawParameterSet> for ParameterSet {
    type Error = CertError;

    fn try_from(raw: RawParameterSet) -> Result<Self> {
        ParameterSet::new(raw.c, raw.kappa, raw.r0, raw.exponent, raw.c_right)
    }
}

impl Default for ParameterSet {
    fn default() -> Self {
        ParameterSet {
            c: DEFAULT_C,
            kappa: DEFAULT_KAPPA,
            r0: DEFAULT_R0,
            exponent: SubWeylExponent::current(),
            c_right: DEFAULT_C_RIGHT,
        }
    }
}

impl fmt::Display for ParameterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "c={:.3}, kappa={:.3}, R0={:.3}, method={} ({:.6}), C_right={:.6}",
            self.c, self.kappa, self.r0, self.exponent.method, self.exponent.value, self.c_right
        )
    }
}
