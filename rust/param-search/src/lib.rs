//! Parameter optimizer for the short-window certificate.
//!
//! Scans a `(method, c, kappa, R0)` grid, evaluates every tuple through the
//! thin-strip constants, threshold and margin engines, and keeps the feasible
//! tuple (margin at or above the floor) with the smallest ln T0.

pub mod grid;
pub mod search;

pub use grid::{GridPoint, MarginHeight, SearchConfig, SearchGrid};
pub use search::{best_per_method, evaluate, probe, search, Candidate, MethodBest, Probe, Rejection, SearchOutcome};
