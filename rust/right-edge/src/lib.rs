//! # Right-Edge Constant
//!
//! Rigorous two-sided bound on C_right = -zeta'(2)/zeta(2).
//!
//! At Re(s) = 2 the log-derivative has the absolutely convergent expansion
//! sum_{n>=2} Lambda(n) n^{-2}. Summing ln(p)/(p^2 - 1) over primes p <= P
//! gives a lower bound; adding the analytic tail (4/3)(ln P + 1)/P gives an
//! upper bound. An optional precision provider cross-checks the interval
//! against a direct evaluation of zeta and its derivative.

pub mod convergence;
pub mod report;
pub mod sum;

pub use convergence::{convergence_study, ConvergenceStudy};
pub use report::{compute_right_edge, RightEdgeConfig, RightEdgeReport, SieveLevel};
pub use sum::{bound, BoundInterval, ReferenceCheck, REFERENCE_C_RIGHT};
