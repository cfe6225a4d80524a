//! # solidago-primitives
//!
//! Numeric building blocks shared by the pipeline phases:
//! - Brent root finding with bracket expansion
//! - dichotomy for monotone one-dimensional searches
//! - seeded random coordinate descent
//! - quadratically regularized (QR) quantile, median, deviation and
//!   uncertainty, whose sensitivity to any single contributor is bounded
//!   by a Lipschitz modulus

pub mod brent;
pub mod coordinate_descent;
pub mod dichotomy;
pub mod qr;
pub mod sample;

pub use brent::{brent_root, brent_root_expanding};
pub use coordinate_descent::{CoordinateDescent, DescentOutcome};
pub use dichotomy::dichotomy_solve;
pub use qr::{qr_median, qr_quantile, qr_standard_deviation, qr_uncertainty};
pub use sample::QrSample;
