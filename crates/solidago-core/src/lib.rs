//! # solidago-core
//!
//! Foundation crate for the Solidago scoring pipeline.
//! Defines the typed tables every phase reads and writes, the score
//! interval algebra, errors, configuration, tracing, and constants.

pub mod config;
pub mod constants;
pub mod errors;
pub mod model;
pub mod tracing;
pub mod types;

pub use errors::SolidagoErrorCode;
pub use types::{Scale, Score};
