//! Tracing and structured logging for Solidago.

pub mod setup;

pub use setup::init_tracing;
