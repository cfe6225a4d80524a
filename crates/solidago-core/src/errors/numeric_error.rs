//! Numeric solver errors.

use super::error_code::{self, SolidagoErrorCode};

/// Errors raised by root finders and iterative solvers.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NumericError {
    /// `f(a)` and `f(b)` share a sign, so Brent has nothing to converge to.
    #[error("No sign change on [{a}, {b}]: f(a) = {fa}, f(b) = {fb}")]
    NoBracket { a: f64, b: f64, fa: f64, fb: f64 },

    #[error("{solver} did not converge after {iterations} iterations")]
    NonConvergence {
        solver: &'static str,
        iterations: usize,
    },

    #[error("Invalid input to {operation}: {message}")]
    InvalidInput {
        operation: &'static str,
        message: String,
    },
}

impl SolidagoErrorCode for NumericError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::NoBracket { .. } => error_code::NO_BRACKET,
            Self::NonConvergence { .. } => error_code::NON_CONVERGENCE,
            Self::InvalidInput { .. } => error_code::INVALID_INPUT,
        }
    }
}
