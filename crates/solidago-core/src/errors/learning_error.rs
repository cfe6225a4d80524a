//! Preference learning errors.

use super::error_code::SolidagoErrorCode;
use super::NumericError;

/// Errors raised while fitting a user's scores.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LearningError {
    #[error("Learning {user} on {criterion}: {source}")]
    Solver {
        user: String,
        criterion: String,
        #[source]
        source: NumericError,
    },
}

impl SolidagoErrorCode for LearningError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Solver { source, .. } => source.error_code(),
        }
    }
}
