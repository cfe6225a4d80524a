//! Aggregation errors.

use super::error_code::SolidagoErrorCode;
use super::NumericError;

/// Errors raised while computing global scores.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AggregationError {
    #[error("Aggregating {entity} on {criterion}: {source}")]
    Solver {
        entity: String,
        criterion: String,
        #[source]
        source: NumericError,
    },
}

impl SolidagoErrorCode for AggregationError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Solver { source, .. } => source.error_code(),
        }
    }
}
