//! Scaling errors.

use super::error_code::SolidagoErrorCode;
use super::NumericError;

/// Errors raised while calibrating user scales.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScalingError {
    #[error("{step} scaling on {criterion}: {source}")]
    Solver {
        step: &'static str,
        criterion: String,
        #[source]
        source: NumericError,
    },
}

impl SolidagoErrorCode for ScalingError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Solver { source, .. } => source.error_code(),
        }
    }
}
