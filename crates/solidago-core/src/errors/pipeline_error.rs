//! Pipeline errors.

use super::error_code::{self, SolidagoErrorCode};
use super::{
    AggregationError, ConfigError, DataError, LearningError, NumericError, ScalingError,
};

/// Errors that can occur while running the pipeline.
/// Aggregates subsystem errors via `From` conversions.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Data error: {0}")]
    Data(#[from] DataError),

    #[error("Numeric error: {0}")]
    Numeric(#[from] NumericError),

    #[error("Learning error: {0}")]
    Learning(#[from] LearningError),

    #[error("Scaling error: {0}")]
    Scaling(#[from] ScalingError),

    #[error("Aggregation error: {0}")]
    Aggregation(#[from] AggregationError),

    #[error("Failed criteria: {}", .0.join(", "))]
    FailedCriteria(Vec<String>),

    #[error("Could not start worker pool: {0}")]
    WorkerPool(String),
}

impl SolidagoErrorCode for PipelineError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Config(e) => e.error_code(),
            Self::Data(e) => e.error_code(),
            Self::Numeric(e) => e.error_code(),
            Self::Learning(e) => e.error_code(),
            Self::Scaling(e) => e.error_code(),
            Self::Aggregation(e) => e.error_code(),
            Self::FailedCriteria(_) | Self::WorkerPool(_) => error_code::PIPELINE_ERROR,
        }
    }
}
