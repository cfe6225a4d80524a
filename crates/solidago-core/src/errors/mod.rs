//! Error handling for Solidago.
//! One error enum per subsystem, each implementing [`SolidagoErrorCode`].

pub mod aggregation_error;
pub mod config_error;
pub mod data_error;
pub mod error_code;
pub mod learning_error;
pub mod numeric_error;
pub mod pipeline_error;
pub mod scaling_error;

pub use aggregation_error::AggregationError;
pub use config_error::ConfigError;
pub use data_error::DataError;
pub use error_code::SolidagoErrorCode;
pub use learning_error::LearningError;
pub use numeric_error::NumericError;
pub use pipeline_error::PipelineError;
pub use scaling_error::ScalingError;
