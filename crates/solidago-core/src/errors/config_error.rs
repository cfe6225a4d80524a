//! Configuration errors.

use super::error_code::{self, SolidagoErrorCode};

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config file not found: {path}")]
    FileNotFound { path: String },

    #[error("Config parse error in {path}: {message}")]
    ParseError { path: String, message: String },

    #[error("Config validation failed for {field}: {message}")]
    ValidationFailed { field: String, message: String },
}

impl ConfigError {
    pub fn invalid(field: &str, message: impl Into<String>) -> Self {
        Self::ValidationFailed {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl SolidagoErrorCode for ConfigError {
    fn error_code(&self) -> &'static str {
        error_code::CONFIG_ERROR
    }
}

/// Fails unless `value` lies in the closed interval `[min, max]`.
pub fn check_in_range(field: &str, value: f64, min: f64, max: f64) -> Result<(), ConfigError> {
    if value.is_nan() || value < min || value > max {
        return Err(ConfigError::invalid(
            field,
            format!("must be between {min} and {max}, got {value}"),
        ));
    }
    Ok(())
}

/// Fails unless `value` lies in the open interval `(0, 1)`.
pub fn check_open_unit(field: &str, value: f64) -> Result<(), ConfigError> {
    if value.is_nan() || value <= 0.0 || value >= 1.0 {
        return Err(ConfigError::invalid(
            field,
            format!("must be strictly between 0 and 1, got {value}"),
        ));
    }
    Ok(())
}

/// Fails unless `value` is strictly positive. Infinity is accepted.
pub fn check_positive(field: &str, value: f64) -> Result<(), ConfigError> {
    if value.is_nan() || value <= 0.0 {
        return Err(ConfigError::invalid(
            field,
            format!("must be greater than 0, got {value}"),
        ));
    }
    Ok(())
}

/// Fails unless `value` is finite and non-negative.
pub fn check_non_negative(field: &str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ConfigError::invalid(
            field,
            format!("must be a finite value >= 0, got {value}"),
        ));
    }
    Ok(())
}
