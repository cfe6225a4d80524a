//! Input table errors, raised at load time only.

use super::error_code::{self, SolidagoErrorCode};

/// Errors raised while loading or validating input tables.
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("Table file not found: {path}")]
    FileNotFound { path: String },

    #[error("I/O error on {path}: {message}")]
    Io { path: String, message: String },

    #[error("Table {table} is missing required column {column}")]
    MissingColumn { table: String, column: String },

    #[error("Malformed row in {table} at line {line}: {message}")]
    MalformedRow {
        table: String,
        line: u64,
        message: String,
    },

    #[error("Invalid {field} in {table}: {message}")]
    InvalidValue {
        table: String,
        field: String,
        message: String,
    },

    #[error("User {user} cannot vouch for themselves")]
    SelfVouch { user: String },

    #[error("User {user} compared {entity} with itself on {criterion}")]
    SelfComparison {
        user: String,
        criterion: String,
        entity: String,
    },

    #[error(
        "Conflicting comparison max for user {user} on {criterion} ({left}, {right}): {previous} vs {max}"
    )]
    ConflictingComparison {
        user: String,
        criterion: String,
        left: String,
        right: String,
        previous: f64,
        max: f64,
    },
}

impl DataError {
    pub fn invalid(table: &str, field: &str, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            table: table.to_string(),
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl SolidagoErrorCode for DataError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::FileNotFound { .. } | Self::Io { .. } => error_code::IO_ERROR,
            _ => error_code::DATA_ERROR,
        }
    }
}
