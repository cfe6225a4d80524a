//! SolidagoErrorCode trait and the stable error code strings.

/// Trait giving every Solidago error a stable, machine-readable code.
/// Every error enum must implement this so that the CLI and run reports
/// can classify failures without matching on message text.
pub trait SolidagoErrorCode {
    /// Returns the error code string (e.g., "CONFIG_ERROR").
    fn error_code(&self) -> &'static str;

    /// Process exit code for this error: 2 for configuration errors, 1 otherwise.
    fn exit_code(&self) -> i32 {
        if self.error_code() == CONFIG_ERROR {
            2
        } else {
            1
        }
    }

    /// Returns the formatted string: `[ERROR_CODE] message`.
    fn coded_string(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const DATA_ERROR: &str = "DATA_ERROR";
pub const IO_ERROR: &str = "IO_ERROR";
pub const NO_BRACKET: &str = "NO_BRACKET";
pub const NON_CONVERGENCE: &str = "NON_CONVERGENCE";
pub const INVALID_INPUT: &str = "INVALID_INPUT";
pub const PIPELINE_ERROR: &str = "PIPELINE_ERROR";
