//! AssemblyErrorCode trait for stable, machine-readable error codes.

/// Every error enum implements this to expose a structured code string
/// that callers (bindings, log processors) can match on.
pub trait AssemblyErrorCode {
    /// Returns the error code string (e.g., "MINING_ERROR").
    fn error_code(&self) -> &'static str;

    /// Returns the formatted error string: `[ERROR_CODE] message`.
    fn coded_string(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const MINING_ERROR: &str = "MINING_ERROR";
pub const ESTIMATION_ERROR: &str = "ESTIMATION_ERROR";
pub const NO_SPECTRUM: &str = "NO_SPECTRUM";
pub const CANCELLED: &str = "CANCELLED";
pub const PIPELINE_ERROR: &str = "PIPELINE_ERROR";
