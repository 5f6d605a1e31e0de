//! RippleErrorCode trait for structured error reporting.

/// Every error enum implements this to expose a stable, machine-readable code
/// alongside its human-readable message.
pub trait RippleErrorCode {
    /// Returns the error code string (e.g., "SCAN_ERROR").
    fn error_code(&self) -> &'static str;

    /// Returns the formatted string: `[ERROR_CODE] message`.
    fn coded_string(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

pub const SCAN_ERROR: &str = "SCAN_ERROR";
pub const PARSE_ERROR: &str = "PARSE_ERROR";
pub const UNSUPPORTED_LANGUAGE: &str = "UNSUPPORTED_LANGUAGE";
pub const CALL_GRAPH_ERROR: &str = "CALL_GRAPH_ERROR";
pub const MISSING_REPOSITORY: &str = "MISSING_REPOSITORY";
pub const DEPENDENCY_ERROR: &str = "DEPENDENCY_ERROR";
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
