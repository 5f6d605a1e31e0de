//! Error handling for Ripple.
//! One error enum per subsystem, `thiserror` only.

pub mod call_graph_error;
pub mod config_error;
pub mod dependency_error;
pub mod error_code;
pub mod parse_error;
pub mod scan_error;

pub use call_graph_error::CallGraphError;
pub use config_error::ConfigError;
pub use dependency_error::DependencyError;
pub use error_code::RippleErrorCode;
pub use parse_error::ParseError;
pub use scan_error::ScanError;
