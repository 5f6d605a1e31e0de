//! Repository dependency errors.

use super::error_code::{self, RippleErrorCode};

/// Errors raised by the repository dependency graph and impact scoring.
///
/// Cyclic subsets are never an error: they surface as a truncated sort result.
#[derive(Debug, thiserror::Error)]
pub enum DependencyError {
    #[error("Repository not found: {name}")]
    MissingRepository { name: String },

    #[error("Unknown change type: {value} (expected breaking, enhancement, bugfix or refactor)")]
    UnknownChangeType { value: String },

    #[error("Invalid deployment config: {message}")]
    InvalidDeploymentConfig { message: String },

    #[error("Invalid user flow definitions: {message}")]
    InvalidUserFlows { message: String },
}

impl DependencyError {
    pub fn missing(name: impl Into<String>) -> Self {
        Self::MissingRepository { name: name.into() }
    }
}

impl RippleErrorCode for DependencyError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::MissingRepository { .. } => error_code::MISSING_REPOSITORY,
            _ => error_code::DEPENDENCY_ERROR,
        }
    }
}
