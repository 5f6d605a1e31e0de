//! Scanner errors.

use std::path::PathBuf;

use super::error_code::{self, RippleErrorCode};

/// Errors that can occur during file scanning.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("IO error scanning {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Walk error under {root}: {message}")]
    WalkError { root: PathBuf, message: String },

    #[error("File too large: {path} ({size} bytes, max {max})")]
    MaxFileSizeExceeded { path: PathBuf, size: u64, max: u64 },
}

impl RippleErrorCode for ScanError {
    fn error_code(&self) -> &'static str {
        error_code::SCAN_ERROR
    }
}
