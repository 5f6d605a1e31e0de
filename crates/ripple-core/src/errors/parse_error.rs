//! Parser errors.

use std::path::PathBuf;

use super::error_code::{self, RippleErrorCode};

/// Errors that can occur while parsing a single source file.
///
/// These never abort a scan: the file is skipped and the error is logged.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Grammar not found for language: {language}")]
    GrammarNotFound { language: String },

    #[error("Tree-sitter error parsing {path}: {message}")]
    TreeSitterError { path: PathBuf, message: String },

    #[error("Unsupported language: {extension}")]
    UnsupportedLanguage { extension: String },

    #[error("Syntax errors in {path}: {error_count} error node(s)")]
    SyntaxErrors { path: PathBuf, error_count: u32 },
}

impl RippleErrorCode for ParseError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::UnsupportedLanguage { .. } => error_code::UNSUPPORTED_LANGUAGE,
            _ => error_code::PARSE_ERROR,
        }
    }
}
