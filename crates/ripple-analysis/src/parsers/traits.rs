//! LanguageParser trait: the contract every language parser implements.

use ripple_core::errors::ParseError;

use super::types::{CallSite, Declaration, ImportInfo, SourceFile};
use crate::scanner::language_detect::Language;

/// Trait that every language parser must implement.
///
/// `parse_file` produces the syntax tree once; the extraction methods are pure
/// reads over it, so one parsed file serves the catalog, call and import passes.
pub trait LanguageParser: Send + Sync {
    /// The language this parser handles.
    fn language(&self) -> Language;

    /// File extensions this parser handles.
    fn extensions(&self) -> &[&str];

    /// Parse source text. Files with syntax errors still parse; the error
    /// count is recorded on the returned `SourceFile`.
    fn parse_file(&self, source: &str, path: &str) -> Result<SourceFile, ParseError>;

    /// Function and method declarations, in document order.
    fn parse_declarations(&self, file: &SourceFile) -> Vec<Declaration>;

    /// Call sites inside one declaration's body, in document order.
    fn parse_calls(&self, file: &SourceFile, declaration: &Declaration) -> Vec<CallSite>;

    /// Imported module specifiers, used for cross-repository scanning.
    fn parse_imports(&self, file: &SourceFile) -> Vec<ImportInfo>;
}
