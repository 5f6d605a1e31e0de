//! Tree-sitter parser subsystem: one `LanguageParser` per language, looked up
//! through an explicit `ParserRegistry`.

pub mod languages;
pub mod macros;
pub mod registry;
pub mod traits;
pub mod types;

pub use registry::ParserRegistry;
pub use traits::LanguageParser;
pub use types::{CallSite, Declaration, ImportInfo, SourceFile};
