//! TypeScript parser. `.tsx` files use the TSX grammar.

use super::ecmascript::{extract_calls, extract_declarations, extract_imports};
use crate::define_parser;
use crate::scanner::language_detect::Language;

define_parser!(
    TypeScriptParser,
    Language::TypeScript,
    &["ts", "tsx", "mts", "cts"]
);
