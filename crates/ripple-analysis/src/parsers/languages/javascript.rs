//! JavaScript parser.

use super::ecmascript::{extract_calls, extract_declarations, extract_imports};
use crate::define_parser;
use crate::scanner::language_detect::Language;

define_parser!(
    JavaScriptParser,
    Language::JavaScript,
    &["js", "jsx", "mjs", "cjs"]
);
