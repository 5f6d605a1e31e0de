//! Explicit parser registry, constructed once per scan and passed to consumers.

use std::path::Path;

use super::languages::{JavaScriptParser, PythonParser, TypeScriptParser};
use super::traits::LanguageParser;
use crate::scanner::language_detect::Language;

/// Maps languages to parser instances.
pub struct ParserRegistry {
    parsers: Vec<Box<dyn LanguageParser>>,
}

impl ParserRegistry {
    /// A registry with no parsers.
    pub fn empty() -> Self {
        Self {
            parsers: Vec::new(),
        }
    }

    /// Python, JavaScript and TypeScript.
    pub fn with_defaults() -> Self {
        let mut registry = Self::empty();
        registry.register(Box::new(PythonParser::new()));
        registry.register(Box::new(JavaScriptParser::new()));
        registry.register(Box::new(TypeScriptParser::new()));
        registry
    }

    /// Register a parser, replacing any existing parser for its language.
    pub fn register(&mut self, parser: Box<dyn LanguageParser>) {
        let language = parser.language();
        self.parsers.retain(|p| p.language() != language);
        self.parsers.push(parser);
    }

    pub fn for_language(&self, language: Language) -> Option<&dyn LanguageParser> {
        self.parsers
            .iter()
            .find(|p| p.language() == language)
            .map(|p| p.as_ref())
    }

    /// Parser whose extensions include the path's extension.
    pub fn for_path(&self, path: &Path) -> Option<&dyn LanguageParser> {
        let ext = path.extension()?.to_str()?;
        self.parsers
            .iter()
            .find(|p| p.extensions().contains(&ext))
            .map(|p| p.as_ref())
    }

    pub fn languages(&self) -> Vec<Language> {
        self.parsers.iter().map(|p| p.language()).collect()
    }
}

impl Default for ParserRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
