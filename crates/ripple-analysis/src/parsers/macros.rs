//! `define_parser!` macro for reducing boilerplate per language.

/// Define a language parser struct and its `LanguageParser` impl.
///
/// The invoking module must have `extract_declarations`, `extract_calls` and
/// `extract_imports` in scope.
///
/// ```ignore
/// define_parser!(PythonParser, Language::Python, &["py", "pyi"]);
/// ```
#[macro_export]
macro_rules! define_parser {
    ($name:ident, $language:expr, $extensions:expr) => {
        pub struct $name;

        impl $name {
            pub fn new() -> Self {
                Self
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl $crate::parsers::traits::LanguageParser for $name {
            fn language(&self) -> $crate::scanner::language_detect::Language {
                $language
            }

            fn extensions(&self) -> &[&str] {
                $extensions
            }

            fn parse_file(
                &self,
                source: &str,
                path: &str,
            ) -> Result<$crate::parsers::types::SourceFile, ripple_core::errors::ParseError> {
                $crate::parsers::languages::parse_source(source, path, $language)
            }

            fn parse_declarations(
                &self,
                file: &$crate::parsers::types::SourceFile,
            ) -> Vec<$crate::parsers::types::Declaration> {
                extract_declarations(file)
            }

            fn parse_calls(
                &self,
                file: &$crate::parsers::types::SourceFile,
                declaration: &$crate::parsers::types::Declaration,
            ) -> Vec<$crate::parsers::types::CallSite> {
                extract_calls(file, declaration)
            }

            fn parse_imports(
                &self,
                file: &$crate::parsers::types::SourceFile,
            ) -> Vec<$crate::parsers::types::ImportInfo> {
                extract_imports(file)
            }
        }
    };
}
