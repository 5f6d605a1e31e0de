//! Per-language parsers and shared tree helpers.

mod ecmascript;
pub mod javascript;
pub mod python;
pub mod typescript;

use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use ripple_core::errors::ParseError;
use tree_sitter::{Node, Parser};

use super::types::{ImportInfo, SourceFile};
use crate::scanner::language_detect::Language;

pub use javascript::JavaScriptParser;
pub use python::PythonParser;
pub use typescript::TypeScriptParser;

/// Parse `source` with the grammar for `language`.
pub fn parse_source(source: &str, path: &str, language: Language) -> Result<SourceFile, ParseError> {
    let ext = Path::new(path).extension().and_then(|e| e.to_str());
    let mut parser = Parser::new();
    parser
        .set_language(&language.ts_language_for_ext(ext))
        .map_err(|e| ParseError::GrammarNotFound {
            language: format!("{language}: {e}"),
        })?;

    let tree = parser
        .parse(source, None)
        .ok_or_else(|| ParseError::TreeSitterError {
            path: path.into(),
            message: "parser returned no tree".to_string(),
        })?;

    let root = tree.root_node();
    let error_count = if root.has_error() {
        count_error_nodes(root)
    } else {
        0
    };

    Ok(SourceFile {
        path: path.to_string(),
        language,
        source: source.to_string(),
        tree,
        error_count,
    })
}

fn count_error_nodes(root: Node<'_>) -> u32 {
    let mut count = 0;
    for_each_node(root, |node| {
        if node.is_error() || node.is_missing() {
            count += 1;
        }
    });
    count
}

/// Pre-order walk over `root` and all its descendants, in document order.
pub(crate) fn for_each_node<'t>(root: Node<'t>, mut visit: impl FnMut(Node<'t>)) {
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        visit(node);
        let mut cursor = node.walk();
        let children: Vec<Node<'t>> = node.children(&mut cursor).collect();
        stack.extend(children.into_iter().rev());
    }
}

/// 1-based line of a node's start.
pub(crate) fn line_of(node: Node<'_>) -> u32 {
    node.start_position().row as u32 + 1
}

/// Named children that are not comments.
pub(crate) fn statement_count(block: Node<'_>) -> usize {
    let mut cursor = block.walk();
    block
        .named_children(&mut cursor)
        .filter(|c| c.kind() != "comment")
        .count()
}

/// Lazily compiled regex; `None` only if the pattern is invalid.
pub(crate) fn cached_regex(
    cell: &'static OnceLock<Option<Regex>>,
    pattern: &str,
) -> Option<&'static Regex> {
    cell.get_or_init(|| Regex::new(pattern).ok()).as_ref()
}

/// First capture group of every match, in pattern order.
pub(crate) fn regex_imports(source: &str, patterns: &[Option<&Regex>]) -> Vec<ImportInfo> {
    let mut imports = Vec::new();
    for pattern in patterns.iter().flatten() {
        for caps in pattern.captures_iter(source) {
            if let Some(m) = caps.get(1) {
                let line = source[..m.start()].matches('\n').count() as u32 + 1;
                imports.push(ImportInfo {
                    module: m.as_str().to_string(),
                    line,
                });
            }
        }
    }
    imports
}
