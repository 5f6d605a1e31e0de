//! Parse output types shared by every language parser.

use serde::{Deserialize, Serialize};
use tree_sitter::{Node, Tree};

use crate::scanner::language_detect::Language;

/// A parsed source file: the text plus its syntax tree.
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// Path relative to the repository root.
    pub path: String,
    pub language: Language,
    pub source: String,
    pub tree: Tree,
    /// Number of ERROR and MISSING nodes in the tree.
    pub error_count: u32,
}

impl SourceFile {
    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }

    /// Source text covered by `node`.
    pub fn text(&self, node: Node<'_>) -> &str {
        node.utf8_text(self.source.as_bytes()).unwrap_or("")
    }

    /// The syntax node a declaration was extracted from.
    pub fn node_for(&self, declaration: &Declaration) -> Option<Node<'_>> {
        let (start, end) = declaration.byte_range;
        let mut node = self.root().descendant_for_byte_range(start, end)?;
        while node.start_byte() != start || node.end_byte() != end {
            node = node.parent()?;
        }
        Some(node)
    }
}

/// A function or method declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Declaration {
    pub name: String,
    /// `EnclosingType.name` for methods, otherwise `name`.
    pub qualified_name: String,
    pub enclosing_type: Option<String>,
    /// 1-based.
    pub start_line: u32,
    pub end_line: u32,
    pub parameter_count: usize,
    /// Top-level statements in the body.
    pub statement_count: usize,
    pub complexity: u32,
    /// Byte span of the function node, used to find the body again.
    pub byte_range: (usize, usize),
}

impl Declaration {
    pub fn qualify(name: &str, enclosing_type: Option<&str>) -> String {
        match enclosing_type {
            Some(ty) => format!("{ty}.{name}"),
            None => name.to_string(),
        }
    }
}

/// A call expression inside a declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallSite {
    /// Trailing identifier of the call target (`b` in `a.b()`).
    pub callee_name: String,
    /// Receiver text for member calls (`a` in `a.b()`).
    pub receiver: Option<String>,
    pub line: u32,
}

/// An imported module specifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportInfo {
    pub module: String,
    pub line: u32,
}
