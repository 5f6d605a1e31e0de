//! Python parser.

use std::sync::OnceLock;

use regex::Regex;
use tree_sitter::Node;

use super::{cached_regex, for_each_node, line_of, regex_imports, statement_count};
use crate::define_parser;
use crate::parsers::types::{CallSite, Declaration, ImportInfo, SourceFile};
use crate::scanner::language_detect::Language;

define_parser!(PythonParser, Language::Python, &["py", "pyi"]);

static IMPORT_RE: OnceLock<Option<Regex>> = OnceLock::new();
static FROM_IMPORT_RE: OnceLock<Option<Regex>> = OnceLock::new();

const BRANCH_KINDS: &[&str] = &[
    "if_statement",
    "elif_clause",
    "while_statement",
    "for_statement",
    "except_clause",
];

fn extract_declarations(file: &SourceFile) -> Vec<Declaration> {
    let mut declarations = Vec::new();
    for_each_node(file.root(), |node| {
        if node.kind() == "function_definition" {
            if let Some(decl) = declaration(file, node) {
                declarations.push(decl);
            }
        }
    });
    declarations
}

fn declaration(file: &SourceFile, node: Node<'_>) -> Option<Declaration> {
    let name = file.text(node.child_by_field_name("name")?).to_string();
    let enclosing_type = enclosing_class(file, node);
    let statement_count = node
        .child_by_field_name("body")
        .map(statement_count)
        .unwrap_or(0);
    let parameter_count = node
        .child_by_field_name("parameters")
        .map(positional_parameter_count)
        .unwrap_or(0);

    Some(Declaration {
        qualified_name: Declaration::qualify(&name, enclosing_type.as_deref()),
        name,
        enclosing_type,
        start_line: line_of(node),
        end_line: node.end_position().row as u32 + 1,
        parameter_count,
        statement_count,
        complexity: complexity(node),
        byte_range: (node.start_byte(), node.end_byte()),
    })
}

/// Class name when the function sits directly in a class body.
fn enclosing_class(file: &SourceFile, node: Node<'_>) -> Option<String> {
    let mut parent = node.parent()?;
    if parent.kind() == "decorated_definition" {
        parent = parent.parent()?;
    }
    if parent.kind() != "block" {
        return None;
    }
    let class = parent.parent()?;
    if class.kind() != "class_definition" {
        return None;
    }
    Some(file.text(class.child_by_field_name("name")?).to_string())
}

/// Plain positional parameters: excludes positional-only, keyword-only and
/// splat parameters.
fn positional_parameter_count(params: Node<'_>) -> usize {
    let mut count = 0;
    let mut cursor = params.walk();
    for child in params.named_children(&mut cursor) {
        match child.kind() {
            "positional_separator" => count = 0,
            "keyword_separator" | "list_splat_pattern" | "dictionary_splat_pattern" => break,
            "typed_parameter" if is_splat(child) => break,
            "comment" => {}
            _ => count += 1,
        }
    }
    count
}

fn is_splat(typed: Node<'_>) -> bool {
    typed.named_child(0).is_some_and(|c| {
        matches!(c.kind(), "list_splat_pattern" | "dictionary_splat_pattern")
    })
}

/// 1 + branches + one per boolean operator.
fn complexity(node: Node<'_>) -> u32 {
    let mut complexity = 1;
    for_each_node(node, |n| {
        let kind = n.kind();
        if BRANCH_KINDS.contains(&kind) || kind == "boolean_operator" {
            complexity += 1;
        }
    });
    complexity
}

fn extract_calls(file: &SourceFile, declaration: &Declaration) -> Vec<CallSite> {
    let Some(node) = file.node_for(declaration) else {
        return Vec::new();
    };
    let mut calls = Vec::new();
    for_each_node(node, |n| {
        if n.kind() != "call" {
            return;
        }
        let Some(function) = n.child_by_field_name("function") else {
            return;
        };
        match function.kind() {
            "identifier" => calls.push(CallSite {
                callee_name: file.text(function).to_string(),
                receiver: None,
                line: line_of(n),
            }),
            "attribute" => {
                if let Some(attr) = function.child_by_field_name("attribute") {
                    calls.push(CallSite {
                        callee_name: file.text(attr).to_string(),
                        receiver: function
                            .child_by_field_name("object")
                            .map(|o| file.text(o).to_string()),
                        line: line_of(n),
                    });
                }
            }
            _ => {}
        }
    });
    calls
}

fn extract_imports(file: &SourceFile) -> Vec<ImportInfo> {
    if file.has_errors() {
        return regex_imports(
            &file.source,
            &[
                cached_regex(&IMPORT_RE, r"(?m)^import\s+([\w.]+)"),
                cached_regex(&FROM_IMPORT_RE, r"(?m)^from\s+([\w.]+)\s+import"),
            ],
        );
    }

    let mut imports = Vec::new();
    for_each_node(file.root(), |node| match node.kind() {
        "import_statement" => {
            let mut cursor = node.walk();
            for name in node.children_by_field_name("name", &mut cursor) {
                let target = if name.kind() == "aliased_import" {
                    name.child_by_field_name("name")
                } else {
                    Some(name)
                };
                if let Some(target) = target {
                    imports.push(ImportInfo {
                        module: file.text(target).to_string(),
                        line: line_of(node),
                    });
                }
            }
        }
        "import_from_statement" => {
            if let Some(module) = node.child_by_field_name("module_name") {
                let module = file.text(module).trim_start_matches('.');
                if !module.is_empty() {
                    imports.push(ImportInfo {
                        module: module.to_string(),
                        line: line_of(node),
                    });
                }
            }
        }
        _ => {}
    });
    imports
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::traits::LanguageParser;

    fn parse(source: &str) -> SourceFile {
        PythonParser::new().parse_file(source, "mod.py").unwrap()
    }

    #[test]
    fn positional_count_skips_keyword_only_and_splats() {
        let file = parse("def f(a, b=1, *args, c, **kw):\n    pass\n");
        let decls = extract_declarations(&file);
        assert_eq!(decls[0].parameter_count, 2);
    }

    #[test]
    fn positional_only_parameters_are_not_counted() {
        let file = parse("def f(a, b, /, c):\n    pass\n");
        let decls = extract_declarations(&file);
        assert_eq!(decls[0].parameter_count, 1);
    }

    #[test]
    fn relative_from_import_drops_leading_dots() {
        let file = parse("from .utils import x\nfrom . import y\n");
        let imports = extract_imports(&file);
        assert_eq!(imports.len(), 1);
        assert_eq!(imports[0].module, "utils");
    }
}
