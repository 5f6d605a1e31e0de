//! Extraction shared by the JavaScript and TypeScript grammars.

use std::sync::OnceLock;

use regex::Regex;
use tree_sitter::Node;

use super::{cached_regex, for_each_node, line_of, regex_imports, statement_count};
use crate::parsers::types::{CallSite, Declaration, ImportInfo, SourceFile};

static ES_IMPORT_RE: OnceLock<Option<Regex>> = OnceLock::new();
static REQUIRE_RE: OnceLock<Option<Regex>> = OnceLock::new();

const BRANCH_KINDS: &[&str] = &[
    "if_statement",
    "for_statement",
    "for_in_statement",
    "while_statement",
    "do_statement",
    "catch_clause",
];

const FUNCTION_VALUE_KINDS: &[&str] = &[
    "arrow_function",
    "function_expression",
    "function",
    "generator_function",
];

const CLASS_KINDS: &[&str] = &["class_declaration", "class", "abstract_class_declaration"];

pub(super) fn extract_declarations(file: &SourceFile) -> Vec<Declaration> {
    let mut declarations = Vec::new();
    for_each_node(file.root(), |node| {
        let found = match node.kind() {
            "function_declaration" | "generator_function_declaration" => node
                .child_by_field_name("name")
                .map(|name| (file.text(name).to_string(), None, node)),
            "method_definition" => node.child_by_field_name("name").map(|name| {
                (file.text(name).to_string(), enclosing_class(file, node), node)
            }),
            "variable_declarator" => function_value(node).and_then(|value| {
                let name = node.child_by_field_name("name")?;
                (name.kind() == "identifier").then(|| (file.text(name).to_string(), None, value))
            }),
            "field_definition" | "public_field_definition" => {
                function_value(node).and_then(|value| {
                    let name = node
                        .child_by_field_name("name")
                        .or_else(|| node.child_by_field_name("property"))?;
                    Some((file.text(name).to_string(), enclosing_class(file, node), value))
                })
            }
            _ => None,
        };

        if let Some((name, enclosing_type, function)) = found {
            declarations.push(declaration(name, enclosing_type, node, function));
        }
    });
    declarations
}

fn function_value(node: Node<'_>) -> Option<Node<'_>> {
    let value = node.child_by_field_name("value")?;
    FUNCTION_VALUE_KINDS.contains(&value.kind()).then_some(value)
}

fn declaration(
    name: String,
    enclosing_type: Option<String>,
    declared_at: Node<'_>,
    function: Node<'_>,
) -> Declaration {
    let statement_count = match function.child_by_field_name("body") {
        Some(body) if body.kind() == "statement_block" => statement_count(body),
        // Expression-bodied arrow function.
        Some(_) => 1,
        None => 0,
    };

    Declaration {
        qualified_name: Declaration::qualify(&name, enclosing_type.as_deref()),
        name,
        enclosing_type,
        start_line: line_of(declared_at),
        end_line: function.end_position().row as u32 + 1,
        parameter_count: parameter_count(function),
        statement_count,
        complexity: complexity(function),
        byte_range: (function.start_byte(), function.end_byte()),
    }
}

/// Name of the class whose body directly contains `member`.
fn enclosing_class(file: &SourceFile, member: Node<'_>) -> Option<String> {
    let body = member.parent()?;
    if body.kind() != "class_body" {
        return None;
    }
    let class = body.parent()?;
    if !CLASS_KINDS.contains(&class.kind()) {
        return None;
    }
    Some(file.text(class.child_by_field_name("name")?).to_string())
}

/// Declared parameters, excluding rest parameters.
fn parameter_count(function: Node<'_>) -> usize {
    if function.child_by_field_name("parameter").is_some() {
        // `x => ...`
        return 1;
    }
    let Some(params) = function.child_by_field_name("parameters") else {
        return 0;
    };
    let mut cursor = params.walk();
    params
        .named_children(&mut cursor)
        .filter(|p| match p.kind() {
            "comment" | "rest_pattern" => false,
            "required_parameter" => !p
                .child_by_field_name("pattern")
                .is_some_and(|pat| pat.kind() == "rest_pattern"),
            _ => true,
        })
        .count()
}

/// 1 + branches + one per `&&`/`||` operator.
fn complexity(function: Node<'_>) -> u32 {
    let mut complexity = 1;
    for_each_node(function, |n| {
        if BRANCH_KINDS.contains(&n.kind()) {
            complexity += 1;
        } else if n.kind() == "binary_expression" {
            let is_logical = n
                .child_by_field_name("operator")
                .is_some_and(|op| matches!(op.kind(), "&&" | "||"));
            if is_logical {
                complexity += 1;
            }
        }
    });
    complexity
}

pub(super) fn extract_calls(file: &SourceFile, declaration: &Declaration) -> Vec<CallSite> {
    let Some(node) = file.node_for(declaration) else {
        return Vec::new();
    };
    let mut calls = Vec::new();
    for_each_node(node, |n| {
        if n.kind() != "call_expression" {
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
            "member_expression" => {
                if let Some(property) = function.child_by_field_name("property") {
                    calls.push(CallSite {
                        callee_name: file.text(property).to_string(),
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

pub(super) fn extract_imports(file: &SourceFile) -> Vec<ImportInfo> {
    if file.has_errors() {
        return regex_imports(
            &file.source,
            &[
                cached_regex(&ES_IMPORT_RE, r#"import\s+.*?from\s+['"]([^'"]+)['"]"#),
                cached_regex(&REQUIRE_RE, r#"require\(['"]([^'"]+)['"]\)"#),
            ],
        );
    }

    let mut imports = Vec::new();
    for_each_node(file.root(), |node| {
        let source = match node.kind() {
            "import_statement" | "export_statement" => node.child_by_field_name("source"),
            "call_expression" => require_argument(file, node),
            _ => None,
        };
        if let Some(module) = source.and_then(|s| string_value(file, s)) {
            imports.push(ImportInfo {
                module,
                line: line_of(node),
            });
        }
    });
    imports
}

/// The string argument of `require('x')` or `import('x')`.
fn require_argument<'t>(file: &SourceFile, call: Node<'t>) -> Option<Node<'t>> {
    let function = call.child_by_field_name("function")?;
    let is_loader = match function.kind() {
        "import" => true,
        "identifier" => file.text(function) == "require",
        _ => false,
    };
    if !is_loader {
        return None;
    }
    let args = call.child_by_field_name("arguments")?;
    let first = args.named_child(0)?;
    (first.kind() == "string").then_some(first)
}

fn string_value(file: &SourceFile, string: Node<'_>) -> Option<String> {
    let value = file.text(string).trim_matches(|c| c == '"' || c == '\'' || c == '`');
    (!value.is_empty()).then(|| value.to_string())
}
