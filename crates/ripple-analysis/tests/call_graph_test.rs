//! Call graph construction from on-disk repositories.

use std::fs;
use std::path::{Path, PathBuf};

use ripple_analysis::call_graph::{
    build_call_graph, build_call_graphs, CallGraph, CallGraphBuilder, RepositorySource, Resolution,
};
use ripple_analysis::parsers::ParserRegistry;
use ripple_core::config::ScanConfig;
use tempfile::TempDir;

// ═══════════════════════════════════════════════════════════════════════════
// HELPERS
// ═══════════════════════════════════════════════════════════════════════════

fn write(root: &Path, rel: &str, contents: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}

const HELPERS_PY: &str = "def _validate_input(x, y):\n    return x and y\n";

const SERVICE_PY: &str = r#"from utils.helpers import _validate_input


def process(data):
    if data:
        return _validate_input(data, 1)
    return None


def api_handler(request):
    process(request)
    return process(request)
"#;

fn python_repo() -> TempDir {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "service.py", SERVICE_PY);
    write(dir.path(), "utils/helpers.py", HELPERS_PY);
    dir
}

fn named_edges(graph: &CallGraph) -> Vec<(String, String, u32)> {
    graph
        .edges()
        .into_iter()
        .map(|e| {
            (
                graph.qualified_name(e.caller).unwrap().to_string(),
                graph.qualified_name(e.callee).unwrap().to_string(),
                e.count,
            )
        })
        .collect()
}

fn caller_names(graph: &CallGraph, function: &str) -> Vec<String> {
    let id = graph.lookup(function).unwrap();
    graph
        .callers(id)
        .map(|c| graph.qualified_name(c).unwrap().to_string())
        .collect()
}

// ═══════════════════════════════════════════════════════════════════════════
// Construction
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn builds_catalog_and_edges() {
    let dir = python_repo();
    let graph = build_call_graph(dir.path(), &["utils/helpers.py"]);

    assert_eq!(graph.function_count(), 3);
    assert_eq!(graph.edge_count(), 2);
    assert_eq!(caller_names(&graph, "_validate_input"), vec!["process"]);
    assert_eq!(caller_names(&graph, "process"), vec!["api_handler"]);
    assert_eq!(graph.changed_files(), ["utils/helpers.py".to_string()]);

    let helper = graph.get(graph.lookup("_validate_input").unwrap()).unwrap();
    assert!(helper.is_helper);
    assert_eq!(helper.file_path, "utils/helpers.py");
    assert_eq!(helper.complexity, 2);
    assert_eq!(helper.parameter_count, 2);
}

#[test]
fn repeated_calls_collapse_into_one_counted_edge() {
    let dir = python_repo();
    let graph = build_call_graph(dir.path(), &[] as &[&str]);
    let edge = graph
        .edge(graph.lookup("api_handler").unwrap(), graph.lookup("process").unwrap())
        .unwrap();
    assert_eq!(edge.count, 2);
    assert_eq!(graph.caller_count(graph.lookup("process").unwrap()), 1);
}

#[test]
fn rebuild_is_deterministic() {
    let dir = python_repo();
    write(dir.path(), "web/app.js", "function render() { return format(); }\nfunction format() { return 1; }\n");
    let first = build_call_graph(dir.path(), &[] as &[&str]);
    let second = build_call_graph(dir.path(), &[] as &[&str]);

    let identities = |g: &CallGraph| -> Vec<(String, String, u32)> {
        g.functions()
            .map(|f| (f.qualified_name.clone(), f.file_path.clone(), f.start_line))
            .collect()
    };
    assert_eq!(identities(&first), identities(&second));
    assert_eq!(named_edges(&first), named_edges(&second));
}

#[test]
fn files_with_syntax_errors_are_skipped() {
    let dir = python_repo();
    write(dir.path(), "broken.py", "def broken(:\n    process(1)\n");
    let graph = build_call_graph(dir.path(), &[] as &[&str]);
    assert_eq!(graph.function_count(), 3);
    assert!(graph.lookup("broken").is_none());
    assert_eq!(graph.diagnostics.skipped_files, vec!["broken.py".to_string()]);
}

#[test]
fn vendored_and_unsupported_files_are_not_scanned() {
    let dir = python_repo();
    write(dir.path(), "node_modules/lib/index.js", "function vendored() {}\n");
    write(dir.path(), "pkg.egg-info/setup.py", "def egg():\n    pass\n");
    write(dir.path(), "README.md", "# docs\n");
    let graph = build_call_graph(dir.path(), &[] as &[&str]);
    assert!(graph.lookup("vendored").is_none());
    assert!(graph.lookup("egg").is_none());
    assert_eq!(graph.function_count(), 3);
}

#[test]
fn missing_root_yields_empty_graph() {
    let graph = build_call_graph(Path::new("/definitely/not/a/repo"), &[] as &[&str]);
    assert!(graph.is_empty());
    assert_eq!(graph.edge_count(), 0);
}

// ═══════════════════════════════════════════════════════════════════════════
// Resolution
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn self_calls_resolve_through_enclosing_class() {
    let registry = ParserRegistry::with_defaults();
    let builder = CallGraphBuilder::new(&registry, &ScanConfig::default());
    let source = r#"class Order:
    def total(self):
        return self._sum()

    def _sum(self):
        return 0


def report(order):
    return order.total()
"#;
    let graph = builder.build_from_sources(&[("orders.py".to_string(), source.to_string())]);

    assert_eq!(caller_names(&graph, "Order._sum"), vec!["Order.total"]);
    // `order.total()` has no `order.total` catalog entry; falls back to the bare name.
    assert_eq!(caller_names(&graph, "Order.total"), vec!["report"]);

    let diag = &graph.diagnostics;
    assert_eq!(diag.total_call_sites, 2);
    assert_eq!(diag.resolved, 2);
    assert_eq!(diag.by_strategy.get(Resolution::EnclosingType.name()), Some(&1));
    assert_eq!(diag.by_strategy.get(Resolution::FirstDeclared.name()), Some(&1));
    assert!((diag.resolution_rate() - 1.0).abs() < f64::EPSILON);
}

#[test]
fn unresolved_calls_are_dropped() {
    let registry = ParserRegistry::with_defaults();
    let builder = CallGraphBuilder::new(&registry, &ScanConfig::default());
    let graph = builder.build_from_sources(&[(
        "main.py".to_string(),
        "def main():\n    print('hi')\n    os.getcwd()\n".to_string(),
    )]);
    assert_eq!(graph.function_count(), 1);
    assert_eq!(graph.edge_count(), 0);
    assert_eq!(graph.diagnostics.unresolved, 2);
}

#[test]
fn later_duplicate_declaration_wins() {
    let registry = ParserRegistry::with_defaults();
    let builder = CallGraphBuilder::new(&registry, &ScanConfig::default());
    let graph = builder.build_from_sources(&[
        ("a.py".to_string(), "def run():\n    first()\n\ndef first():\n    pass\n".to_string()),
        ("b.py".to_string(), "def run():\n    second()\n\ndef second():\n    pass\n".to_string()),
    ]);
    let run = graph.get(graph.lookup("run").unwrap()).unwrap();
    assert_eq!(run.file_path, "b.py");
    assert!(caller_names(&graph, "first").is_empty());
    assert_eq!(caller_names(&graph, "second"), vec!["run"]);
}

// ═══════════════════════════════════════════════════════════════════════════
// Parallel construction
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn builds_several_repositories_in_parallel() {
    let py = python_repo();
    let js = TempDir::new().unwrap();
    write(js.path(), "index.js", "function main() { helper(); }\nfunction helper() {}\n");

    let repos = vec![
        RepositorySource {
            name: "py-service".to_string(),
            root: py.path().to_path_buf(),
            changed_files: vec!["service.py".to_string()],
        },
        RepositorySource {
            name: "js-web".to_string(),
            root: PathBuf::from(js.path()),
            changed_files: Vec::new(),
        },
    ];
    let registry = ParserRegistry::with_defaults();
    let graphs = build_call_graphs(&repos, &registry, &ScanConfig::default());

    assert_eq!(graphs.len(), 2);
    assert_eq!(graphs["py-service"].function_count(), 3);
    assert_eq!(graphs["py-service"].changed_files(), ["service.py".to_string()]);
    assert_eq!(named_edges(&graphs["js-web"]), vec![("main".to_string(), "helper".to_string(), 1)]);
}
