//! Repository dependency graph, deployment ordering and dependency inference.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use ripple_analysis::dependency::*;
use ripple_analysis::parsers::ParserRegistry;
use ripple_core::config::ScanConfig;
use ripple_core::errors::{DependencyError, RippleErrorCode};
use tempfile::TempDir;

// ═══════════════════════════════════════════════════════════════════════════
// HELPERS
// ═══════════════════════════════════════════════════════════════════════════

fn graph_of(names: &[&str], edges: &[(&str, &str)]) -> RepositoryDependencyGraph {
    let mut g = RepositoryDependencyGraph::new();
    for name in names {
        g.add_repository(Repository::new(*name));
    }
    for (source, target) in edges {
        g.add_dependency(DependencyEdge::new(*source, *target, 0.8)).unwrap();
    }
    g
}

fn analyzer(config: Option<DeploymentConfig>, scanning: bool) -> DependencyAnalyzer {
    DependencyAnalyzer::new(
        Arc::new(ParserRegistry::with_defaults()),
        &ScanConfig::default(),
        config,
        scanning,
    )
}

fn layered_repos() -> Vec<Repository> {
    vec![
        Repository::new("api").with_layer("api"),
        Repository::new("core").with_layer("core"),
        Repository::new("ui").with_layer("ui"),
    ]
}

fn write(root: &Path, rel: &str, contents: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}

// ═══════════════════════════════════════════════════════════════════════════
// Graph queries
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn dependents_are_reverse_edges() {
    let g = graph_of(&["api", "core", "ui"], &[("core", "api"), ("ui", "api"), ("ui", "core")]);
    assert_eq!(g.get_dependents("api").unwrap(), vec!["core", "ui"]);
    assert_eq!(g.get_dependents("core").unwrap(), vec!["ui"]);
    assert!(g.get_dependents("ui").unwrap().is_empty());
}

#[test]
fn transitive_dependencies_follow_the_chain() {
    let g = graph_of(&["a", "b", "c"], &[("a", "b"), ("b", "c")]);
    let direct: Vec<String> = g.get_dependencies("a", false).unwrap().into_iter().map(|e| e.target).collect();
    assert_eq!(direct, vec!["b"]);
    let all: Vec<String> = g.get_dependencies("a", true).unwrap().into_iter().map(|e| e.target).collect();
    assert_eq!(all, vec!["b", "c"]);
}

#[test]
fn unknown_repository_fails_loudly() {
    let g = graph_of(&["a"], &[]);
    let err = g.get_dependents("ghost").unwrap_err();
    assert!(matches!(err, DependencyError::MissingRepository { ref name } if name == "ghost"));
    assert_eq!(err.error_code(), "MISSING_REPOSITORY");

    assert!(g.topological_sort(&["a", "ghost"]).is_err());
    assert!(g.get_dependencies("ghost", true).is_err());

    let mut g = g;
    assert!(g.add_dependency(DependencyEdge::new("a", "ghost", 1.0)).is_err());
}

#[test]
fn re_adding_an_edge_replaces_it() {
    let mut g = graph_of(&["a", "b"], &[("a", "b")]);
    g.add_dependency(DependencyEdge::new("a", "b", 0.3).with_components(["auth"])).unwrap();
    assert_eq!(g.dependencies().count(), 1);
    let edge = g.edge_between("a", "b").unwrap();
    assert_eq!(edge.strength, 0.3);
    assert_eq!(edge.components, vec!["auth"]);
}

#[test]
fn edge_strength_is_clamped() {
    assert_eq!(DependencyEdge::new("a", "b", 1.7).strength, 1.0);
    assert_eq!(DependencyEdge::new("a", "b", -0.2).strength, 0.0);
}

// ═══════════════════════════════════════════════════════════════════════════
// Deployment ordering
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn dependencies_deploy_before_dependents() {
    let g = graph_of(&["api", "core", "ui"], &[("core", "api"), ("ui", "api"), ("ui", "core")]);
    let order = g.topological_sort(&["ui", "core", "api"]).unwrap();
    assert_eq!(order, vec!["api", "core", "ui"]);
}

#[test]
fn edges_outside_the_subset_are_ignored() {
    let g = graph_of(&["a", "b", "c"], &[("a", "b"), ("b", "c")]);
    let order = g.topological_sort(&["c", "a"]).unwrap();
    assert_eq!(order, vec!["c", "a"]);
}

#[test]
fn cycle_members_are_left_out() {
    let g = graph_of(&["x", "y", "z"], &[("x", "y"), ("y", "x"), ("z", "x")]);
    let order = g.topological_sort(&["x", "y"]).unwrap();
    assert!(order.len() < 2);

    // `z` waits on the cycle, so nothing can be ordered.
    assert!(g.topological_sort(&["z", "x", "y"]).unwrap().is_empty());
}

#[test]
fn duplicate_subset_entries_are_collapsed() {
    let g = graph_of(&["a", "b"], &[("b", "a")]);
    assert_eq!(g.topological_sort(&["b", "a", "b"]).unwrap(), vec!["a", "b"]);
}

// ═══════════════════════════════════════════════════════════════════════════
// Inference
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn layers_order_ui_over_core_over_api() {
    let matrix = infer_from_layers(&layered_repos());
    assert!(matrix["api"].is_empty());
    assert_eq!(matrix["core"], vec!["api"]);
    assert_eq!(matrix["ui"], vec!["api", "core"]);
}

#[test]
fn unlayered_repositories_depend_on_core_then_api() {
    let mut repos = layered_repos();
    repos.push(Repository::new("worker"));
    repos.push(Repository::new("batch").with_layer("batch"));
    let matrix = infer_from_layers(&repos);
    assert_eq!(matrix["worker"], vec!["core"]);
    assert_eq!(matrix["batch"], vec!["core"]);

    let only_api = vec![Repository::new("api").with_layer("api"), Repository::new("tool")];
    assert_eq!(infer_from_layers(&only_api)["tool"], vec!["api"]);
}

#[test]
fn deployment_config_overrides_layers() {
    let config = DeploymentConfig::from_toml_str(
        r#"
[ui]
depends_on = ["core"]
restart_required = ["ui-frontend"]

[core]
depends_on = []
deployment_order = 1
"#,
    )
    .unwrap();
    assert_eq!(config.get("ui").unwrap().restart_required, vec!["ui-frontend"]);

    let mut analyzer = analyzer(Some(config), false);
    let matrix = analyzer.build_dependency_matrix(&layered_repos(), None);
    assert_eq!(matrix["ui"], vec!["core"]);
    assert!(matrix["core"].is_empty());
    assert!(matrix["api"].is_empty());
}

#[test]
fn empty_deployment_config_falls_back_to_layers() {
    let mut analyzer = analyzer(Some(DeploymentConfig::default()), true);
    let matrix = analyzer.build_dependency_matrix(&layered_repos(), None);
    assert_eq!(matrix["ui"], vec!["api", "core"]);
}

#[test]
fn deployment_config_parses_json_and_rejects_garbage() {
    let config = DeploymentConfig::from_json_str(r#"{"web": {"depends_on": ["api"], "deployment_method": "k8s"}}"#).unwrap();
    assert_eq!(config.get("web").unwrap().depends_on, vec!["api"]);
    assert_eq!(config.get("web").unwrap().deployment_method.as_deref(), Some("k8s"));

    let err = DeploymentConfig::from_toml_str("[web\ndepends_on = 3").unwrap_err();
    assert!(matches!(err, DependencyError::InvalidDeploymentConfig { .. }));
}

#[test]
fn deployment_entry_reads_full_shape_with_restart_list() {
    let config = DeploymentConfig::from_json_str(
        r#"{"core":{"depends_on":["api"],"deployment_order":2,"deployment_method":"rolling","restart_required":["core-worker"],"config_files":["core.yaml"]}}"#,
    )
    .unwrap();
    let core = config.get("core").unwrap();
    assert_eq!(core.depends_on, vec!["api"]);
    assert_eq!(core.deployment_order, Some(2));
    assert_eq!(core.deployment_method.as_deref(), Some("rolling"));
    assert_eq!(core.restart_required, vec!["core-worker"]);
    assert_eq!(core.config_files, vec!["core.yaml"]);

    let empty = DeploymentConfig::from_json_str(r#"{"api":{"restart_required":[]}}"#).unwrap();
    assert!(empty.get("api").unwrap().restart_required.is_empty());
}

#[test]
fn deployment_config_loads_by_extension() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "deploy.json", r#"{"web": {"depends_on": ["api"]}}"#);
    write(dir.path(), "deploy.toml", "[web]\ndepends_on = [\"core\"]\n");
    let json = DeploymentConfig::load(&dir.path().join("deploy.json")).unwrap();
    let toml = DeploymentConfig::load(&dir.path().join("deploy.toml")).unwrap();
    assert_eq!(json.get("web").unwrap().depends_on, vec!["api"]);
    assert_eq!(toml.get("web").unwrap().depends_on, vec!["core"]);
    assert!(DeploymentConfig::load(&dir.path().join("missing.toml")).is_err());
}

#[test]
fn strength_grows_with_importing_files() {
    let mut scan = RepositoryScan {
        repo_name: "ui".to_string(),
        ..Default::default()
    };
    for file in ["a.ts", "b.ts", "c.ts"] {
        scan.imports.insert(file.to_string(), vec!["api/client".to_string()]);
    }
    scan.imports.insert("d.ts".to_string(), vec!["react".to_string()]);

    let mut analyzer = analyzer(None, true);
    analyzer.insert_scan(scan);
    let mut matrix = DependencyMatrix::new();
    matrix.insert("ui".to_string(), vec!["api".to_string()]);

    let strength = analyzer.calculate_dependency_strength("ui", "api", &matrix);
    assert!((strength - 0.95).abs() < 1e-9, "strength was {strength}");
    assert_eq!(analyzer.calculate_dependency_strength("api", "ui", &matrix), 0.0);
}

#[test]
fn strength_without_a_scan_is_the_base() {
    let analyzer = analyzer(None, true);
    let mut matrix = DependencyMatrix::new();
    matrix.insert("ui".to_string(), vec!["api".to_string()]);
    assert!((analyzer.calculate_dependency_strength("ui", "api", &matrix) - 0.8).abs() < 1e-9);
}

#[test]
fn code_scanning_finds_cross_repository_imports() {
    let shared = TempDir::new().unwrap();
    write(shared.path(), "shared_lib/models.py", "class User:\n    pass\n");
    let web = TempDir::new().unwrap();
    write(web.path(), "app.py", "from shared_lib.models import User\nimport os\n");
    write(web.path(), "views.py", "import shared_lib\n");
    write(web.path(), "client.js", "import api from './local';\n");

    let repos = vec![Repository::new("shared-lib"), Repository::new("web-app")];
    let mut paths = BTreeMap::new();
    paths.insert("shared-lib".to_string(), shared.path().to_path_buf());
    paths.insert("web-app".to_string(), web.path().to_path_buf());

    let mut analyzer = analyzer(None, true);
    let matrix = analyzer.build_dependency_matrix(&repos, Some(&paths));
    assert_eq!(matrix["web-app"], vec!["shared-lib"]);
    assert!(matrix["shared-lib"].is_empty());

    let scan = analyzer.scanned("web-app").unwrap();
    assert_eq!(scan.files_scanned, 3);
    assert!(scan.external_dependencies.contains("os"));

    let strength = analyzer.calculate_dependency_strength("web-app", "shared-lib", &matrix);
    assert!((strength - 0.9).abs() < 1e-9, "strength was {strength}");

    let graph = RepositoryDependencyGraph::from_matrix(&repos, &matrix, &analyzer);
    assert_eq!(graph.get_dependents("shared-lib").unwrap(), vec!["web-app"]);
    assert!((graph.edge_between("web-app", "shared-lib").unwrap().strength - 0.9).abs() < 1e-9);
}

#[test]
fn code_scanning_without_matches_falls_through() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "main.py", "import os\n");
    let mut paths = BTreeMap::new();
    paths.insert("ui".to_string(), PathBuf::from(dir.path()));

    let mut analyzer = analyzer(None, true);
    let matrix = analyzer.build_dependency_matrix(&layered_repos(), Some(&paths));
    assert_eq!(matrix["core"], vec!["api"]);
}

#[test]
fn from_matrix_skips_unknown_targets() {
    let repos = vec![Repository::new("a"), Repository::new("b")];
    let mut matrix = DependencyMatrix::new();
    matrix.insert("a".to_string(), vec!["b".to_string(), "ghost".to_string()]);
    let graph = RepositoryDependencyGraph::from_matrix(&repos, &matrix, &analyzer(None, false));
    assert_eq!(graph.len(), 2);
    assert_eq!(graph.dependencies().count(), 1);
    assert!(graph.contains("a"));
    assert!(!graph.contains("ghost"));
}
