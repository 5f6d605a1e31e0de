//! Repository-level dependencies: the dependency graph, deployment ordering,
//! and inference from configuration, metadata or scanned imports.

pub mod graph;
pub mod import_scanner;
pub mod inference;
pub mod types;

pub use graph::RepositoryDependencyGraph;
pub use import_scanner::{find_cross_repo_dependencies, ImportScanner, RepositoryScan};
pub use inference::{infer_from_layers, DependencyAnalyzer};
pub use types::{
    DependencyEdge, DependencyMatrix, DependencyType, DeploymentConfig, DeploymentEntry,
    DeploymentLayer, Repository,
};
