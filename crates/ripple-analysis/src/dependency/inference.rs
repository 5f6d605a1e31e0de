//! Dependency matrix inference: scanned imports, then deployment config,
//! then deployment layers.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use ripple_core::config::ScanConfig;
use ripple_core::constants::{BASE_DEPENDENCY_STRENGTH, DEPENDENCY_STRENGTH_PER_FILE};

use super::import_scanner::{find_cross_repo_dependencies, repository_tokens, ImportScanner, RepositoryScan};
use super::types::{DependencyMatrix, DeploymentConfig, DeploymentLayer, Repository};
use crate::parsers::registry::ParserRegistry;

/// Builds the repository dependency matrix.
pub struct DependencyAnalyzer {
    deployment_config: Option<DeploymentConfig>,
    enable_code_scanning: bool,
    scanner: ImportScanner,
    scanned: BTreeMap<String, RepositoryScan>,
}

impl DependencyAnalyzer {
    pub fn new(
        registry: Arc<ParserRegistry>,
        scan: &ScanConfig,
        deployment_config: Option<DeploymentConfig>,
        enable_code_scanning: bool,
    ) -> Self {
        Self {
            deployment_config,
            enable_code_scanning,
            scanner: ImportScanner::new(registry, scan),
            scanned: BTreeMap::new(),
        }
    }

    /// Scan one repository's imports and remember the result.
    pub fn scan_repository_code(&mut self, repo_path: &std::path::Path, repo_name: &str) -> &RepositoryScan {
        let scan = self.scanner.scan_repository(repo_path, repo_name);
        self.scanned.insert(repo_name.to_string(), scan);
        &self.scanned[repo_name]
    }

    /// Record an externally produced scan.
    pub fn insert_scan(&mut self, scan: RepositoryScan) {
        self.scanned.insert(scan.repo_name.clone(), scan);
    }

    pub fn scanned(&self, repo_name: &str) -> Option<&RepositoryScan> {
        self.scanned.get(repo_name)
    }

    /// Repository name → repositories it depends on.
    ///
    /// Tries, in order: import scanning (when enabled and paths are given,
    /// falling through if nothing is found), explicit `depends_on` lists,
    /// then layer inference.
    pub fn build_dependency_matrix(
        &mut self,
        repositories: &[Repository],
        repo_paths: Option<&BTreeMap<String, PathBuf>>,
    ) -> DependencyMatrix {
        let mut matrix: DependencyMatrix = repositories
            .iter()
            .map(|r| (r.name.clone(), Vec::new()))
            .collect();

        if let Some(paths) = repo_paths.filter(|p| self.enable_code_scanning && !p.is_empty()) {
            let code_deps = self.build_from_code_scanning(repositories, paths);
            if !code_deps.is_empty() {
                tracing::info!(repositories = code_deps.len(), "dependencies from code scanning");
                matrix.extend(code_deps);
                return matrix;
            }
        }

        if let Some(config) = self.deployment_config.as_ref().filter(|c| !c.is_empty()) {
            for (name, entry) in &config.repositories {
                if let Some(deps) = matrix.get_mut(name) {
                    *deps = entry.depends_on.clone();
                }
            }
            tracing::info!("dependencies from deployment config");
            return matrix;
        }

        tracing::info!("dependencies inferred from deployment layers");
        infer_from_layers(repositories)
    }

    fn build_from_code_scanning(
        &mut self,
        repositories: &[Repository],
        paths: &BTreeMap<String, PathBuf>,
    ) -> BTreeMap<String, Vec<String>> {
        for repo in repositories {
            if let Some(path) = paths.get(&repo.name) {
                if path.exists() {
                    tracing::debug!(repo = %repo.name, "scanning for dependencies");
                    self.scan_repository_code(path, &repo.name);
                }
            }
        }
        let order: Vec<&str> = repositories.iter().map(|r| r.name.as_str()).collect();
        find_cross_repo_dependencies(&self.scanned, &order)
    }

    /// 0 without an edge; otherwise 0.8 plus 0.05 per scanned source file
    /// importing the target, capped at 1.
    pub fn calculate_dependency_strength(
        &self,
        source: &str,
        target: &str,
        matrix: &DependencyMatrix,
    ) -> f64 {
        let has_edge = matrix
            .get(source)
            .is_some_and(|deps| deps.iter().any(|d| d == target));
        if !has_edge {
            return 0.0;
        }

        let mut strength = BASE_DEPENDENCY_STRENGTH;
        if let Some(scan) = self.scanned.get(source) {
            let [name, underscored] = repository_tokens(target);
            let files = scan.files_importing(&[name.as_str(), underscored.as_str()]);
            strength += files as f64 * DEPENDENCY_STRENGTH_PER_FILE;
        }
        strength.min(1.0)
    }
}

/// ui → api + core; core → api; api → nothing; anything else → core, or api
/// when there is no core repository.
pub fn infer_from_layers(repositories: &[Repository]) -> DependencyMatrix {
    let in_layer = |layer: DeploymentLayer| -> Vec<String> {
        repositories
            .iter()
            .filter(|r| r.deployment_layer.as_ref() == Some(&layer))
            .map(|r| r.name.clone())
            .collect()
    };
    let api = in_layer(DeploymentLayer::Api);
    let core = in_layer(DeploymentLayer::Core);
    let api_or_core: Vec<String> = repositories
        .iter()
        .filter(|r| {
            matches!(
                r.deployment_layer,
                Some(DeploymentLayer::Api) | Some(DeploymentLayer::Core)
            )
        })
        .map(|r| r.name.clone())
        .collect();

    repositories
        .iter()
        .map(|repo| {
            let deps = match repo.deployment_layer {
                Some(DeploymentLayer::Ui) => api_or_core.clone(),
                Some(DeploymentLayer::Core) => api.clone(),
                Some(DeploymentLayer::Api) => Vec::new(),
                _ if !core.is_empty() => core.clone(),
                _ => api.clone(),
            };
            (repo.name.clone(), deps)
        })
        .collect()
}
