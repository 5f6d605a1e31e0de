//! Scans repositories for imports and matches them against other
//! repositories' names.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::Arc;

use ripple_core::config::ScanConfig;
use serde::{Deserialize, Serialize};

use crate::parsers::registry::ParserRegistry;
use crate::scanner::walker::Walker;

/// Imports observed in one repository.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryScan {
    pub repo_name: String,
    /// Relative file path → imported module specifiers.
    pub imports: BTreeMap<String, Vec<String>>,
    pub files_scanned: usize,
    pub external_dependencies: BTreeSet<String>,
}

impl RepositoryScan {
    /// Number of distinct files with an import containing any of `tokens`.
    pub fn files_importing(&self, tokens: &[&str]) -> usize {
        self.imports
            .values()
            .filter(|imports| {
                imports
                    .iter()
                    .any(|imp| tokens.iter().any(|t| !t.is_empty() && imp.contains(t)))
            })
            .count()
    }
}

/// Collects per-file imports using the registered parsers.
pub struct ImportScanner {
    registry: Arc<ParserRegistry>,
    walker: Walker,
}

impl ImportScanner {
    pub fn new(registry: Arc<ParserRegistry>, scan: &ScanConfig) -> Self {
        Self {
            registry,
            walker: Walker::new(scan),
        }
    }

    /// Scan `root`. A missing root yields an empty scan.
    pub fn scan_repository(&self, root: &Path, repo_name: &str) -> RepositoryScan {
        let mut result = RepositoryScan {
            repo_name: repo_name.to_string(),
            ..Default::default()
        };

        for file in self.walker.collect(root) {
            let Some(parser) = self.registry.for_language(file.language) else {
                continue;
            };
            let source = match file.read_source() {
                Ok(source) => source,
                Err(err) => {
                    tracing::debug!(error = %err, "skipping unreadable file");
                    continue;
                }
            };
            let parsed = match parser.parse_file(&source, &file.relative) {
                Ok(parsed) => parsed,
                Err(err) => {
                    tracing::debug!(error = %err, "skipping unparseable file");
                    continue;
                }
            };
            let imports: Vec<String> = parser
                .parse_imports(&parsed)
                .into_iter()
                .map(|i| i.module)
                .collect();
            result.external_dependencies.extend(imports.iter().cloned());
            result.imports.insert(file.relative, imports);
            result.files_scanned += 1;
        }

        tracing::debug!(
            repo = repo_name,
            files = result.files_scanned,
            modules = result.external_dependencies.len(),
            "import scan complete"
        );
        result
    }
}

/// Name tokens an import may use to refer to a repository.
pub fn repository_tokens(name: &str) -> [String; 2] {
    [name.to_string(), name.replace('-', "_")]
}

/// Leading module segment of an import (`pkg` in `pkg.sub`).
pub fn import_base(import: &str) -> &str {
    import.split('.').next().unwrap_or(import)
}

/// For each scanned repository, the other repositories whose name appears in
/// the base segment of one of its imports. `order` fixes both key and
/// dependency order.
pub fn find_cross_repo_dependencies(
    scanned: &BTreeMap<String, RepositoryScan>,
    order: &[&str],
) -> BTreeMap<String, Vec<String>> {
    let candidates: Vec<(&str, [String; 2])> = order
        .iter()
        .filter(|name| scanned.contains_key(**name))
        .map(|&name| (name, repository_tokens(name)))
        .collect();

    let mut dependencies = BTreeMap::new();
    for &(repo_name, _) in &candidates {
        let Some(scan) = scanned.get(repo_name) else {
            continue;
        };
        let found: Vec<String> = candidates
            .iter()
            .filter(|(target, _)| *target != repo_name)
            .filter(|(_, tokens)| {
                scan.external_dependencies.iter().any(|dep| {
                    let base = import_base(dep);
                    tokens.iter().any(|t| !t.is_empty() && base.contains(t.as_str()))
                })
            })
            .map(|(target, _)| target.to_string())
            .collect();
        if !found.is_empty() {
            dependencies.insert(repo_name.to_string(), found);
        }
    }
    dependencies
}
