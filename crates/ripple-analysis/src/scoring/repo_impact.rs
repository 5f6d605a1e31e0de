//! Dependent repository scoring, enriched with call graph evidence when a
//! graph has been built for the changed repository.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use ripple_core::config::{AnalysisConfig, ScanConfig};
use ripple_core::errors::DependencyError;
use serde::{Deserialize, Serialize};

use super::change_type::ChangeType;
use super::countermeasures::Countermeasure;
use crate::call_graph::builder::CallGraphBuilder;
use crate::call_graph::types::CallGraph;
use crate::dependency::graph::RepositoryDependencyGraph;
use crate::graph::impact::{
    changed_functions, find_impacted_functions, generate_test_recommendations,
    identify_helper_method_impacts, HelperImpactSummary,
};
use crate::parsers::registry::ParserRegistry;

/// Component factor used when the change names no components.
const UNKNOWN_COMPONENT_FACTOR: f64 = 0.5;
const MANY_IMPACTED_FUNCTIONS: usize = 5;
const MANY_IMPACTED_BOOST: f64 = 1.2;
const HIGH_AVERAGE_SCORE: f64 = 0.7;
const HIGH_AVERAGE_BOOST: f64 = 1.15;

/// Summary of call graph propagation for one changed repository.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CallGraphEvidence {
    pub impacted_function_count: usize,
    pub average_score: f64,
}

/// Scores the repositories that depend on a changed one.
pub struct ImpactCalculator {
    dependency_graph: RepositoryDependencyGraph,
    call_graphs: BTreeMap<String, CallGraph>,
    /// Repositories whose graph came from `build_call_graph` rather than
    /// `register_call_graph`.
    built: BTreeSet<String>,
    config: AnalysisConfig,
}

impl ImpactCalculator {
    pub fn new(dependency_graph: RepositoryDependencyGraph, config: AnalysisConfig) -> Self {
        Self {
            dependency_graph,
            call_graphs: BTreeMap::new(),
            built: BTreeSet::new(),
            config,
        }
    }

    pub fn dependency_graph(&self) -> &RepositoryDependencyGraph {
        &self.dependency_graph
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Attach an already built call graph to `repo`, replacing any previous one.
    pub fn register_call_graph(&mut self, repo: impl Into<String>, graph: CallGraph) {
        let repo = repo.into();
        self.built.remove(&repo);
        self.call_graphs.insert(repo, graph);
    }

    /// Drop the graph of `repo` if it was built from a checkout. Registered
    /// graphs are kept.
    pub fn discard_built_call_graph(&mut self, repo: &str) {
        if self.built.remove(repo) {
            self.call_graphs.remove(repo);
        }
    }

    /// Build and register the call graph of `repo`. Returns `None` when call
    /// graph analysis is disabled.
    pub fn build_call_graph<S: AsRef<str>>(
        &mut self,
        repo: &str,
        repo_path: &Path,
        changed_files: &[S],
        registry: &ParserRegistry,
        scan: &ScanConfig,
    ) -> Option<&CallGraph> {
        if !self.config.effective_enable_call_graph() {
            tracing::debug!(repo, "call graph analysis disabled");
            return None;
        }
        let mut graph = CallGraphBuilder::new(registry, scan).build(repo_path);
        graph.set_changed_files(changed_files.iter().map(|f| f.as_ref().to_string()).collect());
        self.built.insert(repo.to_string());
        self.call_graphs.insert(repo.to_string(), graph);
        self.call_graphs.get(repo)
    }

    pub fn call_graph(&self, repo: &str) -> Option<&CallGraph> {
        self.call_graphs.get(repo)
    }

    /// Impact score per dependent of `source`, each in [0, 1].
    ///
    /// Fails with `MissingRepository` when `source` is not in the graph.
    pub fn calculate_repo_impact<C: AsRef<str>, F: AsRef<str>>(
        &self,
        source: &str,
        changed_components: &[C],
        change_type: ChangeType,
        changed_files: &[F],
    ) -> Result<BTreeMap<String, f64>, DependencyError> {
        let mut changed_components: Vec<&str> = changed_components.iter().map(|c| c.as_ref()).collect();
        changed_components.sort_unstable();
        changed_components.dedup();
        let dependents = self.dependency_graph.get_dependents(source)?;
        let evidence = self.call_graph_evidence(source, changed_files);
        let weight = change_type.weight();

        let mut scores = BTreeMap::new();
        for dependent in dependents {
            let Some(edge) = self.dependency_graph.edge_between(&dependent, source) else {
                continue;
            };
            let component_factor = if changed_components.is_empty() {
                UNKNOWN_COMPONENT_FACTOR
            } else {
                let overlap = changed_components
                    .iter()
                    .filter(|&&c| edge.components.iter().any(|e| e == c))
                    .count();
                overlap as f64 / changed_components.len() as f64
            };

            let mut score = weight * edge.strength * (0.5 + 0.5 * component_factor);
            if let Some(evidence) = evidence {
                if evidence.impacted_function_count > MANY_IMPACTED_FUNCTIONS {
                    score = (score * MANY_IMPACTED_BOOST).min(1.0);
                }
                if evidence.average_score > HIGH_AVERAGE_SCORE {
                    score = (score * HIGH_AVERAGE_BOOST).min(1.0);
                }
            }
            scores.insert(dependent, score.clamp(0.0, 1.0));
        }

        tracing::debug!(
            source,
            change_type = %change_type,
            dependents = scores.len(),
            call_graph = evidence.is_some(),
            "repository impact calculated"
        );
        Ok(scores)
    }

    /// Propagation summary for the functions in `changed_files`, if a call
    /// graph is registered for `repo` and anything was reached.
    pub fn call_graph_evidence<S: AsRef<str>>(
        &self,
        repo: &str,
        changed_files: &[S],
    ) -> Option<CallGraphEvidence> {
        if changed_files.is_empty() {
            return None;
        }
        let graph = self.call_graphs.get(repo)?;
        let changed = changed_functions(graph, changed_files);
        if changed.is_empty() {
            return None;
        }
        let impacted = find_impacted_functions(graph, &changed, self.config.effective_max_depth());
        if impacted.is_empty() {
            return None;
        }
        let total: f64 = impacted.values().map(|r| r.score).sum();
        Some(CallGraphEvidence {
            impacted_function_count: impacted.len(),
            average_score: total / impacted.len() as f64,
        })
    }

    /// Helper impacts in `repo`; empty without a registered call graph.
    pub fn get_helper_method_impacts<S: AsRef<str>>(
        &self,
        repo: &str,
        changed_files: &[S],
    ) -> Vec<HelperImpactSummary> {
        match self.call_graphs.get(repo) {
            Some(graph) => identify_helper_method_impacts(
                graph,
                changed_files,
                self.config.effective_helper_high_impact_threshold(),
            ),
            None => Vec::new(),
        }
    }

    /// One countermeasure per helper impact, then one per test recommendation
    /// for the functions impacted by `changed_files`.
    pub fn generate_countermeasures<S: AsRef<str>>(
        &self,
        repo: &str,
        changed_files: &[S],
    ) -> Vec<Countermeasure> {
        let mut countermeasures: Vec<Countermeasure> = self
            .get_helper_method_impacts(repo, changed_files)
            .iter()
            .map(Countermeasure::for_helper)
            .collect();

        if let Some(graph) = self.call_graphs.get(repo) {
            let changed = changed_functions(graph, changed_files);
            if !changed.is_empty() {
                let impacted =
                    find_impacted_functions(graph, &changed, self.config.effective_max_depth());
                countermeasures.extend(
                    generate_test_recommendations(&impacted)
                        .iter()
                        .map(Countermeasure::for_recommendation),
                );
            }
        }
        countermeasures
    }
}
