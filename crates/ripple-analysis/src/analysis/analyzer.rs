//! Change analysis pipeline.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use ripple_core::config::RippleConfig;
use ripple_core::errors::DependencyError;

use super::types::{ChangeImpactReport, ChangeRequest, RepositoryImpact};
use crate::call_graph::types::CallGraph;
use crate::dependency::graph::RepositoryDependencyGraph;
use crate::graph::impact::{
    changed_functions, find_impacted_functions, generate_test_recommendations,
    get_critical_paths_with_depth, CriticalPath, ImpactRecord, TestRecommendation,
};
use crate::parsers::registry::ParserRegistry;
use crate::scoring::countermeasures::CountermeasureKind;
use crate::scoring::{calculate_risk_level, estimate_test_effort, ImpactCalculator};
use crate::user_flow::UserFlowAnalyzer;

const AFFECTED_COMPONENT_LIMIT: usize = 3;
/// Affected repository count above which a staged rollout is suggested.
const STAGED_DEPLOYMENT_THRESHOLD: usize = 2;

/// Runs change requests against one dependency graph.
pub struct ChangeAnalyzer {
    calculator: ImpactCalculator,
    registry: Arc<ParserRegistry>,
    user_flows: UserFlowAnalyzer,
    config: RippleConfig,
}

#[derive(Default)]
struct FunctionFindings {
    impacted: BTreeMap<String, ImpactRecord>,
    critical_paths: Vec<CriticalPath>,
    test_recommendations: Vec<TestRecommendation>,
}

impl ChangeAnalyzer {
    pub fn new(
        dependency_graph: RepositoryDependencyGraph,
        registry: Arc<ParserRegistry>,
        config: RippleConfig,
    ) -> Self {
        Self {
            calculator: ImpactCalculator::new(dependency_graph, config.analysis.clone()),
            registry,
            user_flows: UserFlowAnalyzer::default(),
            config,
        }
    }

    /// Attach user flow definitions and deployment settings. Without them,
    /// impacts carry no flows or deployment details.
    pub fn with_user_flows(mut self, user_flows: UserFlowAnalyzer) -> Self {
        self.user_flows = user_flows;
        self
    }

    pub fn calculator(&self) -> &ImpactCalculator {
        &self.calculator
    }

    /// Register a prebuilt call graph, e.g. for a repository without a local
    /// checkout in the request.
    pub fn register_call_graph(&mut self, repo: impl Into<String>, graph: CallGraph) {
        self.calculator.register_call_graph(repo, graph);
    }

    /// Analyze one change. Fails only when the source repository, or a
    /// repository in the deployment subset, is unknown.
    ///
    /// The source call graph is rebuilt from `local_path` on every call. A
    /// graph built for an earlier request is dropped when this request has
    /// no checkout; graphs from `register_call_graph` are used as given.
    pub fn analyze(&mut self, request: &ChangeRequest) -> Result<ChangeImpactReport, DependencyError> {
        let start = Instant::now();
        let source = request.source_repository.as_str();
        let analysis = &self.config.analysis;

        match &request.local_path {
            Some(path) if analysis.effective_enable_call_graph() => {
                self.calculator.build_call_graph(
                    source,
                    path,
                    &request.changed_files,
                    &self.registry,
                    &self.config.scan,
                );
            }
            _ => self.calculator.discard_built_call_graph(source),
        }

        let scores = self.calculator.calculate_repo_impact(
            source,
            &request.changed_components,
            request.change_type,
            &request.changed_files,
        )?;
        let helper_impacts = self
            .calculator
            .get_helper_method_impacts(source, &request.changed_files);
        let helper_changed = !helper_impacts.is_empty();
        let user_impacting = self
            .user_flows
            .is_user_impacting_change(source, &request.changed_files);
        let flow_impacts = self
            .user_flows
            .analyze_flows(source, &request.changed_components);

        let mut impacts: Vec<RepositoryImpact> = scores
            .iter()
            .map(|(repo, &score)| RepositoryImpact {
                repository: repo.clone(),
                score,
                risk_level: calculate_risk_level(
                    score,
                    request.change_type.is_breaking(),
                    helper_changed,
                ),
                affected_components: request
                    .changed_components
                    .iter()
                    .take(AFFECTED_COMPONENT_LIMIT)
                    .cloned()
                    .collect(),
                reasoning: format!(
                    "Depends on {source} with {} changed components",
                    request.changed_components.len()
                ),
                user_flows: flow_impacts.clone(),
                deployment_impact: self.user_flows.check_deployment_impact(repo),
            })
            .collect();
        impacts.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.repository.cmp(&b.repository))
        });
        let affected: Vec<String> = impacts.iter().map(|i| i.repository.clone()).collect();

        let findings = match self.calculator.call_graph(source) {
            Some(graph) => self.function_findings(graph, &request.changed_files),
            None => FunctionFindings::default(),
        };
        let countermeasures = self
            .calculator
            .generate_countermeasures(source, &request.changed_files);

        let mut subset = vec![source.to_string()];
        subset.extend(affected.iter().filter(|r| r.as_str() != source).cloned());
        let deployment_order = self.calculator.dependency_graph().topological_sort(&subset)?;

        let estimated_effort_hours =
            estimate_test_effort(&affected, &scores, findings.impacted.len());

        let mut warnings = Vec::new();
        let mut recommendations = Vec::new();
        let high_risk: Vec<&str> = impacts
            .iter()
            .filter(|i| i.risk_level.is_high_or_critical())
            .map(|i| i.repository.as_str())
            .collect();
        if !high_risk.is_empty() {
            warnings.push(format!(
                "{} repositories have high/critical risk: {}",
                high_risk.len(),
                high_risk.join(", ")
            ));
            recommendations.push("Perform thorough integration testing before deployment".to_string());
        }
        for cm in &countermeasures {
            if cm.kind == CountermeasureKind::HelperMethodChange {
                warnings.push(format!("Helper method changed: {}", cm.function));
                recommendations.extend(cm.recommendations.iter().cloned());
            }
        }
        if deployment_order.len() < subset.len() {
            let ordered: Vec<&str> = deployment_order.iter().map(String::as_str).collect();
            let cyclic: Vec<&str> = subset
                .iter()
                .map(String::as_str)
                .filter(|r| !ordered.contains(r))
                .collect();
            warnings.push(format!(
                "Dependency cycle detected; no deployment order for: {}",
                cyclic.join(", ")
            ));
        }
        if impacts.len() > STAGED_DEPLOYMENT_THRESHOLD {
            recommendations.push("Consider staged deployment to minimize risk".to_string());
        }
        recommendations.push("Review dependency chain before deployment".to_string());
        if !countermeasures.is_empty() {
            recommendations.push(format!(
                "Review {} impacted functions identified by call graph analysis",
                countermeasures.len()
            ));
        }

        let total_user_flows_affected: usize = impacts.iter().map(|i| i.user_flows.len()).sum();

        let mut dependency_chain = BTreeMap::new();
        dependency_chain.insert(source.to_string(), affected.clone());

        tracing::info!(
            source,
            change_type = %request.change_type,
            affected = affected.len(),
            impacted_functions = findings.impacted.len(),
            helpers = helper_impacts.len(),
            user_flows = total_user_flows_affected,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "change analysis complete"
        );

        Ok(ChangeImpactReport {
            source_repository: source.to_string(),
            change_type: request.change_type,
            changed_files: request.changed_files.clone(),
            affected_repositories: affected,
            impacts,
            impacted_functions: findings.impacted,
            helper_impacts,
            critical_paths: findings.critical_paths,
            test_recommendations: findings.test_recommendations,
            countermeasures,
            dependency_chain,
            deployment_order,
            estimated_effort_hours,
            recommendations,
            warnings,
            user_impacting,
            total_user_flows_affected,
        })
    }

    fn function_findings(&self, graph: &CallGraph, changed_files: &[String]) -> FunctionFindings {
        let analysis = &self.config.analysis;
        let changed = changed_functions(graph, changed_files);
        if changed.is_empty() {
            return FunctionFindings::default();
        }
        let impacted = find_impacted_functions(graph, &changed, analysis.effective_max_depth());
        let critical_paths = changed
            .iter()
            .flat_map(|f| {
                get_critical_paths_with_depth(graph, f, analysis.effective_critical_path_depth())
            })
            .filter(|p| p.len() > 1)
            .collect();
        let test_recommendations = generate_test_recommendations(&impacted);
        FunctionFindings {
            impacted,
            critical_paths,
            test_recommendations,
        }
    }
}
