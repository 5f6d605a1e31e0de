//! Matching changes against user flows and deployment settings.

use std::collections::BTreeSet;

use crate::dependency::types::{DeploymentConfig, Repository};
use crate::scoring::RiskLevel;

use super::types::{
    AffectedFlow, DeploymentImpact, FailureScenario, FailureType, FlowStep, FlowTestStep,
    TestPhase, UserFlow, UserFlowCatalog, UserFlowImpact,
};

/// Changed paths containing any of these mark a change as user-impacting.
const USER_IMPACTING_PATTERNS: [&str; 9] = [
    "/api/",
    "/ui/",
    "/rest/",
    "/v1/",
    "/v2/",
    "endpoint",
    "handler",
    "controller",
    "view",
];

/// Impacted-step share above which a flow is a high severity impact.
const HIGH_SEVERITY_RATIO: f64 = 0.5;
const MEDIUM_SEVERITY_RATIO: f64 = 0.25;

/// Steps numbered below this are early enough that an API failure blocks the user.
const EARLY_STEP_LIMIT: u32 = 3;

/// Analyzes the user flows and deployment entries a change touches.
#[derive(Debug, Clone, Default)]
pub struct UserFlowAnalyzer {
    flows: UserFlowCatalog,
    deployment: DeploymentConfig,
    user_facing: BTreeSet<String>,
}

impl UserFlowAnalyzer {
    pub fn new(flows: UserFlowCatalog, deployment: DeploymentConfig) -> Self {
        Self {
            flows,
            deployment,
            user_facing: BTreeSet::new(),
        }
    }

    /// Record which repositories are user-facing.
    pub fn with_repositories(mut self, repositories: &[Repository]) -> Self {
        self.user_facing = repositories
            .iter()
            .filter(|r| r.user_facing)
            .map(|r| r.name.clone())
            .collect();
        self
    }

    pub fn flows(&self) -> &UserFlowCatalog {
        &self.flows
    }

    /// Flows that `repository` can affect, in flow id order.
    ///
    /// A step matches when it belongs to `repository` and its component
    /// contains one of `changed_components`. With no components, every step
    /// of the repository matches and every listed flow is reported.
    pub fn find_affected_flows<S: AsRef<str>>(
        &self,
        repository: &str,
        changed_components: &[S],
    ) -> Vec<AffectedFlow> {
        let mut affected = Vec::new();
        for (flow_id, flow) in &self.flows.flows {
            if !flow.affected_by_repos.iter().any(|r| r == repository) {
                continue;
            }
            let impacted: Vec<FlowStep> = flow
                .steps
                .iter()
                .filter(|step| step_matches(step, repository, changed_components))
                .cloned()
                .collect();
            if impacted.is_empty() && !changed_components.is_empty() {
                continue;
            }

            let severity = flow_severity(flow, impacted.len());
            affected.push(AffectedFlow {
                flow_id: flow_id.clone(),
                flow_name: flow.name.clone(),
                description: flow.description.clone(),
                impacted_steps: if impacted.is_empty() {
                    flow.steps.clone()
                } else {
                    impacted
                },
                all_steps: flow.steps.clone(),
                api_endpoints: flow.api_endpoints.clone(),
                ui_path: flow.ui_path.clone(),
                severity,
            });
        }
        tracing::debug!(repository, flows = affected.len(), "affected user flows found");
        affected
    }

    /// Setup, one execution step per flow step, then end-to-end validation.
    pub fn generate_test_steps(&self, flow: &AffectedFlow, repository: &str) -> Vec<FlowTestStep> {
        let mut steps = Vec::with_capacity(flow.all_steps.len() + 2);
        steps.push(FlowTestStep {
            phase: TestPhase::Setup,
            step_num: 0,
            action: "Setup test environment".to_string(),
            details: format!("Ensure {repository} is deployed with latest changes"),
            validation: "Verify all services are running".to_string(),
            expected_result: "System is healthy and ready".to_string(),
            impacted: false,
            component: None,
            repository: None,
        });

        for (i, step) in flow.all_steps.iter().enumerate() {
            let impacted = flow.impacted_steps.iter().any(|s| s.step == step.step);
            steps.push(FlowTestStep {
                phase: TestPhase::Execution,
                step_num: i as u32 + 1,
                action: step.action.clone(),
                details: format!("Test step: {}", step.action),
                validation: match &step.component {
                    Some(component) => format!("Verify {component} responds correctly"),
                    None => "Verify operation completes".to_string(),
                },
                expected_result: "Step completes without errors".to_string(),
                impacted,
                component: step.component.clone(),
                repository: Some(step.repository.clone()),
            });
        }

        steps.push(FlowTestStep {
            phase: TestPhase::Validation,
            step_num: flow.all_steps.len() as u32 + 1,
            action: "Verify end-to-end flow completion".to_string(),
            details: format!("Confirm {} completed successfully", flow.flow_name),
            validation: "Check logs, UI state, and data consistency".to_string(),
            expected_result: "Flow completed with expected outcome".to_string(),
            impacted: false,
            component: None,
            repository: None,
        });
        steps
    }

    /// Two scenarios per impacted step, then one for the whole flow.
    pub fn identify_failure_scenarios(
        &self,
        flow: &AffectedFlow,
        repository: &str,
    ) -> Vec<FailureScenario> {
        let mut scenarios = Vec::with_capacity(flow.impacted_steps.len() * 2 + 1);
        for step in &flow.impacted_steps {
            let component = step.component.as_deref().unwrap_or("component");
            scenarios.push(FailureScenario {
                step: Some(step.step),
                action: step.action.clone(),
                failure_type: FailureType::ApiFailure,
                description: format!("API call fails in {component}"),
                impact: format!("User cannot proceed with {}", flow.flow_name),
                symptom: "Error message displayed in UI or API timeout".to_string(),
                severity: if step.step < EARLY_STEP_LIMIT {
                    RiskLevel::High
                } else {
                    RiskLevel::Medium
                },
            });
            scenarios.push(FailureScenario {
                step: Some(step.step),
                action: step.action.clone(),
                failure_type: FailureType::DataInconsistency,
                description: format!("Incorrect data returned from {repository}"),
                impact: "User sees stale or incorrect information".to_string(),
                symptom: "UI displays wrong values or outdated status".to_string(),
                severity: RiskLevel::Medium,
            });
        }
        scenarios.push(FailureScenario {
            step: None,
            action: "Complete workflow".to_string(),
            failure_type: FailureType::WorkflowFailure,
            description: format!("Changes in {repository} break the entire {}", flow.flow_name),
            impact: "Critical feature unavailable to users".to_string(),
            symptom: format!("Users cannot access {}", flow.ui_path),
            severity: RiskLevel::Critical,
        });
        scenarios
    }

    /// Affected flows of `repository` with test steps and failure scenarios.
    pub fn analyze_flows<S: AsRef<str>>(
        &self,
        repository: &str,
        changed_components: &[S],
    ) -> Vec<UserFlowImpact> {
        self.find_affected_flows(repository, changed_components)
            .into_iter()
            .map(|flow| UserFlowImpact {
                test_steps: self.generate_test_steps(&flow, repository),
                failure_scenarios: self.identify_failure_scenarios(&flow, repository),
                flow,
            })
            .collect()
    }

    /// Deployment settings of `repository`; `None` without an entry.
    pub fn check_deployment_impact(&self, repository: &str) -> Option<DeploymentImpact> {
        let entry = self.deployment.get(repository)?;
        Some(DeploymentImpact {
            deployment_order: entry.deployment_order,
            depends_on: entry.depends_on.clone(),
            deployment_method: entry.deployment_method.clone(),
            services_to_restart: entry.restart_required.clone(),
            config_files: entry.config_files.clone(),
            dependent_repos: self
                .deployment
                .repositories
                .iter()
                .filter(|(_, e)| e.depends_on.iter().any(|d| d == repository))
                .map(|(name, _)| name.clone())
                .collect(),
        })
    }

    /// True for user-facing repositories, or when a changed path looks like
    /// an API or UI surface.
    pub fn is_user_impacting_change<S: AsRef<str>>(&self, repository: &str, changed_files: &[S]) -> bool {
        if self.user_facing.contains(repository) {
            return true;
        }
        changed_files.iter().any(|file| {
            let lower = file.as_ref().to_lowercase();
            USER_IMPACTING_PATTERNS.iter().any(|p| lower.contains(p))
        })
    }
}

fn step_matches<S: AsRef<str>>(step: &FlowStep, repository: &str, changed_components: &[S]) -> bool {
    if step.repository != repository {
        return false;
    }
    if changed_components.is_empty() {
        return true;
    }
    let component = step.component.as_deref().unwrap_or("");
    changed_components
        .iter()
        .any(|c| component.contains(c.as_ref()))
}

fn flow_severity(flow: &UserFlow, impacted: usize) -> RiskLevel {
    if impacted == 0 || flow.steps.is_empty() {
        return RiskLevel::Low;
    }
    let ratio = impacted as f64 / flow.steps.len() as f64;
    if ratio > HIGH_SEVERITY_RATIO {
        RiskLevel::High
    } else if ratio > MEDIUM_SEVERITY_RATIO {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}
