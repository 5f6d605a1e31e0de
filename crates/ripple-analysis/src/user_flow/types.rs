//! User flow definitions and the per-flow impact records derived from them.

use std::collections::BTreeMap;
use std::path::Path;

use ripple_core::errors::DependencyError;
use serde::{Deserialize, Serialize};

use crate::scoring::RiskLevel;

/// One step of a user-triggered workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowStep {
    /// 1-based position in the flow.
    pub step: u32,
    pub action: String,
    /// Repository that serves this step.
    pub repository: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserFlow {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub steps: Vec<FlowStep>,
    /// Repositories whose changes can break this flow.
    #[serde(default)]
    pub affected_by_repos: Vec<String>,
    #[serde(default)]
    pub api_endpoints: Vec<String>,
    #[serde(default)]
    pub ui_path: String,
}

/// Flow id → flow definition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserFlowCatalog {
    pub flows: BTreeMap<String, UserFlow>,
}

impl UserFlowCatalog {
    pub fn from_toml_str(s: &str) -> Result<Self, DependencyError> {
        toml::from_str(s).map_err(|e| DependencyError::InvalidUserFlows {
            message: e.to_string(),
        })
    }

    pub fn from_json_str(s: &str) -> Result<Self, DependencyError> {
        serde_json::from_str(s).map_err(|e| DependencyError::InvalidUserFlows {
            message: e.to_string(),
        })
    }

    /// Load from a `.toml` or `.json` file.
    pub fn load(path: &Path) -> Result<Self, DependencyError> {
        let content = std::fs::read_to_string(path).map_err(|e| DependencyError::InvalidUserFlows {
            message: format!("{}: {e}", path.display()),
        })?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(&content),
            _ => Self::from_toml_str(&content),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.flows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.flows.len()
    }

    pub fn get(&self, flow_id: &str) -> Option<&UserFlow> {
        self.flows.get(flow_id)
    }
}

/// A flow touched by a change, with the steps that involve it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AffectedFlow {
    pub flow_id: String,
    pub flow_name: String,
    pub description: String,
    /// Matching steps, or every step when nothing matched.
    pub impacted_steps: Vec<FlowStep>,
    pub all_steps: Vec<FlowStep>,
    pub api_endpoints: Vec<String>,
    pub ui_path: String,
    /// Low, medium or high by the share of matched steps.
    pub severity: RiskLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestPhase {
    Setup,
    Execution,
    Validation,
}

/// One manual test step for an affected flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowTestStep {
    pub phase: TestPhase,
    pub step_num: u32,
    pub action: String,
    pub details: String,
    pub validation: String,
    pub expected_result: String,
    pub impacted: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureType {
    ApiFailure,
    DataInconsistency,
    WorkflowFailure,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureScenario {
    /// `None` for failures of the whole flow.
    pub step: Option<u32>,
    pub action: String,
    pub failure_type: FailureType,
    pub description: String,
    pub impact: String,
    pub symptom: String,
    pub severity: RiskLevel,
}

/// An affected flow together with its test plan and failure scenarios.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserFlowImpact {
    #[serde(flatten)]
    pub flow: AffectedFlow,
    pub test_steps: Vec<FlowTestStep>,
    pub failure_scenarios: Vec<FailureScenario>,
}

/// What redeploying one repository involves.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentImpact {
    pub deployment_order: Option<u32>,
    pub depends_on: Vec<String>,
    pub deployment_method: Option<String>,
    pub services_to_restart: Vec<String>,
    pub config_files: Vec<String>,
    /// Repositories whose deployment entry depends on this one.
    pub dependent_repos: Vec<String>,
}
