//! Change request and impact report types.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::graph::impact::{CriticalPath, HelperImpactSummary, ImpactRecord, TestRecommendation};
use crate::scoring::{ChangeType, Countermeasure, RiskLevel};
use crate::user_flow::{DeploymentImpact, UserFlowImpact};

/// A change to analyze.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeRequest {
    pub source_repository: String,
    pub changed_files: Vec<String>,
    /// Components touched by the change; matched against dependency edges.
    #[serde(default)]
    pub changed_components: Vec<String>,
    pub change_type: ChangeType,
    /// Local checkout of the source repository. Enables call graph analysis.
    #[serde(default)]
    pub local_path: Option<PathBuf>,
}

impl ChangeRequest {
    pub fn new(source_repository: impl Into<String>, change_type: ChangeType) -> Self {
        Self {
            source_repository: source_repository.into(),
            changed_files: Vec::new(),
            changed_components: Vec::new(),
            change_type,
            local_path: None,
        }
    }

    pub fn with_changed_files<I, S>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.changed_files = files.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_changed_components<I, S>(mut self, components: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.changed_components = components.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_local_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.local_path = Some(path.into());
        self
    }
}

/// Impact on one dependent repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepositoryImpact {
    pub repository: String,
    pub score: f64,
    pub risk_level: RiskLevel,
    /// First three changed components.
    pub affected_components: Vec<String>,
    pub reasoning: String,
    /// User flows the change to the source repository touches.
    #[serde(default)]
    pub user_flows: Vec<UserFlowImpact>,
    /// Deployment settings of this repository, when it has an entry.
    #[serde(default)]
    pub deployment_impact: Option<DeploymentImpact>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeImpactReport {
    pub source_repository: String,
    pub change_type: ChangeType,
    pub changed_files: Vec<String>,
    /// Same order as `impacts`.
    pub affected_repositories: Vec<String>,
    /// Highest score first; ties by name.
    pub impacts: Vec<RepositoryImpact>,
    pub impacted_functions: BTreeMap<String, ImpactRecord>,
    pub helper_impacts: Vec<HelperImpactSummary>,
    pub critical_paths: Vec<CriticalPath>,
    pub test_recommendations: Vec<TestRecommendation>,
    pub countermeasures: Vec<Countermeasure>,
    pub dependency_chain: BTreeMap<String, Vec<String>>,
    pub deployment_order: Vec<String>,
    pub estimated_effort_hours: f64,
    pub recommendations: Vec<String>,
    pub warnings: Vec<String>,
    /// The source is user-facing or a changed path is an API/UI surface.
    pub user_impacting: bool,
    /// Sum of `user_flows` over all impacts.
    pub total_user_flows_affected: usize,
}

impl ChangeImpactReport {
    pub fn high_risk_repositories(&self) -> Vec<&str> {
        self.impacts
            .iter()
            .filter(|i| i.risk_level.is_high_or_critical())
            .map(|i| i.repository.as_str())
            .collect()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
