//! Repository descriptors, deployment configuration and dependency edges.

use std::collections::BTreeMap;
use std::path::Path;

use ripple_core::errors::DependencyError;
use serde::{Deserialize, Serialize};

/// Repository name → names it depends on, in inference order.
pub type DependencyMatrix = BTreeMap<String, Vec<String>>;

/// Deployment tier used for layer-based inference.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DeploymentLayer {
    Api,
    Core,
    Ui,
    Other(String),
}

impl DeploymentLayer {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Api => "api",
            Self::Core => "core",
            Self::Ui => "ui",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for DeploymentLayer {
    fn from(value: String) -> Self {
        match value.to_lowercase().as_str() {
            "api" => Self::Api,
            "core" => Self::Core,
            "ui" => Self::Ui,
            _ => Self::Other(value),
        }
    }
}

impl From<&str> for DeploymentLayer {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<DeploymentLayer> for String {
    fn from(value: DeploymentLayer) -> Self {
        value.as_str().to_string()
    }
}

impl std::fmt::Display for DeploymentLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A repository in the ecosystem. Identity is `name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    pub name: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub components: Vec<String>,
    #[serde(default)]
    pub deployment_layer: Option<DeploymentLayer>,
    #[serde(default)]
    pub user_facing: bool,
    #[serde(default)]
    pub operations: Vec<String>,
}

impl Repository {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: String::new(),
            language: String::new(),
            components: Vec::new(),
            deployment_layer: None,
            user_facing: false,
            operations: Vec::new(),
        }
    }

    pub fn with_layer(mut self, layer: impl Into<DeploymentLayer>) -> Self {
        self.deployment_layer = Some(layer.into());
        self
    }

    pub fn with_components<I, S>(mut self, components: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.components = components.into_iter().map(Into::into).collect();
        self
    }
}

/// Deployment settings for one repository.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeploymentEntry {
    pub depends_on: Vec<String>,
    pub deployment_order: Option<u32>,
    pub deployment_method: Option<String>,
    pub restart_required: Vec<String>,
    pub config_files: Vec<String>,
}

/// Repository name → deployment settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeploymentConfig {
    pub repositories: BTreeMap<String, DeploymentEntry>,
}

impl DeploymentConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, DependencyError> {
        toml::from_str(s).map_err(|e| DependencyError::InvalidDeploymentConfig {
            message: e.to_string(),
        })
    }

    pub fn from_json_str(s: &str) -> Result<Self, DependencyError> {
        serde_json::from_str(s).map_err(|e| DependencyError::InvalidDeploymentConfig {
            message: e.to_string(),
        })
    }

    /// Load from a `.toml` or `.json` file.
    pub fn load(path: &Path) -> Result<Self, DependencyError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            DependencyError::InvalidDeploymentConfig {
                message: format!("{}: {e}", path.display()),
            }
        })?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(&content),
            _ => Self::from_toml_str(&content),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.repositories.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&DeploymentEntry> {
        self.repositories.get(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyType {
    Direct,
    Transitive,
}

/// `source` depends on `target`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DependencyEdge {
    pub source: String,
    pub target: String,
    pub dep_type: DependencyType,
    /// Components of `target` that `source` uses.
    pub components: Vec<String>,
    /// In [0, 1].
    pub strength: f64,
}

impl DependencyEdge {
    pub fn new(source: impl Into<String>, target: impl Into<String>, strength: f64) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            dep_type: DependencyType::Direct,
            components: Vec::new(),
            strength: strength.clamp(0.0, 1.0),
        }
    }

    pub fn with_components<I, S>(mut self, components: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.components = components.into_iter().map(Into::into).collect();
        self
    }
}
