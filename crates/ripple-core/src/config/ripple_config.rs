//! Top-level Ripple configuration with layered resolution.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{AnalysisConfig, ScanConfig};
use crate::errors::ConfigError;

/// Project config file name, looked up in the analysis root.
pub const PROJECT_CONFIG_FILE: &str = "ripple.toml";

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. Environment variables (`RIPPLE_*`)
/// 2. Project config (`ripple.toml` in project root)
/// 3. User config (`~/.ripple/config.toml`)
/// 4. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RippleConfig {
    pub scan: ScanConfig,
    pub analysis: AnalysisConfig,
}

impl RippleConfig {
    /// Load configuration with layered resolution rooted at `root`.
    pub fn load(root: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        // Lowest priority: user config
        if let Some(user_config_path) = Self::user_config_path() {
            if user_config_path.exists() {
                match Self::merge_toml_file(&mut config, &user_config_path) {
                    Ok(()) => {}
                    Err(err @ ConfigError::ParseError { .. }) => return Err(err),
                    Err(err) => {
                        tracing::warn!(
                            path = %user_config_path.display(),
                            error = %err,
                            "ignoring unreadable user config"
                        );
                    }
                }
            }
        }

        let project_config_path = root.join(PROJECT_CONFIG_FILE);
        if project_config_path.exists() {
            Self::merge_toml_file(&mut config, &project_config_path)?;
        }

        Self::apply_env_overrides(&mut config);

        Self::validate(&config)?;

        Ok(config)
    }

    /// Load configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })?;
        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate the configuration values.
    pub fn validate(config: &RippleConfig) -> Result<(), ConfigError> {
        if let Some(max_file_size) = config.scan.max_file_size {
            if max_file_size == 0 {
                return Err(ConfigError::ValidationFailed {
                    field: "scan.max_file_size".to_string(),
                    message: "must be greater than 0".to_string(),
                });
            }
        }
        if let Some(depth) = config.analysis.max_depth {
            if depth == 0 {
                return Err(ConfigError::ValidationFailed {
                    field: "analysis.max_depth".to_string(),
                    message: "must be at least 1".to_string(),
                });
            }
        }
        if let Some(depth) = config.analysis.critical_path_depth {
            if depth == 0 {
                return Err(ConfigError::ValidationFailed {
                    field: "analysis.critical_path_depth".to_string(),
                    message: "must be at least 1".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Returns the user config path: `~/.ripple/config.toml`.
    fn user_config_path() -> Option<PathBuf> {
        home_dir().map(|h| h.join(".ripple").join("config.toml"))
    }

    /// Merge a TOML file into the existing config.
    /// Unknown keys are silently ignored.
    fn merge_toml_file(config: &mut RippleConfig, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        let file_config: RippleConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        config.merge(&file_config);
        Ok(())
    }

    /// Merge `other` into `self`; `other` wins only where it has a value.
    pub fn merge(&mut self, other: &RippleConfig) {
        if other.scan.max_file_size.is_some() {
            self.scan.max_file_size = other.scan.max_file_size;
        }
        if !other.scan.extra_skip_dirs.is_empty() {
            self.scan.extra_skip_dirs = other.scan.extra_skip_dirs.clone();
        }
        if other.scan.follow_symlinks.is_some() {
            self.scan.follow_symlinks = other.scan.follow_symlinks;
        }

        if other.analysis.max_depth.is_some() {
            self.analysis.max_depth = other.analysis.max_depth;
        }
        if other.analysis.critical_path_depth.is_some() {
            self.analysis.critical_path_depth = other.analysis.critical_path_depth;
        }
        if other.analysis.helper_high_impact_threshold.is_some() {
            self.analysis.helper_high_impact_threshold =
                other.analysis.helper_high_impact_threshold;
        }
        if other.analysis.enable_call_graph.is_some() {
            self.analysis.enable_call_graph = other.analysis.enable_call_graph;
        }
        if other.analysis.enable_code_scanning.is_some() {
            self.analysis.enable_code_scanning = other.analysis.enable_code_scanning;
        }
    }

    /// Apply environment variable overrides.
    /// Pattern: `RIPPLE_SCAN_MAX_FILE_SIZE`, `RIPPLE_ANALYSIS_MAX_DEPTH`, etc.
    fn apply_env_overrides(config: &mut RippleConfig) {
        if let Some(v) = env_parse::<u64>("RIPPLE_SCAN_MAX_FILE_SIZE") {
            config.scan.max_file_size = Some(v);
        }
        if let Some(v) = env_parse::<bool>("RIPPLE_SCAN_FOLLOW_SYMLINKS") {
            config.scan.follow_symlinks = Some(v);
        }
        if let Some(v) = env_parse::<u32>("RIPPLE_ANALYSIS_MAX_DEPTH") {
            config.analysis.max_depth = Some(v);
        }
        if let Some(v) = env_parse::<u32>("RIPPLE_ANALYSIS_CRITICAL_PATH_DEPTH") {
            config.analysis.critical_path_depth = Some(v);
        }
        if let Some(v) = env_parse::<usize>("RIPPLE_ANALYSIS_HELPER_THRESHOLD") {
            config.analysis.helper_high_impact_threshold = Some(v);
        }
        if let Some(v) = env_parse::<bool>("RIPPLE_ANALYSIS_ENABLE_CALL_GRAPH") {
            config.analysis.enable_call_graph = Some(v);
        }
        if let Some(v) = env_parse::<bool>("RIPPLE_ANALYSIS_ENABLE_CODE_SCANNING") {
            config.analysis.enable_code_scanning = Some(v);
        }
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }
}

/// Unparseable values are ignored, leaving the lower layer in place.
fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

/// Cross-platform home directory resolution.
fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
}
