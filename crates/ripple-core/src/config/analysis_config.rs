//! Analysis configuration.

use serde::{Deserialize, Serialize};

use crate::constants::{
    CRITICAL_PATH_MAX_DEPTH, DEFAULT_HELPER_HIGH_IMPACT_THRESHOLD, DEFAULT_MAX_IMPACT_DEPTH,
};

/// Configuration for call graph and impact analysis.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Depth bound for impact propagation. Default: 3.
    pub max_depth: Option<u32>,
    /// Depth bound for critical path enumeration. Default: 5.
    pub critical_path_depth: Option<u32>,
    /// Caller count above which a helper change is "high" impact. Default: 5.
    pub helper_high_impact_threshold: Option<usize>,
    /// Build call graphs for changed repositories. Default: true.
    pub enable_call_graph: Option<bool>,
    /// Infer repository dependencies by scanning imports. Default: true.
    pub enable_code_scanning: Option<bool>,
}

impl AnalysisConfig {
    /// Returns the effective propagation depth, defaulting to 3.
    pub fn effective_max_depth(&self) -> u32 {
        self.max_depth.unwrap_or(DEFAULT_MAX_IMPACT_DEPTH)
    }

    /// Returns the effective critical path depth, defaulting to 5.
    pub fn effective_critical_path_depth(&self) -> u32 {
        self.critical_path_depth.unwrap_or(CRITICAL_PATH_MAX_DEPTH)
    }

    pub fn effective_helper_high_impact_threshold(&self) -> usize {
        self.helper_high_impact_threshold
            .unwrap_or(DEFAULT_HELPER_HIGH_IMPACT_THRESHOLD)
    }

    pub fn effective_enable_call_graph(&self) -> bool {
        self.enable_call_graph.unwrap_or(true)
    }

    pub fn effective_enable_code_scanning(&self) -> bool {
        self.enable_code_scanning.unwrap_or(true)
    }
}
