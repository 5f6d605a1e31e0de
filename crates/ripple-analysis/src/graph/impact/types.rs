//! Impact analysis result types.

use serde::{Deserialize, Serialize};

/// One function reached by impact propagation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpactRecord {
    pub function: String,
    pub file: String,
    pub line: u32,
    /// Distance from the nearest changed function (direct callers are 1).
    pub depth: u32,
    /// Bounded to [0, 1].
    pub score: f64,
    pub reason: String,
    /// Changed function whose propagation reached this one first.
    pub seed: String,
    pub is_direct_caller: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImpactLevel {
    Medium,
    High,
}

impl ImpactLevel {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

/// A caller reference inside a helper impact summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallerRef {
    pub name: String,
    pub file: String,
    pub line: u32,
}

/// Callers affected by a changed helper function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HelperImpactSummary {
    pub helper_function: String,
    pub file: String,
    pub line: u32,
    /// Direct and transitive callers.
    pub caller_count: usize,
    /// At most the first ten callers, nearest first.
    pub callers: Vec<CallerRef>,
    pub impact_level: ImpactLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestType {
    Unit,
    Integration,
}

impl TestType {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Unit => "unit",
            Self::Integration => "integration",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestRecommendation {
    pub function: String,
    pub test_types: Vec<TestType>,
    pub priority: Priority,
    pub reason: String,
    pub file: String,
    pub suggested_tests: Vec<String>,
}

/// Caller chain from a changed function up to a top-level function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CriticalPath {
    /// Changed function first, top-level caller last.
    pub functions: Vec<String>,
}

impl CriticalPath {
    pub fn top_level(&self) -> Option<&str> {
        self.functions.last().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}
