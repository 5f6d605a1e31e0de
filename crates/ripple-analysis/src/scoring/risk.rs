//! Risk levels and test effort estimates.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

const BASE_HOURS_PER_REPO: f64 = 4.0;
const HOURS_PER_IMPACTED_FUNCTION: f64 = 0.5;
const MAX_FUNCTION_HOURS: f64 = 8.0;
/// Score assumed for a repository with no computed score.
const DEFAULT_REPO_SCORE: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }

    pub fn is_high_or_critical(&self) -> bool {
        matches!(self, Self::High | Self::Critical)
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A changed helper with score > 0.5 is high regardless of the other rules.
pub fn calculate_risk_level(score: f64, is_breaking: bool, helper_changed: bool) -> RiskLevel {
    if helper_changed && score > 0.5 {
        return RiskLevel::High;
    }
    if is_breaking || score >= 0.8 {
        RiskLevel::Critical
    } else if score >= 0.6 {
        RiskLevel::High
    } else if score >= 0.4 {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

/// Hours of testing: 4h × (1 + score) per affected repository, plus 0.5h per
/// impacted function up to 8h. Rounded to two decimals.
pub fn estimate_test_effort(
    affected: &[String],
    scores: &BTreeMap<String, f64>,
    impacted_function_count: usize,
) -> f64 {
    let repo_hours: f64 = affected
        .iter()
        .map(|repo| {
            let score = scores.get(repo).copied().unwrap_or(DEFAULT_REPO_SCORE);
            BASE_HOURS_PER_REPO * (1.0 + score)
        })
        .sum();
    let function_hours =
        (impacted_function_count as f64 * HOURS_PER_IMPACTED_FUNCTION).min(MAX_FUNCTION_HOURS);
    ((repo_hours + function_hours) * 100.0).round() / 100.0
}
