//! Countermeasures: concrete follow-ups for helper changes and impacted
//! functions.

use serde::{Deserialize, Serialize};

use crate::graph::impact::types::{HelperImpactSummary, Priority, TestRecommendation, TestType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CountermeasureKind {
    HelperMethodChange,
    FunctionImpact,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestedTest {
    pub name: String,
    pub priority: Priority,
    pub test_type: TestType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Countermeasure {
    pub kind: CountermeasureKind,
    pub function: String,
    /// Impact level or priority name.
    pub risk: String,
    pub recommendations: Vec<String>,
    pub test_cases: Vec<SuggestedTest>,
}

impl Countermeasure {
    pub fn for_helper(impact: &HelperImpactSummary) -> Self {
        Self {
            kind: CountermeasureKind::HelperMethodChange,
            function: impact.helper_function.clone(),
            risk: impact.impact_level.name().to_string(),
            recommendations: vec![
                format!("Test all {} caller functions", impact.caller_count),
                "Run integration tests for affected flows".to_string(),
                format!("Review changes in {}", impact.file),
            ],
            test_cases: vec![SuggestedTest {
                name: format!(
                    "test_{}_with_all_callers",
                    impact.helper_function.replace('.', "_")
                ),
                priority: Priority::High,
                test_type: TestType::Integration,
            }],
        }
    }

    pub fn for_recommendation(rec: &TestRecommendation) -> Self {
        let test_types: Vec<&str> = rec.test_types.iter().map(TestType::name).collect();
        let test_type = rec.test_types.first().copied().unwrap_or(TestType::Unit);
        Self {
            kind: CountermeasureKind::FunctionImpact,
            function: rec.function.clone(),
            risk: rec.priority.name().to_string(),
            recommendations: vec![
                format!("Run {} tests", test_types.join(", ")),
                rec.reason.clone(),
            ],
            test_cases: rec
                .suggested_tests
                .iter()
                .map(|name| SuggestedTest {
                    name: name.clone(),
                    priority: rec.priority,
                    test_type,
                })
                .collect(),
        }
    }
}
