//! Test recommendations and a plain-text impact tree.

use std::collections::BTreeMap;
use std::fmt::Write;

use ripple_core::constants::{HIGH_IMPACT_SCORE, MEDIUM_IMPACT_SCORE};

use super::types::{ImpactRecord, Priority, TestRecommendation, TestType};

/// High-impact functions (score > 0.7) get unit and integration tests,
/// medium ones (0.4 < score ≤ 0.7) get a unit test. High come first.
pub fn generate_test_recommendations(
    impacted: &BTreeMap<String, ImpactRecord>,
) -> Vec<TestRecommendation> {
    let high = impacted
        .values()
        .filter(|r| r.score > HIGH_IMPACT_SCORE)
        .map(|r| {
            let stem = test_stem(&r.function);
            TestRecommendation {
                function: r.function.clone(),
                test_types: vec![TestType::Unit, TestType::Integration],
                priority: Priority::High,
                reason: format!("High impact score ({:.2})", r.score),
                file: r.file.clone(),
                suggested_tests: vec![
                    format!("test_{stem}_with_changed_dependency"),
                    format!("test_{stem}_integration"),
                ],
            }
        });

    let medium = impacted
        .values()
        .filter(|r| r.score > MEDIUM_IMPACT_SCORE && r.score <= HIGH_IMPACT_SCORE)
        .map(|r| TestRecommendation {
            function: r.function.clone(),
            test_types: vec![TestType::Unit],
            priority: Priority::Medium,
            reason: format!("Medium impact score ({:.2})", r.score),
            file: r.file.clone(),
            suggested_tests: vec![format!("test_{}_basic", test_stem(&r.function))],
        });

    high.chain(medium).collect()
}

fn test_stem(function: &str) -> String {
    function.to_lowercase().replace('.', "_")
}

/// Impacted functions grouped by depth, indented one level per depth.
pub fn format_impact_tree(impacted: &BTreeMap<String, ImpactRecord>) -> String {
    let mut records: Vec<&ImpactRecord> = impacted.values().collect();
    records.sort_by(|a, b| a.depth.cmp(&b.depth).then_with(|| a.function.cmp(&b.function)));

    let mut out = String::from("Impact Tree:\n");
    out.push_str(&"=".repeat(60));
    let mut current_depth = None;
    for record in records {
        if current_depth != Some(record.depth) {
            current_depth = Some(record.depth);
            let _ = write!(out, "\n\nDepth {}:", record.depth);
        }
        let indent = "  ".repeat(record.depth as usize);
        let marker = if record.score > HIGH_IMPACT_SCORE {
            "[high]"
        } else if record.score > MEDIUM_IMPACT_SCORE {
            "[medium]"
        } else {
            "[low]"
        };
        let _ = write!(
            out,
            "\n{indent}{marker} {} (score: {:.2})\n{indent}   at {}:{}",
            record.function, record.score, record.file, record.line
        );
    }
    out
}
