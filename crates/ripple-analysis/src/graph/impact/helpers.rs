//! Impact of changed helper functions.

use std::collections::VecDeque;

use ripple_core::constants::HELPER_CALLER_LIST_LIMIT;
use ripple_core::types::collections::FxHashSet;
use ripple_core::types::FunctionId;

use super::types::{CallerRef, HelperImpactSummary, ImpactLevel};
use crate::call_graph::types::{path_matches, CallGraph};

/// Summaries for every helper declared in a changed file that has at least
/// one caller. More than `high_threshold` callers is a high impact.
pub fn identify_helper_method_impacts<S: AsRef<str>>(
    graph: &CallGraph,
    changed_files: &[S],
    high_threshold: usize,
) -> Vec<HelperImpactSummary> {
    graph
        .functions()
        .filter(|f| f.is_helper && path_matches(&f.file_path, changed_files))
        .filter_map(|helper| {
            let callers = transitive_callers(graph, helper.id);
            if callers.is_empty() {
                return None;
            }
            let caller_count = callers.len();
            let callers = callers
                .into_iter()
                .take(HELPER_CALLER_LIST_LIMIT)
                .filter_map(|id| graph.get(id))
                .map(|c| CallerRef {
                    name: c.qualified_name.clone(),
                    file: c.file_path.clone(),
                    line: c.start_line,
                })
                .collect();
            Some(HelperImpactSummary {
                helper_function: helper.qualified_name.clone(),
                file: helper.file_path.clone(),
                line: helper.start_line,
                caller_count,
                callers,
                impact_level: if caller_count > high_threshold {
                    ImpactLevel::High
                } else {
                    ImpactLevel::Medium
                },
            })
        })
        .collect()
}

/// All direct and transitive callers in BFS order, excluding `start`.
pub(crate) fn transitive_callers(graph: &CallGraph, start: FunctionId) -> Vec<FunctionId> {
    let mut visited: FxHashSet<FunctionId> = FxHashSet::default();
    visited.insert(start);
    let mut queue = VecDeque::from([start]);
    let mut callers = Vec::new();

    while let Some(current) = queue.pop_front() {
        for caller in graph.callers(current) {
            if visited.insert(caller) {
                callers.push(caller);
                queue.push_back(caller);
            }
        }
    }
    callers
}
