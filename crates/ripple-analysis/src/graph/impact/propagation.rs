//! Bounded multi-source BFS over reverse call edges.

use std::collections::{BTreeMap, VecDeque};

use ripple_core::constants::{HELPER_IMPACT_MULTIPLIER, MAX_SCORE_FACTOR};
use ripple_core::types::collections::FxHashSet;
use ripple_core::types::FunctionId;

use super::types::ImpactRecord;
use crate::call_graph::types::{CallGraph, FunctionNode};

/// Functions reached from `changed` through reverse call edges.
///
/// Seeds start at depth 0 in the given order and are never reported. A
/// caller is recorded at the depth it is first visited. Nodes up to and
/// including `max_depth` are expanded, so callers appear down to
/// `max_depth + 1`. Unknown names are ignored.
pub fn find_impacted_functions<S: AsRef<str>>(
    graph: &CallGraph,
    changed: &[S],
    max_depth: u32,
) -> BTreeMap<String, ImpactRecord> {
    let mut impacted = BTreeMap::new();
    let mut visited: FxHashSet<FunctionId> = FxHashSet::default();
    let mut queue: VecDeque<(FunctionId, u32, FunctionId)> = VecDeque::new();

    for name in changed {
        match graph.lookup(name.as_ref()) {
            Some(id) => {
                if visited.insert(id) {
                    queue.push_back((id, 0, id));
                }
            }
            None => tracing::debug!(function = name.as_ref(), "changed function not in catalog"),
        }
    }

    while let Some((current, depth, seed)) = queue.pop_front() {
        if depth > max_depth {
            continue;
        }
        let (Some(current_node), Some(seed_node)) = (graph.get(current), graph.get(seed)) else {
            continue;
        };
        let caller_depth = depth + 1;

        for caller in graph.callers(current) {
            if !visited.insert(caller) {
                continue;
            }
            let Some(caller_node) = graph.get(caller) else {
                continue;
            };
            impacted.insert(
                caller_node.qualified_name.clone(),
                ImpactRecord {
                    function: caller_node.qualified_name.clone(),
                    file: caller_node.file_path.clone(),
                    line: caller_node.start_line,
                    depth: caller_depth,
                    score: impact_score(graph, seed_node, caller_node, caller_depth),
                    reason: format!("Calls {} (depth {caller_depth})", current_node.name),
                    seed: seed_node.qualified_name.clone(),
                    is_direct_caller: caller_depth == 1,
                },
            );
            queue.push_back((caller, caller_depth, seed));
        }
    }

    tracing::debug!(
        seeds = changed.len(),
        impacted = impacted.len(),
        max_depth,
        "impact propagation complete"
    );
    impacted
}

/// Score for `caller` reached at `depth` from `seed`, clamped to [0, 1].
///
/// The caller-count factor counts the caller's own callers plus the edge the
/// impact arrives through.
pub fn impact_score(graph: &CallGraph, seed: &FunctionNode, caller: &FunctionNode, depth: u32) -> f64 {
    let mut score = 1.0 / (f64::from(depth) + 1.0);
    if seed.is_helper {
        score *= HELPER_IMPACT_MULTIPLIER;
    }
    score *= (f64::from(caller.complexity) / 10.0).min(MAX_SCORE_FACTOR);
    let incoming = graph.caller_count(caller.id) + 1;
    score *= (1.0 + incoming as f64 * 0.1).min(MAX_SCORE_FACTOR);
    score.clamp(0.0, 1.0)
}

/// Qualified names declared in files matching `changed_files`.
pub fn changed_functions<S: AsRef<str>>(graph: &CallGraph, changed_files: &[S]) -> Vec<String> {
    graph.functions_in_files(changed_files)
}
