//! Caller chains from a changed function to top-level entry functions.

use ripple_core::constants::CRITICAL_PATH_MAX_DEPTH;
use ripple_core::types::collections::{FxHashSet, SmallVec8};
use ripple_core::types::FunctionId;

use super::types::CriticalPath;
use crate::call_graph::types::CallGraph;

/// One caller chain per top-level (caller-less) ancestor, depth ≤ 5.
pub fn get_critical_paths(graph: &CallGraph, changed_function: &str) -> Vec<CriticalPath> {
    get_critical_paths_with_depth(graph, changed_function, CRITICAL_PATH_MAX_DEPTH)
}

/// As `get_critical_paths`, with an explicit depth bound. The changed
/// function is depth 0; chains that would go deeper are abandoned.
pub fn get_critical_paths_with_depth(
    graph: &CallGraph,
    changed_function: &str,
    max_depth: u32,
) -> Vec<CriticalPath> {
    let Some(start) = graph.lookup(changed_function) else {
        return Vec::new();
    };

    let mut search = PathSearch {
        graph,
        max_depth,
        path: SmallVec8::new(),
        on_path: FxHashSet::default(),
        seen_tops: FxHashSet::default(),
        paths: Vec::new(),
    };
    search.run(start);
    search.paths
}

/// Callers of one node on the current path, and the next one to descend into.
struct Frame {
    callers: Vec<FunctionId>,
    next: usize,
}

struct PathSearch<'g> {
    graph: &'g CallGraph,
    max_depth: u32,
    path: SmallVec8<FunctionId>,
    on_path: FxHashSet<FunctionId>,
    seen_tops: FxHashSet<FunctionId>,
    paths: Vec<CriticalPath>,
}

impl PathSearch<'_> {
    /// Depth-first over reverse edges with an explicit frame stack.
    fn run(&mut self, start: FunctionId) {
        let mut frames = vec![self.enter(start)];
        while let Some(frame) = frames.last_mut() {
            if let Some(&caller) = frame.callers.get(frame.next) {
                frame.next += 1;
                let child = self.enter(caller);
                frames.push(child);
            } else {
                frames.pop();
                if let Some(node) = self.path.pop() {
                    self.on_path.remove(&node);
                }
            }
        }
    }

    /// Push `node` onto the path and return the callers still to explore.
    fn enter(&mut self, node: FunctionId) -> Frame {
        let depth = self.path.len() as u32;
        self.path.push(node);
        self.on_path.insert(node);

        let mut callers = Vec::new();
        if self.graph.caller_count(node) == 0 {
            if self.seen_tops.insert(node) {
                let functions = self
                    .path
                    .iter()
                    .filter_map(|&id| self.graph.qualified_name(id))
                    .map(str::to_string)
                    .collect();
                self.paths.push(CriticalPath { functions });
            }
        } else if depth < self.max_depth {
            callers = self
                .graph
                .callers(node)
                .filter(|c| !self.on_path.contains(c))
                .collect();
        }
        Frame { callers, next: 0 }
    }
}
