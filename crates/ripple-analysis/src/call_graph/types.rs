//! Call graph types: arena of function nodes plus forward/reverse adjacency.

use std::collections::{BTreeMap, BTreeSet};

use ripple_core::errors::CallGraphError;
use ripple_core::types::collections::FxHashMap;
use ripple_core::types::FunctionId;
use serde::{Deserialize, Serialize};

use super::resolution::ResolutionDiagnostics;
use crate::scanner::language_detect::Language;

/// A function in the call graph.
///
/// Identity is (qualified_name, file_path, start_line); the other fields are
/// derived attributes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionNode {
    pub id: FunctionId,
    pub name: String,
    pub qualified_name: String,
    pub file_path: String,
    pub start_line: u32,
    pub end_line: u32,
    pub enclosing_type: Option<String>,
    pub language: Language,
    pub is_helper: bool,
    /// Always ≥ 1.
    pub complexity: u32,
    pub parameter_count: usize,
    pub statement_count: usize,
}

impl FunctionNode {
    pub fn identity(&self) -> (&str, &str, u32) {
        (&self.qualified_name, &self.file_path, self.start_line)
    }
}

impl PartialEq for FunctionNode {
    fn eq(&self, other: &Self) -> bool {
        self.identity() == other.identity()
    }
}

impl Eq for FunctionNode {}

impl std::hash::Hash for FunctionNode {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.identity().hash(state);
    }
}

/// A directed call relationship. Repeated calls collapse into one edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CallEdge {
    pub caller: FunctionId,
    pub callee: FunctionId,
    pub count: u32,
}

/// The call graph of one repository.
#[derive(Debug, Default)]
pub struct CallGraph {
    nodes: Vec<FunctionNode>,
    /// Qualified name → id.
    catalog: FxHashMap<String, FunctionId>,
    /// Bare name → first declared id with that name.
    bare_names: FxHashMap<String, FunctionId>,
    /// File path → ids declared there.
    file_nodes: FxHashMap<String, Vec<FunctionId>>,
    forward: FxHashMap<FunctionId, BTreeMap<FunctionId, u32>>,
    reverse: FxHashMap<FunctionId, BTreeSet<FunctionId>>,
    changed_files: Vec<String>,
    pub diagnostics: ResolutionDiagnostics,
}

impl CallGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of functions (nodes) in the graph.
    pub fn function_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of distinct call edges.
    pub fn edge_count(&self) -> usize {
        self.forward.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: FunctionId) -> Option<&FunctionNode> {
        self.nodes.get(id.index())
    }

    /// Like `get`, but an unknown id is an error.
    pub fn node(&self, id: FunctionId) -> Result<&FunctionNode, CallGraphError> {
        self.get(id).ok_or(CallGraphError::UnknownFunction {
            id: id.0,
            node_count: self.nodes.len(),
        })
    }

    /// Look up a function by qualified name.
    pub fn lookup(&self, qualified_name: &str) -> Option<FunctionId> {
        self.catalog.get(qualified_name).copied()
    }

    /// First declared function with this bare name.
    pub fn lookup_bare(&self, name: &str) -> Option<FunctionId> {
        self.bare_names.get(name).copied()
    }

    pub fn qualified_name(&self, id: FunctionId) -> Option<&str> {
        self.get(id).map(|n| n.qualified_name.as_str())
    }

    /// All functions in id order.
    pub fn functions(&self) -> impl Iterator<Item = &FunctionNode> {
        self.nodes.iter()
    }

    /// Add a function to the catalog.
    ///
    /// A qualified name seen before is replaced in place: the later
    /// declaration wins and keeps the earlier id.
    pub fn add_function(&mut self, mut node: FunctionNode) -> FunctionId {
        if let Some(&id) = self.catalog.get(&node.qualified_name) {
            let old_file = self.nodes[id.index()].file_path.clone();
            if let Some(ids) = self.file_nodes.get_mut(&old_file) {
                ids.retain(|&i| i != id);
            }
            node.id = id;
            self.file_nodes
                .entry(node.file_path.clone())
                .or_default()
                .push(id);
            self.nodes[id.index()] = node;
            return id;
        }

        let id = FunctionId::new(self.nodes.len());
        node.id = id;
        self.catalog.insert(node.qualified_name.clone(), id);
        self.bare_names.entry(node.name.clone()).or_insert(id);
        self.file_nodes
            .entry(node.file_path.clone())
            .or_default()
            .push(id);
        self.nodes.push(node);
        id
    }

    /// Record one call from `caller` to `callee`, keeping both maps in step.
    pub fn add_call(&mut self, caller: FunctionId, callee: FunctionId) -> Result<(), CallGraphError> {
        self.node(caller)?;
        self.node(callee)?;
        *self.forward.entry(caller).or_default().entry(callee).or_insert(0) += 1;
        self.reverse.entry(callee).or_default().insert(caller);
        Ok(())
    }

    /// Direct callers of `id`, in ascending id order.
    pub fn callers(&self, id: FunctionId) -> impl Iterator<Item = FunctionId> + '_ {
        self.reverse.get(&id).into_iter().flatten().copied()
    }

    pub fn caller_count(&self, id: FunctionId) -> usize {
        self.reverse.get(&id).map_or(0, BTreeSet::len)
    }

    /// Direct callees of `id` with call counts, in ascending id order.
    pub fn callees(&self, id: FunctionId) -> impl Iterator<Item = (FunctionId, u32)> + '_ {
        self.forward
            .get(&id)
            .into_iter()
            .flatten()
            .map(|(&callee, &count)| (callee, count))
    }

    pub fn edge(&self, caller: FunctionId, callee: FunctionId) -> Option<CallEdge> {
        let count = *self.forward.get(&caller)?.get(&callee)?;
        Some(CallEdge {
            caller,
            callee,
            count,
        })
    }

    /// Every edge, ordered by (caller, callee).
    pub fn edges(&self) -> Vec<CallEdge> {
        let mut edges: Vec<CallEdge> = self
            .forward
            .iter()
            .flat_map(|(&caller, callees)| {
                callees.iter().map(move |(&callee, &count)| CallEdge {
                    caller,
                    callee,
                    count,
                })
            })
            .collect();
        edges.sort_by_key(|e| (e.caller, e.callee));
        edges
    }

    pub fn set_changed_files(&mut self, changed_files: Vec<String>) {
        self.changed_files = changed_files;
    }

    /// Changed files this graph was built for.
    pub fn changed_files(&self) -> &[String] {
        &self.changed_files
    }

    /// Qualified names declared in any file whose path contains one of
    /// `changed_files`, in id order.
    pub fn functions_in_files<S: AsRef<str>>(&self, changed_files: &[S]) -> Vec<String> {
        let mut ids: Vec<FunctionId> = self
            .file_nodes
            .iter()
            .filter(|(file, _)| path_matches(file, changed_files))
            .flat_map(|(_, ids)| ids.iter().copied())
            .collect();
        ids.sort_unstable();
        ids.into_iter()
            .filter_map(|id| self.qualified_name(id))
            .map(str::to_string)
            .collect()
    }
}

/// Substring match of a node path against changed file strings.
pub fn path_matches<S: AsRef<str>>(file_path: &str, changed_files: &[S]) -> bool {
    changed_files
        .iter()
        .any(|changed| file_path.contains(changed.as_ref()))
}
