//! Name-only call resolution. First match wins:
//! `Receiver.name`, `EnclosingType.name` for self receivers, bare `name`,
//! then the first declared function with that bare name.

use ripple_core::types::collections::FxHashMap;
use ripple_core::types::FunctionId;
use serde::{Deserialize, Serialize};

use super::types::{CallGraph, FunctionNode};
use crate::parsers::types::CallSite;

const SELF_RECEIVERS: &[&str] = &["self", "this", "cls"];

/// Strategy that resolved a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    /// `Receiver.name` matched a catalog key.
    Receiver,
    /// `self`/`this`/`cls` call resolved against the caller's type.
    EnclosingType,
    /// Bare qualified key.
    BareName,
    /// Fallback to the first declared function with the same name.
    FirstDeclared,
}

impl Resolution {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Receiver => "receiver",
            Self::EnclosingType => "enclosing_type",
            Self::BareName => "bare_name",
            Self::FirstDeclared => "first_declared",
        }
    }
}

/// Resolve a call site from `caller` against the catalog.
pub fn resolve_call(
    graph: &CallGraph,
    call: &CallSite,
    caller: &FunctionNode,
) -> Option<(FunctionId, Resolution)> {
    let name = call.callee_name.as_str();

    match call.receiver.as_deref() {
        Some(receiver) if SELF_RECEIVERS.contains(&receiver) => {
            if let Some(ty) = caller.enclosing_type.as_deref() {
                if let Some(id) = graph.lookup(&format!("{ty}.{name}")) {
                    return Some((id, Resolution::EnclosingType));
                }
            }
        }
        Some(receiver) => {
            if let Some(id) = graph.lookup(&format!("{receiver}.{name}")) {
                return Some((id, Resolution::Receiver));
            }
        }
        None => {}
    }

    if let Some(id) = graph.lookup(name) {
        return Some((id, Resolution::BareName));
    }

    graph
        .lookup_bare(name)
        .map(|id| (id, Resolution::FirstDeclared))
}

/// Resolution statistics collected while building a graph.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResolutionDiagnostics {
    pub total_call_sites: usize,
    pub resolved: usize,
    pub unresolved: usize,
    pub by_strategy: FxHashMap<String, usize>,
    /// (resolved, total) per language.
    pub by_language: FxHashMap<String, (usize, usize)>,
    /// Files skipped because they failed to parse.
    pub skipped_files: Vec<String>,
}

impl ResolutionDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, strategy: Option<Resolution>, language: &str) {
        self.total_call_sites += 1;
        let lang_entry = self.by_language.entry(language.to_string()).or_insert((0, 0));
        lang_entry.1 += 1;

        if let Some(s) = strategy {
            self.resolved += 1;
            *self.by_strategy.entry(s.name().to_string()).or_default() += 1;
            lang_entry.0 += 1;
        } else {
            self.unresolved += 1;
        }
    }

    pub fn resolution_rate(&self) -> f64 {
        if self.total_call_sites == 0 {
            0.0
        } else {
            self.resolved as f64 / self.total_call_sites as f64
        }
    }
}
