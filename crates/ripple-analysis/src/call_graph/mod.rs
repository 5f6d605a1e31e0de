//! Per-repository call graph: function catalog, call edges, name resolution.

pub mod builder;
pub mod classify;
pub mod resolution;
pub mod types;

pub use builder::{build_call_graph, build_call_graphs, CallGraphBuilder, RepositorySource};
pub use resolution::{Resolution, ResolutionDiagnostics};
pub use types::{CallEdge, CallGraph, FunctionNode};
