//! Call graph errors.

use super::error_code::{self, RippleErrorCode};

/// Errors raised by call graph operations.
///
/// Unresolved call targets are not errors; they are dropped during resolution.
#[derive(Debug, thiserror::Error)]
pub enum CallGraphError {
    #[error("Unknown function id {id} (graph has {node_count} nodes)")]
    UnknownFunction { id: u32, node_count: usize },
}

impl RippleErrorCode for CallGraphError {
    fn error_code(&self) -> &'static str {
        error_code::CALL_GRAPH_ERROR
    }
}
