//! Graph analyses over the call graph.

pub mod impact;
