//! # ripple-analysis
//!
//! Change impact analysis across repositories.
//! Provides repository scanning, tree-sitter parsers, per-repository call
//! graphs, impact propagation, repository dependency inference and
//! deployment ordering, impact scoring, user flow analysis, and the
//! end-to-end change analyzer.

pub mod analysis;
pub mod call_graph;
pub mod dependency;
pub mod graph;
pub mod parsers;
pub mod scanner;
pub mod scoring;
pub mod user_flow;
