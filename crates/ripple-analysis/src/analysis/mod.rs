//! End-to-end change analysis: one change request in, one impact report out.

pub mod analyzer;
pub mod types;

pub use analyzer::ChangeAnalyzer;
pub use types::{ChangeImpactReport, ChangeRequest, RepositoryImpact};
