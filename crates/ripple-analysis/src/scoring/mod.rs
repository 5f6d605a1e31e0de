//! Repository impact scoring: change-type weights, dependent scores, risk
//! levels, test effort and countermeasures.

pub mod change_type;
pub mod countermeasures;
pub mod repo_impact;
pub mod risk;

pub use change_type::ChangeType;
pub use countermeasures::{Countermeasure, CountermeasureKind, SuggestedTest};
pub use repo_impact::{CallGraphEvidence, ImpactCalculator};
pub use risk::{calculate_risk_level, estimate_test_effort, RiskLevel};
