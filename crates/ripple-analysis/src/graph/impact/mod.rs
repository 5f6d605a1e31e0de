//! Change impact over the reverse call graph: score propagation, helper
//! impacts, critical paths, test recommendations.

pub mod critical_paths;
pub mod helpers;
pub mod propagation;
pub mod recommendations;
pub mod types;

pub use critical_paths::{get_critical_paths, get_critical_paths_with_depth};
pub use helpers::identify_helper_method_impacts;
pub use propagation::{changed_functions, find_impacted_functions, impact_score};
pub use recommendations::{format_impact_tree, generate_test_recommendations};
pub use types::{
    CallerRef, CriticalPath, HelperImpactSummary, ImpactLevel, ImpactRecord, Priority,
    TestRecommendation, TestType,
};
