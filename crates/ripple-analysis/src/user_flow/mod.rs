//! User flows: which user-triggered workflows a change touches, how to test
//! them, and what redeploying a repository involves.

pub mod analyzer;
pub mod types;

pub use analyzer::UserFlowAnalyzer;
pub use types::{
    AffectedFlow, DeploymentImpact, FailureScenario, FailureType, FlowStep, FlowTestStep,
    TestPhase, UserFlow, UserFlowCatalog, UserFlowImpact,
};
