//! User flow matching, test plans, failure scenarios and deployment impact.

use std::fs;

use ripple_analysis::dependency::{DeploymentConfig, Repository};
use ripple_analysis::scoring::RiskLevel;
use ripple_analysis::user_flow::{
    AffectedFlow, FailureType, TestPhase, UserFlowAnalyzer, UserFlowCatalog,
};
use ripple_core::errors::{error_code, DependencyError, RippleErrorCode};
use tempfile::TempDir;

// ═══════════════════════════════════════════════════════════════════════════
// HELPERS
// ═══════════════════════════════════════════════════════════════════════════

const FLOWS_TOML: &str = r#"
[checkout_flow]
name = "Checkout Workflow"
description = "User buys the items in the cart"
affected_by_repos = ["api", "core", "ui"]
api_endpoints = ["/v1/orders"]
ui_path = "Shop -> Checkout"

[[checkout_flow.steps]]
step = 1
action = "User opens cart"
repository = "ui"
component = "cart_view"

[[checkout_flow.steps]]
step = 2
action = "API authenticates request"
repository = "api"
component = "authentication"

[[checkout_flow.steps]]
step = 3
action = "API prices order"
repository = "api"
component = "billing"

[[checkout_flow.steps]]
step = 4
action = "Core stores order"
repository = "core"
component = "orders"

[login_flow]
name = "Login Workflow"
affected_by_repos = ["api"]
ui_path = "Shop -> Sign in"

[[login_flow.steps]]
step = 1
action = "API checks credentials"
repository = "api"
component = "authentication"

[[login_flow.steps]]
step = 2
action = "API opens session"
repository = "api"
component = "session"

[[login_flow.steps]]
step = 3
action = "User sees the dashboard"
repository = "ui"
component = "login_form"

[status_flow]
name = "Status Workflow"
affected_by_repos = ["core"]
ui_path = "Shop -> Status"

[[status_flow.steps]]
step = 1
action = "User refreshes status"
repository = "ui"
"#;

const DEPLOYMENT_JSON: &str = r#"{
    "api": {"depends_on": [], "deployment_order": 1, "deployment_method": "rolling",
            "restart_required": ["api-gateway"], "config_files": ["api.yaml"]},
    "core": {"depends_on": ["api"], "deployment_order": 2},
    "ui": {"depends_on": ["api", "core"], "deployment_order": 3}
}"#;

fn analyzer() -> UserFlowAnalyzer {
    let flows = UserFlowCatalog::from_toml_str(FLOWS_TOML).unwrap();
    let deployment = DeploymentConfig::from_json_str(DEPLOYMENT_JSON).unwrap();
    let mut ui = Repository::new("ui").with_layer("ui");
    ui.user_facing = true;
    UserFlowAnalyzer::new(flows, deployment).with_repositories(&[
        Repository::new("api").with_layer("api"),
        Repository::new("core").with_layer("core"),
        ui,
    ])
}

fn ids(flows: &[AffectedFlow]) -> Vec<&str> {
    flows.iter().map(|f| f.flow_id.as_str()).collect()
}

// ═══════════════════════════════════════════════════════════════════════════
// Flow catalog
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn catalog_parses_toml_steps() {
    let catalog = UserFlowCatalog::from_toml_str(FLOWS_TOML).unwrap();
    assert_eq!(catalog.len(), 3);
    let checkout = catalog.get("checkout_flow").unwrap();
    assert_eq!(checkout.steps.len(), 4);
    assert_eq!(checkout.steps[1].component.as_deref(), Some("authentication"));
    assert!(catalog.get("status_flow").unwrap().steps[0].component.is_none());
    assert!(catalog.get("login_flow").unwrap().description.is_empty());
}

#[test]
fn catalog_loads_by_extension_and_rejects_garbage() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("flows.json");
    fs::write(
        &path,
        r#"{"search_flow": {"name": "Search", "steps": [{"step": 1, "action": "Search", "repository": "api"}]}}"#,
    )
    .unwrap();
    let catalog = UserFlowCatalog::load(&path).unwrap();
    assert_eq!(catalog.get("search_flow").unwrap().steps[0].repository, "api");

    let err = UserFlowCatalog::from_toml_str("[broken\nname = 1").unwrap_err();
    assert!(matches!(err, DependencyError::InvalidUserFlows { .. }));
    assert_eq!(err.error_code(), error_code::DEPENDENCY_ERROR);
    assert!(UserFlowCatalog::load(&dir.path().join("missing.toml")).is_err());
}

// ═══════════════════════════════════════════════════════════════════════════
// Affected flows
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn component_match_selects_steps_of_the_changed_repository() {
    let flows = analyzer().find_affected_flows("api", &["auth"]);
    assert_eq!(ids(&flows), vec!["checkout_flow", "login_flow"]);

    let checkout = &flows[0];
    assert_eq!(checkout.flow_name, "Checkout Workflow");
    assert_eq!(checkout.impacted_steps.len(), 1);
    assert_eq!(checkout.impacted_steps[0].step, 2);
    assert_eq!(checkout.all_steps.len(), 4);
    assert_eq!(checkout.api_endpoints, vec!["/v1/orders"]);
    // 1 of 4 steps is not above a quarter.
    assert_eq!(checkout.severity, RiskLevel::Low);
    // 1 of 3 steps.
    assert_eq!(flows[1].severity, RiskLevel::Medium);
}

#[test]
fn severity_follows_the_impacted_step_share() {
    let analyzer = analyzer();
    let half = analyzer.find_affected_flows("api", &["authentication", "billing"]);
    assert_eq!(half[0].flow_id, "checkout_flow");
    assert_eq!(half[0].severity, RiskLevel::Medium);

    let login = analyzer.find_affected_flows("api", &["authentication", "session"]);
    let login = login.iter().find(|f| f.flow_id == "login_flow").unwrap();
    assert_eq!(login.impacted_steps.len(), 2);
    assert_eq!(login.severity, RiskLevel::High);
}

#[test]
fn unmatched_components_skip_the_flow() {
    let analyzer = analyzer();
    assert!(analyzer.find_affected_flows("api", &["search"]).is_empty());
    assert!(analyzer.find_affected_flows("ghost", &["auth"]).is_empty());
}

#[test]
fn no_components_reports_every_listed_flow() {
    let flows = analyzer().find_affected_flows("core", &[] as &[&str]);
    assert_eq!(ids(&flows), vec!["checkout_flow", "status_flow"]);
    assert_eq!(flows[0].impacted_steps.len(), 1);
    assert_eq!(flows[0].impacted_steps[0].component.as_deref(), Some("orders"));
    // No step of `core`: every step is listed, severity stays low.
    assert_eq!(flows[1].impacted_steps, flows[1].all_steps);
    assert_eq!(flows[1].severity, RiskLevel::Low);
}

// ═══════════════════════════════════════════════════════════════════════════
// Test steps and failure scenarios
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_steps_wrap_each_flow_step() {
    let analyzer = analyzer();
    let flow = analyzer.find_affected_flows("api", &["auth"]).remove(0);
    let steps = analyzer.generate_test_steps(&flow, "api");
    assert_eq!(steps.len(), 6);

    assert_eq!(steps[0].phase, TestPhase::Setup);
    assert_eq!(steps[0].step_num, 0);
    assert_eq!(steps[0].details, "Ensure api is deployed with latest changes");

    assert_eq!(steps[1].phase, TestPhase::Execution);
    assert!(!steps[1].impacted);
    assert!(steps[2].impacted);
    assert_eq!(steps[2].details, "Test step: API authenticates request");
    assert_eq!(steps[2].validation, "Verify authentication responds correctly");
    assert_eq!(steps[2].repository.as_deref(), Some("api"));

    let last = steps.last().unwrap();
    assert_eq!(last.phase, TestPhase::Validation);
    assert_eq!(last.step_num, 5);
    assert_eq!(last.details, "Confirm Checkout Workflow completed successfully");
}

#[test]
fn steps_without_component_validate_completion() {
    let analyzer = analyzer();
    let flows = analyzer.find_affected_flows("core", &[] as &[&str]);
    let steps = analyzer.generate_test_steps(&flows[1], "core");
    assert_eq!(steps[1].validation, "Verify operation completes");
    assert!(steps[1].component.is_none());
}

#[test]
fn failure_scenarios_cover_impacted_steps_then_the_flow() {
    let analyzer = analyzer();
    let flow = analyzer.find_affected_flows("api", &["auth"]).remove(0);
    let scenarios = analyzer.identify_failure_scenarios(&flow, "api");
    assert_eq!(scenarios.len(), 3);

    assert_eq!(scenarios[0].failure_type, FailureType::ApiFailure);
    assert_eq!(scenarios[0].step, Some(2));
    assert_eq!(scenarios[0].description, "API call fails in authentication");
    assert_eq!(scenarios[0].impact, "User cannot proceed with Checkout Workflow");
    assert_eq!(scenarios[0].severity, RiskLevel::High);

    assert_eq!(scenarios[1].failure_type, FailureType::DataInconsistency);
    assert_eq!(scenarios[1].description, "Incorrect data returned from api");
    assert_eq!(scenarios[1].severity, RiskLevel::Medium);

    assert_eq!(scenarios[2].failure_type, FailureType::WorkflowFailure);
    assert_eq!(scenarios[2].step, None);
    assert_eq!(scenarios[2].symptom, "Users cannot access Shop -> Checkout");
    assert_eq!(scenarios[2].severity, RiskLevel::Critical);
}

#[test]
fn late_step_api_failures_are_medium() {
    let analyzer = analyzer();
    let flow = analyzer.find_affected_flows("api", &["billing"]).remove(0);
    let scenarios = analyzer.identify_failure_scenarios(&flow, "api");
    assert_eq!(scenarios[0].step, Some(3));
    assert_eq!(scenarios[0].severity, RiskLevel::Medium);
}

#[test]
fn flow_impacts_serialize_flat() {
    let impacts = analyzer().analyze_flows("api", &["auth"]);
    assert_eq!(impacts.len(), 2);
    let value = serde_json::to_value(&impacts[0]).unwrap();
    assert_eq!(value["flow_id"], "checkout_flow");
    assert_eq!(value["severity"], "low");
    assert_eq!(value["test_steps"][0]["phase"], "setup");
    assert_eq!(value["failure_scenarios"][0]["failure_type"], "api_failure");
    assert!(value["failure_scenarios"][2]["step"].is_null());
}

// ═══════════════════════════════════════════════════════════════════════════
// Deployment impact and user-facing changes
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn deployment_impact_reads_the_entry_and_its_dependents() {
    let analyzer = analyzer();
    let api = analyzer.check_deployment_impact("api").unwrap();
    assert_eq!(api.deployment_order, Some(1));
    assert_eq!(api.deployment_method.as_deref(), Some("rolling"));
    assert_eq!(api.services_to_restart, vec!["api-gateway"]);
    assert_eq!(api.config_files, vec!["api.yaml"]);
    assert_eq!(api.dependent_repos, vec!["core", "ui"]);

    let ui = analyzer.check_deployment_impact("ui").unwrap();
    assert_eq!(ui.depends_on, vec!["api", "core"]);
    assert!(ui.dependent_repos.is_empty());
    assert!(analyzer.check_deployment_impact("ghost").is_none());
}

#[test]
fn user_impacting_changes() {
    let analyzer = analyzer();
    assert!(analyzer.is_user_impacting_change("ui", &["lib/math.py"]));
    assert!(analyzer.is_user_impacting_change("api", &["src/Handlers/auth.py"]));
    assert!(analyzer.is_user_impacting_change("api", &["svc/API/v1/orders.py"]));
    assert!(!analyzer.is_user_impacting_change("api", &["lib/math.py"]));
    assert!(!UserFlowAnalyzer::default().is_user_impacting_change("ui", &["lib/math.py"]));
}
