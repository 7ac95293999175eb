//! Config artifact generation and the secret-name registry.

use fireclass_core::artifact::{
    self, PROJECT_BINDING_PATH, RUNTIME_CONFIG_PATH, SECRET_REGISTRY_PATH,
};
use fireclass_core::types::{ExecutionMode, ProjectId};
use serde_json::Value;
use tempfile::TempDir;

fn demo_id() -> ProjectId {
    ProjectId::new("demo-123").unwrap()
}

#[test]
fn simulate_write_touches_nothing() {
    let temp = TempDir::new().unwrap();
    let binding = artifact::project_binding(&demo_id());

    artifact::write(temp.path(), &binding, ExecutionMode::Simulate).unwrap();

    assert!(!temp.path().join(PROJECT_BINDING_PATH).exists());
    assert_eq!(std::fs::read_dir(temp.path()).unwrap().count(), 0);
}

#[test]
fn live_write_creates_parent_directories_and_overwrites() {
    let temp = TempDir::new().unwrap();
    let config = artifact::runtime_config(&demo_id());

    artifact::write(temp.path(), &config, ExecutionMode::Live).unwrap();
    let first = std::fs::read(temp.path().join(RUNTIME_CONFIG_PATH)).unwrap();

    // A second write overwrites with identical bytes.
    artifact::write(temp.path(), &config, ExecutionMode::Live).unwrap();
    let second = std::fs::read(temp.path().join(RUNTIME_CONFIG_PATH)).unwrap();
    assert_eq!(first, second);

    let parsed: Value = serde_json::from_slice(&second).unwrap();
    assert_eq!(
        parsed["studentAppUrl"],
        Value::from("https://demo-123.web.app/student-app.html")
    );
    assert_eq!(parsed["games"].as_array().unwrap().len(), 2);
}

#[test]
fn project_binding_content_round_trips() {
    let temp = TempDir::new().unwrap();
    artifact::write(
        temp.path(),
        &artifact::project_binding(&demo_id()),
        ExecutionMode::Live,
    )
    .unwrap();

    let bytes = std::fs::read(temp.path().join(PROJECT_BINDING_PATH)).unwrap();
    let parsed: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(parsed["projects"]["default"], Value::from("demo-123"));
}

#[test]
fn secret_registry_appends_and_deduplicates() {
    let temp = TempDir::new().unwrap();

    assert!(artifact::record_secret(temp.path(), "B_KEY", ExecutionMode::Live).unwrap());
    assert!(artifact::record_secret(temp.path(), "A_KEY", ExecutionMode::Live).unwrap());
    // Duplicate is not re-added.
    assert!(!artifact::record_secret(temp.path(), "B_KEY", ExecutionMode::Live).unwrap());

    let recorded = artifact::recorded_secrets(temp.path()).unwrap();
    assert_eq!(recorded, vec!["A_KEY", "B_KEY"]);
}

#[test]
fn secret_registry_extends_an_existing_file() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join(SECRET_REGISTRY_PATH);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, br#"{ "secrets": ["EXISTING_KEY"] }"#).unwrap();

    assert!(artifact::record_secret(temp.path(), "NEW_KEY", ExecutionMode::Live).unwrap());

    let recorded = artifact::recorded_secrets(temp.path()).unwrap();
    assert_eq!(recorded, vec!["EXISTING_KEY", "NEW_KEY"]);
}

#[test]
fn simulate_record_secret_leaves_registry_untouched() {
    let temp = TempDir::new().unwrap();
    artifact::record_secret(temp.path(), "ANY_KEY", ExecutionMode::Simulate).unwrap();
    assert!(!temp.path().join(SECRET_REGISTRY_PATH).exists());
}
