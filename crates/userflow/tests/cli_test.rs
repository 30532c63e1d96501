#![allow(deprecated)]

use assert_cmd::Command;
use httpmock::MockServer;
use predicates::prelude::*;
use serde_json::json;
use std::fs;
use tempfile::TempDir;

const PROMO_CONFIG: &str = r#"
user_flow:
  name: promo
  user_flow_type: signUp
  user_flow_type_version: 1.0
"#;

fn project(config: &str) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("userflow.yaml"), config).unwrap();
    dir
}

fn write_state(dir: &TempDir, resource: serde_json::Value) {
    let state_dir = dir.path().join(".userflow");
    fs::create_dir_all(&state_dir).unwrap();
    let state = json!({
        "version": 1,
        "updated_at": "2026-01-01T00:00:00Z",
        "resource": resource
    });
    fs::write(state_dir.join("state.json"), state.to_string()).unwrap();
}

fn promo_state(customization: bool) -> serde_json::Value {
    json!({
        "id": "B2C_1_promo",
        "object_id": "B2C_1_promo",
        "name": "promo",
        "user_flow_type": "signUp",
        "user_flow_type_version": 1.0,
        "is_language_customization_enabled": customization
    })
}

fn userflow(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("userflow").unwrap();
    cmd.current_dir(dir.path())
        .env_remove("USERFLOW_CONFIG_PATH")
        .env_remove("USERFLOW_GRAPH_TOKEN")
        .env_remove("USERFLOW_GRAPH_ENDPOINT");
    cmd
}

#[test]
fn test_cli_help() {
    let mut cmd = Command::cargo_bin("userflow").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("plan"))
        .stdout(predicate::str::contains("apply"))
        .stdout(predicate::str::contains("destroy"))
        .stdout(predicate::str::contains("import"));
}

#[test]
fn test_cli_version() {
    let mut cmd = Command::cargo_bin("userflow").unwrap();
    cmd.arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("userflow"));
}

#[test]
fn test_schema_lists_attributes() {
    let dir = project(PROMO_CONFIG);
    userflow(&dir)
        .arg("schema")
        .assert()
        .success()
        .stdout(predicate::str::contains("azuread_b2c_user_flow"))
        .stdout(predicate::str::contains("is_language_customization_enabled"));
}

#[test]
fn test_plan_create() {
    let dir = project(PROMO_CONFIG);
    userflow(&dir)
        .arg("plan")
        .assert()
        .success()
        .stdout(predicate::str::contains("B2C_1_promo"))
        .stdout(predicate::str::contains("will be created"));
}

#[test]
fn test_plan_flags_immutable_change() {
    let dir = project(
        r#"
user_flow:
  name: promo
  user_flow_type: signIn
  user_flow_type_version: 1.0
"#,
    );
    write_state(&dir, promo_state(false));

    userflow(&dir)
        .arg("plan")
        .assert()
        .success()
        .stdout(predicate::str::contains("user_flow_type"))
        .stdout(predicate::str::contains("immutable"))
        .stdout(predicate::str::contains("Apply will fail"));
}

#[test]
fn test_apply_requires_token() {
    let dir = project(PROMO_CONFIG);
    userflow(&dir)
        .arg("apply")
        .assert()
        .failure()
        .stderr(predicate::str::contains("USERFLOW_GRAPH_TOKEN"));
}

#[test]
fn test_apply_immutable_change_fails_without_requests() {
    let server = MockServer::start();
    let dir = project(
        r#"
user_flow:
  name: promo
  user_flow_type: signUp
  user_flow_type_version: 3.0
"#,
    );
    write_state(&dir, promo_state(false));
    let any_request = server.mock(|_when, then| {
        then.status(500);
    });

    userflow(&dir)
        .env("USERFLOW_GRAPH_TOKEN", "test-token")
        .env("USERFLOW_GRAPH_ENDPOINT", server.base_url())
        .arg("apply")
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Cannot update immutable field user_flow_type_version",
        ));

    assert_eq!(any_request.hits(), 0);
}

#[test]
fn test_apply_creates_user_flow() {
    let server = MockServer::start();
    let create = server.mock(|when, then| {
        when.method("POST").path("/identity/b2cUserFlows");
        then.status(201).json_body(json!({
            "id": "B2C_1_promo",
            "userFlowType": "signUp",
            "userFlowTypeVersion": 1.0,
            "isLanguageCustomizationEnabled": false
        }));
    });
    let read = server.mock(|when, then| {
        when.method("GET").path("/identity/b2cUserFlows/B2C_1_promo");
        then.status(200).json_body(json!({
            "id": "B2C_1_promo",
            "userFlowType": "signUp",
            "userFlowTypeVersion": 1.0,
            "defaultLanguageTag": "en",
            "isLanguageCustomizationEnabled": false
        }));
    });
    let dir = project(PROMO_CONFIG);

    userflow(&dir)
        .env("USERFLOW_GRAPH_TOKEN", "test-token")
        .env("USERFLOW_GRAPH_ENDPOINT", server.base_url())
        .arg("apply")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created"));

    create.assert();
    read.assert();

    let state: serde_json::Value = serde_json::from_str(
        &fs::read_to_string(dir.path().join(".userflow/state.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(state["resource"]["id"], "B2C_1_promo");
    assert_eq!(state["resource"]["default_language_tag"], "en");
    assert!(!dir.path().join(".userflow/lock.json").exists());
}

#[test]
fn test_apply_keeps_created_id_when_read_fails() {
    let server = MockServer::start();
    let create = server.mock(|when, then| {
        when.method("POST").path("/identity/b2cUserFlows");
        then.status(201).json_body(json!({
            "id": "B2C_1_promo",
            "userFlowType": "signUp",
            "userFlowTypeVersion": 1.0
        }));
    });
    let read = server.mock(|when, then| {
        when.method("GET").path("/identity/b2cUserFlows/B2C_1_promo");
        then.status(403).json_body(json!({
            "error": {"code": "Authorization_RequestDenied", "message": "denied"}
        }));
    });
    let dir = project(PROMO_CONFIG);

    userflow(&dir)
        .env("USERFLOW_GRAPH_TOKEN", "test-token")
        .env("USERFLOW_GRAPH_ENDPOINT", server.base_url())
        .arg("apply")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Retrieving user flow"));

    create.assert();
    assert!(read.hits() >= 1);

    let raw = fs::read_to_string(dir.path().join(".userflow/state.json")).unwrap();
    assert!(raw.contains("B2C_1_promo"));
    assert!(!dir.path().join(".userflow/lock.json").exists());

    // the flow is tracked, so the next plan does not create it again
    userflow(&dir)
        .arg("plan")
        .assert()
        .success()
        .stdout(predicate::str::contains("will be created").not());
}

#[test]
fn test_destroy_waits_for_not_found() {
    let server = MockServer::start();
    let delete = server.mock(|when, then| {
        when.method("DELETE")
            .path("/identity/b2cUserFlows/B2C_1_promo");
        then.status(204);
    });
    let confirm = server.mock(|when, then| {
        when.method("GET").path("/identity/b2cUserFlows/B2C_1_promo");
        then.status(404).json_body(json!({
            "error": {"code": "Request_ResourceNotFound", "message": "not found"}
        }));
    });
    let dir = project(PROMO_CONFIG);
    write_state(&dir, promo_state(true));

    userflow(&dir)
        .env("USERFLOW_GRAPH_TOKEN", "test-token")
        .env("USERFLOW_GRAPH_ENDPOINT", server.base_url())
        .arg("destroy")
        .assert()
        .success()
        .stdout(predicate::str::contains("Destroyed"));

    delete.assert();
    // retries are off while confirming, so a single read suffices
    confirm.assert();

    userflow(&dir)
        .arg("show")
        .assert()
        .success()
        .stdout(predicate::str::contains("null"));
}

#[test]
fn test_import_rejects_uuid() {
    let dir = project(PROMO_CONFIG);
    userflow(&dir)
        .arg("import")
        .arg("00000000-0000-0000-0000-000000000000")
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected B2C_1_<name>"));
}
