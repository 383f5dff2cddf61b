//! `envv init` binding tests.

use crate::support::*;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mock_project(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/v1/projects/proj-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "proj-1",
            "name": "api",
            "organization_id": "org-1"
        })))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/organizations/org-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "org-1",
            "name": "Acme"
        })))
        .mount(server)
        .await;
}

#[tokio::test(flavor = "multi_thread")]
async fn test_init_writes_binding_and_gitignore() {
    let server = MockServer::start().await;
    mock_project(&server).await;
    let t = Test::new();
    t.login("alice@example.com");
    let api = format!("{}/api/v1", server.uri());

    let mut cmd = t.cmd_against(&api);
    cmd.args(["init", "--org", "org-1", "--project", "proj-1", "--env", "staging"]);
    let output = tokio::task::spawn_blocking(move || cmd.output().unwrap())
        .await
        .unwrap();

    assert_success(&output);
    let binding = std::fs::read_to_string(t.dir.path().join(".envv/config.toml")).unwrap();
    assert!(binding.contains("project_id = \"proj-1\""));
    assert!(binding.contains("organization_name = \"Acme\""));
    assert!(binding.contains("default_environment = \"staging\""));

    let gitignore = std::fs::read_to_string(t.dir.path().join(".gitignore")).unwrap();
    assert!(gitignore.contains(".env.*"));
}

#[test]
fn test_init_refuses_to_rebind_without_force() {
    let t = Test::bound("proj-1");
    let output = t.run(&["init", "--org", "org-2", "--project", "proj-2"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "already initialized");
}

#[test]
fn test_init_requires_login() {
    let t = Test::new();
    let output = t.run(&["init", "--org", "org-1", "--project", "proj-1"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "not logged in");
    assert!(!t.dir.path().join(".envv").exists());
}
