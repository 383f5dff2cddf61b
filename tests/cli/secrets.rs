//! `envv secrets` commands.

use crate::support::*;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use envv::core::cipher::{AgeEngine, Engine};
use envv::core::domain::Format;
use envv::core::keys::KeyFile;

#[test]
fn test_push_outside_project_hints_init() {
    let t = Test::new();
    t.write(".env.development", SAMPLE_ENV);

    let output = t.run(&["secrets", "push"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "not in an envv project");
    assert_stderr_contains(&output, "envv init");
}

#[test]
fn test_invalid_environment_rejected() {
    let t = Test::bound("proj-1");
    let output = t.run(&["secrets", "pull", "--env", "prod"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "invalid environment 'prod'");
}

#[test]
fn test_push_missing_file() {
    let t = Test::bound("proj-1");
    let output = t.run(&["secrets", "push", "--env", "production"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "file not found");
    assert_stderr_contains(&output, ".env.production");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_push_encrypts_for_members() {
    let server = MockServer::start().await;
    let t = Test::bound("proj-1");
    let public_key = KeyFile::new(t.key_path()).generate().unwrap();

    Mock::given(method("GET"))
        .and(path("/api/v1/projects/proj-1/members"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "members": [{"email": "alice@example.com", "permission": "admin", "age_public_key": public_key}]
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/projects/proj-1/secrets"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "version_id": "v-1",
            "version": 1,
            "environment": "development",
            "size_bytes": 900
        })))
        .expect(1)
        .mount(&server)
        .await;

    t.write(".env.development", SAMPLE_ENV);
    let api = format!("{}/api/v1", server.uri());
    let mut cmd = t.cmd_against(&api);
    cmd.args(["secrets", "push"]);
    let output = tokio::task::spawn_blocking(move || cmd.output().unwrap())
        .await
        .unwrap();

    assert_success(&output);
    assert_stdout_contains(&output, "pushed development version 1");

    let requests = server.received_requests().await.unwrap();
    let push = requests.iter().find(|r| r.method.as_str() == "POST").unwrap();
    let body: serde_json::Value = serde_json::from_slice(&push.body).unwrap();
    let document = body["encrypted_data"].as_str().unwrap();
    assert!(!document.contains("sk-test-12345"));
    assert!(document.contains(&public_key));
    assert_eq!(body["format"], "dotenv");
    assert_no_scratch(t.scratch.path());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_pull_writes_private_plaintext() {
    let server = MockServer::start().await;
    let t = Test::bound("proj-1");
    let keys = KeyFile::new(t.key_path());
    keys.generate().unwrap();

    // Encrypt the way a teammate's push would.
    let member = envv::core::domain::Recipient::new(
        "alice@example.com",
        Some(keys.public_key().unwrap()),
        envv::core::domain::Access::Permission(envv::core::domain::Permission::Admin),
    );
    let policy = envv::core::policy::build_policy(&[member]).unwrap();
    let staged = t.write("staged.env", SAMPLE_ENV);
    let sealed = AgeEngine::new(Vec::new())
        .encrypt(&staged, Format::Dotenv, &policy)
        .unwrap();
    std::fs::remove_file(&staged).unwrap();

    Mock::given(method("GET"))
        .and(path("/api/v1/projects/proj-1/secrets"))
        .and(query_param("environment", "staging"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "version_id": "v-2",
            "encrypted_data": String::from_utf8(sealed.ciphertext).unwrap(),
            "format": "dotenv",
            "version": 2,
            "environment": "staging",
            "metadata": sealed.metadata
        })))
        .mount(&server)
        .await;

    let api = format!("{}/api/v1", server.uri());
    let mut cmd = t.cmd_against(&api);
    cmd.args(["secrets", "pull", "--env", "staging"]);
    let output = tokio::task::spawn_blocking(move || cmd.output().unwrap())
        .await
        .unwrap();

    assert_success(&output);
    let pulled = t.dir.path().join(".env.staging");
    assert_eq!(std::fs::read_to_string(&pulled).unwrap(), SAMPLE_ENV);
    assert_private(&pulled);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_list_json() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/projects/proj-1/secrets/versions"))
        .and(query_param("environment", "development"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"version_id": "v-1", "version": 1, "environment": "development"},
            {"version_id": "v-2", "version": 2, "environment": "development"}
        ])))
        .mount(&server)
        .await;
    let t = Test::bound("proj-1");
    let api = format!("{}/api/v1", server.uri());

    let mut cmd = t.cmd_against(&api);
    cmd.args(["secrets", "list", "--json"]);
    let output = tokio::task::spawn_blocking(move || cmd.output().unwrap())
        .await
        .unwrap();

    assert_success(&output);
    let listed: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(listed["count"], 2);
    assert_eq!(listed["versions"][0]["version"], 2);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_rotate_with_nothing_stored() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/projects/proj-1/secrets"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": "no secrets"})))
        .mount(&server)
        .await;
    let t = Test::bound("proj-1");
    let api = format!("{}/api/v1", server.uri());

    let mut cmd = t.cmd_against(&api);
    cmd.args(["secrets", "rotate", "--env", "production"]);
    let output = tokio::task::spawn_blocking(move || cmd.output().unwrap())
        .await
        .unwrap();

    assert_success(&output);
    assert_stdout_contains(&output, "nothing to rotate");
    assert_no_scratch(t.scratch.path());
}
