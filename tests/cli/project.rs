//! Organization and project collaborator commands.

use crate::support::*;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test(flavor = "multi_thread")]
async fn test_project_members_flags_keyless() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/projects/proj-1/members"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "project_id": "proj-1",
            "members": [
                {"email": "alice@example.com", "permission": "admin", "age_public_key": "age1alicekeyalicekeyalicekey"},
                {"email": "carol@example.com", "permission": "read"}
            ],
            "total": 2
        })))
        .mount(&server)
        .await;
    let t = Test::bound("proj-1");
    let api = format!("{}/api/v1", server.uri());

    let mut cmd = t.cmd_against(&api);
    cmd.args(["project", "members"]);
    let output = tokio::task::spawn_blocking(move || cmd.output().unwrap())
        .await
        .unwrap();

    assert_success(&output);
    assert_stdout_contains(&output, "alice@example.com");
    assert_stdout_contains(&output, "no key");
    assert_stdout_contains(&output, "1 member(s) have no public key");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_project_grant_hints_rotation() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/projects/proj-1/access"))
        .and(body_json(json!({"email": "bob@example.com", "permission": "write"})))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;
    let t = Test::bound("proj-1");
    let api = format!("{}/api/v1", server.uri());

    let mut cmd = t.cmd_against(&api);
    cmd.args(["project", "grant", "bob@example.com", "--permission", "write"]);
    let output = tokio::task::spawn_blocking(move || cmd.output().unwrap())
        .await
        .unwrap();

    assert_success(&output);
    assert_stdout_contains(&output, "granted bob@example.com");
    assert_stderr_contains(&output, "envv secrets rotate");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_forbidden_hints_admin() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/v1/projects/proj-1/access/u-2"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "error": "admin permission required",
            "code": "forbidden"
        })))
        .mount(&server)
        .await;
    let t = Test::bound("proj-1");
    let api = format!("{}/api/v1", server.uri());

    let mut cmd = t.cmd_against(&api);
    cmd.args(["project", "revoke", "u-2"]);
    let output = tokio::task::spawn_blocking(move || cmd.output().unwrap())
        .await
        .unwrap();

    assert_failure(&output);
    assert_stderr_contains(&output, "access denied: admin permission required");
    assert_stderr_contains(&output, "ask a project admin");
}

#[test]
fn test_org_members_requires_org_outside_project() {
    let t = Test::new();
    t.login("alice@example.com");
    let output = t.run(&["org", "members"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "--org is required");
}
