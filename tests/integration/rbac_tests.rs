//! RBAC enforcement tests against the live API surface

use uuid::Uuid;

use crate::common::{generate_test_token, TestApp};

#[tokio::test]
async fn test_viewer_can_read_but_not_mutate_tasks() {
    let app = TestApp::new().await;
    let viewer_token = app.viewer_token().await;

    app.get_auth("/api/v1/tasks", &viewer_token).await.assert_ok();

    app.post_json_auth(
        "/api/v1/tasks",
        serde_json::json!({ "title": "Nope" }),
        &viewer_token,
    )
    .await
    .assert_forbidden();

    app.put_json_auth(
        &format!("/api/v1/tasks/{}", Uuid::new_v4()),
        serde_json::json!({ "status": "DONE" }),
        &viewer_token,
    )
    .await
    .assert_forbidden();

    app.delete_auth(&format!("/api/v1/tasks/{}", Uuid::new_v4()), &viewer_token)
        .await
        .assert_forbidden();
}

#[tokio::test]
async fn test_admin_manages_tasks_but_not_users_or_orgs() {
    let app = TestApp::new().await;
    let admin_token = generate_test_token(
        &app.state.config,
        Uuid::new_v4(),
        "admin@example.com",
        Some("ADMIN"),
        None,
    );

    app.post_json_auth(
        "/api/v1/tasks",
        serde_json::json!({ "title": "Admin task" }),
        &admin_token,
    )
    .await
    .assert_created();

    app.get_auth("/api/v1/audit-logs", &admin_token)
        .await
        .assert_ok();

    app.post_json_auth(
        "/api/v1/users",
        serde_json::json!({ "email": "x@example.com", "password": "password123" }),
        &admin_token,
    )
    .await
    .assert_forbidden();

    app.get_auth("/api/v1/organizations", &admin_token)
        .await
        .assert_forbidden();
}

#[tokio::test]
async fn test_owner_holds_the_full_catalog() {
    let app = TestApp::new().await;
    let token = app.owner_token().await;

    app.get_auth("/api/v1/tasks", &token).await.assert_ok();
    app.get_auth("/api/v1/audit-logs", &token).await.assert_ok();
    app.get_auth("/api/v1/users", &token).await.assert_ok();
    app.get_auth("/api/v1/organizations", &token).await.assert_ok();
}

#[tokio::test]
async fn test_token_without_role_is_forbidden() {
    let app = TestApp::new().await;
    let token = generate_test_token(
        &app.state.config,
        Uuid::new_v4(),
        "norole@example.com",
        None,
        None,
    );

    let response = app.get_auth("/api/v1/tasks", &token).await;
    response.assert_forbidden();
    assert!(response.text().contains("no role"));
}

#[tokio::test]
async fn test_unknown_role_fails_closed() {
    let app = TestApp::new().await;
    let token = generate_test_token(
        &app.state.config,
        Uuid::new_v4(),
        "super@example.com",
        Some("SUPERUSER"),
        None,
    );

    app.get_auth("/api/v1/tasks", &token).await.assert_forbidden();
    app.post_json_auth(
        "/api/v1/tasks",
        serde_json::json!({ "title": "Nope" }),
        &token,
    )
    .await
    .assert_forbidden();
}

#[tokio::test]
async fn test_role_claim_is_case_insensitive() {
    let app = TestApp::new().await;
    let token = generate_test_token(
        &app.state.config,
        Uuid::new_v4(),
        "lower@example.com",
        Some("owner"),
        None,
    );

    app.get_auth("/api/v1/tasks", &token).await.assert_ok();
}

#[tokio::test]
async fn test_roles_endpoint_exposes_catalog() {
    let app = TestApp::new().await;
    let token = app.viewer_token().await;

    let response = app.get_auth("/api/v1/roles", &token).await;
    response.assert_ok();

    let roles: Vec<serde_json::Value> = response.json();
    assert_eq!(roles.len(), 3);

    let viewer = roles.iter().find(|r| r["name"] == "VIEWER").unwrap();
    let keys: Vec<&str> = viewer["permission_keys"]
        .as_array()
        .unwrap()
        .iter()
        .map(|k| k.as_str().unwrap())
        .collect();
    assert_eq!(keys, vec!["tasks.read"]);

    let owner = roles.iter().find(|r| r["name"] == "OWNER").unwrap();
    assert_eq!(owner["permission_keys"].as_array().unwrap().len(), 7);
}

#[tokio::test]
async fn test_permissions_endpoint_lists_seeded_records() {
    let app = TestApp::new().await;
    let token = app.viewer_token().await;

    let response = app.get_auth("/api/v1/permissions", &token).await;
    response.assert_ok();

    let permissions: Vec<serde_json::Value> = response.json();
    let keys: Vec<&str> = permissions
        .iter()
        .map(|p| p["key"].as_str().unwrap())
        .collect();

    assert_eq!(keys.len(), 7);
    assert!(keys.contains(&"tasks.delete"));
    assert!(keys.contains(&"org.manage"));
}
