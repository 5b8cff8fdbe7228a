//! Audit log tests

use uuid::Uuid;

use crate::common::TestApp;

async fn audit_entries(app: &TestApp, token: &str) -> Vec<serde_json::Value> {
    let response = app.get_auth("/api/v1/audit-logs", token).await;
    response.assert_ok();
    response.json()
}

#[tokio::test]
async fn test_create_appends_one_audit_entry() {
    let app = TestApp::new().await;
    let token = app.owner_token().await;

    let created: serde_json::Value = app
        .post_json_auth(
            "/api/v1/tasks",
            serde_json::json!({ "title": "Ship v1" }),
            &token,
        )
        .await
        .json();

    let entries = audit_entries(&app, &token).await;
    let matching: Vec<_> = entries
        .iter()
        .filter(|e| e["task_id"] == created["id"])
        .collect();

    assert_eq!(matching.len(), 1);
    assert_eq!(matching[0]["action"], "TASK_CREATED");
    assert_eq!(matching[0]["role"], "OWNER");
    assert_eq!(matching[0]["organization_id"], created["organization_id"]);
    assert!(matching[0]["details"]
        .as_str()
        .unwrap()
        .contains("Ship v1"));
}

#[tokio::test]
async fn test_full_lifecycle_appends_three_entries() {
    let app = TestApp::new().await;
    let token = app.owner_token().await;

    let created: serde_json::Value = app
        .post_json_auth(
            "/api/v1/tasks",
            serde_json::json!({ "title": "Lifecycle" }),
            &token,
        )
        .await
        .json();
    let id = created["id"].as_str().unwrap();

    app.put_json_auth(
        &format!("/api/v1/tasks/{}", id),
        serde_json::json!({ "status": "DONE" }),
        &token,
    )
    .await
    .assert_ok();

    app.delete_auth(&format!("/api/v1/tasks/{}", id), &token)
        .await
        .assert_ok();

    let entries = audit_entries(&app, &token).await;
    let actions: Vec<&str> = entries
        .iter()
        .filter(|e| e["task_id"] == created["id"])
        .map(|e| e["action"].as_str().unwrap())
        .collect();

    // Newest first
    assert_eq!(actions, vec!["TASK_DELETED", "TASK_UPDATED", "TASK_CREATED"]);
}

#[tokio::test]
async fn test_failed_mutations_append_nothing() {
    let app = TestApp::new().await;
    let owner_token = app.owner_token().await;
    let viewer_token = app.viewer_token().await;

    let before = audit_entries(&app, &owner_token).await.len();

    // NotFound delete: no entry
    app.delete_auth(&format!("/api/v1/tasks/{}", Uuid::new_v4()), &owner_token)
        .await
        .assert_not_found();

    // Forbidden create: no task, no entry
    app.post_json_auth(
        "/api/v1/tasks",
        serde_json::json!({ "title": "Denied" }),
        &viewer_token,
    )
    .await
    .assert_forbidden();

    let after = audit_entries(&app, &owner_token).await.len();
    assert_eq!(before, after);

    let tasks: Vec<serde_json::Value> = app.get_auth("/api/v1/tasks", &owner_token).await.json();
    assert!(tasks.iter().all(|t| t["title"] != "Denied"));
}

#[tokio::test]
async fn test_audit_list_filters_by_action() {
    let app = TestApp::new().await;
    let token = app.owner_token().await;

    let created: serde_json::Value = app
        .post_json_auth(
            "/api/v1/tasks",
            serde_json::json!({ "title": "Filtered" }),
            &token,
        )
        .await
        .json();
    let id = created["id"].as_str().unwrap();

    app.delete_auth(&format!("/api/v1/tasks/{}", id), &token)
        .await
        .assert_ok();

    let response = app
        .get_auth("/api/v1/audit-logs?action=TASK_DELETED", &token)
        .await;
    response.assert_ok();
    let entries: Vec<serde_json::Value> = response.json();

    assert!(!entries.is_empty());
    assert!(entries.iter().all(|e| e["action"] == "TASK_DELETED"));
}

#[tokio::test]
async fn test_audit_read_requires_permission() {
    let app = TestApp::new().await;
    let viewer_token = app.viewer_token().await;

    app.get_auth("/api/v1/audit-logs", &viewer_token)
        .await
        .assert_forbidden();
}
