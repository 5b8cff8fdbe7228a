//! User and organization management tests

use crate::common::TestApp;

#[tokio::test]
async fn test_owner_creates_user() {
    let app = TestApp::new().await;
    let token = app.owner_token().await;

    let response = app
        .post_json_auth(
            "/api/v1/users",
            serde_json::json!({
                "email": "new@example.com",
                "password": "password123",
                "display_name": "New User",
                "role": "ADMIN"
            }),
            &token,
        )
        .await;

    response.assert_created();
    let json: serde_json::Value = response.json();
    assert_eq!(json["email"], "new@example.com");
    assert_eq!(json["role"], "ADMIN");
    assert!(!response.text().contains("password_hash"));

    // The new account can log in
    app.post_json(
        "/api/v1/auth/login",
        serde_json::json!({ "email": "new@example.com", "password": "password123" }),
    )
    .await
    .assert_ok();
}

#[tokio::test]
async fn test_create_user_duplicate_email_rejected() {
    let app = TestApp::new().await;
    let token = app.owner_token().await;

    let response = app
        .post_json_auth(
            "/api/v1/users",
            serde_json::json!({ "email": "owner@example.com", "password": "password123" }),
            &token,
        )
        .await;

    response.assert_status(axum::http::StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_create_user_unknown_role_rejected() {
    let app = TestApp::new().await;
    let token = app.owner_token().await;

    let response = app
        .post_json_auth(
            "/api/v1/users",
            serde_json::json!({
                "email": "odd@example.com",
                "password": "password123",
                "role": "WIZARD"
            }),
            &token,
        )
        .await;

    response.assert_bad_request();
}

#[tokio::test]
async fn test_create_user_invalid_payload_rejected() {
    let app = TestApp::new().await;
    let token = app.owner_token().await;

    // Bad email
    app.post_json_auth(
        "/api/v1/users",
        serde_json::json!({ "email": "not-an-email", "password": "password123" }),
        &token,
    )
    .await
    .assert_status(axum::http::StatusCode::UNPROCESSABLE_ENTITY);

    // Short password
    app.post_json_auth(
        "/api/v1/users",
        serde_json::json!({ "email": "short@example.com", "password": "tiny" }),
        &token,
    )
    .await
    .assert_status(axum::http::StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_role_reassignment() {
    let app = TestApp::new().await;
    let token = app.owner_token().await;

    let created: serde_json::Value = app
        .post_json_auth(
            "/api/v1/users",
            serde_json::json!({ "email": "promote@example.com", "password": "password123" }),
            &token,
        )
        .await
        .json();
    assert_eq!(created["role"], "VIEWER");
    let id = created["id"].as_str().unwrap();

    let updated: serde_json::Value = app
        .put_json_auth(
            &format!("/api/v1/users/{}", id),
            serde_json::json!({ "role": "ADMIN" }),
            &token,
        )
        .await
        .json();
    assert_eq!(updated["role"], "ADMIN");

    // The promoted account can now create tasks
    let login: serde_json::Value = app
        .post_json(
            "/api/v1/auth/login",
            serde_json::json!({ "email": "promote@example.com", "password": "password123" }),
        )
        .await
        .json();
    let promoted_token = login["access_token"].as_str().unwrap();

    app.post_json_auth(
        "/api/v1/tasks",
        serde_json::json!({ "title": "Promoted" }),
        promoted_token,
    )
    .await
    .assert_created();
}

#[tokio::test]
async fn test_viewer_cannot_manage_users() {
    let app = TestApp::new().await;
    let viewer_token = app.viewer_token().await;

    app.get_auth("/api/v1/users", &viewer_token)
        .await
        .assert_forbidden();
    app.post_json_auth(
        "/api/v1/users",
        serde_json::json!({ "email": "nope@example.com", "password": "password123" }),
        &viewer_token,
    )
    .await
    .assert_forbidden();
}

#[tokio::test]
async fn test_organization_crud() {
    let app = TestApp::new().await;
    let token = app.owner_token().await;

    let created: serde_json::Value = app
        .post_json_auth(
            "/api/v1/organizations",
            serde_json::json!({ "name": "Acme Corp" }),
            &token,
        )
        .await
        .json();
    assert_eq!(created["name"], "Acme Corp");
    let id = created["id"].as_str().unwrap();

    let fetched: serde_json::Value = app
        .get_auth(&format!("/api/v1/organizations/{}", id), &token)
        .await
        .json();
    assert_eq!(fetched["name"], "Acme Corp");

    let updated: serde_json::Value = app
        .put_json_auth(
            &format!("/api/v1/organizations/{}", id),
            serde_json::json!({ "name": "Acme Holdings" }),
            &token,
        )
        .await
        .json();
    assert_eq!(updated["name"], "Acme Holdings");

    let response = app
        .delete_auth(&format!("/api/v1/organizations/{}", id), &token)
        .await;
    response.assert_ok();
}

#[tokio::test]
async fn test_default_organization_cannot_be_deleted() {
    let app = TestApp::new().await;
    let token = app.owner_token().await;

    let default_id = taskdeck::models::DEFAULT_ORGANIZATION_ID;
    app.delete_auth(&format!("/api/v1/organizations/{}", default_id), &token)
        .await
        .assert_bad_request();
}

#[tokio::test]
async fn test_current_organization_is_readable_by_anyone() {
    let app = TestApp::new().await;
    let viewer_token = app.viewer_token().await;

    let org: serde_json::Value = app
        .get_auth("/api/v1/organizations/current", &viewer_token)
        .await
        .json();
    assert_eq!(org["id"], taskdeck::models::DEFAULT_ORGANIZATION_ID);
}
