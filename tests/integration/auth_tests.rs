//! Authentication flow tests

use crate::common::TestApp;

#[tokio::test]
async fn test_health_endpoint_returns_ok() {
    let app = TestApp::new().await;
    let response = app.get("/api/v1/health").await;

    response.assert_ok();

    let json: serde_json::Value = response.json();
    assert_eq!(json["status"], "healthy");
}

#[tokio::test]
async fn test_readiness_probe() {
    let app = TestApp::new().await;
    let response = app.get("/api/v1/health/ready").await;

    response.assert_ok();
}

#[tokio::test]
async fn test_login_with_seeded_owner() {
    let app = TestApp::new().await;

    let response = app
        .post_json(
            "/api/v1/auth/login",
            serde_json::json!({ "email": "owner@example.com", "password": "password123" }),
        )
        .await;

    response.assert_ok();

    let json: serde_json::Value = response.json();
    assert!(json["access_token"].as_str().is_some());
    assert!(json["refresh_token"].as_str().is_some());
    assert_eq!(json["token_type"], "Bearer");
    assert_eq!(json["user"]["email"], "owner@example.com");
    assert_eq!(json["user"]["role"], "OWNER");
    // Password material must never appear in responses
    assert!(!response.text().contains("password_hash"));
}

#[tokio::test]
async fn test_login_with_wrong_password_is_generic_rejection() {
    let app = TestApp::new().await;

    let response = app
        .post_json(
            "/api/v1/auth/login",
            serde_json::json!({ "email": "owner@example.com", "password": "wrong" }),
        )
        .await;

    response.assert_unauthorized();

    // Unknown email gets the identical rejection (no enumeration)
    let response2 = app
        .post_json(
            "/api/v1/auth/login",
            serde_json::json!({ "email": "nobody@example.com", "password": "wrong" }),
        )
        .await;

    response2.assert_unauthorized();
    assert_eq!(response.text(), response2.text());
}

#[tokio::test]
async fn test_me_returns_current_user() {
    let app = TestApp::new().await;
    let token = app.owner_token().await;

    let response = app.get_auth("/api/v1/auth/me", &token).await;
    response.assert_ok();

    let json: serde_json::Value = response.json();
    assert_eq!(json["email"], "owner@example.com");
}

#[tokio::test]
async fn test_refresh_issues_new_access_token() {
    let app = TestApp::new().await;

    let login: serde_json::Value = app
        .post_json(
            "/api/v1/auth/login",
            serde_json::json!({ "email": "owner@example.com", "password": "password123" }),
        )
        .await
        .json();

    let refresh_token = login["refresh_token"].as_str().unwrap();

    let response = app
        .post_json(
            "/api/v1/auth/refresh",
            serde_json::json!({ "refresh_token": refresh_token }),
        )
        .await;

    response.assert_ok();
    let json: serde_json::Value = response.json();
    let new_token = json["access_token"].as_str().unwrap();

    // The refreshed token is a working access token
    app.get_auth("/api/v1/auth/me", new_token).await.assert_ok();
}

#[tokio::test]
async fn test_access_token_rejected_for_refresh() {
    let app = TestApp::new().await;
    let token = app.owner_token().await;

    let response = app
        .post_json(
            "/api/v1/auth/refresh",
            serde_json::json!({ "refresh_token": token }),
        )
        .await;

    response.assert_unauthorized();
}

#[tokio::test]
async fn test_protected_route_without_token() {
    let app = TestApp::new().await;
    let response = app.get("/api/v1/tasks").await;

    response.assert_unauthorized();
}

#[tokio::test]
async fn test_protected_route_with_garbage_token() {
    let app = TestApp::new().await;
    let response = app.get_auth("/api/v1/tasks", "not-a-jwt").await;

    response.assert_unauthorized();
}
