//! API routes and handlers
//!
//! This module defines all API endpoints and their routing.

use axum::{routing::get, Router};

use crate::AppState;

mod audit_logs;
mod auth;
mod health;
mod organizations;
mod permissions;
mod roles;
mod tasks;
mod users;

pub use health::*;

/// Public API routes (no authentication required)
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .nest("/auth", auth::public_routes())
}

/// Protected API routes (authentication required)
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::protected_routes())
        .nest("/tasks", tasks::routes())
        .nest("/users", users::routes())
        .nest("/roles", roles::routes())
        .nest("/permissions", permissions::routes())
        .nest("/organizations", organizations::routes())
        .nest("/audit-logs", audit_logs::routes())
}
