//! Taskdeck library
//!
//! Multi-tenant task tracking backend: CRUD endpoints for tasks, users,
//! roles/permissions, organizations and audit logs, guarded by a static
//! role-based access-control catalog.

pub mod api;
pub mod config;
pub mod db;
pub mod middleware;
pub mod models;
pub mod services;
pub mod utils;

pub use config::AppConfig;
pub use db::DbPool;
pub use middleware::{auth_middleware, AuthUser, Claims};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: AppConfig,
    /// Database connection pool
    pub db: DbPool,
}
