//! Middleware components
//!
//! - Authentication (JWT)
//! - Authorization (RBAC permission guard)
//! - Rate limiting
//! - Security headers

pub mod auth;
pub mod rate_limit;
pub mod rbac;
pub mod security_headers;

pub use auth::{auth_middleware, AuthUser, Claims};
pub use rate_limit::{
    api_rate_limit_config, auth_rate_limit_config, create_rate_limit_state,
    rate_limit_middleware, spawn_rate_limit_cleanup,
};
pub use rbac::{check_permission, require_permission};
pub use security_headers::{api_cache_control_middleware, security_headers_middleware};
