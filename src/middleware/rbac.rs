//! RBAC permission guard
//!
//! Each protected handler names its required permission key and calls
//! [`check_permission`] before doing any work. The check is a pure decision
//! over (role claim, required permission): it performs no I/O, so every
//! (role, permission) pair can be unit tested.
//!
//! The mapping from role to permissions is the static catalog in
//! `models::rbac`; unknown and missing roles fail closed.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::{
    models::{PermissionKey, RoleName},
    utils::error::{AppError, ErrorResponse},
};

use super::auth::AuthUser;

/// RBAC error types
#[derive(Debug, PartialEq)]
pub enum RbacError {
    /// Session carries no role claim
    NoRole,
    /// Role lacks the required permission (or is unknown to the catalog)
    PermissionDenied {
        role: String,
        permission: PermissionKey,
    },
}

impl IntoResponse for RbacError {
    fn into_response(self) -> Response {
        let message = match &self {
            RbacError::NoRole => "User has no role assigned".to_string(),
            RbacError::PermissionDenied { role, permission } => {
                format!("Role {} does not have permission {}", role, permission)
            }
        };

        let body = ErrorResponse::new("forbidden", message);

        (StatusCode::FORBIDDEN, Json(body)).into_response()
    }
}

impl From<RbacError> for AppError {
    fn from(err: RbacError) -> Self {
        match err {
            RbacError::NoRole => AppError::forbidden("User has no role assigned"),
            RbacError::PermissionDenied { role, permission } => AppError::forbidden(format!(
                "Role {} does not have permission {}",
                role, permission
            )),
        }
    }
}

/// Decide whether a role claim grants the required permission.
///
/// Role names are normalized case-insensitively; a missing or unknown role
/// denies every permission.
pub fn check_permission(
    role: Option<&str>,
    required: PermissionKey,
) -> Result<RoleName, RbacError> {
    let claim = role.filter(|r| !r.is_empty()).ok_or(RbacError::NoRole)?;

    match RoleName::parse(claim) {
        Some(role) if role.has_permission(required) => Ok(role),
        _ => Err(RbacError::PermissionDenied {
            role: claim.to_uppercase(),
            permission: required,
        }),
    }
}

/// Guard an authenticated request with a required permission
pub fn require_permission(
    auth_user: &AuthUser,
    required: PermissionKey,
) -> Result<RoleName, AppError> {
    check_permission(auth_user.role.as_deref(), required).map_err(AppError::from)
}
