//! User management API endpoints
//!
//! All routes require the `users.manage` permission and operate within the
//! caller's organization.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    middleware::{rbac::require_permission, AuthUser},
    models::{CreateUserRequest, PermissionKey, UpdateUserRequest, UserPublic},
    services::AuthService,
    utils::AppError,
    AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/{id}", get(get_user).put(update_user))
}

fn map_directory_error(e: anyhow::Error) -> AppError {
    let message = e.to_string();
    if message.contains("already exists") {
        AppError::conflict(message)
    } else if message.contains("does not exist") {
        AppError::bad_request(message)
    } else {
        tracing::error!("User directory error: {}", message);
        AppError::internal("User operation failed")
    }
}

async fn list_users(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<Vec<UserPublic>>, AppError> {
    require_permission(&auth_user, PermissionKey::UsersManage)?;

    let auth_service = AuthService::new(state.db.clone());
    let users = auth_service
        .list_users_in_org(auth_user.organization_id)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list users: {}", e);
            AppError::internal("Failed to list users")
        })?;

    Ok(Json(users))
}

async fn get_user(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<UserPublic>, AppError> {
    require_permission(&auth_user, PermissionKey::UsersManage)?;

    let id = Uuid::parse_str(&id).map_err(|_| AppError::bad_request("Invalid user ID"))?;

    let auth_service = AuthService::new(state.db.clone());
    let user = auth_service
        .get_user_by_id_in_org(auth_user.organization_id, &id)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch user: {}", e);
            AppError::internal("Failed to fetch user")
        })?
        .ok_or_else(|| AppError::not_found("User not found"))?;

    Ok(Json(user.into()))
}

async fn create_user(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(payload): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserPublic>), AppError> {
    require_permission(&auth_user, PermissionKey::UsersManage)?;
    payload.validate()?;

    // New users land in the caller's organization unless one is named
    let organization_id = payload
        .organization_id
        .unwrap_or(auth_user.organization_id);

    let auth_service = AuthService::new(state.db.clone());
    let user = auth_service
        .create_user(
            organization_id,
            &payload.email,
            payload.display_name.as_deref(),
            &payload.password,
            &payload.role,
        )
        .await
        .map_err(map_directory_error)?;

    Ok((StatusCode::CREATED, Json(user.into())))
}

async fn update_user(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<Json<UserPublic>, AppError> {
    require_permission(&auth_user, PermissionKey::UsersManage)?;

    let id = Uuid::parse_str(&id).map_err(|_| AppError::bad_request("Invalid user ID"))?;

    let auth_service = AuthService::new(state.db.clone());

    // Tenant check before the mutation: the target must be in the caller's org
    auth_service
        .get_user_by_id_in_org(auth_user.organization_id, &id)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch user: {}", e);
            AppError::internal("Failed to fetch user")
        })?
        .ok_or_else(|| AppError::not_found("User not found"))?;

    let user = auth_service
        .update_user(
            &id,
            payload.email.as_deref(),
            payload.display_name.as_deref(),
            payload.password.as_deref(),
            payload.role.as_deref(),
        )
        .await
        .map_err(map_directory_error)?;

    Ok(Json(user.into()))
}
