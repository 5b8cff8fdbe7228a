//! Role introspection API endpoints
//!
//! Role records come from the database, their permission keys from the
//! static catalog.

use axum::{extract::State, routing::get, Json, Router};

use crate::{
    db::RbacRepository,
    middleware::AuthUser,
    models::{role_permissions, RoleWithPermissions},
    utils::AppError,
    AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new().route("/", get(list_roles))
}

async fn list_roles(
    State(state): State<AppState>,
    _auth_user: AuthUser,
) -> Result<Json<Vec<RoleWithPermissions>>, AppError> {
    let repo = RbacRepository::new(&state.db);
    let roles = repo.list_roles().await.map_err(|e| {
        tracing::error!("Failed to list roles: {}", e);
        AppError::internal("Failed to list roles")
    })?;

    let response = roles
        .into_iter()
        .map(|role| {
            let permission_keys = role_permissions(&role.name)
                .iter()
                .map(|k| k.as_str())
                .collect();
            RoleWithPermissions {
                role,
                permission_keys,
            }
        })
        .collect();

    Ok(Json(response))
}
