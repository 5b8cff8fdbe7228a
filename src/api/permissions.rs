//! Permission introspection API endpoints
//!
//! Lists the persisted catalog records. Authorization never reads these; the
//! guard uses the static table in `models::rbac`.

use axum::{extract::State, routing::get, Json, Router};

use crate::{
    db::RbacRepository, middleware::AuthUser, models::PermissionRecord, utils::AppError, AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new().route("/", get(list_permissions))
}

async fn list_permissions(
    State(state): State<AppState>,
    _auth_user: AuthUser,
) -> Result<Json<Vec<PermissionRecord>>, AppError> {
    let repo = RbacRepository::new(&state.db);
    let permissions = repo.list_permissions().await.map_err(|e| {
        tracing::error!("Failed to list permissions: {}", e);
        AppError::internal("Failed to list permissions")
    })?;

    Ok(Json(permissions))
}
