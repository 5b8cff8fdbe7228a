//! Organization (tenant) API endpoints
//!
//! Guarded by `org.manage`. Reading the caller's own organization only
//! requires authentication.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::OrganizationRepository,
    middleware::{rbac::require_permission, AuthUser},
    models::{
        CreateOrganizationRequest, Organization, PermissionKey, UpdateOrganizationRequest,
    },
    utils::AppError,
    AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_organizations).post(create_organization))
        .route("/current", get(get_current_organization))
        .route(
            "/{id}",
            get(get_organization)
                .put(update_organization)
                .delete(delete_organization),
        )
}

fn parse_org_id(id: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(id).map_err(|_| AppError::bad_request("Invalid organization ID"))
}

async fn list_organizations(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<Vec<Organization>>, AppError> {
    require_permission(&auth_user, PermissionKey::OrgManage)?;

    let repo = OrganizationRepository::new(&state.db);
    let orgs = repo.list().await.map_err(|e| {
        tracing::error!("Failed to list organizations: {}", e);
        AppError::internal("Failed to list organizations")
    })?;

    Ok(Json(orgs))
}

async fn get_current_organization(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<Organization>, AppError> {
    let repo = OrganizationRepository::new(&state.db);
    let org = repo
        .get_by_id(auth_user.organization_id)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get current organization: {}", e);
            AppError::internal("Failed to get current organization")
        })?
        .ok_or_else(|| AppError::not_found("Organization not found"))?;

    Ok(Json(org))
}

async fn get_organization(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Organization>, AppError> {
    let uuid = parse_org_id(&id)?;

    // Reading your own org only needs a session; others need org.manage
    if uuid != auth_user.organization_id {
        require_permission(&auth_user, PermissionKey::OrgManage)?;
    }

    let repo = OrganizationRepository::new(&state.db);
    let org = repo.get_by_id(uuid).await.map_err(|e| {
        tracing::error!("Failed to get organization: {}", e);
        AppError::internal("Failed to get organization")
    })?;

    match org {
        Some(o) => Ok(Json(o)),
        None => Err(AppError::not_found("Organization not found")),
    }
}

async fn create_organization(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(payload): Json<CreateOrganizationRequest>,
) -> Result<(StatusCode, Json<Organization>), AppError> {
    require_permission(&auth_user, PermissionKey::OrgManage)?;
    payload.validate()?;

    if !crate::utils::validation::validate_org_name(&payload.name) {
        return Err(AppError::bad_request("Invalid organization name"));
    }

    let repo = OrganizationRepository::new(&state.db);

    if let Some(parent_id) = payload.parent_id {
        repo.get_by_id(parent_id)
            .await
            .map_err(|e| {
                tracing::error!("Failed to check parent organization: {}", e);
                AppError::internal("Failed to create organization")
            })?
            .ok_or_else(|| AppError::bad_request("Parent organization not found"))?;
    }

    let org = repo.create(&payload).await.map_err(|e| {
        tracing::error!("Failed to create organization: {}", e);
        AppError::internal("Failed to create organization")
    })?;

    Ok((StatusCode::CREATED, Json(org)))
}

async fn update_organization(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
    Json(payload): Json<UpdateOrganizationRequest>,
) -> Result<Json<Organization>, AppError> {
    require_permission(&auth_user, PermissionKey::OrgManage)?;
    let uuid = parse_org_id(&id)?;

    if let Some(name) = &payload.name {
        if !crate::utils::validation::validate_org_name(name) {
            return Err(AppError::bad_request("Invalid organization name"));
        }
    }

    let repo = OrganizationRepository::new(&state.db);
    let updated = repo.update(uuid, &payload).await.map_err(|e| {
        tracing::error!("Failed to update organization: {}", e);
        AppError::internal("Failed to update organization")
    })?;

    match updated {
        Some(org) => Ok(Json(org)),
        None => Err(AppError::not_found("Organization not found")),
    }
}

async fn delete_organization(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<bool>, AppError> {
    require_permission(&auth_user, PermissionKey::OrgManage)?;
    let uuid = parse_org_id(&id)?;

    if uuid.to_string() == crate::models::DEFAULT_ORGANIZATION_ID {
        return Err(AppError::bad_request(
            "Default organization cannot be deleted",
        ));
    }

    let repo = OrganizationRepository::new(&state.db);
    let deleted = repo.delete(uuid).await.map_err(|e| {
        tracing::error!("Failed to delete organization: {}", e);
        AppError::internal("Failed to delete organization")
    })?;

    Ok(Json(deleted))
}
