//! Task API endpoints
//!
//! Every handler is paired with its required permission key and checks it
//! before touching storage. Tenant scoping is a second, uniform check layered
//! after the permission check: single-task lookups are scoped to the caller's
//! organization, so another tenant's task id behaves as a missing record.
//!
//! Each successful mutation appends one audit entry. Audit failures are
//! logged and do not roll back the mutation.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::{task_repository::TaskPatch, AuditRepository, TaskRepository},
    middleware::{rbac::require_permission, AuthUser},
    models::{
        parse_due_date, AuditAction, CreateTaskRequest, PermissionKey, RoleName, Task,
        TaskWithAssignee, UpdateTaskRequest,
    },
    utils::AppError,
    AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_tasks).post(create_task))
        .route("/{id}", get(get_task).put(update_task).delete(delete_task))
}

fn parse_task_id(id: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(id).map_err(|_| AppError::not_found(format!("Task {} not found", id)))
}

async fn record_task_audit(
    state: &AppState,
    auth_user: &AuthUser,
    role: RoleName,
    action: AuditAction,
    task_id: Uuid,
    details: String,
) {
    let audit_repo = AuditRepository::new(&state.db);
    if let Err(e) = audit_repo
        .insert(
            action,
            task_id,
            auth_user.organization_id,
            role.as_str(),
            &details,
            Some(auth_user.user_id()),
        )
        .await
    {
        // The task mutation stands even when its audit entry is lost
        tracing::warn!(action = %action, task_id = %task_id, "Failed to record audit entry: {}", e);
    }
}

async fn list_tasks(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<Vec<TaskWithAssignee>>, AppError> {
    require_permission(&auth_user, PermissionKey::TasksRead)?;

    let repo = TaskRepository::new(&state.db);
    let tasks = repo
        .list_in_org(auth_user.organization_id)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list tasks: {}", e);
            AppError::internal("Failed to list tasks")
        })?;

    Ok(Json(tasks))
}

async fn get_task(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Task>, AppError> {
    require_permission(&auth_user, PermissionKey::TasksRead)?;
    let id = parse_task_id(&id)?;

    let repo = TaskRepository::new(&state.db);
    let task = repo
        .get_by_id_in_org(auth_user.organization_id, id)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch task: {}", e);
            AppError::internal("Failed to fetch task")
        })?
        .ok_or_else(|| AppError::not_found(format!("Task {} not found", id)))?;

    Ok(Json(task))
}

async fn create_task(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(payload): Json<CreateTaskRequest>,
) -> Result<(StatusCode, Json<Task>), AppError> {
    let role = require_permission(&auth_user, PermissionKey::TasksCreate)?;
    payload.validate()?;

    let due_date = match payload.due_date.as_deref() {
        Some(input) => Some(
            parse_due_date(input)
                .ok_or_else(|| AppError::bad_request(format!("Invalid due date: {}", input)))?,
        ),
        None => None,
    };

    // The organization always comes from the session claims; a caller cannot
    // create tasks in another tenant by naming it in the payload.
    let mut task = Task::new(auth_user.organization_id, payload.title);
    task.description = payload.description;
    task.status = payload.status.unwrap_or_default();
    task.due_date = due_date;
    task.assignee_id = payload.assignee_id;

    let repo = TaskRepository::new(&state.db);
    repo.insert(&task).await.map_err(|e| {
        tracing::error!("Failed to create task: {}", e);
        AppError::internal("Failed to create task")
    })?;

    record_task_audit(
        &state,
        &auth_user,
        role,
        AuditAction::TaskCreated,
        task.id,
        format!("Created task \"{}\"", task.title),
    )
    .await;

    Ok((StatusCode::CREATED, Json(task)))
}

async fn update_task(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
    Json(payload): Json<UpdateTaskRequest>,
) -> Result<Json<Task>, AppError> {
    let role = require_permission(&auth_user, PermissionKey::TasksUpdate)?;
    let id = parse_task_id(&id)?;

    if let Some(title) = &payload.title {
        if !crate::utils::validation::validate_task_title(title) {
            return Err(AppError::bad_request("Invalid task title"));
        }
    }

    let due_date = match &payload.due_date {
        Some(Some(input)) => Some(Some(parse_due_date(input).ok_or_else(|| {
            AppError::bad_request(format!("Invalid due date: {}", input))
        })?)),
        Some(None) => Some(None),
        None => None,
    };

    let patch = TaskPatch {
        title: payload.title,
        description: payload.description,
        status: payload.status,
        due_date,
        assignee_id: payload.assignee_id,
    };

    let repo = TaskRepository::new(&state.db);
    let task = repo
        .update_in_org(auth_user.organization_id, id, &patch)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update task: {}", e);
            AppError::internal("Failed to update task")
        })?
        .ok_or_else(|| AppError::not_found(format!("Task {} not found", id)))?;

    record_task_audit(
        &state,
        &auth_user,
        role,
        AuditAction::TaskUpdated,
        task.id,
        format!("Updated task \"{}\"", task.title),
    )
    .await;

    Ok(Json(task))
}

async fn delete_task(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let role = require_permission(&auth_user, PermissionKey::TasksDelete)?;
    let id = parse_task_id(&id)?;

    let repo = TaskRepository::new(&state.db);
    let deleted = repo
        .delete_in_org(auth_user.organization_id, id)
        .await
        .map_err(|e| {
            tracing::error!("Failed to delete task: {}", e);
            AppError::internal("Failed to delete task")
        })?;

    if !deleted {
        return Err(AppError::not_found(format!("Task {} not found", id)));
    }

    record_task_audit(
        &state,
        &auth_user,
        role,
        AuditAction::TaskDeleted,
        id,
        format!("Deleted task {}", id),
    )
    .await;

    Ok(Json(serde_json::json!({ "success": true })))
}
