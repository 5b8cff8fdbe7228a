//! Task repository
//!
//! All lookups that act on a single task are scoped by organization id, so a
//! task belonging to another tenant behaves exactly like a missing record.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::db::parse_db_timestamp;
use crate::models::{Task, TaskAssignee, TaskStatus, TaskWithAssignee};

#[derive(Debug, sqlx::FromRow)]
struct TaskRow {
    id: String,
    organization_id: String,
    title: String,
    description: Option<String>,
    status: String,
    due_date: Option<String>,
    assignee_id: Option<String>,
    created_at: String,
    updated_at: String,
    assignee_email: Option<String>,
    assignee_display_name: Option<String>,
}

/// Fields applied to an existing task by `update`. Outer `Option` = field
/// present in the patch; inner `Option` = new value or explicit clear.
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub status: Option<TaskStatus>,
    pub due_date: Option<Option<DateTime<Utc>>>,
    pub assignee_id: Option<Option<Uuid>>,
}

pub struct TaskRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> TaskRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, task: &Task) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO tasks (id, organization_id, title, description, status, due_date, assignee_id, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(task.id.to_string())
        .bind(task.organization_id.to_string())
        .bind(&task.title)
        .bind(task.description.as_deref())
        .bind(task.status.as_str())
        .bind(task.due_date.map(|d| d.to_rfc3339()))
        .bind(task.assignee_id.map(|a| a.to_string()))
        .bind(task.created_at.to_rfc3339())
        .bind(task.updated_at.to_rfc3339())
        .execute(self.pool)
        .await
        .context("Failed to insert task")?;

        Ok(())
    }

    /// List tasks of one organization, newest first, with resolved assignees
    pub async fn list_in_org(&self, organization_id: Uuid) -> Result<Vec<TaskWithAssignee>> {
        let rows = sqlx::query_as::<_, TaskRow>(
            r#"
            SELECT t.id, t.organization_id, t.title, t.description, t.status,
                   t.due_date, t.assignee_id, t.created_at, t.updated_at,
                   u.email AS assignee_email, u.display_name AS assignee_display_name
            FROM tasks t
            LEFT JOIN users u ON u.id = t.assignee_id
            WHERE t.organization_id = ?
            ORDER BY t.created_at DESC
            "#,
        )
        .bind(organization_id.to_string())
        .fetch_all(self.pool)
        .await
        .context("Failed to list tasks")?;

        Ok(rows.into_iter().map(row_to_task_with_assignee).collect())
    }

    pub async fn get_by_id_in_org(
        &self,
        organization_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Task>> {
        let row = sqlx::query_as::<_, TaskRow>(
            r#"
            SELECT t.id, t.organization_id, t.title, t.description, t.status,
                   t.due_date, t.assignee_id, t.created_at, t.updated_at,
                   NULL AS assignee_email, NULL AS assignee_display_name
            FROM tasks t
            WHERE t.organization_id = ? AND t.id = ?
            "#,
        )
        .bind(organization_id.to_string())
        .bind(id.to_string())
        .fetch_optional(self.pool)
        .await
        .context("Failed to fetch task")?;

        Ok(row.map(row_to_task))
    }

    /// Apply a partial update. Returns the updated task, or `None` when no
    /// task with this id exists in the organization.
    pub async fn update_in_org(
        &self,
        organization_id: Uuid,
        id: Uuid,
        patch: &TaskPatch,
    ) -> Result<Option<Task>> {
        let existing = self.get_by_id_in_org(organization_id, id).await?;
        let Some(existing) = existing else {
            return Ok(None);
        };

        let title = patch.title.clone().unwrap_or(existing.title);
        let description = match &patch.description {
            Some(value) => value.clone(),
            None => existing.description,
        };
        let status = patch.status.unwrap_or(existing.status);
        let due_date = match &patch.due_date {
            Some(value) => *value,
            None => existing.due_date,
        };
        let assignee_id = match &patch.assignee_id {
            Some(value) => *value,
            None => existing.assignee_id,
        };
        let updated_at = Utc::now();

        sqlx::query(
            r#"
            UPDATE tasks
            SET title = ?, description = ?, status = ?, due_date = ?, assignee_id = ?, updated_at = ?
            WHERE organization_id = ? AND id = ?
            "#,
        )
        .bind(&title)
        .bind(description.as_deref())
        .bind(status.as_str())
        .bind(due_date.map(|d| d.to_rfc3339()))
        .bind(assignee_id.map(|a| a.to_string()))
        .bind(updated_at.to_rfc3339())
        .bind(organization_id.to_string())
        .bind(id.to_string())
        .execute(self.pool)
        .await
        .context("Failed to update task")?;

        self.get_by_id_in_org(organization_id, id).await
    }

    /// Hard-delete a task. Returns whether a row was removed.
    pub async fn delete_in_org(&self, organization_id: Uuid, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM tasks WHERE organization_id = ? AND id = ?")
            .bind(organization_id.to_string())
            .bind(id.to_string())
            .execute(self.pool)
            .await
            .context("Failed to delete task")?;

        Ok(result.rows_affected() > 0)
    }
}

fn row_to_task(row: TaskRow) -> Task {
    Task {
        id: Uuid::parse_str(&row.id).unwrap_or_else(|_| Uuid::nil()),
        organization_id: Uuid::parse_str(&row.organization_id).unwrap_or_else(|_| Uuid::nil()),
        title: row.title,
        description: row.description,
        status: TaskStatus::parse(&row.status).unwrap_or_default(),
        due_date: row.due_date.as_deref().map(parse_db_timestamp),
        assignee_id: row.assignee_id.as_deref().and_then(|s| Uuid::parse_str(s).ok()),
        created_at: parse_db_timestamp(&row.created_at),
        updated_at: parse_db_timestamp(&row.updated_at),
    }
}

fn row_to_task_with_assignee(row: TaskRow) -> TaskWithAssignee {
    let assignee = match (&row.assignee_id, &row.assignee_email) {
        (Some(id), Some(email)) => Uuid::parse_str(id).ok().map(|id| TaskAssignee {
            id,
            email: email.clone(),
            display_name: row.assignee_display_name.clone(),
        }),
        _ => None,
    };

    TaskWithAssignee {
        task: row_to_task(row),
        assignee,
    }
}
