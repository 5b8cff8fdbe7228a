//! Audit log repository
//!
//! Pure append and read: entries are never updated or deleted.

use anyhow::{Context, Result};
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::db::parse_db_timestamp;
use crate::models::{AuditAction, AuditLogEntry, AuditLogQuery};

#[derive(Debug, sqlx::FromRow)]
struct AuditRow {
    id: String,
    organization_id: String,
    user_id: Option<String>,
    action: String,
    task_id: String,
    role: String,
    details: Option<String>,
    created_at: String,
}

pub struct AuditRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> AuditRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn insert(
        &self,
        action: AuditAction,
        task_id: Uuid,
        organization_id: Uuid,
        role: &str,
        details: &str,
        user_id: Option<Uuid>,
    ) -> Result<AuditLogEntry> {
        let id = Uuid::new_v4();
        let created_at = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO audit_log (id, organization_id, user_id, action, task_id, role, details, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(id.to_string())
        .bind(organization_id.to_string())
        .bind(user_id.map(|u| u.to_string()))
        .bind(action.as_str())
        .bind(task_id.to_string())
        .bind(role)
        .bind(details)
        .bind(created_at.to_rfc3339())
        .execute(self.pool)
        .await
        .context("Failed to insert audit log entry")?;

        Ok(AuditLogEntry {
            id,
            organization_id,
            user_id,
            action,
            task_id,
            role: role.to_string(),
            details: Some(details.to_string()),
            created_at,
        })
    }

    /// List entries for one organization, newest first
    pub async fn list(
        &self,
        organization_id: Uuid,
        query: &AuditLogQuery,
    ) -> Result<Vec<AuditLogEntry>> {
        let mut sql = String::from(
            "SELECT id, organization_id, user_id, action, task_id, role, details, created_at \
             FROM audit_log WHERE organization_id = ?",
        );

        if query.action.is_some() {
            sql.push_str(" AND action = ?");
        }
        if query.task_id.is_some() {
            sql.push_str(" AND task_id = ?");
        }

        sql.push_str(" ORDER BY created_at DESC");

        if query.limit.is_some() {
            sql.push_str(" LIMIT ?");
        } else {
            sql.push_str(" LIMIT 100");
        }
        if query.offset.is_some() {
            sql.push_str(" OFFSET ?");
        }

        let mut q = sqlx::query_as::<_, AuditRow>(&sql).bind(organization_id.to_string());
        if let Some(action) = query.action {
            q = q.bind(action.as_str());
        }
        if let Some(task_id) = query.task_id {
            q = q.bind(task_id.to_string());
        }
        if let Some(limit) = query.limit {
            q = q.bind(limit as i64);
        }
        if let Some(offset) = query.offset {
            q = q.bind(offset as i64);
        }

        let rows = q
            .fetch_all(self.pool)
            .await
            .context("Failed to list audit logs")?;

        Ok(rows.into_iter().filter_map(row_to_audit).collect())
    }

    /// Count entries for one organization (test and introspection helper)
    pub async fn count(&self, organization_id: Uuid) -> Result<i64> {
        let row: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM audit_log WHERE organization_id = ?")
                .bind(organization_id.to_string())
                .fetch_one(self.pool)
                .await
                .context("Failed to count audit logs")?;

        Ok(row.0)
    }
}

fn row_to_audit(row: AuditRow) -> Option<AuditLogEntry> {
    Some(AuditLogEntry {
        id: Uuid::parse_str(&row.id).ok()?,
        organization_id: Uuid::parse_str(&row.organization_id).ok()?,
        user_id: row.user_id.as_deref().and_then(|s| Uuid::parse_str(s).ok()),
        action: AuditAction::parse(&row.action)?,
        task_id: Uuid::parse_str(&row.task_id).ok()?,
        role: row.role,
        details: row.details,
        created_at: parse_db_timestamp(&row.created_at),
    })
}
