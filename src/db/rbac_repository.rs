//! Role and permission record repository
//!
//! These records exist so that roles and the permission catalog are
//! addressable over the API. The access guard never reads them; it uses the
//! static catalog in `models::rbac`.

use anyhow::{Context, Result};
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::db::parse_db_timestamp;
use crate::models::{PermissionKey, PermissionRecord, RoleName, RoleRecord};

#[derive(Debug, sqlx::FromRow)]
struct RoleRow {
    id: String,
    name: String,
    description: Option<String>,
    created_at: String,
}

#[derive(Debug, sqlx::FromRow)]
struct PermissionRow {
    id: String,
    key: String,
    description: Option<String>,
    created_at: String,
}

pub struct RbacRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> RbacRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list_roles(&self) -> Result<Vec<RoleRecord>> {
        let rows = sqlx::query_as::<_, RoleRow>(
            "SELECT id, name, description, created_at FROM roles ORDER BY name",
        )
        .fetch_all(self.pool)
        .await
        .context("Failed to list roles")?;

        Ok(rows.into_iter().map(row_to_role).collect())
    }

    pub async fn get_role_by_name(&self, name: &str) -> Result<Option<RoleRecord>> {
        let row = sqlx::query_as::<_, RoleRow>(
            "SELECT id, name, description, created_at FROM roles WHERE name = ?",
        )
        .bind(name)
        .fetch_optional(self.pool)
        .await
        .context("Failed to fetch role")?;

        Ok(row.map(row_to_role))
    }

    pub async fn list_permissions(&self) -> Result<Vec<PermissionRecord>> {
        let rows = sqlx::query_as::<_, PermissionRow>(
            "SELECT id, key, description, created_at FROM permissions ORDER BY key",
        )
        .fetch_all(self.pool)
        .await
        .context("Failed to list permissions")?;

        Ok(rows.into_iter().map(row_to_permission).collect())
    }

    /// Idempotently insert the role record for a built-in role
    pub async fn ensure_role(&self, role: RoleName) -> Result<()> {
        sqlx::query(
            "INSERT OR IGNORE INTO roles (id, name, description, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(role.uuid().to_string())
        .bind(role.as_str())
        .bind(role.description())
        .bind(Utc::now().to_rfc3339())
        .execute(self.pool)
        .await
        .with_context(|| format!("Failed to ensure role {}", role))?;

        Ok(())
    }

    /// Idempotently insert the record for a catalog permission key
    pub async fn ensure_permission(&self, key: PermissionKey) -> Result<()> {
        sqlx::query(
            "INSERT OR IGNORE INTO permissions (id, key, description, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(Uuid::new_v4().to_string())
        .bind(key.as_str())
        .bind(key.as_str())
        .bind(Utc::now().to_rfc3339())
        .execute(self.pool)
        .await
        .with_context(|| format!("Failed to ensure permission {}", key))?;

        Ok(())
    }
}

fn row_to_role(row: RoleRow) -> RoleRecord {
    RoleRecord {
        id: Uuid::parse_str(&row.id).unwrap_or_else(|_| Uuid::nil()),
        name: row.name,
        description: row.description,
        created_at: parse_db_timestamp(&row.created_at),
    }
}

fn row_to_permission(row: PermissionRow) -> PermissionRecord {
    PermissionRecord {
        id: Uuid::parse_str(&row.id).unwrap_or_else(|_| Uuid::nil()),
        key: row.key,
        description: row.description,
        created_at: parse_db_timestamp(&row.created_at),
    }
}
