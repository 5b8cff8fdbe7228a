//! Audit log models
//!
//! Audit entries are append-only: the core never updates or deletes them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind of task mutation recorded in the audit log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuditAction {
    #[serde(rename = "TASK_CREATED")]
    TaskCreated,
    #[serde(rename = "TASK_UPDATED")]
    TaskUpdated,
    #[serde(rename = "TASK_DELETED")]
    TaskDeleted,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::TaskCreated => "TASK_CREATED",
            AuditAction::TaskUpdated => "TASK_UPDATED",
            AuditAction::TaskDeleted => "TASK_DELETED",
        }
    }

    pub fn parse(s: &str) -> Option<AuditAction> {
        match s {
            "TASK_CREATED" => Some(AuditAction::TaskCreated),
            "TASK_UPDATED" => Some(AuditAction::TaskUpdated),
            "TASK_DELETED" => Some(AuditAction::TaskDeleted),
            _ => None,
        }
    }
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditLogEntry {
    pub id: Uuid,
    pub organization_id: Uuid,
    /// Actor, when known
    pub user_id: Option<Uuid>,
    pub action: AuditAction,
    pub task_id: Uuid,
    /// Acting role name at the time of the mutation
    pub role: String,
    pub details: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AuditLogQuery {
    pub action: Option<AuditAction>,
    pub task_id: Option<Uuid>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}
