//! Role-Based Access Control (RBAC) models
//!
//! The permission catalog is compile-time data: roles map to a fixed set of
//! permission keys. The `roles` and `permissions` database tables mirror this
//! catalog for introspection, but authorization decisions only ever consult
//! the static table here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A permission key protecting one category of operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PermissionKey {
    #[serde(rename = "tasks.read")]
    TasksRead,
    #[serde(rename = "tasks.create")]
    TasksCreate,
    #[serde(rename = "tasks.update")]
    TasksUpdate,
    #[serde(rename = "tasks.delete")]
    TasksDelete,
    #[serde(rename = "org.manage")]
    OrgManage,
    #[serde(rename = "users.manage")]
    UsersManage,
    #[serde(rename = "audit.read")]
    AuditRead,
}

impl PermissionKey {
    /// Get all permission keys in the catalog
    pub fn all() -> &'static [PermissionKey] {
        &[
            PermissionKey::TasksRead,
            PermissionKey::TasksCreate,
            PermissionKey::TasksUpdate,
            PermissionKey::TasksDelete,
            PermissionKey::OrgManage,
            PermissionKey::UsersManage,
            PermissionKey::AuditRead,
        ]
    }

    /// Get the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            PermissionKey::TasksRead => "tasks.read",
            PermissionKey::TasksCreate => "tasks.create",
            PermissionKey::TasksUpdate => "tasks.update",
            PermissionKey::TasksDelete => "tasks.delete",
            PermissionKey::OrgManage => "org.manage",
            PermissionKey::UsersManage => "users.manage",
            PermissionKey::AuditRead => "audit.read",
        }
    }
}

impl std::fmt::Display for PermissionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Built-in roles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RoleName {
    Owner,
    Admin,
    Viewer,
}

impl RoleName {
    /// Get all roles
    pub fn all() -> &'static [RoleName] {
        &[RoleName::Owner, RoleName::Admin, RoleName::Viewer]
    }

    /// Get the canonical (uppercase) role name
    pub fn as_str(&self) -> &'static str {
        match self {
            RoleName::Owner => "OWNER",
            RoleName::Admin => "ADMIN",
            RoleName::Viewer => "VIEWER",
        }
    }

    /// Parse a role name, case-insensitively. Unknown names yield `None` so
    /// that callers fail closed.
    pub fn parse(name: &str) -> Option<RoleName> {
        match name.to_uppercase().as_str() {
            "OWNER" => Some(RoleName::Owner),
            "ADMIN" => Some(RoleName::Admin),
            "VIEWER" => Some(RoleName::Viewer),
            _ => None,
        }
    }

    /// Get the description used when seeding the role record
    pub fn description(&self) -> &'static str {
        match self {
            RoleName::Owner => "Full tenant access including organization and user management",
            RoleName::Admin => "Task management and audit log access",
            RoleName::Viewer => "Read-only access to tasks",
        }
    }

    /// Get the fixed UUID for this role's seeded record
    pub fn uuid(&self) -> Uuid {
        match self {
            RoleName::Owner => Uuid::parse_str("00000000-0000-0000-0000-000000000001").unwrap(),
            RoleName::Admin => Uuid::parse_str("00000000-0000-0000-0000-000000000002").unwrap(),
            RoleName::Viewer => Uuid::parse_str("00000000-0000-0000-0000-000000000003").unwrap(),
        }
    }

    /// Permission keys granted to this role
    pub fn permissions(&self) -> &'static [PermissionKey] {
        match self {
            RoleName::Owner => &[
                PermissionKey::TasksRead,
                PermissionKey::TasksCreate,
                PermissionKey::TasksUpdate,
                PermissionKey::TasksDelete,
                PermissionKey::OrgManage,
                PermissionKey::UsersManage,
                PermissionKey::AuditRead,
            ],
            RoleName::Admin => &[
                PermissionKey::TasksRead,
                PermissionKey::TasksCreate,
                PermissionKey::TasksUpdate,
                PermissionKey::TasksDelete,
                PermissionKey::AuditRead,
            ],
            RoleName::Viewer => &[PermissionKey::TasksRead],
        }
    }

    /// Check whether this role holds the given permission
    pub fn has_permission(&self, key: PermissionKey) -> bool {
        self.permissions().contains(&key)
    }
}

impl std::fmt::Display for RoleName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Permission keys for a role name, with unknown names yielding the empty set
pub fn role_permissions(name: &str) -> &'static [PermissionKey] {
    RoleName::parse(name).map(|r| r.permissions()).unwrap_or(&[])
}

/// A persisted role record (introspection only)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleRecord {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A role record together with its catalog permission keys
#[derive(Debug, Clone, Serialize)]
pub struct RoleWithPermissions {
    #[serde(flatten)]
    pub role: RoleRecord,
    pub permission_keys: Vec<&'static str>,
}

/// A persisted permission record (introspection only)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PermissionRecord {
    pub id: Uuid,
    pub key: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}
