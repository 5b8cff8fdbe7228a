//! Organization (tenant) model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

pub const DEFAULT_ORGANIZATION_ID: &str = "00000000-0000-0000-0000-000000000010";

pub fn default_organization_uuid() -> Uuid {
    Uuid::parse_str(DEFAULT_ORGANIZATION_ID).expect("DEFAULT_ORGANIZATION_ID must be valid UUID")
}

/// Organization entity. The parent link allows a two-level tenant hierarchy;
/// authorization only compares flat tenant ids.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Organization {
    pub id: Uuid,
    pub name: String,
    pub parent_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateOrganizationRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub parent_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateOrganizationRequest {
    pub name: Option<String>,
    pub parent_id: Option<Uuid>,
}
