//! Input validation utilities

use once_cell::sync::Lazy;
use regex::Regex;

/// Regex for validating organization names
static ORG_NAME_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9][a-zA-Z0-9 ._-]*$").unwrap());

/// Validate an organization name
pub fn validate_org_name(name: &str) -> bool {
    !name.is_empty() && name.len() <= 200 && ORG_NAME_REGEX.is_match(name)
}

/// Validate a task title (non-empty after trimming, bounded length)
pub fn validate_task_title(title: &str) -> bool {
    let trimmed = title.trim();
    !trimmed.is_empty() && trimmed.len() <= 200
}
