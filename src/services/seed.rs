//! Startup seeding
//!
//! Idempotently ensures the built-in roles, the permission catalog records,
//! the default organization and (when enabled) demo accounts exist. Safe to
//! run on every start.

use anyhow::Result;
use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::config::SeedConfig;
use crate::db::{OrganizationRepository, RbacRepository};
use crate::models::{default_organization_uuid, PermissionKey, RoleName};
use crate::services::AuthService;

pub async fn run(pool: &SqlitePool, config: &SeedConfig) -> Result<()> {
    let rbac_repo = RbacRepository::new(pool);

    for role in RoleName::all() {
        rbac_repo.ensure_role(*role).await?;
    }

    for key in PermissionKey::all() {
        rbac_repo.ensure_permission(*key).await?;
    }

    let org_repo = OrganizationRepository::new(pool);
    org_repo
        .ensure(default_organization_uuid(), "Default Organization")
        .await?;

    info!(
        "Seeded {} roles and {} permission records",
        RoleName::all().len(),
        PermissionKey::all().len()
    );

    if config.demo_users {
        // Known default password; development convenience only
        warn!("Demo accounts enabled; do not use seed.demo_users in production");
        seed_demo_users(pool, &config.demo_password).await?;
    }

    Ok(())
}

async fn seed_demo_users(pool: &SqlitePool, password: &str) -> Result<()> {
    let auth = AuthService::new(pool.clone());

    ensure_user(&auth, "owner@example.com", "Owner User", RoleName::Owner, password).await?;
    ensure_user(&auth, "viewer@example.com", "Viewer User", RoleName::Viewer, password).await?;

    Ok(())
}

async fn ensure_user(
    auth: &AuthService,
    email: &str,
    display_name: &str,
    role: RoleName,
    password: &str,
) -> Result<()> {
    if auth.get_user_by_email(email).await?.is_some() {
        return Ok(());
    }

    auth.create_user(
        default_organization_uuid(),
        email,
        Some(display_name),
        password,
        role.as_str(),
    )
    .await?;

    info!("Seeded user {} with role {}", email, role);
    Ok(())
}
