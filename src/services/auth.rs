//! Authentication service
//!
//! Provides password hashing with Argon2 and the user directory.

use anyhow::{Context, Result};
use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::db::parse_db_timestamp;
use crate::models::{RoleName, User, UserPublic};

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: String,
    organization_id: String,
    email: String,
    display_name: Option<String>,
    password_hash: String,
    role: String,
    created_at: String,
    updated_at: String,
}

const USER_COLUMNS: &str =
    "id, organization_id, email, display_name, password_hash, role, created_at, updated_at";

/// Authentication service and user directory
pub struct AuthService {
    pool: SqlitePool,
}

impl AuthService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Hash a password using Argon2id
    pub fn hash_password(password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        let password_hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?
            .to_string();
        Ok(password_hash)
    }

    /// Verify a password against a hash
    pub fn verify_password(password: &str, password_hash: &str) -> Result<bool> {
        let parsed_hash = PasswordHash::new(password_hash)
            .map_err(|e| anyhow::anyhow!("Invalid password hash format: {}", e))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Authenticate a user by email and password.
    ///
    /// Returns `None` both when the email is unknown and when the password
    /// does not match; the caller must not distinguish the two.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<Option<User>> {
        let user = self.get_user_by_email(email).await?;

        match user {
            Some(user) => {
                if Self::verify_password(password, &user.password_hash)? {
                    Ok(Some(user))
                } else {
                    Ok(None)
                }
            }
            None => Ok(None),
        }
    }

    /// Get a user by email (case-sensitive exact match)
    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = ?"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch user by email")?;

        Ok(row.map(row_to_user))
    }

    /// Get a user by ID
    pub async fn get_user_by_id(&self, id: &Uuid) -> Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = ?"
        ))
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch user by ID")?;

        Ok(row.map(row_to_user))
    }

    /// Get a user by ID, scoped to one organization
    pub async fn get_user_by_id_in_org(
        &self,
        organization_id: Uuid,
        id: &Uuid,
    ) -> Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE organization_id = ? AND id = ?"
        ))
        .bind(organization_id.to_string())
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch user by ID (scoped)")?;

        Ok(row.map(row_to_user))
    }

    /// Create a new user. Fails on duplicate email or unknown role name.
    pub async fn create_user(
        &self,
        organization_id: Uuid,
        email: &str,
        display_name: Option<&str>,
        password: &str,
        role: &str,
    ) -> Result<User> {
        let role = RoleName::parse(role)
            .with_context(|| format!("Role {} does not exist", role.to_uppercase()))?;

        if self.get_user_by_email(email).await?.is_some() {
            anyhow::bail!("Email already exists");
        }

        let password_hash = Self::hash_password(password)?;
        let user = User::new(
            organization_id,
            email.to_string(),
            display_name.map(|n| n.to_string()),
            password_hash,
            role.as_str().to_string(),
        );

        sqlx::query(
            "INSERT INTO users (id, organization_id, email, display_name, password_hash, role, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(user.id.to_string())
        .bind(user.organization_id.to_string())
        .bind(&user.email)
        .bind(user.display_name.as_deref())
        .bind(&user.password_hash)
        .bind(&user.role)
        .bind(user.created_at.to_rfc3339())
        .bind(user.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .context("Failed to create user")?;

        Ok(user)
    }

    /// Update a user. Role reassignment is the expected mutation; email and
    /// display name changes are supported for completeness.
    pub async fn update_user(
        &self,
        id: &Uuid,
        email: Option<&str>,
        display_name: Option<&str>,
        password: Option<&str>,
        role: Option<&str>,
    ) -> Result<User> {
        let existing = self.get_user_by_id(id).await?.context("User not found")?;

        let new_email = email.unwrap_or(&existing.email);
        let new_display_name = display_name
            .map(|n| n.to_string())
            .or(existing.display_name);
        let new_role = match role {
            Some(name) => RoleName::parse(name)
                .with_context(|| format!("Role {} does not exist", name.to_uppercase()))?
                .as_str()
                .to_string(),
            None => existing.role,
        };

        if new_email != existing.email && self.get_user_by_email(new_email).await?.is_some() {
            anyhow::bail!("Email already exists");
        }

        let new_password_hash = match password {
            Some(p) => Self::hash_password(p)?,
            None => existing.password_hash,
        };

        let updated_at = chrono::Utc::now().to_rfc3339();

        sqlx::query(
            "UPDATE users SET email = ?, display_name = ?, password_hash = ?, role = ?, updated_at = ? WHERE id = ?",
        )
        .bind(new_email)
        .bind(new_display_name.as_deref())
        .bind(&new_password_hash)
        .bind(&new_role)
        .bind(&updated_at)
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .context("Failed to update user")?;

        self.get_user_by_id(id)
            .await?
            .context("User not found after update")
    }

    /// List users of one organization
    pub async fn list_users_in_org(&self, organization_id: Uuid) -> Result<Vec<UserPublic>> {
        let rows = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE organization_id = ? ORDER BY email"
        ))
        .bind(organization_id.to_string())
        .fetch_all(&self.pool)
        .await
        .context("Failed to list users for organization")?;

        Ok(rows.into_iter().map(|r| row_to_user(r).into()).collect())
    }

    /// Change password for a user (requires current password verification)
    pub async fn change_password(
        &self,
        user_id: &Uuid,
        current_password: &str,
        new_password: &str,
    ) -> Result<bool> {
        let user = self
            .get_user_by_id(user_id)
            .await?
            .context("User not found")?;

        if !Self::verify_password(current_password, &user.password_hash)? {
            return Ok(false);
        }

        let new_password_hash = Self::hash_password(new_password)?;
        let updated_at = chrono::Utc::now().to_rfc3339();

        sqlx::query("UPDATE users SET password_hash = ?, updated_at = ? WHERE id = ?")
            .bind(&new_password_hash)
            .bind(&updated_at)
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await
            .context("Failed to update password")?;

        Ok(true)
    }
}

/// Convert a database row to a User
fn row_to_user(row: UserRow) -> User {
    User {
        id: Uuid::parse_str(&row.id).unwrap_or_else(|_| Uuid::nil()),
        organization_id: Uuid::parse_str(&row.organization_id)
            .unwrap_or_else(|_| crate::models::default_organization_uuid()),
        email: row.email,
        display_name: row.display_name,
        password_hash: row.password_hash,
        role: row.role,
        created_at: parse_db_timestamp(&row.created_at),
        updated_at: parse_db_timestamp(&row.updated_at),
    }
}
