//! Authentication API endpoints
//!
//! Provides login, token refresh, logout and profile endpoints.

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;

use crate::{
    middleware::auth::{
        create_access_token, create_refresh_token, validate_token, AuthUser, TokenType,
    },
    models::{AuthResponse, LoginRequest, RefreshTokenRequest, TokenResponse, User, UserPublic},
    services::AuthService,
    utils::AppError,
    AppState,
};

/// Public routes (no auth required)
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/refresh", post(refresh_token))
        .route("/logout", post(logout))
}

/// Protected routes (auth required)
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/me", get(get_current_user))
        .route("/change-password", post(change_password))
}

fn issue_access_token(state: &AppState, user: &User) -> Result<String, AppError> {
    create_access_token(
        &user.id,
        &user.organization_id,
        &user.email,
        Some(user.role.clone()),
        &state.config.auth.jwt_secret,
        state.config.auth.token_expiry_hours,
    )
    .map_err(|e| {
        tracing::error!("Failed to create access token: {}", e);
        AppError::internal("Failed to create access token")
    })
}

/// Login handler
///
/// POST /api/v1/auth/login
async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let auth_service = AuthService::new(state.db.clone());

    let user = auth_service
        .authenticate(&payload.email, &payload.password)
        .await
        .map_err(|e| {
            tracing::error!("Authentication failed: {}", e);
            AppError::internal("Authentication failed")
        })?
        .ok_or_else(AppError::invalid_credentials)?;

    let access_token = issue_access_token(&state, &user)?;
    let refresh_token = create_refresh_token(
        &user.id,
        &user.email,
        &state.config.auth.jwt_secret,
        state.config.auth.refresh_token_expiry_days,
    )
    .map_err(|e| {
        tracing::error!("Failed to create refresh token: {}", e);
        AppError::internal("Failed to create refresh token")
    })?;

    Ok(Json(AuthResponse {
        access_token,
        refresh_token,
        token_type: "Bearer".to_string(),
        expires_in: state.config.auth.token_expiry_hours * 3600,
        user: user.into(),
    }))
}

/// Refresh token handler
///
/// POST /api/v1/auth/refresh
async fn refresh_token(
    State(state): State<AppState>,
    Json(payload): Json<RefreshTokenRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let token_data = validate_token(&payload.refresh_token, &state.config.auth.jwt_secret)
        .map_err(|_| AppError::unauthorized("Invalid or expired refresh token"))?;

    if token_data.claims.token_type != TokenType::Refresh {
        return Err(AppError::unauthorized("Invalid token type"));
    }

    let user_id = uuid::Uuid::parse_str(&token_data.claims.sub)
        .map_err(|_| AppError::unauthorized("Invalid user ID in token"))?;

    // Re-read the user so a role reassignment takes effect on refresh
    let auth_service = AuthService::new(state.db.clone());
    let user = auth_service
        .get_user_by_id(&user_id)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch user: {}", e);
            AppError::internal("Failed to fetch user")
        })?
        .ok_or_else(|| AppError::unauthorized("User not found"))?;

    let access_token = issue_access_token(&state, &user)?;

    Ok(Json(TokenResponse {
        access_token,
        token_type: "Bearer".to_string(),
        expires_in: state.config.auth.token_expiry_hours * 3600,
    }))
}

/// Logout response
#[derive(Debug, Serialize)]
struct LogoutResponse {
    message: String,
}

/// Logout handler
///
/// POST /api/v1/auth/logout
///
/// Tokens are stateless, so logout is handled client-side by discarding
/// them; the token itself stays valid until expiry. This endpoint exists for
/// API symmetry.
async fn logout() -> Json<LogoutResponse> {
    Json(LogoutResponse {
        message: "Successfully logged out".to_string(),
    })
}

/// Get current authenticated user profile
///
/// GET /api/v1/auth/me
async fn get_current_user(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<UserPublic>, AppError> {
    let auth_service = AuthService::new(state.db.clone());

    let user = auth_service
        .get_user_by_id(&auth_user.id)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch user: {}", e);
            AppError::internal("Failed to fetch user")
        })?
        .ok_or_else(|| AppError::not_found("User not found"))?;

    Ok(Json(user.into()))
}

/// Change password request
#[derive(Debug, serde::Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// Change password response
#[derive(Debug, Serialize)]
pub struct ChangePasswordResponse {
    pub message: String,
}

/// Change password for the authenticated user
///
/// POST /api/v1/auth/change-password
async fn change_password(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(payload): Json<ChangePasswordRequest>,
) -> Result<Json<ChangePasswordResponse>, AppError> {
    if payload.new_password.len() < state.config.auth.password_min_length {
        return Err(AppError::bad_request(format!(
            "New password must be at least {} characters",
            state.config.auth.password_min_length
        )));
    }

    let auth_service = AuthService::new(state.db.clone());

    let success = auth_service
        .change_password(&auth_user.id, &payload.current_password, &payload.new_password)
        .await
        .map_err(|e| {
            tracing::error!("Failed to change password: {}", e);
            AppError::internal("Failed to change password")
        })?;

    if success {
        Ok(Json(ChangePasswordResponse {
            message: "Password changed successfully".to_string(),
        }))
    } else {
        Err(AppError::unauthorized("Current password is incorrect"))
    }
}
