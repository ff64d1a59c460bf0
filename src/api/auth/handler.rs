//! Authentication handlers

use std::time::Duration;

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{User, UserRole};
use crate::db::repository::user;
use crate::utils::{AppError, AppResult};

/// Fixed delay for authentication to prevent timing attacks
const AUTH_FIXED_DELAY_MS: u64 = 500;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub id: i64,
    pub email: String,
    pub firstname: String,
    pub lastname: String,
    pub role: UserRole,
}

impl From<&User> for UserInfo {
    fn from(u: &User) -> Self {
        Self {
            id: u.id,
            email: u.email.clone(),
            firstname: u.firstname.clone(),
            lastname: u.lastname.clone(),
            role: u.role,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserInfo,
}

/// POST /api/auth/login
///
/// Authenticates credentials and returns a JWT. Failures use one unified
/// message so the endpoint cannot be used to enumerate accounts.
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    if req.email.trim().is_empty() || req.password.is_empty() {
        return Err(AppError::validation("Email and password are required"));
    }

    let email = req.email.to_lowercase();
    let found = user::find_by_email(&state.pool, &email).await?;

    // Fixed delay before acting on the lookup result
    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    let account = match found {
        Some(account) => account,
        None => {
            tracing::warn!(email = %email, "Login failed - user not found");
            return Err(AppError::invalid_credentials());
        }
    };

    let password_valid = account
        .verify_password(&req.password)
        .map_err(|e| AppError::internal(format!("Password verification failed: {e}")))?;

    if !password_valid {
        tracing::warn!(email = %email, "Login failed - invalid credentials");
        return Err(AppError::invalid_credentials());
    }

    if !account.is_active {
        return Err(AppError::forbidden("Account has been disabled"));
    }

    let token = state
        .get_jwt_service()
        .generate_token(account.id, &account.email, account.role)
        .map_err(|e| AppError::internal(format!("Token generation failed: {e}")))?;

    user::touch_last_login(&state.pool, account.id).await?;

    tracing::info!(email = %email, user_id = account.id, "Login successful");

    Ok(Json(LoginResponse {
        token,
        user: UserInfo::from(&account),
    }))
}

/// GET /api/auth/me - current user info
pub async fn me(
    State(state): State<ServerState>,
    current_user: CurrentUser,
) -> AppResult<Json<UserInfo>> {
    let account = user::find_by_id(&state.pool, current_user.id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("User {}", current_user.id)))?;
    Ok(Json(UserInfo::from(&account)))
}
