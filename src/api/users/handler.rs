//! User management handlers
//!
//! Passwords are hashed here, before the repository is involved; the
//! repository only ever sees argon2 hashes.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{User, UserCreate, UserUpdate};
use crate::db::repository::user;
use crate::utils::validation::{
    MAX_NAME_LEN, validate_email, validate_password, validate_required_text,
};
use crate::utils::{AppError, AppResult};

fn hash(password: &str) -> AppResult<String> {
    validate_password(password)?;
    User::hash_password(password)
        .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))
}

/// GET /api/users/me
pub async fn get_me(
    State(state): State<ServerState>,
    current_user: CurrentUser,
) -> AppResult<Json<User>> {
    let account = user::find_by_id(&state.pool, current_user.id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("User {}", current_user.id)))?;
    Ok(Json(account))
}

/// PUT /api/users/me
///
/// A user may edit their own profile and password. Role and activation are
/// admin-only fields and are ignored here.
pub async fn update_me(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Json(payload): Json<UserUpdate>,
) -> AppResult<Json<User>> {
    if let Some(email) = &payload.email {
        validate_email(email)?;
    }
    if let Some(firstname) = &payload.firstname {
        validate_required_text(firstname, "firstname", MAX_NAME_LEN)?;
    }
    if let Some(lastname) = &payload.lastname {
        validate_required_text(lastname, "lastname", MAX_NAME_LEN)?;
    }

    let password_hash = match &payload.password {
        Some(password) => Some(hash(password)?),
        None => None,
    };

    let payload = UserUpdate {
        role: None,
        is_active: None,
        ..payload
    };
    let account = user::update(&state.pool, current_user.id, payload, password_hash).await?;

    tracing::info!(user_id = current_user.id, "Profile updated");
    Ok(Json(account))
}

/// GET /api/users - admin only
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<User>>> {
    let accounts = user::find_all(&state.pool).await?;
    Ok(Json(accounts))
}

/// GET /api/users/:id - admin only
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<User>> {
    let account = user::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("User {id}")))?;
    Ok(Json(account))
}

/// POST /api/users - admin only
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<UserCreate>,
) -> AppResult<Json<User>> {
    validate_email(&payload.email)?;
    validate_required_text(&payload.firstname, "firstname", MAX_NAME_LEN)?;
    validate_required_text(&payload.lastname, "lastname", MAX_NAME_LEN)?;
    let password_hash = hash(&payload.password)?;

    let account = user::create(&state.pool, payload, password_hash).await?;

    tracing::info!(
        user_id = account.id,
        email = %account.email,
        role = account.role.as_str(),
        "User created"
    );
    Ok(Json(account))
}

/// PUT /api/users/:id - admin only, may change role and activation
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<UserUpdate>,
) -> AppResult<Json<User>> {
    if let Some(email) = &payload.email {
        validate_email(email)?;
    }
    if let Some(firstname) = &payload.firstname {
        validate_required_text(firstname, "firstname", MAX_NAME_LEN)?;
    }
    if let Some(lastname) = &payload.lastname {
        validate_required_text(lastname, "lastname", MAX_NAME_LEN)?;
    }

    let password_hash = match &payload.password {
        Some(password) => Some(hash(password)?),
        None => None,
    };

    let account = user::update(&state.pool, id, payload, password_hash).await?;

    tracing::info!(user_id = id, "User updated by admin");
    Ok(Json(account))
}
