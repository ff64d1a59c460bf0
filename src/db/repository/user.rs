//! User repository

use sqlx::SqlitePool;

use super::{RepoError, RepoResult};
use crate::db::models::{User, UserCreate, UserRole, UserUpdate};
use crate::utils::{now_millis, snowflake_id};

const USER_SELECT: &str = "SELECT id, email, password_hash, firstname, lastname, role, \
     is_active, last_login_at, created_at, updated_at FROM user";

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<User>> {
    let sql = format!("{USER_SELECT} ORDER BY created_at DESC");
    let rows = sqlx::query_as::<_, User>(&sql).fetch_all(pool).await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<User>> {
    let sql = format!("{USER_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, User>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn find_by_email(pool: &SqlitePool, email: &str) -> RepoResult<Option<User>> {
    let sql = format!("{USER_SELECT} WHERE email = ?");
    let row = sqlx::query_as::<_, User>(&sql)
        .bind(email)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Create a user; `password_hash` must already be hashed by the caller
pub async fn create(pool: &SqlitePool, data: UserCreate, password_hash: String) -> RepoResult<User> {
    if find_by_email(pool, &data.email).await?.is_some() {
        return Err(RepoError::Duplicate(format!(
            "A user with email {} already exists",
            data.email
        )));
    }

    let now = now_millis();
    let id = snowflake_id();
    sqlx::query(
        "INSERT INTO user (id, email, password_hash, firstname, lastname, role, is_active, \
         created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, 1, ?7, ?7)",
    )
    .bind(id)
    .bind(data.email.to_lowercase())
    .bind(&password_hash)
    .bind(&data.firstname)
    .bind(&data.lastname)
    .bind(data.role.unwrap_or(UserRole::Employe))
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create user".into()))
}

/// Update a user; `password_hash` replaces the stored hash when present
pub async fn update(
    pool: &SqlitePool,
    id: i64,
    data: UserUpdate,
    password_hash: Option<String>,
) -> RepoResult<User> {
    if let Some(email) = &data.email {
        let email = email.to_lowercase();
        if let Some(existing) = find_by_email(pool, &email).await? {
            if existing.id != id {
                return Err(RepoError::Duplicate(format!(
                    "A user with email {email} already exists"
                )));
            }
        }
    }

    let now = now_millis();
    let rows = sqlx::query(
        "UPDATE user SET \
         email = COALESCE(?1, email), \
         password_hash = COALESCE(?2, password_hash), \
         firstname = COALESCE(?3, firstname), \
         lastname = COALESCE(?4, lastname), \
         role = COALESCE(?5, role), \
         is_active = COALESCE(?6, is_active), \
         updated_at = ?7 \
         WHERE id = ?8",
    )
    .bind(data.email.map(|e| e.to_lowercase()))
    .bind(&password_hash)
    .bind(&data.firstname)
    .bind(&data.lastname)
    .bind(data.role)
    .bind(data.is_active)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("User {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("User {id} not found")))
}

/// Stamp the last successful login, without touching updated_at
pub async fn touch_last_login(pool: &SqlitePool, id: i64) -> RepoResult<()> {
    sqlx::query("UPDATE user SET last_login_at = ? WHERE id = ?")
        .bind(now_millis())
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}
