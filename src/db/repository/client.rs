//! Client repository

use sqlx::SqlitePool;

use super::{RepoError, RepoResult};
use crate::db::models::{Client, ClientCreate, ClientKind, ClientUpdate};
use crate::utils::{now_millis, snowflake_id};

const CLIENT_SELECT: &str = "SELECT id, kind, name, firstname, contact_name, email, phone, \
     street, city, zip_code, country, siret, vat_number, notes, is_active, created_at, updated_at \
     FROM client";

/// Active clients, newest first
pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Client>> {
    let sql = format!("{CLIENT_SELECT} WHERE is_active = 1 ORDER BY created_at DESC");
    let rows = sqlx::query_as::<_, Client>(&sql).fetch_all(pool).await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Client>> {
    let sql = format!("{CLIENT_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Client>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Duplicate check used on create: another client with this email or name
pub async fn exists_with_email_or_name(
    pool: &SqlitePool,
    email: &str,
    name: &str,
) -> RepoResult<bool> {
    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM client WHERE email = ?1 OR name = ?2")
            .bind(email)
            .bind(name)
            .fetch_one(pool)
            .await?;
    Ok(count > 0)
}

pub async fn create(pool: &SqlitePool, data: ClientCreate) -> RepoResult<Client> {
    let now = now_millis();
    let id = snowflake_id();
    sqlx::query(
        "INSERT INTO client (id, kind, name, firstname, contact_name, email, phone, street, city, \
         zip_code, country, siret, vat_number, notes, is_active, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, 1, ?15, ?15)",
    )
    .bind(id)
    .bind(data.kind.unwrap_or(ClientKind::Company))
    .bind(&data.name)
    .bind(&data.firstname)
    .bind(&data.contact_name)
    .bind(&data.email)
    .bind(&data.phone)
    .bind(&data.street)
    .bind(&data.city)
    .bind(&data.zip_code)
    .bind(data.country.as_deref().unwrap_or("France"))
    .bind(&data.siret)
    .bind(&data.vat_number)
    .bind(&data.notes)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create client".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: ClientUpdate) -> RepoResult<Client> {
    let now = now_millis();
    let rows = sqlx::query(
        "UPDATE client SET \
         kind = COALESCE(?1, kind), \
         name = COALESCE(?2, name), \
         firstname = COALESCE(?3, firstname), \
         contact_name = COALESCE(?4, contact_name), \
         email = COALESCE(?5, email), \
         phone = COALESCE(?6, phone), \
         street = COALESCE(?7, street), \
         city = COALESCE(?8, city), \
         zip_code = COALESCE(?9, zip_code), \
         country = COALESCE(?10, country), \
         siret = COALESCE(?11, siret), \
         vat_number = COALESCE(?12, vat_number), \
         notes = COALESCE(?13, notes), \
         is_active = COALESCE(?14, is_active), \
         updated_at = ?15 \
         WHERE id = ?16",
    )
    .bind(data.kind)
    .bind(&data.name)
    .bind(&data.firstname)
    .bind(&data.contact_name)
    .bind(&data.email)
    .bind(&data.phone)
    .bind(&data.street)
    .bind(&data.city)
    .bind(&data.zip_code)
    .bind(&data.country)
    .bind(&data.siret)
    .bind(&data.vat_number)
    .bind(&data.notes)
    .bind(data.is_active)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Client {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Client {id} not found")))
}

/// Soft delete: deactivate, keep the row for existing documents
pub async fn deactivate(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let now = now_millis();
    let rows = sqlx::query("UPDATE client SET is_active = 0, updated_at = ? WHERE id = ? AND is_active = 1")
        .bind(now)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}
