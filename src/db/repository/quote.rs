//! Quote repository

use sqlx::SqlitePool;

use super::{RepoError, RepoResult};
use crate::db::models::Quote;

const QUOTE_SELECT: &str = "SELECT id, quote_number, status, client_id, user_id, issued_at, \
     valid_until, items, tax_rate, subtotal, tax_amount, total, notes, created_at, updated_at \
     FROM quote";

/// Quotes created by one user, newest first
pub async fn find_all_for_user(pool: &SqlitePool, user_id: i64) -> RepoResult<Vec<Quote>> {
    let sql = format!("{QUOTE_SELECT} WHERE user_id = ? ORDER BY created_at DESC");
    let rows = sqlx::query_as::<_, Quote>(&sql)
        .bind(user_id)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Quote>> {
    let sql = format!("{QUOTE_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Quote>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Insert a fully finalized quote
pub async fn create(pool: &SqlitePool, quote: &Quote) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO quote (id, quote_number, status, client_id, user_id, issued_at, valid_until, \
         items, tax_rate, subtotal, tax_amount, total, notes, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
    )
    .bind(quote.id)
    .bind(&quote.quote_number)
    .bind(quote.status)
    .bind(quote.client_id)
    .bind(quote.user_id)
    .bind(quote.issued_at)
    .bind(quote.valid_until)
    .bind(quote.items.clone())
    .bind(quote.tax_rate)
    .bind(quote.subtotal)
    .bind(quote.tax_amount)
    .bind(quote.total)
    .bind(&quote.notes)
    .bind(quote.created_at)
    .bind(quote.updated_at)
    .execute(pool)
    .await?;
    Ok(())
}

/// Write a finalized quote back; a stored number is never overwritten
pub async fn update(pool: &SqlitePool, quote: &Quote) -> RepoResult<()> {
    let rows = sqlx::query(
        "UPDATE quote SET \
         quote_number = COALESCE(quote_number, ?1), \
         status = ?2, client_id = ?3, valid_until = ?4, items = ?5, tax_rate = ?6, \
         subtotal = ?7, tax_amount = ?8, total = ?9, notes = ?10, updated_at = ?11 \
         WHERE id = ?12",
    )
    .bind(&quote.quote_number)
    .bind(quote.status)
    .bind(quote.client_id)
    .bind(quote.valid_until)
    .bind(quote.items.clone())
    .bind(quote.tax_rate)
    .bind(quote.subtotal)
    .bind(quote.tax_amount)
    .bind(quote.total)
    .bind(&quote.notes)
    .bind(quote.updated_at)
    .bind(quote.id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Quote {} not found", quote.id)));
    }
    Ok(())
}

/// Delete a draft quote; numbered quotes stay
pub async fn delete_draft(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM quote WHERE id = ? AND status = 'draft'")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}
