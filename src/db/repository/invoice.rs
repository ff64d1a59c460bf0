//! Invoice repository
//!
//! Handlers load a row, run the billing finalizer, then write the whole
//! document back. Last-writer-wins at the document level; the only field
//! with stronger guarantees is `invoice_number`, which is written once and
//! never overwritten afterwards.

use sqlx::SqlitePool;

use super::{RepoError, RepoResult};
use crate::db::models::Invoice;

const INVOICE_SELECT: &str = "SELECT id, invoice_number, status, client_id, user_id, issued_at, \
     due_at, paid_at, items, tax_rate, subtotal, tax_amount, total, payment_conditions, notes, \
     created_at, updated_at FROM invoice";

/// Invoices created by one user, newest first
pub async fn find_all_for_user(pool: &SqlitePool, user_id: i64) -> RepoResult<Vec<Invoice>> {
    let sql = format!("{INVOICE_SELECT} WHERE user_id = ? ORDER BY created_at DESC");
    let rows = sqlx::query_as::<_, Invoice>(&sql)
        .bind(user_id)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Invoice>> {
    let sql = format!("{INVOICE_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Invoice>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Insert a fully finalized invoice
pub async fn create(pool: &SqlitePool, inv: &Invoice) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO invoice (id, invoice_number, status, client_id, user_id, issued_at, due_at, \
         paid_at, items, tax_rate, subtotal, tax_amount, total, payment_conditions, notes, \
         created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17)",
    )
    .bind(inv.id)
    .bind(&inv.invoice_number)
    .bind(inv.status)
    .bind(inv.client_id)
    .bind(inv.user_id)
    .bind(inv.issued_at)
    .bind(inv.due_at)
    .bind(inv.paid_at)
    .bind(inv.items.clone())
    .bind(inv.tax_rate)
    .bind(inv.subtotal)
    .bind(inv.tax_amount)
    .bind(inv.total)
    .bind(&inv.payment_conditions)
    .bind(&inv.notes)
    .bind(inv.created_at)
    .bind(inv.updated_at)
    .execute(pool)
    .await?;
    Ok(())
}

/// Write a finalized invoice back.
///
/// `COALESCE(invoice_number, ?)` keeps an already stored number even if a
/// racing writer stamped it between our read and this write.
pub async fn update(pool: &SqlitePool, inv: &Invoice) -> RepoResult<()> {
    let rows = sqlx::query(
        "UPDATE invoice SET \
         invoice_number = COALESCE(invoice_number, ?1), \
         status = ?2, client_id = ?3, due_at = ?4, paid_at = ?5, items = ?6, tax_rate = ?7, \
         subtotal = ?8, tax_amount = ?9, total = ?10, payment_conditions = ?11, notes = ?12, \
         updated_at = ?13 \
         WHERE id = ?14",
    )
    .bind(&inv.invoice_number)
    .bind(inv.status)
    .bind(inv.client_id)
    .bind(inv.due_at)
    .bind(inv.paid_at)
    .bind(inv.items.clone())
    .bind(inv.tax_rate)
    .bind(inv.subtotal)
    .bind(inv.tax_amount)
    .bind(inv.total)
    .bind(&inv.payment_conditions)
    .bind(&inv.notes)
    .bind(inv.updated_at)
    .bind(inv.id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Invoice {} not found", inv.id)));
    }
    Ok(())
}

/// Delete a draft. Numbered documents are never deleted, they get
/// cancelled; the guard is in the WHERE clause so the check and the
/// delete are one statement.
pub async fn delete_draft(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM invoice WHERE id = ? AND status = 'draft'")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}
