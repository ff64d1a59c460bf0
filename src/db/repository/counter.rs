//! Sequence counter repository
//!
//! One row per `(document_type, year)` key, e.g. `invoice_2026`. The whole
//! correctness of document numbering rests on [`allocate`] being a single
//! statement: SQLite executes the upsert-increment-return atomically, so
//! concurrent callers can never observe the same value for one key.

use sqlx::SqlitePool;

use super::RepoResult;

/// Increment the counter for `key` by 1 and return the new value.
///
/// The counter row is created lazily (starting at 1) on first allocation.
/// Counters are never deleted or decremented; an aborted caller leaves a
/// gap in the visible sequence, never a collision.
pub async fn allocate(pool: &SqlitePool, key: &str) -> RepoResult<i64> {
    let seq: i64 = sqlx::query_scalar(
        "INSERT INTO counter (id, seq) VALUES (?1, 1) \
         ON CONFLICT(id) DO UPDATE SET seq = seq + 1 \
         RETURNING seq",
    )
    .bind(key)
    .fetch_one(pool)
    .await?;
    Ok(seq)
}

/// Read the current value of a counter without incrementing (0 if absent)
pub async fn current(pool: &SqlitePool, key: &str) -> RepoResult<i64> {
    let seq: Option<i64> = sqlx::query_scalar("SELECT seq FROM counter WHERE id = ?")
        .bind(key)
        .fetch_optional(pool)
        .await?;
    Ok(seq.unwrap_or(0))
}
