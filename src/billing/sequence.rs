//! Sequence allocation and document number formatting
//!
//! Every invoice and quote number comes from a per (document-type, year)
//! counter that is incremented with a single atomic upsert statement
//! (see [`crate::db::repository::counter`]). Concurrent callers always
//! observe distinct values; a caller that aborts after allocating simply
//! leaves a gap, which is legally tolerable, unlike a collision.

use sqlx::SqlitePool;

use crate::db::repository::counter;
use crate::utils::{AppError, AppResult};

/// Kind of sequentially numbered financial document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Invoice,
    Quote,
}

impl DocumentKind {
    /// Human-facing number prefix
    pub fn prefix(self) -> &'static str {
        match self {
            Self::Invoice => "FAC",
            Self::Quote => "DEV",
        }
    }

    /// Counter row identifier, e.g. `invoice_2026`
    pub fn counter_key(self, year: i32) -> String {
        let name = match self {
            Self::Invoice => "invoice",
            Self::Quote => "quote",
        };
        format!("{name}_{year}")
    }
}

/// Format a raw sequence value into the human-facing document number.
///
/// Zero-padded to 4 digits; sequences ≥ 10000 widen the field instead of
/// wrapping or truncating.
pub fn format_document_number(kind: DocumentKind, year: i32, seq: i64) -> String {
    format!("{}-{}-{:04}", kind.prefix(), year, seq)
}

/// Allocate the next sequence value for `(kind, year)` and format it.
///
/// The underlying increment-and-fetch is a single statement, so two
/// concurrent calls for the same key can never produce the same number.
/// If storage is unavailable the error propagates and the caller must
/// abort the whole finalize operation.
pub async fn next_document_number(
    pool: &SqlitePool,
    kind: DocumentKind,
    year: i32,
) -> AppResult<String> {
    let seq = counter::allocate(pool, &kind.counter_key(year))
        .await
        .map_err(|e| AppError::database(format!("Sequence allocation failed: {e}")))?;
    Ok(format_document_number(kind, year, seq))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counter_keys() {
        assert_eq!(DocumentKind::Invoice.counter_key(2026), "invoice_2026");
        assert_eq!(DocumentKind::Quote.counter_key(2026), "quote_2026");
    }

    #[test]
    fn test_format_examples() {
        assert_eq!(
            format_document_number(DocumentKind::Invoice, 2026, 7),
            "FAC-2026-0007"
        );
        assert_eq!(
            format_document_number(DocumentKind::Quote, 2026, 7),
            "DEV-2026-0007"
        );
        assert_eq!(
            format_document_number(DocumentKind::Invoice, 2026, 120),
            "FAC-2026-0120"
        );
    }

    #[test]
    fn test_format_widens_past_four_digits() {
        assert_eq!(
            format_document_number(DocumentKind::Invoice, 2026, 9999),
            "FAC-2026-9999"
        );
        assert_eq!(
            format_document_number(DocumentKind::Invoice, 2026, 10000),
            "FAC-2026-10000"
        );
        assert_eq!(
            format_document_number(DocumentKind::Invoice, 2026, 123456),
            "FAC-2026-123456"
        );
    }
}
