//! Document finalization
//!
//! One explicit, synchronous pipeline run before every persist:
//!
//! 1. validate line items (a rejected document consumes no sequence number)
//! 2. recompute line totals and document totals (always, even on
//!    metadata-only updates)
//! 3. if the document is non-draft and has no number yet, allocate one
//!
//! The two derived-state updates used to live in separate, order-dependent
//! save hooks in earlier versions of this system; making them stages of a
//! single function removes the hidden ordering dependency. Allocation
//! failure aborts the whole operation so a document is never persisted
//! partially numbered.

use sqlx::SqlitePool;

use crate::billing::sequence::{DocumentKind, next_document_number};
use crate::billing::totals::{DocumentTotals, LineItem, compute_totals, validate_line_items};
use crate::utils::{AppResult, current_year};

/// Result of finalizing a document, ready to be written to storage
#[derive(Debug, Clone)]
pub struct FinalizeOutcome {
    pub totals: DocumentTotals,
    /// The permanent document number, if one is (or was already) assigned
    pub number: Option<String>,
}

/// Finalize a financial document before persisting it.
///
/// * `current_number` - the number already stamped on the document, if any.
///   Once set it is returned unchanged; it is never reassigned.
/// * `is_draft` - whether the status being persisted is still `draft`.
///   Drafts never receive numbers.
/// * `items` - line items; `total_line` is recomputed in place.
pub async fn finalize_document(
    pool: &SqlitePool,
    kind: DocumentKind,
    current_number: Option<String>,
    is_draft: bool,
    items: &mut [LineItem],
    tax_rate: f64,
) -> AppResult<FinalizeOutcome> {
    validate_line_items(items)?;

    let totals = compute_totals(items, tax_rate);

    let number = match current_number {
        Some(number) => Some(number),
        None if is_draft => None,
        None => Some(next_document_number(pool, kind, current_year()).await?),
    };

    Ok(FinalizeOutcome { totals, number })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use crate::utils::AppError;
    use tempfile::TempDir;

    async fn test_pool() -> (TempDir, SqlitePool) {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("billing-test.db");
        let db = DbService::new(path.to_str().unwrap())
            .await
            .expect("test database");
        (dir, db.pool)
    }

    fn items() -> Vec<LineItem> {
        vec![LineItem {
            description: "Développement backend".into(),
            quantity: 5.0,
            unit_price: 500.0,
            total_line: 0.0,
        }]
    }

    #[tokio::test]
    async fn test_draft_never_gets_a_number() {
        let (_dir, pool) = test_pool().await;
        let mut items = items();

        for _ in 0..3 {
            let outcome =
                finalize_document(&pool, DocumentKind::Invoice, None, true, &mut items, 20.0)
                    .await
                    .unwrap();
            assert_eq!(outcome.number, None);
            assert_eq!(outcome.totals.subtotal, 2500.0);
        }
    }

    #[tokio::test]
    async fn test_leaving_draft_allocates_exactly_once() {
        let (_dir, pool) = test_pool().await;
        let mut items = items();
        let year = current_year();

        // draft -> sent: allocates
        let outcome =
            finalize_document(&pool, DocumentKind::Invoice, None, false, &mut items, 20.0)
                .await
                .unwrap();
        let number = outcome.number.clone().unwrap();
        assert_eq!(number, format!("FAC-{year}-0001"));

        // re-saving while sent: keeps the same number, allocates nothing
        let outcome = finalize_document(
            &pool,
            DocumentKind::Invoice,
            Some(number.clone()),
            false,
            &mut items,
            20.0,
        )
        .await
        .unwrap();
        assert_eq!(outcome.number.as_deref(), Some(number.as_str()));

        // the next fresh document gets the next value, not 0003
        let outcome =
            finalize_document(&pool, DocumentKind::Invoice, None, false, &mut items, 20.0)
                .await
                .unwrap();
        assert_eq!(outcome.number.unwrap(), format!("FAC-{year}-0002"));
    }

    #[tokio::test]
    async fn test_existing_number_survives_item_changes() {
        let (_dir, pool) = test_pool().await;
        let number = Some("FAC-2026-0042".to_string());

        let mut changed = vec![LineItem {
            description: "Nouvelle prestation".into(),
            quantity: 2.0,
            unit_price: 120.0,
            total_line: 0.0,
        }];
        let outcome = finalize_document(
            &pool,
            DocumentKind::Invoice,
            number.clone(),
            false,
            &mut changed,
            10.0,
        )
        .await
        .unwrap();

        // Totals follow the new items, the number does not move
        assert_eq!(outcome.number, number);
        assert_eq!(outcome.totals.subtotal, 240.0);
        assert_eq!(outcome.totals.tax_amount, 24.0);
        assert_eq!(outcome.totals.total, 264.0);
    }

    #[tokio::test]
    async fn test_invoice_and_quote_counters_are_independent() {
        let (_dir, pool) = test_pool().await;
        let year = current_year();
        let mut items = items();

        let inv = finalize_document(&pool, DocumentKind::Invoice, None, false, &mut items, 20.0)
            .await
            .unwrap();
        let quo = finalize_document(&pool, DocumentKind::Quote, None, false, &mut items, 20.0)
            .await
            .unwrap();

        assert_eq!(inv.number.unwrap(), format!("FAC-{year}-0001"));
        assert_eq!(quo.number.unwrap(), format!("DEV-{year}-0001"));
    }

    #[tokio::test]
    async fn test_invalid_items_consume_no_sequence() {
        let (_dir, pool) = test_pool().await;
        let year = current_year();

        let mut bad = vec![LineItem {
            description: "Gratis".into(),
            quantity: 0.0,
            unit_price: 100.0,
            total_line: 0.0,
        }];
        let err = finalize_document(&pool, DocumentKind::Invoice, None, false, &mut bad, 20.0)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        // The rejected save did not advance the counter
        let mut good = items();
        let outcome =
            finalize_document(&pool, DocumentKind::Invoice, None, false, &mut good, 20.0)
                .await
                .unwrap();
        assert_eq!(outcome.number.unwrap(), format!("FAC-{year}-0001"));
    }

    #[tokio::test]
    async fn test_allocation_failure_aborts_finalize() {
        let (_dir, pool) = test_pool().await;
        pool.close().await;

        let mut items = items();
        let err = finalize_document(&pool, DocumentKind::Invoice, None, false, &mut items, 20.0)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Database(_)));
    }
}
