//! Quote model

use serde::{Deserialize, Serialize};
use sqlx::types::Json;

use crate::billing::status::QuoteStatus;
use crate::billing::totals::LineItem;

/// Quote row
///
/// Same numbering rules as invoices (`DEV-` prefix): the number is stamped
/// the first time the status leaves `draft` and is permanent.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Quote {
    pub id: i64,
    pub quote_number: Option<String>,
    pub status: QuoteStatus,
    pub client_id: i64,
    pub user_id: i64,
    pub issued_at: i64,
    /// Validity limit of the offer, Unix millis
    pub valid_until: Option<i64>,
    pub items: Json<Vec<LineItem>>,
    pub tax_rate: f64,
    pub subtotal: f64,
    pub tax_amount: f64,
    pub total: f64,
    pub notes: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create quote payload
#[derive(Debug, Clone, Deserialize)]
pub struct QuoteCreate {
    pub client_id: i64,
    pub items: Vec<LineItem>,
    pub valid_until: Option<i64>,
    pub status: Option<QuoteStatus>,
    pub tax_rate: Option<f64>,
    pub notes: Option<String>,
}

/// Update quote payload
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuoteUpdate {
    pub client_id: Option<i64>,
    pub items: Option<Vec<LineItem>>,
    pub valid_until: Option<i64>,
    pub tax_rate: Option<f64>,
    pub notes: Option<String>,
}
