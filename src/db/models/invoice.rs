//! Invoice model

use serde::{Deserialize, Serialize};
use sqlx::types::Json;

use crate::billing::status::InvoiceStatus;
use crate::billing::totals::LineItem;

/// Invoice row
///
/// `invoice_number` stays NULL while the invoice is a draft; it is stamped
/// the first time the status leaves `draft` and never changes afterwards.
/// Totals are derived from `items` on every save.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Invoice {
    pub id: i64,
    pub invoice_number: Option<String>,
    pub status: InvoiceStatus,
    pub client_id: i64,
    pub user_id: i64,
    pub issued_at: i64,
    pub due_at: i64,
    pub paid_at: Option<i64>,
    pub items: Json<Vec<LineItem>>,
    pub tax_rate: f64,
    pub subtotal: f64,
    pub tax_amount: f64,
    pub total: f64,
    pub payment_conditions: String,
    pub notes: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create invoice payload
#[derive(Debug, Clone, Deserialize)]
pub struct InvoiceCreate {
    pub client_id: i64,
    pub items: Vec<LineItem>,
    /// Due date, Unix millis
    pub due_at: i64,
    pub status: Option<InvoiceStatus>,
    pub tax_rate: Option<f64>,
    pub payment_conditions: Option<String>,
    pub notes: Option<String>,
}

/// Update invoice payload
///
/// `invoice_number`, totals and `user_id` are never writable from the
/// outside; status changes go through the dedicated status endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InvoiceUpdate {
    pub client_id: Option<i64>,
    pub items: Option<Vec<LineItem>>,
    pub due_at: Option<i64>,
    pub tax_rate: Option<f64>,
    pub payment_conditions: Option<String>,
    pub notes: Option<String>,
}
