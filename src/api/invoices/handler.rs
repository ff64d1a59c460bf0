//! Invoice API handlers
//!
//! Every write path goes through [`finalize_document`]: totals are always
//! recomputed from the line items, and the invoice number is allocated the
//! moment the status leaves `draft`, inside the same save.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use sqlx::types::Json as SqlJson;

use crate::auth::CurrentUser;
use crate::billing::{DEFAULT_TAX_RATE, DocumentKind, InvoiceStatus, finalize_document};
use crate::core::ServerState;
use crate::db::models::{Invoice, InvoiceCreate, InvoiceUpdate};
use crate::db::repository::{client, invoice};
use crate::utils::validation::{MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text};
use crate::utils::{AppError, AppResult, now_millis, snowflake_id};

const DEFAULT_PAYMENT_CONDITIONS: &str = "Paiement à réception de facture";

#[derive(Debug, Deserialize)]
pub struct StatusPatch {
    pub status: InvoiceStatus,
}

fn validate_metadata(payment_conditions: &Option<String>, notes: &Option<String>) -> AppResult<()> {
    validate_optional_text(payment_conditions, "payment conditions", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(notes, "notes", MAX_NOTE_LEN)?;
    Ok(())
}

async fn load(pool: &sqlx::SqlitePool, id: i64) -> AppResult<Invoice> {
    invoice::find_by_id(pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Invoice {id}")))
}

/// GET /api/invoices - invoices created by the current user, newest first
pub async fn list(
    State(state): State<ServerState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<Invoice>>> {
    let rows = invoice::find_all_for_user(&state.pool, current_user.id).await?;
    Ok(Json(rows))
}

/// GET /api/invoices/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Invoice>> {
    let row = load(&state.pool, id).await?;
    Ok(Json(row))
}

/// POST /api/invoices
///
/// New invoices start as drafts unless the payload asks for a status the
/// draft state can legally move to, in which case the document is numbered
/// immediately.
pub async fn create(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Json(payload): Json<InvoiceCreate>,
) -> AppResult<Json<Invoice>> {
    validate_metadata(&payload.payment_conditions, &payload.notes)?;

    client::find_by_id(&state.pool, payload.client_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Client {}", payload.client_id)))?;

    let status = payload.status.unwrap_or(InvoiceStatus::Draft);
    if !InvoiceStatus::Draft.can_transition(status) {
        return Err(AppError::invalid_transition(format!(
            "An invoice cannot be created as {status:?}"
        )));
    }

    let tax_rate = payload.tax_rate.unwrap_or(DEFAULT_TAX_RATE);
    let mut items = payload.items;
    let outcome = finalize_document(
        &state.pool,
        DocumentKind::Invoice,
        None,
        status.is_draft(),
        &mut items,
        tax_rate,
    )
    .await?;

    let now = now_millis();
    let row = Invoice {
        id: snowflake_id(),
        invoice_number: outcome.number,
        status,
        client_id: payload.client_id,
        user_id: current_user.id,
        issued_at: now,
        due_at: payload.due_at,
        paid_at: None,
        items: SqlJson(items),
        tax_rate,
        subtotal: outcome.totals.subtotal,
        tax_amount: outcome.totals.tax_amount,
        total: outcome.totals.total,
        payment_conditions: payload
            .payment_conditions
            .unwrap_or_else(|| DEFAULT_PAYMENT_CONDITIONS.to_string()),
        notes: payload.notes,
        created_at: now,
        updated_at: now,
    };
    invoice::create(&state.pool, &row).await?;

    tracing::info!(
        invoice_id = row.id,
        number = row.invoice_number.as_deref().unwrap_or("-"),
        user_id = current_user.id,
        "Invoice created"
    );
    Ok(Json(row))
}

/// PUT /api/invoices/:id
///
/// Merges the provided fields and re-finalizes. The stored number, if any,
/// is carried through untouched; totals always follow the current items.
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<InvoiceUpdate>,
) -> AppResult<Json<Invoice>> {
    validate_metadata(&payload.payment_conditions, &payload.notes)?;

    let mut row = load(&state.pool, id).await?;
    if row.status.is_terminal() {
        return Err(AppError::invalid_transition(format!(
            "Invoice {} is {:?} and can no longer be edited",
            id, row.status
        )));
    }

    if let Some(client_id) = payload.client_id {
        client::find_by_id(&state.pool, client_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Client {client_id}")))?;
        row.client_id = client_id;
    }
    if let Some(items) = payload.items {
        row.items = SqlJson(items);
    }
    if let Some(due_at) = payload.due_at {
        row.due_at = due_at;
    }
    if let Some(tax_rate) = payload.tax_rate {
        row.tax_rate = tax_rate;
    }
    if let Some(conditions) = payload.payment_conditions {
        row.payment_conditions = conditions;
    }
    if let Some(notes) = payload.notes {
        row.notes = Some(notes);
    }

    let outcome = finalize_document(
        &state.pool,
        DocumentKind::Invoice,
        row.invoice_number.clone(),
        row.status.is_draft(),
        &mut row.items.0,
        row.tax_rate,
    )
    .await?;
    row.invoice_number = outcome.number;
    row.subtotal = outcome.totals.subtotal;
    row.tax_amount = outcome.totals.tax_amount;
    row.total = outcome.totals.total;
    row.updated_at = now_millis();

    invoice::update(&state.pool, &row).await?;
    Ok(Json(row))
}

/// PATCH /api/invoices/:id/status
///
/// The only way to move an invoice through its lifecycle. Leaving `draft`
/// stamps the permanent invoice number; reaching `paid` stamps `paid_at`.
pub async fn set_status(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(patch): Json<StatusPatch>,
) -> AppResult<Json<Invoice>> {
    let mut row = load(&state.pool, id).await?;

    if !row.status.can_transition(patch.status) {
        return Err(AppError::invalid_transition(format!(
            "Invoice {} cannot go from {:?} to {:?}",
            id, row.status, patch.status
        )));
    }

    row.status = patch.status;
    if row.status == InvoiceStatus::Paid && row.paid_at.is_none() {
        row.paid_at = Some(now_millis());
    }

    let outcome = finalize_document(
        &state.pool,
        DocumentKind::Invoice,
        row.invoice_number.clone(),
        row.status.is_draft(),
        &mut row.items.0,
        row.tax_rate,
    )
    .await?;
    row.invoice_number = outcome.number;
    row.subtotal = outcome.totals.subtotal;
    row.tax_amount = outcome.totals.tax_amount;
    row.total = outcome.totals.total;
    row.updated_at = now_millis();

    invoice::update(&state.pool, &row).await?;

    tracing::info!(
        invoice_id = id,
        number = row.invoice_number.as_deref().unwrap_or("-"),
        status = ?row.status,
        "Invoice status changed"
    );
    Ok(Json(row))
}

/// DELETE /api/invoices/:id - drafts only
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    if invoice::delete_draft(&state.pool, id).await? {
        tracing::info!(invoice_id = id, "Draft invoice deleted");
        return Ok(Json(true));
    }

    // Distinguish "not there" from "not a draft"
    match invoice::find_by_id(&state.pool, id).await? {
        Some(_) => Err(AppError::validation(
            "Only draft invoices can be deleted; cancel it instead",
        )),
        None => Err(AppError::not_found(format!("Invoice {id}"))),
    }
}
