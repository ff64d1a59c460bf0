//! Quote API handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use sqlx::types::Json as SqlJson;

use crate::auth::CurrentUser;
use crate::billing::{DEFAULT_TAX_RATE, DocumentKind, QuoteStatus, finalize_document};
use crate::core::ServerState;
use crate::db::models::{Quote, QuoteCreate, QuoteUpdate};
use crate::db::repository::{client, quote};
use crate::utils::validation::{MAX_NOTE_LEN, validate_optional_text};
use crate::utils::{AppError, AppResult, now_millis, snowflake_id};

#[derive(Debug, Deserialize)]
pub struct StatusPatch {
    pub status: QuoteStatus,
}

async fn load(pool: &sqlx::SqlitePool, id: i64) -> AppResult<Quote> {
    quote::find_by_id(pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Quote {id}")))
}

/// GET /api/quotes - quotes created by the current user, newest first
pub async fn list(
    State(state): State<ServerState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<Quote>>> {
    let rows = quote::find_all_for_user(&state.pool, current_user.id).await?;
    Ok(Json(rows))
}

/// GET /api/quotes/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Quote>> {
    let row = load(&state.pool, id).await?;
    Ok(Json(row))
}

/// POST /api/quotes
pub async fn create(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Json(payload): Json<QuoteCreate>,
) -> AppResult<Json<Quote>> {
    validate_optional_text(&payload.notes, "notes", MAX_NOTE_LEN)?;

    client::find_by_id(&state.pool, payload.client_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Client {}", payload.client_id)))?;

    let status = payload.status.unwrap_or(QuoteStatus::Draft);
    if !QuoteStatus::Draft.can_transition(status) {
        return Err(AppError::invalid_transition(format!(
            "A quote cannot be created as {status:?}"
        )));
    }

    let tax_rate = payload.tax_rate.unwrap_or(DEFAULT_TAX_RATE);
    let mut items = payload.items;
    let outcome = finalize_document(
        &state.pool,
        DocumentKind::Quote,
        None,
        status.is_draft(),
        &mut items,
        tax_rate,
    )
    .await?;

    let now = now_millis();
    let row = Quote {
        id: snowflake_id(),
        quote_number: outcome.number,
        status,
        client_id: payload.client_id,
        user_id: current_user.id,
        issued_at: now,
        valid_until: payload.valid_until,
        items: SqlJson(items),
        tax_rate,
        subtotal: outcome.totals.subtotal,
        tax_amount: outcome.totals.tax_amount,
        total: outcome.totals.total,
        notes: payload.notes,
        created_at: now,
        updated_at: now,
    };
    quote::create(&state.pool, &row).await?;

    tracing::info!(
        quote_id = row.id,
        number = row.quote_number.as_deref().unwrap_or("-"),
        user_id = current_user.id,
        "Quote created"
    );
    Ok(Json(row))
}

/// PUT /api/quotes/:id
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<QuoteUpdate>,
) -> AppResult<Json<Quote>> {
    validate_optional_text(&payload.notes, "notes", MAX_NOTE_LEN)?;

    let mut row = load(&state.pool, id).await?;
    if row.status.is_terminal() {
        return Err(AppError::invalid_transition(format!(
            "Quote {} is {:?} and can no longer be edited",
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
    if let Some(valid_until) = payload.valid_until {
        row.valid_until = Some(valid_until);
    }
    if let Some(tax_rate) = payload.tax_rate {
        row.tax_rate = tax_rate;
    }
    if let Some(notes) = payload.notes {
        row.notes = Some(notes);
    }

    let outcome = finalize_document(
        &state.pool,
        DocumentKind::Quote,
        row.quote_number.clone(),
        row.status.is_draft(),
        &mut row.items.0,
        row.tax_rate,
    )
    .await?;
    row.quote_number = outcome.number;
    row.subtotal = outcome.totals.subtotal;
    row.tax_amount = outcome.totals.tax_amount;
    row.total = outcome.totals.total;
    row.updated_at = now_millis();

    quote::update(&state.pool, &row).await?;
    Ok(Json(row))
}

/// PATCH /api/quotes/:id/status
pub async fn set_status(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(patch): Json<StatusPatch>,
) -> AppResult<Json<Quote>> {
    let mut row = load(&state.pool, id).await?;

    if !row.status.can_transition(patch.status) {
        return Err(AppError::invalid_transition(format!(
            "Quote {} cannot go from {:?} to {:?}",
            id, row.status, patch.status
        )));
    }

    row.status = patch.status;

    let outcome = finalize_document(
        &state.pool,
        DocumentKind::Quote,
        row.quote_number.clone(),
        row.status.is_draft(),
        &mut row.items.0,
        row.tax_rate,
    )
    .await?;
    row.quote_number = outcome.number;
    row.subtotal = outcome.totals.subtotal;
    row.tax_amount = outcome.totals.tax_amount;
    row.total = outcome.totals.total;
    row.updated_at = now_millis();

    quote::update(&state.pool, &row).await?;

    tracing::info!(
        quote_id = id,
        number = row.quote_number.as_deref().unwrap_or("-"),
        status = ?row.status,
        "Quote status changed"
    );
    Ok(Json(row))
}

/// DELETE /api/quotes/:id - drafts only
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    if quote::delete_draft(&state.pool, id).await? {
        tracing::info!(quote_id = id, "Draft quote deleted");
        return Ok(Json(true));
    }

    match quote::find_by_id(&state.pool, id).await? {
        Some(_) => Err(AppError::validation("Only draft quotes can be deleted")),
        None => Err(AppError::not_found(format!("Quote {id}"))),
    }
}
