//! Client API handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::db::models::{Client, ClientCreate, ClientKind, ClientUpdate};
use crate::db::repository::client;
use crate::utils::validation::{
    MAX_ADDRESS_LEN, MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, validate_email,
    validate_optional_text, validate_required_text,
};
use crate::utils::{AppError, AppResult};

fn validate_create(data: &ClientCreate) -> AppResult<()> {
    validate_required_text(&data.name, "name", MAX_NAME_LEN)?;
    validate_email(&data.email)?;
    validate_required_text(&data.street, "street", MAX_ADDRESS_LEN)?;
    validate_required_text(&data.city, "city", MAX_ADDRESS_LEN)?;
    validate_required_text(&data.zip_code, "zip code", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&data.firstname, "firstname", MAX_NAME_LEN)?;
    validate_optional_text(&data.contact_name, "contact name", MAX_NAME_LEN)?;
    validate_optional_text(&data.phone, "phone", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&data.vat_number, "VAT number", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&data.notes, "notes", MAX_NOTE_LEN)?;

    // SIRET is a legal requirement for companies
    let kind = data.kind.unwrap_or(ClientKind::Company);
    if kind == ClientKind::Company {
        match &data.siret {
            Some(siret) if !siret.trim().is_empty() => {
                validate_optional_text(&data.siret, "SIRET", MAX_SHORT_TEXT_LEN)?;
            }
            _ => return Err(AppError::validation("SIRET is required for companies")),
        }
    }
    Ok(())
}

/// GET /api/clients - all active clients
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Client>>> {
    let clients = client::find_all(&state.pool).await?;
    Ok(Json(clients))
}

/// GET /api/clients/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Client>> {
    let record = client::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Client {id}")))?;
    Ok(Json(record))
}

/// POST /api/clients
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<ClientCreate>,
) -> AppResult<Json<Client>> {
    validate_create(&payload)?;

    let email = payload.email.to_lowercase();
    if client::exists_with_email_or_name(&state.pool, &email, &payload.name).await? {
        return Err(AppError::conflict(
            "A client with this email or name already exists",
        ));
    }

    let record = client::create(
        &state.pool,
        ClientCreate {
            email,
            ..payload
        },
    )
    .await?;

    tracing::info!(client_id = record.id, name = %record.name, "Client created");
    Ok(Json(record))
}

/// PUT /api/clients/:id
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<ClientUpdate>,
) -> AppResult<Json<Client>> {
    if let Some(name) = &payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    if let Some(email) = &payload.email {
        validate_email(email)?;
    }
    validate_optional_text(&payload.notes, "notes", MAX_NOTE_LEN)?;

    let payload = ClientUpdate {
        email: payload.email.map(|e| e.to_lowercase()),
        ..payload
    };
    let record = client::update(&state.pool, id, payload).await?;
    Ok(Json(record))
}

/// DELETE /api/clients/:id - soft delete
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    let result = client::deactivate(&state.pool, id).await?;
    if !result {
        return Err(AppError::not_found(format!("Client {id}")));
    }
    tracing::info!(client_id = id, "Client deactivated");
    Ok(Json(true))
}
