//! Invoice API module
//!
//! | Path | Method | Description |
//! |------|--------|-------------|
//! | /api/invoices | GET, POST | list own invoices / create |
//! | /api/invoices/{id} | GET, PUT, DELETE | read / update / delete draft |
//! | /api/invoices/{id}/status | PATCH | status transition |
//!
//! All routes require authentication.

mod handler;

use axum::{Router, routing::{get, patch}};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/invoices", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
        .route("/{id}/status", patch(handler::set_status))
}
