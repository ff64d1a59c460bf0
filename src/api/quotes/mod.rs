//! Quote API module
//!
//! Same surface as the invoice module, with the quote lifecycle
//! (`draft → sent → accepted | rejected`) and `DEV-` numbers.

mod handler;

use axum::{Router, routing::{get, patch}};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/quotes", routes())
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
