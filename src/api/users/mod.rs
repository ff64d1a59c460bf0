//! User management API module
//!
//! `/me` routes are open to any authenticated user; the account
//! administration routes are gated to admins.

mod handler;

use axum::{Router, middleware, routing::get};

use crate::auth::require_role;
use crate::core::ServerState;
use crate::db::models::UserRole;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/users", routes())
}

fn routes() -> Router<ServerState> {
    let admin = Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/{id}", get(handler::get_by_id).put(handler::update))
        .layer(middleware::from_fn(require_role(&[UserRole::Admin])));

    Router::new()
        .route("/me", get(handler::get_me).put(handler::update_me))
        .merge(admin)
}
