//! Order API module

mod handler;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", post(handler::create).get(handler::list))
        .route("/{id}", get(handler::get_one).delete(handler::delete))
        .route("/{id}/status", put(handler::update_status))
        .route("/{id}/measurements", put(handler::update_measurements))
        .route("/{id}/notes", put(handler::update_notes))
        .route("/{id}/payments", post(handler::collect_payment))
        .route("/{id}/message", get(handler::message))
}
