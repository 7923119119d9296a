//! HTTP API
//!
//! One module per resource, each exposing a `router()`. [`build_app`] glues
//! them together with the tower-http middleware stack and the auth layer.

pub mod auth;
pub mod customers;
pub mod health;
pub mod invoices;
pub mod orders;
pub mod reviews;
pub mod statistics;

use axum::Router;
use axum::middleware as axum_middleware;
use http::{HeaderName, HeaderValue};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::core::ServerState;

#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// All routes, no middleware, no state.
pub fn build_router() -> Router<ServerState> {
    Router::new()
        .merge(auth::router())
        .merge(orders::router())
        .merge(invoices::router())
        .merge(reviews::router())
        .merge(customers::router())
        .merge(statistics::router())
        .merge(health::router())
}

/// Fully configured application: routes plus the middleware stack.
pub fn build_app(state: &ServerState) -> Router<ServerState> {
    build_router()
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::new(
            HeaderName::from_static("x-request-id"),
            XRequestId,
        ))
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
            "x-request-id",
        )))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            crate::auth::require_auth,
        ))
}
