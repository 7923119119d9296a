//! Health check handler

use axum::Json;
use serde::Serialize;

use shared::util::now_millis;

use crate::utils::{AppResponse, ok};

#[derive(Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub version: &'static str,
    pub timestamp: i64,
}

/// GET /health
pub async fn health() -> Json<AppResponse<HealthStatus>> {
    ok(HealthStatus {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        timestamp: now_millis(),
    })
}
