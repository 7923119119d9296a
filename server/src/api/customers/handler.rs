//! Customer rollup handler

use axum::Json;
use axum::extract::State;

use shared::models::CustomerSummary;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::parse_id;
use crate::utils::{AppError, AppResponse, ok};

/// GET /api/customers
///
/// There is no customer table; this is a rollup over the tailor's orders,
/// grouped by (name, email, phone) and sorted by most recent order.
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> Result<Json<AppResponse<Vec<CustomerSummary>>>, AppError> {
    let tailor = parse_id("tailor", &user.id)?;
    let customers = state.orders.customers_for_tailor(tailor).await?;
    Ok(ok(customers))
}
