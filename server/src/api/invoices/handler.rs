//! Invoice handlers

use axum::Json;
use axum::extract::{Path, State};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::Invoice;
use crate::utils::{AppError, AppResponse, ok};

/// GET /api/invoices/{order_id}
///
/// Invoices are looked up by the order they bill, not by their own id.
pub async fn get_for_order(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(order_id): Path<String>,
) -> Result<Json<AppResponse<Invoice>>, AppError> {
    let order = state
        .orders
        .find_by_id(&order_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {order_id} not found")))?;
    if order.tailor.to_string() != user.id {
        return Err(AppError::not_found(format!("Order {order_id} not found")));
    }

    let order_record = order
        .id
        .ok_or_else(|| AppError::internal("Order has no id"))?;
    let invoice = state
        .invoices
        .find_by_order(&order_record)
        .await?
        .ok_or_else(|| AppError::not_found("No invoice exists for this order yet"))?;

    Ok(ok(invoice))
}
