//! Order handlers
//!
//! Transitions go through the pure state machine in `orders::lifecycle`;
//! handlers only load the order, check ownership, and persist the resulting
//! patch. The invoice snapshot is generated right after the transition into
//! "Order Completed" lands.

use axum::Json;
use axum::extract::{Path, Query, State};
use serde::{Deserialize, Serialize};

use shared::models::{
    MeasurementsUpdate, NotesUpdate, OrderCreate, OrderStatus, OrderStatusUpdate, PaymentCollect,
};
use shared::util::{now_millis, today};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::Order;
use crate::db::repository::parse_id;
use crate::orders::{lifecycle, notify};
use crate::utils::validation::validate_payload;
use crate::utils::{AppError, AppResponse, ok, ok_with_message};

/// Load an order and verify it belongs to the authenticated tailor.
/// Foreign orders read as 404, not 403.
async fn owned_order(state: &ServerState, user: &CurrentUser, id: &str) -> Result<Order, AppError> {
    let order = state
        .orders
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {id} not found")))?;
    if order.tailor.to_string() != user.id {
        return Err(AppError::not_found(format!("Order {id} not found")));
    }
    Ok(order)
}

fn shop_name<'a>(user: &'a CurrentUser, state: &'a ServerState) -> &'a str {
    if user.shop_name.is_empty() {
        &state.config.default_shop_name
    } else {
        &user.shop_name
    }
}

// ========== Create / list / read / delete ==========

/// POST /api/orders
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(data): Json<OrderCreate>,
) -> Result<Json<AppResponse<Order>>, AppError> {
    validate_payload(&data)?;
    let tailor = parse_id("tailor", &user.id)?;
    let order = state.orders.create(tailor, data).await?;
    tracing::info!(order = %order.id_string(), "Order created");
    Ok(ok_with_message(order, "Order created"))
}

#[derive(Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub status: Option<OrderStatus>,
    #[serde(default)]
    pub page: Option<i64>,
    #[serde(default)]
    pub page_size: Option<i64>,
}

#[derive(Serialize)]
pub struct OrderPage {
    pub orders: Vec<Order>,
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
}

/// GET /api/orders?status=&page=&page_size=
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
    Query(query): Query<ListQuery>,
) -> Result<Json<AppResponse<OrderPage>>, AppError> {
    let tailor = parse_id("tailor", &user.id)?;
    let page = query.page.unwrap_or(1).max(1);
    let page_size = query.page_size.unwrap_or(20).clamp(1, 200);

    let (orders, total) = state
        .orders
        .list_by_tailor(tailor, query.status, page, page_size)
        .await?;

    Ok(ok(OrderPage {
        orders,
        total,
        page,
        page_size,
    }))
}

/// GET /api/orders/{id}
pub async fn get_one(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<AppResponse<Order>>, AppError> {
    let order = owned_order(&state, &user, &id).await?;
    Ok(ok(order))
}

/// DELETE /api/orders/{id}
pub async fn delete(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<AppResponse<()>>, AppError> {
    owned_order(&state, &user, &id).await?;
    state.orders.delete(&id).await?;
    tracing::info!(order = %id, "Order deleted");
    Ok(ok_with_message((), "Order deleted"))
}

// ========== Lifecycle ==========

/// PUT /api/orders/{id}/status
pub async fn update_status(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(data): Json<OrderStatusUpdate>,
) -> Result<Json<AppResponse<Order>>, AppError> {
    let order = owned_order(&state, &user, &id).await?;

    let event = lifecycle::event_for_target(&data)?;
    let patch = lifecycle::transition(&order, event, today(), now_millis())?;
    let new_status = patch.status;
    let mut updated = state.orders.apply_patch(&id, &patch).await?;

    // Completion anchors the invoice: generate the snapshot once the status
    // change is durable, then link it back onto the order.
    if new_status == Some(OrderStatus::Completed) {
        let invoice = state.invoices.create_for_order(&updated).await?;
        if let (Some(order_id), Some(invoice_id)) = (&updated.id, &invoice.id) {
            state.orders.link_invoice(order_id, invoice_id).await?;
            updated.invoice_id = Some(invoice_id.clone());
        }
        tracing::info!(order = %id, invoice = %invoice.number, "Invoice generated");
    }

    tracing::info!(order = %id, status = %updated.status, "Order status updated");
    Ok(ok_with_message(updated, "Status updated"))
}

/// PUT /api/orders/{id}/measurements
pub async fn update_measurements(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(data): Json<MeasurementsUpdate>,
) -> Result<Json<AppResponse<Order>>, AppError> {
    let order = owned_order(&state, &user, &id).await?;
    if order.status.is_terminal() {
        return Err(AppError::BusinessRule(format!(
            "measurements cannot change once an order is '{}'",
            order.status
        )));
    }
    let updated = state.orders.update_content(&id, data).await?;
    Ok(ok_with_message(updated, "Measurements updated"))
}

/// PUT /api/orders/{id}/notes
pub async fn update_notes(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(data): Json<NotesUpdate>,
) -> Result<Json<AppResponse<Order>>, AppError> {
    validate_payload(&data)?;
    owned_order(&state, &user, &id).await?;
    let updated = state.orders.update_notes(&id, &data.notes, data.append).await?;
    Ok(ok_with_message(updated, "Notes updated"))
}

/// POST /api/orders/{id}/payments
pub async fn collect_payment(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(data): Json<PaymentCollect>,
) -> Result<Json<AppResponse<Order>>, AppError> {
    validate_payload(&data)?;
    let order = owned_order(&state, &user, &id).await?;

    let patch = lifecycle::record_payment(&order, data.amount, data.method, data.note, now_millis())?;
    let updated = state.orders.apply_patch(&id, &patch).await?;

    tracing::info!(order = %id, amount = data.amount, "Payment collected");
    Ok(ok_with_message(updated, "Payment recorded"))
}

// ========== Customer messaging ==========

#[derive(Deserialize)]
pub struct MessageQuery {
    #[serde(default)]
    pub kind: Option<MessageKind>,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Invoice,
    Ready,
}

#[derive(Serialize)]
pub struct ComposedMessage {
    pub kind: MessageKind,
    pub message: String,
    pub whatsapp_link: String,
}

/// GET /api/orders/{id}/message?kind=invoice|ready
pub async fn message(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Query(query): Query<MessageQuery>,
) -> Result<Json<AppResponse<ComposedMessage>>, AppError> {
    let order = owned_order(&state, &user, &id).await?;
    let kind = query.kind.unwrap_or(MessageKind::Invoice);
    let shop = shop_name(&user, &state);

    let text = match kind {
        MessageKind::Invoice => {
            let order_id = order
                .id
                .clone()
                .ok_or_else(|| AppError::internal("Order has no id"))?;
            let invoice = state
                .invoices
                .find_by_order(&order_id)
                .await?
                .ok_or_else(|| {
                    AppError::not_found("No invoice exists for this order yet")
                })?;
            notify::invoice_message(&order, &invoice, shop)
        }
        MessageKind::Ready => notify::ready_message(&order, shop),
    };

    let whatsapp_link = notify::whatsapp_link(&order.customer_phone, &text);
    Ok(ok(ComposedMessage {
        kind,
        message: text,
        whatsapp_link,
    }))
}
