//! Dashboard statistics handler

use axum::Json;
use axum::extract::State;

use shared::models::DashboardStats;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::parse_id;
use crate::utils::{AppError, AppResponse, ok};

/// GET /api/statistics
///
/// Revenue counts settled orders only ("Payment Completed" and "Delivered");
/// active covers everything from creation through completion.
pub async fn dashboard(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> Result<Json<AppResponse<DashboardStats>>, AppError> {
    let tailor = parse_id("tailor", &user.id)?;
    let (total_orders, active_orders, completed_orders, total_revenue) =
        state.orders.dashboard_counts(tailor).await?;

    let rating = state
        .tailors
        .find_by_id(&user.id)
        .await?
        .map(|t| t.rating)
        .unwrap_or(0.0);

    Ok(ok(DashboardStats {
        total_orders,
        active_orders,
        completed_orders,
        total_revenue,
        rating,
    }))
}
