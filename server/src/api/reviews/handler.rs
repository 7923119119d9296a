//! Review handlers
//!
//! Every mutation also refreshes the tailor's rating rollup (done inside the
//! repository), so the dashboard figure is always derived from live rows.

use axum::Json;
use axum::extract::{Path, State};

use shared::models::{ReviewCreate, ReviewUpdate};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::Review;
use crate::db::repository::{RepoError, parse_id};
use crate::utils::validation::validate_payload;
use crate::utils::{AppError, AppResponse, ok, ok_with_message};

/// GET /api/reviews — reviews for the authenticated tailor, newest first.
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> Result<Json<AppResponse<Vec<Review>>>, AppError> {
    let tailor = parse_id("tailor", &user.id)?;
    let reviews = state.reviews.list_for_tailor(tailor).await?;
    Ok(ok(reviews))
}

/// POST /api/reviews
pub async fn create(
    State(state): State<ServerState>,
    Json(data): Json<ReviewCreate>,
) -> Result<Json<AppResponse<Review>>, AppError> {
    validate_payload(&data)?;

    if state.tailors.find_by_id(&data.tailor_id).await?.is_none() {
        return Err(AppError::not_found(format!(
            "Tailor {} not found",
            data.tailor_id
        )));
    }

    let review = state.reviews.create(data).await.map_err(|e| match e {
        RepoError::Duplicate(_) => {
            AppError::conflict("This customer has already reviewed this tailor")
        }
        other => other.into(),
    })?;

    Ok(ok_with_message(review, "Review created"))
}

/// PUT /api/reviews/{id}
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(data): Json<ReviewUpdate>,
) -> Result<Json<AppResponse<Review>>, AppError> {
    validate_payload(&data)?;
    let review = state.reviews.update(&id, data).await?;
    Ok(ok_with_message(review, "Review updated"))
}

/// DELETE /api/reviews/{id}
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<AppResponse<()>>, AppError> {
    let deleted = state.reviews.delete(&id).await?;
    if !deleted {
        return Err(AppError::not_found(format!("Review {id} not found")));
    }
    Ok(ok_with_message((), "Review deleted"))
}
