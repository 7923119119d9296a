//! Auth handlers

use axum::Json;
use axum::extract::State;
use serde::Serialize;

use shared::models::{TailorLogin, TailorRegister};

use crate::auth::{hash_password, verify_password};
use crate::core::ServerState;
use crate::db::models::TailorProfile;
use crate::db::repository::{NewTailor, RepoError};
use crate::utils::validation::validate_payload;
use crate::utils::{AppError, AppResponse, ok_with_message};

#[derive(Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub tailor: TailorProfile,
}

/// POST /api/auth/register
pub async fn register(
    State(state): State<ServerState>,
    Json(data): Json<TailorRegister>,
) -> Result<Json<AppResponse<AuthResponse>>, AppError> {
    validate_payload(&data)?;

    let password_hash = hash_password(&data.password)?;
    let created = state
        .tailors
        .create(NewTailor {
            shop_name: data.shop_name,
            owner_name: data.owner_name,
            email: data.email,
            password_hash,
            phone: data.phone,
            address: data.address,
        })
        .await
        .map_err(|e| match e {
            RepoError::Duplicate(_) => AppError::conflict("Email is already registered"),
            other => other.into(),
        })?;

    let profile = TailorProfile::from(created);
    let token = state
        .jwt
        .generate_token(&profile.id, &profile.email, &profile.shop_name)
        .map_err(|e| AppError::internal(format!("Token generation failed: {e}")))?;

    tracing::info!(tailor = %profile.id, "New tailor registered");
    Ok(ok_with_message(
        AuthResponse {
            token,
            tailor: profile,
        },
        "Registered",
    ))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<ServerState>,
    Json(data): Json<TailorLogin>,
) -> Result<Json<AppResponse<AuthResponse>>, AppError> {
    validate_payload(&data)?;

    let tailor = state
        .tailors
        .find_by_email(&data.email)
        .await?
        .ok_or_else(AppError::invalid_credentials)?;

    if !verify_password(&data.password, &tailor.password_hash) {
        tracing::warn!(target: "security", email = %data.email, "Failed login attempt");
        return Err(AppError::invalid_credentials());
    }

    let profile = TailorProfile::from(tailor);
    let token = state
        .jwt
        .generate_token(&profile.id, &profile.email, &profile.shop_name)
        .map_err(|e| AppError::internal(format!("Token generation failed: {e}")))?;

    Ok(ok_with_message(
        AuthResponse {
            token,
            tailor: profile,
        },
        "Logged in",
    ))
}
