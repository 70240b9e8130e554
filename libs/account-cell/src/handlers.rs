use std::sync::Arc;

use axum::{
    extract::{Extension, Json, State},
};
use serde_json::{json, Value};
use tracing::debug;

use shared_config::AppConfig;
use shared_models::auth::{SessionIdentity, TokenResponse};
use shared_models::error::AppError;

use crate::models::{LoginRequest, RegisterRequest};
use crate::services::AccountService;

#[axum::debug_handler]
pub async fn register(
    State(config): State<Arc<AppConfig>>,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<Value>, AppError> {
    let service = AccountService::new(&config);

    let user = service.register(request).await?;

    Ok(Json(json!({
        "message": "Registration successful! Please log in.",
        "username": user.username,
        "role": user.role,
    })))
}

#[axum::debug_handler]
pub async fn login(
    State(config): State<Arc<AppConfig>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let service = AccountService::new(&config);

    let response = service.authenticate(request).await?;

    Ok(Json(response))
}

/// Sessions are bearer tokens, so there is no server-side state to clear;
/// the acknowledgment tells the client to discard its token. Succeeds with
/// or without a live session, so a client with an expired token can still
/// log out cleanly.
#[axum::debug_handler]
pub async fn logout() -> Json<Value> {
    debug!("Logout acknowledged");

    Json(json!({
        "message": "Logged out",
    }))
}

#[axum::debug_handler]
pub async fn doctor_dashboard(
    Extension(identity): Extension<SessionIdentity>,
) -> Result<Json<Value>, AppError> {
    Ok(Json(json!({
        "username": identity.username,
        "role": identity.role,
    })))
}

#[axum::debug_handler]
pub async fn patient_dashboard(
    Extension(identity): Extension<SessionIdentity>,
) -> Result<Json<Value>, AppError> {
    Ok(Json(json!({
        "username": identity.username,
        "role": identity.role,
    })))
}
