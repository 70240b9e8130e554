use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};

use shared_config::AppConfig;
use shared_models::auth::SessionIdentity;
use shared_models::error::AppError;
use shared_models::records::{ROLE_DOCTOR, ROLE_PATIENT};

use crate::jwt::validate_token;

/// Authentication layer: validates the bearer token and stashes the
/// resulting session identity in request extensions for handlers and the
/// role gates below.
pub async fn auth_middleware(
    State(config): State<Arc<AppConfig>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get("Authorization")
        .ok_or_else(|| AppError::Auth("Missing authorization header".to_string()))?;

    let auth_value = auth_header
        .to_str()
        .map_err(|_| AppError::Auth("Invalid authorization header format".to_string()))?;

    if !auth_value.starts_with("Bearer ") {
        return Err(AppError::Auth("Invalid authorization header format".to_string()));
    }

    let token = &auth_value[7..];

    let identity = validate_token(token, &config.session_jwt_secret)
        .map_err(AppError::Auth)?;

    request.extensions_mut().insert(identity);

    Ok(next.run(request).await)
}

/// Role gate: only sessions with the patient role may pass.
pub async fn require_patient(
    request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    require_role(request, next, ROLE_PATIENT).await
}

/// Role gate: only sessions with the doctor role may pass.
pub async fn require_doctor(
    request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    require_role(request, next, ROLE_DOCTOR).await
}

async fn require_role(
    request: Request<Body>,
    next: Next,
    role: &str,
) -> Result<Response, AppError> {
    let identity = request
        .extensions()
        .get::<SessionIdentity>()
        .ok_or_else(|| AppError::Auth("Not authorized".to_string()))?;

    if identity.role != role {
        return Err(AppError::Auth("Not authorized".to_string()));
    }

    Ok(next.run(request).await)
}
