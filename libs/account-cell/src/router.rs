use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use shared_config::AppConfig;
use shared_utils::extractor::{auth_middleware, require_doctor, require_patient};

use crate::handlers;

pub fn account_routes(state: Arc<AppConfig>) -> Router {
    // Logout is deliberately ungated: it only acknowledges, and must work
    // for clients whose token has already expired.
    let public_routes = Router::new()
        .route("/register", post(handlers::register))
        .route("/login", post(handlers::login))
        .route("/logout", get(handlers::logout));

    let doctor_routes = Router::new()
        .route("/doctor", get(handlers::doctor_dashboard))
        .route_layer(middleware::from_fn(require_doctor));

    let patient_routes = Router::new()
        .route("/patient", get(handlers::patient_dashboard))
        .route_layer(middleware::from_fn(require_patient));

    let session_routes = Router::new()
        .merge(doctor_routes)
        .merge(patient_routes)
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .merge(public_routes)
        .merge(session_routes)
        .with_state(state)
}
