use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use shared_config::AppConfig;
use shared_utils::extractor::{auth_middleware, require_doctor, require_patient};

use crate::handlers;

pub fn scheduling_routes(state: Arc<AppConfig>) -> Router {
    // Doctor profile registration has no gate at all in the current design.
    let public_routes = Router::new()
        .route("/doctor/register", post(handlers::register_doctor));

    let patient_routes = Router::new()
        .route(
            "/appointment/book",
            get(handlers::booking_form).post(handlers::book_appointment),
        )
        .route("/patient/appointments", get(handlers::patient_appointments))
        .route_layer(middleware::from_fn(require_patient));

    let doctor_routes = Router::new()
        .route("/doctor/appointments", get(handlers::doctor_appointments))
        .route_layer(middleware::from_fn(require_doctor));

    let protected_routes = Router::new()
        .merge(patient_routes)
        .merge(doctor_routes)
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
}
