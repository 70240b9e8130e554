use std::sync::Arc;

use axum::{
    extract::{Extension, Json, State},
};
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::auth::SessionIdentity;
use shared_models::error::AppError;

use crate::models::{BookAppointmentRequest, RegisterDoctorRequest};
use crate::services::{DoctorRosterService, SchedulingService};

#[axum::debug_handler]
pub async fn book_appointment(
    State(config): State<Arc<AppConfig>>,
    Extension(identity): Extension<SessionIdentity>,
    Json(request): Json<BookAppointmentRequest>,
) -> Result<Json<Value>, AppError> {
    let service = SchedulingService::new(&config);

    let appointment = service.book_appointment(&identity, request).await?;

    Ok(Json(json!({
        "message": "Appointment booked successfully!",
        "appointment": appointment,
    })))
}

/// GET side of the booking form: the doctor roster to choose from.
#[axum::debug_handler]
pub async fn booking_form(
    State(config): State<Arc<AppConfig>>,
    Extension(_identity): Extension<SessionIdentity>,
) -> Result<Json<Value>, AppError> {
    let roster = DoctorRosterService::new(&config);

    let doctors = roster.list_doctors().await?;

    Ok(Json(json!({
        "doctors": doctors,
        "total": doctors.len(),
    })))
}

#[axum::debug_handler]
pub async fn doctor_appointments(
    State(config): State<Arc<AppConfig>>,
    Extension(identity): Extension<SessionIdentity>,
) -> Result<Json<Value>, AppError> {
    let service = SchedulingService::new(&config);

    let appointments = service.appointments_for_doctor(&identity).await?;

    Ok(Json(json!({
        "appointments": appointments,
        "total": appointments.len(),
    })))
}

#[axum::debug_handler]
pub async fn patient_appointments(
    State(config): State<Arc<AppConfig>>,
    Extension(identity): Extension<SessionIdentity>,
) -> Result<Json<Value>, AppError> {
    let service = SchedulingService::new(&config);

    let appointments = service.appointments_for_patient(&identity).await?;

    Ok(Json(json!({
        "appointments": appointments,
        "total": appointments.len(),
    })))
}

#[axum::debug_handler]
pub async fn register_doctor(
    State(config): State<Arc<AppConfig>>,
    Json(request): Json<RegisterDoctorRequest>,
) -> Result<Json<Value>, AppError> {
    let roster = DoctorRosterService::new(&config);

    let doctor = roster.register_doctor(request).await?;

    Ok(Json(json!({
        "message": "Doctor registered successfully!",
        "doctor": doctor,
    })))
}
