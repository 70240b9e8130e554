use serde::{Deserialize, Serialize};

// Field names below are the storage contract shared with the directory
// store; they must not be renamed.

/// A login account. `password` holds the argon2 PHC hash, never the raw
/// secret.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    pub password: String,
    pub role: String,
}

/// A doctor profile as listed on the booking form. Independent of any
/// login account; linked to one by matching `email` against the account
/// username.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Doctor {
    pub doctor_id: String,
    pub name: String,
    pub specialization: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub appointment_id: String,
    pub doctor_id: String,
    pub patient_email: String,
    pub date: String,
    pub reason: String,
    pub status: String,
}

/// Initial status of every freshly booked appointment. Stored mutable but
/// never transitioned by the current workflow.
pub const STATUS_SCHEDULED: &str = "Scheduled";

pub const ROLE_PATIENT: &str = "patient";
pub const ROLE_DOCTOR: &str = "doctor";
