use std::sync::Arc;

use serde_json::json;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::auth::SessionIdentity;

use crate::jwt::issue_token;

pub struct TestConfig {
    pub jwt_secret: String,
    pub store_url: String,
    pub store_api_key: String,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "test-secret-key-for-jwt-validation-must-be-long-enough".to_string(),
            store_url: "http://localhost:54321".to_string(),
            store_api_key: "test-api-key".to_string(),
        }
    }
}

impl TestConfig {
    /// Point the directory store at a wiremock server.
    pub fn with_store_url(store_url: &str) -> Self {
        Self {
            store_url: store_url.to_string(),
            ..Self::default()
        }
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            directory_store_url: self.store_url.clone(),
            directory_store_api_key: self.store_api_key.clone(),
            session_jwt_secret: self.jwt_secret.clone(),
            mail_api_url: String::new(),
            mail_sender: "no-reply@medtrack.local".to_string(),
            notify_topic_url: String::new(),
            notify_topic: "medtrack-bookings".to_string(),
        }
    }

    pub fn to_arc(&self) -> Arc<AppConfig> {
        Arc::new(self.to_app_config())
    }
}

pub struct TestSession;

impl TestSession {
    pub fn patient(username: &str) -> SessionIdentity {
        SessionIdentity::new(username, "patient")
    }

    pub fn doctor(username: &str) -> SessionIdentity {
        SessionIdentity::new(username, "doctor")
    }

    pub fn token(identity: &SessionIdentity, secret: &str) -> String {
        issue_token(identity, secret).expect("test token")
    }
}

pub struct MockStoreResponses;

impl MockStoreResponses {
    pub fn user_row(username: &str, password_hash: &str, role: &str) -> serde_json::Value {
        json!({
            "username": username,
            "password": password_hash,
            "role": role
        })
    }

    pub fn doctor_row(doctor_id: &str, name: &str, specialization: &str, email: &str) -> serde_json::Value {
        json!({
            "doctor_id": doctor_id,
            "name": name,
            "specialization": specialization,
            "email": email
        })
    }

    pub fn appointment_row(doctor_id: &str, patient_email: &str, date: &str) -> serde_json::Value {
        json!({
            "appointment_id": Uuid::new_v4().to_string(),
            "doctor_id": doctor_id,
            "patient_email": patient_email,
            "date": date,
            "reason": "checkup",
            "status": "Scheduled"
        })
    }

    pub fn error_response(message: &str, code: &str) -> serde_json::Value {
        json!({
            "error": {
                "message": message,
                "code": code
            }
        })
    }
}
