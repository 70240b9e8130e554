//! Full booking flow exercised through the real handlers: a patient signs
//! up, a doctor profile is registered, the patient logs in, books, and then
//! sees exactly that appointment in their listing.

use axum::extract::{Extension, Json, State};
use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

use account_cell::handlers::{login, register};
use account_cell::models::{LoginRequest, RegisterRequest};
use account_cell::services::account::hash_password;
use scheduling_cell::handlers::{book_appointment, patient_appointments, register_doctor};
use scheduling_cell::models::{BookAppointmentRequest, RegisterDoctorRequest};
use shared_utils::jwt::validate_token;
use shared_utils::test_utils::TestConfig;

struct EchoRow;

impl Respond for EchoRow {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let row: Value = serde_json::from_slice(&request.body).unwrap();
        ResponseTemplate::new(201).set_body_json(json!([row]))
    }
}

#[tokio::test]
async fn patient_register_login_book_and_list() {
    let mock_server = MockServer::start().await;
    let test_config = TestConfig::with_store_url(&mock_server.uri());
    let config = test_config.to_arc();

    // -- register alice ---------------------------------------------------
    // The existence pre-check sees an empty store exactly once; later
    // lookups fall through to the mock mounted before login.
    Mock::given(method("GET"))
        .and(path("/rest/v1/users"))
        .and(query_param("username", "eq.alice"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/users"))
        .respond_with(EchoRow)
        .expect(1)
        .mount(&mock_server)
        .await;

    let response = register(
        State(config.clone()),
        Json(RegisterRequest {
            role: "patient".to_string(),
            username: "alice".to_string(),
            password: "pw1".to_string(),
        }),
    )
    .await
    .unwrap()
    .0;
    assert_eq!(response["message"], "Registration successful! Please log in.");

    // -- register the doctor profile (no session required) ----------------
    Mock::given(method("POST"))
        .and(path("/rest/v1/doctors"))
        .respond_with(EchoRow)
        .expect(1)
        .mount(&mock_server)
        .await;

    let response = register_doctor(
        State(config.clone()),
        Json(RegisterDoctorRequest {
            name: "Dr. X".to_string(),
            specialization: "Cardio".to_string(),
            email: "x@x.com".to_string(),
        }),
    )
    .await
    .unwrap()
    .0;
    assert_eq!(response["message"], "Doctor registered successfully!");
    let doctor_id = response["doctor"]["doctor_id"].as_str().unwrap().to_string();
    assert!(!doctor_id.is_empty());

    // -- login as alice ---------------------------------------------------
    let stored_hash = hash_password("pw1").unwrap();
    Mock::given(method("GET"))
        .and(path("/rest/v1/users"))
        .and(query_param("username", "eq.alice"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"username": "alice", "password": stored_hash, "role": "patient"}
        ])))
        .mount(&mock_server)
        .await;

    let token_response = login(
        State(config.clone()),
        Json(LoginRequest {
            username: "alice".to_string(),
            password: "pw1".to_string(),
        }),
    )
    .await
    .unwrap()
    .0;

    let identity = validate_token(&token_response.token, &test_config.jwt_secret).unwrap();
    assert_eq!(identity.username, "alice");
    assert_eq!(identity.role, "patient");

    // -- book with the freshly issued session -----------------------------
    Mock::given(method("POST"))
        .and(path("/rest/v1/appointments"))
        .respond_with(EchoRow)
        .expect(1)
        .mount(&mock_server)
        .await;

    let response = book_appointment(
        State(config.clone()),
        Extension(identity.clone()),
        Json(BookAppointmentRequest {
            doctor_id: doctor_id.clone(),
            date: "2024-01-01".to_string(),
            reason: "checkup".to_string(),
        }),
    )
    .await
    .unwrap()
    .0;
    assert_eq!(response["message"], "Appointment booked successfully!");
    let booked = response["appointment"].clone();
    assert_eq!(booked["status"], "Scheduled");

    // -- the patient listing shows exactly that record --------------------
    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("patient_email", "eq.alice"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([booked.clone()])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let response = patient_appointments(State(config), Extension(identity))
        .await
        .unwrap()
        .0;

    assert_eq!(response["total"], 1);
    let listed = &response["appointments"][0];
    assert_eq!(listed["appointment_id"], booked["appointment_id"]);
    assert_eq!(listed["doctor_id"], doctor_id.as_str());
    assert_eq!(listed["patient_email"], "alice");
    assert_eq!(listed["date"], "2024-01-01");
    assert_eq!(listed["reason"], "checkup");
    assert_eq!(listed["status"], "Scheduled");
}
