use assert_matches::assert_matches;
use serde_json::{json, Value};
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use shared_config::AppConfig;
use shared_database::directory::{DirectoryClient, StoreError, APPOINTMENTS, USERS};

fn client_for(store_url: &str) -> DirectoryClient {
    let config = AppConfig {
        directory_store_url: store_url.to_string(),
        directory_store_api_key: "test-api-key".to_string(),
        session_jwt_secret: "irrelevant-here".to_string(),
        mail_api_url: String::new(),
        mail_sender: String::new(),
        notify_topic_url: String::new(),
        notify_topic: String::new(),
    };
    DirectoryClient::new(&config)
}

#[tokio::test]
async fn get_by_key_returns_first_matching_row() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/users"))
        .and(query_param("username", "eq.alice"))
        .and(header("apikey", "test-api-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"username": "alice", "password": "h", "role": "patient"}
        ])))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server.uri());
    let row: Option<Value> = client
        .get_by_key(USERS.name, USERS.hash_key, "alice")
        .await
        .unwrap();

    let row = row.unwrap();
    assert_eq!(row["username"], "alice");
    assert_eq!(row["role"], "patient");
}

#[tokio::test]
async fn get_by_key_absent_is_none() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server.uri());
    let row: Option<Value> = client
        .get_by_key(USERS.name, USERS.hash_key, "nobody")
        .await
        .unwrap();

    assert!(row.is_none());
}

#[tokio::test]
async fn get_by_key_keeps_special_characters_in_one_filter() {
    let mock_server = MockServer::start().await;

    // A username containing `&` and `=` must arrive as a single encoded
    // filter value, not split into extra query parameters.
    Mock::given(method("GET"))
        .and(path("/rest/v1/users"))
        .and(query_param("username", "eq.alice&role=eq.doctor"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"username": "alice&role=eq.doctor", "password": "h", "role": "patient"}
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server.uri());
    let row: Option<Value> = client
        .get_by_key(USERS.name, USERS.hash_key, "alice&role=eq.doctor")
        .await
        .unwrap();

    assert_eq!(row.unwrap()["username"], "alice&role=eq.doctor");

    let requests = mock_server.received_requests().await.unwrap();
    let pairs: Vec<_> = requests[0].url.query_pairs().collect();
    assert_eq!(pairs.len(), 1);
}

#[tokio::test]
async fn query_eq_keeps_special_characters_in_one_filter() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("patient_email", "eq.a&b=c"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server.uri());
    let rows: Vec<Value> = client
        .query_eq(APPOINTMENTS.name, "patient_email", "a&b=c")
        .await
        .unwrap();

    assert!(rows.is_empty());
}

#[tokio::test]
async fn insert_conflict_maps_to_conflict_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/users"))
        .respond_with(ResponseTemplate::new(409).set_body_string("duplicate key"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server.uri());
    let result: Result<Value, _> = client
        .insert(USERS.name, &json!({"username": "alice"}))
        .await;

    assert_matches!(result, Err(StoreError::Conflict(_)));
}

#[tokio::test]
async fn insert_returns_stored_representation() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/users"))
        .and(header("Prefer", "return=representation"))
        .and(body_partial_json(json!({"username": "alice"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            {"username": "alice", "password": "h", "role": "patient"}
        ])))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server.uri());
    let stored: Value = client
        .insert(USERS.name, &json!({"username": "alice", "password": "h", "role": "patient"}))
        .await
        .unwrap();

    assert_eq!(stored["username"], "alice");
}

#[tokio::test]
async fn scan_where_filters_client_side() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"appointment_id": "a1", "doctor_id": "d1", "patient_email": "alice",
             "date": "2024-01-01", "reason": "checkup", "status": "Scheduled"},
            {"appointment_id": "a2", "doctor_id": "d2", "patient_email": "bob",
             "date": "2024-01-02", "reason": "flu", "status": "Scheduled"}
        ])))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server.uri());
    let rows: Vec<Value> = client
        .scan_where(APPOINTMENTS.name, |row: &Value| row["patient_email"] == "alice")
        .await
        .unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["appointment_id"], "a1");
}

#[tokio::test]
async fn query_eq_sends_server_side_filter() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("doctor_id", "eq.d1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"appointment_id": "a1", "doctor_id": "d1", "patient_email": "alice",
             "date": "2024-01-01", "reason": "checkup", "status": "Scheduled"}
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server.uri());
    let rows: Vec<Value> = client
        .query_eq(APPOINTMENTS.name, "doctor_id", "d1")
        .await
        .unwrap();

    assert_eq!(rows.len(), 1);
}

#[tokio::test]
async fn provision_tolerates_empty_response_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/rpc/provision_collection"))
        .and(body_partial_json(json!({"name": "appointments", "range_key": "doctor_id"})))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server.uri());
    client.provision(&APPOINTMENTS).await.unwrap();
}

#[tokio::test]
async fn server_fault_maps_to_api_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/users"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server.uri());
    let result: Result<Vec<Value>, _> = client.scan(USERS.name).await;

    assert_matches!(result, Err(StoreError::Api { status: 500, .. }));
}
