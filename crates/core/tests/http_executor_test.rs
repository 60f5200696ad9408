// HttpClient behavior against mocked targets

use std::time::Duration;

use crudbench_core::{Call, HttpClient, LoadClient, Operation, Target};
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client() -> HttpClient {
    HttpClient::new(Duration::from_secs(5), Duration::from_millis(200)).unwrap()
}

fn target(server: &MockServer) -> Target {
    Target::new("mock", server.uri())
}

fn closed_port_target() -> Target {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    Target::new("closed", format!("http://127.0.0.1:{}", port))
}

#[tokio::test]
async fn test_create_sends_synthetic_payload_and_extracts_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/users"))
        .and(body_json(json!({"name": "User 7", "email": "user7@example.com"})))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(json!({"id": 31, "name": "User 7", "email": "user7@example.com"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let result = client().execute(&target(&server), Call::Create { seq: 7 }).await;

    assert!(result.success);
    assert_eq!(result.status, 201);
    assert_eq!(result.operation, Operation::Create);
    assert_eq!(result.resource_id(), Some(31));
    assert!(result.error.is_none());
}

#[tokio::test]
async fn test_error_status_with_json_body_counts_as_success() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/5"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "User not found"})))
        .mount(&server)
        .await;

    let result = client().execute(&target(&server), Call::GetOne { id: 5 }).await;

    assert!(result.success);
    assert_eq!(result.status, 404);
}

#[tokio::test]
async fn test_create_without_id_is_decode_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/users"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({"message": "Internal server error"})),
        )
        .mount(&server)
        .await;

    let result = client().execute(&target(&server), Call::Create { seq: 1 }).await;

    assert!(!result.success);
    assert_eq!(result.status, 0);
    assert!(result.error.unwrap().starts_with("decode error"));
}

#[tokio::test]
async fn test_non_json_body_is_decode_failure() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/users/3"))
        .and(body_json(json!({"name": "Updated User 3"})))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let result = client().execute(&target(&server), Call::Update { id: 3 }).await;

    assert!(!result.success);
    assert_eq!(result.status, 0);
    assert!(result.payload.is_none());
    assert!(result.error.unwrap().starts_with("decode error"));
}

#[tokio::test]
async fn test_delete_body_is_not_decoded() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/users/9"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let result = client().execute(&target(&server), Call::Delete { id: 9 }).await;

    assert!(result.success);
    assert_eq!(result.status, 204);
    assert!(result.payload.is_none());
}

#[tokio::test]
async fn test_connection_refused_is_transport_failure() {
    let result = client()
        .execute(&closed_port_target(), Call::GetAll)
        .await;

    assert!(!result.success);
    assert_eq!(result.status, 0);
    assert!(result.error.unwrap().starts_with("transport error"));
}

#[tokio::test]
async fn test_request_timeout_is_transport_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;
    let client = HttpClient::new(Duration::from_millis(100), Duration::from_secs(1)).unwrap();

    let result = client.execute(&target(&server), Call::GetAll).await;

    assert!(!result.success);
    assert_eq!(result.status, 0);
    assert!(result.duration >= Duration::from_millis(100));
}

#[tokio::test]
async fn test_probe_requires_exact_ok() {
    let ok = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&ok)
        .await;

    let erroring = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&erroring)
        .await;

    let client = client();
    assert!(client.is_available(&target(&ok)).await);
    assert!(!client.is_available(&target(&erroring)).await);
    assert!(!client.is_available(&closed_port_target()).await);
}

#[tokio::test]
async fn test_probe_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;

    assert!(!client().is_available(&target(&server)).await);
}
