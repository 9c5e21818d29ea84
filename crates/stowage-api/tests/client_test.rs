// Contract tests for `InventoryClient` using wiremock.

use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use stowage_api::types::{EmailNotification, NewPackage};
use stowage_api::{Error, InventoryClient, PackageStatus};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, InventoryClient) {
    let server = MockServer::start().await;
    let base = format!("{}/api", server.uri());
    let client = InventoryClient::from_reqwest(&base, reqwest::Client::new()).expect("client");
    (server, client)
}

fn sample_packages() -> serde_json::Value {
    json!([
        {
            "id": "PKG-0001",
            "surname": "Rossi",
            "weight": 2.5,
            "arrivalDate": "2024-03-01T09:30:00Z",
            "status": "In Storage"
        },
        {
            "id": "PKG-0002",
            "surname": "Bianchi",
            "weight": 0.8,
            "arrivalDate": "2024-03-02T14:00:00Z",
            "status": "Delivered"
        }
    ])
}

// ── Happy-path tests ────────────────────────────────────────────────

#[tokio::test]
async fn list_packages_parses_wire_statuses() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/packages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_packages()))
        .mount(&server)
        .await;

    let packages = client.list_packages().await.expect("list");

    assert_eq!(packages.len(), 2);
    assert_eq!(packages[0].id, "PKG-0001");
    assert_eq!(packages[0].status, PackageStatus::InStorage);
    assert!((packages[0].weight - 2.5).abs() < f64::EPSILON);
    assert_eq!(packages[1].status, PackageStatus::Delivered);
}

#[tokio::test]
async fn list_users_parses_records() {
    let (server, client) = setup().await;

    let body = json!([
        { "id": 1, "name": "Rossi", "email": "rossi@example.com", "status": "active" },
        { "id": 2, "name": "Bianchi", "email": "bianchi@example.com", "status": "pending" }
    ]);

    Mock::given(method("GET"))
        .and(path("/api/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let users = client.list_users().await.expect("list");

    assert_eq!(users.len(), 2);
    assert_eq!(users[0].id, 1);
    assert_eq!(users[0].name, "Rossi");
    assert_eq!(users[1].status, "pending");
}

#[tokio::test]
async fn create_package_sends_status_and_notification() {
    let (server, client) = setup().await;

    let expected_body = json!({
        "id": "PKG-0042",
        "surname": "Verdi",
        "weight": 1.2,
        "status": "In Storage",
        "emailNotification": {
            "sendNotification": true,
            "notificationMessage": "Arrived today"
        }
    });

    let created = json!({
        "id": "PKG-0042",
        "surname": "Verdi",
        "weight": 1.2,
        "arrivalDate": "2024-03-05T08:00:00Z",
        "status": "In Storage"
    });

    Mock::given(method("POST"))
        .and(path("/api/packages"))
        .and(body_json(&expected_body))
        .respond_with(ResponseTemplate::new(201).set_body_json(&created))
        .mount(&server)
        .await;

    let request = NewPackage::new("PKG-0042", "Verdi", 1.2).with_notification(EmailNotification {
        send_notification: true,
        notification_message: Some("Arrived today".into()),
    });

    let package = client.create_package(&request).await.expect("create");
    assert_eq!(package.id, "PKG-0042");
    assert_eq!(package.status, PackageStatus::InStorage);
}

#[tokio::test]
async fn create_package_omits_absent_notification_message() {
    let (server, client) = setup().await;

    let expected_body = json!({
        "id": "PKG-0043",
        "surname": "Verdi",
        "weight": 3.0,
        "status": "In Storage",
        "emailNotification": { "sendNotification": false }
    });

    let created = json!({
        "id": "PKG-0043",
        "surname": "Verdi",
        "weight": 3.0,
        "arrivalDate": "2024-03-05T08:00:00Z",
        "status": "In Storage"
    });

    Mock::given(method("POST"))
        .and(path("/api/packages"))
        .and(body_json(&expected_body))
        .respond_with(ResponseTemplate::new(200).set_body_json(&created))
        .mount(&server)
        .await;

    let request = NewPackage::new("PKG-0043", "Verdi", 3.0);
    client.create_package(&request).await.expect("create");
}

#[tokio::test]
async fn create_user_round_trips() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/users"))
        .and(body_json(json!({ "name": "Neri", "email": "neri@example.com" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 7,
            "name": "Neri",
            "email": "neri@example.com",
            "status": "active"
        })))
        .mount(&server)
        .await;

    let user = client
        .create_user("Neri", "neri@example.com")
        .await
        .expect("create");
    assert_eq!(user.id, 7);
}

#[tokio::test]
async fn set_status_resolves_on_204_without_parsing_a_body() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/api/packages/PKG-0001/status"))
        .and(body_json(json!({ "status": "Delivered" })))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    client
        .set_package_status("PKG-0001", PackageStatus::Delivered)
        .await
        .expect("204 must resolve as empty success");
}

// ── Error-extraction tests ──────────────────────────────────────────

#[tokio::test]
async fn structured_error_message_field_is_extracted_verbatim() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/packages"))
        .respond_with(
            ResponseTemplate::new(409)
                .set_body_json(json!({ "message": "Package PKG-1 already exists" })),
        )
        .mount(&server)
        .await;

    let err = client.list_packages().await.expect_err("must fail");
    match err {
        Error::Api { message, status } => {
            assert_eq!(message, "Package PKG-1 already exists");
            assert_eq!(status, 409);
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn structured_error_title_field_is_used_when_message_absent() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/users"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "title": "One or more validation errors occurred.",
            "traceId": "00-abc-00"
        })))
        .mount(&server)
        .await;

    let err = client.list_users().await.expect_err("must fail");
    match err {
        Error::Api { message, .. } => {
            assert_eq!(message, "One or more validation errors occurred.");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn plain_text_error_body_is_used_verbatim() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/packages"))
        .respond_with(ResponseTemplate::new(500).set_body_string("database is on fire"))
        .mount(&server)
        .await;

    let err = client.list_packages().await.expect_err("must fail");
    match err {
        Error::Api { message, status } => {
            assert_eq!(message, "database is on fire");
            assert_eq!(status, 500);
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn empty_error_body_falls_back_to_status_line() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/packages"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = client.list_packages().await.expect_err("must fail");
    match err {
        Error::Api { message, status } => {
            assert_eq!(status, 503);
            assert!(message.contains("503"), "got: {message}");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn json_error_without_known_fields_keeps_raw_text() {
    let (server, client) = setup().await;

    let raw = r#"{"code":"E42","detail":"unknown shape"}"#;
    Mock::given(method("GET"))
        .and(path("/api/packages"))
        .respond_with(ResponseTemplate::new(422).set_body_string(raw))
        .mount(&server)
        .await;

    let err = client.list_packages().await.expect_err("must fail");
    match err {
        Error::Api { message, .. } => assert_eq!(message, raw),
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn connection_refused_surfaces_as_transport_error() {
    // Port 1 is essentially guaranteed closed.
    let client =
        InventoryClient::from_reqwest("http://127.0.0.1:1/api", reqwest::Client::new())
            .expect("client");

    let err = client.list_packages().await.expect_err("must fail");
    assert!(err.is_connect(), "got: {err:?}");
}

#[tokio::test]
async fn malformed_success_body_is_a_deserialization_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/packages"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json at all"))
        .mount(&server)
        .await;

    let err = client.list_packages().await.expect_err("must fail");
    assert!(matches!(err, Error::Deserialization { .. }), "got: {err:?}");
}

#[tokio::test]
async fn multibyte_malformed_body_does_not_panic_on_preview_truncation() {
    let (server, client) = setup().await;

    // 300 bytes of 3-byte code points: byte 200 is not a char boundary.
    let body = "€".repeat(100);
    Mock::given(method("GET"))
        .and(path("/api/packages"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(&server)
        .await;

    let err = client.list_packages().await.expect_err("must fail");
    match err {
        Error::Deserialization { message, .. } => {
            assert!(message.contains('€'), "got: {message}");
        }
        other => panic!("expected Deserialization error, got {other:?}"),
    }
}
