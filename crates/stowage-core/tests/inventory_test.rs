// End-to-end controller tests against a wiremock backend.

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use stowage_core::{
    CoreError, Inventory, LoadState, PackageFilter, PackageInput, PackageSubmission,
    UserRegistration,
};

async fn setup() -> (MockServer, Inventory) {
    let server = MockServer::start().await;
    let base = format!("{}/api", server.uri());
    let client = stowage_api::InventoryClient::from_reqwest(&base, reqwest::Client::new())
        .expect("client");
    (server, Inventory::from_client(client))
}

fn packages_body() -> serde_json::Value {
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
            "surname": "Rossi",
            "weight": 1.0,
            "arrivalDate": "2024-03-02T10:00:00Z",
            "status": "Delivered"
        }
    ])
}

fn users_body() -> serde_json::Value {
    json!([
        { "id": 1, "name": "Rossi", "email": "rossi@example.com", "status": "active" }
    ])
}

async fn mount_listings(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/packages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(packages_body()))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(users_body()))
        .mount(server)
        .await;
}

#[tokio::test]
async fn refresh_populates_store_and_reaches_ready() {
    let (server, inventory) = setup().await;
    mount_listings(&server).await;

    let mut load_state = inventory.load_state();
    assert_eq!(*load_state.borrow_and_update(), LoadState::Idle);

    inventory.refresh().await.expect("refresh");

    assert!(load_state.borrow_and_update().is_ready());
    assert_eq!(inventory.store().package_count(), 2);
    assert_eq!(inventory.store().user_count(), 1);
    assert!(inventory.store().last_refresh().is_some());
}

#[tokio::test]
async fn refresh_failure_sets_errored_and_keeps_previous_data() {
    let (server, inventory) = setup().await;

    {
        let guard_packages = Mock::given(method("GET"))
            .and(path("/api/packages"))
            .respond_with(ResponseTemplate::new(200).set_body_json(packages_body()))
            .mount_as_scoped(&server)
            .await;
        let guard_users = Mock::given(method("GET"))
            .and(path("/api/users"))
            .respond_with(ResponseTemplate::new(200).set_body_json(users_body()))
            .mount_as_scoped(&server)
            .await;
        inventory.refresh().await.expect("first refresh");
        drop((guard_packages, guard_users));
    }

    // Second refresh hits a dead backend.
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let err = inventory.refresh().await.expect_err("must fail");
    assert!(matches!(err, CoreError::Rejected { .. }));
    assert!(matches!(
        &*inventory.load_state().borrow(),
        LoadState::Errored(_)
    ));

    // Stale-but-present beats blank.
    assert_eq!(inventory.store().package_count(), 2);
}

#[tokio::test]
async fn submit_round_trips_and_refetches_packages() {
    let (server, inventory) = setup().await;
    mount_listings(&server).await;
    inventory.refresh().await.expect("refresh");

    let expected = json!({
        "id": "PKG-0042",
        "surname": "Rossi",
        "weight": 1.2,
        "status": "In Storage",
        "emailNotification": { "sendNotification": false }
    });
    Mock::given(method("POST"))
        .and(path("/api/packages"))
        .and(body_json(&expected))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "PKG-0042",
            "surname": "Rossi",
            "weight": 1.2,
            "arrivalDate": "2024-03-05T08:00:00Z",
            "status": "In Storage"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let submission = PackageSubmission::new(inventory.clone());
    let input = PackageInput {
        id: " PKG-0042 ".into(),
        surname: "Rossi".into(),
        weight: "1.2".into(),
        ..PackageInput::default()
    };

    let recipient = submission.submit(input).await.expect("submit");
    assert_eq!(recipient.user().map(|u| u.id), Some(1));
}

#[tokio::test]
async fn second_submit_while_busy_is_rejected_without_network_traffic() {
    let (server, inventory) = setup().await;
    mount_listings(&server).await;
    inventory.refresh().await.expect("refresh");

    Mock::given(method("POST"))
        .and(path("/api/packages"))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(json!({
                    "id": "PKG-0050",
                    "surname": "Rossi",
                    "weight": 1.0,
                    "arrivalDate": "2024-03-05T08:00:00Z",
                    "status": "In Storage"
                }))
                .set_delay(Duration::from_millis(250)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let submission = PackageSubmission::new(inventory.clone());
    let input = PackageInput {
        id: "PKG-0050".into(),
        surname: "Rossi".into(),
        weight: "1.0".into(),
        ..PackageInput::default()
    };

    let first = {
        let submission = submission.clone();
        let input = input.clone();
        tokio::spawn(async move { submission.submit(input).await })
    };

    // Let the first submission reach the (slow) backend.
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(submission.is_busy());

    let err = submission.submit(input).await.expect_err("must be busy");
    assert!(matches!(err, CoreError::Busy { .. }), "got: {err:?}");

    first.await.expect("join").expect("first submit succeeds");
    assert!(!submission.is_busy());
}

#[tokio::test]
async fn validation_failures_never_touch_the_network() {
    let (server, inventory) = setup().await;
    // Expect zero calls of any kind.
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let submission = PackageSubmission::new(inventory.clone());

    let err = submission
        .submit(PackageInput {
            surname: "Rossi".into(),
            weight: "1.0".into(),
            ..PackageInput::default()
        })
        .await
        .expect_err("missing id");
    assert_eq!(err.to_string(), "A tracking identifier is required.");

    let err = submission
        .submit(PackageInput {
            id: "PKG-1".into(),
            surname: "Rossi".into(),
            weight: "-2".into(),
            ..PackageInput::default()
        })
        .await
        .expect_err("bad weight");
    assert_eq!(err.to_string(), "Weight must be a positive number.");

    let registration = UserRegistration::new(inventory);
    let err = registration
        .register("Rossi", "not-an-email")
        .await
        .expect_err("bad email");
    assert_eq!(err.to_string(), "Enter a valid email address.");
}

#[tokio::test]
async fn duplicate_id_rejection_carries_backend_message() {
    let (server, inventory) = setup().await;
    mount_listings(&server).await;
    inventory.refresh().await.expect("refresh");

    Mock::given(method("POST"))
        .and(path("/api/packages"))
        .respond_with(
            ResponseTemplate::new(409)
                .set_body_json(json!({ "message": "Package PKG-0001 already exists" })),
        )
        .mount(&server)
        .await;

    let submission = PackageSubmission::new(inventory);
    let err = submission
        .submit(PackageInput {
            id: "PKG-0001".into(),
            surname: "Rossi".into(),
            weight: "2.5".into(),
            ..PackageInput::default()
        })
        .await
        .expect_err("duplicate");

    assert_eq!(err.to_string(), "Package PKG-0001 already exists");
}

#[tokio::test]
async fn mark_delivered_refetches_and_filter_hides_the_package() {
    let (server, inventory) = setup().await;

    {
        let _packages = Mock::given(method("GET"))
            .and(path("/api/packages"))
            .respond_with(ResponseTemplate::new(200).set_body_json(packages_body()))
            .mount_as_scoped(&server)
            .await;
        let _users = Mock::given(method("GET"))
            .and(path("/api/users"))
            .respond_with(ResponseTemplate::new(200).set_body_json(users_body()))
            .mount_as_scoped(&server)
            .await;
        inventory.refresh().await.expect("refresh");
    }

    let mine = PackageFilter::for_surname("Rossi").apply(&inventory.store().packages_snapshot());
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].id, "PKG-0001");

    Mock::given(method("PUT"))
        .and(path("/api/packages/PKG-0001/status"))
        .and(body_json(json!({ "status": "Delivered" })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    // The refetch after the mutation sees the updated listing.
    Mock::given(method("GET"))
        .and(path("/api/packages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "id": "PKG-0001",
                "surname": "Rossi",
                "weight": 2.5,
                "arrivalDate": "2024-03-01T09:30:00Z",
                "status": "Delivered"
            }
        ])))
        .mount(&server)
        .await;

    inventory.mark_delivered("PKG-0001").await.expect("deliver");

    let mine = PackageFilter::for_surname("Rossi").apply(&inventory.store().packages_snapshot());
    assert!(mine.is_empty(), "delivered packages leave the user view");
}
