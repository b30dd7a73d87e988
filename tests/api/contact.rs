use reqwest::StatusCode;

use wiremock::matchers::*;
use wiremock::{Mock, ResponseTemplate};

use contact_backend::submission::{Acknowledgment, ContactRequest};

use crate::helpers::{valid_request, MemoryStore, TestApp, OPERATOR_ADDRESS};

#[tokio::test]
async fn contact_returns_success_for_valid_request() {
    let app = TestApp::spawn().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .mount(&app.email_server)
        .await;

    let res = app
        .contact_create(&valid_request())
        .await
        .expect("Failed to execute request");

    assert_eq!(StatusCode::OK, res.status());
    let ack: Acknowledgment = res.json().await.expect("Failed to parse body");
    assert_eq!(Acknowledgment::success("Request sent successfully"), ack);

    let records = app.store.records();
    assert_eq!(1, records.len());
    assert_eq!("Ann", records[0].name);
    assert_eq!("a@x.com", records[0].email);
    assert_eq!("555", records[0].phone);
}

#[tokio::test]
async fn contact_rejects_missing_required_fields() {
    let app = TestApp::spawn().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.email_server)
        .await;

    let test_cases: Vec<(&str, ContactRequest)> = vec![
        (
            "empty name",
            ContactRequest {
                name: Some(String::new()),
                ..valid_request()
            },
        ),
        (
            "missing email",
            ContactRequest {
                email: None,
                ..valid_request()
            },
        ),
        (
            "missing phone",
            ContactRequest {
                phone: None,
                ..valid_request()
            },
        ),
        ("missing everything", ContactRequest::default()),
    ];

    for (desc, request) in test_cases {
        let res = app
            .contact_create(&request)
            .await
            .expect("Failed to execute request");

        assert_eq!(StatusCode::OK, res.status(), "payload was {}", desc);
        let ack: Acknowledgment = res.json().await.expect("Failed to parse body");
        assert_eq!(
            Acknowledgment::failure("Fill required fields"),
            ack,
            "payload was {}",
            desc
        );
    }

    assert!(app.store.records().is_empty());
}

#[tokio::test]
async fn contact_sends_a_notification_to_the_operator() {
    let app = TestApp::spawn().await;

    Mock::given(path("/email"))
        .and(method("POST"))
        .and(body_partial_json(serde_json::json!({
            "From": OPERATOR_ADDRESS,
            "To": OPERATOR_ADDRESS,
            "Subject": "New Photoshoot Request",
        })))
        .respond_with(ResponseTemplate::new(200))
        // Expect a send-email request
        .expect(1)
        .mount(&app.email_server)
        .await;

    let request = ContactRequest {
        date: Some("2024-06-01".into()),
        message: Some("Family portraits at the beach".into()),
        ..valid_request()
    };

    let res = app
        .contact_create(&request)
        .await
        .expect("Failed to execute request");
    assert_eq!(StatusCode::OK, res.status());

    let email_request = &app.email_server.received_requests().await.unwrap()[0];
    let body: serde_json::Value = serde_json::from_slice(&email_request.body).unwrap();
    let text = body["TextBody"].as_str().unwrap();

    assert!(text.contains("Ann"));
    assert!(text.contains("a@x.com"));
    assert!(text.contains("555"));
    assert!(text.contains("2024-06-01"));
    assert!(text.contains("Family portraits at the beach"));
}

#[tokio::test]
async fn contact_is_consistent_if_email_send_fails() {
    let app = TestApp::spawn().await;

    Mock::given(path("/email"))
        .and(method("POST"))
        // Ensure that send-email fails
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&app.email_server)
        .await;

    let res = app
        .contact_create(&valid_request())
        .await
        .expect("Failed to execute request");

    assert_eq!(StatusCode::OK, res.status());
    let ack: Acknowledgment = res.json().await.expect("Failed to parse body");
    assert!(ack.success);

    assert_eq!(1, app.store.records().len());
}

#[tokio::test]
async fn contact_succeeds_without_email_credentials() {
    let app = TestApp::spawn_with(MemoryStore::default(), false).await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.email_server)
        .await;

    let res = app
        .contact_create(&valid_request())
        .await
        .expect("Failed to execute request");

    let ack: Acknowledgment = res.json().await.expect("Failed to parse body");
    assert!(ack.success);
    assert_eq!(1, app.store.records().len());
}

#[tokio::test]
async fn contact_returns_server_error_if_store_is_down() {
    let app = TestApp::spawn_with(MemoryStore::unavailable(), true).await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        // The operator must not hear about unsaved requests
        .expect(0)
        .mount(&app.email_server)
        .await;

    let res = app
        .contact_create(&valid_request())
        .await
        .expect("Failed to execute request");

    assert_eq!(StatusCode::INTERNAL_SERVER_ERROR, res.status());
    let ack: Acknowledgment = res.json().await.expect("Failed to parse body");
    assert_eq!(Acknowledgment::failure("Server Error"), ack);
    assert!(app.store.records().is_empty());
}

#[tokio::test]
async fn contact_rejects_malformed_json() {
    let app = TestApp::spawn().await;

    let res = app
        .request(reqwest::Method::POST, "contact")
        .header("Content-Type", "application/json")
        .body("{\"name\": ")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(StatusCode::BAD_REQUEST, res.status());
    let ack: Acknowledgment = res.json().await.expect("Failed to parse body");
    assert!(!ack.success);
    assert!(app.store.records().is_empty());
}

#[tokio::test]
async fn contact_rejects_non_json_bodies() {
    let app = TestApp::spawn().await;

    let test_cases: Vec<(&str, &str, &str)> = vec![
        (
            "form post",
            "application/x-www-form-urlencoded",
            "name=Ann&email=a%40x.com&phone=555",
        ),
        (
            "numeric phone",
            "application/json",
            r#"{"name": "Ann", "email": "a@x.com", "phone": 555}"#,
        ),
    ];

    for (desc, content_type, body) in test_cases {
        let res = app
            .request(reqwest::Method::POST, "contact")
            .header("Content-Type", content_type)
            .body(body)
            .send()
            .await
            .expect("Failed to execute request");

        assert_eq!(StatusCode::BAD_REQUEST, res.status(), "payload was {}", desc);
        let ack: Acknowledgment = res.json().await.expect("Failed to parse body");
        assert_eq!(
            Acknowledgment::failure("Invalid request body"),
            ack,
            "payload was {}",
            desc
        );
    }

    assert!(app.store.records().is_empty());
}

#[tokio::test]
async fn contact_ignores_unknown_fields_and_nulls() {
    let app = TestApp::spawn_with(MemoryStore::default(), false).await;

    let body = serde_json::json!({
        "name": "Ann",
        "email": "a@x.com",
        "phone": "555",
        "date": null,
        "source": "site",
    });

    let res = app
        .request(reqwest::Method::POST, "contact")
        .json(&body)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(StatusCode::OK, res.status());

    let records = app.store.records();
    assert_eq!(1, records.len());
    assert!(records[0].date.is_none());
}

#[tokio::test]
async fn duplicate_submissions_create_independent_records() {
    let app = TestApp::spawn().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(2)
        .mount(&app.email_server)
        .await;

    for _ in 0..2 {
        let res = app
            .contact_create(&valid_request())
            .await
            .expect("Failed to execute request");
        assert_eq!(StatusCode::OK, res.status());
    }

    let records = app.store.records();
    assert_eq!(2, records.len());
    assert_ne!(records[0].id, records[1].id);
}
