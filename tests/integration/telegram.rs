//! Telegram notifier against a mocked Bot API

use marketpulse::error::DeliveryError;
use marketpulse::services::notifier::NotificationSink;
use marketpulse::services::telegram::TelegramNotifier;
use serde_json::json;
use std::time::Duration;
use tempfile::tempdir;
use tokio_test::{assert_err, assert_ok};
use wiremock::matchers::{body_json, body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN: &str = "123456:secret-token";

fn notifier(server: &MockServer) -> TelegramNotifier {
    TelegramNotifier::with_client(server.uri(), TOKEN, reqwest::Client::new())
}

#[tokio::test]
async fn sends_text_message_as_json() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("/bot{}/sendMessage", TOKEN)))
        .and(body_json(json!({ "chat_id": "-1001", "text": "🔴 Oro (GC=F) entering Overbought | RSI 71.20" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true, "result": {} })))
        .expect(1)
        .mount(&server)
        .await;

    assert_ok!(
        notifier(&server)
            .send_text("-1001", "🔴 Oro (GC=F) entering Overbought | RSI 71.20")
            .await
    );
}

#[tokio::test]
async fn api_rejection_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("/bot{}/sendMessage", TOKEN)))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "ok": false,
            "error_code": 400,
            "description": "Bad Request: chat not found"
        })))
        .mount(&server)
        .await;

    let err = assert_err!(notifier(&server).send_text("-1", "hello").await);
    match err {
        DeliveryError::Rejected { code, description } => {
            assert_eq!(code, 400);
            assert!(description.contains("chat not found"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn ok_false_with_success_status_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("/bot{}/sendMessage", TOKEN)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": false, "description": "flood" })))
        .mount(&server)
        .await;

    let err = assert_err!(notifier(&server).send_text("-1", "hello").await);
    assert!(matches!(err, DeliveryError::Rejected { code: 200, .. }));
}

#[tokio::test]
async fn svg_chart_is_sent_as_document() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("/bot{}/sendDocument", TOKEN)))
        .and(body_string_contains("name=\"document\""))
        .and(body_string_contains("Daily RSI"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    let chart = dir.path().join("rsi_diario.svg");
    std::fs::write(&chart, "<svg xmlns=\"http://www.w3.org/2000/svg\"></svg>").unwrap();

    assert_ok!(notifier(&server).send_image("-1001", &chart, "📈 Daily RSI").await);
}

#[tokio::test]
async fn png_chart_is_sent_as_photo() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("/bot{}/sendPhoto", TOKEN)))
        .and(body_string_contains("name=\"photo\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    let chart = dir.path().join("rsi.png");
    std::fs::write(&chart, b"PNG-DATA").unwrap();

    assert_ok!(notifier(&server).send_image("-1001", &chart, "chart").await);
}

#[tokio::test]
async fn missing_attachment_fails_without_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
        .expect(0)
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    let err = assert_err!(
        notifier(&server)
            .send_image("-1", &dir.path().join("missing.svg"), "chart")
            .await
    );
    assert!(matches!(err, DeliveryError::Attachment(_)));
}

#[tokio::test]
async fn unreachable_api_does_not_leak_token() {
    let notifier = TelegramNotifier::new("http://127.0.0.1:9", TOKEN, Duration::from_millis(500)).unwrap();
    let err = assert_err!(notifier.send_text("-1", "hello").await);
    assert!(!err.to_string().contains("secret-token"));
    assert!(!format!("{:?}", err).contains("secret-token"));
}

#[tokio::test]
async fn transport_error_message_leaves_cause_to_source() {
    use std::error::Error;

    let notifier = TelegramNotifier::new("http://127.0.0.1:9", TOKEN, Duration::from_secs(5)).unwrap();
    let err = assert_err!(notifier.send_text("-1", "hello").await);
    assert!(matches!(err, DeliveryError::Http(_)), "{:?}", err);
    assert_eq!(err.to_string(), "HTTP request failed");
    let cause = err.source().expect("reqwest error kept as source").to_string();
    assert!(!err.to_string().contains(&cause));
}
