//! Yahoo price provider against a mocked chart API

use chrono::{NaiveDate, NaiveTime};
use marketpulse::error::ProviderError;
use marketpulse::services::market_data::PriceProvider;
use marketpulse::services::yahoo::YahooPriceProvider;
use serde_json::json;
use std::time::Duration;
use tokio_test::{assert_err, assert_ok};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
}

/// 09:30 New York time (14:30 UTC before the March DST switch).
fn bar_timestamp(d: u32) -> i64 {
    day(d).and_time(NaiveTime::MIN).and_utc().timestamp() + 14 * 3600 + 30 * 60
}

fn chart_body(days: &[u32], closes: &[Option<f64>]) -> serde_json::Value {
    let timestamps: Vec<i64> = days.iter().map(|d| bar_timestamp(*d)).collect();
    json!({
        "chart": {
            "result": [{
                "meta": { "symbol": "GC=F", "gmtoffset": -18000 },
                "timestamp": timestamps,
                "indicators": {
                    "quote": [{ "close": closes }],
                    "adjclose": [{ "adjclose": closes }]
                }
            }],
            "error": null
        }
    })
}

fn provider(server: &MockServer) -> YahooPriceProvider {
    YahooPriceProvider::with_client(server.uri(), reqwest::Client::new())
        .with_retry(2, Duration::from_millis(10))
}

#[tokio::test]
async fn fetches_daily_closes_in_date_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v8/finance/chart/GC=F"))
        .and(query_param("interval", "1d"))
        .and(query_param("includeAdjustedClose", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chart_body(
            &[4, 5, 6, 7],
            &[Some(2050.1), Some(2061.0), None, Some(2075.4)],
        )))
        .expect(1)
        .mount(&server)
        .await;

    let series = assert_ok!(provider(&server).fetch("GC=F", day(1), day(8)).await);
    assert_eq!(series.dates(), vec![day(4), day(5), day(7)]);
    assert_eq!(series.closes(), vec![2050.1, 2061.0, 2075.4]);
}

#[tokio::test]
async fn unknown_symbol_yields_empty_series() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v8/finance/chart/NOPE"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "chart": {
                "result": null,
                "error": { "code": "Not Found", "description": "No data found, symbol may be delisted" }
            }
        })))
        .mount(&server)
        .await;

    let series = assert_ok!(provider(&server).fetch("NOPE", day(1), day(8)).await);
    assert!(series.is_empty());
}

#[tokio::test]
async fn empty_result_yields_empty_series() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v8/finance/chart/RIO"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "chart": { "result": [], "error": null }
        })))
        .mount(&server)
        .await;

    let series = assert_ok!(provider(&server).fetch("RIO", day(1), day(8)).await);
    assert!(series.is_empty());
}

#[tokio::test]
async fn retries_transient_server_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v8/finance/chart/GC=F"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .with_priority(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v8/finance/chart/GC=F"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chart_body(&[4], &[Some(2050.0)])))
        .expect(1)
        .mount(&server)
        .await;

    let series = assert_ok!(provider(&server).fetch("GC=F", day(1), day(8)).await);
    assert_eq!(series.closes(), vec![2050.0]);
}

#[tokio::test]
async fn gives_up_after_retry_budget() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v8/finance/chart/GC=F"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&server)
        .await;

    let err = assert_err!(provider(&server).fetch("GC=F", day(1), day(8)).await);
    assert!(matches!(err, ProviderError::Status { status: 500, .. }));
}

#[tokio::test]
async fn client_errors_are_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v8/finance/chart/GC=F"))
        .respond_with(ResponseTemplate::new(400).set_body_string("bad request"))
        .expect(1)
        .mount(&server)
        .await;

    let err = assert_err!(provider(&server).fetch("GC=F", day(1), day(8)).await);
    assert!(matches!(err, ProviderError::Status { status: 400, .. }));
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn malformed_body_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v8/finance/chart/GC=F"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let err = assert_err!(provider(&server).fetch("GC=F", day(1), day(8)).await);
    assert!(matches!(err, ProviderError::Decode(_)));
}

#[tokio::test]
async fn slow_upstream_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v8/finance/chart/GC=F"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(chart_body(&[4], &[Some(1.0)]))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let provider = YahooPriceProvider::new(server.uri(), Duration::from_millis(50))
        .unwrap()
        .with_retry(0, Duration::from_millis(1));
    let err = assert_err!(provider.fetch("GC=F", day(1), day(8)).await);
    assert!(matches!(err, ProviderError::Timeout(_)));
}
