//! Test utilities shared by the integration tests

use goldwatch::providers::{CnyesProvider, ProviderConfig};
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Provider config pointed at a mock server with test-friendly retry timing.
pub fn quick_config(name: &'static str, endpoint: String) -> ProviderConfig {
    ProviderConfig::new(name, endpoint)
        .with_timeout(Duration::from_secs(2))
        .with_max_attempts(2)
        .with_backoff(Duration::from_millis(10))
}

/// A cnyes provider against the given mock server.
pub fn cnyes_against(server: &MockServer) -> CnyesProvider {
    CnyesProvider::with_config(quick_config("cnyes", format!("{}/quotes", server.uri())))
}

/// Mount a successful cnyes quote with the given OHLC values.
pub async fn mock_cnyes_quote(
    server: &MockServer,
    close: f64,
    open: f64,
    high: f64,
    low: f64,
) {
    let response = serde_json::json!({
        "data": [{
            "close": close,
            "open": open,
            "high": high,
            "low": low
        }]
    });

    Mock::given(method("GET"))
        .and(path("/quotes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(response))
        .mount(server)
        .await;
}

/// Mount a cnyes endpoint that always answers with the given status.
pub async fn mock_cnyes_status(server: &MockServer, status: u16) {
    Mock::given(method("GET"))
        .and(path("/quotes"))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

/// Mount a LINE push endpoint answering with the given status.
pub async fn mock_line_push(server: &MockServer, status: u16) {
    Mock::given(method("POST"))
        .and(path("/v2/bot/message/push"))
        .respond_with(ResponseTemplate::new(status).set_body_json(serde_json::json!({})))
        .mount(server)
        .await;
}

/// Collect the text bodies of all requests a mock server received.
pub async fn received_bodies(server: &MockServer) -> Vec<String> {
    server
        .received_requests()
        .await
        .expect("wiremock requests")
        .iter()
        .map(|req| String::from_utf8_lossy(&req.body).to_string())
        .collect()
}
