//! Integration tests for the signed partner API dispatcher.
//!
//! These tests run the client against a local mock server and check the
//! query parameters, signatures and failure values it produces.

use std::collections::HashMap;
use std::time::Duration;

use serde_json::json;
use shopee_bridge::auth::compute_signature;
use shopee_bridge::clients::{ApiRequest, HttpError, PartnerClient};
use shopee_bridge::{BaseUrl, BridgeConfig, PartnerId, PartnerKey};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PARTNER_KEY: &str = "partner-secret";

fn create_client(base_url: &str, timeout: Duration) -> PartnerClient {
    let config = BridgeConfig::builder()
        .partner_id(PartnerId::new(123).unwrap())
        .partner_key(PartnerKey::new(PARTNER_KEY).unwrap())
        .base_url(BaseUrl::new(base_url).unwrap())
        .http_timeout(timeout)
        .build()
        .unwrap();
    PartnerClient::new(&config).unwrap()
}

async fn received_query(server: &MockServer) -> Vec<HashMap<String, String>> {
    server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .map(|request| request.url.query_pairs().into_owned().collect())
        .collect()
}

// ============================================================================
// Signing and query parameters
// ============================================================================

#[tokio::test]
async fn test_unauthenticated_call_is_signed_without_shop_params() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/public/get_shops_by_partner"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"error": "", "shops": []})))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_client(&server.uri(), Duration::from_secs(5));
    let response = client
        .try_send(ApiRequest::get("/api/v2/public/get_shops_by_partner"))
        .await
        .unwrap();

    assert_eq!(response, json!({"error": "", "shops": []}));

    let queries = received_query(&server).await;
    let query = &queries[0];
    assert_eq!(query["partner_id"], "123");
    assert!(!query.contains_key("access_token"));
    assert!(!query.contains_key("shop_id"));

    let base = format!("123/api/v2/public/get_shops_by_partner{}", query["timestamp"]);
    assert_eq!(query["sign"], compute_signature(&base, PARTNER_KEY));
}

#[tokio::test]
async fn test_authenticated_post_carries_credentials_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v2/product/update_stock"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"error": "", "response": {}})))
        .mount(&server)
        .await;

    let client = create_client(&server.uri(), Duration::from_secs(5));
    let body = json!({"item_id": 1, "stock_list": [{"model_id": 0, "normal_stock": 5}]});
    client
        .try_send(
            ApiRequest::post("/api/v2/product/update_stock", body.clone())
                .with_shop_credentials("AT", "9"),
        )
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    let request = &requests[0];
    let sent: serde_json::Value = serde_json::from_slice(&request.body).unwrap();
    assert_eq!(sent, body);

    let query: HashMap<String, String> = request.url.query_pairs().into_owned().collect();
    assert_eq!(query["access_token"], "AT");
    assert_eq!(query["shop_id"], "9");

    let base = format!("123/api/v2/product/update_stock{}AT9", query["timestamp"]);
    assert_eq!(query["sign"], compute_signature(&base, PARTNER_KEY));
}

#[tokio::test]
async fn test_half_credentials_fall_back_to_unauthenticated_signature() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let client = create_client(&server.uri(), Duration::from_secs(5));
    client
        .try_send(ApiRequest::get("/api/v2/shop/get_shop_info").access_token("AT"))
        .await
        .unwrap();

    let queries = received_query(&server).await;
    let query = &queries[0];
    assert_eq!(query["access_token"], "AT");

    let base = format!("123/api/v2/shop/get_shop_info{}", query["timestamp"]);
    assert_eq!(query["sign"], compute_signature(&base, PARTNER_KEY));
}

#[tokio::test]
async fn test_empty_credentials_are_not_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let client = create_client(&server.uri(), Duration::from_secs(5));
    client
        .try_send(ApiRequest::get("/api/v2/shop/get_shop_info").with_shop_credentials("", "9"))
        .await
        .unwrap();

    let queries = received_query(&server).await;
    let query = &queries[0];
    assert!(!query.contains_key("access_token"));
    assert_eq!(query["shop_id"], "9");

    let base = format!("123/api/v2/shop/get_shop_info{}", query["timestamp"]);
    assert_eq!(query["sign"], compute_signature(&base, PARTNER_KEY));
}

#[tokio::test]
async fn test_partner_key_is_never_sent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let client = create_client(&server.uri(), Duration::from_secs(5));
    client
        .send(ApiRequest::post("/api/v2/auth/token/get", json!({"code": "abc"})))
        .await;

    let requests = server.received_requests().await.unwrap();
    let request = &requests[0];
    assert!(!request.url.as_str().contains(PARTNER_KEY));
    assert!(!String::from_utf8_lossy(&request.body).contains(PARTNER_KEY));
}

// ============================================================================
// Upstream responses
// ============================================================================

#[tokio::test]
async fn test_upstream_error_is_relayed_verbatim() {
    let server = MockServer::start().await;
    let payload = json!({
        "error": "error_param",
        "message": "item_id is invalid",
        "request_id": "req-1"
    });
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(403).set_body_json(payload.clone()))
        .mount(&server)
        .await;

    let client = create_client(&server.uri(), Duration::from_secs(5));
    let response = client
        .send(ApiRequest::post("/api/v2/product/update_price", json!({"item_id": 1})))
        .await;

    assert_eq!(response, payload);
}

// ============================================================================
// Transport failures
// ============================================================================

#[tokio::test]
async fn test_non_json_body_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
        .mount(&server)
        .await;

    let client = create_client(&server.uri(), Duration::from_secs(5));

    let result = client.try_send(ApiRequest::get("/api/v2/x")).await;
    assert!(matches!(result, Err(HttpError::Decode { status: 502, .. })));

    let value = client.send(ApiRequest::get("/api/v2/x")).await;
    assert_eq!(value["kind"], "decode");
    assert!(value["error"].is_string());
}

#[tokio::test]
async fn test_connection_refused_is_a_network_error_value() {
    let client = create_client("http://127.0.0.1:1", Duration::from_secs(5));

    let value = client.send(ApiRequest::get("/api/v2/x")).await;

    assert_eq!(value["kind"], "network");
    assert!(value["error"].as_str().unwrap().starts_with("Network error"));
}

#[tokio::test]
async fn test_slow_upstream_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({}))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let client = create_client(&server.uri(), Duration::from_millis(200));

    let result = client.try_send(ApiRequest::get("/api/v2/x")).await;
    assert!(matches!(result, Err(ref e) if e.is_timeout()));

    let value = client.send(ApiRequest::get("/api/v2/x")).await;
    assert_eq!(value["kind"], "timeout");
}
