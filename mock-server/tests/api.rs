use std::collections::HashMap;

use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, MockState};
use serde_json::{json, Value};
use tower::ServiceExt;

const TOKEN: &str = "test-token";

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn authed(uri: &str) -> Request<String> {
    Request::builder()
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Token {TOKEN}"))
        .body(String::new())
        .unwrap()
}

fn state() -> MockState {
    MockState::builder(TOKEN)
        .analyzer("zeta", json!({"name": "zeta", "type": "file"}), true)
        .analyzer("alpha", json!({"name": "alpha", "type": "observable"}), false)
        .connector("MISP", json!({"name": "MISP", "maximum_tlp": "AMBER"}), true)
        .build()
}

// --- auth ---

#[tokio::test]
async fn missing_token_returns_401() {
    let resp = app(state())
        .oneshot(
            Request::builder()
                .uri("/api/get_analyzer_configs")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = body_json(resp).await;
    assert_eq!(body["detail"], "Invalid token.");
}

#[tokio::test]
async fn wrong_token_returns_401() {
    let resp = app(state())
        .oneshot(
            Request::builder()
                .uri("/api/get_analyzer_configs")
                .header(header::AUTHORIZATION, "Token nope")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

// --- configs ---

#[tokio::test]
async fn analyzer_configs_are_keyed_by_name() {
    let resp = app(state())
        .oneshot(authed("/api/get_analyzer_configs"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let configs: HashMap<String, Value> = body_json(resp).await;
    assert_eq!(configs.len(), 2);
    assert_eq!(configs["zeta"]["type"], "file");
    assert_eq!(configs["alpha"]["type"], "observable");
}

#[tokio::test]
async fn connector_configs_are_keyed_by_name() {
    let resp = app(state())
        .oneshot(authed("/api/get_connector_configs"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let configs: HashMap<String, Value> = body_json(resp).await;
    assert_eq!(configs.len(), 1);
    assert_eq!(configs["MISP"]["maximum_tlp"], "AMBER");
}

#[tokio::test]
async fn empty_registry_returns_empty_object() {
    let resp = app(MockState::builder(TOKEN).build())
        .oneshot(authed("/api/get_analyzer_configs"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(&body_bytes(resp).await[..], b"{}");
}

// --- healthcheck ---

#[tokio::test]
async fn healthcheck_reports_status() {
    let resp = app(state())
        .oneshot(authed("/api/analyzer/zeta/healthcheck"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = body_json(resp).await;
    assert_eq!(body, json!({"status": true}));

    let resp = app(state())
        .oneshot(authed("/api/analyzer/alpha/healthcheck"))
        .await
        .unwrap();
    let body: Value = body_json(resp).await;
    assert_eq!(body, json!({"status": false}));
}

#[tokio::test]
async fn healthcheck_unknown_name_returns_404() {
    let resp = app(state())
        .oneshot(authed("/api/analyzer/missing/healthcheck"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = body_json(resp).await;
    assert_eq!(body, json!({"error": "not found"}));
}

#[tokio::test]
async fn healthcheck_does_not_mix_kinds() {
    let resp = app(state())
        .oneshot(authed("/api/connector/zeta/healthcheck"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = app(state())
        .oneshot(authed("/api/connector/MISP/healthcheck"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn healthcheck_unknown_kind_returns_404() {
    let resp = app(state())
        .oneshot(authed("/api/pivot/zeta/healthcheck"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = body_json(resp).await;
    assert_eq!(body["error"], "unknown plugin kind");
}

#[tokio::test]
async fn seeded_state_serves_realistic_configs() {
    let resp = app(MockState::seeded(TOKEN))
        .oneshot(authed("/api/get_analyzer_configs"))
        .await
        .unwrap();

    let configs: HashMap<String, Value> = body_json(resp).await;
    assert_eq!(configs["Classic_DNS"]["observable_supported"], json!(["domain", "url"]));
    assert_eq!(configs["Shodan_Honeyscore"]["verification"]["configured"], false);
}
