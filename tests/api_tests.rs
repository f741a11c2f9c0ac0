// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! HTTP API tests driving the router in-process

mod helpers;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use helpers::{
    scenario_logs, timestamp_of, CapturedLogs, ExplorerFailure, FixtureExplorer, FixtureLedger,
    TOKEN,
};
use serde_json::{json, Value};
use tokenlog::{router, AppState, TokenProfile, TokenlogConfig};
use tower::ServiceExt;

fn state(ledger: FixtureLedger, explorer: FixtureExplorer) -> AppState {
    AppState::new(
        Arc::new(ledger),
        Arc::new(explorer),
        TokenlogConfig::default(),
    )
}

fn default_state() -> AppState {
    state(FixtureLedger::new(scenario_logs()), FixtureExplorer::new())
}

fn post_json(uri: &str, body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn transfer_body(start_block: u64, end_block: u64) -> String {
    json!({
        "address": TOKEN.to_string(),
        "start": timestamp_of(start_block),
        "end": timestamp_of(end_block),
    })
    .to_string()
}

async fn send(state: AppState, request: Request<Body>) -> (StatusCode, Value) {
    let response = router(state).oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn assert_error(body: &Value, code: &str, retryable: bool) {
    assert_eq!(body["error"]["code"], code, "body: {body}");
    assert_eq!(body["error"]["retryable"], retryable, "body: {body}");
    assert!(body["error"]["message"].as_str().is_some_and(|m| !m.is_empty()));
}

/// A successful query returns the bare array of camelCase records.
#[tokio::test]
async fn test_transfers_ok() {
    let (status, body) = send(default_state(), post_json("/transfers", transfer_body(90, 210))).await;

    assert_eq!(status, StatusCode::OK);
    let events = body.as_array().unwrap();
    assert_eq!(events.len(), 4);

    let first = &events[0];
    assert_eq!(first["blockNumber"], 100);
    assert_eq!(first["logIndex"], 4);
    assert_eq!(first["timestamp"], timestamp_of(100));
    assert_eq!(first["value"], "1000000");
    assert_eq!(first["amount"], "1");
    assert!(first["transactionHash"].as_str().unwrap().starts_with("0x"));
    assert!(first["from"].as_str().unwrap().starts_with("0x"));
    assert!(first["to"].as_str().unwrap().starts_with("0x"));
}

/// The legacy path serves the same handler.
#[tokio::test]
async fn test_transfers_legacy_path() {
    let (status, body) = send(
        default_state(),
        post_json("/api/token/transfers", transfer_body(90, 210)),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 4);
}

/// No transfers is `200 []`, not an error.
#[tokio::test]
async fn test_transfers_empty() {
    let (status, body) = send(default_state(), post_json("/transfers", transfer_body(300, 400))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

/// `start > end` is a client error.
#[tokio::test]
async fn test_transfers_inverted_window() {
    let (status, body) = send(default_state(), post_json("/transfers", transfer_body(210, 90))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error(&body, "validation_error", false);
}

/// Malformed addresses, missing fields, negative timestamps and broken JSON
/// are all rejected as validation errors.
#[tokio::test]
async fn test_transfers_rejects_bad_input() {
    let bodies = [
        json!({ "address": "0x1234", "start": 1, "end": 2 }).to_string(),
        json!({ "address": TOKEN.to_string(), "start": 1 }).to_string(),
        json!({ "address": TOKEN.to_string(), "start": -1, "end": 2 }).to_string(),
        json!({ "address": TOKEN.to_string(), "start": "soon", "end": 2 }).to_string(),
        "{not json".to_string(),
    ];

    for body in bodies {
        let (status, response) = send(default_state(), post_json("/transfers", body.clone())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "request: {body}");
        assert_error(&response, "validation_error", false);
    }
}

/// Rejected input is logged at the boundary, not only returned.
#[tokio::test]
async fn test_rejected_body_is_logged() {
    let logs = CapturedLogs::default();
    let _guard = logs.install();

    let (status, _) = send(default_state(), post_json("/transfers", "{not json")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let output = logs.contents();
    assert!(output.contains("WARN"), "logs: {output}");
    assert!(output.contains("Rejected request body"), "logs: {output}");
    assert!(output.contains("route=\"transfers\""), "logs: {output}");
}

#[tokio::test]
async fn test_rejected_address_is_logged() {
    let logs = CapturedLogs::default();
    let _guard = logs.install();

    let (status, _) = send(default_state(), get("/api/token/0xdeadbeef")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let output = logs.contents();
    assert!(output.contains("Rejected malformed address"), "logs: {output}");
    assert!(output.contains("0xdeadbeef"), "logs: {output}");
}

#[tokio::test]
async fn test_rejected_window_is_logged() {
    let logs = CapturedLogs::default();
    let _guard = logs.install();

    let (status, _) = send(default_state(), post_json("/transfers", transfer_body(210, 90))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(logs.contents().contains("Rejected transfer query"));
}

/// Explorer throttling is a retryable 503.
#[tokio::test]
async fn test_transfers_explorer_throttled() {
    let explorer = FixtureExplorer::new().failing_at(timestamp_of(90), ExplorerFailure::RateLimited);
    let (status, body) = send(
        state(FixtureLedger::new(scenario_logs()), explorer),
        post_json("/transfers", transfer_body(90, 210)),
    )
    .await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_error(&body, "upstream_unavailable", true);
}

/// A permanent explorer rejection is a 502.
#[tokio::test]
async fn test_transfers_explorer_rejected() {
    let explorer = FixtureExplorer::new().failing_at(timestamp_of(210), ExplorerFailure::InvalidKey);
    let (status, body) = send(
        state(FixtureLedger::new(scenario_logs()), explorer),
        post_json("/transfers", transfer_body(90, 210)),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_error(&body, "upstream_error", false);
}

/// A failed block fetch fails the request without partial data.
#[tokio::test]
async fn test_transfers_block_fetch_failure() {
    let ledger = FixtureLedger::new(scenario_logs()).failing_block(200);
    let (status, body) = send(
        state(ledger, FixtureExplorer::new()),
        post_json("/transfers", transfer_body(90, 210)),
    )
    .await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(body.get("error").is_some());
    assert!(body.as_array().is_none());
}

#[tokio::test]
async fn test_health() {
    let (status, body) = send(default_state(), get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));
}

/// Verified contracts return their ABI array.
#[tokio::test]
async fn test_abi_found() {
    let abi = json!([{ "type": "function", "name": "decimals", "inputs": [], "outputs": [] }]);
    let explorer = FixtureExplorer::new().with_abi(abi.clone());
    let (status, body) = send(
        state(FixtureLedger::new(vec![]), explorer),
        post_json("/api/token/abi", json!({ "address": TOKEN.to_string() }).to_string()),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, abi);
}

/// Unverified contracts are a 404.
#[tokio::test]
async fn test_abi_not_verified() {
    let (status, body) = send(
        default_state(),
        post_json("/api/token/abi", json!({ "address": TOKEN.to_string() }).to_string()),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_error(&body, "not_found", false);
}

#[tokio::test]
async fn test_abi_bad_address() {
    let (status, body) = send(
        default_state(),
        post_json("/api/token/abi", json!({ "address": "nope" }).to_string()),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error(&body, "validation_error", false);
}

/// Token metadata is served in camelCase.
#[tokio::test]
async fn test_token_profile() {
    let profile = TokenProfile {
        address: TOKEN,
        name: Some("USD Coin".into()),
        symbol: Some("USDC".into()),
        decimals: Some(6),
        total_supply: Some("1000000".into()),
    };
    let ledger = FixtureLedger::new(vec![]).with_profile(profile);
    let (status, body) = send(
        state(ledger, FixtureExplorer::new()),
        get(&format!("/api/token/{TOKEN}")),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["symbol"], "USDC");
    assert_eq!(body["decimals"], 6);
    assert_eq!(body["totalSupply"], "1000000");
}

/// An address answering none of the getters is not a token.
#[tokio::test]
async fn test_token_profile_not_a_token() {
    let (status, body) = send(default_state(), get(&format!("/api/token/{TOKEN}"))).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_error(&body, "not_found", false);
}

#[tokio::test]
async fn test_token_profile_bad_address() {
    let (status, body) = send(default_state(), get("/api/token/0xdeadbeef")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error(&body, "validation_error", false);
}
