// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! HTTP API
//!
//! | Route | Body | Response |
//! |---|---|---|
//! | `POST /transfers` | [`TransferQuery`] | `TransferEvent[]` |
//! | `POST /api/token/transfers` | [`TransferQuery`] | `TransferEvent[]` |
//! | `POST /api/token/abi` | `{ "address" }` | ABI JSON array |
//! | `GET /api/token/{address}` | | [`TokenProfile`] |
//! | `GET /health` | | `{ "status": "ok" }` |
//!
//! Failures answer with `{ "error": { "code", "message", "retryable" } }`.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use alloy_primitives::Address;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::net::TcpListener;
use tracing::{debug, warn, Instrument};

use crate::config::TokenlogConfig;
use crate::errors::{ErrorKind, ExplorerError, RpcError, TransferError};
use crate::explorer::BlockExplorer;
use crate::ledger::{Ledger, TokenProfile};
use crate::spans;
use crate::transfers::{TransferAggregator, TransferEvent, TransferQuery};

/// Shared handler state. Built once at startup.
#[derive(Clone)]
pub struct AppState {
    aggregator: TransferAggregator,
    ledger: Arc<dyn Ledger>,
    explorer: Arc<dyn BlockExplorer>,
    request_timeout: Duration,
}

impl AppState {
    pub fn new(
        ledger: Arc<dyn Ledger>,
        explorer: Arc<dyn BlockExplorer>,
        config: TokenlogConfig,
    ) -> Self {
        let request_timeout = config.request_timeout;
        Self {
            aggregator: TransferAggregator::new(ledger.clone(), explorer.clone(), config),
            ledger,
            explorer,
            request_timeout,
        }
    }
}

/// Error returned by every handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    kind: ErrorKind,
    message: String,
}

impl ApiError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }

    pub fn status(&self) -> StatusCode {
        status_for(self.kind)
    }
}

fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Validation => StatusCode::BAD_REQUEST,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::UpstreamUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorKind::UpstreamError => StatusCode::BAD_GATEWAY,
        ErrorKind::DeadlineExceeded => StatusCode::GATEWAY_TIMEOUT,
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: ErrorDetail<'a>,
}

#[derive(Debug, Serialize)]
struct ErrorDetail<'a> {
    code: &'static str,
    message: &'a str,
    retryable: bool,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.kind.code(),
                message: &self.message,
                retryable: self.is_retryable(),
            },
        };
        (self.status(), Json(body)).into_response()
    }
}

impl From<TransferError> for ApiError {
    fn from(e: TransferError) -> Self {
        Self::new(e.kind(), e.to_string())
    }
}

impl From<ExplorerError> for ApiError {
    fn from(e: ExplorerError) -> Self {
        Self::new(e.kind(), e.to_string())
    }
}

impl From<RpcError> for ApiError {
    fn from(e: RpcError) -> Self {
        Self::new(e.kind(), e.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::validation(rejection.body_text())
    }
}

/// Runs `call` under the request deadline.
async fn with_deadline<T, E>(
    timeout: Duration,
    call: impl Future<Output = Result<T, E>>,
) -> Result<T, ApiError>
where
    ApiError: From<E>,
{
    match tokio::time::timeout(timeout, call).await {
        Ok(result) => result.map_err(ApiError::from),
        Err(_) => Err(<ApiError as From<TransferError>>::from(
            TransferError::DeadlineExceeded { after: timeout },
        )),
    }
}

fn parse_address(raw: &str) -> Result<Address, ApiError> {
    raw.trim().parse().map_err(|e| {
        warn!(address = raw, error = %e, "Rejected malformed address");
        ApiError::validation(format!("Invalid address {raw:?}: {e}"))
    })
}

/// Unwraps a JSON body, logging the rejection.
fn json_body<T>(route: &str, payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    match payload {
        Ok(Json(body)) => Ok(body),
        Err(rejection) => {
            warn!(
                route,
                status = %rejection.status(),
                error = %rejection.body_text(),
                "Rejected request body"
            );
            Err(ApiError::from(rejection))
        }
    }
}

/// `POST /transfers`
async fn transfers(
    State(state): State<AppState>,
    payload: Result<Json<TransferQuery>, JsonRejection>,
) -> Result<Json<Vec<TransferEvent>>, ApiError> {
    let query = json_body("transfers", payload)?;
    debug!(token = %query.address, start = %query.start, end = %query.end, "Received transfer query");

    let report = state.aggregator.aggregate(&query).await?;
    Ok(Json(report.events))
}

#[derive(Debug, Deserialize)]
struct AbiQuery {
    address: Address,
}

/// `POST /api/token/abi`
async fn token_abi(
    State(state): State<AppState>,
    payload: Result<Json<AbiQuery>, JsonRejection>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let AbiQuery { address } = json_body("token_abi", payload)?;

    let result = with_deadline(state.request_timeout, state.explorer.contract_abi(address))
        .instrument(spans::api_request("token_abi"))
        .await;
    if let Err(e) = &result {
        warn!(%address, code = e.kind().code(), error = %e.message, "ABI lookup failed");
    }
    result.map(Json)
}

/// `GET /api/token/{address}`
async fn token_profile(
    State(state): State<AppState>,
    Path(raw): Path<String>,
) -> Result<Json<TokenProfile>, ApiError> {
    let address = parse_address(&raw)?;

    let result = with_deadline(state.request_timeout, state.ledger.token_profile(address))
        .instrument(spans::api_request("token_profile"))
        .await
        .and_then(|profile| {
            if profile.is_empty() {
                Err(ApiError::new(
                    ErrorKind::NotFound,
                    format!("No ERC-20 token at {address}"),
                ))
            } else {
                Ok(profile)
            }
        });
    if let Err(e) = &result {
        warn!(%address, code = e.kind().code(), error = %e.message, "Token profile lookup failed");
    }
    result.map(Json)
}

/// `GET /health`
async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

/// The API router with all routes attached to `state`.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/transfers", post(transfers))
        .route("/api/token/transfers", post(transfers))
        .route("/api/token/abi", post(token_abi))
        .route("/api/token/{address}", get(token_profile))
        .route("/health", get(health))
        .with_state(state)
}

/// Serves the API until `shutdown` resolves, then drains in-flight requests.
pub async fn serve_api(
    listener: TcpListener,
    state: AppState,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()> {
    let addr = listener.local_addr()?;

    tracing::info!(address = ?addr, "Starting server");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}
