// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Etherscan-compatible explorer client
//!
//! Every response is wrapped in an envelope:
//!
//! ```json
//! { "status": "1", "message": "OK", "result": "12712551" }
//! ```
//!
//! `status == "0"` carries the failure reason in `result` (or `message`).

use std::time::Duration;

use alloy_primitives::{Address, BlockNumber};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::{BlockExplorer, Closest};
use crate::errors::ExplorerError;
use crate::transport::{RateLimiter, RetryPolicy};
use crate::types::UnixTimestamp;

/// Connection settings for [`EtherscanClient`].
///
/// ```
/// use std::time::Duration;
/// use tokenlog::EtherscanConfig;
///
/// let config = EtherscanConfig::new("KEY")
///     .with_chain_id(8453)
///     .with_timeout(Duration::from_secs(5));
///
/// assert_eq!(config.chain_id, 8453);
/// assert_eq!(config.rate_limit_per_second, 5);
/// ```
#[derive(Debug, Clone)]
pub struct EtherscanConfig {
    pub api_url: String,
    pub api_key: String,
    pub chain_id: u64,
    /// Requests per second. The free tier allows 5.
    pub rate_limit_per_second: u32,
    pub timeout: Duration,
    pub retry: RetryPolicy,
}

impl EtherscanConfig {
    /// Unified multichain endpoint.
    pub const DEFAULT_API_URL: &'static str = "https://api.etherscan.io/v2/api";

    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_url: Self::DEFAULT_API_URL.to_string(),
            api_key: api_key.into(),
            chain_id: 1,
            rate_limit_per_second: 5,
            timeout: Duration::from_secs(10),
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    pub fn with_chain_id(mut self, chain_id: u64) -> Self {
        self.chain_id = chain_id;
        self
    }

    pub fn with_rate_limit(mut self, requests_per_second: u32) -> Self {
        self.rate_limit_per_second = requests_per_second;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Debug, Deserialize)]
struct Envelope {
    status: String,
    #[serde(default)]
    message: String,
    #[serde(default)]
    result: Value,
}

impl Envelope {
    /// The `result` of a successful envelope, or the classified failure.
    fn into_result(self, operation: &str) -> Result<Value, ExplorerError> {
        if self.status == "1" {
            return Ok(self.result);
        }

        let reason = match self.result {
            Value::String(s) if !s.is_empty() => s,
            _ => self.message,
        };

        if reason.to_ascii_lowercase().contains("rate limit") {
            Err(ExplorerError::RateLimited { message: reason })
        } else {
            Err(ExplorerError::Api {
                operation: operation.to_string(),
                message: reason,
            })
        }
    }
}

/// Parses a `getblocknobytime` result, which is a decimal string.
fn parse_block_number(result: &Value) -> Result<BlockNumber, ExplorerError> {
    let parsed = match result {
        Value::String(s) => s.trim().parse().ok(),
        Value::Number(n) => n.as_u64(),
        _ => None,
    };
    parsed.ok_or_else(|| {
        ExplorerError::invalid_response("getblocknobytime", format!("not a block number: {result}"))
    })
}

/// Parses a `getabi` result, which is the ABI JSON encoded as a string.
fn parse_abi(result: &Value) -> Result<Value, ExplorerError> {
    let raw = result
        .as_str()
        .ok_or_else(|| ExplorerError::invalid_response("getabi", "result is not a string"))?;
    let abi: Value = serde_json::from_str(raw)
        .map_err(|e| ExplorerError::invalid_response("getabi", e.to_string()))?;
    if !abi.is_array() {
        return Err(ExplorerError::invalid_response("getabi", "ABI is not a JSON array"));
    }
    Ok(abi)
}

/// HTTP client for an Etherscan-compatible API.
///
/// Requests share one token bucket, so concurrent lookups from different HTTP
/// requests stay under the explorer's rate limit together.
#[derive(Debug, Clone)]
pub struct EtherscanClient {
    http: Client,
    config: EtherscanConfig,
    limiter: RateLimiter,
}

impl EtherscanClient {
    pub fn new(config: EtherscanConfig) -> Result<Self, ExplorerError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ExplorerError::http("client setup", e))?;
        let limiter = RateLimiter::per_second(config.rate_limit_per_second);

        Ok(Self {
            http,
            config,
            limiter,
        })
    }

    pub fn config(&self) -> &EtherscanConfig {
        &self.config
    }

    /// One GET with the envelope unwrapped.
    async fn request(
        &self,
        operation: &str,
        params: &[(&str, String)],
    ) -> Result<Value, ExplorerError> {
        self.limiter.acquire().await;

        let response = self
            .http
            .get(&self.config.api_url)
            .query(&[
                ("chainid", self.config.chain_id.to_string()),
                ("apikey", self.config.api_key.clone()),
            ])
            .query(params)
            .send()
            .await
            .map_err(|e| ExplorerError::http(operation, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ExplorerError::Status {
                operation: operation.to_string(),
                status: status.as_u16(),
            });
        }

        let envelope: Envelope = response
            .json()
            .await
            .map_err(|e| ExplorerError::invalid_response(operation, e.to_string()))?;

        envelope.into_result(operation)
    }

    /// [`request`](Self::request) retried with exponential backoff while the
    /// failure is transient.
    async fn request_with_retry(
        &self,
        operation: &str,
        params: &[(&str, String)],
    ) -> Result<Value, ExplorerError> {
        let policy = &self.config.retry;
        let mut attempt = 0;

        loop {
            match self.request(operation, params).await {
                Ok(result) => return Ok(result),
                Err(e) if e.is_retryable() && attempt < policy.max_retries => {
                    let delay = policy.backoff(attempt);
                    warn!(
                        operation,
                        attempt = attempt + 1,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "Explorer request failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[async_trait]
impl BlockExplorer for EtherscanClient {
    async fn block_number_by_timestamp(
        &self,
        timestamp: UnixTimestamp,
        closest: Closest,
    ) -> Result<BlockNumber, ExplorerError> {
        let params = [
            ("module", "block".to_string()),
            ("action", "getblocknobytime".to_string()),
            ("timestamp", timestamp.to_string()),
            ("closest", closest.to_string()),
        ];

        let result = self
            .request_with_retry("getblocknobytime", &params)
            .await
            .map_err(|e| match e {
                ExplorerError::Api { message, .. }
                    if message.to_ascii_lowercase().contains("no closest block") =>
                {
                    ExplorerError::NoBlockFound {
                        timestamp: timestamp.as_u64(),
                        closest: closest.to_string(),
                    }
                }
                other => other,
            })?;

        let block_number = parse_block_number(&result)?;
        debug!(%timestamp, %closest, block_number, "Resolved block by timestamp");
        Ok(block_number)
    }

    async fn contract_abi(&self, address: Address) -> Result<Value, ExplorerError> {
        let params = [
            ("module", "contract".to_string()),
            ("action", "getabi".to_string()),
            ("address", address.to_string()),
        ];

        let result = self
            .request_with_retry("getabi", &params)
            .await
            .map_err(|e| match e {
                ExplorerError::Api { message, .. }
                    if message.to_ascii_lowercase().contains("not verified") =>
                {
                    ExplorerError::AbiNotAvailable {
                        address: address.to_string(),
                    }
                }
                other => other,
            })?;

        parse_abi(&result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn envelope(value: Value) -> Envelope {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_success_envelope() {
        let result = envelope(json!({"status": "1", "message": "OK", "result": "12712551"}))
            .into_result("getblocknobytime")
            .unwrap();
        assert_eq!(parse_block_number(&result).unwrap(), 12_712_551);
    }

    #[test]
    fn test_rate_limit_envelope_is_retryable() {
        let error = envelope(json!({
            "status": "0",
            "message": "NOTOK",
            "result": "Max rate limit reached, please use API Key for higher rate limit"
        }))
        .into_result("getblocknobytime")
        .unwrap_err();

        assert!(matches!(error, ExplorerError::RateLimited { .. }));
        assert!(error.is_retryable());
    }

    #[test]
    fn test_invalid_key_envelope_is_permanent() {
        let error = envelope(json!({
            "status": "0",
            "message": "NOTOK",
            "result": "Invalid API Key"
        }))
        .into_result("getblocknobytime")
        .unwrap_err();

        match &error {
            ExplorerError::Api { message, .. } => assert_eq!(message, "Invalid API Key"),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(!error.is_retryable());
    }

    #[test]
    fn test_failure_without_result_uses_message() {
        let error = envelope(json!({"status": "0", "message": "No transactions found"}))
            .into_result("getabi")
            .unwrap_err();
        assert!(error.to_string().contains("No transactions found"));
    }

    #[test]
    fn test_block_number_must_be_numeric() {
        assert!(parse_block_number(&json!("Error! No closest block found")).is_err());
        assert_eq!(parse_block_number(&json!(42)).unwrap(), 42);
    }

    #[test]
    fn test_abi_is_decoded_from_string() {
        let abi = parse_abi(&json!(r#"[{"type":"function","name":"decimals"}]"#)).unwrap();
        assert_eq!(abi[0]["name"], "decimals");
    }

    #[test]
    fn test_abi_rejects_non_array() {
        assert!(parse_abi(&json!(r#"{"type":"function"}"#)).is_err());
        assert!(parse_abi(&json!(3)).is_err());
    }

    #[test]
    fn test_closest_renders_query_value() {
        assert_eq!(Closest::Before.to_string(), "before");
        assert_eq!(Closest::After.as_str(), "after");
    }
}
