// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Provider factory

use alloy_provider::ProviderBuilder;
use alloy_rpc_client::ClientBuilder;
use tracing::warn;

use crate::errors::RpcError;
use crate::transport::{LoggingLayer, RateLimitLayer, RetryLayer};

use super::config::ProviderConfig;
use super::HttpProvider;

/// Create an HTTP provider with the given configuration
///
/// Transport layers, outermost first:
/// - retry with exponential backoff on transient failures
/// - rate limiting, so every retry also waits for a token
/// - call logging with slow-call warnings
///
/// Recommended fillers are disabled; the provider only reads.
///
/// # Examples
///
/// ```rust
/// use tokenlog::provider::{create_http_provider, ProviderConfig};
///
/// let provider = create_http_provider(
///     ProviderConfig::new("http://localhost:8545").with_rate_limit_opt(Some(10)),
/// );
/// assert!(provider.is_ok());
/// ```
///
/// # Errors
///
/// Returns [`RpcError::ProviderUrlInvalid`] if the URL cannot be parsed.
pub fn create_http_provider(config: ProviderConfig) -> Result<HttpProvider, RpcError> {
    let url: url::Url = config.url.parse().map_err(|e| {
        warn!(url = %config.url, error = ?e, "Invalid provider URL");
        RpcError::ProviderUrlInvalid(format!("{e}"))
    })?;

    let logging = LoggingLayer::new().with_slow_call_threshold(config.slow_call_threshold);
    let retry = RetryLayer::new(config.retry.clone());

    let client = match config.rate_limit_per_second {
        Some(rps) => ClientBuilder::default()
            .layer(retry)
            .layer(RateLimitLayer::per_second(rps))
            .layer(logging)
            .http(url),
        None => ClientBuilder::default().layer(retry).layer(logging).http(url),
    };

    Ok(ProviderBuilder::new()
        .disable_recommended_fillers()
        .connect_client(client))
}
