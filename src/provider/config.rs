// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Provider configuration options

use std::time::Duration;

use crate::transport::RetryPolicy;

/// Configuration for creating providers
///
/// # Example
///
/// ```rust
/// use tokenlog::provider::ProviderConfig;
///
/// let config = ProviderConfig::new("https://eth.llamarpc.com").with_rate_limit_opt(Some(10));
///
/// assert_eq!(config.rate_limit_per_second, Some(10));
/// ```
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// RPC endpoint URL
    pub url: String,
    /// Rate limit in requests per second (None for unlimited)
    pub rate_limit_per_second: Option<u32>,
    /// Backoff for transient transport failures
    pub retry: RetryPolicy,
    /// Calls slower than this are logged at WARN
    pub slow_call_threshold: Duration,
}

impl ProviderConfig {
    /// Create a new provider configuration with the specified URL
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            rate_limit_per_second: None,
            retry: RetryPolicy::default(),
            slow_call_threshold: Duration::from_secs(2),
        }
    }

    /// Set rate limiting (requests per second), `None` for unlimited
    ///
    /// When set, the provider throttles requests to stay within the limit.
    /// Useful for public RPC endpoints.
    #[must_use]
    pub fn with_rate_limit_opt(mut self, requests_per_second: Option<u32>) -> Self {
        self.rate_limit_per_second = requests_per_second;
        self
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self::new("http://localhost:8545")
    }
}
