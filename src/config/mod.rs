// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Configuration for tokenlog
//!
//! [`TokenlogConfig`] controls how transfer aggregation talks to the ledger.
//! [`AppSettings`] is the full service configuration read from the
//! environment at startup.
//!
//! # Example: Using defaults
//!
//! ```rust
//! use tokenlog::TokenlogConfig;
//!
//! let config = TokenlogConfig::default();
//! assert_eq!(config.max_block_range.as_u64(), 10_000);
//! ```
//!
//! # Example: Custom configuration
//!
//! ```rust
//! use std::time::Duration;
//! use tokenlog::TokenlogConfigBuilder;
//!
//! let config = TokenlogConfigBuilder::new()
//!     .max_block_range(2_000)
//!     .max_concurrent_block_fetches(4)
//!     .request_timeout(Duration::from_secs(10))
//!     .build();
//!
//! assert_eq!(config.max_concurrent_block_fetches.get(), 4);
//! ```

use std::time::Duration;

use crate::types::{FetchConcurrency, MaxBlockRange};

mod settings;

pub use settings::AppSettings;

/// Transfer aggregation limits.
///
/// Use [`TokenlogConfigBuilder`] for a fluent API to construct instances.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenlogConfig {
    /// Maximum blocks per `eth_getLogs` call.
    /// Default: 10 000
    pub max_block_range: MaxBlockRange,

    /// Maximum block timestamp fetches in flight per request.
    /// Default: 16
    pub max_concurrent_block_fetches: FetchConcurrency,

    /// Deadline for a whole request, covering every upstream call it makes.
    /// Default: 30 seconds
    pub request_timeout: Duration,
}

impl TokenlogConfig {
    pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
}

impl Default for TokenlogConfig {
    fn default() -> Self {
        Self {
            max_block_range: MaxBlockRange::DEFAULT,
            max_concurrent_block_fetches: FetchConcurrency::DEFAULT,
            request_timeout: Self::DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

/// Builder for [`TokenlogConfig`]
pub struct TokenlogConfigBuilder {
    config: TokenlogConfig,
}

impl Default for TokenlogConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenlogConfigBuilder {
    /// Create a new builder starting from the defaults
    pub fn new() -> Self {
        Self {
            config: TokenlogConfig::default(),
        }
    }

    /// Set max block range per log query
    ///
    /// # Example
    ///
    /// ```rust
    /// use tokenlog::TokenlogConfigBuilder;
    ///
    /// let config = TokenlogConfigBuilder::new()
    ///     .max_block_range(500)  // For providers with strict log limits
    ///     .build();
    /// ```
    pub fn max_block_range(mut self, max: u64) -> Self {
        self.config.max_block_range = MaxBlockRange::new(max);
        self
    }

    /// Set the bound on concurrent block timestamp fetches
    pub fn max_concurrent_block_fetches(mut self, limit: usize) -> Self {
        self.config.max_concurrent_block_fetches = FetchConcurrency::new(limit);
        self
    }

    /// Set the per-request deadline
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.config.request_timeout = timeout;
        self
    }

    pub fn build(self) -> TokenlogConfig {
        self.config
    }
}
