// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Provider pool built once at startup
//!
//! The [`ProviderPool`] holds one provider per chain so every request reuses
//! the same connection pool and the same rate-limit bucket. It is built in
//! bootstrap, shared by reference, and drained by the shutdown hook.
//!
//! ```rust
//! use alloy_chains::Chain;
//! use tokenlog::provider::{ProviderConfig, ProviderPoolBuilder};
//!
//! let pool = ProviderPoolBuilder::new()
//!     .add_chain(Chain::mainnet(), ProviderConfig::new("http://localhost:8545"))
//!     .build()
//!     .unwrap();
//!
//! assert!(pool.get(Chain::mainnet()).is_some());
//! pool.shutdown();
//! assert!(pool.is_empty());
//! ```

use std::collections::HashMap;
use std::sync::RwLock;

use alloy_chains::Chain;
use tracing::{debug, info};

use crate::errors::RpcError;

use super::config::ProviderConfig;
use super::factory::create_http_provider;
use super::HttpProvider;

/// A thread-safe pool of providers indexed by chain
///
/// Providers are cheap to clone; [`get`](Self::get) hands out clones that
/// share the underlying client.
#[derive(Debug, Default)]
pub struct ProviderPool {
    providers: RwLock<HashMap<Chain, HttpProvider>>,
}

impl ProviderPool {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a provider for a specific chain, replacing any existing one
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the pool lock is poisoned
    pub fn add(&self, chain: Chain, config: ProviderConfig) -> Result<(), RpcError> {
        let rate_limit = config.rate_limit_per_second;
        let provider = create_http_provider(config)?;

        let mut providers = self
            .providers
            .write()
            .map_err(|_| RpcError::PoolUnavailable)?;

        if providers.insert(chain, provider).is_some() {
            debug!(%chain, "Replaced existing provider");
        } else {
            info!(%chain, rate_limit, "Added provider to pool");
        }
        Ok(())
    }

    /// Provider for `chain`, or `None` if not configured
    #[must_use]
    pub fn get(&self, chain: Chain) -> Option<HttpProvider> {
        self.providers
            .read()
            .ok()
            .and_then(|providers| providers.get(&chain).cloned())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.providers
            .read()
            .map(|providers| providers.len())
            .unwrap_or(0)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every pooled provider. Clones already handed out keep working
    /// until they are dropped too.
    pub fn shutdown(&self) {
        if let Ok(mut providers) = self.providers.write() {
            let count = providers.len();
            providers.clear();
            info!(count, "Provider pool shut down");
        }
    }
}

/// Builder for [`ProviderPool`]
#[derive(Debug, Default)]
pub struct ProviderPoolBuilder {
    endpoints: Vec<(Chain, ProviderConfig)>,
}

impl ProviderPoolBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn add_chain(mut self, chain: Chain, config: ProviderConfig) -> Self {
        self.endpoints.push((chain, config));
        self
    }

    /// # Errors
    ///
    /// Returns an error if any endpoint URL is invalid
    pub fn build(self) -> Result<ProviderPool, RpcError> {
        let pool = ProviderPool::new();
        for (chain, config) in self.endpoints {
            pool.add(chain, config)?;
        }
        Ok(pool)
    }
}
