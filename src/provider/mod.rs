// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! RPC provider construction
//!
//! - [`create_http_provider`] builds a read-only HTTP provider with retry,
//!   rate limiting and call logging transport layers
//! - [`ProviderPool`] holds the providers built at startup, one per chain
//!
//! ```rust,ignore
//! use tokenlog::provider::{create_http_provider, ProviderConfig};
//!
//! let provider = create_http_provider(
//!     ProviderConfig::new("https://eth.llamarpc.com").with_rate_limit_opt(Some(10)),
//! )?;
//! let block_number = provider.get_block_number().await?;
//! ```

mod config;
mod factory;
mod pool;

pub use config::ProviderConfig;
pub use factory::create_http_provider;
pub use pool::{ProviderPool, ProviderPoolBuilder};

/// Provider type produced by [`create_http_provider`].
///
/// Transport layers are erased into the RPC client, so every configuration
/// yields the same type.
pub type HttpProvider = alloy_provider::RootProvider;
