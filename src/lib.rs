// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! # tokenlog
//!
//! Backend for a token trade log: lists the ERC-20 `Transfer` events of a
//! token contract between two points in time, each stamped with its block's
//! timestamp.
//!
//! - [`TransferAggregator`] resolves the time window to blocks through a
//!   [`BlockExplorer`], queries a [`Ledger`] for logs and joins block
//!   timestamps with bounded concurrency
//! - [`EtherscanClient`] and [`RpcLedger`] are the production upstreams
//! - [`api`] serves everything over HTTP
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use tokenlog::{
//!     provider::{create_http_provider, ProviderConfig},
//!     EtherscanClient, EtherscanConfig, RpcLedger, TokenlogConfig, TransferAggregator,
//!     TransferQuery,
//! };
//!
//! let provider = create_http_provider(ProviderConfig::new(rpc_url))?;
//! let aggregator = TransferAggregator::new(
//!     Arc::new(RpcLedger::new(provider)),
//!     Arc::new(EtherscanClient::new(EtherscanConfig::new(api_key))?),
//!     TokenlogConfig::default(),
//! );
//!
//! let report = aggregator
//!     .aggregate(&TransferQuery::new(usdc, 1_700_000_000, 1_700_086_400))
//!     .await?;
//! for event in &report.events {
//!     println!("{} {} -> {} {}", event.block_number, event.from, event.to, event.value);
//! }
//! ```

pub mod api;
pub mod bootstrap;
pub mod config;
pub mod errors;
pub mod events;
pub mod explorer;
pub mod ledger;
pub mod provider;
mod spans;
pub mod transfers;
pub mod transport;
pub mod types;

pub use api::{router, ApiError, AppState};
pub use config::{AppSettings, TokenlogConfig, TokenlogConfigBuilder};
pub use errors::{ConfigError, ErrorKind, ExplorerError, RpcError, TransferError};
pub use events::{
    decode_transfer_log, fetch_logs_chunked, DecodedTransfer, IERC20Metadata, Transfer,
    TransferFilterBuilder,
};
pub use explorer::{BlockExplorer, Closest, EtherscanClient, EtherscanConfig};
pub use ledger::{Ledger, RpcLedger, TokenProfile};
pub use transfers::{BlockRange, TransferAggregator, TransferEvent, TransferQuery, TransferReport};
pub use types::{
    ChunkIterator, FetchConcurrency, MaxBlockRange, TokenAmount, TokenDecimals, UnixTimestamp,
};
