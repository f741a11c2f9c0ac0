// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Read access to the EVM ledger
//!
//! [`Ledger`] is the seam between transfer aggregation and the RPC node.
//! [`RpcLedger`] implements it over an alloy provider; tests implement it over
//! fixtures.

mod rpc;

pub use rpc::RpcLedger;

use alloy_primitives::{Address, BlockNumber};
use alloy_rpc_types::{Filter, Log};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::RpcError;
use crate::types::TokenDecimals;

/// Ledger queries needed to build transfer reports and token profiles.
///
/// Implementations must be thread-safe; one instance is shared by every
/// request.
#[async_trait]
pub trait Ledger: Send + Sync {
    /// Logs matching `filter`, in the ledger's natural order (ascending block,
    /// then log index).
    async fn logs(&self, filter: &Filter) -> Result<Vec<Log>, RpcError>;

    /// Timestamp of a block in Unix seconds.
    async fn block_timestamp(&self, block_number: BlockNumber) -> Result<u64, RpcError>;

    /// `decimals()` of an ERC-20 token.
    async fn token_decimals(&self, token: Address) -> Result<TokenDecimals, RpcError>;

    /// Optional ERC-20 metadata of `token`.
    ///
    /// Getters that revert or return garbage are reported as `None`; only
    /// transient failures are returned as errors.
    async fn token_profile(&self, token: Address) -> Result<TokenProfile, RpcError>;
}

/// Token metadata as exposed by the optional ERC-20 getters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenProfile {
    pub address: Address,
    pub name: Option<String>,
    pub symbol: Option<String>,
    pub decimals: Option<u8>,
    /// Raw total supply as a decimal string.
    pub total_supply: Option<String>,
}

impl TokenProfile {
    /// A profile with no metadata.
    pub fn empty(address: Address) -> Self {
        Self {
            address,
            name: None,
            symbol: None,
            decimals: None,
            total_supply: None,
        }
    }

    /// True when none of the getters answered, which usually means the
    /// address is not a token contract.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.symbol.is_none()
            && self.decimals.is_none()
            && self.total_supply.is_none()
    }
}
