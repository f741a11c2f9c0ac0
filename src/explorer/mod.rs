// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Block explorer access
//!
//! The explorer resolves timestamps to block numbers and serves verified
//! contract ABIs. [`EtherscanClient`] talks to any Etherscan-compatible API.

mod etherscan;

pub use etherscan::{EtherscanClient, EtherscanConfig};

use alloy_primitives::{Address, BlockNumber};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::ExplorerError;
use crate::types::UnixTimestamp;

/// Which side of a timestamp a block lookup resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Closest {
    /// Latest block mined at or before the timestamp.
    Before,
    /// Earliest block mined at or after the timestamp.
    After,
}

impl Closest {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Closest::Before => "before",
            Closest::After => "after",
        }
    }
}

impl std::fmt::Display for Closest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[async_trait]
pub trait BlockExplorer: Send + Sync {
    /// Block number nearest to `timestamp` on the `closest` side.
    async fn block_number_by_timestamp(
        &self,
        timestamp: UnixTimestamp,
        closest: Closest,
    ) -> Result<BlockNumber, ExplorerError>;

    /// Verified ABI of the contract at `address`, as a JSON array.
    async fn contract_abi(&self, address: Address) -> Result<serde_json::Value, ExplorerError>;
}
