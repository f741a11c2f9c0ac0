// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Transfer query and record types

use alloy_primitives::{Address, BlockNumber, TxHash};
use serde::{Deserialize, Serialize};

use crate::errors::TransferError;
use crate::events::DecodedTransfer;
use crate::types::{TokenAmount, TokenDecimals, UnixTimestamp};

/// Transfers of `address` between two points in time, both inclusive.
///
/// ```
/// use tokenlog::TransferQuery;
///
/// let query: TransferQuery = serde_json::from_str(
///     r#"{"address":"0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48","start":1700000000,"end":1700086400}"#,
/// ).unwrap();
/// assert!(query.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferQuery {
    /// Token contract.
    pub address: Address,
    pub start: UnixTimestamp,
    pub end: UnixTimestamp,
}

impl TransferQuery {
    pub fn new(address: Address, start: impl Into<UnixTimestamp>, end: impl Into<UnixTimestamp>) -> Self {
        Self {
            address,
            start: start.into(),
            end: end.into(),
        }
    }

    /// Rejects inverted windows. `start == end` is a valid single instant.
    pub fn validate(&self) -> Result<(), TransferError> {
        if self.start > self.end {
            return Err(TransferError::InvalidWindow {
                start: self.start,
                end: self.end,
            });
        }
        Ok(())
    }
}

/// Inclusive block range resolved from a [`TransferQuery`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockRange {
    pub start_block: BlockNumber,
    pub end_block: BlockNumber,
}

impl BlockRange {
    pub const fn new(start_block: BlockNumber, end_block: BlockNumber) -> Self {
        Self {
            start_block,
            end_block,
        }
    }

    pub const fn contains(&self, block_number: BlockNumber) -> bool {
        self.start_block <= block_number && block_number <= self.end_block
    }
}

impl std::fmt::Display for BlockRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.start_block, self.end_block)
    }
}

/// One ERC-20 transfer with the timestamp of its block.
///
/// `(block_number, log_index)` identifies the event uniquely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferEvent {
    pub block_number: BlockNumber,
    pub log_index: u64,
    pub transaction_hash: TxHash,
    pub from: Address,
    pub to: Address,
    /// Unix seconds of the block, not of the query.
    pub timestamp: u64,
    /// Raw amount in the token's smallest unit, as a decimal string.
    pub value: String,
    /// `value` scaled by the token's decimals; `None` when they are unknown.
    pub amount: Option<String>,
}

impl TransferEvent {
    pub(crate) fn from_decoded(
        transfer: DecodedTransfer,
        timestamp: u64,
        decimals: Option<TokenDecimals>,
    ) -> Self {
        let raw = TokenAmount::new(transfer.value);
        Self {
            block_number: transfer.block_number,
            log_index: transfer.log_index,
            transaction_hash: transfer.transaction_hash,
            from: transfer.from,
            to: transfer.to,
            timestamp,
            value: raw.to_string(),
            amount: decimals.and_then(|d| raw.format(d)),
        }
    }
}

/// Result of one aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransferReport {
    pub range: BlockRange,
    /// In ledger order: ascending block, then log index.
    pub events: Vec<TransferEvent>,
}
