// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Decoding raw logs into Transfer records

use alloy_primitives::{Address, BlockNumber, TxHash, U256};
use alloy_rpc_types::Log;
use alloy_sol_types::SolEvent;
use tracing::{debug, warn};

use super::definitions::Transfer;
use crate::errors::TransferError;

/// A Transfer log with the position fields every mined log carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedTransfer {
    pub block_number: BlockNumber,
    pub log_index: u64,
    pub transaction_hash: TxHash,
    pub from: Address,
    pub to: Address,
    pub value: U256,
    /// Block timestamp when the node embeds it in the log.
    pub block_timestamp: Option<u64>,
}

/// Decodes one log returned by a Transfer filter.
///
/// Returns `Ok(None)` for logs that should not become records: logs flagged
/// `removed` by a reorg, and logs sharing the Transfer signature that do not
/// decode as ERC-20 (ERC-721 indexes the token id, leaving no data word).
///
/// # Errors
///
/// [`TransferError::MalformedLog`] when the block number, log index or
/// transaction hash is missing.
pub fn decode_transfer_log(log: &Log) -> Result<Option<DecodedTransfer>, TransferError> {
    if log.removed {
        debug!(block_number = ?log.block_number, log_index = ?log.log_index, "Skipping removed log");
        return Ok(None);
    }

    let block_number = log
        .block_number
        .ok_or_else(|| TransferError::malformed_log("log without block number"))?;
    let log_index = log.log_index.ok_or_else(|| {
        TransferError::malformed_log(format!("log in block {block_number} without log index"))
    })?;
    let transaction_hash = log.transaction_hash.ok_or_else(|| {
        TransferError::malformed_log(format!(
            "log {block_number}/{log_index} without transaction hash"
        ))
    })?;

    let event = match Transfer::decode_log(&log.inner) {
        Ok(decoded) => decoded.data,
        Err(e) => {
            warn!(
                block_number,
                log_index,
                contract = %log.inner.address,
                error = %e,
                "Skipping log that does not decode as an ERC-20 Transfer"
            );
            return Ok(None);
        }
    };

    Ok(Some(DecodedTransfer {
        block_number,
        log_index,
        transaction_hash,
        from: event.from,
        to: event.to,
        value: event.value,
        block_timestamp: log.block_timestamp,
    }))
}
