// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Transfer aggregation error types.

use std::time::Duration;

use alloy_primitives::BlockNumber;

use super::{ErrorKind, ExplorerError, RpcError};
use crate::types::UnixTimestamp;

/// Errors from [`TransferAggregator`](crate::TransferAggregator).
///
/// Aggregation is all-or-nothing: any of these aborts the whole request and
/// no partial list of transfers is ever returned.
///
/// ```rust,ignore
/// use tokenlog::{TransferAggregator, TransferError};
///
/// match aggregator.aggregate(&query).await {
///     Ok(report) => println!("{} transfers", report.events.len()),
///     Err(TransferError::InvalidWindow { .. }) => eprintln!("start is after end"),
///     Err(TransferError::Explorer(e)) => eprintln!("block lookup failed: {e}"),
///     Err(e) => eprintln!("other error: {e}"),
/// }
/// ```
#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    /// The requested time window is inverted.
    #[error("Invalid time window: start {start} is after end {end}")]
    InvalidWindow {
        start: UnixTimestamp,
        end: UnixTimestamp,
    },

    /// The explorer resolved the window to an inverted block range.
    #[error("Explorer resolved an inverted block range {start_block}-{end_block}")]
    InvertedBlockRange {
        start_block: BlockNumber,
        end_block: BlockNumber,
    },

    /// A log came back without the position fields a mined log always has.
    #[error("Malformed log from ledger: {details}")]
    MalformedLog { details: String },

    /// The request deadline elapsed.
    #[error("Transfer aggregation exceeded its {}ms deadline", .after.as_millis())]
    DeadlineExceeded { after: Duration },

    /// Block number lookup failed.
    #[error("Block explorer error: {0}")]
    Explorer(#[from] ExplorerError),

    /// Log query or block timestamp fetch failed.
    #[error("Ledger error: {0}")]
    Rpc(#[from] RpcError),
}

impl TransferError {
    /// `MalformedLog` with details.
    pub fn malformed_log(details: impl Into<String>) -> Self {
        TransferError::MalformedLog {
            details: details.into(),
        }
    }

    /// Caller-facing classification.
    pub fn kind(&self) -> ErrorKind {
        match self {
            TransferError::InvalidWindow { .. } => ErrorKind::Validation,
            TransferError::InvertedBlockRange { .. } | TransferError::MalformedLog { .. } => {
                ErrorKind::UpstreamError
            }
            TransferError::DeadlineExceeded { .. } => ErrorKind::DeadlineExceeded,
            TransferError::Explorer(e) => e.kind(),
            TransferError::Rpc(e) => e.kind(),
        }
    }
}
