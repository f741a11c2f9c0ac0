// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Transfer aggregation
//!
//! One aggregation runs:
//! 1. both timestamp lookups and the token's `decimals()` read, concurrently;
//! 2. chunked log fetch over the resolved block range;
//! 3. one timestamp fetch per distinct block lacking an embedded timestamp,
//!    bounded by [`TokenlogConfig::max_concurrent_block_fetches`];
//! 4. assembly of records in ledger order.
//!
//! Any failure aborts the whole aggregation. Futures still in flight are
//! dropped, which cancels them.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use alloy_primitives::{Address, BlockNumber};
use futures::{stream, StreamExt, TryStreamExt};
use tracing::{debug, info, warn, Instrument, Span};

use super::types::{BlockRange, TransferEvent, TransferQuery, TransferReport};
use crate::config::TokenlogConfig;
use crate::errors::TransferError;
use crate::events::{decode_transfer_log, fetch_logs_chunked, DecodedTransfer, TransferFilterBuilder};
use crate::explorer::{BlockExplorer, Closest};
use crate::ledger::Ledger;
use crate::spans;
use crate::types::TokenDecimals;

/// Builds transfer reports from a ledger and a block explorer.
///
/// Cheap to clone; clones share the same upstream clients.
#[derive(Clone)]
pub struct TransferAggregator {
    ledger: Arc<dyn Ledger>,
    explorer: Arc<dyn BlockExplorer>,
    config: TokenlogConfig,
}

impl std::fmt::Debug for TransferAggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransferAggregator")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl TransferAggregator {
    pub fn new(
        ledger: Arc<dyn Ledger>,
        explorer: Arc<dyn BlockExplorer>,
        config: TokenlogConfig,
    ) -> Self {
        Self {
            ledger,
            explorer,
            config,
        }
    }

    pub fn config(&self) -> &TokenlogConfig {
        &self.config
    }

    /// Transfers of `query.address` between `query.start` and `query.end`.
    ///
    /// # Errors
    ///
    /// - [`TransferError::InvalidWindow`] when `start > end`, before any
    ///   upstream call
    /// - [`TransferError::DeadlineExceeded`] when the configured request
    ///   timeout elapses
    /// - any explorer, ledger or malformed-log failure
    pub async fn aggregate(&self, query: &TransferQuery) -> Result<TransferReport, TransferError> {
        if let Err(e) = query.validate() {
            warn!(
                token = %query.address,
                start = %query.start,
                end = %query.end,
                kind = %e.kind(),
                error = %e,
                "Rejected transfer query"
            );
            return Err(e);
        }

        let span = spans::aggregate_transfers(query.address, query.start, query.end);
        let deadline = self.config.request_timeout;

        let result = match tokio::time::timeout(deadline, self.run(query))
            .instrument(span.clone())
            .await
        {
            Ok(result) => result,
            Err(_) => Err(TransferError::DeadlineExceeded { after: deadline }),
        };

        span.in_scope(|| match &result {
            Ok(report) => info!(events = report.events.len(), "Transfer aggregation finished"),
            Err(e) => warn!(kind = %e.kind(), error = %e, "Transfer aggregation failed"),
        });

        result
    }

    async fn run(&self, query: &TransferQuery) -> Result<TransferReport, TransferError> {
        let (range, decimals) = tokio::try_join!(self.resolve_range(query), async {
            Ok::<_, TransferError>(self.decimals(query.address).await)
        })?;

        let span = Span::current();
        span.record("start_block", range.start_block);
        span.record("end_block", range.end_block);

        let filter = TransferFilterBuilder::new().with_token(query.address).build();
        let logs = fetch_logs_chunked(
            self.ledger.as_ref(),
            &filter,
            range.start_block,
            range.end_block,
            self.config.max_block_range,
        )
        .await?;

        let mut transfers = Vec::with_capacity(logs.len());
        for log in &logs {
            let Some(transfer) = decode_transfer_log(log)? else {
                continue;
            };
            if !range.contains(transfer.block_number) {
                warn!(
                    block_number = transfer.block_number,
                    log_index = transfer.log_index,
                    "Skipping log outside the requested block range"
                );
                continue;
            }
            transfers.push(transfer);
        }

        let timestamps = self.block_timestamps(&transfers).await?;

        let events = transfers
            .into_iter()
            .map(|transfer| {
                let timestamp = timestamps.get(&transfer.block_number).copied().ok_or_else(|| {
                    TransferError::malformed_log(format!(
                        "no timestamp for block {}",
                        transfer.block_number
                    ))
                })?;
                Ok(TransferEvent::from_decoded(transfer, timestamp, decimals))
            })
            .collect::<Result<Vec<_>, TransferError>>()?;

        Ok(TransferReport { range, events })
    }

    /// Both window bounds resolve to the latest block at or before them.
    async fn resolve_range(&self, query: &TransferQuery) -> Result<BlockRange, TransferError> {
        let (start_block, end_block) = tokio::try_join!(
            self.explorer
                .block_number_by_timestamp(query.start, Closest::Before),
            self.explorer
                .block_number_by_timestamp(query.end, Closest::Before),
        )?;

        if start_block > end_block {
            return Err(TransferError::InvertedBlockRange {
                start_block,
                end_block,
            });
        }

        debug!(start_block, end_block, "Resolved block range");
        Ok(BlockRange::new(start_block, end_block))
    }

    /// Token decimals, or `None` when the token does not answer usefully.
    async fn decimals(&self, token: Address) -> Option<TokenDecimals> {
        match self.ledger.token_decimals(token).await {
            Ok(decimals) if decimals.is_valid() => Some(decimals),
            Ok(decimals) => {
                warn!(%token, %decimals, "Token reports unusable decimals, omitting amounts");
                None
            }
            Err(e) => {
                warn!(%token, error = %e, "Could not read token decimals, omitting amounts");
                None
            }
        }
    }

    /// Timestamp of every block holding a transfer.
    ///
    /// Embedded log timestamps are used as is. Remaining blocks are fetched
    /// once each, at most `max_concurrent_block_fetches` at a time.
    async fn block_timestamps(
        &self,
        transfers: &[DecodedTransfer],
    ) -> Result<HashMap<BlockNumber, u64>, TransferError> {
        let mut timestamps = HashMap::new();
        for transfer in transfers {
            if let Some(ts) = transfer.block_timestamp {
                timestamps.insert(transfer.block_number, ts);
            }
        }

        let mut seen = HashSet::new();
        let missing: Vec<BlockNumber> = transfers
            .iter()
            .map(|t| t.block_number)
            .filter(|block| !timestamps.contains_key(block) && seen.insert(*block))
            .collect();

        if missing.is_empty() {
            return Ok(timestamps);
        }

        let limit = self.config.max_concurrent_block_fetches.get();
        let span = spans::fetch_block_timestamps(missing.len(), limit);
        let ledger = self.ledger.as_ref();

        let fetched: Vec<(BlockNumber, u64)> = stream::iter(missing)
            .map(|block_number| async move {
                ledger
                    .block_timestamp(block_number)
                    .await
                    .map(|ts| (block_number, ts))
            })
            .buffered(limit)
            .try_collect()
            .instrument(span)
            .await?;

        timestamps.extend(fetched);
        Ok(timestamps)
    }
}
