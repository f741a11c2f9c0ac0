// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Chunked log fetching
//!
//! Providers reject `eth_getLogs` queries that span too many blocks, so wide
//! ranges are split into [`MaxBlockRange`] chunks and fetched in ascending
//! order.

use alloy_primitives::BlockNumber;
use alloy_rpc_types::{Filter, Log};
use tracing::debug;

use crate::errors::RpcError;
use crate::ledger::Ledger;
use crate::types::MaxBlockRange;

/// Fetch logs for the inclusive range `[start_block, end_block]` in chunks.
///
/// The block range already set on `filter` is replaced per chunk. Chunks are
/// fetched one after another, so the concatenated result keeps the ledger's
/// natural order.
///
/// # Errors
///
/// Fails fast on the first chunk that fails; no partial results are returned.
pub async fn fetch_logs_chunked<L: Ledger + ?Sized>(
    ledger: &L,
    filter: &Filter,
    start_block: BlockNumber,
    end_block: BlockNumber,
    max_block_range: MaxBlockRange,
) -> Result<Vec<Log>, RpcError> {
    debug!(
        start_block,
        end_block,
        chunk_size = max_block_range.as_u64(),
        num_chunks = max_block_range.chunks_needed(start_block, end_block),
        "Starting chunked log fetch"
    );

    let mut all_logs = Vec::new();

    for (chunk_start, chunk_end) in max_block_range.chunk_range(start_block, end_block) {
        let chunk_filter = filter.clone().from_block(chunk_start).to_block(chunk_end);

        let logs = ledger.logs(&chunk_filter).await?;

        debug!(
            chunk_start,
            chunk_end,
            logs_count = logs.len(),
            "Fetched logs for chunk"
        );
        all_logs.extend(logs);
    }

    debug!(total_logs = all_logs.len(), "Finished chunked log fetch");

    Ok(all_logs)
}
