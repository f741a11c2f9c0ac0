// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Span creation helpers for tokenlog operations.
//!
//! Telemetry is kept out of business logic: instead of `#[instrument]`
//! attributes, each instrumented operation has a span helper here.
//!
//! Usage pattern:
//! ```rust,ignore
//! pub async fn my_operation(&self, param: Type) -> Result<T> {
//!     self.inner(param).instrument(spans::my_operation(param)).await
//! }
//! ```

use alloy_primitives::{Address, BlockNumber};
use tracing::{field, Level, Span};

use crate::types::UnixTimestamp;

/// Root span of one transfer aggregation.
///
/// `start_block` and `end_block` are recorded once the window is resolved,
/// so failures logged in this span carry the block range.
///
/// Children: fetch_block_timestamps, block_timestamp
#[inline]
pub(crate) fn aggregate_transfers(
    token: Address,
    start: UnixTimestamp,
    end: UnixTimestamp,
) -> Span {
    tracing::span!(
        Level::INFO,
        "tokenlog.aggregate_transfers",
        token = %token,
        start = start.as_u64(),
        end = end.as_u64(),
        start_block = field::Empty,
        end_block = field::Empty,
    )
}

/// Span for the bounded timestamp fan-out.
///
/// Parent: aggregate_transfers
#[inline]
pub(crate) fn fetch_block_timestamps(blocks: usize, concurrency: usize) -> Span {
    tracing::debug_span!(
        "tokenlog.fetch_block_timestamps",
        blocks = blocks,
        concurrency = concurrency,
    )
}

/// Span for a single block timestamp lookup.
#[inline]
pub(crate) fn block_timestamp(block_number: BlockNumber) -> Span {
    tracing::trace_span!("tokenlog.block_timestamp", block_number = block_number)
}

/// Span for one HTTP request handled by the API.
#[inline]
pub(crate) fn api_request(route: &'static str) -> Span {
    tracing::info_span!("tokenlog.api_request", route = route)
}
