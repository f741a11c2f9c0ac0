// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Strong types for configuration values
//!
//! These keep block-range and concurrency limits from being confused with
//! block numbers or counts.

use serde::{Deserialize, Serialize};

/// Maximum number of blocks covered by one `eth_getLogs` call.
///
/// Providers reject log queries spanning too many blocks. Larger ranges are
/// split with [`chunk_range`](Self::chunk_range).
///
/// ```
/// use tokenlog::MaxBlockRange;
///
/// let range = MaxBlockRange::new(1000);
/// let chunks: Vec<_> = range.chunk_range(0, 2500).collect();
///
/// assert_eq!(chunks, vec![(0, 999), (1000, 1999), (2000, 2500)]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MaxBlockRange(u64);

impl MaxBlockRange {
    /// Default span, large enough that a day of mainnet blocks (~7200) is one query.
    pub const DEFAULT: Self = Self(10_000);

    /// For providers with strict log limits.
    pub const CONSERVATIVE: Self = Self(2_000);

    /// Create a new max block range. Zero is clamped to one block.
    pub const fn new(blocks: u64) -> Self {
        if blocks == 0 {
            Self(1)
        } else {
            Self(blocks)
        }
    }

    /// Get the inner u64 value
    pub const fn as_u64(&self) -> u64 {
        self.0
    }

    /// Number of chunks needed to cover `[start, end]`.
    ///
    /// ```
    /// use tokenlog::MaxBlockRange;
    ///
    /// assert_eq!(MaxBlockRange::new(1000).chunks_needed(0, 2500), 3);
    /// assert_eq!(MaxBlockRange::new(1000).chunks_needed(10, 9), 0);
    /// ```
    pub fn chunks_needed(&self, start: u64, end: u64) -> usize {
        if end < start {
            return 0;
        }
        (end - start + 1).div_ceil(self.0) as usize
    }

    /// Split the inclusive range `[start, end]` into ascending chunks.
    pub fn chunk_range(&self, start: u64, end: u64) -> ChunkIterator {
        ChunkIterator {
            current: start,
            end,
            chunk_size: self.0,
            done: end < start,
        }
    }
}

impl Default for MaxBlockRange {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl From<u64> for MaxBlockRange {
    fn from(value: u64) -> Self {
        Self::new(value)
    }
}

impl std::fmt::Display for MaxBlockRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} blocks", self.0)
    }
}

/// Iterator over `(start, end)` block chunks, created by
/// [`MaxBlockRange::chunk_range`].
#[derive(Debug, Clone)]
pub struct ChunkIterator {
    current: u64,
    end: u64,
    chunk_size: u64,
    done: bool,
}

impl Iterator for ChunkIterator {
    type Item = (u64, u64);

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let chunk_start = self.current;
        let chunk_end = chunk_start
            .saturating_add(self.chunk_size - 1)
            .min(self.end);

        // Checked so a range ending at u64::MAX terminates.
        match chunk_end.checked_add(1) {
            Some(next) if next <= self.end => self.current = next,
            _ => self.done = true,
        }

        Some((chunk_start, chunk_end))
    }
}

/// Upper bound on concurrent per-block timestamp fetches within one request.
///
/// ```
/// use tokenlog::FetchConcurrency;
///
/// assert_eq!(FetchConcurrency::DEFAULT.get(), 16);
/// assert_eq!(FetchConcurrency::new(0).get(), 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FetchConcurrency(usize);

impl FetchConcurrency {
    /// Default bound.
    pub const DEFAULT: Self = Self(16);

    /// Create a bound. Zero is clamped to one (sequential fetching).
    pub const fn new(limit: usize) -> Self {
        if limit == 0 {
            Self(1)
        } else {
            Self(limit)
        }
    }

    /// The bound as a `usize`.
    pub const fn get(&self) -> usize {
        self.0
    }
}

impl Default for FetchConcurrency {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl From<usize> for FetchConcurrency {
    fn from(value: usize) -> Self {
        Self::new(value)
    }
}
