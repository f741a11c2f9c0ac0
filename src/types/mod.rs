// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Strong types shared across tokenlog.
//!
//! - Time values ([`UnixTimestamp`])
//! - Configuration values ([`MaxBlockRange`], [`FetchConcurrency`])
//! - Token values ([`TokenDecimals`], [`TokenAmount`])

pub mod config;
pub mod time;
pub mod token;

pub use config::{ChunkIterator, FetchConcurrency, MaxBlockRange};
pub use time::UnixTimestamp;
pub use token::{TokenAmount, TokenDecimals};
