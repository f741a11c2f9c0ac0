// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! ERC-20 Transfer events.
//!
//! This module handles:
//! - Transfer event and metadata call definitions
//! - Semantic filter building
//! - Chunked log fetching through a [`Ledger`](crate::Ledger)
//! - Decoding logs into transfer records

pub mod chunked;
pub mod decode;
pub mod definitions;
pub mod filter;

pub use chunked::fetch_logs_chunked;
pub use decode::{decode_transfer_log, DecodedTransfer};
pub use definitions::{IERC20Metadata, Transfer};
pub use filter::TransferFilterBuilder;
