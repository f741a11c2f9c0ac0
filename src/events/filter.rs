// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Semantic filter builder for ERC-20 Transfer logs
//!
//! Hides the topic layout of `Transfer(address indexed from, address indexed
//! to, uint256 value)`: topic0 is the event signature hash, topic1 and topic2
//! the indexed `from` and `to`.
//!
//! ```rust
//! use alloy_primitives::address;
//! use tokenlog::TransferFilterBuilder;
//!
//! let filter = TransferFilterBuilder::new()
//!     .with_token(address!("A0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48"))
//!     .build();
//!
//! assert_eq!(filter.get_from_block(), None);
//! ```

use alloy_primitives::Address;
use alloy_rpc_types::Filter;
use alloy_sol_types::SolEvent;

use super::definitions::Transfer;

/// Builder for Transfer event filters.
///
/// The block range is left unset; [`fetch_logs_chunked`](super::fetch_logs_chunked)
/// sets it per chunk.
#[derive(Debug, Clone, Default)]
pub struct TransferFilterBuilder {
    token_address: Option<Address>,
}

impl TransferFilterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only logs emitted by this token contract.
    pub fn with_token(mut self, token: Address) -> Self {
        self.token_address = Some(token);
        self
    }

    pub fn build(self) -> Filter {
        let filter = Filter::new().event_signature(Transfer::SIGNATURE_HASH);

        match self.token_address {
            Some(token) => filter.address(token),
            None => filter,
        }
    }
}
