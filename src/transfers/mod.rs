// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! ERC-20 transfer reports over a time window

mod aggregator;
mod types;

pub use aggregator::TransferAggregator;
pub use types::{BlockRange, TransferEvent, TransferQuery, TransferReport};
