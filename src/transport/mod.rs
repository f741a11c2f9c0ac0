// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Transport middleware for upstream calls.
//!
//! Tower layers stacked onto the alloy RPC client (outermost first):
//!
//! ```rust,ignore
//! use tokenlog::transport::{LoggingLayer, RateLimitLayer, RetryLayer, RetryPolicy};
//! use alloy_rpc_client::ClientBuilder;
//!
//! let client = ClientBuilder::default()
//!     .layer(RetryLayer::new(RetryPolicy::default()))
//!     .layer(RateLimitLayer::per_second(25))
//!     .layer(LoggingLayer::new())
//!     .http(rpc_url);
//! ```
//!
//! [`RateLimiter`] and [`RetryPolicy`] are also used directly by the block
//! explorer client, which talks plain HTTP rather than JSON-RPC.

mod logging;
mod rate_limit;
mod retry;

pub use logging::{LoggingLayer, LoggingService};
pub use rate_limit::{RateLimitLayer, RateLimitService, RateLimiter};
pub(crate) use retry::is_retryable_transport_error;
pub use retry::{RetryLayer, RetryPolicy, RetryService};
