// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Error types for tokenlog.
//!
//! Each upstream has its own error type, and the aggregator wraps both:
//!
//! - [`RpcError`] - ledger RPC node failures (logs, blocks, contract calls)
//! - [`ExplorerError`] - block explorer API failures
//! - [`TransferError`] - transfer aggregation, wrapping the two above
//! - [`ConfigError`] - invalid or missing settings at startup
//!
//! Every error classifies itself into an [`ErrorKind`]. The kind decides the
//! HTTP status and the stable error code returned to callers, and whether a
//! retry may succeed.
//!
//! ```rust,ignore
//! use tokenlog::{ErrorKind, TransferError};
//!
//! match aggregator.aggregate(&query).await {
//!     Ok(report) => println!("{} transfers", report.events.len()),
//!     Err(e) if e.kind().is_retryable() => eprintln!("transient, retry later: {e}"),
//!     Err(e) => eprintln!("permanent failure ({}): {e}", e.kind().code()),
//! }
//! ```

mod config;
mod explorer;
mod rpc;
mod transfers;

pub use config::ConfigError;
pub use explorer::ExplorerError;
pub use rpc::RpcError;
pub use transfers::TransferError;

/// Boxed error source carried by upstream failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Caller-facing classification of a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The request itself is malformed. Rejected before any upstream call.
    Validation,
    /// The requested entity does not exist upstream.
    NotFound,
    /// An upstream is unreachable, rate limited or timed out. Retryable.
    UpstreamUnavailable,
    /// An upstream rejected the query or answered with garbage.
    UpstreamError,
    /// The request deadline elapsed before all upstream calls finished.
    DeadlineExceeded,
}

impl ErrorKind {
    /// Stable machine-readable code.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Validation => "validation_error",
            Self::NotFound => "not_found",
            Self::UpstreamUnavailable => "upstream_unavailable",
            Self::UpstreamError => "upstream_error",
            Self::DeadlineExceeded => "deadline_exceeded",
        }
    }

    /// Whether repeating the same request later may succeed.
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::UpstreamUnavailable | Self::DeadlineExceeded)
    }

    /// Kind for an upstream failure given its retry classification.
    pub(crate) const fn upstream(retryable: bool) -> Self {
        if retryable {
            Self::UpstreamUnavailable
        } else {
            Self::UpstreamError
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}
