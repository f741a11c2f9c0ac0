// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Ledger RPC error types.

use std::time::Duration;

use alloy_primitives::BlockNumber;
use alloy_transport::TransportError;

use super::{BoxError, ErrorKind};
use crate::transport::is_retryable_transport_error;

/// Errors from calls against the ledger RPC node.
///
/// Variants wrapping a transport failure record whether the failure was
/// transient at construction time, so the classification survives boxing
/// the source.
///
/// ```rust
/// use tokenlog::{ErrorKind, RpcError};
///
/// let error = RpcError::BlockNotFound { block_number: 42 };
/// assert_eq!(error.to_string(), "Block not found: 42");
/// assert_eq!(error.kind(), ErrorKind::UpstreamUnavailable);
/// ```
#[derive(Debug, thiserror::Error)]
pub enum RpcError {
    /// `eth_getLogs` failed.
    #[error("Failed to fetch logs for {operation}")]
    GetLogsFailed {
        /// What was being fetched (e.g. "Transfer logs 100-200")
        operation: String,
        /// Whether a retry may succeed
        retryable: bool,
        #[source]
        source: BoxError,
    },

    /// `eth_getBlockByNumber` failed.
    #[error("Failed to fetch block {block_number}")]
    GetBlockFailed {
        block_number: BlockNumber,
        retryable: bool,
        #[source]
        source: BoxError,
    },

    /// The node answered but does not know the block. Usually a lagging node
    /// behind a load balancer, so it is treated as transient.
    #[error("Block not found: {block_number}")]
    BlockNotFound { block_number: BlockNumber },

    /// An `eth_call` against a contract failed or returned undecodable data.
    #[error("Contract call {operation} failed")]
    CallFailed {
        /// Call description (e.g. "decimals() on 0xabc...")
        operation: String,
        retryable: bool,
        #[source]
        source: BoxError,
    },

    /// A single call exceeded its timeout.
    #[error("{operation} timed out after {}ms", .after.as_millis())]
    Timeout { operation: String, after: Duration },

    /// The configured RPC URL could not be parsed.
    #[error("Invalid RPC URL: {0}")]
    ProviderUrlInvalid(String),

    #[error("Provider pool lock poisoned")]
    PoolUnavailable,
}

impl RpcError {
    /// `GetLogsFailed` from a transport error.
    pub fn get_logs_failed(operation: impl Into<String>, source: TransportError) -> Self {
        RpcError::GetLogsFailed {
            operation: operation.into(),
            retryable: is_retryable_transport_error(&source),
            source: Box::new(source),
        }
    }

    /// `GetBlockFailed` from a transport error.
    pub fn get_block_failed(block_number: BlockNumber, source: TransportError) -> Self {
        RpcError::GetBlockFailed {
            block_number,
            retryable: is_retryable_transport_error(&source),
            source: Box::new(source),
        }
    }

    /// `CallFailed` from a transport error.
    pub fn call_failed(operation: impl Into<String>, source: TransportError) -> Self {
        RpcError::CallFailed {
            operation: operation.into(),
            retryable: is_retryable_transport_error(&source),
            source: Box::new(source),
        }
    }

    /// `CallFailed` for return data that does not decode. Never retryable.
    pub fn call_undecodable(
        operation: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        RpcError::CallFailed {
            operation: operation.into(),
            retryable: false,
            source: Box::new(source),
        }
    }

    /// `Timeout` for an operation.
    pub fn timeout(operation: impl Into<String>, after: Duration) -> Self {
        RpcError::Timeout {
            operation: operation.into(),
            after,
        }
    }

    /// Whether a retry may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            RpcError::GetLogsFailed { retryable, .. }
            | RpcError::GetBlockFailed { retryable, .. }
            | RpcError::CallFailed { retryable, .. } => *retryable,
            RpcError::BlockNotFound { .. } | RpcError::Timeout { .. } => true,
            RpcError::ProviderUrlInvalid(_) | RpcError::PoolUnavailable => false,
        }
    }

    /// Caller-facing classification.
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::upstream(self.is_retryable())
    }
}
