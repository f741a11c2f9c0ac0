// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Block explorer error types.

use super::{BoxError, ErrorKind};

/// Errors from the block explorer API.
///
/// The explorer wraps every answer in a `{ status, message, result }`
/// envelope and reports most failures with HTTP 200, so the variants here
/// follow the envelope rather than the HTTP status.
#[derive(Debug, thiserror::Error)]
pub enum ExplorerError {
    /// The HTTP request did not complete (connect, timeout, body read).
    #[error("Explorer request {operation} failed")]
    Http {
        operation: String,
        retryable: bool,
        #[source]
        source: BoxError,
    },

    /// The explorer answered with a non-success HTTP status.
    #[error("Explorer returned HTTP {status} for {operation}")]
    Status { operation: String, status: u16 },

    /// The explorer's own rate limit was hit.
    #[error("Explorer rate limit reached: {message}")]
    RateLimited { message: String },

    /// No block exists on the requested side of the timestamp.
    #[error("No block found {closest} timestamp {timestamp}")]
    NoBlockFound { timestamp: u64, closest: String },

    /// The contract's source is not verified, so no ABI is published.
    #[error("Contract {address} has no verified ABI")]
    AbiNotAvailable { address: String },

    /// The explorer rejected the request (bad key, bad parameters, ...).
    #[error("Explorer rejected {operation}: {message}")]
    Api { operation: String, message: String },

    /// The envelope or its `result` could not be parsed.
    #[error("Invalid explorer response for {operation}: {details}")]
    InvalidResponse { operation: String, details: String },
}

impl ExplorerError {
    /// `Http` from a reqwest error, classifying connect and timeout failures
    /// as transient.
    pub fn http(operation: impl Into<String>, source: reqwest::Error) -> Self {
        let retryable = source.is_timeout()
            || source.is_connect()
            || source.is_request()
            || source.status().is_some_and(|s| s.is_server_error());
        ExplorerError::Http {
            operation: operation.into(),
            retryable,
            source: Box::new(source),
        }
    }

    /// `InvalidResponse` with details.
    pub fn invalid_response(operation: impl Into<String>, details: impl Into<String>) -> Self {
        ExplorerError::InvalidResponse {
            operation: operation.into(),
            details: details.into(),
        }
    }

    /// Whether a retry may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            ExplorerError::Http { retryable, .. } => *retryable,
            ExplorerError::Status { status, .. } => *status == 429 || *status >= 500,
            ExplorerError::RateLimited { .. } => true,
            ExplorerError::NoBlockFound { .. }
            | ExplorerError::AbiNotAvailable { .. }
            | ExplorerError::Api { .. }
            | ExplorerError::InvalidResponse { .. } => false,
        }
    }

    /// Caller-facing classification.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ExplorerError::NoBlockFound { .. } | ExplorerError::AbiNotAvailable { .. } => {
                ErrorKind::NotFound
            }
            _ => ErrorKind::upstream(self.is_retryable()),
        }
    }
}
