// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Tracing for ledger RPC requests.
//!
//! Every request gets an `rpc_call` span carrying the JSON-RPC method and its
//! duration. Calls slower than the configured threshold are reported at WARN
//! so a sluggish node shows up without enabling DEBUG.

use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
    time::{Duration, Instant},
};

use alloy_json_rpc::{RequestPacket, ResponsePacket};
use alloy_transport::TransportError;
use tower::Layer;
use tracing::{debug, warn, Instrument};

const DEFAULT_SLOW_CALL: Duration = Duration::from_secs(2);

/// Tower layer that traces RPC requests.
#[derive(Clone, Debug)]
pub struct LoggingLayer {
    slow_call: Duration,
}

impl Default for LoggingLayer {
    fn default() -> Self {
        Self {
            slow_call: DEFAULT_SLOW_CALL,
        }
    }
}

impl LoggingLayer {
    /// Creates a layer with the default slow-call threshold (2s).
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the duration above which a call is logged at WARN.
    #[must_use]
    pub fn with_slow_call_threshold(mut self, threshold: Duration) -> Self {
        self.slow_call = threshold;
        self
    }
}

impl<S> Layer<S> for LoggingLayer {
    type Service = LoggingService<S>;

    fn layer(&self, service: S) -> Self::Service {
        LoggingService {
            service,
            slow_call: self.slow_call,
        }
    }
}

/// Service produced by [`LoggingLayer`].
#[derive(Clone, Debug)]
pub struct LoggingService<S> {
    service: S,
    slow_call: Duration,
}

impl<S> tower::Service<RequestPacket> for LoggingService<S>
where
    S: tower::Service<RequestPacket, Response = ResponsePacket, Error = TransportError>
        + Clone
        + Send
        + 'static,
    S::Future: Send,
{
    type Response = ResponsePacket;
    type Error = TransportError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&mut self, request: RequestPacket) -> Self::Future {
        let slow_call = self.slow_call;
        let mut service = self.service.clone();
        let method = method_name(&request);
        let span = tracing::debug_span!("rpc_call", method = %method);

        Box::pin(
            async move {
                let start = Instant::now();
                let result = service.call(request).await;
                let elapsed = start.elapsed();
                let duration_ms = elapsed.as_millis() as u64;

                match &result {
                    Ok(_) if elapsed >= slow_call => {
                        warn!(duration_ms, "Slow RPC response");
                    }
                    Ok(_) => debug!(duration_ms, "RPC response"),
                    Err(e) => warn!(error = %e, duration_ms, "RPC error"),
                }

                result
            }
            .instrument(span),
        )
    }
}

/// JSON-RPC method of a request, or a batch summary.
fn method_name(request: &RequestPacket) -> String {
    match request {
        RequestPacket::Single(req) => req.method().to_string(),
        RequestPacket::Batch(reqs) => match reqs.as_slice() {
            [] => "batch(empty)".to_string(),
            [only] => only.method().to_string(),
            many => format!("batch({} calls)", many.len()),
        },
    }
}
