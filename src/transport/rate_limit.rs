// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Token bucket rate limiting for upstream requests.
//!
//! [`RateLimiter`] is a cloneable handle over one shared bucket. The ledger
//! RPC client uses it through [`RateLimitLayer`]; the block explorer client
//! awaits [`RateLimiter::acquire`] before every HTTP call. Clones share the
//! bucket, so every request handled by the process draws from the same
//! budget.

use std::{
    future::Future,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
    time::{Duration, Instant},
};

use tokio::sync::Mutex;
use tower::Layer;
use tracing::trace;

/// Shared token bucket.
#[derive(Clone, Debug)]
pub struct RateLimiter {
    state: Arc<Mutex<BucketState>>,
}

impl RateLimiter {
    /// Allows `requests` per `period`, with bursts up to `requests`.
    pub fn new(requests: u32, period: Duration) -> Self {
        Self {
            state: Arc::new(Mutex::new(BucketState::new(requests, period))),
        }
    }

    /// Allows `requests` per second.
    pub fn per_second(requests: u32) -> Self {
        Self::new(requests, Duration::from_secs(1))
    }

    /// Waits until a token is available and takes it.
    pub async fn acquire(&self) {
        loop {
            let wait = {
                let mut state = self.state.lock().await;
                state.try_acquire()
            };

            match wait {
                None => return,
                Some(duration) => {
                    trace!(wait_ms = duration.as_millis(), "Rate limit reached, waiting");
                    tokio::time::sleep(duration).await;
                }
            }
        }
    }

    /// Bucket capacity (maximum burst).
    pub async fn capacity(&self) -> u32 {
        self.state.lock().await.capacity
    }
}

#[derive(Debug)]
struct BucketState {
    capacity: u32,
    tokens: f64,
    /// Tokens per nanosecond.
    refill_rate: f64,
    last_refill: Instant,
}

impl BucketState {
    fn new(requests: u32, period: Duration) -> Self {
        let requests = requests.max(1);
        let period_nanos = period.as_nanos().max(1) as f64;
        Self {
            capacity: requests,
            tokens: requests as f64,
            refill_rate: requests as f64 / period_nanos,
            last_refill: Instant::now(),
        }
    }

    /// Takes a token, or returns how long to wait for the next one.
    fn try_acquire(&mut self) -> Option<Duration> {
        self.refill();

        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            None
        } else {
            let missing = 1.0 - self.tokens;
            Some(Duration::from_nanos((missing / self.refill_rate).ceil() as u64))
        }
    }

    fn refill(&mut self) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_refill);
        let new_tokens = elapsed.as_nanos() as f64 * self.refill_rate;

        self.tokens = (self.tokens + new_tokens).min(self.capacity as f64);
        self.last_refill = now;
    }
}

/// Tower layer that gates every request on a [`RateLimiter`].
///
/// ```rust,ignore
/// use tokenlog::transport::RateLimitLayer;
/// use alloy_rpc_client::ClientBuilder;
///
/// let client = ClientBuilder::default()
///     .layer(RateLimitLayer::per_second(25))
///     .http(rpc_url);
/// ```
#[derive(Clone, Debug)]
pub struct RateLimitLayer {
    limiter: RateLimiter,
}

impl RateLimitLayer {
    /// Wraps an existing limiter, sharing its bucket.
    pub fn new(limiter: RateLimiter) -> Self {
        Self { limiter }
    }

    /// Creates a layer with its own bucket of `requests` per second.
    pub fn per_second(requests: u32) -> Self {
        Self::new(RateLimiter::per_second(requests))
    }
}

impl<S> Layer<S> for RateLimitLayer {
    type Service = RateLimitService<S>;

    fn layer(&self, service: S) -> Self::Service {
        RateLimitService {
            service,
            limiter: self.limiter.clone(),
        }
    }
}

/// Service produced by [`RateLimitLayer`].
#[derive(Clone, Debug)]
pub struct RateLimitService<S> {
    service: S,
    limiter: RateLimiter,
}

impl<S, Request> tower::Service<Request> for RateLimitService<S>
where
    S: tower::Service<Request> + Clone + Send + 'static,
    S::Future: Send,
    Request: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&mut self, request: Request) -> Self::Future {
        let limiter = self.limiter.clone();
        let mut service = self.service.clone();

        Box::pin(async move {
            limiter.acquire().await;
            service.call(request).await
        })
    }
}
