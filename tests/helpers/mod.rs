// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Test helpers for tokenlog integration tests
//!
//! Fixture implementations of [`Ledger`] and [`BlockExplorer`] so the
//! aggregator and the HTTP API can be exercised without a node or an
//! explorer. Both record the calls they receive.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use alloy_primitives::{address, Address, BlockNumber, Bytes, LogData, B256, U256};
use alloy_rpc_types::{Filter, Log};
use alloy_sol_types::SolEvent;
use alloy_transport::TransportError;
use async_trait::async_trait;
use tokenlog::{
    BlockExplorer, Closest, ExplorerError, Ledger, RpcError, TokenDecimals, TokenProfile,
    Transfer, UnixTimestamp,
};

pub const TOKEN: Address = address!("A0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48");
pub const ALICE: Address = address!("1111111111111111111111111111111111111111");
pub const BOB: Address = address!("2222222222222222222222222222222222222222");

/// Timestamp of `block` in every fixture: twelve-second slots from genesis.
pub fn timestamp_of(block: BlockNumber) -> u64 {
    1_600_000_000 + block * 12
}

/// Transaction hash unique to `(block, log_index)`.
pub fn tx_hash(block: BlockNumber, log_index: u64) -> B256 {
    let mut bytes = [0u8; 32];
    bytes[..8].copy_from_slice(&block.to_be_bytes());
    bytes[8..16].copy_from_slice(&log_index.to_be_bytes());
    B256::from(bytes)
}

/// ERC-20 Transfer log emitted by [`TOKEN`], without an embedded timestamp.
pub fn transfer_log(block: BlockNumber, log_index: u64, from: Address, to: Address, value: u64) -> Log {
    Log {
        inner: alloy_primitives::Log {
            address: TOKEN,
            data: LogData::new_unchecked(
                vec![Transfer::SIGNATURE_HASH, from.into_word(), to.into_word()],
                Bytes::from(U256::from(value).to_be_bytes::<32>().to_vec()),
            ),
        },
        block_hash: Some(B256::with_last_byte(block as u8)),
        block_number: Some(block),
        block_timestamp: None,
        transaction_hash: Some(tx_hash(block, log_index)),
        transaction_index: Some(0),
        log_index: Some(log_index),
        removed: false,
    }
}

/// Collects what the code under test logs on the current thread.
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    /// Routes this thread's events here until the guard is dropped.
    pub fn install(&self) -> tracing::subscriber::DefaultGuard {
        let writer = self.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl std::io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Transfers at blocks 100, 150 (log 0), 150 (log 1) and 200.
pub fn scenario_logs() -> Vec<Log> {
    vec![
        transfer_log(100, 4, ALICE, BOB, 1_000_000),
        transfer_log(150, 0, BOB, ALICE, 250_000),
        transfer_log(150, 1, ALICE, BOB, 2_500_000),
        transfer_log(200, 7, BOB, ALICE, 1),
    ]
}

/// In-memory ledger.
///
/// `logs` answers like a node: only logs inside the filter's block range, in
/// stored order.
#[derive(Default)]
pub struct FixtureLedger {
    logs: Vec<Log>,
    decimals: Option<u8>,
    profile: Option<TokenProfile>,
    failing_block: Option<BlockNumber>,
    failing_logs: bool,
    block_delay: Option<Duration>,
    logs_delay: Option<Duration>,
    log_queries: Mutex<Vec<(BlockNumber, BlockNumber)>>,
    block_fetches: Mutex<HashMap<BlockNumber, usize>>,
    decimals_calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl FixtureLedger {
    pub fn new(logs: Vec<Log>) -> Self {
        Self {
            logs,
            decimals: Some(6),
            ..Default::default()
        }
    }

    /// `decimals()` reverts.
    pub fn without_decimals(mut self) -> Self {
        self.decimals = None;
        self
    }

    pub fn with_decimals(mut self, decimals: u8) -> Self {
        self.decimals = Some(decimals);
        self
    }

    pub fn with_profile(mut self, profile: TokenProfile) -> Self {
        self.profile = Some(profile);
        self
    }

    /// Fetching this block's timestamp fails transiently.
    pub fn failing_block(mut self, block: BlockNumber) -> Self {
        self.failing_block = Some(block);
        self
    }

    /// Every log query is rejected by the node.
    pub fn failing_logs(mut self) -> Self {
        self.failing_logs = true;
        self
    }

    pub fn with_block_delay(mut self, delay: Duration) -> Self {
        self.block_delay = Some(delay);
        self
    }

    pub fn with_logs_delay(mut self, delay: Duration) -> Self {
        self.logs_delay = Some(delay);
        self
    }

    pub fn into_arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// Block ranges of the log queries received, in order.
    pub fn log_queries(&self) -> Vec<(BlockNumber, BlockNumber)> {
        self.log_queries.lock().unwrap().clone()
    }

    /// Timestamp fetches per block.
    pub fn block_fetches(&self) -> HashMap<BlockNumber, usize> {
        self.block_fetches.lock().unwrap().clone()
    }

    pub fn total_block_fetches(&self) -> usize {
        self.block_fetches.lock().unwrap().values().sum()
    }

    pub fn decimals_calls(&self) -> usize {
        self.decimals_calls.load(Ordering::SeqCst)
    }

    /// Highest number of timestamp fetches observed in flight at once.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn total_calls(&self) -> usize {
        self.log_queries().len() + self.total_block_fetches() + self.decimals_calls()
    }
}

#[async_trait]
impl Ledger for FixtureLedger {
    async fn logs(&self, filter: &Filter) -> Result<Vec<Log>, RpcError> {
        let from = filter.get_from_block().unwrap_or(0);
        let to = filter.get_to_block().unwrap_or(u64::MAX);
        self.log_queries.lock().unwrap().push((from, to));

        if let Some(delay) = self.logs_delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing_logs {
            return Err(RpcError::get_logs_failed(
                format!("Transfer logs {from}-{to}"),
                alloy_transport::TransportErrorKind::custom_str("query returned more than 10000 results"),
            ));
        }

        Ok(self
            .logs
            .iter()
            .filter(|log| log.block_number.is_some_and(|b| from <= b && b <= to))
            .cloned()
            .collect())
    }

    async fn block_timestamp(&self, block_number: BlockNumber) -> Result<u64, RpcError> {
        *self
            .block_fetches
            .lock()
            .unwrap()
            .entry(block_number)
            .or_default() += 1;

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        if let Some(delay) = self.block_delay {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.failing_block == Some(block_number) {
            return Err(RpcError::get_block_failed(block_number, TransportError::NullResp));
        }
        Ok(timestamp_of(block_number))
    }

    async fn token_decimals(&self, token: Address) -> Result<TokenDecimals, RpcError> {
        self.decimals_calls.fetch_add(1, Ordering::SeqCst);
        self.decimals.map(TokenDecimals::new).ok_or_else(|| {
            RpcError::call_undecodable(
                format!("decimals() on {token}"),
                std::io::Error::new(std::io::ErrorKind::InvalidData, "execution reverted"),
            )
        })
    }

    async fn token_profile(&self, token: Address) -> Result<TokenProfile, RpcError> {
        Ok(self
            .profile
            .clone()
            .unwrap_or_else(|| TokenProfile::empty(token)))
    }
}

/// How a [`FixtureExplorer`] fails.
#[derive(Debug, Clone, Copy)]
pub enum ExplorerFailure {
    /// Explorer rate limit message (transient).
    RateLimited,
    /// Rejected API key (permanent).
    InvalidKey,
}

impl ExplorerFailure {
    fn error(self) -> ExplorerError {
        match self {
            ExplorerFailure::RateLimited => ExplorerError::RateLimited {
                message: "Max rate limit reached".into(),
            },
            ExplorerFailure::InvalidKey => ExplorerError::Api {
                operation: "getblocknobytime".into(),
                message: "Invalid API Key".into(),
            },
        }
    }
}

/// Explorer resolving timestamps against [`timestamp_of`].
#[derive(Default)]
pub struct FixtureExplorer {
    failing_timestamp: Option<(u64, ExplorerFailure)>,
    abi: Option<serde_json::Value>,
    lookups: Mutex<Vec<(u64, Closest)>>,
}

impl FixtureExplorer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lookups of `timestamp` fail with `failure`.
    pub fn failing_at(mut self, timestamp: u64, failure: ExplorerFailure) -> Self {
        self.failing_timestamp = Some((timestamp, failure));
        self
    }

    pub fn with_abi(mut self, abi: serde_json::Value) -> Self {
        self.abi = Some(abi);
        self
    }

    pub fn into_arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn lookups(&self) -> Vec<(u64, Closest)> {
        self.lookups.lock().unwrap().clone()
    }
}

#[async_trait]
impl BlockExplorer for FixtureExplorer {
    async fn block_number_by_timestamp(
        &self,
        timestamp: UnixTimestamp,
        closest: Closest,
    ) -> Result<BlockNumber, ExplorerError> {
        let ts = timestamp.as_u64();
        self.lookups.lock().unwrap().push((ts, closest));

        if let Some((failing, failure)) = self.failing_timestamp {
            if failing == ts {
                return Err(failure.error());
            }
        }

        let genesis = timestamp_of(0);
        if ts < genesis {
            return Err(ExplorerError::NoBlockFound {
                timestamp: ts,
                closest: closest.to_string(),
            });
        }
        let offset = ts - genesis;
        Ok(match closest {
            Closest::Before => offset / 12,
            Closest::After => offset.div_ceil(12),
        })
    }

    async fn contract_abi(&self, address: Address) -> Result<serde_json::Value, ExplorerError> {
        self.abi
            .clone()
            .ok_or_else(|| ExplorerError::AbiNotAvailable {
                address: address.to_string(),
            })
    }
}
