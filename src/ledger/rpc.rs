// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! [`Ledger`] over an alloy provider

use std::future::Future;
use std::time::Duration;

use alloy_primitives::{Address, BlockNumber, Bytes, U256};
use alloy_provider::Provider;
use alloy_rpc_types::{Filter, Log, TransactionInput, TransactionRequest};
use alloy_sol_types::SolCall;
use async_trait::async_trait;
use tracing::{debug, Instrument};

use super::{Ledger, TokenProfile};
use crate::errors::RpcError;
use crate::events::IERC20Metadata;
use crate::spans;
use crate::types::TokenDecimals;

/// Ledger backed by JSON-RPC.
///
/// Retry, rate limiting and call logging live in the provider's transport
/// layers; this type adds a timeout to every call.
#[derive(Debug, Clone)]
pub struct RpcLedger<P> {
    provider: P,
    call_timeout: Duration,
}

impl<P: Provider> RpcLedger<P> {
    /// Default per-call timeout.
    pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(10);

    pub fn new(provider: P) -> Self {
        Self {
            provider,
            call_timeout: Self::DEFAULT_CALL_TIMEOUT,
        }
    }

    /// Override the per-call timeout.
    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    async fn timed<T>(
        &self,
        operation: impl FnOnce() -> String,
        call: impl Future<Output = Result<T, RpcError>>,
    ) -> Result<T, RpcError> {
        tokio::time::timeout(self.call_timeout, call)
            .await
            .map_err(|_| RpcError::timeout(operation(), self.call_timeout))?
    }

    /// `eth_call` of a no-argument view function on `token`.
    async fn view<C: SolCall>(&self, token: Address, call: C) -> Result<C::Return, RpcError> {
        let operation = || format!("{} on {token}", C::SIGNATURE);
        let tx = TransactionRequest::default()
            .to(token)
            .input(TransactionInput::new(Bytes::from(call.abi_encode())));

        let output = self
            .timed(operation, async {
                self.provider
                    .call(tx)
                    .await
                    .map_err(|e| RpcError::call_failed(operation(), e))
            })
            .await?;

        C::abi_decode_returns(&output).map_err(|e| RpcError::call_undecodable(operation(), e))
    }
}

/// Turns permanent getter failures into `None`, keeping transient ones.
fn optional<T>(field: &str, result: Result<T, RpcError>) -> Result<Option<T>, RpcError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_retryable() => Err(e),
        Err(e) => {
            debug!(field, error = %e, "Token getter unavailable");
            Ok(None)
        }
    }
}

#[async_trait]
impl<P: Provider + 'static> Ledger for RpcLedger<P> {
    async fn logs(&self, filter: &Filter) -> Result<Vec<Log>, RpcError> {
        let operation = || {
            format!(
                "Transfer logs {}-{}",
                filter.get_from_block().unwrap_or_default(),
                filter.get_to_block().unwrap_or_default()
            )
        };

        self.timed(operation, async {
            self.provider
                .get_logs(filter)
                .await
                .map_err(|e| RpcError::get_logs_failed(operation(), e))
        })
        .await
    }

    async fn block_timestamp(&self, block_number: BlockNumber) -> Result<u64, RpcError> {
        let block = self
            .timed(
                || format!("eth_getBlockByNumber({block_number})"),
                async {
                    self.provider
                        .get_block_by_number(block_number.into())
                        .await
                        .map_err(|e| RpcError::get_block_failed(block_number, e))
                },
            )
            .instrument(spans::block_timestamp(block_number))
            .await?
            .ok_or(RpcError::BlockNotFound { block_number })?;

        Ok(block.header.timestamp)
    }

    async fn token_decimals(&self, token: Address) -> Result<TokenDecimals, RpcError> {
        let decimals = self.view(token, IERC20Metadata::decimalsCall {}).await?;
        Ok(TokenDecimals::new(decimals))
    }

    async fn token_profile(&self, token: Address) -> Result<TokenProfile, RpcError> {
        let (name, symbol, decimals, total_supply) = tokio::join!(
            self.view(token, IERC20Metadata::nameCall {}),
            self.view(token, IERC20Metadata::symbolCall {}),
            self.view(token, IERC20Metadata::decimalsCall {}),
            self.view(token, IERC20Metadata::totalSupplyCall {}),
        );

        Ok(TokenProfile {
            address: token,
            name: optional("name", name)?,
            symbol: optional("symbol", symbol)?,
            decimals: optional("decimals", decimals)?,
            total_supply: optional("totalSupply", total_supply)?.map(|s: U256| s.to_string()),
        })
    }
}
