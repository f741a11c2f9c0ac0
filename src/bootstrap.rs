// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

use anyhow::anyhow;
use tokio::net::TcpListener;
use tracing::info;

use crate::api::{serve_api, AppState};
use crate::config::AppSettings;
use crate::explorer::{BlockExplorer, EtherscanClient};
use crate::ledger::{Ledger, RpcLedger};
use crate::provider::{ProviderConfig, ProviderPoolBuilder};

/// Main entry point for the application.
pub async fn run() -> anyhow::Result<()> {
    let settings = AppSettings::from_env()?;

    let pool = ProviderPoolBuilder::new()
        .add_chain(
            settings.chain,
            ProviderConfig::new(&settings.rpc_url).with_rate_limit_opt(settings.rpc_rate_limit),
        )
        .build()?;
    let provider = pool
        .get(settings.chain)
        .ok_or_else(|| anyhow!("no provider configured for chain {}", settings.chain))?;

    let ledger: Arc<dyn Ledger> = Arc::new(RpcLedger::new(provider));
    let explorer: Arc<dyn BlockExplorer> =
        Arc::new(EtherscanClient::new(settings.etherscan_config())?);

    info!(
        chain = %settings.chain,
        max_block_range = %settings.tokenlog.max_block_range,
        max_concurrent_block_fetches = settings.tokenlog.max_concurrent_block_fetches.get(),
        request_timeout_secs = settings.tokenlog.request_timeout.as_secs(),
        "Configured transfer aggregation"
    );

    let state = AppState::new(ledger, explorer, settings.tokenlog.clone());
    let listener = TcpListener::bind(("0.0.0.0", settings.api_port)).await?;

    let served = serve_api(listener, state, shutdown_signal()).await;
    pool.shutdown();
    served
}

/// Resolves on Ctrl-C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl-C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}
