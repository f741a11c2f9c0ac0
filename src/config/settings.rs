// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Service settings from environment variables
//!
//! | Variable | Default |
//! |---|---|
//! | `RPC_URL` | required |
//! | `ETHERSCAN_API_KEY` | required |
//! | `ETHERSCAN_API_URL` | `https://api.etherscan.io/v2/api` |
//! | `CHAIN_ID` | `1` |
//! | `API_PORT` | `3000` |
//! | `RPC_RATE_LIMIT` | unlimited |
//! | `EXPLORER_RATE_LIMIT` | `5` |
//! | `MAX_BLOCK_RANGE` | `10000` |
//! | `MAX_CONCURRENT_BLOCK_FETCHES` | `16` |
//! | `REQUEST_TIMEOUT_SECS` | `30` |

use std::str::FromStr;
use std::time::Duration;

use alloy_chains::Chain;

use super::{TokenlogConfig, TokenlogConfigBuilder};
use crate::errors::ConfigError;
use crate::explorer::EtherscanConfig;

#[derive(Debug, Clone)]
pub struct AppSettings {
    pub rpc_url: String,
    pub etherscan_api_key: String,
    pub etherscan_api_url: String,
    pub chain: Chain,
    pub api_port: u16,
    /// `None` leaves the RPC unthrottled.
    pub rpc_rate_limit: Option<u32>,
    pub explorer_rate_limit: u32,
    pub tokenlog: TokenlogConfig,
}

impl AppSettings {
    /// Reads settings from the process environment, after loading `.env`
    /// if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| dotenvy::var(name).ok())
    }

    /// Reads settings through `lookup`, which returns a variable's value or
    /// `None` when unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let required = |name: &'static str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::MissingEnvVar(name))
        };

        let rpc_url = required("RPC_URL")?;
        url::Url::parse(&rpc_url).map_err(|e| ConfigError::invalid_value("RPC_URL", &rpc_url, e))?;

        let defaults = TokenlogConfig::default();
        let request_timeout = match parse_opt::<u64>(&lookup, "REQUEST_TIMEOUT_SECS")? {
            Some(0) => {
                return Err(ConfigError::invalid_value(
                    "REQUEST_TIMEOUT_SECS",
                    "0",
                    "must be at least 1 second",
                ))
            }
            Some(secs) => Duration::from_secs(secs),
            None => defaults.request_timeout,
        };
        let tokenlog = TokenlogConfigBuilder::new()
            .max_block_range(
                parse_opt(&lookup, "MAX_BLOCK_RANGE")?
                    .unwrap_or(defaults.max_block_range.as_u64()),
            )
            .max_concurrent_block_fetches(
                parse_opt(&lookup, "MAX_CONCURRENT_BLOCK_FETCHES")?
                    .unwrap_or(defaults.max_concurrent_block_fetches.get()),
            )
            .request_timeout(request_timeout)
            .build();

        Ok(Self {
            rpc_url,
            etherscan_api_key: required("ETHERSCAN_API_KEY")?,
            etherscan_api_url: lookup("ETHERSCAN_API_URL")
                .unwrap_or_else(|| EtherscanConfig::DEFAULT_API_URL.to_string()),
            chain: Chain::from_id(parse_opt(&lookup, "CHAIN_ID")?.unwrap_or(1)),
            api_port: parse_opt(&lookup, "API_PORT")?.unwrap_or(3000),
            rpc_rate_limit: parse_opt(&lookup, "RPC_RATE_LIMIT")?,
            explorer_rate_limit: parse_opt(&lookup, "EXPLORER_RATE_LIMIT")?.unwrap_or(5),
            tokenlog,
        })
    }

    /// Explorer client settings derived from these settings.
    pub fn etherscan_config(&self) -> EtherscanConfig {
        EtherscanConfig::new(&self.etherscan_api_key)
            .with_api_url(&self.etherscan_api_url)
            .with_chain_id(self.chain.id())
            .with_rate_limit(self.explorer_rate_limit)
    }
}

fn parse_opt<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(name) {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| ConfigError::invalid_value(name, raw, e)),
    }
}
