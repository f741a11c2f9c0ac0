// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Token decimals and raw amounts

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

/// ERC-20 decimal precision as returned by `decimals()`.
///
/// ```
/// use tokenlog::TokenDecimals;
///
/// assert_eq!(TokenDecimals::USDC.as_u8(), 6);
/// assert!(!TokenDecimals::new(78).is_valid());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenDecimals(u8);

impl TokenDecimals {
    /// 10^77 is the largest power of ten below `U256::MAX`.
    pub const MAX_VALID: u8 = 77;

    /// Standard decimals for ETH-like tokens (18)
    pub const STANDARD: Self = Self(18);

    /// USDC decimals (6)
    pub const USDC: Self = Self(6);

    pub const fn new(decimals: u8) -> Self {
        Self(decimals)
    }

    pub const fn as_u8(&self) -> u8 {
        self.0
    }

    /// Whether amounts can be formatted with this precision. Contracts are
    /// free to return any `uint8`; values above 77 cannot scale a `U256`.
    pub const fn is_valid(&self) -> bool {
        self.0 <= Self::MAX_VALID
    }
}

impl From<u8> for TokenDecimals {
    fn from(value: u8) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for TokenDecimals {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} decimals", self.0)
    }
}

/// Raw token amount in the token's smallest unit, as emitted on-chain.
///
/// ```
/// use alloy_primitives::U256;
/// use tokenlog::{TokenAmount, TokenDecimals};
///
/// let amount = TokenAmount::new(U256::from(1_500_000u64));
/// assert_eq!(amount.format(TokenDecimals::USDC).as_deref(), Some("1.5"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenAmount(U256);

impl TokenAmount {
    pub const ZERO: Self = Self(U256::ZERO);

    pub const fn new(amount: U256) -> Self {
        Self(amount)
    }

    pub const fn as_u256(&self) -> U256 {
        self.0
    }

    /// Formats the amount as a plain decimal string scaled by `decimals`,
    /// without trailing fractional zeros and never in scientific notation.
    ///
    /// Returns `None` when `decimals` is out of range.
    pub fn format(&self, decimals: TokenDecimals) -> Option<String> {
        if !decimals.is_valid() {
            return None;
        }
        let places = decimals.as_u8() as usize;
        if places == 0 {
            return Some(self.0.to_string());
        }

        let divisor = U256::from(10u64).pow(U256::from(places));
        let whole = self.0 / divisor;
        let fractional = (self.0 % divisor).to_string();
        let padded = format!("{}{}", "0".repeat(places - fractional.len()), fractional);
        let trimmed = padded.trim_end_matches('0');

        if trimmed.is_empty() {
            Some(whole.to_string())
        } else {
            Some(format!("{whole}.{trimmed}"))
        }
    }
}

impl From<U256> for TokenAmount {
    fn from(value: U256) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for TokenAmount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
