// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! ERC-20 event and metadata call definitions
//!
//! The `sol!` macro generates `SIGNATURE` and `SIGNATURE_HASH` constants for
//! each event, so filters never hash the signature at runtime:
//!
//! ```rust
//! use tokenlog::Transfer;
//! use alloy_sol_types::SolEvent;
//!
//! assert_eq!(Transfer::SIGNATURE, "Transfer(address,address,uint256)");
//! ```

use std::fmt::Debug;

use alloy_sol_types::sol;

sol! {
    /// ERC-20 Transfer event
    ///
    /// Mints carry `from = 0x0`, burns carry `to = 0x0`. `value` is the raw
    /// amount, not adjusted for decimals.
    event Transfer(address indexed from, address indexed to, uint256 value);
}

impl Debug for Transfer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Transfer(from: {}, to: {}, value: {})",
            self.from, self.to, self.value
        )
    }
}

sol! {
    /// Optional ERC-20 metadata getters used for the token profile and for
    /// scaling transfer amounts.
    interface IERC20Metadata {
        function name() external view returns (string);
        function symbol() external view returns (string);
        function decimals() external view returns (uint8);
        function totalSupply() external view returns (uint256);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{address, keccak256, U256};
    use alloy_sol_types::{SolCall, SolEvent};

    #[test]
    fn test_transfer_signature_hash() {
        assert_eq!(
            Transfer::SIGNATURE_HASH,
            keccak256("Transfer(address,address,uint256)")
        );
    }

    #[test]
    fn test_decimals_selector() {
        // 0x313ce567 = bytes4(keccak256("decimals()"))
        assert_eq!(IERC20Metadata::decimalsCall::SELECTOR, [0x31, 0x3c, 0xe5, 0x67]);
    }

    #[test]
    fn test_transfer_debug() {
        let event = Transfer {
            from: address!("1111111111111111111111111111111111111111"),
            to: address!("2222222222222222222222222222222222222222"),
            value: U256::from(7u64),
        };
        let rendered = format!("{event:?}");
        assert!(rendered.contains("value: 7"));
    }
}
