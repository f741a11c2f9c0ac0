// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Unix time

use serde::{Deserialize, Serialize};

/// Unix timestamp in seconds (UTC).
///
/// Serialized as a bare JSON number, so a request body like
/// `{"start": 1700000000}` deserializes directly. Negative values are
/// rejected at deserialization.
///
/// ```
/// use tokenlog::UnixTimestamp;
///
/// let ts: UnixTimestamp = serde_json::from_str("1700000000").unwrap();
/// assert_eq!(ts.as_u64(), 1_700_000_000);
/// assert!(serde_json::from_str::<UnixTimestamp>("-1").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnixTimestamp(pub u64);

impl UnixTimestamp {
    /// Wraps a number of seconds since the epoch.
    pub const fn new(secs: u64) -> Self {
        Self(secs)
    }

    /// Seconds since the epoch.
    pub const fn as_u64(&self) -> u64 {
        self.0
    }
}

impl From<u64> for UnixTimestamp {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for UnixTimestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
