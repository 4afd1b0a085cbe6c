//! custom serde helper types

use serde::{Deserialize, Serialize};

/// A numeric value as it appears in raw transaction requests.
///
/// Callers supply quantities as plain integers, decimal strings or
/// `0x`-prefixed hex strings interchangeably; this type accepts all of them
/// and leaves the interpretation to [`crate::eth::utils::to_quantity`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Numeric {
    /// A native integer, e.g. `21000`
    Num(u64),
    /// A decimal (`"21000"`) or hex (`"0x5208"`) string
    Str(String),
}

impl From<u64> for Numeric {
    fn from(n: u64) -> Self {
        Self::Num(n)
    }
}

impl From<&str> for Numeric {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for Numeric {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}
