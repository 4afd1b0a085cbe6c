//! Numeric canonicalization helpers

use crate::eth::{error::ParseError, serde_helpers::Numeric};
use alloy_primitives::U256;

/// Converts a lenient numeric value into a `0x`-prefixed hex quantity.
///
/// `0x`-prefixed strings are passed through unchanged, preserving the exact
/// representation the caller supplied. Decimal strings and plain integers
/// are parsed into a [`U256`] and rendered with minimal hex digits, so `0`
/// becomes `"0x0"` and `1000000000000000000` becomes `"0xde0b6b3a7640000"`.
pub fn to_quantity(value: &Numeric) -> Result<String, ParseError> {
    match value {
        Numeric::Num(n) => Ok(format!("{n:#x}")),
        Numeric::Str(s) => {
            if s.starts_with("0x") {
                return Ok(s.clone());
            }
            let n = U256::from_str_radix(s, 10)
                .map_err(|_| ParseError::new(format!("Invalid numeric value: {s}")))?;
            Ok(format!("{n:#x}"))
        }
    }
}

/// Canonicalizes an optional quantity, defaulting to `"0x0"` when absent.
pub fn quantity_or_zero(value: Option<&Numeric>) -> Result<String, ParseError> {
    value.map_or_else(|| Ok("0x0".to_string()), to_quantity)
}

/// Canonicalizes a quantity that must be present, naming the missing field
/// and the transaction envelope in the error.
pub fn required_quantity(
    value: Option<&Numeric>,
    field: &str,
    tx_type: &str,
) -> Result<String, ParseError> {
    value
        .ok_or_else(|| ParseError::new(format!("{field} not specified for {tx_type} transaction")))
        .and_then(to_quantity)
}

/// Parses a lenient numeric value into a `u64`.
pub fn to_u64(value: &Numeric) -> Result<u64, ParseError> {
    match value {
        Numeric::Num(n) => Ok(*n),
        Numeric::Str(s) => {
            let (digits, radix) = match s.strip_prefix("0x") {
                Some(hex) => (hex, 16),
                None => (s.as_str(), 10),
            };
            u64::from_str_radix(digits, radix)
                .map_err(|_| ParseError::new(format!("Invalid numeric value: {s}")))
        }
    }
}
