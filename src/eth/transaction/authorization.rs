//! EIP-7702 authorization tuples

use crate::eth::{
    error::ParseError,
    serde_helpers::Numeric,
    utils::{to_quantity, to_u64},
};
use serde::{Deserialize, Serialize};

/// A loosely typed EIP-7702 authorization tuple as supplied by callers.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizationRequest {
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub chain_id: Option<Numeric>,
    #[serde(default)]
    pub nonce: Option<Numeric>,
    #[serde(default)]
    pub r: Option<String>,
    #[serde(default)]
    pub s: Option<String>,
    /// signature recovery bit, 0 or 1
    #[serde(default)]
    pub y_parity: Option<Numeric>,
    /// legacy recovery id, accepted in place of `y_parity`
    #[serde(default)]
    pub v: Option<Numeric>,
}

/// A normalized EIP-7702 authorization entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Authorization {
    pub address: String,
    pub chain_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nonce: Option<String>,
    pub r: String,
    pub s: String,
    /// `"0x0"` or `"0x1"`
    pub y_parity: String,
}

/// Normalizes a single authorization tuple.
///
/// `yParity` is taken directly when supplied; otherwise it is derived from
/// `v`, handling both the legacy `27`/`28` and the EIP-155
/// `chainId * 2 + 35/36` encodings. Failures name the offending entry index.
pub(super) fn normalize_authorization(
    entry: &AuthorizationRequest,
    index: usize,
) -> Result<Authorization, ParseError> {
    let address = entry
        .address
        .clone()
        .ok_or_else(|| missing_field("address", index))?;
    let chain_id = entry
        .chain_id
        .as_ref()
        .ok_or_else(|| missing_field("chainId", index))
        .and_then(to_quantity)?;
    let r = entry.r.clone().ok_or_else(|| missing_field("r", index))?;
    let s = entry.s.clone().ok_or_else(|| missing_field("s", index))?;
    let nonce = entry.nonce.as_ref().map(to_quantity).transpose()?;
    let y_parity = resolve_parity(entry, index)?;
    Ok(Authorization { address, chain_id, nonce, r, s, y_parity: format!("{y_parity:#x}") })
}

fn missing_field(field: &str, index: usize) -> ParseError {
    ParseError::new(format!("Missing {field} for authorization at index {index}"))
}

fn resolve_parity(entry: &AuthorizationRequest, index: usize) -> Result<u64, ParseError> {
    if let Some(parity) = &entry.y_parity {
        let parity = to_u64(parity)?;
        if parity > 1 {
            return Err(ParseError::new(format!(
                "Invalid yParity for authorization at index {index}"
            )));
        }
        return Ok(parity);
    }
    if let Some(v) = &entry.v {
        return match to_u64(v)? {
            parity @ (0 | 1) => Ok(parity),
            27 => Ok(0),
            28 => Ok(1),
            v if v >= 35 => Ok((v - 35) % 2),
            _ => Err(ParseError::new(format!(
                "Invalid v value for authorization at index {index}"
            ))),
        };
    }
    Err(ParseError::new(format!("Missing yParity or v for authorization at index {index}")))
}
