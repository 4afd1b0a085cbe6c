//! transaction related data

use crate::eth::{
    error::ParseError,
    serde_helpers::Numeric,
    utils::{quantity_or_zero, required_quantity, to_quantity, to_u64},
};
use serde::{Deserialize, Serialize};
use tracing::trace;

mod authorization;

pub use authorization::{Authorization, AuthorizationRequest};

/// Represents _all_ transaction requests received from callers
///
/// Every field is optional; quantities accept integers, decimal strings and
/// hex strings interchangeably, and the `gas`/`gasLimit` and `data`/`input`
/// synonym pairs are both recognized. Unknown fields are ignored.
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRequest {
    /// from address
    #[serde(default)]
    pub from: Option<String>,
    /// to address, `None` for contract creation
    #[serde(default)]
    pub to: Option<String>,
    /// gas limit, synonym of `gas_limit`
    #[serde(default)]
    pub gas: Option<Numeric>,
    /// gas limit
    #[serde(default)]
    pub gas_limit: Option<Numeric>,
    /// legacy gas price
    #[serde(default)]
    pub gas_price: Option<Numeric>,
    /// max base fee per gas the sender is willing to pay
    #[serde(default)]
    pub max_fee_per_gas: Option<Numeric>,
    /// miner tip
    #[serde(default)]
    pub max_priority_fee_per_gas: Option<Numeric>,
    /// max fee per blob gas, EIP-4844
    #[serde(default)]
    pub max_fee_per_blob_gas: Option<Numeric>,
    /// value of the tx in wei
    #[serde(default)]
    pub value: Option<Numeric>,
    /// transaction nonce
    #[serde(default)]
    pub nonce: Option<Numeric>,
    /// chain id
    #[serde(default)]
    pub chain_id: Option<Numeric>,
    /// call data, synonym of `input`
    #[serde(default)]
    pub data: Option<String>,
    /// call data
    #[serde(default)]
    pub input: Option<String>,
    /// warm storage access pre-payment
    #[serde(default)]
    pub access_list: Option<Vec<AccessListItem>>,
    /// versioned hashes of the blobs, EIP-4844
    #[serde(default)]
    pub blob_versioned_hashes: Option<Vec<String>>,
    /// blob data, direct array shape
    #[serde(default)]
    pub blobs: Option<Vec<String>>,
    /// blob commitments, direct array shape
    #[serde(default)]
    pub commitments: Option<Vec<String>>,
    /// blob proofs, direct array shape
    #[serde(default)]
    pub proofs: Option<Vec<String>>,
    /// blob data as a single sidecar object
    #[serde(default)]
    pub sidecar: Option<BlobSidecar>,
    /// blob data as one sidecar entry per blob
    #[serde(default)]
    pub sidecars: Option<Vec<SidecarEntry>>,
    /// EIP-7702 authorizations
    #[serde(default)]
    pub authorization_list: Option<Vec<AuthorizationRequest>>,
    /// EIP-2718 type
    #[serde(default, rename = "type")]
    pub transaction_type: Option<Numeric>,
}

impl TransactionRequest {
    /// Converts the request into a canonical [`TypedTransaction`].
    pub fn into_typed(self) -> Result<TypedTransaction, ParseError> {
        normalize(self)
    }
}

/// A single access list entry, passed through unchanged.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessListItem {
    pub address: String,
    #[serde(default)]
    pub storage_keys: Vec<String>,
}

/// Blob data transmitted alongside an EIP-4844 transaction.
///
/// The three arrays are aligned: `commitments[i]` and `proofs[i]` belong to
/// `blobs[i]`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlobSidecar {
    pub blobs: Vec<String>,
    pub commitments: Vec<String>,
    pub proofs: Vec<String>,
}

/// Per-blob sidecar shape: one blob with its commitment and proof.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SidecarEntry {
    pub blob: String,
    pub commitment: String,
    pub proof: String,
}

/// Container type for the canonical, type-tagged Ethereum transaction shapes
///
/// Its variants correspond to the five supported envelopes:
/// 1. Legacy (pre-EIP-2718) [`LegacyTransaction`]
/// 2. EIP-2930 (state access lists) [`Eip2930Transaction`]
/// 3. EIP-1559 (fee market) [`Eip1559Transaction`]
/// 4. EIP-4844 (blob carrying) [`Eip4844Transaction`]
/// 5. EIP-7702 (set code authorizations) [`Eip7702Transaction`]
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum TypedTransaction {
    #[serde(rename = "0x00")]
    Legacy(LegacyTransaction),
    #[serde(rename = "0x01")]
    Eip2930(Eip2930Transaction),
    #[serde(rename = "0x02")]
    Eip1559(Eip1559Transaction),
    #[serde(rename = "0x03")]
    Eip4844(Eip4844Transaction),
    #[serde(rename = "0x05")]
    Eip7702(Eip7702Transaction),
}

// == impl TypedTransaction ==

impl TypedTransaction {
    /// Returns the two-digit hex tag of this envelope.
    pub fn tx_type(&self) -> &'static str {
        match self {
            Self::Legacy(_) => "0x00",
            Self::Eip2930(_) => "0x01",
            Self::Eip1559(_) => "0x02",
            Self::Eip4844(_) => "0x03",
            Self::Eip7702(_) => "0x05",
        }
    }

    pub fn gas_limit(&self) -> &str {
        match self {
            Self::Legacy(tx) => &tx.gas_limit,
            Self::Eip2930(tx) => &tx.gas_limit,
            Self::Eip1559(tx) => &tx.gas_limit,
            Self::Eip4844(tx) => &tx.gas_limit,
            Self::Eip7702(tx) => &tx.gas_limit,
        }
    }

    pub fn nonce(&self) -> &str {
        match self {
            Self::Legacy(tx) => &tx.nonce,
            Self::Eip2930(tx) => &tx.nonce,
            Self::Eip1559(tx) => &tx.nonce,
            Self::Eip4844(tx) => &tx.nonce,
            Self::Eip7702(tx) => &tx.nonce,
        }
    }

    pub fn value(&self) -> &str {
        match self {
            Self::Legacy(tx) => &tx.value,
            Self::Eip2930(tx) => &tx.value,
            Self::Eip1559(tx) => &tx.value,
            Self::Eip4844(tx) => &tx.value,
            Self::Eip7702(tx) => &tx.value,
        }
    }

    pub fn input(&self) -> &str {
        match self {
            Self::Legacy(tx) => &tx.input,
            Self::Eip2930(tx) => &tx.input,
            Self::Eip1559(tx) => &tx.input,
            Self::Eip4844(tx) => &tx.input,
            Self::Eip7702(tx) => &tx.input,
        }
    }

    /// Returns the callee, `None` for contract creation.
    pub fn to(&self) -> Option<&str> {
        match self {
            Self::Legacy(tx) => tx.to.as_deref(),
            Self::Eip2930(tx) => tx.to.as_deref(),
            Self::Eip1559(tx) => tx.to.as_deref(),
            Self::Eip4844(tx) => Some(&tx.to),
            Self::Eip7702(tx) => Some(&tx.to),
        }
    }

    /// Returns the chain id, which only legacy transactions may omit.
    pub fn chain_id(&self) -> Option<&str> {
        match self {
            Self::Legacy(tx) => tx.chain_id.as_deref(),
            Self::Eip2930(tx) => Some(&tx.chain_id),
            Self::Eip1559(tx) => Some(&tx.chain_id),
            Self::Eip4844(tx) => Some(&tx.chain_id),
            Self::Eip7702(tx) => Some(&tx.chain_id),
        }
    }

    /// Returns the access list, `None` for legacy transactions.
    pub fn access_list(&self) -> Option<&[AccessListItem]> {
        match self {
            Self::Legacy(_) => None,
            Self::Eip2930(tx) => Some(&tx.access_list),
            Self::Eip1559(tx) => Some(&tx.access_list),
            Self::Eip4844(tx) => Some(&tx.access_list),
            Self::Eip7702(tx) => Some(&tx.access_list),
        }
    }
}

/// Legacy (pre-EIP-2718) transaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyTransaction {
    pub nonce: String,
    pub gas_price: String,
    pub gas_limit: String,
    pub to: Option<String>,
    pub value: String,
    pub input: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<String>,
}

/// EIP-2930 access list transaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Eip2930Transaction {
    pub chain_id: String,
    pub nonce: String,
    pub gas_price: String,
    pub gas_limit: String,
    pub to: Option<String>,
    pub value: String,
    pub input: String,
    pub access_list: Vec<AccessListItem>,
}

/// EIP-1559 fee market transaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Eip1559Transaction {
    pub chain_id: String,
    pub nonce: String,
    pub max_priority_fee_per_gas: String,
    pub max_fee_per_gas: String,
    pub gas_limit: String,
    pub to: Option<String>,
    pub value: String,
    pub input: String,
    pub access_list: Vec<AccessListItem>,
}

/// EIP-4844 blob transaction.
///
/// `to` is mandatory, blob transactions cannot create contracts. When blob
/// data was supplied with the request the aligned sidecar arrays are merged
/// into the serialized form.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Eip4844Transaction {
    pub chain_id: String,
    pub nonce: String,
    pub max_priority_fee_per_gas: String,
    pub max_fee_per_gas: String,
    pub gas_limit: String,
    pub to: String,
    pub value: String,
    pub input: String,
    pub access_list: Vec<AccessListItem>,
    pub max_fee_per_blob_gas: String,
    pub blob_versioned_hashes: Vec<String>,
    #[serde(flatten)]
    pub sidecar: Option<BlobSidecar>,
}

/// EIP-7702 set code transaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Eip7702Transaction {
    pub chain_id: String,
    pub nonce: String,
    pub max_priority_fee_per_gas: String,
    pub max_fee_per_gas: String,
    pub gas_limit: String,
    pub to: String,
    pub value: String,
    pub input: String,
    pub access_list: Vec<AccessListItem>,
    pub authorization_list: Vec<Authorization>,
}

/// Resolved transaction envelope.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TxType {
    Legacy,
    Eip2930,
    Eip1559,
    Eip4844,
    Eip7702,
}

/// Normalizes a raw transaction request into its canonical typed form.
///
/// The request's shared fields are canonicalized first, the envelope is then
/// resolved from the explicit `type` tag or the fields present, the matching
/// variant is assembled, and the result is re-validated before it is
/// returned.
pub fn normalize(request: TransactionRequest) -> Result<TypedTransaction, ParseError> {
    let common = CommonFields::extract(&request)?;
    let ty = resolve_type(&request)?;
    trace!(target: "tx::normalize", ?ty, "resolved transaction envelope");
    let tx = match ty {
        TxType::Legacy => build_legacy(&request, common)?,
        TxType::Eip2930 => build_eip2930(&request, common)?,
        TxType::Eip1559 => build_eip1559(&request, common)?,
        TxType::Eip4844 => build_eip4844(&request, common)?,
        TxType::Eip7702 => build_eip7702(&request, common)?,
    };
    validate(&tx)?;
    Ok(tx)
}

/// Normalizes a raw JSON transaction object.
///
/// Deserialization failures are reported as [`ParseError`] like every other
/// failure in this crate.
pub fn normalize_json(value: serde_json::Value) -> Result<TypedTransaction, ParseError> {
    let request: TransactionRequest = serde_json::from_value(value)
        .map_err(|err| ParseError::new(format!("Invalid transaction request: {err}")))?;
    normalize(request)
}

/// Envelope independent fields shared by every variant.
#[derive(Clone, Debug)]
struct CommonFields {
    gas_limit: String,
    input: String,
    nonce: String,
    value: String,
    to: Option<String>,
    access_list: Vec<AccessListItem>,
}

impl CommonFields {
    fn extract(request: &TransactionRequest) -> Result<Self, ParseError> {
        let gas_limit = request
            .gas_limit
            .as_ref()
            .or(request.gas.as_ref())
            .ok_or_else(|| ParseError::new("Gas limit not specified"))
            .and_then(to_quantity)?;

        let input = match (request.input.as_deref(), request.data.as_deref()) {
            (Some(input), Some(data)) => {
                if input != data && !(is_empty_bytes(input) && is_empty_bytes(data)) {
                    return Err(ParseError::new("Data and input fields do not match"));
                }
                input.to_string()
            }
            (Some(bytes), None) | (None, Some(bytes)) => bytes.to_string(),
            (None, None) => "0x".to_string(),
        };

        Ok(Self {
            gas_limit,
            input,
            nonce: quantity_or_zero(request.nonce.as_ref())?,
            value: quantity_or_zero(request.value.as_ref())?,
            to: request.to.clone(),
            access_list: request.access_list.clone().unwrap_or_default(),
        })
    }
}

fn is_empty_bytes(s: &str) -> bool {
    s.is_empty() || s == "0x"
}

/// Resolves the transaction envelope for a request.
///
/// An explicit `type` tag always wins. Otherwise the envelope is inferred
/// from the fields present, strongest signal first: blob fields, then the
/// authorization list, then the EIP-1559 fee pair, then access list plus
/// chain id, then legacy. An input carrying superset fields resolves to the
/// most recent envelope its strongest signal implies.
fn resolve_type(request: &TransactionRequest) -> Result<TxType, ParseError> {
    if let Some(tag) = &request.transaction_type {
        return resolve_type_tag(tag);
    }
    if request.blob_versioned_hashes.is_some()
        || request.blobs.is_some()
        || request.sidecar.is_some()
        || request.sidecars.is_some()
        || request.max_fee_per_blob_gas.is_some()
    {
        return Ok(TxType::Eip4844);
    }
    if request.authorization_list.is_some() {
        return Ok(TxType::Eip7702);
    }
    if request.max_fee_per_gas.is_some() && request.max_priority_fee_per_gas.is_some() {
        return Ok(TxType::Eip1559);
    }
    if request.access_list.is_some() && request.chain_id.is_some() {
        return Ok(TxType::Eip2930);
    }
    // chain id alone, or nothing: legacy, with the chain id carried through
    // by the builder when present
    Ok(TxType::Legacy)
}

fn resolve_type_tag(tag: &Numeric) -> Result<TxType, ParseError> {
    match to_u64(tag)? {
        0 => Ok(TxType::Legacy),
        1 => Ok(TxType::Eip2930),
        2 => Ok(TxType::Eip1559),
        3 => Ok(TxType::Eip4844),
        5 => Ok(TxType::Eip7702),
        other => Err(ParseError::new(format!("Unknown transaction type: 0x{other:02x}"))),
    }
}

fn build_legacy(
    request: &TransactionRequest,
    common: CommonFields,
) -> Result<TypedTransaction, ParseError> {
    let gas_price = required_quantity(request.gas_price.as_ref(), "gasPrice", "legacy")?;
    let chain_id = request.chain_id.as_ref().map(to_quantity).transpose()?;
    Ok(TypedTransaction::Legacy(LegacyTransaction {
        nonce: common.nonce,
        gas_price,
        gas_limit: common.gas_limit,
        to: common.to,
        value: common.value,
        input: common.input,
        chain_id,
    }))
}

fn build_eip2930(
    request: &TransactionRequest,
    common: CommonFields,
) -> Result<TypedTransaction, ParseError> {
    Ok(TypedTransaction::Eip2930(Eip2930Transaction {
        chain_id: required_quantity(request.chain_id.as_ref(), "chainId", "EIP-2930")?,
        nonce: common.nonce,
        gas_price: required_quantity(request.gas_price.as_ref(), "gasPrice", "EIP-2930")?,
        gas_limit: common.gas_limit,
        to: common.to,
        value: common.value,
        input: common.input,
        access_list: common.access_list,
    }))
}

fn build_eip1559(
    request: &TransactionRequest,
    common: CommonFields,
) -> Result<TypedTransaction, ParseError> {
    Ok(TypedTransaction::Eip1559(Eip1559Transaction {
        chain_id: required_quantity(request.chain_id.as_ref(), "chainId", "EIP-1559")?,
        nonce: common.nonce,
        max_priority_fee_per_gas: required_quantity(
            request.max_priority_fee_per_gas.as_ref(),
            "maxPriorityFeePerGas",
            "EIP-1559",
        )?,
        max_fee_per_gas: required_quantity(
            request.max_fee_per_gas.as_ref(),
            "maxFeePerGas",
            "EIP-1559",
        )?,
        gas_limit: common.gas_limit,
        to: common.to,
        value: common.value,
        input: common.input,
        access_list: common.access_list,
    }))
}

fn build_eip4844(
    request: &TransactionRequest,
    common: CommonFields,
) -> Result<TypedTransaction, ParseError> {
    // blob transactions cannot create contracts
    let to = common
        .to
        .ok_or_else(|| ParseError::new("to not specified for EIP-4844 transaction"))?;
    let blob_versioned_hashes = request
        .blob_versioned_hashes
        .clone()
        .ok_or_else(|| ParseError::new("blobVersionedHashes not specified for EIP-4844 transaction"))?;
    Ok(TypedTransaction::Eip4844(Eip4844Transaction {
        chain_id: required_quantity(request.chain_id.as_ref(), "chainId", "EIP-4844")?,
        nonce: common.nonce,
        max_priority_fee_per_gas: required_quantity(
            request.max_priority_fee_per_gas.as_ref(),
            "maxPriorityFeePerGas",
            "EIP-4844",
        )?,
        max_fee_per_gas: required_quantity(
            request.max_fee_per_gas.as_ref(),
            "maxFeePerGas",
            "EIP-4844",
        )?,
        gas_limit: common.gas_limit,
        to,
        value: common.value,
        input: common.input,
        access_list: common.access_list,
        max_fee_per_blob_gas: required_quantity(
            request.max_fee_per_blob_gas.as_ref(),
            "maxFeePerBlobGas",
            "EIP-4844",
        )?,
        blob_versioned_hashes,
        sidecar: extract_sidecar(request),
    }))
}

/// Collects blob sidecar data from any of the three accepted input shapes:
/// direct `blobs`/`commitments`/`proofs` arrays, a single `sidecar` object,
/// or a `sidecars` array with one entry per blob.
///
/// The arrays are only collected here; the validator asserts they are
/// non-empty and of equal length.
fn extract_sidecar(request: &TransactionRequest) -> Option<BlobSidecar> {
    if request.blobs.is_some() || request.commitments.is_some() || request.proofs.is_some() {
        return Some(BlobSidecar {
            blobs: request.blobs.clone().unwrap_or_default(),
            commitments: request.commitments.clone().unwrap_or_default(),
            proofs: request.proofs.clone().unwrap_or_default(),
        });
    }
    if let Some(sidecar) = &request.sidecar {
        return Some(sidecar.clone());
    }
    request.sidecars.as_ref().map(|entries| {
        let mut sidecar = BlobSidecar::default();
        for entry in entries {
            sidecar.blobs.push(entry.blob.clone());
            sidecar.commitments.push(entry.commitment.clone());
            sidecar.proofs.push(entry.proof.clone());
        }
        sidecar
    })
}

fn build_eip7702(
    request: &TransactionRequest,
    common: CommonFields,
) -> Result<TypedTransaction, ParseError> {
    // delegations need a target account
    let to = common
        .to
        .ok_or_else(|| ParseError::new("to not specified for EIP-7702 transaction"))?;
    let entries = request
        .authorization_list
        .as_ref()
        .ok_or_else(|| ParseError::new("authorizationList not specified for EIP-7702 transaction"))?;
    if entries.is_empty() {
        return Err(ParseError::new("authorizationList must not be empty for EIP-7702 transaction"));
    }
    let authorization_list = entries
        .iter()
        .enumerate()
        .map(|(index, entry)| authorization::normalize_authorization(entry, index))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(TypedTransaction::Eip7702(Eip7702Transaction {
        chain_id: required_quantity(request.chain_id.as_ref(), "chainId", "EIP-7702")?,
        nonce: common.nonce,
        max_priority_fee_per_gas: required_quantity(
            request.max_priority_fee_per_gas.as_ref(),
            "maxPriorityFeePerGas",
            "EIP-7702",
        )?,
        max_fee_per_gas: required_quantity(
            request.max_fee_per_gas.as_ref(),
            "maxFeePerGas",
            "EIP-7702",
        )?,
        gas_limit: common.gas_limit,
        to,
        value: common.value,
        input: common.input,
        access_list: common.access_list,
        authorization_list,
    }))
}

/// Re-asserts, from the assembled value alone, that the invariants of its
/// envelope hold.
///
/// This is a safety net over the builders rather than the primary
/// enforcement point: required fields must be non-empty, the sidecar arrays
/// of a blob transaction must be non-empty and aligned, and every
/// authorization of a set code transaction must carry a valid parity.
pub fn validate(tx: &TypedTransaction) -> Result<(), ParseError> {
    fn require(value: &str, field: &str, tx_type: &str) -> Result<(), ParseError> {
        if value.is_empty() {
            return Err(ParseError::new(format!(
                "{field} not specified for {tx_type} transaction"
            )));
        }
        Ok(())
    }

    match tx {
        TypedTransaction::Legacy(tx) => require(&tx.gas_price, "gasPrice", "legacy"),
        TypedTransaction::Eip2930(tx) => {
            require(&tx.chain_id, "chainId", "EIP-2930")?;
            require(&tx.gas_price, "gasPrice", "EIP-2930")
        }
        TypedTransaction::Eip1559(tx) => {
            require(&tx.chain_id, "chainId", "EIP-1559")?;
            require(&tx.max_fee_per_gas, "maxFeePerGas", "EIP-1559")?;
            require(&tx.max_priority_fee_per_gas, "maxPriorityFeePerGas", "EIP-1559")
        }
        TypedTransaction::Eip4844(tx) => {
            require(&tx.to, "to", "EIP-4844")?;
            require(&tx.chain_id, "chainId", "EIP-4844")?;
            require(&tx.max_fee_per_gas, "maxFeePerGas", "EIP-4844")?;
            require(&tx.max_priority_fee_per_gas, "maxPriorityFeePerGas", "EIP-4844")?;
            require(&tx.max_fee_per_blob_gas, "maxFeePerBlobGas", "EIP-4844")?;
            if let Some(sidecar) = &tx.sidecar {
                if sidecar.blobs.is_empty() {
                    return Err(ParseError::new("Blob sidecar must not be empty"));
                }
                if sidecar.blobs.len() != sidecar.commitments.len()
                    || sidecar.blobs.len() != sidecar.proofs.len()
                {
                    return Err(ParseError::new(
                        "Blob, commitment and proof counts do not match",
                    ));
                }
            }
            Ok(())
        }
        TypedTransaction::Eip7702(tx) => {
            require(&tx.to, "to", "EIP-7702")?;
            require(&tx.chain_id, "chainId", "EIP-7702")?;
            require(&tx.max_fee_per_gas, "maxFeePerGas", "EIP-7702")?;
            require(&tx.max_priority_fee_per_gas, "maxPriorityFeePerGas", "EIP-7702")?;
            if tx.authorization_list.is_empty() {
                return Err(ParseError::new(
                    "authorizationList must not be empty for EIP-7702 transaction",
                ));
            }
            for (index, auth) in tx.authorization_list.iter().enumerate() {
                if auth.y_parity != "0x0" && auth.y_parity != "0x1" {
                    return Err(ParseError::new(format!(
                        "Invalid yParity for authorization at index {index}"
                    )));
                }
            }
            Ok(())
        }
    }
}
