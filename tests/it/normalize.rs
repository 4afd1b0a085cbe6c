//! end to end tests for [`tx_normalizer::normalize`]

use serde_json::json;
use similar_asserts::assert_eq;
use tx_normalizer::{normalize_json, TypedTransaction};

const TO: &str = "0x70997970c51812dc3a010c7d01b50e0d17dc79c8";

#[test]
fn gas_and_gas_limit_normalize_identically() {
    let via_gas = normalize_json(json!({ "gas": 21000, "gasPrice": 10, "to": TO })).unwrap();
    let via_gas_limit =
        normalize_json(json!({ "gasLimit": 21000, "gasPrice": 10, "to": TO })).unwrap();
    assert_eq!(via_gas, via_gas_limit);
    assert_eq!(via_gas.gas_limit(), "0x5208");
}

#[test]
fn data_and_input_normalize_identically() {
    let via_data =
        normalize_json(json!({ "gas": 21000, "gasPrice": 10, "to": TO, "data": "0x1234" }))
            .unwrap();
    let via_input =
        normalize_json(json!({ "gas": 21000, "gasPrice": 10, "to": TO, "input": "0x1234" }))
            .unwrap();
    assert_eq!(via_data, via_input);
    assert_eq!(via_data.input(), "0x1234");
}

#[test]
fn mismatched_data_and_input_are_rejected() {
    let err = normalize_json(
        json!({ "gas": 21000, "gasPrice": 10, "to": TO, "data": "0x1234", "input": "0x5678" }),
    )
    .unwrap_err();
    assert_eq!(err.message(), "Data and input fields do not match");
}

#[test]
fn fee_market_fields_outrank_access_list_shape() {
    // carries both the EIP-1559 fee pair and the EIP-2930 signals
    let tx = normalize_json(json!({
        "gas": 21000,
        "to": TO,
        "chainId": 1,
        "accessList": [{ "address": TO, "storageKeys": [] }],
        "maxFeePerGas": 100,
        "maxPriorityFeePerGas": 1,
    }))
    .unwrap();
    assert!(matches!(tx, TypedTransaction::Eip1559(_)));
    assert_eq!(tx.tx_type(), "0x02");
}

#[test]
fn missing_required_field_for_declared_type_is_rejected() {
    let err = normalize_json(json!({
        "type": "0x02",
        "gas": 21000,
        "to": TO,
        "chainId": 1,
        "maxFeePerGas": 100,
    }))
    .unwrap_err();
    assert_eq!(err.message(), "maxPriorityFeePerGas not specified for EIP-1559 transaction");
}

#[test]
fn quantities_are_canonicalized_through_hex() {
    let tx = normalize_json(json!({
        "gas": 21000,
        "gasPrice": 10,
        "to": TO,
        "value": "1000000000000000000",
    }))
    .unwrap();
    assert_eq!(tx.value(), "0xde0b6b3a7640000");

    let tx = normalize_json(json!({ "gas": 21000, "gasPrice": 10, "to": TO, "value": 0 }))
        .unwrap();
    assert_eq!(tx.value(), "0x0");
}

#[test]
fn hex_quantities_pass_through_unchanged() {
    let tx = normalize_json(json!({ "gas": "0x5208", "gasPrice": "0x0A", "to": TO })).unwrap();
    let TypedTransaction::Legacy(tx) = tx else { panic!("expected legacy") };
    assert_eq!(tx.gas_limit, "0x5208");
    // caller supplied casing and padding is preserved
    assert_eq!(tx.gas_price, "0x0A");
}

#[test]
fn sidecar_entries_are_flattened_into_aligned_arrays() {
    let tx = normalize_json(json!({
        "gas": 21000,
        "to": TO,
        "chainId": 1,
        "maxFeePerGas": 100,
        "maxPriorityFeePerGas": 1,
        "maxFeePerBlobGas": 1,
        "blobVersionedHashes": ["0x01", "0x02"],
        "sidecars": [
            { "blob": "0xa", "commitment": "0xb", "proof": "0xc" },
            { "blob": "0xd", "commitment": "0xe", "proof": "0xf" },
        ],
    }))
    .unwrap();
    let TypedTransaction::Eip4844(tx) = tx else { panic!("expected EIP-4844") };
    let sidecar = tx.sidecar.expect("sidecar data was supplied");
    assert_eq!(sidecar.blobs, vec!["0xa", "0xd"]);
    assert_eq!(sidecar.commitments, vec!["0xb", "0xe"]);
    assert_eq!(sidecar.proofs, vec!["0xc", "0xf"]);
}

#[test]
fn misaligned_sidecar_arrays_are_rejected() {
    let err = normalize_json(json!({
        "gas": 21000,
        "to": TO,
        "chainId": 1,
        "maxFeePerGas": 100,
        "maxPriorityFeePerGas": 1,
        "maxFeePerBlobGas": 1,
        "blobVersionedHashes": ["0x01", "0x02"],
        "blobs": ["0xa", "0xd"],
        "commitments": ["0xb", "0xe"],
        "proofs": ["0xc"],
    }))
    .unwrap_err();
    assert_eq!(err.message(), "Blob, commitment and proof counts do not match");
}

#[test]
fn blob_transactions_cannot_create_contracts() {
    let err = normalize_json(json!({
        "gas": 21000,
        "chainId": 1,
        "maxFeePerGas": 100,
        "maxPriorityFeePerGas": 1,
        "maxFeePerBlobGas": 1,
        "blobVersionedHashes": ["0x01"],
    }))
    .unwrap_err();
    assert_eq!(err.message(), "to not specified for EIP-4844 transaction");
}

#[test]
fn legacy_contract_creation_keeps_null_to() {
    let tx = normalize_json(json!({
        "gas": 53000,
        "gasPrice": 10,
        "to": null,
        "data": "0x6080",
    }))
    .unwrap();
    assert_eq!(tx.to(), None);
    assert_eq!(serde_json::to_value(&tx).unwrap()["to"], serde_json::Value::Null);
}

#[test]
fn authorization_parity_is_derived_from_v() {
    let tx = normalize_json(json!({
        "gas": 21000,
        "to": TO,
        "chainId": 1,
        "maxFeePerGas": 100,
        "maxPriorityFeePerGas": 1,
        "authorizationList": [
            { "address": TO, "chainId": 1, "r": "0x1", "s": "0x2", "v": 27 },
            { "address": TO, "chainId": 1, "r": "0x3", "s": "0x4", "v": 28 },
        ],
    }))
    .unwrap();
    let TypedTransaction::Eip7702(tx) = tx else { panic!("expected EIP-7702") };
    assert_eq!(tx.authorization_list[0].y_parity, "0x0");
    assert_eq!(tx.authorization_list[1].y_parity, "0x1");
}

#[test]
fn authorization_without_parity_names_its_index() {
    let err = normalize_json(json!({
        "gas": 21000,
        "to": TO,
        "chainId": 1,
        "maxFeePerGas": 100,
        "maxPriorityFeePerGas": 1,
        "authorizationList": [
            { "address": TO, "chainId": 1, "r": "0x1", "s": "0x2", "yParity": 0 },
            { "address": TO, "chainId": 1, "r": "0x3", "s": "0x4" },
        ],
    }))
    .unwrap_err();
    assert_eq!(err.message(), "Missing yParity or v for authorization at index 1");
}

#[test]
fn set_code_transactions_require_a_target_account() {
    let err = normalize_json(json!({
        "gas": 21000,
        "chainId": 1,
        "maxFeePerGas": 100,
        "maxPriorityFeePerGas": 1,
        "authorizationList": [
            { "address": TO, "chainId": 1, "r": "0x1", "s": "0x2", "yParity": 0 },
        ],
    }))
    .unwrap_err();
    assert_eq!(err.message(), "to not specified for EIP-7702 transaction");
}

#[test]
fn empty_authorization_list_is_rejected() {
    let err = normalize_json(json!({
        "gas": 21000,
        "to": TO,
        "chainId": 1,
        "maxFeePerGas": 100,
        "maxPriorityFeePerGas": 1,
        "authorizationList": [],
    }))
    .unwrap_err();
    assert_eq!(err.message(), "authorizationList must not be empty for EIP-7702 transaction");
}

#[test]
fn unknown_explicit_type_tag_is_rejected() {
    let err = normalize_json(json!({ "type": "0x04", "gas": 21000, "to": TO })).unwrap_err();
    assert_eq!(err.message(), "Unknown transaction type: 0x04");

    let err = normalize_json(json!({ "type": 126, "gas": 21000, "to": TO })).unwrap_err();
    assert_eq!(err.message(), "Unknown transaction type: 0x7e");
}

#[test]
fn legacy_chain_id_is_optional_and_carried_through() {
    let tx = normalize_json(json!({ "gas": 21000, "gasPrice": 10, "to": TO })).unwrap();
    assert_eq!(tx.chain_id(), None);

    let tx = normalize_json(json!({ "gas": 21000, "gasPrice": 10, "to": TO, "chainId": 1 }))
        .unwrap();
    assert_eq!(tx.chain_id(), Some("0x1"));
}

#[test]
fn normalizing_canonical_output_is_idempotent() {
    let first = normalize_json(json!({
        "gas": 21000,
        "gasPrice": 10,
        "to": TO,
        "value": "1000000000000000000",
        "nonce": 7,
    }))
    .unwrap();
    let second = normalize_json(serde_json::to_value(&first).unwrap()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn normalizing_canonical_blob_output_is_idempotent() {
    let first = normalize_json(json!({
        "gas": 21000,
        "to": TO,
        "chainId": 1,
        "maxFeePerGas": 100,
        "maxPriorityFeePerGas": 1,
        "maxFeePerBlobGas": 1,
        "blobVersionedHashes": ["0x01"],
        "sidecar": { "blobs": ["0xa"], "commitments": ["0xb"], "proofs": ["0xc"] },
    }))
    .unwrap();
    let second = normalize_json(serde_json::to_value(&first).unwrap()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn normalizing_canonical_set_code_output_is_idempotent() {
    let first = normalize_json(json!({
        "gas": 21000,
        "to": TO,
        "chainId": 1,
        "maxFeePerGas": 100,
        "maxPriorityFeePerGas": 1,
        "authorizationList": [
            { "address": TO, "chainId": 1, "nonce": 0, "r": "0x1", "s": "0x2", "v": 27 },
        ],
    }))
    .unwrap();
    let second = normalize_json(serde_json::to_value(&first).unwrap()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn malformed_requests_surface_as_parse_errors() {
    let err = normalize_json(json!({ "gas": 21000, "gasPrice": 10, "to": TO, "value": "wei" }))
        .unwrap_err();
    assert_eq!(err.message(), "Invalid numeric value: wei");

    let err = normalize_json(json!("not an object")).unwrap_err();
    assert!(err.message().starts_with("Invalid transaction request:"));
}
