//! # tx-normalizer
//!
//! Canonical typed Ethereum transactions and the normalization of loosely
//! typed transaction requests into them.
//!
//! Callers hand over a [`TransactionRequest`] in which every field is
//! optional, numbers may be plain integers, decimal strings or hex strings,
//! and several fields have accepted synonyms (`gas`/`gasLimit`,
//! `data`/`input`). [`normalize`] turns such a request into exactly one of
//! the five supported transaction envelopes, or fails with a single
//! descriptive [`ParseError`].

#![cfg_attr(not(test), warn(unused_crate_dependencies))]

/// Various Ethereum types
pub mod eth;

pub use eth::{
    error::ParseError,
    transaction::{
        normalize, normalize_json, validate, AccessListItem, Authorization, AuthorizationRequest,
        BlobSidecar, Eip1559Transaction, Eip2930Transaction, Eip4844Transaction,
        Eip7702Transaction, LegacyTransaction, SidecarEntry, TransactionRequest, TypedTransaction,
    },
};
