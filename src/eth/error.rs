//! Error type for transaction normalization

/// The single error kind surfaced by this crate.
///
/// Every failure mode of normalization, from an unparseable numeric field to
/// a missing required field for the resolved envelope, is reported as a
/// `ParseError` carrying a human readable message. There are no partial
/// results: normalization either fully succeeds or fails with this error.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct ParseError(String);

impl ParseError {
    pub(crate) fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// The message describing the failure.
    pub fn message(&self) -> &str {
        &self.0
    }
}
