//! integration tests for transaction normalization

mod normalize;
