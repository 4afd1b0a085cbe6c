pub mod error;
pub mod serde_helpers;
pub mod transaction;
pub mod utils;
