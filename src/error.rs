//! # Error Types
//!
//! Error handling for the BION codec.
//!
//! Every failure is terminal for the `encode`/`decode` call that produced it:
//! there are no partial results and nothing is retried internally.
//!
//! ## Error Categories
//! - **Encode errors**: values outside the object model, non-string map keys
//! - **Decode errors**: unknown tags, truncated buffers, malformed UTF-8,
//!   dangling references, malformed lengths
//! - **Limit errors**: nesting depth and input size guards
//! - **Configuration errors**: invalid or unreadable codec configuration
//!
//! ## Example Usage
//! ```rust
//! use bion::error::BionError;
//! use tracing::error;
//!
//! match bion::decode(&[0xFF]) {
//!     Err(BionError::UnrecognizedType(tag)) => assert_eq!(tag, 0xFF),
//!     Err(e) => error!(error = %e, "unexpected failure"),
//!     Ok(_) => unreachable!(),
//! }
//! ```

use std::fmt::Display;
use std::str::Utf8Error;
use thiserror::Error;

/// Error message constants to reduce allocations in error paths.
pub mod constants {
    /// Encode-side messages
    pub const ERR_INT_OUT_OF_RANGE: &str = "integer does not fit in a signed 64-bit value";
    pub const ERR_NON_FINITE_FLOAT: &str = "non-finite float has no JSON representation";
    pub const ERR_CYCLIC_VALUE: &str = "cyclic value cannot be represented without references";

    /// Decode-side messages
    pub const ERR_LENGTH_NOT_INT: &str = "length prefix is not an integer";
    pub const ERR_LENGTH_NEGATIVE: &str = "length prefix is negative";
    pub const ERR_INDEX_NOT_INT: &str = "reference index is not an integer";

    /// Configuration messages
    pub const ERR_CONFIG_OPEN: &str = "Failed to open config file";
    pub const ERR_CONFIG_PARSE: &str = "Failed to parse TOML";
}

/// BionError is the single error type for all codec operations
#[derive(Error, Debug)]
pub enum BionError {
    #[error("Unsupported type: {0}")]
    UnsupportedType(String),

    #[error("Map keys must be strings, found {0}")]
    NonStringKey(String),

    #[error("Unrecognized type tag: {0:#04x}")]
    UnrecognizedType(u8),

    #[error("Truncated input: needed {needed} bytes, {available} available")]
    TruncatedInput { needed: usize, available: usize },

    #[error("Invalid UTF-8 in string payload: {0}")]
    InvalidEncoding(#[from] Utf8Error),

    #[error("Dangling reference: index {index} with {len} registered values")]
    DanglingReference { index: i64, len: usize },

    #[error("Invalid length: {0}")]
    InvalidLength(String),

    #[error("Nesting depth exceeds limit of {0}")]
    DepthExceeded(usize),

    #[error("Input too large: {0} bytes")]
    InputTooLarge(usize),

    #[error("Trailing bytes after value: {0}")]
    TrailingBytes(usize),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Custom error: {0}")]
    Custom(String),
}

impl BionError {
    /// True for failures that can only arise while decoding a buffer
    pub fn is_decode_error(&self) -> bool {
        matches!(
            self,
            BionError::UnrecognizedType(_)
                | BionError::TruncatedInput { .. }
                | BionError::InvalidEncoding(_)
                | BionError::DanglingReference { .. }
                | BionError::InvalidLength(_)
                | BionError::InputTooLarge(_)
                | BionError::TrailingBytes(_)
        )
    }

    /// True for failures that can only arise while encoding a value
    pub fn is_encode_error(&self) -> bool {
        matches!(self, BionError::UnsupportedType(_))
    }
}

impl serde::ser::Error for BionError {
    fn custom<T: Display>(msg: T) -> Self {
        BionError::Custom(msg.to_string())
    }
}

impl serde::de::Error for BionError {
    fn custom<T: Display>(msg: T) -> Self {
        BionError::Custom(msg.to_string())
    }
}

/// Type alias for Results using BionError
pub type Result<T> = std::result::Result<T, BionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            BionError::UnrecognizedType(0xFF).to_string(),
            "Unrecognized type tag: 0xff"
        );
        let err = BionError::TruncatedInput {
            needed: 8,
            available: 3,
        };
        assert_eq!(
            err.to_string(),
            "Truncated input: needed 8 bytes, 3 available"
        );
    }

    #[test]
    fn test_error_classification() {
        assert!(BionError::DanglingReference { index: 4, len: 1 }.is_decode_error());
        assert!(!BionError::DanglingReference { index: 4, len: 1 }.is_encode_error());
        assert!(BionError::UnsupportedType("bool".into()).is_encode_error());
        // key checks run on both sides of the codec
        assert!(!BionError::NonStringKey("int".into()).is_decode_error());
        assert!(!BionError::NonStringKey("int".into()).is_encode_error());
    }
}
