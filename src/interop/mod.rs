//! # Serde Interop
//!
//! Bridges between typed Rust data and the dynamic [`Value`] model.
//!
//! ## Components
//! - **ser**: `to_value` builds a `Value` from any `Serialize` type
//! - **de**: `from_value` reads any `DeserializeOwned` type out of a `Value`
//! - **json**: conversion to and from `serde_json::Value`
//!
//! ## Usage
//! ```rust
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct Point {
//!     x: i32,
//!     y: i32,
//! }
//!
//! let bytes = bion::to_bytes(&Point { x: 1, y: 2 }).unwrap();
//! let back: Point = bion::from_bytes(&bytes).unwrap();
//! assert_eq!(back, Point { x: 1, y: 2 });
//! ```

pub mod de;
pub mod json;
pub mod ser;

use crate::config::CodecConfig;
use crate::core::decoder::decode;
use crate::core::encoder::Encoder;
use crate::core::tag::IntWidthStrategy;
use crate::core::value::Value;
use crate::error::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Serialize a typed value straight to BION bytes.
///
/// Integers are written with [`IntWidthStrategy::Minimal`] so typed fields
/// never lose bits; any BION decoder reads the result.
pub fn to_bytes<T: ?Sized + Serialize>(value: &T) -> Result<Vec<u8>> {
    let config = CodecConfig::default_with_overrides(|c| c.int_width = IntWidthStrategy::Minimal);
    Encoder::new(config).encode(&ser::to_value(value)?)
}

/// Decode BION bytes straight into a typed value
pub fn from_bytes<T: DeserializeOwned>(data: &[u8]) -> Result<T> {
    let value: Value = decode(data)?;
    de::from_value(&value)
}
