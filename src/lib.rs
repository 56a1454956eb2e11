//! # BION
//!
//! Binary serialization codec for a dynamic, JSON-like object model: null,
//! 64-bit floats, variable-width signed integers, UTF-8 strings, byte strings,
//! ordered string-keyed maps and ordered lists.
//!
//! Repeated strings and byte strings are written once and referenced by index
//! afterwards; maps and lists are referenced by identity, which also makes
//! self-referential structures encodable.
//!
//! ## Usage
//! ```rust
//! use bion::Value;
//!
//! let value = Value::map_from([
//!     ("a", Value::Int(1)),
//!     ("b", Value::list_from([Value::Int(1), Value::Int(2), Value::Int(3)])),
//! ]);
//!
//! let bytes = bion::encode(&value).unwrap();
//! let decoded = bion::decode(&bytes).unwrap();
//! assert_eq!(decoded, value);
//! ```
//!
//! ## Modules
//! - [`core`]: value model, tags, reference registry, encoder and decoder
//! - [`interop`]: serde and JSON bridges
//! - [`config`]: codec limits and integer width strategy
//! - [`error`]: error taxonomy
//! - [`utils`]: metrics

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

pub mod config;
pub mod core;
pub mod error;
pub mod interop;
pub mod utils;

pub use crate::config::CodecConfig;
pub use crate::core::decoder::{decode, Decoder};
pub use crate::core::encoder::{encode, Encoder};
pub use crate::core::refs::{RefTable, RefTracker};
pub use crate::core::tag::{IntWidth, IntWidthStrategy, Tag};
pub use crate::core::value::{ListRef, MapRef, Value};
pub use crate::error::{BionError, Result};
pub use crate::interop::de::{from_value, from_value_with};
pub use crate::interop::json::{from_json, to_json};
pub use crate::interop::ser::to_value;
pub use crate::interop::{from_bytes, to_bytes};
