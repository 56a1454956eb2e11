//! # Core Codec Components
//!
//! The value model, the shared tag vocabulary, and the two pipelines built on
//! them.
//!
//! ## Components
//! - **Value**: dynamic object model with shared, identity-bearing containers
//! - **Tag**: one-byte type discriminators and integer width selection
//! - **Refs**: encode-side tracker and decode-side table of reference indices
//! - **Encoder / Decoder**: recursive value <-> bytes pipelines
//!
//! ## Wire Format
//! ```text
//! [Tag(1)] [Payload]
//! Payload of S, B, D, L starts with a tagged integer length/count;
//! R carries a tagged integer index. Multi-byte fields are little-endian.
//! ```
//!
//! ## Security
//! - Nesting depth is capped on both sides (default 512)
//! - Input size is capped before decoding (default 16MB)
//! - Every read is bounds-checked before bytes are consumed

pub mod decoder;
pub mod encoder;
pub mod refs;
pub mod tag;
pub mod value;
