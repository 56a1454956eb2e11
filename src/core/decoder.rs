//! # Decoder
//!
//! Reads a tagged byte sequence left to right and rebuilds the [`Value`] it
//! describes, resolving `R` tags against a [`RefTable`] filled in the same
//! order the encoder assigned indices.
//!
//! ## Security
//! - Every read is bounds-checked; over-reads fail with `TruncatedInput`
//! - Container nesting is capped by `max_depth`
//! - Declared counts never drive allocation beyond the bytes actually present
//! - A referenced string or byte string shares the storage of its first
//!   occurrence, so memory stays proportional to the input
//!
//! Input may reference a map or list from inside itself. The decoded graph
//! is then an `Rc` cycle that is not freed when dropped; long-running
//! callers decoding untrusted data should break cycles (for example by
//! clearing the containers) or reject such input.

use crate::config::CodecConfig;
use crate::core::refs::RefTable;
use crate::core::tag::{IntWidth, Tag};
use crate::core::value::Value;
use crate::error::{constants, BionError, Result};
use crate::utils::metrics::{global_metrics, Timer};
use bytes::Buf;
use indexmap::IndexMap;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::{debug, warn};

/// Reusable decoder holding a codec configuration
#[derive(Debug, Clone, Default)]
pub struct Decoder {
    config: CodecConfig,
}

impl Decoder {
    pub fn new(config: CodecConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Decode one value from the start of `data`
    ///
    /// # Errors
    /// - `BionError::UnrecognizedType` on an unknown tag byte
    /// - `BionError::TruncatedInput` when a field runs past the end of `data`
    /// - `BionError::InvalidEncoding` when a string payload is not UTF-8
    /// - `BionError::DanglingReference` when an `R` index is not registered yet
    /// - `BionError::InvalidLength` when a length prefix is not a non-negative integer
    /// - `BionError::NonStringKey` when a map key does not decode to a string
    /// - `BionError::DepthExceeded`, `BionError::InputTooLarge`,
    ///   `BionError::TrailingBytes` when a configured limit is hit
    pub fn decode(&self, data: &[u8]) -> Result<Value> {
        let _timer = Timer::start("decode");
        if data.len() > self.config.max_input_size {
            global_metrics().decode_error();
            return Err(BionError::InputTooLarge(data.len()));
        }

        let mut state = DecodeState {
            input: data,
            refs: RefTable::new(),
            max_depth: self.config.max_depth,
        };

        let result = state.read_value(0).and_then(|value| {
            if self.config.reject_trailing_bytes && state.input.has_remaining() {
                return Err(BionError::TrailingBytes(state.input.remaining()));
            }
            Ok(value)
        });

        match result {
            Ok(value) => {
                debug!(
                    bytes = data.len(),
                    trailing = state.input.remaining(),
                    registered = state.refs.len(),
                    "Decoded value"
                );
                global_metrics().decode_success(data.len() as u64);
                Ok(value)
            }
            Err(e) => {
                warn!(
                    error = %e,
                    offset = data.len() - state.input.remaining(),
                    "Decode failed"
                );
                global_metrics().decode_error();
                Err(e)
            }
        }
    }
}

/// Per-call decoder state; the reference table dies with it
struct DecodeState<'a> {
    input: &'a [u8],
    refs: RefTable,
    max_depth: usize,
}

impl<'a> DecodeState<'a> {
    fn read_value(&mut self, depth: usize) -> Result<Value> {
        match self.read_tag()? {
            Tag::Null => Ok(Value::Null),
            Tag::Float => {
                self.need(8)?;
                Ok(Value::Float(self.input.get_f64_le()))
            }
            Tag::Int8 => self.read_int(IntWidth::I8).map(Value::Int),
            Tag::Int16 => self.read_int(IntWidth::I16).map(Value::Int),
            Tag::Int32 => self.read_int(IntWidth::I32).map(Value::Int),
            Tag::Int64 => self.read_int(IntWidth::I64).map(Value::Int),
            Tag::Str => {
                let raw = self.read_payload()?;
                let s: Rc<str> = Rc::from(std::str::from_utf8(raw)?);
                self.refs.push(Value::Str(Rc::clone(&s)));
                Ok(Value::Str(s))
            }
            Tag::Bytes => {
                let raw: Rc<[u8]> = Rc::from(self.read_payload()?);
                self.refs.push(Value::Bytes(Rc::clone(&raw)));
                Ok(Value::Bytes(raw))
            }
            Tag::Dict => {
                let count = self.read_len()?;
                let depth = self.descend(depth)?;
                // each entry takes at least two bytes
                let map = Rc::new(RefCell::new(IndexMap::with_capacity(
                    count.min(self.input.remaining() / 2),
                )));
                // registered before the entries so they can refer back to it
                self.refs.push(Value::Map(Rc::clone(&map)));
                for _ in 0..count {
                    let key = match self.read_value(depth)? {
                        Value::Str(s) => s,
                        other => {
                            return Err(BionError::NonStringKey(other.type_name().to_string()))
                        }
                    };
                    let item = self.read_value(depth)?;
                    map.borrow_mut().insert(key, item);
                }
                Ok(Value::Map(map))
            }
            Tag::List => {
                let count = self.read_len()?;
                let depth = self.descend(depth)?;
                let list = Rc::new(RefCell::new(Vec::with_capacity(
                    count.min(self.input.remaining()),
                )));
                self.refs.push(Value::List(Rc::clone(&list)));
                for _ in 0..count {
                    let item = self.read_value(depth)?;
                    list.borrow_mut().push(item);
                }
                Ok(Value::List(list))
            }
            Tag::Ref => {
                let index = self.read_prefix(constants::ERR_INDEX_NOT_INT)?;
                self.refs.get(index)
            }
        }
    }

    fn descend(&self, depth: usize) -> Result<usize> {
        let depth = depth + 1;
        if depth > self.max_depth {
            return Err(BionError::DepthExceeded(self.max_depth));
        }
        Ok(depth)
    }

    fn need(&self, n: usize) -> Result<()> {
        if self.input.remaining() < n {
            return Err(BionError::TruncatedInput {
                needed: n,
                available: self.input.remaining(),
            });
        }
        Ok(())
    }

    fn read_tag(&mut self) -> Result<Tag> {
        self.need(1)?;
        let byte = self.input.get_u8();
        Tag::from_byte(byte).ok_or(BionError::UnrecognizedType(byte))
    }

    fn read_int(&mut self, width: IntWidth) -> Result<i64> {
        self.need(width.size())?;
        Ok(match width {
            IntWidth::I8 => i64::from(self.input.get_i8()),
            IntWidth::I16 => i64::from(self.input.get_i16_le()),
            IntWidth::I32 => i64::from(self.input.get_i32_le()),
            IntWidth::I64 => self.input.get_i64_le(),
        })
    }

    /// Read a length, count or index prefix.
    ///
    /// Prefixes are ordinary tagged values; any tag other than an integer
    /// width is rejected before its payload is read.
    fn read_prefix(&mut self, what: &str) -> Result<i64> {
        let tag = self.read_tag()?;
        match IntWidth::from_tag(tag) {
            Some(width) => self.read_int(width),
            None => Err(BionError::InvalidLength(format!("{what}: found {}", tag.name()))),
        }
    }

    fn read_len(&mut self) -> Result<usize> {
        let n = self.read_prefix(constants::ERR_LENGTH_NOT_INT)?;
        usize::try_from(n).map_err(|_| {
            BionError::InvalidLength(format!("{}: {n}", constants::ERR_LENGTH_NEGATIVE))
        })
    }

    fn read_payload(&mut self) -> Result<&'a [u8]> {
        let len = self.read_len()?;
        self.need(len)?;
        let (raw, rest) = self.input.split_at(len);
        self.input = rest;
        Ok(raw)
    }
}

/// Decode a value with the default configuration
pub fn decode(data: &[u8]) -> Result<Value> {
    Decoder::default().decode(data)
}
