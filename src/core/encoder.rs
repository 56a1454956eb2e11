//! # Encoder
//!
//! Walks a [`Value`] depth-first and appends its tagged byte form to a buffer.
//! Every value is first offered to a [`RefTracker`]; values seen before are
//! written as `R` followed by their reference index.

use crate::config::CodecConfig;
use crate::core::refs::RefTracker;
use crate::core::tag::{IntWidth, IntWidthStrategy, Tag};
use crate::core::value::Value;
use crate::error::{BionError, Result};
use crate::utils::metrics::{global_metrics, Timer};
use bytes::BufMut;
use tracing::{debug, trace};

/// Reusable encoder holding a codec configuration
#[derive(Debug, Clone, Default)]
pub struct Encoder {
    config: CodecConfig,
}

impl Encoder {
    pub fn new(config: CodecConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Encode a value into a new buffer
    ///
    /// # Errors
    /// - `BionError::DepthExceeded` if maps/lists nest deeper than `max_depth`
    /// - `BionError::UnsupportedType` if a length does not fit the wire integer
    pub fn encode(&self, value: &Value) -> Result<Vec<u8>> {
        let _timer = Timer::start("encode");
        let mut state = EncodeState {
            out: Vec::new(),
            refs: RefTracker::new(),
            strategy: self.config.int_width,
            max_depth: self.config.max_depth,
            ref_hits: 0,
        };

        match state.write_value(value, 0) {
            Ok(()) => {
                debug!(
                    bytes = state.out.len(),
                    registered = state.refs.len(),
                    ref_hits = state.ref_hits,
                    "Encoded value"
                );
                global_metrics().encode_success(state.out.len() as u64, state.ref_hits as u64);
                Ok(state.out)
            }
            Err(e) => {
                debug!(error = %e, "Encode failed");
                global_metrics().encode_error();
                Err(e)
            }
        }
    }

    /// Encode a value and append it to `buf`.
    ///
    /// Nothing is written when encoding fails.
    pub fn encode_into<B: BufMut>(&self, value: &Value, buf: &mut B) -> Result<()> {
        let bytes = self.encode(value)?;
        buf.put_slice(&bytes);
        Ok(())
    }
}

/// Per-call encoder state; dropped when the call returns
struct EncodeState {
    out: Vec<u8>,
    refs: RefTracker,
    strategy: IntWidthStrategy,
    max_depth: usize,
    ref_hits: usize,
}

impl EncodeState {
    fn write_value(&mut self, value: &Value, depth: usize) -> Result<()> {
        if let Some(index) = self.refs.check(value) {
            trace!(index, kind = value.type_name(), "Reference hit");
            self.ref_hits += 1;
            self.out.put_u8(Tag::Ref.byte());
            return self.write_len(index);
        }

        match value {
            Value::Null => self.out.put_u8(Tag::Null.byte()),
            Value::Float(f) => {
                self.out.put_u8(Tag::Float.byte());
                self.out.put_f64_le(*f);
            }
            Value::Int(n) => self.write_int(*n),
            Value::Str(s) => {
                self.out.put_u8(Tag::Str.byte());
                self.write_len(s.len())?;
                self.out.put_slice(s.as_bytes());
            }
            Value::Bytes(b) => {
                self.out.put_u8(Tag::Bytes.byte());
                self.write_len(b.len())?;
                self.out.put_slice(b);
            }
            Value::Map(map) => {
                let depth = self.descend(depth)?;
                let map = map.borrow();
                self.out.put_u8(Tag::Dict.byte());
                self.write_len(map.len())?;
                for (key, item) in map.iter() {
                    // keys share the string dedup path
                    self.write_value(&Value::Str(key.clone()), depth)?;
                    self.write_value(item, depth)?;
                }
            }
            Value::List(list) => {
                let depth = self.descend(depth)?;
                let list = list.borrow();
                self.out.put_u8(Tag::List.byte());
                self.write_len(list.len())?;
                for item in list.iter() {
                    self.write_value(item, depth)?;
                }
            }
        }
        Ok(())
    }

    fn descend(&self, depth: usize) -> Result<usize> {
        let depth = depth + 1;
        if depth > self.max_depth {
            return Err(BionError::DepthExceeded(self.max_depth));
        }
        Ok(depth)
    }

    /// Lengths, counts and reference indices use the ordinary integer
    /// encoding, widened where needed so they are never truncated
    fn write_len(&mut self, len: usize) -> Result<()> {
        let n = i64::try_from(len)
            .map_err(|_| BionError::UnsupportedType(format!("length {len} exceeds int64")))?;
        self.put_int(self.strategy.select_prefix(n), n);
        Ok(())
    }

    fn write_int(&mut self, n: i64) {
        self.put_int(self.strategy.select(n), n);
    }

    /// Width tag plus the value truncated to that width, two's complement
    fn put_int(&mut self, width: IntWidth, n: i64) {
        self.out.put_u8(width.tag().byte());
        match width {
            IntWidth::I8 => self.out.put_i8(n as i8),
            IntWidth::I16 => self.out.put_i16_le(n as i16),
            IntWidth::I32 => self.out.put_i32_le(n as i32),
            IntWidth::I64 => self.out.put_i64_le(n),
        }
    }
}

/// Encode a value with the default configuration
pub fn encode(value: &Value) -> Result<Vec<u8>> {
    Encoder::default().encode(value)
}
