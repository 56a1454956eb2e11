//! # Type Tags
//!
//! One-byte discriminators shared by the encoder and decoder, and the rule
//! that picks the width tag for an integer.
//!
//! ## Wire Tags
//! ```text
//! \0 null    f float64   b int8   h int16   l int32   q int64
//! S  string  B bytes     D map    L list    R reference
//! ```

use serde::{Deserialize, Serialize};

/// Wire tag preceding every encoded value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    Null,
    Float,
    Int8,
    Int16,
    Int32,
    Int64,
    Str,
    Bytes,
    Dict,
    List,
    Ref,
}

impl Tag {
    /// Get the tag byte written to the wire
    pub fn byte(self) -> u8 {
        match self {
            Tag::Null => b'\0',
            Tag::Float => b'f',
            Tag::Int8 => b'b',
            Tag::Int16 => b'h',
            Tag::Int32 => b'l',
            Tag::Int64 => b'q',
            Tag::Str => b'S',
            Tag::Bytes => b'B',
            Tag::Dict => b'D',
            Tag::List => b'L',
            Tag::Ref => b'R',
        }
    }

    /// Detect tag from wire byte
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            b'\0' => Some(Tag::Null),
            b'f' => Some(Tag::Float),
            b'b' => Some(Tag::Int8),
            b'h' => Some(Tag::Int16),
            b'l' => Some(Tag::Int32),
            b'q' => Some(Tag::Int64),
            b'S' => Some(Tag::Str),
            b'B' => Some(Tag::Bytes),
            b'D' => Some(Tag::Dict),
            b'L' => Some(Tag::List),
            b'R' => Some(Tag::Ref),
            _ => None,
        }
    }

    /// Get human-readable name
    pub fn name(self) -> &'static str {
        match self {
            Tag::Null => "null",
            Tag::Float => "float64",
            Tag::Int8 => "int8",
            Tag::Int16 => "int16",
            Tag::Int32 => "int32",
            Tag::Int64 => "int64",
            Tag::Str => "string",
            Tag::Bytes => "bytes",
            Tag::Dict => "map",
            Tag::List => "list",
            Tag::Ref => "reference",
        }
    }
}

/// Byte width of an encoded integer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntWidth {
    I8,
    I16,
    I32,
    I64,
}

impl IntWidth {
    pub fn tag(self) -> Tag {
        match self {
            IntWidth::I8 => Tag::Int8,
            IntWidth::I16 => Tag::Int16,
            IntWidth::I32 => Tag::Int32,
            IntWidth::I64 => Tag::Int64,
        }
    }

    /// Payload size in bytes
    pub fn size(self) -> usize {
        match self {
            IntWidth::I8 => 1,
            IntWidth::I16 => 2,
            IntWidth::I32 => 4,
            IntWidth::I64 => 8,
        }
    }

    /// Whether `value` survives truncation to this width
    pub fn holds(self, value: i64) -> bool {
        match self {
            IntWidth::I8 => i8::try_from(value).is_ok(),
            IntWidth::I16 => i16::try_from(value).is_ok(),
            IntWidth::I32 => i32::try_from(value).is_ok(),
            IntWidth::I64 => true,
        }
    }

    /// Width for an integer tag, `None` for every other tag
    pub fn from_tag(tag: Tag) -> Option<Self> {
        match tag {
            Tag::Int8 => Some(IntWidth::I8),
            Tag::Int16 => Some(IntWidth::I16),
            Tag::Int32 => Some(IntWidth::I32),
            Tag::Int64 => Some(IntWidth::I64),
            _ => None,
        }
    }
}

/// How the encoder chooses an integer width
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntWidthStrategy {
    /// First-fit mask test on the low 1, 2 and 4 bytes.
    ///
    /// Wire-compatible with existing BION data. The chosen width is not
    /// guaranteed to hold the value: `0x1_0000_0001` selects `int8` and is
    /// stored as `1`. Zero always selects `int64`.
    #[default]
    BitTest,
    /// Narrowest signed width that holds the value. Lossless, but produces
    /// different bytes than `BitTest` for most values.
    Minimal,
}

impl IntWidthStrategy {
    pub fn select(self, value: i64) -> IntWidth {
        match self {
            IntWidthStrategy::BitTest => {
                if value & 0xFF != 0 {
                    IntWidth::I8
                } else if value & 0xFFFF != 0 {
                    IntWidth::I16
                } else if value & 0xFFFF_FFFF != 0 {
                    IntWidth::I32
                } else {
                    IntWidth::I64
                }
            }
            IntWidthStrategy::Minimal => {
                [IntWidth::I8, IntWidth::I16, IntWidth::I32]
                    .into_iter()
                    .find(|w| w.holds(value))
                    .unwrap_or(IntWidth::I64)
            }
        }
    }

    /// Width for a length, count or reference index.
    ///
    /// Uses the strategy's choice when it holds `value` and widens to the
    /// minimal width otherwise, so a structural prefix is never truncated.
    /// `BitTest` output only differs from [`select`](Self::select) for
    /// prefixes that older writers could not encode at all.
    pub fn select_prefix(self, value: i64) -> IntWidth {
        let width = self.select(value);
        if width.holds(value) {
            width
        } else {
            IntWidthStrategy::Minimal.select(value)
        }
    }
}
