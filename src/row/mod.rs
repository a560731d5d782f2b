//! Row Module
//!
//! Row-oriented record model and its flat binary encoding.
//!
//! ## Encoding
//! A row is a concatenation of self-delimiting field records. There is no
//! count prefix and no terminator: the enclosing store value marks the end.
//! ```text
//! ┌──────────┬────────────┬──────────┬─────────────┐
//! │NameLen(4)│    Name    │ValLen(4) │    Value    │  ... repeated per field
//! └──────────┴────────────┴──────────┴─────────────┘
//! ```
//! Lengths are little-endian `u32`.

mod codec;

pub use codec::{decode_row, decode_row_filtered, encode_row, encoded_len, LEN_PREFIX_SIZE};

/// A named value within a row
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Field {
    /// Field name (unique within a row)
    pub name: Vec<u8>,

    /// Field value
    pub value: Vec<u8>,
}

impl Field {
    /// Create a field from anything convertible into byte vectors
    pub fn new(name: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// An ordered sequence of fields stored under one key
pub type Row = Vec<Field>;
