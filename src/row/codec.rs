//! Row codec
//!
//! Encoding and decoding functions for row values.

use std::collections::HashSet;

use bytes::{Buf, BufMut};

use crate::error::{display_bytes, DbError, Result};

use super::{Field, Row};

/// Size of each name/value length prefix
pub const LEN_PREFIX_SIZE: usize = 4;

// =============================================================================
// Encoding
// =============================================================================

/// Number of bytes `encode_row` produces for `row`
pub fn encoded_len(row: &[Field]) -> usize {
    row.iter()
        .map(|field| 2 * LEN_PREFIX_SIZE + field.name.len() + field.value.len())
        .sum()
}

/// Encode a row to bytes
///
/// Format per field: name_len (4) + name + value_len (4) + value
pub fn encode_row(row: &[Field]) -> Result<Vec<u8>> {
    let mut buf = Vec::with_capacity(encoded_len(row));
    for field in row {
        put_record(&mut buf, "name", &field.name)?;
        put_record(&mut buf, "value", &field.value)?;
    }
    Ok(buf)
}

fn put_record(buf: &mut Vec<u8>, component: &'static str, bytes: &[u8]) -> Result<()> {
    let len = u32::try_from(bytes.len()).map_err(|_| DbError::FieldTooLarge {
        component,
        len: bytes.len(),
    })?;
    buf.put_u32_le(len);
    buf.put_slice(bytes);
    Ok(())
}

// =============================================================================
// Decoding
// =============================================================================

/// Decode every field of an encoded row
///
/// The buffer must hold an integral number of field records.
pub fn decode_row(data: &[u8]) -> Result<Row> {
    let mut reader = RecordReader::new(data);
    let mut row = Vec::new();

    while !reader.is_exhausted() {
        let (name, value) = reader.next_field()?;
        row.push(Field::new(name, value));
    }

    Ok(row)
}

/// Decode only the named fields of an encoded row
///
/// Fields come back in the order they are stored, whatever order `fields`
/// lists them in. Scanning stops as soon as every requested name is matched,
/// so trailing records are not validated. Duplicate names count once.
pub fn decode_row_filtered<N: AsRef<[u8]>>(data: &[u8], fields: &[N]) -> Result<Row> {
    let mut wanted: HashSet<&[u8]> = fields.iter().map(|name| name.as_ref()).collect();
    let mut row = Vec::with_capacity(wanted.len());
    let mut reader = RecordReader::new(data);

    while !wanted.is_empty() && !reader.is_exhausted() {
        let (name, value) = reader.next_field()?;
        if wanted.remove(name) {
            row.push(Field::new(name, value));
        }
    }

    if !wanted.is_empty() {
        let missing = fields
            .iter()
            .filter_map(|name| wanted.take(name.as_ref()))
            .map(display_bytes)
            .collect();
        return Err(DbError::MissingFields(missing));
    }

    Ok(row)
}

/// Sequential reader over length-prefixed records
struct RecordReader<'a> {
    buf: &'a [u8],
    total: usize,
}

impl<'a> RecordReader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self {
            buf: data,
            total: data.len(),
        }
    }

    fn offset(&self) -> usize {
        self.total - self.buf.remaining()
    }

    fn is_exhausted(&self) -> bool {
        !self.buf.has_remaining()
    }

    fn next_field(&mut self) -> Result<(&'a [u8], &'a [u8])> {
        let name = self.next_record("name")?;
        let value = self.next_record("value")?;
        Ok((name, value))
    }

    fn next_record(&mut self, component: &str) -> Result<&'a [u8]> {
        if self.buf.remaining() < LEN_PREFIX_SIZE {
            return Err(DbError::CorruptRow {
                offset: self.offset(),
                reason: format!(
                    "truncated {} length prefix ({} bytes left)",
                    component,
                    self.buf.remaining()
                ),
            });
        }

        let len = self.buf.get_u32_le() as usize;
        if self.buf.remaining() < len {
            return Err(DbError::CorruptRow {
                offset: self.offset(),
                reason: format!(
                    "{} of {} bytes overruns buffer ({} bytes left)",
                    component,
                    len,
                    self.buf.remaining()
                ),
            });
        }

        let (record, rest) = self.buf.split_at(len);
        self.buf = rest;
        Ok(record)
    }
}
