//! Store snapshots
//!
//! Persists the live contents of a store as a single file.
//!
//! ## File Format
//! ```text
//! ┌──────────┬──────────┬──────────────┬──────────┬─────────────────────┐
//! │Magic (4) │Version(2)│ PayloadLen(8)│ CRC32 (4)│ bincode payload     │
//! └──────────┴──────────┴──────────────┴──────────┴─────────────────────┘
//! ```
//! The CRC covers the payload only. Files are written to a sibling temp path
//! and renamed into place, so a crash mid-write leaves the old snapshot. A
//! failed write removes its temp file.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{DbError, Result};

/// Magic bytes identifying a snapshot file
pub const MAGIC: &[u8; 4] = b"DSKV";

/// Current snapshot format version
pub const VERSION: u16 = 1;

/// Magic (4) + version (2) + payload length (8) + CRC32 (4)
pub const HEADER_SIZE: usize = 18;

/// One live key and its newest value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotEntry {
    pub key: Vec<u8>,
    pub value: Vec<u8>,
}

/// Write `entries` to `path`, replacing any existing snapshot
pub fn write_snapshot(path: &Path, entries: &[SnapshotEntry]) -> Result<()> {
    let payload = bincode::serialize(entries)
        .map_err(|e| DbError::Serialization(format!("Failed to encode snapshot: {}", e)))?;
    let crc = crc32fast::hash(&payload);

    let tmp_path = temp_path(path);
    let result = write_file(&tmp_path, &payload, crc)
        .and_then(|()| fs::rename(&tmp_path, path).map_err(DbError::from));
    if result.is_err() {
        let _ = fs::remove_file(&tmp_path);
    }
    result
}

fn write_file(path: &Path, payload: &[u8], crc: u32) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    writer.write_all(MAGIC)?;
    writer.write_all(&VERSION.to_le_bytes())?;
    writer.write_all(&(payload.len() as u64).to_le_bytes())?;
    writer.write_all(&crc.to_le_bytes())?;
    writer.write_all(payload)?;
    writer.flush()?;

    let file = writer
        .into_inner()
        .map_err(|e| DbError::Serialization(format!("Failed to flush snapshot: {}", e)))?;
    file.sync_all()?;
    Ok(())
}

/// Read and verify the snapshot at `path`
pub fn read_snapshot(path: &Path) -> Result<Vec<SnapshotEntry>> {
    let bytes = fs::read(path)?;

    if bytes.len() < HEADER_SIZE {
        return Err(DbError::SnapshotCorruption(format!(
            "Incomplete header: expected {} bytes, got {}",
            HEADER_SIZE,
            bytes.len()
        )));
    }

    if &bytes[0..4] != MAGIC {
        return Err(DbError::SnapshotCorruption(format!(
            "Invalid magic: expected DSKV, got {:?}",
            &bytes[0..4]
        )));
    }

    let version = u16::from_le_bytes([bytes[4], bytes[5]]);
    if version != VERSION {
        return Err(DbError::SnapshotCorruption(format!(
            "Unsupported snapshot version: {}",
            version
        )));
    }

    let mut len_bytes = [0u8; 8];
    len_bytes.copy_from_slice(&bytes[6..14]);
    let payload_len = u64::from_le_bytes(len_bytes);
    let expected_crc = u32::from_le_bytes([bytes[14], bytes[15], bytes[16], bytes[17]]);

    let payload = &bytes[HEADER_SIZE..];
    if payload.len() as u64 != payload_len {
        return Err(DbError::SnapshotCorruption(format!(
            "Payload length mismatch: header says {}, file has {}",
            payload_len,
            payload.len()
        )));
    }

    let actual_crc = crc32fast::hash(payload);
    if actual_crc != expected_crc {
        return Err(DbError::SnapshotCorruption(format!(
            "CRC mismatch: expected {:08x}, got {:08x}",
            expected_crc, actual_crc
        )));
    }

    bincode::deserialize(payload)
        .map_err(|e| DbError::Serialization(format!("Failed to decode snapshot: {}", e)))
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}
