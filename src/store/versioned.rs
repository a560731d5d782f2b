//! Versioned ordered store
//!
//! BTreeMap of per-key version lists behind a RwLock, persisted as a snapshot.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

use crate::config::Config;
use crate::error::Result;

use super::snapshot::{read_snapshot, write_snapshot, SnapshotEntry};
use super::KvStore;

/// Versions kept per key, newest included
pub const RETAINED_VERSIONS: usize = 4;

/// One version of a key (`None` is a tombstone)
#[derive(Debug, Clone)]
struct Version {
    seq: u64,
    value: Option<Vec<u8>>,
}

#[derive(Debug, Default)]
struct StoreState {
    /// Versions per key, oldest first
    entries: BTreeMap<Vec<u8>, Vec<Version>>,

    /// Key and value bytes of every live key
    used_bytes: u64,
}

/// Ordered multi-version key-value store
///
/// ## Concurrency:
/// - `state`: RwLock, many concurrent `find`s, exclusive `insert`/`remove`
/// - `next_seq`: only advanced while the write lock is held, so version lists
///   stay sorted
///
/// `used_bytes` counts live data only: an overwrite swaps the old value's
/// size for the new one and a remove frees the key and value. Each key keeps
/// at most `RETAINED_VERSIONS` versions; older ones are dropped on insert.
pub struct VersionedStore {
    path: PathBuf,
    capacity: u64,
    state: RwLock<StoreState>,
    next_seq: AtomicU64,
}

impl VersionedStore {
    /// Open the store at `path`, loading its snapshot if the file exists
    pub fn open(path: &Path, capacity: u64) -> Result<Self> {
        let mut state = StoreState::default();
        let mut seq = 0;

        if path.exists() {
            for entry in read_snapshot(path)? {
                seq += 1;
                state.used_bytes += (entry.key.len() + entry.value.len()) as u64;
                state.entries.insert(
                    entry.key,
                    vec![Version {
                        seq,
                        value: Some(entry.value),
                    }],
                );
            }
            tracing::info!(
                "Loaded {} keys ({} bytes) from {}",
                state.entries.len(),
                state.used_bytes,
                path.display()
            );
        }

        Ok(Self {
            path: path.to_path_buf(),
            capacity,
            state: RwLock::new(state),
            next_seq: AtomicU64::new(seq + 1),
        })
    }

    /// Open the store described by `config`, destroying it first if asked
    pub fn from_config(config: &Config) -> Result<Self> {
        if config.destroy {
            Self::destroy(&config.db_path)?;
        }
        Self::open(&config.db_path, config.db_size)
    }

    /// Delete the store file at `path`; a missing file is not an error
    pub fn destroy(path: &Path) -> Result<()> {
        match fs::remove_file(path) {
            Ok(()) => {
                tracing::info!("Deleted store {}", path.display());
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Path the store persists to
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Maximum live bytes the store accepts
    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    /// Key and value bytes of the live keys
    pub fn used_bytes(&self) -> u64 {
        self.state.read().used_bytes
    }

    /// Number of keys with a live value
    pub fn len(&self) -> usize {
        self.state
            .read()
            .entries
            .values()
            .filter(|versions| is_live(versions))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sequence number the next write will receive
    pub fn current_seq(&self) -> u64 {
        self.next_seq.load(Ordering::Acquire)
    }

    fn live_entries(&self) -> Vec<SnapshotEntry> {
        let state = self.state.read();
        state
            .entries
            .iter()
            .filter_map(|(key, versions)| {
                let value = versions.last()?.value.as_ref()?;
                Some(SnapshotEntry {
                    key: key.clone(),
                    value: value.clone(),
                })
            })
            .collect()
    }
}

fn is_live(versions: &[Version]) -> bool {
    versions.last().is_some_and(|v| v.value.is_some())
}

/// Append a version, dropping the oldest beyond `RETAINED_VERSIONS`
fn push_version(versions: &mut Vec<Version>, seq: u64, value: Option<Vec<u8>>) {
    versions.push(Version { seq, value });
    if versions.len() > RETAINED_VERSIONS {
        let excess = versions.len() - RETAINED_VERSIONS;
        versions.drain(..excess);
    }
}

/// Bytes a key contributes to `used_bytes`
fn live_cost(key: &[u8], versions: &[Version]) -> u64 {
    match versions.last().and_then(|v| v.value.as_ref()) {
        Some(value) => (key.len() + value.len()) as u64,
        None => 0,
    }
}

impl KvStore for VersionedStore {
    fn find(&self, priority: u64, key: &[u8]) -> Option<Vec<u8>> {
        let state = self.state.read();
        let versions = state.entries.get(key)?;
        versions
            .iter()
            .rev()
            .find(|v| v.seq <= priority)
            .and_then(|v| v.value.clone())
    }

    fn insert(&self, key: &[u8], value: Vec<u8>) -> bool {
        let mut state = self.state.write();

        let replaced = state
            .entries
            .get(key)
            .map_or(0, |versions| live_cost(key, versions));
        let needed = state.used_bytes - replaced + (key.len() + value.len()) as u64;
        if needed > self.capacity {
            tracing::warn!(
                "Store full: insert needs {} bytes, capacity {}",
                needed,
                self.capacity
            );
            return false;
        }

        state.used_bytes = needed;
        let seq = self.next_seq.fetch_add(1, Ordering::AcqRel);
        let versions = state.entries.entry(key.to_vec()).or_default();
        push_version(versions, seq, Some(value));
        true
    }

    fn remove(&self, key: &[u8]) -> bool {
        let mut state = self.state.write();

        let Some(versions) = state.entries.get_mut(key) else {
            return false;
        };
        if !is_live(versions) {
            return false;
        }
        let freed = live_cost(key, versions);

        let seq = self.next_seq.fetch_add(1, Ordering::AcqRel);
        push_version(versions, seq, None);
        state.used_bytes -= freed;
        true
    }

    fn close(&self) -> Result<()> {
        let entries = self.live_entries();
        write_snapshot(&self.path, &entries)?;
        tracing::info!(
            "Persisted {} keys to {}",
            entries.len(),
            self.path.display()
        );
        Ok(())
    }
}
