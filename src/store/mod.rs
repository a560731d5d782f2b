//! Store Module
//!
//! The ordered key-value store behind the adapter.
//!
//! ## Responsibilities
//! - Describe the point-lookup contract the adapter relies on (`KvStore`)
//! - Share one open store between many adapters (`StoreRegistry`)
//! - Provide a versioned in-memory store persisted as a snapshot file
//!
//! ## Contract
//! - `find(priority, key)`: newest value whose version is at or below
//!   `priority`; `None` when the key is absent or removed
//! - `insert(key, value)`: `false` when the store refuses the write
//! - `remove(key)`: `false` when there was no live value to remove
//!
//! Implementations must be safe for concurrent calls on independent keys.
//! Read-modify-write sequences on one key are not made atomic by anything here.

mod registry;
mod snapshot;
mod versioned;

pub use registry::StoreRegistry;
pub use snapshot::{read_snapshot, write_snapshot, SnapshotEntry};
pub use versioned::{VersionedStore, RETAINED_VERSIONS};

use crate::error::Result;

/// Priority that always selects the newest version of a key
pub const NEWEST: u64 = u64::MAX;

/// Point-lookup key-value store holding one row blob per key
pub trait KvStore: Send + Sync {
    /// Look up the newest version of `key` visible at `priority`
    fn find(&self, priority: u64, key: &[u8]) -> Option<Vec<u8>>;

    /// Write a new version of `key`
    fn insert(&self, key: &[u8], value: Vec<u8>) -> bool;

    /// Remove `key`
    fn remove(&self, key: &[u8]) -> bool;

    /// Release the store; called once, after the last adapter lets go
    fn close(&self) -> Result<()>;
}
