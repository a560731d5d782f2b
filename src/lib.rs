//! # dstates-bench
//!
//! A YCSB-style benchmark adapter over a versioned ordered key-value store:
//! - Row records (ordered named fields) encoded as one length-prefixed blob per key
//! - Point CRUD operations: read, update, insert, delete
//! - One shared store per process, opened by the first worker and closed by the last
//! - Snapshot persistence with CRC-checked files
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Benchmark Driver                          │
//! │                  (one worker per thread)                     │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                   DataStatesDb (adapter)                     │
//! │            init / cleanup / read / update / ...              │
//! └──────────┬──────────────────────────────┬───────────────────┘
//!            │                              │
//!            ▼                              ▼
//!   ┌─────────────────┐            ┌─────────────────┐
//!   │    Row Codec    │            │  StoreRegistry  │
//!   │ (encode/decode) │            │ (refcounted)    │
//!   └─────────────────┘            └────────┬────────┘
//!                                           │
//!                                           ▼
//!                                  ┌─────────────────┐
//!                                  │ VersionedStore  │
//!                                  │   (RwLock)      │
//!                                  └─────────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;
pub mod properties;

pub mod row;
pub mod store;
pub mod adapter;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{DbError, Result};
pub use config::Config;
pub use properties::Properties;
pub use row::{Field, Row};
pub use store::{KvStore, StoreRegistry, VersionedStore};
pub use adapter::{DataStatesDb, Operation, Outcome, Status};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of dstates-bench
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
