//! Adapter Module
//!
//! Benchmark-facing CRUD interface over a shared store.
//!
//! ## Responsibilities
//! - Take and release a reference on the shared store (init/cleanup)
//! - Encode rows on insert/update, decode them on read
//! - Map store outcomes to `Status`/`Outcome` and typed errors
//!
//! ## Supported Operations
//! - READ:   point lookup, full row or a named subset of fields
//! - UPDATE: read-modify-write of named fields on an existing row
//! - INSERT: blind write of a whole row
//! - DELETE: remove a row
//! - SCAN and MERGE are rejected

mod db;
mod operation;

pub use db::DataStatesDb;
pub use operation::{Operation, OperationType, Outcome, Status};

/// Name the adapter is known by in benchmark configurations
pub const ADAPTER_NAME: &str = "datastates";
