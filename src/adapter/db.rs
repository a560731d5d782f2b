//! DataStates adapter
//!
//! One instance per benchmark worker; all instances built from the same
//! registry share one store.

use std::sync::Arc;

use crate::config::Config;
use crate::error::{display_bytes, DbError, Result};
use crate::row::{decode_row, decode_row_filtered, encode_row, Field, Row};
use crate::store::{KvStore, StoreRegistry, VersionedStore, NEWEST};

use super::{Operation, Outcome, Status};

/// Row-oriented CRUD adapter over a shared key-value store
///
/// ## Concurrency Model
///
/// - `init`/`cleanup` serialize on the registry lock
/// - CRUD calls take no adapter-level lock; they rely on the store being safe
///   for concurrent calls on independent keys
/// - `update` is a read-modify-write: two workers updating the same key at
///   once can lose one of the writes
pub struct DataStatesDb<S: KvStore = VersionedStore> {
    /// Registry the store reference was taken from
    registry: Arc<StoreRegistry<S>>,

    /// Shared store
    store: Arc<S>,

    /// Expected fields in every full row
    field_count: usize,

    /// Set once the store reference has been given back
    released: bool,
}

impl<S: KvStore> DataStatesDb<S> {
    /// Take a reference on the registry's store, opening it if needed
    ///
    /// Fails on a missing store path or when merge updates are requested.
    pub fn init(registry: Arc<StoreRegistry<S>>, config: &Config) -> Result<Self> {
        let store = registry.acquire(config)?;

        Ok(Self {
            registry,
            store,
            field_count: config.field_count,
            released: false,
        })
    }

    /// Release the store reference; the last cleanup closes the store
    pub fn cleanup(mut self) -> Result<()> {
        self.released = true;
        self.registry.release()
    }

    /// Execute an operation
    ///
    /// Routes operations to the matching CRUD method
    pub fn execute(&self, operation: &Operation) -> Result<Outcome> {
        match operation {
            Operation::Read { table, key, fields } => {
                match self.read(table, key, fields.as_deref())? {
                    Some(row) => Ok(Outcome::Row(row)),
                    None => Ok(Outcome::NotFound),
                }
            }
            Operation::Scan {
                table,
                key,
                len,
                fields,
            } => Ok(Outcome::Rows(self.scan(table, key, *len, fields.as_deref())?)),
            Operation::Update { table, key, values } => {
                Ok(status_outcome(self.update(table, key, values)?))
            }
            Operation::Insert { table, key, values } => {
                Ok(status_outcome(self.insert(table, key, values)?))
            }
            Operation::Delete { table, key } => Ok(status_outcome(self.delete(table, key)?)),
            Operation::Merge { table, key, values } => {
                Ok(status_outcome(self.merge(table, key, values)?))
            }
        }
    }

    /// Read a row
    ///
    /// With `fields`, only those fields are decoded and all of them must be
    /// present. Without, the whole row is decoded and its field count checked.
    /// Returns `None` when the key has no row.
    pub fn read(&self, _table: &str, key: &[u8], fields: Option<&[Vec<u8>]>) -> Result<Option<Row>> {
        let Some(data) = self.store.find(NEWEST, key) else {
            tracing::trace!(key = %display_bytes(key), "read: not found");
            return Ok(None);
        };

        let row = match fields {
            Some(fields) => decode_row_filtered(&data, fields)?,
            None => {
                let row = decode_row(&data)?;
                self.check_field_count(&row)?;
                row
            }
        };

        Ok(Some(row))
    }

    /// Scanning is not supported: the store keeps one row per key
    pub fn scan(
        &self,
        _table: &str,
        _key: &[u8],
        _len: usize,
        _fields: Option<&[Vec<u8>]>,
    ) -> Result<Vec<Row>> {
        Err(DbError::Unsupported("scanning over multiple values of a key"))
    }

    /// Overwrite the named fields of an existing row
    ///
    /// Every field in `values` must already exist in the row. Nothing is
    /// written unless all of them do.
    pub fn update(&self, _table: &str, key: &[u8], values: &[Field]) -> Result<Status> {
        let Some(data) = self.store.find(NEWEST, key) else {
            tracing::trace!(key = %display_bytes(key), "update: not found");
            return Ok(Status::NotFound);
        };

        let mut current = decode_row(&data)?;
        self.check_field_count(&current)?;

        for new_field in values {
            let slot = current
                .iter_mut()
                .find(|field| field.name == new_field.name)
                .ok_or_else(|| DbError::UnknownField(display_bytes(&new_field.name)))?;
            slot.value.clone_from(&new_field.value);
        }

        let encoded = encode_row(&current)?;
        if !self.store.insert(key, encoded) {
            return Err(DbError::StoreWrite(display_bytes(key)));
        }

        Ok(Status::Ok)
    }

    /// Write a whole row without reading the previous one
    pub fn insert(&self, _table: &str, key: &[u8], values: &[Field]) -> Result<Status> {
        let encoded = encode_row(values)?;
        if !self.store.insert(key, encoded) {
            return Err(DbError::StoreWrite(display_bytes(key)));
        }
        Ok(Status::Ok)
    }

    /// Remove a row
    pub fn delete(&self, _table: &str, key: &[u8]) -> Result<Status> {
        if !self.store.remove(key) {
            return Err(DbError::StoreRemove(display_bytes(key)));
        }
        Ok(Status::Ok)
    }

    /// Merging is not implemented
    pub fn merge(&self, _table: &str, _key: &[u8], _values: &[Field]) -> Result<Status> {
        Err(DbError::Unsupported("merge"))
    }

    fn check_field_count(&self, row: &Row) -> Result<()> {
        if row.len() != self.field_count {
            return Err(DbError::FieldCountMismatch {
                expected: self.field_count,
                actual: row.len(),
            });
        }
        Ok(())
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Expected fields per full row
    pub fn field_count(&self) -> usize {
        self.field_count
    }

    /// The shared store
    pub fn store(&self) -> &S {
        &self.store
    }
}

fn status_outcome(status: Status) -> Outcome {
    match status {
        Status::Ok => Outcome::Done,
        Status::NotFound => Outcome::NotFound,
    }
}

impl<S: KvStore> Drop for DataStatesDb<S> {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        if let Err(e) = self.registry.release() {
            tracing::error!("Failed to release store on drop: {}", e);
        }
    }
}
