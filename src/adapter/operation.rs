//! Operation definitions
//!
//! Represents CRUD requests from a benchmark driver and their results.

use crate::row::{Field, Row};

/// Operation types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationType {
    Read,
    Scan,
    Update,
    Insert,
    Delete,
    Merge,
}

impl OperationType {
    /// Upper-case name used in reports
    pub fn name(&self) -> &'static str {
        match self {
            OperationType::Read => "READ",
            OperationType::Scan => "SCAN",
            OperationType::Update => "UPDATE",
            OperationType::Insert => "INSERT",
            OperationType::Delete => "DELETE",
            OperationType::Merge => "MERGE",
        }
    }
}

/// A CRUD request against one table
///
/// The table name is carried for interface compatibility; the adapter serves
/// a single implicit table.
#[derive(Debug, Clone)]
pub enum Operation {
    /// Read a row, or only the named fields of it
    Read {
        table: String,
        key: Vec<u8>,
        fields: Option<Vec<Vec<u8>>>,
    },

    /// Read `len` rows starting at `key`
    Scan {
        table: String,
        key: Vec<u8>,
        len: usize,
        fields: Option<Vec<Vec<u8>>>,
    },

    /// Overwrite the named fields of an existing row
    Update {
        table: String,
        key: Vec<u8>,
        values: Vec<Field>,
    },

    /// Write a whole row
    Insert {
        table: String,
        key: Vec<u8>,
        values: Vec<Field>,
    },

    /// Remove a row
    Delete { table: String, key: Vec<u8> },

    /// Merge fields into a row
    Merge {
        table: String,
        key: Vec<u8>,
        values: Vec<Field>,
    },
}

impl Operation {
    /// Get the operation type
    pub fn operation_type(&self) -> OperationType {
        match self {
            Operation::Read { .. } => OperationType::Read,
            Operation::Scan { .. } => OperationType::Scan,
            Operation::Update { .. } => OperationType::Update,
            Operation::Insert { .. } => OperationType::Insert,
            Operation::Delete { .. } => OperationType::Delete,
            Operation::Merge { .. } => OperationType::Merge,
        }
    }

    /// Key the operation targets
    pub fn key(&self) -> &[u8] {
        match self {
            Operation::Read { key, .. }
            | Operation::Scan { key, .. }
            | Operation::Update { key, .. }
            | Operation::Insert { key, .. }
            | Operation::Delete { key, .. }
            | Operation::Merge { key, .. } => key,
        }
    }
}

/// Status codes returned to the driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok,
    NotFound,
}

/// Result of a successfully executed operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A row returned by a read
    Row(Row),

    /// Rows returned by a scan
    Rows(Vec<Row>),

    /// A write completed
    Done,

    /// The key has no row
    NotFound,
}

impl Outcome {
    /// Status code for this outcome
    pub fn status(&self) -> Status {
        match self {
            Outcome::NotFound => Status::NotFound,
            _ => Status::Ok,
        }
    }
}
