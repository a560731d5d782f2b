//! Workload properties
//!
//! String-keyed options in the format benchmark workload files use:
//! ```text
//! # comment
//! fieldcount=10
//! datastates.dbname = /tmp/ycsb.db
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::{DbError, Result};

/// Flat key/value property set
#[derive(Debug, Clone, Default)]
pub struct Properties {
    values: HashMap<String, String>,
}

impl Properties {
    /// Create an empty property set
    pub fn new() -> Self {
        Self::default()
    }

    /// Load properties from a file, overriding existing keys
    pub fn load_file(&mut self, path: &Path) -> Result<()> {
        let text = fs::read_to_string(path)?;
        self.load_str(&text)
    }

    /// Parse `key=value` lines, ignoring blanks and `#`/`!` comments
    pub fn load_str(&mut self, text: &str) -> Result<()> {
        for (lineno, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
                continue;
            }
            self.set_pair(line).map_err(|_| {
                DbError::Config(format!("line {}: expected key=value, got {:?}", lineno + 1, line))
            })?;
        }
        Ok(())
    }

    /// Apply a single `key=value` override
    pub fn set_pair(&mut self, pair: &str) -> Result<()> {
        let (key, value) = pair
            .split_once('=')
            .ok_or_else(|| DbError::Config(format!("expected key=value, got {:?}", pair)))?;

        let key = key.trim();
        if key.is_empty() {
            return Err(DbError::Config(format!("empty property name in {:?}", pair)));
        }

        self.set(key, value.trim());
        Ok(())
    }

    /// Set a property
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// Look up a property
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Look up a property, falling back to `default`
    pub fn get_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key).unwrap_or(default)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
