//! Configuration for the DataStates adapter
//!
//! Centralized configuration with sensible defaults, built either directly or
//! from workload properties.

use std::path::PathBuf;
use std::str::FromStr;

use crate::error::{DbError, Result};
use crate::properties::Properties;

// =============================================================================
// Property Names
// =============================================================================

/// Store path (required)
pub const PROP_DBNAME: &str = "datastates.dbname";

/// Merge-based updates (unsupported when true)
pub const PROP_MERGE_UPDATE: &str = "datastates.mergeupdate";

/// Delete any existing store before opening
pub const PROP_DESTROY: &str = "datastates.destroy";

/// Store capacity in bytes
pub const PROP_SIZE: &str = "datastates.size";

/// Fields per row, owned by the workload definition
pub const PROP_FIELD_COUNT: &str = "fieldcount";

/// Default store capacity (1 GiB)
pub const DEFAULT_DB_SIZE: u64 = 1024 * 1024 * 1024;

/// Default fields per row
pub const DEFAULT_FIELD_COUNT: usize = 10;

/// Adapter configuration
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Store Configuration
    // -------------------------------------------------------------------------
    /// Path of the store file; empty means unconfigured
    pub db_path: PathBuf,

    /// Maximum live bytes the store accepts
    pub db_size: u64,

    /// Remove an existing store file before the first open
    pub destroy: bool,

    // -------------------------------------------------------------------------
    // Update Configuration
    // -------------------------------------------------------------------------
    /// Merge-based updates; recognized but rejected
    pub merge_update: bool,

    // -------------------------------------------------------------------------
    // Workload Configuration
    // -------------------------------------------------------------------------
    /// Expected field count of every full row
    pub field_count: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: PathBuf::new(),
            db_size: DEFAULT_DB_SIZE,
            destroy: false,
            merge_update: false,
            field_count: DEFAULT_FIELD_COUNT,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Build a config from workload properties
    ///
    /// Only parses; call `validate` before opening a store.
    pub fn from_properties(props: &Properties) -> Result<Self> {
        let defaults = Self::default();

        Ok(Self {
            db_path: PathBuf::from(props.get_or(PROP_DBNAME, "")),
            db_size: parse_prop(props, PROP_SIZE, defaults.db_size)?,
            destroy: parse_bool(props, PROP_DESTROY)?,
            merge_update: parse_bool(props, PROP_MERGE_UPDATE)?,
            field_count: parse_prop(props, PROP_FIELD_COUNT, defaults.field_count)?,
        })
    }

    /// Check that the config describes a store this adapter can serve
    pub fn validate(&self) -> Result<()> {
        if self.merge_update {
            return Err(DbError::Unsupported("merge updates"));
        }
        if self.db_path.as_os_str().is_empty() {
            return Err(DbError::Config(format!("{} is missing", PROP_DBNAME)));
        }
        if self.db_size == 0 {
            return Err(DbError::Config(format!("{} must be > 0", PROP_SIZE)));
        }
        if self.field_count == 0 {
            return Err(DbError::Config(format!("{} must be > 0", PROP_FIELD_COUNT)));
        }
        Ok(())
    }
}

fn parse_prop<T: FromStr>(props: &Properties, key: &str, default: T) -> Result<T> {
    match props.get(key) {
        None => Ok(default),
        Some(raw) => raw
            .parse()
            .map_err(|_| DbError::Config(format!("{} is invalid: {:?}", key, raw))),
    }
}

fn parse_bool(props: &Properties, key: &str) -> Result<bool> {
    match props.get_or(key, "false") {
        "true" => Ok(true),
        "false" => Ok(false),
        other => Err(DbError::Config(format!(
            "{} must be true or false, got {:?}",
            key, other
        ))),
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the store path
    pub fn db_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.db_path = path.into();
        self
    }

    /// Set the store capacity (in bytes)
    pub fn db_size(mut self, size: u64) -> Self {
        self.config.db_size = size;
        self
    }

    /// Delete any existing store before opening
    pub fn destroy(mut self, destroy: bool) -> Self {
        self.config.destroy = destroy;
        self
    }

    /// Request merge-based updates
    pub fn merge_update(mut self, enabled: bool) -> Self {
        self.config.merge_update = enabled;
        self
    }

    /// Set the expected fields per row
    pub fn field_count(mut self, count: usize) -> Self {
        self.config.field_count = count;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
