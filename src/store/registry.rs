//! Store Registry
//!
//! Shares one open store between every adapter that acquires it.
//!
//! The first `acquire` opens the store; later ones reuse it. The store is
//! closed when the last reference is released, and a later `acquire` opens it
//! again. Both operations hold one lock for their whole duration, so opening
//! and closing never overlap.

use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

use parking_lot::Mutex;

use crate::config::Config;
use crate::error::{DbError, Result};

use super::{KvStore, VersionedStore};

/// Constructs a store from a validated config
pub type Opener<S> = Box<dyn Fn(&Config) -> Result<S> + Send + Sync>;

struct RegistryState<S> {
    /// Live references handed out by `acquire`
    refs: usize,

    /// The open store, present while `refs > 0`
    store: Option<Arc<S>>,

    /// Path the open store was created for
    path: PathBuf,
}

/// Reference-counted owner of a single store instance
pub struct StoreRegistry<S: KvStore> {
    opener: Opener<S>,
    state: Mutex<RegistryState<S>>,
}

impl<S: KvStore> StoreRegistry<S> {
    /// Create a registry that opens stores with `opener`
    pub fn new<F>(opener: F) -> Self
    where
        F: Fn(&Config) -> Result<S> + Send + Sync + 'static,
    {
        Self {
            opener: Box::new(opener),
            state: Mutex::new(RegistryState {
                refs: 0,
                store: None,
                path: PathBuf::new(),
            }),
        }
    }

    /// Take a reference to the store, opening it if this is the first one
    ///
    /// A failed acquire leaves the reference count unchanged.
    pub fn acquire(&self, config: &Config) -> Result<Arc<S>> {
        config.validate()?;

        let mut state = self.state.lock();

        let store = match state.store.clone() {
            Some(store) => {
                if state.path != config.db_path {
                    tracing::warn!(
                        "Store already open at {}; ignoring requested path {}",
                        state.path.display(),
                        config.db_path.display()
                    );
                }
                store
            }
            None => {
                tracing::info!("Opening store at {}", config.db_path.display());
                let store = Arc::new((self.opener)(config)?);
                state.store = Some(Arc::clone(&store));
                state.path = config.db_path.clone();
                store
            }
        };

        state.refs += 1;
        tracing::debug!(refs = state.refs, "store reference acquired");
        Ok(store)
    }

    /// Drop a reference, closing the store when it was the last one
    pub fn release(&self) -> Result<()> {
        let mut state = self.state.lock();

        if state.refs == 0 {
            return Err(DbError::Lifecycle(
                "release without a matching acquire".to_string(),
            ));
        }

        state.refs -= 1;
        tracing::debug!(refs = state.refs, "store reference released");
        if state.refs > 0 {
            return Ok(());
        }

        if let Some(store) = state.store.take() {
            tracing::info!("Closing store at {}", state.path.display());
            store.close()?;
        }
        Ok(())
    }

    /// Number of live references
    pub fn ref_count(&self) -> usize {
        self.state.lock().refs
    }

    /// Whether a store is currently open
    pub fn is_open(&self) -> bool {
        self.state.lock().store.is_some()
    }

    /// Path of the open store, if any
    pub fn open_path(&self) -> Option<PathBuf> {
        let state = self.state.lock();
        state.store.as_ref().map(|_| state.path.clone())
    }
}

impl StoreRegistry<VersionedStore> {
    /// Registry opening `VersionedStore`s from config
    pub fn versioned() -> Self {
        Self::new(VersionedStore::from_config)
    }

    /// Process-wide registry shared by every adapter in this process
    pub fn global() -> Arc<Self> {
        static GLOBAL: OnceLock<Arc<StoreRegistry<VersionedStore>>> = OnceLock::new();
        Arc::clone(GLOBAL.get_or_init(|| Arc::new(Self::versioned())))
    }
}
