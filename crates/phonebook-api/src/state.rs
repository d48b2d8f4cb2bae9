//! Shared handler state and store selection.

use phonebook_core::{DirectoryStore, MemoryStore, Reconciler, RedbStore};
use std::sync::Arc;

use crate::config::{Backend, ServerConfig};
use crate::error::Result;

/// State handed to every handler. Cheap to clone.
#[derive(Clone, Debug)]
pub struct AppState {
    reconciler: Reconciler,
}

impl AppState {
    /// Wraps a store.
    pub fn new(store: Arc<dyn DirectoryStore>) -> Self {
        Self {
            reconciler: Reconciler::new(store),
        }
    }

    /// The directory store.
    pub fn store(&self) -> &Arc<dyn DirectoryStore> {
        self.reconciler.store()
    }

    /// The reconciler over [`store`](Self::store).
    pub fn reconciler(&self) -> &Reconciler {
        &self.reconciler
    }
}

/// Create the directory store named by the configuration.
///
/// Seeding only applies to the memory backend; a redb file keeps whatever
/// it already holds.
pub fn open_store(config: &ServerConfig) -> Result<Arc<dyn DirectoryStore>> {
    match config.backend {
        Backend::Memory => {
            let store = if config.seed {
                MemoryStore::with_sample_contacts()
            } else {
                MemoryStore::new()
            };
            log::info!("Using in-memory directory (seeded: {})", config.seed);
            Ok(Arc::new(store.with_name_match(config.name_match)))
        }
        Backend::Redb => {
            let store = RedbStore::open(&config.db_path)?.with_name_match(config.name_match);
            log::info!("Using redb directory at {}", config.db_path.display());
            Ok(Arc::new(store))
        }
    }
}
