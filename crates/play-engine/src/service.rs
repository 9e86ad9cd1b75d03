//! `PlayService`: the engine facade.
//!
//! Holds the injected collaborators (store, catalog, clock), the engine
//! configuration, and the process-local session cache. Operations are
//! implemented as `impl PlayService` blocks in the sibling modules.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use play_config::{EngineConfig, PlayConfig};
use play_core::entities::Session;
use play_db::{LibsqlStore, Store};
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::catalog::{Catalog, StaticCatalog};
use crate::clock::{Clock, SystemClock};
use crate::error::EngineError;

/// Per-session state kept between calls.
///
/// Guarded by its own async mutex, which is held across every event insert
/// for the session, so sequence numbers are assigned one at a time.
#[derive(Debug, Default)]
pub(crate) struct SessionSlot {
    /// The open session, present while it is cached as in progress.
    pub(crate) session: Option<Session>,
    /// Highest sequence number stored for the session. `None` until loaded.
    pub(crate) last_sequence: Option<u32>,
}

pub struct PlayService {
    store: Arc<dyn Store>,
    catalog: Arc<dyn Catalog>,
    clock: Arc<dyn Clock>,
    config: EngineConfig,
    slots: Mutex<HashMap<String, Arc<Mutex<SessionSlot>>>>,
}

impl PlayService {
    #[must_use]
    pub fn new(
        store: Arc<dyn Store>,
        catalog: Arc<dyn Catalog>,
        clock: Arc<dyn Clock>,
        config: EngineConfig,
    ) -> Self {
        Self {
            store,
            catalog,
            clock,
            config,
            slots: Mutex::new(HashMap::new()),
        }
    }

    /// Build a service from loaded configuration.
    ///
    /// Opens the remote store when `store.url` and `store.auth_token` are
    /// set, else the local file (creating its parent directory). Uses the
    /// configured catalog file, or the built-in sample catalog.
    ///
    /// # Errors
    ///
    /// Returns `EngineError` if the store cannot be opened or the catalog
    /// cannot be loaded.
    pub async fn open(config: &PlayConfig) -> Result<Self, EngineError> {
        let store = if config.store.is_remote() {
            LibsqlStore::open_remote(&config.store.url, &config.store.auth_token).await?
        } else {
            if !config.store.is_in_memory() {
                if let Some(parent) = Path::new(&config.store.path).parent() {
                    if !parent.as_os_str().is_empty() {
                        std::fs::create_dir_all(parent).map_err(|e| {
                            EngineError::Other(anyhow::anyhow!(
                                "cannot create {}: {e}",
                                parent.display()
                            ))
                        })?;
                    }
                }
            }
            LibsqlStore::open_local(&config.store.path).await?
        };

        let catalog = if config.catalog.is_configured() {
            StaticCatalog::from_path(Path::new(&config.catalog.path))?
        } else {
            StaticCatalog::sample()
        };

        Ok(Self::new(
            Arc::new(store),
            Arc::new(catalog),
            Arc::new(SystemClock),
            config.engine.clone(),
        ))
    }

    #[must_use]
    pub fn store(&self) -> &dyn Store {
        self.store.as_ref()
    }

    #[must_use]
    pub fn catalog(&self) -> &dyn Catalog {
        self.catalog.as_ref()
    }

    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub(crate) fn now(&self) -> chrono::DateTime<chrono::Utc> {
        self.clock.now()
    }

    /// Whether reads for `learner_id` are served by the synthesizer.
    #[must_use]
    pub fn is_demo_learner(&self, learner_id: &str) -> bool {
        self.config.is_demo_learner(learner_id)
    }

    /// The slot for a session, created empty on first use.
    async fn slot(&self, session_id: &str) -> Arc<Mutex<SessionSlot>> {
        let mut slots = self.slots.lock().await;
        Arc::clone(slots.entry(session_id.to_string()).or_default())
    }

    /// Lock the current slot of a session.
    ///
    /// A slot evicted while this task waited for its lock is stale: its
    /// counter may lag the store. Such a slot is dropped and the lookup
    /// repeated, so every holder works on the slot that is in the map.
    pub(crate) async fn lock_slot(&self, session_id: &str) -> OwnedMutexGuard<SessionSlot> {
        loop {
            let slot = self.slot(session_id).await;
            let guard = Arc::clone(&slot).lock_owned().await;
            let current = self
                .slots
                .lock()
                .await
                .get(session_id)
                .is_some_and(|entry| Arc::ptr_eq(entry, &slot));
            if current {
                return guard;
            }
        }
    }

    /// The cached open session, if any.
    pub(crate) async fn cached_session(&self, session_id: &str) -> Option<Session> {
        let slot = {
            let slots = self.slots.lock().await;
            slots.get(session_id).map(Arc::clone)
        }?;
        let guard = slot.lock().await;
        guard.session.clone()
    }

    /// Drop the cache entry and sequence counter of a session.
    pub(crate) async fn evict(&self, session_id: &str) {
        self.slots.lock().await.remove(session_id);
    }

    /// Number of open sessions currently held in the process cache.
    pub async fn cached_sessions(&self) -> usize {
        let slots: Vec<Arc<Mutex<SessionSlot>>> =
            self.slots.lock().await.values().map(Arc::clone).collect();
        let mut open = 0;
        for slot in slots {
            if slot.lock().await.session.is_some() {
                open += 1;
            }
        }
        open
    }
}
