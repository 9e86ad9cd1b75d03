//! # play-db
//!
//! Store gateway for playtrack: sessions, session events, and per-learner
//! progress records.
//!
//! The engine talks to the `Store` trait only. Two implementations ship:
//! [`LibsqlStore`] (libSQL file, in-memory, or remote Turso database) and
//! [`MemoryStore`] for tests and throwaway runs.

pub mod error;
pub mod helpers;
pub mod memory;
mod migrations;
pub mod repos;
pub mod store;
pub mod updates;

use async_trait::async_trait;
use error::StoreError;
use libsql::Builder;
use play_core::entities::{Event, ProgressRecord, Session};

pub use memory::{MemoryStore, WriteOp};
pub use store::{SessionFilter, Store};
pub use updates::{SessionUpdate, SessionUpdateBuilder};

/// libSQL-backed store.
///
/// Wraps a database handle and one connection. Repository methods live in
/// [`repos`]; the `Store` impl below forwards to them.
pub struct LibsqlStore {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
}

impl LibsqlStore {
    /// Open a local database file, or `":memory:"`.
    ///
    /// Runs migrations automatically on open.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the database cannot be opened or migrations fail.
    pub async fn open_local(path: &str) -> Result<Self, StoreError> {
        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;

        // Per-connection in SQLite
        conn.execute("PRAGMA foreign_keys = ON", ())
            .await
            .map_err(|e| StoreError::Migration(format!("PRAGMA foreign_keys: {e}")))?;

        let store = Self { db, conn };
        store.run_migrations().await?;
        tracing::debug!(path, "opened local store");
        Ok(store)
    }

    /// Open a remote libSQL database (Turso).
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the connection or migrations fail.
    pub async fn open_remote(url: &str, auth_token: &str) -> Result<Self, StoreError> {
        let db = Builder::new_remote(url.to_string(), auth_token.to_string())
            .build()
            .await?;
        let conn = db.connect()?;

        let store = Self { db, conn };
        store.run_migrations().await?;
        tracing::debug!(url, "opened remote store");
        Ok(store)
    }

    /// Access the underlying libSQL connection for direct queries.
    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }
}

#[async_trait]
impl Store for LibsqlStore {
    async fn insert_session(&self, session: &Session) -> Result<(), StoreError> {
        self.insert_session_row(session).await
    }

    async fn update_session(&self, id: &str, update: &SessionUpdate) -> Result<(), StoreError> {
        self.update_session_row(id, update).await
    }

    async fn get_session(&self, id: &str) -> Result<Option<Session>, StoreError> {
        self.get_session_row(id).await
    }

    async fn list_sessions(&self, filter: &SessionFilter) -> Result<Vec<Session>, StoreError> {
        self.list_session_rows(filter).await
    }

    async fn insert_event(&self, event: &Event) -> Result<(), StoreError> {
        self.insert_event_row(event).await
    }

    async fn list_events(&self, session_id: &str) -> Result<Vec<Event>, StoreError> {
        self.list_event_rows(session_id).await
    }

    async fn max_sequence(&self, session_id: &str) -> Result<u32, StoreError> {
        self.max_sequence_row(session_id).await
    }

    async fn get_progress(
        &self,
        learner_id: &str,
        game_id: &str,
    ) -> Result<Option<ProgressRecord>, StoreError> {
        self.get_progress_row(learner_id, game_id).await
    }

    async fn upsert_progress(&self, record: &ProgressRecord) -> Result<(), StoreError> {
        self.upsert_progress_row(record).await
    }

    async fn list_progress(&self, learner_id: &str) -> Result<Vec<ProgressRecord>, StoreError> {
        self.list_progress_rows(learner_id).await
    }
}
