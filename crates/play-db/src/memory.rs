//! In-memory `Store` implementation.
//!
//! Collections are kept in `BTreeMap`s behind tokio `RwLock`s. Ordering and
//! error semantics match `LibsqlStore`, so the engine cannot tell them apart.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU8, Ordering};

use async_trait::async_trait;
use play_core::entities::{Event, ProgressRecord, Session};
use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::store::{SessionFilter, Store};
use crate::updates::SessionUpdate;

/// A write operation of the store, for fault injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOp {
    InsertSession,
    UpdateSession,
    InsertEvent,
    UpsertProgress,
}

impl WriteOp {
    const ALL: u8 = 0b1111;

    const fn bit(self) -> u8 {
        match self {
            Self::InsertSession => 0b0001,
            Self::UpdateSession => 0b0010,
            Self::InsertEvent => 0b0100,
            Self::UpsertProgress => 0b1000,
        }
    }
}

/// Thread-safe in-memory store.
///
/// Writes can be made to fail with `StoreError::Query`, all at once or one
/// operation at a time, which lets tests exercise persistence-failure paths.
#[derive(Default)]
pub struct MemoryStore {
    sessions: RwLock<BTreeMap<String, Session>>,
    /// Keyed by session id, then sequence number.
    events: RwLock<BTreeMap<String, BTreeMap<u32, Event>>>,
    progress: RwLock<BTreeMap<(String, String), ProgressRecord>>,
    /// Bitmask of failing `WriteOp`s.
    failing: AtomicU8,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent writes fail (or succeed again).
    pub fn set_fail_writes(&self, fail: bool) {
        let mask = if fail { WriteOp::ALL } else { 0 };
        self.failing.store(mask, Ordering::SeqCst);
    }

    /// Make one kind of write fail (or succeed again), leaving the others alone.
    pub fn set_fail_operation(&self, op: WriteOp, fail: bool) {
        if fail {
            self.failing.fetch_or(op.bit(), Ordering::SeqCst);
        } else {
            self.failing.fetch_and(!op.bit(), Ordering::SeqCst);
        }
    }

    fn check_writable(&self, op: WriteOp) -> Result<(), StoreError> {
        if self.failing.load(Ordering::SeqCst) & op.bit() != 0 {
            return Err(StoreError::Query(format!("{op:?} disabled")));
        }
        Ok(())
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn insert_session(&self, session: &Session) -> Result<(), StoreError> {
        self.check_writable(WriteOp::InsertSession)?;
        let mut sessions = self.sessions.write().await;
        if sessions.contains_key(&session.id) {
            return Err(StoreError::Duplicate {
                collection: "sessions".into(),
                key: session.id.clone(),
            });
        }
        sessions.insert(session.id.clone(), session.clone());
        Ok(())
    }

    async fn update_session(&self, id: &str, update: &SessionUpdate) -> Result<(), StoreError> {
        self.check_writable(WriteOp::UpdateSession)?;
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(id).ok_or(StoreError::NoResult)?;
        update.apply(session);
        Ok(())
    }

    async fn get_session(&self, id: &str) -> Result<Option<Session>, StoreError> {
        Ok(self.sessions.read().await.get(id).cloned())
    }

    async fn list_sessions(&self, filter: &SessionFilter) -> Result<Vec<Session>, StoreError> {
        let sessions = self.sessions.read().await;
        let mut matched: Vec<Session> = sessions
            .values()
            .filter(|s| filter.matches(s))
            .cloned()
            .collect();
        matched.sort_by(|a, b| b.started_at.cmp(&a.started_at).then_with(|| a.id.cmp(&b.id)));
        if let Some(limit) = filter.limit {
            matched.truncate(limit as usize);
        }
        Ok(matched)
    }

    async fn insert_event(&self, event: &Event) -> Result<(), StoreError> {
        self.check_writable(WriteOp::InsertEvent)?;
        if !self.sessions.read().await.contains_key(&event.session_id) {
            return Err(StoreError::InvalidState(format!(
                "event references unknown session '{}'",
                event.session_id
            )));
        }
        let mut events = self.events.write().await;
        let log = events.entry(event.session_id.clone()).or_default();
        if log.contains_key(&event.sequence_number) {
            return Err(StoreError::Duplicate {
                collection: "session_events".into(),
                key: format!("{}#{}", event.session_id, event.sequence_number),
            });
        }
        log.insert(event.sequence_number, event.clone());
        Ok(())
    }

    async fn list_events(&self, session_id: &str) -> Result<Vec<Event>, StoreError> {
        Ok(self
            .events
            .read()
            .await
            .get(session_id)
            .map(|log| log.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn max_sequence(&self, session_id: &str) -> Result<u32, StoreError> {
        Ok(self
            .events
            .read()
            .await
            .get(session_id)
            .and_then(|log| log.keys().next_back().copied())
            .unwrap_or(0))
    }

    async fn get_progress(
        &self,
        learner_id: &str,
        game_id: &str,
    ) -> Result<Option<ProgressRecord>, StoreError> {
        Ok(self
            .progress
            .read()
            .await
            .get(&(learner_id.to_string(), game_id.to_string()))
            .cloned())
    }

    async fn upsert_progress(&self, record: &ProgressRecord) -> Result<(), StoreError> {
        self.check_writable(WriteOp::UpsertProgress)?;
        self.progress.write().await.insert(
            (record.learner_id.clone(), record.game_id.clone()),
            record.clone(),
        );
        Ok(())
    }

    async fn list_progress(&self, learner_id: &str) -> Result<Vec<ProgressRecord>, StoreError> {
        let progress = self.progress.read().await;
        let mut records: Vec<ProgressRecord> = progress
            .values()
            .filter(|r| r.learner_id == learner_id)
            .cloned()
            .collect();
        records.sort_by(|a, b| {
            b.last_played_at
                .cmp(&a.last_played_at)
                .then_with(|| a.game_id.cmp(&b.game_id))
        });
        Ok(records)
    }
}
