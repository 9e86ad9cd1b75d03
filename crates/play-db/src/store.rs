//! The `Store` capability: access to the three logical collections.

use async_trait::async_trait;
use play_core::entities::{Event, ProgressRecord, Session};
use play_core::enums::SessionStatus;

use crate::error::StoreError;
use crate::updates::SessionUpdate;

/// Filter for session queries. Results are ordered by `started_at` descending.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionFilter {
    pub learner_id: Option<String>,
    pub organization_id: Option<String>,
    pub status: Option<SessionStatus>,
    /// Maximum rows to return. `None` returns every match.
    pub limit: Option<u32>,
}

impl SessionFilter {
    #[must_use]
    pub fn for_learner(learner_id: &str) -> Self {
        Self {
            learner_id: Some(learner_id.to_string()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn for_organization(organization_id: Option<&str>) -> Self {
        Self {
            organization_id: organization_id.map(String::from),
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Whether a session satisfies every set criterion (ignores `limit`).
    #[must_use]
    pub fn matches(&self, session: &Session) -> bool {
        self.learner_id
            .as_deref()
            .is_none_or(|id| session.learner_id == id)
            && self
                .organization_id
                .as_deref()
                .is_none_or(|org| session.organization_id.as_deref() == Some(org))
            && self.status.is_none_or(|status| session.status == status)
    }
}

/// Read/write gateway to sessions, session events, and progress records.
///
/// Implementations fail fast with a `StoreError` and never retry internally.
/// No cross-call transactions are offered: a read-modify-write of a progress
/// record is last-writer-wins.
#[async_trait]
pub trait Store: Send + Sync {
    // ── Sessions ─────────────────────────────────────────────────────────────

    /// Insert a new session. Fails with `Duplicate` if the id exists.
    async fn insert_session(&self, session: &Session) -> Result<(), StoreError>;

    /// Apply a partial update. Fails with `NoResult` if the id is unknown.
    async fn update_session(&self, id: &str, update: &SessionUpdate) -> Result<(), StoreError>;

    async fn get_session(&self, id: &str) -> Result<Option<Session>, StoreError>;

    async fn list_sessions(&self, filter: &SessionFilter) -> Result<Vec<Session>, StoreError>;

    // ── Events ───────────────────────────────────────────────────────────────

    /// Append an event. Fails with `Duplicate` if `(session_id, sequence_number)` exists.
    async fn insert_event(&self, event: &Event) -> Result<(), StoreError>;

    /// Events of one session ordered by sequence number.
    async fn list_events(&self, session_id: &str) -> Result<Vec<Event>, StoreError>;

    /// Highest stored sequence number of a session, 0 when it has none.
    async fn max_sequence(&self, session_id: &str) -> Result<u32, StoreError>;

    // ── Progress records ─────────────────────────────────────────────────────

    async fn get_progress(
        &self,
        learner_id: &str,
        game_id: &str,
    ) -> Result<Option<ProgressRecord>, StoreError>;

    /// Insert or replace the record keyed by `(learner_id, game_id)`.
    async fn upsert_progress(&self, record: &ProgressRecord) -> Result<(), StoreError>;

    /// Records of one learner ordered by `last_played_at` descending.
    async fn list_progress(&self, learner_id: &str) -> Result<Vec<ProgressRecord>, StoreError>;
}
