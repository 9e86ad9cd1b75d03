//! Entity structs for the playtrack domain.
//!
//! Each persisted entity maps to one logical collection of the store
//! (`sessions`, `session_events`, `progress_records`). `Recommendation` is a
//! transient ranking output and is never persisted.

mod event;
mod progress;
mod recommendation;
mod session;

pub use event::{Event, Payload};
pub use progress::ProgressRecord;
pub use recommendation::Recommendation;
pub use session::{ScoreSummary, Session, accuracy};
