//! # play-engine
//!
//! Game session and learning-progression analytics for playtrack.
//!
//! [`PlayService`] records play sessions and their events, derives per-game
//! mastery and skill level from completed sessions, ranks catalog games for
//! recommendation, and rolls sessions up into performance and platform
//! views. Reads for demo learners are served by a deterministic synthesizer
//! instead of the store.
//!
//! Collaborators are injected: the [`play_db::Store`] gateway, a [`Catalog`],
//! and a [`Clock`].

pub mod catalog;
pub mod clock;
pub mod demo;
pub mod error;
mod events;
pub mod metrics;
pub mod progression;
pub mod recommend;
mod service;
mod session;

pub use catalog::{Catalog, StaticCatalog};
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::EngineError;
pub use service::PlayService;
