//! Shared harness: a `PlayService` over `MemoryStore`, the sample catalog
//! and a manual clock.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use play_config::EngineConfig;
use play_core::entities::Payload;
use play_db::MemoryStore;
use play_engine::{Catalog, ManualClock, PlayService, StaticCatalog};

pub struct Harness {
    pub service: PlayService,
    pub store: Arc<MemoryStore>,
    pub clock: Arc<ManualClock>,
}

pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 6, 1, 9, 0, 0).unwrap()
}

pub fn harness() -> Harness {
    harness_with(EngineConfig::default(), StaticCatalog::sample())
}

pub fn harness_with(config: EngineConfig, catalog: impl Catalog + 'static) -> Harness {
    let store = Arc::new(MemoryStore::new());
    let clock = Arc::new(ManualClock::new(t0()));
    let service = PlayService::new(store.clone(), Arc::new(catalog), clock.clone(), config);
    Harness {
        service,
        store,
        clock,
    }
}

pub fn settings(difficulty: &str) -> Payload {
    let mut settings = Payload::new();
    settings.insert("difficulty".into(), difficulty.into());
    settings
}

pub fn answer(correct: bool) -> Payload {
    let mut payload = Payload::new();
    payload.insert("correct".into(), correct.into());
    payload
}
