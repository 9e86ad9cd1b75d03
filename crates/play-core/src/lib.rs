//! # play-core
//!
//! Core types, ID generation, and error types for playtrack.
//!
//! This crate provides the foundational types shared across all playtrack crates:
//! - Entity structs for play sessions, session events, and progress records
//! - Status and level enums with state machine / ladder helpers
//! - Computed analytics views (performance metrics, platform analytics)
//! - Catalog game descriptors consumed from the external game catalog
//! - ID prefix constants and generation
//! - Cross-cutting error types

pub mod analytics;
pub mod catalog;
pub mod entities;
pub mod enums;
pub mod errors;
pub mod ids;
