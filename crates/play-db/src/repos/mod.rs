//! Collection repositories for `LibsqlStore`.
//!
//! Each module adds methods to `LibsqlStore` via `impl LibsqlStore` blocks;
//! the `Store` trait impl in the crate root delegates to them.

pub mod event;
pub mod progress;
pub mod session;
