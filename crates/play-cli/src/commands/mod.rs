pub mod analytics;
pub mod catalog;
pub mod dispatch;
pub mod metrics;
pub mod progress;
pub mod recommend;
pub mod schema;
pub mod session;
pub mod shared;
