// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod api;
pub mod config;
pub mod dates;
pub mod feeds;
pub mod fetch;
pub mod metrics;
pub mod severity;
pub mod text;

// ---- Re-exports for stable public API ----
pub use crate::api::{create_router, AppState};
pub use crate::config::FeedsConfig;
pub use crate::feeds::aggregate;
pub use crate::feeds::types::{Category, EpssPrediction, FeedData, FeedItem};
pub use crate::fetch::{Fetch, HttpFetcher};
pub use crate::severity::Severity;
