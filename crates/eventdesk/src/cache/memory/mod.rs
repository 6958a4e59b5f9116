//! In-memory query cache.
//!
//! Provides a key-addressed cache with request de-duplication and
//! broadcast notifications for a single process.

mod cache;
mod subscription;

pub use cache::QueryCache;
pub use subscription::Subscription;
