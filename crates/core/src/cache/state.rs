use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{QueryError, QueryKey};

/// Fetch status of a cache entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryStatus {
    /// No fetch running and the last one (if any) succeeded.
    Idle,
    /// A fetch is in flight.
    Loading,
    /// The last fetch failed.
    Error,
}

/// Point-in-time view of a cache entry.
///
/// `data` is the last successful value. It survives later failures, in
/// which case `error` is set beside it.
#[derive(Debug, Clone, PartialEq)]
pub struct QuerySnapshot<T> {
    pub data: Option<T>,
    pub error: Option<QueryError>,
    pub status: QueryStatus,
    pub is_stale: bool,
    pub updated_at: Option<DateTime<Utc>>,
}

impl<T> QuerySnapshot<T> {
    /// A snapshot for a key the cache has never seen.
    pub fn empty() -> Self {
        Self {
            data: None,
            error: None,
            status: QueryStatus::Idle,
            is_stale: true,
            updated_at: None,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.status == QueryStatus::Loading
    }

    /// Converts into a plain result: the data when present, the error
    /// otherwise.
    pub fn into_result(self) -> Result<T, QueryError> {
        match (self.data, self.error) {
            (Some(data), _) => Ok(data),
            (None, Some(error)) => Err(error),
            (None, None) => Err(QueryError::Aborted("no value available".to_string())),
        }
    }
}

/// What happened to a cache entry.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryEventKind {
    Loading,
    Updated,
    Failed(QueryError),
    Invalidated,
    Removed,
}

/// Notification broadcast to subscribers of a key.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryEvent {
    pub key: QueryKey,
    pub kind: QueryEventKind,
}

impl QueryEvent {
    pub fn new(key: QueryKey, kind: QueryEventKind) -> Self {
        Self { key, kind }
    }
}

/// Tuning knobs for the query cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryOptions {
    /// How long a successful value counts as fresh.
    pub stale_time: Duration,
    /// How long an unobserved entry survives before garbage collection.
    pub gc_time: Duration,
    /// Upper bound for a single fetch attempt.
    pub fetch_timeout: Duration,
    /// Extra attempts after a retryable failure.
    pub retry: u32,
    /// Delay before the first retry; doubles on each further attempt.
    pub retry_delay: Duration,
    /// Capacity before least-recently-used entries are evicted.
    pub max_entries: usize,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            stale_time: Duration::from_secs(30),
            gc_time: Duration::from_secs(300),
            fetch_timeout: Duration::from_secs(10),
            retry: 1,
            retry_delay: Duration::from_millis(200),
            max_entries: 1000,
        }
    }
}

impl QueryOptions {
    /// Returns the delay before retry number `attempt` (1-based).
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.retry_delay.saturating_mul(factor)
    }
}
