//! Subscriptions to query cache notifications.

use std::fmt;
use std::sync::{Arc, Mutex};

use tokio::sync::broadcast::{self, error::RecvError};

use eventdesk_core::cache::{QueryEvent, QueryKey};

use super::cache::{lock, Store};

/// Guard returned by [`QueryCache::subscribe`](super::QueryCache::subscribe).
///
/// While it lives the entry counts as observed and is never garbage
/// collected. Dropping it releases the entry.
pub struct Subscription {
    key: QueryKey,
    store: Arc<Mutex<Store>>,
    events: broadcast::Receiver<QueryEvent>,
}

impl Subscription {
    pub(super) fn new(
        key: QueryKey,
        store: Arc<Mutex<Store>>,
        events: broadcast::Receiver<QueryEvent>,
    ) -> Self {
        Self { key, store, events }
    }

    pub fn key(&self) -> &QueryKey {
        &self.key
    }

    /// Waits for the next event on this key. Returns `None` once the cache
    /// has been dropped.
    pub async fn recv(&mut self) -> Option<QueryEvent> {
        loop {
            match self.events.recv().await {
                Ok(event) if event.key == self.key => return Some(event),
                Ok(_) => continue,
                Err(RecvError::Lagged(skipped)) => {
                    tracing::trace!(key = %self.key, skipped, "Subscription lagged");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        lock(&self.store).release(&self.key);
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("key", &self.key).finish()
    }
}
