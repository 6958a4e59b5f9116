//! Shared fixtures for service tests.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use eventdesk_core::cache::QueryOptions;
use eventdesk_core::content::ResourceKind;
use eventdesk_core::provider::{
    ContentSource, EntryCollection, EntryQuery, ProviderError, Result,
};

use super::ServiceContext;
use crate::cache::QueryCache;
use crate::provider::InMemoryProvider;

/// Context reading from and writing to the same in-memory provider.
pub(crate) fn context(provider: &InMemoryProvider) -> ServiceContext {
    let provider = Arc::new(provider.clone());
    ServiceContext::new(
        provider.clone(),
        provider,
        QueryCache::new(QueryOptions::default()),
    )
}

/// Context whose reads only see published entries, like the delivery API.
pub(crate) fn delivery_context(provider: &InMemoryProvider) -> ServiceContext {
    ServiceContext::new(
        Arc::new(PublishedOnly(provider.clone())),
        Arc::new(provider.clone()),
        QueryCache::new(QueryOptions::default()),
    )
}

/// Source that hides drafts from an in-memory provider.
pub(crate) struct PublishedOnly(pub(crate) InMemoryProvider);

fn is_published(entry: &Value) -> bool {
    entry
        .pointer("/sys/publishedVersion")
        .is_some_and(|version| !version.is_null())
}

#[async_trait]
impl ContentSource for PublishedOnly {
    async fn entries(&self, query: &EntryQuery) -> Result<EntryCollection> {
        let mut collection = self.0.entries(query).await?;
        collection.items.retain(is_published);
        collection.total = collection.items.len() as u32;
        Ok(collection)
    }

    async fn entry(&self, kind: ResourceKind, id: &str) -> Result<Value> {
        let entry = self.0.entry(kind, id).await?;
        if is_published(&entry) {
            Ok(entry)
        } else {
            Err(ProviderError::not_found(kind, id))
        }
    }
}

/// Source whose every read fails with a transport error.
pub(crate) struct FailingSource;

#[async_trait]
impl ContentSource for FailingSource {
    async fn entries(&self, _query: &EntryQuery) -> Result<EntryCollection> {
        Err(ProviderError::Transport("connection refused".to_string()))
    }

    async fn entry(&self, _kind: ResourceKind, _id: &str) -> Result<Value> {
        Err(ProviderError::Transport("connection refused".to_string()))
    }
}
