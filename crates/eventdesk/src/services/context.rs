use std::sync::Arc;

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;

use eventdesk_core::cache::{kind_prefix, record_key, QueryError, QueryKey};
use eventdesk_core::content::ResourceKind;
use eventdesk_core::normalize::resolve_links;
use eventdesk_core::provider::{
    sys_id, sys_version, ContentManager, ContentSource, ContentTypes, EntryQuery, ProviderError,
};

use crate::cache::QueryCache;
use crate::config::ReadFallback;
use crate::error::Result;

/// One page of records plus the provider's total count.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing<T> {
    pub items: Vec<T>,
    pub total: u32,
}

impl<T> Listing<T> {
    pub fn new(items: Vec<T>) -> Self {
        let total = items.len() as u32;
        Self { items, total }
    }
}

/// Shared dependencies of the resource services.
///
/// Cheap to clone: the provider handles are `Arc`s and the cache shares its
/// store between clones.
#[derive(Clone)]
pub struct ServiceContext {
    pub(crate) source: Arc<dyn ContentSource>,
    pub(crate) manager: Arc<dyn ContentManager>,
    pub(crate) cache: QueryCache,
    pub(crate) content_types: ContentTypes,
    pub(crate) page_size: u32,
    pub(crate) fallback: ReadFallback,
}

impl ServiceContext {
    pub fn new(
        source: Arc<dyn ContentSource>,
        manager: Arc<dyn ContentManager>,
        cache: QueryCache,
    ) -> Self {
        Self {
            source,
            manager,
            cache,
            content_types: ContentTypes::default(),
            page_size: 50,
            fallback: ReadFallback::default(),
        }
    }

    pub fn with_content_types(mut self, content_types: ContentTypes) -> Self {
        self.content_types = content_types;
        self
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_fallback(mut self, fallback: ReadFallback) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    /// Query for entries of a kind.
    pub(crate) fn query(&self, kind: ResourceKind) -> EntryQuery {
        EntryQuery::of_type(self.content_types.for_kind(kind))
    }

    /// Reads a listing through the cache.
    pub(crate) async fn list<T>(
        &self,
        key: &QueryKey,
        query: EntryQuery,
        normalize: fn(&Value) -> T,
    ) -> std::result::Result<Listing<T>, QueryError>
    where
        T: Serialize + DeserializeOwned + Send + 'static,
    {
        let source = Arc::clone(&self.source);
        self.cache
            .fetch(key, move || {
                let source = Arc::clone(&source);
                let query = query.clone();
                async move {
                    let collection = source.entries(&query).await?;
                    let items = resolve_links(&collection).iter().map(normalize).collect();
                    Ok::<_, ProviderError>(Listing {
                        items,
                        total: collection.total,
                    })
                }
            })
            .await
    }

    /// Reads the first record matching a query through the cache. An empty
    /// result is a `NotFound` for `label`.
    pub(crate) async fn first<T>(
        &self,
        key: &QueryKey,
        kind: ResourceKind,
        label: &str,
        query: EntryQuery,
        normalize: fn(&Value) -> T,
    ) -> std::result::Result<T, QueryError>
    where
        T: Serialize + DeserializeOwned + Send + 'static,
    {
        let source = Arc::clone(&self.source);
        let label = label.to_string();
        self.cache
            .fetch(key, move || {
                let source = Arc::clone(&source);
                let query = query.clone().with_limit(1);
                let label = label.clone();
                async move {
                    let collection = source.entries(&query).await?;
                    resolve_links(&collection)
                        .first()
                        .map(normalize)
                        .ok_or(ProviderError::NotFound { kind, id: label })
                }
            })
            .await
    }

    /// Reads a single record by id through the cache.
    pub(crate) async fn record<T>(
        &self,
        kind: ResourceKind,
        id: &str,
        normalize: fn(&Value) -> T,
    ) -> std::result::Result<T, QueryError>
    where
        T: Serialize + DeserializeOwned + Send + 'static,
    {
        let source = Arc::clone(&self.source);
        let id = id.to_string();
        self.cache
            .fetch(&record_key(kind, &id), move || {
                let source = Arc::clone(&source);
                let id = id.clone();
                async move {
                    let raw = source.entry(kind, &id).await?;
                    Ok::<_, ProviderError>(normalize(&raw))
                }
            })
            .await
    }

    /// Applies the read fallback policy to a failed read.
    ///
    /// With [`ReadFallback::Demo`] the error is logged and `demo` supplies
    /// the value; a `demo` that has nothing to offer surfaces the error.
    pub(crate) fn recover<T>(
        &self,
        key: &QueryKey,
        result: std::result::Result<T, QueryError>,
        demo: impl FnOnce() -> Option<T>,
    ) -> Result<T> {
        match (result, self.fallback) {
            (Ok(value), _) => Ok(value),
            (Err(err), ReadFallback::Surface) => Err(err.into()),
            (Err(err), ReadFallback::Demo) => match demo() {
                Some(value) => {
                    tracing::warn!(key = %key, error = %err, "Read failed, serving demo data");
                    Ok(value)
                }
                None => Err(err.into()),
            },
        }
    }

    /// Refreshes the cache after a record was created or updated, then
    /// reads it back through the source so its relations come back
    /// resolved.
    ///
    /// The id key is dropped before the read, so a failure never serves the
    /// pre-write value. When the source cannot see the record (a draft
    /// behind the delivery API), `written` is returned instead.
    pub(crate) async fn reread<T>(
        &self,
        kind: ResourceKind,
        id: &str,
        written: T,
        normalize: fn(&Value) -> T,
    ) -> T
    where
        T: Serialize + DeserializeOwned + Send + 'static,
    {
        self.cache.remove(&record_key(kind, id));
        self.cache.invalidate(&kind_prefix(kind));

        match self.record(kind, id, normalize).await {
            Ok(record) => record,
            Err(err) => {
                tracing::debug!(kind = %kind, id = %id, error = %err, "Written record not visible to source");
                written
            }
        }
    }

    /// Refreshes the cache after a record was deleted.
    pub(crate) fn record_deleted(&self, kind: ResourceKind, id: &str) {
        self.cache.remove(&record_key(kind, id));
        self.cache.invalidate(&kind_prefix(kind));
    }
}

/// Reads the id and version of a raw entry returned by a write.
pub(crate) fn id_and_version(raw: &Value) -> Result<(String, u64)> {
    let id = sys_id(raw)
        .ok_or_else(|| ProviderError::InvalidResponse("entry has no id".to_string()))?;
    let version = sys_version(raw).ok_or_else(|| {
        ProviderError::InvalidResponse(format!("entry {id} has no version"))
    })?;
    Ok((id.to_string(), version))
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("cache", &self.cache)
            .field("content_types", &self.content_types)
            .field("page_size", &self.page_size)
            .field("fallback", &self.fallback)
            .finish_non_exhaustive()
    }
}
