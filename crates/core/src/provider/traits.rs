use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::content::{AssetUpload, ResourceKind};

use super::{Asset, EntryCollection, EntryQuery, Result};

/// Read access to published (or preview) content.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Lists entries matching the query, with linked entries and assets
    /// in the collection's includes.
    async fn entries(&self, query: &EntryQuery) -> Result<EntryCollection>;

    /// Gets a single raw entry by its ID.
    async fn entry(&self, kind: ResourceKind, id: &str) -> Result<Value>;
}

/// Write access to content.
///
/// Field maps are unlocalized; implementations wrap and unwrap locales.
/// Returned entries are unlocalized as well.
#[async_trait]
pub trait ContentManager: Send + Sync {
    /// Creates an entry of the given kind.
    async fn create_entry(&self, kind: ResourceKind, fields: Map<String, Value>) -> Result<Value>;

    /// Replaces the fields of an entry at the given version.
    async fn update_entry(
        &self,
        kind: ResourceKind,
        id: &str,
        version: u64,
        fields: Map<String, Value>,
    ) -> Result<Value>;

    /// Gets the latest revision of an entry, published or not. Links are
    /// left unresolved.
    async fn current_entry(&self, kind: ResourceKind, id: &str) -> Result<Value>;

    /// Returns the current version of an entry.
    async fn entry_version(&self, kind: ResourceKind, id: &str) -> Result<u64>;

    /// Deletes an entry. Published entries must be unpublished first.
    async fn delete_entry(&self, kind: ResourceKind, id: &str) -> Result<()>;

    /// Publishes an entry at the given version.
    async fn publish_entry(&self, kind: ResourceKind, id: &str, version: u64) -> Result<Value>;

    /// Unpublishes an entry at the given version.
    async fn unpublish_entry(&self, kind: ResourceKind, id: &str, version: u64) -> Result<Value>;

    /// Uploads a file, processes it and publishes the resulting asset.
    async fn upload_asset(&self, upload: AssetUpload) -> Result<Asset>;
}
