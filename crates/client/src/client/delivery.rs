//! Delivery and preview API reads.

use async_trait::async_trait;
use eventdesk_core::content::ResourceKind;
use eventdesk_core::normalize::resolve_links;
use eventdesk_core::provider::{self, ContentSource, EntryCollection, EntryQuery};
use serde_json::Value;

use super::{handle_response, join, Space, Target, DELIVERY_URL, PREVIEW_URL};
use crate::error::{ClientError, Result};

/// Link depth requested when fetching a single entry.
const ENTRY_INCLUDE_DEPTH: u8 = 2;

/// Read-only client for the delivery API (published content) or the
/// preview API (drafts included). Both share one wire format.
#[derive(Debug, Clone)]
pub struct DeliveryClient {
    client: reqwest::Client,
    base_url: String,
    token: String,
    space: Space,
}

impl DeliveryClient {
    /// Create a client for the given host.
    pub fn new(base_url: impl Into<String>, token: impl Into<String>, space: Space) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            token: token.into(),
            space,
        }
    }

    /// Create a client for the public delivery host.
    pub fn delivery(token: impl Into<String>, space: Space) -> Self {
        Self::new(DELIVERY_URL, token, space)
    }

    /// Create a client for the public preview host.
    pub fn preview(token: impl Into<String>, space: Space) -> Self {
        Self::new(PREVIEW_URL, token, space)
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        join(&self.base_url, &format!("{}{}", self.space.path(), path))
    }

    /// List entries matching a query.
    pub async fn get_entries(&self, query: &EntryQuery) -> Result<EntryCollection> {
        let response = self
            .client
            .get(self.url("/entries"))
            .bearer_auth(&self.token)
            .query(&query.pairs())
            .send()
            .await?;
        handle_response(response, Target::Collection).await
    }

    /// Get one entry by id with its links resolved.
    pub async fn get_entry(&self, kind: ResourceKind, id: &str) -> Result<Value> {
        let query = EntryQuery::new()
            .with_ids([id])
            .with_include(ENTRY_INCLUDE_DEPTH);
        let collection = self.get_entries(&query).await?;

        resolve_links(&collection)
            .into_iter()
            .find(|entry| provider::sys_id(entry) == Some(id))
            .ok_or_else(|| ClientError::NotFound {
                kind,
                id: id.to_string(),
            })
    }
}

#[async_trait]
impl ContentSource for DeliveryClient {
    async fn entries(&self, query: &EntryQuery) -> provider::Result<EntryCollection> {
        Ok(self.get_entries(query).await?)
    }

    async fn entry(&self, kind: ResourceKind, id: &str) -> provider::Result<Value> {
        Ok(self.get_entry(kind, id).await?)
    }
}
