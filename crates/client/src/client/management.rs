//! Management API writes.

use std::time::Duration;

use async_trait::async_trait;
use eventdesk_core::content::{AssetUpload, ResourceKind};
use eventdesk_core::normalize::{delocalize, localize};
use eventdesk_core::provider::{self, Asset, ContentManager, ContentTypes};
use serde_json::{json, Map, Value};

use super::{
    handle_empty_response, handle_response, join, Space, Target, MANAGEMENT_JSON,
    MANAGEMENT_URL, UPLOAD_URL,
};
use crate::error::{ClientError, Result};

pub(crate) const CONTENT_TYPE_HEADER: &str = "X-Contentful-Content-Type";
pub(crate) const VERSION_HEADER: &str = "X-Contentful-Version";

/// Client for the management API (and the upload API for assets).
///
/// Field maps go in and come out unlocalized; the client wraps and unwraps
/// them for its configured locale.
#[derive(Debug, Clone)]
pub struct ManagementClient {
    pub(crate) client: reqwest::Client,
    pub(crate) base_url: String,
    pub(crate) upload_url: String,
    pub(crate) token: String,
    pub(crate) space: Space,
    pub(crate) locale: String,
    pub(crate) content_types: ContentTypes,
    pub(crate) poll_interval: Duration,
    pub(crate) poll_attempts: u32,
}

impl ManagementClient {
    /// Create a client against the public management and upload hosts.
    pub fn new(token: impl Into<String>, space: Space) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: MANAGEMENT_URL.to_string(),
            upload_url: UPLOAD_URL.to_string(),
            token: token.into(),
            space,
            locale: "en-US".to_string(),
            content_types: ContentTypes::default(),
            poll_interval: Duration::from_millis(500),
            poll_attempts: 20,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_upload_url(mut self, upload_url: impl Into<String>) -> Self {
        self.upload_url = upload_url.into();
        self
    }

    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }

    pub fn with_content_types(mut self, content_types: ContentTypes) -> Self {
        self.content_types = content_types;
        self
    }

    /// Sets how often and how many times asset processing is polled.
    pub fn with_asset_polling(mut self, interval: Duration, attempts: u32) -> Self {
        self.poll_interval = interval;
        self.poll_attempts = attempts.max(1);
        self
    }

    pub(crate) fn url(&self, path: &str) -> String {
        join(&self.base_url, &format!("{}{}", self.space.path(), path))
    }

    fn entry_url(&self, id: &str) -> String {
        self.url(&format!("/entries/{id}"))
    }

    pub(crate) fn request(&self, method: reqwest::Method, url: String) -> reqwest::RequestBuilder {
        self.client
            .request(method, url)
            .bearer_auth(&self.token)
            .header(reqwest::header::CONTENT_TYPE, MANAGEMENT_JSON)
    }

    fn body(&self, fields: Map<String, Value>) -> Value {
        json!({ "fields": Value::Object(localize(fields, &self.locale)) })
    }

    /// Create an entry.
    pub async fn create(&self, kind: ResourceKind, fields: Map<String, Value>) -> Result<Value> {
        let response = self
            .request(reqwest::Method::POST, self.url("/entries"))
            .header(CONTENT_TYPE_HEADER, self.content_types.for_kind(kind))
            .json(&self.body(fields))
            .send()
            .await?;
        let entry: Value = handle_response(response, Target::Collection).await?;
        Ok(delocalize(&entry, &self.locale))
    }

    /// Replace an entry's fields.
    pub async fn update(
        &self,
        kind: ResourceKind,
        id: &str,
        version: u64,
        fields: Map<String, Value>,
    ) -> Result<Value> {
        let response = self
            .request(reqwest::Method::PUT, self.entry_url(id))
            .header(VERSION_HEADER, version.to_string())
            .json(&self.body(fields))
            .send()
            .await?;
        let entry: Value = handle_response(response, Target::Record(kind, id)).await?;
        Ok(delocalize(&entry, &self.locale))
    }

    /// Get the latest revision of an entry, drafts included.
    pub async fn get(&self, kind: ResourceKind, id: &str) -> Result<Value> {
        let response = self
            .request(reqwest::Method::GET, self.entry_url(id))
            .send()
            .await?;
        let entry: Value = handle_response(response, Target::Record(kind, id)).await?;
        Ok(delocalize(&entry, &self.locale))
    }

    /// Get an entry's current version.
    pub async fn version(&self, kind: ResourceKind, id: &str) -> Result<u64> {
        let entry = self.get(kind, id).await?;
        provider::sys_version(&entry)
            .ok_or_else(|| ClientError::InvalidResponse(format!("entry {id} has no version")))
    }

    /// Delete an entry.
    pub async fn delete(&self, kind: ResourceKind, id: &str) -> Result<()> {
        let response = self
            .request(reqwest::Method::DELETE, self.entry_url(id))
            .send()
            .await?;
        handle_empty_response(response, Target::Record(kind, id)).await
    }

    /// Publish an entry.
    pub async fn publish(&self, kind: ResourceKind, id: &str, version: u64) -> Result<Value> {
        let response = self
            .request(reqwest::Method::PUT, self.url(&format!("/entries/{id}/published")))
            .header(VERSION_HEADER, version.to_string())
            .send()
            .await?;
        let entry: Value = handle_response(response, Target::Record(kind, id)).await?;
        Ok(delocalize(&entry, &self.locale))
    }

    /// Unpublish an entry.
    pub async fn unpublish(&self, kind: ResourceKind, id: &str, version: u64) -> Result<Value> {
        let response = self
            .request(reqwest::Method::DELETE, self.url(&format!("/entries/{id}/published")))
            .header(VERSION_HEADER, version.to_string())
            .send()
            .await?;
        let entry: Value = handle_response(response, Target::Record(kind, id)).await?;
        Ok(delocalize(&entry, &self.locale))
    }
}

#[async_trait]
impl ContentManager for ManagementClient {
    async fn create_entry(
        &self,
        kind: ResourceKind,
        fields: Map<String, Value>,
    ) -> provider::Result<Value> {
        Ok(self.create(kind, fields).await?)
    }

    async fn update_entry(
        &self,
        kind: ResourceKind,
        id: &str,
        version: u64,
        fields: Map<String, Value>,
    ) -> provider::Result<Value> {
        Ok(self.update(kind, id, version, fields).await?)
    }

    async fn current_entry(&self, kind: ResourceKind, id: &str) -> provider::Result<Value> {
        Ok(self.get(kind, id).await?)
    }

    async fn entry_version(&self, kind: ResourceKind, id: &str) -> provider::Result<u64> {
        Ok(self.version(kind, id).await?)
    }

    async fn delete_entry(&self, kind: ResourceKind, id: &str) -> provider::Result<()> {
        Ok(self.delete(kind, id).await?)
    }

    async fn publish_entry(
        &self,
        kind: ResourceKind,
        id: &str,
        version: u64,
    ) -> provider::Result<Value> {
        Ok(self.publish(kind, id, version).await?)
    }

    async fn unpublish_entry(
        &self,
        kind: ResourceKind,
        id: &str,
        version: u64,
    ) -> provider::Result<Value> {
        Ok(self.unpublish(kind, id, version).await?)
    }

    async fn upload_asset(&self, upload: AssetUpload) -> provider::Result<Asset> {
        Ok(self.upload(upload).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eventdesk_core::content::{EventDraft, OrganizerDraft};
    use eventdesk_core::normalize::{normalize_event, normalize_organizer};
    use eventdesk_core::provider::ProviderError;
    use httpmock::MockServer;

    const ENTRIES: &str = "/spaces/space1/environments/master/entries";

    fn client(server: &MockServer) -> ManagementClient {
        ManagementClient::new("cma-token", Space::new("space1", "master"))
            .with_base_url(server.base_url())
            .with_upload_url(server.base_url())
    }

    #[tokio::test]
    async fn test_create_wraps_locale_and_sets_content_type() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method("POST")
                .path(ENTRIES)
                .header("authorization", "Bearer cma-token")
                .header("content-type", MANAGEMENT_JSON)
                .header(CONTENT_TYPE_HEADER, "author")
                .json_body(json!({
                    "fields": {
                        "name": {"en-US": "Design Guild"},
                        "email": {"en-US": "hello@designguild.com"}
                    }
                }));
            then.status(201).json_body(json!({
                "sys": {"id": "o-9", "version": 1},
                "fields": {
                    "name": {"en-US": "Design Guild"},
                    "email": {"en-US": "hello@designguild.com"}
                }
            }));
        });

        let fields = OrganizerDraft::new("Design Guild", "hello@designguild.com").to_fields();
        let raw = client(&server)
            .create_entry(ResourceKind::Organizer, fields)
            .await
            .unwrap();

        mock.assert();
        let organizer = normalize_organizer(&raw);
        assert_eq!(organizer.id, "o-9");
        assert_eq!(organizer.name, "Design Guild");
    }

    #[tokio::test]
    async fn test_update_sends_version() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method("PUT")
                .path(format!("{ENTRIES}/e-1"))
                .header(VERSION_HEADER, "4");
            then.status(200).json_body(json!({
                "sys": {"id": "e-1", "version": 5},
                "fields": {"title": {"en-US": "Renamed"}}
            }));
        });

        let draft = EventDraft {
            title: "Renamed".to_string(),
            ..EventDraft::default()
        };
        let raw = client(&server)
            .update_entry(ResourceKind::Event, "e-1", 4, draft.to_fields())
            .await
            .unwrap();

        mock.assert();
        assert_eq!(normalize_event(&raw).title, "Renamed");
    }

    #[tokio::test]
    async fn test_validation_failure_has_field_errors() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method("POST").path(ENTRIES);
            then.status(422).json_body(json!({
                "sys": {"type": "Error", "id": "ValidationFailed"},
                "message": "Validation error",
                "details": {"errors": [{"name": "required", "path": ["fields", "title"]}]}
            }));
        });

        let error = client(&server)
            .create_entry(ResourceKind::Event, Map::new())
            .await
            .unwrap_err();

        assert_eq!(error.field_errors().len(), 1);
        assert_eq!(error.field_errors()[0].path, "fields.title");
    }

    #[tokio::test]
    async fn test_version_and_missing_entry() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method("GET").path(format!("{ENTRIES}/e-1"));
            then.status(200).json_body(json!({"sys": {"id": "e-1", "version": 12}}));
        });
        server.mock(|when, then| {
            when.method("GET").path(format!("{ENTRIES}/e-404"));
            then.status(404).json_body(json!({
                "sys": {"type": "Error", "id": "NotFound"},
                "message": "The resource could not be found."
            }));
        });

        let client = client(&server);
        assert_eq!(client.entry_version(ResourceKind::Event, "e-1").await, Ok(12));
        assert_eq!(
            client.entry_version(ResourceKind::Event, "e-404").await,
            Err(ProviderError::not_found(ResourceKind::Event, "e-404"))
        );
    }

    #[tokio::test]
    async fn test_current_entry_returns_unlocalized_draft() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method("GET")
                .path(format!("{ENTRIES}/e-3"))
                .header("authorization", "Bearer cma-token");
            then.status(200).json_body(json!({
                "sys": {"id": "e-3", "version": 7},
                "fields": {
                    "title": {"en-US": "Draft Night"},
                    "organizer": {"en-US": {"sys": {"type": "Link", "linkType": "Entry", "id": "o-1"}}}
                }
            }));
        });

        let raw = client(&server)
            .current_entry(ResourceKind::Event, "e-3")
            .await
            .unwrap();

        mock.assert();
        assert_eq!(provider::sys_version(&raw), Some(7));
        let event = normalize_event(&raw);
        assert_eq!(event.title, "Draft Night");
        assert_eq!(event.organizer.id(), "o-1");
        assert!(!event.is_published);
    }

    #[tokio::test]
    async fn test_publish_and_unpublish_hit_published_endpoint() {
        let server = MockServer::start();
        let publish = server.mock(|when, then| {
            when.method("PUT")
                .path(format!("{ENTRIES}/e-1/published"))
                .header(VERSION_HEADER, "2");
            then.status(200).json_body(json!({"sys": {"id": "e-1", "version": 3}}));
        });
        let unpublish = server.mock(|when, then| {
            when.method("DELETE")
                .path(format!("{ENTRIES}/e-1/published"))
                .header(VERSION_HEADER, "3");
            then.status(200).json_body(json!({"sys": {"id": "e-1", "version": 4}}));
        });

        let client = client(&server);
        client.publish_entry(ResourceKind::Event, "e-1", 2).await.unwrap();
        client.unpublish_entry(ResourceKind::Event, "e-1", 3).await.unwrap();

        publish.assert();
        unpublish.assert();
    }

    #[tokio::test]
    async fn test_delete_accepts_no_content() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method("DELETE").path(format!("{ENTRIES}/s-1"));
            then.status(204);
        });

        client(&server)
            .delete_entry(ResourceKind::Speaker, "s-1")
            .await
            .unwrap();
        mock.assert();
    }
}
