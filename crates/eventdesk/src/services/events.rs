//! Event reads and writes.

use serde_json::{Map, Value};

use eventdesk_core::cache::{
    event_key, event_slug_key, events_by_category_key, events_list_key, events_search_key,
};
use eventdesk_core::content::{
    demo_events, filter_events, validate_event, Event, EventDraft, EventFilter, EventPatch,
    ResourceKind,
};
use eventdesk_core::normalize::normalize_event;
use eventdesk_core::provider::{asset_link, sys_id, ProviderError};

use super::context::{id_and_version, Listing, ServiceContext};
use crate::error::{Result, ServiceError};

const KIND: ResourceKind = ResourceKind::Event;

/// Default listing order: newest event date first.
const DEFAULT_ORDER: &str = "-fields.date";

/// Order used for category listings.
const CATEGORY_ORDER: &str = "-sys.createdAt";

/// Options for listing events.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListEvents {
    /// Only published (`true`) or only draft (`false`) events.
    pub published: Option<bool>,
    pub limit: Option<u32>,
    pub skip: Option<u32>,
    pub order: Option<String>,
}

impl ListEvents {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn published(mut self, published: bool) -> Self {
        self.published = Some(published);
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_skip(mut self, skip: u32) -> Self {
        self.skip = Some(skip);
        self
    }

    pub fn with_order(mut self, order: impl Into<String>) -> Self {
        self.order = Some(order.into());
        self
    }
}

/// Event service: cached reads, writes through the management API.
#[derive(Debug, Clone)]
pub struct EventService {
    ctx: ServiceContext,
}

impl EventService {
    pub fn new(ctx: ServiceContext) -> Self {
        Self { ctx }
    }

    /// Lists events.
    pub async fn list(&self, options: ListEvents) -> Result<Listing<Event>> {
        let mut query = self
            .ctx
            .query(KIND)
            .with_limit(options.limit.unwrap_or(self.ctx.page_size))
            .with_skip(options.skip.unwrap_or(0))
            .with_order(options.order.as_deref().unwrap_or(DEFAULT_ORDER));
        if let Some(published) = options.published {
            query = query.with_field("isPublished", published.to_string());
        }

        let key = events_list_key(&query);
        let result = self.ctx.list(&key, query, normalize_event).await;
        self.ctx.recover(&key, result, || {
            let events = demo_events()
                .into_iter()
                .filter(|e| options.published.is_none_or(|p| e.is_published == p))
                .collect();
            Some(Listing::new(events))
        })
    }

    /// Gets an event by id.
    pub async fn get(&self, id: &str) -> Result<Event> {
        let result = self.ctx.record(KIND, id, normalize_event).await;
        self.ctx.recover(&event_key(id), result, || {
            demo_events().into_iter().find(|e| e.id == id)
        })
    }

    /// Gets an event by slug.
    pub async fn by_slug(&self, slug: &str) -> Result<Event> {
        let key = event_slug_key(slug);
        let query = self.ctx.query(KIND).with_field("slug", slug);
        let result = self
            .ctx
            .first(&key, KIND, slug, query, normalize_event)
            .await;
        self.ctx.recover(&key, result, || {
            demo_events().into_iter().find(|e| e.slug == slug)
        })
    }

    /// Full-text search over events.
    pub async fn search(&self, term: &str, options: ListEvents) -> Result<Listing<Event>> {
        let query = self
            .ctx
            .query(KIND)
            .with_search(term)
            .with_limit(options.limit.unwrap_or(self.ctx.page_size))
            .with_skip(options.skip.unwrap_or(0))
            .with_order(options.order.as_deref().unwrap_or(DEFAULT_ORDER));

        let key = events_search_key(term, &query);
        let result = self.ctx.list(&key, query, normalize_event).await;
        self.ctx.recover(&key, result, || {
            let filter = EventFilter::new().with_search(term);
            Some(Listing::new(filter_events(&demo_events(), &filter)))
        })
    }

    /// Lists events linked to a category, newest first.
    pub async fn by_category(
        &self,
        category_id: &str,
        options: ListEvents,
    ) -> Result<Listing<Event>> {
        let query = self
            .ctx
            .query(KIND)
            .with_field("categories.sys.id", category_id)
            .with_limit(options.limit.unwrap_or(self.ctx.page_size))
            .with_skip(options.skip.unwrap_or(0))
            .with_order(options.order.as_deref().unwrap_or(CATEGORY_ORDER));

        let key = events_by_category_key(category_id, &query);
        let result = self.ctx.list(&key, query, normalize_event).await;
        self.ctx.recover(&key, result, || {
            let filter = EventFilter::new().with_category(category_id);
            Some(Listing::new(filter_events(&demo_events(), &filter)))
        })
    }

    /// Creates an event, uploading its banner first and publishing it when
    /// the draft asks for it.
    pub async fn create(&self, mut draft: EventDraft) -> Result<Event> {
        validate_event(&draft).map_err(ServiceError::InvalidEvent)?;

        let banner_url = self.upload_banner(&mut draft).await?;
        let mut raw = self
            .ctx
            .manager
            .create_entry(KIND, draft.to_fields())
            .await?;
        if draft.is_published {
            raw = self.publish_raw(&raw).await?;
        }

        let mut written = normalize_event(&raw);
        if banner_url.is_some() {
            written.banner = banner_url;
        }
        let id = written.id.clone();
        let event = self.ctx.reread(KIND, &id, written, normalize_event).await;
        tracing::debug!(event_id = %id, published = draft.is_published, "Event created");
        Ok(event)
    }

    /// Applies a partial update over the current event.
    ///
    /// The current revision comes from the management API, so drafts can be
    /// edited and the patch never lands on cached delivery content. The
    /// current banner stays linked unless the patch uploads a new one.
    /// Changing `is_published` publishes or unpublishes the entry; an event
    /// that stays published is republished so the edit goes live.
    pub async fn update(&self, id: &str, patch: EventPatch) -> Result<Event> {
        let current = self.ctx.manager.current_entry(KIND, id).await?;
        let (_, version) = id_and_version(&current)?;
        let current_event = normalize_event(&current);
        let was_published = current_event.is_published;

        let mut draft = EventDraft::from_event(&current_event);
        patch.apply_to(&mut draft);
        validate_event(&draft).map_err(ServiceError::InvalidEvent)?;

        let banner_url = self.upload_banner(&mut draft).await?;
        let mut fields = draft.to_fields();
        if draft.banner_asset_id.is_none() {
            keep_banner(&current, &mut fields);
        }

        let mut raw = self
            .ctx
            .manager
            .update_entry(KIND, id, version, fields)
            .await?;
        raw = match (was_published, draft.is_published) {
            (_, true) => self.publish_raw(&raw).await?,
            (true, false) => self.unpublish_raw(&raw).await?,
            (false, false) => raw,
        };

        let mut written = normalize_event(&raw);
        written.banner = banner_url.or(current_event.banner);
        let event = self.ctx.reread(KIND, id, written, normalize_event).await;
        tracing::debug!(event_id = %id, published = draft.is_published, "Event updated");
        Ok(event)
    }

    /// Deletes an event, unpublishing it first when needed.
    pub async fn delete(&self, id: &str) -> Result<()> {
        let manager = &self.ctx.manager;
        match manager.delete_entry(KIND, id).await {
            Ok(()) => {}
            Err(ProviderError::Rejected { .. }) => {
                let version = manager.entry_version(KIND, id).await?;
                manager.unpublish_entry(KIND, id, version).await?;
                manager.delete_entry(KIND, id).await?;
            }
            Err(err) => return Err(err.into()),
        }

        self.ctx.record_deleted(KIND, id);
        tracing::debug!(event_id = %id, "Event deleted");
        Ok(())
    }

    /// Publishes an event at its current version.
    pub async fn publish(&self, id: &str) -> Result<Event> {
        self.set_published(id, true).await
    }

    /// Unpublishes an event at its current version.
    pub async fn unpublish(&self, id: &str) -> Result<Event> {
        self.set_published(id, false).await
    }

    async fn set_published(&self, id: &str, published: bool) -> Result<Event> {
        self.update(id, EventPatch::new().with_published(published)).await
    }

    /// Uploads the draft's pending banner and links it. Returns the new URL.
    async fn upload_banner(&self, draft: &mut EventDraft) -> Result<Option<String>> {
        let Some(upload) = draft.banner_upload.take() else {
            return Ok(None);
        };

        let asset = self.ctx.manager.upload_asset(upload).await?;
        tracing::debug!(asset_id = %asset.id, url = %asset.url, "Banner uploaded");
        draft.banner_asset_id = Some(asset.id);
        Ok(Some(asset.url))
    }

    async fn publish_raw(&self, raw: &Value) -> Result<Value> {
        let (id, version) = id_and_version(raw)?;
        Ok(self.ctx.manager.publish_entry(KIND, &id, version).await?)
    }

    async fn unpublish_raw(&self, raw: &Value) -> Result<Value> {
        let (id, version) = id_and_version(raw)?;
        Ok(self.ctx.manager.unpublish_entry(KIND, &id, version).await?)
    }
}

/// Carries the current banner over to a field map: resolved assets become
/// links again, plain URLs are kept.
fn keep_banner(current: &Value, fields: &mut Map<String, Value>) {
    let banner = match current.pointer("/fields/banner") {
        Some(Value::String(url)) => Value::String(url.clone()),
        Some(asset) => match sys_id(asset) {
            Some(id) => asset_link(id),
            None => return,
        },
        None => return,
    };
    fields.insert("banner".into(), banner);
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use eventdesk_core::cache::QueryOptions;
    use eventdesk_core::content::AssetUpload;

    use super::*;
    use crate::cache::QueryCache;
    use crate::config::ReadFallback;
    use crate::provider::InMemoryProvider;
    use crate::services::testing::{context, delivery_context, FailingSource};

    fn service(provider: &InMemoryProvider) -> EventService {
        EventService::new(context(provider))
    }

    fn draft(title: &str, slug: &str) -> EventDraft {
        EventDraft {
            title: title.to_string(),
            slug: slug.to_string(),
            date: "2025-11-20T18:00:00Z".to_string(),
            description: "An evening of Rust talks.".to_string(),
            organizer: "1".to_string(),
            categories: vec!["4".to_string()],
            speakers: vec!["7".to_string()],
            ..EventDraft::default()
        }
    }

    #[tokio::test]
    async fn test_list_filters_published_and_orders_by_date() {
        let provider = InMemoryProvider::with_demo_data();
        let events = service(&provider);

        let listing = events
            .list(ListEvents::new().published(true).with_limit(3))
            .await
            .unwrap();

        assert_eq!(listing.total, 9);
        assert_eq!(listing.items.len(), 3);
        assert!(listing.items.iter().all(|e| e.is_published));
        assert!(listing.items[0].date >= listing.items[1].date);
        assert!(listing.items.iter().all(Event::is_fully_resolved));
    }

    #[tokio::test]
    async fn test_get_and_slug_lookup() {
        let provider = InMemoryProvider::with_demo_data();
        let events = service(&provider);

        let event = events.get("2").await.unwrap();
        let same = events.by_slug(&event.slug).await.unwrap();
        assert_eq!(same.id, "2");

        let missing = events.by_slug("no-such-event").await.unwrap_err();
        assert!(missing.is_not_found());
    }

    #[tokio::test]
    async fn test_by_category_and_search() {
        let provider = InMemoryProvider::with_demo_data();
        let events = service(&provider);

        let listing = events.by_category("6", ListEvents::new()).await.unwrap();
        let mut ids: Vec<&str> = listing.items.iter().map(|e| e.id.as_str()).collect();
        ids.sort_unstable();
        assert_eq!(ids, ["10", "8"]);

        let found = events.search("react", ListEvents::new()).await.unwrap();
        assert!(found.items.iter().any(|e| e.id == "1"));
    }

    #[tokio::test]
    async fn test_create_invalidates_listings_and_caches_record() {
        let provider = InMemoryProvider::with_demo_data();
        let events = service(&provider);

        events.list(ListEvents::new()).await.unwrap();
        let created = events.create(draft("Rust Meetup", "rust-meetup")).await.unwrap();

        let cached = events.ctx.cache.peek::<Event>(&event_key(&created.id));
        assert_eq!(cached.data.map(|e| e.title), Some("Rust Meetup".to_string()));

        let listing = events.list(ListEvents::new()).await.unwrap();
        assert_eq!(listing.total, 13);
        assert!(listing.items.iter().any(|e| e.id == created.id));
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_draft() {
        let provider = InMemoryProvider::new();
        let events = service(&provider);

        let error = events.create(EventDraft::default()).await.unwrap_err();

        match error {
            ServiceError::InvalidEvent(errors) => assert!(errors.len() >= 4),
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(provider.count(KIND).await, 0);
    }

    #[tokio::test]
    async fn test_create_uploads_banner_and_publishes() {
        let provider = InMemoryProvider::with_demo_data();
        let events = service(&provider);

        let mut new_event = draft("Rust Meetup", "rust-meetup");
        new_event.is_published = true;
        new_event.banner_upload = Some(AssetUpload::new("banner.png", "image/png", vec![1, 2, 3]));

        let created = events.create(new_event).await.unwrap();
        let banner = created.banner.clone().unwrap();
        assert!(banner.ends_with("/banner.png"));

        let listing = events.list(ListEvents::new().published(true)).await.unwrap();
        assert!(listing.items.iter().any(|e| e.id == created.id));

        let fetched = events.get(&created.id).await.unwrap();
        assert_eq!(fetched.banner, Some(banner));
    }

    #[tokio::test]
    async fn test_update_merges_patch_and_keeps_banner() {
        let provider = InMemoryProvider::with_demo_data();
        let events = service(&provider);
        let before = events.get("1").await.unwrap();

        let updated = events
            .update("1", EventPatch::new().with_title("React Conf Europe 2025"))
            .await
            .unwrap();

        assert_eq!(updated.title, "React Conf Europe 2025");
        assert_eq!(updated.slug, before.slug);
        assert_eq!(updated.banner, before.banner);
        assert!(updated.is_published);

        let refetched = events.get("1").await.unwrap();
        assert_eq!(refetched.title, "React Conf Europe 2025");
    }

    #[tokio::test]
    async fn test_publish_and_unpublish() {
        let provider = InMemoryProvider::with_demo_data();
        let events = service(&provider);

        let draft_event = events.publish("3").await.unwrap();
        assert!(draft_event.is_published);

        let unpublished = events.unpublish("3").await.unwrap();
        assert!(!unpublished.is_published);
    }

    #[tokio::test]
    async fn test_get_after_update_keeps_resolved_relations() {
        let provider = InMemoryProvider::with_demo_data();
        let events = service(&provider);
        let before = events.get("1").await.unwrap();
        assert!(before.is_fully_resolved());

        let updated = events
            .update("1", EventPatch::new().with_title("React Conf Europe 2025"))
            .await
            .unwrap();
        assert_eq!(updated.organizer_name(), before.organizer_name());

        let after = events.get("1").await.unwrap();
        assert_eq!(after.title, "React Conf Europe 2025");
        assert_eq!(after.organizer_name(), before.organizer_name());
        assert_eq!(after.categories, before.categories);
        assert!(after.is_fully_resolved());
    }

    #[tokio::test]
    async fn test_publish_draft_behind_published_only_source() {
        let provider = InMemoryProvider::with_demo_data();
        let events = EventService::new(delivery_context(&provider));
        assert!(events.get("3").await.unwrap_err().is_not_found());

        let published = events.publish("3").await.unwrap();
        assert!(published.is_published);
        assert!(published.is_fully_resolved());

        let fetched = events.get("3").await.unwrap();
        assert_eq!(fetched.id, "3");
        assert!(fetched.is_published);
    }

    #[tokio::test]
    async fn test_update_draft_behind_published_only_source() {
        let provider = InMemoryProvider::with_demo_data();
        let events = EventService::new(delivery_context(&provider));

        let updated = events
            .update("6", EventPatch::new().with_title("Still A Draft"))
            .await
            .unwrap();

        assert_eq!(updated.id, "6");
        assert_eq!(updated.title, "Still A Draft");
        assert!(!updated.is_published);
        assert!(events.get("6").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_delete_unpublishes_first() {
        let provider = InMemoryProvider::with_demo_data();
        let events = service(&provider);
        events.get("1").await.unwrap();

        events.delete("1").await.unwrap();

        assert!(!events.ctx.cache.contains(&event_key("1")));
        assert!(events.get("1").await.unwrap_err().is_not_found());
        assert_eq!(provider.count(KIND).await, 11);
    }

    #[tokio::test]
    async fn test_read_fallback_policy() {
        let provider = InMemoryProvider::new();
        let ctx = ServiceContext::new(
            Arc::new(FailingSource),
            Arc::new(provider),
            QueryCache::new(QueryOptions {
                retry: 0,
                ..QueryOptions::default()
            }),
        );

        let surfacing = EventService::new(ctx.clone());
        assert!(surfacing.list(ListEvents::new()).await.is_err());

        let demo = EventService::new(ctx.with_fallback(ReadFallback::Demo));
        let listing = demo.list(ListEvents::new().published(false)).await.unwrap();
        assert_eq!(listing.total, 3);
        assert!(demo.get("404").await.is_err());
    }
}
