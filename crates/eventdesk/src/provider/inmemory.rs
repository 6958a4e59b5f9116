//! In-memory content provider.
//!
//! Behaves like the preview API plus the management API over a process-local
//! store: drafts are visible, links are resolved one level deep, versions
//! are checked on every write.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{json, Map, Value};
use tokio::sync::RwLock;
use uuid::Uuid;

use eventdesk_core::content::{
    demo_categories, demo_events, demo_organizers, demo_speakers, AssetUpload, Category,
    EventDraft, OrganizerDraft, ResourceKind, SpeakerDraft,
};
use eventdesk_core::provider::{
    sys_id, Asset, ContentManager, ContentSource, ContentTypes, EntryCollection, EntryQuery,
    FieldError, ProviderError, Result,
};

/// Page size when a query sets no limit.
const DEFAULT_LIMIT: u32 = 100;

/// Base URL handed out for uploaded assets.
const ASSET_BASE_URL: &str = "memory://assets";

type EntryKey = (ResourceKind, String);

#[derive(Debug, Clone)]
struct StoredEntry {
    fields: Map<String, Value>,
    version: u64,
    published_version: Option<u64>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl StoredEntry {
    fn new(fields: Map<String, Value>, created_at: DateTime<Utc>) -> Self {
        Self {
            fields,
            version: 1,
            published_version: None,
            created_at,
            updated_at: created_at,
        }
    }

    /// A seeded entry that has been published once.
    fn published(fields: Map<String, Value>, created_at: DateTime<Utc>) -> Self {
        Self {
            version: 2,
            published_version: Some(1),
            ..Self::new(fields, created_at)
        }
    }

    fn to_json(&self, id: &str, content_type: &str) -> Value {
        json!({
            "sys": {
                "id": id,
                "type": "Entry",
                "version": self.version,
                "publishedVersion": self.published_version,
                "createdAt": self.created_at.to_rfc3339_opts(SecondsFormat::Millis, true),
                "updatedAt": self.updated_at.to_rfc3339_opts(SecondsFormat::Millis, true),
                "contentType": {"sys": {"type": "Link", "linkType": "ContentType", "id": content_type}}
            },
            "fields": Value::Object(self.fields.clone()),
        })
    }

    /// Value of `path` used for ordering (`sys.createdAt`, `fields.title`).
    fn sort_value(&self, id: &str, path: &str) -> String {
        match path {
            "sys.id" => id.to_string(),
            "sys.createdAt" => self.created_at.to_rfc3339(),
            "sys.updatedAt" => self.updated_at.to_rfc3339(),
            _ => path
                .strip_prefix("fields.")
                .and_then(|name| self.fields.get(name))
                .map(scalar)
                .unwrap_or_default(),
        }
    }
}

/// In-memory provider implementing both content traits.
///
/// Uses `Arc<RwLock<_>>` maps for thread-safe access; data is lost when the
/// last clone is dropped.
#[derive(Debug, Clone)]
pub struct InMemoryProvider {
    entries: Arc<RwLock<BTreeMap<EntryKey, StoredEntry>>>,
    assets: Arc<RwLock<BTreeMap<String, Asset>>>,
    content_types: ContentTypes,
}

impl Default for InMemoryProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryProvider {
    /// Creates an empty provider.
    pub fn new() -> Self {
        Self::from_entries(BTreeMap::new())
    }

    /// Creates a provider seeded with the demo categories, organizers,
    /// speakers and events.
    pub fn with_demo_data() -> Self {
        let seeded_at = Utc::now();
        let mut entries = BTreeMap::new();

        for category in demo_categories() {
            entries.insert(
                (ResourceKind::Category, category.id.clone()),
                StoredEntry::published(category_fields(&category), seeded_at),
            );
        }
        for organizer in demo_organizers() {
            entries.insert(
                (ResourceKind::Organizer, organizer.id.clone()),
                StoredEntry::published(OrganizerDraft::from_organizer(&organizer).to_fields(), seeded_at),
            );
        }
        for speaker in demo_speakers() {
            entries.insert(
                (ResourceKind::Speaker, speaker.id.clone()),
                StoredEntry::published(SpeakerDraft::from_speaker(&speaker).to_fields(), seeded_at),
            );
        }
        for event in demo_events() {
            let mut fields = EventDraft::from_event(&event).to_fields();
            if let Some(banner) = &event.banner {
                fields.insert("banner".into(), Value::String(banner.clone()));
            }
            let created_at = event.created_at.unwrap_or(seeded_at);
            let stored = if event.is_published {
                StoredEntry::published(fields, created_at)
            } else {
                StoredEntry::new(fields, created_at)
            };
            entries.insert((ResourceKind::Event, event.id.clone()), stored);
        }

        Self::from_entries(entries)
    }

    fn from_entries(entries: BTreeMap<EntryKey, StoredEntry>) -> Self {
        Self {
            entries: Arc::new(RwLock::new(entries)),
            assets: Arc::new(RwLock::new(BTreeMap::new())),
            content_types: ContentTypes::default(),
        }
    }

    pub fn with_content_types(mut self, content_types: ContentTypes) -> Self {
        self.content_types = content_types;
        self
    }

    /// Number of stored entries of a kind.
    pub async fn count(&self, kind: ResourceKind) -> usize {
        let entries = self.entries.read().await;
        entries.keys().filter(|(k, _)| *k == kind).count()
    }

    /// Renders an entry, resolving its links when `depth` allows.
    fn render(
        &self,
        entries: &BTreeMap<EntryKey, StoredEntry>,
        assets: &BTreeMap<String, Asset>,
        (kind, id): &EntryKey,
        entry: &StoredEntry,
        depth: u8,
    ) -> Value {
        let mut value = entry.to_json(id, self.content_types.for_kind(*kind));
        if depth == 0 {
            return value;
        }

        if let Some(Value::Object(fields)) = value.get_mut("fields") {
            for (name, field) in fields.iter_mut() {
                if name == "banner" {
                    resolve_asset(field, assets);
                    continue;
                }
                let Some(target_kind) = link_kind(name) else {
                    continue;
                };
                match field {
                    Value::Array(items) => {
                        for item in items {
                            self.resolve_entry(item, target_kind, entries);
                        }
                    }
                    other => self.resolve_entry(other, target_kind, entries),
                }
            }
        }
        value
    }

    fn resolve_entry(
        &self,
        value: &mut Value,
        kind: ResourceKind,
        entries: &BTreeMap<EntryKey, StoredEntry>,
    ) {
        let Some(id) = link_id(value, "Entry") else {
            return;
        };
        if let Some(target) = entries.get(&(kind, id.clone())) {
            *value = target.to_json(&id, self.content_types.for_kind(kind));
        }
    }

    fn kind_of(&self, content_type: &str) -> Result<ResourceKind> {
        self.content_types
            .kind_of(content_type)
            .ok_or_else(|| ProviderError::Rejected {
                status: 400,
                message: format!("Unknown content type: {content_type}"),
            })
    }
}

#[async_trait]
impl ContentSource for InMemoryProvider {
    async fn entries(&self, query: &EntryQuery) -> Result<EntryCollection> {
        let kind = query
            .content_type
            .as_deref()
            .map(|content_type| self.kind_of(content_type))
            .transpose()?;

        let entries = self.entries.read().await;
        let assets = self.assets.read().await;

        let mut matched: Vec<(&EntryKey, &StoredEntry)> = entries
            .iter()
            .filter(|((k, id), entry)| {
                kind.is_none_or(|kind| kind == *k)
                    && (query.ids.is_empty() || query.ids.contains(id))
                    && query
                        .fields
                        .iter()
                        .all(|(name, expected)| matches_field(&entry.fields, name, expected))
                    && query
                        .search
                        .as_deref()
                        .is_none_or(|term| matches_search(&entry.fields, term))
            })
            .collect();

        if let Some(order) = &query.order {
            matched.sort_by(|(a_key, a), (b_key, b)| {
                order
                    .split(',')
                    .map(str::trim)
                    .filter(|term| !term.is_empty())
                    .fold(Ordering::Equal, |ordering, term| {
                        ordering.then_with(|| {
                            let (descending, path) = match term.strip_prefix('-') {
                                Some(path) => (true, path),
                                None => (false, term),
                            };
                            let cmp = a
                                .sort_value(&a_key.1, path)
                                .cmp(&b.sort_value(&b_key.1, path));
                            if descending {
                                cmp.reverse()
                            } else {
                                cmp
                            }
                        })
                    })
            });
        }

        let total = matched.len() as u32;
        let skip = query.skip.unwrap_or(0);
        let limit = query.limit.unwrap_or(DEFAULT_LIMIT);
        let depth = query.include.unwrap_or(1);

        let items = matched
            .into_iter()
            .skip(skip as usize)
            .take(limit as usize)
            .map(|(key, entry)| self.render(&entries, &assets, key, entry, depth))
            .collect();

        Ok(EntryCollection {
            items,
            total,
            skip,
            limit,
            ..EntryCollection::default()
        })
    }

    async fn entry(&self, kind: ResourceKind, id: &str) -> Result<Value> {
        let entries = self.entries.read().await;
        let assets = self.assets.read().await;
        let key = (kind, id.to_string());

        entries
            .get(&key)
            .map(|entry| self.render(&entries, &assets, &key, entry, 1))
            .ok_or_else(|| ProviderError::not_found(kind, id))
    }
}

#[async_trait]
impl ContentManager for InMemoryProvider {
    async fn create_entry(&self, kind: ResourceKind, fields: Map<String, Value>) -> Result<Value> {
        validate_required(kind, &fields)?;

        let id = Uuid::new_v4().simple().to_string();
        let entry = StoredEntry::new(fields, Utc::now());
        let value = entry.to_json(&id, self.content_types.for_kind(kind));

        let mut entries = self.entries.write().await;
        entries.insert((kind, id), entry);
        Ok(value)
    }

    async fn update_entry(
        &self,
        kind: ResourceKind,
        id: &str,
        version: u64,
        fields: Map<String, Value>,
    ) -> Result<Value> {
        validate_required(kind, &fields)?;

        let mut entries = self.entries.write().await;
        let entry = current(&mut entries, kind, id, version)?;
        entry.fields = fields;
        entry.version += 1;
        entry.updated_at = Utc::now();
        Ok(entry.to_json(id, self.content_types.for_kind(kind)))
    }

    async fn current_entry(&self, kind: ResourceKind, id: &str) -> Result<Value> {
        let entries = self.entries.read().await;
        entries
            .get(&(kind, id.to_string()))
            .map(|entry| entry.to_json(id, self.content_types.for_kind(kind)))
            .ok_or_else(|| ProviderError::not_found(kind, id))
    }

    async fn entry_version(&self, kind: ResourceKind, id: &str) -> Result<u64> {
        let entries = self.entries.read().await;
        entries
            .get(&(kind, id.to_string()))
            .map(|entry| entry.version)
            .ok_or_else(|| ProviderError::not_found(kind, id))
    }

    async fn delete_entry(&self, kind: ResourceKind, id: &str) -> Result<()> {
        let mut entries = self.entries.write().await;
        let key = (kind, id.to_string());

        match entries.get(&key) {
            None => Err(ProviderError::not_found(kind, id)),
            Some(entry) if entry.published_version.is_some() => Err(ProviderError::Rejected {
                status: 400,
                message: format!("{kind} {id} must be unpublished before deletion"),
            }),
            Some(_) => {
                entries.remove(&key);
                Ok(())
            }
        }
    }

    async fn publish_entry(&self, kind: ResourceKind, id: &str, version: u64) -> Result<Value> {
        let mut entries = self.entries.write().await;
        let entry = current(&mut entries, kind, id, version)?;
        entry.published_version = Some(entry.version);
        entry.version += 1;
        Ok(entry.to_json(id, self.content_types.for_kind(kind)))
    }

    async fn unpublish_entry(&self, kind: ResourceKind, id: &str, version: u64) -> Result<Value> {
        let mut entries = self.entries.write().await;
        let entry = current(&mut entries, kind, id, version)?;
        if entry.published_version.is_none() {
            return Err(ProviderError::Rejected {
                status: 400,
                message: format!("{kind} {id} is not published"),
            });
        }
        entry.published_version = None;
        entry.version += 1;
        Ok(entry.to_json(id, self.content_types.for_kind(kind)))
    }

    async fn upload_asset(&self, upload: AssetUpload) -> Result<Asset> {
        let id = Uuid::new_v4().simple().to_string();
        let asset = Asset {
            url: format!("{ASSET_BASE_URL}/{id}/{}", upload.file_name),
            id: id.clone(),
            file_name: upload.file_name,
            content_type: upload.content_type,
        };

        let mut assets = self.assets.write().await;
        assets.insert(id, asset.clone());
        Ok(asset)
    }
}

/// Looks up an entry for a write, checking the caller's version.
fn current<'a>(
    entries: &'a mut BTreeMap<EntryKey, StoredEntry>,
    kind: ResourceKind,
    id: &str,
    version: u64,
) -> Result<&'a mut StoredEntry> {
    let entry = entries
        .get_mut(&(kind, id.to_string()))
        .ok_or_else(|| ProviderError::not_found(kind, id))?;

    if entry.version != version {
        return Err(ProviderError::Rejected {
            status: 409,
            message: format!(
                "Version mismatch for {kind} {id}: expected {}, got {version}",
                entry.version
            ),
        });
    }
    Ok(entry)
}

/// Rejects writes missing the fields the content model requires.
fn validate_required(kind: ResourceKind, fields: &Map<String, Value>) -> Result<()> {
    let required: &[&str] = match kind {
        ResourceKind::Event => &["title", "slug"],
        ResourceKind::Category => &["title"],
        ResourceKind::Speaker | ResourceKind::Organizer => &["name"],
    };

    let missing: Vec<FieldError> = required
        .iter()
        .filter(|name| {
            fields
                .get(**name)
                .and_then(Value::as_str)
                .is_none_or(|value| value.trim().is_empty())
        })
        .map(|name| FieldError::new(format!("fields.{name}"), "required"))
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ProviderError::Validation {
            message: "Validation error".to_string(),
            fields: missing,
        })
    }
}

fn category_fields(category: &Category) -> Map<String, Value> {
    let mut fields = Map::new();
    fields.insert("title".into(), Value::String(category.title.clone()));
    fields.insert("slug".into(), Value::String(category.slug.clone()));
    if let Some(color) = &category.color {
        fields.insert("color".into(), Value::String(color.clone()));
    }
    fields
}

/// Kind of entry an event field links to.
fn link_kind(field: &str) -> Option<ResourceKind> {
    match field {
        "organizer" => Some(ResourceKind::Organizer),
        "categories" => Some(ResourceKind::Category),
        "speakers" => Some(ResourceKind::Speaker),
        _ => None,
    }
}

fn link_id(value: &Value, link_type: &str) -> Option<String> {
    let sys = value.get("sys")?;
    if sys.get("type").and_then(Value::as_str) != Some("Link")
        || sys.get("linkType").and_then(Value::as_str) != Some(link_type)
    {
        return None;
    }
    sys.get("id").and_then(Value::as_str).map(str::to_string)
}

fn resolve_asset(value: &mut Value, assets: &BTreeMap<String, Asset>) {
    let Some(asset) = link_id(value, "Asset").and_then(|id| assets.get(&id)) else {
        return;
    };
    *value = json!({
        "sys": {"id": asset.id, "type": "Asset"},
        "fields": {
            "title": asset.file_name,
            "file": {
                "url": asset.url,
                "fileName": asset.file_name,
                "contentType": asset.content_type
            }
        }
    });
}

/// Renders a scalar field for comparisons.
fn scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Equality filter on a field. `<field>.sys.id` matches link targets, in
/// single links and link arrays alike.
fn matches_field(fields: &Map<String, Value>, name: &str, expected: &str) -> bool {
    if let Some(field) = name.strip_suffix(".sys.id") {
        return match fields.get(field) {
            Some(Value::Array(links)) => links.iter().any(|link| sys_id(link) == Some(expected)),
            Some(link) => sys_id(link) == Some(expected),
            None => false,
        };
    }

    fields
        .get(name)
        .is_some_and(|value| scalar(value) == expected)
}

/// Case-insensitive full-text match over string fields.
fn matches_search(fields: &Map<String, Value>, term: &str) -> bool {
    let term = term.to_lowercase();
    fields
        .values()
        .filter_map(Value::as_str)
        .any(|value| value.to_lowercase().contains(&term))
}
