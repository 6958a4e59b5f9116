//! Write payloads for content operations.
//!
//! Following the Functional Core pattern, these are pure data types with no
//! I/O. Each draft knows how to render itself as a CMS field map; the
//! management client takes care of locale wrapping.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::types::{Event, Organizer, Relation, Speaker};
use crate::provider::{asset_link, entry_link};

/// A binary file to be uploaded as a CMS asset.
#[derive(Clone, PartialEq, Eq)]
pub struct AssetUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl AssetUpload {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes: bytes.into(),
        }
    }
}

impl std::fmt::Debug for AssetUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssetUpload")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Complete set of event fields submitted by the event form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDraft {
    pub title: String,
    pub slug: String,
    pub date: String,
    pub description: String,
    pub is_published: bool,
    pub organizer: String,
    pub categories: Vec<String>,
    pub speakers: Vec<String>,
    /// Existing banner asset to keep linked.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub banner_asset_id: Option<String>,
    /// New banner image to upload before saving.
    #[serde(skip)]
    pub banner_upload: Option<AssetUpload>,
}

impl EventDraft {
    /// Seeds a draft from an existing event, keeping relation ids only.
    pub fn from_event(event: &Event) -> Self {
        Self {
            title: event.title.clone(),
            slug: event.slug.clone(),
            date: event.date.clone(),
            description: event.description.clone(),
            is_published: event.is_published,
            organizer: event.organizer.id().to_string(),
            categories: event.categories.iter().map(|c| c.id().to_string()).collect(),
            speakers: event.speakers.iter().map(|s| s.id().to_string()).collect(),
            banner_asset_id: None,
            banner_upload: None,
        }
    }

    /// Renders the CMS field map. References become link objects.
    pub fn to_fields(&self) -> Map<String, Value> {
        let mut fields = Map::new();
        fields.insert("title".into(), Value::String(self.title.clone()));
        fields.insert("slug".into(), Value::String(self.slug.clone()));
        fields.insert("date".into(), Value::String(self.date.clone()));
        fields.insert("description".into(), Value::String(self.description.clone()));
        fields.insert("isPublished".into(), Value::Bool(self.is_published));
        if !self.organizer.is_empty() {
            fields.insert("organizer".into(), entry_link(&self.organizer));
        }
        fields.insert(
            "categories".into(),
            Value::Array(self.categories.iter().map(|id| entry_link(id)).collect()),
        );
        fields.insert(
            "speakers".into(),
            Value::Array(self.speakers.iter().map(|id| entry_link(id)).collect()),
        );
        if let Some(asset_id) = &self.banner_asset_id {
            fields.insert("banner".into(), asset_link(asset_id));
        }
        fields
    }

    /// Builds the event this draft describes, before the CMS assigns
    /// timestamps. Relations stay unresolved.
    pub fn to_event(&self, id: impl Into<String>) -> Event {
        Event {
            id: id.into(),
            title: self.title.clone(),
            slug: self.slug.clone(),
            date: self.date.clone(),
            description: self.description.clone(),
            banner: None,
            is_published: self.is_published,
            organizer: Relation::Unresolved(self.organizer.clone()),
            categories: self
                .categories
                .iter()
                .cloned()
                .map(Relation::Unresolved)
                .collect(),
            speakers: self
                .speakers
                .iter()
                .cloned()
                .map(Relation::Unresolved)
                .collect(),
            created_at: None,
            updated_at: None,
        }
    }
}

/// Partial update for an event. Unset fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_published: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organizer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speakers: Option<Vec<String>>,
    #[serde(skip)]
    pub banner_upload: Option<AssetUpload>,
}

impl EventPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = Some(slug.into());
        self
    }

    pub fn with_published(mut self, published: bool) -> Self {
        self.is_published = Some(published);
        self
    }

    pub fn with_categories(mut self, categories: Vec<String>) -> Self {
        self.categories = Some(categories);
        self
    }

    /// Returns true if applying this patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.slug.is_none()
            && self.date.is_none()
            && self.description.is_none()
            && self.is_published.is_none()
            && self.organizer.is_none()
            && self.categories.is_none()
            && self.speakers.is_none()
            && self.banner_upload.is_none()
    }

    /// Applies the patch to a draft.
    pub fn apply_to(self, draft: &mut EventDraft) {
        if let Some(title) = self.title {
            draft.title = title;
        }
        if let Some(slug) = self.slug {
            draft.slug = slug;
        }
        if let Some(date) = self.date {
            draft.date = date;
        }
        if let Some(description) = self.description {
            draft.description = description;
        }
        if let Some(is_published) = self.is_published {
            draft.is_published = is_published;
        }
        if let Some(organizer) = self.organizer {
            draft.organizer = organizer;
        }
        if let Some(categories) = self.categories {
            draft.categories = categories;
        }
        if let Some(speakers) = self.speakers {
            draft.speakers = speakers;
        }
        if let Some(upload) = self.banner_upload {
            draft.banner_upload = Some(upload);
        }
    }
}

/// Organizer form payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizerDraft {
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl OrganizerDraft {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            avatar: None,
        }
    }

    pub fn from_organizer(organizer: &Organizer) -> Self {
        Self {
            name: organizer.name.clone(),
            email: organizer.email.clone().unwrap_or_default(),
            avatar: organizer.avatar.clone(),
        }
    }

    pub fn to_fields(&self) -> Map<String, Value> {
        let mut fields = Map::new();
        fields.insert("name".into(), Value::String(self.name.clone()));
        fields.insert("email".into(), Value::String(self.email.clone()));
        if let Some(avatar) = &self.avatar {
            fields.insert("image".into(), Value::String(avatar.clone()));
        }
        fields
    }

    pub fn to_organizer(&self, id: impl Into<String>) -> Organizer {
        Organizer {
            id: id.into(),
            name: self.name.clone(),
            email: Some(self.email.clone()).filter(|e| !e.is_empty()),
            avatar: self.avatar.clone(),
        }
    }
}

/// Speaker form payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeakerDraft {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl SpeakerDraft {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bio: None,
            avatar: None,
        }
    }

    pub fn with_bio(mut self, bio: impl Into<String>) -> Self {
        self.bio = Some(bio.into());
        self
    }

    pub fn from_speaker(speaker: &Speaker) -> Self {
        Self {
            name: speaker.name.clone(),
            bio: speaker.bio.clone(),
            avatar: speaker.avatar.clone(),
        }
    }

    pub fn to_fields(&self) -> Map<String, Value> {
        let mut fields = Map::new();
        fields.insert("name".into(), Value::String(self.name.clone()));
        if let Some(bio) = &self.bio {
            fields.insert("bio".into(), Value::String(bio.clone()));
        }
        if let Some(avatar) = &self.avatar {
            fields.insert("image".into(), Value::String(avatar.clone()));
        }
        fields
    }

    pub fn to_speaker(&self, id: impl Into<String>) -> Speaker {
        Speaker {
            id: id.into(),
            name: self.name.clone(),
            bio: self.bio.clone(),
            avatar: self.avatar.clone(),
        }
    }
}
