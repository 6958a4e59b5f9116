use std::fmt;

use serde::{Deserialize, Serialize};

use crate::content::ResourceKind;
use crate::provider::EntryQuery;

/// A structured query cache key.
///
/// Keys are segment lists whose first segment is the resource kind
/// (`events`, `categories`, `speakers`, `organizers`). They render as
/// `segment:segment:...`. Prefix matching is segment-wise, so `events:id`
/// matches `events:id:7` but not `events:ids:7`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QueryKey(Vec<String>);

impl QueryKey {
    /// Creates a key for a resource kind with no further segments.
    pub fn kind(kind: ResourceKind) -> Self {
        Self(vec![kind.key_segment().to_string()])
    }

    /// Appends a segment.
    pub fn push(mut self, segment: impl Into<String>) -> Self {
        self.0.push(segment.into());
        self
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Returns the resource kind named by the first segment.
    pub fn resource_kind(&self) -> Option<ResourceKind> {
        self.0
            .first()
            .and_then(|segment| ResourceKind::from_key_segment(segment))
    }

    /// Returns true if `prefix`'s segments are a leading run of this key's.
    pub fn starts_with(&self, prefix: &QueryKey) -> bool {
        self.0.starts_with(&prefix.0)
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(":"))
    }
}

/// Returns the prefix covering every key of a kind.
pub fn kind_prefix(kind: ResourceKind) -> QueryKey {
    QueryKey::kind(kind)
}

/// Returns the key for the default listing of a kind.
pub fn list_key(kind: ResourceKind) -> QueryKey {
    QueryKey::kind(kind).push("list")
}

/// Returns the key for a single record.
pub fn record_key(kind: ResourceKind, id: &str) -> QueryKey {
    QueryKey::kind(kind).push("id").push(id)
}

/// Returns the prefix covering every event key.
pub fn events_key() -> QueryKey {
    kind_prefix(ResourceKind::Event)
}

/// Returns the key for an event listing with the given parameters.
pub fn events_list_key(query: &EntryQuery) -> QueryKey {
    list_key(ResourceKind::Event).push(query.canonical())
}

/// Returns the key for a single event.
pub fn event_key(id: &str) -> QueryKey {
    record_key(ResourceKind::Event, id)
}

/// Returns the key for an event looked up by slug.
pub fn event_slug_key(slug: &str) -> QueryKey {
    events_key().push("slug").push(slug)
}

/// Returns the key for events in a category.
pub fn events_by_category_key(category_id: &str, query: &EntryQuery) -> QueryKey {
    events_key()
        .push("category")
        .push(category_id)
        .push(query.canonical())
}

/// Returns the key for an event search.
pub fn events_search_key(term: &str, query: &EntryQuery) -> QueryKey {
    events_key()
        .push("search")
        .push(term)
        .push(query.canonical())
}

/// Returns the key for the category listing.
pub fn categories_list_key() -> QueryKey {
    list_key(ResourceKind::Category)
}

/// Returns the key for a single category.
pub fn category_key(id: &str) -> QueryKey {
    record_key(ResourceKind::Category, id)
}

/// Returns the key for a set of categories. Ids are sorted so the same set
/// always maps to the same key.
pub fn categories_by_ids_key(ids: &[String]) -> QueryKey {
    let mut ids: Vec<&str> = ids.iter().map(String::as_str).collect();
    ids.sort_unstable();
    ids.dedup();
    kind_prefix(ResourceKind::Category)
        .push("ids")
        .push(ids.join(","))
}

/// Returns the key for the speaker listing.
pub fn speakers_list_key() -> QueryKey {
    list_key(ResourceKind::Speaker)
}

/// Returns the key for a single speaker.
pub fn speaker_key(id: &str) -> QueryKey {
    record_key(ResourceKind::Speaker, id)
}

/// Returns the key for the organizer listing.
pub fn organizers_list_key() -> QueryKey {
    list_key(ResourceKind::Organizer)
}

/// Returns the key for a single organizer.
pub fn organizer_key(id: &str) -> QueryKey {
    record_key(ResourceKind::Organizer, id)
}
