use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The kinds of content the admin console manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Event,
    Category,
    Speaker,
    Organizer,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 4] = [
        ResourceKind::Event,
        ResourceKind::Category,
        ResourceKind::Speaker,
        ResourceKind::Organizer,
    ];

    /// Returns the leading cache key segment for this kind.
    pub fn key_segment(&self) -> &'static str {
        match self {
            ResourceKind::Event => "events",
            ResourceKind::Category => "categories",
            ResourceKind::Speaker => "speakers",
            ResourceKind::Organizer => "organizers",
        }
    }

    /// Returns the human-readable entity name used in error messages.
    pub fn label(&self) -> &'static str {
        match self {
            ResourceKind::Event => "Event",
            ResourceKind::Category => "Category",
            ResourceKind::Speaker => "Speaker",
            ResourceKind::Organizer => "Organizer",
        }
    }

    /// Parses a cache key segment back into a kind.
    pub fn from_key_segment(segment: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.key_segment() == segment)
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A record that can stand in for an unresolved reference.
pub trait Linked: Clone {
    /// Returns the entity identifier.
    fn id(&self) -> &str;

    /// Builds a placeholder record that only knows its identifier.
    ///
    /// Human-readable fields are left blank.
    fn placeholder(id: &str) -> Self;
}

/// A reference from one record to another.
///
/// The provider returns links either as bare identifiers or as resolved
/// nested records depending on the query's include depth. Serialized
/// untagged: an unresolved relation is its id string, a resolved one is the
/// record object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Relation<T> {
    Unresolved(String),
    Resolved(T),
}

impl<T: Linked> Relation<T> {
    /// Returns the identifier of the referenced record.
    pub fn id(&self) -> &str {
        match self {
            Relation::Unresolved(id) => id,
            Relation::Resolved(record) => record.id(),
        }
    }

    /// Returns true if the referenced record's fields are available.
    pub fn is_resolved(&self) -> bool {
        matches!(self, Relation::Resolved(_))
    }

    /// Returns the resolved record, if any.
    pub fn resolved(&self) -> Option<&T> {
        match self {
            Relation::Unresolved(_) => None,
            Relation::Resolved(record) => Some(record),
        }
    }

    /// Returns the referenced record, or a blank placeholder carrying only
    /// the identifier when unresolved.
    pub fn record(&self) -> T {
        match self {
            Relation::Unresolved(id) => T::placeholder(id),
            Relation::Resolved(record) => record.clone(),
        }
    }
}

impl<T> Default for Relation<T> {
    fn default() -> Self {
        Relation::Unresolved(String::new())
    }
}

/// The person or organization hosting events.
///
/// Stored in the CMS under the `author` content type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Organizer {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl Organizer {
    /// Display name used when the organizer has no name.
    pub const UNKNOWN: &'static str = "Unknown Organizer";

    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_avatar(mut self, avatar: impl Into<String>) -> Self {
        self.avatar = Some(avatar.into());
        self
    }

    /// Returns the name, or the unknown-organizer label when blank.
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            Self::UNKNOWN
        } else {
            &self.name
        }
    }
}

impl Linked for Organizer {
    fn id(&self) -> &str {
        &self.id
    }

    fn placeholder(id: &str) -> Self {
        Self::new(id, "")
    }
}

/// A label used to group events.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Category {
    pub id: String,
    pub title: String,
    pub slug: String,
    /// Accent color (CSS color value).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Category {
    pub fn new(id: impl Into<String>, title: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            slug: slug.into(),
            color: None,
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }
}

impl Linked for Category {
    fn id(&self) -> &str {
        &self.id
    }

    fn placeholder(id: &str) -> Self {
        Self::new(id, "", "")
    }
}

/// A person presenting at events.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Speaker {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl Speaker {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_bio(mut self, bio: impl Into<String>) -> Self {
        self.bio = Some(bio.into());
        self
    }

    pub fn with_avatar(mut self, avatar: impl Into<String>) -> Self {
        self.avatar = Some(avatar.into());
        self
    }
}

impl Linked for Speaker {
    fn id(&self) -> &str {
        &self.id
    }

    fn placeholder(id: &str) -> Self {
        Self::new(id, "")
    }
}

/// An event as shown in the admin console.
///
/// Field names serialize in the CMS's camelCase so a serialized event is
/// itself a valid normalizer input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub title: String,
    /// URL slug, derived from the title unless explicitly overridden.
    pub slug: String,
    /// ISO-8601 date-time string as stored in the CMS.
    pub date: String,
    pub description: String,
    /// Absolute banner image URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub banner: Option<String>,
    pub is_published: bool,
    pub organizer: Relation<Organizer>,
    pub categories: Vec<Relation<Category>>,
    pub speakers: Vec<Relation<Speaker>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Event {
    /// Returns the organizer record (placeholder when unresolved).
    pub fn organizer_record(&self) -> Organizer {
        self.organizer.record()
    }

    /// Returns the organizer's display name.
    pub fn organizer_name(&self) -> String {
        self.organizer_record().display_name().to_string()
    }

    /// Returns the category identifiers in order.
    pub fn category_ids(&self) -> Vec<&str> {
        self.categories.iter().map(Relation::id).collect()
    }

    /// Returns the speaker identifiers in order.
    pub fn speaker_ids(&self) -> Vec<&str> {
        self.speakers.iter().map(Relation::id).collect()
    }

    /// Returns true if the event references the given category.
    pub fn has_category(&self, category_id: &str) -> bool {
        self.categories.iter().any(|c| c.id() == category_id)
    }

    /// Returns true if every relation on this event carries its fields.
    pub fn is_fully_resolved(&self) -> bool {
        self.organizer.is_resolved()
            && self.categories.iter().all(Relation::is_resolved)
            && self.speakers.iter().all(Relation::is_resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_resource_kind_segments_round_trip() {
        for kind in ResourceKind::ALL {
            assert_eq!(ResourceKind::from_key_segment(kind.key_segment()), Some(kind));
        }
        assert_eq!(ResourceKind::from_key_segment("authors"), None);
    }

    #[test]
    fn test_unresolved_relation_record_is_placeholder() {
        let relation: Relation<Organizer> = Relation::Unresolved("org-1".to_string());

        let record = relation.record();
        assert_eq!(record.id, "org-1");
        assert_eq!(record.name, "");
        assert!(!relation.is_resolved());
        assert_eq!(record.display_name(), Organizer::UNKNOWN);
    }

    #[test]
    fn test_relation_serializes_untagged() {
        let unresolved: Relation<Category> = Relation::Unresolved("5".to_string());
        assert_eq!(serde_json::to_value(&unresolved).unwrap(), json!("5"));

        let resolved = Relation::Resolved(Category::new("5", "Startups", "startups"));
        assert_eq!(
            serde_json::to_value(&resolved).unwrap(),
            json!({"id": "5", "title": "Startups", "slug": "startups"})
        );
    }

    #[test]
    fn test_relation_deserializes_both_shapes() {
        let relations: Vec<Relation<Speaker>> =
            serde_json::from_value(json!(["s-1", {"id": "s-2", "name": "Sarah Kim"}])).unwrap();

        assert_eq!(relations[0], Relation::Unresolved("s-1".to_string()));
        assert_eq!(
            relations[1],
            Relation::Resolved(Speaker::new("s-2", "Sarah Kim"))
        );
    }

    #[test]
    fn test_event_serializes_camel_case() {
        let event = Event {
            id: "1".to_string(),
            is_published: true,
            ..Event::default()
        };

        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["isPublished"], json!(true));
        assert!(value.get("createdAt").is_none());
    }

    #[test]
    fn test_event_relation_helpers() {
        let event = Event {
            organizer: Relation::Resolved(Organizer::new("o-1", "Tech Events Inc")),
            categories: vec![
                Relation::Unresolved("1".to_string()),
                Relation::Resolved(Category::new("2", "Web", "web")),
            ],
            ..Event::default()
        };

        assert_eq!(event.category_ids(), vec!["1", "2"]);
        assert!(event.has_category("2"));
        assert!(!event.has_category("3"));
        assert!(!event.is_fully_resolved());
        assert_eq!(event.organizer_name(), "Tech Events Inc");
    }
}
