use serde::{Deserialize, Serialize};

use crate::content::ResourceKind;

/// CMS content type ids for each resource kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentTypes {
    pub event: String,
    pub category: String,
    pub speaker: String,
    /// Organizers are stored under the `author` content type by default.
    pub organizer: String,
}

impl Default for ContentTypes {
    fn default() -> Self {
        Self {
            event: "event".to_string(),
            category: "category".to_string(),
            speaker: "speaker".to_string(),
            organizer: "author".to_string(),
        }
    }
}

impl ContentTypes {
    /// Returns the content type id for a kind.
    pub fn for_kind(&self, kind: ResourceKind) -> &str {
        match kind {
            ResourceKind::Event => &self.event,
            ResourceKind::Category => &self.category,
            ResourceKind::Speaker => &self.speaker,
            ResourceKind::Organizer => &self.organizer,
        }
    }

    /// Maps a content type id back to its kind.
    pub fn kind_of(&self, content_type: &str) -> Option<ResourceKind> {
        ResourceKind::ALL
            .into_iter()
            .find(|kind| self.for_kind(*kind) == content_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_organizer_maps_to_author() {
        let types = ContentTypes::default();

        assert_eq!(types.for_kind(ResourceKind::Organizer), "author");
        assert_eq!(types.kind_of("author"), Some(ResourceKind::Organizer));
        assert_eq!(types.kind_of("organizer"), None);
    }
}
