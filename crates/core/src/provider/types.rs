use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Linked entries and assets returned beside a collection's items.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Includes {
    #[serde(default, rename = "Entry", skip_serializing_if = "Vec::is_empty")]
    pub entries: Vec<Value>,
    #[serde(default, rename = "Asset", skip_serializing_if = "Vec::is_empty")]
    pub assets: Vec<Value>,
}

impl Includes {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.assets.is_empty()
    }
}

/// A page of raw CMS entries as returned by the delivery API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntryCollection {
    #[serde(default)]
    pub items: Vec<Value>,
    #[serde(default)]
    pub total: u32,
    #[serde(default)]
    pub skip: u32,
    #[serde(default)]
    pub limit: u32,
    #[serde(default, skip_serializing_if = "Includes::is_empty")]
    pub includes: Includes,
}

impl EntryCollection {
    pub fn new(items: Vec<Value>) -> Self {
        let total = items.len() as u32;
        Self {
            items,
            total,
            skip: 0,
            limit: total,
            includes: Includes::default(),
        }
    }
}

/// A published media asset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub id: String,
    /// Absolute URL of the processed file.
    pub url: String,
    pub file_name: String,
    pub content_type: String,
}

/// Builds a link object referencing an entry.
pub fn entry_link(id: &str) -> Value {
    json!({"sys": {"type": "Link", "linkType": "Entry", "id": id}})
}

/// Builds a link object referencing an asset.
pub fn asset_link(id: &str) -> Value {
    json!({"sys": {"type": "Link", "linkType": "Asset", "id": id}})
}

/// Returns `sys.id` of a raw entry, if present.
pub fn sys_id(entry: &Value) -> Option<&str> {
    entry.pointer("/sys/id").and_then(Value::as_str)
}

/// Returns `sys.version` of a raw management entry, if present.
pub fn sys_version(entry: &Value) -> Option<u64> {
    entry.pointer("/sys/version").and_then(Value::as_u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_deserializes_delivery_shape() {
        let body = json!({
            "sys": {"type": "Array"},
            "total": 3,
            "skip": 0,
            "limit": 1,
            "items": [{"sys": {"id": "e-1"}, "fields": {"title": "Rust Meetup"}}],
            "includes": {"Entry": [{"sys": {"id": "org-1"}}]}
        });

        let collection: EntryCollection = serde_json::from_value(body).unwrap();
        assert_eq!(collection.total, 3);
        assert_eq!(collection.items.len(), 1);
        assert_eq!(collection.includes.entries.len(), 1);
        assert!(collection.includes.assets.is_empty());
    }

    #[test]
    fn test_sys_accessors() {
        let entry = json!({"sys": {"id": "e-1", "version": 7}});

        assert_eq!(sys_id(&entry), Some("e-1"));
        assert_eq!(sys_version(&entry), Some(7));
        assert_eq!(sys_id(&json!({})), None);
    }

    #[test]
    fn test_links() {
        assert_eq!(entry_link("x")["sys"]["linkType"], json!("Entry"));
        assert_eq!(asset_link("y")["sys"]["id"], json!("y"));
    }
}
