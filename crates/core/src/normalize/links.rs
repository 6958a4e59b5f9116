use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::provider::EntryCollection;

/// Replaces link objects in a collection's items with the linked entries
/// and assets.
///
/// Targets come from the collection's `includes` block and from the items
/// themselves. Links one level deep inside each item's fields are resolved,
/// which matches the delivery API's default include depth. Links without a
/// matching target are left untouched.
pub fn resolve_links(collection: &EntryCollection) -> Vec<Value> {
    let mut targets: HashMap<(&str, &str), &Value> = HashMap::new();
    for entry in collection.includes.entries.iter().chain(&collection.items) {
        if let Some(id) = entry.pointer("/sys/id").and_then(Value::as_str) {
            targets.insert(("Entry", id), entry);
        }
    }
    for asset in &collection.includes.assets {
        if let Some(id) = asset.pointer("/sys/id").and_then(Value::as_str) {
            targets.insert(("Asset", id), asset);
        }
    }

    collection
        .items
        .iter()
        .map(|item| {
            let mut item = item.clone();
            if let Some(Value::Object(fields)) = item.get_mut("fields") {
                for value in fields.values_mut() {
                    resolve_value(value, &targets);
                }
            }
            item
        })
        .collect()
}

fn resolve_value(value: &mut Value, targets: &HashMap<(&str, &str), &Value>) {
    match value {
        Value::Array(values) => {
            for value in values {
                resolve_value(value, targets);
            }
        }
        Value::Object(_) => {
            let target = link_target(value)
                .and_then(|key| targets.get(&key))
                .map(|target| (*target).clone());
            if let Some(target) = target {
                *value = target;
            }
        }
        _ => {}
    }
}

fn link_target(value: &Value) -> Option<(&str, &str)> {
    let sys = value.get("sys")?;
    if sys.get("type").and_then(Value::as_str) != Some("Link") {
        return None;
    }
    let link_type = sys.get("linkType").and_then(Value::as_str)?;
    let id = sys.get("id").and_then(Value::as_str)?;
    Some((link_type, id))
}

/// Unwraps management-API locale maps (`{"en-US": value}`) in an entry's
/// fields so it normalizes like a delivery entry.
///
/// Locale maps without a value for `locale` are dropped; plain values are
/// kept as they are.
pub fn delocalize(entry: &Value, locale: &str) -> Value {
    let mut entry = entry.clone();
    if let Some(Value::Object(fields)) = entry.get_mut("fields") {
        let unwrapped: Map<String, Value> = std::mem::take(fields)
            .into_iter()
            .filter_map(|(name, value)| match value {
                Value::Object(mut locales) => locales.remove(locale).map(|v| (name, v)),
                other => Some((name, other)),
            })
            .collect();
        *fields = unwrapped;
    }
    entry
}

/// Wraps every field value in a locale map for the management API.
pub fn localize(fields: Map<String, Value>, locale: &str) -> Map<String, Value> {
    fields
        .into_iter()
        .map(|(name, value)| {
            let mut locales = Map::new();
            locales.insert(locale.to_string(), value);
            (name, Value::Object(locales))
        })
        .collect()
}
