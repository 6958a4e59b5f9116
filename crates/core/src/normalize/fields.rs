//! Lenient accessors over raw entry JSON.
//!
//! Entries arrive either in the CMS shape (`{"sys": {...}, "fields": {...}}`)
//! or flat (`{"id": ..., "title": ...}`, as produced by serializing a
//! record). Every accessor accepts both and degrades to a default.

use chrono::{DateTime, Utc};
use serde_json::Value;

/// Returns the field container of an entry: `fields` when present, the
/// entry itself otherwise.
pub(crate) fn fields_of(raw: &Value) -> &Value {
    match raw.get("fields") {
        Some(fields) if fields.is_object() => fields,
        _ => raw,
    }
}

/// Returns `sys.id`, falling back to a flat `id`.
pub(crate) fn entry_id(raw: &Value) -> String {
    raw.pointer("/sys/id")
        .or_else(|| raw.get("id"))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

pub(crate) fn string(fields: &Value, name: &str) -> String {
    optional_string(fields, name).unwrap_or_default()
}

/// Returns a string field, treating blank strings as absent.
pub(crate) fn optional_string(fields: &Value, name: &str) -> Option<String> {
    fields
        .get(name)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Returns a boolean field. Accepts `"true"` strings as well.
pub(crate) fn boolean(fields: &Value, name: &str) -> bool {
    match fields.get(name) {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => s.eq_ignore_ascii_case("true"),
        _ => false,
    }
}

/// Returns the entries of an array field; anything else is empty.
pub(crate) fn array<'a>(fields: &'a Value, name: &str) -> &'a [Value] {
    fields
        .get(name)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

/// Reads `sys.<name>` or a flat `<name>` as an RFC 3339 timestamp.
pub(crate) fn timestamp(raw: &Value, name: &str) -> Option<DateTime<Utc>> {
    raw.get("sys")
        .and_then(|sys| sys.get(name))
        .or_else(|| raw.get(name))
        .and_then(Value::as_str)
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

/// Extracts a media URL from a field value.
///
/// Plain strings are URLs already. Resolved assets carry the URL under
/// `fields.file.url`. Protocol-relative URLs gain an `https:` scheme.
/// Unresolved asset links yield nothing.
pub(crate) fn media_url(value: Option<&Value>) -> Option<String> {
    let url = match value? {
        Value::String(s) => s.as_str(),
        other => other
            .pointer("/fields/file/url")
            .or_else(|| other.pointer("/file/url"))
            .or_else(|| other.get("url"))
            .and_then(Value::as_str)?,
    };

    if url.is_empty() {
        None
    } else if url.starts_with("//") {
        Some(format!("https:{url}"))
    } else {
        Some(url.to_string())
    }
}
