//! Content-graph normalization.
//!
//! Pure, total mappings from raw CMS entries to domain records. Nothing in
//! here returns an error: missing or malformed data degrades to defaults.

mod fields;
mod links;
mod records;

pub use links::{delocalize, localize, resolve_links};
pub use records::{normalize_category, normalize_event, normalize_organizer, normalize_speaker};
