//! Content provider abstractions.
//!
//! Traits and wire-level types shared by the HTTP client and the in-memory
//! provider. Entries cross this boundary as raw JSON; the normalizer turns
//! them into domain records.

mod content_types;
mod error;
mod query;
mod traits;
mod types;

pub use content_types::ContentTypes;
pub use error::{FieldError, ProviderError, Result};
pub use query::EntryQuery;
pub use traits::{ContentManager, ContentSource};
pub use types::{asset_link, entry_link, sys_id, sys_version, Asset, EntryCollection, Includes};
