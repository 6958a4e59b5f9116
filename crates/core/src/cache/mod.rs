mod error;
mod keys;
mod serialization;
mod state;

pub use error::{QueryError, Result};
pub use keys::{
    categories_by_ids_key, categories_list_key, category_key, event_key, event_slug_key,
    events_by_category_key, events_key, events_list_key, events_search_key, kind_prefix, list_key,
    organizer_key, organizers_list_key, record_key, speaker_key, speakers_list_key, QueryKey,
};
pub use serialization::{decode, encode};
pub use state::{QueryEvent, QueryEventKind, QueryOptions, QuerySnapshot, QueryStatus};
