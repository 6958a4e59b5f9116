mod dashboard;
mod error;
mod mock_data;
mod requests;
mod types;
mod validation;

pub use dashboard::{
    filter_events, page_window, paginate, recent_events, summarize, top_categories,
    CategoryCount, DashboardSummary, EventFilter, Page, PageItem, EVENTS_PER_PAGE,
    RECENT_EVENTS_LIMIT, TOP_CATEGORIES_LIMIT,
};
pub use error::{EventFormError, ProfileFormError};
pub use mock_data::{demo_categories, demo_events, demo_organizers, demo_speakers};
pub use requests::{AssetUpload, EventDraft, EventPatch, OrganizerDraft, SpeakerDraft};
pub use types::{Category, Event, Linked, Organizer, Relation, ResourceKind, Speaker};
pub use validation::{is_valid_slug, validate_event, validate_organizer, validate_speaker};
