//! Resource services.
//!
//! Reads go through the [`QueryCache`](crate::cache::QueryCache) under the
//! key scheme of `eventdesk_core::cache`. Writes go through the
//! `ContentManager`, then refresh the cache: the written record is stored
//! under its id key and every other key of its kind goes stale. Deletes drop
//! the id key instead.

mod categories;
mod context;
mod dashboard;
mod events;
mod profiles;

#[cfg(test)]
mod testing;

pub use categories::CategoryService;
pub use context::{Listing, ServiceContext};
pub use dashboard::{Dashboard, DashboardService};
pub use events::{EventService, ListEvents};
pub use profiles::{OrganizerService, Profile, ProfileService, SpeakerService};

/// All services over one shared context.
#[derive(Debug, Clone)]
pub struct Services {
    pub events: EventService,
    pub categories: CategoryService,
    pub speakers: SpeakerService,
    pub organizers: OrganizerService,
    pub dashboard: DashboardService,
}

impl Services {
    pub fn new(ctx: ServiceContext) -> Self {
        let events = EventService::new(ctx.clone());
        let categories = CategoryService::new(ctx.clone());
        let speakers = SpeakerService::new(ctx.clone());
        let organizers = OrganizerService::new(ctx);
        let dashboard = DashboardService::new(
            events.clone(),
            categories.clone(),
            speakers.clone(),
            organizers.clone(),
        );

        Self {
            events,
            categories,
            speakers,
            organizers,
            dashboard,
        }
    }
}
