//! Dashboard statistics over the cached listings.

use serde::{Deserialize, Serialize};

use eventdesk_core::content::{
    recent_events, summarize, top_categories, CategoryCount, DashboardSummary, Event,
};

use super::categories::CategoryService;
use super::events::{EventService, ListEvents};
use super::profiles::{OrganizerService, SpeakerService};
use crate::error::Result;

/// Upper bound on events considered for statistics.
const STATISTICS_LIMIT: u32 = 1000;

/// Everything the dashboard shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub summary: DashboardSummary,
    pub recent_events: Vec<Event>,
    pub top_categories: Vec<CategoryCount>,
}

#[derive(Debug, Clone)]
pub struct DashboardService {
    events: EventService,
    categories: CategoryService,
    speakers: SpeakerService,
    organizers: OrganizerService,
}

impl DashboardService {
    pub fn new(
        events: EventService,
        categories: CategoryService,
        speakers: SpeakerService,
        organizers: OrganizerService,
    ) -> Self {
        Self {
            events,
            categories,
            speakers,
            organizers,
        }
    }

    /// Loads the four listings concurrently and computes the statistics.
    pub async fn load(&self) -> Result<Dashboard> {
        let (events, categories, speakers, organizers) = tokio::try_join!(
            self.events
                .list(ListEvents::new().with_limit(STATISTICS_LIMIT)),
            self.categories.list(),
            self.speakers.list(),
            self.organizers.list(),
        )?;

        Ok(Dashboard {
            summary: summarize(
                &events.items,
                categories.len(),
                speakers.len(),
                organizers.len(),
            ),
            recent_events: recent_events(&events.items),
            top_categories: top_categories(&events.items, &categories),
        })
    }
}
