use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::types::{Category, Event};

/// Number of events shown in the "recent events" panel.
pub const RECENT_EVENTS_LIMIT: usize = 5;

/// Number of categories shown in the "top categories" panel.
pub const TOP_CATEGORIES_LIMIT: usize = 4;

/// Events per page in the events listing.
pub const EVENTS_PER_PAGE: usize = 12;

/// Pages shown on each side of the current page in a pagination window.
const PAGE_WINDOW_DELTA: usize = 2;

/// Headline counts for the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_events: usize,
    pub published_events: usize,
    pub draft_events: usize,
    pub categories: usize,
    pub speakers: usize,
    pub organizers: usize,
}

/// A category with the number of events that reference it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCount {
    pub category: Category,
    pub event_count: usize,
}

/// Search and category filter applied to the events listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventFilter {
    pub search: Option<String>,
    pub category_id: Option<String>,
}

impl EventFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn with_category(mut self, category_id: impl Into<String>) -> Self {
        self.category_id = Some(category_id.into());
        self
    }
}

/// One page of a paginated listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based page number, clamped to the available pages.
    pub page: usize,
    pub total_pages: usize,
    pub total_items: usize,
}

/// An element of a pagination control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageItem {
    Page(usize),
    Gap,
}

/// Computes headline counts.
pub fn summarize(
    events: &[Event],
    categories: usize,
    speakers: usize,
    organizers: usize,
) -> DashboardSummary {
    let published_events = events.iter().filter(|e| e.is_published).count();

    DashboardSummary {
        total_events: events.len(),
        published_events,
        draft_events: events.len() - published_events,
        categories,
        speakers,
        organizers,
    }
}

/// Returns the newest events by creation time, skipping records without an id.
///
/// Events without a creation timestamp sort last.
pub fn recent_events(events: &[Event]) -> Vec<Event> {
    let mut sorted: Vec<&Event> = events.iter().filter(|e| !e.id.is_empty()).collect();
    sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    sorted
        .into_iter()
        .take(RECENT_EVENTS_LIMIT)
        .cloned()
        .collect()
}

/// Counts events per category and returns the most used ones.
///
/// Ties keep the order of the `categories` list.
pub fn top_categories(events: &[Event], categories: &[Category]) -> Vec<CategoryCount> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for event in events {
        for id in event.category_ids() {
            *counts.entry(id).or_default() += 1;
        }
    }

    let mut ranked: Vec<CategoryCount> = categories
        .iter()
        .map(|category| CategoryCount {
            category: category.clone(),
            event_count: counts.get(category.id.as_str()).copied().unwrap_or(0),
        })
        .collect();
    ranked.sort_by(|a, b| b.event_count.cmp(&a.event_count));
    ranked.truncate(TOP_CATEGORIES_LIMIT);
    ranked
}

/// Filters events by a case-insensitive search term and a category.
///
/// The search matches title, description and organizer name.
pub fn filter_events(events: &[Event], filter: &EventFilter) -> Vec<Event> {
    let needle = filter
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase);

    events
        .iter()
        .filter(|event| match &needle {
            Some(needle) => {
                event.title.to_lowercase().contains(needle)
                    || event.description.to_lowercase().contains(needle)
                    || event.organizer_record().name.to_lowercase().contains(needle)
            }
            None => true,
        })
        .filter(|event| match filter.category_id.as_deref() {
            Some(id) if !id.is_empty() => event.has_category(id),
            _ => true,
        })
        .cloned()
        .collect()
}

/// Slices `items` into the requested 1-based page.
pub fn paginate<T: Clone>(items: &[T], page: usize, per_page: usize) -> Page<T> {
    let per_page = per_page.max(1);
    let total_pages = items.len().div_ceil(per_page).max(1);
    let page = page.clamp(1, total_pages);
    let start = (page - 1) * per_page;

    Page {
        items: items.iter().skip(start).take(per_page).cloned().collect(),
        page,
        total_pages,
        total_items: items.len(),
    }
}

/// Builds the page numbers shown in a pagination control.
///
/// The first and last pages are always present; pages more than two away
/// from `current` collapse into a gap. Returns nothing for a single page.
pub fn page_window(current: usize, total: usize) -> Vec<PageItem> {
    if total <= 1 {
        return Vec::new();
    }

    let current = current.clamp(1, total);
    let low = current.saturating_sub(PAGE_WINDOW_DELTA).max(2);
    let high = (current + PAGE_WINDOW_DELTA).min(total - 1);

    let mut window = vec![PageItem::Page(1)];
    if current.saturating_sub(PAGE_WINDOW_DELTA) > 2 {
        window.push(PageItem::Gap);
    }
    window.extend((low..=high).map(PageItem::Page));
    if current + PAGE_WINDOW_DELTA < total - 1 {
        window.push(PageItem::Gap);
    }
    window.push(PageItem::Page(total));
    window
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::mock_data::{demo_categories, demo_events};
    use crate::content::types::{Organizer, Relation};
    use chrono::{TimeZone, Utc};

    fn event(id: &str, title: &str, created_day: u32) -> Event {
        Event {
            id: id.to_string(),
            title: title.to_string(),
            created_at: Some(Utc.with_ymd_and_hms(2025, 1, created_day, 0, 0, 0).unwrap()),
            ..Event::default()
        }
    }

    #[test]
    fn test_summarize_counts_drafts() {
        let summary = summarize(&demo_events(), 8, 14, 12);

        assert_eq!(summary.total_events, 12);
        assert_eq!(summary.published_events, 9);
        assert_eq!(summary.draft_events, 3);
        assert_eq!(summary.speakers, 14);
    }

    #[test]
    fn test_recent_events_newest_first() {
        let recent = recent_events(&demo_events());
        let ids: Vec<&str> = recent.iter().map(|e| e.id.as_str()).collect();

        assert_eq!(ids, vec!["12", "11", "10", "9", "8"]);
    }

    #[test]
    fn test_recent_events_skips_missing_ids() {
        let events = vec![event("", "Ghost", 9), event("a", "A", 1), event("b", "B", 2)];

        let recent = recent_events(&events);
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].id, "b");
    }

    #[test]
    fn test_top_categories() {
        let top = top_categories(&demo_events(), &demo_categories());

        assert_eq!(top.len(), 4);
        assert_eq!(top[0].category.title, "Web Development");
        assert_eq!(top[0].event_count, 5);
        assert_eq!(top[1].category.title, "Technology");
        assert_eq!(top[1].event_count, 3);
    }

    #[test]
    fn test_filter_events_by_search() {
        let mut hosted = event("1", "Rust Meetup", 1);
        hosted.organizer = Relation::Resolved(Organizer::new("o", "Ferris Foundation"));
        let events = vec![hosted, event("2", "Go Meetup", 2)];

        let by_title = filter_events(&events, &EventFilter::new().with_search("RUST"));
        assert_eq!(by_title.len(), 1);

        let by_organizer = filter_events(&events, &EventFilter::new().with_search("ferris"));
        assert_eq!(by_organizer[0].id, "1");

        let all = filter_events(&events, &EventFilter::new().with_search("  "));
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn test_filter_events_by_category() {
        let filtered = filter_events(&demo_events(), &EventFilter::new().with_category("5"));

        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].title, "AI & Machine Learning Summit");
    }

    #[test]
    fn test_paginate() {
        let items: Vec<u32> = (1..=30).collect();

        let page = paginate(&items, 3, EVENTS_PER_PAGE);
        assert_eq!(page.items, vec![25, 26, 27, 28, 29, 30]);
        assert_eq!(page.total_pages, 3);

        let clamped = paginate(&items, 99, EVENTS_PER_PAGE);
        assert_eq!(clamped.page, 3);

        let empty = paginate::<u32>(&[], 1, EVENTS_PER_PAGE);
        assert_eq!(empty.total_pages, 1);
        assert!(empty.items.is_empty());
    }

    #[test]
    fn test_page_window_single_page() {
        assert!(page_window(1, 1).is_empty());
    }

    #[test]
    fn test_page_window_small() {
        use PageItem::Page as P;
        assert_eq!(page_window(1, 3), vec![P(1), P(2), P(3)]);
    }

    #[test]
    fn test_page_window_gaps() {
        use PageItem::{Gap, Page as P};

        assert_eq!(page_window(1, 10), vec![P(1), P(2), P(3), Gap, P(10)]);
        assert_eq!(
            page_window(5, 10),
            vec![P(1), Gap, P(3), P(4), P(5), P(6), P(7), Gap, P(10)]
        );
        assert_eq!(page_window(10, 10), vec![P(1), Gap, P(8), P(9), P(10)]);
    }
}
