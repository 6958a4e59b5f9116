//! Pretty output formatting.

use eventdesk_core::content::{Category, Event, Organizer, Page, PageItem, Speaker};

use crate::services::{Dashboard, Listing};

const RULE_WIDTH: usize = 40;

/// Format an event for display.
pub fn format_event(event: &Event) -> String {
    let status = if event.is_published { "published" } else { "draft" };
    let mut output = format!(
        "{} [{}]\n  ID: {}\n  Slug: {}\n  Date: {}\n  Organizer: {}",
        event.title,
        status,
        event.id,
        event.slug,
        event.date,
        event.organizer_name()
    );

    let categories: Vec<String> = event
        .categories
        .iter()
        .map(|c| c.record().title)
        .filter(|t| !t.is_empty())
        .collect();
    if !categories.is_empty() {
        output.push_str(&format!("\n  Categories: {}", categories.join(", ")));
    }

    let speakers: Vec<String> = event
        .speakers
        .iter()
        .map(|s| s.record().name)
        .filter(|n| !n.is_empty())
        .collect();
    if !speakers.is_empty() {
        output.push_str(&format!("\n  Speakers: {}", speakers.join(", ")));
    }
    if let Some(banner) = &event.banner {
        output.push_str(&format!("\n  Banner: {}", banner));
    }
    output
}

/// Format an event listing for display.
pub fn format_events(listing: &Listing<Event>) -> String {
    if listing.items.is_empty() {
        return "No events found.".to_string();
    }
    let mut output = format!("EVENTS ({} of {})\n", listing.items.len(), listing.total);
    output.push_str(&"-".repeat(RULE_WIDTH));
    for event in &listing.items {
        output.push_str(&format!("\n{}", format_event(event)));
        output.push('\n');
    }
    output
}

/// Format a category for display.
pub fn format_category(category: &Category) -> String {
    let mut output = format!(
        "{}\n  ID: {}\n  Slug: {}",
        category.title, category.id, category.slug
    );
    if let Some(color) = &category.color {
        output.push_str(&format!("\n  Color: {}", color));
    }
    output
}

/// Format categories for display.
pub fn format_categories(categories: &[Category]) -> String {
    format_list("CATEGORIES", "No categories found.", categories, format_category)
}

/// Format a speaker for display.
pub fn format_speaker(speaker: &Speaker) -> String {
    let mut output = format!("{}\n  ID: {}", speaker.name, speaker.id);
    if let Some(bio) = &speaker.bio {
        output.push_str(&format!("\n  Bio: {}", bio));
    }
    output
}

/// Format speakers for display.
pub fn format_speakers(speakers: &[Speaker]) -> String {
    format_list("SPEAKERS", "No speakers found.", speakers, format_speaker)
}

/// Format an organizer for display.
pub fn format_organizer(organizer: &Organizer) -> String {
    let mut output = format!("{}\n  ID: {}", organizer.display_name(), organizer.id);
    if let Some(email) = &organizer.email {
        output.push_str(&format!("\n  Email: {}", email));
    }
    output
}

/// Format organizers for display.
pub fn format_organizers(organizers: &[Organizer]) -> String {
    format_list("ORGANIZERS", "No organizers found.", organizers, format_organizer)
}

/// Format the dashboard panels.
pub fn format_dashboard(dashboard: &Dashboard) -> String {
    let summary = &dashboard.summary;
    let mut output = format!(
        "DASHBOARD\n{}\n  Events: {} ({} published, {} drafts)\n  Categories: {}\n  Speakers: {}\n  Organizers: {}",
        "-".repeat(RULE_WIDTH),
        summary.total_events,
        summary.published_events,
        summary.draft_events,
        summary.categories,
        summary.speakers,
        summary.organizers,
    );

    output.push_str("\n\nRECENT EVENTS");
    for event in &dashboard.recent_events {
        output.push_str(&format!("\n  {} ({})", event.title, event.date));
    }

    output.push_str("\n\nTOP CATEGORIES");
    for entry in &dashboard.top_categories {
        output.push_str(&format!("\n  {}: {}", entry.category.title, entry.event_count));
    }
    output
}

/// Format one page of the events browser with its page controls.
pub fn format_event_page(page: &Page<Event>, window: &[PageItem]) -> String {
    let mut output = format_events(&Listing {
        items: page.items.clone(),
        total: page.total_items as u32,
    });
    if !window.is_empty() {
        output.push_str(&format!(
            "\nPage {} of {}: {}",
            page.page,
            page.total_pages,
            format_window(window, page.page)
        ));
    }
    output
}

/// Renders page controls, e.g. `1 … 4 [5] 6 … 9`.
pub fn format_window(window: &[PageItem], current: usize) -> String {
    window
        .iter()
        .map(|item| match item {
            PageItem::Page(n) if *n == current => format!("[{n}]"),
            PageItem::Page(n) => n.to_string(),
            PageItem::Gap => "…".to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn format_list<T>(title: &str, empty: &str, items: &[T], format: fn(&T) -> String) -> String {
    if items.is_empty() {
        return empty.to_string();
    }
    let mut output = format!("{} ({})\n", title, items.len());
    output.push_str(&"-".repeat(RULE_WIDTH));
    for item in items {
        output.push_str(&format!("\n{}", format(item)));
        output.push('\n');
    }
    output
}
