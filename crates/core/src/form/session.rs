use crate::content::{validate_event, AssetUpload, Event, EventDraft, EventFormError};

use super::slug::{slugify, toggle};

/// State of an event create/edit form.
///
/// The slug follows the title until it is set explicitly.
#[derive(Debug, Clone, Default)]
pub struct EventForm {
    event_id: Option<String>,
    draft: EventDraft,
    slug_overridden: bool,
}

impl EventForm {
    /// Starts an empty form for a new event.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts an edit session seeded from an existing event.
    ///
    /// A stored slug that differs from the derived one counts as an
    /// override and is kept when the title changes.
    pub fn from_event(event: &Event) -> Self {
        let draft = EventDraft::from_event(event);
        let slug_overridden = !draft.slug.is_empty() && draft.slug != slugify(&draft.title);

        Self {
            event_id: Some(event.id.clone()),
            draft,
            slug_overridden,
        }
    }

    /// Returns the id of the event being edited, if any.
    pub fn event_id(&self) -> Option<&str> {
        self.event_id.as_deref()
    }

    pub fn draft(&self) -> &EventDraft {
        &self.draft
    }

    pub fn title(&self) -> &str {
        &self.draft.title
    }

    pub fn slug(&self) -> &str {
        &self.draft.slug
    }

    pub fn selected_categories(&self) -> &[String] {
        &self.draft.categories
    }

    pub fn selected_speakers(&self) -> &[String] {
        &self.draft.speakers
    }

    pub fn is_slug_overridden(&self) -> bool {
        self.slug_overridden
    }

    /// Sets the title and re-derives the slug unless it was overridden.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.draft.title = title.into();
        if !self.slug_overridden {
            self.draft.slug = slugify(&self.draft.title);
        }
    }

    /// Sets the slug explicitly. Clearing it resumes deriving from the title.
    pub fn set_slug(&mut self, slug: impl Into<String>) {
        let slug = slug.into();
        if slug.is_empty() {
            self.slug_overridden = false;
            self.draft.slug = slugify(&self.draft.title);
        } else {
            self.slug_overridden = true;
            self.draft.slug = slug;
        }
    }

    pub fn set_date(&mut self, date: impl Into<String>) {
        self.draft.date = date.into();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.draft.description = description.into();
    }

    pub fn set_published(&mut self, published: bool) {
        self.draft.is_published = published;
    }

    pub fn set_organizer(&mut self, organizer_id: impl Into<String>) {
        self.draft.organizer = organizer_id.into();
    }

    /// Attaches a banner image to upload on submit.
    pub fn set_banner(&mut self, upload: AssetUpload) {
        self.draft.banner_upload = Some(upload);
    }

    pub fn toggle_category(&mut self, category_id: &str) {
        self.draft.categories = toggle(&self.draft.categories, category_id);
    }

    pub fn toggle_speaker(&mut self, speaker_id: &str) {
        self.draft.speakers = toggle(&self.draft.speakers, speaker_id);
    }

    /// Validates the form and returns the draft ready for submission.
    pub fn validate(&self) -> Result<EventDraft, Vec<EventFormError>> {
        validate_event(&self.draft)?;
        Ok(self.draft.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::demo_events;

    fn filled_form() -> EventForm {
        let mut form = EventForm::new();
        form.set_title("Rust Systems Meetup");
        form.set_date("2025-10-01T18:00:00Z");
        form.set_description("An evening of ownership and borrowing.");
        form.set_organizer("1");
        form.toggle_category("1");
        form
    }

    #[test]
    fn test_title_drives_slug() {
        let mut form = EventForm::new();
        form.set_title("My Awesome Event!! 2025");
        assert_eq!(form.slug(), "my-awesome-event-2025");

        form.set_title("Renamed Event");
        assert_eq!(form.slug(), "renamed-event");
    }

    #[test]
    fn test_explicit_slug_survives_title_change() {
        let mut form = EventForm::new();
        form.set_slug("custom-slug");
        form.set_title("Another Title");

        assert_eq!(form.slug(), "custom-slug");
        assert!(form.is_slug_overridden());

        form.set_slug("");
        assert_eq!(form.slug(), "another-title");
        assert!(!form.is_slug_overridden());
    }

    #[test]
    fn test_toggles_update_selection() {
        let mut form = EventForm::new();
        form.toggle_category("5");
        form.toggle_speaker("s-1");
        form.toggle_speaker("s-2");
        form.toggle_category("5");

        assert!(form.selected_categories().is_empty());
        assert_eq!(form.selected_speakers(), ["s-1", "s-2"]);
    }

    #[test]
    fn test_validate_returns_draft() {
        let draft = filled_form().validate().unwrap();

        assert_eq!(draft.slug, "rust-systems-meetup");
        assert_eq!(draft.categories, vec!["1"]);
    }

    #[test]
    fn test_validate_reports_missing_category() {
        let mut form = filled_form();
        form.toggle_category("1");

        assert_eq!(
            form.validate().unwrap_err(),
            vec![EventFormError::CategoryRequired]
        );
    }

    #[test]
    fn test_edit_session_keeps_custom_slug() {
        let events = demo_events();
        let summit = events.iter().find(|e| e.id == "2").unwrap();

        let mut form = EventForm::from_event(summit);
        assert_eq!(form.event_id(), Some("2"));
        assert!(form.is_slug_overridden());

        form.set_title("AI Summit 2026");
        assert_eq!(form.slug(), "ai-ml-summit-2025");
    }

    #[test]
    fn test_edit_session_with_derived_slug_follows_title() {
        let events = demo_events();
        let conference = events.iter().find(|e| e.id == "1").unwrap();

        let mut form = EventForm::from_event(conference);
        assert!(!form.is_slug_overridden());

        form.set_title("React Conference 2026");
        assert_eq!(form.slug(), "react-conference-2026");
    }
}
