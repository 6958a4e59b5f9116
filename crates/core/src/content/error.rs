use thiserror::Error;

/// Errors raised when validating an event form.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EventFormError {
    #[error("Title is required")]
    TitleRequired,
    #[error("Title must be less than 100 characters")]
    TitleTooLong,
    #[error("Slug is required")]
    SlugRequired,
    #[error("Slug must contain only lowercase letters, numbers, and hyphens")]
    InvalidSlug,
    #[error("Date is required")]
    DateRequired,
    #[error("Description must be at least 10 characters")]
    DescriptionTooShort,
    #[error("Organizer is required")]
    OrganizerRequired,
    #[error("At least one category is required")]
    CategoryRequired,
}

impl EventFormError {
    /// Returns the form field the error belongs to.
    pub fn field(&self) -> &'static str {
        match self {
            EventFormError::TitleRequired | EventFormError::TitleTooLong => "title",
            EventFormError::SlugRequired | EventFormError::InvalidSlug => "slug",
            EventFormError::DateRequired => "date",
            EventFormError::DescriptionTooShort => "description",
            EventFormError::OrganizerRequired => "organizer",
            EventFormError::CategoryRequired => "categories",
        }
    }
}

/// Errors raised when validating organizer or speaker forms.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProfileFormError {
    #[error("Name is required")]
    NameRequired,
    #[error("Email is required")]
    EmailRequired,
    #[error("Invalid email address: {0}")]
    InvalidEmail(String),
}

impl ProfileFormError {
    pub fn field(&self) -> &'static str {
        match self {
            ProfileFormError::NameRequired => "name",
            ProfileFormError::EmailRequired | ProfileFormError::InvalidEmail(_) => "email",
        }
    }
}
