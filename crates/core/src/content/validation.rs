//! Form validation rules.
//!
//! Validation collects every failing rule rather than stopping at the first,
//! so a form can flag all of its fields at once.

use super::error::{EventFormError, ProfileFormError};
use super::requests::{EventDraft, OrganizerDraft, SpeakerDraft};

const TITLE_MAX_CHARS: usize = 100;
const DESCRIPTION_MIN_CHARS: usize = 10;

/// Validates an event draft before it is sent to the CMS.
pub fn validate_event(draft: &EventDraft) -> Result<(), Vec<EventFormError>> {
    let mut errors = Vec::new();

    let title_len = draft.title.chars().count();
    if title_len == 0 {
        errors.push(EventFormError::TitleRequired);
    } else if title_len > TITLE_MAX_CHARS {
        errors.push(EventFormError::TitleTooLong);
    }

    if draft.slug.is_empty() {
        errors.push(EventFormError::SlugRequired);
    } else if !is_valid_slug(&draft.slug) {
        errors.push(EventFormError::InvalidSlug);
    }

    if draft.date.is_empty() {
        errors.push(EventFormError::DateRequired);
    }
    if draft.description.chars().count() < DESCRIPTION_MIN_CHARS {
        errors.push(EventFormError::DescriptionTooShort);
    }
    if draft.organizer.is_empty() {
        errors.push(EventFormError::OrganizerRequired);
    }
    if draft.categories.is_empty() {
        errors.push(EventFormError::CategoryRequired);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validates an organizer draft.
pub fn validate_organizer(draft: &OrganizerDraft) -> Result<(), Vec<ProfileFormError>> {
    let mut errors = Vec::new();
    if draft.name.trim().is_empty() {
        errors.push(ProfileFormError::NameRequired);
    }
    if draft.email.is_empty() {
        errors.push(ProfileFormError::EmailRequired);
    } else if !is_valid_email(&draft.email) {
        errors.push(ProfileFormError::InvalidEmail(draft.email.clone()));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validates a speaker draft.
pub fn validate_speaker(draft: &SpeakerDraft) -> Result<(), Vec<ProfileFormError>> {
    if draft.name.trim().is_empty() {
        return Err(vec![ProfileFormError::NameRequired]);
    }
    Ok(())
}

/// Checks a slug against `^[a-z0-9-]+$`.
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
}

/// Loose structural email check: `local@domain.tld` without whitespace.
fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}
