use eventdesk_core::cache::QueryError;
use eventdesk_core::content::{EventFormError, ProfileFormError};
use eventdesk_core::provider::ProviderError;
use thiserror::Error;

/// Errors returned by the resource services.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error(transparent)]
    Query(#[from] QueryError),
    #[error(transparent)]
    Provider(#[from] ProviderError),
    #[error("Invalid event: {}", join(.0))]
    InvalidEvent(Vec<EventFormError>),
    #[error("Invalid profile: {}", join(.0))]
    InvalidProfile(Vec<ProfileFormError>),
}

impl ServiceError {
    /// Returns the underlying provider error, whether it came straight from
    /// a write or through the query cache.
    pub fn provider(&self) -> Option<&ProviderError> {
        match self {
            ServiceError::Provider(error) => Some(error),
            ServiceError::Query(error) => error.provider(),
            _ => None,
        }
    }

    /// Returns true if the error means the record does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self.provider(), Some(ProviderError::NotFound { .. }))
    }
}

fn join<E: std::fmt::Display>(errors: &[E]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Result type for service operations.
pub type Result<T> = std::result::Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;
    use eventdesk_core::content::ResourceKind;

    #[test]
    fn test_not_found_through_query_error() {
        let error: ServiceError =
            QueryError::from(ProviderError::not_found(ResourceKind::Event, "7")).into();

        assert!(error.is_not_found());
        assert_eq!(error.to_string(), "Event not found: 7");
    }

    #[test]
    fn test_invalid_event_lists_every_field() {
        let error = ServiceError::InvalidEvent(vec![
            EventFormError::TitleRequired,
            EventFormError::CategoryRequired,
        ]);

        assert!(!error.is_not_found());
        assert!(error.to_string().starts_with("Invalid event: "));
        assert!(error.to_string().contains("; "));
    }
}
