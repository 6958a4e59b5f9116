use thiserror::Error;

use crate::provider::ProviderError;

/// Errors stored and returned by the query cache.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error(transparent)]
    Provider(#[from] ProviderError),
    #[error("Fetch timed out after {0} ms")]
    Timeout(u64),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Fetch aborted: {0}")]
    Aborted(String),
}

impl QueryError {
    /// Returns true for failures the cache retries: transport errors and
    /// timeouts.
    pub fn is_retryable(&self) -> bool {
        match self {
            QueryError::Provider(error) => error.is_transient(),
            QueryError::Timeout(_) => true,
            QueryError::Serialization(_) | QueryError::Aborted(_) => false,
        }
    }

    /// Returns the provider error, if this wraps one.
    pub fn provider(&self) -> Option<&ProviderError> {
        match self {
            QueryError::Provider(error) => Some(error),
            _ => None,
        }
    }
}

/// Result type for query cache operations.
pub type Result<T> = std::result::Result<T, QueryError>;
