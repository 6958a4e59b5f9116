use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::content::ResourceKind;

/// A field-level validation failure reported by the CMS.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Path of the offending field, e.g. `fields.slug.en-US`.
    pub path: String,
    /// Rule that failed, e.g. `unique` or `required`.
    pub name: String,
    #[serde(default)]
    pub details: String,
}

impl FieldError {
    pub fn new(path: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            details: String::new(),
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = details.into();
        self
    }
}

/// Errors that can occur when talking to a content provider.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("Validation failed: {message}")]
    Validation {
        message: String,
        fields: Vec<FieldError>,
    },
    #[error("{kind} not found: {id}")]
    NotFound { kind: ResourceKind, id: String },
    #[error("Request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl ProviderError {
    pub fn not_found(kind: ResourceKind, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            id: id.into(),
        }
    }

    /// Returns true for failures worth retrying (network-level errors).
    pub fn is_transient(&self) -> bool {
        matches!(self, ProviderError::Transport(_))
    }

    /// Returns the field-level errors of a validation failure.
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            ProviderError::Validation { fields, .. } => fields,
            _ => &[],
        }
    }
}

/// Result type for provider operations.
pub type Result<T> = std::result::Result<T, ProviderError>;
