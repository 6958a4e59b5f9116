//! Client error types.

use eventdesk_core::content::ResourceKind;
use eventdesk_core::provider::{FieldError, ProviderError};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// Result type alias for client module.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur during client operations.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API returned {status} ({error_id}): {message}")]
    Api {
        status: u16,
        error_id: String,
        message: String,
        fields: Vec<FieldError>,
    },

    #[error("{kind} not found: {id}")]
    NotFound { kind: ResourceKind, id: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Asset {id} was not processed in time")]
    AssetProcessing { id: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ClientError {
    /// Builds an API error from a non-success status and its body.
    ///
    /// Bodies follow the CMS error shape
    /// (`{"sys": {"id": ...}, "message": ..., "details": {"errors": [...]}}`);
    /// anything else is kept as the raw message.
    pub(crate) fn from_body(status: u16, body: &str) -> Self {
        match serde_json::from_str::<ErrorBody>(body) {
            Ok(parsed) => ClientError::Api {
                status,
                error_id: parsed.sys.id,
                message: if parsed.message.is_empty() {
                    body.to_string()
                } else {
                    parsed.message
                },
                fields: parsed.details.errors.iter().map(field_error).collect(),
            },
            Err(_) => ClientError::Api {
                status,
                error_id: String::new(),
                message: body.to_string(),
                fields: Vec::new(),
            },
        }
    }
}

impl From<ClientError> for ProviderError {
    fn from(error: ClientError) -> Self {
        match error {
            ClientError::Request(err) if err.is_decode() => {
                ProviderError::InvalidResponse(err.to_string())
            }
            ClientError::Request(err) => ProviderError::Transport(err.to_string()),
            ClientError::Api {
                error_id,
                message,
                fields,
                ..
            } if error_id == "ValidationFailed" || error_id == "InvalidEntry" => {
                ProviderError::Validation { message, fields }
            }
            ClientError::Api {
                status, message, ..
            } => ProviderError::Rejected { status, message },
            ClientError::NotFound { kind, id } => ProviderError::NotFound { kind, id },
            ClientError::InvalidResponse(message) => ProviderError::InvalidResponse(message),
            error @ ClientError::AssetProcessing { .. } => {
                ProviderError::InvalidResponse(error.to_string())
            }
            ClientError::Json(err) => ProviderError::InvalidResponse(err.to_string()),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    sys: ErrorSys,
    #[serde(default)]
    message: String,
    #[serde(default)]
    details: ErrorDetails,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorSys {
    #[serde(default)]
    id: String,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorDetails {
    #[serde(default)]
    errors: Vec<Value>,
}

/// Reads one entry of `details.errors`. Paths arrive as arrays
/// (`["fields", "slug", "en-US"]`) and render dotted.
fn field_error(raw: &Value) -> FieldError {
    let path = match raw.get("path") {
        Some(Value::Array(parts)) => parts
            .iter()
            .map(|part| match part {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join("."),
        Some(Value::String(path)) => path.clone(),
        _ => String::new(),
    };
    let name = raw
        .get("name")
        .and_then(Value::as_str)
        .unwrap_or_default();
    let details = raw
        .get("details")
        .and_then(Value::as_str)
        .unwrap_or_default();

    FieldError::new(path, name).with_details(details)
}
