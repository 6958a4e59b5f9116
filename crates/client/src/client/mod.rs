//! HTTP clients for the content APIs.

mod assets;
mod delivery;
mod management;

pub use delivery::DeliveryClient;
pub use management::ManagementClient;

use eventdesk_core::content::ResourceKind;
use serde::de::DeserializeOwned;

use crate::error::{ClientError, Result};

/// Default delivery API host.
pub const DELIVERY_URL: &str = "https://cdn.contentful.com";
/// Default preview API host.
pub const PREVIEW_URL: &str = "https://preview.contentful.com";
/// Default management API host.
pub const MANAGEMENT_URL: &str = "https://api.contentful.com";
/// Default upload API host.
pub const UPLOAD_URL: &str = "https://upload.contentful.com";

/// Media type required by the management API for JSON bodies.
pub(crate) const MANAGEMENT_JSON: &str = "application/vnd.contentful.management.v1+json";

/// A CMS space and environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Space {
    pub id: String,
    pub environment: String,
}

impl Space {
    pub fn new(id: impl Into<String>, environment: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            environment: environment.into(),
        }
    }

    /// Path prefix for environment-scoped resources.
    pub(crate) fn path(&self) -> String {
        format!("/spaces/{}/environments/{}", self.id, self.environment)
    }
}

/// What a request is about, used to build `NotFound` errors.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Target<'a> {
    Record(ResourceKind, &'a str),
    Collection,
}

/// Handle error responses.
pub(crate) async fn handle_response<T: DeserializeOwned>(
    response: reqwest::Response,
    target: Target<'_>,
) -> Result<T> {
    let response = check_status(response, target).await?;
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(ClientError::from)
}

/// Handle responses where no body is expected.
pub(crate) async fn handle_empty_response(
    response: reqwest::Response,
    target: Target<'_>,
) -> Result<()> {
    check_status(response, target).await.map(|_| ())
}

async fn check_status(
    response: reqwest::Response,
    target: Target<'_>,
) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    if status.as_u16() == 404 {
        if let Target::Record(kind, id) = target {
            return Err(ClientError::NotFound {
                kind,
                id: id.to_string(),
            });
        }
    }

    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    Err(ClientError::from_body(status.as_u16(), &body))
}

/// Joins a base URL and a path without doubling slashes.
pub(crate) fn join(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), path)
}
