//! Content provider construction.
//!
//! The HTTP clients live in `eventdesk_client`; this module wires them from
//! [`Config`] and provides the in-memory provider used by `--static-data`
//! and the tests.

pub mod inmemory;

use std::sync::Arc;

use eventdesk_client::{DeliveryClient, ManagementClient, Space};
use eventdesk_core::provider::{ContentManager, ContentSource};

use crate::config::Config;

pub use inmemory::InMemoryProvider;

/// Read and write handles for one content backend.
#[derive(Clone)]
pub struct Provider {
    pub source: Arc<dyn ContentSource>,
    pub manager: Arc<dyn ContentManager>,
}

impl Provider {
    /// HTTP provider. Reads use the preview API when `preview` is set, so
    /// drafts are visible; otherwise the delivery API.
    pub fn http(config: &Config, preview: bool) -> Self {
        let space = Space::new(&config.space_id, &config.environment);

        let source = match (preview, &config.preview_url, &config.delivery_url) {
            (true, Some(url), _) => {
                DeliveryClient::new(url, &config.preview_token, space.clone())
            }
            (true, None, _) => DeliveryClient::preview(&config.preview_token, space.clone()),
            (false, _, Some(url)) => {
                DeliveryClient::new(url, &config.delivery_token, space.clone())
            }
            (false, _, None) => DeliveryClient::delivery(&config.delivery_token, space.clone()),
        };

        let mut manager = ManagementClient::new(&config.management_token, space)
            .with_locale(&config.locale)
            .with_content_types(config.content_types.clone());
        if let Some(url) = &config.management_url {
            manager = manager.with_base_url(url);
        }
        if let Some(url) = &config.upload_url {
            manager = manager.with_upload_url(url);
        }

        Self {
            source: Arc::new(source),
            manager: Arc::new(manager),
        }
    }

    /// In-memory provider seeded with the demo data.
    pub fn in_memory(config: &Config) -> Self {
        let provider = Arc::new(
            InMemoryProvider::with_demo_data().with_content_types(config.content_types.clone()),
        );

        Self {
            source: provider.clone(),
            manager: provider,
        }
    }
}

impl std::fmt::Debug for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Provider").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use eventdesk_core::content::ResourceKind;
    use eventdesk_core::provider::{ContentTypes, EntryQuery};

    use super::*;

    #[tokio::test]
    async fn test_in_memory_provider_follows_content_types() {
        let mut config = Config::default();
        config.content_types = ContentTypes {
            organizer: "organizer".to_string(),
            ..ContentTypes::default()
        };
        let provider = Provider::in_memory(&config);

        let organizers = provider
            .source
            .entries(&EntryQuery::of_type("organizer"))
            .await
            .unwrap();
        assert_eq!(organizers.total, 12);

        let created = provider
            .manager
            .create_entry(ResourceKind::Speaker, speaker_fields("Ferris"))
            .await
            .unwrap();
        let id = eventdesk_core::provider::sys_id(&created).unwrap().to_string();
        assert!(provider.source.entry(ResourceKind::Speaker, &id).await.is_ok());
    }

    fn speaker_fields(name: &str) -> serde_json::Map<String, serde_json::Value> {
        eventdesk_core::content::SpeakerDraft::new(name).to_fields()
    }
}
