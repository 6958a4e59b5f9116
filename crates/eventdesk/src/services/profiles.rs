//! Speaker and organizer services.
//!
//! Both are simple profiles with the same lifecycle, so one generic service
//! covers them.

use std::marker::PhantomData;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};

use eventdesk_core::cache::{
    organizer_key, organizers_list_key, speaker_key, speakers_list_key, QueryKey,
};
use eventdesk_core::content::{
    demo_organizers, demo_speakers, validate_organizer, validate_speaker, Organizer,
    OrganizerDraft, ProfileFormError, ResourceKind, Speaker, SpeakerDraft,
};
use eventdesk_core::normalize::{normalize_organizer, normalize_speaker};
use eventdesk_core::provider::ProviderError;

use super::context::{id_and_version, ServiceContext};
use crate::error::{Result, ServiceError};

/// A profile record managed through [`ProfileService`].
pub trait Profile: Serialize + DeserializeOwned + Clone + Send + 'static {
    type Draft: Send;

    const KIND: ResourceKind;

    fn id(&self) -> &str;
    fn list_key() -> QueryKey;
    fn key(id: &str) -> QueryKey;
    fn normalize(raw: &Value) -> Self;
    fn validate(draft: &Self::Draft) -> std::result::Result<(), Vec<ProfileFormError>>;
    fn to_fields(draft: &Self::Draft) -> Map<String, Value>;
    fn demo() -> Vec<Self>;
}

impl Profile for Speaker {
    type Draft = SpeakerDraft;

    const KIND: ResourceKind = ResourceKind::Speaker;

    fn id(&self) -> &str {
        &self.id
    }

    fn list_key() -> QueryKey {
        speakers_list_key()
    }

    fn key(id: &str) -> QueryKey {
        speaker_key(id)
    }

    fn normalize(raw: &Value) -> Self {
        normalize_speaker(raw)
    }

    fn validate(draft: &SpeakerDraft) -> std::result::Result<(), Vec<ProfileFormError>> {
        validate_speaker(draft)
    }

    fn to_fields(draft: &SpeakerDraft) -> Map<String, Value> {
        draft.to_fields()
    }

    fn demo() -> Vec<Self> {
        demo_speakers()
    }
}

impl Profile for Organizer {
    type Draft = OrganizerDraft;

    const KIND: ResourceKind = ResourceKind::Organizer;

    fn id(&self) -> &str {
        &self.id
    }

    fn list_key() -> QueryKey {
        organizers_list_key()
    }

    fn key(id: &str) -> QueryKey {
        organizer_key(id)
    }

    fn normalize(raw: &Value) -> Self {
        normalize_organizer(raw)
    }

    fn validate(draft: &OrganizerDraft) -> std::result::Result<(), Vec<ProfileFormError>> {
        validate_organizer(draft)
    }

    fn to_fields(draft: &OrganizerDraft) -> Map<String, Value> {
        draft.to_fields()
    }

    fn demo() -> Vec<Self> {
        demo_organizers()
    }
}

/// Default listing order for profiles.
const ORDER: &str = "fields.name";

/// Cached reads and validated writes for one profile kind.
#[derive(Debug)]
pub struct ProfileService<P> {
    ctx: ServiceContext,
    _profile: PhantomData<fn() -> P>,
}

pub type SpeakerService = ProfileService<Speaker>;
pub type OrganizerService = ProfileService<Organizer>;

impl<P> Clone for ProfileService<P> {
    fn clone(&self) -> Self {
        Self {
            ctx: self.ctx.clone(),
            _profile: PhantomData,
        }
    }
}

impl<P: Profile> ProfileService<P> {
    pub fn new(ctx: ServiceContext) -> Self {
        Self {
            ctx,
            _profile: PhantomData,
        }
    }

    /// Lists every profile sorted by name.
    pub async fn list(&self) -> Result<Vec<P>> {
        let key = P::list_key();
        let query = self.ctx.query(P::KIND).with_order(ORDER);
        let result = self.ctx.list(&key, query, P::normalize).await;
        self.ctx
            .recover(&key, result.map(|listing| listing.items), || Some(P::demo()))
    }

    pub async fn get(&self, id: &str) -> Result<P> {
        let result = self.ctx.record(P::KIND, id, P::normalize).await;
        self.ctx.recover(&P::key(id), result, || {
            P::demo().into_iter().find(|p| p.id() == id)
        })
    }

    /// Creates and publishes a profile. Profiles have no draft state.
    pub async fn create(&self, draft: P::Draft) -> Result<P> {
        P::validate(&draft).map_err(ServiceError::InvalidProfile)?;

        let created = self
            .ctx
            .manager
            .create_entry(P::KIND, P::to_fields(&draft))
            .await?;
        let written = P::normalize(&self.publish(&created).await?);
        let id = written.id().to_string();
        let profile = self.ctx.reread(P::KIND, &id, written, P::normalize).await;
        tracing::debug!(kind = %P::KIND, id = %id, "Profile created");
        Ok(profile)
    }

    /// Replaces a profile's fields at its current version and republishes
    /// it.
    pub async fn update(&self, id: &str, draft: P::Draft) -> Result<P> {
        P::validate(&draft).map_err(ServiceError::InvalidProfile)?;

        let manager = &self.ctx.manager;
        let version = manager.entry_version(P::KIND, id).await?;
        let updated = manager
            .update_entry(P::KIND, id, version, P::to_fields(&draft))
            .await?;
        let written = P::normalize(&self.publish(&updated).await?);
        let profile = self.ctx.reread(P::KIND, id, written, P::normalize).await;
        tracing::debug!(kind = %P::KIND, id = %id, "Profile updated");
        Ok(profile)
    }

    /// Deletes a profile, unpublishing it first when the CMS requires it.
    pub async fn delete(&self, id: &str) -> Result<()> {
        let manager = &self.ctx.manager;
        match manager.delete_entry(P::KIND, id).await {
            Ok(()) => {}
            Err(ProviderError::Rejected { .. }) => {
                let version = manager.entry_version(P::KIND, id).await?;
                manager.unpublish_entry(P::KIND, id, version).await?;
                manager.delete_entry(P::KIND, id).await?;
            }
            Err(err) => return Err(err.into()),
        }

        self.ctx.record_deleted(P::KIND, id);
        tracing::debug!(kind = %P::KIND, id = %id, "Profile deleted");
        Ok(())
    }

    async fn publish(&self, raw: &Value) -> Result<Value> {
        let (id, version) = id_and_version(raw)?;
        Ok(self.ctx.manager.publish_entry(P::KIND, &id, version).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::InMemoryProvider;
    use crate::services::testing::{context, delivery_context};

    #[tokio::test]
    async fn test_speakers_list_sorted_by_name() {
        let provider = InMemoryProvider::with_demo_data();
        let speakers = SpeakerService::new(context(&provider));

        let names: Vec<String> = speakers
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect();

        assert_eq!(names.len(), 14);
        assert_eq!(names[0], "Addy Osmani");
        assert!(speakers.ctx.cache.contains(&speakers_list_key()));
    }

    #[tokio::test]
    async fn test_organizer_lifecycle() {
        let provider = InMemoryProvider::new();
        let organizers = OrganizerService::new(context(&provider));

        let created = organizers
            .create(OrganizerDraft::new("Rust Guild", "hi@rust.guild"))
            .await
            .unwrap();
        assert_eq!(organizers.list().await.unwrap().len(), 1);

        let updated = organizers
            .update(&created.id, OrganizerDraft::new("Rust Guild EU", "eu@rust.guild"))
            .await
            .unwrap();
        assert_eq!(updated.name, "Rust Guild EU");
        assert_eq!(organizers.get(&created.id).await.unwrap().name, "Rust Guild EU");

        organizers.delete(&created.id).await.unwrap();
        assert!(organizers.list().await.unwrap().is_empty());
        assert!(organizers.get(&created.id).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_created_speaker_is_visible_to_published_only_source() {
        let provider = InMemoryProvider::with_demo_data();
        let speakers = SpeakerService::new(delivery_context(&provider));

        let created = speakers.create(SpeakerDraft::new("Ferris Crab")).await.unwrap();
        assert_eq!(created.name, "Ferris Crab");

        let listed = speakers.list().await.unwrap();
        assert_eq!(listed.len(), 15);
        assert!(listed.iter().any(|s| s.id == created.id));

        let renamed = speakers
            .update(&created.id, SpeakerDraft::new("Ferris the Crab"))
            .await
            .unwrap();
        assert_eq!(renamed.name, "Ferris the Crab");
        assert_eq!(speakers.get(&created.id).await.unwrap().name, "Ferris the Crab");
    }

    #[tokio::test]
    async fn test_invalid_organizer_is_not_sent() {
        let provider = InMemoryProvider::new();
        let organizers = OrganizerService::new(context(&provider));

        let error = organizers
            .create(OrganizerDraft::new("", "not-an-email"))
            .await
            .unwrap_err();

        assert!(matches!(error, ServiceError::InvalidProfile(ref errors) if errors.len() == 2));
        assert_eq!(provider.count(ResourceKind::Organizer).await, 0);
    }

    #[tokio::test]
    async fn test_delete_published_speaker() {
        let provider = InMemoryProvider::with_demo_data();
        let speakers = SpeakerService::new(context(&provider));

        speakers.delete("14").await.unwrap();

        assert_eq!(provider.count(ResourceKind::Speaker).await, 13);
    }
}
