use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use super::defaults::{default_profile, default_profiles, is_default_profile};
use super::domain::{
    ComparisonId, ComparisonRequest, GithubProfile, MetricsRecord, ProfileDraft, ProfileId,
    StandardProfile, ValidationError,
};
use super::evaluation::{compare, ComparisonResult};
use super::metrics::{MetricsError, MetricsProvider};
use super::repository::{
    ComparisonStore, ComparisonView, RepositoryError, StandardProfileStore,
};

/// Service composing the profile store, comparison store, metrics provider and comparator.
pub struct ScreeningService<P, C, M> {
    profiles: Arc<P>,
    comparisons: Arc<C>,
    metrics: Arc<M>,
}

impl<P, C, M> ScreeningService<P, C, M>
where
    P: StandardProfileStore + 'static,
    C: ComparisonStore + 'static,
    M: MetricsProvider + 'static,
{
    /// Builds the service and seeds any missing default profiles.
    pub fn new(
        profiles: Arc<P>,
        comparisons: Arc<C>,
        metrics: Arc<M>,
    ) -> Result<Self, ScreeningServiceError> {
        let service = Self {
            profiles,
            comparisons,
            metrics,
        };
        service.ensure_default_profiles()?;
        Ok(service)
    }

    /// Scores a candidate against a stored profile and persists the outcome.
    pub fn compare(
        &self,
        request: ComparisonRequest,
    ) -> Result<ComparisonView, ScreeningServiceError> {
        let (username, profile_id) = request.validate()?;
        let profile = self.get_profile(&profile_id)?;
        let metrics = self.metrics.get_or_compute(&username)?;

        let result = compare(&metrics, &profile);
        let record = self
            .comparisons
            .save(&username, &profile.id, result, Utc::now())?;

        info!(
            comparison = %record.id,
            candidate = %record.candidate_username,
            profile = %profile.id,
            overall_score = record.result.overall_score,
            recommendation = %record.result.recommendation,
            "comparison stored"
        );

        Ok(record.into_view(Some(profile)))
    }

    pub fn list_comparisons(&self) -> Result<Vec<ComparisonView>, ScreeningServiceError> {
        let records = self.comparisons.list()?;
        let mut views = Vec::with_capacity(records.len());
        for record in records {
            let profile = self.profiles.fetch(&record.standard_profile_id)?;
            views.push(record.into_view(profile));
        }
        Ok(views)
    }

    pub fn get_comparison(
        &self,
        id: &ComparisonId,
    ) -> Result<ComparisonView, ScreeningServiceError> {
        let record = self
            .comparisons
            .fetch(id)?
            .ok_or_else(|| ScreeningServiceError::ComparisonNotFound(id.clone()))?;
        let profile = self.profiles.fetch(&record.standard_profile_id)?;
        Ok(record.into_view(profile))
    }

    pub fn delete_comparison(&self, id: &ComparisonId) -> Result<(), ScreeningServiceError> {
        if self.comparisons.delete(id)? {
            info!(comparison = %id, "comparison deleted");
            Ok(())
        } else {
            Err(ScreeningServiceError::ComparisonNotFound(id.clone()))
        }
    }

    /// Lists stored profiles, restoring any default that went missing.
    pub fn list_profiles(&self) -> Result<Vec<StandardProfile>, ScreeningServiceError> {
        self.ensure_default_profiles()?;
        Ok(self.profiles.list()?)
    }

    pub fn get_profile(&self, id: &ProfileId) -> Result<StandardProfile, ScreeningServiceError> {
        if let Some(profile) = self.profiles.fetch(id)? {
            return Ok(profile);
        }

        match default_profile(id, Utc::now()) {
            Some(profile) => {
                warn!(profile = %id, "default profile missing from store, restoring");
                Ok(self.profiles.put(profile)?)
            }
            None => Err(ScreeningServiceError::ProfileNotFound(id.clone())),
        }
    }

    pub fn create_profile(
        &self,
        draft: ProfileDraft,
    ) -> Result<StandardProfile, ScreeningServiceError> {
        draft.validate()?;
        let profile = self.profiles.insert(draft, Utc::now())?;
        info!(profile = %profile.id, name = %profile.name, "standard profile created");
        Ok(profile)
    }

    pub fn update_profile(
        &self,
        id: &ProfileId,
        draft: ProfileDraft,
    ) -> Result<StandardProfile, ScreeningServiceError> {
        draft.validate()?;
        let existing = self.get_profile(id)?;
        let updated = self
            .profiles
            .put(draft.into_profile(existing.id, existing.created_at))?;
        info!(profile = %updated.id, "standard profile updated");
        Ok(updated)
    }

    pub fn delete_profile(&self, id: &ProfileId) -> Result<(), ScreeningServiceError> {
        if is_default_profile(id) {
            return Err(ScreeningServiceError::ProtectedProfile(id.clone()));
        }

        if self.profiles.delete(id)? {
            info!(profile = %id, "standard profile deleted");
            Ok(())
        } else {
            Err(ScreeningServiceError::ProfileNotFound(id.clone()))
        }
    }

    pub fn github_profile(&self, username: &str) -> Result<GithubProfile, ScreeningServiceError> {
        let username = required_username(username)?;
        Ok(self.metrics.profile(&username)?)
    }

    pub fn metrics(&self, username: &str) -> Result<MetricsRecord, ScreeningServiceError> {
        let username = required_username(username)?;
        Ok(self.metrics.get_or_compute(&username)?)
    }

    fn ensure_default_profiles(&self) -> Result<(), ScreeningServiceError> {
        for profile in default_profiles(Utc::now()) {
            if self.profiles.fetch(&profile.id)?.is_none() {
                self.profiles.put(profile)?;
            }
        }
        Ok(())
    }
}

/// Id given to rubrics that are scored without being stored.
pub const PREVIEW_PROFILE_ID: &str = "preview";

/// Stateless comparison of a metrics record against an unsaved rubric.
pub fn preview(
    metrics: &MetricsRecord,
    draft: ProfileDraft,
) -> Result<ComparisonResult, ScreeningServiceError> {
    draft.validate()?;
    let standard = draft.into_profile(ProfileId(PREVIEW_PROFILE_ID.to_string()), Utc::now());
    Ok(compare(metrics, &standard))
}

fn required_username(username: &str) -> Result<String, ValidationError> {
    let trimmed = username.trim();
    if trimmed.is_empty() {
        Err(ValidationError::MissingField("username"))
    } else {
        Ok(trimmed.to_string())
    }
}

/// Error raised by the screening service.
#[derive(Debug, thiserror::Error)]
pub enum ScreeningServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("standard profile `{0}` not found")]
    ProfileNotFound(ProfileId),
    #[error("comparison `{0}` not found")]
    ComparisonNotFound(ComparisonId),
    #[error("default standard profile `{0}` cannot be deleted")]
    ProtectedProfile(ProfileId),
    #[error(transparent)]
    Metrics(#[from] MetricsError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
