use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{ComparisonId, ProfileDraft, ProfileId, StandardProfile};
use super::evaluation::ComparisonResult;

/// Stored outcome of comparing one candidate against one standard profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRecord {
    pub id: ComparisonId,
    pub candidate_username: String,
    pub standard_profile_id: ProfileId,
    pub result: ComparisonResult,
    pub created_at: DateTime<Utc>,
}

impl ComparisonRecord {
    pub fn into_view(self, profile: Option<StandardProfile>) -> ComparisonView {
        let standard_profile = match profile {
            Some(profile) if profile.id == self.standard_profile_id => {
                ProfileReference::Expanded(profile)
            }
            _ => ProfileReference::Id(self.standard_profile_id),
        };

        ComparisonView {
            id: self.id,
            candidate_username: self.candidate_username,
            standard_profile,
            result: self.result,
            created_at: self.created_at,
        }
    }
}

/// The referenced profile, expanded when it still exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProfileReference {
    Expanded(StandardProfile),
    Id(ProfileId),
}

impl ProfileReference {
    pub fn id(&self) -> &ProfileId {
        match self {
            ProfileReference::Expanded(profile) => &profile.id,
            ProfileReference::Id(id) => id,
        }
    }
}

/// Comparison as returned to API callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonView {
    pub id: ComparisonId,
    pub candidate_username: String,
    pub standard_profile: ProfileReference,
    pub result: ComparisonResult,
    pub created_at: DateTime<Utc>,
}

/// Storage abstraction for standard profiles.
pub trait StandardProfileStore: Send + Sync {
    /// Newest first.
    fn list(&self) -> Result<Vec<StandardProfile>, RepositoryError>;
    fn fetch(&self, id: &ProfileId) -> Result<Option<StandardProfile>, RepositoryError>;
    /// Persists a new profile under a store-assigned id.
    fn insert(
        &self,
        draft: ProfileDraft,
        created_at: DateTime<Utc>,
    ) -> Result<StandardProfile, RepositoryError>;
    /// Inserts or replaces the profile stored under `profile.id`.
    fn put(&self, profile: StandardProfile) -> Result<StandardProfile, RepositoryError>;
    /// Returns `false` when nothing was stored under `id`.
    fn delete(&self, id: &ProfileId) -> Result<bool, RepositoryError>;
}

/// Storage abstraction for comparison records.
pub trait ComparisonStore: Send + Sync {
    fn save(
        &self,
        candidate_username: &str,
        standard_profile_id: &ProfileId,
        result: ComparisonResult,
        created_at: DateTime<Utc>,
    ) -> Result<ComparisonRecord, RepositoryError>;
    /// Newest first.
    fn list(&self) -> Result<Vec<ComparisonRecord>, RepositoryError>;
    fn fetch(&self, id: &ComparisonId) -> Result<Option<ComparisonRecord>, RepositoryError>;
    /// Returns `false` when nothing was stored under `id`.
    fn delete(&self, id: &ComparisonId) -> Result<bool, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
