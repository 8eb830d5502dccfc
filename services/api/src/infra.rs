use chrono::{DateTime, Utc};
use hiresignal::error::AppError;
use hiresignal::workflows::screening::{
    ComparisonId, ComparisonRecord, ComparisonResult, ComparisonStore, GithubProfile,
    GithubSource, MetricsCache, MetricsError, MetricsRecord, ProfileDraft, ProfileId,
    RepositoryError, StandardProfile, StandardProfileStore,
};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryProfileStore {
    records: Arc<Mutex<HashMap<ProfileId, StandardProfile>>>,
    sequence: Arc<AtomicU64>,
}

impl StandardProfileStore for InMemoryProfileStore {
    fn list(&self) -> Result<Vec<StandardProfile>, RepositoryError> {
        let guard = self.records.lock().expect("profile store mutex poisoned");
        let mut profiles: Vec<_> = guard.values().cloned().collect();
        profiles.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(profiles)
    }

    fn fetch(&self, id: &ProfileId) -> Result<Option<StandardProfile>, RepositoryError> {
        let guard = self.records.lock().expect("profile store mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn insert(
        &self,
        draft: ProfileDraft,
        created_at: DateTime<Utc>,
    ) -> Result<StandardProfile, RepositoryError> {
        let next = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        let profile = draft.into_profile(ProfileId(format!("std-{next:06}")), created_at);
        let mut guard = self.records.lock().expect("profile store mutex poisoned");
        if guard.contains_key(&profile.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(profile.id.clone(), profile.clone());
        Ok(profile)
    }

    fn put(&self, profile: StandardProfile) -> Result<StandardProfile, RepositoryError> {
        let mut guard = self.records.lock().expect("profile store mutex poisoned");
        guard.insert(profile.id.clone(), profile.clone());
        Ok(profile)
    }

    fn delete(&self, id: &ProfileId) -> Result<bool, RepositoryError> {
        let mut guard = self.records.lock().expect("profile store mutex poisoned");
        Ok(guard.remove(id).is_some())
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryComparisonStore {
    records: Arc<Mutex<Vec<ComparisonRecord>>>,
    sequence: Arc<AtomicU64>,
}

impl ComparisonStore for InMemoryComparisonStore {
    fn save(
        &self,
        candidate_username: &str,
        standard_profile_id: &ProfileId,
        result: ComparisonResult,
        created_at: DateTime<Utc>,
    ) -> Result<ComparisonRecord, RepositoryError> {
        let next = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        let record = ComparisonRecord {
            id: ComparisonId(format!("cmp-{next:06}")),
            candidate_username: candidate_username.to_string(),
            standard_profile_id: standard_profile_id.clone(),
            result,
            created_at,
        };
        let mut guard = self.records.lock().expect("comparison store mutex poisoned");
        guard.push(record.clone());
        Ok(record)
    }

    fn list(&self) -> Result<Vec<ComparisonRecord>, RepositoryError> {
        let guard = self.records.lock().expect("comparison store mutex poisoned");
        let mut records = guard.clone();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));
        Ok(records)
    }

    fn fetch(&self, id: &ComparisonId) -> Result<Option<ComparisonRecord>, RepositoryError> {
        let guard = self.records.lock().expect("comparison store mutex poisoned");
        Ok(guard.iter().find(|record| &record.id == id).cloned())
    }

    fn delete(&self, id: &ComparisonId) -> Result<bool, RepositoryError> {
        let mut guard = self.records.lock().expect("comparison store mutex poisoned");
        let before = guard.len();
        guard.retain(|record| &record.id != id);
        Ok(guard.len() != before)
    }
}

/// Keys are lowercased so lookups share one entry per GitHub account.
#[derive(Default, Clone)]
pub(crate) struct InMemoryMetricsCache {
    records: Arc<Mutex<HashMap<String, MetricsRecord>>>,
}

impl MetricsCache for InMemoryMetricsCache {
    fn load(&self, username: &str) -> Result<Option<MetricsRecord>, RepositoryError> {
        let guard = self.records.lock().expect("metrics cache mutex poisoned");
        Ok(guard.get(&username.to_ascii_lowercase()).cloned())
    }

    fn store(&self, record: MetricsRecord) -> Result<MetricsRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("metrics cache mutex poisoned");
        guard.insert(record.username.to_ascii_lowercase(), record.clone());
        Ok(record)
    }
}

/// GitHub accounts served from a JSON document instead of the live API.
///
/// The document shape is `{"accounts": [{"profile": {..}, "metrics": {..}}]}`;
/// usernames match case-insensitively, as they do on GitHub.
#[derive(Debug, Default, Clone)]
pub(crate) struct FixtureGithubSource {
    accounts: HashMap<String, FixtureAccount>,
}

#[derive(Debug, Clone, Deserialize)]
struct FixtureAccount {
    profile: GithubProfile,
    metrics: MetricsRecord,
}

#[derive(Debug, Deserialize)]
struct FixtureDocument {
    #[serde(default)]
    accounts: Vec<FixtureAccount>,
}

impl FixtureGithubSource {
    pub(crate) fn from_path(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    pub(crate) fn from_reader<R: Read>(reader: R) -> Result<Self, AppError> {
        let document: FixtureDocument = serde_json::from_reader(reader)?;
        let accounts = document
            .accounts
            .into_iter()
            .map(|account| (account.profile.username.to_ascii_lowercase(), account))
            .collect();
        Ok(Self { accounts })
    }

    pub(crate) fn account_count(&self) -> usize {
        self.accounts.len()
    }

    fn account(&self, username: &str) -> Result<&FixtureAccount, MetricsError> {
        self.accounts
            .get(&username.to_ascii_lowercase())
            .ok_or_else(|| MetricsError::UnknownAccount(username.to_string()))
    }
}

impl GithubSource for FixtureGithubSource {
    fn fetch_profile(&self, username: &str) -> Result<GithubProfile, MetricsError> {
        Ok(self.account(username)?.profile.clone())
    }

    fn compute_metrics(
        &self,
        username: &str,
        computed_at: DateTime<Utc>,
    ) -> Result<MetricsRecord, MetricsError> {
        let account = self.account(username)?;
        Ok(MetricsRecord {
            username: account.profile.username.clone(),
            updated_at: computed_at,
            ..account.metrics.clone()
        })
    }
}
