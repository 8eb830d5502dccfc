use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

use crate::workflows::screening::domain::{
    ComparisonId, GithubProfile, LanguageRequirement, MetricTargets, MetricWeights,
    MetricsRecord, MinimumTarget, OptimalTarget, ProfileDraft, ProfileId, StandardProfile,
};
use crate::workflows::screening::evaluation::ComparisonResult;
use crate::workflows::screening::metrics::{
    CachedMetricsProvider, GithubSource, MetricsCache, MetricsError,
};
use crate::workflows::screening::repository::{
    ComparisonRecord, ComparisonStore, RepositoryError, StandardProfileStore,
};
use crate::workflows::screening::service::ScreeningService;

pub(super) type TestProvider = CachedMetricsProvider<StaticSource, MemoryCache>;
pub(super) type TestService = ScreeningService<MemoryProfiles, MemoryComparisons, TestProvider>;

pub(super) fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 14, 9, 30, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

pub(super) fn metrics_record(username: &str) -> MetricsRecord {
    MetricsRecord {
        username: username.to_string(),
        commit_frequency: 6.0,
        repository_count: 12,
        stars_received: 40,
        language_breakdown: BTreeMap::from([
            ("Go".to_string(), 6_000),
            ("Rust".to_string(), 3_000),
            ("Shell".to_string(), 1_000),
        ]),
        code_quality_estimate: 72.0,
        updated_at: fixed_now(),
    }
}

pub(super) fn standard(metrics: MetricTargets, weights: MetricWeights) -> StandardProfile {
    StandardProfile {
        id: ProfileId("custom".to_string()),
        name: "Custom rubric".to_string(),
        description: String::new(),
        metrics,
        weights,
        created_at: fixed_now(),
    }
}

pub(super) fn requirement(language: &str, proficiency: f64) -> LanguageRequirement {
    LanguageRequirement {
        language: language.to_string(),
        proficiency,
    }
}

pub(super) fn backend_draft() -> ProfileDraft {
    ProfileDraft {
        name: "Infrastructure Engineer".to_string(),
        description: "Go-heavy platform work".to_string(),
        metrics: MetricTargets {
            commit_frequency: Some(OptimalTarget { optimal: 5.0 }),
            repository_count: Some(MinimumTarget { min: 10.0 }),
            language_requirements: Some(vec![requirement("Go", 50.0)]),
            ..MetricTargets::default()
        },
        weights: MetricWeights {
            language_match: Some(2.0),
            ..MetricWeights::default()
        },
    }
}

pub(super) fn github_profile(username: &str) -> GithubProfile {
    GithubProfile {
        username: username.to_string(),
        name: Some("Mona Lisa".to_string()),
        avatar_url: None,
        html_url: Some(format!("https://github.com/{username}")),
        bio: None,
        public_repos: 12,
        followers: 30,
        following: 2,
        created_at: None,
    }
}

pub(super) fn build_service() -> (TestService, Arc<MemoryProfiles>, Arc<StaticSource>) {
    let profiles = Arc::new(MemoryProfiles::default());
    let comparisons = Arc::new(MemoryComparisons::default());
    let source = Arc::new(StaticSource::with_account(metrics_record("octocat")));
    let provider = Arc::new(CachedMetricsProvider::new(
        source.clone(),
        Arc::new(MemoryCache::default()),
    ));
    let service = ScreeningService::new(profiles.clone(), comparisons, provider)
        .expect("service seeds defaults");
    (service, profiles, source)
}

#[derive(Default)]
pub(super) struct MemoryProfiles {
    records: Mutex<HashMap<ProfileId, StandardProfile>>,
    sequence: AtomicU64,
}

impl MemoryProfiles {
    pub(super) fn remove(&self, id: &str) {
        self.records
            .lock()
            .expect("profile mutex poisoned")
            .remove(&ProfileId(id.to_string()));
    }
}

impl StandardProfileStore for MemoryProfiles {
    fn list(&self) -> Result<Vec<StandardProfile>, RepositoryError> {
        let guard = self.records.lock().expect("profile mutex poisoned");
        let mut profiles: Vec<_> = guard.values().cloned().collect();
        profiles.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        Ok(profiles)
    }

    fn fetch(&self, id: &ProfileId) -> Result<Option<StandardProfile>, RepositoryError> {
        let guard = self.records.lock().expect("profile mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn insert(
        &self,
        draft: ProfileDraft,
        created_at: DateTime<Utc>,
    ) -> Result<StandardProfile, RepositoryError> {
        let next = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        let profile = draft.into_profile(ProfileId(format!("std-{next:04}")), created_at);
        let mut guard = self.records.lock().expect("profile mutex poisoned");
        if guard.contains_key(&profile.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(profile.id.clone(), profile.clone());
        Ok(profile)
    }

    fn put(&self, profile: StandardProfile) -> Result<StandardProfile, RepositoryError> {
        let mut guard = self.records.lock().expect("profile mutex poisoned");
        guard.insert(profile.id.clone(), profile.clone());
        Ok(profile)
    }

    fn delete(&self, id: &ProfileId) -> Result<bool, RepositoryError> {
        let mut guard = self.records.lock().expect("profile mutex poisoned");
        Ok(guard.remove(id).is_some())
    }
}

#[derive(Default)]
pub(super) struct MemoryComparisons {
    records: Mutex<Vec<ComparisonRecord>>,
    sequence: AtomicU64,
}

impl ComparisonStore for MemoryComparisons {
    fn save(
        &self,
        candidate_username: &str,
        standard_profile_id: &ProfileId,
        result: ComparisonResult,
        created_at: DateTime<Utc>,
    ) -> Result<ComparisonRecord, RepositoryError> {
        let next = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        let record = ComparisonRecord {
            id: ComparisonId(format!("cmp-{next:04}")),
            candidate_username: candidate_username.to_string(),
            standard_profile_id: standard_profile_id.clone(),
            result,
            created_at,
        };
        self.records
            .lock()
            .expect("comparison mutex poisoned")
            .push(record.clone());
        Ok(record)
    }

    fn list(&self) -> Result<Vec<ComparisonRecord>, RepositoryError> {
        let guard = self.records.lock().expect("comparison mutex poisoned");
        Ok(guard.iter().rev().cloned().collect())
    }

    fn fetch(&self, id: &ComparisonId) -> Result<Option<ComparisonRecord>, RepositoryError> {
        let guard = self.records.lock().expect("comparison mutex poisoned");
        Ok(guard.iter().find(|record| &record.id == id).cloned())
    }

    fn delete(&self, id: &ComparisonId) -> Result<bool, RepositoryError> {
        let mut guard = self.records.lock().expect("comparison mutex poisoned");
        let before = guard.len();
        guard.retain(|record| &record.id != id);
        Ok(guard.len() != before)
    }
}

#[derive(Default)]
pub(super) struct MemoryCache {
    records: Mutex<HashMap<String, MetricsRecord>>,
}

impl MemoryCache {
    pub(super) fn seed(&self, record: MetricsRecord) {
        self.records
            .lock()
            .expect("cache mutex poisoned")
            .insert(record.username.clone(), record);
    }

    pub(super) fn get(&self, username: &str) -> Option<MetricsRecord> {
        self.records
            .lock()
            .expect("cache mutex poisoned")
            .get(username)
            .cloned()
    }
}

impl MetricsCache for MemoryCache {
    fn load(&self, username: &str) -> Result<Option<MetricsRecord>, RepositoryError> {
        Ok(self.get(username))
    }

    fn store(&self, record: MetricsRecord) -> Result<MetricsRecord, RepositoryError> {
        self.seed(record.clone());
        Ok(record)
    }
}

/// Source serving one known account and counting metric computations.
pub(super) struct StaticSource {
    account: MetricsRecord,
    computations: AtomicUsize,
}

impl StaticSource {
    pub(super) fn with_account(account: MetricsRecord) -> Self {
        Self {
            account,
            computations: AtomicUsize::new(0),
        }
    }

    pub(super) fn computations(&self) -> usize {
        self.computations.load(Ordering::SeqCst)
    }
}

impl GithubSource for StaticSource {
    fn fetch_profile(&self, username: &str) -> Result<GithubProfile, MetricsError> {
        if username == self.account.username {
            Ok(github_profile(username))
        } else {
            Err(MetricsError::UnknownAccount(username.to_string()))
        }
    }

    fn compute_metrics(
        &self,
        username: &str,
        computed_at: DateTime<Utc>,
    ) -> Result<MetricsRecord, MetricsError> {
        if username != self.account.username {
            return Err(MetricsError::UnknownAccount(username.to_string()));
        }
        self.computations.fetch_add(1, Ordering::SeqCst);
        Ok(MetricsRecord {
            updated_at: computed_at,
            ..self.account.clone()
        })
    }
}

pub(super) struct OfflineSource;

impl GithubSource for OfflineSource {
    fn fetch_profile(&self, _username: &str) -> Result<GithubProfile, MetricsError> {
        Err(MetricsError::Upstream("api.github.com unreachable".to_string()))
    }

    fn compute_metrics(
        &self,
        _username: &str,
        _computed_at: DateTime<Utc>,
    ) -> Result<MetricsRecord, MetricsError> {
        Err(MetricsError::Upstream("api.github.com unreachable".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) struct UnavailableComparisons;

impl ComparisonStore for UnavailableComparisons {
    fn save(
        &self,
        _candidate_username: &str,
        _standard_profile_id: &ProfileId,
        _result: ComparisonResult,
        _created_at: DateTime<Utc>,
    ) -> Result<ComparisonRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("comparison store offline".to_string()))
    }

    fn list(&self) -> Result<Vec<ComparisonRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("comparison store offline".to_string()))
    }

    fn fetch(&self, _id: &ComparisonId) -> Result<Option<ComparisonRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("comparison store offline".to_string()))
    }

    fn delete(&self, _id: &ComparisonId) -> Result<bool, RepositoryError> {
        Err(RepositoryError::Unavailable("comparison store offline".to_string()))
    }
}
