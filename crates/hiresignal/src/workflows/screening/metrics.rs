use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info};

use super::domain::{GithubProfile, MetricsRecord};
use super::repository::RepositoryError;

pub const DEFAULT_METRICS_TTL_HOURS: i64 = 24;

/// Acquires account details and raw metrics from GitHub (or a stand-in).
pub trait GithubSource: Send + Sync {
    fn fetch_profile(&self, username: &str) -> Result<GithubProfile, MetricsError>;
    fn compute_metrics(
        &self,
        username: &str,
        computed_at: DateTime<Utc>,
    ) -> Result<MetricsRecord, MetricsError>;
}

/// Persistence for previously computed metrics, keyed by username.
pub trait MetricsCache: Send + Sync {
    fn load(&self, username: &str) -> Result<Option<MetricsRecord>, RepositoryError>;
    /// Inserts or replaces the record stored for `record.username`.
    fn store(&self, record: MetricsRecord) -> Result<MetricsRecord, RepositoryError>;
}

/// What the screening service needs from the metrics side.
pub trait MetricsProvider: Send + Sync {
    fn get_or_compute(&self, username: &str) -> Result<MetricsRecord, MetricsError>;
    fn profile(&self, username: &str) -> Result<GithubProfile, MetricsError>;
}

/// Failures while resolving a candidate's GitHub data.
#[derive(Debug, thiserror::Error)]
pub enum MetricsError {
    #[error("GitHub account `{0}` not found")]
    UnknownAccount(String),
    #[error("GitHub data unavailable: {0}")]
    Upstream(String),
    #[error("metrics cache failure: {0}")]
    Cache(#[from] RepositoryError),
}

/// Serves cached metrics while they are younger than the TTL and recomputes
/// them through the source otherwise.
pub struct CachedMetricsProvider<S, C> {
    source: Arc<S>,
    cache: Arc<C>,
    ttl: Duration,
}

impl<S, C> CachedMetricsProvider<S, C>
where
    S: GithubSource,
    C: MetricsCache,
{
    pub fn new(source: Arc<S>, cache: Arc<C>) -> Self {
        Self::with_ttl(source, cache, Duration::hours(DEFAULT_METRICS_TTL_HOURS))
    }

    pub fn with_ttl(source: Arc<S>, cache: Arc<C>, ttl: Duration) -> Self {
        Self { source, cache, ttl }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn get_or_compute_at(
        &self,
        username: &str,
        now: DateTime<Utc>,
    ) -> Result<MetricsRecord, MetricsError> {
        if let Some(cached) = self.cache.load(username)? {
            if cached.is_fresh(now, self.ttl) {
                debug!(username, updated_at = %cached.updated_at, "serving cached metrics");
                return Ok(cached);
            }
        }

        let computed = self.source.compute_metrics(username, now)?;
        let stored = self.cache.store(computed)?;
        info!(username, "refreshed GitHub metrics");
        Ok(stored)
    }
}

impl<S, C> MetricsProvider for CachedMetricsProvider<S, C>
where
    S: GithubSource,
    C: MetricsCache,
{
    fn get_or_compute(&self, username: &str) -> Result<MetricsRecord, MetricsError> {
        self.get_or_compute_at(username, Utc::now())
    }

    fn profile(&self, username: &str) -> Result<GithubProfile, MetricsError> {
        self.source.fetch_profile(username)
    }
}
