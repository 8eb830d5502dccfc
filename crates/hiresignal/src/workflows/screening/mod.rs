//! Candidate screening: scores a GitHub account's metrics against a weighted
//! standard profile and keeps the resulting recommendation.
//!
//! GitHub acquisition and storage sit behind the traits in [`metrics`] and
//! [`repository`]; the comparator in [`evaluation`] is a pure function.

pub mod defaults;
pub mod domain;
pub mod evaluation;
pub mod metrics;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use defaults::{default_profiles, is_default_profile, DEFAULT_PROFILE_IDS};
pub use domain::{
    ComparisonId, ComparisonRequest, GithubProfile, LanguageRequirement, MetricFamily,
    MetricTargets, MetricWeights, MetricsRecord, MinimumTarget, OptimalTarget, ProfileDraft,
    ProfileId, StandardProfile, ValidationError,
};
pub use evaluation::{compare, ComparisonResult, MetricBreakdown, Recommendation};
pub use metrics::{
    CachedMetricsProvider, GithubSource, MetricsCache, MetricsError, MetricsProvider,
};
pub use repository::{
    ComparisonRecord, ComparisonStore, ComparisonView, ProfileReference, RepositoryError,
    StandardProfileStore,
};
pub use router::screening_router;
pub use service::{preview, ScreeningService, ScreeningServiceError};
