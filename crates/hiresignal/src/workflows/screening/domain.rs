use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for standard profiles.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProfileId(pub String);

impl fmt::Display for ProfileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier wrapper for stored comparisons.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComparisonId(pub String);

impl fmt::Display for ComparisonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The five independently activatable scoring dimensions, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricFamily {
    CommitFrequency,
    RepositoryCount,
    StarsReceived,
    LanguageMatch,
    CodeQualityEstimate,
}

impl MetricFamily {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::CommitFrequency,
            Self::RepositoryCount,
            Self::StarsReceived,
            Self::LanguageMatch,
            Self::CodeQualityEstimate,
        ]
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::CommitFrequency => "commit_frequency",
            Self::RepositoryCount => "repository_count",
            Self::StarsReceived => "stars_received",
            Self::LanguageMatch => "language_match",
            Self::CodeQualityEstimate => "code_quality_estimate",
        }
    }

    pub const fn strength(self) -> &'static str {
        match self {
            Self::CommitFrequency => "Consistent commit activity",
            Self::RepositoryCount => "Good portfolio of projects",
            Self::StarsReceived => "Projects have good community recognition",
            Self::LanguageMatch => "Strong match with required programming languages",
            Self::CodeQualityEstimate => "High quality codebase",
        }
    }

    pub const fn weakness(self) -> &'static str {
        match self {
            Self::CommitFrequency => "Low commit frequency",
            Self::RepositoryCount => "Limited number of public repositories",
            Self::StarsReceived => "Limited project popularity",
            Self::LanguageMatch => "Limited experience with required programming languages",
            Self::CodeQualityEstimate => "Improvements needed in code quality",
        }
    }
}

/// Normalized signals derived from a candidate's public GitHub activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsRecord {
    pub username: String,
    pub commit_frequency: f64,
    pub repository_count: u32,
    pub stars_received: u32,
    #[serde(default)]
    pub language_breakdown: BTreeMap<String, u64>,
    pub code_quality_estimate: f64,
    pub updated_at: DateTime<Utc>,
}

impl MetricsRecord {
    pub fn is_fresh(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now.signed_duration_since(self.updated_at) < ttl
    }

    /// Summed as `f64` so very large byte counts cannot overflow.
    pub fn total_language_bytes(&self) -> f64 {
        self.language_breakdown
            .values()
            .map(|bytes| *bytes as f64)
            .sum()
    }
}

/// Public account details surfaced next to the computed metrics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GithubProfile {
    pub username: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub html_url: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub public_repos: u32,
    #[serde(default)]
    pub followers: u32,
    #[serde(default)]
    pub following: u32,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OptimalTarget {
    pub optimal: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MinimumTarget {
    pub min: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageRequirement {
    pub language: String,
    /// Required share of the candidate's code volume, in percent.
    pub proficiency: f64,
}

/// Sparse rubric targets; a family participates in scoring only when its target is present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricTargets {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit_frequency: Option<OptimalTarget>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository_count: Option<MinimumTarget>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stars_received: Option<MinimumTarget>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language_requirements: Option<Vec<LanguageRequirement>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_quality_estimate: Option<MinimumTarget>,
}

impl MetricTargets {
    pub fn is_active(&self, family: MetricFamily) -> bool {
        match family {
            MetricFamily::CommitFrequency => self.commit_frequency.is_some(),
            MetricFamily::RepositoryCount => self.repository_count.is_some(),
            MetricFamily::StarsReceived => self.stars_received.is_some(),
            MetricFamily::LanguageMatch => self
                .language_requirements
                .as_ref()
                .is_some_and(|requirements| !requirements.is_empty()),
            MetricFamily::CodeQualityEstimate => self.code_quality_estimate.is_some(),
        }
    }

    pub fn active_families(&self) -> impl Iterator<Item = MetricFamily> + '_ {
        MetricFamily::ordered()
            .into_iter()
            .filter(|family| self.is_active(*family))
    }
}

/// Per-family weights; families without an explicit weight count once.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricWeights {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit_frequency: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository_count: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stars_received: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language_match: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_quality_estimate: Option<f64>,
}

impl MetricWeights {
    pub const DEFAULT_WEIGHT: f64 = 1.0;

    pub fn get(&self, family: MetricFamily) -> Option<f64> {
        match family {
            MetricFamily::CommitFrequency => self.commit_frequency,
            MetricFamily::RepositoryCount => self.repository_count,
            MetricFamily::StarsReceived => self.stars_received,
            MetricFamily::LanguageMatch => self.language_match,
            MetricFamily::CodeQualityEstimate => self.code_quality_estimate,
        }
    }

    /// A zero or NaN weight is treated as unset.
    pub fn weight_for(&self, family: MetricFamily) -> f64 {
        match self.get(family) {
            Some(weight) if weight != 0.0 && !weight.is_nan() => weight,
            _ => Self::DEFAULT_WEIGHT,
        }
    }
}

/// Named scoring rubric for a role or seniority level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardProfile {
    pub id: ProfileId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub metrics: MetricTargets,
    #[serde(default)]
    pub weights: MetricWeights,
    pub created_at: DateTime<Utc>,
}

/// Create/update payload for a standard profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileDraft {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub metrics: MetricTargets,
    #[serde(default)]
    pub weights: MetricWeights,
}

impl ProfileDraft {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingField("name"));
        }

        let targets = [
            (
                MetricFamily::CommitFrequency,
                self.metrics.commit_frequency.map(|target| target.optimal),
            ),
            (
                MetricFamily::RepositoryCount,
                self.metrics.repository_count.map(|target| target.min),
            ),
            (
                MetricFamily::StarsReceived,
                self.metrics.stars_received.map(|target| target.min),
            ),
            (
                MetricFamily::CodeQualityEstimate,
                self.metrics.code_quality_estimate.map(|target| target.min),
            ),
        ];
        for (family, value) in targets {
            if let Some(value) = value {
                if !(value.is_finite() && value > 0.0) {
                    return Err(ValidationError::InvalidTarget {
                        metric: family.key(),
                        value,
                    });
                }
            }
        }

        for requirement in self.metrics.language_requirements.iter().flatten() {
            if requirement.language.trim().is_empty() {
                return Err(ValidationError::MissingField("language_requirements.language"));
            }
            let proficiency = requirement.proficiency;
            if !(proficiency.is_finite() && proficiency > 0.0 && proficiency <= 100.0) {
                return Err(ValidationError::InvalidProficiency {
                    language: requirement.language.clone(),
                    value: proficiency,
                });
            }
        }

        for family in MetricFamily::ordered() {
            if let Some(weight) = self.weights.get(family) {
                if !(weight.is_finite() && weight > 0.0) {
                    return Err(ValidationError::InvalidWeight {
                        metric: family.key(),
                        value: weight,
                    });
                }
            }
        }

        Ok(())
    }

    pub fn into_profile(self, id: ProfileId, created_at: DateTime<Utc>) -> StandardProfile {
        StandardProfile {
            id,
            name: self.name.trim().to_string(),
            description: self.description,
            metrics: self.metrics,
            weights: self.weights,
            created_at,
        }
    }
}

impl From<StandardProfile> for ProfileDraft {
    fn from(profile: StandardProfile) -> Self {
        Self {
            name: profile.name,
            description: profile.description,
            metrics: profile.metrics,
            weights: profile.weights,
        }
    }
}

/// Request body for a new comparison. Fields are optional so that missing
/// values surface as validation errors rather than deserialization failures.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonRequest {
    #[serde(default)]
    pub candidate_username: Option<String>,
    #[serde(default)]
    pub standard_profile_id: Option<String>,
}

impl ComparisonRequest {
    pub fn new(candidate_username: impl Into<String>, standard_profile_id: impl Into<String>) -> Self {
        Self {
            candidate_username: Some(candidate_username.into()),
            standard_profile_id: Some(standard_profile_id.into()),
        }
    }

    /// Returns the trimmed username and profile id.
    pub fn validate(&self) -> Result<(String, ProfileId), ValidationError> {
        let username = required(&self.candidate_username, "candidate_username")?;
        let profile_id = required(&self.standard_profile_id, "standard_profile_id")?;
        Ok((username, ProfileId(profile_id)))
    }
}

fn required(value: &Option<String>, field: &'static str) -> Result<String, ValidationError> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .ok_or(ValidationError::MissingField(field))
}

/// Input rejected before any lookup or scoring happens.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("missing required field `{0}`")]
    MissingField(&'static str),
    #[error("target for {metric} must be a positive number (found {value})")]
    InvalidTarget { metric: &'static str, value: f64 },
    #[error("proficiency for {language} must be within (0, 100] (found {value})")]
    InvalidProficiency { language: String, value: f64 },
    #[error("weight for {metric} must be a positive number (found {value})")]
    InvalidWeight { metric: &'static str, value: f64 },
}
