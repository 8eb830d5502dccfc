use chrono::{DateTime, Utc};

use super::domain::{
    LanguageRequirement, MetricTargets, MetricWeights, MinimumTarget, OptimalTarget,
    ProfileDraft, ProfileId, StandardProfile,
};

/// Ids of the rubrics that always exist and cannot be deleted.
pub const DEFAULT_PROFILE_IDS: [&str; 3] = ["1", "2", "3"];

pub fn is_default_profile(id: &ProfileId) -> bool {
    DEFAULT_PROFILE_IDS.contains(&id.0.as_str())
}

pub fn default_profiles(created_at: DateTime<Utc>) -> Vec<StandardProfile> {
    DEFAULT_PROFILE_IDS
        .iter()
        .filter_map(|id| default_profile(&ProfileId((*id).to_string()), created_at))
        .collect()
}

pub fn default_profile(id: &ProfileId, created_at: DateTime<Utc>) -> Option<StandardProfile> {
    let draft = match id.0.as_str() {
        "1" => junior_frontend(),
        "2" => mid_full_stack(),
        "3" => senior_backend(),
        _ => return None,
    };
    Some(draft.into_profile(id.clone(), created_at))
}

fn junior_frontend() -> ProfileDraft {
    ProfileDraft {
        name: "Junior Frontend Developer".to_string(),
        description: "Entry-level frontend developer with basic JavaScript and React knowledge"
            .to_string(),
        metrics: MetricTargets {
            commit_frequency: Some(OptimalTarget { optimal: 5.0 }),
            repository_count: Some(MinimumTarget { min: 5.0 }),
            stars_received: Some(MinimumTarget { min: 5.0 }),
            language_requirements: Some(vec![
                requirement("JavaScript", 50.0),
                requirement("CSS", 10.0),
            ]),
            code_quality_estimate: Some(MinimumTarget { min: 60.0 }),
        },
        weights: MetricWeights {
            language_match: Some(2.0),
            stars_received: Some(0.5),
            ..MetricWeights::default()
        },
    }
}

fn mid_full_stack() -> ProfileDraft {
    ProfileDraft {
        name: "Mid-level Full Stack Developer".to_string(),
        description: "Experienced developer with frontend and backend skills".to_string(),
        metrics: MetricTargets {
            commit_frequency: Some(OptimalTarget { optimal: 10.0 }),
            repository_count: Some(MinimumTarget { min: 15.0 }),
            stars_received: Some(MinimumTarget { min: 25.0 }),
            language_requirements: Some(vec![
                requirement("JavaScript", 30.0),
                requirement("TypeScript", 20.0),
                requirement("Python", 20.0),
            ]),
            code_quality_estimate: Some(MinimumTarget { min: 70.0 }),
        },
        weights: MetricWeights {
            commit_frequency: Some(1.5),
            language_match: Some(2.0),
            code_quality_estimate: Some(1.5),
            ..MetricWeights::default()
        },
    }
}

fn senior_backend() -> ProfileDraft {
    ProfileDraft {
        name: "Senior Backend Developer".to_string(),
        description: "Expert backend developer with system design and architecture experience"
            .to_string(),
        metrics: MetricTargets {
            commit_frequency: Some(OptimalTarget { optimal: 20.0 }),
            repository_count: Some(MinimumTarget { min: 25.0 }),
            stars_received: Some(MinimumTarget { min: 100.0 }),
            language_requirements: Some(vec![
                requirement("Go", 40.0),
                requirement("Java", 20.0),
            ]),
            code_quality_estimate: Some(MinimumTarget { min: 80.0 }),
        },
        weights: MetricWeights {
            commit_frequency: Some(1.5),
            code_quality_estimate: Some(2.0),
            ..MetricWeights::default()
        },
    }
}

fn requirement(language: &str, proficiency: f64) -> LanguageRequirement {
    LanguageRequirement {
        language: language.to_string(),
        proficiency,
    }
}
