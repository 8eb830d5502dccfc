use super::super::domain::{LanguageRequirement, MetricFamily, MetricsRecord, StandardProfile};

const SCORE_CAP: f64 = 100.0;

/// Output of a single active metric family.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct FamilyScore {
    pub family: MetricFamily,
    pub score: f64,
    pub weight: f64,
    pub description: String,
}

/// Evaluates every active family in the fixed family order.
pub(crate) fn score_families(metrics: &MetricsRecord, standard: &StandardProfile) -> Vec<FamilyScore> {
    MetricFamily::ordered()
        .into_iter()
        .filter_map(|family| score_family(family, metrics, standard))
        .collect()
}

fn score_family(
    family: MetricFamily,
    metrics: &MetricsRecord,
    standard: &StandardProfile,
) -> Option<FamilyScore> {
    let targets = &standard.metrics;
    if !targets.is_active(family) {
        return None;
    }

    let (score, description) = match family {
        MetricFamily::CommitFrequency => {
            let optimal = targets.commit_frequency?.optimal;
            (
                ratio_score(metrics.commit_frequency, optimal),
                format!(
                    "{} commits per repo (optimal: {})",
                    to_fixed_1(metrics.commit_frequency),
                    optimal
                ),
            )
        }
        MetricFamily::RepositoryCount => {
            let min = targets.repository_count?.min;
            (
                ratio_score(f64::from(metrics.repository_count), min),
                format!("{} repositories (min: {})", metrics.repository_count, min),
            )
        }
        MetricFamily::StarsReceived => {
            let min = targets.stars_received?.min;
            (
                ratio_score(f64::from(metrics.stars_received), min),
                format!("{} stars received (min: {})", metrics.stars_received, min),
            )
        }
        MetricFamily::LanguageMatch => {
            language_match(metrics, targets.language_requirements.as_deref()?)
        }
        MetricFamily::CodeQualityEstimate => {
            let min = targets.code_quality_estimate?.min;
            (
                ratio_score(metrics.code_quality_estimate, min),
                format!(
                    "Quality score: {} (min: {})",
                    to_fixed_1(metrics.code_quality_estimate),
                    min
                ),
            )
        }
    };

    Some(FamilyScore {
        family,
        score,
        weight: standard.weights.weight_for(family),
        description,
    })
}

/// `actual / target * 100`, capped at 100 with no lower clamp.
fn ratio_score(actual: f64, target: f64) -> f64 {
    SCORE_CAP.min(actual / target * SCORE_CAP)
}

/// Each requirement's capped match is weighted by its own proficiency and the
/// contributions are summed without renormalisation. Reaching 100 requires
/// proficiencies that add up to 100.
fn language_match(
    metrics: &MetricsRecord,
    requirements: &[LanguageRequirement],
) -> (f64, String) {
    let total_bytes = metrics.total_language_bytes();
    let mut match_score = 0.0;
    let mut clauses = Vec::with_capacity(requirements.len());

    for requirement in requirements {
        let language_bytes = metrics
            .language_breakdown
            .get(&requirement.language)
            .copied()
            .unwrap_or(0);
        let percentage = if total_bytes > 0.0 {
            language_bytes as f64 / total_bytes * SCORE_CAP
        } else {
            0.0
        };
        let matched = ratio_score(percentage, requirement.proficiency);
        match_score += matched * (requirement.proficiency / SCORE_CAP);

        clauses.push(format!(
            "{}: {}% (required: {}%)",
            requirement.language,
            to_fixed_1(percentage),
            requirement.proficiency
        ));
    }

    (
        match_score,
        format!("Language match: {}", clauses.join(", ")),
    )
}

/// One-decimal rendering whose exact ties round away from zero, as
/// `Number.prototype.toFixed(1)` does. `{:.1}` alone rounds ties to even.
fn to_fixed_1(value: f64) -> String {
    // Only values ending in .25 or .75 sit exactly halfway between tenths.
    let is_tie =
        value.is_finite() && (value * 4.0).fract() == 0.0 && (value * 2.0).fract() != 0.0;
    if is_tie {
        let tenths = (value.abs() * 10.0).ceil().copysign(value);
        format!("{:.1}", tenths / 10.0)
    } else {
        format!("{value:.1}")
    }
}
