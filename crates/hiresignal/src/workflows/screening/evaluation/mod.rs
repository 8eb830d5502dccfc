mod policy;
mod rules;

pub use policy::{
    Recommendation, CONSIDER_THRESHOLD, HIRE_THRESHOLD, STRENGTH_THRESHOLD, WEAKNESS_THRESHOLD,
};

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::domain::{MetricFamily, MetricsRecord, StandardProfile};
use policy::{qualitative_note, QualitativeNote};

/// Scores a metrics record against a standard profile.
///
/// Only families with a target on `standard.metrics` take part; each one
/// contributes `score * weight` to the numerator and `weight` to the
/// denominator of the overall score. The function has no failure path.
pub fn compare(metrics: &MetricsRecord, standard: &StandardProfile) -> ComparisonResult {
    let families = rules::score_families(metrics, standard);

    let (total_weight, weighted_score) = families
        .iter()
        .fold((0.0_f64, 0.0_f64), |(total, weighted), family| {
            (total + family.weight, weighted + family.score * family.weight)
        });
    let overall_score = if total_weight > 0.0 {
        weighted_score / total_weight
    } else {
        0.0
    };

    let mut metrics_breakdown = BTreeMap::new();
    let mut strengths = Vec::new();
    let mut weaknesses = Vec::new();

    for family in families {
        match qualitative_note(family.family, family.score) {
            Some(QualitativeNote::Strength(note)) => strengths.push(note.to_string()),
            Some(QualitativeNote::Weakness(note)) => weaknesses.push(note.to_string()),
            None => {}
        }

        metrics_breakdown.insert(
            family.family,
            MetricBreakdown {
                score: family.score,
                weight: family.weight,
                description: family.description,
            },
        );
    }

    ComparisonResult {
        overall_score,
        recommendation: Recommendation::from_score(overall_score),
        metrics_breakdown,
        strengths,
        weaknesses,
    }
}

/// Per-family contribution kept for transparent review of a recommendation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricBreakdown {
    pub score: f64,
    pub weight: f64,
    pub description: String,
}

/// Comparator output; immutable once attached to a stored comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub overall_score: f64,
    pub recommendation: Recommendation,
    pub metrics_breakdown: BTreeMap<MetricFamily, MetricBreakdown>,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
}

impl ComparisonResult {
    pub fn breakdown(&self, family: MetricFamily) -> Option<&MetricBreakdown> {
        self.metrics_breakdown.get(&family)
    }

    pub fn summary(&self) -> String {
        format!(
            "{} (overall score {:.1})",
            self.recommendation, self.overall_score
        )
    }
}
