use std::fmt;

use serde::{Deserialize, Serialize};

use super::super::domain::MetricFamily;

pub const HIRE_THRESHOLD: f64 = 75.0;
pub const CONSIDER_THRESHOLD: f64 = 50.0;
pub const STRENGTH_THRESHOLD: f64 = 80.0;
pub const WEAKNESS_THRESHOLD: f64 = 50.0;

/// Categorical outcome derived from the overall score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Recommendation {
    Hire,
    Consider,
    #[serde(rename = "No Hire")]
    NoHire,
}

impl Recommendation {
    /// Lower bounds are inclusive.
    pub fn from_score(overall_score: f64) -> Self {
        if overall_score >= HIRE_THRESHOLD {
            Self::Hire
        } else if overall_score >= CONSIDER_THRESHOLD {
            Self::Consider
        } else {
            Self::NoHire
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Hire => "Hire",
            Self::Consider => "Consider",
            Self::NoHire => "No Hire",
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Qualitative remark attached to a family score outside the neutral band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum QualitativeNote {
    Strength(&'static str),
    Weakness(&'static str),
}

pub(crate) fn qualitative_note(family: MetricFamily, score: f64) -> Option<QualitativeNote> {
    if score >= STRENGTH_THRESHOLD {
        Some(QualitativeNote::Strength(family.strength()))
    } else if score < WEAKNESS_THRESHOLD {
        Some(QualitativeNote::Weakness(family.weakness()))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recommendation_bounds_are_inclusive() {
        assert_eq!(Recommendation::from_score(75.0), Recommendation::Hire);
        assert_eq!(Recommendation::from_score(74.999), Recommendation::Consider);
        assert_eq!(Recommendation::from_score(50.0), Recommendation::Consider);
        assert_eq!(Recommendation::from_score(49.999), Recommendation::NoHire);
        assert_eq!(Recommendation::from_score(0.0), Recommendation::NoHire);
    }

    #[test]
    fn recommendation_serializes_with_display_labels() {
        let encoded = serde_json::to_string(&Recommendation::NoHire).expect("serializes");
        assert_eq!(encoded, "\"No Hire\"");
        let decoded: Recommendation = serde_json::from_str("\"Consider\"").expect("deserializes");
        assert_eq!(decoded, Recommendation::Consider);
    }

    #[test]
    fn neutral_band_produces_no_note() {
        assert_eq!(
            qualitative_note(MetricFamily::StarsReceived, 80.0),
            Some(QualitativeNote::Strength(
                "Projects have good community recognition"
            ))
        );
        assert_eq!(qualitative_note(MetricFamily::StarsReceived, 79.9), None);
        assert_eq!(qualitative_note(MetricFamily::StarsReceived, 50.0), None);
        assert_eq!(
            qualitative_note(MetricFamily::StarsReceived, 49.9),
            Some(QualitativeNote::Weakness("Limited project popularity"))
        );
    }
}
