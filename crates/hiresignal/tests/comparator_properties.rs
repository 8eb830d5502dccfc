use std::collections::BTreeMap;

use chrono::{TimeZone, Utc};
use hiresignal::workflows::screening::{
    compare, default_profiles, ComparisonResult, MetricFamily, MetricsRecord, Recommendation,
    StandardProfile,
};

fn record(seed: u64) -> MetricsRecord {
    let updated_at = Utc
        .with_ymd_and_hms(2025, 6, 1, 12, 0, 0)
        .single()
        .expect("valid timestamp");
    let languages = ["JavaScript", "TypeScript", "Python", "Go", "Java", "CSS"];
    let mut language_breakdown = BTreeMap::new();
    for (offset, language) in languages.iter().enumerate() {
        let bytes = (seed * 7_919 + offset as u64 * 104_729) % 50_000;
        if bytes % 3 != 0 {
            language_breakdown.insert(language.to_string(), bytes);
        }
    }

    MetricsRecord {
        username: format!("candidate-{seed}"),
        commit_frequency: (seed % 23) as f64 * 0.75,
        repository_count: (seed * 13 % 60) as u32,
        stars_received: (seed * 31 % 400) as u32,
        language_breakdown,
        code_quality_estimate: (seed * 17 % 101) as f64,
        updated_at,
    }
}

fn rubrics() -> Vec<StandardProfile> {
    let created_at = Utc
        .with_ymd_and_hms(2025, 1, 1, 0, 0, 0)
        .single()
        .expect("valid timestamp");
    default_profiles(created_at)
}

fn assert_consistent(result: &ComparisonResult) {
    assert!(
        (0.0..=100.0).contains(&result.overall_score),
        "overall score {} out of range",
        result.overall_score
    );
    assert_eq!(
        result.recommendation,
        Recommendation::from_score(result.overall_score)
    );

    for (family, breakdown) in &result.metrics_breakdown {
        assert!((0.0..=100.0).contains(&breakdown.score));
        assert!(breakdown.weight > 0.0);

        let strong = result.strengths.contains(&family.strength().to_string());
        let weak = result.weaknesses.contains(&family.weakness().to_string());
        assert_eq!(strong, breakdown.score >= 80.0, "{family:?}");
        assert_eq!(weak, breakdown.score < 50.0, "{family:?}");
    }
    assert_eq!(
        result.strengths.len() + result.weaknesses.len(),
        result
            .metrics_breakdown
            .values()
            .filter(|breakdown| breakdown.score >= 80.0 || breakdown.score < 50.0)
            .count()
    );
}

#[test]
fn default_rubrics_produce_consistent_results() {
    for rubric in rubrics() {
        for seed in 0..200 {
            let result = compare(&record(seed), &rubric);
            assert_consistent(&result);
            assert_eq!(result.metrics_breakdown.len(), 5, "{}", rubric.name);
        }
    }
}

#[test]
fn overall_score_is_the_weighted_mean_of_reported_families() {
    for rubric in rubrics() {
        for seed in 0..50 {
            let result = compare(&record(seed), &rubric);
            let (weighted, total) = result
                .metrics_breakdown
                .values()
                .fold((0.0, 0.0), |(weighted, total), breakdown| {
                    (
                        weighted + breakdown.score * breakdown.weight,
                        total + breakdown.weight,
                    )
                });
            assert!((result.overall_score - weighted / total).abs() < 1e-9);
        }
    }
}

#[test]
fn breakdown_keys_follow_family_order() {
    let rubric = &rubrics()[1];
    let result = compare(&record(7), rubric);

    let keys: Vec<_> = result.metrics_breakdown.keys().copied().collect();
    assert_eq!(keys, MetricFamily::ordered().to_vec());

    let payload = serde_json::to_value(&result).expect("serializes");
    let object = payload["metrics_breakdown"]
        .as_object()
        .expect("breakdown object");
    for family in MetricFamily::ordered() {
        assert!(object.contains_key(family.key()), "{}", family.key());
    }
}

#[test]
fn stronger_candidates_never_score_lower() {
    let rubric = &rubrics()[2];
    let mut weaker = record(11);
    weaker.language_breakdown = BTreeMap::from([("Go".to_string(), 4_000), ("Java".to_string(), 2_000)]);
    let mut stronger = weaker.clone();
    stronger.commit_frequency += 5.0;
    stronger.repository_count += 10;
    stronger.stars_received += 100;
    stronger.code_quality_estimate += 20.0;

    let weaker = compare(&weaker, rubric);
    let stronger = compare(&stronger, rubric);

    assert!(stronger.overall_score >= weaker.overall_score);
}
