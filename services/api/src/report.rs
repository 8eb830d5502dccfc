use chrono::Utc;
use clap::Args;
use hiresignal::error::AppError;
use hiresignal::workflows::screening::defaults::default_profile;
use hiresignal::workflows::screening::{
    compare, default_profiles, ComparisonResult, MetricFamily, MetricsRecord, ProfileDraft,
    ProfileId, ScreeningServiceError, StandardProfile,
};
use std::fmt::Write as _;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub(crate) struct CompareArgs {
    /// JSON file holding the candidate's metrics record
    #[arg(long)]
    pub(crate) metrics: PathBuf,
    /// Id of a built-in standard profile ("1", "2" or "3")
    #[arg(long, conflicts_with = "standard", required_unless_present = "standard")]
    pub(crate) profile_id: Option<String>,
    /// JSON file holding a standard profile draft
    #[arg(long)]
    pub(crate) standard: Option<PathBuf>,
    /// Print the raw comparison result as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn run_compare(args: CompareArgs) -> Result<(), AppError> {
    let CompareArgs {
        metrics,
        profile_id,
        standard,
        json,
    } = args;

    let metrics: MetricsRecord = read_json(&metrics)?;
    let standard = resolve_standard(profile_id, standard)?;
    let result = compare(&metrics, &standard);

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print!("{}", render_comparison(&metrics, &standard, &result));
    }
    Ok(())
}

pub(crate) fn run_profiles() -> Result<(), AppError> {
    print!("{}", render_profiles(&default_profiles(Utc::now())));
    Ok(())
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, AppError> {
    let file = File::open(path)?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}

fn resolve_standard(
    profile_id: Option<String>,
    standard: Option<PathBuf>,
) -> Result<StandardProfile, AppError> {
    let now = Utc::now();
    if let Some(path) = standard {
        let draft: ProfileDraft = read_json(&path)?;
        draft.validate().map_err(ScreeningServiceError::from)?;
        return Ok(draft.into_profile(ProfileId("file".to_string()), now));
    }

    let id = ProfileId(profile_id.unwrap_or_default());
    default_profile(&id, now)
        .ok_or_else(|| AppError::from(ScreeningServiceError::ProfileNotFound(id)))
}

pub(crate) fn render_comparison(
    metrics: &MetricsRecord,
    standard: &StandardProfile,
    result: &ComparisonResult,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Candidate: {}", metrics.username);
    let _ = writeln!(out, "Standard: {} ({})", standard.name, standard.id);
    let _ = writeln!(
        out,
        "Recommendation: {} (overall score {:.1})",
        result.recommendation, result.overall_score
    );

    if result.metrics_breakdown.is_empty() {
        let _ = writeln!(out, "\nNo metric targets configured");
    } else {
        let _ = writeln!(out, "\nMetric breakdown");
        for family in MetricFamily::ordered() {
            if let Some(breakdown) = result.breakdown(family) {
                let _ = writeln!(
                    out,
                    "- {}: {:.1} (weight {}) | {}",
                    family.key(),
                    breakdown.score,
                    breakdown.weight,
                    breakdown.description
                );
            }
        }
    }

    for (heading, notes) in [
        ("Strengths", &result.strengths),
        ("Weaknesses", &result.weaknesses),
    ] {
        if notes.is_empty() {
            let _ = writeln!(out, "\n{heading}: none");
        } else {
            let _ = writeln!(out, "\n{heading}");
            for note in notes {
                let _ = writeln!(out, "- {note}");
            }
        }
    }

    out
}

pub(crate) fn render_profiles(profiles: &[StandardProfile]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Standard profiles");
    for profile in profiles {
        let families: Vec<_> = profile
            .metrics
            .active_families()
            .map(MetricFamily::key)
            .collect();
        let _ = writeln!(
            out,
            "- [{}] {}: {}",
            profile.id, profile.name, profile.description
        );
        let _ = writeln!(out, "  scores {}", families.join(", "));
        if let Some(requirements) = &profile.metrics.language_requirements {
            let languages: Vec<_> = requirements
                .iter()
                .map(|requirement| format!("{} {}%", requirement.language, requirement.proficiency))
                .collect();
            let _ = writeln!(out, "  languages {}", languages.join(", "));
        }
    }
    out
}
