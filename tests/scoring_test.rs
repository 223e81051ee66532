//! End-to-end scoring of snapshot fixtures through the public library API

use chrono::{DateTime, TimeZone, Utc};
use devscore::models::UserActivity;
use devscore::pipeline::rank;
use devscore::scoring::{score_activity, Rating, Scheme};
use std::path::PathBuf;

fn fixture(name: &str) -> UserActivity {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name);
    let content = std::fs::read_to_string(&path).expect("read fixture");
    serde_json::from_str(&content).expect("parse fixture")
}

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn test_advanced_scheme_reports_all_components() {
    let report = score_activity(&fixture("octocat.json"), Scheme::Advanced, now());

    let names: Vec<&str> = report.components.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(
        names,
        [
            "commit_frequency",
            "commit_size",
            "code_quality",
            "project_diversity",
            "issue_engagement",
            "pr_quality",
            "review_participation",
            "documentation",
        ]
    );
    let weight_total: f64 = report.components.iter().map(|c| c.weight).sum();
    assert!(approx(weight_total, 1.0));

    for c in &report.components {
        assert!((0.0..=1.0).contains(&c.score), "{} out of range: {}", c.name, c.score);
    }
    assert!(approx(report.component("review_participation").unwrap().score, 0.5));
}

#[test]
fn test_advanced_scheme_damps_low_activity() {
    let report = score_activity(&fixture("octocat.json"), Scheme::Advanced, now());
    let damping = report.damping.as_ref().expect("advanced scheme reports damping");

    // 5 commits + 2 pull requests + 1 issue
    assert_eq!(damping.activity_count, 8);
    assert!(approx(damping.activity_factor, 8.0 / 50.0));
    assert!(approx(report.final_score, damping.weighted_score * damping.activity_factor));
    assert!(report.final_score < damping.weighted_score);
}

#[test]
fn test_model_scheme_is_weighted_sum() {
    let report = score_activity(&fixture("octocat.json"), Scheme::Model, now());

    assert!(report.damping.is_none());
    assert_eq!(report.components.len(), 4);
    let sum: f64 = report.components.iter().map(|c| c.weight * c.score).sum();
    assert!(approx(report.final_score, sum));
    assert_eq!(report.rating, Rating::from_score(report.final_score));
}

#[test]
fn test_model_community_engagement_from_events() {
    let report = score_activity(&fixture("octocat.json"), Scheme::Model, now());
    let community = report.component("community_engagement").unwrap();

    // 1 comment of 50, 4 distinct repos of 10, 3 owned repos of 5
    assert!(approx(community.metrics["discussions"], 0.02));
    assert!(approx(community.metrics["project_diversity"], 0.4));
    assert!(approx(community.metrics["maintainer_roles"], 0.6));
    assert!(approx(community.score, 0.3 * 0.02 + 0.4 * 0.4 + 0.3 * 0.6));
}

#[test]
fn test_user_without_activity_scores_zero() {
    let activity = fixture("newcomer.json");

    let advanced = score_activity(&activity, Scheme::Advanced, now());
    let damping = advanced.damping.as_ref().unwrap();
    assert_eq!(damping.activity_count, 0);
    assert_eq!(damping.activity_factor, 0.0);
    assert_eq!(advanced.final_score, 0.0);
    assert_eq!(advanced.rating, Rating::Beginner);

    let model = score_activity(&activity, Scheme::Model, now());
    assert_eq!(model.final_score, 0.0);
    assert_eq!(model.rating, Rating::Beginner);
}

#[test]
fn test_stats_describe_profile() {
    let report = score_activity(&fixture("octocat.json"), Scheme::Model, now());
    let stats = &report.stats;

    assert_eq!(stats.total_repositories, 3);
    assert_eq!(stats.total_stars, 262);
    assert_eq!(stats.total_forks, 43);
    assert_eq!(stats.total_contributions, 9);
    assert_eq!(stats.push_events, 3);
    assert!((stats.languages["Rust"] - 200.0 / 3.0).abs() < 1e-6);
    assert_eq!(stats.activity_trend.len(), 7);
    assert_eq!(stats.activity_trend[0].date, "2024-06-01");
}

#[test]
fn test_json_report_shape_per_scheme() {
    let activity = fixture("octocat.json");

    let advanced =
        serde_json::to_value(score_activity(&activity, Scheme::Advanced, now())).unwrap();
    assert_eq!(advanced["username"], "octocat");
    assert_eq!(advanced["scheme"], "advanced");
    assert_eq!(advanced["activity_count"], 8);
    assert!(advanced["activity_factor"].is_number());
    assert!(advanced["rating"].is_string());

    let model = serde_json::to_value(score_activity(&activity, Scheme::Model, now())).unwrap();
    assert_eq!(model["scheme"], "model");
    assert!(model.get("activity_factor").is_none());
}

#[test]
fn test_rank_orders_by_final_score() {
    let mut reports = vec![
        score_activity(&fixture("newcomer.json"), Scheme::Model, now()),
        score_activity(&fixture("octocat.json"), Scheme::Model, now()),
    ];
    rank(&mut reports);
    assert_eq!(reports[0].username, "octocat");
    assert_eq!(reports[1].username, "newcomer");
}

#[test]
fn test_scores_decay_with_age() {
    let activity = fixture("octocat.json");
    let fresh = score_activity(&activity, Scheme::Advanced, now());
    let later = score_activity(
        &activity,
        Scheme::Advanced,
        Utc.with_ymd_and_hms(2026, 6, 1, 12, 0, 0).unwrap(),
    );

    let freq = |r: &devscore::scoring::ScoreReport| r.component("commit_frequency").unwrap().score;
    assert!(freq(&later) < freq(&fresh));
}
