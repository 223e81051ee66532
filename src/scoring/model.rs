//! Model scheme: four broad components built from the event feed and repositories
//!
//! | component            | weight | built from                                  |
//! |----------------------|--------|---------------------------------------------|
//! | contribution         | 0.35   | push/issue events, pull requests            |
//! | repo_significance    | 0.30   | stars, forks, recent updates                |
//! | code_quality         | 0.20   | review events, repo descriptions, pushes    |
//! | community_engagement | 0.15   | comment events, repos touched, repos owned  |
//!
//! Every component is itself a weighted sum of sub-metrics; each sub-weight
//! table sums to 1.0.

use super::aggregate::{evaluate, AggregateScore, Component, ComponentScore, ScoringContext};
use super::components::review_participation_from_events;
use crate::decay::parse_timestamp;
use crate::models::{ActivityRecord, EventKind};
use chrono::{DateTime, Duration, Utc};
use std::collections::HashSet;

/// Window for "recent" activity, in days
pub const RECENT_WINDOW_DAYS: i64 = 180;

pub const CONTRIBUTION_WEIGHTS: &[(&str, f64)] = &[
    ("commit_frequency", 0.35),
    ("commit_recency", 0.25),
    ("issue_resolution", 0.20),
    ("pr_acceptance", 0.20),
];

pub const SIGNIFICANCE_WEIGHTS: &[(&str, f64)] = &[
    ("stars", 0.30),
    ("forks", 0.25),
    ("activity", 0.25),
    ("ecosystem_impact", 0.20),
];

pub const CODE_QUALITY_WEIGHTS: &[(&str, f64)] = &[
    ("code_review_participation", 0.30),
    ("documentation", 0.30),
    ("commit_quality", 0.40),
];

pub const COMMUNITY_WEIGHTS: &[(&str, f64)] = &[
    ("discussions", 0.30),
    ("project_diversity", 0.40),
    ("maintainer_roles", 0.30),
];

/// Recent push events needed for full commit frequency
const PUSH_EVENT_TARGET: f64 = 100.0;
/// Star/fork totals at which the log scales saturate
const STAR_SATURATION: f64 = 1000.0;
const FORK_SATURATION: f64 = 500.0;
/// Descriptions longer than this count as documentation
const DESCRIPTION_MIN_CHARS: usize = 50;
/// Fixed commit quality when any push exists (no content analysis on events)
const COMMIT_QUALITY_PLACEHOLDER: f64 = 0.7;
const DISCUSSION_TARGET: f64 = 50.0;
const DIVERSITY_TARGET: f64 = 10.0;
const MAINTAINER_TARGET: f64 = 5.0;

/// Top-level weights of the model scheme
pub const MODEL_COMPONENTS: &[Component] = &[
    Component {
        name: "contribution",
        weight: 0.35,
        score: contribution,
    },
    Component {
        name: "repo_significance",
        weight: 0.30,
        score: repo_significance,
    },
    Component {
        name: "code_quality",
        weight: 0.20,
        score: code_quality,
    },
    Component {
        name: "community_engagement",
        weight: 0.15,
        score: community_engagement,
    },
];

/// Instants after this count as recent
fn recent_window_start(now: DateTime<Utc>) -> DateTime<Utc> {
    now - Duration::days(RECENT_WINDOW_DAYS)
}

/// Pair each sub-metric value with its weight from a table
fn weighted(weights: &[(&str, f64)], values: &[f64]) -> ComponentScore {
    let parts: Vec<(&str, f64, f64)> = weights
        .iter()
        .zip(values)
        .map(|((name, weight), value)| (*name, *weight, *value))
        .collect();
    ComponentScore::weighted(&parts)
}

/// Contribution volume and outcomes over the last 180 days
pub fn contribution(ctx: &ScoringContext<'_>) -> ComponentScore {
    let activity = ctx.activity;

    let window_start = recent_window_start(ctx.now);
    let recent_push_days: Vec<f64> = activity
        .events_of(&EventKind::Push)
        .filter_map(|e| parse_timestamp(e.timestamp()))
        .filter(|at| *at > window_start)
        .map(|at| (ctx.now - at).num_days().max(0) as f64)
        .collect();

    let commit_frequency = (recent_push_days.len() as f64 / PUSH_EVENT_TARGET).min(1.0);
    let commit_recency = if recent_push_days.is_empty() {
        0.0
    } else {
        let mean_days = recent_push_days.iter().sum::<f64>() / recent_push_days.len() as f64;
        1.0 - (mean_days / RECENT_WINDOW_DAYS as f64).min(1.0)
    };

    let issue_events: Vec<_> = activity.events_of(&EventKind::Issues).collect();
    let closed_issues = issue_events
        .iter()
        .filter(|e| e.action.as_deref() == Some("closed"))
        .count();
    let issue_resolution = closed_issues as f64 / issue_events.len().max(1) as f64;

    let merged = activity.pull_requests.iter().filter(|pr| pr.merged).count();
    let pr_acceptance = merged as f64 / activity.pull_requests.len().max(1) as f64;

    weighted(
        CONTRIBUTION_WEIGHTS,
        &[commit_frequency, commit_recency, issue_resolution, pr_acceptance],
    )
}

/// Log-scaled popularity of the user's repositories.
///
/// `ecosystem_impact` is the mean of the star and fork scores; there is no
/// dependency analysis behind it.
pub fn repo_significance(ctx: &ScoringContext<'_>) -> ComponentScore {
    let repos = &ctx.activity.repositories;
    if repos.is_empty() {
        return weighted(SIGNIFICANCE_WEIGHTS, &[0.0, 0.0, 0.0, 0.0]);
    }

    let window_start = recent_window_start(ctx.now);
    let total_stars: f64 = repos.iter().map(|r| r.stars as f64).sum();
    let total_forks: f64 = repos.iter().map(|r| r.forks as f64).sum();

    let stars = (total_stars.ln_1p() / STAR_SATURATION.ln_1p()).min(1.0);
    let forks = (total_forks.ln_1p() / FORK_SATURATION.ln_1p()).min(1.0);

    let recently_updated = repos
        .iter()
        .filter_map(|r| parse_timestamp(&r.updated_at))
        .filter(|at| *at > window_start)
        .count();
    let activity = recently_updated as f64 / repos.len() as f64;

    let ecosystem_impact = (stars + forks) / 2.0;

    weighted(SIGNIFICANCE_WEIGHTS, &[stars, forks, activity, ecosystem_impact])
}

/// Review activity, repository documentation and commit activity
pub fn code_quality(ctx: &ScoringContext<'_>) -> ComponentScore {
    let activity = ctx.activity;

    let review_events = activity.events_of(&EventKind::PullRequestReview).count();
    let review = review_participation_from_events(review_events).score;

    let documented = activity
        .repositories
        .iter()
        .filter(|r| {
            r.description
                .as_deref()
                .is_some_and(|d| d.chars().count() > DESCRIPTION_MIN_CHARS)
        })
        .count();
    let documentation = documented as f64 / activity.repositories.len().max(1) as f64;

    let commit_quality = if activity.events_of(&EventKind::Push).next().is_some() {
        COMMIT_QUALITY_PLACEHOLDER
    } else {
        0.0
    };

    weighted(CODE_QUALITY_WEIGHTS, &[review, documentation, commit_quality])
}

/// Discussion, breadth of repositories touched and repositories owned
pub fn community_engagement(ctx: &ScoringContext<'_>) -> ComponentScore {
    let activity = ctx.activity;

    let comments = activity.events.iter().filter(|e| e.kind.is_discussion()).count();
    let discussions = (comments as f64 / DISCUSSION_TARGET).min(1.0);

    let touched: HashSet<&str> = activity
        .events
        .iter()
        .filter_map(|e| e.repository())
        .collect();
    let project_diversity = (touched.len() as f64 / DIVERSITY_TARGET).min(1.0);

    let login = activity.login();
    let owned = activity
        .repositories
        .iter()
        .filter(|r| r.owner.eq_ignore_ascii_case(login))
        .count();
    let maintainer_roles = (owned as f64 / MAINTAINER_TARGET).min(1.0);

    weighted(
        COMMUNITY_WEIGHTS,
        &[discussions, project_diversity, maintainer_roles],
    )
}

/// Run every model component; the weighted sum is the final score
pub fn score(ctx: &ScoringContext<'_>) -> AggregateScore {
    evaluate(MODEL_COMPONENTS, ctx)
}
