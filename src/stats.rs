//! Descriptive statistics shown next to a score
//!
//! None of these feed into the score itself. They give the reader context:
//! how many repositories and stars the user has, which languages they write,
//! and what the last week of the event feed looks like.

use crate::decay::parse_timestamp;
use crate::models::{ActivityRecord, EventKind, UserActivity};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// Days covered by the activity trend
pub const TREND_DAYS: i64 = 7;

/// Event counts for one UTC date
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityPoint {
    /// `YYYY-MM-DD`
    pub date: String,
    pub commits: usize,
    pub pull_requests: usize,
    pub issues: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UserStats {
    pub total_repositories: usize,
    pub total_stars: u64,
    pub total_forks: u64,
    /// Number of events in the fetched activity feed
    pub total_contributions: usize,
    /// Push events in the fetched feed
    pub push_events: usize,
    /// Pull request events in the fetched feed
    pub pull_request_events: usize,
    /// Issue events in the fetched feed
    pub issue_events: usize,
    /// Percentage of repositories (with a known language) per language
    pub languages: BTreeMap<String, f64>,
    /// Last seven days, today first
    pub activity_trend: Vec<ActivityPoint>,
}

impl UserStats {
    pub fn from_activity(activity: &UserActivity, now: DateTime<Utc>) -> Self {
        let repos = &activity.repositories;

        let mut language_counts: BTreeMap<String, usize> = BTreeMap::new();
        for lang in repos.iter().filter_map(|r| r.language.as_deref()) {
            *language_counts.entry(lang.to_string()).or_default() += 1;
        }
        let with_language: usize = language_counts.values().sum();
        let languages = language_counts
            .into_iter()
            .map(|(lang, n)| (lang, n as f64 / with_language as f64 * 100.0))
            .collect();

        Self {
            total_repositories: repos.len(),
            total_stars: repos.iter().map(|r| r.stars as u64).sum(),
            total_forks: repos.iter().map(|r| r.forks as u64).sum(),
            total_contributions: activity.events.len(),
            push_events: activity.events_of(&EventKind::Push).count(),
            pull_request_events: activity.events_of(&EventKind::PullRequest).count(),
            issue_events: activity.events_of(&EventKind::Issues).count(),
            languages,
            activity_trend: activity_trend(activity, now),
        }
    }
}

fn activity_trend(activity: &UserActivity, now: DateTime<Utc>) -> Vec<ActivityPoint> {
    let dated: Vec<(NaiveDate, &EventKind)> = activity
        .events
        .iter()
        .filter_map(|e| parse_timestamp(e.timestamp()).map(|at| (at.date_naive(), &e.kind)))
        .collect();

    (0..TREND_DAYS)
        .map(|offset| {
            let day = (now - Duration::days(offset)).date_naive();
            let count = |kind: &EventKind| {
                dated
                    .iter()
                    .filter(|(date, k)| *date == day && *k == kind)
                    .count()
            };
            ActivityPoint {
                date: day.format("%Y-%m-%d").to_string(),
                commits: count(&EventKind::Push),
                pull_requests: count(&EventKind::PullRequest),
                issues: count(&EventKind::Issues),
            }
        })
        .collect()
}
