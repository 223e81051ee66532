//! Component scorers for the advanced scheme
//!
//! Each scorer is a pure function over one slice of activity. It returns a
//! score in [0, 1] and the sub-metrics it was built from. Empty input scores
//! 0, except commit frequency with a single commit (0.5).
//!
//! Per-record scores are multiplied by the record's decay factor before
//! averaging, so a burst of old activity counts less than the same burst
//! last month.

use super::aggregate::{clamp_unit, ComponentScore};
use crate::decay::{parse_timestamp, TimeDecay};
use crate::models::{ActivityRecord, Commit, ItemState, Issue, PullRequest};
use chrono::{DateTime, Utc};
use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Score for a single commit, where no cadence can be measured
const SINGLE_COMMIT_SCORE: f64 = 0.5;
/// Mean gap (days) rewarded by the frequency score: `3 / (gap + 1)`
const FREQUENCY_SCALE: f64 = 3.0;
const FREQUENCY_WEIGHT: f64 = 0.6;
const CONSISTENCY_WEIGHT: f64 = 0.4;

/// Repositories needed before diversity counts in full
const DIVERSITY_REPO_TARGET: f64 = 5.0;

/// Base score of a commit message, issue or pull request
const BASE_QUALITY: f64 = 0.5;
const CONVENTIONAL_BONUS: f64 = 0.2;
const ISSUE_REF_BONUS: f64 = 0.1;
const SHORT_MESSAGE_PENALTY: f64 = 0.3;
const SHORT_MESSAGE_CHARS: usize = 10;

/// Keyword bonuses in commit messages (case-insensitive substring match)
pub const QUALITY_KEYWORDS: &[(&str, f64)] = &[
    ("test", 0.2),
    ("fix", 0.1),
    ("refactor", 0.15),
    ("doc", 0.1),
    ("feat", 0.15),
    ("perf", 0.15),
    ("style", 0.05),
    ("chore", 0.05),
    ("ci", 0.05),
];

const ISSUE_VERBOSITY_CAP: f64 = 0.3;
const ISSUE_VERBOSITY_CHARS: f64 = 1000.0;
const ISSUE_STRUCTURE_BONUS: f64 = 0.1;

const PR_MERGED_BONUS: f64 = 0.3;
const PR_REJECTED_PENALTY: f64 = 0.2;
const PR_BODY_CAP: f64 = 0.2;
const PR_BODY_CHARS: f64 = 800.0;

/// Constant review score until review data is collected for this scheme
pub const REVIEW_PLACEHOLDER: f64 = 0.5;
/// Review events needed for a full review score
const REVIEW_EVENT_TARGET: f64 = 50.0;

const DOC_KEYWORDS: &[&str] = &["doc", "readme", "comment", "wiki", "explain", "tutorial"];
const DOC_SCORE: f64 = 0.2;

fn conventional_commit_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\w+)(\(.+\))?: .+").expect("valid regex"))
}

fn issue_ref_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"#\d+").expect("valid regex"))
}

fn markdown_header_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"#+\s+\w+").expect("valid regex"))
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Population standard deviation
fn std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Mean of per-record content scores, each multiplied by the record's decay factor
fn decayed_mean<R, F>(records: &[R], decay: &TimeDecay, now: DateTime<Utc>, score: F) -> f64
where
    R: ActivityRecord,
    F: Fn(&str) -> f64,
{
    let scores: Vec<f64> = records
        .iter()
        .map(|r| score(r.content().unwrap_or_default()) * decay.factor(r.timestamp(), now))
        .collect();
    mean(&scores)
}

/// Cadence of commits: short, regular gaps between commits score high.
///
/// Commits with unparseable timestamps are ignored. The result is scaled by
/// the decay factor of the most recent commit.
pub fn commit_frequency(
    commits: &[Commit],
    decay: &TimeDecay,
    now: DateTime<Utc>,
) -> ComponentScore {
    let mut dates: Vec<DateTime<Utc>> = commits
        .iter()
        .filter_map(|c| parse_timestamp(&c.timestamp))
        .collect();

    match dates.len() {
        0 => return ComponentScore::new(0.0).with_metric("commits", 0.0),
        1 => {
            return ComponentScore::new(SINGLE_COMMIT_SCORE).with_metric("commits", 1.0);
        }
        _ => {}
    }

    dates.sort();
    let gaps: Vec<f64> = dates
        .windows(2)
        .map(|pair| (pair[1] - pair[0]).num_days() as f64)
        .collect();

    let mean_gap = mean(&gaps);
    let gap_std = std_dev(&gaps);
    let frequency = (FREQUENCY_SCALE / (mean_gap + 1.0)).min(1.0);
    let consistency = (1.0 - (gap_std / (mean_gap + 1.0)).min(1.0)).max(0.0);

    // dates is sorted and non-empty here
    let latest = dates[dates.len() - 1];
    let recency = decay.factor_at(latest, now);

    let score = (FREQUENCY_WEIGHT * frequency + CONSISTENCY_WEIGHT * consistency) * recency;

    ComponentScore::new(clamp_unit(score))
        .with_metric("commits", dates.len() as f64)
        .with_metric("mean_gap_days", mean_gap)
        .with_metric("gap_stddev_days", gap_std)
        .with_metric("frequency", frequency)
        .with_metric("consistency", consistency)
        .with_metric("recency", recency)
}

/// Size bucket for a commit message length (in characters)
pub fn message_size_score(chars: usize) -> f64 {
    match chars {
        0..=4 => 0.2,
        5..=9 => 0.5,
        10..=49 => 1.0,
        50..=99 => 0.9,
        100..=499 => 0.7,
        _ => 0.4,
    }
}

/// Commit size, approximated by message length
pub fn commit_size(
    commits: &[Commit],
    decay: &TimeDecay,
    now: DateTime<Utc>,
) -> ComponentScore {
    let score = decayed_mean(commits, decay, now, |message| {
        message_size_score(message.chars().count())
    });
    ComponentScore::new(score).with_metric("commits", commits.len() as f64)
}

/// Quality of a single commit message before decay
pub fn message_quality(message: &str) -> f64 {
    let lower = message.to_lowercase();
    let mut score = BASE_QUALITY;

    if conventional_commit_re().is_match(&lower) {
        score += CONVENTIONAL_BONUS;
    }

    score += QUALITY_KEYWORDS
        .iter()
        .filter(|(keyword, _)| lower.contains(keyword))
        .map(|(_, bonus)| bonus)
        .sum::<f64>();

    if issue_ref_re().is_match(&lower) {
        score += ISSUE_REF_BONUS;
    }

    if message.chars().count() < SHORT_MESSAGE_CHARS {
        score -= SHORT_MESSAGE_PENALTY;
    }

    score
}

/// Commit message conventions, keywords and issue references
pub fn code_quality(
    commits: &[Commit],
    decay: &TimeDecay,
    now: DateTime<Utc>,
) -> ComponentScore {
    let conventional = commits
        .iter()
        .filter(|c| conventional_commit_re().is_match(&c.message.to_lowercase()))
        .count();

    // per-commit scores are capped after decay
    let scores: Vec<f64> = commits
        .iter()
        .map(|c| (message_quality(&c.message) * decay.factor(&c.timestamp, now)).min(1.0))
        .collect();

    ComponentScore::new(mean(&scores))
        .with_metric("commits", commits.len() as f64)
        .with_metric("conventional_commits", conventional as f64)
}

/// Gini-Simpson diversity of commits across repositories, scaled by how many
/// repositories are involved (full credit from five)
pub fn project_diversity(commits: &[Commit]) -> ComponentScore {
    if commits.is_empty() {
        return ComponentScore::new(0.0).with_metric("repositories", 0.0);
    }

    let mut per_repo: HashMap<&str, usize> = HashMap::new();
    for repo in commits.iter().filter_map(|c| c.repository()) {
        *per_repo.entry(repo).or_default() += 1;
    }

    let total = per_repo.values().sum::<usize>() as f64;
    let concentration: f64 = per_repo
        .values()
        .map(|&n| {
            let p = n as f64 / total;
            p * p
        })
        .sum();
    let diversity = 1.0 - concentration;
    let repo_factor = (per_repo.len() as f64 / DIVERSITY_REPO_TARGET).min(1.0);

    ComponentScore::new(diversity * repo_factor)
        .with_metric("repositories", per_repo.len() as f64)
        .with_metric("diversity_index", diversity)
        .with_metric("repo_factor", repo_factor)
}

/// Quality of a single issue body before decay
pub fn issue_quality(issue: &Issue) -> f64 {
    let mut score = BASE_QUALITY;

    if let Some(body) = issue.content().filter(|b| !b.is_empty()) {
        score += (body.chars().count() as f64 / ISSUE_VERBOSITY_CHARS).min(ISSUE_VERBOSITY_CAP);

        let has_code = body.contains("```");
        let has_list = body.contains("- ") || body.contains("* ");
        let has_header = markdown_header_re().is_match(body);
        let structure = [has_code, has_list, has_header]
            .iter()
            .filter(|present| **present)
            .count();
        score += structure as f64 * ISSUE_STRUCTURE_BONUS;
    }

    score
}

/// Multiplier for an item's creation time; items without one are not decayed
fn creation_decay(record: &impl ActivityRecord, decay: &TimeDecay, now: DateTime<Utc>) -> f64 {
    match record.timestamp() {
        "" => 1.0,
        created_at => decay.factor(created_at, now),
    }
}

/// Effort that went into the user's issues
pub fn issue_engagement(
    issues: &[Issue],
    decay: &TimeDecay,
    now: DateTime<Utc>,
) -> ComponentScore {
    let scores: Vec<f64> = issues
        .iter()
        .map(|i| (issue_quality(i) * creation_decay(i, decay, now)).min(1.0))
        .collect();
    let closed = issues.iter().filter(|i| i.state == ItemState::Closed).count();

    ComponentScore::new(mean(&scores))
        .with_metric("issues", issues.len() as f64)
        .with_metric("closed", closed as f64)
}

/// Quality of a single pull request before decay
pub fn pull_request_score(pr: &PullRequest) -> f64 {
    let mut score = BASE_QUALITY;

    if pr.merged {
        score += PR_MERGED_BONUS;
    } else if pr.is_rejected() {
        score -= PR_REJECTED_PENALTY;
    }

    if let Some(body) = pr.content().filter(|b| !b.is_empty()) {
        score += (body.chars().count() as f64 / PR_BODY_CHARS).min(PR_BODY_CAP);
    }

    score
}

/// Outcome and description quality of the user's pull requests
pub fn pull_request_quality(
    pull_requests: &[PullRequest],
    decay: &TimeDecay,
    now: DateTime<Utc>,
) -> ComponentScore {
    let scores: Vec<f64> = pull_requests
        .iter()
        .map(|pr| (pull_request_score(pr) * creation_decay(pr, decay, now)).min(1.0))
        .collect();
    let merged = pull_requests.iter().filter(|pr| pr.merged).count();

    ComponentScore::new(mean(&scores))
        .with_metric("pull_requests", pull_requests.len() as f64)
        .with_metric("merged", merged as f64)
}

/// Code review participation for the advanced scheme.
///
/// Review activity is not collected for this scheme, so this is a fixed,
/// neutral value rather than a measurement.
pub fn review_participation() -> ComponentScore {
    ComponentScore::new(REVIEW_PLACEHOLDER)
}

/// Code review participation from a count of review events
pub fn review_participation_from_events(review_events: usize) -> ComponentScore {
    ComponentScore::new((review_events as f64 / REVIEW_EVENT_TARGET).min(1.0))
        .with_metric("review_events", review_events as f64)
}

/// Documentation signal of a single commit message before decay
pub fn documentation_signal(message: &str) -> f64 {
    let lower = message.to_lowercase();
    if DOC_KEYWORDS.iter().any(|k| lower.contains(k)) {
        DOC_SCORE
    } else {
        0.0
    }
}

/// Share of commits touching documentation
pub fn documentation(
    commits: &[Commit],
    decay: &TimeDecay,
    now: DateTime<Utc>,
) -> ComponentScore {
    let score = decayed_mean(commits, decay, now, documentation_signal);
    let doc_commits = commits
        .iter()
        .filter(|c| documentation_signal(&c.message) > 0.0)
        .count();

    ComponentScore::new(score).with_metric("documentation_commits", doc_commits as f64)
}
