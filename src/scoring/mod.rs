//! Developer scoring
//!
//! Two independent schemes turn a [`UserActivity`] into a score in [0, 1]:
//!
//! - **model** (default): contribution, repository significance, code quality
//!   and community engagement, computed mostly from the public event feed.
//!   See [`model`].
//! - **advanced**: eight commit, issue and pull request heuristics with time
//!   decay, damped by activity volume. See [`advanced`].
//!
//! Both schemes share one weighted-aggregation core ([`aggregate`]): a scheme
//! is a static table of `{name, weight, score fn}` entries whose weights sum
//! to 1.0. The final score of either scheme maps to a [`Rating`] label.
//!
//! # Example
//!
//! A user with 60 recent commits and good messages but no issues or pull
//! requests still gets the full activity factor under the advanced scheme
//! (60 ≥ 50), while a user with 10 perfect commits is capped at 20% of their
//! weighted score.

pub mod advanced;
pub mod aggregate;
pub mod components;
pub mod model;
mod rating;

pub use advanced::ActivityDamping;
pub use aggregate::{AggregateScore, ComponentScore, ScoringContext, WeightedComponent};
pub use rating::Rating;

use crate::models::UserActivity;
use crate::stats::UserStats;
use anyhow::anyhow;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::info;

/// Scoring scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    #[default]
    Model,
    Advanced,
}

impl FromStr for Scheme {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "model" => Ok(Scheme::Model),
            "advanced" => Ok(Scheme::Advanced),
            _ => Err(anyhow!(
                "Unknown scheme '{}'. Valid schemes: model, advanced",
                s
            )),
        }
    }
}

impl std::fmt::Display for Scheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scheme::Model => write!(f, "model"),
            Scheme::Advanced => write!(f, "advanced"),
        }
    }
}

/// Data classes a scheme reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DataNeeds {
    pub repositories: bool,
    pub commits: bool,
    pub pull_requests: bool,
    pub issues: bool,
    pub events: bool,
}

impl DataNeeds {
    /// Everything (used for snapshots)
    pub fn all() -> Self {
        Self {
            repositories: true,
            commits: true,
            pull_requests: true,
            issues: true,
            events: true,
        }
    }
}

impl Scheme {
    pub fn needs(&self) -> DataNeeds {
        match self {
            Scheme::Model => DataNeeds {
                repositories: true,
                pull_requests: true,
                events: true,
                ..Default::default()
            },
            Scheme::Advanced => DataNeeds {
                repositories: true,
                commits: true,
                pull_requests: true,
                issues: true,
                events: false,
            },
        }
    }
}

/// Full result of scoring one user
#[derive(Debug, Clone, Serialize)]
pub struct ScoreReport {
    pub username: String,
    pub scheme: Scheme,
    pub final_score: f64,
    pub rating: Rating,
    pub components: Vec<WeightedComponent>,
    /// Present for the advanced scheme only
    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    pub damping: Option<ActivityDamping>,
    pub stats: UserStats,
}

impl ScoreReport {
    pub fn component(&self, name: &str) -> Option<&WeightedComponent> {
        self.components.iter().find(|c| c.name == name)
    }
}

/// Score already-collected activity with one scheme
pub fn score_activity(activity: &UserActivity, scheme: Scheme, now: DateTime<Utc>) -> ScoreReport {
    let ctx = ScoringContext::new(activity, now);

    let (components, final_score, damping) = match scheme {
        Scheme::Model => {
            let aggregate = model::score(&ctx);
            (aggregate.components, aggregate.weighted_score, None)
        }
        Scheme::Advanced => {
            let result = advanced::score(&ctx);
            (
                result.aggregate.components,
                result.final_score,
                Some(result.damping),
            )
        }
    };

    let final_score = aggregate::clamp_unit(final_score);
    let rating = Rating::from_score(final_score);
    info!(
        "Scored {} with {} scheme: {:.2} ({})",
        activity.login(),
        scheme,
        final_score,
        rating
    );

    ScoreReport {
        username: activity.login().to_string(),
        scheme,
        final_score,
        rating,
        components,
        damping,
        stats: UserStats::from_activity(activity, now),
    }
}
