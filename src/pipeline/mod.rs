//! Scoring pipeline
//!
//! Orchestrates one scoring request:
//! 1. Collect the activity the scheme needs from the data source
//! 2. Score it against the current time
//! 3. Attach descriptive statistics and the rating
//!
//! Multi-user comparison runs the same steps for each user in order.

use std::sync::Arc;
use tracing::{error, info};

use crate::clock::{Clock, Sleeper, SystemClock};
use crate::config::Config;
use crate::github::{Collector, DataSource, FetchError, FetchLimits, GithubClient, RetryPolicy};
use crate::models::UserActivity;
use crate::scoring::{self, DataNeeds, Scheme, ScoreReport};

/// Fetch-and-score pipeline.
pub struct Pipeline {
    collector: Collector,
    clock: Arc<dyn Clock>,
}

impl Pipeline {
    /// Create a pipeline over a data source with default limits.
    pub fn new(source: Arc<dyn DataSource>) -> Self {
        Self {
            collector: Collector::new(source),
            clock: Arc::new(SystemClock),
        }
    }

    /// Pipeline backed by the GitHub REST API as configured.
    pub fn from_config(config: &Config) -> Self {
        let client = GithubClient::new(config.github.clone());
        Self::new(Arc::new(client))
            .with_limits(FetchLimits::from(&config.github))
            .with_retry(RetryPolicy::from(config.retry))
    }

    pub fn with_limits(mut self, limits: FetchLimits) -> Self {
        self.collector = self.collector.with_limits(limits);
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.collector = self.collector.with_retry(retry);
        self
    }

    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.collector = self.collector.with_sleeper(sleeper);
        self
    }

    /// Use another clock for decay and statistics.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Fetch activity for a user.
    pub fn collect(&self, username: &str, needs: DataNeeds) -> Result<UserActivity, FetchError> {
        self.collector.collect(username, needs)
    }

    /// Score already-collected activity.
    pub fn score_activity(&self, activity: &UserActivity, scheme: Scheme) -> ScoreReport {
        scoring::score_activity(activity, scheme, self.clock.now())
    }

    /// Fetch and score one user. No partial score is returned on failure.
    pub fn score_user(&self, username: &str, scheme: Scheme) -> Result<ScoreReport, FetchError> {
        let activity = self.collect(username, scheme.needs())?;
        Ok(self.score_activity(&activity, scheme))
    }

    /// Score several users one after another.
    ///
    /// A failing user is logged and skipped. Results are sorted by final
    /// score, highest first; equal scores keep input order.
    pub fn compare(&self, usernames: &[String], scheme: Scheme) -> Vec<ScoreReport> {
        self.compare_with(usernames, scheme, |_, _| {})
    }

    /// [`compare`](Self::compare) with a callback after each user
    /// (`true` when the user was scored).
    pub fn compare_with(
        &self,
        usernames: &[String],
        scheme: Scheme,
        mut on_user: impl FnMut(&str, bool),
    ) -> Vec<ScoreReport> {
        let mut reports = Vec::new();

        for username in usernames {
            match self.score_user(username, scheme) {
                Ok(report) => {
                    reports.push(report);
                    on_user(username, true);
                }
                Err(e) => {
                    error!("Skipping {}: {}", username, e);
                    on_user(username, false);
                }
            }
        }

        info!("Compared {} of {} users", reports.len(), usernames.len());
        rank(&mut reports);
        reports
    }
}

/// Sort by final score descending; stable, so ties keep their order.
pub fn rank(reports: &mut [ScoreReport]) {
    reports.sort_by(|a, b| b.final_score.total_cmp(&a.final_score));
}
