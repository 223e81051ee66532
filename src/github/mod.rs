//! GitHub data access
//!
//! Scoring never talks to the network directly. It works on a
//! [`UserActivity`](crate::models::UserActivity) produced by a [`Collector`],
//! which pages through a [`DataSource`]:
//!
//! - [`GithubClient`]: the REST implementation (sync HTTP via ureq)
//! - tests use in-memory fakes
//!
//! A rate-limited request is reported as [`SourceError::RateLimited`] and
//! retried by [`with_retry`] after sleeping until the limit resets. Other
//! failures for a data class degrade to an empty list; only a failed profile
//! lookup aborts collection.

mod client;
mod collect;
mod retry;
mod wire;

pub use client::{classify_failure, GithubClient, RateLimitHeaders};
pub use collect::{Collector, FetchLimits};
pub use retry::{with_retry, RetryPolicy};

use crate::models::{Commit, Event, Issue, PullRequest, RepositorySummary, UserProfile};
use std::time::Duration;
use thiserror::Error;

/// Failure reported by a data source
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SourceError {
    #[error("Rate limited, retry after {}s", retry_after.as_secs())]
    RateLimited { retry_after: Duration },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Failed to parse API response: {0}")]
    Decode(String),
}

impl SourceError {
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, SourceError::RateLimited { .. })
    }
}

/// Failure that aborts collection for a user
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("GitHub user '{0}' not found")]
    UserNotFound(String),

    #[error(transparent)]
    Source(#[from] SourceError),
}

/// One page of a paginated list (1-based)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub number: u32,
    pub per_page: u32,
}

/// Provider of raw GitHub entities.
///
/// Repository arguments are `owner/name`.
pub trait DataSource: Send + Sync {
    fn user(&self, username: &str) -> Result<UserProfile, SourceError>;

    /// Repositories of a user, most recently updated first
    fn repositories(
        &self,
        username: &str,
        page: Page,
    ) -> Result<Vec<RepositorySummary>, SourceError>;

    /// Commits in a repository authored by `author`
    fn commits(&self, repo: &str, author: &str, page: Page) -> Result<Vec<Commit>, SourceError>;

    /// Pull requests in a repository, any state
    fn pull_requests(&self, repo: &str, page: Page) -> Result<Vec<PullRequest>, SourceError>;

    /// Issues in a repository created by `creator`, any state
    fn issues(&self, repo: &str, creator: &str, page: Page) -> Result<Vec<Issue>, SourceError>;

    /// Public activity feed of a user
    fn events(&self, username: &str, page: Page) -> Result<Vec<Event>, SourceError>;
}
