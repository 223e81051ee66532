//! GitHub REST client
//!
//! Sync HTTP via ureq. The token, base URL and limits come from
//! [`GithubConfig`] at construction; nothing is read from globals.

use super::wire::{WireCommit, WireEvent, WireIssue, WirePull, WireRepo, WireUser};
use super::{DataSource, Page, SourceError};
use crate::clock::{Clock, SystemClock};
use crate::config::GithubConfig;
use crate::models::{Commit, Event, Issue, PullRequest, RepositorySummary, UserProfile};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Wait used when GitHub reports a rate limit without saying when it resets
const FALLBACK_RETRY_SECS: u64 = 60;

/// Rate-limit related response headers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RateLimitHeaders {
    /// `X-RateLimit-Remaining`
    pub remaining: Option<u64>,
    /// `X-RateLimit-Reset` (Unix seconds)
    pub reset: Option<i64>,
    /// `Retry-After` (seconds)
    pub retry_after: Option<u64>,
}

impl RateLimitHeaders {
    pub fn from_headers(headers: &ureq::http::HeaderMap) -> Self {
        fn number<T: std::str::FromStr>(headers: &ureq::http::HeaderMap, name: &str) -> Option<T> {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse().ok())
        }

        Self {
            remaining: number(headers, "x-ratelimit-remaining"),
            reset: number(headers, "x-ratelimit-reset"),
            retry_after: number(headers, "retry-after"),
        }
    }
}

/// Map a failed response to a [`SourceError`].
///
/// 403/429 count as rate limiting when the quota is exhausted, a
/// `Retry-After` header is present or the body says so. The wait is
/// `reset - now + 1s`, never negative.
pub fn classify_failure(
    status: u16,
    headers: &RateLimitHeaders,
    body: &str,
    now: DateTime<Utc>,
) -> SourceError {
    let message = api_message(body);

    if status == 403 || status == 429 {
        if let Some(secs) = headers.retry_after {
            return SourceError::RateLimited {
                retry_after: Duration::from_secs(secs),
            };
        }

        let exhausted = headers.remaining == Some(0);
        let says_limited = message.to_lowercase().contains("rate limit");
        if exhausted || says_limited {
            let retry_after = match headers.reset {
                Some(reset) => Duration::from_secs((reset - now.timestamp()).max(0) as u64 + 1),
                None => Duration::from_secs(FALLBACK_RETRY_SECS),
            };
            return SourceError::RateLimited { retry_after };
        }
    }

    if status == 404 {
        return SourceError::NotFound(message);
    }

    SourceError::Api { status, message }
}

/// `message` field of a GitHub error body, or the raw body
fn api_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}

/// [`DataSource`] backed by the GitHub REST API
pub struct GithubClient {
    config: GithubConfig,
    agent: ureq::Agent,
    clock: Arc<dyn Clock>,
}

fn make_agent(config: &GithubConfig) -> ureq::Agent {
    ureq::config::Config::builder()
        .http_status_as_error(false) // status codes are classified here
        .timeout_global(Some(config.timeout))
        .build()
        .new_agent()
}

impl GithubClient {
    pub fn new(config: GithubConfig) -> Self {
        Self {
            agent: make_agent(&config),
            config,
            clock: Arc::new(SystemClock),
        }
    }

    /// Use another clock for rate-limit reset arithmetic
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &GithubConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.api_url, path)
    }

    fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, SourceError> {
        let url = self.url(path);
        debug!("GET {} {:?}", url, query);

        let mut req = self
            .agent
            .get(&url)
            .header("Accept", "application/vnd.github+json")
            .header("User-Agent", &self.config.user_agent);

        if let Some(token) = &self.config.token {
            req = req.header("Authorization", &format!("Bearer {}", token));
        }
        for (key, value) in query {
            req = req.query(*key, value);
        }

        let response = req
            .call()
            .map_err(|e| SourceError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        if status >= 400 {
            let headers = RateLimitHeaders::from_headers(response.headers());
            let body = response.into_body().read_to_string().unwrap_or_default();
            let error = classify_failure(status, &headers, &body, self.clock.now());
            debug!("GET {} failed: {}", url, error);
            return Err(error);
        }

        response
            .into_body()
            .read_json()
            .map_err(|e| SourceError::Decode(e.to_string()))
    }

    fn page_query(page: Page) -> Vec<(&'static str, String)> {
        vec![
            ("per_page", page.per_page.to_string()),
            ("page", page.number.to_string()),
        ]
    }
}

impl DataSource for GithubClient {
    fn user(&self, username: &str) -> Result<UserProfile, SourceError> {
        let user: WireUser = self.get_json(&format!("/users/{}", username), &[])?;
        Ok(user.into())
    }

    fn repositories(
        &self,
        username: &str,
        page: Page,
    ) -> Result<Vec<RepositorySummary>, SourceError> {
        let mut query = Self::page_query(page);
        query.push(("sort", "updated".to_string()));
        let repos: Vec<WireRepo> = self.get_json(&format!("/users/{}/repos", username), &query)?;
        Ok(repos.into_iter().map(Into::into).collect())
    }

    fn commits(&self, repo: &str, author: &str, page: Page) -> Result<Vec<Commit>, SourceError> {
        let mut query = Self::page_query(page);
        query.push(("author", author.to_string()));
        let commits: Vec<WireCommit> = self.get_json(&format!("/repos/{}/commits", repo), &query)?;
        Ok(commits.into_iter().map(|c| c.into_model(repo)).collect())
    }

    fn pull_requests(&self, repo: &str, page: Page) -> Result<Vec<PullRequest>, SourceError> {
        let mut query = Self::page_query(page);
        query.push(("state", "all".to_string()));
        let pulls: Vec<WirePull> = self.get_json(&format!("/repos/{}/pulls", repo), &query)?;
        Ok(pulls.into_iter().map(|p| p.into_model(repo)).collect())
    }

    fn issues(&self, repo: &str, creator: &str, page: Page) -> Result<Vec<Issue>, SourceError> {
        let mut query = Self::page_query(page);
        query.push(("state", "all".to_string()));
        query.push(("creator", creator.to_string()));
        let issues: Vec<WireIssue> = self.get_json(&format!("/repos/{}/issues", repo), &query)?;
        // the issues endpoint also lists pull requests
        Ok(issues
            .into_iter()
            .filter(|i| !i.is_pull_request())
            .map(|i| i.into_model(repo))
            .collect())
    }

    fn events(&self, username: &str, page: Page) -> Result<Vec<Event>, SourceError> {
        let events: Vec<WireEvent> =
            self.get_json(&format!("/users/{}/events", username), &Self::page_query(page))?;
        Ok(events.into_iter().map(Into::into).collect())
    }
}
