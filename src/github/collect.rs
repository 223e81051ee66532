//! Collect a user's activity from a data source
//!
//! Pages through every list a scheme needs, retrying rate-limited requests.
//! A failed data class (or a single repository) is logged and left empty so
//! one broken endpoint does not sink the whole score.

use super::retry::{with_retry, RetryPolicy};
use super::{DataSource, FetchError, Page, SourceError};
use crate::clock::{Sleeper, ThreadSleeper};
use crate::config::GithubConfig;
use crate::models::{RepositorySummary, UserActivity};
use crate::scoring::DataNeeds;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// GitHub serves at most this many items of a user's event feed
pub const EVENTS_FEED_LIMIT: usize = 300;

/// Pagination and breadth limits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchLimits {
    /// Repositories read for commits, pull requests and issues
    pub max_repos: usize,
    pub per_page: u32,
    /// Pages fetched at most per list
    pub max_pages: u32,
}

impl Default for FetchLimits {
    fn default() -> Self {
        (&GithubConfig::default()).into()
    }
}

impl From<&GithubConfig> for FetchLimits {
    fn from(config: &GithubConfig) -> Self {
        Self {
            max_repos: config.max_repos,
            per_page: config.per_page.max(1),
            max_pages: config.max_pages.max(1),
        }
    }
}

/// Builds a [`UserActivity`] from a [`DataSource`]
pub struct Collector {
    source: Arc<dyn DataSource>,
    limits: FetchLimits,
    retry: RetryPolicy,
    sleeper: Arc<dyn Sleeper>,
}

impl Collector {
    pub fn new(source: Arc<dyn DataSource>) -> Self {
        Self {
            source,
            limits: FetchLimits::default(),
            retry: RetryPolicy::default(),
            sleeper: Arc::new(ThreadSleeper),
        }
    }

    pub fn with_limits(mut self, limits: FetchLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    /// Fetch everything `needs` asks for.
    ///
    /// Fails only when the profile cannot be read.
    pub fn collect(&self, username: &str, needs: DataNeeds) -> Result<UserActivity, FetchError> {
        let profile = self
            .retried(|| self.source.user(username))
            .map_err(|e| match e {
                SourceError::NotFound(_) => FetchError::UserNotFound(username.to_string()),
                other => FetchError::Source(other),
            })?;
        let login = profile.login.clone();
        info!("Collecting activity for {}", login);

        let mut activity = UserActivity {
            profile,
            ..Default::default()
        };

        let per_repo = needs.commits || needs.pull_requests || needs.issues;
        if needs.repositories || per_repo {
            activity.repositories = self.degrade(
                "repositories",
                self.paginate("repositories", None, |page| {
                    self.source.repositories(&login, page)
                }),
            );
        }

        if per_repo {
            let targets = scan_targets(&activity.repositories, self.limits.max_repos);
            debug!("Reading {} repositories for {}", targets.len(), login);

            for repo in &targets {
                let name = repo.full_name.as_str();
                if needs.commits {
                    let commits = self.degrade(
                        "commits",
                        self.paginate("commits", None, |page| {
                            self.source.commits(name, &login, page)
                        }),
                    );
                    activity.commits.extend(
                        commits
                            .into_iter()
                            .filter(|c| authored_by(c.author.as_deref(), &login)),
                    );
                }
                if needs.pull_requests {
                    let prs = self.degrade(
                        "pull requests",
                        self.paginate("pull requests", None, |page| {
                            self.source.pull_requests(name, page)
                        }),
                    );
                    activity.pull_requests.extend(
                        prs.into_iter()
                            .filter(|p| authored_by(p.author.as_deref(), &login)),
                    );
                }
                if needs.issues {
                    let issues = self.degrade(
                        "issues",
                        self.paginate("issues", None, |page| {
                            self.source.issues(name, &login, page)
                        }),
                    );
                    activity.issues.extend(
                        issues
                            .into_iter()
                            .filter(|i| authored_by(i.author.as_deref(), &login)),
                    );
                }
            }
        }

        if needs.events {
            activity.events = self.degrade(
                "events",
                self.paginate("events", Some(EVENTS_FEED_LIMIT), |page| {
                    self.source.events(&login, page)
                }),
            );
        }

        info!(
            "Collected {} repos, {} commits, {} PRs, {} issues, {} events for {}",
            activity.repositories.len(),
            activity.commits.len(),
            activity.pull_requests.len(),
            activity.issues.len(),
            activity.events.len(),
            login
        );
        Ok(activity)
    }

    fn retried<T>(&self, op: impl FnMut() -> Result<T, SourceError>) -> Result<T, SourceError> {
        with_retry(&self.retry, self.sleeper.as_ref(), op)
    }

    /// Fetch pages until a short page, `max_pages` or `max_items`.
    ///
    /// Only a failure on the first page is an error. A later failure keeps
    /// the pages already read and stops.
    fn paginate<T>(
        &self,
        class: &str,
        max_items: Option<usize>,
        mut fetch: impl FnMut(Page) -> Result<Vec<T>, SourceError>,
    ) -> Result<Vec<T>, SourceError> {
        let per_page = self.limits.per_page;
        let max_pages = match max_items {
            // per_page * pages must stay within the cap
            Some(limit) => {
                let pages = (limit / per_page as usize).max(1) as u32;
                self.limits.max_pages.min(pages)
            }
            None => self.limits.max_pages,
        };

        let mut all = Vec::new();
        for number in 1..=max_pages {
            let page = Page { number, per_page };
            let items = match self.retried(|| fetch(page)) {
                Ok(items) => items,
                Err(e) if number == 1 => return Err(e),
                Err(e) => {
                    warn!(
                        "Failed to fetch {} page {}: {} (keeping {} already fetched)",
                        class,
                        number,
                        e,
                        all.len()
                    );
                    break;
                }
            };
            let count = items.len();
            all.extend(items);
            if count < per_page as usize {
                break;
            }
        }
        if let Some(limit) = max_items {
            all.truncate(limit);
        }
        Ok(all)
    }

    fn degrade<T>(&self, class: &str, result: Result<Vec<T>, SourceError>) -> Vec<T> {
        result.unwrap_or_else(|e| {
            warn!("Failed to fetch {}: {} (continuing without them)", class, e);
            Vec::new()
        })
    }
}

/// Most recently updated non-fork repositories
fn scan_targets(repos: &[RepositorySummary], max_repos: usize) -> Vec<RepositorySummary> {
    let mut own: Vec<RepositorySummary> = repos.iter().filter(|r| !r.fork).cloned().collect();
    // ISO-8601 strings in one format sort chronologically
    own.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
    own.truncate(max_repos);
    own
}

fn authored_by(author: Option<&str>, login: &str) -> bool {
    author.is_some_and(|a| a.eq_ignore_ascii_case(login))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::retry::tests::RecordingSleeper;
    use crate::github::testing::FakeSource;
    use crate::models::{Commit, Event, EventKind, Issue, PullRequest, UserProfile};
    use crate::scoring::Scheme;
    use std::time::Duration;

    fn repo(name: &str, updated_at: &str, fork: bool) -> RepositorySummary {
        RepositorySummary {
            name: name.to_string(),
            full_name: format!("dev/{name}"),
            owner: "dev".to_string(),
            fork,
            updated_at: updated_at.to_string(),
            ..Default::default()
        }
    }

    fn commit(repo: &str, author: &str) -> Commit {
        Commit {
            repo: repo.to_string(),
            author: Some(author.to_string()),
            timestamp: "2024-01-01T00:00:00Z".to_string(),
            message: "work".to_string(),
        }
    }

    fn fixture() -> UserActivity {
        UserActivity {
            profile: UserProfile {
                login: "dev".to_string(),
                ..Default::default()
            },
            repositories: vec![
                repo("old", "2023-01-01T00:00:00Z", false),
                repo("new", "2024-05-01T00:00:00Z", false),
                repo("forked", "2024-05-02T00:00:00Z", true),
            ],
            commits: vec![
                commit("dev/new", "dev"),
                commit("dev/new", "someone"),
                commit("dev/old", "dev"),
                commit("dev/forked", "dev"),
            ],
            pull_requests: vec![
                PullRequest {
                    repo: "dev/new".to_string(),
                    author: Some("DEV".to_string()),
                    ..Default::default()
                },
                PullRequest {
                    repo: "dev/new".to_string(),
                    author: Some("other".to_string()),
                    ..Default::default()
                },
            ],
            issues: vec![Issue {
                repo: "dev/old".to_string(),
                author: Some("dev".to_string()),
                ..Default::default()
            }],
            events: (0..5)
                .map(|_| Event {
                    kind: EventKind::Push,
                    created_at: "2024-01-01T00:00:00Z".to_string(),
                    repo: Some("dev/new".to_string()),
                    action: None,
                })
                .collect(),
        }
    }

    fn collector(source: Arc<FakeSource>, sleeper: Arc<RecordingSleeper>) -> Collector {
        Collector::new(source)
            .with_sleeper(sleeper)
            .with_limits(FetchLimits {
                max_repos: 10,
                per_page: 2,
                max_pages: 10,
            })
    }

    #[test]
    fn test_advanced_needs_skip_forks_and_filter_authors() {
        let source = Arc::new(FakeSource::with_user(fixture()));
        let sleeper = Arc::new(RecordingSleeper::default());
        let activity = collector(source.clone(), sleeper)
            .collect("dev", Scheme::Advanced.needs())
            .unwrap();

        assert_eq!(activity.repositories.len(), 3);
        assert_eq!(activity.commits.len(), 2);
        assert!(activity.commits.iter().all(|c| c.repo != "dev/forked"));
        assert_eq!(activity.pull_requests.len(), 1);
        assert_eq!(activity.issues.len(), 1);
        assert!(activity.events.is_empty());
        assert_eq!(source.calls("events"), 0);
    }

    #[test]
    fn test_model_needs_fetch_events_not_commits() {
        let source = Arc::new(FakeSource::with_user(fixture()));
        let sleeper = Arc::new(RecordingSleeper::default());
        let activity = collector(source.clone(), sleeper)
            .collect("dev", Scheme::Model.needs())
            .unwrap();

        // 5 events over pages of 2: 2 + 2 + 1
        assert_eq!(activity.events.len(), 5);
        assert_eq!(source.calls("events"), 3);
        assert_eq!(source.calls("commits"), 0);
        assert!(activity.commits.is_empty());
    }

    #[test]
    fn test_max_repos_picks_most_recent() {
        let targets = scan_targets(&fixture().repositories, 1);
        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].name, "new");
    }

    #[test]
    fn test_unknown_user_is_error() {
        let source = Arc::new(FakeSource::with_user(fixture()));
        let sleeper = Arc::new(RecordingSleeper::default());
        let err = collector(source, sleeper)
            .collect("ghost", DataNeeds::all())
            .unwrap_err();
        assert!(matches!(err, FetchError::UserNotFound(ref u) if u == "ghost"));
    }

    #[test]
    fn test_rate_limited_request_is_retried() {
        let source = Arc::new(FakeSource::with_user(fixture()));
        source.fail(
            "events",
            SourceError::RateLimited {
                retry_after: Duration::from_secs(7),
            },
        );
        let sleeper = Arc::new(RecordingSleeper::default());
        let activity = collector(source, sleeper.clone())
            .collect("dev", Scheme::Model.needs())
            .unwrap();

        assert_eq!(activity.events.len(), 5);
        assert_eq!(*sleeper.sleeps.lock().unwrap(), vec![Duration::from_secs(7)]);
    }

    #[test]
    fn test_failed_class_degrades_to_empty() {
        let source = Arc::new(FakeSource::with_user(fixture()));
        source.fail("events", SourceError::Transport("boom".into()));
        let sleeper = Arc::new(RecordingSleeper::default());
        let activity = collector(source, sleeper)
            .collect("dev", Scheme::Model.needs())
            .unwrap();

        assert!(activity.events.is_empty());
        assert_eq!(activity.repositories.len(), 3);
    }

    #[test]
    fn test_later_page_failure_keeps_earlier_pages() {
        let source = Arc::new(FakeSource::with_user(fixture()));
        source.fail_page(
            "events",
            3,
            SourceError::Api {
                status: 422,
                message: "pagination is limited".into(),
            },
        );
        let sleeper = Arc::new(RecordingSleeper::default());
        let activity = collector(source.clone(), sleeper)
            .collect("dev", Scheme::Model.needs())
            .unwrap();

        // pages 1 and 2 of 2 events each survive the failing third page
        assert_eq!(activity.events.len(), 4);
        assert_eq!(source.calls("events"), 3);
    }

    #[test]
    fn test_events_feed_capped_at_api_limit() {
        let mut busy = fixture();
        busy.events = (0..350)
            .map(|_| Event {
                kind: EventKind::Push,
                created_at: "2024-01-01T00:00:00Z".to_string(),
                repo: Some("dev/new".to_string()),
                action: None,
            })
            .collect();
        let source = Arc::new(FakeSource::with_user(busy));
        // a fourth page would come back as 422
        source.fail_page(
            "events",
            4,
            SourceError::Api {
                status: 422,
                message: "pagination is limited".into(),
            },
        );
        let sleeper = Arc::new(RecordingSleeper::default());
        let activity = Collector::new(source.clone())
            .with_sleeper(sleeper)
            .with_limits(FetchLimits {
                max_repos: 10,
                per_page: 100,
                max_pages: 10,
            })
            .collect("dev", Scheme::Model.needs())
            .unwrap();

        assert_eq!(activity.events.len(), EVENTS_FEED_LIMIT);
        assert_eq!(source.calls("events"), 3);
    }

    #[test]
    fn test_profile_transport_failure_aborts() {
        let source = Arc::new(FakeSource::with_user(fixture()));
        source.fail("user", SourceError::Transport("down".into()));
        let sleeper = Arc::new(RecordingSleeper::default());
        let err = collector(source, sleeper)
            .collect("dev", DataNeeds::all())
            .unwrap_err();
        assert!(matches!(err, FetchError::Source(SourceError::Transport(_))));
    }
}
