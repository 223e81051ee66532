//! Core data models for devscore
//!
//! These models hold the GitHub activity a score is computed from. They are
//! built fresh for every scoring request (from the REST API or a snapshot
//! file) and dropped once the report is rendered.

use serde::{Deserialize, Serialize};

/// Common view over every kind of activity record.
///
/// Scorers need a timestamp for decay, the owning repository for diversity
/// and some free text for the message and body heuristics.
pub trait ActivityRecord {
    /// ISO-8601 timestamp (UTC) of the activity
    fn timestamp(&self) -> &str;
    /// Owning repository (`owner/name`), if known
    fn repository(&self) -> Option<&str>;
    /// Free-text content (commit message, PR/issue body)
    fn content(&self) -> Option<&str>;
}

/// Open/closed state shared by pull requests and issues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ItemState {
    #[default]
    Open,
    Closed,
}

impl ItemState {
    pub fn parse(state: &str) -> Self {
        if state.eq_ignore_ascii_case("closed") {
            ItemState::Closed
        } else {
            ItemState::Open
        }
    }
}

/// Public profile of a GitHub user
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UserProfile {
    pub login: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub public_repos: u32,
    #[serde(default)]
    pub followers: u32,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// A repository as listed on a user's profile
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RepositorySummary {
    pub name: String,
    /// `owner/name`
    pub full_name: String,
    /// Owner login
    pub owner: String,
    #[serde(default)]
    pub stars: u32,
    #[serde(default)]
    pub forks: u32,
    /// Whether the repository is itself a fork
    #[serde(default)]
    pub fork: bool,
    /// Last update timestamp (ISO 8601)
    #[serde(default)]
    pub updated_at: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Primary language reported by GitHub
    #[serde(default)]
    pub language: Option<String>,
}

/// A commit authored by the user
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Commit {
    /// Owning repository (`owner/name`)
    pub repo: String,
    #[serde(default)]
    pub author: Option<String>,
    /// Author date (ISO 8601)
    pub timestamp: String,
    #[serde(default)]
    pub message: String,
}

/// A pull request opened by the user
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PullRequest {
    pub repo: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub state: ItemState,
    #[serde(default)]
    pub merged: bool,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub created_at: String,
}

impl PullRequest {
    /// Closed without being merged (likely rejected)
    pub fn is_rejected(&self) -> bool {
        self.state == ItemState::Closed && !self.merged
    }
}

/// An issue opened by the user
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Issue {
    pub repo: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub state: ItemState,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub created_at: String,
}

/// Type of a public activity-feed event
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EventKind {
    Push,
    Issues,
    PullRequest,
    PullRequestReview,
    IssueComment,
    CommitComment,
    /// Any other GitHub event type, kept verbatim
    Other(String),
}

impl EventKind {
    pub fn as_str(&self) -> &str {
        match self {
            EventKind::Push => "PushEvent",
            EventKind::Issues => "IssuesEvent",
            EventKind::PullRequest => "PullRequestEvent",
            EventKind::PullRequestReview => "PullRequestReviewEvent",
            EventKind::IssueComment => "IssueCommentEvent",
            EventKind::CommitComment => "CommitCommentEvent",
            EventKind::Other(s) => s,
        }
    }

    /// Comment-style events counted as discussion participation
    pub fn is_discussion(&self) -> bool {
        matches!(self, EventKind::IssueComment | EventKind::CommitComment)
    }
}

impl From<String> for EventKind {
    fn from(s: String) -> Self {
        match s.as_str() {
            "PushEvent" => EventKind::Push,
            "IssuesEvent" => EventKind::Issues,
            "PullRequestEvent" => EventKind::PullRequest,
            "PullRequestReviewEvent" => EventKind::PullRequestReview,
            "IssueCommentEvent" => EventKind::IssueComment,
            "CommitCommentEvent" => EventKind::CommitComment,
            _ => EventKind::Other(s),
        }
    }
}

impl From<EventKind> for String {
    fn from(kind: EventKind) -> Self {
        kind.as_str().to_string()
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An entry of the user's public activity feed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub kind: EventKind,
    #[serde(default)]
    pub created_at: String,
    /// Repository the event happened in (`owner/name`)
    #[serde(default)]
    pub repo: Option<String>,
    /// Payload action, e.g. "opened" / "closed" for issue events
    #[serde(default)]
    pub action: Option<String>,
}

impl ActivityRecord for Commit {
    fn timestamp(&self) -> &str {
        &self.timestamp
    }
    fn repository(&self) -> Option<&str> {
        Some(&self.repo)
    }
    fn content(&self) -> Option<&str> {
        Some(&self.message)
    }
}

impl ActivityRecord for PullRequest {
    fn timestamp(&self) -> &str {
        &self.created_at
    }
    fn repository(&self) -> Option<&str> {
        Some(&self.repo)
    }
    fn content(&self) -> Option<&str> {
        self.body.as_deref()
    }
}

impl ActivityRecord for Issue {
    fn timestamp(&self) -> &str {
        &self.created_at
    }
    fn repository(&self) -> Option<&str> {
        Some(&self.repo)
    }
    fn content(&self) -> Option<&str> {
        self.body.as_deref()
    }
}

impl ActivityRecord for Event {
    fn timestamp(&self) -> &str {
        &self.created_at
    }
    fn repository(&self) -> Option<&str> {
        self.repo.as_deref()
    }
    fn content(&self) -> Option<&str> {
        None
    }
}

/// Everything fetched about one user for a single scoring pass.
///
/// This is also the on-disk snapshot format (`devscore snapshot`).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UserActivity {
    pub profile: UserProfile,
    #[serde(default)]
    pub repositories: Vec<RepositorySummary>,
    #[serde(default)]
    pub commits: Vec<Commit>,
    #[serde(default)]
    pub pull_requests: Vec<PullRequest>,
    #[serde(default)]
    pub issues: Vec<Issue>,
    #[serde(default)]
    pub events: Vec<Event>,
}

impl UserActivity {
    /// Empty activity for a login (no repositories, commits, ...)
    pub fn empty(login: impl Into<String>) -> Self {
        Self {
            profile: UserProfile {
                login: login.into(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    pub fn login(&self) -> &str {
        &self.profile.login
    }

    /// Commits + pull requests + issues
    pub fn activity_count(&self) -> usize {
        self.commits.len() + self.pull_requests.len() + self.issues.len()
    }

    /// Events of one kind
    pub fn events_of<'a>(&'a self, kind: &'a EventKind) -> impl Iterator<Item = &'a Event> + 'a {
        self.events.iter().filter(move |e| &e.kind == kind)
    }
}
