//! GitHub REST response shapes and their conversion into models
//!
//! Only the fields scoring reads are declared; everything is optional or
//! defaulted so a sparse response still decodes.

use crate::models::{
    Commit, Event, EventKind, Issue, ItemState, PullRequest, RepositorySummary, UserProfile,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(crate) struct WireUser {
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

impl From<WireUser> for UserProfile {
    fn from(w: WireUser) -> Self {
        UserProfile {
            login: w.login,
            name: w.name,
            public_repos: w.public_repos,
            followers: w.followers,
            created_at: w.created_at,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub(crate) struct WireAccount {
    #[serde(default)]
    pub login: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireRepo {
    pub name: String,
    pub full_name: String,
    #[serde(default)]
    pub owner: WireAccount,
    #[serde(default)]
    pub stargazers_count: u32,
    #[serde(default)]
    pub forks_count: u32,
    #[serde(default)]
    pub fork: bool,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
}

impl From<WireRepo> for RepositorySummary {
    fn from(w: WireRepo) -> Self {
        RepositorySummary {
            name: w.name,
            full_name: w.full_name,
            owner: w.owner.login,
            stars: w.stargazers_count,
            forks: w.forks_count,
            fork: w.fork,
            updated_at: w.updated_at.unwrap_or_default(),
            description: w.description,
            language: w.language,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub(crate) struct WireCommitAuthor {
    #[serde(default)]
    pub date: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub(crate) struct WireCommitDetail {
    #[serde(default)]
    pub author: Option<WireCommitAuthor>,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireCommit {
    #[serde(default)]
    pub commit: WireCommitDetail,
    /// Linked GitHub account; null when the author email is not linked
    #[serde(default)]
    pub author: Option<WireAccount>,
}

impl WireCommit {
    pub fn into_model(self, repo: &str) -> Commit {
        Commit {
            repo: repo.to_string(),
            author: self.author.map(|a| a.login),
            timestamp: self
                .commit
                .author
                .and_then(|a| a.date)
                .unwrap_or_default(),
            message: self.commit.message,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct WirePull {
    #[serde(default)]
    pub user: Option<WireAccount>,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub merged: Option<bool>,
    #[serde(default)]
    pub merged_at: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl WirePull {
    pub fn into_model(self, repo: &str) -> PullRequest {
        PullRequest {
            repo: repo.to_string(),
            author: self.user.map(|u| u.login),
            state: ItemState::parse(&self.state),
            // list endpoints only carry merged_at
            merged: self.merged.unwrap_or(false) || self.merged_at.is_some(),
            body: self.body,
            created_at: self.created_at.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireIssue {
    #[serde(default)]
    pub user: Option<WireAccount>,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    /// Present when the issue entry is really a pull request
    #[serde(default)]
    pub pull_request: Option<serde_json::Value>,
}

impl WireIssue {
    pub fn is_pull_request(&self) -> bool {
        self.pull_request.is_some()
    }

    pub fn into_model(self, repo: &str) -> Issue {
        Issue {
            repo: repo.to_string(),
            author: self.user.map(|u| u.login),
            state: ItemState::parse(&self.state),
            body: self.body,
            created_at: self.created_at.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub(crate) struct WireEventRepo {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub(crate) struct WireEventPayload {
    #[serde(default)]
    pub action: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireEvent {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub repo: WireEventRepo,
    #[serde(default)]
    pub payload: WireEventPayload,
}

impl From<WireEvent> for Event {
    fn from(w: WireEvent) -> Self {
        Event {
            kind: EventKind::from(w.kind),
            created_at: w.created_at.unwrap_or_default(),
            repo: w.repo.name,
            action: w.payload.action,
        }
    }
}
