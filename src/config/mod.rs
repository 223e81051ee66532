//! Configuration module for devscore
//!
//! This module handles:
//! - Loading the user config file and environment overrides ([`UserConfig`])
//! - Resolving it into concrete settings with defaults ([`Config`])
//!
//! The GitHub token lives only in [`GithubConfig`], which is handed to the
//! API client when it is constructed.

mod user_config;

pub use user_config::{GithubSection, RetrySection, ScoringSection, ServerSection, UserConfig};

use crate::scoring::Scheme;
use anyhow::Result;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "https://api.github.com";
pub const DEFAULT_MAX_REPOS: usize = 10;
pub const DEFAULT_PER_PAGE: u32 = 100;
pub const DEFAULT_MAX_PAGES: u32 = 10;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_MAX_ATTEMPTS: u32 = 2;
pub const DEFAULT_MAX_WAIT_SECS: u64 = 3600;
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8001;

/// GitHub has a hard limit of 100 items per page
const MAX_PER_PAGE: u32 = 100;

fn default_user_agent() -> String {
    format!("devscore/{}", env!("CARGO_PKG_VERSION"))
}

/// Settings for the GitHub REST client
#[derive(Debug, Clone, PartialEq)]
pub struct GithubConfig {
    pub token: Option<String>,
    pub api_url: String,
    pub user_agent: String,
    pub max_repos: usize,
    pub per_page: u32,
    pub max_pages: u32,
    pub timeout: Duration,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            token: None,
            api_url: DEFAULT_API_URL.to_string(),
            user_agent: default_user_agent(),
            max_repos: DEFAULT_MAX_REPOS,
            per_page: DEFAULT_PER_PAGE,
            max_pages: DEFAULT_MAX_PAGES,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl GithubConfig {
    /// Token with everything but the last four characters hidden
    pub fn masked_token(&self) -> Option<String> {
        self.token.as_deref().map(mask_secret)
    }
}

/// Rate-limit retry settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub max_wait: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            max_wait: Duration::from_secs(DEFAULT_MAX_WAIT_SECS),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

/// Effective configuration
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    pub github: GithubConfig,
    pub retry: RetryConfig,
    pub server: ServerConfig,
    pub scheme: Scheme,
}

impl Config {
    /// Load the user config (or `explicit` file) and resolve defaults
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        Self::resolve(UserConfig::load(explicit)?)
    }

    /// Fill unset values with defaults
    pub fn resolve(user: UserConfig) -> Result<Self> {
        let UserConfig {
            github,
            retry,
            server,
            scoring,
        } = user;

        let scheme = match scoring.scheme.as_deref() {
            Some(s) => Scheme::from_str(s)?,
            None => Scheme::default(),
        };

        Ok(Self {
            github: GithubConfig {
                token: github.token.filter(|t| !t.trim().is_empty()),
                api_url: github
                    .api_url
                    .map(|u| u.trim_end_matches('/').to_string())
                    .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
                user_agent: github.user_agent.unwrap_or_else(default_user_agent),
                max_repos: github.max_repos.unwrap_or(DEFAULT_MAX_REPOS),
                per_page: github
                    .per_page
                    .unwrap_or(DEFAULT_PER_PAGE)
                    .clamp(1, MAX_PER_PAGE),
                max_pages: github.max_pages.unwrap_or(DEFAULT_MAX_PAGES).max(1),
                timeout: Duration::from_secs(github.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)),
            },
            retry: RetryConfig {
                max_attempts: retry.max_attempts.unwrap_or(DEFAULT_MAX_ATTEMPTS).max(1),
                max_wait: Duration::from_secs(retry.max_wait_secs.unwrap_or(DEFAULT_MAX_WAIT_SECS)),
            },
            server: ServerConfig {
                host: server.host.unwrap_or_else(|| DEFAULT_HOST.to_string()),
                port: server.port.unwrap_or(DEFAULT_PORT),
            },
            scheme,
        })
    }

    /// Human-readable summary with the token masked
    pub fn display(&self) -> String {
        let token = self
            .github
            .masked_token()
            .unwrap_or_else(|| "(not set)".to_string());
        format!(
            "[github]\n\
             token = {}\n\
             api_url = {}\n\
             user_agent = {}\n\
             max_repos = {}\n\
             per_page = {}\n\
             max_pages = {}\n\
             timeout_secs = {}\n\
             \n\
             [retry]\n\
             max_attempts = {}\n\
             max_wait_secs = {}\n\
             \n\
             [server]\n\
             host = {}\n\
             port = {}\n\
             \n\
             [scoring]\n\
             scheme = {}\n",
            token,
            self.github.api_url,
            self.github.user_agent,
            self.github.max_repos,
            self.github.per_page,
            self.github.max_pages,
            self.github.timeout.as_secs(),
            self.retry.max_attempts,
            self.retry.max_wait.as_secs(),
            self.server.host,
            self.server.port,
            self.scheme,
        )
    }
}

fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 4 {
        return "****".to_string();
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("****{}", tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::resolve(UserConfig::default()).unwrap();
        assert_eq!(config.github.api_url, "https://api.github.com");
        assert_eq!(config.github.max_repos, 10);
        assert_eq!(config.github.per_page, 100);
        assert_eq!(config.retry.max_attempts, 2);
        assert_eq!(config.retry.max_wait, Duration::from_secs(3600));
        assert_eq!(config.server.port, 8001);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.scheme, Scheme::Model);
        assert!(config.github.user_agent.starts_with("devscore/"));
    }

    #[test]
    fn test_resolve_clamps_and_trims() {
        let mut user = UserConfig::default();
        user.github.per_page = Some(500);
        user.github.api_url = Some("http://localhost:8080/".to_string());
        user.github.token = Some("   ".to_string());
        user.retry.max_attempts = Some(0);

        let config = Config::resolve(user).unwrap();
        assert_eq!(config.github.per_page, 100);
        assert_eq!(config.github.api_url, "http://localhost:8080");
        assert!(config.github.token.is_none());
        assert_eq!(config.retry.max_attempts, 1);
    }

    #[test]
    fn test_unknown_scheme_is_error() {
        let mut user = UserConfig::default();
        user.scoring.scheme = Some("vibes".to_string());
        assert!(Config::resolve(user).is_err());
    }

    #[test]
    fn test_display_masks_token() {
        let mut config = Config::default();
        config.github.token = Some("ghp_abcdefgh1234".to_string());
        let shown = config.display();
        assert!(shown.contains("****1234"));
        assert!(!shown.contains("abcdefgh"));

        config.github.token = None;
        assert!(config.display().contains("(not set)"));
    }

    #[test]
    fn test_mask_short_secret() {
        assert_eq!(mask_secret("abc"), "****");
    }
}
