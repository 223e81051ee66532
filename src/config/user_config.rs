//! User-level configuration for devscore
//!
//! Supports loading config from:
//! - Environment variables (`GITHUB_TOKEN`, `DEVSCORE_API_URL`)
//! - ~/.config/devscore/config.toml, or a file passed with `--config`

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct UserConfig {
    #[serde(default)]
    pub github: GithubSection,
    #[serde(default)]
    pub retry: RetrySection,
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub scoring: ScoringSection,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct GithubSection {
    /// Personal access token (raises the API rate limit)
    pub token: Option<String>,

    /// REST API base URL (default: https://api.github.com)
    pub api_url: Option<String>,

    /// User-Agent header sent with every request
    pub user_agent: Option<String>,

    /// Most recently updated repositories to read commits/PRs/issues from
    pub max_repos: Option<usize>,

    /// Items per page (GitHub caps this at 100)
    pub per_page: Option<u32>,

    /// Pages fetched at most per paginated list
    pub max_pages: Option<u32>,

    /// Per-request timeout in seconds
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct RetrySection {
    /// Attempts per request, including the first one
    pub max_attempts: Option<u32>,

    /// Upper bound on a single rate-limit wait, in seconds
    pub max_wait_secs: Option<u64>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct ServerSection {
    pub host: Option<String>,
    pub port: Option<u16>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct ScoringSection {
    /// "model" (default) or "advanced"
    pub scheme: Option<String>,
}

impl UserConfig {
    /// Load config from all sources, with priority:
    /// 1. Environment variables (highest)
    /// 2. `explicit` file if given, else the user config file
    ///
    /// An explicit file that is missing or invalid is an error. A broken
    /// user config file is logged and skipped.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut config = UserConfig::default();

        match explicit {
            Some(path) => {
                let file = Self::from_file(path)?;
                config.merge(file);
            }
            None => {
                if let Some(path) = Self::user_config_path().filter(|p| p.exists()) {
                    match Self::from_file(&path) {
                        Ok(file) => config.merge(file),
                        Err(e) => warn!("Ignoring user config {}: {:#}", path.display(), e),
                    }
                }
            }
        }

        // Environment variables override everything
        config.apply_env(|key| std::env::var(key).ok());

        Ok(config)
    }

    /// Parse one TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = toml::from_str::<UserConfig>(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Apply environment overrides through a lookup function
    pub(crate) fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(token) = lookup("GITHUB_TOKEN").filter(|t| !t.is_empty()) {
            self.github.token = Some(token);
        }
        if let Some(url) = lookup("DEVSCORE_API_URL").filter(|u| !u.is_empty()) {
            self.github.api_url = Some(url);
        }
    }

    /// Get the user config file path
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("devscore").join("config.toml"))
    }

    /// Merge another config into this one (other takes priority)
    pub fn merge(&mut self, other: UserConfig) {
        let UserConfig {
            github,
            retry,
            server,
            scoring,
        } = other;

        if github.token.is_some() {
            self.github.token = github.token;
        }
        if github.api_url.is_some() {
            self.github.api_url = github.api_url;
        }
        if github.user_agent.is_some() {
            self.github.user_agent = github.user_agent;
        }
        if github.max_repos.is_some() {
            self.github.max_repos = github.max_repos;
        }
        if github.per_page.is_some() {
            self.github.per_page = github.per_page;
        }
        if github.max_pages.is_some() {
            self.github.max_pages = github.max_pages;
        }
        if github.timeout_secs.is_some() {
            self.github.timeout_secs = github.timeout_secs;
        }
        if retry.max_attempts.is_some() {
            self.retry.max_attempts = retry.max_attempts;
        }
        if retry.max_wait_secs.is_some() {
            self.retry.max_wait_secs = retry.max_wait_secs;
        }
        if server.host.is_some() {
            self.server.host = server.host;
        }
        if server.port.is_some() {
            self.server.port = server.port;
        }
        if scoring.scheme.is_some() {
            self.scoring.scheme = scoring.scheme;
        }
    }

    /// Initialize user config directory and create example config
    pub fn init_user_config() -> Result<PathBuf> {
        let config_path = Self::user_config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        Self::write_example(&config_path)?;
        Ok(config_path)
    }

    /// Write the commented example config unless the file already exists
    pub fn write_example(config_path: &Path) -> Result<bool> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        if config_path.exists() {
            return Ok(false);
        }

        let example = r#"# devscore user configuration

[github]
# Token from https://github.com/settings/tokens (no scopes needed for public data).
# GITHUB_TOKEN in the environment takes priority.
# token = "ghp_..."

# api_url = "https://api.github.com"
# max_repos = 10     # repositories read for commits, pull requests and issues
# per_page = 100
# max_pages = 10
# timeout_secs = 30

[retry]
# max_attempts = 2   # first try plus one retry after a rate-limit wait
# max_wait_secs = 3600

[server]
# host = "0.0.0.0"
# port = 8001

[scoring]
# scheme = "model"   # or "advanced"
"#;
        std::fs::write(config_path, example)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toml_parsing_full() {
        let toml_str = r#"
[github]
token = "ghp_test"
api_url = "http://localhost:9999"
max_repos = 3

[retry]
max_attempts = 4

[server]
port = 9000

[scoring]
scheme = "advanced"
"#;
        let config: UserConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.github.token.as_deref(), Some("ghp_test"));
        assert_eq!(config.github.api_url.as_deref(), Some("http://localhost:9999"));
        assert_eq!(config.github.max_repos, Some(3));
        assert_eq!(config.retry.max_attempts, Some(4));
        assert_eq!(config.server.port, Some(9000));
        assert_eq!(config.scoring.scheme.as_deref(), Some("advanced"));
    }

    #[test]
    fn test_toml_parsing_minimal() {
        let config: UserConfig = toml::from_str("").unwrap();
        assert!(config.github.token.is_none());
        assert!(config.server.port.is_none());
    }

    #[test]
    fn test_invalid_toml_does_not_crash() {
        let bad_toml = "this is [[ not valid toml {{{}}}";
        assert!(toml::from_str::<UserConfig>(bad_toml).is_err());
    }

    #[test]
    fn test_merge_overrides_set_fields() {
        let mut base = UserConfig::default();
        base.github.token = Some("old".to_string());
        base.server.port = Some(1);

        let mut other = UserConfig::default();
        other.github.token = Some("new".to_string());
        other.scoring.scheme = Some("advanced".to_string());

        base.merge(other);
        assert_eq!(base.github.token.as_deref(), Some("new"));
        assert_eq!(base.server.port, Some(1));
        assert_eq!(base.scoring.scheme.as_deref(), Some("advanced"));
    }

    #[test]
    fn test_env_overrides_file() {
        let mut config = UserConfig::default();
        config.github.token = Some("from-file".to_string());
        config.apply_env(|key| match key {
            "GITHUB_TOKEN" => Some("from-env".to_string()),
            "DEVSCORE_API_URL" => Some(String::new()),
            _ => None,
        });
        assert_eq!(config.github.token.as_deref(), Some("from-env"));
        // empty values are ignored
        assert!(config.github.api_url.is_none());
    }

    #[test]
    fn test_explicit_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.toml");
        assert!(UserConfig::load(Some(&missing)).is_err());

        let bad = dir.path().join("bad.toml");
        std::fs::write(&bad, "[github\ntoken =").unwrap();
        assert!(UserConfig::load(Some(&bad)).is_err());
    }

    #[test]
    fn test_explicit_file_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("devscore.toml");
        std::fs::write(&path, "[server]\nport = 8123\n").unwrap();
        let config = UserConfig::load(Some(&path)).unwrap();
        assert_eq!(config.server.port, Some(8123));
    }

    #[test]
    fn test_example_config_parses() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        assert!(UserConfig::write_example(&path).unwrap());
        // second call leaves the file alone
        assert!(!UserConfig::write_example(&path).unwrap());

        let parsed = UserConfig::from_file(&path).unwrap();
        assert!(parsed.github.token.is_none());
    }

    #[test]
    fn test_user_config_path_returns_some() {
        if let Some(p) = UserConfig::user_config_path() {
            assert!(p.ends_with("devscore/config.toml"));
        }
    }
}
