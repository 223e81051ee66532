//! Output reporters for devscore results
//!
//! Supports two output formats:
//! - `text` - Terminal output with colors, scores rounded to two decimals
//! - `json` - Machine-readable JSON at full precision

mod json;
mod text;

use crate::scoring::ScoreReport;
use anyhow::{anyhow, Result};
use std::str::FromStr;

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" | "terminal" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(anyhow!("Unknown format '{}'. Valid formats: text, json", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Render a score report using an OutputFormat enum
pub fn report_with_format(report: &ScoreReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => text::render(report),
        OutputFormat::Json => json::render(report),
    }
}

/// Render a ranked comparison of several users
pub fn comparison_with_format(reports: &[ScoreReport], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => text::render_comparison(reports),
        OutputFormat::Json => json::render_comparison(reports),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::{Commit, UserActivity};
    use crate::scoring::{score_activity, Scheme};
    use chrono::{Duration, TimeZone, Utc};

    /// Create a small advanced-scheme ScoreReport for testing
    pub(crate) fn test_report() -> ScoreReport {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let mut activity = UserActivity::empty("octocat");
        for i in 0..12 {
            activity.commits.push(Commit {
                repo: format!("octocat/r{}", i % 3),
                author: Some("octocat".into()),
                timestamp: (now - Duration::days(i * 3)).to_rfc3339(),
                message: "feat(api): add pagination to listing #7".into(),
            });
        }
        score_activity(&activity, Scheme::Advanced, now)
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!(OutputFormat::from_str("text").unwrap(), OutputFormat::Text);
        assert_eq!(OutputFormat::from_str("JSON").unwrap(), OutputFormat::Json);
        assert!(OutputFormat::from_str("sarif").is_err());
    }

    #[test]
    fn test_report_with_format() {
        let report = test_report();
        let json = report_with_format(&report, OutputFormat::Json).unwrap();
        assert!(json.starts_with('{'));
        let text = report_with_format(&report, OutputFormat::Text).unwrap();
        assert!(text.contains("octocat"));
    }
}
