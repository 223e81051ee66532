//! Snapshot command handler

use super::score::spinner;
use crate::config::Config;
use crate::pipeline::Pipeline;
use crate::scoring::DataNeeds;
use anyhow::{Context, Result};
use console::style;
use std::path::Path;

/// Fetch every data class for a user and write it as JSON
pub fn run(config: &Config, username: &str, output: &Path) -> Result<()> {
    let pipeline = Pipeline::from_config(config);

    let spinner = spinner(&format!("Fetching GitHub activity for {}...", username))?;
    let result = pipeline.collect(username, DataNeeds::all());
    spinner.finish_and_clear();
    let activity = result?;

    let json = serde_json::to_string_pretty(&activity)?;
    std::fs::write(output, json)
        .with_context(|| format!("Failed to write snapshot to {}", output.display()))?;

    println!(
        "{}Snapshot of {} written to: {} ({} repos, {} commits, {} PRs, {} issues, {} events)",
        style("✅ ").green(),
        activity.login(),
        output.display(),
        activity.repositories.len(),
        activity.commits.len(),
        activity.pull_requests.len(),
        activity.issues.len(),
        activity.events.len()
    );
    Ok(())
}
