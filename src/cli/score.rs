//! Score command handler

use super::resolve_scheme;
use crate::config::Config;
use crate::models::UserActivity;
use crate::pipeline::Pipeline;
use crate::reporters::{self, OutputFormat};
use anyhow::{Context, Result};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

pub fn run(
    config: &Config,
    username: Option<&str>,
    scheme: Option<&str>,
    format: &str,
    input: Option<&Path>,
    output: Option<&Path>,
) -> Result<()> {
    let scheme = resolve_scheme(config, scheme)?;
    let format = OutputFormat::from_str(format)?;
    let pipeline = Pipeline::from_config(config);

    let report = match input {
        Some(path) => {
            let activity = load_snapshot(path)?;
            if let Some(name) = username {
                if !name.eq_ignore_ascii_case(activity.login()) {
                    warn!(
                        "Snapshot {} belongs to '{}', not '{}'",
                        path.display(),
                        activity.login(),
                        name
                    );
                }
            }
            pipeline.score_activity(&activity, scheme)
        }
        None => {
            // required by clap unless --input is given
            let name = username.context("A username is required without --input")?;
            let spinner = spinner(&format!("Fetching GitHub activity for {}...", name))?;
            let result = pipeline.score_user(name, scheme);
            spinner.finish_and_clear();
            result?
        }
    };

    let rendered = reporters::report_with_format(&report, format)?;
    match output {
        Some(path) => {
            std::fs::write(path, &rendered)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            println!(
                "{}Report written to: {}",
                style("✅ ").green(),
                path.display()
            );
        }
        None => println!("{}", rendered),
    }
    Ok(())
}

/// Read a `devscore snapshot` file
pub fn load_snapshot(path: &Path) -> Result<UserActivity> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read snapshot {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Invalid snapshot {}", path.display()))
}

pub(super) fn spinner(message: &str) -> Result<ProgressBar> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
            .template("{spinner:.green} {msg}")?,
    );
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    Ok(spinner)
}
