//! Compare command handler

use super::resolve_scheme;
use crate::config::Config;
use crate::pipeline::Pipeline;
use crate::reporters::{self, OutputFormat};
use anyhow::Result;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::str::FromStr;

pub fn run(
    config: &Config,
    usernames: &[String],
    scheme: Option<&str>,
    format: &str,
) -> Result<()> {
    let scheme = resolve_scheme(config, scheme)?;
    let format = OutputFormat::from_str(format)?;
    let pipeline = Pipeline::from_config(config);

    let bar = ProgressBar::new(usernames.len() as u64);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("█▓▒░  "),
    );

    let mut failed = Vec::new();
    let reports = pipeline.compare_with(usernames, scheme, |name, ok| {
        if !ok {
            failed.push(name.to_string());
        }
        bar.set_message(name.to_string());
        bar.inc(1);
    });
    bar.finish_and_clear();

    println!("{}", reporters::comparison_with_format(&reports, format)?);

    if !failed.is_empty() && format == OutputFormat::Text {
        println!(
            "{}Skipped {} user(s): {}",
            style("⚠️  ").yellow(),
            failed.len(),
            failed.join(", ")
        );
    }
    Ok(())
}
