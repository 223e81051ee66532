//! CLI command definitions and handlers

mod compare;
mod score;
mod serve;
mod snapshot;

use crate::config::{Config, UserConfig};
use anyhow::Result;
use clap::{Parser, Subcommand};
use console::style;
use std::path::PathBuf;

/// devscore - GitHub developer activity scoring
#[derive(Parser, Debug)]
#[command(name = "devscore")]
#[command(
    version,
    about = "Score a GitHub user's public activity with weighted, time-decayed heuristics",
    long_about = "devscore fetches a GitHub user's repositories, commits, pull requests, \
issues and public events, and turns them into a developer score between 0 and 1 \
with a per-component breakdown and a rating label.\n\n\
Two scoring schemes are available:\n  \
model     contribution, repository significance, code quality, community (default)\n  \
advanced  eight commit/issue/PR heuristics with time decay and activity damping\n\n\
Set GITHUB_TOKEN to raise the API rate limit.",
    after_help = "\
Examples:
  devscore score octocat                        Score a user (model scheme)
  devscore score octocat --scheme advanced      Use the advanced scheme
  devscore score octocat --format json          JSON output for scripting
  devscore compare alice bob carol              Rank several users
  devscore snapshot octocat -o octocat.json     Save activity for offline scoring
  devscore score --input octocat.json           Score a saved snapshot
  devscore serve --port 8001                    Start the HTTP API"
)]
pub struct Cli {
    /// Log level (error, warn, info, debug, trace); RUST_LOG takes priority
    #[arg(
        long,
        global = true,
        default_value = "warn",
        value_parser = ["error", "warn", "info", "debug", "trace"]
    )]
    pub log_level: String,

    /// Config file (default: ~/.config/devscore/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Score one GitHub user
    #[command(after_help = "\
Examples:
  devscore score octocat
  devscore score octocat --scheme advanced --format json
  devscore score octocat -o report.json --format json
  devscore score --input snapshot.json")]
    Score {
        /// GitHub username (optional with --input)
        #[arg(required_unless_present = "input")]
        username: Option<String>,

        /// Scoring scheme (default from config: model)
        #[arg(long, short = 's', value_parser = ["model", "advanced"])]
        scheme: Option<String>,

        /// Output format: text, json
        #[arg(long, short = 'f', default_value = "text", value_parser = ["text", "json"])]
        format: String,

        /// Score a snapshot file instead of fetching from GitHub
        #[arg(long, short = 'i')]
        input: Option<PathBuf>,

        /// Output file path (default: stdout)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Score several users one after another and rank them
    Compare {
        /// GitHub usernames
        #[arg(required = true, num_args = 1..)]
        usernames: Vec<String>,

        /// Scoring scheme (default from config: model)
        #[arg(long, short = 's', value_parser = ["model", "advanced"])]
        scheme: Option<String>,

        /// Output format: text, json
        #[arg(long, short = 'f', default_value = "text", value_parser = ["text", "json"])]
        format: String,
    },

    /// Fetch a user's activity and save it as JSON for offline scoring
    Snapshot {
        /// GitHub username
        username: String,

        /// Snapshot file to write
        #[arg(long, short = 'o')]
        output: PathBuf,
    },

    /// Start the HTTP API
    Serve {
        /// Address to bind (default from config: 0.0.0.0)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (default from config: 8001)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Manage configuration (init or show)
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Show version information
    Version,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Initialize config file with example settings
    Init,
    /// Show the effective config (token masked) and paths
    Show,
}

/// Run the CLI with parsed arguments
pub fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Score {
            username,
            scheme,
            format,
            input,
            output,
        } => {
            let config = Config::load(config_path)?;
            score::run(
                &config,
                username.as_deref(),
                scheme.as_deref(),
                &format,
                input.as_deref(),
                output.as_deref(),
            )
        }

        Commands::Compare {
            usernames,
            scheme,
            format,
        } => {
            let config = Config::load(config_path)?;
            compare::run(&config, &usernames, scheme.as_deref(), &format)
        }

        Commands::Snapshot { username, output } => {
            let config = Config::load(config_path)?;
            snapshot::run(&config, &username, &output)
        }

        Commands::Serve { host, port } => {
            let config = Config::load(config_path)?;
            serve::run(&config, host, port)
        }

        Commands::Config { action } => run_config_action(action, config_path),

        Commands::Version => {
            println!("devscore {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

/// `--scheme` if given, else the configured default
fn resolve_scheme(config: &Config, scheme: Option<&str>) -> Result<crate::scoring::Scheme> {
    match scheme {
        Some(s) => s.parse(),
        None => Ok(config.scheme),
    }
}

fn run_config_action(action: ConfigAction, config_path: Option<&std::path::Path>) -> Result<()> {
    match action {
        ConfigAction::Init => {
            let path = UserConfig::init_user_config()?;
            println!("✅ Config initialized at: {}", path.display());
            println!("\nEdit to add your GitHub token:");
            println!("  {}", path.display());
            println!("\nOr set via environment:");
            println!("  export GITHUB_TOKEN=\"ghp_...\"");
            Ok(())
        }
        ConfigAction::Show => show_config(config_path),
    }
}

fn show_config(config_path: Option<&std::path::Path>) -> Result<()> {
    let config = Config::load(config_path)?;

    println!("📁 Config paths:");
    match config_path {
        Some(path) => println!("  Explicit: {} ✓", path.display()),
        None => {
            if let Some(user_path) = UserConfig::user_config_path() {
                let status = if user_path.exists() { "✓" } else { "(not found)" };
                println!("  User:     {} {}", user_path.display(), status);
            }
        }
    }
    println!();
    println!("{}", style("Effective configuration").bold());
    print!("{}", config.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_score_requires_username_or_input() {
        assert!(Cli::try_parse_from(["devscore", "score"]).is_err());
        assert!(Cli::try_parse_from(["devscore", "score", "octocat"]).is_ok());
        assert!(Cli::try_parse_from(["devscore", "score", "--input", "snap.json"]).is_ok());
    }

    #[test]
    fn test_rejects_unknown_scheme() {
        assert!(Cli::try_parse_from(["devscore", "score", "x", "--scheme", "magic"]).is_err());
    }

    #[test]
    fn test_compare_takes_many_users() {
        let cli = Cli::try_parse_from(["devscore", "compare", "a", "b", "c"]).unwrap();
        match cli.command {
            Commands::Compare { usernames, .. } => assert_eq!(usernames.len(), 3),
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "devscore",
            "version",
            "--log-level",
            "debug",
            "--config",
            "/tmp/x.toml",
        ])
        .unwrap();
        assert_eq!(cli.log_level, "debug");
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/x.toml")));
    }

    #[test]
    fn test_resolve_scheme_prefers_flag() {
        let config = Config::default();
        assert_eq!(
            resolve_scheme(&config, Some("advanced")).unwrap(),
            crate::scoring::Scheme::Advanced
        );
        assert_eq!(resolve_scheme(&config, None).unwrap(), config.scheme);
    }
}
