//! CLI contract tests
//!
//! Runs the built binary against snapshot fixtures so nothing touches the
//! network.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

fn devscore_bin() -> &'static str {
    env!("CARGO_BIN_EXE_devscore")
}

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

/// Config file isolating the run from the user's own config
fn write_config(dir: &Path, body: &str) -> PathBuf {
    let path = dir.join("config.toml");
    std::fs::write(&path, body).unwrap();
    path
}

fn run(config: &Path, args: &[&str]) -> Output {
    Command::new(devscore_bin())
        .args(args)
        .arg("--config")
        .arg(config)
        .env_remove("GITHUB_TOKEN")
        .env_remove("DEVSCORE_API_URL")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to run devscore")
}

#[test]
fn test_help_lists_commands() {
    let output = Command::new(devscore_bin()).arg("--help").output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    for cmd in ["score", "compare", "snapshot", "serve", "config"] {
        assert!(stdout.contains(cmd), "help is missing {cmd}: {stdout}");
    }
}

#[test]
fn test_version_command() {
    let output = Command::new(devscore_bin()).arg("version").output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.trim(), format!("devscore {}", env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_score_snapshot_as_json() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), "");
    let input = fixture("octocat.json");

    let output = run(
        &config,
        &["score", "--input", input.to_str().unwrap(), "--scheme", "advanced", "--format", "json"],
    );
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).expect("stdout is JSON");
    assert_eq!(json["username"], "octocat");
    assert_eq!(json["scheme"], "advanced");
    assert_eq!(json["components"].as_array().unwrap().len(), 8);
    let score = json["final_score"].as_f64().unwrap();
    assert!((0.0..=1.0).contains(&score));
}

#[test]
fn test_scheme_defaults_from_config() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), "[scoring]\nscheme = \"advanced\"\n");
    let input = fixture("octocat.json");

    let output = run(&config, &["score", "--input", input.to_str().unwrap(), "-f", "json"]);
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["scheme"], "advanced");
}

#[test]
fn test_score_writes_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), "");
    let input = fixture("octocat.json");
    let out = dir.path().join("report.json");

    let output = run(
        &config,
        &[
            "score",
            "--input",
            input.to_str().unwrap(),
            "--format",
            "json",
            "-o",
            out.to_str().unwrap(),
        ],
    );
    assert!(output.status.success());

    let content = std::fs::read_to_string(&out).expect("report file written");
    let json: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(json["scheme"], "model");
}

#[test]
fn test_text_report_mentions_rating() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), "");
    let input = fixture("newcomer.json");

    let output = run(&config, &["score", "--input", input.to_str().unwrap()]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("newcomer"));
    assert!(stdout.contains("Beginner"));
}

#[test]
fn test_missing_snapshot_fails() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), "");
    let missing = dir.path().join("nope.json");

    let output = run(&config, &["score", "--input", missing.to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("nope.json"));
}

#[test]
fn test_invalid_config_fails() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), "[scoring]\nscheme = \"magic\"\n");
    let input = fixture("octocat.json");

    let output = run(&config, &["score", "--input", input.to_str().unwrap()]);
    assert!(!output.status.success());
}

#[test]
fn test_config_show_masks_token() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), "[github]\ntoken = \"ghp_supersecret1234\"\n");

    let output = run(&config, &["config", "show"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("1234"));
    assert!(!stdout.contains("supersecret"));
}
