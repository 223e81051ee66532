//! Text (terminal) reporter with colors and formatting

use crate::scoring::{Rating, ScoreReport};
use anyhow::Result;

/// Rating colors (ANSI escape codes)
fn rating_color(rating: Rating) -> &'static str {
    match rating {
        Rating::Outstanding | Rating::Exceptional => "\x1b[32m", // Green
        Rating::Excellent | Rating::VeryGood => "\x1b[92m",      // Light green
        Rating::Strong | Rating::Good => "\x1b[33m",             // Yellow
        Rating::Promising | Rating::Developing => "\x1b[91m",    // Light red
        Rating::Beginner => "\x1b[90m",                          // Gray
    }
}

/// Reset ANSI color
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";

const BAR_WIDTH: usize = 20;

/// Render report as formatted terminal output
pub fn render(report: &ScoreReport) -> Result<String> {
    let mut out = String::new();
    let color = rating_color(report.rating);

    // Header
    out.push_str(&format!(
        "\n{BOLD}devscore{RESET} · {} {DIM}({} scheme){RESET}\n",
        report.username, report.scheme
    ));
    out.push_str(&format!(
        "{DIM}──────────────────────────────────────{RESET}\n"
    ));
    out.push_str(&format!(
        "Score: {BOLD}{:.2}{RESET}  Rating: {color}{BOLD}{}{RESET}\n",
        report.final_score, report.rating
    ));

    if let Some(d) = &report.damping {
        out.push_str(&format!(
            "{DIM}Weighted {:.2} × activity factor {:.2} ({} commits/PRs/issues){RESET}\n",
            d.weighted_score, d.activity_factor, d.activity_count
        ));
    }
    out.push('\n');

    // Components
    out.push_str(&format!("{BOLD}COMPONENTS{RESET}\n"));
    let name_width = report
        .components
        .iter()
        .map(|c| c.name.len())
        .max()
        .unwrap_or(0);
    for c in &report.components {
        out.push_str(&format!(
            "  {:<width$}  {}  {:.2}  {DIM}(weight {:.2}){RESET}\n",
            c.name,
            bar(c.score),
            c.score,
            c.weight,
            width = name_width
        ));
        if !c.metrics.is_empty() {
            let details: Vec<String> = c
                .metrics
                .iter()
                .map(|(k, v)| format!("{}={}", k, format_metric(*v)))
                .collect();
            out.push_str(&format!(
                "  {:<width$}  {DIM}{}{RESET}\n",
                "",
                details.join(" "),
                width = name_width
            ));
        }
    }
    out.push('\n');

    // Stats
    let s = &report.stats;
    out.push_str(&format!("{BOLD}PROFILE{RESET}\n"));
    out.push_str(&format!(
        "  Repositories: {}  Stars: {}  Forks: {}  Events: {}\n",
        s.total_repositories, s.total_stars, s.total_forks, s.total_contributions
    ));
    if !s.languages.is_empty() {
        let mut langs: Vec<(&String, &f64)> = s.languages.iter().collect();
        langs.sort_by(|a, b| b.1.total_cmp(a.1).then_with(|| a.0.cmp(b.0)));
        let top: Vec<String> = langs
            .iter()
            .take(5)
            .map(|(lang, pct)| format!("{} {:.0}%", lang, pct))
            .collect();
        out.push_str(&format!("  Languages: {}\n", top.join(", ")));
    }
    let week: usize = s
        .activity_trend
        .iter()
        .map(|p| p.commits + p.pull_requests + p.issues)
        .sum();
    if week > 0 {
        out.push_str("  Last 7 days:");
        for p in &s.activity_trend {
            out.push_str(&format!(
                " {}:{}",
                &p.date[5..],
                p.commits + p.pull_requests + p.issues
            ));
        }
        out.push('\n');
    }

    Ok(out)
}

/// Render a ranked comparison table
pub fn render_comparison(reports: &[ScoreReport]) -> Result<String> {
    let mut out = String::new();
    out.push_str(&format!("\n{BOLD}devscore comparison{RESET}\n"));
    out.push_str(&format!(
        "{DIM}──────────────────────────────────────{RESET}\n"
    ));

    if reports.is_empty() {
        out.push_str("No users could be scored.\n");
        return Ok(out);
    }

    let name_width = reports
        .iter()
        .map(|r| r.username.len())
        .max()
        .unwrap_or(0)
        .max("user".len());

    out.push_str(&format!(
        "{BOLD}  #  {:<width$}  score  rating{RESET}\n",
        "user",
        width = name_width
    ));
    for (i, r) in reports.iter().enumerate() {
        let color = rating_color(r.rating);
        out.push_str(&format!(
            "  {:<2} {:<width$}  {:.2}   {color}{}{RESET}\n",
            i + 1,
            r.username,
            r.final_score,
            r.rating,
            width = name_width
        ));
        let parts: Vec<String> = r
            .components
            .iter()
            .map(|c| format!("{} {:.2}", c.name, c.score))
            .collect();
        out.push_str(&format!(
            "     {:<width$}  {DIM}{}{RESET}\n",
            "",
            parts.join(" · "),
            width = name_width
        ));
    }

    Ok(out)
}

fn bar(score: f64) -> String {
    let filled = ((score.clamp(0.0, 1.0) * BAR_WIDTH as f64).round() as usize).min(BAR_WIDTH);
    format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled))
}

/// Whole numbers without decimals, fractions at two decimals
fn format_metric(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e9 {
        format!("{}", value as i64)
    } else {
        format!("{:.2}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporters::tests::test_report;

    #[test]
    fn test_render_rounds_to_two_decimals() {
        let mut report = test_report();
        report.final_score = 0.123456;
        let out = render(&report).unwrap();
        assert!(out.contains("0.12"));
        assert!(!out.contains("0.1234"));
    }

    #[test]
    fn test_render_lists_components_and_damping() {
        let out = render(&test_report()).unwrap();
        assert!(out.contains("commit_frequency"));
        assert!(out.contains("review_participation"));
        assert!(out.contains("activity factor"));
        assert!(out.contains("octocat"));
    }

    #[test]
    fn test_comparison_empty() {
        let out = render_comparison(&[]).unwrap();
        assert!(out.contains("No users could be scored"));
    }

    #[test]
    fn test_comparison_rows() {
        let out = render_comparison(&[test_report()]).unwrap();
        assert!(out.contains("octocat"));
        assert!(out.contains(test_report().rating.label()));
    }

    #[test]
    fn test_bar_and_metric_format() {
        assert_eq!(bar(0.0).chars().filter(|c| *c == '█').count(), 0);
        assert_eq!(bar(1.0).chars().filter(|c| *c == '█').count(), BAR_WIDTH);
        assert_eq!(format_metric(3.0), "3");
        assert_eq!(format_metric(0.256), "0.26");
    }
}
