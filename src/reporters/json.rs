//! JSON reporter
//!
//! Outputs the full ScoreReport as pretty-printed JSON.
//! Useful for machine consumption, piping to jq, or further processing.

use crate::scoring::{Rating, ScoreReport};
use anyhow::Result;
use serde::Serialize;
use std::collections::BTreeMap;

/// Render report as JSON
pub fn render(report: &ScoreReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

#[derive(Serialize)]
struct RankedEntry<'a> {
    rank: usize,
    username: &'a str,
    final_score: f64,
    rating: Rating,
    components: BTreeMap<&'a str, f64>,
}

/// Render a ranked comparison as a JSON array
pub fn render_comparison(reports: &[ScoreReport]) -> Result<String> {
    let entries: Vec<RankedEntry<'_>> = reports
        .iter()
        .enumerate()
        .map(|(i, r)| RankedEntry {
            rank: i + 1,
            username: &r.username,
            final_score: r.final_score,
            rating: r.rating,
            components: r
                .components
                .iter()
                .map(|c| (c.name.as_str(), c.score))
                .collect(),
        })
        .collect();
    Ok(serde_json::to_string_pretty(&entries)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporters::tests::test_report;

    #[test]
    fn test_json_render_valid() {
        let report = test_report();
        let json_str = render(&report).expect("render JSON");
        let parsed: serde_json::Value = serde_json::from_str(&json_str).expect("parse JSON");
        assert_eq!(parsed["username"], "octocat");
        assert_eq!(parsed["scheme"], "advanced");
        assert_eq!(parsed["activity_count"], 12);
        assert_eq!(parsed["components"].as_array().expect("components").len(), 8);
        assert!(parsed["stats"]["activity_trend"].is_array());
    }

    #[test]
    fn test_json_keeps_full_precision() {
        let report = test_report();
        let parsed: serde_json::Value = serde_json::from_str(&render(&report).unwrap()).unwrap();
        let score = parsed["final_score"].as_f64().unwrap();
        assert_eq!(score, report.final_score);
    }

    #[test]
    fn test_comparison_ranks() {
        let mut second = test_report();
        second.username = "second".into();
        second.final_score = 0.01;
        let reports = vec![test_report(), second];

        let parsed: serde_json::Value =
            serde_json::from_str(&render_comparison(&reports).unwrap()).unwrap();
        assert_eq!(parsed[0]["rank"], 1);
        assert_eq!(parsed[1]["username"], "second");
        assert!(parsed[0]["components"]["code_quality"].is_number());
    }
}
