//! Advanced scheme: eight commit/issue/PR heuristics with activity damping
//!
//! ```text
//! weighted = Σ component_score × weight
//! final    = weighted × min(1, (commits + pull_requests + issues) / 50)
//! ```
//!
//! The damping factor keeps a user with a handful of well-written commits
//! from reaching the same score as a user with years of steady work.

use super::aggregate::{evaluate, AggregateScore, Component, ComponentScore, ScoringContext};
use super::components;
use serde::Serialize;

/// Activity count at which damping stops
pub const ACTIVITY_TARGET: f64 = 50.0;

/// Top-level weights of the advanced scheme
pub const ADVANCED_COMPONENTS: &[Component] = &[
    Component {
        name: "commit_frequency",
        weight: 0.15,
        score: commit_frequency,
    },
    Component {
        name: "commit_size",
        weight: 0.10,
        score: commit_size,
    },
    Component {
        name: "code_quality",
        weight: 0.20,
        score: code_quality,
    },
    Component {
        name: "project_diversity",
        weight: 0.10,
        score: project_diversity,
    },
    Component {
        name: "issue_engagement",
        weight: 0.10,
        score: issue_engagement,
    },
    Component {
        name: "pr_quality",
        weight: 0.15,
        score: pr_quality,
    },
    Component {
        name: "review_participation",
        weight: 0.10,
        score: review_participation,
    },
    Component {
        name: "documentation",
        weight: 0.10,
        score: documentation,
    },
];

fn commit_frequency(ctx: &ScoringContext<'_>) -> ComponentScore {
    components::commit_frequency(&ctx.activity.commits, &ctx.decay, ctx.now)
}

fn commit_size(ctx: &ScoringContext<'_>) -> ComponentScore {
    components::commit_size(&ctx.activity.commits, &ctx.decay, ctx.now)
}

fn code_quality(ctx: &ScoringContext<'_>) -> ComponentScore {
    components::code_quality(&ctx.activity.commits, &ctx.decay, ctx.now)
}

fn project_diversity(ctx: &ScoringContext<'_>) -> ComponentScore {
    components::project_diversity(&ctx.activity.commits)
}

fn issue_engagement(ctx: &ScoringContext<'_>) -> ComponentScore {
    components::issue_engagement(&ctx.activity.issues, &ctx.decay, ctx.now)
}

fn pr_quality(ctx: &ScoringContext<'_>) -> ComponentScore {
    components::pull_request_quality(&ctx.activity.pull_requests, &ctx.decay, ctx.now)
}

fn review_participation(_ctx: &ScoringContext<'_>) -> ComponentScore {
    components::review_participation()
}

fn documentation(ctx: &ScoringContext<'_>) -> ComponentScore {
    components::documentation(&ctx.activity.commits, &ctx.decay, ctx.now)
}

/// Damping applied on top of the weighted sum
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ActivityDamping {
    /// Commits + pull requests + issues
    pub activity_count: usize,
    /// `min(1, activity_count / 50)`
    pub activity_factor: f64,
    /// Weighted sum before damping
    pub weighted_score: f64,
}

/// Result of the advanced scheme
#[derive(Debug, Clone)]
pub struct AdvancedScore {
    pub aggregate: AggregateScore,
    pub damping: ActivityDamping,
    pub final_score: f64,
}

pub fn activity_factor(activity_count: usize) -> f64 {
    (activity_count as f64 / ACTIVITY_TARGET).min(1.0)
}

/// Run every advanced component and apply activity damping
pub fn score(ctx: &ScoringContext<'_>) -> AdvancedScore {
    let aggregate = evaluate(ADVANCED_COMPONENTS, ctx);
    let activity_count = ctx.activity.activity_count();
    let factor = activity_factor(activity_count);
    let final_score = aggregate.weighted_score * factor;

    AdvancedScore {
        damping: ActivityDamping {
            activity_count,
            activity_factor: factor,
            weighted_score: aggregate.weighted_score,
        },
        aggregate,
        final_score,
    }
}
