//! Weighted aggregation shared by both scoring schemes
//!
//! A scheme is a static table of components. Each component has a name, a
//! top-level weight and a function that turns the scoring context into a
//! [`ComponentScore`]. Evaluating the table produces an [`AggregateScore`]
//! holding every component's score, weight and sub-metrics together with
//! the weighted sum.

use crate::decay::TimeDecay;
use crate::models::UserActivity;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// Allowed drift when checking that weights sum to 1.0
pub const WEIGHT_TOLERANCE: f64 = 1e-6;

/// Read-only inputs of one scoring pass
#[derive(Debug, Clone, Copy)]
pub struct ScoringContext<'a> {
    pub activity: &'a UserActivity,
    pub now: DateTime<Utc>,
    pub decay: TimeDecay,
}

impl<'a> ScoringContext<'a> {
    pub fn new(activity: &'a UserActivity, now: DateTime<Utc>) -> Self {
        Self {
            activity,
            now,
            decay: TimeDecay::default(),
        }
    }
}

/// Score of one component plus its named sub-metrics
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ComponentScore {
    pub score: f64,
    pub metrics: BTreeMap<String, f64>,
}

impl ComponentScore {
    /// Plain score without sub-metrics, clamped to [0, 1]
    pub fn new(score: f64) -> Self {
        Self {
            score: clamp_unit(score),
            metrics: BTreeMap::new(),
        }
    }

    pub fn with_metric(mut self, name: &str, value: f64) -> Self {
        self.metrics.insert(name.to_string(), value);
        self
    }

    /// Weighted sum of `(name, weight, value)` sub-metrics.
    ///
    /// Every sub-metric value is recorded under its name.
    pub fn weighted(parts: &[(&str, f64, f64)]) -> Self {
        let score = parts.iter().map(|(_, weight, value)| weight * value).sum();
        let metrics = parts
            .iter()
            .map(|(name, _, value)| (name.to_string(), *value))
            .collect();
        Self {
            score: clamp_unit(score),
            metrics,
        }
    }

    pub fn metric(&self, name: &str) -> Option<f64> {
        self.metrics.get(name).copied()
    }
}

/// Scores one component from the context
pub type ScoreFn = fn(&ScoringContext<'_>) -> ComponentScore;

/// Entry of a scheme's weight table
#[derive(Clone, Copy)]
pub struct Component {
    pub name: &'static str,
    pub weight: f64,
    pub score: ScoreFn,
}

impl std::fmt::Debug for Component {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Component")
            .field("name", &self.name)
            .field("weight", &self.weight)
            .finish()
    }
}

/// Sum of top-level weights
pub fn weight_sum(table: &[Component]) -> f64 {
    table.iter().map(|c| c.weight).sum()
}

/// Weights sum to 1.0 within [`WEIGHT_TOLERANCE`]
pub fn is_valid(table: &[Component]) -> bool {
    (weight_sum(table) - 1.0).abs() < WEIGHT_TOLERANCE
}

/// Sum of sub-metric weights (for the `(name, weight)` tables of each component)
pub fn sub_weight_sum(weights: &[(&str, f64)]) -> f64 {
    weights.iter().map(|(_, w)| w).sum()
}

/// One evaluated component
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeightedComponent {
    pub name: String,
    pub score: f64,
    pub weight: f64,
    pub metrics: BTreeMap<String, f64>,
}

impl WeightedComponent {
    pub fn contribution(&self) -> f64 {
        self.score * self.weight
    }
}

/// All components of a scheme and their weighted sum
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AggregateScore {
    pub components: Vec<WeightedComponent>,
    pub weighted_score: f64,
}

impl AggregateScore {
    pub fn get(&self, name: &str) -> Option<&WeightedComponent> {
        self.components.iter().find(|c| c.name == name)
    }
}

/// Evaluate every component of a table against the context
pub fn evaluate(table: &[Component], ctx: &ScoringContext<'_>) -> AggregateScore {
    let components: Vec<WeightedComponent> = table
        .iter()
        .map(|component| {
            let result = (component.score)(ctx);
            WeightedComponent {
                name: component.name.to_string(),
                score: result.score,
                weight: component.weight,
                metrics: result.metrics,
            }
        })
        .collect();

    let weighted_score = components.iter().map(WeightedComponent::contribution).sum();

    AggregateScore {
        components,
        weighted_score,
    }
}

/// Clamp to [0, 1], mapping NaN to 0
pub fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}
