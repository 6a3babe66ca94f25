//! Deterministic scoring rules.
//!
//! Response values are on a 1..=10 scale; dimension scores are on 0..=100.

use crate::models::{AssessmentResponse, DimensionAnalysis};

/// A spread above this many scale points marks a dimension as mixed.
pub const VARIANCE_THRESHOLD: i64 = 3;

/// Pattern emitted when answers diverge.
pub const HIGH_VARIANCE_PATTERN: &str = "High variance in responses indicates mixed experiences";

/// Pattern emitted when answers agree.
pub const CONSISTENT_PATTERN: &str = "Consistent responses indicate aligned experiences";

/// Canonical dimension weights.
pub const DIMENSION_WEIGHTS: [(&str, f64); 6] = [
    ("leadership", 0.20),
    ("engagement", 0.25),
    ("culture", 0.20),
    ("communication", 0.15),
    ("innovation", 0.10),
    ("agility", 0.10),
];

/// Round to a fixed number of decimal places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// `(mean / 10) * 100`, one decimal. `None` for an empty slice.
pub fn normalized_score(responses: &[AssessmentResponse]) -> Option<f64> {
    if responses.is_empty() {
        return None;
    }

    let total: i64 = responses.iter().map(|r| r.value).sum();
    let mean = total as f64 / responses.len() as f64;

    Some(round_to(mean / 10.0 * 100.0, 1))
}

/// Spread between the highest and lowest answer.
pub fn value_spread(responses: &[AssessmentResponse]) -> i64 {
    let max = responses.iter().map(|r| r.value).max();
    let min = responses.iter().map(|r| r.value).min();

    match (max, min) {
        (Some(max), Some(min)) => max - min,
        _ => 0,
    }
}

/// Variance pattern signal for a dimension's answers.
pub fn variance_pattern(responses: &[AssessmentResponse]) -> &'static str {
    if value_spread(responses) > VARIANCE_THRESHOLD {
        HIGH_VARIANCE_PATTERN
    } else {
        CONSISTENT_PATTERN
    }
}

/// Weight of a dimension; unknown dimensions get `1 / analyzed_count`.
pub fn dimension_weight(dimension_id: &str, analyzed_count: usize) -> f64 {
    DIMENSION_WEIGHTS
        .iter()
        .find(|(id, _)| *id == dimension_id)
        .map(|(_, weight)| *weight)
        .unwrap_or_else(|| 1.0 / analyzed_count.max(1) as f64)
}

/// Weighted overall score over the analyzed dimensions, one decimal.
///
/// Weights are not renormalized when fallback weights are mixed in.
pub fn overall_score(analyses: &[DimensionAnalysis]) -> f64 {
    overall_score_from_pairs(analyses.iter().map(|a| (a.dimension_id.as_str(), a.score)))
}

/// Same as [`overall_score`] for plain `(dimension, score)` pairs.
pub fn overall_score_from_pairs<'a>(scores: impl IntoIterator<Item = (&'a str, f64)>) -> f64 {
    let scores: Vec<(&str, f64)> = scores.into_iter().collect();
    let count = scores.len();
    let total: f64 = scores
        .iter()
        .map(|(id, score)| score * dimension_weight(id, count))
        .sum();

    round_to(total, 1)
}
