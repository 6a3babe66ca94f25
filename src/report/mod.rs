//! Report generation.
//!
//! An [`AssessmentReport`] wraps a run's result with the metadata a reader
//! needs; the generator renders it as Markdown or JSON.

pub mod generator;

pub use generator::write_report;

use crate::models::AssessmentResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Facts about the run that produced a result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub organization: String,
    pub analysis_date: DateTime<Utc>,
    /// Agent provider (`heuristic` or `ollama`).
    pub provider: String,
    /// Model name when a model-backed provider was used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    pub session_id: Uuid,
    pub total_responses: usize,
    pub dimensions_analyzed: usize,
    #[serde(default)]
    pub degraded_dimensions: Vec<String>,
    pub duration_seconds: f64,
}

/// A complete report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentReport {
    pub metadata: ReportMetadata,
    pub result: AssessmentResult,
}

/// `12150000` -> `$12,150,000`.
pub fn format_currency(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if amount < 0 {
        format!("-${}", grouped)
    } else {
        format!("${}", grouped)
    }
}
