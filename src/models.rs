//! Data models for the assessment core.
//!
//! This module contains the value types that flow through a run: raw
//! responses, per-dimension analyses, aggregated insights and the final
//! `AssessmentResult`.

use crate::dimensions::AgentKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Lowest accepted response value.
pub const MIN_RESPONSE_VALUE: i64 = 1;
/// Highest accepted response value.
pub const MAX_RESPONSE_VALUE: i64 = 10;

/// A single survey answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentResponse {
    /// Dimension this answer belongs to.
    pub dimension_id: String,
    /// Question identifier (e.g. `L1`).
    pub question_id: String,
    /// Answer on the 1..=10 scale.
    pub value: i64,
    /// Free text context for the question.
    #[serde(default)]
    pub context: String,
    /// Agent the intake layer associated with the answer, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_agent: Option<AgentKind>,
}

impl AssessmentResponse {
    pub fn new(dimension_id: &str, question_id: &str, value: i64, context: &str) -> Self {
        Self {
            dimension_id: dimension_id.to_string(),
            question_id: question_id.to_string(),
            value,
            context: context.to_string(),
            source_agent: None,
        }
    }

    /// Attach the agent the answer was routed to.
    pub fn with_source(mut self, agent: AgentKind) -> Self {
        self.source_agent = Some(agent);
        self
    }
}

/// Output of a primary `analyze` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentAnalysis {
    pub agent: AgentKind,
    /// Normalized score, 0..=100.
    pub score: f64,
    pub insights: Vec<String>,
    pub recommendations: Vec<String>,
    pub patterns: Vec<String>,
    /// Agent confidence, 0..=1.
    pub confidence: f64,
}

/// Outcome of a secondary `validate` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationStatus {
    Confirmed,
    Unavailable,
}

/// Output of a secondary `validate` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Validation {
    pub agent: AgentKind,
    pub status: ValidationStatus,
    pub additional_insights: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub enhancement_suggestions: Vec<String>,
}

impl Validation {
    /// Empty validation for an agent that could not respond.
    pub fn unavailable(agent: AgentKind) -> Self {
        Self {
            agent,
            status: ValidationStatus::Unavailable,
            additional_insights: Vec::new(),
            enhancement_suggestions: Vec::new(),
        }
    }

    pub fn is_available(&self) -> bool {
        self.status == ValidationStatus::Confirmed
    }
}

/// Per-agent provenance of a dimension analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentProvenance {
    pub primary: AgentAnalysis,
    /// Why the primary agent's own analysis was replaced by a placeholder.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_error: Option<String>,
    pub secondary: Vec<Validation>,
}

/// Merged analysis of one dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionAnalysis {
    pub dimension_id: String,
    /// Score on the 0..=100 scale.
    pub score: f64,
    pub insights: Vec<String>,
    pub recommendations: Vec<String>,
    pub patterns: Vec<String>,
    pub confidence: f64,
    /// True when every agent for the dimension failed.
    pub degraded: bool,
    pub agent_analysis: AgentProvenance,
}

/// Classification of a dimension for the organization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    Strength,
    Opportunity,
    Critical,
}

impl InsightKind {
    /// `> 80` is a strength, `< 60` is critical, everything else an opportunity.
    pub fn from_score(score: f64) -> Self {
        if score > 80.0 {
            InsightKind::Strength
        } else if score < 60.0 {
            InsightKind::Critical
        } else {
            InsightKind::Opportunity
        }
    }

    /// Returns an emoji representation of the kind.
    pub fn emoji(&self) -> &'static str {
        match self {
            InsightKind::Strength => "🟢",
            InsightKind::Opportunity => "🟡",
            InsightKind::Critical => "🔴",
        }
    }
}

impl fmt::Display for InsightKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InsightKind::Strength => write!(f, "strength"),
            InsightKind::Opportunity => write!(f, "opportunity"),
            InsightKind::Critical => write!(f, "critical"),
        }
    }
}

/// A dimension-level finding for the organization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrganizationalInsight {
    pub kind: InsightKind,
    pub source_agent: AgentKind,
    pub dimension: String,
    pub text: String,
    pub confidence: f64,
    pub supporting_data: Vec<String>,
    pub recommended_actions: Vec<String>,
}

/// Direction of a cross-dimension correlation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CorrelationKind {
    Positive,
    Negative,
}

/// Relationship between two dimensions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Correlation {
    pub dimensions: [String; 2],
    /// Strength in -1..=1.
    pub strength: f64,
    #[serde(rename = "type")]
    pub kind: CorrelationKind,
    pub insight: String,
}

/// Output of cross-dimension pattern detection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CrossDimensionPatterns {
    pub correlations: Vec<Correlation>,
    pub anomalies: Vec<String>,
    pub trends: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_effects: Option<String>,
}

/// Resources a strategic plan calls for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRequirements {
    pub budget: String,
    pub timeline: String,
    pub key_roles: Vec<String>,
}

/// Tiered action plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategicPlan {
    pub immediate_actions: Vec<String>,
    pub medium_term_initiatives: Vec<String>,
    pub long_term_strategy: Vec<String>,
    pub resource_requirements: ResourceRequirements,
}

/// Session plan for the follow-up workshop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkshopPlan {
    pub recommended_format: String,
    pub key_participants: Vec<String>,
    pub agenda: Vec<String>,
    pub materials_needed: Vec<String>,
    pub expected_outcomes: Vec<String>,
}

/// First-year ROI figures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearOneRoi {
    pub roi_percentage: i64,
    pub total_benefits: i64,
    pub implementation_cost: i64,
    pub net_benefit: i64,
}

/// Three-year ROI figures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreeYearRoi {
    pub roi_percentage: i64,
    pub cumulative_benefits: i64,
    pub cumulative_costs: i64,
    pub net_benefit: i64,
}

/// Components of the ROI model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoiBreakdown {
    pub turnover_savings: i64,
    pub productivity_value: i64,
    /// Percentage points, one decimal.
    pub engagement_improvement: f64,
    /// Percentage points, one decimal.
    pub turnover_reduction: f64,
}

/// Full ROI projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoiProjection {
    pub year_one: YearOneRoi,
    pub three_year: ThreeYearRoi,
    pub breakdown: RoiBreakdown,
}

/// How one agent contributed to a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentContribution {
    pub focus: String,
    pub primary_dimensions: Vec<String>,
    pub secondary_dimensions: Vec<String>,
    pub insights_generated: usize,
}

/// The complete output of one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentResult {
    pub overall_score: f64,
    pub dimension_scores: BTreeMap<String, f64>,
    pub dimension_analyses: Vec<DimensionAnalysis>,
    pub insights: Vec<OrganizationalInsight>,
    pub recommendations: StrategicPlan,
    pub roi_projections: RoiProjection,
    pub patterns: CrossDimensionPatterns,
    pub workshop_plan: WorkshopPlan,
    pub agent_contributions: BTreeMap<String, AgentContribution>,
    pub timestamp: DateTime<Utc>,
}

impl AssessmentResult {
    /// Ids of dimensions whose agents all failed.
    pub fn degraded_dimensions(&self) -> Vec<&str> {
        self.dimension_analyses
            .iter()
            .filter(|a| a.degraded)
            .map(|a| a.dimension_id.as_str())
            .collect()
    }

    /// Insights of a given kind.
    pub fn insights_of_kind(&self, kind: InsightKind) -> Vec<&OrganizationalInsight> {
        self.insights.iter().filter(|i| i.kind == kind).collect()
    }
}

/// Uppercase the first character for headings and agenda titles.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insight_kind_thresholds() {
        assert_eq!(InsightKind::from_score(80.1), InsightKind::Strength);
        assert_eq!(InsightKind::from_score(80.0), InsightKind::Opportunity);
        assert_eq!(InsightKind::from_score(60.0), InsightKind::Opportunity);
        assert_eq!(InsightKind::from_score(59.9), InsightKind::Critical);
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("engagement"), "Engagement");
        assert_eq!(capitalize("strength"), "Strength");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn test_insight_kind_display_and_emoji() {
        assert_eq!(InsightKind::Critical.to_string(), "critical");
        assert_eq!(InsightKind::Strength.emoji(), "🟢");
    }

    #[test]
    fn test_response_deserializes_without_optional_fields() {
        let json = r#"{"dimension_id": "culture", "question_id": "C1", "value": 3}"#;
        let response: AssessmentResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.dimension_id, "culture");
        assert_eq!(response.value, 3);
        assert!(response.context.is_empty());
        assert!(response.source_agent.is_none());
    }

    #[test]
    fn test_response_with_source() {
        let response = AssessmentResponse::new("leadership", "L1", 4, "Vision Communication")
            .with_source(AgentKind::StrategySpecialist);
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"source_agent\":\"strategy-specialist\""));
    }

    #[test]
    fn test_validation_unavailable() {
        let validation = Validation::unavailable(AgentKind::PatternSpecialist);
        assert!(!validation.is_available());
        assert!(validation.additional_insights.is_empty());
    }

    #[test]
    fn test_correlation_serializes_type_field() {
        let correlation = Correlation {
            dimensions: ["leadership".to_string(), "engagement".to_string()],
            strength: 0.78,
            kind: CorrelationKind::Positive,
            insight: "together".to_string(),
        };
        let json = serde_json::to_string(&correlation).unwrap();
        assert!(json.contains("\"type\":\"positive\""));
    }
}
