//! Deterministic local agents.
//!
//! `HeuristicAgent` fulfils every capability without leaving the process.
//! It backs the default provider and keeps runs reproducible.

use crate::agent::traits::{DimensionAgent, InsightAnalyst, PatternAnalyst, StrategyAnalyst};
use crate::analysis::aggregator::{mean_score, strongest_dimension, weakest_dimension};
use crate::analysis::scoring::{normalized_score, round_to, variance_pattern, HIGH_VARIANCE_PATTERN};
use crate::dimensions::{AgentKind, DimensionDefinition};
use crate::error::AgentError;
use crate::models::{
    capitalize, AgentAnalysis, AssessmentResponse, Correlation, CorrelationKind,
    CrossDimensionPatterns, DimensionAnalysis, InsightKind, OrganizationalInsight,
    ResourceRequirements, StrategicPlan, Validation, ValidationStatus, WorkshopPlan,
};
use async_trait::async_trait;

/// Confidence reported with a dimension analysis.
pub const ANALYSIS_CONFIDENCE: f64 = 0.85;
/// Confidence reported with an organizational insight.
pub const INSIGHT_CONFIDENCE: f64 = 0.87;

/// Pairs weaker than this are not reported as correlations.
const MIN_CORRELATION_STRENGTH: f64 = 0.5;
/// Score gap that maps to zero correlation.
const CORRELATION_SCALE: f64 = 50.0;
/// Distance from the mean that makes a dimension an anomaly.
const ANOMALY_DISTANCE: f64 = 20.0;

/// Rule-based agent for any specialization.
#[derive(Debug, Clone, Copy)]
pub struct HeuristicAgent {
    kind: AgentKind,
}

impl HeuristicAgent {
    pub fn new(kind: AgentKind) -> Self {
        Self { kind }
    }

    fn insights_for(dimension_id: &str, score: f64) -> Vec<String> {
        if score > 80.0 {
            vec![format!(
                "Strong {} performance indicates organizational strength",
                dimension_id
            )]
        } else if score > 60.0 {
            vec![format!(
                "Moderate {} levels with room for improvement",
                dimension_id
            )]
        } else {
            vec![format!(
                "Significant {} challenges requiring immediate attention",
                dimension_id
            )]
        }
    }

    fn recommendations_for(definition: &DimensionDefinition, score: f64) -> Vec<String> {
        let mut recommendations = if score < 60.0 {
            vec![format!(
                "Implement targeted {} improvement initiatives",
                definition.id
            )]
        } else {
            vec![format!(
                "Maintain and optimize current {} practices",
                definition.id
            )]
        };

        if let Some(factor) = definition.key_factors.iter().next() {
            recommendations.push(format!(
                "Track {} as a leading indicator",
                factor.replace('_', " ")
            ));
        }

        recommendations
    }
}

#[async_trait]
impl DimensionAgent for HeuristicAgent {
    fn kind(&self) -> AgentKind {
        self.kind
    }

    async fn analyze(
        &self,
        definition: &DimensionDefinition,
        responses: &[AssessmentResponse],
    ) -> Result<AgentAnalysis, AgentError> {
        let score = normalized_score(responses).ok_or_else(|| {
            AgentError::InvalidInput(format!("No responses for dimension {}", definition.id))
        })?;

        Ok(AgentAnalysis {
            agent: self.kind,
            score,
            insights: Self::insights_for(&definition.id, score),
            recommendations: Self::recommendations_for(definition, score),
            patterns: vec![variance_pattern(responses).to_string()],
            confidence: ANALYSIS_CONFIDENCE,
        })
    }

    async fn validate(
        &self,
        dimension_id: &str,
        _prior: &AgentAnalysis,
        _responses: &[AssessmentResponse],
    ) -> Validation {
        Validation {
            agent: self.kind,
            status: ValidationStatus::Confirmed,
            additional_insights: vec![format!(
                "Secondary analysis confirms {} findings",
                dimension_id
            )],
            enhancement_suggestions: vec![format!(
                "Consider deeper analysis of {} patterns",
                dimension_id
            )],
        }
    }
}

#[async_trait]
impl PatternAnalyst for HeuristicAgent {
    async fn identify_patterns(
        &self,
        analyses: &[DimensionAnalysis],
    ) -> Result<CrossDimensionPatterns, AgentError> {
        let mean = mean_score(analyses)
            .ok_or_else(|| AgentError::InvalidInput("No dimension analyses".to_string()))?;

        let mut correlations = Vec::new();
        for (i, a) in analyses.iter().enumerate() {
            for b in &analyses[i + 1..] {
                let strength =
                    round_to(1.0 - (a.score - b.score).abs() / CORRELATION_SCALE, 2).clamp(-1.0, 1.0);
                if strength.abs() < MIN_CORRELATION_STRENGTH {
                    continue;
                }

                let (kind, insight) = if strength >= 0.0 {
                    (
                        CorrelationKind::Positive,
                        format!("{} and {} scores move together", a.dimension_id, b.dimension_id),
                    )
                } else {
                    (
                        CorrelationKind::Negative,
                        format!("{} and {} diverge sharply", a.dimension_id, b.dimension_id),
                    )
                };

                correlations.push(Correlation {
                    dimensions: [a.dimension_id.clone(), b.dimension_id.clone()],
                    strength,
                    kind,
                    insight,
                });
            }
        }

        let mut anomalies = Vec::new();
        for analysis in analyses {
            let delta = analysis.score - mean;
            if delta.abs() > ANOMALY_DISTANCE {
                anomalies.push(format!(
                    "{} deviates {:+.1} points from the organizational mean",
                    analysis.dimension_id, delta
                ));
            }
            if analysis.degraded {
                anomalies.push(format!(
                    "{} analysis is degraded; no agent could assess it",
                    analysis.dimension_id
                ));
            }
        }

        let mut trends = Vec::new();
        let mixed: Vec<&str> = analyses
            .iter()
            .filter(|a| a.patterns.iter().any(|p| p == HIGH_VARIANCE_PATTERN))
            .map(|a| a.dimension_id.as_str())
            .collect();
        if !mixed.is_empty() {
            trends.push(format!("Mixed experiences reported in {}", mixed.join(", ")));
        }
        if analyses.len() > 1 {
            if let (Some(strong), Some(weak)) =
                (strongest_dimension(analyses), weakest_dimension(analyses))
            {
                if strong.score > weak.score {
                    trends.push(format!(
                        "{} leads while {} lags",
                        strong.dimension_id, weak.dimension_id
                    ));
                } else {
                    trends.push("Scores are level across all dimensions".to_string());
                }
            }
        }

        let network_effects = analyses
            .iter()
            .any(|a| a.dimension_id == "communication")
            .then(|| "Communication acts as a multiplier for other dimensions".to_string());

        Ok(CrossDimensionPatterns {
            correlations,
            anomalies,
            trends,
            network_effects,
        })
    }
}

#[async_trait]
impl InsightAnalyst for HeuristicAgent {
    async fn generate_insights(
        &self,
        analyses: &[DimensionAnalysis],
        patterns: &CrossDimensionPatterns,
    ) -> Result<Vec<OrganizationalInsight>, AgentError> {
        let insights = analyses
            .iter()
            .map(|analysis| {
                let kind = InsightKind::from_score(analysis.score);

                let mut supporting_data = vec![format!("Score: {:.1}", analysis.score)];
                supporting_data.extend(analysis.patterns.iter().cloned());
                supporting_data.extend(
                    patterns
                        .correlations
                        .iter()
                        .filter(|c| c.dimensions.contains(&analysis.dimension_id))
                        .map(|c| c.insight.clone()),
                );

                let recommended_actions = if analysis.recommendations.is_empty() {
                    vec![format!("Focus on {} improvement", analysis.dimension_id)]
                } else {
                    analysis.recommendations.clone()
                };

                OrganizationalInsight {
                    kind,
                    source_agent: self.kind,
                    dimension: analysis.dimension_id.clone(),
                    text: format!(
                        "Deep analysis reveals {} in {}",
                        match kind {
                            InsightKind::Strength => "a strength",
                            InsightKind::Opportunity => "an opportunity",
                            InsightKind::Critical => "a critical gap",
                        },
                        analysis.dimension_id
                    ),
                    confidence: INSIGHT_CONFIDENCE,
                    supporting_data,
                    recommended_actions,
                }
            })
            .collect();

        Ok(insights)
    }

    async fn prepare_workshop_plan(
        &self,
        insights: &[OrganizationalInsight],
        plan: &StrategicPlan,
    ) -> Result<WorkshopPlan, AgentError> {
        let critical: Vec<&OrganizationalInsight> = insights
            .iter()
            .filter(|i| i.kind == InsightKind::Critical)
            .collect();

        let recommended_format = if critical.is_empty() {
            "Half-day alignment workshop"
        } else {
            "Full-day strategic workshop"
        };

        let mut agenda = vec!["Assessment Results Presentation (90 min)".to_string()];
        agenda.extend(
            critical
                .iter()
                .map(|i| format!("{} Deep Dive (60 min)", capitalize(&i.dimension))),
        );
        agenda.extend([
            "Validation Exercises (120 min)".to_string(),
            "Priority Setting (90 min)".to_string(),
            "Action Planning (120 min)".to_string(),
        ]);

        Ok(WorkshopPlan {
            recommended_format: recommended_format.to_string(),
            key_participants: to_strings(&[
                "Executive Leadership Team",
                "HR Leadership",
                "Department Heads",
                "Employee Representatives",
            ]),
            agenda,
            materials_needed: vec![
                "Assessment summary reports".to_string(),
                "Interactive workshop exercises".to_string(),
                "Priority matrix templates".to_string(),
                format!(
                    "Strategic plan summary ({} immediate actions)",
                    plan.immediate_actions.len()
                ),
            ],
            expected_outcomes: to_strings(&[
                "Validated findings with stakeholder input",
                "Agreed priority areas for intervention",
                "Initial action plans with ownership",
                "Commitment to implementation timeline",
            ]),
        })
    }
}

#[async_trait]
impl StrategyAnalyst for HeuristicAgent {
    async fn generate_strategic_plan(
        &self,
        insights: &[OrganizationalInsight],
        _analyses: &[DimensionAnalysis],
    ) -> Result<StrategicPlan, AgentError> {
        let dimensions_of = |kind: InsightKind| -> Vec<&str> {
            insights
                .iter()
                .filter(|i| i.kind == kind)
                .map(|i| i.dimension.as_str())
                .collect()
        };

        let critical = dimensions_of(InsightKind::Critical);
        let opportunity = dimensions_of(InsightKind::Opportunity);
        let strength = dimensions_of(InsightKind::Strength);

        fn tier(dims: &[&str], template: fn(&str) -> String, defaults: &[&str]) -> Vec<String> {
            if dims.is_empty() {
                to_strings(defaults)
            } else {
                dims.iter().map(|d| template(d)).collect()
            }
        }

        let immediate_actions = tier(
            &critical,
            |d| format!("Launch a targeted {} improvement initiative", d),
            &[
                "Implement leadership development program",
                "Launch employee recognition initiative",
            ],
        );
        let medium_term_initiatives = tier(
            &opportunity,
            |d| format!("Strengthen {} practices through structured programs", d),
            &[
                "Restructure communication processes",
                "Develop innovation framework",
            ],
        );
        let long_term_strategy = tier(
            &strength,
            |d| format!("Scale {} strengths across the organization", d),
            &[
                "Build agile organizational structure",
                "Establish continuous improvement culture",
            ],
        );

        let budget = match critical.len() {
            0 => "$250K - $500K annually",
            1 | 2 => "$500K - $1M annually",
            _ => "$1M - $1.5M annually",
        };

        Ok(StrategicPlan {
            immediate_actions,
            medium_term_initiatives,
            long_term_strategy,
            resource_requirements: ResourceRequirements {
                budget: budget.to_string(),
                timeline: "12-24 months".to_string(),
                key_roles: to_strings(&["Chief People Officer", "Change Management Lead"]),
            },
        })
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
