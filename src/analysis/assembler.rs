//! Result assembly and agent attribution.

use crate::analysis::scoring::overall_score;
use crate::dimensions::AgentKind;
use crate::models::{
    AgentContribution, AssessmentResult, CrossDimensionPatterns, DimensionAnalysis,
    OrganizationalInsight, RoiProjection, StrategicPlan, WorkshopPlan,
};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// Everything the phases of a run produced.
#[derive(Debug, Clone)]
pub struct RunOutputs {
    pub analyses: Vec<DimensionAnalysis>,
    pub patterns: CrossDimensionPatterns,
    pub insights: Vec<OrganizationalInsight>,
    pub plan: StrategicPlan,
    pub roi: RoiProjection,
    pub workshop: WorkshopPlan,
}

/// Build the final result.
pub fn assemble(outputs: RunOutputs, timestamp: DateTime<Utc>) -> AssessmentResult {
    let dimension_scores = outputs
        .analyses
        .iter()
        .map(|a| (a.dimension_id.clone(), a.score))
        .collect();

    AssessmentResult {
        overall_score: overall_score(&outputs.analyses),
        dimension_scores,
        agent_contributions: agent_contributions(&outputs.analyses, &outputs.insights),
        dimension_analyses: outputs.analyses,
        insights: outputs.insights,
        recommendations: outputs.plan,
        roi_projections: outputs.roi,
        patterns: outputs.patterns,
        workshop_plan: outputs.workshop,
        timestamp,
    }
}

/// Per-agent attribution, keyed by agent name. Every agent is listed, even
/// one that took no part in the run.
pub fn agent_contributions(
    analyses: &[DimensionAnalysis],
    insights: &[OrganizationalInsight],
) -> BTreeMap<String, AgentContribution> {
    AgentKind::ALL
        .iter()
        .map(|kind| {
            let primary_dimensions = analyses
                .iter()
                .filter(|a| a.agent_analysis.primary.agent == *kind)
                .map(|a| a.dimension_id.clone())
                .collect();

            let secondary_dimensions = analyses
                .iter()
                .filter(|a| a.agent_analysis.secondary.iter().any(|v| v.agent == *kind))
                .map(|a| a.dimension_id.clone())
                .collect();

            let insights_generated = insights.iter().filter(|i| i.source_agent == *kind).count();

            (
                kind.as_str().to_string(),
                AgentContribution {
                    focus: kind.focus().to_string(),
                    primary_dimensions,
                    secondary_dimensions,
                    insights_generated,
                },
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        InsightKind, ResourceRequirements, RoiBreakdown, ThreeYearRoi, Validation, YearOneRoi,
    };
    use crate::testing::analysis;

    fn insight(dimension: &str, agent: AgentKind) -> OrganizationalInsight {
        OrganizationalInsight {
            kind: InsightKind::Critical,
            source_agent: agent,
            dimension: dimension.to_string(),
            text: String::new(),
            confidence: 0.87,
            supporting_data: vec![],
            recommended_actions: vec![],
        }
    }

    fn outputs(analyses: Vec<DimensionAnalysis>) -> RunOutputs {
        RunOutputs {
            analyses,
            patterns: CrossDimensionPatterns::default(),
            insights: vec![insight("leadership", AgentKind::CultureSpecialist)],
            plan: StrategicPlan {
                immediate_actions: vec![],
                medium_term_initiatives: vec![],
                long_term_strategy: vec![],
                resource_requirements: ResourceRequirements {
                    budget: String::new(),
                    timeline: String::new(),
                    key_roles: vec![],
                },
            },
            roi: RoiProjection {
                year_one: YearOneRoi {
                    roi_percentage: 0,
                    total_benefits: 0,
                    implementation_cost: 0,
                    net_benefit: 0,
                },
                three_year: ThreeYearRoi {
                    roi_percentage: 0,
                    cumulative_benefits: 0,
                    cumulative_costs: 0,
                    net_benefit: 0,
                },
                breakdown: RoiBreakdown {
                    turnover_savings: 0,
                    productivity_value: 0,
                    engagement_improvement: 0.0,
                    turnover_reduction: 0.0,
                },
            },
            workshop: WorkshopPlan {
                recommended_format: String::new(),
                key_participants: vec![],
                agenda: vec![],
                materials_needed: vec![],
                expected_outcomes: vec![],
            },
        }
    }

    #[test]
    fn test_scores_and_overall() {
        let result = assemble(
            outputs(vec![analysis("leadership", 35.0), analysis("engagement", 55.0)]),
            Utc::now(),
        );

        assert_eq!(result.dimension_scores.len(), 2);
        assert_eq!(result.dimension_scores["engagement"], 55.0);
        // 35 * 0.20 + 55 * 0.25
        assert_eq!(result.overall_score, 20.8);
    }

    #[test]
    fn test_contributions_attribute_primary_secondary_and_insights() {
        let mut leadership = analysis("leadership", 35.0);
        leadership.agent_analysis.primary.agent = AgentKind::StrategySpecialist;
        leadership
            .agent_analysis
            .secondary
            .push(Validation::unavailable(AgentKind::CultureSpecialist));

        let contributions = agent_contributions(
            &[leadership, analysis("engagement", 55.0)],
            &[
                insight("leadership", AgentKind::CultureSpecialist),
                insight("engagement", AgentKind::CultureSpecialist),
            ],
        );

        assert_eq!(contributions.len(), 3);
        let strategy = &contributions["strategy-specialist"];
        assert_eq!(strategy.primary_dimensions, vec!["leadership".to_string()]);
        assert_eq!(strategy.insights_generated, 0);

        let culture = &contributions["culture-specialist"];
        assert!(culture.primary_dimensions.is_empty());
        assert_eq!(culture.secondary_dimensions, vec!["leadership".to_string()]);
        assert_eq!(culture.insights_generated, 2);

        let pattern = &contributions["pattern-specialist"];
        assert_eq!(pattern.primary_dimensions, vec!["engagement".to_string()]);
        assert_eq!(pattern.focus, AgentKind::PatternSpecialist.focus());
    }
}
