//! Agent capability contracts.
//!
//! Every analysis backend implements [`DimensionAgent`]. The designated
//! aggregation agents additionally implement one of the phase traits.

use crate::dimensions::{AgentKind, DimensionDefinition};
use crate::error::AgentError;
use crate::models::{
    AgentAnalysis, AssessmentResponse, CrossDimensionPatterns, DimensionAnalysis,
    OrganizationalInsight, StrategicPlan, Validation, WorkshopPlan,
};
use async_trait::async_trait;

/// Per-dimension analysis capability.
#[async_trait]
pub trait DimensionAgent: Send + Sync {
    /// Which specialization this agent fulfils.
    fn kind(&self) -> AgentKind;

    /// Score a dimension and describe it.
    ///
    /// Fails with [`AgentError::InvalidInput`] when `responses` is empty.
    async fn analyze(
        &self,
        definition: &DimensionDefinition,
        responses: &[AssessmentResponse],
    ) -> Result<AgentAnalysis, AgentError>;

    /// Review a primary analysis and add insights.
    ///
    /// Never fails: an agent that cannot respond returns
    /// [`Validation::unavailable`].
    async fn validate(
        &self,
        dimension_id: &str,
        prior: &AgentAnalysis,
        responses: &[AssessmentResponse],
    ) -> Validation;
}

/// Cross-dimension pattern detection.
#[async_trait]
pub trait PatternAnalyst: DimensionAgent {
    async fn identify_patterns(
        &self,
        analyses: &[DimensionAnalysis],
    ) -> Result<CrossDimensionPatterns, AgentError>;
}

/// Organizational insight generation and workshop planning.
#[async_trait]
pub trait InsightAnalyst: DimensionAgent {
    async fn generate_insights(
        &self,
        analyses: &[DimensionAnalysis],
        patterns: &CrossDimensionPatterns,
    ) -> Result<Vec<OrganizationalInsight>, AgentError>;

    async fn prepare_workshop_plan(
        &self,
        insights: &[OrganizationalInsight],
        plan: &StrategicPlan,
    ) -> Result<WorkshopPlan, AgentError>;
}

/// Strategic recommendation generation.
#[async_trait]
pub trait StrategyAnalyst: DimensionAgent {
    async fn generate_strategic_plan(
        &self,
        insights: &[OrganizationalInsight],
        analyses: &[DimensionAnalysis],
    ) -> Result<StrategicPlan, AgentError>;
}
