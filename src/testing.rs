//! Shared test fixtures: canned analyses, response builders and
//! scripted agents that fail on demand.

use crate::agent::heuristic::HeuristicAgent;
use crate::agent::traits::{DimensionAgent, InsightAnalyst, PatternAnalyst, StrategyAnalyst};
use crate::analysis::scoring::CONSISTENT_PATTERN;
use crate::dimensions::{AgentKind, DimensionDefinition};
use crate::error::AgentError;
use crate::models::{
    AgentAnalysis, AgentProvenance, AssessmentResponse, CrossDimensionPatterns,
    DimensionAnalysis, OrganizationalInsight, StrategicPlan, Validation, WorkshopPlan,
};
use async_trait::async_trait;
use std::time::Duration;

/// A finished, non-degraded analysis with the given score.
pub fn analysis(dimension_id: &str, score: f64) -> DimensionAnalysis {
    let primary = AgentAnalysis {
        agent: AgentKind::PatternSpecialist,
        score,
        insights: vec![format!("{} insight", dimension_id)],
        recommendations: vec![format!("Improve {}", dimension_id)],
        patterns: vec![CONSISTENT_PATTERN.to_string()],
        confidence: 0.85,
    };

    DimensionAnalysis {
        dimension_id: dimension_id.to_string(),
        score,
        insights: primary.insights.clone(),
        recommendations: primary.recommendations.clone(),
        patterns: primary.patterns.clone(),
        confidence: primary.confidence,
        degraded: false,
        agent_analysis: AgentProvenance {
            primary,
            primary_error: None,
            secondary: Vec::new(),
        },
    }
}

/// Responses for one dimension, question ids `X1`, `X2`, ...
pub fn responses(dimension_id: &str, values: &[i64]) -> Vec<AssessmentResponse> {
    let prefix = dimension_id
        .chars()
        .next()
        .map(|c| c.to_ascii_uppercase())
        .unwrap_or('Q');

    values
        .iter()
        .enumerate()
        .map(|(i, v)| {
            AssessmentResponse::new(dimension_id, &format!("{}{}", prefix, i + 1), *v, "")
        })
        .collect()
}

/// How a [`ScriptedAgent`] misbehaves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Failure {
    /// Return an error immediately.
    Error,
    /// Sleep past any reasonable timeout.
    Hang,
}

/// Agent whose every call fails the same way.
#[derive(Debug, Clone, Copy)]
pub struct ScriptedAgent {
    kind: AgentKind,
    failure: Failure,
}

impl ScriptedAgent {
    pub fn failing(kind: AgentKind) -> Self {
        Self {
            kind,
            failure: Failure::Error,
        }
    }

    pub fn hanging(kind: AgentKind) -> Self {
        Self {
            kind,
            failure: Failure::Hang,
        }
    }

    async fn fail<T>(&self) -> Result<T, AgentError> {
        if self.failure == Failure::Hang {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        }
        Err(AgentError::Request(format!("{} is scripted to fail", self.kind)))
    }
}

#[async_trait]
impl DimensionAgent for ScriptedAgent {
    fn kind(&self) -> AgentKind {
        self.kind
    }

    async fn analyze(
        &self,
        _definition: &DimensionDefinition,
        _responses: &[AssessmentResponse],
    ) -> Result<AgentAnalysis, AgentError> {
        self.fail().await
    }

    async fn validate(
        &self,
        _dimension_id: &str,
        _prior: &AgentAnalysis,
        _responses: &[AssessmentResponse],
    ) -> Validation {
        if self.failure == Failure::Hang {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        }
        Validation::unavailable(self.kind)
    }
}

#[async_trait]
impl PatternAnalyst for ScriptedAgent {
    async fn identify_patterns(
        &self,
        _analyses: &[DimensionAnalysis],
    ) -> Result<CrossDimensionPatterns, AgentError> {
        self.fail().await
    }
}

#[async_trait]
impl InsightAnalyst for ScriptedAgent {
    async fn generate_insights(
        &self,
        _analyses: &[DimensionAnalysis],
        _patterns: &CrossDimensionPatterns,
    ) -> Result<Vec<OrganizationalInsight>, AgentError> {
        self.fail().await
    }

    async fn prepare_workshop_plan(
        &self,
        _insights: &[OrganizationalInsight],
        _plan: &StrategicPlan,
    ) -> Result<WorkshopPlan, AgentError> {
        self.fail().await
    }
}

#[async_trait]
impl StrategyAnalyst for ScriptedAgent {
    async fn generate_strategic_plan(
        &self,
        _insights: &[OrganizationalInsight],
        _analyses: &[DimensionAnalysis],
    ) -> Result<StrategicPlan, AgentError> {
        self.fail().await
    }
}

/// Heuristic agent whose `analyze` sleeps first.
#[derive(Debug, Clone, Copy)]
pub struct SlowAgent {
    inner: HeuristicAgent,
    delay: Duration,
}

impl SlowAgent {
    pub fn new(kind: AgentKind, delay: Duration) -> Self {
        Self {
            inner: HeuristicAgent::new(kind),
            delay,
        }
    }
}

#[async_trait]
impl DimensionAgent for SlowAgent {
    fn kind(&self) -> AgentKind {
        self.inner.kind()
    }

    async fn analyze(
        &self,
        definition: &DimensionDefinition,
        responses: &[AssessmentResponse],
    ) -> Result<AgentAnalysis, AgentError> {
        tokio::time::sleep(self.delay).await;
        self.inner.analyze(definition, responses).await
    }

    async fn validate(
        &self,
        dimension_id: &str,
        prior: &AgentAnalysis,
        responses: &[AssessmentResponse],
    ) -> Validation {
        self.inner.validate(dimension_id, prior, responses).await
    }
}

/// Insight analyst that generates insights but cannot plan a workshop.
#[derive(Debug, Clone, Copy)]
pub struct NoWorkshopAgent {
    inner: HeuristicAgent,
}

impl NoWorkshopAgent {
    pub fn culture() -> Self {
        Self {
            inner: HeuristicAgent::new(AgentKind::CultureSpecialist),
        }
    }
}

#[async_trait]
impl DimensionAgent for NoWorkshopAgent {
    fn kind(&self) -> AgentKind {
        self.inner.kind()
    }

    async fn analyze(
        &self,
        definition: &DimensionDefinition,
        responses: &[AssessmentResponse],
    ) -> Result<AgentAnalysis, AgentError> {
        self.inner.analyze(definition, responses).await
    }

    async fn validate(
        &self,
        dimension_id: &str,
        prior: &AgentAnalysis,
        responses: &[AssessmentResponse],
    ) -> Validation {
        self.inner.validate(dimension_id, prior, responses).await
    }
}

#[async_trait]
impl InsightAnalyst for NoWorkshopAgent {
    async fn generate_insights(
        &self,
        analyses: &[DimensionAnalysis],
        patterns: &CrossDimensionPatterns,
    ) -> Result<Vec<OrganizationalInsight>, AgentError> {
        self.inner.generate_insights(analyses, patterns).await
    }

    async fn prepare_workshop_plan(
        &self,
        _insights: &[OrganizationalInsight],
        _plan: &StrategicPlan,
    ) -> Result<WorkshopPlan, AgentError> {
        Err(AgentError::Unavailable("workshop planner offline".to_string()))
    }
}
