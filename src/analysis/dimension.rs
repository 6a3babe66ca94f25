//! Per-dimension analysis.
//!
//! Runs the primary agent, then each secondary agent in definition order,
//! and merges their outputs. Agent failures never escape this module: they
//! turn into a placeholder analysis and an `AgentFailed` event.

use crate::agent::registry::AgentRegistry;
use crate::analysis::scoring::{normalized_score, variance_pattern};
use crate::dimensions::{fallback_insight, AgentKind, DimensionDefinition};
use crate::error::AgentError;
use crate::models::{
    AgentAnalysis, AgentProvenance, AssessmentResponse, DimensionAnalysis, Validation,
};
use crate::progress::{ProgressEvent, ProgressSink};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Confidence of a placeholder when a secondary agent still responded.
pub const PLACEHOLDER_CONFIDENCE: f64 = 0.5;

/// Analyzes one dimension with its assigned agents.
#[derive(Clone)]
pub struct DimensionAnalyzer {
    agents: AgentRegistry,
    timeout: Duration,
    sink: Arc<dyn ProgressSink>,
}

impl DimensionAnalyzer {
    pub fn new(agents: AgentRegistry, timeout: Duration, sink: Arc<dyn ProgressSink>) -> Self {
        Self {
            agents,
            timeout,
            sink,
        }
    }

    /// Analyze `responses`, all of which belong to `definition`.
    pub async fn analyze(
        &self,
        definition: &DimensionDefinition,
        responses: &[AssessmentResponse],
    ) -> DimensionAnalysis {
        let dimension_id = definition.id.as_str();

        let primary = self.run_primary(definition, responses).await;
        if let Err(ref e) = primary {
            self.report_failure(definition.primary_agent, dimension_id, e);
        }

        // Secondaries validate the primary output, or the placeholder when
        // the primary failed.
        let prior = match &primary {
            Ok(analysis) => analysis.clone(),
            Err(_) => placeholder(definition.primary_agent, dimension_id, responses, 0.0),
        };

        let mut secondary = Vec::with_capacity(definition.secondary_agents.len());
        for kind in &definition.secondary_agents {
            let validation = self.run_secondary(*kind, dimension_id, &prior, responses).await;
            if !validation.is_available() {
                self.report_failure(
                    *kind,
                    dimension_id,
                    &AgentError::Unavailable("validation returned no result".to_string()),
                );
            }
            secondary.push(validation);
        }

        merge(dimension_id, primary, prior, secondary)
    }

    async fn run_primary(
        &self,
        definition: &DimensionDefinition,
        responses: &[AssessmentResponse],
    ) -> Result<AgentAnalysis, AgentError> {
        let agent = self
            .agents
            .dimension_agent(definition.primary_agent)
            .ok_or_else(|| {
                AgentError::Unavailable(format!("{} is not registered", definition.primary_agent))
            })?;

        debug!(
            dimension = %definition.id,
            agent = %definition.primary_agent,
            "Running primary analysis"
        );

        let analysis = tokio::time::timeout(self.timeout, agent.analyze(definition, responses))
            .await
            .map_err(|_| AgentError::Timeout(self.timeout.as_secs()))??;

        if !analysis.score.is_finite() || !(0.0..=100.0).contains(&analysis.score) {
            return Err(AgentError::MalformedResponse(format!(
                "score {} outside 0..=100",
                analysis.score
            )));
        }

        Ok(analysis)
    }

    async fn run_secondary(
        &self,
        kind: AgentKind,
        dimension_id: &str,
        prior: &AgentAnalysis,
        responses: &[AssessmentResponse],
    ) -> Validation {
        let Some(agent) = self.agents.dimension_agent(kind) else {
            return Validation::unavailable(kind);
        };

        debug!(dimension = dimension_id, agent = %kind, "Running validation");

        match tokio::time::timeout(self.timeout, agent.validate(dimension_id, prior, responses))
            .await
        {
            Ok(validation) => validation,
            Err(_) => Validation::unavailable(kind),
        }
    }

    fn report_failure(&self, agent: AgentKind, dimension_id: &str, error: &AgentError) {
        warn!(dimension = dimension_id, agent = %agent, "Agent failed: {}", error);
        self.sink.emit(ProgressEvent::AgentFailed {
            agent,
            dimension: dimension_id.to_string(),
            reason: error.to_string(),
        });
    }
}

/// Deterministic stand-in for a primary analysis that could not be produced.
fn placeholder(
    agent: AgentKind,
    dimension_id: &str,
    responses: &[AssessmentResponse],
    confidence: f64,
) -> AgentAnalysis {
    AgentAnalysis {
        agent,
        score: normalized_score(responses).unwrap_or(0.0),
        insights: vec![fallback_insight(dimension_id)],
        recommendations: Vec::new(),
        patterns: vec![variance_pattern(responses).to_string()],
        confidence,
    }
}

/// Combine primary and secondary outputs.
///
/// The score always comes from the primary (or its placeholder); secondaries
/// only contribute insights.
fn merge(
    dimension_id: &str,
    primary: Result<AgentAnalysis, AgentError>,
    prior: AgentAnalysis,
    secondary: Vec<Validation>,
) -> DimensionAnalysis {
    let (base, primary_error, degraded) = match primary {
        Ok(analysis) => (analysis, None, false),
        Err(e) => {
            let responsive = secondary.iter().any(Validation::is_available);
            let mut base = prior;
            base.confidence = if responsive { PLACEHOLDER_CONFIDENCE } else { 0.0 };
            (base, Some(e.to_string()), !responsive)
        }
    };

    let mut insights = base.insights.clone();
    for validation in &secondary {
        insights.extend(validation.additional_insights.iter().cloned());
    }

    DimensionAnalysis {
        dimension_id: dimension_id.to_string(),
        score: base.score,
        insights,
        recommendations: base.recommendations.clone(),
        patterns: base.patterns.clone(),
        confidence: base.confidence,
        degraded,
        agent_analysis: AgentProvenance {
            primary: base,
            primary_error,
            secondary,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::heuristic::HeuristicAgent;
    use crate::agent::traits::DimensionAgent;
    use crate::dimensions::DimensionRegistry;
    use crate::progress::{ChannelSink, NullSink};
    use crate::testing::{responses, ScriptedAgent};

    fn analyzer(agents: AgentRegistry) -> DimensionAnalyzer {
        DimensionAnalyzer::new(agents, Duration::from_secs(5), Arc::new(NullSink))
    }

    #[tokio::test]
    async fn test_merge_appends_secondary_insights() {
        let registry = DimensionRegistry::standard();
        let leadership = registry.get("leadership").unwrap();

        let result = analyzer(AgentRegistry::heuristic())
            .analyze(leadership, &responses("leadership", &[4, 3]))
            .await;

        assert_eq!(result.score, 35.0);
        assert!(!result.degraded);
        assert_eq!(result.confidence, 0.85);
        assert_eq!(result.agent_analysis.primary.agent, AgentKind::StrategySpecialist);
        assert_eq!(result.agent_analysis.secondary.len(), 1);
        assert_eq!(
            result.insights.last().unwrap(),
            "Secondary analysis confirms leadership findings"
        );
        assert_eq!(result.recommendations, result.agent_analysis.primary.recommendations);
    }

    #[tokio::test]
    async fn test_primary_failure_with_responsive_secondary_uses_placeholder() {
        let registry = DimensionRegistry::standard();
        let agents = AgentRegistry::heuristic()
            .with_dimension_agent(Arc::new(ScriptedAgent::failing(AgentKind::StrategySpecialist)));
        let (sink, mut rx) = ChannelSink::new();
        let analyzer = DimensionAnalyzer::new(agents, Duration::from_secs(5), Arc::new(sink));

        let result = analyzer
            .analyze(registry.get("leadership").unwrap(), &responses("leadership", &[4, 3]))
            .await;

        assert!(!result.degraded);
        assert_eq!(result.confidence, PLACEHOLDER_CONFIDENCE);
        assert_eq!(result.score, 35.0);
        assert_eq!(result.insights[0], fallback_insight("leadership"));
        assert!(result.agent_analysis.primary_error.is_some());

        match rx.try_recv().unwrap() {
            ProgressEvent::AgentFailed { agent, dimension, .. } => {
                assert_eq!(agent, AgentKind::StrategySpecialist);
                assert_eq!(dimension, "leadership");
            }
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_all_agents_failing_degrades_dimension() {
        let registry = DimensionRegistry::standard();
        let agents = AgentRegistry::heuristic()
            .with_dimension_agent(Arc::new(ScriptedAgent::failing(AgentKind::CultureSpecialist)))
            .with_dimension_agent(Arc::new(ScriptedAgent::failing(AgentKind::PatternSpecialist)));

        let result = analyzer(agents)
            .analyze(registry.get("culture").unwrap(), &responses("culture", &[3, 4]))
            .await;

        assert!(result.degraded);
        assert_eq!(result.confidence, 0.0);
        assert_eq!(result.score, 35.0);
        assert_eq!(result.insights, vec![fallback_insight("culture")]);
    }

    #[tokio::test]
    async fn test_hanging_primary_times_out() {
        let registry = DimensionRegistry::standard();
        let agents = AgentRegistry::heuristic()
            .with_dimension_agent(Arc::new(ScriptedAgent::hanging(AgentKind::PatternSpecialist)));
        let (sink, mut rx) = ChannelSink::new();
        let analyzer = DimensionAnalyzer::new(agents, Duration::from_secs(1), Arc::new(sink));

        let result = analyzer
            .analyze(registry.get("engagement").unwrap(), &responses("engagement", &[7, 4]))
            .await;

        // Secondary (strategy) still answered.
        assert!(!result.degraded);
        assert_eq!(result.score, 55.0);
        assert_eq!(
            result.agent_analysis.primary_error.as_deref(),
            Some("Timed out after 1s")
        );
        assert!(matches!(
            rx.try_recv().unwrap(),
            ProgressEvent::AgentFailed { .. }
        ));
    }

    #[tokio::test]
    async fn test_out_of_range_score_is_rejected() {
        struct Inflated;

        #[async_trait::async_trait]
        impl DimensionAgent for Inflated {
            fn kind(&self) -> AgentKind {
                AgentKind::CultureSpecialist
            }

            async fn analyze(
                &self,
                definition: &DimensionDefinition,
                responses: &[AssessmentResponse],
            ) -> Result<AgentAnalysis, AgentError> {
                let mut analysis = HeuristicAgent::new(AgentKind::CultureSpecialist)
                    .analyze(definition, responses)
                    .await?;
                analysis.score = 140.0;
                Ok(analysis)
            }

            async fn validate(
                &self,
                _dimension_id: &str,
                _prior: &AgentAnalysis,
                _responses: &[AssessmentResponse],
            ) -> Validation {
                Validation::unavailable(AgentKind::CultureSpecialist)
            }
        }

        let registry = DimensionRegistry::standard();
        let agents = AgentRegistry::heuristic().with_dimension_agent(Arc::new(Inflated));

        let result = analyzer(agents)
            .analyze(registry.get("culture").unwrap(), &responses("culture", &[3, 4]))
            .await;

        assert_eq!(result.score, 35.0);
        assert!(result.agent_analysis.primary_error.unwrap().contains("outside"));
    }
}
