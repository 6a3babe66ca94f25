//! Agent registry.
//!
//! Maps each specialization to the implementation chosen at configuration
//! time, plus the designated agents for the aggregation phases.

use crate::agent::heuristic::HeuristicAgent;
use crate::agent::ollama::{OllamaAgent, OllamaSettings};
use crate::agent::traits::{DimensionAgent, InsightAnalyst, PatternAnalyst, StrategyAnalyst};
use crate::config::{AgentsConfig, Provider};
use crate::dimensions::{AgentKind, DimensionRegistry};
use crate::error::{AssessmentError, CoreResult};
use anyhow::Result;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Agents available to a run.
#[derive(Clone)]
pub struct AgentRegistry {
    agents: BTreeMap<AgentKind, Arc<dyn DimensionAgent>>,
    pattern: Arc<dyn PatternAnalyst>,
    insight: Arc<dyn InsightAnalyst>,
    strategy: Arc<dyn StrategyAnalyst>,
}

impl AgentRegistry {
    /// Registry with only the phase analysts; dimension agents are added
    /// with [`AgentRegistry::with_dimension_agent`].
    pub fn new(
        pattern: Arc<dyn PatternAnalyst>,
        insight: Arc<dyn InsightAnalyst>,
        strategy: Arc<dyn StrategyAnalyst>,
    ) -> Self {
        Self {
            agents: BTreeMap::new(),
            pattern,
            insight,
            strategy,
        }
    }

    /// Every role filled by the deterministic local agents.
    pub fn heuristic() -> Self {
        let pattern = Arc::new(HeuristicAgent::new(AgentKind::PatternSpecialist));
        let strategy = Arc::new(HeuristicAgent::new(AgentKind::StrategySpecialist));
        let culture = Arc::new(HeuristicAgent::new(AgentKind::CultureSpecialist));

        Self::new(pattern.clone(), culture.clone(), strategy.clone())
            .with_dimension_agent(pattern)
            .with_dimension_agent(strategy)
            .with_dimension_agent(culture)
    }

    /// Build the registry for the configured provider.
    ///
    /// With `ollama`, the per-dimension agents call the model while the
    /// aggregation phases stay local and deterministic.
    pub fn from_config(config: &AgentsConfig) -> Result<Self> {
        match config.provider {
            Provider::Heuristic => {
                info!("Using heuristic agents");
                Ok(Self::heuristic())
            }
            Provider::Ollama => {
                info!(
                    "Using Ollama agents ({} at {})",
                    config.model, config.ollama_url
                );
                let settings = OllamaSettings {
                    url: config.ollama_url.clone(),
                    model: config.model.clone(),
                    temperature: config.temperature,
                    timeout_seconds: config.timeout_seconds,
                };

                let mut registry = Self::heuristic();
                for kind in AgentKind::ALL {
                    registry = registry
                        .with_dimension_agent(Arc::new(OllamaAgent::new(kind, settings.clone())?));
                }
                Ok(registry)
            }
        }
    }

    /// Register (or replace) the agent for its specialization.
    pub fn with_dimension_agent(mut self, agent: Arc<dyn DimensionAgent>) -> Self {
        debug!("Registering dimension agent {}", agent.kind());
        self.agents.insert(agent.kind(), agent);
        self
    }

    pub fn with_pattern_analyst(mut self, analyst: Arc<dyn PatternAnalyst>) -> Self {
        self.pattern = analyst;
        self
    }

    pub fn with_insight_analyst(mut self, analyst: Arc<dyn InsightAnalyst>) -> Self {
        self.insight = analyst;
        self
    }

    pub fn with_strategy_analyst(mut self, analyst: Arc<dyn StrategyAnalyst>) -> Self {
        self.strategy = analyst;
        self
    }

    pub fn dimension_agent(&self, kind: AgentKind) -> Option<Arc<dyn DimensionAgent>> {
        self.agents.get(&kind).cloned()
    }

    pub fn pattern_analyst(&self) -> &Arc<dyn PatternAnalyst> {
        &self.pattern
    }

    pub fn insight_analyst(&self) -> &Arc<dyn InsightAnalyst> {
        &self.insight
    }

    pub fn strategy_analyst(&self) -> &Arc<dyn StrategyAnalyst> {
        &self.strategy
    }

    /// Check that every agent the dimensions name is registered.
    pub fn ensure_covers(&self, dimensions: &DimensionRegistry) -> CoreResult<()> {
        for definition in dimensions.definitions() {
            let named = std::iter::once(&definition.primary_agent)
                .chain(definition.secondary_agents.iter());
            for kind in named {
                if !self.agents.contains_key(kind) {
                    return Err(AssessmentError::AgentUnavailable {
                        agent: *kind,
                        reason: format!("no agent registered for dimension {}", definition.id),
                    });
                }
            }
        }
        Ok(())
    }
}
