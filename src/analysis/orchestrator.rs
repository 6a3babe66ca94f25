//! Assessment orchestration.
//!
//! A run validates its input, analyzes every dimension present in it
//! concurrently, then walks the aggregation phases in order: patterns,
//! insights, strategic plan, ROI, workshop plan. Dimension-level agent
//! failures degrade a single dimension; an aggregation failure aborts the
//! whole run with the failing phase named.

use crate::agent::registry::AgentRegistry;
use crate::analysis::aggregator::group_by_dimension;
use crate::analysis::assembler::{assemble, RunOutputs};
use crate::analysis::dimension::DimensionAnalyzer;
use crate::analysis::roi::{RoiInputs, RoiProjector};
use crate::dimensions::DimensionRegistry;
use crate::error::{AgentError, AssessmentError, CoreResult};
use crate::intake::validate_responses;
use crate::models::{AssessmentResponse, AssessmentResult, DimensionAnalysis};
use crate::progress::{Phase, ProgressEvent, ProgressSink, TracingSink};
use chrono::Utc;
use futures::future::join_all;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info};

/// Per agent call timeout when none is configured.
pub const DEFAULT_AGENT_TIMEOUT: Duration = Duration::from_secs(60);

/// Runs assessments against a fixed dimension framework and agent set.
#[derive(Clone)]
pub struct AssessmentOrchestrator {
    dimensions: DimensionRegistry,
    agents: AgentRegistry,
    roi: RoiProjector,
    timeout: Duration,
    sink: Arc<dyn ProgressSink>,
}

impl AssessmentOrchestrator {
    pub fn new(dimensions: DimensionRegistry, agents: AgentRegistry) -> Self {
        Self {
            dimensions,
            agents,
            roi: RoiProjector::default(),
            timeout: DEFAULT_AGENT_TIMEOUT,
            sink: Arc::new(TracingSink),
        }
    }

    pub fn with_roi(mut self, roi: RoiProjector) -> Self {
        self.roi = roi;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_sink(mut self, sink: Arc<dyn ProgressSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn dimensions(&self) -> &DimensionRegistry {
        &self.dimensions
    }

    /// Run a complete assessment.
    pub async fn run(&self, responses: &[AssessmentResponse]) -> CoreResult<AssessmentResult> {
        validate_responses(responses, &self.dimensions)?;
        self.agents.ensure_covers(&self.dimensions)?;

        info!("Starting assessment of {} responses", responses.len());

        let analyses = self.analyze_dimensions(responses).await?;

        let patterns = self
            .run_phase(
                Phase::PatternRecognition,
                self.agents.pattern_analyst().identify_patterns(&analyses),
            )
            .await?;

        let insights = self
            .run_phase(
                Phase::InsightGeneration,
                self.agents
                    .insight_analyst()
                    .generate_insights(&analyses, &patterns),
            )
            .await?;

        let plan = self
            .run_phase(
                Phase::StrategicPlanning,
                self.agents
                    .strategy_analyst()
                    .generate_strategic_plan(&insights, &analyses),
            )
            .await?;

        self.sink.emit(ProgressEvent::PhaseStarted {
            phase: Phase::RoiProjection,
        });
        let roi = self.roi.project(&RoiInputs::from_analyses(&analyses))?;
        self.sink.emit(ProgressEvent::PhaseCompleted {
            phase: Phase::RoiProjection,
        });

        let workshop = self
            .run_phase(
                Phase::WorkshopPlanning,
                self.agents
                    .insight_analyst()
                    .prepare_workshop_plan(&insights, &plan),
            )
            .await?;

        let result = assemble(
            RunOutputs {
                analyses,
                patterns,
                insights,
                plan,
                roi,
                workshop,
            },
            Utc::now(),
        );

        info!(
            overall_score = result.overall_score,
            dimensions = result.dimension_scores.len(),
            "Assessment complete"
        );
        self.sink.emit(ProgressEvent::RunCompleted {
            overall_score: result.overall_score,
        });

        Ok(result)
    }

    /// Analyze each dimension present in the input, concurrently.
    ///
    /// Results come back in dimension-definition order, whatever order the
    /// analyses finish in.
    async fn analyze_dimensions(
        &self,
        responses: &[AssessmentResponse],
    ) -> CoreResult<Vec<DimensionAnalysis>> {
        self.sink.emit(ProgressEvent::PhaseStarted {
            phase: Phase::DimensionAnalysis,
        });

        let groups = group_by_dimension(responses, &self.dimensions);
        let analyzer = DimensionAnalyzer::new(self.agents.clone(), self.timeout, self.sink.clone());

        let mut futures = Vec::with_capacity(groups.len());
        for group in &groups {
            let definition = self.dimensions.get(&group.dimension_id).ok_or_else(|| {
                AssessmentError::Input(format!("Unknown dimension '{}'", group.dimension_id))
            })?;
            let analyzer = &analyzer;
            let sink = &self.sink;

            futures.push(async move {
                sink.emit(ProgressEvent::DimensionStarted {
                    dimension: definition.id.clone(),
                    agent: definition.primary_agent,
                });

                let analysis = analyzer.analyze(definition, &group.responses).await;

                sink.emit(ProgressEvent::DimensionCompleted {
                    dimension: definition.id.clone(),
                    score: analysis.score,
                    degraded: analysis.degraded,
                });
                analysis
            });
        }

        debug!("Analyzing {} dimensions concurrently", futures.len());
        let analyses = join_all(futures).await;

        self.sink.emit(ProgressEvent::PhaseCompleted {
            phase: Phase::DimensionAnalysis,
        });

        Ok(analyses)
    }

    /// Run one aggregation phase; any failure aborts the run.
    async fn run_phase<T>(
        &self,
        phase: Phase,
        call: impl Future<Output = Result<T, AgentError>>,
    ) -> CoreResult<T> {
        self.sink.emit(ProgressEvent::PhaseStarted { phase });

        let outcome = tokio::time::timeout(self.timeout, call)
            .await
            .map_err(|_| AgentError::Timeout(self.timeout.as_secs()))
            .and_then(|result| result);

        match outcome {
            Ok(value) => {
                self.sink.emit(ProgressEvent::PhaseCompleted { phase });
                Ok(value)
            }
            Err(e) => {
                error!(%phase, "Aggregation phase failed: {}", e);
                Err(AssessmentError::Aggregation {
                    phase,
                    reason: e.to_string(),
                })
            }
        }
    }
}
