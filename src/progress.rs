//! Run lifecycle events and the sinks that observe them.
//!
//! Events are observational only. A sink never feeds anything back into
//! the computation, so a run produces the same result with or without one.

use crate::dimensions::AgentKind;
use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Orchestrator phases in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    DimensionAnalysis,
    PatternRecognition,
    InsightGeneration,
    StrategicPlanning,
    RoiProjection,
    WorkshopPlanning,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::DimensionAnalysis => "dimension_analysis",
            Phase::PatternRecognition => "pattern_recognition",
            Phase::InsightGeneration => "insight_generation",
            Phase::StrategicPlanning => "strategic_planning",
            Phase::RoiProjection => "roi_projection",
            Phase::WorkshopPlanning => "workshop_planning",
        }
    }

    /// Human readable description shown to observers.
    pub fn description(&self) -> &'static str {
        match self {
            Phase::DimensionAnalysis => "Agents analyzing individual dimensions",
            Phase::PatternRecognition => "Identifying cross-dimensional patterns and correlations",
            Phase::InsightGeneration => "Generating organizational insights",
            Phase::StrategicPlanning => "Generating strategic recommendations and action plans",
            Phase::RoiProjection => "Projecting return on investment",
            Phase::WorkshopPlanning => "Preparing the workshop plan",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A discrete lifecycle event of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ProgressEvent {
    DimensionStarted {
        dimension: String,
        agent: AgentKind,
    },
    DimensionCompleted {
        dimension: String,
        score: f64,
        degraded: bool,
    },
    PhaseStarted {
        phase: Phase,
    },
    PhaseCompleted {
        phase: Phase,
    },
    AgentFailed {
        agent: AgentKind,
        dimension: String,
        reason: String,
    },
    RunCompleted {
        overall_score: f64,
    },
}

/// Receiver of progress events.
pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: ProgressEvent);
}

/// Sink that drops every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl ProgressSink for NullSink {
    fn emit(&self, _event: ProgressEvent) {}
}

/// Sink that writes events to the tracing log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl ProgressSink for TracingSink {
    fn emit(&self, event: ProgressEvent) {
        match event {
            ProgressEvent::DimensionStarted { dimension, agent } => {
                debug!(%dimension, %agent, "Dimension analysis started");
            }
            ProgressEvent::DimensionCompleted {
                dimension,
                score,
                degraded,
            } => {
                info!(%dimension, score, degraded, "Dimension analysis complete");
            }
            ProgressEvent::PhaseStarted { phase } => {
                info!(%phase, "{}", phase.description());
            }
            ProgressEvent::PhaseCompleted { phase } => {
                debug!(%phase, "Phase complete");
            }
            ProgressEvent::AgentFailed {
                agent,
                dimension,
                reason,
            } => {
                warn!(%agent, %dimension, "Agent failed: {}", reason);
            }
            ProgressEvent::RunCompleted { overall_score } => {
                info!(overall_score, "Assessment run complete");
            }
        }
    }
}

/// Sink that forwards events over a channel, e.g. to a websocket layer.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    sender: mpsc::UnboundedSender<ProgressEvent>,
}

impl ChannelSink {
    /// Create a sink and the receiver that observes it.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<ProgressEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl ProgressSink for ChannelSink {
    fn emit(&self, event: ProgressEvent) {
        // A closed receiver only means nobody is listening anymore.
        let _ = self.sender.send(event);
    }
}

/// Terminal progress bar.
pub struct ProgressBarSink {
    bar: ProgressBar,
}

impl ProgressBarSink {
    pub fn new() -> Self {
        let bar = ProgressBar::new(0);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        Self { bar }
    }
}

impl Default for ProgressBarSink {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressSink for ProgressBarSink {
    fn emit(&self, event: ProgressEvent) {
        match event {
            ProgressEvent::DimensionStarted { dimension, .. } => {
                self.bar.inc_length(1);
                self.bar.set_message(format!("analyzing {}", dimension));
            }
            ProgressEvent::DimensionCompleted { .. } => self.bar.inc(1),
            ProgressEvent::PhaseStarted { phase } => {
                self.bar.inc_length(1);
                self.bar.set_message(phase.description());
            }
            ProgressEvent::PhaseCompleted { .. } => self.bar.inc(1),
            ProgressEvent::AgentFailed {
                agent, dimension, ..
            } => {
                self.bar
                    .set_message(format!("{} fell back on {}", agent, dimension));
            }
            ProgressEvent::RunCompleted { .. } => self.bar.finish_with_message("Analysis complete"),
        }
    }
}

/// Sink that forwards every event to several sinks.
#[derive(Default, Clone)]
pub struct FanoutSink {
    sinks: Vec<Arc<dyn ProgressSink>>,
}

impl FanoutSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, sink: Arc<dyn ProgressSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }
}

impl ProgressSink for FanoutSink {
    fn emit(&self, event: ProgressEvent) {
        for sink in &self.sinks {
            sink.emit(event.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_display() {
        assert_eq!(Phase::PatternRecognition.to_string(), "pattern_recognition");
        assert_eq!(
            serde_json::to_string(&Phase::RoiProjection).unwrap(),
            "\"roi_projection\""
        );
    }

    #[test]
    fn test_channel_sink_delivers_events() {
        let (sink, mut receiver) = ChannelSink::new();
        sink.emit(ProgressEvent::PhaseStarted {
            phase: Phase::InsightGeneration,
        });

        let event = receiver.try_recv().unwrap();
        assert_eq!(
            event,
            ProgressEvent::PhaseStarted {
                phase: Phase::InsightGeneration
            }
        );
    }

    #[test]
    fn test_channel_sink_ignores_closed_receiver() {
        let (sink, receiver) = ChannelSink::new();
        drop(receiver);
        sink.emit(ProgressEvent::RunCompleted { overall_score: 1.0 });
    }

    #[test]
    fn test_fanout_reaches_every_sink() {
        let (first, mut first_rx) = ChannelSink::new();
        let (second, mut second_rx) = ChannelSink::new();
        let fanout = FanoutSink::new()
            .with(Arc::new(first))
            .with(Arc::new(second))
            .with(Arc::new(NullSink));
        assert_eq!(fanout.len(), 3);

        fanout.emit(ProgressEvent::RunCompleted { overall_score: 70.0 });

        assert!(first_rx.try_recv().is_ok());
        assert!(second_rx.try_recv().is_ok());
    }

    #[test]
    fn test_event_serializes_with_tag() {
        let event = ProgressEvent::DimensionCompleted {
            dimension: "culture".to_string(),
            score: 35.0,
            degraded: false,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"event\":\"dimension_completed\""));
    }
}
