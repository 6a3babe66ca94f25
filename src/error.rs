//! Error types for the assessment core.
//!
//! `AgentError` is what an agent collaborator reports back; the orchestrator
//! turns it into a fallback analysis or, for aggregation phases, into an
//! `AssessmentError::Aggregation` that aborts the run.

use crate::dimensions::AgentKind;
use crate::progress::Phase;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, AssessmentError>;

/// Errors surfaced to the caller of a run.
#[derive(Debug, thiserror::Error)]
pub enum AssessmentError {
    /// Malformed or empty input. The run never starts.
    #[error("Invalid input: {0}")]
    Input(String),

    /// A dimension names an agent that is not registered.
    #[error("Agent {agent} unavailable: {reason}")]
    AgentUnavailable { agent: AgentKind, reason: String },

    /// An aggregation phase failed; partial analyses are discarded.
    #[error("Aggregation failed during {phase}: {reason}")]
    Aggregation { phase: Phase, reason: String },
}

impl AssessmentError {
    /// Name of the phase that failed, if the error belongs to one.
    pub fn phase(&self) -> Option<Phase> {
        match self {
            AssessmentError::Aggregation { phase, .. } => Some(*phase),
            AssessmentError::AgentUnavailable { .. } => Some(Phase::DimensionAnalysis),
            AssessmentError::Input(_) => None,
        }
    }
}

/// Errors reported by an agent collaborator.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AgentError {
    #[error("Request failed: {0}")]
    Request(String),

    #[error("Timed out after {0}s")]
    Timeout(u64),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Agent unavailable: {0}")]
    Unavailable(String),
}
