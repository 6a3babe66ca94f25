//! Response intake: loading, the demo sample and validation.

use crate::dimensions::{AgentKind, DimensionRegistry};
use crate::error::{AssessmentError, CoreResult};
use crate::models::{AssessmentResponse, MAX_RESPONSE_VALUE, MIN_RESPONSE_VALUE};
use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

/// Load responses from a JSON array file.
pub fn load_responses(path: &Path) -> Result<Vec<AssessmentResponse>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read responses file: {}", path.display()))?;

    let responses: Vec<AssessmentResponse> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse responses file: {}", path.display()))?;

    info!("Loaded {} responses from {}", responses.len(), path.display());
    Ok(responses)
}

/// The canonical six-response sample.
pub fn demo_responses() -> Vec<AssessmentResponse> {
    use AgentKind::*;

    vec![
        AssessmentResponse::new("leadership", "L1", 4, "Vision Communication")
            .with_source(StrategySpecialist),
        AssessmentResponse::new("leadership", "L2", 3, "Leadership Consistency")
            .with_source(StrategySpecialist),
        AssessmentResponse::new("engagement", "E1", 7, "Net Promoter").with_source(PatternSpecialist),
        AssessmentResponse::new("engagement", "E2", 4, "Values Alignment")
            .with_source(PatternSpecialist),
        AssessmentResponse::new("culture", "C1", 3, "Values Integration")
            .with_source(CultureSpecialist),
        AssessmentResponse::new("culture", "C2", 4, "Psychological Safety")
            .with_source(CultureSpecialist),
    ]
}

/// Reject input a run cannot start from.
///
/// Every response must name a known dimension and carry a value on the
/// response scale, and there must be at least one response.
pub fn validate_responses(
    responses: &[AssessmentResponse],
    registry: &DimensionRegistry,
) -> CoreResult<()> {
    if responses.is_empty() {
        return Err(AssessmentError::Input("No responses provided".to_string()));
    }

    for response in responses {
        if !registry.contains(&response.dimension_id) {
            return Err(AssessmentError::Input(format!(
                "Unknown dimension '{}' in question {}",
                response.dimension_id, response.question_id
            )));
        }

        if !(MIN_RESPONSE_VALUE..=MAX_RESPONSE_VALUE).contains(&response.value) {
            return Err(AssessmentError::Input(format!(
                "Value {} for question {} is outside {}..={}",
                response.value, response.question_id, MIN_RESPONSE_VALUE, MAX_RESPONSE_VALUE
            )));
        }
    }

    Ok(())
}
