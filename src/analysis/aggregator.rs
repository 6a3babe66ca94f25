//! Response grouping and cross-dimension statistics.
//!
//! This module groups raw responses by dimension and computes the summary
//! figures that pattern detection, routing answers and reports share.

use crate::dimensions::DimensionRegistry;
use crate::models::{AssessmentResponse, DimensionAnalysis, InsightKind, OrganizationalInsight};
use std::collections::BTreeMap;

/// Responses belonging to one dimension, in input order.
#[derive(Debug, Clone, PartialEq)]
pub struct DimensionGroup {
    pub dimension_id: String,
    pub responses: Vec<AssessmentResponse>,
}

/// Group responses by dimension.
///
/// Groups follow dimension-definition order; ids the registry does not know
/// come last, in order of first appearance. Within a group, input order is
/// kept.
pub fn group_by_dimension(
    responses: &[AssessmentResponse],
    registry: &DimensionRegistry,
) -> Vec<DimensionGroup> {
    let mut groups: Vec<DimensionGroup> = Vec::new();

    for response in responses {
        match groups
            .iter_mut()
            .find(|g| g.dimension_id == response.dimension_id)
        {
            Some(group) => group.responses.push(response.clone()),
            None => groups.push(DimensionGroup {
                dimension_id: response.dimension_id.clone(),
                responses: vec![response.clone()],
            }),
        }
    }

    // Stable sort keeps first-appearance order among unknown ids.
    groups.sort_by_key(|g| registry.position(&g.dimension_id).unwrap_or(usize::MAX));

    groups
}

/// Mean dimension score, `None` when nothing was analyzed.
pub fn mean_score(analyses: &[DimensionAnalysis]) -> Option<f64> {
    if analyses.is_empty() {
        return None;
    }
    Some(analyses.iter().map(|a| a.score).sum::<f64>() / analyses.len() as f64)
}

/// Highest-scoring dimension; ties go to the earlier one.
pub fn strongest_dimension(analyses: &[DimensionAnalysis]) -> Option<&DimensionAnalysis> {
    analyses.iter().fold(None, |best, a| match best {
        Some(b) if b.score >= a.score => Some(b),
        _ => Some(a),
    })
}

/// Lowest-scoring dimension; ties go to the earlier one.
pub fn weakest_dimension(analyses: &[DimensionAnalysis]) -> Option<&DimensionAnalysis> {
    analyses.iter().fold(None, |worst, a| match worst {
        Some(w) if w.score <= a.score => Some(w),
        _ => Some(a),
    })
}

/// Group insights by kind.
pub fn group_by_kind(
    insights: &[OrganizationalInsight],
) -> BTreeMap<InsightKind, Vec<&OrganizationalInsight>> {
    let mut grouped: BTreeMap<InsightKind, Vec<&OrganizationalInsight>> = BTreeMap::new();

    for insight in insights {
        grouped.entry(insight.kind).or_default().push(insight);
    }

    grouped
}

/// Dimensions listed by score, lowest first (the improvement priorities).
pub fn improvement_priorities(analyses: &[DimensionAnalysis]) -> Vec<&DimensionAnalysis> {
    let mut sorted: Vec<&DimensionAnalysis> = analyses.iter().collect();
    sorted.sort_by(|a, b| {
        a.score
            .partial_cmp(&b.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    sorted
}
