//! Markdown and JSON report generation.
//!
//! This module renders an [`AssessmentReport`] as a Markdown document or
//! pretty-printed JSON.

use crate::analysis::aggregator::group_by_kind;
use crate::cli::OutputFormat;
use crate::config::ReportConfig;
use crate::models::{
    capitalize, AgentContribution, AssessmentResult, CrossDimensionPatterns, DimensionAnalysis,
    InsightKind, OrganizationalInsight, RoiProjection, StrategicPlan, WorkshopPlan,
};
use crate::report::{format_currency, AssessmentReport, ReportMetadata};
use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::Path;

/// Generate a complete Markdown report.
pub fn generate_markdown_report(report: &AssessmentReport, options: &ReportConfig) -> String {
    let result = &report.result;
    let mut output = String::new();

    output.push_str(&format!(
        "# Organizational Assessment: {}\n\n",
        report.metadata.organization
    ));

    output.push_str(&generate_metadata_section(&report.metadata));
    output.push_str(&generate_table_of_contents(options));
    output.push_str(&generate_overview_section(result));
    output.push_str(&generate_dimensions_section(&result.dimension_analyses));
    output.push_str(&generate_insights_section(&result.insights));

    if options.include_patterns {
        output.push_str(&generate_patterns_section(&result.patterns));
    }

    output.push_str(&generate_plan_section(&result.recommendations));
    output.push_str(&generate_roi_section(&result.roi_projections));

    if options.include_workshop {
        output.push_str(&generate_workshop_section(&result.workshop_plan));
    }
    if options.include_contributions {
        output.push_str(&generate_contributions_section(&result.agent_contributions));
    }

    output.push_str(&generate_footer());

    output
}

/// Generate the metadata section.
fn generate_metadata_section(metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!("- **Organization:** {}\n", metadata.organization));
    section.push_str(&format!(
        "- **Analysis Date:** {}\n",
        metadata.analysis_date.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    match &metadata.model {
        Some(model) => section.push_str(&format!(
            "- **Agents:** {} (`{}`)\n",
            metadata.provider, model
        )),
        None => section.push_str(&format!("- **Agents:** {}\n", metadata.provider)),
    }
    section.push_str(&format!("- **Session:** `{}`\n", metadata.session_id));
    section.push_str(&format!("- **Responses:** {}\n", metadata.total_responses));
    section.push_str(&format!(
        "- **Dimensions Analyzed:** {}\n",
        metadata.dimensions_analyzed
    ));
    if !metadata.degraded_dimensions.is_empty() {
        section.push_str(&format!(
            "- **Degraded Dimensions:** {}\n",
            metadata.degraded_dimensions.join(", ")
        ));
    }
    section.push_str(&format!(
        "- **Analysis Duration:** {:.1}s\n",
        metadata.duration_seconds
    ));
    section.push('\n');

    section
}

/// Generate the table of contents.
fn generate_table_of_contents(options: &ReportConfig) -> String {
    let mut toc = String::new();

    toc.push_str("## Table of Contents\n\n");
    toc.push_str("- [Metadata](#metadata)\n");
    toc.push_str("- [Overall Score](#overall-score)\n");
    toc.push_str("- [Dimension Scores](#dimension-scores)\n");
    toc.push_str("- [Insights](#insights)\n");
    if options.include_patterns {
        toc.push_str("- [Cross-Dimension Patterns](#cross-dimension-patterns)\n");
    }
    toc.push_str("- [Strategic Plan](#strategic-plan)\n");
    toc.push_str("- [ROI Projection](#roi-projection)\n");
    if options.include_workshop {
        toc.push_str("- [Workshop Plan](#workshop-plan)\n");
    }
    if options.include_contributions {
        toc.push_str("- [Agent Contributions](#agent-contributions)\n");
    }
    toc.push('\n');

    toc
}

/// Generate the overall score section.
fn generate_overview_section(result: &AssessmentResult) -> String {
    let mut section = String::new();

    section.push_str("## Overall Score\n\n");
    section.push_str(&format!(
        "**{:.1} / 100** {}\n\n",
        result.overall_score,
        InsightKind::from_score(result.overall_score).emoji()
    ));

    let counts: Vec<String> = [
        InsightKind::Strength,
        InsightKind::Opportunity,
        InsightKind::Critical,
    ]
    .iter()
    .map(|kind| format!("{} {}: {}", kind.emoji(), kind, result.insights_of_kind(*kind).len()))
    .collect();
    section.push_str(&counts.join(" | "));
    section.push_str("\n\n");

    section
}

/// Generate the per-dimension table.
fn generate_dimensions_section(analyses: &[DimensionAnalysis]) -> String {
    let mut section = String::new();

    section.push_str("## Dimension Scores\n\n");
    section.push_str("| Dimension | Score | Confidence | Primary Agent | Notes |\n");
    section.push_str("|:---|:---:|:---:|:---|:---|\n");

    for analysis in analyses {
        let notes = if analysis.degraded {
            "degraded: no agent responded".to_string()
        } else if analysis.agent_analysis.primary_error.is_some() {
            "placeholder analysis".to_string()
        } else {
            analysis.patterns.join("; ")
        };

        section.push_str(&format!(
            "| {} | {:.1} | {:.2} | {} | {} |\n",
            analysis.dimension_id,
            analysis.score,
            analysis.confidence,
            analysis.agent_analysis.primary.agent,
            notes
        ));
    }
    section.push('\n');

    section
}

/// Generate the insights section, grouped by kind.
fn generate_insights_section(insights: &[OrganizationalInsight]) -> String {
    let mut section = String::new();

    section.push_str("## Insights\n\n");

    if insights.is_empty() {
        section.push_str("No insights were generated.\n\n");
        return section;
    }

    for (kind, group) in group_by_kind(insights) {
        section.push_str(&format!("### {} {}\n\n", kind.emoji(), capitalize(&kind.to_string())));

        for insight in group {
            section.push_str(&format!(
                "#### {} ({:.0}% confidence)\n\n",
                insight.text,
                insight.confidence * 100.0
            ));

            if !insight.supporting_data.is_empty() {
                section.push_str(&format!(
                    "**Evidence:** {}\n\n",
                    insight.supporting_data.join("; ")
                ));
            }

            for action in &insight.recommended_actions {
                section.push_str(&format!("- {}\n", action));
            }
            section.push('\n');
        }
    }

    section
}

/// Generate the cross-dimension pattern section.
fn generate_patterns_section(patterns: &CrossDimensionPatterns) -> String {
    let mut section = String::new();

    section.push_str("## Cross-Dimension Patterns\n\n");

    if !patterns.correlations.is_empty() {
        section.push_str("| Dimensions | Strength | Type | Insight |\n");
        section.push_str("|:---|:---:|:---:|:---|\n");
        for correlation in &patterns.correlations {
            section.push_str(&format!(
                "| {} / {} | {:.2} | {:?} | {} |\n",
                correlation.dimensions[0],
                correlation.dimensions[1],
                correlation.strength,
                correlation.kind,
                correlation.insight
            ));
        }
        section.push('\n');
    }

    push_list(&mut section, "Anomalies", &patterns.anomalies);
    push_list(&mut section, "Trends", &patterns.trends);

    if let Some(ref effects) = patterns.network_effects {
        section.push_str(&format!("> **Network effects:** {}\n\n", effects));
    }

    section
}

/// Generate the strategic plan section.
fn generate_plan_section(plan: &StrategicPlan) -> String {
    let mut section = String::new();

    section.push_str("## Strategic Plan\n\n");
    push_numbered(&mut section, "Immediate (0-3 months)", &plan.immediate_actions);
    push_numbered(&mut section, "Medium Term (3-12 months)", &plan.medium_term_initiatives);
    push_numbered(&mut section, "Long Term (12+ months)", &plan.long_term_strategy);

    let resources = &plan.resource_requirements;
    section.push_str("### Resources\n\n");
    section.push_str(&format!("- **Budget:** {}\n", resources.budget));
    section.push_str(&format!("- **Timeline:** {}\n", resources.timeline));
    section.push_str(&format!(
        "- **Key Roles:** {}\n\n",
        resources.key_roles.join(", ")
    ));

    section
}

/// Generate the ROI section.
fn generate_roi_section(roi: &RoiProjection) -> String {
    let mut section = String::new();

    section.push_str("## ROI Projection\n\n");
    section.push_str("| | Year One | Three Years |\n");
    section.push_str("|:---|---:|---:|\n");
    section.push_str(&format!(
        "| ROI | {}% | {}% |\n",
        roi.year_one.roi_percentage, roi.three_year.roi_percentage
    ));
    section.push_str(&format!(
        "| Benefits | {} | {} |\n",
        format_currency(roi.year_one.total_benefits),
        format_currency(roi.three_year.cumulative_benefits)
    ));
    section.push_str(&format!(
        "| Costs | {} | {} |\n",
        format_currency(roi.year_one.implementation_cost),
        format_currency(roi.three_year.cumulative_costs)
    ));
    section.push_str(&format!(
        "| Net Benefit | {} | {} |\n\n",
        format_currency(roi.year_one.net_benefit),
        format_currency(roi.three_year.net_benefit)
    ));

    let breakdown = &roi.breakdown;
    section.push_str(&format!(
        "*Turnover savings {} | Productivity value {} | Engagement improvement {:.1}% | Turnover reduction {:.1}%*\n\n",
        format_currency(breakdown.turnover_savings),
        format_currency(breakdown.productivity_value),
        breakdown.engagement_improvement,
        breakdown.turnover_reduction
    ));

    section
}

/// Generate the workshop plan section.
fn generate_workshop_section(plan: &WorkshopPlan) -> String {
    let mut section = String::new();

    section.push_str("## Workshop Plan\n\n");
    section.push_str(&format!("**Format:** {}\n\n", plan.recommended_format));
    push_list(&mut section, "Participants", &plan.key_participants);
    push_numbered(&mut section, "Agenda", &plan.agenda);
    push_list(&mut section, "Materials", &plan.materials_needed);
    push_list(&mut section, "Expected Outcomes", &plan.expected_outcomes);

    section
}

/// Generate the agent attribution section.
fn generate_contributions_section(contributions: &BTreeMap<String, AgentContribution>) -> String {
    let mut section = String::new();

    section.push_str("## Agent Contributions\n\n");
    section.push_str("| Agent | Focus | Primary | Secondary | Insights |\n");
    section.push_str("|:---|:---|:---|:---|:---:|\n");

    for (agent, contribution) in contributions {
        section.push_str(&format!(
            "| {} | {} | {} | {} | {} |\n",
            agent,
            contribution.focus,
            dash_if_empty(&contribution.primary_dimensions),
            dash_if_empty(&contribution.secondary_dimensions),
            contribution.insights_generated
        ));
    }
    section.push('\n');

    section
}

/// Generate the report footer.
fn generate_footer() -> String {
    let mut footer = String::new();

    footer.push_str("---\n\n");
    footer.push_str(&format!(
        "*Report generated by OrgPulse v{}*\n",
        env!("CARGO_PKG_VERSION")
    ));

    footer
}

fn push_list(section: &mut String, title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    section.push_str(&format!("### {}\n\n", title));
    for item in items {
        section.push_str(&format!("- {}\n", item));
    }
    section.push('\n');
}

fn push_numbered(section: &mut String, title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    section.push_str(&format!("### {}\n\n", title));
    for (i, item) in items.iter().enumerate() {
        section.push_str(&format!("{}. {}\n", i + 1, item));
    }
    section.push('\n');
}

fn dash_if_empty(items: &[String]) -> String {
    if items.is_empty() {
        "-".to_string()
    } else {
        items.join(", ")
    }
}

/// Generate a JSON report.
pub fn generate_json_report(report: &AssessmentReport) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}

/// Render the report in `format` and write it to `path`.
pub fn write_report(
    report: &AssessmentReport,
    format: OutputFormat,
    options: &ReportConfig,
    path: &Path,
) -> Result<()> {
    let content = match format {
        OutputFormat::Json => generate_json_report(report)?,
        OutputFormat::Markdown => generate_markdown_report(report, options),
    };

    std::fs::write(path, content)
        .with_context(|| format!("Failed to write report to {}", path.display()))
}
