//! Free-text query routing.
//!
//! Two policy tables: which agent a question goes to, and which part of a
//! completed result answers it. Matching is case-insensitive substring
//! matching; the first matching row wins.

use crate::analysis::aggregator::{improvement_priorities, strongest_dimension, weakest_dimension};
use crate::dimensions::AgentKind;
use crate::models::AssessmentResult;
use crate::report::format_currency;
use serde::Serialize;

/// Agent that answers questions no rule claims.
pub const DEFAULT_AGENT: AgentKind = AgentKind::PatternSpecialist;

/// Keyword set to agent.
const AGENT_POLICY: [(&[&str], AgentKind); 2] = [
    (&["leadership", "strategy"], AgentKind::StrategySpecialist),
    (&["culture", "values"], AgentKind::CultureSpecialist),
];

/// What a question is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Topic {
    Scores,
    Improvement,
    Roi,
    Workshop,
    General,
}

/// Keyword set to topic.
const TOPIC_POLICY: [(&[&str], Topic); 4] = [
    (&["score", "result"], Topic::Scores),
    (&["improve", "recommendation"], Topic::Improvement),
    (&["roi", "value"], Topic::Roi),
    (&["workshop", "next step"], Topic::Workshop),
];

const HELP_TEXT: &str = "Based on your assessment data, I can provide insights on organizational \
strengths, improvement opportunities, ROI projections, or implementation strategies. \
What specific aspect would you like to explore?";

/// A routed, answered question.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryAnswer {
    pub agent: AgentKind,
    pub topic: Topic,
    pub text: String,
}

fn first_match<T: Copy>(query: &str, table: &[(&[&str], T)]) -> Option<T> {
    let query = query.to_lowercase();
    table
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| query.contains(k)))
        .map(|(_, value)| *value)
}

/// Pick the agent a question should go to.
pub fn route_query(query: &str) -> AgentKind {
    first_match(query, &AGENT_POLICY).unwrap_or(DEFAULT_AGENT)
}

/// Classify what a question asks about.
pub fn classify_topic(query: &str) -> Topic {
    first_match(query, &TOPIC_POLICY).unwrap_or(Topic::General)
}

/// Answer a question from a completed run.
pub fn answer_query(query: &str, result: &AssessmentResult, response_count: usize) -> QueryAnswer {
    let topic = classify_topic(query);

    let text = match topic {
        Topic::Scores => {
            let mut text = format!(
                "Your overall score is {:.1}/100 across {} dimensions, based on {} responses.",
                result.overall_score,
                result.dimension_scores.len(),
                response_count
            );
            let analyses = &result.dimension_analyses;
            if let (Some(strong), Some(weak)) =
                (strongest_dimension(analyses), weakest_dimension(analyses))
            {
                text.push_str(&format!(
                    " Strongest: {} ({:.1}). Weakest: {} ({:.1}).",
                    strong.dimension_id, strong.score, weak.dimension_id, weak.score
                ));
            }
            text
        }
        Topic::Improvement => {
            let priorities: Vec<&str> = improvement_priorities(&result.dimension_analyses)
                .into_iter()
                .take(2)
                .map(|a| a.dimension_id.as_str())
                .collect();
            format!(
                "Primary improvement opportunities focus on {}. Immediate actions: {}.",
                priorities.join(" and "),
                result.recommendations.immediate_actions.join("; ")
            )
        }
        Topic::Roi => {
            let roi = &result.roi_projections;
            format!(
                "Projected first-year ROI is {}% ({} net benefit on {} implementation cost). \
                 Three-year ROI is {}%.",
                roi.year_one.roi_percentage,
                format_currency(roi.year_one.net_benefit),
                format_currency(roi.year_one.implementation_cost),
                roi.three_year.roi_percentage
            )
        }
        Topic::Workshop => {
            let plan = &result.workshop_plan;
            format!(
                "I recommend a {} within 2-3 weeks to validate findings with key stakeholders. \
                 Agenda: {}.",
                plan.recommended_format.to_lowercase(),
                plan.agenda.join(", ")
            )
        }
        Topic::General => HELP_TEXT.to_string(),
    };

    QueryAnswer {
        agent: route_query(query),
        topic,
        text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::AgentRegistry;
    use crate::analysis::AssessmentOrchestrator;
    use crate::dimensions::DimensionRegistry;
    use crate::intake::demo_responses;

    #[test]
    fn test_route_query() {
        assert_eq!(route_query("How is our Leadership doing?"), AgentKind::StrategySpecialist);
        assert_eq!(route_query("what about strategy"), AgentKind::StrategySpecialist);
        assert_eq!(route_query("Are our values lived?"), AgentKind::CultureSpecialist);
        assert_eq!(route_query("show me trends"), DEFAULT_AGENT);
        // First row wins.
        assert_eq!(route_query("leadership culture"), AgentKind::StrategySpecialist);
    }

    #[test]
    fn test_classify_topic() {
        assert_eq!(classify_topic("What is my score?"), Topic::Scores);
        assert_eq!(classify_topic("How can we improve?"), Topic::Improvement);
        assert_eq!(classify_topic("Show the ROI"), Topic::Roi);
        assert_eq!(classify_topic("What's the next step?"), Topic::Workshop);
        assert_eq!(classify_topic("hello"), Topic::General);
    }

    #[tokio::test]
    async fn test_answers_use_the_result() {
        let result =
            AssessmentOrchestrator::new(DimensionRegistry::standard(), AgentRegistry::heuristic())
                .run(&demo_responses())
                .await
                .unwrap();

        let answer = answer_query("what is our score", &result, 6);
        assert_eq!(answer.topic, Topic::Scores);
        assert!(answer.text.contains("based on 6 responses"));
        assert!(answer.text.contains("Strongest: engagement (55.0)"));

        let answer = answer_query("How do we improve leadership?", &result, 6);
        assert_eq!(answer.agent, AgentKind::StrategySpecialist);
        assert!(answer.text.contains("leadership and culture"));

        let answer = answer_query("roi?", &result, 6);
        assert!(answer.text.contains("5975%"));

        let answer = answer_query("Tell me about the workshop", &result, 6);
        assert!(answer.text.contains("full-day strategic workshop"));

        assert_eq!(answer_query("hi", &result, 6).text, HELP_TEXT);
    }
}
