//! Ollama-backed dimension agent.
//!
//! The score is always computed locally with the deterministic formula so
//! that model output can never push it out of range. The model is only asked
//! for the narrative: insights, recommendations and patterns, as one JSON
//! object.

use crate::agent::traits::DimensionAgent;
use crate::analysis::scoring::{normalized_score, variance_pattern};
use crate::dimensions::{AgentKind, DimensionDefinition};
use crate::error::AgentError;
use crate::models::{AgentAnalysis, AssessmentResponse, Validation, ValidationStatus};
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Confidence reported with a model-backed analysis.
const MODEL_CONFIDENCE: f64 = 0.8;

/// Connection settings for the Ollama chat endpoint.
#[derive(Debug, Clone)]
pub struct OllamaSettings {
    pub url: String,
    pub model: String,
    pub temperature: f32,
    pub timeout_seconds: u64,
}

impl Default for OllamaSettings {
    fn default() -> Self {
        Self {
            url: "http://localhost:11434".to_string(),
            model: "llama3.2:latest".to_string(),
            temperature: 0.1,
            timeout_seconds: 60,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct OllamaChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    stream: bool,
    format: String,
    options: OllamaOptions,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct OllamaChatResponse {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: String,
}

/// Narrative the model is asked to return for a dimension.
#[derive(Debug, Default, Deserialize)]
struct Narrative {
    #[serde(default)]
    insights: Vec<String>,
    #[serde(default)]
    recommendations: Vec<String>,
    #[serde(default)]
    patterns: Vec<String>,
}

/// A specialist agent that delegates narrative to a local Ollama model.
pub struct OllamaAgent {
    kind: AgentKind,
    settings: OllamaSettings,
    http_client: reqwest::Client,
}

impl OllamaAgent {
    pub fn new(kind: AgentKind, settings: OllamaSettings) -> Result<Self> {
        info!(
            agent = %kind,
            "Initializing Ollama agent with model {} at {}",
            settings.model, settings.url
        );

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            kind,
            settings,
            http_client,
        })
    }

    fn system_prompt(&self) -> String {
        format!(
            "You are an organizational assessment analyst. Your focus: {}.\n\
             Reply with a single JSON object with the keys \"insights\", \
             \"recommendations\" and \"patterns\", each an array of short strings.\n\
             Only output valid JSON, no explanations or markdown.",
            self.kind.focus()
        )
    }

    fn build_prompt(
        definition: &DimensionDefinition,
        responses: &[AssessmentResponse],
        score: f64,
    ) -> String {
        let mut prompt = format!(
            "Dimension: {} ({})\nScore: {:.1}/100\n",
            definition.name, definition.id, score
        );

        if !definition.key_factors.is_empty() {
            let factors: Vec<&str> = definition.key_factors.iter().map(String::as_str).collect();
            prompt.push_str(&format!("Key factors: {}\n", factors.join(", ")));
        }

        prompt.push_str("\nResponses (1-10 scale):\n");
        for response in responses {
            prompt.push_str(&format!("- {}: {}", response.question_id, response.value));
            if !response.context.is_empty() {
                prompt.push_str(&format!(" ({})", response.context));
            }
            prompt.push('\n');
        }

        prompt
    }

    /// Send one system + user exchange and return the reply text.
    async fn send_prompt(&self, prompt: &str) -> Result<String, AgentError> {
        let url = format!("{}/api/chat", self.settings.url);

        let request = OllamaChatRequest {
            model: self.settings.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: self.system_prompt(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: prompt.to_string(),
                },
            ],
            stream: false,
            format: "json".to_string(),
            options: OllamaOptions {
                temperature: self.settings.temperature,
            },
        };

        debug!(agent = %self.kind, "Sending chat request to {}", url);

        let response = self
            .http_client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AgentError::Timeout(self.settings.timeout_seconds)
                } else if e.is_connect() {
                    AgentError::Unavailable(format!(
                        "Cannot connect to Ollama at {}",
                        self.settings.url
                    ))
                } else {
                    AgentError::Request(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AgentError::Request(format!(
                "Ollama API error {}: {}",
                status, body
            )));
        }

        let chat_response: OllamaChatResponse = response
            .json()
            .await
            .map_err(|e| AgentError::MalformedResponse(e.to_string()))?;

        Ok(chat_response.message.content)
    }
}

/// Pull the narrative object out of a model reply.
///
/// Models sometimes wrap the object in prose or code fences, so everything
/// outside the outermost braces is ignored.
fn parse_narrative(reply: &str) -> Result<Narrative, AgentError> {
    let start = reply.find('{');
    let end = reply.rfind('}');

    let body = match (start, end) {
        (Some(start), Some(end)) if start < end => &reply[start..=end],
        _ => {
            return Err(AgentError::MalformedResponse(
                "Reply contains no JSON object".to_string(),
            ))
        }
    };

    let narrative: Narrative = serde_json::from_str(body)
        .map_err(|e| AgentError::MalformedResponse(e.to_string()))?;

    if narrative.insights.is_empty() {
        return Err(AgentError::MalformedResponse(
            "Reply has no insights".to_string(),
        ));
    }

    Ok(narrative)
}

#[async_trait]
impl DimensionAgent for OllamaAgent {
    fn kind(&self) -> AgentKind {
        self.kind
    }

    async fn analyze(
        &self,
        definition: &DimensionDefinition,
        responses: &[AssessmentResponse],
    ) -> Result<AgentAnalysis, AgentError> {
        let score = normalized_score(responses).ok_or_else(|| {
            AgentError::InvalidInput(format!("No responses for dimension {}", definition.id))
        })?;

        let reply = self
            .send_prompt(&Self::build_prompt(definition, responses, score))
            .await?;
        let narrative = parse_narrative(&reply)?;

        let mut patterns = vec![variance_pattern(responses).to_string()];
        patterns.extend(narrative.patterns);

        Ok(AgentAnalysis {
            agent: self.kind,
            score,
            insights: narrative.insights,
            recommendations: narrative.recommendations,
            patterns,
            confidence: MODEL_CONFIDENCE,
        })
    }

    async fn validate(
        &self,
        dimension_id: &str,
        prior: &AgentAnalysis,
        responses: &[AssessmentResponse],
    ) -> Validation {
        let mut prompt = format!(
            "Review this analysis of the {} dimension (score {:.1}/100).\n\
             Return additional insights the analysis missed under \"insights\" \
             and ways to deepen it under \"recommendations\".\n\nPrior insights:\n",
            dimension_id, prior.score
        );
        for insight in &prior.insights {
            prompt.push_str(&format!("- {}\n", insight));
        }
        prompt.push_str(&format!("\nResponse count: {}\n", responses.len()));

        let narrative = match self.send_prompt(&prompt).await {
            Ok(reply) => parse_narrative(&reply),
            Err(e) => Err(e),
        };

        match narrative {
            Ok(narrative) => Validation {
                agent: self.kind,
                status: ValidationStatus::Confirmed,
                additional_insights: narrative.insights,
                enhancement_suggestions: narrative.recommendations,
            },
            Err(e) => {
                warn!(agent = %self.kind, dimension = dimension_id, "Validation failed: {}", e);
                Validation::unavailable(self.kind)
            }
        }
    }
}
