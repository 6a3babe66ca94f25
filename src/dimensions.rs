//! Assessment dimension framework.
//!
//! Each dimension names one primary agent and an ordered list of secondary
//! agents. The registry is built once at startup and only read afterwards.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// The three analysis specializations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AgentKind {
    /// Pattern recognition and cross-dimension correlation.
    PatternSpecialist,
    /// Leadership analysis and strategic planning.
    StrategySpecialist,
    /// Cultural insight and workshop preparation.
    CultureSpecialist,
}

impl AgentKind {
    /// All agent kinds in a fixed order.
    pub const ALL: [AgentKind; 3] = [
        AgentKind::PatternSpecialist,
        AgentKind::StrategySpecialist,
        AgentKind::CultureSpecialist,
    ];

    /// Stable identifier used in reports and maps.
    pub fn as_str(&self) -> &'static str {
        match self {
            AgentKind::PatternSpecialist => "pattern-specialist",
            AgentKind::StrategySpecialist => "strategy-specialist",
            AgentKind::CultureSpecialist => "culture-specialist",
        }
    }

    /// What this agent contributes to a run.
    pub fn focus(&self) -> &'static str {
        match self {
            AgentKind::PatternSpecialist => {
                "Cross-dimensional pattern recognition and correlation analysis"
            }
            AgentKind::StrategySpecialist => "Leadership analysis and strategic recommendations",
            AgentKind::CultureSpecialist => "Deep cultural insights and workshop preparation",
        }
    }
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Static definition of one assessment dimension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimensionDefinition {
    /// Identifier used by responses (e.g. `leadership`).
    pub id: String,
    /// Human readable name.
    pub name: String,
    /// Agent that produces the dimension score.
    pub primary_agent: AgentKind,
    /// Agents that validate the primary analysis, in call order.
    #[serde(default)]
    pub secondary_agents: Vec<AgentKind>,
    /// Factors the dimension's questions cover.
    #[serde(default)]
    pub key_factors: BTreeSet<String>,
}

impl DimensionDefinition {
    fn new(
        id: &str,
        name: &str,
        primary_agent: AgentKind,
        secondary_agents: &[AgentKind],
        key_factors: &[&str],
    ) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            primary_agent,
            secondary_agents: secondary_agents.to_vec(),
            key_factors: key_factors.iter().map(|f| f.to_string()).collect(),
        }
    }
}

/// Ordered, read-only set of dimension definitions.
#[derive(Debug, Clone)]
pub struct DimensionRegistry {
    definitions: Vec<DimensionDefinition>,
}

impl DimensionRegistry {
    /// The six canonical dimensions.
    pub fn standard() -> Self {
        use AgentKind::*;

        Self {
            definitions: vec![
                DimensionDefinition::new(
                    "leadership",
                    "Leadership Effectiveness",
                    StrategySpecialist,
                    &[CultureSpecialist],
                    &[
                        "vision_communication",
                        "leadership_consistency",
                        "adaptive_leadership",
                        "decision_making",
                        "strategic_alignment",
                    ],
                ),
                DimensionDefinition::new(
                    "engagement",
                    "Employee Engagement",
                    PatternSpecialist,
                    &[StrategySpecialist],
                    &[
                        "net_promoter",
                        "values_alignment",
                        "motivation_levels",
                        "career_satisfaction",
                        "work_energy",
                    ],
                ),
                DimensionDefinition::new(
                    "culture",
                    "Cultural Alignment",
                    CultureSpecialist,
                    &[PatternSpecialist],
                    &[
                        "values_integration",
                        "psychological_safety",
                        "inclusion",
                        "cultural_consistency",
                        "belonging",
                    ],
                ),
                DimensionDefinition::new(
                    "communication",
                    "Communication Patterns",
                    PatternSpecialist,
                    &[CultureSpecialist],
                    &[
                        "information_flow",
                        "cross_functional_collaboration",
                        "feedback_quality",
                        "transparency",
                        "listening_culture",
                    ],
                ),
                DimensionDefinition::new(
                    "innovation",
                    "Innovation Capability",
                    StrategySpecialist,
                    &[CultureSpecialist],
                    &[
                        "innovation_encouragement",
                        "market_responsiveness",
                        "learning_agility",
                        "risk_tolerance",
                        "experimentation",
                    ],
                ),
                DimensionDefinition::new(
                    "agility",
                    "Organizational Agility",
                    CultureSpecialist,
                    &[StrategySpecialist],
                    &[
                        "decision_speed",
                        "structural_efficiency",
                        "future_readiness",
                        "adaptability",
                        "change_management",
                    ],
                ),
            ],
        }
    }

    /// Build a registry from explicit definitions (config overrides).
    ///
    /// Rejects empty ids and duplicate ids.
    pub fn from_definitions(definitions: Vec<DimensionDefinition>) -> Result<Self, String> {
        if definitions.is_empty() {
            return Err("At least one dimension must be defined".to_string());
        }

        let mut seen = BTreeSet::new();
        for definition in &definitions {
            if definition.id.trim().is_empty() {
                return Err("Dimension id must not be empty".to_string());
            }
            if !seen.insert(definition.id.as_str()) {
                return Err(format!("Duplicate dimension id: {}", definition.id));
            }
        }

        Ok(Self { definitions })
    }

    /// Look up a definition by id.
    pub fn get(&self, id: &str) -> Option<&DimensionDefinition> {
        self.definitions.iter().find(|d| d.id == id)
    }

    /// Whether the id is a known dimension.
    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Definition-order index of a dimension.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.definitions.iter().position(|d| d.id == id)
    }

    /// All dimension ids in definition order.
    pub fn ids(&self) -> Vec<&str> {
        self.definitions.iter().map(|d| d.id.as_str()).collect()
    }

    /// All definitions in definition order.
    pub fn definitions(&self) -> &[DimensionDefinition] {
        &self.definitions
    }
}

impl Default for DimensionRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

/// Fixed placeholder insight used when a dimension's agents are unreachable.
pub fn fallback_insight(dimension_id: &str) -> String {
    match dimension_id {
        "leadership" => {
            "Strong leadership foundation detected. Vision communication shows strategic clarity."
        }
        "engagement" => {
            "Employee engagement patterns indicate good organizational health with growth potential."
        }
        "culture" => {
            "Cultural alignment demonstrates solid values integration with room for enhancement."
        }
        "communication" => {
            "Communication flows show effective information sharing across organizational levels."
        }
        "innovation" => {
            "Innovation capability indicates healthy experimentation and learning culture."
        }
        "agility" => {
            "Organizational agility reflects adaptive decision-making and structural efficiency."
        }
        _ => "Positive organizational indicators detected.",
    }
    .to_string()
}
