//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.orgpulse.toml` files.

use crate::analysis::roi::RoiBaseline;
use crate::dimensions::{DimensionDefinition, DimensionRegistry};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Name of the configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = ".orgpulse.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Agent backend settings.
    #[serde(default)]
    pub agents: AgentsConfig,

    /// ROI model baseline.
    #[serde(default)]
    pub roi: RoiBaseline,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,

    /// Replaces the built-in dimension framework when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<Vec<DimensionDefinition>>,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Default output file path.
    #[serde(default = "default_output")]
    pub output: String,

    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,

    /// Organization named in reports.
    #[serde(default = "default_organization")]
    pub organization: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
            verbose: false,
            organization: default_organization(),
        }
    }
}

fn default_output() -> String {
    "orgpulse_report.md".to_string()
}

fn default_organization() -> String {
    "Organization".to_string()
}

/// Which backend fulfils the dimension agents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// Deterministic local rules (default)
    #[default]
    Heuristic,
    /// Local Ollama model
    Ollama,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Heuristic => "heuristic",
            Provider::Ollama => "ollama",
        }
    }
}

/// Agent backend settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentsConfig {
    #[serde(default)]
    pub provider: Provider,

    /// Model name, used by the `ollama` provider.
    #[serde(default = "default_model")]
    pub model: String,

    /// Ollama API URL.
    #[serde(default = "default_ollama_url")]
    pub ollama_url: String,

    /// Temperature for generation.
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Per agent call timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for AgentsConfig {
    fn default() -> Self {
        Self {
            provider: Provider::default(),
            model: default_model(),
            ollama_url: default_ollama_url(),
            temperature: default_temperature(),
            timeout_seconds: default_timeout(),
        }
    }
}

fn default_model() -> String {
    "llama3.2:latest".to_string()
}

fn default_ollama_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_temperature() -> f32 {
    0.1
}

fn default_timeout() -> u64 {
    60
}

/// Report generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Include the cross-dimension pattern section.
    #[serde(default = "default_true")]
    pub include_patterns: bool,

    /// Include the workshop plan section.
    #[serde(default = "default_true")]
    pub include_workshop: bool,

    /// Include per-agent contribution attribution.
    #[serde(default = "default_true")]
    pub include_contributions: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            include_patterns: true,
            include_workshop: true,
            include_contributions: true,
        }
    }
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(DEFAULT_CONFIG_FILE);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// Only values given explicitly on the command line override the file.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(provider) = args.provider {
            self.agents.provider = provider;
        }
        if let Some(ref model) = args.model {
            self.agents.model = model.clone();
        }
        if let Some(ref url) = args.ollama_url {
            self.agents.ollama_url = url.clone();
        }
        if let Some(temperature) = args.temperature {
            self.agents.temperature = temperature;
        }
        if let Some(timeout) = args.timeout {
            self.agents.timeout_seconds = timeout;
        }
        if let Some(ref organization) = args.organization {
            self.general.organization = organization.clone();
        }
        if let Some(ref output) = args.output {
            self.general.output = output.display().to_string();
        }

        if args.verbose {
            self.general.verbose = true;
        }
    }

    /// Dimension framework in effect: the override table or the standard six.
    pub fn dimension_registry(&self) -> Result<DimensionRegistry> {
        match &self.dimensions {
            Some(definitions) => DimensionRegistry::from_definitions(definitions.clone())
                .map_err(|e| anyhow::anyhow!("Invalid [[dimensions]] table: {}", e)),
            None => Ok(DimensionRegistry::standard()),
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dimensions::AgentKind;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.agents.provider, Provider::Heuristic);
        assert_eq!(config.agents.model, "llama3.2:latest");
        assert_eq!(config.roi.employee_count, 1000);
        assert!(config.dimensions.is_none());
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[general]
output = "custom_report.md"
organization = "Acme Corp"

[agents]
provider = "ollama"
model = "qwen2.5:14b"
timeout_seconds = 30

[roi]
employee_count = 250
avg_salary = 65000.0
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.general.output, "custom_report.md");
        assert_eq!(config.general.organization, "Acme Corp");
        assert_eq!(config.agents.provider, Provider::Ollama);
        assert_eq!(config.agents.model, "qwen2.5:14b");
        assert_eq!(config.agents.timeout_seconds, 30);
        assert_eq!(config.agents.temperature, 0.1);
        assert_eq!(config.roi.employee_count, 250);
        assert_eq!(config.roi.current_turnover_rate, 0.15);
    }

    #[test]
    fn test_general_verbose_reaches_log_level() {
        use clap::Parser;

        let config: Config = toml::from_str("[general]\nverbose = true\n").unwrap();
        assert!(config.general.verbose);

        let args = crate::cli::Args::try_parse_from(["orgpulse", "--demo"]).unwrap();
        assert_eq!(args.log_level(config.general.verbose), tracing::Level::DEBUG);
    }

    #[test]
    fn test_dimension_override() {
        let toml_content = r#"
[[dimensions]]
id = "wellbeing"
name = "Wellbeing"
primary_agent = "culture-specialist"
secondary_agents = ["pattern-specialist"]
key_factors = ["workload", "burnout"]
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        let registry = config.dimension_registry().unwrap();
        assert_eq!(registry.ids(), vec!["wellbeing"]);
        let wellbeing = registry.get("wellbeing").unwrap();
        assert_eq!(wellbeing.primary_agent, AgentKind::CultureSpecialist);
        assert_eq!(wellbeing.secondary_agents, vec![AgentKind::PatternSpecialist]);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[general]\norganization = \"Initech\"").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.general.organization, "Initech");
        assert_eq!(config.agents.provider, Provider::Heuristic);
    }

    #[test]
    fn test_load_reports_parse_errors() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[agents]\nprovider = \"openai\"").unwrap();

        assert!(Config::load(file.path()).is_err());
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[agents]"));
        assert!(toml_str.contains("[roi]"));
        assert!(toml_str.contains("[report]"));

        let reparsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(reparsed.agents.timeout_seconds, 60);
    }
}
