//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use crate::config::Provider;
use clap::Parser;
use std::path::PathBuf;

/// OrgPulse - multi-agent organizational assessment analyzer
///
/// Scores survey responses across organizational dimensions with a team of
/// specialist agents, then writes a report with insights, a strategic plan,
/// a workshop plan and an ROI projection.
///
/// Examples:
///   orgpulse --demo
///   orgpulse --input responses.json --organization "Acme Corp"
///   orgpulse --input responses.json --provider ollama --model llama3.2:latest
///   orgpulse --demo --ask "What should we improve first?"
///   orgpulse --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// JSON file with assessment responses
    ///
    /// An array of objects with `dimension_id`, `question_id`, `value` (1-10)
    /// and an optional `context`.
    #[arg(
        short,
        long,
        value_name = "FILE",
        required_unless_present_any = ["demo", "init_config"],
        conflicts_with = "demo"
    )]
    pub input: Option<PathBuf>,

    /// Analyze the built-in demo responses
    #[arg(long)]
    pub demo: bool,

    /// Output file path for the report
    ///
    /// Default: from config or orgpulse_report.md
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format (markdown, json)
    #[arg(long, default_value = "markdown", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Path to configuration file
    ///
    /// If not specified, looks for .orgpulse.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Organization named in the report
    #[arg(long, value_name = "NAME")]
    pub organization: Option<String>,

    /// Agent provider (heuristic, ollama)
    #[arg(long, value_name = "PROVIDER")]
    pub provider: Option<Provider>,

    /// Ollama model used by the ollama provider
    #[arg(short, long, env = "ORGPULSE_MODEL")]
    pub model: Option<String>,

    /// Ollama API endpoint URL
    #[arg(long, env = "OLLAMA_URL")]
    pub ollama_url: Option<String>,

    /// Temperature for LLM responses (0.0 - 1.0)
    #[arg(long)]
    pub temperature: Option<f32>,

    /// Per-agent call timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Ask a question about the finished assessment
    ///
    /// Example: --ask "How can we improve leadership?"
    #[arg(long, value_name = "QUERY")]
    pub ask: Option<String>,

    /// Hide the progress bar
    #[arg(long)]
    pub no_progress: bool,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .orgpulse.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        if self.input.is_none() && !self.demo {
            return Err("Either --input or --demo is required".to_string());
        }

        if let Some(ref input) = self.input {
            if !input.is_file() {
                return Err(format!("Input file does not exist: {}", input.display()));
            }
        }

        if let Some(ref url) = self.ollama_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err("Ollama URL must start with 'http://' or 'https://'".to_string());
            }
        }

        if let Some(temperature) = self.temperature {
            if !(0.0..=1.0).contains(&temperature) {
                return Err("Temperature must be between 0.0 and 1.0".to_string());
            }
        }

        if let Some(timeout) = self.timeout {
            if timeout == 0 {
                return Err("Timeout must be at least 1 second".to_string());
            }
        }

        if let Some(ref query) = self.ask {
            if query.trim().is_empty() {
                return Err("--ask needs a non-empty question".to_string());
            }
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    ///
    /// `config_verbose` is the config file's `general.verbose`; `--quiet`
    /// still wins over it.
    pub fn log_level(&self, config_verbose: bool) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose || config_verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }

    /// Whether to draw the terminal progress bar.
    pub fn show_progress(&self) -> bool {
        !self.no_progress && !self.quiet
    }
}
