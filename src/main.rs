//! OrgPulse - multi-agent organizational assessment analyzer
//!
//! A CLI tool that scores survey responses across organizational
//! dimensions with a team of specialist agents and writes a report with
//! insights, a strategic plan, a workshop plan and an ROI projection.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime or input error (bad responses, config, agent backend, IO)

mod agent;
mod analysis;
mod cli;
mod config;
mod dimensions;
mod error;
mod intake;
mod models;
mod progress;
mod report;
mod routing;
mod session;
#[cfg(test)]
mod testing;

use agent::AgentRegistry;
use analysis::roi::RoiProjector;
use analysis::AssessmentOrchestrator;
use anyhow::{Context, Result};
use chrono::Utc;
use cli::Args;
use config::{Config, Provider, DEFAULT_CONFIG_FILE};
use models::InsightKind;
use progress::{FanoutSink, ProgressBarSink, TracingSink};
use report::{AssessmentReport, ReportMetadata};
use session::SessionStore;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Load configuration first so its verbosity reaches the subscriber
    let (config, source) = load_config(&args);
    let config_verbose = config.as_ref().map(|c| c.general.verbose).unwrap_or(false);

    // Initialize logging
    init_logging(args.log_level(config_verbose));

    info!("OrgPulse v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);
    source.log();

    match run_assessment(args, config).await {
        Ok(()) => Ok(()),
        Err(e) => {
            error!("Assessment failed: {:#}", e);
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .orgpulse.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(DEFAULT_CONFIG_FILE);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            DEFAULT_CONFIG_FILE
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", DEFAULT_CONFIG_FILE))?;

    println!("✅ Created {} with default settings.", DEFAULT_CONFIG_FILE);
    println!("   Edit it to customize agents, ROI baseline, report sections and dimensions.");
    Ok(())
}

/// Initialize logging at the given level.
fn init_logging(level: tracing::Level) {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Run the complete assessment workflow.
async fn run_assessment(args: Args, config: Result<Config>) -> Result<()> {
    let start_time = Instant::now();

    let mut config = config?;
    config.merge_with_args(&args);

    let dimensions = config.dimension_registry()?;

    // Step 1: Collect responses
    let responses = match args.input {
        Some(ref path) => {
            println!("📥 Loading responses from {}", path.display());
            intake::load_responses(path)?
        }
        None => {
            println!("📥 Using demo responses");
            intake::demo_responses()
        }
    };

    // Step 2: Assemble the agent team
    println!("🤖 Initializing agents...");
    println!("   Provider: {}", config.agents.provider.as_str());
    if config.agents.provider == Provider::Ollama {
        println!("   Model: {}", config.agents.model);
        println!("   Ollama: {}", config.agents.ollama_url);
    }
    println!("   Timeout: {}s", config.agents.timeout_seconds);

    let agents = AgentRegistry::from_config(&config.agents)?;

    let sessions = SessionStore::new();
    let session_id = sessions.create(&config.general.organization);

    let mut sink = FanoutSink::new()
        .with(Arc::new(TracingSink))
        .with(Arc::new(sessions.sink(session_id)));
    if args.show_progress() {
        sink = sink.with(Arc::new(ProgressBarSink::new()));
    }
    debug!("Progress fan-out to {} sinks", sink.len());

    let orchestrator = AssessmentOrchestrator::new(dimensions, agents)
        .with_roi(RoiProjector::new(config.roi.clone()))
        .with_timeout(Duration::from_secs(config.agents.timeout_seconds))
        .with_sink(Arc::new(sink));

    // Step 3: Run the assessment
    println!(
        "\n🔬 Analyzing {} responses ({} dimensions in the framework)...\n",
        responses.len(),
        orchestrator.dimensions().ids().len()
    );

    let result = orchestrator.run(&responses).await?;
    sessions.complete(&session_id, result.clone());

    // Step 4: Build the report
    println!("\n📝 Generating report...");

    let duration = start_time.elapsed().as_secs_f64();
    let degraded: Vec<String> = result
        .degraded_dimensions()
        .into_iter()
        .map(String::from)
        .collect();
    if !degraded.is_empty() {
        warn!("Degraded dimensions: {}", degraded.join(", "));
    }

    let metadata = ReportMetadata {
        organization: config.general.organization.clone(),
        analysis_date: Utc::now(),
        provider: config.agents.provider.as_str().to_string(),
        model: (config.agents.provider == Provider::Ollama).then(|| config.agents.model.clone()),
        session_id,
        total_responses: responses.len(),
        dimensions_analyzed: result.dimension_analyses.len(),
        degraded_dimensions: degraded,
        duration_seconds: duration,
    };

    let report = AssessmentReport { metadata, result };

    // Step 5: Save the report
    let output_path = PathBuf::from(&config.general.output);
    report::write_report(&report, args.format, &config.report, &output_path)?;

    // Print summary
    let result = &report.result;
    println!("\n📊 Assessment Summary:");
    println!("   Overall score: {:.1}/100", result.overall_score);
    for analysis in &result.dimension_analyses {
        println!(
            "   {} {}: {:.1}{}",
            InsightKind::from_score(analysis.score).emoji(),
            analysis.dimension_id,
            analysis.score,
            if analysis.degraded { " (degraded)" } else { "" }
        );
    }
    println!(
        "   First-year ROI: {}% | Three-year ROI: {}%",
        result.roi_projections.year_one.roi_percentage,
        result.roi_projections.three_year.roi_percentage
    );
    println!("   Duration: {:.1}s", duration);
    println!(
        "\n✅ Assessment complete! Report saved to: {}",
        output_path.display()
    );

    // Step 6: Answer a follow-up question
    if let Some(ref query) = args.ask {
        let answer = routing::answer_query(query, result, responses.len());
        println!("\n💬 {} ({}):", answer.agent.focus(), answer.agent);
        println!("   {}", answer.text);
    }

    if let Some(state) = sessions.get(&session_id) {
        debug!(
            session = %session_id,
            insights = state.insights_generated,
            "Session finished at {:.0}%",
            state.completion_percentage
        );
    }
    for (agent, stats) in sessions.agent_stats() {
        debug!(%agent, tasks = stats.tasks_completed, "Agent activity");
    }

    Ok(())
}

/// Where the configuration came from.
///
/// Loading happens before tracing is up, so the outcome is logged later.
enum ConfigSource {
    Explicit(PathBuf),
    DefaultFile,
    Defaults,
    DefaultFileUnreadable(String),
}

impl ConfigSource {
    fn log(&self) {
        match self {
            ConfigSource::Explicit(path) => info!("Loaded config from: {}", path.display()),
            ConfigSource::DefaultFile => info!("Loaded default config from {}", DEFAULT_CONFIG_FILE),
            ConfigSource::Defaults => debug!("No config file found, using defaults"),
            ConfigSource::DefaultFileUnreadable(e) => warn!("Failed to load config: {}", e),
        }
    }
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> (Result<Config>, ConfigSource) {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        return (
            Config::load(config_path),
            ConfigSource::Explicit(config_path.clone()),
        );
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => (Ok(config), ConfigSource::DefaultFile),
        Ok(None) => (Ok(Config::default()), ConfigSource::Defaults),
        Err(e) => (
            Ok(Config::default()),
            ConfigSource::DefaultFileUnreadable(e.to_string()),
        ),
    }
}
