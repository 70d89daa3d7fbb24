//! CarbonEye - emission monitoring dashboard
//!
//! A CLI that shows vehicle and industry CO2 classification results from
//! the CarbonEye analysis backend and can trigger a fresh analysis run.
//!
//! Exit codes:
//!   0 - Results loaded and shown
//!   1 - Runtime error (bad arguments, config, output file, etc.)
//!   2 - The analysis run failed or no results could be loaded

mod backend;
mod cli;
mod config;
mod error;
mod models;
mod orchestrator;
mod report;
mod store;
mod views;

use anyhow::{Context, Result};
use backend::HttpBackend;
use cli::{Args, OutputFormat};
use config::{Config, CONFIG_FILE_NAME};
use indicatif::{ProgressBar, ProgressStyle};
use models::LoadStatus;
use orchestrator::{AnalysisOrchestrator, TriggerOutcome, RUNNING_MESSAGE};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;
use views::DashboardOptions;

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

    // Initialize logging
    init_logging(&args);

    info!("CarbonEye v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    match run_dashboard(args).await {
        Ok(exit_code) => {
            std::process::exit(exit_code);
        }
        Err(e) => {
            error!("Dashboard failed: {}", e);
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .carboneye.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(CONFIG_FILE_NAME);

    if path.exists() {
        eprintln!("⚠️  {} already exists. Remove it first or edit it manually.", CONFIG_FILE_NAME);
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE_NAME);
    println!("   Edit it to point at your analysis backend.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Warning: failed to set tracing subscriber: {}", e);
    }
}

/// Load results, optionally run an analysis, and render the dashboard.
/// Returns the exit code (0 or 2).
async fn run_dashboard(args: Args) -> Result<i32> {
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);
    config.validate().map_err(anyhow::Error::msg)?;

    let backend = HttpBackend::new(&config.api.base_url, config.api.timeout())
        .context("Failed to create HTTP client")?;
    let orchestrator = AnalysisOrchestrator::new(Arc::new(backend));

    // Show whatever the backend already has before any run
    orchestrator.reload().await;

    let mut run_failed = false;
    if args.run {
        let spinner = run_spinner(args.quiet);
        let outcome = orchestrator.trigger_run().await;
        spinner.finish_and_clear();

        debug!("Run outcome: {:?}", outcome);
        run_failed = outcome == TriggerOutcome::Failed;
    }

    let options = DashboardOptions {
        top_n: config.dashboard.top_n,
        api_base: config.api.base_url.clone(),
    };
    let dashboard = views::build_dashboard(
        &orchestrator.store(),
        orchestrator.run_state(),
        orchestrator.status_message(),
        &options,
    );

    let output = match config.dashboard.format {
        OutputFormat::Json => report::generate_json_report(&dashboard)?,
        OutputFormat::Markdown => report::generate_markdown_report(&dashboard),
    };

    match config.dashboard.output {
        Some(ref path) => {
            std::fs::write(path, &output)
                .with_context(|| format!("Failed to write dashboard to {}", path.display()))?;
            if !args.quiet {
                println!("✅ Dashboard saved to: {}", path.display());
            }
        }
        None => println!("{}", output),
    }

    if run_failed || dashboard.metadata.load_status != LoadStatus::Loaded {
        warn!("{}", dashboard.message);
        if !args.quiet {
            eprintln!("\n⚠️  {}", dashboard.message);
        }
        return Ok(2);
    }

    Ok(0)
}

/// Spinner shown while the backend recomputes.
fn run_spinner(quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(RUNNING_MESSAGE);
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_from_dir(Path::new(".")) {
        Ok(Some(config)) => {
            info!("Loaded default config from {}", CONFIG_FILE_NAME);
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}
