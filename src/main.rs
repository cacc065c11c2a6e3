//! Math Physical terminal client.

use std::fs::OpenOptions;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Mutex;

use clap::Parser;
use math_physical::{Config, QuizError};
use math_physical::scoring::TimeLimit;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file (default: math-physical.json in current directory)
    #[arg(short, long, value_name = "FILE")]
    config: Option<String>,

    /// Content service URL
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,

    /// Directory for the course list cache
    #[arg(long, value_name = "DIR")]
    cache_dir: Option<String>,

    /// Write logs to this file
    #[arg(long, value_name = "FILE")]
    log_file: Option<String>,

    /// Give each question this many seconds; the quiz ends when time runs out
    #[arg(long, value_name = "SECONDS")]
    time_budget: Option<u32>,

    /// Enable verbose logging (sets log level to debug)
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::from(2);
        }
    };

    if let Some(path) = &config.log_file {
        if let Err(e) = init_logging(Path::new(path), args.verbose) {
            eprintln!("Error: cannot open log file '{path}': {e}");
            return ExitCode::from(2);
        }
    }

    tracing::info!(base_url = %config.base_url, "math-physical starting");

    match math_physical::run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "exiting with error");
            eprintln!("Error: {e}");
            ExitCode::from(1)
        }
    }
}

fn load_config(args: &Args) -> Result<Config, QuizError> {
    let mut config = match &args.config {
        Some(path) => Config::load_from_file(Path::new(path))?,
        None => Config::load()?,
    };

    if let Some(base_url) = &args.base_url {
        config.base_url.clone_from(base_url);
    }
    if let Some(cache_dir) = &args.cache_dir {
        config.cache_dir.clone_from(cache_dir);
    }
    if let Some(log_file) = &args.log_file {
        config.log_file = Some(log_file.clone());
    }
    if let Some(seconds_per_question) = args.time_budget {
        config.time_limit = TimeLimit::Budget {
            seconds_per_question,
        };
    }

    // Re-validate after overrides
    config.validate()?;
    Ok(config)
}

/// Logs go to a file because the terminal belongs to the UI.
/// Priority: RUST_LOG env var > --verbose flag > default (info)
fn init_logging(path: &Path, verbose: bool) -> std::io::Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    let filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}
