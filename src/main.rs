//! dmanalyzer - version 0.1.0
//!
//! Android dumpsys meminfo trend charts with tracing logging.
//! This is the main entry point that resolves configuration and dispatches subcommands.

mod commands;

use clap::{CommandFactory, Parser};
use std::path::PathBuf;
use tracing::level_filters::LevelFilter;
use tracing::{debug, error, info};

use commands::{command_analyze, command_config, command_inspect};
use dmanalyzer::cli::{Args, Commands, LogLevel};
use dmanalyzer::config::{
    parse_log_level, resolve_config, show_config, validate_effective_config, Config,
};
use dmanalyzer::AnalyzerError;

/// Initializes tracing logging subsystem with configured log level.
fn setup_logging(config: &Config) {
    let log_level = config
        .log_level
        .as_deref()
        .and_then(parse_log_level)
        .unwrap_or(LogLevel::Info);

    let filter = match log_level {
        LogLevel::Off => LevelFilter::OFF,
        LogLevel::Error => LevelFilter::ERROR,
        LogLevel::Warn => LevelFilter::WARN,
        LogLevel::Info => LevelFilter::INFO,
        LogLevel::Debug => LevelFilter::DEBUG,
        LogLevel::Trace => LevelFilter::TRACE,
    };

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");

    debug!("Logging initialized with level: {:?}", log_level);
}

/// Helper function to load and validate configuration.
/// Exits the process with error code 1 if validation fails.
fn load_validated_config(args: &Args) -> Result<Config, Box<dyn std::error::Error>> {
    let config = resolve_config(args)?;
    if let Err(e) = validate_effective_config(&config) {
        eprintln!("❌ Configuration invalid: {}", e);
        std::process::exit(1);
    }
    Ok(config)
}

/// The snapshot directory, or a usage error when it is missing.
fn input_dir(args: &Args) -> Result<PathBuf, AnalyzerError> {
    args.dir
        .clone()
        .ok_or_else(|| AnalyzerError::Usage("missing snapshot directory".into()))
}

/// Main application entry point.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Early config resolution for show/check modes
    if args.show_config || args.check_config {
        let config = resolve_config(&args)?;

        if args.check_config {
            if let Err(e) = validate_effective_config(&config) {
                eprintln!("❌ Configuration invalid: {}", e);
                std::process::exit(1);
            }
            println!("✅ Configuration is valid");
            return Ok(());
        }

        return show_config(&config, args.config_format);
    }

    // Handle subcommands
    if let Some(command) = &args.command {
        return match command {
            Commands::Config {
                output,
                format,
                commented,
            } => command_config(output.clone(), *format, *commented),
            Commands::Inspect { file, format } => {
                let config = load_validated_config(&args)?;
                setup_logging(&config);
                command_inspect(file, *format)
            }
        };
    }

    let dir = match input_dir(&args) {
        Ok(dir) => dir,
        Err(e) => {
            eprintln!("❌ {}\n", e);
            eprintln!("{}", Args::command().render_usage());
            std::process::exit(2);
        }
    };

    let config = load_validated_config(&args)?;
    setup_logging(&config);
    info!("Starting dmanalyzer on {}", dir.display());

    // Configure parallel processing
    if let Some(threads) = config.parallelism {
        if threads > 0 {
            rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build_global()
                .unwrap_or_else(|e| error!("Failed to set rayon thread pool: {}", e));
            debug!("Rayon thread pool configured with {} threads", threads);
        }
    }

    command_analyze(&dir, &config)
}
