//! phpcompat CLI entry point.
//!
//! This binary provides the command-line interface for phpcompat.

use clap::Parser;
use phpcompat::analyzer::OpennessAnalyzer;
use phpcompat::cli::{CheckArgs, Cli, Commands, SatisfiesArgs, TooOpenArgs};
use phpcompat::error::ResultExt;
use phpcompat::{Checker, Config, Constraint, PhpCompatError, Version};
use std::path::Path;
use std::process::ExitCode;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const DEFAULT_CONFIG_PATHS: [&str; 3] = ["phpcompat.yaml", "phpcompat.yml", ".phpcompat.yaml"];

fn main() -> ExitCode {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose, cli.quiet);

    match run(cli) {
        Ok(exit_code) => exit_code,
        Err(e) => {
            tracing::error!(error = %e, "Fatal error");

            eprintln!("Error: {e}");
            print_cause_chain(&*e);

            // Print backtrace if RUST_BACKTRACE is set, keeping only our frames
            let backtrace = e.backtrace();
            if backtrace.status() == std::backtrace::BacktraceStatus::Captured {
                eprintln!("\nStack backtrace:");
                let backtrace_str = format!("{backtrace}");
                let mut in_phpcompat = false;
                for line in backtrace_str.lines() {
                    let trimmed = line.trim();
                    if trimmed.contains("phpcompat::") {
                        in_phpcompat = true;
                        eprintln!("{line}");
                    } else if in_phpcompat && trimmed.starts_with("at ") {
                        eprintln!("{line}");
                        in_phpcompat = false;
                    } else {
                        in_phpcompat = false;
                    }
                }
            }

            let code = e
                .downcast_ref::<PhpCompatError>()
                .map_or(1, PhpCompatError::exit_code);
            ExitCode::from(u8::try_from(code).unwrap_or(1))
        }
    }
}

fn print_cause_chain(error: &(dyn std::error::Error + 'static)) {
    let mut source = error.source();
    if source.is_some() {
        eprintln!("\nCaused by:");
        let mut i = 0;
        while let Some(cause) = source {
            eprintln!("  {i}: {cause}");
            source = cause.source();
            i += 1;
        }
    }
}

fn init_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        // RUST_LOG wins over the verbose flag
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            let base_level = match verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            };
            // phpcompat at the requested level, everything else at warn
            EnvFilter::new(format!("warn,phpcompat={base_level}"))
        })
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(false),
        )
        .with(filter)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    tracing::debug!("Loading configuration");
    let mut config = load_config(&cli)?;
    if cli.verbose > 0 {
        config.output.verbose = true;
    }
    tracing::debug!("Configuration loaded successfully");

    match cli.command {
        Commands::Check(args) => run_check(config, &args),
        Commands::Satisfies(args) => run_satisfies(&args),
        Commands::TooOpen(args) => run_too_open(&config, &args),

        Commands::Init => {
            let config_path = Path::new(DEFAULT_CONFIG_PATHS[0]);
            if config_path.exists() {
                anyhow::bail!("Configuration file already exists: {}", config_path.display());
            }

            std::fs::write(config_path, Config::example_yaml()).with_path(config_path)?;
            println!("Created example configuration: {}", config_path.display());
            Ok(ExitCode::SUCCESS)
        }

        Commands::Validate(args) => {
            let content = std::fs::read_to_string(&args.file).with_path(&args.file)?;
            match Config::from_yaml(&content) {
                Ok(_) => {
                    println!("Configuration is valid: {}", args.file.display());
                    Ok(ExitCode::SUCCESS)
                }
                Err(e) => {
                    eprintln!("Configuration error: {e}");
                    print_cause_chain(&e);
                    Ok(ExitCode::from(1))
                }
            }
        }
    }
}

fn run_check(mut config: Config, args: &CheckArgs) -> anyhow::Result<ExitCode> {
    // A bad --php is an engine error, not a configuration one
    if let Some(php) = &args.php {
        Version::parse(php)?;
    }
    config.merge_cli_args(args);
    config.validate()?;
    tracing::debug!(inventory = %args.inventory.display(), "Executing check command");

    let checker = Checker::new(config);
    let result = checker.check_inventory(&args.inventory)?;
    let report = checker.report(&result, args.format)?;

    if let Some(output_path) = &args.output {
        std::fs::write(output_path, &report).with_path(output_path)?;
        tracing::info!(path = %output_path.display(), "Report written");
    } else {
        println!("{report}");
    }

    let exit_code = if result.has_incompatible() {
        2
    } else if result.has_warnings() && args.strict {
        1
    } else {
        0
    };

    Ok(ExitCode::from(exit_code))
}

fn run_satisfies(args: &SatisfiesArgs) -> anyhow::Result<ExitCode> {
    let satisfied = phpcompat::satisfies(&args.constraint, &args.version)?;
    println!("{satisfied}");
    Ok(bool_exit(satisfied))
}

fn run_too_open(config: &Config, args: &TooOpenArgs) -> anyhow::Result<ExitCode> {
    let openness = OpennessAnalyzer::new(
        args.floor.unwrap_or(config.analysis.floor_major),
        args.lookahead.unwrap_or(config.analysis.lookahead),
    );
    let constraint = Constraint::parse(&args.constraint)?;
    let too_open = openness.is_too_open(&constraint, args.major);
    tracing::debug!(
        constraint = %constraint,
        major = args.major,
        floor = openness.floor_major(),
        too_open,
        "Openness check"
    );
    println!("{too_open}");
    Ok(bool_exit(too_open))
}

const fn bool_exit(value: bool) -> ExitCode {
    if value {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    if let Some(ref config_path) = cli.config {
        tracing::debug!(path = %config_path.display(), "Loading configuration from explicit path");
        let content = std::fs::read_to_string(config_path).with_path(config_path)?;
        return Ok(Config::from_yaml(&content)?);
    }

    tracing::debug!("Searching for default configuration files");
    for path in DEFAULT_CONFIG_PATHS {
        let path = Path::new(path);
        if path.exists() {
            tracing::debug!(path = %path.display(), "Found configuration file");
            let content = std::fs::read_to_string(path).with_path(path)?;
            return Ok(Config::from_yaml(&content)?);
        }
    }

    tracing::debug!("No configuration file found, using default configuration");
    Ok(Config::default())
}
