//! Command-line interface module.
//!
//! This module defines the CLI structure using Clap, including
//! all commands, arguments, and options.
//!
//! # Commands
//!
//! - `check`: Classify an inventory of repositories against a PHP version
//! - `satisfies`: Test a single constraint against a version
//! - `too-open`: Test whether a constraint admits untested majors
//! - `init`: Create an example configuration file
//! - `validate`: Validate a configuration file
//!
//! # Example Usage
//!
//! ```bash
//! # Check an inventory against PHP 8.3
//! phpcompat check repos.json --php 8.3
//!
//! # Generate JSON report
//! phpcompat check repos.json --php 8.3 --format json --output report.json
//!
//! # Single constraint checks
//! phpcompat satisfies "^7.4 || ^8.0" 8.2
//! phpcompat too-open ">=7.4" --major 8
//!
//! # Initialize configuration
//! phpcompat init
//! ```

use crate::types::{ReportFormat, SortBy};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// phpcompat - composer `require.php` compatibility checker.
#[derive(Parser, Debug)]
#[command(
    name = "phpcompat",
    author,
    version,
    about = "Check composer require.php constraints against a PHP version",
    long_about = "phpcompat reads an inventory of repositories and their composer \
                  require.php constraints, reports which ones accept a target PHP \
                  version, and flags constraints left open to future majors."
)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true, env = "PHPCOMPAT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Classify every repository of an inventory against a PHP version
    #[command(visible_alias = "c")]
    Check(CheckArgs),

    /// Print whether a constraint accepts a version
    Satisfies(SatisfiesArgs),

    /// Print whether a constraint also accepts untested future majors
    TooOpen(TooOpenArgs),

    /// Create an example configuration file
    Init,

    /// Validate a configuration file
    Validate(ValidateArgs),
}

/// Arguments for the check command.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Repository inventory (JSON, or YAML for .yaml/.yml)
    #[arg(value_name = "INVENTORY")]
    pub inventory: PathBuf,

    /// PHP version to check against (falls back to analysis.target_version)
    #[arg(long, value_name = "VERSION")]
    pub php: Option<String>,

    /// Output format
    #[arg(short, long, default_value = "text", value_enum)]
    pub format: ReportFormat,

    /// Output file path (stdout if not specified)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Treat warnings (too open, unparseable) as errors (exit code 1)
    #[arg(long)]
    pub strict: bool,

    /// Evaluate forks too
    #[arg(long)]
    pub include_forks: bool,

    /// Repository names to skip (glob patterns)
    #[arg(short, long = "exclude", value_name = "PATTERN")]
    pub exclude_patterns: Vec<String>,

    /// Skip repositories not pushed to within this many months
    #[arg(long, value_name = "MONTHS")]
    pub max_age_months: Option<u32>,

    /// Order of repositories in the report
    #[arg(long, value_enum)]
    pub sort_by: Option<SortBy>,

    /// Only list repositories that need attention
    #[arg(long)]
    pub attention_only: bool,

    /// Disable colored output
    #[arg(long, env = "NO_COLOR")]
    pub no_color: bool,
}

/// Arguments for the satisfies command.
#[derive(Args, Debug)]
pub struct SatisfiesArgs {
    /// Composer constraint (e.g., "^7.4 || ^8.0")
    #[arg(value_name = "CONSTRAINT")]
    pub constraint: String,

    /// Version to test (e.g., "8.2")
    #[arg(value_name = "VERSION")]
    pub version: String,
}

/// Arguments for the too-open command.
#[derive(Args, Debug)]
pub struct TooOpenArgs {
    /// Composer constraint (e.g., ">=7.4")
    #[arg(value_name = "CONSTRAINT")]
    pub constraint: String,

    /// Current PHP major version
    #[arg(long, value_name = "N")]
    pub major: u64,

    /// First major probed (overrides analysis.floor_major)
    #[arg(long, value_name = "N")]
    pub floor: Option<u64>,

    /// Majors probed past the current one (overrides analysis.lookahead)
    #[arg(long, value_name = "N")]
    pub lookahead: Option<u64>,
}

/// Arguments for the validate command.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(value_name = "FILE", default_value = "phpcompat.yaml")]
    pub file: PathBuf,
}
