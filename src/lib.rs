//! # phpcompat
//!
//! A composer `require.php` constraint engine and compatibility checker.
//!
//! phpcompat parses composer-style version constraints, decides whether a
//! PHP version satisfies them, and flags constraints that are "too open",
//! i.e. that would also accept a future major the project was never tested
//! against. On top of the engine it classifies a whole inventory of
//! repositories against a target PHP version and reports the result.
//!
//! ## Features
//!
//! - **Constraint engine**: exact, comparison, caret, tilde, wildcard and
//!   hyphen-range clauses, AND-groups and `||` alternatives
//! - **Openness check**: probe majors from a floor up to one past the current
//!   major and flag constraints that accept any of them
//! - **Inventory classification**: compatible, incompatible, no constraint
//!   or unparseable, with fork/exclude/age filters
//! - **Multiple output formats**: JSON and plain text reports
//!
//! ## Example
//!
//! ```rust
//! use phpcompat::{is_too_open, satisfies};
//!
//! assert!(satisfies("^7.4 || ^8.0", "8.2").unwrap());
//! assert!(!satisfies("~7.4.0", "8.0").unwrap());
//! assert!(is_too_open(">=7.4", 8).unwrap());
//! assert!(!is_too_open("~8.1.0", 8).unwrap());
//! ```

#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

pub mod analyzer;
pub mod cli;
pub mod config;
pub mod constraint;
pub mod error;
pub mod inventory;
pub mod reporter;
pub mod types;

// Re-export commonly used types at crate root
pub use analyzer::is_too_open;
pub use config::Config;
pub use constraint::{major_of, satisfies, Constraint, Version};
pub use error::{PhpCompatError, Result};
pub use types::{
    AnalysisResult, AnalysisSummary, CompatStatus, ReportFormat, RepositoryRecord,
    RepositoryVerdict,
};

use std::path::Path;

/// Main orchestrator that loads inventories and classifies them.
///
/// The `Checker` is the primary entry point for using phpcompat as a
/// library beyond single constraint checks. It handles:
/// - Resolving the target PHP version from the configuration
/// - Loading JSON/YAML inventories
/// - Running the compatibility analysis and report generation
///
/// # Example
///
/// ```rust
/// use phpcompat::{Checker, CompatStatus, Config, RepositoryRecord};
///
/// let mut config = Config::default();
/// config.analysis.target_version = Some("8.3".to_string());
/// let checker = Checker::new(config);
///
/// let records = vec![RepositoryRecord {
///     name: "api".to_string(),
///     url: String::new(),
///     is_fork: false,
///     last_pushed_at: None,
///     require_php: Some("^8.1".to_string()),
/// }];
///
/// let result = checker.check_records(&records).unwrap();
/// assert_eq!(result.verdicts[0].status, CompatStatus::Compatible);
/// ```
pub struct Checker {
    config: Config,
}

impl Checker {
    /// Create a new checker with the given configuration.
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self { config }
    }

    /// The configuration in use.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// The PHP version to check against.
    ///
    /// # Errors
    ///
    /// Returns `ConfigValue` when neither `--php` nor
    /// `analysis.target_version` provided one.
    pub fn target_version(&self) -> Result<&str> {
        self.config
            .analysis
            .target_version
            .as_deref()
            .ok_or_else(|| {
                crate::err!(ConfigValue {
                    key: "analysis.target_version".to_string(),
                    message: "no target PHP version; pass --php or set analysis.target_version"
                        .to_string(),
                })
            })
    }

    /// Classify already loaded repository records.
    ///
    /// # Errors
    ///
    /// Returns an error if the target version is missing or malformed.
    pub fn check_records(&self, records: &[RepositoryRecord]) -> Result<AnalysisResult> {
        let target = self.target_version()?;
        analyzer::Analyzer::new(&self.config).analyze(records, target)
    }

    /// Load an inventory file and classify its repositories.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The inventory cannot be read or decoded
    /// - The target version is missing or malformed
    pub fn check_inventory<P: AsRef<Path>>(&self, path: P) -> Result<AnalysisResult> {
        let path = path.as_ref();
        tracing::info!(path = %path.display(), "Checking inventory");
        let records = inventory::load_inventory(path)?;
        self.check_records(&records)
    }

    /// Render an analysis result in the given format.
    ///
    /// # Errors
    ///
    /// Returns an error if report generation fails.
    pub fn report(&self, result: &AnalysisResult, format: ReportFormat) -> Result<String> {
        reporter::Reporter::new(&self.config).generate(result, format)
    }
}
