//! Report generation module.
//!
//! This module provides report generation in multiple formats:
//! - JSON: Machine-readable structured output
//! - Text: Human-readable CLI output
//!
//! # Example
//!
//! ```rust
//! use phpcompat::analyzer::Analyzer;
//! use phpcompat::reporter::Reporter;
//! use phpcompat::{Config, ReportFormat};
//!
//! let config = Config::default();
//! let result = Analyzer::new(&config).analyze(&[], "8.3").unwrap();
//!
//! let reporter = Reporter::new(&config);
//! let json = reporter.generate(&result, ReportFormat::Json).unwrap();
//! assert!(json.contains("\"target_version\""));
//! ```

mod json;
mod text;

use crate::config::Config;
use crate::error::Result;
use crate::types::{AnalysisResult, ReportFormat, RepositoryVerdict};

pub use json::JsonReporter;
pub use text::TextReporter;

/// Report generator that supports multiple output formats.
pub struct Reporter {
    config: Config,
}

impl Reporter {
    /// Create a new reporter with the given configuration.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Generate a report in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if report generation fails.
    pub fn generate(&self, result: &AnalysisResult, format: ReportFormat) -> Result<String> {
        tracing::debug!(?format, verdicts = result.verdicts.len(), "Generating report");
        match format {
            ReportFormat::Json => JsonReporter::new(&self.config).generate(result),
            ReportFormat::Text => TextReporter::new(&self.config).generate(result),
        }
    }
}

/// Trait for report generators.
pub trait ReportGenerator {
    /// Generate a report from analysis results.
    ///
    /// # Errors
    ///
    /// Returns an error if generation fails.
    fn generate(&self, result: &AnalysisResult) -> Result<String>;
}

/// Verdicts a report lists, honouring `attention_only`.
fn listed_verdicts(result: &AnalysisResult, attention_only: bool) -> Vec<&RepositoryVerdict> {
    result
        .verdicts
        .iter()
        .filter(|v| !attention_only || v.needs_attention())
        .collect()
}
