//! JSON report generator.

use crate::config::Config;
use crate::error::Result;
use crate::reporter::{listed_verdicts, ReportGenerator};
use crate::types::{AnalysisResult, AnalysisSummary, CompatStatus, RepositoryVerdict};
use serde::Serialize;

/// JSON report generator.
pub struct JsonReporter {
    /// Whether to pretty-print the output
    pretty: bool,
    /// Whether to drop repositories that need no attention
    attention_only: bool,
}

impl JsonReporter {
    /// Create a new JSON reporter.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            pretty: config.output.pretty,
            attention_only: config.output.attention_only,
        }
    }
}

impl ReportGenerator for JsonReporter {
    fn generate(&self, result: &AnalysisResult) -> Result<String> {
        let report = JsonReport {
            metadata: ReportMetadata {
                version: env!("CARGO_PKG_VERSION").to_string(),
                timestamp: result
                    .timestamp
                    .unwrap_or_else(chrono::Utc::now)
                    .to_rfc3339(),
                target_version: result.target_version.clone(),
            },
            summary: ReportSummary::from(&result.summary),
            repositories: listed_verdicts(result, self.attention_only)
                .into_iter()
                .map(JsonRepository::from)
                .collect(),
        };

        let json = if self.pretty {
            serde_json::to_string_pretty(&report)
        } else {
            serde_json::to_string(&report)
        };

        json.map_err(|e| crate::err!(ReportGeneration {
            message: format!("Failed to serialize JSON report: {e}"),
        }))
    }
}

/// JSON report structure.
#[derive(Debug, Serialize)]
pub struct JsonReport {
    /// Report metadata
    pub metadata: ReportMetadata,
    /// Summary statistics
    pub summary: ReportSummary,
    /// Per-repository verdicts
    pub repositories: Vec<JsonRepository>,
}

/// Report metadata.
#[derive(Debug, Serialize)]
pub struct ReportMetadata {
    /// phpcompat version
    pub version: String,
    /// Report generation timestamp
    pub timestamp: String,
    /// PHP version checked against
    pub target_version: String,
}

/// Report summary.
#[derive(Debug, Serialize)]
pub struct ReportSummary {
    /// Records in the inventory
    pub total_repositories: usize,
    /// Repositories evaluated
    pub evaluated: usize,
    /// Repositories skipped by filters
    pub skipped: usize,
    /// Compatible repositories
    pub compatible: usize,
    /// Incompatible repositories
    pub incompatible: usize,
    /// Repositories without a constraint
    pub no_constraint: usize,
    /// Repositories with an unparseable constraint
    pub parse_error: usize,
    /// Too open constraints
    pub too_open: usize,
    /// Repositories needing attention
    pub needs_attention: usize,
}

impl From<&AnalysisSummary> for ReportSummary {
    fn from(summary: &AnalysisSummary) -> Self {
        Self {
            total_repositories: summary.total_repositories,
            evaluated: summary.evaluated,
            skipped: summary.skipped,
            compatible: summary.count(CompatStatus::Compatible),
            incompatible: summary.count(CompatStatus::Incompatible),
            no_constraint: summary.count(CompatStatus::NoConstraint),
            parse_error: summary.count(CompatStatus::ParseError),
            too_open: summary.too_open,
            needs_attention: summary.needs_attention,
        }
    }
}

/// JSON representation of a repository verdict.
#[derive(Debug, Serialize)]
pub struct JsonRepository {
    /// Repository name
    pub name: String,
    /// Repository URL
    pub url: String,
    /// Fork flag
    pub is_fork: bool,
    /// Last push timestamp
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_pushed_at: Option<String>,
    /// `require.php` as written
    #[serde(skip_serializing_if = "Option::is_none")]
    pub require_php: Option<String>,
    /// Compatibility status
    pub status: CompatStatus,
    /// Too open flag
    pub too_open: bool,
    /// Needs attention flag
    pub needs_attention: bool,
    /// Parse error message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<&RepositoryVerdict> for JsonRepository {
    fn from(verdict: &RepositoryVerdict) -> Self {
        let repo = &verdict.repository;
        Self {
            name: repo.name.clone(),
            url: repo.url.clone(),
            is_fork: repo.is_fork,
            last_pushed_at: repo.last_pushed_at.map(|t| t.to_rfc3339()),
            require_php: repo.require_php.clone(),
            status: verdict.status,
            too_open: verdict.too_open,
            needs_attention: verdict.needs_attention(),
            error: verdict.error.clone(),
        }
    }
}
