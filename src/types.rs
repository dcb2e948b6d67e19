//! Core data types used throughout phpcompat.
//!
//! This module defines the fundamental data structures for representing:
//! - Repository records handed over by the inventory collaborator
//! - Per-repository compatibility verdicts
//! - Analysis results and summaries
//! - Report formats

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A repository as listed by the organisation inventory.
///
/// # Example JSON
///
/// ```json
/// {
///   "name": "billing-api",
///   "url": "https://github.com/acme/billing-api",
///   "is_fork": false,
///   "last_pushed_at": "2024-03-01T10:00:00Z",
///   "require_php": "^8.1"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryRecord {
    /// Repository name (e.g., "billing-api")
    pub name: String,

    /// Web URL of the repository
    #[serde(default)]
    pub url: String,

    /// Whether the repository is a fork
    #[serde(default)]
    pub is_fork: bool,

    /// Time of the last push, if known
    #[serde(default)]
    pub last_pushed_at: Option<DateTime<Utc>>,

    /// The `require.php` constraint from composer.json, if any
    #[serde(default)]
    pub require_php: Option<String>,
}

/// Compatibility of a repository with the target PHP version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompatStatus {
    /// The constraint accepts the target version
    Compatible,
    /// The constraint rejects the target version
    Incompatible,
    /// No `require.php` constraint
    NoConstraint,
    /// The constraint could not be parsed
    ParseError,
}

impl std::fmt::Display for CompatStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Compatible => write!(f, "Compatible"),
            Self::Incompatible => write!(f, "Incompatible"),
            Self::NoConstraint => write!(f, "Unknown"),
            Self::ParseError => write!(f, "Parse Error"),
        }
    }
}

/// The verdict for a single repository.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryVerdict {
    /// The repository the verdict is about
    pub repository: RepositoryRecord,

    /// Compatibility classification
    pub status: CompatStatus,

    /// Whether the constraint also accepts untested future majors
    pub too_open: bool,

    /// Parse error message when `status` is `ParseError`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RepositoryVerdict {
    /// Incompatible or too open.
    #[must_use]
    pub fn needs_attention(&self) -> bool {
        self.status == CompatStatus::Incompatible || self.too_open
    }
}

/// Results from the compatibility analysis.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// The PHP version checked against
    pub target_version: String,

    /// Per-repository verdicts, in report order
    pub verdicts: Vec<RepositoryVerdict>,

    /// Summary statistics
    pub summary: AnalysisSummary,

    /// Timestamp of the analysis
    pub timestamp: Option<DateTime<Utc>>,
}

impl AnalysisResult {
    /// Check if any repository is incompatible.
    #[must_use]
    pub fn has_incompatible(&self) -> bool {
        self.verdicts
            .iter()
            .any(|v| v.status == CompatStatus::Incompatible)
    }

    /// Check if any repository is too open or has an unparseable constraint.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        self.verdicts
            .iter()
            .any(|v| v.too_open || v.status == CompatStatus::ParseError)
    }

    /// Verdicts that need attention.
    #[must_use]
    pub fn needing_attention(&self) -> Vec<&RepositoryVerdict> {
        self.verdicts.iter().filter(|v| v.needs_attention()).collect()
    }
}

/// Summary statistics from analysis.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    /// Number of records in the inventory
    pub total_repositories: usize,
    /// Number of repositories evaluated
    pub evaluated: usize,
    /// Number of repositories skipped by filters
    pub skipped: usize,
    /// Counts by status
    pub by_status: BTreeMap<CompatStatus, usize>,
    /// Number of too open constraints
    pub too_open: usize,
    /// Number of repositories needing attention
    pub needs_attention: usize,
}

impl AnalysisSummary {
    /// Count for a status, zero when absent.
    #[must_use]
    pub fn count(&self, status: CompatStatus) -> usize {
        self.by_status.get(&status).copied().unwrap_or(0)
    }
}

/// Report output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Plain text format
    #[default]
    Text,
    /// JSON format
    Json,
}

/// Order of the verdicts in reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum SortBy {
    /// Repository name, ascending
    #[default]
    Name,
    /// Last push, newest first
    LastPushed,
}
