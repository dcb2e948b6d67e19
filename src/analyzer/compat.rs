//! Repository compatibility classification.

use crate::analyzer::openness::OpennessAnalyzer;
use crate::config::Config;
use crate::constraint::{Constraint, Version};
use crate::error::Result;
use crate::types::{
    AnalysisResult, AnalysisSummary, CompatStatus, RepositoryRecord, RepositoryVerdict, SortBy,
};
use chrono::{DateTime, Months, Utc};
use rayon::prelude::*;

/// Analyzer that classifies repositories against a target PHP version.
///
/// # Algorithm Overview
///
/// ## Phase 1: Target
///
/// Validate the target version and take its major. A malformed target
/// aborts the whole run.
///
/// ## Phase 2: Filtering
///
/// Drop forks (unless configured otherwise), repositories matching an
/// exclude pattern, and repositories not pushed to within the age limit.
///
/// ## Phase 3: Evaluation
///
/// Evaluate each remaining repository in parallel:
///
/// ```text
/// require.php absent       -> NoConstraint
/// require.php unparseable  -> ParseError
/// accepts target           -> Compatible   (+ too open check)
/// rejects target           -> Incompatible (+ too open check)
/// ```
///
/// ## Phase 4: Ordering and summary
///
/// # Example
///
/// ```rust
/// use phpcompat::analyzer::Analyzer;
/// use phpcompat::types::{CompatStatus, RepositoryRecord};
/// use phpcompat::Config;
///
/// let analyzer = Analyzer::new(&Config::default());
/// let records = vec![RepositoryRecord {
///     name: "api".to_string(),
///     url: String::new(),
///     is_fork: false,
///     last_pushed_at: None,
///     require_php: Some("~8.1.0".to_string()),
/// }];
///
/// let result = analyzer.analyze(&records, "8.3").unwrap();
/// assert_eq!(result.verdicts[0].status, CompatStatus::Incompatible);
/// ```
pub struct Analyzer {
    openness: OpennessAnalyzer,
    include_forks: bool,
    exclude_patterns: Vec<glob::Pattern>,
    max_age_months: u32,
    sort_by: SortBy,
}

impl Analyzer {
    /// Create a new compatibility analyzer.
    ///
    /// Exclude patterns that fail to compile are logged and ignored;
    /// [`Config::validate`] reports them up front.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        let exclude_patterns = config
            .filter
            .exclude_patterns
            .iter()
            .filter_map(|p| match glob::Pattern::new(p) {
                Ok(pattern) => Some(pattern),
                Err(e) => {
                    tracing::warn!(pattern = %p, error = %e, "Ignoring invalid exclude pattern");
                    None
                }
            })
            .collect();

        Self {
            openness: OpennessAnalyzer::from_config(config),
            include_forks: config.filter.include_forks,
            exclude_patterns,
            max_age_months: config.filter.max_age_months,
            sort_by: config.output.sort_by,
        }
    }

    /// Classify every repository against the target version.
    ///
    /// # Errors
    ///
    /// Returns `MalformedVersion` if `target` is not a numeric version.
    /// Unparseable repository constraints do not fail the run; they are
    /// reported as `ParseError` verdicts.
    pub fn analyze(&self, records: &[RepositoryRecord], target: &str) -> Result<AnalysisResult> {
        self.analyze_at(records, target, Utc::now())
    }

    /// Same as [`Analyzer::analyze`] with an explicit "now" for the age filter.
    ///
    /// # Errors
    ///
    /// Returns `MalformedVersion` if `target` is not a numeric version.
    pub fn analyze_at(
        &self,
        records: &[RepositoryRecord],
        target: &str,
        now: DateTime<Utc>,
    ) -> Result<AnalysisResult> {
        // Phase 1: Target
        let version = Version::parse(target)?;
        tracing::debug!(
            target = %version,
            major = version.major,
            repositories = records.len(),
            "Starting analysis"
        );

        // Phase 2: Filtering
        let cutoff = self.age_cutoff(now);
        let selected: Vec<&RepositoryRecord> = records
            .iter()
            .filter(|record| self.is_selected(record, cutoff))
            .collect();
        let skipped = records.len() - selected.len();
        tracing::debug!(selected = selected.len(), skipped, "Filtered repositories");

        // Phase 3: Evaluation
        let mut verdicts: Vec<RepositoryVerdict> = selected
            .par_iter()
            .map(|record| self.evaluate(record, &version))
            .collect();

        // Phase 4: Ordering and summary
        sort_verdicts(&mut verdicts, self.sort_by);
        let summary = build_summary(records.len(), skipped, &verdicts);
        tracing::debug!(
            compatible = summary.count(CompatStatus::Compatible),
            incompatible = summary.count(CompatStatus::Incompatible),
            too_open = summary.too_open,
            needs_attention = summary.needs_attention,
            "Analysis complete"
        );

        Ok(AnalysisResult {
            target_version: target.to_string(),
            verdicts,
            summary,
            timestamp: Some(now),
        })
    }

    /// Classify a single repository.
    #[must_use]
    pub fn evaluate(&self, record: &RepositoryRecord, target: &Version) -> RepositoryVerdict {
        let verdict = |status, too_open, error| RepositoryVerdict {
            repository: record.clone(),
            status,
            too_open,
            error,
        };

        let Some(raw) = record.require_php.as_deref() else {
            tracing::trace!(repository = %record.name, "No require.php constraint");
            return verdict(CompatStatus::NoConstraint, false, None);
        };

        match Constraint::parse(raw) {
            Ok(constraint) => {
                let status = if constraint.is_satisfied_by(target) {
                    CompatStatus::Compatible
                } else {
                    CompatStatus::Incompatible
                };
                let too_open = self.openness.is_too_open(&constraint, target.major);
                tracing::trace!(repository = %record.name, constraint = %raw, %status, too_open, "Evaluated repository");
                verdict(status, too_open, None)
            }
            Err(e) => {
                tracing::warn!(repository = %record.name, constraint = %raw, error = %e, "Unparseable require.php constraint");
                verdict(CompatStatus::ParseError, false, Some(e.to_string()))
            }
        }
    }

    fn age_cutoff(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        if self.max_age_months == 0 {
            return None;
        }
        now.checked_sub_months(Months::new(self.max_age_months))
    }

    fn is_selected(&self, record: &RepositoryRecord, cutoff: Option<DateTime<Utc>>) -> bool {
        if record.is_fork && !self.include_forks {
            tracing::trace!(repository = %record.name, "Skipping fork");
            return false;
        }

        if self.exclude_patterns.iter().any(|p| p.matches(&record.name)) {
            tracing::trace!(repository = %record.name, "Skipping excluded repository");
            return false;
        }

        // Repositories without a push date are never considered stale
        if let (Some(cutoff), Some(pushed)) = (cutoff, record.last_pushed_at) {
            if pushed < cutoff {
                tracing::trace!(repository = %record.name, %pushed, "Skipping stale repository");
                return false;
            }
        }

        true
    }
}

fn sort_verdicts(verdicts: &mut [RepositoryVerdict], sort_by: SortBy) {
    match sort_by {
        SortBy::Name => verdicts.sort_by(|a, b| a.repository.name.cmp(&b.repository.name)),
        SortBy::LastPushed => verdicts.sort_by(|a, b| {
            b.repository
                .last_pushed_at
                .cmp(&a.repository.last_pushed_at)
                .then_with(|| a.repository.name.cmp(&b.repository.name))
        }),
    }
}

fn build_summary(total: usize, skipped: usize, verdicts: &[RepositoryVerdict]) -> AnalysisSummary {
    let mut summary = AnalysisSummary {
        total_repositories: total,
        evaluated: verdicts.len(),
        skipped,
        ..AnalysisSummary::default()
    };

    for verdict in verdicts {
        *summary.by_status.entry(verdict.status).or_insert(0) += 1;
        if verdict.too_open {
            summary.too_open += 1;
        }
        if verdict.needs_attention() {
            summary.needs_attention += 1;
        }
    }

    summary
}
