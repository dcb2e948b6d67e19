//! Plain text report generator.

use crate::config::Config;
use crate::error::Result;
use crate::reporter::{listed_verdicts, ReportGenerator};
use crate::types::{AnalysisResult, CompatStatus, RepositoryVerdict};
use colored::Colorize;
use comfy_table::{Cell, Color, ContentArrangement, Table};

/// Text report generator for CLI output.
pub struct TextReporter {
    /// Whether to use colors
    use_colors: bool,
    /// Whether to list every repository
    verbose: bool,
    /// Whether to list only repositories needing attention
    attention_only: bool,
}

impl TextReporter {
    /// Create a new text reporter.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            use_colors: config.output.colored,
            verbose: config.output.verbose,
            attention_only: config.output.attention_only,
        }
    }
}

impl ReportGenerator for TextReporter {
    fn generate(&self, result: &AnalysisResult) -> Result<String> {
        let mut output = String::new();

        output.push_str(&self.format_header(result));
        output.push('\n');

        output.push_str(&self.format_summary(result));
        output.push('\n');

        let repositories = self.format_repositories(result);
        if !repositories.is_empty() {
            output.push_str(&repositories);
            output.push('\n');
        }

        output.push_str(&self.format_footer(result));

        Ok(output)
    }
}

impl TextReporter {
    /// Format the report header.
    fn format_header(&self, result: &AnalysisResult) -> String {
        let title = format!("PHP {} Compatibility", result.target_version);
        let version = format!("phpcompat v{}", env!("CARGO_PKG_VERSION"));
        let timestamp = result
            .timestamp
            .unwrap_or_else(chrono::Utc::now)
            .format("%Y-%m-%d %H:%M:%S UTC");

        if self.use_colors {
            format!(
                "\n{} {} {}\n{}\n",
                title.bright_white().bold(),
                version.dimmed(),
                format!("({timestamp})").dimmed(),
                "=".repeat(80).bright_blue(),
            )
        } else {
            format!("\n{title} {version} ({timestamp})\n{}\n", "=".repeat(80))
        }
    }

    fn section_title(&self, title: &str) -> String {
        let title = if self.use_colors {
            title.bright_cyan().bold().to_string()
        } else {
            title.to_string()
        };
        format!("\n{title}\n{}\n", "-".repeat(80))
    }

    /// Format the summary section.
    fn format_summary(&self, result: &AnalysisResult) -> String {
        let summary = &result.summary;
        let mut output = self.section_title("Summary");

        let compatible = summary.count(CompatStatus::Compatible);
        let incompatible = summary.count(CompatStatus::Incompatible);
        let unknown = summary.count(CompatStatus::NoConstraint);
        let parse_errors = summary.count(CompatStatus::ParseError);

        if self.use_colors {
            output.push_str(&format!(
                "  {} Compatible | {} Incompatible | {} Unknown | {} Parse Errors\n",
                compatible.to_string().green().bold(),
                incompatible.to_string().red().bold(),
                unknown.to_string().blue(),
                parse_errors.to_string().yellow(),
            ));
            output.push_str(&format!(
                "  {} too open | {} need attention\n",
                summary.too_open.to_string().yellow().bold(),
                summary.needs_attention.to_string().bold(),
            ));
        } else {
            output.push_str(&format!(
                "  {compatible} Compatible | {incompatible} Incompatible | {unknown} Unknown | {parse_errors} Parse Errors\n"
            ));
            output.push_str(&format!(
                "  {} too open | {} need attention\n",
                summary.too_open, summary.needs_attention
            ));
        }

        output.push_str(&format!(
            "  {} repositories | {} evaluated | {} skipped\n",
            summary.total_repositories, summary.evaluated, summary.skipped
        ));

        output
    }

    /// Format the repository table.
    fn format_repositories(&self, result: &AnalysisResult) -> String {
        let shown: Vec<&RepositoryVerdict> = listed_verdicts(result, self.attention_only)
            .into_iter()
            .filter(|v| {
                self.verbose || v.needs_attention() || v.status == CompatStatus::ParseError
            })
            .collect();

        let hidden = result.verdicts.len() - shown.len();
        if shown.is_empty() && !self.verbose {
            return String::new();
        }

        let mut output = self.section_title("Repositories");

        if !self.verbose && hidden > 0 {
            let summary = format!("{} shown, {hidden} without issues", shown.len());
            if self.use_colors {
                output.push_str(&format!("  {} (use -v to show all)\n\n", summary.dimmed()));
            } else {
                output.push_str(&format!("  {summary} (use -v to show all)\n\n"));
            }
        }

        let mut table = Table::new();
        table
            .load_preset(comfy_table::presets::UTF8_BORDERS_ONLY)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec!["", "Repository", "require.php", "Status", "Too Open", "Last Push"]);

        for verdict in shown {
            self.add_repository_row(&mut table, verdict);
        }

        output.push_str(&table.to_string());
        output.push('\n');

        output
    }

    /// Add a repository row to the table.
    fn add_repository_row(&self, table: &mut Table, verdict: &RepositoryVerdict) {
        let repo = &verdict.repository;
        let marker = if verdict.needs_attention() { "!" } else { "" };
        let constraint = repo.require_php.as_deref().unwrap_or("-");
        let last_push = repo
            .last_pushed_at
            .map_or_else(|| "-".to_string(), |t| t.format("%Y-%m-%d").to_string());
        let too_open = if verdict.too_open { "yes" } else { "no" };

        let mut status_cell = Cell::new(verdict.status.to_string());
        let mut too_open_cell = Cell::new(too_open);
        if self.use_colors {
            status_cell = status_cell.fg(match verdict.status {
                CompatStatus::Compatible => Color::Green,
                CompatStatus::Incompatible => Color::Red,
                CompatStatus::NoConstraint => Color::Blue,
                CompatStatus::ParseError => Color::Yellow,
            });
            if verdict.too_open {
                too_open_cell = too_open_cell.fg(Color::Yellow);
            }
        }

        table.add_row(vec![
            Cell::new(marker),
            Cell::new(truncate(&repo.name, 40)),
            Cell::new(truncate(constraint, 30)),
            status_cell,
            too_open_cell,
            Cell::new(last_push),
        ]);
    }

    /// Format the report footer.
    fn format_footer(&self, result: &AnalysisResult) -> String {
        let status = if result.has_incompatible() {
            if self.use_colors {
                "FAILED - Incompatible repositories found".red().bold().to_string()
            } else {
                "FAILED - Incompatible repositories found".to_string()
            }
        } else if result.has_warnings() {
            if self.use_colors {
                "PASSED with warnings".yellow().to_string()
            } else {
                "PASSED with warnings".to_string()
            }
        } else {
            "PASSED - No issues found".to_string()
        };

        format!("\n{status}\n\n")
    }
}

/// Truncate a string to a maximum number of characters.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{head}...")
    }
}
