//! Configuration module for phpcompat.
//!
//! This module handles loading and validating configuration from:
//! - YAML configuration files (`phpcompat.yaml`)
//! - Environment variables
//! - CLI arguments
//!
//! # Configuration File Format
//!
//! ```yaml
//! # phpcompat.yaml
//!
//! # Analysis options
//! analysis:
//!   target_version: "8.3"   # PHP version to check against
//!   floor_major: 5          # First major probed by the too-open check
//!   lookahead: 1            # Majors past the target's probed
//!
//! # Repository filters
//! filter:
//!   include_forks: false
//!   exclude_patterns:
//!     - "sandbox-*"
//!   max_age_months: 0       # 0 disables the age filter
//!
//! # Output options
//! output:
//!   colored: true
//!   verbose: false
//!   pretty: true
//!   sort_by: name           # name | last_pushed
//!   attention_only: false
//! ```

use crate::analyzer::openness::{DEFAULT_FLOOR_MAJOR, DEFAULT_LOOKAHEAD};
use crate::error::{PhpCompatError, Result, ResultExt};
use crate::types::SortBy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static BRACED_VAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("Invalid regex"));

static BARE_VAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$([A-Za-z_][A-Za-z0-9_]*)").expect("Invalid regex"));

/// Analysis options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisOptions {
    /// PHP version to check against (e.g., "8.3"). CLI `--php` wins.
    pub target_version: Option<String>,

    /// First major version probed by the too-open check.
    pub floor_major: u64,

    /// Number of majors past the target's major probed by the too-open check.
    pub lookahead: u64,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            target_version: None,
            floor_major: DEFAULT_FLOOR_MAJOR,
            lookahead: DEFAULT_LOOKAHEAD,
        }
    }
}

/// Repository filters.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct FilterOptions {
    /// Evaluate forks too.
    pub include_forks: bool,

    /// Repository name patterns to skip (glob patterns).
    pub exclude_patterns: Vec<String>,

    /// Skip repositories not pushed to within this many months (0 = disabled).
    pub max_age_months: u32,
}

/// Output options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputOptions {
    /// Use colored output.
    pub colored: bool,

    /// Verbose output mode (show every repository in text reports).
    pub verbose: bool,

    /// Pretty-print JSON output.
    pub pretty: bool,

    /// Order of repositories in reports.
    pub sort_by: SortBy,

    /// Only list repositories that need attention.
    pub attention_only: bool,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            colored: true,
            verbose: false,
            pretty: true,
            sort_by: SortBy::Name,
            attention_only: false,
        }
    }
}

/// Main configuration structure with nested sections.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Analysis options
    pub analysis: AnalysisOptions,

    /// Repository filters
    pub filter: FilterOptions,

    /// Output options
    pub output: OutputOptions,
}

impl Config {
    /// Load configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is invalid or a value fails validation.
    pub fn from_yaml(content: &str) -> Result<Self> {
        tracing::debug!("Parsing configuration from YAML");
        let expanded = expand_env_vars(content);

        let config: Self = serde_yaml::from_str(&expanded)
            .to_config_parse_error("invalid YAML configuration".to_string())?;
        config.validate()?;

        tracing::debug!(
            target_version = ?config.analysis.target_version,
            floor_major = config.analysis.floor_major,
            exclude_patterns = config.filter.exclude_patterns.len(),
            "Configuration loaded successfully"
        );

        Ok(config)
    }

    /// Check values serde cannot check on its own.
    ///
    /// # Errors
    ///
    /// Returns `ConfigValue` for a malformed target version or exclude
    /// pattern, or `Multiple` when more than one value is wrong.
    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();

        if let Some(target) = &self.analysis.target_version {
            if let Err(e) = crate::constraint::Version::parse(target) {
                errors.push(crate::err!(ConfigValue {
                    key: "analysis.target_version".to_string(),
                    message: e.to_string(),
                }));
            }
        }

        for pattern in &self.filter.exclude_patterns {
            if let Err(e) = glob::Pattern::new(pattern) {
                errors.push(crate::err!(ConfigValue {
                    key: "filter.exclude_patterns".to_string(),
                    message: format!("'{pattern}': {e}"),
                }));
            }
        }

        PhpCompatError::collect(errors)
    }

    /// Generate an example YAML configuration.
    #[must_use]
    pub fn example_yaml() -> String {
        r#"# phpcompat Configuration File

# Analysis options
analysis:
  # PHP version to check against (overridden by --php)
  # target_version: "8.3"

  # First major version probed when checking for too open constraints
  floor_major: 5

  # How many majors past the target are probed
  lookahead: 1

# Repository filters
filter:
  # Evaluate forked repositories too
  include_forks: false

  # Repository name patterns to skip (glob patterns)
  exclude_patterns: []
  #   - "sandbox-*"
  #   - "*-archive"

  # Skip repositories without a push in this many months (0 = disabled)
  max_age_months: 0

# Output options
output:
  # Use colored output in terminal
  colored: true

  # List every repository, not only those needing attention
  verbose: false

  # Pretty-print JSON output
  pretty: true

  # Report order: name | last_pushed
  sort_by: name

  # Drop repositories that need no attention from reports
  attention_only: false
"#
        .to_string()
    }

    /// Merge CLI arguments into the configuration.
    pub fn merge_cli_args(&mut self, args: &crate::cli::CheckArgs) {
        if let Some(php) = &args.php {
            self.analysis.target_version = Some(php.clone());
        }
        if args.include_forks {
            self.filter.include_forks = true;
        }
        if !args.exclude_patterns.is_empty() {
            self.filter
                .exclude_patterns
                .extend(args.exclude_patterns.iter().cloned());
        }
        if let Some(months) = args.max_age_months {
            self.filter.max_age_months = months;
        }
        if let Some(sort_by) = args.sort_by {
            self.output.sort_by = sort_by;
        }
        if args.attention_only {
            self.output.attention_only = true;
        }
        if args.no_color {
            self.output.colored = false;
        }
    }
}

/// Expand environment variables in a string.
///
/// Supports `${VAR}` and `$VAR` syntax. Unknown variables are left as written.
fn expand_env_vars(content: &str) -> String {
    let braced = BRACED_VAR.replace_all(content, |caps: &regex::Captures<'_>| {
        std::env::var(&caps[1]).unwrap_or_else(|_| caps[0].to_string())
    });

    BARE_VAR
        .replace_all(&braced, |caps: &regex::Captures<'_>| {
            std::env::var(&caps[1]).unwrap_or_else(|_| caps[0].to_string())
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.analysis.floor_major, 5);
        assert_eq!(config.analysis.lookahead, 1);
        assert!(config.analysis.target_version.is_none());
        assert!(!config.filter.include_forks);
        assert!(config.output.colored);
        assert_eq!(config.output.sort_by, SortBy::Name);
    }

    #[test]
    fn test_config_from_yaml_nested() {
        let yaml = r#"
analysis:
  target_version: "8.3"
  floor_major: 7
filter:
  include_forks: true
  exclude_patterns:
    - "sandbox-*"
  max_age_months: 24
output:
  colored: false
  sort_by: last_pushed
"#;

        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.analysis.target_version.as_deref(), Some("8.3"));
        assert_eq!(config.analysis.floor_major, 7);
        assert_eq!(config.analysis.lookahead, 1);
        assert!(config.filter.include_forks);
        assert_eq!(config.filter.exclude_patterns, vec!["sandbox-*".to_string()]);
        assert_eq!(config.filter.max_age_months, 24);
        assert!(!config.output.colored);
        assert!(config.output.pretty);
        assert_eq!(config.output.sort_by, SortBy::LastPushed);
    }

    #[test]
    fn test_invalid_target_version() {
        let yaml = r#"
analysis:
  target_version: "eight"
"#;
        let err = Config::from_yaml(yaml).unwrap_err();
        assert!(matches!(err, PhpCompatError::ConfigValue { ref key, .. } if key == "analysis.target_version"));
    }

    #[test]
    fn test_invalid_exclude_pattern() {
        let yaml = r#"
filter:
  exclude_patterns:
    - "[unclosed"
"#;
        let err = Config::from_yaml(yaml).unwrap_err();
        assert!(matches!(err, PhpCompatError::ConfigValue { .. }));
    }

    #[test]
    fn test_every_invalid_value_is_reported() {
        let yaml = r#"
analysis:
  target_version: "8.x"
filter:
  exclude_patterns:
    - "[unclosed"
    - "ok-*"
"#;
        let err = Config::from_yaml(yaml).unwrap_err();
        match err {
            PhpCompatError::Multiple { count, ref errors } => {
                assert_eq!(count, 2);
                assert!(errors
                    .iter()
                    .all(|e| matches!(e, PhpCompatError::ConfigValue { .. })));
            }
            other => panic!("expected Multiple, got {other:?}"),
        }
        assert_eq!(err.exit_code(), 21);
    }

    #[test]
    fn test_invalid_yaml() {
        let err = Config::from_yaml("analysis: [unterminated").unwrap_err();
        assert!(matches!(err, PhpCompatError::ConfigParse { source: Some(_), .. }));
        assert_eq!(err.exit_code(), 18);
    }

    #[test]
    fn test_env_var_expansion() {
        // Unknown variables stay as written
        let expanded = expand_env_vars("target: ${PHPCOMPAT_SURELY_UNSET_VAR}");
        assert_eq!(expanded, "target: ${PHPCOMPAT_SURELY_UNSET_VAR}");

        let expanded = expand_env_vars("target: $PHPCOMPAT_SURELY_UNSET_VAR");
        assert_eq!(expanded, "target: $PHPCOMPAT_SURELY_UNSET_VAR");

        // PATH is set in every test environment
        let path = std::env::var("PATH").unwrap();
        assert_eq!(expand_env_vars("p: ${PATH}"), format!("p: {path}"));

        for pattern in ["no vars here", "$1", "${NESTED${VAR}}", "$"] {
            let _ = expand_env_vars(pattern);
        }
    }

    #[test]
    fn test_example_yaml_is_valid() {
        let example = Config::example_yaml();
        let config = Config::from_yaml(&example).unwrap();
        assert_eq!(config.analysis.floor_major, 5);
        assert!(config.filter.exclude_patterns.is_empty());
    }

    #[test]
    fn test_merge_cli_args() {
        use crate::cli::{Cli, Commands};
        use clap::Parser;

        let cli = Cli::parse_from([
            "phpcompat",
            "check",
            "repos.json",
            "--php",
            "8.4",
            "--exclude",
            "tmp-*",
            "--max-age-months",
            "6",
            "--sort-by",
            "last_pushed",
            "--no-color",
        ]);
        let Commands::Check(args) = cli.command else {
            panic!("Expected Check command");
        };

        let mut config = Config::from_yaml("filter:\n  exclude_patterns: [\"sandbox-*\"]\n").unwrap();
        config.merge_cli_args(&args);

        assert_eq!(config.analysis.target_version.as_deref(), Some("8.4"));
        assert_eq!(config.filter.exclude_patterns, vec!["sandbox-*", "tmp-*"]);
        assert_eq!(config.filter.max_age_months, 6);
        assert_eq!(config.output.sort_by, SortBy::LastPushed);
        assert!(!config.output.colored);
        assert!(!config.filter.include_forks);
    }
}
