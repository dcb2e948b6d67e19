//! "Too open" detection for version constraints.
//!
//! A constraint is too open when it would also accept a major version that
//! nobody has tested it against. The check probes synthetic `M.999.999`
//! versions: the high minor/patch defeats any minor or patch bound while an
//! explicit major bound (`<9.0`) still rejects the probe.

use crate::config::Config;
use crate::constraint::{Constraint, Version};
use crate::error::Result;

/// Lowest major probed by default. Majors below 5 are irrelevant for PHP.
pub const DEFAULT_FLOOR_MAJOR: u64 = 5;

/// Number of majors past the current one probed by default.
pub const DEFAULT_LOOKAHEAD: u64 = 1;

/// Sweeps `M.999.999` probes through a constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpennessAnalyzer {
    /// First major of the sweep
    floor_major: u64,
    /// How far past the current major the sweep goes
    lookahead: u64,
}

impl OpennessAnalyzer {
    /// Create an analyzer with an explicit sweep floor and lookahead.
    #[must_use]
    pub const fn new(floor_major: u64, lookahead: u64) -> Self {
        Self { floor_major, lookahead }
    }

    /// Create an analyzer from the `analysis` section of the configuration.
    #[must_use]
    pub const fn from_config(config: &Config) -> Self {
        Self::new(config.analysis.floor_major, config.analysis.lookahead)
    }

    /// First major of the sweep.
    #[must_use]
    pub const fn floor_major(&self) -> u64 {
        self.floor_major
    }

    /// The probe versions for a given current major, lowest first.
    ///
    /// Empty when `current_major + lookahead` is below the floor.
    pub fn probes(&self, current_major: u64) -> impl Iterator<Item = Version> {
        let last = current_major.saturating_add(self.lookahead);
        (self.floor_major..=last).map(Version::probe)
    }

    /// Check whether any probe up to `current_major + lookahead` satisfies
    /// the constraint. Stops at the first satisfying probe.
    #[must_use]
    pub fn is_too_open(&self, constraint: &Constraint, current_major: u64) -> bool {
        let hit = self
            .probes(current_major)
            .find(|probe| constraint.is_satisfied_by(probe));

        match hit {
            Some(probe) => {
                tracing::debug!(constraint = %constraint.raw, probe = %probe, "Constraint accepts probe version");
                true
            }
            None => {
                tracing::trace!(constraint = %constraint.raw, current_major, "No probe version accepted");
                false
            }
        }
    }
}

impl Default for OpennessAnalyzer {
    fn default() -> Self {
        Self::new(DEFAULT_FLOOR_MAJOR, DEFAULT_LOOKAHEAD)
    }
}

/// Parse a constraint and check it with the default sweep.
///
/// # Errors
///
/// Returns `MalformedConstraint` if `constraint` cannot be parsed.
pub fn is_too_open(constraint: &str, current_major: u64) -> Result<bool> {
    let constraint = Constraint::parse(constraint)?;
    Ok(OpennessAnalyzer::default().is_too_open(&constraint, current_major))
}
