//! Numeric `major.minor.patch` versions.

use crate::error::Result;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use std::sync::LazyLock;

static TARGET_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+(\.[0-9]+){0,2}$").expect("Invalid regex"));

/// A plain numeric version.
///
/// Components that were not written default to 0 for comparison purposes;
/// `precision` remembers how many were written (1 to 3). Equality, ordering
/// and hashing only look at the zero-padded triple, so `8` and `8.0.0` are
/// the same version.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Version {
    /// Major component
    pub major: u64,
    /// Minor component (0 when not written)
    pub minor: u64,
    /// Patch component (0 when not written)
    pub patch: u64,
    /// Number of components written, 1 to 3
    pub precision: u8,
}

impl Version {
    /// Create a fully specified version.
    #[must_use]
    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self { major, minor, patch, precision: 3 }
    }

    /// Create a version from its written components.
    ///
    /// Returns `None` when `parts` is empty or longer than three.
    #[must_use]
    pub fn from_parts(parts: &[u64]) -> Option<Self> {
        let precision = u8::try_from(parts.len()).ok().filter(|p| (1..=3).contains(p))?;
        Some(Self {
            major: parts[0],
            minor: parts.get(1).copied().unwrap_or(0),
            patch: parts.get(2).copied().unwrap_or(0),
            precision,
        })
    }

    /// Parse and validate a target version (`^[0-9]+(\.[0-9]+){0,2}$`, ASCII
    /// digits only).
    ///
    /// # Errors
    ///
    /// Returns `MalformedVersion` for empty strings, non-ASCII-digit characters,
    /// more than three components, or components that overflow `u64`.
    pub fn parse(s: &str) -> Result<Self> {
        let malformed = || crate::err!(MalformedVersion { version: s.to_string() });

        if !TARGET_PATTERN.is_match(s) {
            return Err(malformed());
        }

        let parts = s
            .split('.')
            .map(str::parse::<u64>)
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|_| malformed())?;

        Self::from_parts(&parts).ok_or_else(malformed)
    }

    /// The synthetic `major.999.999` version used by the openness sweep.
    #[must_use]
    pub const fn probe(major: u64) -> Self {
        Self::new(major, PROBE_COMPONENT, PROBE_COMPONENT)
    }

    /// The zero-padded triple.
    #[must_use]
    pub const fn triple(&self) -> (u64, u64, u64) {
        (self.major, self.minor, self.patch)
    }

    /// Increment the last written component and zero the rest.
    ///
    /// `8` becomes `9.0.0`, `8.2` becomes `8.3.0`, `8.2.1` becomes `8.2.2`.
    #[must_use]
    pub const fn bump_last(&self) -> Self {
        self.bump_at(self.precision)
    }

    /// Increment the component at `position` (1 = major) and zero the rest.
    ///
    /// Saturates at `u64::MAX`; constraint parsing rejects that value so
    /// parsed bounds always move.
    #[must_use]
    pub const fn bump_at(&self, position: u8) -> Self {
        match position {
            0 | 1 => Self::new(self.major.saturating_add(1), 0, 0),
            2 => Self::new(self.major, self.minor.saturating_add(1), 0),
            _ => Self::new(self.major, self.minor, self.patch.saturating_add(1)),
        }
    }
}

/// Minor and patch value of the openness probes.
pub const PROBE_COMPONENT: u64 = 999;

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.triple() == other.triple()
    }
}

impl Eq for Version {}

impl Hash for Version {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.triple().hash(state);
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.triple().cmp(&other.triple())
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl FromStr for Version {
    type Err = crate::error::PhpCompatError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.precision {
            1 => write!(f, "{}", self.major),
            2 => write!(f, "{}.{}", self.major, self.minor),
            _ => write!(f, "{}.{}.{}", self.major, self.minor, self.patch),
        }
    }
}
