//! Atomic comparison units of a constraint.

use super::version::Version;
use serde::{Deserialize, Serialize};

/// Comparison operator of a [`Clause::Range`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RangeOp {
    /// `>`
    GreaterThan,
    /// `>=`
    GreaterThanOrEqual,
    /// `<`
    LessThan,
    /// `<=`
    LessThanOrEqual,
}

impl RangeOp {
    /// Operator as written in a constraint.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::GreaterThan => ">",
            Self::GreaterThanOrEqual => ">=",
            Self::LessThan => "<",
            Self::LessThanOrEqual => "<=",
        }
    }
}

/// A single clause of a constraint alternative.
///
/// Clauses within one alternative are ANDed together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "version")]
pub enum Clause {
    /// `8.1`, `=8.1`: the zero-padded triples must be equal
    Exact(Version),
    /// `!=8.1`, `<>8.1`
    NotEqual(Version),
    /// `>=8.1`, `<9`
    Range(RangeOp, Version),
    /// `^8.1`
    Caret(Version),
    /// `~8.1.0`
    Tilde(Version),
    /// `8.*`, `8.1.x`: the written prefix must be equal
    Wildcard(Version),
    /// `*`
    Any,
}

impl Clause {
    /// Check if a version satisfies this clause.
    #[must_use]
    pub fn matches(&self, version: &Version) -> bool {
        match self {
            Self::Exact(v) => version == v,
            Self::NotEqual(v) => version != v,
            Self::Range(op, v) => match op {
                RangeOp::GreaterThan => version > v,
                RangeOp::GreaterThanOrEqual => version >= v,
                RangeOp::LessThan => version < v,
                RangeOp::LessThanOrEqual => version <= v,
            },
            Self::Caret(v) => version >= v && *version < caret_upper_bound(v),
            Self::Tilde(v) => version >= v && *version < tilde_upper_bound(v),
            Self::Wildcard(prefix) => match prefix.precision {
                1 => version.major == prefix.major,
                2 => version.major == prefix.major && version.minor == prefix.minor,
                _ => version == prefix,
            },
            Self::Any => true,
        }
    }

    /// Exclusive upper bound of the clause, if it has one.
    ///
    /// `None` means the clause admits arbitrarily high versions.
    #[must_use]
    pub fn upper_bound(&self) -> Option<Version> {
        match self {
            Self::Exact(v) | Self::Range(RangeOp::LessThanOrEqual, v) => Some(v.bump_at(3)),
            Self::Range(RangeOp::LessThan, v) => Some(*v),
            Self::Caret(v) => Some(caret_upper_bound(v)),
            Self::Tilde(v) => Some(tilde_upper_bound(v)),
            Self::Wildcard(v) => Some(v.bump_last()),
            Self::NotEqual(_)
            | Self::Range(RangeOp::GreaterThan | RangeOp::GreaterThanOrEqual, _)
            | Self::Any => None,
        }
    }
}

/// `^X.Y.Z` allows everything below the next major; with a zero major the
/// bound tightens to the first non-zero written component.
///
/// `^8.1` < 9.0.0, `^0.3` < 0.4.0, `^0.0.3` < 0.0.4, `^0.0` < 0.1.0, `^0` < 1.0.0
fn caret_upper_bound(v: &Version) -> Version {
    let position = if v.major != 0 || v.precision < 2 {
        1
    } else if v.minor != 0 || v.precision < 3 {
        2
    } else {
        3
    };
    v.bump_at(position)
}

/// `~X.Y.Z` < X.(Y+1).0, `~X.Y` and `~X` < (X+1).0.0
fn tilde_upper_bound(v: &Version) -> Version {
    v.bump_at(v.precision.saturating_sub(1).max(1))
}

impl std::fmt::Display for Clause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Exact(v) => write!(f, "{v}"),
            Self::NotEqual(v) => write!(f, "!={v}"),
            Self::Range(op, v) => write!(f, "{}{v}", op.as_str()),
            Self::Caret(v) => write!(f, "^{v}"),
            Self::Tilde(v) => write!(f, "~{v}"),
            Self::Wildcard(v) => write!(f, "{v}.*"),
            Self::Any => write!(f, "*"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn v(s: &str) -> Version {
        let parts: Vec<u64> = s.split('.').map(|p| p.parse().unwrap()).collect();
        Version::from_parts(&parts).unwrap()
    }

    #[test_case("8.1", "8.1", true)]
    #[test_case("8.1", "8.1.0", true)]
    #[test_case("8.1", "8.1.1", false)]
    #[test_case("8", "8.1", false; "bare major is not a prefix")]
    #[test_case("8", "8.0", true)]
    fn test_exact(clause: &str, target: &str, expected: bool) {
        assert_eq!(Clause::Exact(v(clause)).matches(&v(target)), expected);
    }

    #[test_case("8.1", "8.1", true)]
    #[test_case("8.1", "8.3", true)]
    #[test_case("8.1", "8.999.999", true)]
    #[test_case("8.1", "9.0", false)]
    #[test_case("8.1", "7.4", false)]
    #[test_case("0.3", "0.3.9", true)]
    #[test_case("0.3", "0.4", false)]
    #[test_case("0.0.3", "0.0.3", true)]
    #[test_case("0.0.3", "0.0.4", false)]
    #[test_case("0.0", "0.0.9", true)]
    #[test_case("0.0", "0.1", false)]
    #[test_case("0", "0.9", true)]
    #[test_case("0", "1.0", false)]
    fn test_caret(clause: &str, target: &str, expected: bool) {
        assert_eq!(Clause::Caret(v(clause)).matches(&v(target)), expected);
    }

    #[test_case("8.1.0", "8.1", true)]
    #[test_case("8.1.0", "8.1.30", true)]
    #[test_case("8.1.0", "8.2", false)]
    #[test_case("8.1", "8.4", true)]
    #[test_case("8.1", "9.0", false)]
    #[test_case("8", "8.9", true)]
    #[test_case("8", "9", false)]
    fn test_tilde(clause: &str, target: &str, expected: bool) {
        assert_eq!(Clause::Tilde(v(clause)).matches(&v(target)), expected);
    }

    #[test]
    fn test_range() {
        let target = v("8.1");
        assert!(Clause::Range(RangeOp::GreaterThanOrEqual, v("8.1")).matches(&target));
        assert!(!Clause::Range(RangeOp::GreaterThan, v("8.1")).matches(&target));
        assert!(Clause::Range(RangeOp::LessThanOrEqual, v("8.1")).matches(&target));
        assert!(!Clause::Range(RangeOp::LessThan, v("8.1")).matches(&target));
        assert!(Clause::Range(RangeOp::LessThan, v("9")).matches(&v("8.999.999")));
    }

    #[test]
    fn test_wildcard_and_any() {
        assert!(Clause::Wildcard(v("8")).matches(&v("8.4.2")));
        assert!(!Clause::Wildcard(v("8")).matches(&v("9.0")));
        assert!(Clause::Wildcard(v("8.1")).matches(&v("8.1.9")));
        assert!(!Clause::Wildcard(v("8.1")).matches(&v("8.2")));
        assert!(Clause::Any.matches(&v("123.4.5")));
    }

    #[test]
    fn test_not_equal() {
        assert!(!Clause::NotEqual(v("8.0")).matches(&v("8")));
        assert!(Clause::NotEqual(v("8.0")).matches(&v("8.0.1")));
    }

    #[test]
    fn test_upper_bound() {
        assert_eq!(Clause::Caret(v("8.1")).upper_bound(), Some(Version::new(9, 0, 0)));
        assert_eq!(Clause::Tilde(v("8.1.0")).upper_bound(), Some(Version::new(8, 2, 0)));
        assert_eq!(Clause::Wildcard(v("8.1")).upper_bound(), Some(Version::new(8, 2, 0)));
        assert_eq!(
            Clause::Range(RangeOp::LessThanOrEqual, v("8.3")).upper_bound(),
            Some(Version::new(8, 3, 1))
        );
        assert_eq!(Clause::Range(RangeOp::GreaterThanOrEqual, v("8.1")).upper_bound(), None);
        assert_eq!(Clause::Any.upper_bound(), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Clause::Caret(v("8.1")).to_string(), "^8.1");
        assert_eq!(Clause::Range(RangeOp::LessThan, v("9.0")).to_string(), "<9.0");
        assert_eq!(Clause::Wildcard(v("8")).to_string(), "8.*");
        assert_eq!(Clause::Any.to_string(), "*");
    }
}
