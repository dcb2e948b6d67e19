//! Composer-style version constraints.
//!
//! A [`Constraint`] is a disjunction (`||`) of [`Alternative`]s, each a
//! conjunction of [`Clause`]s. Supported clause shapes:
//!
//! - `8.1`, `=8.1` - exact (zero-padded, so `8` never matches `8.1`)
//! - `>8.1`, `>=8.1`, `<9`, `<=8.3` - ranges
//! - `^8.1` - caret, below the next major (zero majors tighten)
//! - `~8.1.0` - tilde, below the next minor; `~8.1` below the next major
//! - `8.*`, `8.1.x` - wildcard on the written prefix
//! - `*` - anything
//! - `!=8.0` - not equal
//! - `8.0 - 8.2` - hyphen range
//!
//! # Example
//!
//! ```rust
//! use phpcompat::constraint::{satisfies, Constraint, Version};
//!
//! let constraint = Constraint::parse("^7.4 || ^8.0").unwrap();
//! assert!(constraint.is_satisfied_by(&Version::parse("8.1").unwrap()));
//!
//! assert!(!satisfies(">=8.1 <9.0", "9.0").unwrap());
//! ```

mod clause;
mod parser;
mod version;

pub use clause::{Clause, RangeOp};
pub use version::{Version, PROBE_COMPONENT};

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// One AND group of a constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alternative {
    /// Clauses that must all hold
    pub clauses: Vec<Clause>,
}

impl Alternative {
    /// Check if every clause accepts the version.
    #[must_use]
    pub fn is_satisfied_by(&self, version: &Version) -> bool {
        self.clauses.iter().all(|clause| clause.matches(version))
    }

    /// Tightest exclusive upper bound over the clauses, `None` when unbounded.
    #[must_use]
    pub fn upper_bound(&self) -> Option<Version> {
        self.clauses.iter().filter_map(Clause::upper_bound).min()
    }
}

impl std::fmt::Display for Alternative {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let rendered: Vec<String> = self.clauses.iter().map(ToString::to_string).collect();
        write!(f, "{}", rendered.join(" "))
    }
}

/// A parsed version constraint such as `^7.4 || >=8.0 <8.3`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Constraint {
    /// The raw constraint string as written in composer.json
    pub raw: String,

    /// OR alternatives
    pub alternatives: Vec<Alternative>,
}

impl Constraint {
    /// Parse a constraint string into a `Constraint`.
    ///
    /// # Errors
    ///
    /// Returns `MalformedConstraint` if the string is empty, has an empty
    /// alternative, or contains a token of unknown shape.
    pub fn parse(s: &str) -> Result<Self> {
        let alternatives = parser::parse_alternatives(s)?;
        Ok(Self {
            raw: s.to_string(),
            alternatives,
        })
    }

    /// Check if this constraint is satisfied by a given version.
    ///
    /// True iff at least one alternative accepts the version.
    #[must_use]
    pub fn is_satisfied_by(&self, version: &Version) -> bool {
        self.alternatives
            .iter()
            .any(|alternative| alternative.is_satisfied_by(version))
    }

    /// Exclusive upper bound over all alternatives, `None` when any
    /// alternative is unbounded.
    #[must_use]
    pub fn upper_bound(&self) -> Option<Version> {
        self.alternatives
            .iter()
            .map(Alternative::upper_bound)
            .collect::<Option<Vec<_>>>()?
            .into_iter()
            .max()
    }
}

impl FromStr for Constraint {
    type Err = crate::error::PhpCompatError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl std::fmt::Display for Constraint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let rendered: Vec<String> = self.alternatives.iter().map(ToString::to_string).collect();
        write!(f, "{}", rendered.join(" || "))
    }
}

/// Check a constraint string against a target version string.
///
/// The target is validated first, so a bad target is reported even when the
/// constraint is bad too.
///
/// # Errors
///
/// Returns `MalformedVersion` if `target` is not `major[.minor[.patch]]`, and
/// `MalformedConstraint` if `constraint` cannot be parsed.
pub fn satisfies(constraint: &str, target: &str) -> Result<bool> {
    let version = Version::parse(target)?;
    let constraint = Constraint::parse(constraint)?;
    let satisfied = constraint.is_satisfied_by(&version);
    tracing::trace!(constraint = %constraint.raw, target = %version, satisfied, "Evaluated constraint");
    Ok(satisfied)
}

/// First dot-delimited component of a target version.
///
/// # Errors
///
/// Returns `MalformedVersion` if `version` is not `major[.minor[.patch]]`.
pub fn major_of(version: &str) -> Result<u64> {
    Version::parse(version).map(|v| v.major)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PhpCompatError;
    use proptest::prelude::*;
    use test_case::test_case;

    #[test_case("^8.1", "8.1", true; "caret at lower bound")]
    #[test_case("^8.1", "8.3", true; "caret inside")]
    #[test_case("^8.1", "9.0", false; "caret next major")]
    #[test_case("^8.1", "7.4", false; "caret below")]
    #[test_case("~8.1.0", "8.1", true; "tilde patch level")]
    #[test_case("~8.1.0", "8.2", false; "tilde next minor")]
    #[test_case(">=8.1 <9.0", "8.1", true; "range lower bound")]
    #[test_case(">=8.1 <9.0", "9.0", false; "range upper bound")]
    #[test_case("8", "8.1", false; "bare major exact")]
    #[test_case("^7.4||^8.0", "8.1", true; "or second alternative")]
    #[test_case("^7.4||^8.0", "9.0", false; "or none")]
    #[test_case("*", "5.3", true; "any")]
    #[test_case("8.*", "8.4.1", true; "wildcard")]
    #[test_case(">=7.2, <8.2", "8.1.99", true; "comma and")]
    #[test_case("7.4 - 8.1", "8.1.5", true; "hyphen partial upper")]
    #[test_case("7.4 - 8.1", "8.2", false; "hyphen excludes next minor")]
    #[test_case(">=7.4 !=8.0.0", "8.0", false; "not equal excluded")]
    fn test_satisfies(constraint: &str, target: &str, expected: bool) {
        assert_eq!(satisfies(constraint, target).unwrap(), expected);
    }

    #[test]
    fn test_malformed_target() {
        let err = satisfies("^8.1", "").unwrap_err();
        assert!(matches!(err, PhpCompatError::MalformedVersion { .. }));

        let err = satisfies("^8.1", "8.1.2.3").unwrap_err();
        assert!(matches!(err, PhpCompatError::MalformedVersion { .. }));
    }

    #[test]
    fn test_malformed_constraint() {
        let err = satisfies("not-a-constraint", "8.1").unwrap_err();
        assert!(matches!(err, PhpCompatError::MalformedConstraint { .. }));
    }

    #[test]
    fn test_target_checked_before_constraint() {
        let err = satisfies("not-a-constraint", "eight").unwrap_err();
        assert!(matches!(err, PhpCompatError::MalformedVersion { .. }));
    }

    #[test]
    fn test_upper_bound() {
        let c = Constraint::parse("^7.4 || ~8.1.0").unwrap();
        assert_eq!(c.upper_bound(), Some(Version::new(8, 2, 0)));

        let c = Constraint::parse("^7.4 || >=8.0").unwrap();
        assert_eq!(c.upper_bound(), None);

        let c = Constraint::parse(">=8.0 <=8.3").unwrap();
        assert_eq!(c.upper_bound(), Some(Version::new(8, 3, 1)));
    }

    #[test]
    fn test_max_component_is_rejected() {
        let at_max = ["^18446744073709551615", "~18446744073709551615.3", "18446744073709551615.*"];
        for constraint in at_max {
            assert!(matches!(
                satisfies(constraint, "8.0"),
                Err(PhpCompatError::MalformedConstraint { .. })
            ));
        }

        // One below the maximum still has room for the upper bound
        assert!(satisfies("^18446744073709551614", "18446744073709551614.2").unwrap());
        assert!(satisfies("~18446744073709551614.3", "18446744073709551614.5").unwrap());
        assert!(!satisfies("^18446744073709551614", "8.0").unwrap());
    }

    #[test]
    fn test_display_normalizes() {
        let c = Constraint::parse(">= 7.4,<8.0   ||^8.1").unwrap();
        assert_eq!(c.to_string(), ">=7.4 <8.0 || ^8.1");
        assert_eq!(c.raw, ">= 7.4,<8.0   ||^8.1");
    }

    #[test]
    fn test_major_of() {
        assert_eq!(major_of("8.3").unwrap(), 8);
        assert_eq!(major_of("10").unwrap(), 10);
        assert!(major_of("8.x").is_err());
    }

    fn version() -> impl Strategy<Value = Version> {
        (0u64..20, 0u64..20, 0u64..20).prop_map(|(a, b, c)| Version::new(a, b, c))
    }

    fn clause() -> impl Strategy<Value = Clause> {
        let op = prop_oneof![
            Just(RangeOp::GreaterThan),
            Just(RangeOp::GreaterThanOrEqual),
            Just(RangeOp::LessThan),
            Just(RangeOp::LessThanOrEqual),
        ];
        prop_oneof![
            version().prop_map(Clause::Exact),
            version().prop_map(Clause::NotEqual),
            (op, version()).prop_map(|(op, v)| Clause::Range(op, v)),
            version().prop_map(Clause::Caret),
            version().prop_map(Clause::Tilde),
            prop::collection::vec(0u64..20, 1..3)
                .prop_filter_map("prefix", |parts| Version::from_parts(&parts))
                .prop_map(Clause::Wildcard),
            Just(Clause::Any),
        ]
    }

    fn constraint() -> impl Strategy<Value = Constraint> {
        prop::collection::vec(
            prop::collection::vec(clause(), 1..4).prop_map(|clauses| Alternative { clauses }),
            1..4,
        )
        .prop_map(|alternatives| Constraint { raw: String::new(), alternatives })
    }

    proptest! {
        #[test]
        fn prop_or_is_existential(c in constraint(), v in version()) {
            let expected = c.alternatives.iter().any(|alt| alt.clauses.iter().all(|cl| cl.matches(&v)));
            prop_assert_eq!(c.is_satisfied_by(&v), expected);
        }

        #[test]
        fn prop_clause_order_is_irrelevant(c in constraint(), v in version()) {
            let mut reversed = c.clone();
            reversed.alternatives.reverse();
            for alternative in &mut reversed.alternatives {
                alternative.clauses.reverse();
            }
            prop_assert_eq!(c.is_satisfied_by(&v), reversed.is_satisfied_by(&v));
        }

        #[test]
        fn prop_display_reparses_to_same_verdicts(c in constraint(), v in version()) {
            let reparsed = Constraint::parse(&c.to_string()).unwrap();
            prop_assert_eq!(c.is_satisfied_by(&v), reparsed.is_satisfied_by(&v));
        }

        #[test]
        fn prop_nothing_at_or_above_upper_bound(c in constraint(), v in version()) {
            if let Some(bound) = c.upper_bound() {
                if v >= bound {
                    prop_assert!(!c.is_satisfied_by(&v));
                }
            }
        }

        #[test]
        fn prop_evaluation_is_idempotent(major in 5u64..12, minor in 0u64..10) {
            let target = format!("{major}.{minor}");
            let first = satisfies("^7.4 || ~8.1.0 || >=9.0 <10", &target).unwrap();
            for _ in 0..3 {
                prop_assert_eq!(satisfies("^7.4 || ~8.1.0 || >=9.0 <10", &target).unwrap(), first);
            }
        }
    }
}
