//! Constraint string normalization and tokenizing.
//!
//! Precedence is `||` (or a single `|`) lowest, then whitespace or comma as
//! AND. Whitespace directly after an operator is dropped so `>= 8.1` reads
//! as `>=8.1`. An alternative of the form `A - B` is a hyphen range.

use super::clause::{Clause, RangeOp};
use super::version::Version;
use super::Alternative;
use crate::error::Result;
use regex::Regex;
use std::sync::LazyLock;

static OR_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\|\|?\s*").expect("Invalid regex"));

static OPERATOR_SPACING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(>=|<=|<>|!=|==|[<>=^~])\s+").expect("Invalid regex"));

static HYPHEN_RANGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\S+)\s+-\s+(\S+)$").expect("Invalid regex"));

static VERSION_LITERAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^v?([0-9]+)(?:\.([0-9]+))?(?:\.([0-9]+))?$").expect("Invalid regex")
});

/// `8.*`, `8.*.*` or `8.1.*`: at most three components in total.
static WILDCARD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^v?([0-9]+)(?:\.([0-9]+)\.[xX*]|\.[xX*](?:\.[xX*])?)$").expect("Invalid regex")
});

static ANY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[xX*](?:\.[xX*]){0,2}$").expect("Invalid regex"));

/// Operator prefixes, longest first so `>=` wins over `>`.
const OPERATORS: &[&str] = &[">=", "<=", "<>", "!=", "==", ">", "<", "=", "^", "~"];

/// Parse a full constraint string into its OR alternatives.
pub(super) fn parse_alternatives(raw: &str) -> Result<Vec<Alternative>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(malformed(raw, raw, "empty constraint"));
    }

    OR_SEPARATOR
        .split(trimmed)
        .map(|alternative| parse_alternative(raw, alternative))
        .collect()
}

/// Parse one AND group.
fn parse_alternative(raw: &str, alternative: &str) -> Result<Alternative> {
    let alternative = alternative.replace(',', " ");
    let alternative = alternative.trim();
    if alternative.is_empty() {
        return Err(malformed(raw, alternative, "empty alternative"));
    }

    if let Some(caps) = HYPHEN_RANGE.captures(alternative) {
        return parse_hyphen_range(raw, &caps[1], &caps[2]);
    }

    let collapsed = OPERATOR_SPACING.replace_all(alternative, "$1");
    let clauses = collapsed
        .split_whitespace()
        .map(|token| parse_clause(raw, token))
        .collect::<Result<Vec<_>>>()?;

    tracing::trace!(constraint = %raw, clauses = clauses.len(), "Parsed alternative");
    Ok(Alternative { clauses })
}

/// `A - B`: lower bound inclusive, upper bound inclusive when fully written,
/// otherwise below the next value of its last written component.
fn parse_hyphen_range(raw: &str, lower: &str, upper: &str) -> Result<Alternative> {
    let low = parse_literal(raw, lower)?;
    let high = parse_literal(raw, upper)?;

    let upper_clause = if high.precision >= 3 {
        Clause::Range(RangeOp::LessThanOrEqual, high)
    } else {
        Clause::Range(RangeOp::LessThan, high.bump_last())
    };

    Ok(Alternative {
        clauses: vec![Clause::Range(RangeOp::GreaterThanOrEqual, low), upper_clause],
    })
}

/// Classify a single token by its prefix.
fn parse_clause(raw: &str, token: &str) -> Result<Clause> {
    if ANY.is_match(token) {
        return Ok(Clause::Any);
    }

    if let Some(caps) = WILDCARD.captures(token) {
        let mut parts = vec![parse_component(raw, token, &caps[1])?];
        if let Some(minor) = caps.get(2) {
            parts.push(parse_component(raw, token, minor.as_str())?);
        }
        let prefix = Version::from_parts(&parts)
            .ok_or_else(|| malformed(raw, token, "invalid wildcard"))?;
        return Ok(Clause::Wildcard(prefix));
    }

    let (operator, rest) = OPERATORS
        .iter()
        .find_map(|op| token.strip_prefix(op).map(|rest| (*op, rest)))
        .unwrap_or(("", token));

    let version = parse_literal(raw, rest).map_err(|_| {
        if operator.is_empty() {
            malformed(raw, token, "unrecognized constraint shape")
        } else {
            malformed(raw, token, &format!("expected a version after '{operator}'"))
        }
    })?;

    Ok(match operator {
        ">=" => Clause::Range(RangeOp::GreaterThanOrEqual, version),
        "<=" => Clause::Range(RangeOp::LessThanOrEqual, version),
        ">" => Clause::Range(RangeOp::GreaterThan, version),
        "<" => Clause::Range(RangeOp::LessThan, version),
        "<>" | "!=" => Clause::NotEqual(version),
        "^" => Clause::Caret(version),
        "~" => Clause::Tilde(version),
        _ => Clause::Exact(version),
    })
}

/// Parse a version literal as written in a constraint (`v` prefix allowed).
fn parse_literal(raw: &str, literal: &str) -> Result<Version> {
    let caps = VERSION_LITERAL
        .captures(literal)
        .ok_or_else(|| malformed(raw, literal, "expected a version"))?;

    let parts = caps
        .iter()
        .skip(1)
        .flatten()
        .map(|m| parse_component(raw, literal, m.as_str()))
        .collect::<Result<Vec<_>>>()?;

    Version::from_parts(&parts).ok_or_else(|| malformed(raw, literal, "expected a version"))
}

/// Components must stay below `u64::MAX` so caret, tilde and partial
/// upper bounds can step past them.
fn parse_component(raw: &str, token: &str, digits: &str) -> Result<u64> {
    digits
        .parse::<u64>()
        .ok()
        .filter(|&n| n < u64::MAX)
        .ok_or_else(|| malformed(raw, token, "version component out of range"))
}

fn malformed(raw: &str, token: &str, message: &str) -> crate::error::PhpCompatError {
    crate::err!(MalformedConstraint {
        constraint: raw.to_string(),
        token: token.to_string(),
        message: message.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PhpCompatError;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    fn clauses(raw: &str) -> Vec<Vec<String>> {
        parse_alternatives(raw)
            .unwrap()
            .iter()
            .map(|alt| alt.clauses.iter().map(ToString::to_string).collect())
            .collect()
    }

    #[test]
    fn test_or_and_split() {
        assert_eq!(
            clauses("~8.1.0||~8.2.0"),
            vec![vec!["~8.1.0".to_string()], vec!["~8.2.0".to_string()]]
        );
        assert_eq!(
            clauses(">=7.4 <8.0 || ^8.1"),
            vec![
                vec![">=7.4".to_string(), "<8.0".to_string()],
                vec!["^8.1".to_string()],
            ]
        );
    }

    #[test]
    fn test_single_pipe_is_or() {
        assert_eq!(clauses("^7.4|^8.0").len(), 2);
    }

    #[test]
    fn test_operator_spacing_and_commas() {
        assert_eq!(
            clauses(">= 8.1, < 9.0"),
            vec![vec![">=8.1".to_string(), "<9.0".to_string()]]
        );
        assert_eq!(clauses("^ 8.1"), vec![vec!["^8.1".to_string()]]);
    }

    #[test]
    fn test_hyphen_range() {
        assert_eq!(
            clauses("8.0 - 8.2"),
            vec![vec![">=8.0".to_string(), "<8.3.0".to_string()]]
        );
        assert_eq!(
            clauses("7.4.0 - 8.2.5"),
            vec![vec![">=7.4.0".to_string(), "<=8.2.5".to_string()]]
        );
    }

    #[test_case("8.1", Clause::Exact(Version::from_parts(&[8, 1]).unwrap()); "exact")]
    #[test_case("=8.1", Clause::Exact(Version::from_parts(&[8, 1]).unwrap()); "exact with equals")]
    #[test_case("==8.1.2", Clause::Exact(Version::new(8, 1, 2)); "exact with double equals")]
    #[test_case("v8.1", Clause::Exact(Version::from_parts(&[8, 1]).unwrap()); "v prefix")]
    #[test_case("!=8.0", Clause::NotEqual(Version::from_parts(&[8, 0]).unwrap()); "not equal")]
    #[test_case("<>8.0", Clause::NotEqual(Version::from_parts(&[8, 0]).unwrap()); "diamond not equal")]
    #[test_case(">8", Clause::Range(RangeOp::GreaterThan, Version::from_parts(&[8]).unwrap()); "greater than")]
    #[test_case("^8.1", Clause::Caret(Version::from_parts(&[8, 1]).unwrap()); "caret")]
    #[test_case("~8.1.0", Clause::Tilde(Version::new(8, 1, 0)); "tilde")]
    #[test_case("8.*", Clause::Wildcard(Version::from_parts(&[8]).unwrap()); "major wildcard")]
    #[test_case("8.1.x", Clause::Wildcard(Version::from_parts(&[8, 1]).unwrap()); "minor x wildcard")]
    #[test_case("*", Clause::Any; "any star")]
    #[test_case("*.*", Clause::Any; "any star star")]
    #[test_case("x", Clause::Any; "any x")]
    #[test_case("*.*.*", Clause::Any; "any three components")]
    #[test_case("8.*.*", Clause::Wildcard(Version::from_parts(&[8]).unwrap()); "major wildcard padded")]
    fn test_token_shapes(token: &str, expected: Clause) {
        assert_eq!(parse_clause(token, token).unwrap(), expected);
    }

    #[test]
    fn test_unrecognized_shape_message() {
        for token in ["8.*.*.*", "\u{0668}.\u{0661}"] {
            match parse_clause(token, token).unwrap_err() {
                PhpCompatError::MalformedConstraint { message, .. } => {
                    assert_eq!(message, "unrecognized constraint shape");
                }
                other => panic!("expected MalformedConstraint, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_wildcard_keeps_precision() {
        match parse_clause("8.1.*", "8.1.*").unwrap() {
            Clause::Wildcard(prefix) => assert_eq!(prefix.precision, 2),
            other => panic!("expected wildcard, got {other:?}"),
        }
    }

    #[test_case("not-a-constraint", "not-a-constraint"; "garbage")]
    #[test_case("^8.1 || foo", "foo"; "garbage in or")]
    #[test_case(">=abc", ">=abc"; "operator without version")]
    #[test_case("~>8.1", "~>8.1"; "double tilde operator")]
    #[test_case("8.1.2.3", "8.1.2.3"; "four components")]
    #[test_case("^8.1 ||", ""; "trailing or")]
    #[test_case("", ""; "empty")]
    #[test_case("   ", "   "; "blank")]
    #[test_case("^99999999999999999999999", "^99999999999999999999999"; "overflow")]
    #[test_case("^18446744073709551615", "^18446744073709551615"; "caret at u64 max")]
    #[test_case("8.*.*.*", "8.*.*.*"; "four component wildcard")]
    #[test_case("8.1.2.*", "8.1.2.*"; "wildcard after patch")]
    #[test_case("*.*.*.*", "*.*.*.*"; "four component any")]
    #[test_case("v*", "v*"; "v prefixed any")]
    #[test_case("\u{0668}.\u{0661}", "\u{0668}.\u{0661}"; "non ascii digits")]
    fn test_malformed(raw: &str, offending: &str) {
        match parse_alternatives(raw).unwrap_err() {
            PhpCompatError::MalformedConstraint { constraint, token, .. } => {
                assert_eq!(constraint, raw);
                assert_eq!(token, offending);
            }
            other => panic!("expected MalformedConstraint, got {other:?}"),
        }
    }
}
