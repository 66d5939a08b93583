//! Standard predicate implementations
//!
//! Every predicate has the same shape: the coerced input plus the positional
//! arguments stored on the check. Argument problems are reported as
//! [`PredicateError`]s; a rejected input is just `Ok(false)`.

use std::sync::{Arc, LazyLock};

use regex::{Regex, RegexBuilder};

use super::{Arg, CheckName, Predicate};
use crate::error::PredicateError;

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*\.[a-zA-Z]{2,}$",
    )
    .unwrap()
});

static URL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^https?://[^\s/$.?#].[^\s]*$").unwrap());

static INT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-+]?(?:0|[1-9][0-9]*)$").unwrap());

static FLOAT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[-+]?(?:[0-9]+\.?[0-9]*|\.[0-9]+)(?:[eE][-+]?[0-9]+)?$").unwrap()
});

static NUMERIC_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-+]?(?:[0-9]*\.)?[0-9]+$").unwrap());

/// Every standard predicate, keyed by name.
pub(super) fn standard() -> Vec<(CheckName, Predicate)> {
    fn entry(
        name: CheckName,
        predicate: fn(&str, &[Arg]) -> Result<bool, PredicateError>,
    ) -> (CheckName, Predicate) {
        (name, Arc::new(predicate))
    }

    vec![
        entry(CheckName::IsEmail, is_email),
        entry(CheckName::IsUrl, is_url),
        entry(CheckName::IsLength, is_length),
        entry(CheckName::Matches, matches),
        entry(CheckName::IsAlpha, is_alpha),
        entry(CheckName::IsAlphanumeric, is_alphanumeric),
        entry(CheckName::IsNumeric, is_numeric),
        entry(CheckName::IsLowercase, is_lowercase),
        entry(CheckName::IsUppercase, is_uppercase),
        entry(CheckName::IsInt, is_int),
        entry(CheckName::IsFloat, is_float),
        entry(CheckName::IsIn, is_in),
        entry(CheckName::Contains, contains),
        entry(CheckName::Equals, equals),
        entry(CheckName::IsGt, is_gt),
        entry(CheckName::IsGte, is_gte),
        entry(CheckName::IsLt, is_lt),
        entry(CheckName::IsLte, is_lte),
        entry(CheckName::IsInvalid, is_invalid),
        entry(CheckName::IsRequired, is_required),
        entry(CheckName::IsPositiveInt, is_positive_int),
        entry(CheckName::IsPositiveNumber, is_positive_number),
    ]
}

/// Parses a float literal; anything else (including `NaN`/`inf`) is `None`.
pub(crate) fn to_float(input: &str) -> Option<f64> {
    let input = input.trim();
    if FLOAT_REGEX.is_match(input) {
        input.parse().ok()
    } else {
        None
    }
}

// ============================================================================
// ARGUMENT HELPERS
// ============================================================================

fn required(args: &[Arg], index: usize) -> Result<&Arg, PredicateError> {
    args.get(index).ok_or(PredicateError::missing(index))
}

fn number(args: &[Arg], index: usize) -> Result<f64, PredicateError> {
    required(args, index)?
        .as_f64()
        .ok_or(PredicateError::invalid(index, "a number"))
}

fn count(args: &[Arg], index: usize) -> Result<Option<usize>, PredicateError> {
    args.get(index)
        .map(|arg| arg.as_usize().ok_or(PredicateError::invalid(index, "a non-negative integer")))
        .transpose()
}

fn text(args: &[Arg], index: usize) -> Result<&str, PredicateError> {
    required(args, index)?
        .as_text()
        .ok_or(PredicateError::invalid(index, "text"))
}

// ============================================================================
// FORMATS
// ============================================================================

fn is_email(input: &str, _args: &[Arg]) -> Result<bool, PredicateError> {
    Ok(EMAIL_REGEX.is_match(input))
}

fn is_url(input: &str, _args: &[Arg]) -> Result<bool, PredicateError> {
    Ok(URL_REGEX.is_match(input))
}

/// `isLength(min = 0, max = unbounded)`, counted in chars.
fn is_length(input: &str, args: &[Arg]) -> Result<bool, PredicateError> {
    let min = count(args, 0)?.unwrap_or(0);
    let max = count(args, 1)?;
    let len = input.chars().count();
    Ok(len >= min && max.is_none_or(|max| len <= max))
}

/// `matches(pattern, modifiers?)`. Text patterns compile per call; the only
/// modifier honoured is `i`.
fn matches(input: &str, args: &[Arg]) -> Result<bool, PredicateError> {
    match required(args, 0)? {
        Arg::Pattern(pattern) => Ok(pattern.is_match(input)),
        Arg::Text(pattern) => {
            let case_insensitive = args
                .get(1)
                .and_then(Arg::as_text)
                .is_some_and(|modifiers| modifiers.contains('i'));
            let pattern = RegexBuilder::new(pattern)
                .case_insensitive(case_insensitive)
                .build()?;
            Ok(pattern.is_match(input))
        }
        _ => Err(PredicateError::invalid(0, "a pattern")),
    }
}

fn is_alpha(input: &str, _args: &[Arg]) -> Result<bool, PredicateError> {
    Ok(!input.is_empty() && input.chars().all(|c| c.is_ascii_alphabetic()))
}

fn is_alphanumeric(input: &str, _args: &[Arg]) -> Result<bool, PredicateError> {
    Ok(!input.is_empty() && input.chars().all(|c| c.is_ascii_alphanumeric()))
}

fn is_numeric(input: &str, _args: &[Arg]) -> Result<bool, PredicateError> {
    Ok(NUMERIC_REGEX.is_match(input))
}

fn is_lowercase(input: &str, _args: &[Arg]) -> Result<bool, PredicateError> {
    Ok(input.chars().all(|c| !c.is_uppercase()))
}

fn is_uppercase(input: &str, _args: &[Arg]) -> Result<bool, PredicateError> {
    Ok(input.chars().all(|c| !c.is_lowercase()))
}

fn is_int(input: &str, _args: &[Arg]) -> Result<bool, PredicateError> {
    Ok(INT_REGEX.is_match(input))
}

fn is_float(input: &str, _args: &[Arg]) -> Result<bool, PredicateError> {
    Ok(!input.is_empty() && FLOAT_REGEX.is_match(input))
}

// ============================================================================
// CONTENT
// ============================================================================

fn is_in(input: &str, args: &[Arg]) -> Result<bool, PredicateError> {
    let values = required(args, 0)?
        .as_list()
        .ok_or(PredicateError::invalid(0, "a list of values"))?;
    Ok(values.iter().any(|value| value == input))
}

fn contains(input: &str, args: &[Arg]) -> Result<bool, PredicateError> {
    Ok(input.contains(text(args, 0)?))
}

fn equals(input: &str, args: &[Arg]) -> Result<bool, PredicateError> {
    Ok(input == text(args, 0)?)
}

// ============================================================================
// NUMERIC
// ============================================================================

fn compare(input: &str, args: &[Arg], op: fn(f64, f64) -> bool) -> Result<bool, PredicateError> {
    let threshold = number(args, 0)?;
    Ok(to_float(input).is_some_and(|value| op(value, threshold)))
}

fn is_gt(input: &str, args: &[Arg]) -> Result<bool, PredicateError> {
    compare(input, args, |value, threshold| value > threshold)
}

fn is_gte(input: &str, args: &[Arg]) -> Result<bool, PredicateError> {
    compare(input, args, |value, threshold| value >= threshold)
}

fn is_lt(input: &str, args: &[Arg]) -> Result<bool, PredicateError> {
    compare(input, args, |value, threshold| value < threshold)
}

fn is_lte(input: &str, args: &[Arg]) -> Result<bool, PredicateError> {
    compare(input, args, |value, threshold| value <= threshold)
}

fn is_positive_int(input: &str, _args: &[Arg]) -> Result<bool, PredicateError> {
    Ok(INT_REGEX.is_match(input) && !input.starts_with('-'))
}

fn is_positive_number(input: &str, _args: &[Arg]) -> Result<bool, PredicateError> {
    Ok(to_float(input).is_some_and(|value| value >= 0.0))
}

// ============================================================================
// PRESENCE
// ============================================================================

fn is_invalid(_input: &str, _args: &[Arg]) -> Result<bool, PredicateError> {
    Ok(false)
}

fn is_required(input: &str, _args: &[Arg]) -> Result<bool, PredicateError> {
    Ok(!input.is_empty())
}

// ============================================================================
// TESTS
// ============================================================================
