//! Cursor classification
//!
//! The client-supplied `since` value is either an ISO-8601 timestamp or an
//! integer offset. Classification never fails: anything else is carried as
//! [`Cursor::Unparsed`] and substituted verbatim.

use regex::Regex;
use std::sync::LazyLock;

/// `YYYY-MM-DDTHH:MM:SS[.fffffff][Z|±HH:MM]`, anchored at the start only
static ISO_TIMESTAMP_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\d{4}-[01]\d-[0-3]\dT[0-2]\d:[0-5]\d:[0-5]\d(\.\d{0,7})?([+-][0-2]\d:[0-5]\d|Z)?",
    )
    .unwrap()
});

/// Signed decimal integer of any size, surrounding whitespace allowed
static INTEGER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*[+-]?[0-9]+\s*$").unwrap());

/// A classified resumption cursor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cursor {
    /// ISO-8601 timestamp, kept as written
    IsoTimestamp(String),
    /// Integer offset, kept as written
    IntegerOffset(String),
    /// Neither form matched
    Unparsed(String),
}

impl Cursor {
    /// Classify a raw cursor. The timestamp pattern takes priority over
    /// integer parsing.
    pub fn classify(raw: &str) -> Self {
        if ISO_TIMESTAMP_REGEX.is_match(raw) {
            Self::IsoTimestamp(raw.to_string())
        } else if INTEGER_REGEX.is_match(raw) {
            Self::IntegerOffset(raw.to_string())
        } else {
            Self::Unparsed(raw.to_string())
        }
    }

    /// Cursor value to send upstream, before any URL encoding.
    ///
    /// Integer offsets are bumped by one when the upstream treats `since` as
    /// inclusive, so that only strictly newer rows come back. Otherwise the
    /// client's text is returned untouched.
    pub fn value(&self, offset_bigger_and_equal: bool) -> String {
        match self {
            Self::IntegerOffset(raw) if offset_bigger_and_equal => increment_integer(raw),
            Self::IsoTimestamp(raw) | Self::IntegerOffset(raw) | Self::Unparsed(raw) => {
                raw.clone()
            }
        }
    }

    /// Value to substitute for `__since__` inside the URL text.
    ///
    /// Same as [`Cursor::value`] except that timestamps are percent-encoded.
    pub fn substitution(&self, offset_bigger_and_equal: bool) -> String {
        match self {
            Self::IsoTimestamp(ts) => url::form_urlencoded::byte_serialize(ts.as_bytes()).collect(),
            _ => self.value(offset_bigger_and_equal),
        }
    }

    /// Check whether classification failed
    pub fn is_unparsed(&self) -> bool {
        matches!(self, Self::Unparsed(_))
    }
}

/// Add one to a decimal integer of arbitrary size, in canonical form
fn increment_integer(raw: &str) -> String {
    let trimmed = raw.trim();
    let (negative, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let digits = digits.trim_start_matches('0');

    match (negative, digits.is_empty()) {
        (_, true) => "1".to_string(),
        (false, false) => add_one(digits),
        (true, false) => {
            let magnitude = subtract_one(digits);
            if magnitude == "0" {
                magnitude
            } else {
                format!("-{magnitude}")
            }
        }
    }
}

/// `digits` is non-empty ASCII decimal
fn add_one(digits: &str) -> String {
    let mut out: Vec<char> = digits.chars().collect();
    for digit in out.iter_mut().rev() {
        if *digit == '9' {
            *digit = '0';
        } else {
            *digit = char::from(*digit as u8 + 1);
            return out.into_iter().collect();
        }
    }
    std::iter::once('1').chain(out).collect()
}

/// `digits` is non-zero ASCII decimal without leading zeros
fn subtract_one(digits: &str) -> String {
    let mut out: Vec<char> = digits.chars().collect();
    for digit in out.iter_mut().rev() {
        if *digit == '0' {
            *digit = '9';
        } else {
            *digit = char::from(*digit as u8 - 1);
            break;
        }
    }
    let result: String = out.into_iter().collect();
    match result.trim_start_matches('0') {
        "" => "0".to_string(),
        rest => rest.to_string(),
    }
}
