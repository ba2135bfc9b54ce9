//! Numeric magnitudes out of heterogeneous table cells.
//!
//! Reference tables mix plain numbers with free text such as `"61 ± 13.42"`,
//! `"12h"`, `"3-7h"` or `"N/A"`. The lenient extractor always takes the first
//! numeric token of the central estimate; the strict extractor reports when
//! that policy had to choose between several tokens.

use crate::error::{PKError, PKResult};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// Separator between a central estimate and its variance term.
pub const PLUS_MINUS: char = '±';

/// A raw cell value as it arrives from the data table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Number(f64),
    Text(String),
    Missing,
}

impl RawValue {
    /// Interprets a CSV cell: blank is missing, a bare number stays numeric.
    pub fn from_cell(cell: &str) -> Self {
        let trimmed = cell.trim();
        if trimmed.is_empty() {
            return RawValue::Missing;
        }
        match trimmed.parse::<f64>() {
            Ok(n) if n.is_finite() => RawValue::Number(n),
            _ => RawValue::Text(trimmed.to_string()),
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, RawValue::Missing)
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::Number(n) => write!(f, "{}", n),
            RawValue::Text(s) => write!(f, "{}", s),
            RawValue::Missing => write!(f, "N/A"),
        }
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        RawValue::Number(value)
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Text(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        RawValue::Text(value)
    }
}

impl<T: Into<RawValue>> From<Option<T>> for RawValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(RawValue::Missing)
    }
}

fn number_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"[-+]?\d*\.?\d+").expect("numeric token pattern is valid")
    })
}

/// Drops the variance term: everything from the first `±` onwards.
fn central_estimate(text: &str) -> &str {
    match text.find(PLUS_MINUS) {
        Some(idx) => &text[..idx],
        None => text,
    }
}

/// All numeric tokens of the central estimate, in order of appearance.
///
/// A sign directly after a digit is a range separator, not a sign, so
/// `"3-7h"` gives `[3.0, 7.0]`.
pub fn numeric_tokens(text: &str) -> Vec<f64> {
    let text = central_estimate(text);
    number_regex()
        .find_iter(text)
        .filter_map(|m| {
            let token = m.as_str();
            let follows_digit = text[..m.start()]
                .chars()
                .next_back()
                .map_or(false, |c| c.is_ascii_digit() || c == '.');
            let token = if follows_digit {
                token.trim_start_matches(|c: char| c == '-' || c == '+')
            } else {
                token
            };
            token.parse::<f64>().ok()
        })
        .collect()
}

/// A cell whose central estimate holds several numbers, such as a range.
///
/// Lenient extraction uses the first one; this records that a choice was
/// made so it can be shown next to the result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmbiguousValue {
    pub label: String,
    pub text: String,
    pub candidates: Vec<f64>,
    pub used: f64,
}

impl fmt::Display for AmbiguousValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "'{}' = '{}' holds several values {:?}; using {}",
            self.label, self.text, self.candidates, self.used
        )
    }
}

/// `Some` when a text cell has more than one numeric token.
pub fn find_ambiguity(label: &str, value: &RawValue) -> Option<AmbiguousValue> {
    let RawValue::Text(text) = value else {
        return None;
    };
    let candidates = numeric_tokens(text);
    if candidates.len() < 2 {
        return None;
    }
    let used = extract_from_text(text)?;
    Some(AmbiguousValue {
        label: label.to_string(),
        text: text.clone(),
        candidates,
        used,
    })
}

/// Extracts the magnitude of a cell, or `None` when it holds nothing numeric.
///
/// Numbers pass through unchanged (NaN counts as a blank cell). Text is cut
/// at the first `±` and the first signed decimal token wins, so `"3-7h"`
/// yields `3.0`. Never fails.
pub fn extract_numeric(value: &RawValue) -> Option<f64> {
    match value {
        RawValue::Number(n) if n.is_nan() => None,
        RawValue::Number(n) => Some(*n),
        RawValue::Text(text) => extract_from_text(text),
        RawValue::Missing => None,
    }
}

/// Text form of [`extract_numeric`].
pub fn extract_from_text(text: &str) -> Option<f64> {
    number_regex()
        .find(central_estimate(text))
        .and_then(|m| m.as_str().parse::<f64>().ok())
}

/// Like [`extract_numeric`], but reports why a value could not be used.
///
/// `MissingData` when nothing numeric is present, `Ambiguous` when the
/// central estimate holds more than one numeric token (ranges such as
/// `"3-7h"`).
pub fn extract_strict(label: &str, value: &RawValue) -> PKResult<f64> {
    match value {
        RawValue::Text(text) => {
            let candidates = numeric_tokens(text);
            match candidates.as_slice() {
                [] => Err(PKError::MissingData(format!(
                    "'{}' has no numeric value in '{}'",
                    label, text
                ))),
                [single] => Ok(*single),
                _ => Err(PKError::Ambiguous { text: text.clone(), candidates }),
            }
        },
        other => extract_numeric(other)
            .ok_or_else(|| PKError::MissingData(format!("'{}' is missing", label))),
    }
}
