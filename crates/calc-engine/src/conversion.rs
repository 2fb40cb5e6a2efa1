//! The `<number> <unit> <connector> <unit>` grammar shared by the unit and
//! temperature converters, and the outcome they both produce.

use serde::Serialize;

use crate::error::{CalcError, Result};

/// Words that separate the source unit from the target unit.
const CONNECTORS: [&str; 4] = ["to", "in", "a", "en"];

/// The result of a successful conversion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversionOutcome {
    /// The converted value, unrounded.
    pub value: f64,
    /// Display label of the target unit (e.g., "lbs", "°F").
    pub unit: &'static str,
    /// Value and unit, rounded for display (e.g., "11.02 lbs").
    pub text: String,
    /// A second representation in a friendlier unit, when the primary
    /// value is very large or very small (e.g., "1.50 tons").
    pub alternate: Option<String>,
}

/// A query split into its amount and the raw text on each side of the
/// connector.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ConversionQuery<U> {
    pub amount: f64,
    pub from: U,
    pub to: U,
    pub from_text: String,
    pub to_text: String,
}

/// Split `raw` into amount, source unit and target unit.
///
/// Every connector position is tried left to right and the first split
/// where `lookup` recognizes both sides wins, so "5 in to cm" reads the
/// first "in" as inches.
pub(crate) fn split_query<U: Copy>(
    raw: &str,
    lookup: impl Fn(&str) -> Option<U>,
) -> Option<ConversionQuery<U>> {
    let normalized = raw
        .trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let (amount, rest) = split_amount(&normalized)?;
    let words: Vec<&str> = rest.split(' ').collect();

    words
        .iter()
        .enumerate()
        .filter(|(_, word)| CONNECTORS.contains(word))
        .find_map(|(i, _)| {
            let from_text = words[..i].join(" ");
            let to_text = words[i + 1..].join(" ");
            let from = lookup(&from_text)?;
            let to = lookup(&to_text)?;
            Some(ConversionQuery {
                amount,
                from,
                to,
                from_text,
                to_text,
            })
        })
}

/// Parse a leading signed decimal number (`.` or `,` as separator) and
/// return it with the trimmed remainder.
fn split_amount(s: &str) -> Option<(f64, &str)> {
    let end = s
        .char_indices()
        .find(|&(i, c)| {
            !(c.is_ascii_digit() || c == '.' || c == ',' || (i == 0 && (c == '-' || c == '+')))
        })
        .map(|(i, _)| i)
        .unwrap_or(s.len());
    let amount: f64 = s[..end].replace(',', ".").parse().ok()?;
    let rest = s[end..].trim();
    if rest.is_empty() {
        return None;
    }
    Some((amount, rest))
}

/// Round `value` to `decimals` places and append the unit label.
pub(crate) fn format_quantity(value: f64, decimals: usize, label: &str) -> String {
    format!("{value:.decimals$} {label}")
}

/// Reject an infinite or NaN amount or converted value.
pub(crate) fn ensure_finite(value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(CalcError::NonFiniteResult(value))
    }
}
