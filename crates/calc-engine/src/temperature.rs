//! Celsius ⇄ Fahrenheit conversion.
//!
//! Uses the same `<number> <scale> <connector> <scale>` grammar as the unit
//! converter. The result is always shown with two decimals.

use crate::conversion::{ensure_finite, format_quantity, split_query, ConversionOutcome};
use crate::error::{CalcError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scale {
    Celsius,
    Fahrenheit,
}

impl Scale {
    /// Resolve a scale name such as "c", "°F", "degrees celsius" or
    /// "grados fahrenheit".
    pub fn from_alias(name: &str) -> Option<Scale> {
        let lowered = name.trim().to_lowercase();
        let bare = ["degrees ", "degree ", "grados ", "grado "]
            .iter()
            .find_map(|&prefix| lowered.strip_prefix(prefix))
            .unwrap_or(lowered.as_str())
            .trim_start_matches(['°', 'º'])
            .trim();

        match bare {
            "c" | "celsius" | "centigrade" | "centígrados" | "centigrados" | "centígrado"
            | "centigrado" => Some(Scale::Celsius),
            "f" | "fahrenheit" => Some(Scale::Fahrenheit),
            _ => None,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Scale::Celsius => "°C",
            Scale::Fahrenheit => "°F",
        }
    }
}

/// Convert `value` from one scale to the other. Same-scale input is
/// returned unchanged.
pub fn convert_value(value: f64, from: Scale, to: Scale) -> f64 {
    match (from, to) {
        (Scale::Celsius, Scale::Fahrenheit) => value * 9.0 / 5.0 + 32.0,
        (Scale::Fahrenheit, Scale::Celsius) => (value - 32.0) * 5.0 / 9.0,
        _ => value,
    }
}

/// Convert a temperature query, or `None` if it is not one.
///
/// ```
/// use calc_engine::temperature::convert;
///
/// assert_eq!(convert("25 c to f").unwrap().text, "77.00 °F");
/// ```
pub fn convert(raw: &str) -> Option<ConversionOutcome> {
    try_convert(raw).ok()
}

/// Like [`convert`], but returns [`CalcError::NoMatch`] with a reason, or
/// [`CalcError::NonFiniteResult`] when the amount overflows.
pub fn try_convert(raw: &str) -> Result<ConversionOutcome> {
    let query = split_query(raw, Scale::from_alias)
        .filter(|q| q.from != q.to)
        .ok_or_else(|| {
            CalcError::NoMatch(format!("not a temperature conversion: '{}'", raw.trim()))
        })?;

    let amount = ensure_finite(query.amount)?;
    let value = ensure_finite(convert_value(amount, query.from, query.to))?;
    let unit = query.to.symbol();
    Ok(ConversionOutcome {
        value,
        unit,
        text: format_quantity(value, 2, unit),
        alternate: None,
    })
}
