//! Query dispatch: try each resolver in priority order, first success wins.
//!
//! Date phrases and conversions are checked before arithmetic because their
//! grammars are narrower. "3 km to miles" must never reach the arithmetic
//! tokenizer.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::arithmetic::{evaluate_tokens, format_number, is_calculation, tokenize};
use crate::date::{try_resolve_with_options, ResolveOptions};
use crate::error::{CalcError, Result};
use crate::normalize::normalize;
use crate::{temperature, units};

/// Which resolver produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Kind {
    Calculator,
    UnitConversion,
    TemperatureConversion,
    Date,
}

impl Kind {
    /// Resolvers in the order they are tried.
    pub const PRIORITY: [Kind; 4] = [
        Kind::Date,
        Kind::UnitConversion,
        Kind::TemperatureConversion,
        Kind::Calculator,
    ];
}

/// The outcome handed back to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InterpretationResult {
    pub title: String,
    pub subtitle: String,
    pub kind: Kind,
}

/// Which resolvers run, and how dates resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterpreterOptions {
    pub dates: bool,
    pub units: bool,
    pub temperature: bool,
    pub arithmetic: bool,
    pub resolve: ResolveOptions,
}

impl Default for InterpreterOptions {
    fn default() -> Self {
        Self {
            dates: true,
            units: true,
            temperature: true,
            arithmetic: true,
            resolve: ResolveOptions::default(),
        }
    }
}

impl InterpreterOptions {
    fn enabled(&self, kind: Kind) -> bool {
        match kind {
            Kind::Date => self.dates,
            Kind::UnitConversion => self.units,
            Kind::TemperatureConversion => self.temperature,
            Kind::Calculator => self.arithmetic,
        }
    }
}

/// Interprets queries with a fixed set of options.
#[derive(Debug, Clone, Default)]
pub struct Interpreter {
    options: InterpreterOptions,
}

impl Interpreter {
    pub fn new(options: InterpreterOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &InterpreterOptions {
        &self.options
    }

    /// Interpret `query` against `now`, or `None` if no enabled resolver
    /// claims it.
    pub fn interpret(&self, query: &str, now: NaiveDateTime) -> Option<InterpretationResult> {
        self.try_interpret(query, now).ok()
    }

    /// Like [`Interpreter::interpret`], but reports [`CalcError::NoMatch`]
    /// when every resolver declines.
    pub fn try_interpret(&self, query: &str, now: NaiveDateTime) -> Result<InterpretationResult> {
        let query = query.trim();
        if query.is_empty() {
            return Err(CalcError::NoMatch("empty query".to_string()));
        }

        for kind in Kind::PRIORITY {
            if !self.options.enabled(kind) {
                continue;
            }
            match self.run(kind, query, now) {
                Ok(result) => {
                    debug!(?kind, title = %result.title, "query interpreted");
                    return Ok(result);
                }
                Err(err) => trace!(?kind, error = %err, "resolver declined"),
            }
        }

        Err(CalcError::NoMatch(format!("no interpretation for '{query}'")))
    }

    fn run(&self, kind: Kind, query: &str, now: NaiveDateTime) -> Result<InterpretationResult> {
        match kind {
            Kind::Date => {
                let resolved = try_resolve_with_options(query, now, &self.options.resolve)?;
                Ok(InterpretationResult {
                    title: resolved.format_long(),
                    subtitle: resolved.subtitle().to_string(),
                    kind,
                })
            }
            Kind::UnitConversion => {
                let outcome = units::try_convert(query)?;
                Ok(InterpretationResult {
                    title: outcome.text,
                    subtitle: outcome
                        .alternate
                        .unwrap_or_else(|| "Unit conversion".to_string()),
                    kind,
                })
            }
            Kind::TemperatureConversion => {
                let outcome = temperature::try_convert(query)?;
                Ok(InterpretationResult {
                    title: outcome.text,
                    subtitle: "Temperature conversion".to_string(),
                    kind,
                })
            }
            Kind::Calculator => {
                let value = calculate(query)?;
                Ok(InterpretationResult {
                    title: format_number(value),
                    subtitle: "Calculation".to_string(),
                    kind,
                })
            }
        }
    }
}

/// Normalize, tokenize and evaluate. A lone number is not a calculation.
fn calculate(query: &str) -> Result<f64> {
    let canonical = normalize(query);
    let tokens = tokenize(&canonical)?;
    if !is_calculation(&tokens) {
        return Err(CalcError::NoMatch(format!(
            "'{canonical}' has no operator or function"
        )));
    }
    evaluate_tokens(&tokens)
}

/// Interpret `query` against `now` with default options.
///
/// # Examples
///
/// ```
/// use calc_engine::dispatch::{interpret, Kind};
/// use chrono::NaiveDate;
///
/// let now = NaiveDate::from_ymd_opt(2026, 2, 18).unwrap().and_hms_opt(14, 30, 0).unwrap();
///
/// let result = interpret("3 + 4 * 2", now).unwrap();
/// assert_eq!(result.title, "11");
/// assert_eq!(result.kind, Kind::Calculator);
///
/// assert!(interpret("hello world", now).is_none());
/// ```
pub fn interpret(query: &str, now: NaiveDateTime) -> Option<InterpretationResult> {
    Interpreter::default().interpret(query, now)
}

// ── Tests ───────────────────────────────────────────────────────────────────
