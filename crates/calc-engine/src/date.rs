//! Natural-language date resolution, English and Spanish.
//!
//! Resolution is split in two steps. [`parse`] matches the query against a
//! fixed set of phrase shapes and produces a [`DateQueryMatch`]: which
//! shape matched, the slots it captured, and the language the words came
//! from. [`DateQuery::resolve`] then does the calendar arithmetic, which is
//! the same for both languages.
//!
//! Every function takes the "now" anchor as an argument and never reads the
//! system clock.
//!
//! # Supported Expressions
//!
//! **Named weekday**: `"friday"`, `"next monday"`, `"last tuesday"`,
//! `"el viernes"`, `"el lunes que viene"`, `"el martes pasado"`,
//! `"próximo jueves"`
//!
//! **Ordinal weekday of month**: `"first monday of march"`,
//! `"last friday of february"`, `"el último viernes de febrero"`
//!
//! **Literal month/day**: `"october 23"`, `"23rd october"`, `"el 5 de mayo"`
//!
//! **Relative term**: `"today"`, `"tomorrow"`, `"yesterday"`, `"hoy"`,
//! `"mañana"`, `"ayer"`, `"pasado mañana"`, `"anteayer"`
//!
//! **Relative arithmetic**: `"today + 3 days"`, `"tomorrow - 2 weeks"`,
//! `"hoy más 1 mes"`, `"ayer menos 2 años"`

use chrono::{Datelike, Days, Months, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{CalcError, Result};
use crate::vocabulary::{vocabulary, DateUnit, Language, Ordinal};

/// Options for [`resolve_with_options`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolveOptions {
    /// Hour of day (0-23) given to literal month/day dates such as
    /// "october 23".
    pub literal_hour: u32,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self { literal_hour: 12 }
    }
}

/// Direction qualifier on a named weekday.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Qualifier {
    /// "next", "que viene", "próximo": strictly in the future.
    Next,
    /// "last", "pasado": strictly in the past.
    Last,
    /// No qualifier: the occurrence in the current Sunday-based week,
    /// possibly today or already past.
    Nearest,
}

/// One case per supported phrase shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateQuery {
    NamedWeekday {
        weekday: Weekday,
        qualifier: Qualifier,
    },
    OrdinalWeekday {
        ordinal: Ordinal,
        weekday: Weekday,
        month: u32,
    },
    MonthDay {
        month: u32,
        day: u32,
    },
    Relative {
        days: i64,
    },
    RelativeArithmetic {
        base_days: i64,
        amount: i64,
        unit: DateUnit,
    },
}

/// A matched phrase and the language its words came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateQueryMatch {
    pub query: DateQuery,
    pub language: Language,
}

/// A concrete calendar date-time plus the language to present it in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResolvedDate {
    pub datetime: NaiveDateTime,
    pub language: Language,
}

impl ResolvedDate {
    /// Long-form localized text with the first letter capitalized.
    ///
    /// English: `"Friday, 23 October 2026, 14:30"`.
    /// Spanish: `"Viernes, 23 de octubre de 2026, 14:30"`.
    pub fn format_long(&self) -> String {
        let dt = &self.datetime;
        let weekday = self.language.weekday_name(dt.weekday());
        let month = self.language.month_name(dt.month());
        let time = dt.format("%H:%M");
        let text = match self.language {
            Language::En => format!(
                "{weekday}, {} {} {}, {time}",
                dt.day(),
                capitalize(month),
                dt.year()
            ),
            Language::Es => {
                format!("{weekday}, {} de {month} de {}, {time}", dt.day(), dt.year())
            }
        };
        capitalize(&text)
    }

    /// Result category label in the detected language.
    pub fn subtitle(&self) -> &'static str {
        match self.language {
            Language::En => "Detected date",
            Language::Es => "Fecha detectada",
        }
    }
}

// ── resolve ─────────────────────────────────────────────────────────────────

/// Resolve a date phrase against `now` with default options.
///
/// # Examples
///
/// ```
/// use calc_engine::date::resolve;
/// use chrono::NaiveDate;
///
/// // Wednesday, 18 February 2026
/// let now = NaiveDate::from_ymd_opt(2026, 2, 18).unwrap().and_hms_opt(9, 0, 0).unwrap();
/// let resolved = resolve("next friday", now).unwrap();
/// assert_eq!(resolved.format_long(), "Friday, 20 February 2026, 09:00");
/// ```
pub fn resolve(raw: &str, now: NaiveDateTime) -> Option<ResolvedDate> {
    resolve_with_options(raw, now, &ResolveOptions::default())
}

/// Resolve a date phrase against `now`, returning `None` when no phrase
/// shape matches or the captured slots do not form a date.
pub fn resolve_with_options(
    raw: &str,
    now: NaiveDateTime,
    options: &ResolveOptions,
) -> Option<ResolvedDate> {
    try_resolve_with_options(raw, now, options).ok()
}

/// Resolve a date phrase against `now`.
///
/// # Errors
///
/// Returns [`CalcError::NoMatch`] if no phrase shape matches and
/// [`CalcError::InvalidDate`] if one does but the date does not exist
/// ("february 30", a fifth Monday in a month with four).
pub fn try_resolve_with_options(
    raw: &str,
    now: NaiveDateTime,
    options: &ResolveOptions,
) -> Result<ResolvedDate> {
    let matched = parse(raw)
        .ok_or_else(|| CalcError::NoMatch(format!("not a date phrase: '{}'", raw.trim())))?;
    let datetime = matched.query.resolve(now, options).ok_or_else(|| {
        CalcError::InvalidDate(format!("'{}' does not resolve to a calendar date", raw.trim()))
    })?;
    Ok(ResolvedDate {
        datetime,
        language: matched.language,
    })
}

/// Match a query against the phrase shapes, most specific first.
pub fn parse(raw: &str) -> Option<DateQueryMatch> {
    let normalized = normalize_expression(raw);
    let words: Vec<&str> = normalized.split(' ').collect();

    try_named_weekday(&words)
        .or_else(|| try_ordinal_weekday(&words))
        .or_else(|| try_month_day(&words))
        .or_else(|| try_relative(&normalized))
        .or_else(|| try_relative_arithmetic(&normalized))
}

impl DateQuery {
    /// Compute the calendar date this query names, relative to `now`.
    pub fn resolve(&self, now: NaiveDateTime, options: &ResolveOptions) -> Option<NaiveDateTime> {
        match *self {
            DateQuery::NamedWeekday { weekday, qualifier } => {
                let current = now.weekday().num_days_from_sunday() as i64;
                let target = weekday.num_days_from_sunday() as i64;
                let delta = target - current;
                let delta = match qualifier {
                    Qualifier::Last if delta >= 0 => delta - 7,
                    Qualifier::Next if delta <= 0 => delta + 7,
                    _ => delta,
                };
                shift_days(now, delta)
            }
            DateQuery::OrdinalWeekday {
                ordinal,
                weekday,
                month,
            } => {
                let date = find_weekday_in_month(now.year(), month, weekday, ordinal)?;
                Some(date.and_time(now.time()))
            }
            DateQuery::MonthDay { month, day } => {
                let passed = month < now.month() || (month == now.month() && day < now.day());
                let year = if passed { now.year() + 1 } else { now.year() };
                // February 29 rolls forward to the next leap year
                let date =
                    (year..=year + 8).find_map(|y| NaiveDate::from_ymd_opt(y, month, day))?;
                let time = NaiveTime::from_hms_opt(options.literal_hour, 0, 0)?;
                Some(date.and_time(time))
            }
            DateQuery::Relative { days } => shift_days(now, days),
            DateQuery::RelativeArithmetic {
                base_days,
                amount,
                unit,
            } => {
                let base = shift_days(now, base_days)?;
                match unit {
                    DateUnit::Days => shift_days(base, amount),
                    DateUnit::Weeks => shift_days(base, amount.checked_mul(7)?),
                    DateUnit::Months => shift_months(base, amount),
                    DateUnit::Years => shift_months(base, amount.checked_mul(12)?),
                }
            }
        }
    }
}

// ── Phrase parsers ──────────────────────────────────────────────────────────

/// Trim, lowercase and collapse whitespace.
fn normalize_expression(s: &str) -> String {
    s.trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Drop a leading article or demonstrative ("the", "el", "este").
fn strip_article<'a, 'b>(words: &'a [&'b str]) -> &'a [&'b str] {
    match words {
        ["the" | "el" | "este", rest @ ..] if !rest.is_empty() => rest,
        _ => words,
    }
}

/// Try a named weekday: "friday", "next monday", "el lunes que viene".
fn try_named_weekday(words: &[&str]) -> Option<DateQueryMatch> {
    let (word, qualifier, bare) = match strip_article(words) {
        [w] => (*w, Qualifier::Nearest, true),
        [w, "que", "viene"] => (*w, Qualifier::Next, false),
        [w, "pasado"] => (*w, Qualifier::Last, false),
        ["próximo" | "proximo" | "next", w] => (*w, Qualifier::Next, false),
        ["last", w] => (*w, Qualifier::Last, false),
        ["this", w] => (*w, Qualifier::Nearest, false),
        _ => return None,
    };
    let vocab = vocabulary();
    // A lone "sun" or "wed" is too ambiguous to read as a date
    let (weekday, language) = if bare {
        vocab.full_weekday(word)?
    } else {
        vocab.weekday(word)?
    };
    Some(DateQueryMatch {
        query: DateQuery::NamedWeekday { weekday, qualifier },
        language,
    })
}

/// Try an ordinal weekday of month: "last friday of february",
/// "el primer lunes de marzo".
fn try_ordinal_weekday(words: &[&str]) -> Option<DateQueryMatch> {
    let (ordinal_word, weekday_word, month_word) = match strip_article(words) {
        [o, w, "of" | "de", m] | [o, w, "of", "the", m] => (*o, *w, *m),
        _ => return None,
    };
    let vocab = vocabulary();
    let (ordinal, language) = vocab.ordinal(ordinal_word)?;
    let (weekday, _) = vocab.weekday(weekday_word)?;
    let (month, _) = vocab.month(month_word)?;
    Some(DateQueryMatch {
        query: DateQuery::OrdinalWeekday {
            ordinal,
            weekday,
            month,
        },
        language,
    })
}

/// Try a literal month/day: "october 23", "23rd oct", "el 5 de mayo".
fn try_month_day(words: &[&str]) -> Option<DateQueryMatch> {
    let vocab = vocabulary();
    let (month_word, day_word) = match strip_article(words) {
        [d, "de", m] => (*m, *d),
        [a, b] if vocab.month(a).is_some() => (*a, *b),
        [a, b] => (*b, *a),
        _ => return None,
    };
    let (month, language) = vocab.month(month_word)?;
    let day = parse_day(day_word)?;
    Some(DateQueryMatch {
        query: DateQuery::MonthDay { month, day },
        language,
    })
}

/// Try a relative term: "today", "mañana", "day before yesterday".
fn try_relative(s: &str) -> Option<DateQueryMatch> {
    let (days, language) = vocabulary().relative_days(s)?;
    Some(DateQueryMatch {
        query: DateQuery::Relative { days },
        language,
    })
}

/// Try relative arithmetic: "today + 3 days", "mañana menos 2 semanas".
fn try_relative_arithmetic(s: &str) -> Option<DateQueryMatch> {
    let (base, sign, rest) = split_signed(s)?;
    let vocab = vocabulary();
    let (base_days, base_language) = vocab.relative_days(base.trim())?;

    let rest = rest.trim();
    let digits_end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let amount: i64 = rest[..digits_end].parse().ok()?;
    let (unit, unit_language) = vocab.date_unit(rest[digits_end..].trim())?;

    let language = if base_language == Language::Es || unit_language == Language::Es {
        Language::Es
    } else {
        Language::En
    };
    Some(DateQueryMatch {
        query: DateQuery::RelativeArithmetic {
            base_days,
            amount: sign * amount,
            unit,
        },
        language,
    })
}

/// Split "base <op> rest" at the first sign word or `+`/`-` character.
fn split_signed(s: &str) -> Option<(&str, i64, &str)> {
    const SIGN_WORDS: [(&str, i64); 5] = [
        (" plus ", 1),
        (" más ", 1),
        (" mas ", 1),
        (" minus ", -1),
        (" menos ", -1),
    ];
    for (word, sign) in SIGN_WORDS {
        if let Some((base, rest)) = s.split_once(word) {
            return Some((base, sign, rest));
        }
    }
    let index = s.find(|c: char| c == '+' || c == '-')?;
    let sign = if s[index..].starts_with('+') { 1 } else { -1 };
    Some((&s[..index], sign, &s[index + 1..]))
}

// ── Calendar helpers ────────────────────────────────────────────────────────

/// Parse a day of month with an optional English ordinal suffix.
fn parse_day(s: &str) -> Option<u32> {
    let digits = s
        .strip_suffix("st")
        .or_else(|| s.strip_suffix("nd"))
        .or_else(|| s.strip_suffix("rd"))
        .or_else(|| s.strip_suffix("th"))
        .unwrap_or(s);
    let day: u32 = digits.parse().ok()?;
    (1..=31).contains(&day).then_some(day)
}

/// Find the Nth (or last) `weekday` in a month by walking its days.
fn find_weekday_in_month(
    year: i32,
    month: u32,
    weekday: Weekday,
    ordinal: Ordinal,
) -> Option<NaiveDate> {
    match ordinal {
        Ordinal::Nth(n) => {
            let first = NaiveDate::from_ymd_opt(year, month, 1)?;
            first
                .iter_days()
                .take_while(|d| d.month() == month)
                .filter(|d| d.weekday() == weekday)
                .nth(usize::from(n).checked_sub(1)?)
        }
        Ordinal::Last => {
            let last = last_day_of_month(year, month)?;
            std::iter::successors(Some(last), |d| d.pred_opt())
                .take_while(|d| d.month() == month)
                .find(|d| d.weekday() == weekday)
        }
    }
}

fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    let (ny, nm) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(ny, nm, 1)?.pred_opt()
}

fn shift_days(dt: NaiveDateTime, days: i64) -> Option<NaiveDateTime> {
    let magnitude = Days::new(days.unsigned_abs());
    if days >= 0 {
        dt.checked_add_days(magnitude)
    } else {
        dt.checked_sub_days(magnitude)
    }
}

/// Calendar-month arithmetic; the day of month is clamped to the target
/// month's length.
fn shift_months(dt: NaiveDateTime, months: i64) -> Option<NaiveDateTime> {
    let magnitude = Months::new(u32::try_from(months.unsigned_abs()).ok()?);
    if months >= 0 {
        dt.checked_add_months(magnitude)
    } else {
        dt.checked_sub_months(magnitude)
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
