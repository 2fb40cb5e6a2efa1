//! End-to-end scenarios through the public dispatcher.

use calc_engine::{interpret, Interpreter, InterpreterOptions, Kind};
use chrono::{NaiveDate, NaiveDateTime};

/// Wednesday, 18 February 2026, 14:30.
fn anchor() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 2, 18)
        .unwrap()
        .and_hms_opt(14, 30, 0)
        .unwrap()
}

fn title(query: &str) -> String {
    interpret(query, anchor())
        .unwrap_or_else(|| panic!("no interpretation for {query:?}"))
        .title
}

fn kind(query: &str) -> Kind {
    interpret(query, anchor())
        .unwrap_or_else(|| panic!("no interpretation for {query:?}"))
        .kind
}

// ── Calculator ──────────────────────────────────────────────────────────────

#[test]
fn test_precedence() {
    let result = interpret("3 + 4 * 2", anchor()).unwrap();
    assert_eq!(result.title, "11");
    assert_eq!(result.subtitle, "Calculation");
    assert_eq!(result.kind, Kind::Calculator);
}

#[test]
fn test_spoken_arithmetic() {
    assert_eq!(title("what is 3 times 4"), "12");
    assert_eq!(title("cuánto es 10 dividido entre 4"), "2.5");
    assert_eq!(title("double of 21"), "42");
    assert_eq!(title("15% of 200"), "30");
}

#[test]
fn test_functions_and_powers() {
    assert_eq!(title("square root of 81"), "9");
    assert_eq!(title("2^10"), "1024");
    assert_eq!(title("2 ** 3 + 1"), "9");
    assert_eq!(title("pow(2, 3) * sqrt(4)"), "16");
    assert_eq!(title("1.5e3 + 1"), "1501");
    assert_eq!(title("square root of 2^4"), "4");
    assert_eq!(title("cube root of square root of 64"), "2");
}

#[test]
fn test_unary_minus() {
    assert_eq!(title("-2 * 3"), "-6");
    assert_eq!(title("4 - -2"), "6");
    assert_eq!(title("-(3 + 2)"), "-5");
}

#[test]
fn test_division_by_zero_is_no_interpretation() {
    assert!(interpret("1 / 0", anchor()).is_none());
    assert!(interpret("0 / 0", anchor()).is_none());
}

// ── Conversions ─────────────────────────────────────────────────────────────

#[test]
fn test_temperature() {
    let result = interpret("25 c to f", anchor()).unwrap();
    assert_eq!(result.title, "77.00 °F");
    assert_eq!(result.subtitle, "Temperature conversion");
}

#[test]
fn test_units() {
    let result = interpret("5 kg a pound", anchor()).unwrap();
    assert_eq!(result.title, "11.02 lbs");
    assert_eq!(result.kind, Kind::UnitConversion);

    assert_eq!(title("3 km to miles"), "1.86 mi");
    assert_eq!(title("10 pulgadas en cm"), "25.40 cm");
}

#[test]
fn test_unknown_unit_pair_falls_through_to_nothing() {
    assert!(interpret("5 kg to miles", anchor()).is_none());
}

// ── Dates ───────────────────────────────────────────────────────────────────

#[test]
fn test_next_friday() {
    let result = interpret("next friday", anchor()).unwrap();
    assert_eq!(result.title, "Friday, 20 February 2026, 14:30");
    assert_eq!(result.subtitle, "Detected date");
    assert_eq!(result.kind, Kind::Date);
}

#[test]
fn test_spanish_dates() {
    let result = interpret("el último viernes de febrero", anchor()).unwrap();
    assert_eq!(result.title, "Viernes, 27 de febrero de 2026, 14:30");
    assert_eq!(result.subtitle, "Fecha detectada");

    assert_eq!(title("mañana"), "Jueves, 19 de febrero de 2026, 14:30");
}

#[test]
fn test_literal_dates() {
    assert_eq!(title("december 25"), "Friday, 25 December 2026, 12:00");
    assert_eq!(title("january 5"), "Tuesday, 5 January 2027, 12:00");
}

#[test]
fn test_relative_arithmetic() {
    assert_eq!(title("today + 1 month"), "Wednesday, 18 March 2026, 14:30");
    assert_eq!(kind("tomorrow - 2 weeks"), Kind::Date);
}

#[test]
fn test_invalid_date_is_no_interpretation() {
    assert!(interpret("february 30", anchor()).is_none());
    assert!(interpret("fifth monday of february", anchor()).is_none());
}

// ── Dispatch ────────────────────────────────────────────────────────────────

#[test]
fn test_no_match() {
    assert!(interpret("hello world", anchor()).is_none());
    assert!(interpret("firefox", anchor()).is_none());
    assert!(interpret("42", anchor()).is_none());
}

#[test]
fn test_dates_only() {
    let interpreter = Interpreter::new(InterpreterOptions {
        units: false,
        temperature: false,
        arithmetic: false,
        ..InterpreterOptions::default()
    });
    assert!(interpreter.interpret("3 + 4", anchor()).is_none());
    assert!(interpreter.interpret("5 kg to lb", anchor()).is_none());
    assert!(interpreter.interpret("tomorrow", anchor()).is_some());
}
