//! Property-based tests for the normalizer, the arithmetic engine and the
//! date resolver.

use calc_engine::arithmetic::evaluate;
use calc_engine::date::resolve;
use calc_engine::normalize::normalize;
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};
use proptest::prelude::*;

// Strategy for small non-negative integer operands, exact in f64
fn operand() -> impl Strategy<Value = i64> {
    0i64..1000i64
}

// Strategy for an arbitrary minute between 2000 and 2054
fn any_now() -> impl Strategy<Value = NaiveDateTime> {
    (0u64..20_000u64, 0u32..86_400u32).prop_map(|(days, secs)| {
        let date = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap() + Duration::days(days as i64);
        let time = NaiveTime::from_num_seconds_from_midnight_opt(secs - secs % 60, 0).unwrap();
        date.and_time(time)
    })
}

fn any_weekday_name() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec![
        "monday",
        "tuesday",
        "wednesday",
        "thursday",
        "friday",
        "saturday",
        "sunday",
    ])
}

// Strategy for canonical `a op b op c ...` strings
fn canonical_expression() -> impl Strategy<Value = String> {
    (
        operand(),
        prop::collection::vec((prop::sample::select(vec!["+", "-", "*", "/"]), operand()), 0..6),
    )
        .prop_map(|(first, rest)| {
            rest.into_iter()
                .fold(first.to_string(), |acc, (op, n)| format!("{acc} {op} {n}"))
        })
}

proptest! {
    // Normalizer

    #[test]
    fn normalize_leaves_canonical_expressions_alone(expr in canonical_expression()) {
        prop_assert_eq!(normalize(&expr), expr);
    }

    #[test]
    fn normalize_is_idempotent(expr in canonical_expression()) {
        let once = normalize(&expr);
        prop_assert_eq!(normalize(&once), once);
    }

    // Arithmetic

    #[test]
    fn multiplication_binds_tighter_than_addition(a in operand(), b in operand(), c in operand()) {
        prop_assert_eq!(evaluate(&format!("{a} + {b} * {c}")), Some((a + b * c) as f64));
        prop_assert_eq!(evaluate(&format!("{a} * {b} + {c}")), Some((a * b + c) as f64));
    }

    #[test]
    fn subtraction_is_left_associative(a in operand(), b in operand(), c in operand()) {
        prop_assert_eq!(evaluate(&format!("{a} - {b} - {c}")), Some((a - b - c) as f64));
    }

    #[test]
    fn parentheses_override_precedence(a in operand(), b in operand(), c in operand()) {
        prop_assert_eq!(evaluate(&format!("({a} + {b}) * {c}")), Some(((a + b) * c) as f64));
    }

    #[test]
    fn division_by_zero_never_yields_a_value(a in operand()) {
        prop_assert_eq!(evaluate(&format!("{a} / 0")), None);
    }

    // Dates

    #[test]
    fn tomorrow_is_one_day_after_now(now in any_now()) {
        let resolved = resolve("tomorrow", now).unwrap();
        prop_assert_eq!(resolved.datetime, now + Duration::days(1));
    }

    #[test]
    fn next_weekday_is_within_the_coming_week(now in any_now(), name in any_weekday_name()) {
        let first = resolve(&format!("next {name}"), now).unwrap();
        let second = resolve(&format!("next {name}"), now).unwrap();
        prop_assert_eq!(first, second);

        let ahead = (first.datetime.date() - now.date()).num_days();
        prop_assert!((1..=7).contains(&ahead), "{} days ahead", ahead);
        prop_assert_eq!(
            first.datetime.weekday().to_string().to_lowercase(),
            name[..3].to_string()
        );
        prop_assert_eq!(first.datetime.time(), now.time());
    }
}
