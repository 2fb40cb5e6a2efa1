//! Unit conversion between mass, length, volume and astronomical units.
//!
//! A query has the shape `<number> <unit> <connector> <unit>`, e.g.
//! "5 kg to lb" or "3 millas en km". Both unit names are resolved through
//! an alias table (English and Spanish, singular and plural), then the
//! `(from, to)` pair is looked up in a fixed rule table. Each rule knows
//! how to convert, how to label and round the result, and optionally when
//! to offer a second, friendlier representation.

use std::collections::HashMap;
use std::sync::OnceLock;

use crate::conversion::{ensure_finite, format_quantity, split_query, ConversionOutcome};
use crate::error::{CalcError, Result};

// ── Units ───────────────────────────────────────────────────────────────────

/// Every unit the converter recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Unit {
    Milligram,
    Gram,
    Kilogram,
    Ounce,
    Pound,
    /// US short ton (2000 lb).
    Ton,
    Millimeter,
    Centimeter,
    Meter,
    Kilometer,
    Inch,
    Foot,
    Yard,
    Mile,
    Milliliter,
    Liter,
    FluidOunce,
    Cup,
    Gallon,
    AstronomicalUnit,
    LightYear,
    Parsec,
}

impl Unit {
    /// Resolve a unit name or abbreviation, case-insensitively.
    pub fn from_alias(name: &str) -> Option<Unit> {
        aliases().get(name.trim().to_lowercase().as_str()).copied()
    }
}

fn aliases() -> &'static HashMap<&'static str, Unit> {
    static ALIASES: OnceLock<HashMap<&'static str, Unit>> = OnceLock::new();
    ALIASES.get_or_init(build_aliases)
}

fn build_aliases() -> HashMap<&'static str, Unit> {
    use Unit::*;

    let table: [(Unit, &[&'static str]); 22] = [
        (Milligram, &["mg", "milligram", "milligrams", "miligramo", "miligramos"]),
        (Gram, &["g", "gr", "gram", "grams", "gramo", "gramos"]),
        (
            Kilogram,
            &[
                "kg", "kgs", "kilo", "kilos", "kilogram", "kilograms", "kilogramo", "kilogramos",
            ],
        ),
        (Ounce, &["oz", "ounce", "ounces", "onza", "onzas"]),
        (Pound, &["lb", "lbs", "pound", "pounds", "libra", "libras"]),
        (Ton, &["ton", "tons", "short ton", "short tons"]),
        (
            Millimeter,
            &[
                "mm", "millimeter", "millimeters", "millimetre", "millimetres", "milímetro",
                "milímetros", "milimetro", "milimetros",
            ],
        ),
        (
            Centimeter,
            &[
                "cm", "centimeter", "centimeters", "centimetre", "centimetres", "centímetro",
                "centímetros", "centimetro", "centimetros",
            ],
        ),
        (Meter, &["m", "meter", "meters", "metre", "metres", "metro", "metros"]),
        (
            Kilometer,
            &[
                "km", "kms", "kilometer", "kilometers", "kilometre", "kilometres", "kilómetro",
                "kilómetros", "kilometro", "kilometros",
            ],
        ),
        (Inch, &["in", "inch", "inches", "pulgada", "pulgadas"]),
        (Foot, &["ft", "foot", "feet", "pie", "pies"]),
        (Yard, &["yd", "yds", "yard", "yards", "yarda", "yardas"]),
        (Mile, &["mi", "mile", "miles", "milla", "millas"]),
        (
            Milliliter,
            &[
                "ml", "milliliter", "milliliters", "millilitre", "millilitres", "mililitro",
                "mililitros",
            ],
        ),
        (Liter, &["l", "liter", "liters", "litre", "litres", "litro", "litros"]),
        (
            FluidOunce,
            &[
                "fl oz", "fl. oz", "fluid ounce", "fluid ounces", "onza líquida", "onzas líquidas",
                "onza liquida", "onzas liquidas",
            ],
        ),
        (Cup, &["cup", "cups", "taza", "tazas"]),
        (Gallon, &["gal", "gallon", "gallons", "galón", "galon", "galones"]),
        (
            AstronomicalUnit,
            &[
                "au", "ua", "astronomical unit", "astronomical units", "unidad astronómica",
                "unidades astronómicas", "unidad astronomica", "unidades astronomicas",
            ],
        ),
        (
            LightYear,
            &[
                "ly", "light year", "light years", "light-year", "light-years", "lightyear",
                "lightyears", "año luz", "años luz", "ano luz", "anos luz",
            ],
        ),
        (Parsec, &["pc", "parsec", "parsecs", "pársec", "pársecs"]),
    ];

    table
        .into_iter()
        .flat_map(|(unit, names)| names.iter().map(move |&name| (name, unit)))
        .collect()
}

// ── Rules ───────────────────────────────────────────────────────────────────

/// When a rule's alternate representation is offered.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Threshold {
    /// Primary value at or above the bound.
    Above(f64),
    /// Non-zero primary value whose magnitude is below the bound.
    Below(f64),
}

impl Threshold {
    fn applies(self, value: f64) -> bool {
        match self {
            Threshold::Above(bound) => value >= bound,
            Threshold::Below(bound) => value != 0.0 && value.abs() < bound,
        }
    }
}

/// A second representation derived from the primary value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Alternate {
    pub when: Threshold,
    /// Multiplier applied to the primary value.
    pub factor: f64,
    pub label: &'static str,
    pub decimals: usize,
}

/// How to convert one specific `(from, to)` pair.
#[derive(Debug, Clone, Copy)]
pub struct ConversionRule {
    pub from: Unit,
    pub to: Unit,
    pub convert: fn(f64) -> f64,
    pub label: &'static str,
    pub decimals: usize,
    pub alternate: Option<Alternate>,
}

impl ConversionRule {
    /// Apply the rule to `amount`.
    ///
    /// The alternate threshold is tested against the value as displayed, so
    /// "1.00 kg" never gets a "1000 g" alternate.
    pub fn apply(&self, amount: f64) -> ConversionOutcome {
        let value = (self.convert)(amount);
        let shown = round_to(value, self.decimals);
        let alternate = self
            .alternate
            .filter(|alt| alt.when.applies(shown))
            .map(|alt| format_quantity(value * alt.factor, alt.decimals, alt.label));
        ConversionOutcome {
            value,
            unit: self.label,
            text: format_quantity(value, self.decimals, self.label),
            alternate,
        }
    }

    fn with_alternate(
        mut self,
        when: Threshold,
        factor: f64,
        label: &'static str,
        decimals: usize,
    ) -> Self {
        self.alternate = Some(Alternate {
            when,
            factor,
            label,
            decimals,
        });
        self
    }
}

fn round_to(value: f64, decimals: usize) -> f64 {
    let scale = 10f64.powi(decimals as i32);
    (value * scale).round() / scale
}

const KM_PER_AU: f64 = 149_597_870.7;
const KM_PER_LY: f64 = 9_460_730_472_580.8;
const LY_PER_PC: f64 = 3.261_563_777;

fn rules() -> &'static HashMap<(Unit, Unit), ConversionRule> {
    static RULES: OnceLock<HashMap<(Unit, Unit), ConversionRule>> = OnceLock::new();
    RULES.get_or_init(|| {
        build_rules()
            .into_iter()
            .map(|rule| ((rule.from, rule.to), rule))
            .collect()
    })
}

fn rule(
    from: Unit,
    to: Unit,
    convert: fn(f64) -> f64,
    label: &'static str,
    decimals: usize,
) -> ConversionRule {
    ConversionRule {
        from,
        to,
        convert,
        label,
        decimals,
        alternate: None,
    }
}

fn build_rules() -> Vec<ConversionRule> {
    use Threshold::{Above, Below};
    use Unit::*;

    vec![
        // ── mass ──
        rule(Kilogram, Pound, |v| v * 2.20462, "lbs", 2)
            .with_alternate(Above(2000.0), 1.0 / 2000.0, "tons", 2),
        rule(Pound, Kilogram, |v| v * 0.453592, "kg", 2)
            .with_alternate(Below(1.0), 1000.0, "g", 0),
        rule(Kilogram, Gram, |v| v * 1000.0, "g", 0),
        rule(Gram, Kilogram, |v| v / 1000.0, "kg", 3),
        rule(Milligram, Gram, |v| v / 1000.0, "g", 3),
        rule(Gram, Milligram, |v| v * 1000.0, "mg", 0),
        rule(Gram, Ounce, |v| v * 0.035274, "oz", 2)
            .with_alternate(Above(16.0), 1.0 / 16.0, "lbs", 2),
        rule(Ounce, Gram, |v| v * 28.3495, "g", 2)
            .with_alternate(Above(1000.0), 1.0 / 1000.0, "kg", 2),
        rule(Pound, Ounce, |v| v * 16.0, "oz", 2),
        rule(Ounce, Pound, |v| v / 16.0, "lbs", 2),
        rule(Ton, Kilogram, |v| v * 907.185, "kg", 2)
            .with_alternate(Above(1000.0), 1.0 / 1000.0, "metric tons", 2),
        rule(Kilogram, Ton, |v| v / 907.185, "tons", 3),
        rule(Ton, Pound, |v| v * 2000.0, "lbs", 0),
        rule(Pound, Ton, |v| v / 2000.0, "tons", 3),
        // ── length ──
        rule(Kilometer, Mile, |v| v * 0.621371, "mi", 2)
            .with_alternate(Below(1.0), 5280.0, "ft", 0),
        rule(Mile, Kilometer, |v| v * 1.609344, "km", 2)
            .with_alternate(Below(1.0), 1000.0, "m", 0),
        rule(Meter, Foot, |v| v * 3.28084, "ft", 2)
            .with_alternate(Above(5280.0), 1.0 / 5280.0, "mi", 2),
        rule(Foot, Meter, |v| v * 0.3048, "m", 2)
            .with_alternate(Below(1.0), 100.0, "cm", 1),
        rule(Centimeter, Inch, |v| v * 0.393701, "in", 2)
            .with_alternate(Above(12.0), 1.0 / 12.0, "ft", 2),
        rule(Inch, Centimeter, |v| v * 2.54, "cm", 2)
            .with_alternate(Above(100.0), 1.0 / 100.0, "m", 2),
        rule(Meter, Kilometer, |v| v / 1000.0, "km", 3),
        rule(Kilometer, Meter, |v| v * 1000.0, "m", 0),
        rule(Centimeter, Meter, |v| v / 100.0, "m", 2),
        rule(Meter, Centimeter, |v| v * 100.0, "cm", 0),
        rule(Millimeter, Centimeter, |v| v / 10.0, "cm", 1),
        rule(Centimeter, Millimeter, |v| v * 10.0, "mm", 0),
        rule(Millimeter, Inch, |v| v * 0.0393701, "in", 3),
        rule(Inch, Millimeter, |v| v * 25.4, "mm", 1),
        rule(Yard, Meter, |v| v * 0.9144, "m", 2),
        rule(Meter, Yard, |v| v * 1.09361, "yd", 2),
        rule(Foot, Inch, |v| v * 12.0, "in", 0),
        rule(Inch, Foot, |v| v / 12.0, "ft", 2),
        rule(Mile, Foot, |v| v * 5280.0, "ft", 0),
        rule(Foot, Mile, |v| v / 5280.0, "mi", 3),
        // ── volume ──
        rule(Liter, Gallon, |v| v * 0.264172, "gal", 2)
            .with_alternate(Below(1.0), 128.0, "fl oz", 1),
        rule(Gallon, Liter, |v| v * 3.78541, "L", 2),
        rule(Milliliter, FluidOunce, |v| v * 0.033814, "fl oz", 2)
            .with_alternate(Above(8.0), 1.0 / 8.0, "cups", 2),
        rule(FluidOunce, Milliliter, |v| v * 29.5735, "ml", 1),
        rule(Liter, Milliliter, |v| v * 1000.0, "ml", 0),
        rule(Milliliter, Liter, |v| v / 1000.0, "L", 3),
        rule(Cup, Milliliter, |v| v * 236.588, "ml", 1),
        rule(Milliliter, Cup, |v| v / 236.588, "cups", 2),
        rule(Liter, Cup, |v| v * 4.22675, "cups", 2),
        rule(Cup, Liter, |v| v * 0.236588, "L", 3),
        // ── astronomical ──
        rule(LightYear, Kilometer, |v| v * KM_PER_LY, "km", 0)
            .with_alternate(Above(1e9), 1.0 / KM_PER_AU, "AU", 0),
        rule(Kilometer, LightYear, |v| v / KM_PER_LY, "ly", 3)
            .with_alternate(Below(0.001), KM_PER_LY / KM_PER_AU, "AU", 3),
        rule(AstronomicalUnit, Kilometer, |v| v * KM_PER_AU, "km", 0)
            .with_alternate(Above(1e6), 1e-6, "million km", 2),
        rule(Kilometer, AstronomicalUnit, |v| v / KM_PER_AU, "AU", 3),
        rule(LightYear, AstronomicalUnit, |v| v * (KM_PER_LY / KM_PER_AU), "AU", 0),
        rule(Parsec, LightYear, |v| v * LY_PER_PC, "ly", 3),
        rule(LightYear, Parsec, |v| v / LY_PER_PC, "pc", 3),
        rule(Parsec, Kilometer, |v| v * LY_PER_PC * KM_PER_LY, "km", 0),
    ]
}

/// The rule for a `(from, to)` pair, if one exists.
pub fn find_rule(from: Unit, to: Unit) -> Option<&'static ConversionRule> {
    rules().get(&(from, to))
}

// ── Public API ──────────────────────────────────────────────────────────────

/// Convert a unit query, or `None` if it is not one.
///
/// # Examples
///
/// ```
/// use calc_engine::units::convert;
///
/// let outcome = convert("5 kg a pound").unwrap();
/// assert_eq!(outcome.text, "11.02 lbs");
/// ```
pub fn convert(raw: &str) -> Option<ConversionOutcome> {
    try_convert(raw).ok()
}

/// Like [`convert`], but says why a query was rejected.
///
/// Returns [`CalcError::UnrecognizedUnitPair`] when both units are known
/// but no rule links them (e.g., kilograms to miles), and
/// [`CalcError::NoMatch`] when the query does not have the conversion shape,
/// and [`CalcError::NonFiniteResult`] when the amount or result overflows.
pub fn try_convert(raw: &str) -> Result<ConversionOutcome> {
    let query = split_query(raw, Unit::from_alias)
        .ok_or_else(|| CalcError::NoMatch(format!("not a unit conversion: '{}'", raw.trim())))?;

    let rule = find_rule(query.from, query.to).ok_or_else(|| CalcError::UnrecognizedUnitPair {
        from: query.from_text.clone(),
        to: query.to_text.clone(),
    })?;

    let outcome = rule.apply(ensure_finite(query.amount)?);
    ensure_finite(outcome.value)?;
    Ok(outcome)
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn text(raw: &str) -> String {
        convert(raw).unwrap().text
    }

    #[test]
    fn test_kg_to_pounds_spanish_connector() {
        let outcome = convert("5 kg a pound").unwrap();
        assert_eq!(outcome.text, "11.02 lbs");
        assert_eq!(outcome.unit, "lbs");
        assert!(outcome.alternate.is_none());
    }

    #[test]
    fn test_aliases_are_case_insensitive_and_bilingual() {
        assert_eq!(Unit::from_alias("KG"), Some(Unit::Kilogram));
        assert_eq!(Unit::from_alias("libras"), Some(Unit::Pound));
        assert_eq!(Unit::from_alias("años luz"), Some(Unit::LightYear));
        assert_eq!(Unit::from_alias("fl oz"), Some(Unit::FluidOunce));
        assert_eq!(Unit::from_alias("stone"), None);
    }

    #[test]
    fn test_length_conversions() {
        assert_eq!(text("10 km to miles"), "6.21 mi");
        assert_eq!(text("3 millas en km"), "4.83 km");
        assert_eq!(text("100 cm to m"), "1.00 m");
        assert_eq!(text("6 ft in m"), "1.83 m");
    }

    #[test]
    fn test_inches_source_unit_not_taken_as_connector() {
        assert_eq!(text("5 in to cm"), "12.70 cm");
        assert_eq!(text("12 in in ft"), "1.00 ft");
    }

    #[test]
    fn test_volume_conversions() {
        assert_eq!(text("2 litros a galones"), "0.53 gal");
        assert_eq!(text("1 gal to l"), "3.79 L");
    }

    #[test]
    fn test_glued_amount() {
        assert_eq!(text("5kg to lb"), "11.02 lbs");
    }

    #[test]
    fn test_alternate_above_threshold() {
        let outcome = convert("1000 kg to lb").unwrap();
        assert_eq!(outcome.text, "2204.62 lbs");
        assert_eq!(outcome.alternate.as_deref(), Some("1.10 tons"));
    }

    #[test]
    fn test_alternate_below_threshold() {
        let outcome = convert("0.5 lb to kg").unwrap();
        assert_eq!(outcome.text, "0.23 kg");
        assert_eq!(outcome.alternate.as_deref(), Some("227 g"));
    }

    #[test]
    fn test_alternate_uses_displayed_value() {
        let outcome = convert("2.20462 lb to kg").unwrap();
        assert_eq!(outcome.text, "1.00 kg");
        assert!(outcome.alternate.is_none());
        assert_eq!(
            convert("0.99 lb to kg").unwrap().alternate.as_deref(),
            Some("449 g")
        );
    }

    #[test]
    fn test_astronomical() {
        let outcome = convert("1 light year to km").unwrap();
        assert_eq!(outcome.text, "9460730472581 km");
        assert_eq!(outcome.alternate.as_deref(), Some("63241 AU"));
        assert_eq!(text("1 pc to ly"), "3.262 ly");
    }

    #[test]
    fn test_unknown_pair_is_reported() {
        assert_eq!(
            try_convert("5 kg to miles"),
            Err(CalcError::UnrecognizedUnitPair {
                from: "kg".to_string(),
                to: "miles".to_string(),
            })
        );
    }

    #[test]
    fn test_non_queries_are_no_match() {
        assert!(matches!(try_convert("hello world"), Err(CalcError::NoMatch(_))));
        assert!(matches!(try_convert("5 + 3"), Err(CalcError::NoMatch(_))));
        assert!(matches!(try_convert("5 stone to kg"), Err(CalcError::NoMatch(_))));
        assert!(convert("kg to lb").is_none());
    }

    #[test]
    fn test_every_rule_is_finite_for_unit_amount() {
        for rule in build_rules() {
            let outcome = rule.apply(1.0);
            assert!(outcome.value.is_finite(), "{:?} -> {:?}", rule.from, rule.to);
            assert!(outcome.value > 0.0);
        }
    }

    #[test]
    fn test_overflowing_amount_is_rejected() {
        let raw = format!("1{} kg to lb", "0".repeat(400));
        assert!(convert(&raw).is_none());
        assert_eq!(
            try_convert(&raw),
            Err(CalcError::NonFiniteResult(f64::INFINITY))
        );
        // A finite amount whose conversion overflows
        let raw = format!("17{} kg to lb", "0".repeat(307));
        assert_eq!(
            try_convert(&raw),
            Err(CalcError::NonFiniteResult(f64::INFINITY))
        );
    }

    #[test]
    fn test_kg_to_pound_and_back() {
        let pounds = find_rule(Unit::Kilogram, Unit::Pound).unwrap().apply(1.0).value;
        let kilograms = find_rule(Unit::Pound, Unit::Kilogram).unwrap().apply(pounds).value;
        assert!((kilograms - 1.0).abs() < 1e-5, "got {kilograms}");
    }

    #[test]
    fn test_every_rule_with_an_inverse_round_trips() {
        let mut checked = 0;
        for rule in build_rules() {
            let Some(inverse) = find_rule(rule.to, rule.from) else {
                continue;
            };
            for amount in [1.0, 42.5, 1e-3] {
                let back = (inverse.convert)((rule.convert)(amount));
                let error = ((back - amount) / amount).abs();
                assert!(
                    error < 1e-5,
                    "{:?} -> {:?} -> {:?}: {amount} came back as {back}",
                    rule.from,
                    rule.to,
                    rule.from
                );
            }
            checked += 1;
        }
        assert!(checked >= 40, "only {checked} rules have an inverse");
    }
}
