//! Static word tables for date phrases, in English and Spanish.
//!
//! Built once on first use and shared read-only by every resolver. Each
//! entry carries the [`Language`] it belongs to so a match also tells the
//! caller which language to answer in. Only English months and weekdays
//! have abbreviations; Spanish ones like `ago` or `dic` collide with
//! ordinary words.

use std::collections::HashMap;
use std::sync::OnceLock;

use chrono::Weekday;
use serde::{Deserialize, Serialize};

/// The two supported languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Es,
}

impl Language {
    /// ISO 639-1 tag.
    pub fn tag(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Es => "es",
        }
    }

    pub fn weekday_name(self, weekday: Weekday) -> &'static str {
        let index = weekday.num_days_from_sunday() as usize;
        match self {
            Language::En => EN_WEEKDAYS[index],
            Language::Es => ES_WEEKDAYS[index],
        }
    }

    /// Month name for `month` in 1..=12.
    pub fn month_name(self, month: u32) -> &'static str {
        let index = (month.clamp(1, 12) - 1) as usize;
        match self {
            Language::En => EN_MONTHS[index],
            Language::Es => ES_MONTHS[index],
        }
    }
}

const EN_WEEKDAYS: [&str; 7] = [
    "sunday",
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
];

const ES_WEEKDAYS: [&str; 7] = [
    "domingo",
    "lunes",
    "martes",
    "miércoles",
    "jueves",
    "viernes",
    "sábado",
];

const EN_MONTHS: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

const ES_MONTHS: [&str; 12] = [
    "enero",
    "febrero",
    "marzo",
    "abril",
    "mayo",
    "junio",
    "julio",
    "agosto",
    "septiembre",
    "octubre",
    "noviembre",
    "diciembre",
];

/// Which occurrence of a weekday inside a month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ordinal {
    /// 1-based occurrence counted from the start of the month.
    Nth(u8),
    Last,
}

/// Calendar unit for relative date arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateUnit {
    Days,
    Weeks,
    Months,
    Years,
}

/// Every date word the resolvers understand.
#[derive(Debug)]
pub struct Vocabulary {
    weekdays: HashMap<&'static str, (Weekday, Language)>,
    weekday_abbreviations: HashMap<&'static str, Weekday>,
    months: HashMap<&'static str, (u32, Language)>,
    ordinals: HashMap<&'static str, (Ordinal, Language)>,
    relative_days: HashMap<&'static str, (i64, Language)>,
    date_units: HashMap<&'static str, (DateUnit, Language)>,
}

/// The shared vocabulary, built on first use.
pub fn vocabulary() -> &'static Vocabulary {
    static VOCABULARY: OnceLock<Vocabulary> = OnceLock::new();
    VOCABULARY.get_or_init(Vocabulary::new)
}

impl Vocabulary {
    fn new() -> Self {
        use Language::{En, Es};

        let weekdays = [
            ("monday", Weekday::Mon, En),
            ("tuesday", Weekday::Tue, En),
            ("wednesday", Weekday::Wed, En),
            ("thursday", Weekday::Thu, En),
            ("friday", Weekday::Fri, En),
            ("saturday", Weekday::Sat, En),
            ("sunday", Weekday::Sun, En),
            ("lunes", Weekday::Mon, Es),
            ("martes", Weekday::Tue, Es),
            ("miércoles", Weekday::Wed, Es),
            ("miercoles", Weekday::Wed, Es),
            ("jueves", Weekday::Thu, Es),
            ("viernes", Weekday::Fri, Es),
            ("sábado", Weekday::Sat, Es),
            ("sabado", Weekday::Sat, Es),
            ("domingo", Weekday::Sun, Es),
        ]
        .into_iter()
        .map(|(word, weekday, lang)| (word, (weekday, lang)))
        .collect();

        let weekday_abbreviations = [
            ("mon", Weekday::Mon),
            ("tue", Weekday::Tue),
            ("tues", Weekday::Tue),
            ("wed", Weekday::Wed),
            ("thu", Weekday::Thu),
            ("thurs", Weekday::Thu),
            ("fri", Weekday::Fri),
            ("sat", Weekday::Sat),
            ("sun", Weekday::Sun),
        ]
        .into_iter()
        .collect();

        let mut months: HashMap<&'static str, (u32, Language)> = HashMap::new();
        for (index, (&en, &es)) in EN_MONTHS.iter().zip(ES_MONTHS.iter()).enumerate() {
            let month = index as u32 + 1;
            months.insert(en, (month, En));
            months.insert(es, (month, Es));
            // "jan", "feb", ...
            months.entry(&en[..3]).or_insert((month, En));
        }
        months.insert("sept", (9, En));
        months.insert("setiembre", (9, Es));

        let ordinals = [
            ("first", Ordinal::Nth(1), En),
            ("1st", Ordinal::Nth(1), En),
            ("second", Ordinal::Nth(2), En),
            ("2nd", Ordinal::Nth(2), En),
            ("third", Ordinal::Nth(3), En),
            ("3rd", Ordinal::Nth(3), En),
            ("fourth", Ordinal::Nth(4), En),
            ("4th", Ordinal::Nth(4), En),
            ("fifth", Ordinal::Nth(5), En),
            ("5th", Ordinal::Nth(5), En),
            ("last", Ordinal::Last, En),
            ("primer", Ordinal::Nth(1), Es),
            ("primero", Ordinal::Nth(1), Es),
            ("segundo", Ordinal::Nth(2), Es),
            ("tercer", Ordinal::Nth(3), Es),
            ("tercero", Ordinal::Nth(3), Es),
            ("cuarto", Ordinal::Nth(4), Es),
            ("quinto", Ordinal::Nth(5), Es),
            ("último", Ordinal::Last, Es),
            ("ultimo", Ordinal::Last, Es),
        ]
        .into_iter()
        .map(|(word, ordinal, lang)| (word, (ordinal, lang)))
        .collect();

        let relative_days = [
            ("today", 0, En),
            ("tomorrow", 1, En),
            ("yesterday", -1, En),
            ("day after tomorrow", 2, En),
            ("the day after tomorrow", 2, En),
            ("day before yesterday", -2, En),
            ("the day before yesterday", -2, En),
            ("hoy", 0, Es),
            ("mañana", 1, Es),
            ("manana", 1, Es),
            ("ayer", -1, Es),
            ("pasado mañana", 2, Es),
            ("pasado manana", 2, Es),
            ("anteayer", -2, Es),
            ("antier", -2, Es),
            ("antes de ayer", -2, Es),
        ]
        .into_iter()
        .map(|(phrase, days, lang)| (phrase, (days, lang)))
        .collect();

        let date_units = [
            ("day", DateUnit::Days, En),
            ("days", DateUnit::Days, En),
            ("week", DateUnit::Weeks, En),
            ("weeks", DateUnit::Weeks, En),
            ("month", DateUnit::Months, En),
            ("months", DateUnit::Months, En),
            ("year", DateUnit::Years, En),
            ("years", DateUnit::Years, En),
            ("día", DateUnit::Days, Es),
            ("días", DateUnit::Days, Es),
            ("dia", DateUnit::Days, Es),
            ("dias", DateUnit::Days, Es),
            ("semana", DateUnit::Weeks, Es),
            ("semanas", DateUnit::Weeks, Es),
            ("mes", DateUnit::Months, Es),
            ("meses", DateUnit::Months, Es),
            ("año", DateUnit::Years, Es),
            ("años", DateUnit::Years, Es),
            ("ano", DateUnit::Years, Es),
            ("anos", DateUnit::Years, Es),
        ]
        .into_iter()
        .map(|(word, unit, lang)| (word, (unit, lang)))
        .collect();

        Self {
            weekdays,
            weekday_abbreviations,
            months,
            ordinals,
            relative_days,
            date_units,
        }
    }

    /// A weekday by full name or English abbreviation.
    pub fn weekday(&self, word: &str) -> Option<(Weekday, Language)> {
        self.full_weekday(word).or_else(|| {
            self.weekday_abbreviations
                .get(word)
                .map(|&weekday| (weekday, Language::En))
        })
    }

    /// A weekday by full name only, for phrases with nothing else to
    /// confirm they are dates.
    pub fn full_weekday(&self, word: &str) -> Option<(Weekday, Language)> {
        self.weekdays.get(word).copied()
    }

    pub fn month(&self, word: &str) -> Option<(u32, Language)> {
        self.months.get(word).copied()
    }

    pub fn ordinal(&self, word: &str) -> Option<(Ordinal, Language)> {
        self.ordinals.get(word).copied()
    }

    /// Day offset of a relative term such as "tomorrow" or "pasado mañana".
    pub fn relative_days(&self, phrase: &str) -> Option<(i64, Language)> {
        self.relative_days.get(phrase).copied()
    }

    pub fn date_unit(&self, word: &str) -> Option<(DateUnit, Language)> {
        self.date_units.get(word).copied()
    }
}
