//! Availability normalization.
//!
//! Raw availability arrives as one free-text field per date column. Each
//! field holds zero or more comma-separated time-range tokens; every token
//! becomes one [`Slot`], column order first, then token order.

use log::trace;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::data::{Instrument, Slot};
use crate::error::Result;

/// One date column of a person's availability.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawDay {
    pub date: String,
    #[serde(default)]
    pub times: Option<String>,
}

impl RawDay {
    pub fn new(date: impl Into<String>, times: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            times: Some(times.into()),
        }
    }
}

fn tokens(field: &str) -> impl Iterator<Item = &str> {
    field
        .split([',', '，', '\n'])
        .map(str::trim)
        .filter(|t| !t.is_empty() && !t.eq_ignore_ascii_case("nan"))
}

/// Turns raw per-date fields into an ordered slot list. Duplicates are kept;
/// empty or missing fields contribute nothing.
pub fn normalize_availability(days: &[RawDay]) -> Vec<Slot> {
    let mut slots = Vec::new();
    for day in days {
        let Some(field) = day.times.as_deref() else {
            continue;
        };
        for token in tokens(field) {
            slots.push(Slot::new(&day.date, token));
        }
    }
    trace!("normalized {} slots from {} date columns", slots.len(), days.len());
    slots
}

/// Parses a free-text instrument field such as `"ギター, ドラム"`.
pub fn parse_instruments(field: &str) -> Result<Vec<Instrument>> {
    field
        .split([',', '，', '\n'])
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::parse)
        .collect()
}

static DATE_LABEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:\d{4}[年/]?)?\s*(\d{1,2})[月/](\d{1,2})").unwrap());
static CLOCK_RANGE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{1,2}:\d{2}-\d{1,2}:\d{2}$").unwrap());
static HOUR_RANGE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d{1,2})[-~](\d{1,2})$").unwrap());
static KANJI_HOUR_RANGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{1,2})時[-~](\d{1,2})時$").unwrap());

/// Rewrites date labels like `2024年3月10日` or `2024/03/10` as `3/10`.
pub fn canonical_date(label: &str) -> String {
    let label = label.trim();
    match DATE_LABEL.captures(label) {
        Some(caps) => {
            let month: u32 = caps[1].parse().unwrap_or_default();
            let day: u32 = caps[2].parse().unwrap_or_default();
            format!("{month}/{day}")
        }
        None => label.to_string(),
    }
}

fn to_ascii(token: &str) -> String {
    token
        .chars()
        .map(|c| match c {
            '０'..='９' => char::from_u32(c as u32 - '０' as u32 + '0' as u32).unwrap_or(c),
            '：' => ':',
            '－' => '-',
            '〜' | '～' => '~',
            other => other,
        })
        .collect()
}

/// Rewrites hour-only tokens (`9-10`, `9時〜10時`) as `09:00-10:00` and maps
/// full-width characters to ASCII first, so `〜` and `～` match as `~`.
///
/// Tokens in no known shape are kept as-is rather than dropped, unlike the
/// sheet converter this mirrors; the normalizer never validates labels.
pub fn canonical_time(token: &str) -> String {
    let token = to_ascii(token.trim());
    if CLOCK_RANGE.is_match(&token) {
        return token;
    }
    let caps = HOUR_RANGE
        .captures(&token)
        .or_else(|| KANJI_HOUR_RANGE.captures(&token));
    match caps {
        Some(caps) => {
            let from: u32 = caps[1].parse().unwrap_or_default();
            let to: u32 = caps[2].parse().unwrap_or_default();
            format!("{from:02}:00-{to:02}:00")
        }
        None => token,
    }
}

/// Applies [`canonical_date`] and [`canonical_time`] to every slot.
pub fn canonicalize(slots: Vec<Slot>) -> Vec<Slot> {
    slots
        .into_iter()
        .map(|slot| Slot::new(canonical_date(&slot.date), canonical_time(&slot.time)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emits_slots_in_column_then_token_order() {
        let days = vec![
            RawDay::new(" 3/10 ", "10:00-11:00, 13:00-14:00"),
            RawDay { date: "3/11".into(), times: None },
            RawDay::new("3/12", "nan"),
            RawDay::new("3/13", " 9:00-10:00 ,, NaN"),
        ];
        assert_eq!(
            normalize_availability(&days),
            vec![
                Slot::new("3/10", "10:00-11:00"),
                Slot::new("3/10", "13:00-14:00"),
                Slot::new("3/13", "9:00-10:00"),
            ]
        );
    }

    #[test]
    fn keeps_duplicates_and_unparsed_labels() {
        let days = vec![RawDay::new("3/10", "after school，after school")];
        let slots = normalize_availability(&days);
        assert_eq!(slots.len(), 2);
        assert_eq!(slots[0].time, "after school");
    }

    #[test]
    fn instrument_field_splits_on_commas_and_newlines() {
        let parsed = parse_instruments("ギター, ドラム\nbass").unwrap();
        assert_eq!(parsed, vec![Instrument::Guitar, Instrument::Drums, Instrument::Bass]);
        assert!(parse_instruments("").unwrap().is_empty());
        assert!(parse_instruments("guitar, theremin").is_err());
    }

    #[test]
    fn canonical_dates() {
        assert_eq!(canonical_date("2024年3月10日"), "3/10");
        assert_eq!(canonical_date("2024/03/09"), "3/9");
        assert_eq!(canonical_date("3/10"), "3/10");
        assert_eq!(canonical_date("day one"), "day one");
    }

    #[test]
    fn canonical_times() {
        assert_eq!(canonical_time("9:00-10:30"), "9:00-10:30");
        assert_eq!(canonical_time("９-１０"), "09:00-10:00");
        assert_eq!(canonical_time("13~15"), "13:00-15:00");
        assert_eq!(canonical_time("9時〜10時"), "09:00-10:00");
        assert_eq!(canonical_time("１０：００－１１：００"), "10:00-11:00");
        assert_eq!(canonical_time("anytime"), "anytime");
    }
}
