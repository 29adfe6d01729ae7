//! Slot splitting.
//!
//! A time-range label `HH:MM-HH:MM` is cut into contiguous sub-ranges of a
//! fixed length. Labels that do not parse are passed through untouched as a
//! single atomic range.

use chrono::{NaiveTime, Timelike};
use log::trace;

use crate::data::{Person, Slot};

fn parse_clock(text: &str) -> Option<u32> {
    let time = NaiveTime::parse_from_str(text.trim(), "%H:%M").ok()?;
    Some(time.num_seconds_from_midnight() / 60)
}

fn format_clock(minutes: u32) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// Parses `HH:MM-HH:MM` into start and end minutes after midnight.
pub fn parse_range(label: &str) -> Option<(u32, u32)> {
    let (start, end) = label.split_once('-')?;
    if end.contains('-') {
        return None;
    }
    Some((parse_clock(start)?, parse_clock(end)?))
}

/// Start of a time-range label in minutes after midnight.
pub fn start_minutes(label: &str) -> Option<u32> {
    let start = label.split('-').next()?;
    parse_clock(start)
}

/// Cuts `label` into consecutive `interval_minutes`-long ranges beginning at
/// its start. A trailing remainder shorter than the interval is dropped, so
/// a range shorter than one interval yields nothing.
///
/// Unparseable labels (and a zero interval) return the label unchanged.
pub fn split_time_range(label: &str, interval_minutes: u32) -> Vec<String> {
    let Some((start, end)) = parse_range(label) else {
        trace!("time label '{label}' is not a HH:MM-HH:MM range, keeping it whole");
        return vec![label.to_string()];
    };
    if interval_minutes == 0 {
        return vec![label.to_string()];
    }

    let mut pieces = Vec::new();
    let mut cursor = start;
    while let Some(next) = cursor.checked_add(interval_minutes) {
        if next > end {
            break;
        }
        pieces.push(format!("{}-{}", format_clock(cursor), format_clock(next)));
        cursor = next;
    }
    pieces
}

/// Splits every slot of `availability`, keeping date order and the order of
/// pieces within each slot.
pub fn split_slots(availability: &[Slot], interval_minutes: u32) -> Vec<Slot> {
    availability
        .iter()
        .flat_map(|slot| {
            split_time_range(&slot.time, interval_minutes)
                .into_iter()
                .map(move |time| Slot {
                    date: slot.date.clone(),
                    time,
                })
        })
        .collect()
}

/// Returns copies of `teachers` whose availability has been rewritten into
/// sub-slots. The input is left untouched.
pub fn expand_teachers(teachers: &[Person], interval_minutes: u32) -> Vec<Person> {
    teachers
        .iter()
        .map(|teacher| Person {
            availability: split_slots(&teacher.availability, interval_minutes),
            ..teacher.clone()
        })
        .collect()
}
