//! Tabular views of a [`MatchResult`] for people to read.
//!
//! The engine guarantees only assignment order; everything here sorts for
//! display and groups by date.

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::data::{AssignmentEntry, MatchResult, Person, Slot, SlotAssignments};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ReportMode {
    /// A single sheet holding every date.
    #[default]
    Combined,
    /// One sheet per date that has lessons.
    ByDate,
    Both,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LessonRow {
    pub name: String,
    pub contact: String,
    pub instrument: String,
    pub date: String,
    pub time: String,
    pub teacher: String,
    pub remarks: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnmatchedRow {
    pub name: String,
    pub contact: String,
    pub instrument: String,
    pub availability: String,
    pub remarks: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnusedRow {
    pub name: String,
    pub instrument: String,
    pub date: String,
    pub time: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Sheet {
    pub title: String,
    pub lessons: Vec<LessonRow>,
    pub unmatched: Vec<UnmatchedRow>,
    pub unused: Vec<UnusedRow>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Report {
    pub sheets: Vec<Sheet>,
}

fn lesson_row(slot: &Slot, entry: &AssignmentEntry) -> LessonRow {
    let student = &entry.student;
    let teacher = &entry.teacher;
    LessonRow {
        name: student.name.clone(),
        contact: student.contact.clone(),
        instrument: student.instrument.to_string(),
        date: slot.date.clone(),
        time: slot.time.clone(),
        teacher: format!("{}({})", teacher.name, teacher.instrument.initial()),
        remarks: student.remarks.clone(),
    }
}

fn unmatched_row<'a>(request: &Person, slots: impl Iterator<Item = &'a Slot>) -> UnmatchedRow {
    UnmatchedRow {
        name: request.name.clone(),
        contact: request.contact.clone(),
        instrument: request.instrument.to_string(),
        availability: slots.map(Slot::to_string).join(", "),
        remarks: request.remarks.clone(),
    }
}

fn sorted_slots<'a>(slots: impl Iterator<Item = &'a SlotAssignments>) -> Vec<&'a SlotAssignments> {
    slots.sorted_by_key(|s| s.slot.display_key()).collect()
}

fn combined(result: &MatchResult) -> Sheet {
    let lessons = sorted_slots(result.assignments.iter())
        .into_iter()
        .flat_map(|s| s.entries.iter().map(|e| lesson_row(&s.slot, e)))
        .collect();
    let unmatched = result
        .unmatched_students
        .iter()
        .flat_map(|u| &u.requests)
        .map(|r| unmatched_row(r, r.availability.iter()))
        .collect();
    let unused = result
        .unused_teacher_slots
        .iter()
        .map(|t| UnusedRow {
            name: t.name.clone(),
            instrument: t.instrument.to_string(),
            date: t.date.clone(),
            time: t.time.clone(),
        })
        .collect();
    Sheet {
        title: "all".to_string(),
        lessons,
        unmatched,
        unused,
    }
}

fn by_date(result: &MatchResult) -> Vec<Sheet> {
    let per_date = result
        .assignments
        .iter()
        .map(|s| (s.slot.date.clone(), s))
        .into_group_map();

    per_date
        .into_iter()
        .sorted_by_key(|(date, _)| Slot::new(date, "").display_key())
        .map(|(date, slots)| {
            let lessons = sorted_slots(slots.into_iter())
                .into_iter()
                .flat_map(|s| s.entries.iter().map(|e| lesson_row(&s.slot, e)))
                .collect();
            let unmatched = result
                .unmatched_students
                .iter()
                .flat_map(|u| &u.requests)
                .filter(|r| r.availability.iter().any(|s| s.date == date))
                .map(|r| unmatched_row(r, r.availability.iter().filter(|s| s.date == date)))
                .collect();
            let unused = result
                .unused_teacher_slots
                .iter()
                .filter(|t| t.date == date)
                .map(|t| UnusedRow {
                    name: t.name.clone(),
                    instrument: t.instrument.to_string(),
                    date: t.date.clone(),
                    time: t.time.clone(),
                })
                .collect();
            Sheet {
                title: date,
                lessons,
                unmatched,
                unused,
            }
        })
        .collect()
}

pub fn build_report(result: &MatchResult, mode: ReportMode) -> Report {
    let mut sheets = Vec::new();
    if matches!(mode, ReportMode::Combined | ReportMode::Both) {
        sheets.push(combined(result));
    }
    if matches!(mode, ReportMode::ByDate | ReportMode::Both) {
        sheets.extend(by_date(result));
    }
    Report { sheets }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MatchConfig;
    use crate::data::Instrument;
    use crate::solver::solve;

    fn sample() -> MatchResult {
        let teachers = vec![
            Person::new(0, "Aki", Instrument::Guitar)
                .with_slot("3/10", "13:00-14:00")
                .with_slot("3/10", "9:00-10:00")
                .with_slot("12/1", "9:00-10:00"),
        ];
        let students = vec![
            Person::new(0, "Ume", Instrument::Guitar)
                .with_contact("@ume")
                .with_slot("3/10", "13:00-14:00"),
            Person::new(1, "Kou", Instrument::Guitar).with_slot("3/10", "9:00-10:00"),
            Person::new(2, "Nao", Instrument::Bass)
                .with_slot("3/10", "9:00-10:00")
                .with_slot("3/11", "9:00-10:00"),
        ];
        solve(&teachers, &students, &MatchConfig::default())
    }

    #[test]
    fn combined_sheet_sorts_lessons_for_display() {
        let report = build_report(&sample(), ReportMode::Combined);
        assert_eq!(report.sheets.len(), 1);
        let sheet = &report.sheets[0];
        let times: Vec<&str> = sheet.lessons.iter().map(|r| r.time.as_str()).collect();
        assert_eq!(times, vec!["9:00-10:00", "13:00-14:00"]);
        assert_eq!(sheet.lessons[1].teacher, "Aki(G)");
        assert_eq!(sheet.lessons[1].contact, "@ume");
        assert_eq!(sheet.unmatched[0].availability, "3/10 9:00-10:00, 3/11 9:00-10:00");
        assert_eq!(sheet.unused.len(), 1);
        assert_eq!(sheet.unused[0].date, "12/1");
    }

    #[test]
    fn by_date_sheets_only_list_that_dates_rows() {
        let report = build_report(&sample(), ReportMode::ByDate);
        assert_eq!(report.sheets.len(), 1);
        let sheet = &report.sheets[0];
        assert_eq!(sheet.title, "3/10");
        assert_eq!(sheet.lessons.len(), 2);
        assert_eq!(sheet.unmatched[0].availability, "3/10 9:00-10:00");
        assert!(sheet.unused.is_empty());
    }

    #[test]
    fn both_mode_puts_combined_first() {
        let report = build_report(&sample(), ReportMode::Both);
        assert_eq!(report.sheets.len(), 2);
        assert_eq!(report.sheets[0].title, "all");
    }
}
