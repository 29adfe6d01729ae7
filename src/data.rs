use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;
use crate::split;

/// Index of a source record within its role's input list.
///
/// Instrument-exploded copies of one record share the same id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
pub struct PersonId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Teacher,
    Student,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Teacher => write!(f, "teacher"),
            Role::Student => write!(f, "student"),
        }
    }
}

/// The fixed set of instruments lessons are offered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Instrument {
    Guitar,
    Bass,
    Drums,
    Keyboard,
    Other,
}

impl Instrument {
    /// Drums are the only instrument in the drum category.
    pub fn is_drum(self) -> bool {
        matches!(self, Instrument::Drums)
    }

    /// One-letter tag shown next to a teacher's name in report views.
    pub fn initial(self) -> char {
        match self {
            Instrument::Guitar => 'G',
            Instrument::Bass => 'B',
            Instrument::Drums => 'D',
            Instrument::Keyboard => 'K',
            Instrument::Other => 'O',
        }
    }
}

impl FromStr for Instrument {
    type Err = Error;

    fn from_str(label: &str) -> Result<Self, Self::Err> {
        let label = label.trim();
        let instrument = match label {
            "ギター" => Instrument::Guitar,
            "ベース" => Instrument::Bass,
            "ドラム" => Instrument::Drums,
            "キーボード" => Instrument::Keyboard,
            "その他" => Instrument::Other,
            _ => match label.to_ascii_lowercase().as_str() {
                "guitar" => Instrument::Guitar,
                "bass" => Instrument::Bass,
                "drum" | "drums" => Instrument::Drums,
                "keyboard" | "keys" => Instrument::Keyboard,
                "other" => Instrument::Other,
                _ => return Err(Error::invalid(format!("unknown instrument label '{label}'"))),
            },
        };
        Ok(instrument)
    }
}

impl fmt::Display for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Instrument::Guitar => "guitar",
            Instrument::Bass => "bass",
            Instrument::Drums => "drums",
            Instrument::Keyboard => "keyboard",
            Instrument::Other => "other",
        };
        f.write_str(name)
    }
}

/// A (date label, time-range label) pair. Both labels are opaque; equality is
/// exact string equality after trimming.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(from = "SlotLabels")]
pub struct Slot {
    pub date: String,
    pub time: String,
}

impl Slot {
    pub fn new(date: impl AsRef<str>, time: impl AsRef<str>) -> Self {
        Self {
            date: date.as_ref().trim().to_string(),
            time: time.as_ref().trim().to_string(),
        }
    }

    /// Start of the time label in minutes after midnight, if it parses.
    pub fn start_minutes(&self) -> Option<u32> {
        split::start_minutes(&self.time)
    }

    /// The date label read as `month/day`.
    pub fn month_day(&self) -> Option<(u32, u32)> {
        let (month, day) = self.date.split_once('/')?;
        Some((month.trim().parse().ok()?, day.trim().parse().ok()?))
    }

    /// Sort key for presentation: month/day, then start time. Labels that do
    /// not parse sort after those that do, then by raw text.
    pub fn display_key(&self) -> (bool, (u32, u32), bool, u32, String, String) {
        let month_day = self.month_day();
        let start = self.start_minutes();
        (
            month_day.is_none(),
            month_day.unwrap_or_default(),
            start.is_none(),
            start.unwrap_or_default(),
            self.date.clone(),
            self.time.clone(),
        )
    }
}

#[derive(Deserialize)]
struct SlotLabels {
    date: String,
    time: String,
}

impl From<SlotLabels> for Slot {
    fn from(labels: SlotLabels) -> Self {
        Slot::new(labels.date, labels.time)
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.date, self.time)
    }
}

/// One participant wanting (or offering) lessons on a single instrument.
///
/// A person playing several instruments is represented by several records
/// sharing `id` and `name`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub id: PersonId,
    pub name: String,
    pub contact: String,
    pub instrument: Instrument,
    pub remarks: String,
    pub availability: Vec<Slot>,
}

impl Person {
    pub fn new(id: usize, name: impl Into<String>, instrument: Instrument) -> Self {
        Self {
            id: PersonId(id),
            name: name.into(),
            contact: String::new(),
            instrument,
            remarks: String::new(),
            availability: Vec::new(),
        }
    }

    pub fn with_contact(mut self, contact: impl Into<String>) -> Self {
        self.contact = contact.into();
        self
    }

    pub fn with_remarks(mut self, remarks: impl Into<String>) -> Self {
        self.remarks = remarks.into();
        self
    }

    pub fn with_slot(mut self, date: &str, time: &str) -> Self {
        self.availability.push(Slot::new(date, time));
        self
    }

    pub fn with_availability(mut self, availability: Vec<Slot>) -> Self {
        self.availability = availability;
        self
    }
}

/// A single lesson: one student paired with one teacher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssignmentEntry {
    pub student: Person,
    pub teacher: Person,
}

/// All lessons placed in one slot, in the order they were assigned.
#[derive(Debug, Clone, Serialize)]
pub struct SlotAssignments {
    pub slot: Slot,
    pub entries: Vec<AssignmentEntry>,
}

/// A student none of whose requests for some instrument could be placed.
///
/// Each request carries only the availability the student has left.
#[derive(Debug, Clone, Serialize)]
pub struct UnmatchedStudent {
    pub name: String,
    pub requests: Vec<Person>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnusedTeacherSlot {
    pub name: String,
    pub instrument: Instrument,
    pub date: String,
    pub time: String,
}

impl UnusedTeacherSlot {
    pub fn slot(&self) -> Slot {
        Slot::new(&self.date, &self.time)
    }
}

/// The output of one matching run.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub assignments: Vec<SlotAssignments>,
    pub unmatched_students: Vec<UnmatchedStudent>,
    pub unused_teacher_slots: Vec<UnusedTeacherSlot>,
}

impl MatchResult {
    pub fn entries_at(&self, slot: &Slot) -> &[AssignmentEntry] {
        self.assignments
            .iter()
            .find(|s| &s.slot == slot)
            .map(|s| s.entries.as_slice())
            .unwrap_or(&[])
    }

    pub fn assignment_count(&self) -> usize {
        self.assignments.iter().map(|s| s.entries.len()).sum()
    }

    pub fn unmatched(&self, name: &str) -> Option<&UnmatchedStudent> {
        self.unmatched_students.iter().find(|u| u.name == name)
    }
}
