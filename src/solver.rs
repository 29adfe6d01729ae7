use itertools::Itertools;
use log::{debug, info, trace};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::time::Instant;

use crate::config::{IdentityKey, MatchConfig};
use crate::data::{
    AssignmentEntry, Instrument, MatchResult, Person, Slot, SlotAssignments, UnmatchedStudent,
    UnusedTeacherSlot,
};
use crate::split::{expand_teachers, split_time_range};

/// Greedily pairs students with teachers slot by slot.
///
/// Students with the fewest available slots are served first. In round `r`
/// every student-instrument pair with fewer than `r` lessons gets at most one
/// more: the first candidate slot with a feasible teacher wins, and the first
/// feasible teacher in input order is taken. Nothing is searched beyond that.
///
/// Inputs are not modified; teacher expansion works on a copy.
pub fn solve(teachers: &[Person], students: &[Person], config: &MatchConfig) -> MatchResult {
    let start_time = Instant::now();
    info!(
        "Matching {} student requests against {} teacher records over {} round(s)...",
        students.len(),
        teachers.len(),
        config.max_rounds_per_instrument
    );

    let teachers = if config.allow_split {
        expand_teachers(teachers, config.split_interval_minutes)
    } else {
        teachers.to_vec()
    };
    let students: Vec<&Person> = students
        .iter()
        .sorted_by_key(|s| s.availability.len())
        .collect();

    let mut state = MatchState::new(&teachers, config);
    for round in 1..=config.max_rounds_per_instrument {
        let placed = state.assign_round(&students, round);
        debug!("Round {round}: placed {placed} lesson(s).");
    }
    let result = state.finish(&students);

    info!(
        "Matching finished in {:.2?}: {} lesson(s), {} unmatched student(s), {} unused teacher slot(s).",
        start_time.elapsed(),
        result.assignment_count(),
        result.unmatched_students.len(),
        result.unused_teacher_slots.len()
    );
    result
}

struct MatchState<'a> {
    config: &'a MatchConfig,
    teachers: &'a [Person],
    teacher_keys: Vec<IdentityKey>,
    teacher_slots: Vec<HashSet<&'a Slot>>,
    assignments: Vec<SlotAssignments>,
    slot_index: HashMap<Slot, usize>,
    teacher_usage: HashMap<IdentityKey, HashSet<Slot>>,
    lesson_count: HashMap<(IdentityKey, Instrument), u32>,
    student_used: HashMap<IdentityKey, BTreeSet<Slot>>,
    student_teachers: HashMap<(IdentityKey, Instrument), Vec<usize>>,
}

impl<'a> MatchState<'a> {
    fn new(teachers: &'a [Person], config: &'a MatchConfig) -> Self {
        Self {
            config,
            teachers,
            teacher_keys: teachers.iter().map(|t| config.identity_policy.key(t)).collect(),
            teacher_slots: teachers.iter().map(|t| t.availability.iter().collect()).collect(),
            assignments: Vec::new(),
            slot_index: HashMap::new(),
            teacher_usage: HashMap::new(),
            lesson_count: HashMap::new(),
            student_used: HashMap::new(),
            student_teachers: HashMap::new(),
        }
    }

    fn entries_at(&self, slot: &Slot) -> &[AssignmentEntry] {
        self.slot_index
            .get(slot)
            .map(|&i| self.assignments[i].entries.as_slice())
            .unwrap_or(&[])
    }

    fn lessons(&self, key: &IdentityKey, instrument: Instrument) -> u32 {
        self.lesson_count
            .get(&(key.clone(), instrument))
            .copied()
            .unwrap_or(0)
    }

    fn student_busy(&self, key: &IdentityKey, slot: &Slot) -> bool {
        self.student_used
            .get(key)
            .is_some_and(|used| used.contains(slot))
    }

    fn teacher_busy(&self, teacher: usize, slot: &Slot) -> bool {
        self.teacher_usage
            .get(&self.teacher_keys[teacher])
            .is_some_and(|used| used.contains(slot))
    }

    /// Runs one pass over all students, returning how many lessons it placed.
    fn assign_round(&mut self, students: &[&Person], target: u32) -> usize {
        let mut placed = 0;
        for &student in students {
            let key = self.config.identity_policy.key(student);
            if self.lessons(&key, student.instrument) >= target {
                continue;
            }
            if self.place(student, &key) {
                placed += 1;
            }
        }
        placed
    }

    fn place(&mut self, student: &Person, key: &IdentityKey) -> bool {
        for candidate in self.candidate_order(student, key) {
            let pieces = if self.config.allow_split {
                split_time_range(&candidate.time, self.config.split_interval_minutes)
            } else {
                vec![candidate.time.clone()]
            };
            for time in pieces {
                let slot = Slot {
                    date: candidate.date.clone(),
                    time,
                };
                if self.student_busy(key, &slot) {
                    continue;
                }
                if self.entries_at(&slot).len() >= self.config.max_group_size {
                    continue;
                }
                if let Some(teacher) = self.find_teacher(student, key, &slot) {
                    self.commit(student, key, teacher, slot);
                    return true;
                }
            }
        }
        trace!("no teacher found for {} ({}) this round", student.name, student.instrument);
        false
    }

    /// The student's availability, nearest-first around already booked
    /// times on the same date when continuity is preferred.
    fn candidate_order<'p>(&self, student: &'p Person, key: &IdentityKey) -> Vec<&'p Slot> {
        let mut candidates: Vec<&Slot> = student.availability.iter().collect();
        if !self.config.prefer_continuous_time {
            return candidates;
        }
        let Some(used) = self.student_used.get(key).filter(|u| !u.is_empty()) else {
            return candidates;
        };
        candidates.sort_by_key(|slot| time_distance(slot, used).unwrap_or(u32::MAX));
        candidates
    }

    /// Teacher indices in the order they are tried.
    fn teacher_order(&self, key: &IdentityKey, instrument: Instrument) -> Vec<usize> {
        let all = 0..self.teachers.len();
        if !self.config.prefer_same_teacher {
            return all.collect();
        }
        match self.student_teachers.get(&(key.clone(), instrument)) {
            Some(previous) => previous
                .iter()
                .copied()
                .chain(all.filter(|i| !previous.contains(i)))
                .unique()
                .collect(),
            None => all.collect(),
        }
    }

    fn find_teacher(&self, student: &Person, key: &IdentityKey, slot: &Slot) -> Option<usize> {
        self.teacher_order(key, student.instrument)
            .into_iter()
            .find(|&t| self.teacher_fits(t, student.instrument, slot))
    }

    fn teacher_fits(&self, index: usize, instrument: Instrument, slot: &Slot) -> bool {
        let teacher = &self.teachers[index];
        if teacher.instrument != instrument {
            return false;
        }
        if self.teacher_busy(index, slot) || !self.teacher_slots[index].contains(slot) {
            return false;
        }

        let entries = self.entries_at(slot);
        if entries.len() >= self.config.max_group_size {
            return false;
        }
        // drums and other instruments never share a slot
        let drum = teacher.instrument.is_drum();
        if entries.iter().any(|e| e.teacher.instrument.is_drum() != drum) {
            return false;
        }
        if drum {
            let drums = entries.iter().filter(|e| e.teacher.instrument.is_drum()).count();
            if drums >= self.config.max_drum_per_slot {
                return false;
            }
        }
        true
    }

    fn commit(&mut self, student: &Person, key: &IdentityKey, teacher: usize, slot: Slot) {
        let teachers = self.teachers;
        let teacher_person = &teachers[teacher];
        trace!(
            "{} ({}) -> {} at {}",
            student.name, student.instrument, teacher_person.name, slot
        );

        let index = match self.slot_index.get(&slot) {
            Some(&i) => i,
            None => {
                self.assignments.push(SlotAssignments {
                    slot: slot.clone(),
                    entries: Vec::new(),
                });
                self.slot_index.insert(slot.clone(), self.assignments.len() - 1);
                self.assignments.len() - 1
            }
        };
        self.assignments[index].entries.push(AssignmentEntry {
            student: student.clone(),
            teacher: teacher_person.clone(),
        });

        self.teacher_usage
            .entry(self.teacher_keys[teacher].clone())
            .or_default()
            .insert(slot.clone());
        *self
            .lesson_count
            .entry((key.clone(), student.instrument))
            .or_default() += 1;
        self.student_used.entry(key.clone()).or_default().insert(slot);
        self.student_teachers
            .entry((key.clone(), student.instrument))
            .or_default()
            .push(teacher);
    }

    fn finish(self, students: &[&Person]) -> MatchResult {
        let policy = self.config.identity_policy;

        let mut unmatched_students: Vec<UnmatchedStudent> = Vec::new();
        let mut unmatched_index: HashMap<IdentityKey, usize> = HashMap::new();
        for &student in students {
            let key = policy.key(student);
            if self.lessons(&key, student.instrument) > 0 {
                continue;
            }
            let remaining = student
                .availability
                .iter()
                .filter(|slot| !self.student_busy(&key, slot))
                .cloned()
                .collect();
            let request = Person {
                availability: remaining,
                ..student.clone()
            };
            let index = *unmatched_index.entry(key).or_insert_with(|| {
                unmatched_students.push(UnmatchedStudent {
                    name: student.name.trim().to_string(),
                    requests: Vec::new(),
                });
                unmatched_students.len() - 1
            });
            unmatched_students[index].requests.push(request);
        }

        let mut seen: HashSet<(&IdentityKey, Instrument, &Slot)> = HashSet::new();
        let mut unused_teacher_slots = Vec::new();
        for (index, teacher) in self.teachers.iter().enumerate() {
            for slot in &teacher.availability {
                if self.teacher_busy(index, slot) {
                    continue;
                }
                if !seen.insert((&self.teacher_keys[index], teacher.instrument, slot)) {
                    continue;
                }
                unused_teacher_slots.push(UnusedTeacherSlot {
                    name: teacher.name.clone(),
                    instrument: teacher.instrument,
                    date: slot.date.clone(),
                    time: slot.time.clone(),
                });
            }
        }

        MatchResult {
            assignments: self.assignments,
            unmatched_students,
            unused_teacher_slots,
        }
    }
}

/// Minutes between `slot` and the first booked slot on the same date whose
/// start time parses. `None` when there is no such slot.
fn time_distance(slot: &Slot, used: &BTreeSet<Slot>) -> Option<u32> {
    let start = slot.start_minutes();
    used.iter()
        .filter(|u| u.date == slot.date)
        .find_map(|u| Some(start?.abs_diff(u.start_minutes()?)))
}
