use lesson_match::{Instrument, MatchConfig, Person, Slot, solve};

fn guitar_slot() -> Slot {
    Slot::new("3/10", "10:00-11:00")
}

#[test]
fn single_pair_fills_the_slot() {
    let teachers = vec![Person::new(0, "Aki", Instrument::Guitar).with_slot("3/10", "10:00-11:00")];
    let students = vec![Person::new(0, "Ume", Instrument::Guitar).with_slot("3/10", "10:00-11:00")];
    let config = MatchConfig {
        max_group_size: 2,
        ..MatchConfig::default()
    };

    let result = solve(&teachers, &students, &config);
    assert_eq!(result.assignments.len(), 1);
    assert_eq!(result.entries_at(&guitar_slot()).len(), 1);
    assert!(result.unmatched_students.is_empty());
    assert!(result.unused_teacher_slots.is_empty());
}

#[test]
fn second_student_is_left_over_with_slot_intact() {
    let teachers = vec![Person::new(0, "Aki", Instrument::Guitar).with_slot("3/10", "10:00-11:00")];
    let students = vec![
        Person::new(0, "Ume", Instrument::Guitar).with_slot("3/10", "10:00-11:00"),
        Person::new(1, "Kou", Instrument::Guitar).with_slot("3/10", "10:00-11:00"),
    ];
    let config = MatchConfig {
        max_group_size: 1,
        ..MatchConfig::default()
    };

    let result = solve(&teachers, &students, &config);
    assert_eq!(result.assignment_count(), 1);
    assert_eq!(result.entries_at(&guitar_slot())[0].student.name, "Ume");
    let kou = result.unmatched("Kou").expect("Kou is unmatched");
    assert_eq!(kou.requests.len(), 1);
    assert_eq!(kou.requests[0].availability, vec![guitar_slot()]);
}

#[test]
fn drums_and_guitar_never_share_a_slot() {
    let teachers = vec![
        Person::new(0, "Dai", Instrument::Drums).with_slot("3/10", "10:00-11:00"),
        Person::new(1, "Aki", Instrument::Guitar).with_slot("3/10", "10:00-11:00"),
    ];
    let students = vec![
        Person::new(0, "Ume", Instrument::Drums).with_slot("3/10", "10:00-11:00"),
        Person::new(1, "Kou", Instrument::Guitar).with_slot("3/10", "10:00-11:00"),
    ];

    for drum_exclusive in [false, true] {
        let config = MatchConfig {
            max_group_size: 2,
            drum_exclusive,
            ..MatchConfig::default()
        };
        let result = solve(&teachers, &students, &config);
        let entries = result.entries_at(&guitar_slot());
        assert_eq!(entries.len(), 1);
        assert!(
            entries.iter().all(|e| e.teacher.instrument.is_drum())
                || entries.iter().all(|e| !e.teacher.instrument.is_drum())
        );
        assert!(result.unmatched("Kou").is_some());
    }
}

#[test]
fn drums_and_guitar_spread_over_alternate_slots() {
    let teachers = vec![
        Person::new(0, "Dai", Instrument::Drums)
            .with_slot("3/10", "10:00-11:00")
            .with_slot("3/10", "11:00-12:00"),
        Person::new(1, "Aki", Instrument::Guitar)
            .with_slot("3/10", "10:00-11:00")
            .with_slot("3/10", "11:00-12:00"),
    ];
    let students = vec![
        Person::new(0, "Ume", Instrument::Drums)
            .with_slot("3/10", "10:00-11:00")
            .with_slot("3/10", "11:00-12:00"),
        Person::new(1, "Kou", Instrument::Guitar)
            .with_slot("3/10", "10:00-11:00")
            .with_slot("3/10", "11:00-12:00"),
    ];

    let result = solve(&teachers, &students, &MatchConfig::default());
    assert_eq!(result.assignment_count(), 2);
    assert!(result.unmatched_students.is_empty());
    for slot in &result.assignments {
        assert_eq!(slot.entries.len(), 1);
    }
}

#[test]
fn split_slots_let_a_half_hour_request_match() {
    let teachers = vec![Person::new(0, "Aki", Instrument::Keyboard).with_slot("3/10", "9:00-10:00")];
    let students = vec![Person::new(0, "Ume", Instrument::Keyboard).with_slot("3/10", "9:00-9:30")];

    let whole = solve(&teachers, &students, &MatchConfig::default());
    assert_eq!(whole.assignment_count(), 0);
    assert!(whole.unmatched("Ume").is_some());

    let config = MatchConfig {
        allow_split: true,
        split_interval_minutes: 30,
        ..MatchConfig::default()
    };
    let split = solve(&teachers, &students, &config);
    assert_eq!(split.entries_at(&Slot::new("3/10", "09:00-09:30")).len(), 1);
    assert!(split.unmatched_students.is_empty());
    assert_eq!(split.unused_teacher_slots.len(), 1);
    assert_eq!(split.unused_teacher_slots[0].time, "09:30-10:00");
}
