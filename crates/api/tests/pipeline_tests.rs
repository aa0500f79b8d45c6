//! End-to-end scenarios driven through the full solve pipeline, plus the
//! CSV/JSON output contract.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs;
use std::path::PathBuf;

use api::output::{write_outputs, JSON_FILE};
use api::pipeline::{run, SolveRun, HARD_CSV, SOFT_CSV};
use tt_core::SolveError;
use types::{Day, Entry, SessionTemplate, Slot, TeacherId, TimetableData, TimetablePayload};

fn data_with(
    availability: &[(&str, &[(Day, &[Slot])])],
    templates: &[SessionTemplate],
) -> TimetableData {
    let mut table = BTreeMap::new();
    for day in [Day::Mon, Day::Tue, Day::Wed, Day::Thu] {
        table.insert(day, vec![1, 2, 3, 4, 5]);
    }
    table.insert(Day::Fri, vec![4, 5]);
    let availability = availability
        .iter()
        .map(|(teacher, days)| {
            let flat = days
                .iter()
                .flat_map(|(day, slots)| slots.iter().map(move |&s| (*day, s)))
                .collect();
            (TeacherId::from(*teacher), flat)
        })
        .collect();
    TimetableData::new(table, availability, templates)
}

fn assert_invariants(data: &TimetableData, entries: &[Entry]) {
    // Every session instance appears exactly once.
    assert_eq!(entries.len(), data.sessions.len());
    let mut placed: Vec<(&str, &str)> = entries
        .iter()
        .map(|e| (e.teacher.as_str(), e.code.as_str()))
        .collect();
    let mut expected: Vec<(&str, &str)> = data
        .sessions
        .iter()
        .map(|s| (s.teacher.as_str(), s.code.as_str()))
        .collect();
    placed.sort();
    expected.sort();
    assert_eq!(placed, expected);

    let mut teacher_slots = HashSet::new();
    let mut tracks: HashMap<(Day, Slot), Vec<u8>> = HashMap::new();
    for e in entries {
        assert!(data.is_teacher_available(&e.teacher, e.day, e.slot));
        assert!(data.slots_on(e.day).contains(&e.slot));
        assert!(
            teacher_slots.insert((e.teacher.clone(), e.day, e.slot)),
            "teacher {} double-booked at {} slot {}",
            e.teacher,
            e.day,
            e.slot
        );
        tracks.entry((e.day, e.slot)).or_default().push(e.track);
    }
    for ((day, slot), got) in tracks {
        let expect: Vec<u8> = (1..=got.len() as u8).collect();
        assert_eq!(got, expect, "tracks not a prefix at {day} slot {slot}");
        assert!(got.len() <= 4);
    }

    let mut sorted = entries.to_vec();
    sorted.sort_by(|a, b| {
        (a.day.index(), a.slot, a.track, &a.teacher, &a.code).cmp(&(
            b.day.index(),
            b.slot,
            b.track,
            &b.teacher,
            &b.code,
        ))
    });
    assert_eq!(entries, sorted.as_slice(), "entries not canonically ordered");
}

#[test]
fn minimal_hard_feasible_uses_both_slots() {
    let data = data_with(
        &[("A", &[(Day::Mon, &[1, 2])])],
        &[
            SessionTemplate::new("A", "A_1", "Math", 1, &["s1"]),
            SessionTemplate::new("A", "A_2", "Math", 1, &["s2"]),
        ],
    );
    let run = run(&data).unwrap();
    assert_eq!(run.csv_name, HARD_CSV);
    assert!(!run.relaxed);
    assert_invariants(&data, &run.payload.entries);
    let slots: HashSet<Slot> = run.payload.entries.iter().map(|e| e.slot).collect();
    assert_eq!(slots, HashSet::from([1, 2]));
    assert!(run.payload.entries.iter().all(|e| e.day == Day::Mon && e.track == 1));
}

#[test]
fn four_parallel_sessions_fill_the_tracks() {
    let templates: Vec<SessionTemplate> = (0..4)
        .map(|i| {
            SessionTemplate::new(
                &format!("T{i}"),
                &format!("T{i}_1"),
                "Math",
                1,
                &[&format!("s{i}") as &str],
            )
        })
        .collect();
    let availability: HashMap<TeacherId, HashSet<(Day, Slot)>> = (0..4)
        .map(|i| {
            (
                TeacherId(format!("T{i}")),
                std::iter::once((Day::Mon, 1u8)).collect(),
            )
        })
        .collect();
    let mut table = BTreeMap::new();
    table.insert(Day::Mon, vec![1]);
    let data = TimetableData::new(table, availability, &templates);

    let run = run(&data).unwrap();
    assert_eq!(run.csv_name, HARD_CSV);
    assert_invariants(&data, &run.payload.entries);
    let summary: Vec<(&str, u8)> = run
        .payload
        .entries
        .iter()
        .map(|e| (e.teacher.as_str(), e.track))
        .collect();
    assert_eq!(summary, vec![("T0", 1), ("T1", 2), ("T2", 3), ("T3", 4)]);
}

#[test]
fn capacity_overflow_is_fatal_even_relaxed() {
    let templates: Vec<SessionTemplate> = (0..5)
        .map(|i| {
            SessionTemplate::new(
                &format!("T{i}"),
                &format!("T{i}_1"),
                "Math",
                1,
                &[&format!("s{i}") as &str],
            )
        })
        .collect();
    let availability: HashMap<TeacherId, HashSet<(Day, Slot)>> = (0..5)
        .map(|i| {
            (
                TeacherId(format!("T{i}")),
                std::iter::once((Day::Mon, 1u8)).collect(),
            )
        })
        .collect();
    let mut table = BTreeMap::new();
    table.insert(Day::Mon, vec![1]);
    let data = TimetableData::new(table, availability, &templates);

    match run(&data) {
        Err(SolveError::Infeasible) => {}
        other => panic!("expected soft-phase infeasibility, got {:?}", other.err()),
    }
}

#[test]
fn student_conflict_falls_back_to_relaxed_timetable() {
    let data = data_with(
        &[("A", &[(Day::Mon, &[1])]), ("B", &[(Day::Mon, &[1])])],
        &[
            SessionTemplate::new("A", "A_1", "Math", 1, &["s1"]),
            SessionTemplate::new("B", "B_1", "Sci", 1, &["s1"]),
        ],
    );
    let run = run(&data).unwrap();
    assert_eq!(run.csv_name, SOFT_CSV);
    assert!(run.relaxed);
    assert_invariants(&data, &run.payload.entries);
    let violations = tt_core::scoring::count_violations(&run.payload.entries);
    assert_eq!(violations.student_slot_overlaps, 1);
    assert_eq!(violations.weighted_total(), 1000);
}

#[test]
fn friday_only_teacher_lands_in_a_late_slot() {
    let data = data_with(
        &[("A", &[(Day::Fri, &[4, 5])])],
        &[SessionTemplate::new("A", "A_1", "Math", 1, &["s1"])],
    );
    let run = run(&data).unwrap();
    assert_invariants(&data, &run.payload.entries);
    let entry = &run.payload.entries[0];
    assert_eq!(entry.day, Day::Fri);
    assert!(entry.slot == 4 || entry.slot == 5);
}

#[test]
fn multiplicity_three_places_three_disjoint_instances() {
    let data = data_with(
        &[(
            "T",
            &[
                (Day::Mon, &[1, 2, 3]),
                (Day::Tue, &[1, 2, 3]),
                (Day::Wed, &[1, 2, 3]),
            ],
        )],
        &[SessionTemplate::new("T", "X_1", "Math", 3, &["s1"])],
    );
    assert_eq!(
        data.sessions.iter().map(|s| s.uid.as_str()).collect::<Vec<_>>(),
        vec!["X_1_T_1", "X_1_T_2", "X_1_T_3"]
    );
    let run = run(&data).unwrap();
    assert_invariants(&data, &run.payload.entries);
    assert_eq!(run.payload.entries.len(), 3);
    let slots: HashSet<(Day, Slot)> = run
        .payload
        .entries
        .iter()
        .map(|e| (e.day, e.slot))
        .collect();
    assert_eq!(slots.len(), 3, "instances must not share (day, slot)");
}

#[test]
fn compiled_in_dataset_produces_a_valid_timetable() {
    let data = api::data::load_data();
    tt_core::validate(&data).unwrap();
    let run = run(&data).unwrap();
    assert_invariants(&data, &run.payload.entries);
    if !run.relaxed {
        assert!(tt_core::scoring::count_violations(&run.payload.entries).is_clean());
    }
}

fn temp_output_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("timetable-{}-{}", name, std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn sample_run() -> (TimetableData, SolveRun) {
    let data = data_with(
        &[("A", &[(Day::Mon, &[1, 2])]), ("B", &[(Day::Mon, &[1])])],
        &[
            SessionTemplate::new("A", "A_1", "Math", 1, &["s1", "s2"]),
            SessionTemplate::new("A", "A_2", "Sci", 1, &["s1"]),
            SessionTemplate::new("B", "B_1", "Sci", 1, &["s3"]),
        ],
    );
    let run = run(&data).unwrap();
    (data, run)
}

#[test]
fn csv_rows_project_the_json_entries() {
    let (_, run) = sample_run();
    let dir = temp_output_dir("csv-agreement");
    write_outputs(&run.payload, run.csv_name, &dir).unwrap();

    let json: TimetablePayload =
        serde_json::from_str(&fs::read_to_string(dir.join(JSON_FILE)).unwrap()).unwrap();
    assert_eq!(json, run.payload);

    let mut reader = csv::Reader::from_path(dir.join(run.csv_name)).unwrap();
    assert_eq!(
        reader.headers().unwrap(),
        &csv::StringRecord::from(vec![
            "Day", "Slot", "Track", "Teacher", "Code", "Subject", "Students"
        ])
    );
    let records: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(records.len(), json.entries.len());
    for (record, entry) in records.iter().zip(&json.entries) {
        assert_eq!(&record[0], entry.day.as_str());
        assert_eq!(record[1].parse::<u8>().unwrap(), entry.slot);
        assert_eq!(record[2].parse::<u8>().unwrap(), entry.track);
        assert_eq!(&record[3], entry.teacher.as_str());
        assert_eq!(&record[4], entry.code.as_str());
        assert_eq!(&record[5], entry.subject.as_str());
        let students = entry
            .students
            .iter()
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        assert_eq!(&record[6], students.as_str());
    }

    fs::remove_dir_all(dir).unwrap();
}

#[test]
fn writing_one_timetable_removes_the_stale_one() {
    let (_, run) = sample_run();
    let dir = temp_output_dir("stale-removal");

    write_outputs(&run.payload, HARD_CSV, &dir).unwrap();
    assert!(dir.join(HARD_CSV).exists());

    write_outputs(&run.payload, SOFT_CSV, &dir).unwrap();
    assert!(dir.join(SOFT_CSV).exists());
    assert!(!dir.join(HARD_CSV).exists());

    write_outputs(&run.payload, HARD_CSV, &dir).unwrap();
    assert!(dir.join(HARD_CSV).exists());
    assert!(!dir.join(SOFT_CSV).exists());

    fs::remove_dir_all(dir).unwrap();
}
