pub mod scoring;

use itertools::Itertools;
use std::collections::{HashMap, HashSet};
use thiserror::Error;
use types::{
    Day, Entry, SessionInstance, Slot, TimetableData, SLOT_MAX, SLOT_MIN, TRACKS_PER_SLOT,
};

/// Penalty per student double-booked in one (day, slot).
pub const STUDENT_SLOT_WEIGHT: i32 = 1000;
/// Penalty per repeated subject for a student on one day.
pub const SUBJECT_PER_DAY_WEIGHT: i32 = 700;
/// Penalty per session above the daily limit for a student.
pub const DAILY_LOAD_WEIGHT: i32 = 500;
/// A student attends at most this many sessions per day.
pub const DAILY_SESSION_LIMIT: u32 = 3;

/// Tentative full assignment from the seeding heuristic, keyed by session uid.
pub type Seed = HashMap<String, (Day, Slot)>;

/// A solved placement before tracks are assigned.
pub type RawAssignment = (String, Day, Slot);

#[derive(Debug, Error)]
pub enum SolveError {
    #[error("no feasible (day, slot) pairs for session {0}")]
    UnschedulableSession(String),
    #[error("slot capacity exceeded for {day} slot {slot}")]
    SlotCapacityExceeded { day: Day, slot: Slot },
    #[error("Timetable infeasible even after relaxing soft constraints.")]
    Infeasible,
}

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("invalid timetable data: {0}")]
    Msg(String),
}

/// Feasible (day, slot) pairs for one session: canonical week order, slots
/// ascending within each day. Stable across runs for identical inputs.
pub fn candidates(data: &TimetableData, session: &SessionInstance) -> Vec<(Day, Slot)> {
    let mut pairs = Vec::new();
    for day in Day::ALL {
        for &slot in data.slots_on(day) {
            if data.is_teacher_available(&session.teacher, day, slot) {
                pairs.push((day, slot));
            }
        }
    }
    pairs
}

pub fn validate(data: &TimetableData) -> Result<(), ValidationError> {
    let mut errors: Vec<String> = Vec::new();

    for (day, slots) in &data.slots_by_day {
        for &slot in slots {
            if !(SLOT_MIN..=SLOT_MAX).contains(&slot) {
                errors.push(format!("day {day} permits out-of-range slot {slot}"));
            }
        }
    }

    let mut seen = HashSet::new();
    for session in &data.sessions {
        if !seen.insert(session.uid.as_str()) {
            errors.push(format!("duplicate session uid: {}", session.uid));
        }
        if session.students.is_empty() {
            errors.push(format!("session {} has no students", session.uid));
        }
        let unique: HashSet<_> = session.students.iter().collect();
        if unique.len() != session.students.len() {
            errors.push(format!("session {} lists a student twice", session.uid));
        }
        if candidates(data, session).is_empty() {
            errors.push(format!(
                "session {} has no feasible (day, slot) pair",
                session.uid
            ));
        }
    }

    for teacher in &data.teachers {
        let Some(avail) = data.teacher_availability.get(teacher) else {
            errors.push(format!("teacher {teacher} has no availability"));
            continue;
        };
        for &(day, slot) in avail {
            if !data.slots_on(day).contains(&slot) {
                errors.push(format!(
                    "teacher {teacher} availability {day} slot {slot} is outside the day's slot table"
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::Msg(errors.join("; ")))
    }
}

/// Turn solver output into the stable entry list: group by (day, slot),
/// order each group by (teacher, code, uid), number tracks from 1, then
/// sort everything by (day, slot, track, teacher, code).
pub fn canonicalize(data: &TimetableData, raw: &[RawAssignment]) -> Result<Vec<Entry>, SolveError> {
    let by_uid: HashMap<&str, &SessionInstance> =
        data.sessions.iter().map(|s| (s.uid.as_str(), s)).collect();

    let groups = raw
        .iter()
        .filter_map(|(uid, day, slot)| {
            by_uid
                .get(uid.as_str())
                .map(|session| ((*day, *slot), (*session, uid.as_str())))
        })
        .into_group_map();

    let mut entries = Vec::new();
    for ((day, slot), mut bucket) in groups {
        bucket.sort_by(|(a, a_uid), (b, b_uid)| {
            (&a.teacher, &a.code, *a_uid).cmp(&(&b.teacher, &b.code, *b_uid))
        });
        if bucket.len() > TRACKS_PER_SLOT {
            return Err(SolveError::SlotCapacityExceeded { day, slot });
        }
        for (idx, (session, _uid)) in bucket.into_iter().enumerate() {
            entries.push(Entry {
                day,
                slot,
                track: (idx + 1) as u8,
                teacher: session.teacher.clone(),
                code: session.code.clone(),
                subject: session.subject.clone(),
                students: session.students.clone(),
            });
        }
    }

    entries.sort_by(|a, b| {
        (a.day.index(), a.slot, a.track, &a.teacher, &a.code).cmp(&(
            b.day.index(),
            b.slot,
            b.track,
            &b.teacher,
            &b.code,
        ))
    });
    Ok(entries)
}
