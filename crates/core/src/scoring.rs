use std::collections::HashMap;
use types::{Day, Entry, Slot, StudentId};

use crate::{DAILY_LOAD_WEIGHT, DAILY_SESSION_LIMIT, STUDENT_SLOT_WEIGHT, SUBJECT_PER_DAY_WEIGHT};

/// Observable soft-rule breaches in a finished timetable. Each counter
/// equals the slack the relaxed model needs for the same entry list, so the
/// weighted total reproduces the soft-phase objective.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SoftViolations {
    pub student_slot_overlaps: u32,
    pub subject_duplicates: u32,
    pub daily_overloads: u32,
}

impl SoftViolations {
    pub fn weighted_total(&self) -> i64 {
        i64::from(self.student_slot_overlaps) * i64::from(STUDENT_SLOT_WEIGHT)
            + i64::from(self.subject_duplicates) * i64::from(SUBJECT_PER_DAY_WEIGHT)
            + i64::from(self.daily_overloads) * i64::from(DAILY_LOAD_WEIGHT)
    }

    pub fn is_clean(&self) -> bool {
        self.student_slot_overlaps == 0 && self.subject_duplicates == 0 && self.daily_overloads == 0
    }
}

pub fn count_violations(entries: &[Entry]) -> SoftViolations {
    let mut per_slot: HashMap<(&StudentId, Day, Slot), u32> = HashMap::new();
    let mut per_subject: HashMap<(&StudentId, Day, &str), u32> = HashMap::new();
    let mut per_day: HashMap<(&StudentId, Day), u32> = HashMap::new();

    for entry in entries {
        for student in &entry.students {
            *per_slot.entry((student, entry.day, entry.slot)).or_default() += 1;
            *per_subject
                .entry((student, entry.day, entry.subject.as_str()))
                .or_default() += 1;
            *per_day.entry((student, entry.day)).or_default() += 1;
        }
    }

    fn excess<K>(counts: &HashMap<K, u32>, limit: u32) -> u32 {
        counts.values().map(|&n| n.saturating_sub(limit)).sum()
    }

    SoftViolations {
        student_slot_overlaps: excess(&per_slot, 1),
        subject_duplicates: excess(&per_subject, 1),
        daily_overloads: excess(&per_day, DAILY_SESSION_LIMIT),
    }
}
