use std::cmp::Reverse;
use std::collections::{HashMap, HashSet};
use tracing::debug;
use tt_core::{candidates, Seed, DAILY_SESSION_LIMIT};
use types::{Day, SessionInstance, Slot, TimetableData, TRACKS_PER_SLOT};

/// Running occupancy while the seed is built. Keys borrow from the dataset.
#[derive(Default)]
struct SeedState<'a> {
    slot_load: HashMap<(Day, Slot), u32>,
    teacher_busy: HashSet<(&'a str, Day, Slot)>,
    student_busy: HashSet<(&'a str, Day, Slot)>,
    student_subject: HashSet<(&'a str, Day, &'a str)>,
    daily_count: HashMap<(&'a str, Day), u32>,
}

impl<'a> SeedState<'a> {
    fn admits(&self, session: &'a SessionInstance, day: Day, slot: Slot) -> bool {
        if self
            .teacher_busy
            .contains(&(session.teacher.as_str(), day, slot))
        {
            return false;
        }
        if self.load(day, slot) as usize >= TRACKS_PER_SLOT {
            return false;
        }
        for student in &session.students {
            if self.student_busy.contains(&(student.as_str(), day, slot)) {
                return false;
            }
            if self
                .student_subject
                .contains(&(student.as_str(), day, session.subject.as_str()))
            {
                return false;
            }
            if self
                .daily_count
                .get(&(student.as_str(), day))
                .copied()
                .unwrap_or(0)
                >= DAILY_SESSION_LIMIT
            {
                return false;
            }
        }
        true
    }

    fn commit(&mut self, session: &'a SessionInstance, day: Day, slot: Slot) {
        *self.slot_load.entry((day, slot)).or_default() += 1;
        self.teacher_busy
            .insert((session.teacher.as_str(), day, slot));
        for student in &session.students {
            self.student_busy.insert((student.as_str(), day, slot));
            self.student_subject
                .insert((student.as_str(), day, session.subject.as_str()));
            *self.daily_count.entry((student.as_str(), day)).or_default() += 1;
        }
    }

    fn load(&self, day: Day, slot: Slot) -> u32 {
        self.slot_load.get(&(day, slot)).copied().unwrap_or(0)
    }
}

/// Greedy most-constrained-first construction of a tentative assignment
/// that honors every rule, hard and soft. The result primes the MILP phase
/// as a warm start or a set of pins. `None` means no seed could be built;
/// the solve then runs unseeded.
pub fn build_seed(data: &TimetableData) -> Option<Seed> {
    let all_candidates: HashMap<&str, Vec<(Day, Slot)>> = data
        .sessions
        .iter()
        .map(|s| (s.uid.as_str(), candidates(data, s)))
        .collect();

    // Fewest placements first, larger classes first, then a stable tiebreak.
    let mut order: Vec<&SessionInstance> = data.sessions.iter().collect();
    order.sort_by(|a, b| {
        (
            all_candidates[a.uid.as_str()].len(),
            Reverse(a.students.len()),
            &a.teacher,
            &a.code,
        )
            .cmp(&(
                all_candidates[b.uid.as_str()].len(),
                Reverse(b.students.len()),
                &b.teacher,
                &b.code,
            ))
    });

    let mut state = SeedState::default();
    let mut seed = Seed::new();

    for session in order {
        let mut slots = all_candidates[session.uid.as_str()].clone();
        if slots.is_empty() {
            debug!(uid = %session.uid, "session has no candidates, aborting seed");
            return None;
        }
        // Spread the week: least-loaded slot first, then earliest.
        slots.sort_by_key(|&(day, slot)| (state.load(day, slot), day.index(), slot));

        let Some((day, slot)) = slots
            .into_iter()
            .find(|&(day, slot)| state.admits(session, day, slot))
        else {
            debug!(uid = %session.uid, "no admissible candidate, aborting seed");
            return None;
        };

        state.commit(session, day, slot);
        seed.insert(session.uid.clone(), (day, slot));
    }

    debug!(sessions = seed.len(), "seed constructed");
    Some(seed)
}
