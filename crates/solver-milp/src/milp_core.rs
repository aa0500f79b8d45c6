use good_lp::{variable, ProblemVariables, Solution, Variable};
use std::collections::BTreeMap;
use tt_core::{RawAssignment, SolveError};
use types::{Day, Slot, TimetableData};

/// One decision variable: session `s` (index into `data.sessions`) runs at
/// (day, slot).
#[derive(Clone, Copy)]
pub(crate) struct AssignVar {
    pub s: usize,
    pub day: Day,
    pub slot: Slot,
    pub var: Variable,
}

/// Decision variables grouped by the constraint they participate in.
/// Buckets are sorted maps so the model is built identically on every run;
/// the `Vec`s inside keep variable-creation order.
pub(crate) struct ModelParts<'a> {
    pub assigns: Vec<AssignVar>,
    pub per_session: Vec<Vec<Variable>>,
    pub teacher_slot: BTreeMap<(&'a str, Day, Slot), Vec<Variable>>,
    pub slot_cap: BTreeMap<(Day, Slot), Vec<Variable>>,
    pub student_slot: BTreeMap<(&'a str, Day, Slot), Vec<Variable>>,
    pub student_subject: BTreeMap<(&'a str, Day, &'a str), Vec<Variable>>,
    pub student_daily: BTreeMap<(&'a str, Day), Vec<Variable>>,
}

pub(crate) fn declare_assignments<'a>(
    data: &'a TimetableData,
    vars: &mut ProblemVariables,
) -> Result<ModelParts<'a>, SolveError> {
    let mut parts = ModelParts {
        assigns: Vec::new(),
        per_session: vec![Vec::new(); data.sessions.len()],
        teacher_slot: BTreeMap::new(),
        slot_cap: BTreeMap::new(),
        student_slot: BTreeMap::new(),
        student_subject: BTreeMap::new(),
        student_daily: BTreeMap::new(),
    };

    for (si, session) in data.sessions.iter().enumerate() {
        for day in Day::ALL {
            for &slot in data.slots_on(day) {
                if !data.is_teacher_available(&session.teacher, day, slot) {
                    continue;
                }
                let var = vars.add(variable().binary());
                parts.assigns.push(AssignVar { s: si, day, slot, var });
                parts.per_session[si].push(var);
                parts
                    .teacher_slot
                    .entry((session.teacher.as_str(), day, slot))
                    .or_default()
                    .push(var);
                parts.slot_cap.entry((day, slot)).or_default().push(var);
                for student in &session.students {
                    parts
                        .student_slot
                        .entry((student.as_str(), day, slot))
                        .or_default()
                        .push(var);
                    parts
                        .student_subject
                        .entry((student.as_str(), day, session.subject.as_str()))
                        .or_default()
                        .push(var);
                    parts
                        .student_daily
                        .entry((student.as_str(), day))
                        .or_default()
                        .push(var);
                }
            }
        }
    }

    for (si, session_vars) in parts.per_session.iter().enumerate() {
        if session_vars.is_empty() {
            return Err(SolveError::UnschedulableSession(
                data.sessions[si].uid.clone(),
            ));
        }
    }
    Ok(parts)
}

/// `Σ vars ≤ limit`, optionally relaxable through a slack variable bounded
/// by how far the bucket could overshoot.
pub(crate) struct UpperBound {
    pub vars: Vec<Variable>,
    pub limit: u32,
    pub slack: Option<Variable>,
}

pub(crate) fn push_bound(
    bounds: &mut Vec<UpperBound>,
    penalties: &mut Vec<(Variable, i32)>,
    vars: &mut ProblemVariables,
    bucket: &[Variable],
    limit: u32,
    weight: i32,
    soft: bool,
) {
    if bucket.is_empty() {
        return;
    }
    // A bucket that cannot overshoot needs no slack even when relaxed.
    let slack = if soft && bucket.len() > limit as usize {
        let headroom = bucket.len() - limit as usize;
        let slack = vars.add(variable().integer().min(0.0).max(headroom as f64));
        penalties.push((slack, weight));
        Some(slack)
    } else {
        None
    };
    bounds.push(UpperBound {
        vars: bucket.to_vec(),
        limit,
        slack,
    });
}

pub(crate) fn extract(
    data: &TimetableData,
    parts: &ModelParts<'_>,
    solution: &impl Solution,
) -> Vec<RawAssignment> {
    parts
        .assigns
        .iter()
        .filter(|a| solution.value(a.var) > 0.5)
        .map(|a| (data.sessions[a.s].uid.clone(), a.day, a.slot))
        .collect()
}
