//! Two-phase solve orchestration: greedy seed, hard model (seed-forced,
//! then seed-hinted), and finally the soft-relaxed model. Each phase is a
//! blocking call bounded by its wall-clock budget.

use solver_heur::build_seed;
use solver_milp::solve_once;
use tracing::info;
use tt_core::{canonicalize, scoring, SolveError};
use types::{TimetableData, TimetablePayload};

pub const HARD_SOLVER_TIME: f64 = 5.0;
pub const SOFT_SOLVER_TIME: f64 = 15.0;
/// Verifying a seeded point is quick, so the forced run always gets this
/// fixed budget rather than the hard-phase limit.
pub const SEED_FORCED_TIME: f64 = 5.0;

pub const HARD_CSV: &str = "timetable.csv";
pub const SOFT_CSV: &str = "relaxed_timetable.csv";

pub struct SolveRun {
    pub payload: TimetablePayload,
    pub csv_name: &'static str,
    pub relaxed: bool,
}

pub fn run(data: &TimetableData) -> Result<SolveRun, SolveError> {
    let seed = build_seed(data);
    match &seed {
        Some(seed) => info!(sessions = seed.len(), "greedy seed constructed"),
        None => info!("greedy seeding failed, solving without a seed"),
    }

    let hard = match &seed {
        Some(seed) => {
            match solve_once(data, false, SEED_FORCED_TIME, Some(seed), true)? {
                Some(outcome) => Some(outcome),
                // The pinned point did not verify; retry with the seed as a
                // warm start only.
                None => solve_once(data, false, HARD_SOLVER_TIME, Some(seed), false)?,
            }
        }
        None => solve_once(data, false, HARD_SOLVER_TIME, None, false)?,
    };

    if let Some(outcome) = hard {
        let entries = canonicalize(data, &outcome.raw)?;
        info!(entries = entries.len(), "hard phase solved");
        return Ok(SolveRun {
            payload: TimetablePayload::new(data, entries),
            csv_name: HARD_CSV,
            relaxed: false,
        });
    }

    info!("hard phase found no solution, relaxing soft constraints");
    let Some(outcome) = solve_once(data, true, SOFT_SOLVER_TIME, seed.as_ref(), false)? else {
        return Err(SolveError::Infeasible);
    };
    let entries = canonicalize(data, &outcome.raw)?;
    let violations = scoring::count_violations(&entries);
    info!(
        objective = outcome.objective,
        student_slot_overlaps = violations.student_slot_overlaps,
        subject_duplicates = violations.subject_duplicates,
        daily_overloads = violations.daily_overloads,
        "soft phase solved"
    );
    Ok(SolveRun {
        payload: TimetablePayload::new(data, entries),
        csv_name: SOFT_CSV,
        relaxed: true,
    })
}
