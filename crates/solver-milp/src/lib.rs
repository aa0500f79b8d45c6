mod milp_core;

use milp_core::*;

use good_lp::{default_solver, Expression, ProblemVariables, ResolutionError, SolverModel};
use good_lp::{Solution, WithInitialSolution};
use tracing::{debug, warn};
use tt_core::{
    RawAssignment, Seed, SolveError, DAILY_LOAD_WEIGHT, DAILY_SESSION_LIMIT, STUDENT_SLOT_WEIGHT,
    SUBJECT_PER_DAY_WEIGHT,
};
use types::{TimetableData, TRACKS_PER_SLOT};

/// Parallel branch-and-bound workers handed to HiGHS for every phase.
pub const SEARCH_WORKERS: i32 = 8;

pub struct SolveOutcome {
    pub raw: Vec<RawAssignment>,
    pub objective: f64,
}

/// Build the assignment model and run one bounded solve.
///
/// `relax = false` keeps every rule hard and looks for any feasible point.
/// `relax = true` turns the three student rules into slack-backed bounds and
/// minimises the weighted slack sum. Teacher exclusivity and the per-slot
/// track capacity stay hard either way.
///
/// A seed is applied as a warm start; with `force_seed` it is pinned through
/// equality constraints instead, restricting the search to the seeded point.
pub fn solve_once(
    data: &TimetableData,
    relax: bool,
    time_limit: f64,
    seed: Option<&Seed>,
    force_seed: bool,
) -> Result<Option<SolveOutcome>, SolveError> {
    let mut vars = ProblemVariables::new();
    let parts = declare_assignments(data, &mut vars)?;

    let mut bounds = Vec::new();
    let mut penalties = Vec::new();
    for bucket in parts.teacher_slot.values() {
        push_bound(&mut bounds, &mut penalties, &mut vars, bucket, 1, 0, false);
    }
    for bucket in parts.slot_cap.values() {
        push_bound(
            &mut bounds,
            &mut penalties,
            &mut vars,
            bucket,
            TRACKS_PER_SLOT as u32,
            0,
            false,
        );
    }
    for bucket in parts.student_slot.values() {
        push_bound(
            &mut bounds,
            &mut penalties,
            &mut vars,
            bucket,
            1,
            STUDENT_SLOT_WEIGHT,
            relax,
        );
    }
    for bucket in parts.student_subject.values() {
        push_bound(
            &mut bounds,
            &mut penalties,
            &mut vars,
            bucket,
            1,
            SUBJECT_PER_DAY_WEIGHT,
            relax,
        );
    }
    for bucket in parts.student_daily.values() {
        push_bound(
            &mut bounds,
            &mut penalties,
            &mut vars,
            bucket,
            DAILY_SESSION_LIMIT,
            DAILY_LOAD_WEIGHT,
            relax,
        );
    }

    // Without relaxation there are no penalty terms and this minimises a
    // constant, i.e. a pure feasibility run.
    let mut objective = Expression::from(0.0);
    for (slack, weight) in &penalties {
        objective += f64::from(*weight) * *slack;
    }

    let mut model = vars
        .minimise(objective.clone())
        .using(default_solver)
        .set_option("time_limit", time_limit)
        .set_option("parallel", "on")
        .set_option("threads", SEARCH_WORKERS)
        .set_option("log_to_console", "false");

    if let Some(seed) = seed {
        let hint: Vec<_> = parts
            .assigns
            .iter()
            .filter_map(|a| {
                seed.get(&data.sessions[a.s].uid).map(|&(day, slot)| {
                    let value = if (a.day, a.slot) == (day, slot) { 1.0 } else { 0.0 };
                    (a.var, value)
                })
            })
            .collect();
        if !hint.is_empty() {
            model = model.with_initial_solution(hint);
        }
    }

    for session_vars in &parts.per_session {
        let chosen: Expression = session_vars.iter().copied().sum();
        model = model.with(chosen.eq(1.0));
    }
    for bound in &bounds {
        let total: Expression = bound.vars.iter().copied().sum();
        let constraint = match bound.slack {
            Some(slack) => (total - slack).leq(f64::from(bound.limit)),
            None => total.leq(f64::from(bound.limit)),
        };
        model = model.with(constraint);
    }

    if force_seed {
        if let Some(seed) = seed {
            for a in &parts.assigns {
                if let Some(&(day, slot)) = seed.get(&data.sessions[a.s].uid) {
                    let pinned = if (a.day, a.slot) == (day, slot) { 1.0 } else { 0.0 };
                    model = model.with(Expression::from(a.var).eq(pinned));
                }
            }
        }
    }

    match model.solve() {
        Ok(solution) => {
            let raw = extract(data, &parts, &solution);
            let objective = solution.eval(objective);
            debug!(
                relax,
                force_seed,
                objective,
                placed = raw.len(),
                "solver returned a solution"
            );
            Ok(Some(SolveOutcome { raw, objective }))
        }
        Err(ResolutionError::Infeasible) => Ok(None),
        Err(e) => {
            warn!(relax, force_seed, error = %e, "solver returned no solution");
            Ok(None)
        }
    }
}
