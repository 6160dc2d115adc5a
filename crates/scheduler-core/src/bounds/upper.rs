//! LP-relaxation upper bound.
//!
//! Relaxes the remaining-horizon ILP to a continuous LP and solves it with
//! [`good_lp`]'s pure-Rust `microlp` backend. Two formulations are used
//! depending on the shape of the jobs' penalty functions: a continuous
//! tardiness surrogate for all-linear instances, and a discrete level
//! formulation otherwise (`spec.md` §4.5).

use good_lp::{constraint, microlp, variable, variables, Expression, Solution, SolverModel, Variable};

use crate::error::{Result, SchedulerError};
use crate::job::Job;
use crate::objective::Objective;
use crate::penalty::PenaltyFunction;
use crate::schedule::Schedule;

/// Computes the LP-relaxation upper bound for `schedule`, without mutating
/// it. Dispatches on whether every job uses a linear penalty function.
pub fn upper_bound(schedule: &Schedule) -> Result<Objective> {
    if PenaltyFunction::all_linear(schedule.jobs().iter().map(|j| &j.penalty_function)) {
        solve_linear(schedule)
    } else {
        solve_step(schedule)
    }
}

/// Per-job statistics about slots already decided (`0..=current_slot`),
/// folded into the LP as constants rather than as variables.
struct FixedStats {
    /// Number of already-decided slots assigned to the job.
    count: u64,
    /// Tardiness implied by the job's last already-decided slot, if any.
    tardiness_floor: u64,
    /// Number of already-decided slots at or beyond the job's deadline.
    late_count: u64,
}

fn fixed_stats(schedule: &Schedule, job_index: usize, job: &Job) -> FixedStats {
    let current_t = schedule.current_slot();
    let mut count = 0u64;
    let mut last_slot = None;
    let mut late_count = 0u64;
    if current_t >= 0 {
        for slot in 0..=(current_t as u64) {
            if schedule.assignment_at(slot) == Some(job_index) {
                count += 1;
                last_slot = Some(slot);
                if slot >= job.deadline {
                    late_count += 1;
                }
            }
        }
    }
    let tardiness_floor = last_slot.map(|s| job.tardiness(s)).unwrap_or(0);
    FixedStats { count, tardiness_floor, late_count }
}

/// The half-open range of slots still free to assign job `job` a fraction
/// of, i.e. strictly after `current_slot`, within `[release_time, deadline +
/// t*)`.
fn free_slot_range(schedule: &Schedule, job: &Job) -> std::ops::Range<u64> {
    let start = (schedule.current_slot() + 1).max(0) as u64;
    let start = start.max(job.release_time);
    let end = job.max_useful_slot_exclusive(schedule.total_slots()).min(schedule.total_slots());
    start..end.max(start)
}

fn lp_failure(reason: impl Into<String>, jobs: usize, slots: usize, constraints: usize) -> SchedulerError {
    SchedulerError::LPFailure { reason: reason.into(), jobs, slots, constraints }
}

/// §4.5.1 — continuous tardiness surrogate, used when every job is linear.
fn solve_linear(schedule: &Schedule) -> Result<Objective> {
    let jobs = schedule.jobs();
    let total_slots = schedule.total_slots();

    let mut vars = variables!();
    let mut x: Vec<Vec<Option<Variable>>> = Vec::with_capacity(jobs.len());
    let mut y: Vec<Variable> = Vec::with_capacity(jobs.len());
    let mut tau: Vec<Variable> = Vec::with_capacity(jobs.len());
    let mut z: Vec<Variable> = Vec::with_capacity(jobs.len());
    let mut fixed: Vec<FixedStats> = Vec::with_capacity(jobs.len());

    for (j, job) in jobs.iter().enumerate() {
        let stats = fixed_stats(schedule, j, job);
        let range = free_slot_range(schedule, job);
        let mut row = vec![None; total_slots as usize];
        for t in range {
            row[t as usize] = Some(vars.add(variable().min(0.0).max(1.0)));
        }
        x.push(row);
        y.push(vars.add(variable().min(0.0).max(1.0)));
        tau.push(vars.add(variable().min(stats.tardiness_floor as f64)));
        z.push(vars.add(variable().min(0.0).max(1.0)));
        fixed.push(stats);
    }

    let mut objective = Expression::from(0.0);
    for (j, job) in jobs.iter().enumerate() {
        let (slope, intercept) = match &job.penalty_function {
            PenaltyFunction::Linear { slope, intercept } => (*slope, *intercept),
            PenaltyFunction::Step { .. } => {
                unreachable!("solve_linear is only called when every job is linear")
            }
        };
        let what = job.reward + job.drop_penalty;
        objective = objective + what * y[j] - slope * tau[j] - intercept * z[j];
    }

    let mut constraints = Vec::new();

    // 1. Capacity.
    for t in 0..total_slots {
        let mut expr = Expression::from(0.0);
        for row in &x {
            if let Some(v) = row[t as usize] {
                expr = expr + v;
            }
        }
        constraints.push(constraint!(expr <= 1.0));
    }

    for (j, job) in jobs.iter().enumerate() {
        // 2. Tardiness flag.
        constraints.push(constraint!(z[j] - tau[j] <= 0.0));

        // 3. Late mass bounded by flag * capacity.
        let mut late_expr = Expression::from(fixed[j].late_count as f64);
        for t in job.deadline..total_slots {
            if let Some(v) = x[j][t as usize] {
                late_expr = late_expr + v;
            }
        }
        constraints.push(constraint!(late_expr - (job.processing_time as f64) * z[j] <= 0.0));

        // 4. Per-slot tardiness (free slots only; fixed slots are folded
        // into `tau`'s lower bound above).
        for t in job.deadline..total_slots {
            if let Some(v) = x[j][t as usize] {
                let coeff = (t - job.deadline) as f64;
                constraints.push(constraint!(coeff * v - tau[j] <= 0.0));
            }
        }

        // 5. Total work == processing, with already-decided work folded in.
        let mut work_expr = Expression::from(0.0);
        for t in 0..total_slots {
            if let Some(v) = x[j][t as usize] {
                work_expr = work_expr + v;
            }
        }
        constraints.push(constraint!(
            work_expr - (job.processing_time as f64) * y[j] == -(fixed[j].count as f64)
        ));
    }

    let njobs = jobs.len();
    let nslots = total_slots as usize;
    let nconstraints = constraints.len();

    let mut model = vars.maximise(objective.clone()).using(microlp);
    for c in constraints {
        model = model.with(c);
    }
    let solution = model
        .solve()
        .map_err(|e| lp_failure(e.to_string(), njobs, nslots, nconstraints))?;

    Ok(Objective::of(solution.eval(&objective)))
}

/// §4.5.2 — discrete tardiness-level formulation, used whenever any job's
/// penalty function is not linear. Also valid for all-linear instances (a
/// linear function is representable as a step with `t*_j + 1` levels), so it
/// doubles as the mixed-set fallback (`spec.md` §4.5.3).
fn solve_step(schedule: &Schedule) -> Result<Objective> {
    let jobs = schedule.jobs();
    let total_slots = schedule.total_slots();

    let mut vars = variables!();
    let mut x: Vec<Vec<Option<Variable>>> = Vec::with_capacity(jobs.len());
    let mut y: Vec<Variable> = Vec::with_capacity(jobs.len());
    // q[j][k] for k = 0..=t_star_j.
    let mut q: Vec<Vec<Variable>> = Vec::with_capacity(jobs.len());
    let mut levels: Vec<Vec<f64>> = Vec::with_capacity(jobs.len());
    let mut fixed: Vec<FixedStats> = Vec::with_capacity(jobs.len());

    for (j, job) in jobs.iter().enumerate() {
        let stats = fixed_stats(schedule, j, job);
        let range = free_slot_range(schedule, job);
        let mut row = vec![None; total_slots as usize];
        for t in range {
            row[t as usize] = Some(vars.add(variable().min(0.0).max(1.0)));
        }
        x.push(row);
        y.push(vars.add(variable().min(0.0).max(1.0)));

        let t_star = job.t_star(total_slots);
        let mut job_levels = Vec::with_capacity(t_star as usize + 1);
        let mut job_q = Vec::with_capacity(t_star as usize + 1);
        for k in 0..=t_star {
            let a = if k == 0 { 0.0 } else { job.penalty_function.evaluate(k) };
            job_levels.push(a);
            job_q.push(vars.add(variable().min(0.0).max(1.0)));
        }
        levels.push(job_levels);
        q.push(job_q);
        fixed.push(stats);
    }

    let mut objective = Expression::from(0.0);
    for (j, job) in jobs.iter().enumerate() {
        let what = job.reward + job.drop_penalty;
        objective = objective + what * y[j];
        for (k, &a) in levels[j].iter().enumerate() {
            if a != 0.0 {
                objective = objective - a * q[j][k];
            }
        }
    }

    let mut constraints = Vec::new();

    // 1. Capacity.
    for t in 0..total_slots {
        let mut expr = Expression::from(0.0);
        for row in &x {
            if let Some(v) = row[t as usize] {
                expr = expr + v;
            }
        }
        constraints.push(constraint!(expr <= 1.0));
    }

    for (j, job) in jobs.iter().enumerate() {
        // Level indicators form a (relaxed) convex combination.
        let mut q_sum = Expression::from(0.0);
        let mut weighted_level = Expression::from(0.0);
        for (k, &qv) in q[j].iter().enumerate() {
            q_sum = q_sum + qv;
            if k != 0 {
                weighted_level = weighted_level + (k as f64) * qv;
            }
        }
        constraints.push(constraint!(q_sum <= 1.0));
        // Already-decided tardiness must be covered by the chosen levels.
        constraints.push(constraint!(
            weighted_level.clone() >= fixed[j].tardiness_floor as f64
        ));

        // Per-slot tardiness, free slots only.
        for t in job.deadline..total_slots {
            if let Some(v) = x[j][t as usize] {
                let coeff = (t - job.deadline) as f64;
                constraints.push(constraint!(coeff * v <= weighted_level.clone()));
            }
        }

        // Total work == processing, with already-decided work folded in.
        let mut work_expr = Expression::from(0.0);
        for t in 0..total_slots {
            if let Some(v) = x[j][t as usize] {
                work_expr = work_expr + v;
            }
        }
        constraints.push(constraint!(
            work_expr - (job.processing_time as f64) * y[j] == -(fixed[j].count as f64)
        ));
    }

    let njobs = jobs.len();
    let nslots = total_slots as usize;
    let nconstraints = constraints.len();

    let mut model = vars.maximise(objective.clone()).using(microlp);
    for c in constraints {
        model = model.with(c);
    }
    let solution = model
        .solve()
        .map_err(|e| lp_failure(e.to_string(), njobs, nslots, nconstraints))?;

    Ok(Objective::of(solution.eval(&objective)))
}
