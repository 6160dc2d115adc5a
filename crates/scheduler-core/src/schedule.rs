//! `Schedule` — a (possibly partial) assignment of jobs to time slots.
//!
//! A `Schedule` is the search-tree node of the branch-and-bound solver: it
//! tracks which jobs have been decided up through slot `t`, and can be
//! [`expand`](Schedule::expand)ed into independent child schedules that
//! decide slot `t + 1`.

use std::sync::Arc;

use crate::error::{Result, SchedulerError};
use crate::job::Job;
use crate::objective::Objective;

/// A partial (or complete) assignment of jobs to time slots `0..total_slots`.
///
/// Cloning a `Schedule` deep-copies its mutable state (`assignment`,
/// `completed`, `counts`) but only bumps the reference count on the shared,
/// logically-immutable job set — matching the teacher's "children are
/// independent deep copies; no shared mutable state" design (`spec.md` §5).
#[derive(Debug, Clone)]
pub struct Schedule {
    jobs: Arc<[Job]>,
    total_slots: u64,
    /// `assignment[slot]` is the index into `jobs`, or `None` if idle.
    assignment: Vec<Option<u32>>,
    /// The last slot decided so far; `-1` before any slot has been assigned.
    t: i64,
    /// Per-job: number of slots assigned to the job so far.
    counts: Vec<u32>,
    /// Per-job: true iff `counts[j] == jobs[j].processing_time`.
    completed: Vec<bool>,
    lower_bound: Option<Objective>,
    upper_bound: Option<Objective>,
}

impl Schedule {
    /// Builds the root schedule: empty assignment, `t = -1`, no cached
    /// bounds. Rejects duplicate job ids.
    pub fn new(jobs: Vec<Job>, total_slots: u64) -> Result<Self> {
        for (i, a) in jobs.iter().enumerate() {
            for b in &jobs[i + 1..] {
                if a.id == b.id {
                    return Err(SchedulerError::InvalidInstance(format!(
                        "duplicate job id {:?}",
                        a.id
                    )));
                }
            }
        }
        let n = jobs.len();
        Ok(Schedule {
            jobs: jobs.into(),
            total_slots,
            assignment: vec![None; total_slots as usize],
            t: -1,
            counts: vec![0; n],
            completed: vec![false; n],
            lower_bound: None,
            upper_bound: None,
        })
    }

    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    pub fn total_slots(&self) -> u64 {
        self.total_slots
    }

    /// The last slot decided so far (`-1` if nothing has been assigned).
    pub fn current_slot(&self) -> i64 {
        self.t
    }

    /// The job assigned to `slot`, if any, by index into [`Schedule::jobs`].
    pub fn assignment_at(&self, slot: u64) -> Option<usize> {
        self.assignment[slot as usize].map(|i| i as usize)
    }

    pub fn is_completed(&self, job_index: usize) -> bool {
        self.completed[job_index]
    }

    /// Number of slots assigned to `job_index` so far.
    pub fn assigned_count(&self, job_index: usize) -> u64 {
        self.counts[job_index] as u64
    }

    /// True once every slot `0..total_slots` has been decided.
    pub fn is_terminal(&self) -> bool {
        self.t >= self.total_slots as i64 - 1
    }

    /// The last slot assigned to `job_index`, if any.
    pub fn last_slot_of(&self, job_index: usize) -> Option<u64> {
        self.assignment
            .iter()
            .enumerate()
            .rev()
            .find(|(_, a)| **a == Some(job_index as u32))
            .map(|(slot, _)| slot as u64)
    }

    /// Jobs eligible to occupy `slot`: not yet completed, released, and
    /// still within their max-useful-tardiness window (`spec.md` §4.3.1).
    pub fn schedulable_at(&self, slot: u64) -> Vec<usize> {
        (0..self.jobs.len())
            .filter(|&j| {
                !self.completed[j]
                    && self.jobs[j].release_time <= slot
                    && slot < self.jobs[j].max_useful_slot_exclusive(self.total_slots)
            })
            .collect()
    }

    /// Returns all legal one-slot extensions of this node at slot `t + 1`.
    ///
    /// Empty if this node is terminal. If no job is schedulable at `t + 1`,
    /// returns a single child with that slot left idle. Otherwise returns one
    /// child per schedulable job, each a full deep copy with that job (and
    /// only that job) assigned to the slot. Bound caches are cleared on every
    /// child.
    pub fn expand(&self) -> Vec<Schedule> {
        if self.is_terminal() {
            return Vec::new();
        }
        let next_slot = (self.t + 1) as u64;
        let schedulable = self.schedulable_at(next_slot);

        if schedulable.is_empty() {
            let mut child = self.clone();
            child.t = self.t + 1;
            child.lower_bound = None;
            child.upper_bound = None;
            return vec![child];
        }

        schedulable
            .into_iter()
            .map(|job_index| {
                let mut child = self.clone();
                child.assignment[next_slot as usize] = Some(job_index as u32);
                child.counts[job_index] += 1;
                if child.counts[job_index] as u64 == child.jobs[job_index].processing_time {
                    child.completed[job_index] = true;
                }
                child.t = self.t + 1;
                child.lower_bound = None;
                child.upper_bound = None;
                child
            })
            .collect()
    }

    /// The exact terminal objective, also meaningful on a partial schedule
    /// as an "assume-rest-idle" evaluation (`spec.md` §4.3.2).
    pub fn score(&self) -> Objective {
        let mut total = 0.0;
        for (j, job) in self.jobs.iter().enumerate() {
            if self.completed[j] {
                let last = self.last_slot_of(j).expect("completed job has an assigned slot");
                total += job.reward - job.tardiness_penalty(last);
            } else {
                total -= job.drop_penalty;
            }
        }
        Objective::of(total)
    }

    /// Checks the §3 invariants. Used by property tests; never called on the
    /// solver's hot path since `expand` cannot produce a violating child.
    pub fn check_invariants(&self) -> Result<()> {
        for slot in 0..self.total_slots {
            if let Some(job_index) = self.assignment_at(slot) {
                let job = &self.jobs[job_index];
                if !(job.release_time <= slot && slot < job.max_useful_slot_exclusive(self.total_slots)) {
                    return Err(SchedulerError::InvariantViolation(format!(
                        "job {:?} assigned to slot {slot} outside [release_time, deadline + t*)",
                        job.id
                    )));
                }
            }
        }
        for (j, job) in self.jobs.iter().enumerate() {
            let assigned = self.assignment.iter().filter(|a| **a == Some(j as u32)).count() as u64;
            if assigned > job.processing_time {
                return Err(SchedulerError::InvariantViolation(format!(
                    "job {:?} assigned {assigned} slots, more than its processing_time {}",
                    job.id, job.processing_time
                )));
            }
            if self.completed[j] != (assigned == job.processing_time) {
                return Err(SchedulerError::InvariantViolation(format!(
                    "job {:?} completed flag disagrees with assigned slot count",
                    job.id
                )));
            }
        }
        Ok(())
    }

    /// Lazily computes and caches the greedy-EDF lower bound for this node.
    pub fn lower_bound(&mut self) -> Objective {
        if let Some(v) = self.lower_bound {
            return v;
        }
        let v = crate::bounds::lower::lower_bound(self);
        self.lower_bound = Some(v);
        v
    }

    /// Lazily computes and caches the LP-relaxation upper bound for this
    /// node.
    pub fn upper_bound(&mut self) -> Result<Objective> {
        if let Some(v) = self.upper_bound {
            return Ok(v);
        }
        let v = crate::bounds::upper::upper_bound(self)?;
        self.upper_bound = Some(v);
        Ok(v)
    }

    /// The cached lower bound, if one has already been computed.
    pub fn cached_lower_bound(&self) -> Option<Objective> {
        self.lower_bound
    }

    /// The cached upper bound, if one has already been computed.
    pub fn cached_upper_bound(&self) -> Option<Objective> {
        self.upper_bound
    }

    /// Builds a terminal schedule from an externally supplied assignment,
    /// rather than by search — the entry point for `--solution <path>`
    /// scoring mode (`spec.md` §6.3). Does not enforce the §3 feasibility
    /// invariants (an external solution may be infeasible); call
    /// [`Schedule::check_invariants`] afterwards if that matters to the
    /// caller. `score()` is well-defined regardless.
    pub fn from_assignment(
        jobs: Vec<Job>,
        total_slots: u64,
        assignment: Vec<Option<usize>>,
    ) -> Result<Self> {
        let mut schedule = Schedule::new(jobs, total_slots)?;
        if assignment.len() != total_slots as usize {
            return Err(SchedulerError::InvalidInstance(format!(
                "assignment has {} slots, expected {total_slots}",
                assignment.len()
            )));
        }
        for (slot, job_index) in assignment.into_iter().enumerate() {
            if let Some(j) = job_index {
                if j >= schedule.jobs.len() {
                    return Err(SchedulerError::InvalidInstance(format!(
                        "assignment references job index {j}, but only {} jobs exist",
                        schedule.jobs.len()
                    )));
                }
            }
            schedule.assignment[slot] = job_index.map(|j| j as u32);
        }
        for j in 0..schedule.jobs.len() {
            let count = schedule.assignment.iter().filter(|a| **a == Some(j as u32)).count() as u32;
            schedule.counts[j] = count;
            schedule.completed[j] = count as u64 == schedule.jobs[j].processing_time;
        }
        schedule.t = total_slots as i64 - 1;
        Ok(schedule)
    }

    /// Decides slot `t + 1` in place, assigning it to `job_index` (or leaving
    /// it idle if `None`), and clears the cached bounds.
    ///
    /// Crate-internal: used by the greedy EDF completion heuristic and the
    /// online policy, both of which walk forward through a single decision
    /// per slot rather than branching over every [`Schedule::expand`]
    /// candidate.
    pub(crate) fn force_assign_next(&mut self, job_index: Option<usize>) {
        debug_assert!(!self.is_terminal());
        let next_slot = (self.t + 1) as u64;
        if let Some(j) = job_index {
            self.assignment[next_slot as usize] = Some(j as u32);
            self.counts[j] += 1;
            if self.counts[j] as u64 == self.jobs[j].processing_time {
                self.completed[j] = true;
            }
        }
        self.t += 1;
        self.lower_bound = None;
        self.upper_bound = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::penalty::PenaltyFunction;

    fn job(id: &str, r: u64, p: u64, d: u64, w: f64, delta: f64, slope: f64, intercept: f64) -> Job {
        Job::new(id, r, p, d, w, delta, PenaltyFunction::linear(slope, intercept).unwrap()).unwrap()
    }

    #[test]
    fn s1_single_on_time_job() {
        // T=3; job a r=0 p=2 d=2 w=10 δ=1 linear s=1 c=0
        let a = job("a", 0, 2, 2, 10.0, 1.0, 1.0, 0.0);
        let mut sched = Schedule::new(vec![a], 3).unwrap();
        assert!(!sched.is_terminal());

        let children = sched.expand();
        assert_eq!(children.len(), 1);
        sched = children.into_iter().next().unwrap();
        assert_eq!(sched.assignment_at(0), Some(0));

        let children = sched.expand();
        assert_eq!(children.len(), 1);
        sched = children.into_iter().next().unwrap();
        assert_eq!(sched.assignment_at(1), Some(0));
        assert!(sched.is_completed(0));

        let children = sched.expand();
        assert_eq!(children.len(), 1);
        sched = children.into_iter().next().unwrap();
        assert_eq!(sched.assignment_at(2), None);
        assert!(sched.is_terminal());

        assert_eq!(sched.score(), Objective::of(10.0));
        sched.check_invariants().unwrap();
    }

    #[test]
    fn s6_unreachable_release_drops_job() {
        // T=3; a r=2 p=2 d=4 w=5 δ=3 linear 1,0 -> only one slot after release
        let a = job("a", 2, 2, 4, 5.0, 3.0, 1.0, 0.0);
        let mut sched = Schedule::new(vec![a], 3).unwrap();
        // advance to slot 2 (idle at 0, 1)
        for _ in 0..3 {
            let children = sched.expand();
            sched = children.into_iter().next().unwrap();
        }
        assert!(sched.is_terminal());
        assert!(!sched.is_completed(0));
        assert_eq!(sched.score(), Objective::of(-3.0));
    }

    #[test]
    fn expand_on_terminal_is_empty() {
        let a = job("a", 0, 1, 1, 1.0, 0.0, 1.0, 0.0);
        let mut sched = Schedule::new(vec![a], 1).unwrap();
        let children = sched.expand();
        assert_eq!(children.len(), 1);
        sched = children.into_iter().next().unwrap();
        assert!(sched.is_terminal());
        assert!(sched.expand().is_empty());
    }

    #[test]
    fn duplicate_ids_rejected() {
        let a = job("a", 0, 1, 1, 1.0, 0.0, 1.0, 0.0);
        let b = job("a", 0, 1, 1, 1.0, 0.0, 1.0, 0.0);
        assert!(Schedule::new(vec![a, b], 5).is_err());
    }

    #[test]
    fn from_assignment_scores_an_external_solution() {
        let a = job("a", 0, 2, 2, 10.0, 1.0, 1.0, 0.0);
        let sched =
            Schedule::from_assignment(vec![a], 3, vec![Some(0), Some(0), None]).unwrap();
        assert!(sched.is_terminal());
        assert!(sched.is_completed(0));
        assert_eq!(sched.score(), Objective::of(10.0));
        sched.check_invariants().unwrap();
    }

    #[test]
    fn from_assignment_rejects_wrong_length() {
        let a = job("a", 0, 2, 2, 10.0, 1.0, 1.0, 0.0);
        assert!(Schedule::from_assignment(vec![a], 3, vec![Some(0), Some(0)]).is_err());
    }

    #[test]
    fn from_assignment_allows_infeasible_solutions_to_be_scored() {
        // Job "a" has release_time 1, but we externally assign it slot 0;
        // from_assignment doesn't enforce feasibility, only check_invariants does.
        let a = job("a", 1, 1, 2, 10.0, 1.0, 1.0, 0.0);
        let sched = Schedule::from_assignment(vec![a], 2, vec![Some(0), None]).unwrap();
        assert!(sched.check_invariants().is_err());
    }
}
