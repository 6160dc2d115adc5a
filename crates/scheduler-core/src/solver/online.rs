//! `OnlineSolver` — greedy utility policy, one slot at a time.

use tracing::trace;

use crate::error::Result;
use crate::job::Job;
use crate::schedule::Schedule;

/// Configuration for [`OnlineSolver`]. Currently empty: the greedy policy
/// has no tunable parameters (`spec.md` §4.7 never fails and needs no
/// budget), but the type exists for symmetry with [`super::offline::OfflineSearchConfig`]
/// and as an extension point.
#[derive(Debug, Clone, Default)]
pub struct OnlineConfig {}

/// Greedy online scheduler: at each slot, assigns the schedulable job with
/// the greatest utility, never looking ahead or backtracking.
pub struct OnlineSolver {
    #[allow(dead_code)]
    config: OnlineConfig,
}

impl OnlineSolver {
    pub fn new(config: OnlineConfig) -> Self {
        OnlineSolver { config }
    }

    /// Runs the greedy policy to completion. Never fails: worst case, every
    /// job is dropped and every slot stays idle.
    pub fn solve(&self, jobs: Vec<Job>, total_slots: u64) -> Result<Schedule> {
        let mut schedule = Schedule::new(jobs, total_slots)?;

        while !schedule.is_terminal() {
            let next_slot = (schedule.current_slot() + 1) as u64;
            let choice = schedule
                .schedulable_at(next_slot)
                .into_iter()
                .map(|j| (j, utility(&schedule, j, next_slot)))
                .max_by(|(ja, ua), (jb, ub)| {
                    ua.total_cmp(ub).then_with(|| {
                        schedule.jobs()[*jb].id.cmp(&schedule.jobs()[*ja].id)
                    })
                })
                .map(|(j, _)| j);

            if let Some(j) = choice {
                trace!(slot = next_slot, job = %schedule.jobs()[j].id, "online assignment");
            }
            schedule.force_assign_next(choice);
        }

        Ok(schedule)
    }
}

/// `u_j(t) = (w_j - c_j(t)) / p_j`, where `c_j(t)` is the tardiness penalty
/// job `j` would incur if it ran to completion starting at `t` without
/// interruption.
fn utility(schedule: &Schedule, job_index: usize, t: u64) -> f64 {
    let job = &schedule.jobs()[job_index];
    let remaining = job.processing_time - schedule.assigned_count(job_index);
    let earliest_completion = t + remaining - 1;
    let penalty = job.tardiness_penalty(earliest_completion);
    (job.reward - penalty) / (job.processing_time as f64)
}
