//! Human-readable schedule summary, printed to stderr.
//!
//! Stands in for `original_source/src/utility.py::display_schedule`'s
//! matplotlib Gantt chart — visualization is explicitly out of scope for
//! the core (`spec.md` §1), and a plotting dependency would be scope creep
//! for a CLI adapter. A plain text table carries the same information.

use scheduler_core::Schedule;

pub fn print_summary(schedule: &Schedule) {
    eprintln!(
        "{:<12} {:>8} {:>8} {:>9} {:>9}  {}",
        "job", "release", "deadline", "reward", "drop_pen", "slots (1-based)"
    );
    for (job_index, job) in schedule.jobs().iter().enumerate() {
        let slots: Vec<String> = (0..schedule.total_slots())
            .filter(|&t| schedule.assignment_at(t) == Some(job_index))
            .map(|t| (t + 1).to_string())
            .collect();
        let status = if slots.is_empty() { "dropped".to_string() } else { slots.join(",") };
        eprintln!(
            "{:<12} {:>8} {:>8} {:>9.2} {:>9.2}  {}",
            job.id, job.release_time, job.deadline, job.reward, job.drop_penalty, status
        );
    }
    eprintln!("objective: {}", schedule.score());
}
