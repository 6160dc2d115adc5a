//! Solution output (`spec.md` §6.2) and the `--solution <path>` scoring mode
//! (supplements the spec per `original_source/test_schedules.py`'s
//! `load_solution`/`load_jobs_from_input_file` pairing: load an instance,
//! load a previously produced solution for it, score the pair).

use std::path::Path;

use scheduler_core::{Schedule, SchedulerError};

use crate::error::{CliError, CliResult};
use crate::instance::Instance;

/// Writes `schedule` in the §6.2 format: one line per job (in instance
/// order) listing its assigned 1-based slot indices, comma-separated, or
/// `null` if the job was never scheduled; a final line with the numeric
/// objective.
pub fn emit(schedule: &Schedule, output: Option<&Path>) -> CliResult<String> {
    let mut text = String::new();
    for (job_index, _job) in schedule.jobs().iter().enumerate() {
        let slots: Vec<String> = (0..schedule.total_slots())
            .filter(|&t| schedule.assignment_at(t) == Some(job_index))
            .map(|t| (t + 1).to_string())
            .collect();
        if slots.is_empty() {
            text.push_str("null\n");
        } else {
            text.push_str(&slots.join(","));
            text.push('\n');
        }
    }
    text.push_str(&schedule.score().value().to_string());
    text.push('\n');

    match output {
        Some(path) => std::fs::write(path, &text).map_err(|source| CliError::Io { path: path.to_owned(), source })?,
        None => print!("{text}"),
    }
    Ok(text)
}

/// Parses a §6.2-format solution file against `instance` and returns the
/// resulting (possibly infeasible) [`Schedule`], for `--solution <path>`
/// scoring mode. The file's job lines are matched to `instance.jobs` by
/// position, matching the output order `emit` produces.
pub fn load_and_score(path: &Path, instance: Instance) -> CliResult<Schedule> {
    let text = std::fs::read_to_string(path).map_err(|source| CliError::Io { path: path.to_owned(), source })?;
    let mut lines = text.lines();
    let mut assignment: Vec<Option<usize>> = vec![None; instance.total_slots as usize];

    for (job_index, job) in instance.jobs.iter().enumerate() {
        let line = lines.next().ok_or_else(|| {
            CliError::from(SchedulerError::InvalidInstance(format!(
                "solution file has fewer lines than the instance has jobs (missing job {:?})",
                job.id
            )))
        })?;
        let line = line.trim();
        if line.is_empty() || line == "null" {
            continue;
        }
        for part in line.split(',') {
            let slot_1based: u64 = part.trim().parse().map_err(|_| {
                CliError::from(SchedulerError::InvalidInstance(format!(
                    "malformed slot index {part:?} for job {:?}",
                    job.id
                )))
            })?;
            if slot_1based == 0 || slot_1based > instance.total_slots {
                return Err(SchedulerError::InvalidInstance(format!(
                    "slot index {slot_1based} out of range [1, {}] for job {:?}",
                    instance.total_slots, job.id
                ))
                .into());
            }
            assignment[(slot_1based - 1) as usize] = Some(job_index);
        }
    }

    Ok(Schedule::from_assignment(instance.jobs, instance.total_slots, assignment)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use scheduler_core::{Job, PenaltyFunction};
    use std::io::Write;

    fn instance() -> Instance {
        let a = Job::new("a", 0, 2, 2, 10.0, 1.0, PenaltyFunction::linear(1.0, 0.0).unwrap()).unwrap();
        Instance { jobs: vec![a], total_slots: 3 }
    }

    #[test]
    fn emit_formats_slots_1_based_with_trailing_objective() {
        let sched = Schedule::from_assignment(instance().jobs, 3, vec![Some(0), Some(0), None]).unwrap();
        let text = emit(&sched, None).unwrap();
        assert_eq!(text, "1,2\n10\n");
    }

    #[test]
    fn emit_writes_null_for_unscheduled_job() {
        let sched = Schedule::from_assignment(instance().jobs, 3, vec![None, None, None]).unwrap();
        let text = emit(&sched, None).unwrap();
        assert_eq!(text, "null\n-1\n");
    }

    #[test]
    fn load_and_score_round_trips_emit() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "1,2\n10\n").unwrap();
        let sched = load_and_score(file.path(), instance()).unwrap();
        assert_eq!(sched.score().value(), 10.0);
        assert_eq!(sched.assignment_at(0), Some(0));
        assert_eq!(sched.assignment_at(1), Some(0));
        assert_eq!(sched.assignment_at(2), None);
    }

    #[test]
    fn load_and_score_rejects_out_of_range_slot() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "9\n").unwrap();
        assert!(load_and_score(file.path(), instance()).is_err());
    }
}
