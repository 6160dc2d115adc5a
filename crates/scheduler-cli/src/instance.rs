//! JSON instance loading (`spec.md` §6.1).
//!
//! Deliberately kept separate from `scheduler_core::Job`'s own (optional)
//! `serde` derive: the wire format is parsed into a raw, unvalidated shape
//! here, then fed through `PenaltyFunction`'s and `Job::new`'s constructors
//! so every §4.1/§4.2 validation rule runs, and `t*` is always the real
//! derived value rather than whatever `serde(skip)` would default to.

use std::path::Path;

use serde::Deserialize;

use scheduler_core::{Job, PenaltyFunction, SchedulerError};

use crate::error::{CliError, CliResult};

#[derive(Debug, Deserialize)]
struct RawInstance {
    total_time_slots: u64,
    jobs: Vec<RawJob>,
}

#[derive(Debug, Deserialize)]
struct RawJob {
    id: String,
    release_time: u64,
    processing_time: u64,
    deadline: u64,
    reward: f64,
    drop_penalty: f64,
    penalty_function: RawPenaltyFunction,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "function_type", content = "parameters")]
enum RawPenaltyFunction {
    #[serde(rename = "linear")]
    Linear { slope: f64, intercept: f64 },
    #[serde(rename = "per-timeslot")]
    Step(Vec<(u64, f64)>),
}

/// A loaded, validated instance: the job set plus the horizon.
pub struct Instance {
    pub jobs: Vec<Job>,
    pub total_slots: u64,
}

/// Loads and validates an instance from `path`, per `spec.md` §6.1.
///
/// Rejects (as `SchedulerError::InvalidInstance`, in addition to whatever
/// `PenaltyFunction`/`Job` constructors already reject): an unknown
/// `function_type` (surfaced as a JSON parse error — the tag simply
/// doesn't match), a zero horizon, duplicate job ids, and a deadline
/// exceeding `total_time_slots + 1`.
pub fn load_instance(path: &Path) -> CliResult<Instance> {
    let text = std::fs::read_to_string(path).map_err(|source| CliError::Io { path: path.to_owned(), source })?;
    let raw: RawInstance =
        serde_json::from_str(&text).map_err(|source| CliError::Json { path: path.to_owned(), source })?;

    if raw.total_time_slots == 0 {
        return Err(SchedulerError::InvalidInstance("total_time_slots must be > 0".into()).into());
    }

    let mut jobs = Vec::with_capacity(raw.jobs.len());
    for raw_job in raw.jobs {
        if raw_job.deadline > raw.total_time_slots + 1 {
            return Err(SchedulerError::InvalidInstance(format!(
                "job {:?}: deadline ({}) exceeds total_time_slots + 1 ({})",
                raw_job.id,
                raw_job.deadline,
                raw.total_time_slots + 1
            ))
            .into());
        }
        if jobs.iter().any(|j: &Job| j.id == raw_job.id) {
            return Err(SchedulerError::InvalidInstance(format!("duplicate job id {:?}", raw_job.id)).into());
        }

        let penalty_function = match raw_job.penalty_function {
            RawPenaltyFunction::Linear { slope, intercept } => PenaltyFunction::linear(slope, intercept)?,
            RawPenaltyFunction::Step(breakpoints) => PenaltyFunction::step(breakpoints)?,
        };

        jobs.push(Job::new(
            raw_job.id,
            raw_job.release_time,
            raw_job.processing_time,
            raw_job.deadline,
            raw_job.reward,
            raw_job.drop_penalty,
            penalty_function,
        )?);
    }

    Ok(Instance { jobs, total_slots: raw.total_time_slots })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_a_linear_instance() {
        let file = write_temp(
            r#"{
                "total_time_slots": 3,
                "jobs": [
                    {
                        "id": "a",
                        "release_time": 0,
                        "processing_time": 2,
                        "deadline": 2,
                        "reward": 10,
                        "drop_penalty": 1,
                        "penalty_function": {
                            "function_type": "linear",
                            "parameters": { "slope": 1, "intercept": 0 }
                        }
                    }
                ]
            }"#,
        );
        let instance = load_instance(file.path()).unwrap();
        assert_eq!(instance.total_slots, 3);
        assert_eq!(instance.jobs.len(), 1);
        assert_eq!(instance.jobs[0].id, "a");
    }

    #[test]
    fn loads_a_step_instance() {
        let file = write_temp(
            r#"{
                "total_time_slots": 5,
                "jobs": [
                    {
                        "id": "a",
                        "release_time": 0,
                        "processing_time": 2,
                        "deadline": 2,
                        "reward": 10,
                        "drop_penalty": 0,
                        "penalty_function": {
                            "function_type": "per-timeslot",
                            "parameters": [[1, 1], [3, 100]]
                        }
                    }
                ]
            }"#,
        );
        let instance = load_instance(file.path()).unwrap();
        assert_eq!(instance.jobs.len(), 1);
    }

    #[test]
    fn rejects_zero_horizon() {
        let file = write_temp(r#"{"total_time_slots": 0, "jobs": []}"#);
        assert!(load_instance(file.path()).is_err());
    }

    #[test]
    fn rejects_deadline_beyond_horizon_plus_one() {
        let file = write_temp(
            r#"{
                "total_time_slots": 3,
                "jobs": [
                    {
                        "id": "a", "release_time": 0, "processing_time": 1, "deadline": 5,
                        "reward": 1, "drop_penalty": 0,
                        "penalty_function": {"function_type": "linear", "parameters": {"slope": 0, "intercept": 0}}
                    }
                ]
            }"#,
        );
        assert!(load_instance(file.path()).is_err());
    }

    #[test]
    fn rejects_duplicate_ids() {
        let file = write_temp(
            r#"{
                "total_time_slots": 3,
                "jobs": [
                    {"id": "a", "release_time": 0, "processing_time": 1, "deadline": 2, "reward": 1, "drop_penalty": 0,
                     "penalty_function": {"function_type": "linear", "parameters": {"slope": 0, "intercept": 0}}},
                    {"id": "a", "release_time": 0, "processing_time": 1, "deadline": 2, "reward": 1, "drop_penalty": 0,
                     "penalty_function": {"function_type": "linear", "parameters": {"slope": 0, "intercept": 0}}}
                ]
            }"#,
        );
        assert!(load_instance(file.path()).is_err());
    }

    #[test]
    fn rejects_unknown_function_type() {
        let file = write_temp(
            r#"{
                "total_time_slots": 3,
                "jobs": [
                    {"id": "a", "release_time": 0, "processing_time": 1, "deadline": 2, "reward": 1, "drop_penalty": 0,
                     "penalty_function": {"function_type": "quadratic", "parameters": {}}}
                ]
            }"#,
        );
        assert!(load_instance(file.path()).is_err());
    }
}
