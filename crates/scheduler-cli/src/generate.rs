//! Deterministic random-instance generation, behind `--generate`.
//!
//! Grounded on `original_source/test_instances.py::generate_random_instance`
//! (a fixed-seed random generator used only to produce demo/test
//! instances); reimplemented with `rand_chacha`'s deterministic RNG rather
//! than `random.seed`, so the same seed always reproduces the same
//! instance (`spec.md` §1 lists random-instance generation as an
//! out-of-scope external collaborator, consumed by but not part of the
//! core).

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use scheduler_core::{Job, PenaltyFunction, Result, SchedulerError};

use crate::instance::Instance;

/// Generates `num_jobs` random jobs over a horizon of `total_slots`,
/// deterministic for a given `seed`. Rejects `total_slots < 2` as an
/// `InvalidInstance` — every job needs room for a release time strictly
/// before its deadline — rather than panicking on CLI-supplied input.
pub fn generate_random_instance(num_jobs: usize, total_slots: u64, seed: u64) -> Result<Instance> {
    if total_slots < 2 {
        return Err(SchedulerError::InvalidInstance(format!(
            "--generate total_slots must be >= 2 to generate a release/deadline pair, got {total_slots}"
        )));
    }

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut jobs = Vec::with_capacity(num_jobs);
    for id in 0..num_jobs {
        let release_time = rng.random_range(0..total_slots - 1);
        let deadline = rng.random_range((release_time + 1)..=total_slots);
        let processing_time = rng.random_range(1..=(deadline - release_time));
        let reward = rng.random_range(0.0..100.0);
        let drop_penalty = rng.random_range(0.0..100.0);
        let slope = rng.random_range(0.0..10.0);
        let intercept = rng.random_range(0.0..20.0);

        let penalty_function =
            PenaltyFunction::linear(slope, intercept).expect("generated slope/intercept are non-negative");
        let job = Job::new(id.to_string(), release_time, processing_time, deadline, reward, drop_penalty, penalty_function)
            .expect("generated parameters satisfy Job::new's constraints");
        jobs.push(job);
    }

    Ok(Instance { jobs, total_slots })
}
