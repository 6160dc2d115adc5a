//! Exhaustive solver exposed via `--name bruteforce`.
//!
//! Grounded on `original_source/src/algorithms/bruteforce.py`, which the
//! original project used only as a correctness oracle to compare the real
//! solver against, never as a production path. Here it plays the same
//! role for the CLI: a deliberately naive baseline for small instances,
//! exponential in the horizon, with no pruning.

use scheduler_core::{Job, Objective, Result, Schedule};

/// Exhaustively enumerates every legal schedule and returns the
/// best-scoring one. Intended for small instances only — this is a
/// comparison baseline, not an alternative production solver.
pub fn solve(jobs: Vec<Job>, total_slots: u64) -> Result<Schedule> {
    let root = Schedule::new(jobs, total_slots)?;
    let mut best = (root.score(), root.clone());
    recurse(root, &mut best);
    Ok(best.1)
}

fn recurse(schedule: Schedule, best: &mut (Objective, Schedule)) {
    let score = schedule.score();
    if score > best.0 {
        *best = (score, schedule.clone());
    }
    if schedule.is_terminal() {
        return;
    }
    for child in schedule.expand() {
        recurse(child, best);
    }
}
