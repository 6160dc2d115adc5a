//! `Job` — an immutable job descriptor, plus its derived maximum useful
//! tardiness `t*`.

use crate::error::{Result, SchedulerError};
use crate::penalty::PenaltyFunction;

/// The maximum useful tardiness of a job, before the horizon `T` is known.
///
/// A linear penalty function with zero slope, or a step function whose
/// highest breakpoint never exceeds `reward + drop_penalty`, never makes
/// dropping strictly better — in that case `t*` is deferred to whatever
/// horizon the job ends up scheduled within (see `spec.md` §3, §4.2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum TStar {
    Bounded(u64),
    #[default]
    UnboundedUseHorizon,
}

/// An immutable job descriptor.
///
/// Constructed via [`Job::new`], which validates §4.2's constraints and
/// derives `t*`. All fields are read-only after construction; a job's
/// mutable scheduling state (how many slots it has been assigned, whether
/// it's complete) lives in [`crate::schedule::Schedule`], not here.
///
/// `t_star` is skipped by the optional `serde` derive: deserializing a
/// `Job` straight from JSON would leave it at its default rather than
/// re-deriving it, so adapters should build instances through [`Job::new`]
/// (see `scheduler-cli`'s instance loader) rather than deserializing this
/// type directly.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Job {
    pub id: String,
    pub release_time: u64,
    pub processing_time: u64,
    pub deadline: u64,
    pub reward: f64,
    pub drop_penalty: f64,
    pub penalty_function: PenaltyFunction,

    #[cfg_attr(feature = "serde", serde(skip))]
    t_star: TStar,
}

impl Job {
    /// Constructs a job, validating `release_time >= 0`, `release_time <
    /// deadline`, `processing_time >= 1`, `reward >= 0`, `drop_penalty >= 0`,
    /// and deriving `t*` as in `spec.md` §3.
    pub fn new(
        id: impl Into<String>,
        release_time: u64,
        processing_time: u64,
        deadline: u64,
        reward: f64,
        drop_penalty: f64,
        penalty_function: PenaltyFunction,
    ) -> Result<Self> {
        let id = id.into();
        if release_time >= deadline {
            return Err(SchedulerError::InvalidInstance(format!(
                "job {id}: release_time ({release_time}) must be < deadline ({deadline})"
            )));
        }
        if processing_time < 1 {
            return Err(SchedulerError::InvalidInstance(format!(
                "job {id}: processing_time must be >= 1"
            )));
        }
        if reward < 0.0 {
            return Err(SchedulerError::InvalidInstance(format!(
                "job {id}: reward must be non-negative"
            )));
        }
        if drop_penalty < 0.0 {
            return Err(SchedulerError::InvalidInstance(format!(
                "job {id}: drop_penalty must be non-negative"
            )));
        }

        let ceiling = reward + drop_penalty;
        let t_star = Self::derive_t_star(&penalty_function, ceiling);

        Ok(Job {
            id,
            release_time,
            processing_time,
            deadline,
            reward,
            drop_penalty,
            penalty_function,
            t_star,
        })
    }

    /// Largest `tau >= 0` with `f(tau) <= reward + drop_penalty`, clamped to
    /// the horizon when the penalty function never crosses that ceiling.
    fn derive_t_star(penalty_function: &PenaltyFunction, ceiling: f64) -> TStar {
        match penalty_function {
            PenaltyFunction::Linear { slope, intercept } => {
                if *slope == 0.0 {
                    return TStar::UnboundedUseHorizon;
                }
                let raw = (ceiling - intercept) / slope;
                let floored = raw.floor();
                if floored < 0.0 {
                    TStar::Bounded(0)
                } else {
                    TStar::Bounded(floored as u64)
                }
            }
            PenaltyFunction::Step { breakpoints } => {
                match breakpoints.iter().find(|(_, p)| *p > ceiling) {
                    Some((t, _)) => TStar::Bounded(t.saturating_sub(1)),
                    None => TStar::UnboundedUseHorizon,
                }
            }
        }
    }

    /// Resolves `t*` against a concrete horizon `total_slots` (the `T` in
    /// `spec.md`'s deferred-binding note).
    pub fn t_star(&self, total_slots: u64) -> u64 {
        match self.t_star {
            TStar::Bounded(v) => v,
            TStar::UnboundedUseHorizon => total_slots,
        }
    }

    /// The last slot at which this job may still usefully occupy time:
    /// `deadline + t*`. Slots `>= ` this value are never worth scheduling
    /// the job into.
    pub fn max_useful_slot_exclusive(&self, total_slots: u64) -> u64 {
        self.deadline + self.t_star(total_slots)
    }

    /// Tardiness incurred if the job's last assigned slot is `last_slot`
    /// (the `max(0, last_slot - deadline)` convention from `spec.md` §9: a
    /// completion exactly at the deadline slot is on-time).
    pub fn tardiness(&self, last_slot: u64) -> u64 {
        last_slot.saturating_sub(self.deadline)
    }

    /// Penalty incurred for completing at `last_slot` (0 if on-time).
    pub fn tardiness_penalty(&self, last_slot: u64) -> f64 {
        let tau = self.tardiness(last_slot);
        if tau == 0 {
            0.0
        } else {
            self.penalty_function.evaluate(tau)
        }
    }
}
