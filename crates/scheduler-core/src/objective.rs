//! `Objective` — the scheduling problem's single real-valued score.
//!
//! Unlike SolverForge's multi-level `Score` types, this problem has a single
//! objective: total reward earned minus tardiness and drop penalties paid.
//! `Objective` wraps `f64` and gives it a total order (via [`f64::total_cmp`])
//! so schedules and bounds can be compared and sorted directly.

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Neg, Sub};

/// A scheduling objective value: reward earned minus penalties paid.
///
/// Higher is better. `Objective::MIN` is the identity for "no incumbent yet".
#[derive(Clone, Copy, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Objective(f64);

impl Objective {
    /// The worst possible objective, used as the initial "no incumbent" value.
    pub const MIN: Objective = Objective(f64::NEG_INFINITY);

    /// The zero objective.
    pub const ZERO: Objective = Objective(0.0);

    #[inline]
    pub const fn of(value: f64) -> Self {
        Objective(value)
    }

    #[inline]
    pub fn value(&self) -> f64 {
        self.0
    }
}

impl PartialEq for Objective {
    fn eq(&self, other: &Self) -> bool {
        self.0.total_cmp(&other.0) == Ordering::Equal
    }
}

impl Eq for Objective {}

impl PartialOrd for Objective {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Objective {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl Add for Objective {
    type Output = Objective;
    fn add(self, rhs: Self) -> Self::Output {
        Objective(self.0 + rhs.0)
    }
}

impl Sub for Objective {
    type Output = Objective;
    fn sub(self, rhs: Self) -> Self::Output {
        Objective(self.0 - rhs.0)
    }
}

impl Neg for Objective {
    type Output = Objective;
    fn neg(self) -> Self::Output {
        Objective(-self.0)
    }
}

impl fmt::Display for Objective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<f64> for Objective {
    fn from(value: f64) -> Self {
        Objective(value)
    }
}
