//! `PenaltyFunction` — maps tardiness to a penalty, either linearly or via a
//! step function of breakpoints.

use crate::error::{Result, SchedulerError};

/// A non-decreasing, non-negative function of integer tardiness `tau >= 1`.
///
/// Conceptually `f(0) == 0`; `evaluate` is only ever called with `tau >= 1`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "function_type", content = "parameters"))]
pub enum PenaltyFunction {
    /// `f(tau) = slope * tau + intercept`.
    #[cfg_attr(feature = "serde", serde(rename = "linear"))]
    Linear { slope: f64, intercept: f64 },

    /// Breakpoints `[(t_1, p_1), (t_2, p_2), ...]` with `t_i` strictly
    /// increasing and `p_i` non-decreasing. `f(tau)` is the penalty of the
    /// largest breakpoint with `t_i <= tau`, or 0 if `tau < t_1`.
    #[cfg_attr(feature = "serde", serde(rename = "per-timeslot"))]
    Step { breakpoints: Vec<(u64, f64)> },
}

impl PenaltyFunction {
    /// Constructs a linear penalty function, rejecting a negative slope or
    /// intercept.
    pub fn linear(slope: f64, intercept: f64) -> Result<Self> {
        if slope < 0.0 {
            return Err(SchedulerError::InvalidInstance(
                "penalty function slope must be non-negative".into(),
            ));
        }
        if intercept < 0.0 {
            return Err(SchedulerError::InvalidInstance(
                "penalty function intercept must be non-negative".into(),
            ));
        }
        Ok(PenaltyFunction::Linear { slope, intercept })
    }

    /// Constructs a step penalty function, rejecting out-of-order
    /// breakpoints, non-positive breakpoint times, negative penalties, or a
    /// decreasing penalty sequence.
    pub fn step(breakpoints: Vec<(u64, f64)>) -> Result<Self> {
        if breakpoints.is_empty() {
            return Err(SchedulerError::InvalidInstance(
                "step penalty function needs at least one breakpoint".into(),
            ));
        }
        for (t, p) in &breakpoints {
            if *t == 0 {
                return Err(SchedulerError::InvalidInstance(
                    "step penalty breakpoint times must be positive".into(),
                ));
            }
            if *p < 0.0 {
                return Err(SchedulerError::InvalidInstance(
                    "step penalty values must be non-negative".into(),
                ));
            }
        }
        for pair in breakpoints.windows(2) {
            let (t0, p0) = pair[0];
            let (t1, p1) = pair[1];
            if t1 <= t0 {
                return Err(SchedulerError::InvalidInstance(
                    "step penalty breakpoint times must be strictly increasing".into(),
                ));
            }
            if p1 < p0 {
                return Err(SchedulerError::InvalidInstance(
                    "step penalty values must be non-decreasing".into(),
                ));
            }
        }
        Ok(PenaltyFunction::Step { breakpoints })
    }

    /// Evaluates the penalty incurred at tardiness `tau` (must be `>= 1`).
    ///
    /// O(1) for linear, O(breakpoints) for step.
    pub fn evaluate(&self, tau: u64) -> f64 {
        debug_assert!(tau >= 1, "tardiness passed to evaluate() must be >= 1");
        match self {
            PenaltyFunction::Linear { slope, intercept } => slope * (tau as f64) + intercept,
            PenaltyFunction::Step { breakpoints } => {
                let mut penalty = 0.0;
                for (t, p) in breakpoints {
                    if tau >= *t {
                        penalty = *p;
                    } else {
                        break;
                    }
                }
                penalty
            }
        }
    }

    /// True if every job in `fns` uses the `Linear` variant.
    pub fn all_linear<'a>(fns: impl IntoIterator<Item = &'a PenaltyFunction>) -> bool {
        fns.into_iter().all(|f| matches!(f, PenaltyFunction::Linear { .. }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_evaluates() {
        let f = PenaltyFunction::linear(2.0, 1.0).unwrap();
        assert_eq!(f.evaluate(1), 3.0);
        assert_eq!(f.evaluate(5), 11.0);
    }

    #[test]
    fn linear_rejects_negative_slope() {
        assert!(PenaltyFunction::linear(-1.0, 0.0).is_err());
    }

    #[test]
    fn linear_rejects_negative_intercept() {
        assert!(PenaltyFunction::linear(1.0, -1.0).is_err());
    }

    #[test]
    fn step_walks_breakpoints() {
        let f = PenaltyFunction::step(vec![(1, 1.0), (3, 100.0)]).unwrap();
        assert_eq!(f.evaluate(1), 1.0);
        assert_eq!(f.evaluate(2), 1.0);
        assert_eq!(f.evaluate(3), 100.0);
        assert_eq!(f.evaluate(10), 100.0);
    }

    #[test]
    fn step_below_first_breakpoint_is_zero() {
        let f = PenaltyFunction::step(vec![(2, 5.0)]).unwrap();
        assert_eq!(f.evaluate(1), 0.0);
    }

    #[test]
    fn step_rejects_non_increasing_times() {
        assert!(PenaltyFunction::step(vec![(2, 1.0), (2, 2.0)]).is_err());
        assert!(PenaltyFunction::step(vec![(2, 1.0), (1, 2.0)]).is_err());
    }

    #[test]
    fn step_rejects_decreasing_penalty() {
        assert!(PenaltyFunction::step(vec![(1, 5.0), (2, 1.0)]).is_err());
    }

    #[test]
    fn step_rejects_zero_time() {
        assert!(PenaltyFunction::step(vec![(0, 1.0)]).is_err());
    }

    #[test]
    fn step_rejects_negative_penalty() {
        assert!(PenaltyFunction::step(vec![(1, -1.0)]).is_err());
    }

    #[test]
    fn all_linear_detects_mixed_sets() {
        let linear = PenaltyFunction::linear(1.0, 0.0).unwrap();
        let step = PenaltyFunction::step(vec![(1, 1.0)]).unwrap();
        assert!(PenaltyFunction::all_linear([&linear, &linear]));
        assert!(!PenaltyFunction::all_linear([&linear, &step]));
    }
}
