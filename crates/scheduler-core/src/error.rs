//! Error types for scheduler-core

use thiserror::Error;

/// Main error type for scheduler-core operations.
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// The instance (jobs, penalty functions, horizon) violates a documented
    /// constraint. Fatal at load time.
    #[error("invalid instance: {0}")]
    InvalidInstance(String),

    /// An internal assertion failed (over-assignment, negative counts, a
    /// schedule invariant broken by a bug). Fatal; indicates a bug.
    #[error("invariant violation: {0}")]
    InvariantViolation(String),

    /// The LP relaxation solver returned a non-optimal status.
    #[error("LP relaxation failed ({jobs} jobs, {slots} slots, {constraints} constraints): {reason}")]
    LPFailure {
        reason: String,
        jobs: usize,
        slots: usize,
        constraints: usize,
    },

    /// The solver's deadline elapsed before the search proved optimality.
    /// Non-fatal: callers receive the best incumbent found so far.
    #[error("search deadline elapsed before optimality was proven")]
    DeadlineElapsed,
}

/// Result type alias for scheduler-core operations.
pub type Result<T> = std::result::Result<T, SchedulerError>;
