//! Branch-and-bound single-machine preemptive scheduler with tardiness and
//! drop penalties.
//!
//! This crate is the pure decision core: it has no knowledge of files, the
//! command line, or how instances are serialized. See `scheduler-cli` for
//! those adapters.

pub mod bounds;
pub mod error;
pub mod job;
pub mod objective;
pub mod penalty;
pub mod schedule;
pub mod solver;


pub use error::{Result, SchedulerError};
pub use job::Job;
pub use objective::Objective;
pub use penalty::PenaltyFunction;
pub use schedule::Schedule;
pub use solver::offline::{OfflineSearchConfig, OfflineSolver, OfflineSolution};
pub use solver::online::{OnlineConfig, OnlineSolver};
