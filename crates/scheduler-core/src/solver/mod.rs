//! Solvers that turn an instance (jobs plus a horizon) into a schedule.

pub mod offline;
pub mod online;
