//! Lower and upper bounds on the optimal completion of a partial [`Schedule`].
//!
//! [`Schedule::lower_bound`] and [`Schedule::upper_bound`] are the entry
//! points search code should call; the functions in [`lower`] and [`upper`]
//! are the components those methods delegate to and cache.
//!
//! [`Schedule`]: crate::schedule::Schedule
//! [`Schedule::lower_bound`]: crate::schedule::Schedule::lower_bound
//! [`Schedule::upper_bound`]: crate::schedule::Schedule::upper_bound

pub mod lower;
pub mod upper;
