//! Bracketed scalar root finding.
//!
//! Every relation in the engine model that has to be inverted (area-Mach,
//! turbine/pump power balance, preburner pressure ratio) goes through the
//! Brent solver in this crate. Failure to bracket is reported as an error
//! value instead of a numeric sentinel.

pub mod brent;
pub mod error;

pub use brent::{
    BrentConfig, RootOutcome, RootSolution, brent, brent_with_args, root_or_sentinel, try_brent,
};
pub use error::{SolverError, SolverResult};
