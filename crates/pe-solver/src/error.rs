//! Error types for solver operations.

use pe_core::error::PeError;
use thiserror::Error;

/// Errors that can occur during root finding.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    #[error(
        "Root not bracketed on [{lower}, {upper}]: f(lower) = {f_lower}, f(upper) = {f_upper}"
    )]
    NotBracketed {
        lower: f64,
        upper: f64,
        f_lower: f64,
        f_upper: f64,
    },

    #[error("Invalid solver configuration: {what}")]
    InvalidConfig { what: &'static str },

    #[error("Non-finite function value at x = {x}")]
    NonFinite { x: f64 },
}

pub type SolverResult<T> = Result<T, SolverError>;

impl From<SolverError> for PeError {
    fn from(e: SolverError) -> Self {
        match e {
            SolverError::NotBracketed { .. } => PeError::Invariant {
                what: "root not bracketed",
            },
            SolverError::InvalidConfig { what } => PeError::InvalidArg { what },
            SolverError::NonFinite { x } => PeError::NonFinite {
                what: "root function value",
                value: x,
            },
        }
    }
}
