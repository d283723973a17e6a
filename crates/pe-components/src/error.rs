//! Error types for component operations.

use pe_core::error::PeError;
use pe_propellants::PropellantError;
use pe_solver::SolverError;
use thiserror::Error;

/// Errors that can occur during component calculations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ComponentError {
    #[error("Non-physical value: {what}")]
    NonPhysical { what: &'static str },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Invalid correlation data: {what}")]
    InvalidData { what: String },

    #[error("Root finding failed: {0}")]
    Solver(#[from] SolverError),

    #[error("Propellant data error: {0}")]
    Propellant(#[from] PropellantError),
}

pub type ComponentResult<T> = Result<T, ComponentError>;

impl From<ComponentError> for PeError {
    fn from(e: ComponentError) -> Self {
        match e {
            ComponentError::NonPhysical { what } => PeError::InvalidArg { what },
            ComponentError::InvalidArg { what } => PeError::InvalidArg { what },
            ComponentError::InvalidData { .. } => PeError::InvalidArg {
                what: "invalid correlation data",
            },
            ComponentError::Solver(s) => s.into(),
            ComponentError::Propellant(p) => p.into(),
        }
    }
}
