//! Error types for engine cycle evaluation.

use pe_components::ComponentError;
use pe_core::error::PeError;
use pe_propellants::PropellantError;
use pe_solver::SolverError;
use thiserror::Error;

/// Errors encountered while solving an engine operating point.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CycleError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Non-physical condition: {what}")]
    NonPhysical { what: &'static str },

    #[error("Turbine back pressure {back_pressure_pa:.0} Pa exceeds inlet pressure {inlet_pressure_pa:.0} Pa")]
    TurbineCannotExpand {
        inlet_pressure_pa: f64,
        back_pressure_pa: f64,
    },

    #[error("No turbine pressure ratio up to {max_pressure_ratio:.3} balances pump demand")]
    NoPowerBalance { max_pressure_ratio: f64 },

    #[error("Component error: {0}")]
    Component(#[from] ComponentError),

    #[error("Propellant data error: {0}")]
    Propellant(#[from] PropellantError),

    #[error("Root finding failed: {0}")]
    Solver(#[from] SolverError),
}

pub type CycleResult<T> = Result<T, CycleError>;

impl From<CycleError> for PeError {
    fn from(e: CycleError) -> Self {
        match e {
            CycleError::InvalidArg { what } => PeError::InvalidArg { what },
            CycleError::NonPhysical { what } => PeError::Invariant { what },
            CycleError::TurbineCannotExpand { .. } => PeError::Invariant {
                what: "turbine back pressure exceeds inlet pressure",
            },
            CycleError::NoPowerBalance { .. } => PeError::Invariant {
                what: "no turbine pressure ratio balances pump demand",
            },
            CycleError::Component(c) => c.into(),
            CycleError::Propellant(p) => p.into(),
            CycleError::Solver(s) => s.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = CycleError::NoPowerBalance {
            max_pressure_ratio: 2.5,
        };
        assert!(err.to_string().contains("2.500"));
    }

    #[test]
    fn error_conversion() {
        let err: CycleError = SolverError::InvalidConfig { what: "tol" }.into();
        assert!(matches!(err, CycleError::Solver(_)));
        let pe: PeError = CycleError::InvalidArg { what: "x" }.into();
        assert!(matches!(pe, PeError::InvalidArg { .. }));
    }
}
