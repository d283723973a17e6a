//! Propellant data errors.

use pe_core::PeError;
use thiserror::Error;

/// Result type for propellant table operations.
pub type PropellantResult<T> = Result<T, PropellantError>;

/// Errors raised by combustion table construction and queries.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PropellantError {
    /// Pressure query outside the tabulated range of one O/F table.
    #[error(
        "Chamber pressure {pressure_pa} Pa outside table range [{min_pa}, {max_pa}] Pa for {mixture} at O/F {of_ratio}"
    )]
    PressureOutOfRange {
        mixture: String,
        of_ratio: f64,
        pressure_pa: f64,
        min_pa: f64,
        max_pa: f64,
    },

    /// O/F query outside the tabulated O/F range.
    #[error("O/F ratio {of_ratio} outside tabulated range [{lean}, {rich}] for {mixture}")]
    OfRatioOutOfRange {
        mixture: String,
        of_ratio: f64,
        lean: f64,
        rich: f64,
    },

    /// No pair of adjacent tables straddles the requested temperature.
    #[error("No O/F pair brackets {temperature_k} K at {pressure_pa} Pa for {mixture}")]
    TemperatureNotBracketed {
        mixture: String,
        temperature_k: f64,
        pressure_pa: f64,
    },

    /// Table or mixture without data.
    #[error("Empty table: {what}")]
    EmptyTable { what: &'static str },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Unknown mixture: {title}")]
    UnknownMixture { title: String },

    #[error("Duplicate mixture: {title}")]
    DuplicateMixture { title: String },
}

impl From<PropellantError> for PeError {
    fn from(err: PropellantError) -> Self {
        match err {
            PropellantError::PressureOutOfRange { .. }
            | PropellantError::OfRatioOutOfRange { .. }
            | PropellantError::TemperatureNotBracketed { .. } => PeError::InvalidArg {
                what: "combustion table query out of range",
            },
            PropellantError::EmptyTable { what } | PropellantError::InvalidArg { what } => {
                PeError::InvalidArg { what }
            }
            PropellantError::UnknownMixture { .. } | PropellantError::DuplicateMixture { .. } => {
                PeError::InvalidArg {
                    what: "mixture library lookup",
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = PropellantError::PressureOutOfRange {
            mixture: "LOX/RP-1".into(),
            of_ratio: 2.5,
            pressure_pa: 5.0e7,
            min_pa: 1.0e5,
            max_pa: 2.0e7,
        };
        let text = err.to_string();
        assert!(text.contains("LOX/RP-1"));
        assert!(text.contains("2.5"));
    }

    #[test]
    fn error_to_pe_error() {
        let err = PropellantError::EmptyTable { what: "rows" };
        let pe: PeError = err.into();
        assert!(matches!(pe, PeError::InvalidArg { what: "rows" }));
    }
}
