use thiserror::Error;

/// Workspace-wide error every crate error converts into.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PeError {
    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Invariant violated: {what}")]
    Invariant { what: &'static str },
}
