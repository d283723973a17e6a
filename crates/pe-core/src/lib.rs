//! pe-core: stable foundation for the engine performance workspace.
//!
//! Contains:
//! - units (uom SI types + constructors + physical constants)
//! - numeric (finiteness check and linear interpolation helpers)
//! - error (shared error types)

pub mod error;
pub mod numeric;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::PeError;
pub use numeric::*;
pub use units::*;
