//! pe-components: physical building blocks of a liquid rocket engine.
//!
//! Provides:
//! - Isentropic area-Mach relations ([`isentropic`])
//! - Piecewise linear / cubic Hermite correlation curves ([`Curve`])
//! - Bell and conical nozzle contours with divergence and friction losses
//! - Pump and turbine correlations and the [`TurboPump`] power balance
//!
//! All models are steady-state and deterministic; the only state kept is the
//! memoized nozzle contour.

pub mod common;
pub mod correlation;
pub mod error;
pub mod isentropic;
pub mod nozzle;
pub mod pump;
pub mod turbine;
pub mod turbopump;

// Re-exports
pub use correlation::{Curve, CurveKey, TurbomachineryCorrelations};
pub use error::{ComponentError, ComponentResult};
pub use nozzle::{BellAngles, BellNozzleCurves, FrictionInputs, NozzleContour, NozzleShape};
pub use pump::{Pump, PumpOperatingPoint};
pub use turbine::{Turbine, TurbineOperatingPoint};
pub use turbopump::{
    PumpDemand, PumpSet, TurboPump, TurboPumpConfig, TurboPumpPoint, TurbineDrive, TurbopumpArrangement,
};
