//! pe-cycle: steady-state liquid rocket engine performance.
//!
//! An [`EngineSolver`] evaluates one engine design in three phases:
//! - Chamber: clamp the design to the mixture envelope, interpolate the
//!   combustion state and size the choked throat flow ([`chamber`])
//! - Cycle: pressure-fed, gas-generator or staged-combustion power balance
//! - Nozzle: frozen-flow expansion, contour losses and thrust
//!   ([`nozzle_performance`])
//!
//! Any change to the parameters, settings or cycle triggers a full
//! recomputation; unchanged inputs are detected by [`ParameterCache`].

pub mod cache;
pub mod chamber;
pub mod context;
pub mod engine;
pub mod error;
pub mod gas_generator;
pub mod nozzle_performance;
pub mod params;
pub mod pressure_fed;
pub mod staged;

// Re-exports
pub use cache::ParameterCache;
pub use chamber::ChamberState;
pub use context::EngineDataContext;
pub use engine::{CycleDiagnostics, EngineCycle, EnginePerformance, EngineSolver};
pub use error::{CycleError, CycleResult};
pub use gas_generator::GasGeneratorDiagnostics;
pub use nozzle_performance::{AuxiliaryThrust, NozzleExpansion, NozzleLosses, ThrustSummary};
pub use params::{EngineParameters, EngineSettings, TurbineExhaust};
pub use pressure_fed::PressureFedDiagnostics;
pub use staged::StagedDiagnostics;
