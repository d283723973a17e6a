//! Pressure-fed cycle: tanks push propellant straight through the injector.

use crate::chamber::ChamberState;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PressureFedDiagnostics {
    /// Tank pressure needed to feed the injector [Pa]
    pub tank_pressure: f64,
    pub injector_drop_ratio: f64,
}

pub fn solve(chamber: &ChamberState, injector_drop_ratio: f64) -> PressureFedDiagnostics {
    PressureFedDiagnostics {
        tank_pressure: chamber.injector_inlet_pressure(injector_drop_ratio),
        injector_drop_ratio,
    }
}
