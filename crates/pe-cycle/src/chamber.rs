//! Chamber phase: combustion state, choked throat flow and propellant split.

use crate::error::{CycleError, CycleResult};
use crate::params::EngineParameters;
use pe_components::common::check_positive;
use pe_components::isentropic::choked_flow_parameter;
use pe_core::constants::PA_PER_MPA;
use pe_propellants::CombustionState;
use std::f64::consts::PI;

/// Throat flow and geometry of the main combustion chamber.
#[derive(Clone, Debug, PartialEq)]
pub struct ChamberState {
    pub of_ratio: f64,
    /// [Pa]
    pub chamber_pressure: f64,
    pub area_ratio: f64,
    /// [m]
    pub throat_diameter: f64,
    /// [m²]
    pub throat_area: f64,
    /// [m²]
    pub exit_area: f64,
    /// [m]
    pub exit_diameter: f64,
    /// [m]
    pub chamber_diameter: f64,
    pub reaction_efficiency: f64,
    pub combustion: CombustionState,
    /// Total chamber flow after reaction losses [kg/s]
    pub mass_flow: f64,
    pub ox_mass_flow: f64,
    pub fuel_mass_flow: f64,
}

impl ChamberState {
    pub fn throat_radius(&self) -> f64 {
        0.5 * self.throat_diameter
    }

    /// Injector inlet pressure for a given injector drop ratio [Pa].
    pub fn injector_inlet_pressure(&self, injector_drop_ratio: f64) -> f64 {
        self.chamber_pressure * (1.0 + injector_drop_ratio)
    }
}

/// Chamber cross-section from throat size:
/// `A_c = A_t · (8 · D_t[cm]^-0.6 + 1.25)`.
pub fn chamber_area(throat_area: f64, throat_diameter: f64) -> f64 {
    throat_area * (8.0 * (throat_diameter * 100.0).powf(-0.6) + 1.25)
}

/// Fraction of ideal flow that reacts completely in the chamber.
///
/// Small, low-pressure chambers with a throat close to the chamber diameter
/// lose the most: `η = 1 - 0.05 · (D_t / D_c) · exp(-P_c[MPa] / 3)`.
pub fn reaction_efficiency(chamber_pressure: f64, throat_diameter: f64, chamber_diameter: f64) -> f64 {
    let contraction = throat_diameter / chamber_diameter;
    1.0 - 0.05 * contraction * (-chamber_pressure / PA_PER_MPA / 3.0).exp()
}

/// Evaluate the chamber for already-clamped parameters.
pub fn solve_chamber(params: &EngineParameters) -> CycleResult<ChamberState> {
    let throat_diameter = check_positive(params.throat_diameter.value, "throat diameter")?;
    let pc = params.chamber_pressure.value;
    let of_ratio = params.of_ratio;
    let area_ratio = params.area_ratio;

    let combustion = params
        .mixture
        .combustion_state(of_ratio, params.chamber_pressure)?;
    if !combustion.is_populated() || !(combustion.nozzle_gamma > 1.0) {
        return Err(CycleError::NonPhysical {
            what: "combustion state has no chamber temperature or gamma",
        });
    }

    let throat_area = 0.25 * PI * throat_diameter * throat_diameter;
    let exit_area = throat_area * area_ratio;
    let exit_diameter = (exit_area / (0.25 * PI)).sqrt();
    let chamber_diameter = (chamber_area(throat_area, throat_diameter) / (0.25 * PI)).sqrt();

    let ideal_flow = pc
        * throat_area
        * choked_flow_parameter(
            combustion.nozzle_gamma,
            combustion.nozzle_molar_mass,
            combustion.chamber_temperature,
        );
    let eta_r = reaction_efficiency(pc, throat_diameter, chamber_diameter);
    let mass_flow = ideal_flow * eta_r;
    let fuel_mass_flow = mass_flow / (of_ratio + 1.0);
    let ox_mass_flow = fuel_mass_flow * of_ratio;

    tracing::debug!(
        of_ratio,
        chamber_pressure = pc,
        mass_flow,
        reaction_efficiency = eta_r,
        "chamber solved"
    );

    Ok(ChamberState {
        of_ratio,
        chamber_pressure: pc,
        area_ratio,
        throat_diameter,
        throat_area,
        exit_area,
        exit_diameter,
        chamber_diameter,
        reaction_efficiency: eta_r,
        combustion,
        mass_flow,
        ox_mass_flow,
        fuel_mass_flow,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_low_pressure_chamber_reacts_worse() {
        let small = reaction_efficiency(1.0e6, 0.02, 0.05);
        let large = reaction_efficiency(10.0e6, 0.02, 0.05);
        assert!(small < large && large < 1.0);
        assert!(small > 0.95);
    }

    #[test]
    fn chamber_is_wider_than_throat() {
        let dt = 0.1_f64;
        let at = 0.25 * PI * dt * dt;
        let ac = chamber_area(at, dt);
        let expected = at * (8.0 * 10.0_f64.powf(-0.6) + 1.25);
        assert!((ac - expected).abs() < 1e-15);
        assert!(ac > at);
    }
}
