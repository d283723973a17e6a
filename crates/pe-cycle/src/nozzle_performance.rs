//! Nozzle phase: frozen-flow expansion, losses and thrust.

use crate::chamber::ChamberState;
use crate::error::{CycleError, CycleResult};
use pe_components::isentropic::{
    area_ratio_from_mach, mach_from_area_ratio, pressure_ratio_from_temperature_ratio,
    speed_of_sound, temperature_ratio_between,
};
use pe_components::{FrictionInputs, NozzleContour};
use pe_core::constants::{G0_MPS2, P_SEA_LEVEL_PA};

/// Ideal expansion from the frozen station to the nozzle exit.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct NozzleExpansion {
    /// Area ratio implied by the tabulated frozen-station Mach number
    pub effective_frozen_area_ratio: f64,
    pub effective_exit_area_ratio: f64,
    pub exit_mach: f64,
    /// [K]
    pub exit_temperature: f64,
    /// [Pa]
    pub exit_pressure: f64,
    /// [m/s]
    pub exhaust_velocity: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NozzleLosses {
    pub divergence: f64,
    pub friction: f64,
}

impl Default for NozzleLosses {
    fn default() -> Self {
        Self {
            divergence: 1.0,
            friction: 1.0,
        }
    }
}

/// Thrust added by turbine exhaust [N].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AuxiliaryThrust {
    pub vacuum: f64,
    pub sea_level: f64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ThrustSummary {
    /// [N]
    pub vacuum: f64,
    /// [N]
    pub sea_level: f64,
    /// Vacuum thrust at minimum throttle [N]
    pub min_vacuum: f64,
    /// [s]
    pub isp_vacuum: f64,
    /// [s]
    pub isp_sea_level: f64,
}

/// Expand the frozen-station state to the exit area ratio.
///
/// The tabulated frozen area ratio is rescaled by the area ratio the frozen
/// Mach number implies, so the table and the isentropic relation agree at the
/// frozen station. `temperature_shift` lowers the frozen-station temperature
/// by the enthalpy a preburner turbine extracted.
pub fn expand(chamber: &ChamberState, temperature_shift: f64) -> CycleResult<NozzleExpansion> {
    let s = &chamber.combustion;
    let gamma = s.nozzle_gamma;

    let effective_frozen_area_ratio = area_ratio_from_mach(s.nozzle_mach, gamma);
    if !(effective_frozen_area_ratio > 0.0 && effective_frozen_area_ratio.is_finite()) {
        return Err(CycleError::NonPhysical {
            what: "frozen-station Mach number gives no area ratio",
        });
    }
    let effective_exit_area_ratio =
        chamber.area_ratio * s.frozen_area_ratio / effective_frozen_area_ratio;
    let exit_mach = mach_from_area_ratio(effective_exit_area_ratio, gamma)?;

    let ratio = temperature_ratio_between(s.nozzle_mach, exit_mach, gamma);
    let exit_temperature = ratio * (s.nozzle_temperature - temperature_shift);
    if !(exit_temperature > 0.0) {
        return Err(CycleError::NonPhysical {
            what: "nozzle exit temperature must be positive",
        });
    }
    let exhaust_velocity = exit_mach * speed_of_sound(gamma, s.nozzle_molar_mass, exit_temperature);
    let exit_pressure = pressure_ratio_from_temperature_ratio(ratio, gamma) * s.nozzle_pressure;

    Ok(NozzleExpansion {
        effective_frozen_area_ratio,
        effective_exit_area_ratio,
        exit_mach,
        exit_temperature,
        exit_pressure,
        exhaust_velocity,
    })
}

/// Divergence and wall-friction efficiencies of the contour.
pub fn losses(
    contour: &NozzleContour,
    chamber: &ChamberState,
    expansion: &NozzleExpansion,
) -> CycleResult<NozzleLosses> {
    let s = &chamber.combustion;
    let friction = contour.friction_efficiency(&FrictionInputs {
        exhaust_velocity: expansion.exhaust_velocity,
        mass_flow: chamber.mass_flow,
        chamber_pressure: chamber.chamber_pressure,
        chamber_temperature: s.chamber_temperature,
        gamma: s.nozzle_gamma,
        molar_mass: s.nozzle_molar_mass,
        throat_radius: chamber.throat_radius(),
    })?;
    Ok(NozzleLosses {
        divergence: contour.divergence_efficiency(),
        friction,
    })
}

/// Momentum plus pressure thrust of the main nozzle and any auxiliary flow.
pub fn thrust(
    chamber: &ChamberState,
    expansion: &NozzleExpansion,
    losses: &NozzleLosses,
    total_mass_flow: f64,
    auxiliary: AuxiliaryThrust,
    min_throttle: f64,
) -> ThrustSummary {
    let momentum =
        expansion.exhaust_velocity * chamber.mass_flow * losses.divergence * losses.friction;
    let exit_pressure = expansion.exit_pressure * losses.divergence;

    let vacuum = momentum + exit_pressure * chamber.exit_area + auxiliary.vacuum;
    let sea_level = momentum + (exit_pressure - P_SEA_LEVEL_PA) * chamber.exit_area + auxiliary.sea_level;

    let weight_flow = total_mass_flow * G0_MPS2;
    ThrustSummary {
        vacuum,
        sea_level,
        min_vacuum: vacuum * min_throttle,
        isp_vacuum: vacuum / weight_flow,
        isp_sea_level: sea_level / weight_flow,
    }
}
