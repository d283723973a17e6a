//! Gas-generator cycle.
//!
//! A separate combustor burns a small off-ratio propellant stream at the
//! turbine inlet temperature. The turbine flow is found by Brent's method so
//! that the turbine delivers exactly the pump shaft power, with the gas
//! generator's own propellant added to the pump flows. The exhaust leaves
//! through its own choked duct or is injected into the main nozzle wall.

use crate::chamber::ChamberState;
use crate::error::{CycleError, CycleResult};
use crate::nozzle_performance::{AuxiliaryThrust, NozzleLosses};
use crate::params::{EngineSettings, TurbineExhaust};
use pe_components::isentropic::{
    choked_flow_parameter, mach_from_area_ratio, pressure_ratio_from_temperature_ratio,
    speed_of_sound, stagnation_temperature_ratio, temperature_ratio_between,
};
use pe_components::{NozzleContour, PumpDemand, TurboPump, TurboPumpPoint};
use pe_core::constants::P_SEA_LEVEL_PA;
use pe_core::units::{k, kgps, pa};
use pe_propellants::{BiPropellantMixture, CombustionState};
use pe_solver::{BrentConfig, RootOutcome, try_brent};

/// Minimum gas-generator injector pressure drop ratio.
pub const MIN_GG_INJECTOR_DROP: f64 = 0.2;

/// Static pressure a direct exhaust duct discharges against [Pa].
pub const DIRECT_EXHAUST_PRESSURE_PA: f64 = 1.5 * P_SEA_LEVEL_PA;

/// Extra back pressure from piping when exhausting into the nozzle.
pub const NOZZLE_INJECTION_PIPING_FACTOR: f64 = 1.05;

/// Turbine flow bracket upper bound as a multiple of chamber flow.
const MAX_TURBINE_FLOW_FRACTION: f64 = 1.5;

const TURBINE_FLOW_TOLERANCE: f64 = 1e-6;

#[derive(Clone, Debug, PartialEq)]
pub struct GasGeneratorDiagnostics {
    /// Gas-generator combustion state at the turbine inlet temperature
    pub state: CombustionState,
    /// [Pa]
    pub pressure: f64,
    pub injector_drop_ratio: f64,
    /// Exhaust routing with the injection station clamped to the nozzle
    pub exhaust: TurbineExhaust,
    /// Turbine exit stagnation pressure [Pa]
    pub back_pressure: f64,
    pub pressure_ratio: f64,
    /// [kg/s]
    pub turbine_mass_flow: f64,
    pub ox_mass_flow: f64,
    pub fuel_mass_flow: f64,
    /// Turbine flow over total engine flow
    pub mass_flow_fraction: f64,
    /// Direct exhaust duct exit area [m²]; zero when injected into the nozzle
    pub exhaust_area: f64,
    pub turbopump: TurboPumpPoint,
    pub iterations: usize,
}

impl GasGeneratorDiagnostics {
    pub fn of_ratio(&self) -> f64 {
        self.state.of_ratio
    }

    pub fn total_mass_flow(&self, chamber: &ChamberState) -> f64 {
        chamber.mass_flow + self.turbine_mass_flow
    }

    /// Engine O/F including the gas-generator stream.
    pub fn overall_of_ratio(&self, chamber: &ChamberState) -> f64 {
        (chamber.ox_mass_flow + self.ox_mass_flow) / (chamber.fuel_mass_flow + self.fuel_mass_flow)
    }
}

/// Split a gas-generator flow into (oxidizer, fuel).
fn split(mass_flow: f64, of_ratio: f64) -> (f64, f64) {
    let fuel = mass_flow / (of_ratio + 1.0);
    (fuel * of_ratio, fuel)
}

/// Static pressure in the main nozzle where the wall area ratio is `area_ratio` [Pa].
pub fn nozzle_static_pressure(chamber: &ChamberState, area_ratio: f64) -> CycleResult<f64> {
    let s = &chamber.combustion;
    let gamma = s.nozzle_gamma;
    let mach = mach_from_area_ratio(area_ratio, gamma)?;
    let ratio = temperature_ratio_between(s.nozzle_mach, mach, gamma);
    Ok(pressure_ratio_from_temperature_ratio(ratio, gamma) * s.nozzle_pressure)
}

/// Clamp an injection station to `[frozen area ratio, nozzle area ratio]`.
pub fn resolve_exhaust(exhaust: TurbineExhaust, chamber: &ChamberState) -> TurbineExhaust {
    match exhaust {
        TurbineExhaust::Direct => TurbineExhaust::Direct,
        TurbineExhaust::IntoNozzle { area_ratio } => {
            let lo = chamber.combustion.frozen_area_ratio.min(chamber.area_ratio);
            let clamped = area_ratio.clamp(lo, chamber.area_ratio);
            if clamped != area_ratio {
                tracing::warn!(requested = area_ratio, applied = clamped, "turbine exhaust injection station clamped");
            }
            TurbineExhaust::IntoNozzle { area_ratio: clamped }
        }
    }
}

/// Balance the gas-generator turbine against the pumps.
pub fn solve(
    chamber: &ChamberState,
    settings: &EngineSettings,
    injector_drop_ratio: f64,
    turbopump: &TurboPump,
    mixture: &BiPropellantMixture,
) -> CycleResult<GasGeneratorDiagnostics> {
    let tank = settings.tank_pressure;
    let injector_inlet = chamber.injector_inlet_pressure(injector_drop_ratio);
    let ox_rise = injector_inlet - tank;
    let fuel_rise = injector_inlet * (1.0 + settings.regen_drop_ratio) - tank;

    let gg_drop = (1.5 * injector_drop_ratio).max(MIN_GG_INJECTOR_DROP);
    let pressure = injector_inlet / (1.0 + gg_drop);
    let state = mixture.state_at_pressure_and_temperature(
        pa(pressure),
        k(settings.turbine_inlet_temperature()),
        settings.oxidizer_rich,
    )?;
    let gamma = state.nozzle_gamma;
    if !(gamma > 1.0) {
        return Err(CycleError::NonPhysical {
            what: "gas generator gamma must exceed 1",
        });
    }

    let exhaust = resolve_exhaust(settings.turbine_exhaust, chamber);
    let exhaust_static = match exhaust {
        TurbineExhaust::Direct => DIRECT_EXHAUST_PRESSURE_PA,
        TurbineExhaust::IntoNozzle { area_ratio } => {
            nozzle_static_pressure(chamber, area_ratio)? * NOZZLE_INJECTION_PIPING_FACTOR
        }
    };
    let back_pressure = exhaust_static
        * pressure_ratio_from_temperature_ratio(stagnation_temperature_ratio(1.0, gamma), gamma);
    if back_pressure >= pressure {
        return Err(CycleError::TurbineCannotExpand {
            inlet_pressure_pa: pressure,
            back_pressure_pa: back_pressure,
        });
    }
    let pressure_ratio = pressure / back_pressure;

    let demand_for = |turbine_flow: f64| {
        let (ox, fuel) = split(turbine_flow, state.of_ratio);
        PumpDemand {
            ox_mass_flow: kgps(chamber.ox_mass_flow + ox),
            fuel_mass_flow: kgps(chamber.fuel_mass_flow + fuel),
            ox_pressure_rise: pa(ox_rise),
            fuel_pressure_rise: pa(fuel_rise),
            tank_pressure: pa(tank),
        }
    };

    let config = BrentConfig::with_tolerance(TURBINE_FLOW_TOLERANCE);
    let solution = try_brent(
        |turbine_flow| -> CycleResult<f64> {
            let point = turbopump.balance(&demand_for(turbine_flow), state, pressure_ratio)?;
            Ok(point.turbine.mass_flow.value - turbine_flow)
        },
        0.0,
        MAX_TURBINE_FLOW_FRACTION * chamber.mass_flow,
        &config,
    )?;
    if solution.outcome == RootOutcome::MaxIterations {
        tracing::warn!(residual = solution.residual, "gas generator flow did not converge");
    }

    let turbine_mass_flow = solution.root;
    let turbopump_point = turbopump.balance(&demand_for(turbine_mass_flow), state, pressure_ratio)?;
    let (ox_mass_flow, fuel_mass_flow) = split(turbine_mass_flow, state.of_ratio);

    let exhaust_area = match exhaust {
        TurbineExhaust::Direct => {
            let t0 = turbopump_point.turbine.exit_temperature.value;
            turbine_mass_flow / (back_pressure * choked_flow_parameter(gamma, state.nozzle_molar_mass, t0))
        }
        TurbineExhaust::IntoNozzle { .. } => 0.0,
    };

    tracing::debug!(
        pressure,
        pressure_ratio,
        turbine_mass_flow,
        gg_of = state.of_ratio,
        iterations = solution.iterations,
        "gas generator balanced"
    );

    Ok(GasGeneratorDiagnostics {
        state,
        pressure,
        injector_drop_ratio: gg_drop,
        exhaust,
        back_pressure,
        pressure_ratio,
        turbine_mass_flow,
        ox_mass_flow,
        fuel_mass_flow,
        mass_flow_fraction: turbine_mass_flow / (chamber.mass_flow + turbine_mass_flow),
        exhaust_area,
        turbopump: turbopump_point,
        iterations: solution.iterations,
    })
}

/// Thrust contributed by the turbine exhaust stream.
///
/// A direct duct is a choked converging nozzle: sonic momentum plus exit
/// pressure over the duct area. Exhaust injected into the main nozzle expands
/// through the remaining area ratio and shares the main nozzle's divergence
/// loss, and the friction loss of the wall downstream of the injection point.
pub fn exhaust_thrust(
    gg: &GasGeneratorDiagnostics,
    chamber: &ChamberState,
    contour: &NozzleContour,
    losses: &NozzleLosses,
) -> CycleResult<AuxiliaryThrust> {
    let gamma = gg.state.nozzle_gamma;
    let mw = gg.state.nozzle_molar_mass;
    let t0 = gg.turbopump.turbine.exit_temperature.value;
    let mdot = gg.turbine_mass_flow;

    match gg.exhaust {
        TurbineExhaust::Direct => {
            let sonic = stagnation_temperature_ratio(1.0, gamma);
            let velocity = speed_of_sound(gamma, mw, t0 / sonic);
            let exit_pressure = gg.back_pressure / pressure_ratio_from_temperature_ratio(sonic, gamma);
            let momentum = velocity * mdot;
            Ok(AuxiliaryThrust {
                vacuum: momentum + exit_pressure * gg.exhaust_area,
                sea_level: momentum + (exit_pressure - P_SEA_LEVEL_PA) * gg.exhaust_area,
            })
        }
        TurbineExhaust::IntoNozzle { area_ratio } => {
            let expansion = chamber.area_ratio / area_ratio;
            let mach = if expansion <= 1.0 {
                1.0
            } else {
                mach_from_area_ratio(expansion, gamma)?
            };
            let t = t0 / stagnation_temperature_ratio(mach, gamma);
            let velocity = mach * speed_of_sound(gamma, mw, t);
            let frac = contour.frac_length_at_area(area_ratio);
            let momentum =
                velocity * mdot * losses.divergence * (frac + losses.friction * (1.0 - frac));
            Ok(AuxiliaryThrust {
                vacuum: momentum,
                sea_level: momentum,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_preserves_flow() {
        let (ox, fuel) = split(10.0, 0.4);
        assert!((ox + fuel - 10.0).abs() < 1e-12);
        assert!((ox / fuel - 0.4).abs() < 1e-12);
    }

    #[test]
    fn direct_exhaust_pressure_is_one_and_a_half_atmospheres() {
        assert!((DIRECT_EXHAUST_PRESSURE_PA - 151_950.0).abs() < 1e-9);
    }
}
