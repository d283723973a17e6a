//! Staged-combustion cycle.
//!
//! The whole oxidizer flow (oxidizer-rich) or the whole fuel flow
//! (fuel-rich) passes through a preburner and its turbine before reaching
//! the main injector. The unknown is the turbine pressure ratio: the pumps
//! must raise the propellant to the preburner pressure, so both the pump
//! demand and the turbine output grow with it. Brackets are swept upward
//! from a ratio of 1 until Brent's method finds a balance.

use crate::chamber::ChamberState;
use crate::error::{CycleError, CycleResult};
use crate::params::EngineSettings;
use pe_components::{PumpDemand, TurboPump, TurboPumpPoint};
use pe_core::units::{k, kgps, pa};
use pe_propellants::{BiPropellantMixture, CombustionState};
use pe_solver::{BrentConfig, RootOutcome, SolverError, try_brent};

/// Lowest turbine pressure ratio tried.
pub const MIN_PRESSURE_RATIO: f64 = 1.0001;

/// Fraction of the maximum available pressure the preburner may use.
pub const MAX_PRESSURE_MARGIN: f64 = 0.99;

/// Number of equal brackets between the minimum and maximum ratio.
pub const BRACKET_COUNT: usize = 20;

const PRESSURE_RATIO_TOLERANCE: f64 = 1e-6;

#[derive(Clone, Debug, PartialEq)]
pub struct StagedDiagnostics {
    /// Preburner combustion state at the turbine inlet temperature
    pub state: CombustionState,
    /// [Pa]
    pub pressure: f64,
    pub pressure_ratio: f64,
    pub max_pressure_ratio: f64,
    /// Flow routed through the preburner [kg/s]
    pub turbine_mass_flow: f64,
    /// Frozen-station temperature drop from turbine work [K]
    pub temperature_shift: f64,
    pub turbopump: TurboPumpPoint,
    /// Brackets searched before a balance was found
    pub brackets_tried: usize,
}

struct PreburnerPoint {
    state: CombustionState,
    pressure: f64,
    routed_flow: f64,
    turbopump: TurboPumpPoint,
}

impl PreburnerPoint {
    fn residual(&self) -> f64 {
        self.turbopump.turbine.mass_flow.value - self.routed_flow
    }
}

struct Preburner<'a> {
    chamber: &'a ChamberState,
    settings: &'a EngineSettings,
    mixture: &'a BiPropellantMixture,
    turbopump: &'a TurboPump,
    injector_inlet: f64,
    injector_drop_ratio: f64,
    turbine_inlet_temperature: f64,
}

impl Preburner<'_> {
    fn evaluate(&self, pressure_ratio: f64) -> CycleResult<PreburnerPoint> {
        let pressure = self.injector_inlet * pressure_ratio;
        let state = self.mixture.state_at_pressure_and_temperature(
            pa(pressure),
            k(self.turbine_inlet_temperature),
            self.settings.oxidizer_rich,
        )?;
        if !(state.of_ratio > 0.0) {
            return Err(CycleError::NonPhysical {
                what: "preburner O/F ratio must be positive",
            });
        }

        let (ox, fuel) = if self.settings.oxidizer_rich {
            let ox = self.chamber.ox_mass_flow;
            (ox, ox / state.of_ratio)
        } else {
            let fuel = self.chamber.fuel_mass_flow;
            (fuel * state.of_ratio, fuel)
        };

        let pump_outlet = pressure * (1.0 + self.injector_drop_ratio);
        let tank = self.settings.tank_pressure;
        let demand = PumpDemand {
            ox_mass_flow: kgps(self.chamber.ox_mass_flow),
            fuel_mass_flow: kgps(self.chamber.fuel_mass_flow),
            ox_pressure_rise: pa(pump_outlet - tank),
            fuel_pressure_rise: pa(pump_outlet * (1.0 + self.settings.regen_drop_ratio) - tank),
            tank_pressure: pa(tank),
        };
        let turbopump = self.turbopump.balance(&demand, state, pressure_ratio)?;

        Ok(PreburnerPoint {
            state,
            pressure,
            routed_flow: ox + fuel,
            turbopump,
        })
    }
}

/// Find the turbine pressure ratio that balances the preburner turbine.
pub fn solve(
    chamber: &ChamberState,
    settings: &EngineSettings,
    injector_drop_ratio: f64,
    turbopump: &TurboPump,
    mixture: &BiPropellantMixture,
) -> CycleResult<StagedDiagnostics> {
    let injector_inlet = chamber.injector_inlet_pressure(injector_drop_ratio);
    let max_pressure_ratio =
        mixture.max_pressure_available().value / injector_inlet * MAX_PRESSURE_MARGIN;
    if !(max_pressure_ratio > MIN_PRESSURE_RATIO) {
        return Err(CycleError::NoPowerBalance { max_pressure_ratio });
    }

    let preburner = Preburner {
        chamber,
        settings,
        mixture,
        turbopump,
        injector_inlet,
        injector_drop_ratio,
        turbine_inlet_temperature: settings.turbine_inlet_temperature(),
    };

    let config = BrentConfig::with_tolerance(PRESSURE_RATIO_TOLERANCE);
    let interval = (max_pressure_ratio - MIN_PRESSURE_RATIO) / BRACKET_COUNT as f64;

    for bracket in 0..BRACKET_COUNT {
        let lower = MIN_PRESSURE_RATIO + interval * bracket as f64;
        let upper = lower + interval;
        let attempt = try_brent(
            |pr| preburner.evaluate(pr).map(|p| p.residual()),
            lower,
            upper,
            &config,
        );
        let solution = match attempt {
            Ok(solution) => solution,
            Err(CycleError::Solver(SolverError::NotBracketed { .. })) => continue,
            Err(e) => return Err(e),
        };
        if solution.outcome == RootOutcome::MaxIterations {
            tracing::warn!(residual = solution.residual, "preburner balance did not converge");
        }

        let point = preburner.evaluate(solution.root)?;
        let turbine_power = point.turbopump.pumps.shaft_power.value;
        let temperature_shift = turbine_power / (chamber.mass_flow * chamber.combustion.nozzle_cp);

        tracing::debug!(
            pressure_ratio = solution.root,
            preburner_pressure = point.pressure,
            preburner_of = point.state.of_ratio,
            brackets = bracket + 1,
            "preburner balanced"
        );

        return Ok(StagedDiagnostics {
            state: point.state,
            pressure: point.pressure,
            pressure_ratio: solution.root,
            max_pressure_ratio,
            turbine_mass_flow: point.routed_flow,
            temperature_shift,
            turbopump: point.turbopump,
            brackets_tried: bracket + 1,
        });
    }

    Err(CycleError::NoPowerBalance { max_pressure_ratio })
}
