//! Engine solver: chamber phase, cycle balance and nozzle phase.

use crate::cache::ParameterCache;
use crate::chamber;
use crate::context::EngineDataContext;
use crate::error::CycleResult;
use crate::gas_generator::{self, GasGeneratorDiagnostics};
use crate::nozzle_performance::{self, AuxiliaryThrust, NozzleLosses};
use crate::params::{EngineParameters, EngineSettings};
use crate::pressure_fed::{self, PressureFedDiagnostics};
use crate::staged::{self, StagedDiagnostics};
use pe_components::{NozzleContour, TurboPump};
use pe_core::units::{Force, Length, MassRate, Pressure, Time, kgps, m, n, pa, s};
use pe_propellants::CombustionState;
use serde::{Deserialize, Serialize};

/// Power cycle feeding the main chamber.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineCycle {
    #[default]
    PressureFed,
    GasGenerator,
    StagedCombustion,
}

impl EngineCycle {
    pub fn label(self) -> &'static str {
        match self {
            EngineCycle::PressureFed => "Pressure Fed",
            EngineCycle::GasGenerator => "Gas Generator",
            EngineCycle::StagedCombustion => "Staged Combustion",
        }
    }

    pub fn has_turbopump(self) -> bool {
        !matches!(self, EngineCycle::PressureFed)
    }
}

/// Cycle-specific results.
#[derive(Clone, Debug, PartialEq)]
pub enum CycleDiagnostics {
    PressureFed(PressureFedDiagnostics),
    GasGenerator(Box<GasGeneratorDiagnostics>),
    StagedCombustion(Box<StagedDiagnostics>),
}

/// Derived engine performance. All fields are SI; the zero value marks an
/// engine that has not been (or could not be) evaluated.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EnginePerformance {
    pub cycle: EngineCycle,
    /// Applied (clamped) chamber O/F
    pub of_ratio: f64,
    /// Applied chamber pressure [Pa]
    pub chamber_pressure: f64,
    /// [m]
    pub throat_diameter: f64,
    /// Applied area ratio
    pub area_ratio: f64,
    pub combustion: CombustionState,
    pub reaction_efficiency: f64,
    pub injector_drop_ratio: f64,

    /// [kg/s]
    pub chamber_mass_flow: f64,
    pub chamber_ox_mass_flow: f64,
    pub chamber_fuel_mass_flow: f64,
    /// Flow through the turbine [kg/s]
    pub turbine_mass_flow: f64,
    pub total_mass_flow: f64,
    /// O/F including any turbine bleed flow
    pub overall_of_ratio: f64,

    /// [N]
    pub thrust_vacuum: f64,
    pub thrust_sea_level: f64,
    pub min_thrust_vacuum: f64,
    /// [s]
    pub isp_vacuum: f64,
    pub isp_sea_level: f64,

    /// [m]
    pub exit_diameter: f64,
    /// [Pa]
    pub exit_pressure: f64,
    /// [K]
    pub exit_temperature: f64,
    pub exit_mach: f64,
    /// [m/s]
    pub exhaust_velocity: f64,
    pub divergence_efficiency: f64,
    pub friction_efficiency: f64,
    pub auxiliary_thrust: AuxiliaryThrust,

    pub diagnostics: Option<CycleDiagnostics>,
}

impl EnginePerformance {
    fn zeroed(cycle: EngineCycle) -> Self {
        Self {
            cycle,
            ..Self::default()
        }
    }

    pub fn is_computed(&self) -> bool {
        self.total_mass_flow > 0.0
    }

    pub fn thrust_vacuum_q(&self) -> Force {
        n(self.thrust_vacuum)
    }

    pub fn thrust_sea_level_q(&self) -> Force {
        n(self.thrust_sea_level)
    }

    pub fn isp_vacuum_q(&self) -> Time {
        s(self.isp_vacuum)
    }

    pub fn isp_sea_level_q(&self) -> Time {
        s(self.isp_sea_level)
    }

    pub fn total_mass_flow_q(&self) -> MassRate {
        kgps(self.total_mass_flow)
    }

    pub fn chamber_mass_flow_q(&self) -> MassRate {
        kgps(self.chamber_mass_flow)
    }

    pub fn exit_diameter_q(&self) -> Length {
        m(self.exit_diameter)
    }

    pub fn exit_pressure_q(&self) -> Pressure {
        pa(self.exit_pressure)
    }

    pub fn gas_generator(&self) -> Option<&GasGeneratorDiagnostics> {
        match &self.diagnostics {
            Some(CycleDiagnostics::GasGenerator(gg)) => Some(gg.as_ref()),
            _ => None,
        }
    }

    pub fn staged(&self) -> Option<&StagedDiagnostics> {
        match &self.diagnostics {
            Some(CycleDiagnostics::StagedCombustion(sc)) => Some(sc.as_ref()),
            _ => None,
        }
    }

    pub fn pressure_fed(&self) -> Option<&PressureFedDiagnostics> {
        match &self.diagnostics {
            Some(CycleDiagnostics::PressureFed(pf)) => Some(pf),
            _ => None,
        }
    }
}

/// Everything a recomputation depends on.
#[derive(Clone, Debug, PartialEq)]
struct EngineInputs {
    cycle: EngineCycle,
    params: EngineParameters,
    settings: EngineSettings,
}

/// Result of the cycle-specific phase.
struct CycleBalance {
    turbine_mass_flow: f64,
    total_mass_flow: f64,
    overall_of_ratio: f64,
    temperature_shift: f64,
    diagnostics: CycleDiagnostics,
}

/// One engine design, recomputed in full whenever an input changes.
///
/// ```text
/// Unconfigured --set_parameters--> Computed --set_*--> Computed
/// ```
#[derive(Debug)]
pub struct EngineSolver {
    cycle: EngineCycle,
    context: EngineDataContext,
    settings: EngineSettings,
    requested: Option<EngineParameters>,
    cache: ParameterCache<EngineInputs>,
    turbopump: Option<TurboPump>,
    contour: Option<NozzleContour>,
    performance: EnginePerformance,
}

impl EngineSolver {
    pub fn new(cycle: EngineCycle, context: EngineDataContext, settings: EngineSettings) -> Self {
        Self {
            cycle,
            context,
            settings,
            requested: None,
            cache: ParameterCache::new(),
            turbopump: None,
            contour: None,
            performance: EnginePerformance::zeroed(cycle),
        }
    }

    pub fn cycle(&self) -> EngineCycle {
        self.cycle
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Parameters as last requested, before clamping.
    pub fn requested_parameters(&self) -> Option<&EngineParameters> {
        self.requested.as_ref()
    }

    /// Parameters actually used by the last successful evaluation.
    pub fn applied_parameters(&self) -> Option<&EngineParameters> {
        self.cache.last().map(|inputs| &inputs.params)
    }

    pub fn performance(&self) -> &EnginePerformance {
        &self.performance
    }

    pub fn contour(&self) -> Option<&NozzleContour> {
        self.contour.as_ref()
    }

    pub fn turbopump(&self) -> Option<&TurboPump> {
        self.turbopump.as_ref()
    }

    /// Apply new design parameters. Returns `Ok(true)` when the engine was
    /// recomputed, `Ok(false)` when the clamped inputs are unchanged.
    ///
    /// On failure the performance is reset to zero and the error is returned.
    pub fn set_parameters(&mut self, params: EngineParameters) -> CycleResult<bool> {
        self.requested = Some(params);
        self.refresh()
    }

    pub fn set_settings(&mut self, settings: EngineSettings) -> CycleResult<bool> {
        self.settings = settings;
        self.refresh()
    }

    pub fn set_cycle(&mut self, cycle: EngineCycle) -> CycleResult<bool> {
        self.cycle = cycle;
        self.refresh()
    }

    fn refresh(&mut self) -> CycleResult<bool> {
        let Some(requested) = &self.requested else {
            return Ok(false);
        };
        let inputs = EngineInputs {
            cycle: self.cycle,
            params: requested.clamped(),
            settings: self.settings.clone(),
        };
        if !self.cache.update(&inputs) {
            return Ok(false);
        }

        match self.compute(&inputs) {
            Ok(performance) => {
                tracing::debug!(
                    cycle = ?inputs.cycle,
                    thrust_vacuum = performance.thrust_vacuum,
                    isp_vacuum = performance.isp_vacuum,
                    "engine recomputed"
                );
                self.performance = performance;
                Ok(true)
            }
            Err(e) => {
                tracing::warn!(cycle = ?inputs.cycle, error = %e, "engine evaluation failed");
                self.performance = EnginePerformance::zeroed(inputs.cycle);
                self.cache.invalidate();
                Err(e)
            }
        }
    }

    fn compute(&mut self, inputs: &EngineInputs) -> CycleResult<EnginePerformance> {
        let EngineInputs {
            cycle,
            params,
            settings,
        } = inputs;
        let cycle = *cycle;
        let mixture = params.mixture.as_ref();
        let injector_drop_ratio = settings.injector_drop_ratio(&self.context.correlations);

        let chamber = chamber::solve_chamber(params)?;

        let balance = if cycle.has_turbopump() {
            let turbopump = self.turbopump.insert(TurboPump::new(
                mixture,
                settings.turbopump,
                self.context.correlations.clone(),
            ));
            match cycle {
                EngineCycle::GasGenerator => {
                    let gg = gas_generator::solve(&chamber, settings, injector_drop_ratio, turbopump, mixture)?;
                    CycleBalance {
                        turbine_mass_flow: gg.turbine_mass_flow,
                        total_mass_flow: gg.total_mass_flow(&chamber),
                        overall_of_ratio: gg.overall_of_ratio(&chamber),
                        temperature_shift: 0.0,
                        diagnostics: CycleDiagnostics::GasGenerator(Box::new(gg)),
                    }
                }
                _ => {
                    let sc = staged::solve(&chamber, settings, injector_drop_ratio, turbopump, mixture)?;
                    CycleBalance {
                        turbine_mass_flow: sc.turbine_mass_flow,
                        total_mass_flow: chamber.mass_flow,
                        overall_of_ratio: chamber.of_ratio,
                        temperature_shift: sc.temperature_shift,
                        diagnostics: CycleDiagnostics::StagedCombustion(Box::new(sc)),
                    }
                }
            }
        } else {
            self.turbopump = None;
            CycleBalance {
                turbine_mass_flow: 0.0,
                total_mass_flow: chamber.mass_flow,
                overall_of_ratio: chamber.of_ratio,
                temperature_shift: 0.0,
                diagnostics: CycleDiagnostics::PressureFed(pressure_fed::solve(
                    &chamber,
                    injector_drop_ratio,
                )),
            }
        };

        let expansion = nozzle_performance::expand(&chamber, balance.temperature_shift)?;

        let contour = match &mut self.contour {
            Some(contour) => {
                contour.update(settings.nozzle_rel_length, chamber.area_ratio, settings.nozzle_shape)?;
                contour
            }
            slot @ None => slot.insert(NozzleContour::new(
                self.context.bell_curves.clone(),
                settings.nozzle_rel_length,
                chamber.area_ratio,
                settings.nozzle_shape,
            )?),
        };
        let losses: NozzleLosses = nozzle_performance::losses(contour, &chamber, &expansion)?;

        let auxiliary_thrust = match &balance.diagnostics {
            CycleDiagnostics::GasGenerator(gg) => gas_generator::exhaust_thrust(gg, &chamber, contour, &losses)?,
            _ => AuxiliaryThrust::default(),
        };

        let thrust = nozzle_performance::thrust(
            &chamber,
            &expansion,
            &losses,
            balance.total_mass_flow,
            auxiliary_thrust,
            settings.min_throttle(),
        );

        Ok(EnginePerformance {
            cycle,
            of_ratio: chamber.of_ratio,
            chamber_pressure: chamber.chamber_pressure,
            throat_diameter: chamber.throat_diameter,
            area_ratio: chamber.area_ratio,
            combustion: chamber.combustion,
            reaction_efficiency: chamber.reaction_efficiency,
            injector_drop_ratio,
            chamber_mass_flow: chamber.mass_flow,
            chamber_ox_mass_flow: chamber.ox_mass_flow,
            chamber_fuel_mass_flow: chamber.fuel_mass_flow,
            turbine_mass_flow: balance.turbine_mass_flow,
            total_mass_flow: balance.total_mass_flow,
            overall_of_ratio: balance.overall_of_ratio,
            thrust_vacuum: thrust.vacuum,
            thrust_sea_level: thrust.sea_level,
            min_thrust_vacuum: thrust.min_vacuum,
            isp_vacuum: thrust.isp_vacuum,
            isp_sea_level: thrust.isp_sea_level,
            exit_diameter: chamber.exit_diameter,
            exit_pressure: expansion.exit_pressure,
            exit_temperature: expansion.exit_temperature,
            exit_mach: expansion.exit_mach,
            exhaust_velocity: expansion.exhaust_velocity,
            divergence_efficiency: losses.divergence,
            friction_efficiency: losses.friction,
            auxiliary_thrust,
            diagnostics: Some(balance.diagnostics),
        })
    }
}
