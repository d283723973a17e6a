//! Turbopump assembly: two pumps on one or two shafts driven by a turbine.

use crate::correlation::TurbomachineryCorrelations;
use crate::error::ComponentResult;
use crate::pump::{Pump, PumpOperatingPoint};
use crate::turbine::{MAX_BLADE_SPEED_MPS, PITCH_RADIUS_M, Turbine, TurbineOperatingPoint};
use pe_core::units::{AngVel, MassRate, Power, Pressure, radps, w};
use pe_propellants::{BiPropellantMixture, CombustionState};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Mechanical efficiency of a reduction gearbox.
pub const GEARBOX_EFFICIENCY: f64 = 0.975;

/// How the turbine drives the pumps.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurbopumpArrangement {
    /// One shaft; both pumps run at the slower cavitation limit.
    #[default]
    DirectDrive,
    /// Each pump geared to its own speed; turbine at its tip-speed limit.
    GearReduction,
    /// Separate turbine per pump.
    TwoTurbines,
}

impl TurbopumpArrangement {
    pub fn mechanical_efficiency(self) -> f64 {
        match self {
            TurbopumpArrangement::GearReduction => GEARBOX_EFFICIENCY,
            TurbopumpArrangement::DirectDrive | TurbopumpArrangement::TwoTurbines => 1.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TurboPumpConfig {
    pub arrangement: TurbopumpArrangement,
    pub inducers: bool,
    pub min_ox_stages: u32,
    pub min_fuel_stages: u32,
}

impl Default for TurboPumpConfig {
    fn default() -> Self {
        Self {
            arrangement: TurbopumpArrangement::DirectDrive,
            inducers: true,
            min_ox_stages: 1,
            min_fuel_stages: 1,
        }
    }
}

/// What the pumps must deliver.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PumpDemand {
    pub ox_mass_flow: MassRate,
    pub fuel_mass_flow: MassRate,
    pub ox_pressure_rise: Pressure,
    pub fuel_pressure_rise: Pressure,
    pub tank_pressure: Pressure,
}

/// Shaft speed or speeds the turbine side runs at.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TurbineDrive {
    /// One turbine on a single shaft.
    Shared { speed: AngVel },
    /// One turbine per pump, each on its pump's shaft, fed in parallel.
    Separate { oxidizer: AngVel, fuel: AngVel },
}

/// Both pumps sized at a common design point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PumpSet {
    pub oxidizer: PumpOperatingPoint,
    pub fuel: PumpOperatingPoint,
    pub mechanical_efficiency: f64,
    /// Shaft power the turbine must supply, including mechanical losses
    pub shaft_power: Power,
    pub drive: TurbineDrive,
}

impl PumpSet {
    /// Hydraulic power absorbed by both pumps.
    pub fn pump_power(&self) -> Power {
        self.oxidizer.power + self.fuel.power
    }
}

/// Pumps and turbine balanced at one operating point. With separate turbines
/// `turbine` is the parallel combination of the two.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TurboPumpPoint {
    pub pumps: PumpSet,
    pub turbine: TurbineOperatingPoint,
}

#[derive(Clone, Debug)]
pub struct TurboPump {
    config: TurboPumpConfig,
    oxidizer: Pump,
    fuel: Pump,
    correlations: Arc<TurbomachineryCorrelations>,
}

impl TurboPump {
    pub fn new(
        mixture: &BiPropellantMixture,
        config: TurboPumpConfig,
        correlations: Arc<TurbomachineryCorrelations>,
    ) -> Self {
        Self {
            config,
            oxidizer: Pump::new("oxidizer", mixture.oxidizer().clone(), config.min_ox_stages, true),
            fuel: Pump::new("fuel", mixture.fuel().clone(), config.min_fuel_stages, false),
            correlations,
        }
    }

    /// Swap propellants, keeping the configuration.
    pub fn set_mixture(&mut self, mixture: &BiPropellantMixture) {
        *self = Self::new(mixture, self.config, self.correlations.clone());
    }

    pub fn set_config(&mut self, config: TurboPumpConfig) {
        self.config = config;
        self.oxidizer.min_stages = config.min_ox_stages.max(1);
        self.fuel.min_stages = config.min_fuel_stages.max(1);
    }

    pub fn config(&self) -> &TurboPumpConfig {
        &self.config
    }

    pub fn correlations(&self) -> &TurbomachineryCorrelations {
        &self.correlations
    }

    pub fn oxidizer_pump(&self) -> &Pump {
        &self.oxidizer
    }

    pub fn fuel_pump(&self) -> &Pump {
        &self.fuel
    }

    /// Size both pumps at their cavitation-limited speeds.
    pub fn size_pumps(&self, demand: &PumpDemand) -> ComponentResult<PumpSet> {
        let inducers = self.config.inducers;
        let ox_limit = self
            .oxidizer
            .max_speed(demand.ox_mass_flow, demand.tank_pressure, inducers)?;
        let fuel_limit = self
            .fuel
            .max_speed(demand.fuel_mass_flow, demand.tank_pressure, inducers)?;

        let arrangement = self.config.arrangement;
        let (ox_speed, fuel_speed, drive) = match arrangement {
            TurbopumpArrangement::DirectDrive => {
                let shared = ox_limit.min(fuel_limit);
                (shared, shared, TurbineDrive::Shared { speed: shared })
            }
            TurbopumpArrangement::GearReduction => (
                ox_limit,
                fuel_limit,
                TurbineDrive::Shared {
                    speed: radps(MAX_BLADE_SPEED_MPS / PITCH_RADIUS_M),
                },
            ),
            TurbopumpArrangement::TwoTurbines => (
                ox_limit,
                fuel_limit,
                TurbineDrive::Separate {
                    oxidizer: ox_limit,
                    fuel: fuel_limit,
                },
            ),
        };

        let corr = self.correlations.as_ref();
        let oxidizer =
            self.oxidizer
                .operating_point(demand.ox_mass_flow, demand.ox_pressure_rise, ox_speed, corr)?;
        let fuel =
            self.fuel
                .operating_point(demand.fuel_mass_flow, demand.fuel_pressure_rise, fuel_speed, corr)?;

        let mechanical_efficiency = arrangement.mechanical_efficiency();
        let shaft_power = w((oxidizer.power.value + fuel.power.value) / mechanical_efficiency);

        tracing::debug!(
            ?arrangement,
            ox_speed = ox_speed.value,
            fuel_speed = fuel_speed.value,
            ox_eff = oxidizer.efficiency,
            fuel_eff = fuel.efficiency,
            shaft_power = shaft_power.value,
            "pumps sized"
        );

        Ok(PumpSet {
            oxidizer,
            fuel,
            mechanical_efficiency,
            shaft_power,
            drive,
        })
    }

    /// Size the pumps, then the turbine flow that drives them from `inlet`
    /// gas expanded through `pressure_ratio`.
    pub fn balance(
        &self,
        demand: &PumpDemand,
        inlet: CombustionState,
        pressure_ratio: f64,
    ) -> ComponentResult<TurboPumpPoint> {
        let pumps = self.size_pumps(demand)?;
        let turbine = Turbine::new(inlet, pressure_ratio)?;
        let corr = self.correlations.as_ref();
        let point = match pumps.drive {
            TurbineDrive::Shared { speed } => turbine.operating_point(speed, pumps.shaft_power, corr)?,
            TurbineDrive::Separate { oxidizer, fuel } => {
                let eta = pumps.mechanical_efficiency;
                let ox = turbine.operating_point(oxidizer, w(pumps.oxidizer.power.value / eta), corr)?;
                let fu = turbine.operating_point(fuel, w(pumps.fuel.power.value / eta), corr)?;
                TurbineOperatingPoint::parallel(&ox, &fu)
            }
        };
        Ok(TurboPumpPoint { pumps, turbine: point })
    }
}
