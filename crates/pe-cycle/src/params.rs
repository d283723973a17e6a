//! Engine design inputs.

use pe_components::{NozzleShape, TurboPumpConfig, TurbomachineryCorrelations};
use pe_core::units::{Length, Pressure, mpa, pa};
use pe_propellants::BiPropellantMixture;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Turbine inlet temperature bounds [K].
pub const TURBINE_INLET_TEMPERATURE_LIMITS: (f64, f64) = (700.0, 1350.0);

/// Lowest minimum-throttle fraction the injector can be designed for.
pub const MIN_THROTTLE_LIMIT: f64 = 0.1;

/// Primary design parameters. Comparing two sets treats mixtures as equal
/// only when they are the same shared instance.
#[derive(Clone, Debug)]
pub struct EngineParameters {
    pub mixture: Arc<BiPropellantMixture>,
    pub of_ratio: f64,
    pub chamber_pressure: Pressure,
    pub throat_diameter: Length,
    pub area_ratio: f64,
}

impl PartialEq for EngineParameters {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.mixture, &other.mixture)
            && self.of_ratio == other.of_ratio
            && self.chamber_pressure == other.chamber_pressure
            && self.throat_diameter == other.throat_diameter
            && self.area_ratio == other.area_ratio
    }
}

impl EngineParameters {
    pub fn new(
        mixture: Arc<BiPropellantMixture>,
        of_ratio: f64,
        chamber_pressure: Pressure,
        throat_diameter: Length,
        area_ratio: f64,
    ) -> Self {
        Self {
            mixture,
            of_ratio,
            chamber_pressure,
            throat_diameter,
            area_ratio,
        }
    }

    /// Clamp O/F, chamber pressure and area ratio to the mixture envelope.
    pub fn clamped(&self) -> Self {
        let mix = &self.mixture;
        let of_ratio = mix.clamp_of_ratio(self.of_ratio);
        let chamber_pressure = mix.clamp_chamber_pressure(self.chamber_pressure);
        let area_ratio = self.area_ratio.max(mix.frozen_area_ratio());

        if of_ratio != self.of_ratio {
            let (lean, rich) = mix.of_limits();
            tracing::warn!(requested = self.of_ratio, applied = of_ratio, lean, rich, "O/F ratio clamped");
        }
        if chamber_pressure != self.chamber_pressure {
            tracing::warn!(
                requested_pa = self.chamber_pressure.value,
                applied_pa = chamber_pressure.value,
                "chamber pressure clamped"
            );
        }
        if area_ratio != self.area_ratio {
            tracing::warn!(requested = self.area_ratio, applied = area_ratio, "area ratio raised to frozen area ratio");
        }

        Self {
            mixture: mix.clone(),
            of_ratio,
            chamber_pressure,
            throat_diameter: self.throat_diameter,
            area_ratio,
        }
    }
}

/// Where gas-generator turbine exhaust goes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TurbineExhaust {
    /// Separate choked exhaust duct.
    #[default]
    Direct,
    /// Injected into the main nozzle wall at `area_ratio`.
    IntoNozzle { area_ratio: f64 },
}

/// Secondary design choices that rarely change between evaluations.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Regenerative cooling pressure drop as a fraction of injector inlet pressure
    pub regen_drop_ratio: f64,
    /// Propellant tank pressure [Pa]
    pub tank_pressure: f64,
    /// Minimum throttle fraction, sets the injector pressure drop
    pub min_throttle: f64,
    pub nozzle_shape: NozzleShape,
    /// Nozzle length relative to a 15° cone
    pub nozzle_rel_length: f64,
    /// Gas generator / preburner exit temperature [K]
    pub turbine_inlet_temperature: f64,
    /// Run the auxiliary combustor oxidizer-rich
    pub oxidizer_rich: bool,
    pub turbine_exhaust: TurbineExhaust,
    pub turbopump: TurboPumpConfig,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            regen_drop_ratio: 0.15,
            tank_pressure: mpa(0.2).value,
            min_throttle: 1.0,
            nozzle_shape: NozzleShape::Bell,
            nozzle_rel_length: 0.8,
            turbine_inlet_temperature: 1000.0,
            oxidizer_rich: false,
            turbine_exhaust: TurbineExhaust::Direct,
            turbopump: TurboPumpConfig::default(),
        }
    }
}

impl EngineSettings {
    pub fn min_throttle(&self) -> f64 {
        self.min_throttle.clamp(MIN_THROTTLE_LIMIT, 1.0)
    }

    /// Injector pressure drop ratio required for deep throttling.
    pub fn injector_drop_ratio(&self, correlations: &TurbomachineryCorrelations) -> f64 {
        correlations.injector_drop_for_min_throttle(self.min_throttle())
    }

    pub fn turbine_inlet_temperature(&self) -> f64 {
        let (lo, hi) = TURBINE_INLET_TEMPERATURE_LIMITS;
        let t = self.turbine_inlet_temperature.clamp(lo, hi);
        if t != self.turbine_inlet_temperature {
            tracing::warn!(requested = self.turbine_inlet_temperature, applied = t, "turbine inlet temperature clamped");
        }
        t
    }

    pub fn tank_pressure_q(&self) -> Pressure {
        pa(self.tank_pressure)
    }
}
