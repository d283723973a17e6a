//! Turbine driven by auxiliary combustor gas.

use crate::correlation::TurbomachineryCorrelations;
use crate::error::{ComponentError, ComponentResult};
use pe_core::units::{AngVel, MassRate, Power, Temperature, k, kgps, w};
use pe_propellants::CombustionState;

/// Mean blade pitch radius [m].
pub const PITCH_RADIUS_M: f64 = 0.15;

/// Blade tip speed limit [m/s].
pub const MAX_BLADE_SPEED_MPS: f64 = 400.0;

/// Single-stage impulse turbine.
///
/// ## Model
///
/// ```text
/// TR   = PR^((γ-1)/γ)
/// Δh_s = cp · T_in · (1 - 1/TR)
/// c0   = √(2 · Δh_s)
/// U    = min(ω · r_pitch, U_max)
/// η    = η(U / c0)
/// ṁ    = P_shaft / (η · Δh_s)
/// ```
///
/// Inlet properties come from the combustor state: chamber temperature and
/// specific heat, nozzle-exit gamma.
#[derive(Clone, Debug)]
pub struct Turbine {
    pub inlet: CombustionState,
    pub pressure_ratio: f64,
}

/// Turbine sized to deliver a shaft power.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TurbineOperatingPoint {
    pub pressure_ratio: f64,
    pub temperature_ratio: f64,
    pub blade_speed: f64,
    /// Blade speed over isentropic spouting velocity
    pub velocity_ratio: f64,
    pub efficiency: f64,
    pub mass_flow: MassRate,
    pub power: Power,
    pub exit_temperature: Temperature,
}

impl TurbineOperatingPoint {
    /// Two turbines fed in parallel from one inlet at the same pressure ratio,
    /// exhausting into a common manifold. Flows and powers add; efficiency,
    /// blade speed, velocity ratio and exit temperature are flow-weighted.
    pub fn parallel(a: &Self, b: &Self) -> Self {
        let (ma, mb) = (a.mass_flow.value, b.mass_flow.value);
        let total = ma + mb;
        let weigh = |x: f64, y: f64| if total > 0.0 { (x * ma + y * mb) / total } else { 0.5 * (x + y) };
        Self {
            pressure_ratio: a.pressure_ratio,
            temperature_ratio: a.temperature_ratio,
            blade_speed: weigh(a.blade_speed, b.blade_speed),
            velocity_ratio: weigh(a.velocity_ratio, b.velocity_ratio),
            efficiency: weigh(a.efficiency, b.efficiency),
            mass_flow: kgps(total),
            power: a.power + b.power,
            exit_temperature: k(weigh(a.exit_temperature.value, b.exit_temperature.value)),
        }
    }
}

impl Turbine {
    pub fn new(inlet: CombustionState, pressure_ratio: f64) -> ComponentResult<Self> {
        if !(pressure_ratio.is_finite() && pressure_ratio > 1.0) {
            return Err(ComponentError::NonPhysical {
                what: "turbine pressure ratio must exceed 1",
            });
        }
        if !(inlet.nozzle_gamma > 1.0) {
            return Err(ComponentError::NonPhysical {
                what: "turbine inlet gamma must exceed 1",
            });
        }
        if !(inlet.chamber_cp > 0.0 && inlet.chamber_temperature > 0.0) {
            return Err(ComponentError::NonPhysical {
                what: "turbine inlet temperature and cp must be positive",
            });
        }
        Ok(Self {
            inlet,
            pressure_ratio,
        })
    }

    pub fn temperature_ratio(&self) -> f64 {
        let g = self.inlet.nozzle_gamma;
        self.pressure_ratio.powf((g - 1.0) / g)
    }

    /// Isentropic enthalpy drop [J/kg].
    pub fn isentropic_work(&self) -> f64 {
        self.inlet.chamber_cp * self.inlet.chamber_temperature * (1.0 - 1.0 / self.temperature_ratio())
    }

    /// Spouting velocity [m/s].
    pub fn isentropic_velocity(&self) -> f64 {
        (2.0 * self.isentropic_work()).sqrt()
    }

    pub fn blade_speed(speed: AngVel) -> f64 {
        (speed.value * PITCH_RADIUS_M).min(MAX_BLADE_SPEED_MPS)
    }

    pub fn efficiency(&self, speed: AngVel, correlations: &TurbomachineryCorrelations) -> f64 {
        let ratio = Self::blade_speed(speed) / self.isentropic_velocity();
        correlations.turbine_efficiency.evaluate(ratio)
    }

    /// Power available from `mass_flow` with ideal expansion.
    pub fn isentropic_power(&self, mass_flow: MassRate) -> Power {
        w(mass_flow.value * self.isentropic_work())
    }

    /// Flow and exit state needed to deliver `shaft_power` at `speed`.
    pub fn operating_point(
        &self,
        speed: AngVel,
        shaft_power: Power,
        correlations: &TurbomachineryCorrelations,
    ) -> ComponentResult<TurbineOperatingPoint> {
        let blade_speed = Self::blade_speed(speed);
        let velocity_ratio = blade_speed / self.isentropic_velocity();
        let efficiency = correlations.turbine_efficiency.evaluate(velocity_ratio);
        if !(efficiency > 0.0) {
            return Err(ComponentError::NonPhysical {
                what: "turbine efficiency must be positive",
            });
        }

        let temperature_ratio = self.temperature_ratio();
        let mass_flow = shaft_power.value / (efficiency * self.isentropic_work());
        let exit_temperature =
            self.inlet.chamber_temperature * (1.0 - efficiency * (1.0 - 1.0 / temperature_ratio));

        Ok(TurbineOperatingPoint {
            pressure_ratio: self.pressure_ratio,
            temperature_ratio,
            blade_speed,
            velocity_ratio,
            efficiency,
            mass_flow: kgps(mass_flow),
            power: shaft_power,
            exit_temperature: k(exit_temperature),
        })
    }
}
