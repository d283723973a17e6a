//! Centrifugal propellant pump sizing model.

use crate::common::{EPSILON_MDOT, check_positive};
use crate::correlation::TurbomachineryCorrelations;
use crate::error::{ComponentError, ComponentResult};
use pe_core::constants::G0_MPS2;
use pe_core::units::{AngVel, Length, MassRate, Power, Pressure, m, radps, w};
use pe_propellants::PropellantProperties;

/// Suction specific speed retained by a pump without an inducer.
pub const NO_INDUCER_FACTOR: f64 = 0.35;

/// Viscous efficiency loss per stage, per Pa·s of dynamic viscosity.
pub const VISCOUS_LOSS_PER_STAGE: f64 = 500.0;

/// Efficiency penalty applied to oxidizer pumps.
pub const OXIDIZER_EFFICIENCY_FACTOR: f64 = 0.98;

/// Centrifugal pump for one propellant.
///
/// ## Model
///
/// ```text
/// NPSH   = (p_tank - p_vapor) / (g0 · ρ)
/// ω_max  = Nss · NPSH^0.75 / √Q             (× 0.35 without inducer)
/// H      = Δp / (ρ · g0)
/// stages = max(floor(Δp / Δp_stage + 1), min_stages)
/// Ns     = ω · √Q · (stages / H)^0.75
/// η      = η(Ns) · k(Q) · (1 - 500 · μ · stages) · [0.98 oxidizer]
/// P      = ṁ · Δp / (ρ · η)
/// ```
#[derive(Clone, Debug)]
pub struct Pump {
    pub name: String,
    pub propellant: PropellantProperties,
    pub min_stages: u32,
    pub oxidizer: bool,
}

/// Sized pump at one design point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PumpOperatingPoint {
    pub mass_flow: MassRate,
    pub pressure_rise: Pressure,
    /// Volumetric flow [m³/s]
    pub volumetric_flow: f64,
    pub head: Length,
    pub speed: AngVel,
    pub stages: u32,
    pub specific_speed: f64,
    pub efficiency: f64,
    pub power: Power,
}

impl Pump {
    pub fn new(
        name: impl Into<String>,
        propellant: PropellantProperties,
        min_stages: u32,
        oxidizer: bool,
    ) -> Self {
        Self {
            name: name.into(),
            propellant,
            min_stages: min_stages.max(1),
            oxidizer,
        }
    }

    fn density(&self) -> f64 {
        self.propellant.density.value
    }

    /// Net positive suction head [m] available from the tank.
    pub fn npsh(&self, tank_pressure: Pressure) -> ComponentResult<Length> {
        let margin = tank_pressure.value - self.propellant.vapor_pressure.value;
        if !(margin > 0.0) {
            return Err(ComponentError::NonPhysical {
                what: "tank pressure must exceed propellant vapor pressure",
            });
        }
        Ok(m(margin / (G0_MPS2 * self.density())))
    }

    /// Highest rotation rate before cavitation.
    pub fn max_speed(
        &self,
        mass_flow: MassRate,
        tank_pressure: Pressure,
        inducer: bool,
    ) -> ComponentResult<AngVel> {
        let q = check_positive(mass_flow.value / self.density(), "pump volumetric flow")?;
        let npsh = self.npsh(tank_pressure)?.value;
        let mut speed = self.propellant.suction_specific_speed * npsh.powf(0.75) / q.sqrt();
        if !inducer {
            speed *= NO_INDUCER_FACTOR;
        }
        Ok(radps(speed))
    }

    pub fn stage_count(&self, pressure_rise: Pressure) -> u32 {
        let per_stage = self.propellant.pressure_rise_per_stage.value;
        let stages = if per_stage > 0.0 {
            (pressure_rise.value / per_stage + 1.0).floor().max(1.0) as u32
        } else {
            1
        };
        stages.max(self.min_stages)
    }

    /// Size the pump for `mass_flow` and `pressure_rise` running at `speed`.
    pub fn operating_point(
        &self,
        mass_flow: MassRate,
        pressure_rise: Pressure,
        speed: AngVel,
        correlations: &TurbomachineryCorrelations,
    ) -> ComponentResult<PumpOperatingPoint> {
        if mass_flow.value < EPSILON_MDOT {
            return Err(ComponentError::NonPhysical {
                what: "pump mass flow must be positive",
            });
        }
        let dp = check_positive(pressure_rise.value, "pump pressure rise")?;
        let omega = check_positive(speed.value, "pump speed")?;
        let rho = self.density();

        let q = mass_flow.value / rho;
        let head = dp / (rho * G0_MPS2);
        let stages = self.stage_count(pressure_rise);
        let specific_speed = omega * q.sqrt() * (stages as f64 / head).powf(0.75);

        let viscous = 1.0 - VISCOUS_LOSS_PER_STAGE * self.propellant.viscosity.value * stages as f64;
        let mut efficiency = correlations.pump_efficiency_at(specific_speed)
            * correlations.pump_flow_multiplier.evaluate(q)
            * viscous;
        if self.oxidizer {
            efficiency *= OXIDIZER_EFFICIENCY_FACTOR;
        }
        if !(efficiency > 0.0) {
            return Err(ComponentError::NonPhysical {
                what: "pump efficiency must be positive",
            });
        }
        let efficiency = efficiency.min(1.0);
        let power = mass_flow.value * dp / (rho * efficiency);

        Ok(PumpOperatingPoint {
            mass_flow,
            pressure_rise,
            volumetric_flow: q,
            head: m(head),
            speed,
            stages,
            specific_speed,
            efficiency,
            power: w(power),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pe_core::units::{kgps, mpa};

    fn lox_pump() -> Pump {
        Pump::new("ox", PropellantProperties::new("LOX", 1141.0).unwrap(), 1, true)
    }

    #[test]
    fn npsh_from_tank_margin() {
        let pump = lox_pump();
        let npsh = pump.npsh(mpa(0.2)).unwrap().value;
        let expected = (0.2e6 - 2275.27) / (G0_MPS2 * 1141.0);
        assert!((npsh - expected).abs() < 1e-9);
        assert!(pump.npsh(mpa(0.001)).is_err());
    }

    #[test]
    fn inducer_raises_speed_limit() {
        let pump = lox_pump();
        let with = pump.max_speed(kgps(100.0), mpa(0.3), true).unwrap().value;
        let without = pump.max_speed(kgps(100.0), mpa(0.3), false).unwrap().value;
        assert!((without / with - NO_INDUCER_FACTOR).abs() < 1e-12);
    }

    #[test]
    fn stage_count_respects_minimum() {
        let mut pump = lox_pump();
        assert_eq!(pump.stage_count(mpa(10.0)), 1);
        assert_eq!(pump.stage_count(mpa(50.0)), 2);
        pump.min_stages = 3;
        assert_eq!(pump.stage_count(mpa(10.0)), 3);
    }

    #[test]
    fn power_matches_hydraulic_work_over_efficiency() {
        let pump = lox_pump();
        let c = TurbomachineryCorrelations::default();
        let op = pump
            .operating_point(kgps(100.0), mpa(8.0), radps(2000.0), &c)
            .unwrap();
        assert!(op.efficiency > 0.0 && op.efficiency <= 1.0);
        let hydraulic = 100.0 * 8.0e6 / 1141.0;
        assert!((op.power.value * op.efficiency - hydraulic).abs() < 1e-6 * hydraulic);
        assert_eq!(op.stages, 1);
    }

    #[test]
    fn oxidizer_pump_is_less_efficient() {
        let c = TurbomachineryCorrelations::default();
        let ox = lox_pump();
        let fuel = Pump { oxidizer: false, ..ox.clone() };
        let a = ox.operating_point(kgps(50.0), mpa(6.0), radps(1500.0), &c).unwrap();
        let b = fuel.operating_point(kgps(50.0), mpa(6.0), radps(1500.0), &c).unwrap();
        assert!((a.efficiency / b.efficiency - OXIDIZER_EFFICIENCY_FACTOR).abs() < 1e-12);
    }

    #[test]
    fn viscosity_costs_efficiency_per_stage() {
        let c = TurbomachineryCorrelations::default();
        let base = PropellantProperties::new("RP-1", 820.0).unwrap();
        let inviscid = Pump::new("fuel", base.clone().with_viscosity(0.0), 2, false);
        let viscous = Pump::new("fuel", base.with_viscosity(1.0e-4), 2, false);
        let a = inviscid.operating_point(kgps(20.0), mpa(6.0), radps(2500.0), &c).unwrap();
        let b = viscous.operating_point(kgps(20.0), mpa(6.0), radps(2500.0), &c).unwrap();
        assert_eq!(b.stages, 2);
        // 1 - 500 · 1e-4 · 2
        assert!((b.efficiency / a.efficiency - 0.9).abs() < 1e-12);
    }

    #[test]
    fn rejects_zero_flow_and_rise() {
        let c = TurbomachineryCorrelations::default();
        let pump = lox_pump();
        assert!(pump.operating_point(kgps(0.0), mpa(6.0), radps(1500.0), &c).is_err());
        assert!(pump.operating_point(kgps(10.0), mpa(0.0), radps(1500.0), &c).is_err());
    }
}
