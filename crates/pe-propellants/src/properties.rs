//! Liquid propellant properties consumed by the pump model.

use crate::error::{PropellantError, PropellantResult};
use pe_core::units::{Density, DynVisc, Pressure, kgpm3, mpa, pas};

/// Physical properties of one liquid propellant.
#[derive(Clone, Debug, PartialEq)]
pub struct PropellantProperties {
    pub name: String,
    pub density: Density,
    pub viscosity: DynVisc,
    /// Vapor pressure at storage temperature
    pub vapor_pressure: Pressure,
    /// Pump suction specific speed constant
    pub suction_specific_speed: f64,
    /// Pressure a single pump stage can deliver
    pub pressure_rise_per_stage: Pressure,
}

impl PropellantProperties {
    pub const DEFAULT_VAPOR_PRESSURE_MPA: f64 = 0.002_275_27;
    pub const DEFAULT_SUCTION_SPECIFIC_SPEED: f64 = 70.0;
    pub const DEFAULT_PRESSURE_RISE_PER_STAGE_MPA: f64 = 47.0;
    /// Kerosene-like fallback [Pa·s]
    pub const DEFAULT_VISCOSITY_PA_S: f64 = 1.875e-6 * 0.82;

    /// Create a propellant with default pump-related properties.
    pub fn new(name: impl Into<String>, density_kg_m3: f64) -> PropellantResult<Self> {
        if !density_kg_m3.is_finite() || density_kg_m3 <= 0.0 {
            return Err(PropellantError::InvalidArg {
                what: "propellant density must be positive",
            });
        }
        Ok(Self {
            name: name.into(),
            density: kgpm3(density_kg_m3),
            viscosity: pas(Self::DEFAULT_VISCOSITY_PA_S),
            vapor_pressure: mpa(Self::DEFAULT_VAPOR_PRESSURE_MPA),
            suction_specific_speed: Self::DEFAULT_SUCTION_SPECIFIC_SPEED,
            pressure_rise_per_stage: mpa(Self::DEFAULT_PRESSURE_RISE_PER_STAGE_MPA),
        })
    }

    pub fn with_viscosity(mut self, viscosity_pa_s: f64) -> Self {
        self.viscosity = pas(viscosity_pa_s);
        self
    }

    /// Set viscosity from a kinematic value [m²/s].
    pub fn with_kinematic_viscosity(mut self, nu_m2_s: f64) -> Self {
        self.viscosity = pas(nu_m2_s * self.density.value);
        self
    }

    pub fn with_vapor_pressure(mut self, vapor_pressure: Pressure) -> Self {
        self.vapor_pressure = vapor_pressure;
        self
    }

    pub fn with_suction_specific_speed(mut self, nss: f64) -> Self {
        self.suction_specific_speed = nss;
        self
    }

    pub fn with_pressure_rise_per_stage(mut self, rise: Pressure) -> Self {
        self.pressure_rise_per_stage = rise;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_applied() {
        let lox = PropellantProperties::new("LqdOxygen", 1141.0).unwrap();
        assert!((lox.vapor_pressure.value - 2275.27).abs() < 1e-6);
        assert_eq!(lox.suction_specific_speed, 70.0);
        assert!((lox.pressure_rise_per_stage.value - 4.7e7).abs() < 1e-3);
        assert!((lox.viscosity.value - 1.5375e-6).abs() < 1e-12);
    }

    #[test]
    fn kinematic_viscosity_scales_with_density() {
        let fuel = PropellantProperties::new("Kerosene", 820.0)
            .unwrap()
            .with_kinematic_viscosity(2.0e-6);
        assert!((fuel.viscosity.value - 1.64e-3).abs() < 1e-12);
    }

    #[test]
    fn rejects_non_positive_density() {
        assert!(PropellantProperties::new("bad", 0.0).is_err());
        assert!(PropellantProperties::new("bad", f64::NAN).is_err());
    }
}
