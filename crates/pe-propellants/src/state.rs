//! Combustion-state vector.
//!
//! A plain value type holding the tabulated chamber and nozzle-throat
//! conditions for one (O/F, pressure) point. It forms a vector space under
//! `+`, `-` and scalar `*`, which is all the interpolation code needs.

use pe_core::constants::R_UNIVERSAL;
use pe_core::units::{Pressure, Temperature, k, pa};
use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Sub};

/// Ideal-gas specific heat at constant pressure [J/(kg·K)].
///
/// ```text
/// cp = γ / (γ - 1) · R / MW
/// ```
pub fn ideal_gas_cp(gamma: f64, molar_mass: f64) -> f64 {
    if gamma <= 1.0 || molar_mass <= 0.0 {
        return 0.0;
    }
    gamma / (gamma - 1.0) * R_UNIVERSAL / molar_mass
}

/// Combustion state at one O/F ratio and chamber pressure.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CombustionState {
    /// Oxidizer-to-fuel mass ratio
    pub of_ratio: f64,
    /// Chamber pressure [Pa]
    pub chamber_pressure: f64,
    /// Chamber temperature [K]
    pub chamber_temperature: f64,
    /// Static pressure at the frozen-flow station [Pa]
    pub nozzle_pressure: f64,
    /// Static temperature at the frozen-flow station [K]
    pub nozzle_temperature: f64,
    /// Molar mass of the frozen products [kg/kmol]
    pub nozzle_molar_mass: f64,
    /// Ratio of specific heats of the frozen products
    pub nozzle_gamma: f64,
    /// Mach number at the frozen-flow station
    pub nozzle_mach: f64,
    /// Chamber specific heat [J/(kg·K)]
    pub chamber_cp: f64,
    /// Frozen-flow specific heat [J/(kg·K)]
    pub nozzle_cp: f64,
    /// Area ratio at which the flow freezes
    pub frozen_area_ratio: f64,
}

impl CombustionState {
    /// All-zero state tagged with the query point, returned by the
    /// degraded-result helpers when a lookup fails.
    pub fn zeroed(of_ratio: f64, chamber_pressure: f64, frozen_area_ratio: f64) -> Self {
        Self {
            of_ratio,
            chamber_pressure,
            frozen_area_ratio,
            ..Self::default()
        }
    }

    /// Linear blend `a + (b - a) · f`.
    pub fn lerp(a: &Self, b: &Self, f: f64) -> Self {
        (*b - *a) * f + *a
    }

    /// A zero chamber temperature marks a failed lookup.
    pub fn is_populated(&self) -> bool {
        self.chamber_temperature > 0.0
    }

    /// Specific gas constant of the frozen products [J/(kg·K)].
    pub fn specific_gas_constant(&self) -> f64 {
        if self.nozzle_molar_mass <= 0.0 {
            return 0.0;
        }
        R_UNIVERSAL / self.nozzle_molar_mass
    }

    pub fn chamber_pressure_q(&self) -> Pressure {
        pa(self.chamber_pressure)
    }

    pub fn chamber_temperature_q(&self) -> Temperature {
        k(self.chamber_temperature)
    }

    pub fn nozzle_pressure_q(&self) -> Pressure {
        pa(self.nozzle_pressure)
    }

    pub fn nozzle_temperature_q(&self) -> Temperature {
        k(self.nozzle_temperature)
    }

    fn zip(self, rhs: Self, op: impl Fn(f64, f64) -> f64) -> Self {
        Self {
            of_ratio: op(self.of_ratio, rhs.of_ratio),
            chamber_pressure: op(self.chamber_pressure, rhs.chamber_pressure),
            chamber_temperature: op(self.chamber_temperature, rhs.chamber_temperature),
            nozzle_pressure: op(self.nozzle_pressure, rhs.nozzle_pressure),
            nozzle_temperature: op(self.nozzle_temperature, rhs.nozzle_temperature),
            nozzle_molar_mass: op(self.nozzle_molar_mass, rhs.nozzle_molar_mass),
            nozzle_gamma: op(self.nozzle_gamma, rhs.nozzle_gamma),
            nozzle_mach: op(self.nozzle_mach, rhs.nozzle_mach),
            chamber_cp: op(self.chamber_cp, rhs.chamber_cp),
            nozzle_cp: op(self.nozzle_cp, rhs.nozzle_cp),
            frozen_area_ratio: op(self.frozen_area_ratio, rhs.frozen_area_ratio),
        }
    }
}

impl Add for CombustionState {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        self.zip(rhs, |a, b| a + b)
    }
}

impl Sub for CombustionState {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        self.zip(rhs, |a, b| a - b)
    }
}

impl Mul<f64> for CombustionState {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        self.zip(self, |a, _| a * rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CombustionState {
        CombustionState {
            of_ratio: 2.5,
            chamber_pressure: 7.0e6,
            chamber_temperature: 3500.0,
            nozzle_pressure: 4.0e6,
            nozzle_temperature: 3300.0,
            nozzle_molar_mass: 22.0,
            nozzle_gamma: 1.2,
            nozzle_mach: 1.0,
            chamber_cp: 2000.0,
            nozzle_cp: 1900.0,
            frozen_area_ratio: 1.0,
        }
    }

    #[test]
    fn ideal_gas_cp_matches_hand_value() {
        // γ = 1.4, MW = 28.97 -> cp ≈ 1004.5 J/(kg·K)
        let cp = ideal_gas_cp(1.4, 28.97);
        assert!((cp - 1004.5).abs() < 1.0);
        assert_eq!(ideal_gas_cp(1.0, 28.97), 0.0);
    }

    #[test]
    fn lerp_endpoints() {
        let a = sample();
        let b = a * 2.0;
        assert_eq!(CombustionState::lerp(&a, &b, 0.0), a);
        let mid = CombustionState::lerp(&a, &b, 0.5);
        assert!((mid.chamber_temperature - 5250.0).abs() < 1e-9);
    }

    #[test]
    fn zeroed_state_is_not_populated() {
        let z = CombustionState::zeroed(2.0, 1.0e6, 1.5);
        assert!(!z.is_populated());
        assert_eq!(z.of_ratio, 2.0);
        assert_eq!(z.frozen_area_ratio, 1.5);
        assert!(sample().is_populated());
    }
}
