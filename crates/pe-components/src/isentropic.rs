//! Isentropic compressible-flow relations.
//!
//! ```text
//! A/A* = (1/M) · [(2/(γ+1)) · (1 + (γ-1)/2 · M²)]^((γ+1)/(2(γ-1)))
//! ```
//!
//! The inverse is solved with Brent's method on the supersonic bracket
//! (1, 500) or the subsonic bracket (0.001, 1).

use crate::error::ComponentResult;
use pe_core::constants::R_UNIVERSAL;
use pe_solver::{BrentConfig, RootOutcome, brent_with_args};

/// Default absolute Mach tolerance for the area-ratio inversion. `dA/dM`
/// grows with the area ratio, so the Mach bracket must be far tighter than
/// the 1e-4 to which `area_ratio_from_mach` has to reproduce A/A*.
pub const MACH_TOLERANCE: f64 = 1e-10;

const SUPERSONIC_BRACKET: (f64, f64) = (1.0, 500.0);
const SUBSONIC_BRACKET: (f64, f64) = (0.001, 1.0);

/// Area ratio A/A* at Mach `mach`.
pub fn area_ratio_from_mach(mach: f64, gamma: f64) -> f64 {
    let base = 2.0 / (gamma + 1.0) * (1.0 + 0.5 * (gamma - 1.0) * mach * mach);
    base.powf(0.5 * (gamma + 1.0) / (gamma - 1.0)) / mach
}

/// Supersonic Mach number for a given area ratio.
pub fn mach_from_area_ratio(area_ratio: f64, gamma: f64) -> ComponentResult<f64> {
    mach_from_area_ratio_with(area_ratio, gamma, &BrentConfig::with_tolerance(MACH_TOLERANCE))
}

/// Subsonic Mach number for a given area ratio.
pub fn mach_from_area_ratio_subsonic(area_ratio: f64, gamma: f64) -> ComponentResult<f64> {
    invert(
        area_ratio,
        gamma,
        SUBSONIC_BRACKET,
        &BrentConfig::with_tolerance(MACH_TOLERANCE),
    )
}

/// Supersonic inversion with an explicit solver configuration.
pub fn mach_from_area_ratio_with(
    area_ratio: f64,
    gamma: f64,
    config: &BrentConfig,
) -> ComponentResult<f64> {
    invert(area_ratio, gamma, SUPERSONIC_BRACKET, config)
}

fn invert(
    area_ratio: f64,
    gamma: f64,
    (lower, upper): (f64, f64),
    config: &BrentConfig,
) -> ComponentResult<f64> {
    let solution = brent_with_args(
        |mach, args: &(f64, f64)| area_ratio_from_mach(mach, args.0) - args.1,
        &(gamma, area_ratio),
        lower,
        upper,
        config,
    )?;
    if solution.outcome == RootOutcome::MaxIterations {
        tracing::debug!(area_ratio, gamma, mach = solution.root, "area-Mach inversion hit iteration cap");
    }
    Ok(solution.root)
}

/// Stagnation-to-static temperature ratio `1 + (γ-1)/2 · M²`.
pub fn stagnation_temperature_ratio(mach: f64, gamma: f64) -> f64 {
    1.0 + 0.5 * (gamma - 1.0) * mach * mach
}

/// Static-to-static temperature ratio between two Mach stations,
/// `T(to) / T(from)`.
pub fn temperature_ratio_between(from_mach: f64, to_mach: f64, gamma: f64) -> f64 {
    stagnation_temperature_ratio(from_mach, gamma) / stagnation_temperature_ratio(to_mach, gamma)
}

/// Pressure ratio corresponding to a static temperature ratio.
pub fn pressure_ratio_from_temperature_ratio(temperature_ratio: f64, gamma: f64) -> f64 {
    temperature_ratio.powf(gamma / (gamma - 1.0))
}

/// Choked mass flux per unit stagnation pressure and throat area [s/m].
///
/// ```text
/// ṁ = P0 · A* · sqrt(γ · MW / (R · T0) · (2/(γ+1))^((γ+1)/(γ-1)))
/// ```
pub fn choked_flow_parameter(gamma: f64, molar_mass: f64, stagnation_temperature: f64) -> f64 {
    let exponent = (gamma + 1.0) / (gamma - 1.0);
    let term = (2.0 / (gamma + 1.0)).powf(exponent) * gamma * molar_mass
        / (R_UNIVERSAL * stagnation_temperature);
    term.sqrt()
}

/// Speed of sound [m/s] for molar mass in kg/kmol.
pub fn speed_of_sound(gamma: f64, molar_mass: f64, temperature: f64) -> f64 {
    (gamma * R_UNIVERSAL / molar_mass * temperature).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sonic_area_ratio_is_one() {
        assert!((area_ratio_from_mach(1.0, 1.4) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn textbook_area_ratio() {
        // γ = 1.4, M = 2 -> A/A* = 1.6875
        assert!((area_ratio_from_mach(2.0, 1.4) - 1.6875).abs() < 1e-4);
    }

    #[test]
    fn supersonic_inversion() {
        let m = mach_from_area_ratio(1.6875, 1.4).unwrap();
        assert!((m - 2.0).abs() < 1e-3);
    }

    #[test]
    fn subsonic_inversion() {
        // γ = 1.4, M = 0.5 -> A/A* ≈ 1.33984
        let m = mach_from_area_ratio_subsonic(1.33984, 1.4).unwrap();
        assert!((m - 0.5).abs() < 1e-3);
    }

    #[test]
    fn large_area_ratio_is_reproduced() {
        let m = mach_from_area_ratio(150.0, 1.2).unwrap();
        assert!((area_ratio_from_mach(m, 1.2) - 150.0).abs() < 1e-4);
        let m = mach_from_area_ratio(198.0, 1.11).unwrap();
        assert!((area_ratio_from_mach(m, 1.11) - 198.0).abs() < 1e-4);
    }

    #[test]
    fn subsonic_area_ratio_is_reproduced() {
        let m = mach_from_area_ratio_subsonic(9.53, 1.2).unwrap();
        assert!(m < 1.0);
        assert!((area_ratio_from_mach(m, 1.2) - 9.53).abs() < 1e-4);
    }

    #[test]
    fn unit_area_ratio_is_sonic() {
        assert_eq!(mach_from_area_ratio(1.0, 1.2).unwrap(), 1.0);
    }

    #[test]
    fn area_ratio_below_one_is_not_bracketed() {
        assert!(mach_from_area_ratio(0.5, 1.2).is_err());
    }

    #[test]
    fn choked_flow_matches_hand_calculation() {
        // Air-like gas at 300 K: ṁ/(P0 A*) ≈ 0.0404 / sqrt(T0) s/m
        let phi = choked_flow_parameter(1.4, 28.97, 300.0);
        assert!((phi - 0.0404 / 300.0_f64.sqrt()).abs() < 1e-5);
    }
}
