//! Integration tests for pe-components across nozzle and turbomachinery models.

use pe_components::nozzle::divergence_efficiency;
use pe_components::{
    BellNozzleCurves, FrictionInputs, NozzleContour, NozzleShape, PumpDemand, TurboPump,
    TurboPumpConfig, TurbomachineryCorrelations, Turbine, TurbopumpArrangement,
};
use pe_core::units::{kgps, mpa};
use pe_propellants::{BiPropellantMixture, CombustionState, MixtureRatioTable, PropellantProperties};
use proptest::prelude::*;
use std::f64::consts::FRAC_PI_2;
use std::sync::Arc;

fn mixture() -> BiPropellantMixture {
    let table = MixtureRatioTable::from_rows(
        "LOX/LH2",
        6.0,
        2.0,
        &["1, 3300, 3000, 0.55, 13.5, 1.2, 1.0", "20, 3600, 3300, 11, 13.5, 1.2, 1.0"],
    )
    .unwrap();
    BiPropellantMixture::new(
        "LOX/LH2",
        PropellantProperties::new("LOX", 1141.0).unwrap(),
        PropellantProperties::new("LH2", 70.8).unwrap(),
        2.0,
        6.0,
        6.0,
        vec![table],
    )
    .unwrap()
}

#[test]
fn divergence_efficiency_is_one_on_axis() {
    assert_eq!(divergence_efficiency(0.0), 1.0);
    assert!((divergence_efficiency(FRAC_PI_2) - 0.5).abs() < 1e-12);
}

proptest! {
    #[test]
    fn divergence_efficiency_decreases_with_angle(a in 0.0f64..1.5, da in 1e-3f64..0.07) {
        prop_assert!(divergence_efficiency(a + da) < divergence_efficiency(a));
    }
}

#[test]
fn longer_bell_loses_less_to_divergence() {
    let curves = Arc::new(BellNozzleCurves::default());
    let short = NozzleContour::new(curves.clone(), 0.6, 40.0, NozzleShape::Bell).unwrap();
    let long = NozzleContour::new(curves, 1.0, 40.0, NozzleShape::Bell).unwrap();
    assert!(long.divergence_efficiency() > short.divergence_efficiency());
    assert!(long.length_ratio() > short.length_ratio());
}

#[test]
fn bell_beats_equal_length_cone() {
    let curves = Arc::new(BellNozzleCurves::default());
    let bell = NozzleContour::new(curves.clone(), 0.8, 40.0, NozzleShape::Bell).unwrap();
    let cone = NozzleContour::new(curves, 0.8, 40.0, NozzleShape::Conical).unwrap();
    assert!(bell.divergence_efficiency() > cone.divergence_efficiency());
}

#[test]
fn friction_loss_grows_with_nozzle_length() {
    let curves = Arc::new(BellNozzleCurves::default());
    let inputs = FrictionInputs {
        exhaust_velocity: 4300.0,
        mass_flow: 60.0,
        chamber_pressure: 10.0e6,
        chamber_temperature: 3500.0,
        gamma: 1.2,
        molar_mass: 13.5,
        throat_radius: 0.06,
    };
    let small = NozzleContour::new(curves.clone(), 0.8, 20.0, NozzleShape::Bell).unwrap();
    let large = NozzleContour::new(curves, 0.8, 80.0, NozzleShape::Bell).unwrap();
    let eta_small = small.friction_efficiency(&inputs).unwrap();
    let eta_large = large.friction_efficiency(&inputs).unwrap();
    assert!(eta_large < eta_small, "{eta_large} >= {eta_small}");
    assert!(eta_large > 0.9);
}

#[test]
fn turbopump_energy_closure_for_every_arrangement() {
    let mixture = mixture();
    let demand = PumpDemand {
        ox_mass_flow: kgps(60.0),
        fuel_mass_flow: kgps(10.0),
        ox_pressure_rise: mpa(12.0),
        fuel_pressure_rise: mpa(14.0),
        tank_pressure: mpa(0.3),
    };
    let gas = CombustionState {
        chamber_temperature: 900.0,
        chamber_cp: 8000.0,
        nozzle_gamma: 1.38,
        ..CombustionState::default()
    };

    for arrangement in [
        TurbopumpArrangement::DirectDrive,
        TurbopumpArrangement::GearReduction,
        TurbopumpArrangement::TwoTurbines,
    ] {
        let config = TurboPumpConfig {
            arrangement,
            ..TurboPumpConfig::default()
        };
        let tp = TurboPump::new(&mixture, config, Arc::new(TurbomachineryCorrelations::default()));
        let point = tp.balance(&demand, gas, 15.0).unwrap();

        assert!(point.pumps.fuel.stages >= 1);
        let supplied = Turbine::new(gas, 15.0).unwrap().isentropic_power(point.turbine.mass_flow).value
            * point.turbine.efficiency;
        let demanded = point.pumps.pump_power().value / arrangement.mechanical_efficiency();
        assert!(
            (supplied - demanded).abs() <= 1e-9 * demanded,
            "{arrangement:?}: {supplied} vs {demanded}"
        );
    }
}
