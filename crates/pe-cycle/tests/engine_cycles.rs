use pe_components::Turbine;
use pe_core::constants::P_SEA_LEVEL_PA;
use pe_core::units::{kgps, m, mpa};
use pe_cycle::{
    CycleError, EngineCycle, EngineDataContext, EngineParameters, EngineSettings, EngineSolver,
    TurbineExhaust,
};
use pe_propellants::{BiPropellantMixture, MixtureRatioTable, PropellantProperties, parse_row};
use proptest::prelude::*;
use std::sync::Arc;

/// Row with a sonic frozen station derived from the chamber conditions.
fn row(pc_mpa: f64, tc: f64, mw: f64, gamma: f64) -> String {
    let t_ratio = 2.0 / (gamma + 1.0);
    let p_ratio = t_ratio.powf(gamma / (gamma - 1.0));
    format!("{pc_mpa}, {tc}, {}, {}, {mw}, {gamma}, 1.0", tc * t_ratio, pc_mpa * p_ratio)
}

fn table(of: f64, mw: f64, gamma: f64, t_low: f64, t_high: f64) -> MixtureRatioTable {
    MixtureRatioTable::from_rows(
        "LOX/RP-1",
        of,
        1.0,
        &[row(0.5, t_low, mw, gamma), row(25.0, t_high, mw, gamma)],
    )
    .unwrap()
}

fn lox_rp1() -> Arc<BiPropellantMixture> {
    let tables = vec![
        table(0.2, 20.0, 1.15, 780.0, 820.0),
        table(0.4, 21.0, 1.16, 1180.0, 1220.0),
        table(2.0, 21.5, 1.2, 3250.0, 3350.0),
        table(2.5, 22.5, 1.2, 3500.0, 3700.0),
        table(3.0, 23.5, 1.2, 3450.0, 3650.0),
        table(40.0, 30.0, 1.3, 1080.0, 1120.0),
        table(60.0, 31.0, 1.32, 680.0, 720.0),
    ];
    Arc::new(
        BiPropellantMixture::new(
            "LOX/RP-1",
            PropellantProperties::new("LOX", 1141.0).unwrap(),
            PropellantProperties::new("RP-1", 820.0).unwrap(),
            1.0,
            2.0,
            3.0,
            tables,
        )
        .unwrap(),
    )
}

fn params(mixture: &Arc<BiPropellantMixture>, of: f64) -> EngineParameters {
    EngineParameters::new(mixture.clone(), of, mpa(7.0), m(0.25), 30.0)
}

fn solver(cycle: EngineCycle, settings: EngineSettings) -> EngineSolver {
    EngineSolver::new(cycle, EngineDataContext::default(), settings)
}

fn rel_close(a: f64, b: f64, tol: f64) -> bool {
    (a - b).abs() <= tol * a.abs().max(b.abs()).max(1e-300)
}

#[test]
fn unconfigured_solver_reports_nothing() {
    let mut engine = solver(EngineCycle::PressureFed, EngineSettings::default());
    assert!(!engine.performance().is_computed());
    assert_eq!(engine.set_cycle(EngineCycle::GasGenerator), Ok(false));
    assert!(engine.applied_parameters().is_none());
}

#[test]
fn midpoint_of_two_tables_is_the_mean_state() {
    let rows_lean = [
        "1, 3200, 2900, 0.56, 21, 1.2, 1.0",
        "5, 3300, 3000, 2.8, 21, 1.2, 1.0",
        "20, 3400, 3100, 11.2, 21, 1.2, 1.0",
    ];
    let rows_rich = [
        "1, 3400, 3100, 0.56, 23, 1.22, 1.0",
        "5, 3600, 3300, 2.8, 23, 1.22, 1.0",
        "20, 3700, 3400, 11.2, 23, 1.22, 1.0",
    ];
    let mixture = Arc::new(
        BiPropellantMixture::new(
            "pair",
            PropellantProperties::new("LOX", 1141.0).unwrap(),
            PropellantProperties::new("RP-1", 820.0).unwrap(),
            1.0,
            2.0,
            3.0,
            vec![
                MixtureRatioTable::from_rows("pair", 2.0, 1.0, &rows_lean).unwrap(),
                MixtureRatioTable::from_rows("pair", 3.0, 1.0, &rows_rich).unwrap(),
            ],
        )
        .unwrap(),
    );

    let mut engine = solver(EngineCycle::PressureFed, EngineSettings::default());
    let p = EngineParameters::new(mixture, 2.5, mpa(5.0), m(0.2), 20.0);
    assert_eq!(engine.set_parameters(p), Ok(true));

    let a = parse_row(rows_lean[1], "pair", 2.0, 1.0, 1);
    let b = parse_row(rows_rich[1], "pair", 3.0, 1.0, 1);
    let got = engine.performance().combustion;
    let pairs = [
        (got.chamber_temperature, a.chamber_temperature, b.chamber_temperature),
        (got.nozzle_temperature, a.nozzle_temperature, b.nozzle_temperature),
        (got.nozzle_pressure, a.nozzle_pressure, b.nozzle_pressure),
        (got.nozzle_molar_mass, a.nozzle_molar_mass, b.nozzle_molar_mass),
        (got.nozzle_gamma, a.nozzle_gamma, b.nozzle_gamma),
        (got.nozzle_cp, a.nozzle_cp, b.nozzle_cp),
    ];
    for (value, lean, rich) in pairs {
        assert!(rel_close(value, 0.5 * (lean + rich), 1e-9), "{value} vs {lean}/{rich}");
    }
    assert_eq!(got.of_ratio, 2.5);
    assert_eq!(got.chamber_pressure, 5.0e6);
}

#[test]
fn pressure_fed_engine_is_consistent() {
    let mixture = lox_rp1();
    let mut engine = solver(EngineCycle::PressureFed, EngineSettings::default());
    engine.set_parameters(params(&mixture, 2.5)).unwrap();
    let perf = engine.performance();

    assert!(perf.is_computed());
    assert_eq!(perf.turbine_mass_flow, 0.0);
    assert_eq!(perf.total_mass_flow, perf.chamber_mass_flow);
    assert!(rel_close(perf.chamber_ox_mass_flow / perf.chamber_fuel_mass_flow, 2.5, 1e-12));
    assert!(perf.thrust_vacuum > perf.thrust_sea_level);
    assert!(rel_close(perf.isp_vacuum * 9.80665 * perf.total_mass_flow, perf.thrust_vacuum, 1e-9));
    assert!(perf.exit_mach > 1.0);
    assert!(perf.divergence_efficiency > 0.95 && perf.divergence_efficiency <= 1.0);
    assert!(perf.friction_efficiency > 0.9 && perf.friction_efficiency <= 1.0);
    assert!(rel_close(perf.exit_diameter, 0.25 * 30.0_f64.sqrt(), 1e-12));

    let diag = perf.pressure_fed().unwrap();
    assert!((diag.injector_drop_ratio - 0.2).abs() < 1e-12);
    assert!(rel_close(diag.tank_pressure, 7.0e6 * 1.2, 1e-12));
}

#[test]
fn rich_limit_clamp_matches_explicit_limit() {
    let mixture = lox_rp1();
    let mut clamped = solver(EngineCycle::PressureFed, EngineSettings::default());
    let mut explicit = solver(EngineCycle::PressureFed, EngineSettings::default());

    assert_eq!(clamped.set_parameters(params(&mixture, 5.0)), Ok(true));
    assert_eq!(explicit.set_parameters(params(&mixture, 3.0)), Ok(true));
    assert_eq!(clamped.performance(), explicit.performance());
    assert_eq!(clamped.performance().of_ratio, 3.0);
    assert_eq!(clamped.requested_parameters().unwrap().of_ratio, 5.0);
    assert_eq!(clamped.applied_parameters().unwrap().of_ratio, 3.0);

    // Another out-of-range request clamps to the same inputs.
    assert_eq!(clamped.set_parameters(params(&mixture, 6.0)), Ok(false));
    assert_eq!(explicit.set_parameters(params(&mixture, 3.0)), Ok(false));
}

#[test]
fn chamber_pressure_clamps_to_half_the_table_maximum() {
    let mixture = lox_rp1();
    let mut engine = solver(EngineCycle::PressureFed, EngineSettings::default());
    let p = EngineParameters::new(mixture, 2.5, mpa(50.0), m(0.25), 30.0);
    engine.set_parameters(p).unwrap();
    assert!(rel_close(engine.performance().chamber_pressure, 12.5e6, 1e-12));
}

#[test]
fn settings_change_recomputes() {
    let mixture = lox_rp1();
    let mut engine = solver(EngineCycle::PressureFed, EngineSettings::default());
    engine.set_parameters(params(&mixture, 2.5)).unwrap();
    let full = engine.performance().clone();
    assert_eq!(full.min_thrust_vacuum, full.thrust_vacuum);

    let settings = EngineSettings {
        min_throttle: 0.4,
        ..EngineSettings::default()
    };
    assert_eq!(engine.set_settings(settings.clone()), Ok(true));
    assert_eq!(engine.set_settings(settings), Ok(false));
    let throttled = engine.performance();
    assert!(throttled.injector_drop_ratio > full.injector_drop_ratio);
    assert!(rel_close(throttled.min_thrust_vacuum, 0.4 * throttled.thrust_vacuum, 1e-12));
}

#[test]
fn gas_generator_closes_the_power_balance() {
    let mixture = lox_rp1();
    let mut engine = solver(EngineCycle::GasGenerator, EngineSettings::default());
    engine.set_parameters(params(&mixture, 2.5)).unwrap();
    let perf = engine.performance();
    let gg = perf.gas_generator().unwrap();

    assert!(gg.turbine_mass_flow > 0.0);
    assert!(gg.mass_flow_fraction > 0.0 && gg.mass_flow_fraction < 0.1);
    assert!(gg.of_ratio() < 1.0, "fuel-rich gas generator");
    assert!(rel_close(gg.turbopump.turbine.mass_flow.value, gg.turbine_mass_flow, 1e-4));

    let turbine = Turbine::new(gg.state, gg.pressure_ratio).unwrap();
    let available = turbine.isentropic_power(kgps(gg.turbine_mass_flow)).value;
    let demanded = gg.turbopump.pumps.shaft_power.value / gg.turbopump.turbine.efficiency;
    assert!(rel_close(available, demanded, 1e-4));

    assert!(rel_close(perf.total_mass_flow, perf.chamber_mass_flow + gg.turbine_mass_flow, 1e-12));
    assert!(perf.overall_of_ratio < perf.of_ratio);
    assert!(perf.auxiliary_thrust.vacuum > 0.0);

    let gamma = gg.state.nozzle_gamma;
    let stagnation = (1.0 + 0.5 * (gamma - 1.0)).powf(gamma / (gamma - 1.0));
    assert!(rel_close(gg.back_pressure, 1.5 * P_SEA_LEVEL_PA * stagnation, 1e-9));
}

#[test]
fn oxidizer_rich_gas_generator_runs_on_the_rich_side() {
    let mixture = lox_rp1();
    let settings = EngineSettings {
        oxidizer_rich: true,
        ..EngineSettings::default()
    };
    let mut engine = solver(EngineCycle::GasGenerator, settings);
    engine.set_parameters(params(&mixture, 2.5)).unwrap();
    let gg = engine.performance().gas_generator().unwrap();
    assert!(gg.of_ratio() > 3.0);
    assert!(engine.performance().overall_of_ratio > 2.5);
}

#[test]
fn exhaust_into_nozzle_converges() {
    let mixture = lox_rp1();
    let settings = EngineSettings {
        turbine_exhaust: TurbineExhaust::IntoNozzle { area_ratio: 10.0 },
        ..EngineSettings::default()
    };
    let mut engine = solver(EngineCycle::GasGenerator, settings);
    engine.set_parameters(params(&mixture, 2.5)).unwrap();
    let perf = engine.performance();
    let gg = perf.gas_generator().unwrap();

    assert_eq!(gg.exhaust, TurbineExhaust::IntoNozzle { area_ratio: 10.0 });
    assert_eq!(gg.exhaust_area, 0.0);
    assert!(gg.pressure_ratio > 1.0);
    assert_eq!(perf.auxiliary_thrust.vacuum, perf.auxiliary_thrust.sea_level);
    assert!(perf.auxiliary_thrust.vacuum > 0.0);
}

#[test]
fn staged_combustion_closes_the_power_balance() {
    let mixture = lox_rp1();
    for oxidizer_rich in [false, true] {
        let settings = EngineSettings {
            oxidizer_rich,
            ..EngineSettings::default()
        };
        let mut engine = solver(EngineCycle::StagedCombustion, settings);
        engine.set_parameters(params(&mixture, 2.5)).unwrap();
        let perf = engine.performance();
        let sc = perf.staged().unwrap();

        assert!(sc.pressure_ratio > 1.0 && sc.pressure_ratio < sc.max_pressure_ratio);
        assert!(sc.temperature_shift > 0.0);
        assert!(sc.turbine_mass_flow > 0.0);
        assert!(sc.brackets_tried >= 1);

        // The flow routed through the preburner is exactly what the turbine needs.
        assert!(
            rel_close(sc.turbopump.turbine.mass_flow.value, sc.turbine_mass_flow, 1e-4),
            "turbine {} vs routed {} (oxidizer_rich = {oxidizer_rich})",
            sc.turbopump.turbine.mass_flow.value,
            sc.turbine_mass_flow
        );
        let routed = if oxidizer_rich {
            perf.chamber_ox_mass_flow * (1.0 + 1.0 / sc.state.of_ratio)
        } else {
            perf.chamber_fuel_mass_flow * (1.0 + sc.state.of_ratio)
        };
        assert!(rel_close(routed, sc.turbine_mass_flow, 1e-9));

        let turbine = Turbine::new(sc.state, sc.pressure_ratio).unwrap();
        let available = turbine.isentropic_power(kgps(sc.turbine_mass_flow)).value;
        let demanded = sc.turbopump.pumps.shaft_power.value / sc.turbopump.turbine.efficiency;
        assert!(rel_close(available, demanded, 1e-4), "{available} vs {demanded}");

        assert_eq!(perf.total_mass_flow, perf.chamber_mass_flow);
        assert_eq!(perf.overall_of_ratio, perf.of_ratio);
        assert_eq!(sc.state.of_ratio > 3.0, oxidizer_rich);
    }
}

#[test]
fn staged_beats_gas_generator_on_isp() {
    let mixture = lox_rp1();
    let mut gg = solver(EngineCycle::GasGenerator, EngineSettings::default());
    gg.set_parameters(params(&mixture, 2.5)).unwrap();
    let gg_isp = gg.performance().isp_vacuum;

    assert_eq!(gg.set_cycle(EngineCycle::StagedCombustion), Ok(true));
    assert!(gg.performance().isp_vacuum > gg_isp);
}

#[test]
fn failed_evaluation_zeroes_performance() {
    let mixture = lox_rp1();
    let settings = EngineSettings {
        tank_pressure: 1000.0,
        ..EngineSettings::default()
    };
    let mut engine = solver(EngineCycle::PressureFed, settings);
    engine.set_parameters(params(&mixture, 2.5)).unwrap();
    assert!(engine.performance().is_computed());

    // Pumps cannot run below the vapor pressure.
    let err = engine.set_cycle(EngineCycle::GasGenerator).unwrap_err();
    assert!(matches!(err, CycleError::Component(_)));
    assert!(!engine.performance().is_computed());
    assert_eq!(engine.performance().cycle, EngineCycle::GasGenerator);

    // The failed inputs are not cached, so a retry evaluates again.
    assert!(engine.set_cycle(EngineCycle::GasGenerator).is_err());
    assert_eq!(engine.set_cycle(EngineCycle::PressureFed), Ok(true));
}

#[test]
fn zero_throat_is_rejected() {
    let mixture = lox_rp1();
    let mut engine = solver(EngineCycle::PressureFed, EngineSettings::default());
    let p = EngineParameters::new(mixture, 2.5, mpa(7.0), m(0.0), 30.0);
    assert!(engine.set_parameters(p).is_err());
    assert!(!engine.performance().is_computed());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn bigger_throat_scales_thrust(dt in 0.05f64..0.5, scale in 1.1f64..3.0) {
        let mixture = lox_rp1();
        let mut small = solver(EngineCycle::PressureFed, EngineSettings::default());
        let mut large = solver(EngineCycle::PressureFed, EngineSettings::default());
        small.set_parameters(EngineParameters::new(mixture.clone(), 2.5, mpa(7.0), m(dt), 30.0)).unwrap();
        large.set_parameters(EngineParameters::new(mixture, 2.5, mpa(7.0), m(dt * scale), 30.0)).unwrap();
        prop_assert!(large.performance().thrust_vacuum > small.performance().thrust_vacuum);
        prop_assert!(large.performance().chamber_mass_flow > small.performance().chamber_mass_flow);
    }
}
