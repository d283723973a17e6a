use clap::{Parser, Subcommand};
use pe_cycle::{CycleDiagnostics, EnginePerformance, EngineSolver};
use pe_project::{DataFile, EngineDef, ProjectData, ProjectError, ProjectResult};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pe-cli")]
#[command(about = "Liquid rocket engine performance calculator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate data file syntax and references
    Validate {
        /// Path to the YAML or JSON data file
        data_path: PathBuf,
    },
    /// List propellant mixtures and their envelopes
    Mixtures {
        /// Path to the YAML or JSON data file
        data_path: PathBuf,
    },
    /// Evaluate engine designs
    Evaluate {
        /// Path to the YAML or JSON data file
        data_path: PathBuf,
        /// Engine name (defaults to all engines)
        #[arg(short, long)]
        engine: Option<String>,
        /// Override the O/F ratio
        #[arg(long)]
        of_ratio: Option<f64>,
        /// Override the chamber pressure [MPa]
        #[arg(long)]
        chamber_pressure: Option<f64>,
        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ProjectResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { data_path } => cmd_validate(&data_path),
        Commands::Mixtures { data_path } => cmd_mixtures(&data_path),
        Commands::Evaluate {
            data_path,
            engine,
            of_ratio,
            chamber_pressure,
            json,
        } => cmd_evaluate(&data_path, engine.as_deref(), of_ratio, chamber_pressure, json),
    }
}

fn cmd_validate(data_path: &Path) -> ProjectResult<()> {
    println!("Validating data file: {}", data_path.display());
    let file = pe_project::load(data_path)?;
    ProjectData::from_file(&file)?;
    println!(
        "✓ Data file is valid ({} propellants, {} mixtures, {} engines)",
        file.propellants.len(),
        file.mixtures.len(),
        file.engines.len()
    );
    Ok(())
}

fn cmd_mixtures(data_path: &Path) -> ProjectResult<()> {
    let file = pe_project::load(data_path)?;
    let data = ProjectData::from_file(&file)?;

    if data.library.is_empty() {
        println!("No mixtures found");
        return Ok(());
    }

    println!("Mixtures:");
    for mixture in data.library.iter() {
        let (lean, rich) = mixture.of_limits();
        let (p_min, p_max) = mixture.chamber_pressure_limits();
        println!(
            "  {} ({} / {}): O/F {lean}..{rich}, Pc {:.2}..{:.2} MPa, {} tables",
            mixture.title(),
            mixture.oxidizer().name,
            mixture.fuel().name,
            p_min.value / 1e6,
            p_max.value / 1e6,
            mixture.tables().len()
        );
    }
    Ok(())
}

fn cmd_evaluate(
    data_path: &Path,
    engine: Option<&str>,
    of_ratio: Option<f64>,
    chamber_pressure: Option<f64>,
    json: bool,
) -> ProjectResult<()> {
    let file = pe_project::load(data_path)?;
    let data = ProjectData::from_file(&file)?;

    for def in select_engines(&file, engine)? {
        let mut def = def.clone();
        if let Some(of) = of_ratio {
            def.of_ratio = of;
        }
        if let Some(pc) = chamber_pressure {
            def.chamber_pressure_mpa = pc;
        }

        tracing::debug!(engine = %def.name, cycle = ?def.cycle, "evaluating engine");
        let solver = data.evaluate(&def)?;
        if json {
            println!("{}", serde_json::to_string_pretty(&summary_json(&def, &solver))?);
        } else {
            print_summary(&def, &solver);
        }
    }
    Ok(())
}

fn select_engines<'a>(file: &'a DataFile, name: Option<&str>) -> ProjectResult<Vec<&'a EngineDef>> {
    match name {
        None => Ok(file.engines.iter().collect()),
        Some(name) => file
            .engines
            .iter()
            .find(|e| e.name == name)
            .map(|e| vec![e])
            .ok_or_else(|| {
                ProjectError::Validation(pe_project::ValidationError::MissingReference {
                    name: name.to_string(),
                    context: "engines".to_string(),
                })
            }),
    }
}

fn print_summary(def: &EngineDef, solver: &EngineSolver) {
    let perf = solver.performance();
    println!("\n{} [{}] - {}", def.name, perf.cycle.label(), def.mixture);
    println!("  O/F:                 {:.3}", perf.of_ratio);
    println!("  Chamber pressure:    {:.3} MPa", perf.chamber_pressure / 1e6);
    println!("  Area ratio:          {:.2}", perf.area_ratio);
    println!("  Thrust (vac):        {:.2} kN", perf.thrust_vacuum / 1e3);
    println!("  Thrust (SL):         {:.2} kN", perf.thrust_sea_level / 1e3);
    println!("  Min thrust (vac):    {:.2} kN", perf.min_thrust_vacuum / 1e3);
    println!("  Isp (vac):           {:.1} s", perf.isp_vacuum);
    println!("  Isp (SL):            {:.1} s", perf.isp_sea_level);
    println!("  Mass flow:           {:.3} kg/s", perf.total_mass_flow);
    println!("  Overall O/F:         {:.3}", perf.overall_of_ratio);
    println!("  Exit diameter:       {:.3} m", perf.exit_diameter);
    println!("  Exit pressure:       {:.1} kPa", perf.exit_pressure / 1e3);
    println!(
        "  Nozzle efficiency:   divergence {:.4}, friction {:.4}",
        perf.divergence_efficiency, perf.friction_efficiency
    );
    print_diagnostics(perf);
}

fn print_diagnostics(perf: &EnginePerformance) {
    match &perf.diagnostics {
        Some(CycleDiagnostics::PressureFed(pf)) => {
            println!("  Tank pressure:       {:.3} MPa", pf.tank_pressure / 1e6);
        }
        Some(CycleDiagnostics::GasGenerator(gg)) => {
            println!("  GG O/F:              {:.3}", gg.of_ratio());
            println!("  GG pressure:         {:.3} MPa", gg.pressure / 1e6);
            println!("  GG flow fraction:    {:.2} %", gg.mass_flow_fraction * 100.0);
            println!("  Turbine PR:          {:.2}", gg.pressure_ratio);
            println!(
                "  Turbine efficiency:  {:.3}",
                gg.turbopump.turbine.efficiency
            );
            println!(
                "  Pump power:          {:.1} kW",
                gg.turbopump.pumps.pump_power().value / 1e3
            );
        }
        Some(CycleDiagnostics::StagedCombustion(sc)) => {
            println!("  Preburner O/F:       {:.3}", sc.state.of_ratio);
            println!("  Preburner pressure:  {:.3} MPa", sc.pressure / 1e6);
            println!("  Turbine PR:          {:.3}", sc.pressure_ratio);
            println!("  Turbine flow:        {:.3} kg/s", sc.turbine_mass_flow);
            println!("  Temperature shift:   {:.2} K", sc.temperature_shift);
        }
        None => {}
    }
}

fn summary_json(def: &EngineDef, solver: &EngineSolver) -> serde_json::Value {
    let perf = solver.performance();
    let mut value = serde_json::json!({
        "engine": def.name,
        "cycle": perf.cycle,
        "mixture": def.mixture,
        "of_ratio": perf.of_ratio,
        "chamber_pressure_pa": perf.chamber_pressure,
        "area_ratio": perf.area_ratio,
        "thrust_vacuum_n": perf.thrust_vacuum,
        "thrust_sea_level_n": perf.thrust_sea_level,
        "min_thrust_vacuum_n": perf.min_thrust_vacuum,
        "isp_vacuum_s": perf.isp_vacuum,
        "isp_sea_level_s": perf.isp_sea_level,
        "total_mass_flow_kgps": perf.total_mass_flow,
        "overall_of_ratio": perf.overall_of_ratio,
        "exit_diameter_m": perf.exit_diameter,
        "exit_pressure_pa": perf.exit_pressure,
    });
    if let Some(CycleDiagnostics::GasGenerator(gg)) = &perf.diagnostics {
        value["gas_generator_of_ratio"] = gg.of_ratio().into();
        value["gas_generator_flow_fraction"] = gg.mass_flow_fraction.into();
    }
    if let Some(CycleDiagnostics::StagedCombustion(sc)) = &perf.diagnostics {
        value["preburner_of_ratio"] = sc.state.of_ratio.into();
        value["preburner_pressure_ratio"] = sc.pressure_ratio.into();
    }
    value
}
