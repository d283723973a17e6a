//! Data file schema definitions.

use pe_cycle::{EngineCycle, EngineSettings};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DataFile {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub propellants: Vec<PropellantDef>,
    #[serde(default)]
    pub mixtures: Vec<MixtureDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bell_nozzle: Option<BellNozzleDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub turbomachinery: Option<TurbomachineryDef>,
    #[serde(default)]
    pub engines: Vec<EngineDef>,
}

fn default_version() -> u32 {
    crate::validate::LATEST_VERSION
}

/// Liquid propellant. Omitted pump-related fields take library defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PropellantDef {
    pub name: String,
    pub density_kg_m3: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub viscosity_pa_s: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vapor_pressure_mpa: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suction_specific_speed: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pressure_rise_per_stage_mpa: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MixtureDef {
    pub title: String,
    pub oxidizer: String,
    pub fuel: String,
    #[serde(default = "default_frozen_area_ratio")]
    pub frozen_area_ratio: f64,
    pub of_lean: f64,
    pub of_rich: f64,
    #[serde(default)]
    pub mixture_ratios: Vec<MixtureRatioDef>,
}

fn default_frozen_area_ratio() -> f64 {
    1.0
}

/// Text rows for one O/F ratio: `Pc Tc Tnoz Pnoz MW gamma Mach [cp_c cp_n]`,
/// pressures in MPa and specific heats in kJ/(kg·K).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MixtureRatioDef {
    pub of_ratio: f64,
    #[serde(default)]
    pub rows: Vec<String>,
}

/// Bell nozzle angle tables in degrees, rows by area ratio.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BellNozzleDef {
    pub rel_lengths: Vec<f64>,
    pub area_ratios: Vec<f64>,
    pub exit_angles_deg: Vec<Vec<f64>>,
    pub inflection_angles_deg: Vec<Vec<f64>>,
}

/// Correlation curves as text keys of 2 or 4 numbers. Omitted curves use the
/// built-in defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TurbomachineryDef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pump_efficiency: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pump_flow_multiplier: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub turbine_efficiency: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub throttle_injector_drop: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EngineDef {
    pub name: String,
    pub mixture: String,
    #[serde(default)]
    pub cycle: EngineCycle,
    pub of_ratio: f64,
    pub chamber_pressure_mpa: f64,
    pub throat_diameter_m: f64,
    pub area_ratio: f64,
    #[serde(default)]
    pub settings: EngineSettings,
}
