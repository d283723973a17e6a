//! Data file validation logic.

use crate::schema::{DataFile, EngineDef, MixtureDef, PropellantDef};
use std::collections::HashSet;

/// Newest data file version this crate understands.
pub const LATEST_VERSION: u32 = 1;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Duplicate name: {name} in {context}")]
    DuplicateName { name: String, context: String },

    #[error("Missing reference: {name} in {context}")]
    MissingReference { name: String, context: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Empty table: {context}")]
    EmptyTable { context: String },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

pub fn validate_data_file(file: &DataFile) -> Result<(), ValidationError> {
    if file.version > LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: file.version,
        });
    }

    let mut propellant_names = HashSet::new();
    for propellant in &file.propellants {
        if !propellant_names.insert(propellant.name.as_str()) {
            return Err(ValidationError::DuplicateName {
                name: propellant.name.clone(),
                context: "propellants".to_string(),
            });
        }
        validate_propellant(propellant)?;
    }

    let mut mixture_titles = HashSet::new();
    for mixture in &file.mixtures {
        if !mixture_titles.insert(mixture.title.as_str()) {
            return Err(ValidationError::DuplicateName {
                name: mixture.title.clone(),
                context: "mixtures".to_string(),
            });
        }
        validate_mixture(mixture, &propellant_names)?;
    }

    let mut engine_names = HashSet::new();
    for engine in &file.engines {
        if !engine_names.insert(engine.name.as_str()) {
            return Err(ValidationError::DuplicateName {
                name: engine.name.clone(),
                context: "engines".to_string(),
            });
        }
        validate_engine(engine, &mixture_titles)?;
    }

    Ok(())
}

fn positive(field: &str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ValidationError::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
            reason: "must be positive and finite".to_string(),
        })
    }
}

fn validate_propellant(propellant: &PropellantDef) -> Result<(), ValidationError> {
    let name = &propellant.name;
    positive(&format!("propellant '{name}' density_kg_m3"), propellant.density_kg_m3)?;
    let optional = [
        ("viscosity_pa_s", propellant.viscosity_pa_s),
        ("vapor_pressure_mpa", propellant.vapor_pressure_mpa),
        ("suction_specific_speed", propellant.suction_specific_speed),
        ("pressure_rise_per_stage_mpa", propellant.pressure_rise_per_stage_mpa),
    ];
    for (field, value) in optional {
        if let Some(value) = value {
            positive(&format!("propellant '{name}' {field}"), value)?;
        }
    }
    Ok(())
}

fn validate_mixture(mixture: &MixtureDef, propellants: &HashSet<&str>) -> Result<(), ValidationError> {
    let title = &mixture.title;
    for (role, name) in [("oxidizer", &mixture.oxidizer), ("fuel", &mixture.fuel)] {
        if !propellants.contains(name.as_str()) {
            return Err(ValidationError::MissingReference {
                name: name.clone(),
                context: format!("mixture '{title}' {role}"),
            });
        }
    }

    if !(mixture.frozen_area_ratio >= 1.0) {
        return Err(ValidationError::InvalidValue {
            field: format!("mixture '{title}' frozen_area_ratio"),
            value: mixture.frozen_area_ratio.to_string(),
            reason: "must be at least 1".to_string(),
        });
    }
    positive(&format!("mixture '{title}' of_lean"), mixture.of_lean)?;
    if !(mixture.of_lean <= mixture.of_rich) {
        return Err(ValidationError::InvalidValue {
            field: format!("mixture '{title}' of_rich"),
            value: mixture.of_rich.to_string(),
            reason: format!("must not be below of_lean {}", mixture.of_lean),
        });
    }

    if mixture.mixture_ratios.is_empty() {
        return Err(ValidationError::EmptyTable {
            context: format!("mixture '{title}' has no mixture_ratios"),
        });
    }
    for table in &mixture.mixture_ratios {
        positive(&format!("mixture '{title}' of_ratio"), table.of_ratio)?;
        if table.rows.is_empty() {
            return Err(ValidationError::EmptyTable {
                context: format!("mixture '{title}' O/F {} has no rows", table.of_ratio),
            });
        }
    }
    for pair in mixture.mixture_ratios.windows(2) {
        if !(pair[0].of_ratio < pair[1].of_ratio) {
            return Err(ValidationError::InvalidValue {
                field: format!("mixture '{title}' of_ratio"),
                value: pair[1].of_ratio.to_string(),
                reason: "mixture ratio tables must be strictly ascending".to_string(),
            });
        }
    }
    Ok(())
}

fn validate_engine(engine: &EngineDef, mixtures: &HashSet<&str>) -> Result<(), ValidationError> {
    let name = &engine.name;
    if !mixtures.contains(engine.mixture.as_str()) {
        return Err(ValidationError::MissingReference {
            name: engine.mixture.clone(),
            context: format!("engine '{name}' mixture"),
        });
    }
    positive(&format!("engine '{name}' of_ratio"), engine.of_ratio)?;
    positive(&format!("engine '{name}' chamber_pressure_mpa"), engine.chamber_pressure_mpa)?;
    positive(&format!("engine '{name}' throat_diameter_m"), engine.throat_diameter_m)?;
    positive(&format!("engine '{name}' area_ratio"), engine.area_ratio)?;
    Ok(())
}
