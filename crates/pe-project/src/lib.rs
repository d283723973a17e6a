//! pe-project: engine data file format, validation and loading.

pub mod build;
pub mod schema;
pub mod validate;

pub use build::ProjectData;
pub use schema::*;
pub use validate::{LATEST_VERSION, ValidationError, validate_data_file};

use pe_components::ComponentError;
use pe_cycle::CycleError;
use pe_propellants::PropellantError;

pub type ProjectResult<T> = Result<T, ProjectError>;

#[derive(thiserror::Error, Debug)]
pub enum ProjectError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Propellant data error: {0}")]
    Propellant(#[from] PropellantError),

    #[error("Component data error: {0}")]
    Component(#[from] ComponentError),

    #[error("Engine evaluation error: {0}")]
    Cycle(#[from] CycleError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn from_yaml_str(content: &str) -> ProjectResult<DataFile> {
    let file: DataFile = serde_yaml::from_str(content)?;
    validate_data_file(&file)?;
    Ok(file)
}

pub fn from_json_str(content: &str) -> ProjectResult<DataFile> {
    let file: DataFile = serde_json::from_str(content)?;
    validate_data_file(&file)?;
    Ok(file)
}

pub fn load_yaml(path: &std::path::Path) -> ProjectResult<DataFile> {
    let content = std::fs::read_to_string(path)?;
    from_yaml_str(&content)
}

pub fn save_yaml(path: &std::path::Path, file: &DataFile) -> ProjectResult<()> {
    validate_data_file(file)?;
    let content = serde_yaml::to_string(file)?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn load_json(path: &std::path::Path) -> ProjectResult<DataFile> {
    let content = std::fs::read_to_string(path)?;
    from_json_str(&content)
}

pub fn save_json(path: &std::path::Path, file: &DataFile) -> ProjectResult<()> {
    validate_data_file(file)?;
    let content = serde_json::to_string_pretty(file)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Load by extension: `.json` as JSON, anything else as YAML.
pub fn load(path: &std::path::Path) -> ProjectResult<DataFile> {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => load_json(path),
        _ => load_yaml(path),
    }
}
