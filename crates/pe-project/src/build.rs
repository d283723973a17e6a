//! Turn a validated data file into solver inputs.

use crate::schema::{BellNozzleDef, DataFile, EngineDef, MixtureDef, PropellantDef, TurbomachineryDef};
use crate::validate::ValidationError;
use crate::ProjectResult;
use pe_components::{BellNozzleCurves, ComponentResult, Curve, TurbomachineryCorrelations};
use pe_core::units::{m, mpa};
use pe_cycle::{EngineDataContext, EngineParameters, EngineSolver};
use pe_propellants::{
    BiPropellantMixture, MixtureLibrary, MixtureRatioTable, PropellantProperties, PropellantResult,
};
use std::collections::HashMap;

/// Shared, immutable data every engine built from one file refers to.
#[derive(Debug, Clone)]
pub struct ProjectData {
    pub library: MixtureLibrary,
    pub context: EngineDataContext,
}

impl ProjectData {
    pub fn from_file(file: &DataFile) -> ProjectResult<Self> {
        let propellants = file
            .propellants
            .iter()
            .map(|def| Ok((def.name.as_str(), build_propellant(def)?)))
            .collect::<PropellantResult<HashMap<_, _>>>()?;

        let mut library = MixtureLibrary::new();
        for def in &file.mixtures {
            library.insert(build_mixture(def, &propellants)?)?;
        }

        let bell_curves = match &file.bell_nozzle {
            Some(def) => build_bell_curves(def)?,
            None => BellNozzleCurves::default(),
        };
        let correlations = match &file.turbomachinery {
            Some(def) => build_correlations(def)?,
            None => TurbomachineryCorrelations::default(),
        };

        tracing::debug!(
            propellants = propellants.len(),
            mixtures = library.len(),
            custom_bell = file.bell_nozzle.is_some(),
            custom_turbomachinery = file.turbomachinery.is_some(),
            "project data built"
        );

        Ok(Self {
            library,
            context: EngineDataContext::new(bell_curves, correlations),
        })
    }

    pub fn parameters(&self, engine: &EngineDef) -> ProjectResult<EngineParameters> {
        let mixture = self.library.find(&engine.mixture)?;
        Ok(EngineParameters::new(
            mixture,
            engine.of_ratio,
            mpa(engine.chamber_pressure_mpa),
            m(engine.throat_diameter_m),
            engine.area_ratio,
        ))
    }

    /// Build and evaluate the solver for one engine definition.
    pub fn evaluate(&self, engine: &EngineDef) -> ProjectResult<EngineSolver> {
        let mut solver = EngineSolver::new(engine.cycle, self.context.clone(), engine.settings.clone());
        solver.set_parameters(self.parameters(engine)?)?;
        Ok(solver)
    }
}

pub fn build_propellant(def: &PropellantDef) -> PropellantResult<PropellantProperties> {
    let mut props = PropellantProperties::new(def.name.clone(), def.density_kg_m3)?;
    if let Some(mu) = def.viscosity_pa_s {
        props = props.with_viscosity(mu);
    }
    if let Some(p) = def.vapor_pressure_mpa {
        props = props.with_vapor_pressure(mpa(p));
    }
    if let Some(nss) = def.suction_specific_speed {
        props = props.with_suction_specific_speed(nss);
    }
    if let Some(rise) = def.pressure_rise_per_stage_mpa {
        props = props.with_pressure_rise_per_stage(mpa(rise));
    }
    Ok(props)
}

pub fn build_mixture(
    def: &MixtureDef,
    propellants: &HashMap<&str, PropellantProperties>,
) -> ProjectResult<BiPropellantMixture> {
    let lookup = |name: &str, role: &str| {
        propellants
            .get(name)
            .cloned()
            .ok_or_else(|| ValidationError::MissingReference {
                name: name.to_string(),
                context: format!("mixture '{}' {role}", def.title),
            })
    };
    let oxidizer = lookup(&def.oxidizer, "oxidizer")?;
    let fuel = lookup(&def.fuel, "fuel")?;

    let tables = def
        .mixture_ratios
        .iter()
        .map(|t| MixtureRatioTable::from_rows(&def.title, t.of_ratio, def.frozen_area_ratio, &t.rows))
        .collect::<PropellantResult<Vec<_>>>()?;

    Ok(BiPropellantMixture::new(
        def.title.clone(),
        oxidizer,
        fuel,
        def.frozen_area_ratio,
        def.of_lean,
        def.of_rich,
        tables,
    )?)
}

pub fn build_bell_curves(def: &BellNozzleDef) -> ComponentResult<BellNozzleCurves> {
    BellNozzleCurves::from_degrees(
        def.rel_lengths.clone(),
        def.area_ratios.clone(),
        def.exit_angles_deg.clone(),
        def.inflection_angles_deg.clone(),
    )
}

pub fn build_correlations(def: &TurbomachineryDef) -> ComponentResult<TurbomachineryCorrelations> {
    let curve = |keys: &Option<Vec<String>>, fallback: fn() -> Curve| match keys {
        Some(keys) => Curve::parse_keys(keys),
        None => Ok(fallback()),
    };
    Ok(TurbomachineryCorrelations {
        pump_efficiency: curve(
            &def.pump_efficiency,
            TurbomachineryCorrelations::default_pump_efficiency,
        )?,
        pump_flow_multiplier: curve(
            &def.pump_flow_multiplier,
            TurbomachineryCorrelations::default_pump_flow_multiplier,
        )?,
        turbine_efficiency: curve(
            &def.turbine_efficiency,
            TurbomachineryCorrelations::default_turbine_efficiency,
        )?,
        throttle_injector_drop: curve(
            &def.throttle_injector_drop,
            TurbomachineryCorrelations::default_throttle_injector_drop,
        )?,
    })
}
