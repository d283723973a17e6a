//! Bipropellant mixture: O/F-ordered combustion tables plus envelope limits.

use crate::error::{PropellantError, PropellantResult};
use crate::properties::PropellantProperties;
use crate::state::CombustionState;
use crate::table::MixtureRatioTable;
use pe_core::lerp_factor;
use pe_core::units::{Pressure, Temperature, pa};

/// Immutable mixture definition.
#[derive(Clone, Debug)]
pub struct BiPropellantMixture {
    title: String,
    oxidizer: PropellantProperties,
    fuel: PropellantProperties,
    frozen_area_ratio: f64,
    of_lean: f64,
    of_rich: f64,
    tables: Vec<MixtureRatioTable>,
    /// [Pa]
    chamber_pressure_low: f64,
    chamber_pressure_high: f64,
    max_pressure_available: f64,
}

impl BiPropellantMixture {
    /// Build a mixture.
    ///
    /// Tables are sorted by O/F. The usable chamber pressure range runs from
    /// the highest table minimum to half of the lowest table maximum, so
    /// every table can be queried at any usable pressure; the full lowest
    /// maximum remains available for preburner and gas-generator pressures.
    pub fn new(
        title: impl Into<String>,
        oxidizer: PropellantProperties,
        fuel: PropellantProperties,
        frozen_area_ratio: f64,
        of_lean: f64,
        of_rich: f64,
        mut tables: Vec<MixtureRatioTable>,
    ) -> PropellantResult<Self> {
        let title = title.into();
        if tables.is_empty() {
            return Err(PropellantError::EmptyTable {
                what: "mixture has no O/F tables",
            });
        }
        if !(of_lean > 0.0 && of_lean <= of_rich) {
            return Err(PropellantError::InvalidArg {
                what: "O/F limits must satisfy 0 < lean <= rich",
            });
        }
        if !(frozen_area_ratio >= 1.0) {
            return Err(PropellantError::InvalidArg {
                what: "frozen area ratio must be at least 1",
            });
        }

        tables.sort_by(|a, b| a.of_ratio().total_cmp(&b.of_ratio()));

        let low = tables
            .iter()
            .map(MixtureRatioTable::min_pressure)
            .fold(f64::NEG_INFINITY, f64::max);
        let max_available = tables
            .iter()
            .map(MixtureRatioTable::max_pressure)
            .fold(f64::INFINITY, f64::min);
        let high = max_available * 0.5;

        if high < low {
            tracing::warn!(
                mixture = %title,
                low,
                high,
                "usable chamber pressure range is empty"
            );
        }

        let (first, last) = (tables[0].of_ratio(), tables[tables.len() - 1].of_ratio());
        if of_lean < first || of_rich > last {
            tracing::warn!(
                mixture = %title,
                of_lean,
                of_rich,
                first,
                last,
                "O/F limits extend beyond tabulated data"
            );
        }

        Ok(Self {
            title,
            oxidizer,
            fuel,
            frozen_area_ratio,
            of_lean,
            of_rich,
            tables,
            chamber_pressure_low: low,
            chamber_pressure_high: high,
            max_pressure_available: max_available,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn oxidizer(&self) -> &PropellantProperties {
        &self.oxidizer
    }

    pub fn fuel(&self) -> &PropellantProperties {
        &self.fuel
    }

    pub fn frozen_area_ratio(&self) -> f64 {
        self.frozen_area_ratio
    }

    pub fn tables(&self) -> &[MixtureRatioTable] {
        &self.tables
    }

    /// (lean, rich) chamber O/F limits.
    pub fn of_limits(&self) -> (f64, f64) {
        (self.of_lean, self.of_rich)
    }

    pub fn clamp_of_ratio(&self, of_ratio: f64) -> f64 {
        of_ratio.clamp(self.of_lean, self.of_rich)
    }

    /// (low, high) usable chamber pressure.
    pub fn chamber_pressure_limits(&self) -> (Pressure, Pressure) {
        (
            pa(self.chamber_pressure_low),
            pa(self.chamber_pressure_high),
        )
    }

    pub fn clamp_chamber_pressure(&self, pressure: Pressure) -> Pressure {
        let p = pressure.value;
        pa(p.max(self.chamber_pressure_low).min(self.chamber_pressure_high))
    }

    /// Highest pressure every table covers; bounds auxiliary combustors.
    pub fn max_pressure_available(&self) -> Pressure {
        pa(self.max_pressure_available)
    }

    /// Interpolate the combustion state at `(of_ratio, pressure)`.
    ///
    /// Blends the two O/F tables that bracket `of_ratio`, each evaluated at
    /// `pressure`. An exact tabulated O/F yields a blend factor of 0 or 1.
    pub fn combustion_state(
        &self,
        of_ratio: f64,
        pressure: Pressure,
    ) -> PropellantResult<CombustionState> {
        if let [only] = self.tables.as_slice() {
            return only.calc_data_pa(pressure.value);
        }

        let first = self.tables[0].of_ratio();
        let last = self.tables[self.tables.len() - 1].of_ratio();
        if !(of_ratio >= first && of_ratio <= last) {
            return Err(PropellantError::OfRatioOutOfRange {
                mixture: self.title.clone(),
                of_ratio,
                lean: first,
                rich: last,
            });
        }

        let upper = self
            .tables
            .iter()
            .skip(1)
            .position(|t| t.of_ratio() >= of_ratio)
            .map_or(1, |i| i + 1);
        self.combustion_state_between(of_ratio, pressure, upper - 1)
    }

    /// Blend tables `index_low` and `index_low + 1` at `of_ratio`.
    pub fn combustion_state_between(
        &self,
        of_ratio: f64,
        pressure: Pressure,
        index_low: usize,
    ) -> PropellantResult<CombustionState> {
        let (lo, hi) = match (self.tables.get(index_low), self.tables.get(index_low + 1)) {
            (Some(lo), Some(hi)) => (lo, hi),
            _ => {
                return Err(PropellantError::InvalidArg {
                    what: "O/F table index out of range",
                });
            }
        };

        let s1 = lo.calc_data_pa(pressure.value)?;
        let s2 = hi.calc_data_pa(pressure.value)?;
        let f = lerp_factor(of_ratio, lo.of_ratio(), hi.of_ratio());
        let mut state = CombustionState::lerp(&s1, &s2, f);
        state.of_ratio = of_ratio;
        state.chamber_pressure = pressure.value;
        Ok(state)
    }

    /// Find the off-ratio state whose chamber temperature equals `temperature`.
    ///
    /// Scans tables from the rich end (`oxidizer_rich`) or the lean end and
    /// interpolates by temperature between the first pair that straddles the
    /// target. Assumes chamber temperature rises monotonically toward
    /// stoichiometric along the scan; this is not checked.
    pub fn state_at_pressure_and_temperature(
        &self,
        pressure: Pressure,
        temperature: Temperature,
        oxidizer_rich: bool,
    ) -> PropellantResult<CombustionState> {
        let p = pressure.value;
        let target = temperature.value;
        let n = self.tables.len();
        let order: Vec<usize> = if oxidizer_rich {
            (0..n).rev().collect()
        } else {
            (0..n).collect()
        };

        let mut prev = self.tables[order[0]].calc_data_pa(p)?;
        for &i in &order[1..] {
            let next = self.tables[i].calc_data_pa(p)?;
            if next.chamber_temperature < target {
                prev = next;
                continue;
            }

            let f = lerp_factor(target, prev.chamber_temperature, next.chamber_temperature);
            if !(0.0..=1.0).contains(&f) {
                tracing::warn!(
                    mixture = %self.title,
                    target,
                    end_temperature = prev.chamber_temperature,
                    "auxiliary combustor temperature lies beyond the tabulated end; extrapolating"
                );
            }
            let mut state = CombustionState::lerp(&prev, &next, f);
            state.chamber_pressure = p;
            return Ok(state);
        }

        Err(PropellantError::TemperatureNotBracketed {
            mixture: self.title.clone(),
            temperature_k: target,
            pressure_pa: p,
        })
    }
}
