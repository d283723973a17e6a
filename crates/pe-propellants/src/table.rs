//! Single-O/F combustion table, tabulated over chamber pressure.

use crate::error::{PropellantError, PropellantResult};
use crate::state::{CombustionState, ideal_gas_cp};
use pe_core::constants::PA_PER_MPA;
use pe_core::lerp_factor;
use pe_core::units::Pressure;

/// Field order of a text row:
/// `Pc[MPa] Tc[K] Tnoz[K] Pnoz[MPa] MW[kg/kmol] γ Mach [Cp_c Cp_noz [kJ/(kg·K)]]`.
const ROW_FIELDS: [&str; 9] = [
    "chamber pressure",
    "chamber temperature",
    "nozzle temperature",
    "nozzle pressure",
    "nozzle molar mass",
    "nozzle gamma",
    "nozzle Mach",
    "chamber cp",
    "nozzle cp",
];

/// Parse one text row into a combustion state.
///
/// Fields are separated by commas, semicolons or whitespace. Rows must carry
/// 7 fields, or 9 when chamber and nozzle specific heats are appended.
/// Malformed rows and unparsable fields are logged and left at zero; parsing
/// never fails. Without tabulated specific heats both are taken from the
/// ideal-gas relation using the nozzle γ and molar mass.
pub fn parse_row(
    text: &str,
    mixture: &str,
    of_ratio: f64,
    frozen_area_ratio: f64,
    index: usize,
) -> CombustionState {
    let tokens: Vec<&str> = text
        .split(|c: char| c == ',' || c == ';' || c.is_whitespace())
        .filter(|t| !t.is_empty())
        .collect();

    if tokens.len() != 7 && tokens.len() != 9 {
        tracing::error!(
            mixture,
            of_ratio,
            row = index,
            fields = tokens.len(),
            "table row is incomplete or has too many entries"
        );
    }

    let mut values = [0.0_f64; 9];
    for (slot, (token, name)) in values.iter_mut().zip(tokens.iter().zip(ROW_FIELDS)) {
        match token.parse::<f64>() {
            Ok(v) => *slot = v,
            Err(_) => tracing::error!(
                mixture,
                of_ratio,
                row = index,
                field = name,
                text = *token,
                "table field could not be parsed as a number"
            ),
        }
    }

    let [pc, tc, tn, pn, mw, gamma, mach, cp_c, cp_n] = values;
    let ideal = ideal_gas_cp(gamma, mw);
    let tabulated_cp = tokens.len() >= 9 && cp_c > 0.0 && cp_n > 0.0;

    CombustionState {
        of_ratio,
        chamber_pressure: pc * PA_PER_MPA,
        chamber_temperature: tc,
        nozzle_pressure: pn * PA_PER_MPA,
        nozzle_temperature: tn,
        nozzle_molar_mass: mw,
        nozzle_gamma: gamma,
        nozzle_mach: mach,
        chamber_cp: if tabulated_cp { cp_c * 1000.0 } else { ideal },
        nozzle_cp: if tabulated_cp { cp_n * 1000.0 } else { ideal },
        frozen_area_ratio,
    }
}

/// Combustion states for one O/F ratio, ascending in chamber pressure.
#[derive(Clone, Debug, PartialEq)]
pub struct MixtureRatioTable {
    mixture: String,
    of_ratio: f64,
    frozen_area_ratio: f64,
    rows: Vec<CombustionState>,
}

impl MixtureRatioTable {
    /// Build from text rows (pressures in MPa).
    pub fn from_rows<S: AsRef<str>>(
        mixture: &str,
        of_ratio: f64,
        frozen_area_ratio: f64,
        rows: &[S],
    ) -> PropellantResult<Self> {
        let states = rows
            .iter()
            .enumerate()
            .map(|(i, row)| parse_row(row.as_ref(), mixture, of_ratio, frozen_area_ratio, i))
            .collect();
        Self::from_states(mixture, of_ratio, frozen_area_ratio, states)
    }

    /// Build from already-parsed states (SI units).
    pub fn from_states(
        mixture: &str,
        of_ratio: f64,
        frozen_area_ratio: f64,
        mut rows: Vec<CombustionState>,
    ) -> PropellantResult<Self> {
        if rows.is_empty() {
            return Err(PropellantError::EmptyTable {
                what: "mixture ratio table has no rows",
            });
        }
        if !of_ratio.is_finite() || of_ratio <= 0.0 {
            return Err(PropellantError::InvalidArg {
                what: "O/F ratio must be positive",
            });
        }

        if rows
            .windows(2)
            .any(|w| w[1].chamber_pressure <= w[0].chamber_pressure)
        {
            tracing::warn!(
                mixture,
                of_ratio,
                "table rows not strictly ascending in chamber pressure"
            );
        }

        for row in &mut rows {
            row.of_ratio = of_ratio;
            row.frozen_area_ratio = frozen_area_ratio;
        }

        Ok(Self {
            mixture: mixture.to_string(),
            of_ratio,
            frozen_area_ratio,
            rows,
        })
    }

    pub fn of_ratio(&self) -> f64 {
        self.of_ratio
    }

    pub fn rows(&self) -> &[CombustionState] {
        &self.rows
    }

    /// Lowest tabulated chamber pressure [Pa].
    pub fn min_pressure(&self) -> f64 {
        self.rows.first().map_or(0.0, |r| r.chamber_pressure)
    }

    /// Highest tabulated chamber pressure [Pa].
    pub fn max_pressure(&self) -> f64 {
        self.rows.last().map_or(0.0, |r| r.chamber_pressure)
    }

    /// Interpolate all fields linearly in chamber pressure.
    ///
    /// Pressures outside the tabulated range are an error, not an
    /// extrapolation.
    pub fn calc_data(&self, pressure: Pressure) -> PropellantResult<CombustionState> {
        self.calc_data_pa(pressure.value)
    }

    /// Like [`calc_data`](Self::calc_data), but logs and returns the zeroed
    /// state on failure.
    pub fn calc_data_or_zeroed(&self, pressure: Pressure) -> CombustionState {
        match self.calc_data(pressure) {
            Ok(state) => state,
            Err(e) => {
                tracing::error!(error = %e, "combustion table lookup failed");
                CombustionState::zeroed(self.of_ratio, pressure.value, self.frozen_area_ratio)
            }
        }
    }

    pub(crate) fn calc_data_pa(&self, p: f64) -> PropellantResult<CombustionState> {
        let (min, max) = (self.min_pressure(), self.max_pressure());
        if !(p >= min && p <= max) {
            return Err(PropellantError::PressureOutOfRange {
                mixture: self.mixture.clone(),
                of_ratio: self.of_ratio,
                pressure_pa: p,
                min_pa: min,
                max_pa: max,
            });
        }

        let upper = self
            .rows
            .iter()
            .skip(1)
            .position(|r| r.chamber_pressure >= p)
            .map_or(0, |i| i + 1);

        let mut state = if upper == 0 {
            self.rows[0]
        } else {
            let lo = &self.rows[upper - 1];
            let hi = &self.rows[upper];
            let f = lerp_factor(p, lo.chamber_pressure, hi.chamber_pressure);
            CombustionState::lerp(lo, hi, f)
        };
        state.chamber_pressure = p;
        state.of_ratio = self.of_ratio;
        state.frozen_area_ratio = self.frozen_area_ratio;
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pe_core::units::mpa;

    const ROWS: [&str; 3] = [
        "1.0, 3000, 2900, 0.56, 21.0, 1.20, 1.0",
        "5.0; 3400; 3300; 2.80; 22.0; 1.22; 1.0",
        "10.0  3500  3400  5.60  22.5  1.23  1.0",
    ];

    #[test]
    fn parses_mixed_separators_and_converts_to_pascal() {
        let table = MixtureRatioTable::from_rows("test", 2.5, 1.5, &ROWS).unwrap();
        assert_eq!(table.rows().len(), 3);
        assert_eq!(table.min_pressure(), 1.0e6);
        assert_eq!(table.max_pressure(), 1.0e7);
        assert!((table.rows()[1].nozzle_pressure - 2.8e6).abs() < 1e-6);
        assert_eq!(table.rows()[2].nozzle_molar_mass, 22.5);
    }

    #[test]
    fn nine_field_rows_carry_cp_in_kj() {
        let s = parse_row("7 3500 3300 4 22 1.2 1 2.1 1.9", "t", 2.0, 1.0, 0);
        assert_eq!(s.chamber_cp, 2100.0);
        assert_eq!(s.nozzle_cp, 1900.0);
    }

    #[test]
    fn seven_field_rows_use_ideal_gas_cp() {
        let s = parse_row(ROWS[0], "t", 2.0, 1.0, 0);
        let expected = ideal_gas_cp(1.20, 21.0);
        assert_eq!(s.chamber_cp, expected);
        assert_eq!(s.nozzle_cp, expected);
    }

    #[test]
    fn malformed_row_leaves_zero_fields() {
        let s = parse_row("1.0, abc, 2900", "t", 2.0, 1.0, 4);
        assert_eq!(s.chamber_pressure, 1.0e6);
        assert_eq!(s.chamber_temperature, 0.0);
        assert_eq!(s.nozzle_temperature, 2900.0);
        assert_eq!(s.nozzle_gamma, 0.0);
    }

    #[test]
    fn interpolates_between_rows() {
        let table = MixtureRatioTable::from_rows("test", 2.5, 1.5, &ROWS).unwrap();
        let s = table.calc_data(mpa(3.0)).unwrap();
        assert!((s.chamber_temperature - 3200.0).abs() < 1e-9);
        assert_eq!(s.chamber_pressure, 3.0e6);
        assert_eq!(s.of_ratio, 2.5);
        assert_eq!(s.frozen_area_ratio, 1.5);
    }

    #[test]
    fn exact_endpoints_are_in_range() {
        let table = MixtureRatioTable::from_rows("test", 2.5, 1.5, &ROWS).unwrap();
        assert_eq!(table.calc_data(mpa(1.0)).unwrap().chamber_temperature, 3000.0);
        assert_eq!(table.calc_data(mpa(10.0)).unwrap().chamber_temperature, 3500.0);
    }

    #[test]
    fn out_of_range_is_an_error() {
        let table = MixtureRatioTable::from_rows("test", 2.5, 1.5, &ROWS).unwrap();
        assert!(matches!(
            table.calc_data(mpa(12.0)),
            Err(PropellantError::PressureOutOfRange { .. })
        ));
        assert!(table.calc_data(mpa(0.5)).is_err());

        let zeroed = table.calc_data_or_zeroed(mpa(12.0));
        assert!(!zeroed.is_populated());
        assert_eq!(zeroed.chamber_pressure, 1.2e7);
    }

    #[test]
    fn empty_table_is_rejected() {
        let rows: [&str; 0] = [];
        assert!(MixtureRatioTable::from_rows("test", 2.5, 1.5, &rows).is_err());
    }
}
