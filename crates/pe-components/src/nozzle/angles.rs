//! Bell nozzle reference curves: exit and inflection angles as functions of
//! relative length (fraction of a 15° cone) and area ratio.

use crate::error::{ComponentError, ComponentResult};
use pe_core::lerp_factor;

/// Half-angle of the reference cone [rad].
pub const REFERENCE_CONE_HALF_ANGLE: f64 = 15.0 * std::f64::consts::PI / 180.0;

/// Exit half-angle of a conical nozzle at `rel_length` of the 15° cone.
pub fn conical_exit_angle(rel_length: f64) -> f64 {
    (REFERENCE_CONE_HALF_ANGLE.tan() / rel_length).atan()
}

/// Exit and inflection angles [rad].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BellAngles {
    pub exit: f64,
    pub inflection: f64,
}

/// Tabulated bell angles, stored in radians.
#[derive(Clone, Debug, PartialEq)]
pub struct BellNozzleCurves {
    rel_lengths: Vec<f64>,
    area_ratios: Vec<f64>,
    /// `[area ratio][relative length]`
    exit_angles: Vec<Vec<f64>>,
    inflection_angles: Vec<Vec<f64>>,
}

const DEFAULT_REL_LENGTHS: [f64; 5] = [0.6, 0.7, 0.8, 0.9, 1.0];
const DEFAULT_AREA_RATIOS: [f64; 7] = [4.0, 10.0, 20.0, 30.0, 40.0, 50.0, 100.0];
const DEFAULT_INFLECTION_DEG: [[f64; 5]; 7] = [
    [26.0, 23.0, 21.0, 19.0, 17.5],
    [32.0, 29.5, 27.5, 25.5, 23.5],
    [36.0, 33.0, 31.0, 28.5, 26.5],
    [38.0, 35.0, 32.5, 30.0, 28.0],
    [39.0, 36.0, 33.5, 31.0, 29.0],
    [40.0, 37.0, 34.5, 32.0, 30.0],
    [42.0, 39.0, 36.5, 34.0, 32.0],
];
const DEFAULT_EXIT_DEG: [[f64; 5]; 7] = [
    [17.0, 14.0, 12.0, 10.0, 9.0],
    [15.0, 12.0, 9.5, 8.0, 7.0],
    [14.0, 11.0, 8.5, 7.0, 6.0],
    [13.5, 10.5, 8.0, 6.5, 5.5],
    [13.0, 10.0, 7.5, 6.0, 5.0],
    [12.5, 9.5, 7.2, 5.8, 4.8],
    [11.5, 8.5, 6.5, 5.0, 4.0],
];

impl BellNozzleCurves {
    /// Build from tables in degrees, rows indexed by area ratio and columns
    /// by relative length.
    pub fn from_degrees(
        rel_lengths: Vec<f64>,
        area_ratios: Vec<f64>,
        exit_deg: Vec<Vec<f64>>,
        inflection_deg: Vec<Vec<f64>>,
    ) -> ComponentResult<Self> {
        let ascending = |v: &[f64]| v.len() >= 2 && v.windows(2).all(|w| w[0] < w[1]);
        if !ascending(&rel_lengths) || !ascending(&area_ratios) {
            return Err(ComponentError::InvalidData {
                what: "bell nozzle axes need at least two strictly ascending values".into(),
            });
        }
        for (name, table) in [("exit", &exit_deg), ("inflection", &inflection_deg)] {
            if table.len() != area_ratios.len()
                || table.iter().any(|row| row.len() != rel_lengths.len())
            {
                return Err(ComponentError::InvalidData {
                    what: format!(
                        "{name} angle table must be {} x {}",
                        area_ratios.len(),
                        rel_lengths.len()
                    ),
                });
            }
        }

        let to_rad = |t: Vec<Vec<f64>>| -> Vec<Vec<f64>> {
            t.into_iter()
                .map(|row| row.into_iter().map(f64::to_radians).collect())
                .collect()
        };

        Ok(Self {
            rel_lengths,
            area_ratios,
            exit_angles: to_rad(exit_deg),
            inflection_angles: to_rad(inflection_deg),
        })
    }

    pub fn rel_lengths(&self) -> &[f64] {
        &self.rel_lengths
    }

    pub fn area_ratios(&self) -> &[f64] {
        &self.area_ratios
    }

    pub fn min_rel_length(&self) -> f64 {
        self.rel_lengths[0]
    }

    /// Bilinear interpolation of both angles. Queries outside the table are
    /// clamped to its edge.
    pub fn angles(&self, rel_length: f64, area_ratio: f64) -> BellAngles {
        let (i, fr) = locate(&self.rel_lengths, rel_length, "relative length");
        let (j, fa) = locate(&self.area_ratios, area_ratio, "area ratio");

        let bilinear = |t: &[Vec<f64>]| {
            let lo = t[j][i] + (t[j][i + 1] - t[j][i]) * fr;
            let hi = t[j + 1][i] + (t[j + 1][i + 1] - t[j + 1][i]) * fr;
            lo + (hi - lo) * fa
        };

        BellAngles {
            exit: bilinear(&self.exit_angles),
            inflection: bilinear(&self.inflection_angles),
        }
    }
}

impl Default for BellNozzleCurves {
    fn default() -> Self {
        Self {
            rel_lengths: DEFAULT_REL_LENGTHS.to_vec(),
            area_ratios: DEFAULT_AREA_RATIOS.to_vec(),
            exit_angles: DEFAULT_EXIT_DEG
                .iter()
                .map(|row| row.iter().map(|d| d.to_radians()).collect())
                .collect(),
            inflection_angles: DEFAULT_INFLECTION_DEG
                .iter()
                .map(|row| row.iter().map(|d| d.to_radians()).collect())
                .collect(),
        }
    }
}

/// Lower index and blend factor of `x` on `axis`, clamped to the axis.
fn locate(axis: &[f64], x: f64, what: &'static str) -> (usize, f64) {
    let first = axis[0];
    let last = axis[axis.len() - 1];
    let clamped = x.clamp(first, last);
    if clamped != x {
        tracing::warn!(value = x, min = first, max = last, "bell nozzle {what} outside table, clamping");
    }

    let upper = axis
        .iter()
        .skip(1)
        .position(|&v| v >= clamped)
        .map_or(axis.len() - 1, |p| p + 1);
    let lower = upper - 1;
    (lower, lerp_factor(clamped, axis[lower], axis[upper]))
}
