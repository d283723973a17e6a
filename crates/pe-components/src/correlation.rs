//! Correlation curves for turbomachinery and injector sizing.
//!
//! A [`Curve`] is a sorted list of keys. Keys given with only `(x, y)` use
//! the secant slope of the adjacent segment as tangent, so a curve made of
//! such keys is piecewise linear. Keys with explicit in/out tangents give
//! cubic Hermite segments. Evaluation clamps to the end values.

use crate::common::split_numbers;
use crate::error::{ComponentError, ComponentResult};

/// One curve key.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CurveKey {
    pub x: f64,
    pub y: f64,
    pub in_tangent: Option<f64>,
    pub out_tangent: Option<f64>,
}

impl CurveKey {
    pub fn linear(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            in_tangent: None,
            out_tangent: None,
        }
    }

    pub fn hermite(x: f64, y: f64, in_tangent: f64, out_tangent: f64) -> Self {
        Self {
            x,
            y,
            in_tangent: Some(in_tangent),
            out_tangent: Some(out_tangent),
        }
    }
}

/// Piecewise curve evaluated with clamping at both ends.
#[derive(Clone, Debug, PartialEq)]
pub struct Curve {
    keys: Vec<CurveKey>,
}

impl Curve {
    pub fn new(mut keys: Vec<CurveKey>) -> ComponentResult<Self> {
        if keys.is_empty() {
            return Err(ComponentError::InvalidData {
                what: "curve needs at least one key".into(),
            });
        }
        if keys.iter().any(|k| !k.x.is_finite() || !k.y.is_finite()) {
            return Err(ComponentError::InvalidData {
                what: "curve keys must be finite".into(),
            });
        }
        keys.sort_by(|a, b| a.x.total_cmp(&b.x));
        if keys.windows(2).any(|w| w[0].x == w[1].x) {
            return Err(ComponentError::InvalidData {
                what: "curve keys must have distinct x values".into(),
            });
        }
        Ok(Self { keys })
    }

    /// Piecewise linear curve through `points`.
    pub fn linear(points: &[(f64, f64)]) -> ComponentResult<Self> {
        Self::new(points.iter().map(|&(x, y)| CurveKey::linear(x, y)).collect())
    }

    /// Parse text keys of 2 (`x y`) or 4 (`x y in out`) numbers.
    pub fn parse_keys<S: AsRef<str>>(keys: &[S]) -> ComponentResult<Self> {
        let parsed = keys
            .iter()
            .map(|text| {
                let text = text.as_ref();
                let values = split_numbers(text).map_err(|bad| ComponentError::InvalidData {
                    what: format!("curve key '{text}': '{bad}' is not a number"),
                })?;
                match values.as_slice() {
                    [x, y] => Ok(CurveKey::linear(*x, *y)),
                    [x, y, tin, tout] => Ok(CurveKey::hermite(*x, *y, *tin, *tout)),
                    _ => Err(ComponentError::InvalidData {
                        what: format!("curve key '{text}' must have 2 or 4 values"),
                    }),
                }
            })
            .collect::<ComponentResult<Vec<_>>>()?;
        Self::new(parsed)
    }

    pub fn keys(&self) -> &[CurveKey] {
        &self.keys
    }

    pub fn evaluate(&self, x: f64) -> f64 {
        let first = &self.keys[0];
        let last = &self.keys[self.keys.len() - 1];
        if x <= first.x {
            return first.y;
        }
        if x >= last.x {
            return last.y;
        }

        let i = self.keys.partition_point(|k| k.x <= x);
        let k0 = &self.keys[i - 1];
        let k1 = &self.keys[i];

        let dx = k1.x - k0.x;
        let secant = (k1.y - k0.y) / dx;
        let m0 = k0.out_tangent.unwrap_or(secant);
        let m1 = k1.in_tangent.unwrap_or(secant);

        let t = (x - k0.x) / dx;
        let t2 = t * t;
        let t3 = t2 * t;
        let h00 = 2.0 * t3 - 3.0 * t2 + 1.0;
        let h10 = t3 - 2.0 * t2 + t;
        let h01 = -2.0 * t3 + 3.0 * t2;
        let h11 = t3 - t2;

        h00 * k0.y + h10 * dx * m0 + h01 * k1.y + h11 * dx * m1
    }
}

/// Correlation curves shared by every engine solver.
#[derive(Clone, Debug, PartialEq)]
pub struct TurbomachineryCorrelations {
    /// Pump efficiency vs. specific speed
    pub pump_efficiency: Curve,
    /// Pump efficiency multiplier vs. volumetric flow [m³/s]
    pub pump_flow_multiplier: Curve,
    /// Turbine efficiency vs. blade-speed / isentropic-velocity ratio
    pub turbine_efficiency: Curve,
    /// Injector pressure-drop ratio vs. minimum throttle fraction
    pub throttle_injector_drop: Curve,
}

impl TurbomachineryCorrelations {
    /// Cubic up to the peak at specific speed 2.5, then a linear decline of
    /// 0.04 per unit down to a floor of 0.2.
    pub fn default_pump_efficiency() -> Curve {
        Curve {
            keys: vec![
                CurveKey::hermite(0.0, 0.331_25, 0.3125, 0.3125),
                CurveKey::hermite(2.5, 0.8, 0.0, -0.04),
                CurveKey::hermite(17.5, 0.2, -0.04, 0.0),
            ],
        }
    }

    pub fn default_pump_flow_multiplier() -> Curve {
        Curve {
            keys: vec![
                CurveKey::linear(0.0, 0.75),
                CurveKey::linear(0.01, 0.85),
                CurveKey::linear(0.05, 0.95),
                CurveKey::linear(0.2, 1.0),
            ],
        }
    }

    pub fn default_turbine_efficiency() -> Curve {
        Curve {
            keys: [
                (0.0, 0.0),
                (0.1, 0.25),
                (0.2, 0.45),
                (0.3, 0.6),
                (0.4, 0.68),
                (0.5, 0.7),
                (0.6, 0.66),
                (0.7, 0.58),
                (0.8, 0.45),
                (1.0, 0.2),
            ]
            .iter()
            .map(|&(x, y)| CurveKey::linear(x, y))
            .collect(),
        }
    }

    pub fn default_throttle_injector_drop() -> Curve {
        Curve {
            keys: vec![
                CurveKey::hermite(0.1, 0.67, -0.65, -0.65),
                CurveKey::hermite(1.0, 0.2, 0.0, 0.0),
            ],
        }
    }

    /// Pump efficiency from specific speed before flow and loss corrections.
    pub fn pump_efficiency_at(&self, specific_speed: f64) -> f64 {
        self.pump_efficiency.evaluate(specific_speed)
    }

    pub fn injector_drop_for_min_throttle(&self, min_throttle: f64) -> f64 {
        self.throttle_injector_drop.evaluate(min_throttle)
    }
}

impl Default for TurbomachineryCorrelations {
    fn default() -> Self {
        Self {
            pump_efficiency: Self::default_pump_efficiency(),
            pump_flow_multiplier: Self::default_pump_flow_multiplier(),
            turbine_efficiency: Self::default_turbine_efficiency(),
            throttle_injector_drop: Self::default_throttle_injector_drop(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_curve_interpolates_and_clamps() {
        let c = Curve::linear(&[(0.0, 0.0), (1.0, 2.0), (3.0, 2.0)]).unwrap();
        assert!((c.evaluate(0.5) - 1.0).abs() < 1e-12);
        assert!((c.evaluate(2.0) - 2.0).abs() < 1e-12);
        assert_eq!(c.evaluate(-1.0), 0.0);
        assert_eq!(c.evaluate(10.0), 2.0);
    }

    #[test]
    fn default_pump_curve_matches_polynomial() {
        let c = TurbomachineryCorrelations::default_pump_efficiency();
        for ns in [0.25, 0.5, 1.0, 1.7, 2.2] {
            let poly = 0.331_25 + 0.3125 * ns - 0.025 * ns * ns - 0.01 * ns * ns * ns;
            assert!((c.evaluate(ns) - poly).abs() < 1e-12, "ns = {ns}");
        }
        assert!((c.evaluate(5.0) - 0.7).abs() < 1e-12);
        assert!((c.evaluate(30.0) - 0.2).abs() < 1e-12);
    }

    #[test]
    fn throttle_curve_endpoints() {
        let corr = TurbomachineryCorrelations::default();
        assert!((corr.injector_drop_for_min_throttle(1.0) - 0.2).abs() < 1e-12);
        assert!((corr.injector_drop_for_min_throttle(0.1) - 0.67).abs() < 1e-12);
        let mid = corr.injector_drop_for_min_throttle(0.5);
        assert!(mid > 0.2 && mid < 0.67);
    }

    #[test]
    fn parse_two_and_four_value_keys() {
        let c = Curve::parse_keys(&["0.1, 0.67, -0.65, -0.65", "1 0.2 0 0"]).unwrap();
        assert_eq!(c.keys().len(), 2);
        assert_eq!(c.keys()[0].out_tangent, Some(-0.65));

        let c = Curve::parse_keys(&["0 0.75", "0.2;1.0"]).unwrap();
        assert!((c.evaluate(0.1) - 0.875).abs() < 1e-12);

        assert!(Curve::parse_keys(&["1 2 3"]).is_err());
        assert!(Curve::parse_keys(&["1 abc"]).is_err());
        assert!(Curve::parse_keys::<&str>(&[]).is_err());
    }

    #[test]
    fn duplicate_x_rejected() {
        assert!(Curve::linear(&[(1.0, 0.0), (1.0, 1.0)]).is_err());
    }
}
