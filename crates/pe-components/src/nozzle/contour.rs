//! Normalized nozzle contour (throat radius = 1) and its loss integrals.
//!
//! The wall is built from a converging circular arc of radius 1.5 ending at
//! the throat, a diverging arc of radius 0.382 up to the inflection angle,
//! then either a quadratic Bezier curve to the exit (bell) or a straight cone
//! (conical). The contour is memoized on (relative length, area ratio,
//! shape) and regenerated only when one of them changes.

use super::angles::{BellNozzleCurves, REFERENCE_CONE_HALF_ANGLE, conical_exit_angle};
use crate::error::{ComponentError, ComponentResult};
use crate::isentropic::{mach_from_area_ratio, speed_of_sound, stagnation_temperature_ratio};
use pe_core::constants::R_UNIVERSAL;
use pe_core::lerp_factor;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::sync::Arc;

const CONVERGING_ARC_RADIUS: f64 = 1.5;
const DIVERGING_ARC_RADIUS: f64 = 0.382;
const CONVERGING_HALF_ANGLE: f64 = 30.0 * PI / 180.0;

const CONVERGING_POINTS: usize = 10;
const DIVERGING_POINTS: usize = 10;
const EXPANSION_POINTS: usize = 40;

/// Bartz viscosity coefficient, SI: μ[Pa·s] = C · MW^0.5 · T[K]^0.6
const VISCOSITY_COEFF: f64 = 1.184e-7;

/// Divergence efficiency `(1 + cos α) / 2` for exit half-angle `α`.
pub fn divergence_efficiency(exit_angle: f64) -> f64 {
    0.5 * (1.0 + exit_angle.cos())
}

/// Nozzle shape family.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NozzleShape {
    Conical,
    #[default]
    Bell,
}

/// Flow conditions for the skin-friction integral.
#[derive(Clone, Copy, Debug)]
pub struct FrictionInputs {
    /// Ideal exhaust velocity [m/s]
    pub exhaust_velocity: f64,
    /// Mass flow through the nozzle [kg/s]
    pub mass_flow: f64,
    /// Stagnation pressure [Pa]
    pub chamber_pressure: f64,
    /// Stagnation temperature [K]
    pub chamber_temperature: f64,
    pub gamma: f64,
    /// Molar mass [kg/kmol]
    pub molar_mass: f64,
    /// Throat radius [m]
    pub throat_radius: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct ContourKey {
    rel_length: f64,
    area_ratio: f64,
    shape: NozzleShape,
}

/// Memoized nozzle contour.
#[derive(Clone, Debug)]
pub struct NozzleContour {
    curves: Arc<BellNozzleCurves>,
    key: ContourKey,
    exit_angle: f64,
    inflection_angle: f64,
    /// (axial, radius), throat at (0, 1)
    points: Vec<[f64; 2]>,
    inflection_index: usize,
    generation: u64,
}

impl NozzleContour {
    pub fn new(
        curves: Arc<BellNozzleCurves>,
        rel_length: f64,
        area_ratio: f64,
        shape: NozzleShape,
    ) -> ComponentResult<Self> {
        let key = validated_key(rel_length, area_ratio, shape)?;
        let mut contour = Self {
            curves,
            key,
            exit_angle: 0.0,
            inflection_angle: 0.0,
            points: Vec::new(),
            inflection_index: 0,
            generation: 0,
        };
        contour.regenerate();
        Ok(contour)
    }

    /// Apply new geometry. Returns `true` when the contour was regenerated.
    pub fn update(
        &mut self,
        rel_length: f64,
        area_ratio: f64,
        shape: NozzleShape,
    ) -> ComponentResult<bool> {
        let key = validated_key(rel_length, area_ratio, shape)?;
        if key == self.key {
            return Ok(false);
        }
        self.key = key;
        self.regenerate();
        Ok(true)
    }

    pub fn set_area_ratio(&mut self, area_ratio: f64) -> ComponentResult<bool> {
        self.update(self.key.rel_length, area_ratio, self.key.shape)
    }

    pub fn shape(&self) -> NozzleShape {
        self.key.shape
    }

    pub fn rel_length(&self) -> f64 {
        self.key.rel_length
    }

    pub fn area_ratio(&self) -> f64 {
        self.key.area_ratio
    }

    /// Exit half-angle [rad].
    pub fn exit_angle(&self) -> f64 {
        self.exit_angle
    }

    /// Inflection angle [rad]; equals the exit angle for conical nozzles.
    pub fn inflection_angle(&self) -> f64 {
        self.inflection_angle
    }

    pub fn points(&self) -> &[[f64; 2]] {
        &self.points
    }

    /// Incremented on every regeneration.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Axial length from throat to exit, in throat radii.
    pub fn length_ratio(&self) -> f64 {
        self.points.last().map_or(0.0, |p| p[0])
    }

    pub fn divergence_efficiency(&self) -> f64 {
        divergence_efficiency(self.exit_angle)
    }

    /// Normalized axial position (0 at the inflection point, 1 at the exit)
    /// where the contour reaches `area_ratio`.
    pub fn frac_length_at_area(&self, area_ratio: f64) -> f64 {
        let r = area_ratio.max(0.0).sqrt();
        let n = self.points[self.inflection_index];
        let e = self.points[self.points.len() - 1];
        if r <= n[1] {
            return 0.0;
        }
        if r >= e[1] || e[0] <= n[0] {
            return 1.0;
        }

        for w in self.points[self.inflection_index..].windows(2) {
            if w[1][1] >= r {
                let f = lerp_factor(r, w[0][1], w[1][1]);
                let x = w[0][0] + (w[1][0] - w[0][0]) * f;
                return ((x - n[0]) / (e[0] - n[0])).clamp(0.0, 1.0);
            }
        }
        1.0
    }

    /// Velocity efficiency from turbulent skin friction on the diverging wall.
    ///
    /// Integrates the axial shear force with the trapezoidal rule over every
    /// contour point at or downstream of the throat, using local isentropic
    /// conditions and the turbulent flat-plate friction coefficient:
    ///
    /// ```text
    /// Cf = 0.074 · Re^-0.2
    /// η  = (v - F/ṁ) / v
    /// ```
    ///
    /// A wall station whose Mach number cannot be solved fails the whole
    /// integral.
    pub fn friction_efficiency(&self, inputs: &FrictionInputs) -> ComponentResult<f64> {
        let FrictionInputs {
            exhaust_velocity,
            mass_flow,
            throat_radius,
            ..
        } = *inputs;
        if !(exhaust_velocity > 0.0 && mass_flow > 0.0 && throat_radius > 0.0) {
            return Ok(1.0);
        }

        let mut wall_length = 0.0;
        let mut force = 0.0;
        let mut previous: Option<(f64, f64)> = None;

        for (i, p) in self.points.iter().enumerate() {
            if i > 0 {
                let q = self.points[i - 1];
                wall_length += (p[0] - q[0]).hypot(p[1] - q[1]);
            }
            if p[0] < 0.0 {
                continue;
            }
            let shear = shear_per_axial_length(inputs, p[1], wall_length * throat_radius)?;
            if let Some((x_prev, shear_prev)) = previous {
                force += 0.5 * (shear + shear_prev) * (p[0] - x_prev) * throat_radius;
            }
            previous = Some((p[0], shear));
        }

        let dv = force / mass_flow;
        Ok(((exhaust_velocity - dv) / exhaust_velocity).clamp(0.0, 1.0))
    }

    fn regenerate(&mut self) {
        let ContourKey {
            rel_length,
            area_ratio,
            shape,
        } = self.key;

        let (exit, inflection) = match shape {
            NozzleShape::Conical => {
                let a = conical_exit_angle(rel_length);
                (a, a)
            }
            NozzleShape::Bell => {
                let a = self.curves.angles(rel_length, area_ratio);
                (a.exit, a.inflection)
            }
        };

        let mut points = Vec::with_capacity(CONVERGING_POINTS + DIVERGING_POINTS + EXPANSION_POINTS);

        let rc = CONVERGING_ARC_RADIUS;
        for i in 0..CONVERGING_POINTS {
            let frac = 1.0 - i as f64 / (CONVERGING_POINTS - 1) as f64;
            let theta = -CONVERGING_HALF_ANGLE * frac;
            points.push([rc * theta.sin(), 1.0 + rc - rc * theta.cos()]);
        }

        let rd = DIVERGING_ARC_RADIUS;
        for i in 1..=DIVERGING_POINTS {
            let theta = inflection * i as f64 / DIVERGING_POINTS as f64;
            points.push([rd * theta.sin(), 1.0 + rd - rd * theta.cos()]);
        }
        let inflection_index = points.len() - 1;
        let n = points[inflection_index];
        let exit_radius = area_ratio.sqrt();

        match shape {
            NozzleShape::Bell => {
                let e = [
                    rel_length * (exit_radius - 1.0) / REFERENCE_CONE_HALF_ANGLE.tan(),
                    exit_radius,
                ];
                let q = control_point(n, inflection, e, exit);
                for i in 1..=EXPANSION_POINTS {
                    let t = i as f64 / EXPANSION_POINTS as f64;
                    let (a, b, c) = ((1.0 - t) * (1.0 - t), 2.0 * t * (1.0 - t), t * t);
                    points.push([
                        a * n[0] + b * q[0] + c * e[0],
                        a * n[1] + b * q[1] + c * e[1],
                    ]);
                }
            }
            NozzleShape::Conical => {
                let run = ((exit_radius - n[1]) / exit.tan()).max(0.0);
                for i in 1..=EXPANSION_POINTS {
                    let t = i as f64 / EXPANSION_POINTS as f64;
                    points.push([n[0] + run * t, n[1] + (exit_radius - n[1]).max(0.0) * t]);
                }
            }
        }

        self.exit_angle = exit;
        self.inflection_angle = inflection;
        self.points = points;
        self.inflection_index = inflection_index;
        self.generation += 1;

        tracing::debug!(
            ?shape,
            rel_length,
            area_ratio,
            exit_deg = exit.to_degrees(),
            inflection_deg = inflection.to_degrees(),
            generation = self.generation,
            "nozzle contour regenerated"
        );
    }
}

fn validated_key(rel_length: f64, area_ratio: f64, shape: NozzleShape) -> ComponentResult<ContourKey> {
    if !(rel_length.is_finite() && rel_length > 0.0) {
        return Err(ComponentError::InvalidArg {
            what: "nozzle relative length must be positive",
        });
    }
    if !(area_ratio.is_finite() && area_ratio > 1.0) {
        return Err(ComponentError::InvalidArg {
            what: "nozzle area ratio must exceed 1",
        });
    }
    Ok(ContourKey {
        rel_length,
        area_ratio,
        shape,
    })
}

/// Intersection of the wall tangents at the inflection point and the exit.
/// Falls back to the midpoint when the tangents are parallel or cross
/// outside the segment.
fn control_point(n: [f64; 2], inflection: f64, e: [f64; 2], exit: f64) -> [f64; 2] {
    let midpoint = [0.5 * (n[0] + e[0]), 0.5 * (n[1] + e[1])];
    let (s1, s2) = (inflection.tan(), exit.tan());
    if (s1 - s2).abs() < 1e-9 {
        return midpoint;
    }
    let b1 = n[1] - s1 * n[0];
    let b2 = e[1] - s2 * e[0];
    let x = (b2 - b1) / (s1 - s2);
    if !(x > n[0] && x < e[0]) {
        tracing::debug!(x, nx = n[0], ex = e[0], "bell control point outside contour, using midpoint");
        return midpoint;
    }
    [x, s1 * x + b1]
}

/// Turbulent flat-plate skin-friction coefficient.
pub fn skin_friction_coefficient(reynolds: f64) -> f64 {
    0.074 * reynolds.powf(-0.2)
}

/// Axial shear force per unit axial length [N/m] at a wall station.
fn shear_per_axial_length(
    inputs: &FrictionInputs,
    radius_ratio: f64,
    wall_length: f64,
) -> ComponentResult<f64> {
    let gamma = inputs.gamma;
    let mw = inputs.molar_mass;
    let area_ratio = (radius_ratio * radius_ratio).max(1.0);
    let mach = mach_from_area_ratio(area_ratio, gamma)?;

    let t = inputs.chamber_temperature / stagnation_temperature_ratio(mach, gamma);
    let p = inputs.chamber_pressure * (t / inputs.chamber_temperature).powf(gamma / (gamma - 1.0));
    let rho = p * mw / (R_UNIVERSAL * t);
    let v = mach * speed_of_sound(gamma, mw, t);
    let mu = VISCOSITY_COEFF * mw.sqrt() * t.powf(0.6);

    let re = rho * v * wall_length / mu;
    if !(re > 0.0 && re.is_finite()) {
        return Ok(0.0);
    }
    let tau = skin_friction_coefficient(re) * 0.5 * rho * v * v;
    Ok(tau * 2.0 * PI * radius_ratio * inputs.throat_radius)
}
