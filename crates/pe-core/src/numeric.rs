use crate::PeError;

pub fn ensure_finite(v: f64, what: &'static str) -> Result<f64, PeError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(PeError::NonFinite { what, value: v })
    }
}

/// Position of `x` between `x0` and `x1` as a fraction.
///
/// Returns 0 when the two abscissae coincide, so an exact hit on a
/// tabulated value never divides by zero.
pub fn lerp_factor(x: f64, x0: f64, x1: f64) -> f64 {
    let span = x1 - x0;
    if span == 0.0 { 0.0 } else { (x - x0) / span }
}

/// Linear blend `y0 + (y1 - y0) * factor`.
pub fn lerp(y0: f64, y1: f64, factor: f64) -> f64 {
    (y1 - y0) * factor + y0
}
