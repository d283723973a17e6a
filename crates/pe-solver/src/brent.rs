//! Brent's method with inverse quadratic interpolation, secant steps and a
//! bisection fallback.

use crate::error::{SolverError, SolverResult};
use std::convert::Infallible;

/// Smallest positive subnormal double. Guards the inverse quadratic branch;
/// the comparison is intentionally against this value and not machine epsilon.
const IQI_GUARD: f64 = 4.940_656_458_412_465_4e-324;

/// Brent solver configuration.
#[derive(Clone, Copy, Debug)]
pub struct BrentConfig {
    /// Absolute tolerance on the bracket width
    pub tolerance: f64,
    /// Maximum iterations
    pub max_iterations: usize,
}

impl Default for BrentConfig {
    fn default() -> Self {
        Self {
            tolerance: 1e-3,
            max_iterations: 1000,
        }
    }
}

impl BrentConfig {
    pub fn with_tolerance(tolerance: f64) -> Self {
        Self {
            tolerance,
            ..Self::default()
        }
    }
}

/// How the iteration ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RootOutcome {
    /// Bracket shrank below tolerance or an exact zero was hit
    Converged,
    /// Iteration cap reached; `root` is the best estimate so far
    MaxIterations,
}

/// Brent iteration result.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RootSolution {
    /// Root estimate
    pub root: f64,
    /// Function value at `root`
    pub residual: f64,
    /// Number of iterations
    pub iterations: usize,
    pub outcome: RootOutcome,
}

impl RootSolution {
    pub fn converged(&self) -> bool {
        self.outcome == RootOutcome::Converged
    }
}

/// Find a root of `func` on `[a, b]`.
///
/// `f(a)` and `f(b)` must have opposite signs, otherwise
/// [`SolverError::NotBracketed`] is returned.
pub fn brent<F>(mut func: F, a: f64, b: f64, config: &BrentConfig) -> SolverResult<RootSolution>
where
    F: FnMut(f64) -> f64,
{
    solve(|x| Ok::<f64, Infallible>(func(x)), a, b, config).map_err(|e| match e {
        BrentFailure::Solver(s) => s,
        BrentFailure::Function(never) => match never {},
    })
}

/// Same as [`brent`], threading an auxiliary argument into the function
/// instead of capturing it.
pub fn brent_with_args<A, F>(
    mut func: F,
    args: &A,
    a: f64,
    b: f64,
    config: &BrentConfig,
) -> SolverResult<RootSolution>
where
    A: ?Sized,
    F: FnMut(f64, &A) -> f64,
{
    brent(|x| func(x, args), a, b, config)
}

/// Legacy contract: the root, or `0.0` when the bracket is invalid.
pub fn root_or_sentinel(result: SolverResult<RootSolution>) -> f64 {
    match result {
        Ok(solution) => solution.root,
        Err(_) => 0.0,
    }
}

/// Internal failure type for the fallible variant.
#[derive(Debug)]
enum BrentFailure<E> {
    Solver(SolverError),
    Function(E),
}

impl<E> From<SolverError> for BrentFailure<E> {
    fn from(e: SolverError) -> Self {
        BrentFailure::Solver(e)
    }
}

/// Brent's method for a fallible function.
///
/// The first error raised by `func` aborts the iteration and is returned
/// unchanged; bracket failures are converted into `E`.
pub fn try_brent<F, E>(func: F, a: f64, b: f64, config: &BrentConfig) -> Result<RootSolution, E>
where
    F: FnMut(f64) -> Result<f64, E>,
    E: From<SolverError>,
{
    solve(func, a, b, config).map_err(|e| match e {
        BrentFailure::Solver(s) => E::from(s),
        BrentFailure::Function(f) => f,
    })
}

fn solve<F, E>(
    mut func: F,
    mut a: f64,
    mut b: f64,
    config: &BrentConfig,
) -> Result<RootSolution, BrentFailure<E>>
where
    F: FnMut(f64) -> Result<f64, E>,
{
    if config.tolerance.is_nan() || config.tolerance <= 0.0 {
        return Err(SolverError::InvalidConfig {
            what: "tolerance must be positive",
        }
        .into());
    }

    let delta = config.tolerance * 100.0;
    let mut eval = |x: f64| -> Result<f64, BrentFailure<E>> {
        let fx = func(x).map_err(BrentFailure::Function)?;
        if fx.is_nan() {
            return Err(SolverError::NonFinite { x }.into());
        }
        Ok(fx)
    };

    let mut fa = eval(a)?;
    let mut fb = eval(b)?;

    // Exact hit on an endpoint
    if fa == 0.0 {
        return Ok(exact(a));
    }
    if fb == 0.0 {
        return Ok(exact(b));
    }

    if fa * fb >= 0.0 {
        tracing::debug!(a, b, fa, fb, "brent: root not bracketed");
        return Err(SolverError::NotBracketed {
            lower: a,
            upper: b,
            f_lower: fa,
            f_upper: fb,
        }
        .into());
    }

    if fa.abs() < fb.abs() {
        std::mem::swap(&mut a, &mut b);
        std::mem::swap(&mut fa, &mut fb);
    }

    let mut c = a;
    let mut fc = fa;
    let mut d = a;

    let mut s = b;
    let mut fs = fb;

    let mut bisected = true;
    let mut iter = 0;

    while fs != 0.0 && (a - b).abs() > config.tolerance && iter < config.max_iterations {
        if (fa - fc) > IQI_GUARD && (fb - fc) > IQI_GUARD {
            // Inverse quadratic interpolation
            s = a * fc * fb / ((fa - fb) * (fa - fc));
            s += b * fc * fa / ((fb - fa) * (fb - fc));
            s += c * fc * fb / ((fc - fa) * (fc - fb));
        } else {
            // Secant
            s = b - fb * (b - a) / (fb - fa);
        }

        let b_s = (b - s).abs();
        let b_c = (b - c).abs();
        let c_d = (c - d).abs();

        let quarter = (3.0 * a + b) * 0.25;
        let outside_bracket = if quarter > b {
            !(s < quarter && s > b)
        } else {
            !(s > quarter && s < b)
        };
        let slow_after_bisection = bisected && b_s >= b_c * 0.5;
        let slow_after_interpolation = !bisected && b_s >= c_d * 0.5;
        let tight_after_bisection = bisected && b_c <= delta;
        let tight_after_interpolation = !bisected && c_d <= delta;

        if outside_bracket
            || slow_after_bisection
            || slow_after_interpolation
            || tight_after_bisection
            || tight_after_interpolation
        {
            s = (a + b) * 0.5;
            bisected = true;
        } else {
            bisected = false;
        }

        fs = eval(s)?;
        d = c;
        c = b;
        fc = fb;

        if fa * fs < 0.0 {
            b = s;
            fb = fs;
        } else {
            a = s;
            fa = fs;
        }

        if fa.abs() < fb.abs() {
            std::mem::swap(&mut a, &mut b);
            std::mem::swap(&mut fa, &mut fb);
        }
        iter += 1;
    }

    let outcome = if fs == 0.0 || (a - b).abs() <= config.tolerance {
        RootOutcome::Converged
    } else {
        tracing::debug!(iter, root = s, residual = fs, "brent: iteration cap reached");
        RootOutcome::MaxIterations
    };

    Ok(RootSolution {
        root: s,
        residual: fs,
        iterations: iter,
        outcome,
    })
}

fn exact(x: f64) -> RootSolution {
    RootSolution {
        root: x,
        residual: 0.0,
        iterations: 0,
        outcome: RootOutcome::Converged,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_quadratic() {
        // Solve x^2 - 4 = 0 on [0, 3]
        let config = BrentConfig {
            tolerance: 1e-8,
            max_iterations: 100,
        };
        let result = brent(|x| x * x - 4.0, 0.0, 3.0, &config).unwrap();

        assert!(result.converged());
        assert!((result.root - 2.0).abs() < 1e-8);
        assert!(result.iterations <= config.max_iterations);
    }

    #[test]
    fn same_sign_bracket_is_reported() {
        let err = brent(|x| x * x + 1.0, 0.0, 3.0, &BrentConfig::default()).unwrap_err();
        assert!(matches!(err, SolverError::NotBracketed { .. }));
    }

    #[test]
    fn sentinel_for_unbracketed_root() {
        let result = brent(|x| x * x + 1.0, 0.0, 3.0, &BrentConfig::default());
        assert_eq!(root_or_sentinel(result), 0.0);
    }

    #[test]
    fn endpoint_root_is_returned_directly() {
        let result = brent(|x| x - 1.0, 1.0, 5.0, &BrentConfig::default()).unwrap();
        assert_eq!(result.root, 1.0);
        assert_eq!(result.iterations, 0);
    }

    #[test]
    fn auxiliary_arguments_are_threaded() {
        let args = [3.0_f64, 27.0];
        let result = brent_with_args(
            |x, p: &[f64; 2]| x.powf(p[0]) - p[1],
            &args,
            0.0,
            10.0,
            &BrentConfig::with_tolerance(1e-9),
        )
        .unwrap();
        assert!((result.root - 3.0).abs() < 1e-8);
    }

    #[test]
    fn iteration_cap_returns_best_estimate() {
        let config = BrentConfig {
            tolerance: 1e-12,
            max_iterations: 2,
        };
        let result = brent(|x| x * x - 4.0, 0.0, 3.0, &config).unwrap();
        assert_eq!(result.outcome, RootOutcome::MaxIterations);
        assert!(result.root > 0.0 && result.root < 3.0);
    }

    #[test]
    fn fallible_function_error_propagates() {
        #[derive(Debug, PartialEq)]
        enum Probe {
            Solver,
            Failed(f64),
        }
        impl From<SolverError> for Probe {
            fn from(_: SolverError) -> Self {
                Probe::Solver
            }
        }

        let result = try_brent(
            |x| {
                if x > 1.0 && x < 2.0 {
                    Err(Probe::Failed(x))
                } else {
                    Ok(x - 1.5)
                }
            },
            0.0,
            3.0,
            &BrentConfig::default(),
        );
        assert!(matches!(result, Err(Probe::Failed(_))));

        let unbracketed: Result<RootSolution, Probe> =
            try_brent(|x| Ok(x + 10.0), 0.0, 3.0, &BrentConfig::default());
        assert_eq!(unbracketed.unwrap_err(), Probe::Solver);
    }
}
