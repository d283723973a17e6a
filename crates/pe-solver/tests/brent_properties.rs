use pe_solver::{BrentConfig, RootOutcome, SolverError, brent, root_or_sentinel};
use proptest::prelude::*;

#[test]
fn cubic_with_offset_root() {
    let config = BrentConfig::with_tolerance(1e-10);
    let solution = brent(|x| (x - 0.7) * (x * x + 1.0), -5.0, 5.0, &config).unwrap();
    assert_eq!(solution.outcome, RootOutcome::Converged);
    assert!((solution.root - 0.7).abs() < 1e-9);
}

#[test]
fn reversed_bracket_is_accepted() {
    let solution = brent(|x| x * x - 4.0, 3.0, 0.0, &BrentConfig::with_tolerance(1e-9)).unwrap();
    assert!((solution.root - 2.0).abs() < 1e-8);
}

#[test]
fn not_bracketed_reports_endpoint_values() {
    match brent(|x| x * x + 1.0, 0.0, 3.0, &BrentConfig::default()) {
        Err(SolverError::NotBracketed {
            lower,
            upper,
            f_lower,
            f_upper,
        }) => {
            assert_eq!(lower, 0.0);
            assert_eq!(upper, 3.0);
            assert_eq!(f_lower, 1.0);
            assert_eq!(f_upper, 10.0);
        }
        other => panic!("expected NotBracketed, got {other:?}"),
    }
}

#[test]
fn sentinel_passes_converged_roots_through() {
    let result = brent(|x| x - 1.25, 0.0, 2.0, &BrentConfig::with_tolerance(1e-9));
    assert!((root_or_sentinel(result) - 1.25).abs() < 1e-8);
}

proptest! {
    #[test]
    fn root_lies_within_tolerance(root in -50.0f64..50.0, scale in 0.1f64..10.0) {
        let config = BrentConfig::with_tolerance(1e-9);
        let solution = brent(|x| scale * (x - root), -100.0, 100.0, &config).unwrap();
        prop_assert!(solution.converged());
        prop_assert!((solution.root - root).abs() <= 1e-8);
    }

    #[test]
    fn monotone_exponential_roots(target in 1.5f64..1000.0) {
        let config = BrentConfig::with_tolerance(1e-10);
        let solution = brent(|x| x.exp() - target, 0.0, 10.0, &config).unwrap();
        prop_assert!((solution.root - target.ln()).abs() <= 1e-8);
    }
}
