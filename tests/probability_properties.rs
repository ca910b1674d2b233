use elo_season::error::DomainError;
use elo_season::win_prob::{gaussian_sigma, inverse_erf, win_probability};
use proptest::prelude::*;
use statrs::distribution::{ContinuousCDF, Normal};
use statrs::function::erf::erf;

proptest! {
    #[test]
    fn win_probability_is_symmetric(gap in -3000i32..3000) {
        let total = win_probability(gap) + win_probability(-gap);
        prop_assert!((total - 1.0).abs() < 1e-12, "p({}) + p(-{}) = {}", gap, gap, total);
    }

    #[test]
    fn win_probability_is_monotonic(gap in -3000i32..3000) {
        prop_assert!(win_probability(gap + 1) > win_probability(gap));
    }

    #[test]
    fn inverse_erf_is_odd(x in -0.999f64..0.999) {
        let pos = inverse_erf(x).unwrap();
        let neg = inverse_erf(-x).unwrap();
        prop_assert_eq!(neg, -pos);
    }

    #[test]
    fn inverse_erf_tracks_erf(y in -2.0f64..2.0) {
        let x = inverse_erf(erf(y)).unwrap();
        prop_assert!((x - y).abs() < 1e-2, "inverse_erf(erf({})) = {}", y, x);
    }

    #[test]
    fn inverse_erf_rejects_outside_domain(x in 1.0001f64..100.0) {
        prop_assert_eq!(inverse_erf(x), Err(DomainError::InverseErf(x)));
        prop_assert_eq!(inverse_erf(-x), Err(DomainError::InverseErf(-x)));
    }

    #[test]
    fn sigma_reproduces_win_probability(gap in 1i32..1500, sign in prop::bool::ANY) {
        let gap = if sign { gap } else { -gap };
        let prob = win_probability(gap);
        let mean = f64::from(gap) / 25.0;
        let sigma = gaussian_sigma(mean, prob).unwrap();
        prop_assert!(sigma > 0.0);

        let normal = Normal::new(mean, sigma).unwrap();
        let mass_above_zero = 1.0 - normal.cdf(0.0);
        prop_assert!((mass_above_zero - prob).abs() < 1e-3, "P(X > 0) = {}, p = {}", mass_above_zero, prob);
    }
}
