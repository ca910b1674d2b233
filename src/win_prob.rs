use log::debug;
use rand::distributions::Distribution;
use rand::Rng;
use statrs::distribution::Normal;
use std::f64::consts::{PI, SQRT_2};

use crate::constants::{EVEN_MATCHUP_SIGMA, LOGISTIC_SCALE, MAX_SPREAD_DRAWS};
use crate::error::DomainError;

/// Probability that the side favored by `rating_gap` wins.
///
/// Standard ELO logistic curve: `1 / (1 + 10^(-gap / 400))`.
pub fn win_probability(rating_gap: i32) -> f64 {
    let exponent = -f64::from(rating_gap) / LOGISTIC_SCALE;
    1.0 / (1.0 + 10f64.powf(exponent))
}

/// Approximate inverse error function.
///
/// Uses Winitzki's closed-form approximation, good to about three decimal
/// places. Odd in `x`; returns an infinity at `x = ±1`.
///
/// # Errors
/// `DomainError::InverseErf` if `x` is outside `[-1, 1]` or NaN.
pub fn inverse_erf(x: f64) -> Result<f64, DomainError> {
    if !(-1.0..=1.0).contains(&x) {
        return Err(DomainError::InverseErf(x));
    }
    if x == 0.0 {
        return Ok(0.0);
    }
    if x.abs() == 1.0 {
        return Ok(x * f64::INFINITY);
    }

    let a = 8.0 * (PI - 3.0) / (3.0 * PI * (4.0 - PI));
    let ln = (1.0 - x * x).ln();
    let common = 2.0 / (PI * a) + ln / 2.0;
    let inner = (common * common - ln / a).sqrt() - common;
    Ok(x.signum() * inner.sqrt())
}

/// Standard deviation of a Gaussian with mean `mean_margin` whose mass above
/// zero equals `win_prob`.
///
/// An even matchup (`win_prob == 0.5`) leaves the formula indeterminate and
/// returns the fitted [`EVEN_MATCHUP_SIGMA`].
///
/// # Errors
/// `DomainError::Probability` if `win_prob` is outside `(0, 1)`.
pub fn gaussian_sigma(mean_margin: f64, win_prob: f64) -> Result<f64, DomainError> {
    if !(win_prob > 0.0 && win_prob < 1.0) {
        return Err(DomainError::Probability(win_prob));
    }
    let den = SQRT_2 * inverse_erf(1.0 - 2.0 * win_prob)?;
    if den == 0.0 {
        return Ok(EVEN_MATCHUP_SIGMA);
    }
    Ok(-mean_margin / den)
}

/// Draw a non-zero integer spread from `N(mean, sigma)`.
///
/// Draws that round to zero are rejected and resampled, so the sign of the
/// result always names a winner. A zero `sigma` is deterministic and returns
/// the rounded mean.
///
/// # Errors
/// `DomainError::Sigma` for a negative or non-finite `sigma` (or non-finite
/// mean), `DomainError::DegenerateSpread` if no non-zero value turns up within
/// [`MAX_SPREAD_DRAWS`] draws.
pub fn sample_spread<R: Rng + ?Sized>(mean: f64, sigma: f64, rng: &mut R) -> Result<i32, DomainError> {
    if !mean.is_finite() || !sigma.is_finite() || sigma < 0.0 {
        return Err(DomainError::Sigma { mean, sigma });
    }

    if sigma == 0.0 {
        let spread = mean.round() as i32;
        if spread == 0 {
            return Err(DomainError::DegenerateSpread { mean, sigma, draws: 1 });
        }
        return Ok(spread);
    }

    let normal = Normal::new(mean, sigma).map_err(|_| DomainError::Sigma { mean, sigma })?;
    for draw in 1..=MAX_SPREAD_DRAWS {
        let spread = normal.sample(rng).round() as i32;
        if spread != 0 {
            if draw > 1 {
                debug!("Resampled zero spread {} time(s)", draw - 1);
            }
            return Ok(spread);
        }
    }
    Err(DomainError::DegenerateSpread {
        mean,
        sigma,
        draws: MAX_SPREAD_DRAWS,
    })
}
