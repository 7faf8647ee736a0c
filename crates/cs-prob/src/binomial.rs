//! Binomial proportion intervals.
//!
//! The exact two-sided interval for `k` successes out of `n` trials comes
//! from Beta quantiles:
//!
//! - lower = BetaInv(alpha/2; k, n-k+1)
//! - upper = BetaInv(1-alpha/2; k+1, n-k)
//!
//! Counts may be non-integer effective counts from weighted samples; with
//! unit weights this is the textbook Clopper–Pearson interval.

use cs_core::{Error, Interval, Result};
use statrs::distribution::{Beta, ContinuousCDF};

fn beta_quantile(p: f64, a: f64, b: f64) -> Result<f64> {
    let dist = Beta::new(a, b)
        .map_err(|e| Error::Computation(format!("Beta({}, {}) construction failed: {}", a, b, e)))?;
    Ok(dist.inverse_cdf(p))
}

/// Exact two-sided binomial interval for `successes` out of `trials`.
///
/// `confidence` is the coverage probability (e.g. 0.6827 for ~1σ). Zero
/// trials yield the degenerate estimate: `NaN` value with the full `[0, 1]`
/// interval. Bounds always satisfy `lower <= successes/trials <= upper`.
pub fn clopper_pearson(successes: f64, trials: f64, confidence: f64) -> Result<Interval> {
    if !confidence.is_finite() || confidence <= 0.0 || confidence >= 1.0 {
        return Err(Error::Validation(format!(
            "confidence must be in (0,1), got {}",
            confidence
        )));
    }
    if !successes.is_finite() || successes < 0.0 {
        return Err(Error::Validation(format!(
            "successes must be finite and >= 0, got {}",
            successes
        )));
    }
    if !trials.is_finite() || trials < 0.0 {
        return Err(Error::Validation(format!("trials must be finite and >= 0, got {}", trials)));
    }
    if successes > trials {
        return Err(Error::Validation(format!(
            "successes must be <= trials, got successes={} trials={}",
            successes, trials
        )));
    }

    if trials == 0.0 {
        return Ok(Interval::new(f64::NAN, 0.0, 1.0));
    }

    let alpha = 1.0 - confidence;
    let value = successes / trials;

    let lower = if successes == 0.0 {
        0.0
    } else {
        beta_quantile(alpha / 2.0, successes, trials - successes + 1.0)?
    };
    let upper = if successes == trials {
        1.0
    } else {
        beta_quantile(1.0 - alpha / 2.0, successes + 1.0, trials - successes)?
    };

    Ok(Interval::new(value, lower, upper))
}
