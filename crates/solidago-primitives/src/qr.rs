//! Quadratically regularized (QR) statistics.
//!
//! `qr_quantile` returns the minimizer of
//!
//! ```text
//! (m - default)^2 / (2 L) + Σ_i w_i (sqrt(u_i^2 + (m - x_i)^2) + (1 - 2q) m)
//! ```
//!
//! where `u_i` is the left uncertainty of `x_i` when `x_i > m` and its right
//! uncertainty otherwise. The objective is strictly convex, so the minimizer
//! is the unique root of its derivative, found with Brent's method.
//!
//! Resilience: the derivative has slope at least `1/L` and any single
//! contributor moves it by at most `2 w_i`, so replacing one contributor
//! moves the result by at most `2 L w_i`. As `L -> ∞` the regularization
//! vanishes and, with zero uncertainties, the result tends to the exact
//! weighted `q`-quantile. `L = ∞` is accepted.

use solidago_core::errors::NumericError;

use crate::brent::brent_root_expanding;
use crate::sample::QrSample;

fn validate(lipschitz: f64, error: f64, operation: &'static str) -> Result<(), NumericError> {
    if lipschitz.is_nan() || lipschitz <= 0.0 {
        return Err(NumericError::InvalidInput {
            operation,
            message: format!("lipschitz must be > 0, got {lipschitz}"),
        });
    }
    if error.is_nan() || error <= 0.0 {
        return Err(NumericError::InvalidInput {
            operation,
            message: format!("error must be > 0, got {error}"),
        });
    }
    Ok(())
}

fn validate_sample(sample: &QrSample, operation: &'static str) -> Result<(), NumericError> {
    for (value, voting_right, left, right) in sample.iter() {
        if !value.is_finite() || !voting_right.is_finite() || voting_right < 0.0 {
            return Err(NumericError::InvalidInput {
                operation,
                message: format!("invalid observation {value} with voting right {voting_right}"),
            });
        }
        if left.is_nan() || right.is_nan() || left < 0.0 || right < 0.0 {
            return Err(NumericError::InvalidInput {
                operation,
                message: format!("invalid uncertainties ({left}, {right}) for {value}"),
            });
        }
    }
    Ok(())
}

/// Lipschitz-resilient `quantile` of `sample`, pulled toward `default_value`.
///
/// Returns `default_value` when the sample carries no voting right.
pub fn qr_quantile(
    lipschitz: f64,
    quantile: f64,
    sample: &QrSample,
    default_value: f64,
    error: f64,
) -> Result<f64, NumericError> {
    validate(lipschitz, error, "qr_quantile")?;
    if quantile.is_nan() || quantile <= 0.0 || quantile >= 1.0 {
        return Err(NumericError::InvalidInput {
            operation: "qr_quantile",
            message: format!("quantile must be in (0, 1), got {quantile}"),
        });
    }
    validate_sample(sample, "qr_quantile")?;

    let total_voting_rights = sample.total_voting_rights();
    if sample.is_empty() || total_voting_rights <= 0.0 {
        return Ok(default_value);
    }

    let regularization = if lipschitz.is_infinite() {
        0.0
    } else {
        1.0 / lipschitz
    };
    let bias = (1.0 - 2.0 * quantile) * total_voting_rights;

    let derivative = |m: f64| {
        let mut slope = regularization * (m - default_value) + bias;
        for (value, voting_right, left_unc, right_unc) in sample.iter() {
            let delta = m - value;
            if delta == 0.0 {
                continue;
            }
            let uncertainty = if delta < 0.0 { left_unc } else { right_unc };
            slope += voting_right * delta / (uncertainty * uncertainty + delta * delta).sqrt();
        }
        slope
    };

    brent_root_expanding(derivative, default_value - 1.0, default_value + 1.0, error)
}

/// [`qr_quantile`] at `q = 0.5`.
pub fn qr_median(
    lipschitz: f64,
    sample: &QrSample,
    default_value: f64,
    error: f64,
) -> Result<f64, NumericError> {
    qr_quantile(lipschitz, 0.5, sample, default_value, error)
}

/// Lipschitz-resilient `quantile_dev`-quantile of the absolute deviations
/// from the QR median, pulled toward `default_dev`.
///
/// `median` skips the median computation when already known. Uncertainties
/// follow each observation: for values above the median the deviation
/// inherits (left, right); below it, the pair is swapped. The uncertainty
/// toward zero is capped by the deviation itself.
pub fn qr_standard_deviation(
    lipschitz: f64,
    quantile_dev: f64,
    sample: &QrSample,
    default_dev: f64,
    error: f64,
    median: Option<f64>,
) -> Result<f64, NumericError> {
    let median = match median {
        Some(median) => median,
        None => qr_median(lipschitz, sample, 0.0, error)?,
    };

    let mut deviations = QrSample::with_capacity(sample.len());
    for (value, voting_right, left_unc, right_unc) in sample.iter() {
        let delta = value - median;
        let deviation = delta.abs();
        let (left, right) = if delta > 0.0 {
            (left_unc.min(deviation), right_unc)
        } else if delta < 0.0 {
            (right_unc.min(deviation), left_unc)
        } else {
            (0.0, left_unc.max(right_unc))
        };
        deviations.push(deviation, voting_right, left, right);
    }

    let deviation = qr_quantile(lipschitz, quantile_dev, &deviations, default_dev, error)?;
    Ok(deviation.max(0.0))
}

/// Uncertainty of the QR median, bounded through `lipschitz`.
///
/// Each contributor adds `min(L, s (s + (x - median)^2)^(-3/2))`, where `s`
/// is the square of its average uncertainty. The result is
/// `(default_dev^-2 + 2 default_dev^-3 Σ w_i term_i)^(-1/2)`: it equals
/// `default_dev` without data, shrinks as precise contributors agree on
/// the median, and grows with their uncertainties.
pub fn qr_uncertainty(
    lipschitz: f64,
    sample: &QrSample,
    default_dev: f64,
    error: f64,
    median: Option<f64>,
) -> Result<f64, NumericError> {
    validate(lipschitz, error, "qr_uncertainty")?;
    if default_dev.is_nan() || default_dev <= 0.0 || default_dev.is_infinite() {
        return Err(NumericError::InvalidInput {
            operation: "qr_uncertainty",
            message: format!("default_dev must be finite and > 0, got {default_dev}"),
        });
    }
    if sample.is_empty() {
        return Ok(default_dev);
    }
    let median = match median {
        Some(median) => median,
        None => qr_median(lipschitz, sample, 0.0, error)?,
    };

    let mut weighted_terms = 0.0;
    for (value, voting_right, left_unc, right_unc) in sample.iter() {
        let s = ((left_unc + right_unc) / 2.0).powi(2);
        let squared_gap = (value - median).powi(2);
        let term = if s + squared_gap == 0.0 {
            lipschitz
        } else {
            (s * (s + squared_gap).powf(-1.5)).min(lipschitz)
        };
        weighted_terms += voting_right * term;
    }

    Ok((default_dev.powi(-2) + 2.0 * default_dev.powi(-3) * weighted_terms).powf(-0.5))
}
