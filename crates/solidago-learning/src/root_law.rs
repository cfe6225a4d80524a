//! Root laws of generalized Bradley-Terry models.
//!
//! A root law is a symmetric distribution on `[-1, 1]`. Tilting it by the
//! score difference `Δ` gives the law of the normalized comparison, and its
//! cumulant generating function `Φ` is the log-partition of that family:
//! the negative log-likelihood of a comparison `r` is `Φ(Δ) - rΔ`.

pub trait RootLaw: Send + Sync {
    /// Cumulant generating function `Φ`. Even and convex, with `Φ(0) = 0`.
    fn cumulant(&self, x: f64) -> f64;

    /// `Φ'`. Odd and strictly increasing, with values in `(-1, 1)`.
    fn cumulant_derivative(&self, x: f64) -> f64;
}

/// Uniform root law on `[-1, 1]`: `Φ(x) = ln(sinh(x) / x)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UniformRootLaw;

impl RootLaw for UniformRootLaw {
    fn cumulant(&self, x: f64) -> f64 {
        let x = x.abs();
        if x < 0.1 {
            let x2 = x * x;
            x2 / 6.0 - x2 * x2 / 180.0
        } else if x < 20.0 {
            (x.sinh() / x).ln()
        } else {
            // sinh overflows long before the asymptote stops being exact.
            x - std::f64::consts::LN_2 - x.ln()
        }
    }

    fn cumulant_derivative(&self, x: f64) -> f64 {
        if x.abs() < 1e-2 {
            x / 3.0 - x * x * x / 45.0
        } else {
            1.0 / x.tanh() - 1.0 / x
        }
    }
}
