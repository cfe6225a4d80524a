//! Scores with asymmetric uncertainties.
//!
//! A [`Score`] is a value together with a left and a right uncertainty,
//! describing the interval `[value - left_unc, value + right_unc]`.
//! `NaN` marks an absent score and propagates through every operation.

use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Score {
    pub value: f64,
    pub left_unc: f64,
    pub right_unc: f64,
}

impl Score {
    pub const fn new(value: f64, left_unc: f64, right_unc: f64) -> Self {
        Self {
            value,
            left_unc,
            right_unc,
        }
    }

    /// A score without uncertainty.
    pub const fn exact(value: f64) -> Self {
        Self::new(value, 0.0, 0.0)
    }

    pub const fn symmetric(value: f64, uncertainty: f64) -> Self {
        Self::new(value, uncertainty, uncertainty)
    }

    /// The absent score.
    pub const fn nan() -> Self {
        Self::new(f64::NAN, f64::NAN, f64::NAN)
    }

    pub fn is_nan(&self) -> bool {
        self.value.is_nan() || self.left_unc.is_nan() || self.right_unc.is_nan()
    }

    /// Lower end of the uncertainty interval.
    pub fn min(&self) -> f64 {
        self.value - self.left_unc
    }

    /// Upper end of the uncertainty interval.
    pub fn max(&self) -> f64 {
        self.value + self.right_unc
    }

    pub fn contains_zero(&self) -> bool {
        self.min() <= 0.0 && self.max() >= 0.0
    }

    /// Average of the two uncertainties.
    pub fn average_uncertainty(&self) -> f64 {
        (self.left_unc + self.right_unc) / 2.0
    }

    pub fn abs(&self) -> Self {
        if self.is_nan() {
            return Self::nan();
        }
        if self.min() >= 0.0 {
            return *self;
        }
        if self.max() <= 0.0 {
            return -*self;
        }
        let value = self.value.abs();
        let upper = self.max().max(-self.min());
        Self::new(value, value, upper - value)
    }

    /// Builds the score whose interval is the hull of `candidates`, centered on `value`.
    fn from_extremes(value: f64, candidates: [f64; 4]) -> Self {
        let lower = candidates.iter().copied().fold(f64::INFINITY, f64::min);
        let upper = candidates.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        Self::new(value, (value - lower).max(0.0), (upper - value).max(0.0))
    }

    /// Multiplicative inverse. Uncertainties are infinite when the interval contains zero.
    pub fn inverse(&self) -> Self {
        let value = 1.0 / self.value;
        if self.contains_zero() {
            return Self::new(value, f64::INFINITY, f64::INFINITY);
        }
        let left = (value - 1.0 / self.max()).max(0.0);
        let right = (1.0 / self.min() - value).max(0.0);
        Self::new(value, left, right)
    }
}

impl Default for Score {
    fn default() -> Self {
        Self::nan()
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [-{}, +{}]",
            self.value, self.left_unc, self.right_unc
        )
    }
}

impl Neg for Score {
    type Output = Score;

    fn neg(self) -> Score {
        Score::new(-self.value, self.right_unc, self.left_unc)
    }
}

impl Add for Score {
    type Output = Score;

    fn add(self, other: Score) -> Score {
        Score::new(
            self.value + other.value,
            self.left_unc + other.left_unc,
            self.right_unc + other.right_unc,
        )
    }
}

impl Sub for Score {
    type Output = Score;

    fn sub(self, other: Score) -> Score {
        self + (-other)
    }
}

impl Mul for Score {
    type Output = Score;

    fn mul(self, other: Score) -> Score {
        if self.is_nan() || other.is_nan() {
            return Score::nan();
        }
        let extremes = [
            self.min() * other.min(),
            self.min() * other.max(),
            self.max() * other.min(),
            self.max() * other.max(),
        ];
        Score::from_extremes(self.value * other.value, extremes)
    }
}

impl Mul<f64> for Score {
    type Output = Score;

    fn mul(self, factor: f64) -> Score {
        self * Score::exact(factor)
    }
}

impl Div for Score {
    type Output = Score;

    fn div(self, other: Score) -> Score {
        self * other.inverse()
    }
}

impl Add<f64> for Score {
    type Output = Score;

    fn add(self, shift: f64) -> Score {
        Score::new(self.value + shift, self.left_unc, self.right_unc)
    }
}

/// Bounded monotone squash `score_max * x / sqrt(1 + x^2)`.
///
/// `hypot` keeps the denominator finite for any finite `x`; infinities map
/// to the bounds.
pub fn squash(x: f64, score_max: f64) -> f64 {
    if x.is_infinite() {
        return score_max.copysign(x);
    }
    score_max * (x / 1f64.hypot(x)).clamp(-1.0, 1.0)
}

impl Score {
    /// Squashes the value and maps the uncertainty interval through the
    /// same function, so the result stays within `(-score_max, score_max)`.
    pub fn squashed(&self, score_max: f64) -> Score {
        if self.is_nan() {
            return Score::nan();
        }
        let value = squash(self.value, score_max);
        let low = squash(self.min(), score_max);
        let high = squash(self.max(), score_max);
        Score::new(
            value,
            (value - low.min(high)).max(0.0),
            (low.max(high) - value).max(0.0),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-12, "{a} != {b}");
    }

    #[test]
    fn negation_swaps_uncertainties() {
        let s = -Score::new(1.0, 0.2, 0.5);
        assert_eq!(s, Score::new(-1.0, 0.5, 0.2));
    }

    #[test]
    fn product_uses_interval_extremes() {
        let s = Score::new(2.0, 1.0, 1.0) * Score::new(3.0, 1.0, 2.0);
        assert_close(s.value, 6.0);
        assert_close(s.min(), 2.0);
        assert_close(s.max(), 15.0);
    }

    #[test]
    fn product_with_negative_factor_flips_interval() {
        let s = Score::new(1.0, 0.1, 0.3) * -2.0;
        assert_close(s.value, -2.0);
        assert_close(s.left_unc, 0.6);
        assert_close(s.right_unc, 0.2);
    }

    #[test]
    fn nan_propagates() {
        let s = Score::nan() + Score::exact(1.0);
        assert!(s.is_nan());
        assert!((Score::exact(1.0) * Score::nan()).is_nan());
    }

    #[test]
    fn abs_of_interval_straddling_zero() {
        let s = Score::new(-0.5, 1.0, 2.0).abs();
        assert_close(s.value, 0.5);
        assert_close(s.min(), 0.0);
        assert_close(s.max(), 1.5);
    }

    #[test]
    fn division_by_positive_interval() {
        let s = Score::exact(1.0) / Score::new(2.0, 1.0, 2.0);
        assert_close(s.value, 0.5);
        assert_close(s.min(), 0.25);
        assert_close(s.max(), 1.0);
    }

    #[test]
    fn squashed_score_is_bounded() {
        let s = Score::new(1e5, 1.0, 1.0).squashed(100.0);
        assert!(s.value < 100.0);
        assert!(s.max() <= 100.0);
        assert!(s.left_unc >= 0.0 && s.right_unc >= 0.0);
    }

    #[test]
    fn squash_of_zero_is_zero() {
        let s = Score::new(0.0, 1.0, 1.0).squashed(100.0);
        assert_close(s.value, 0.0);
        assert_close(s.left_unc, 100.0 / 2f64.sqrt());
        assert_close(s.right_unc, 100.0 / 2f64.sqrt());
    }

    #[test]
    fn squash_saturates_instead_of_overflowing() {
        assert_eq!(squash(1e200, 100.0), 100.0);
        assert_eq!(squash(-1e200, 100.0), -100.0);
        assert_eq!(squash(f64::INFINITY, 100.0), 100.0);
        assert_eq!(squash(f64::NEG_INFINITY, 100.0), -100.0);
        assert!(squash(10.0, 100.0) < squash(1e200, 100.0));
        assert!(squash(f64::NAN, 100.0).is_nan());

        let s = Score::new(1e300, 1e300, f64::INFINITY).squashed(100.0);
        assert_eq!(s.value, 100.0);
        assert!(s.min() >= 0.0 && s.max() <= 100.0);
    }
}
