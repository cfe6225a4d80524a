//! Affine rescaling of scores.

use serde::{Deserialize, Serialize};

use super::Score;

/// An affine map `score -> multiplier * score + translation`, where both
/// coefficients carry their own uncertainty.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Scale {
    pub multiplier: Score,
    pub translation: Score,
}

impl Scale {
    pub const fn new(multiplier: Score, translation: Score) -> Self {
        Self {
            multiplier,
            translation,
        }
    }

    pub const fn identity() -> Self {
        Self::new(Score::exact(1.0), Score::exact(0.0))
    }

    pub const fn multiplication(multiplier: Score) -> Self {
        Self::new(multiplier, Score::exact(0.0))
    }

    pub const fn translation(translation: Score) -> Self {
        Self::new(Score::exact(1.0), translation)
    }

    pub fn apply(&self, score: Score) -> Score {
        self.multiplier * score + self.translation
    }

    /// Composes `self` followed by `next`: the result applies `self` first.
    pub fn then(&self, next: &Scale) -> Scale {
        Scale::new(
            next.multiplier * self.multiplier,
            next.multiplier * self.translation + next.translation,
        )
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::identity()
    }
}

impl Default for Scale {
    fn default() -> Self {
        Self::identity()
    }
}
