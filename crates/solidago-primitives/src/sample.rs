//! Weighted observations with asymmetric uncertainties.

use solidago_core::types::Score;

/// Columnar input of the QR primitives: one value, voting right and pair
/// of uncertainties per contributor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QrSample {
    pub values: Vec<f64>,
    pub voting_rights: Vec<f64>,
    pub left_uncertainties: Vec<f64>,
    pub right_uncertainties: Vec<f64>,
}

impl QrSample {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            values: Vec::with_capacity(capacity),
            voting_rights: Vec::with_capacity(capacity),
            left_uncertainties: Vec::with_capacity(capacity),
            right_uncertainties: Vec::with_capacity(capacity),
        }
    }

    /// A sample of exact values, each with voting right 1.
    pub fn exact(values: &[f64]) -> Self {
        let mut sample = Self::with_capacity(values.len());
        for &value in values {
            sample.push(value, 1.0, 0.0, 0.0);
        }
        sample
    }

    pub fn push(&mut self, value: f64, voting_right: f64, left_unc: f64, right_unc: f64) {
        self.values.push(value);
        self.voting_rights.push(voting_right);
        self.left_uncertainties.push(left_unc);
        self.right_uncertainties.push(right_unc);
    }

    pub fn push_score(&mut self, score: Score, voting_right: f64) {
        self.push(score.value, voting_right, score.left_unc, score.right_unc);
    }

    /// Yields `(value, voting_right, left_unc, right_unc)`.
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64, f64, f64)> + '_ {
        (0..self.len()).map(move |i| {
            (
                self.values[i],
                self.voting_rights[i],
                self.left_uncertainties[i],
                self.right_uncertainties[i],
            )
        })
    }

    pub fn total_voting_rights(&self) -> f64 {
        self.voting_rights.iter().sum()
    }

    /// The same sample with every value moved by `shift`.
    pub fn shifted(&self, shift: f64) -> Self {
        Self {
            values: self.values.iter().map(|v| v + shift).collect(),
            ..self.clone()
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FromIterator<(Score, f64)> for QrSample {
    fn from_iter<I: IntoIterator<Item = (Score, f64)>>(iter: I) -> Self {
        let mut sample = QrSample::new();
        for (score, voting_right) in iter {
            sample.push_score(score, voting_right);
        }
        sample
    }
}
