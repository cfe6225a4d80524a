//! Scoring models as compositions over direct scores.
//!
//! A [`ScoringModel`] is either a table of direct scores or a transformer
//! wrapping a base model. Evaluation applies the innermost model first,
//! then the scales, then the squash.

use std::collections::{BTreeMap, BTreeSet};

use crate::types::{Scale, Score};

/// Direct scores keyed by `(criterion, entity)`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DirectScoring {
    scores: BTreeMap<(String, String), Score>,
}

impl DirectScoring {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, entity: &str, criterion: &str, score: Score) {
        self.scores
            .insert((criterion.to_string(), entity.to_string()), score);
    }

    pub fn get(&self, entity: &str, criterion: &str) -> Option<Score> {
        self.scores
            .get(&(criterion.to_string(), entity.to_string()))
            .copied()
            .filter(|s| !s.is_nan())
    }

    /// Yields `(entity, criterion, score)`.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, Score)> {
        self.scores
            .iter()
            .map(|((criterion, entity), score)| (entity.as_str(), criterion.as_str(), *score))
    }

    /// Scores on `criterion`, keyed by entity.
    pub fn criterion_scores(&self, criterion: &str) -> BTreeMap<String, Score> {
        let start = (criterion.to_string(), String::new());
        self.scores
            .range(start..)
            .take_while(|(key, _)| key.0 == criterion)
            .filter(|(_, score)| !score.is_nan())
            .map(|(key, score)| (key.1.clone(), *score))
            .collect()
    }

    pub fn criteria(&self) -> BTreeSet<&str> {
        self.scores.keys().map(|k| k.0.as_str()).collect()
    }

    pub fn extend(&mut self, other: DirectScoring) {
        self.scores.extend(other.scores);
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ScoringModel {
    Direct(DirectScoring),
    /// Applies a per-criterion scale on top of `base`. Criteria without a
    /// scale pass through unchanged.
    Scaled {
        base: Box<ScoringModel>,
        scales: BTreeMap<String, Scale>,
    },
    Squashed {
        base: Box<ScoringModel>,
        score_max: f64,
    },
}

impl Default for ScoringModel {
    fn default() -> Self {
        ScoringModel::Direct(DirectScoring::new())
    }
}

impl From<DirectScoring> for ScoringModel {
    fn from(direct: DirectScoring) -> Self {
        ScoringModel::Direct(direct)
    }
}

impl ScoringModel {
    pub fn scaled(self, scales: BTreeMap<String, Scale>) -> Self {
        ScoringModel::Scaled {
            base: Box::new(self),
            scales,
        }
    }

    pub fn squashed(self, score_max: f64) -> Self {
        ScoringModel::Squashed {
            base: Box::new(self),
            score_max,
        }
    }

    pub fn score(&self, entity: &str, criterion: &str) -> Option<Score> {
        match self {
            ScoringModel::Direct(direct) => direct.get(entity, criterion),
            ScoringModel::Scaled { base, scales } => {
                let score = base.score(entity, criterion)?;
                Some(match scales.get(criterion) {
                    Some(scale) => scale.apply(score),
                    None => score,
                })
            }
            ScoringModel::Squashed { base, score_max } => base
                .score(entity, criterion)
                .map(|score| score.squashed(*score_max)),
        }
    }

    /// The direct scores at the bottom of the composition.
    pub fn direct(&self) -> &DirectScoring {
        match self {
            ScoringModel::Direct(direct) => direct,
            ScoringModel::Scaled { base, .. } | ScoringModel::Squashed { base, .. } => {
                base.direct()
            }
        }
    }

    pub fn criteria(&self) -> BTreeSet<&str> {
        self.direct().criteria()
    }

    /// Evaluated scores on `criterion`, keyed by entity.
    pub fn criterion_scores(&self, criterion: &str) -> BTreeMap<String, Score> {
        match self {
            ScoringModel::Direct(direct) => direct.criterion_scores(criterion),
            ScoringModel::Scaled { base, scales } => {
                let scores = base.criterion_scores(criterion);
                match scales.get(criterion) {
                    Some(scale) => scores
                        .into_iter()
                        .map(|(entity, score)| (entity, scale.apply(score)))
                        .collect(),
                    None => scores,
                }
            }
            ScoringModel::Squashed { base, score_max } => base
                .criterion_scores(criterion)
                .into_iter()
                .map(|(entity, score)| (entity, score.squashed(*score_max)))
                .collect(),
        }
    }

    /// Materializes the composition into direct scores.
    pub fn evaluate(&self) -> DirectScoring {
        let mut evaluated = DirectScoring::new();
        for criterion in self.criteria() {
            for (entity, score) in self.criterion_scores(criterion) {
                evaluated.set(&entity, criterion, score);
            }
        }
        evaluated
    }
}
