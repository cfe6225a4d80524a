//! Per-user scoring models and scales.

use std::collections::BTreeMap;

use super::scoring_model::{DirectScoring, ScoringModel};
use crate::types::{Scale, Score};

/// Scores on one criterion, keyed by user then entity.
pub type CriterionScores = BTreeMap<String, BTreeMap<String, Score>>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserModels {
    models: BTreeMap<String, ScoringModel>,
}

impl UserModels {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, user: &str, model: ScoringModel) {
        self.models.insert(user.to_string(), model);
    }

    pub fn get(&self, user: &str) -> Option<&ScoringModel> {
        self.models.get(user)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ScoringModel)> {
        self.models.iter().map(|(user, model)| (user.as_str(), model))
    }

    pub fn users(&self) -> impl Iterator<Item = &str> {
        self.models.keys().map(String::as_str)
    }

    /// Evaluated scores of every user on `criterion`. Users without any
    /// score there are skipped.
    pub fn criterion_scores(&self, criterion: &str) -> CriterionScores {
        self.models
            .iter()
            .filter_map(|(user, model)| {
                let scores = model.criterion_scores(criterion);
                (!scores.is_empty()).then(|| (user.clone(), scores))
            })
            .collect()
    }

    /// Wraps every model with its user's scales.
    pub fn scaled(self, scales: &UserScales) -> UserModels {
        let models = self
            .models
            .into_iter()
            .map(|(user, model)| {
                let user_scales = scales.for_user(&user);
                (user, model.scaled(user_scales))
            })
            .collect();
        UserModels { models }
    }

    pub fn squashed(self, score_max: f64) -> UserModels {
        let models = self
            .models
            .into_iter()
            .map(|(user, model)| (user, model.squashed(score_max)))
            .collect();
        UserModels { models }
    }

    /// Materializes every model into direct scores.
    pub fn evaluate(&self) -> BTreeMap<String, DirectScoring> {
        self.models
            .iter()
            .map(|(user, model)| (user.clone(), model.evaluate()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

impl From<BTreeMap<String, DirectScoring>> for UserModels {
    fn from(direct: BTreeMap<String, DirectScoring>) -> Self {
        UserModels {
            models: direct
                .into_iter()
                .map(|(user, scores)| (user, ScoringModel::Direct(scores)))
                .collect(),
        }
    }
}

/// Scales keyed by `(user, criterion)`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserScales {
    entries: BTreeMap<(String, String), Scale>,
}

impl UserScales {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, user: &str, criterion: &str, scale: Scale) {
        self.entries
            .insert((user.to_string(), criterion.to_string()), scale);
    }

    /// Scale of `user` on `criterion`, identity when absent.
    pub fn get(&self, user: &str, criterion: &str) -> Scale {
        self.entries
            .get(&(user.to_string(), criterion.to_string()))
            .copied()
            .unwrap_or_default()
    }

    /// Scales of `user` keyed by criterion.
    pub fn for_user(&self, user: &str) -> BTreeMap<String, Scale> {
        let start = (user.to_string(), String::new());
        self.entries
            .range(start..)
            .take_while(|(key, _)| key.0 == user)
            .map(|(key, scale)| (key.1.clone(), *scale))
            .collect()
    }

    /// Yields `(user, criterion, scale)`.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, Scale)> {
        self.entries
            .iter()
            .map(|((user, criterion), scale)| (user.as_str(), criterion.as_str(), *scale))
    }

    pub fn extend(&mut self, other: UserScales) {
        self.entries.extend(other.entries);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
