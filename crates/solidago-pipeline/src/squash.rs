//! Post-process: bounds every score to `(-score_max, score_max)`.

use std::collections::BTreeMap;

use solidago_core::config::PostProcessConfig;
use solidago_core::errors::config_error::check_positive;
use solidago_core::errors::ConfigError;
use solidago_core::model::{DirectScoring, ScoringModel, UserModels};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Squash {
    score_max: f64,
}

impl Squash {
    pub fn new(score_max: f64) -> Result<Self, ConfigError> {
        check_positive("post_process.score_max", score_max)?;
        if score_max.is_infinite() {
            return Err(ConfigError::invalid("post_process.score_max", "must be finite"));
        }
        Ok(Self { score_max })
    }

    /// `None` when squashing is disabled.
    pub fn from_config(config: &PostProcessConfig) -> Result<Option<Self>, ConfigError> {
        if !config.effective_squash() {
            return Ok(None);
        }
        Self::new(config.effective_score_max()).map(Some)
    }

    pub fn score_max(&self) -> f64 {
        self.score_max
    }

    /// Squashed evaluation of every user model.
    pub fn user_scores(&self, models: UserModels) -> BTreeMap<String, DirectScoring> {
        models.squashed(self.score_max).evaluate()
    }

    pub fn global_scores(&self, scores: &DirectScoring) -> DirectScoring {
        ScoringModel::from(scores.clone())
            .squashed(self.score_max)
            .evaluate()
    }
}
