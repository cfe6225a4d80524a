//! Post-processing configuration.

use serde::{Deserialize, Serialize};

use crate::constants;
use crate::errors::config_error::check_positive;
use crate::errors::ConfigError;

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct PostProcessConfig {
    /// Bound of the squashed scores. Default: 100.0.
    pub score_max: Option<f64>,
    /// Whether to squash at all. Default: true.
    pub squash: Option<bool>,
}

impl PostProcessConfig {
    pub fn effective_score_max(&self) -> f64 {
        self.score_max.unwrap_or(constants::DEFAULT_SCORE_MAX)
    }

    pub fn effective_squash(&self) -> bool {
        self.squash.unwrap_or(true)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let score_max = self.effective_score_max();
        check_positive("post_process.score_max", score_max)?;
        if score_max.is_infinite() {
            return Err(ConfigError::invalid(
                "post_process.score_max",
                "must be finite",
            ));
        }
        Ok(())
    }

    pub(crate) fn merge(&mut self, other: &PostProcessConfig) {
        merge_fields!(self, other, score_max, squash);
    }
}
