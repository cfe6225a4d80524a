//! Voting rights configuration.

use serde::{Deserialize, Serialize};

use crate::constants;
use crate::errors::config_error::{check_in_range, check_non_negative};
use crate::errors::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum VotingRightsMethod {
    #[default]
    AffineOvertrust,
    IsTrust,
}

/// Configuration for the voting rights phase.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct VotingRightsConfig {
    /// Allocation algorithm. Default: affine_overtrust.
    pub method: Option<VotingRightsMethod>,
    /// Weight factor of private judgments. Default: 0.5.
    pub privacy_penalty: Option<f64>,
    /// Overtrust budget granted to every entity. Default: 2.0.
    pub min_overtrust: Option<f64>,
    /// Overtrust budget proportional to the cumulative trust. Default: 0.1.
    pub overtrust_ratio: Option<f64>,
}

impl VotingRightsConfig {
    pub fn effective_method(&self) -> VotingRightsMethod {
        self.method.unwrap_or_default()
    }

    pub fn effective_privacy_penalty(&self) -> f64 {
        self.privacy_penalty
            .unwrap_or(constants::DEFAULT_PRIVACY_PENALTY)
    }

    pub fn effective_min_overtrust(&self) -> f64 {
        self.min_overtrust
            .unwrap_or(constants::DEFAULT_MIN_OVERTRUST)
    }

    pub fn effective_overtrust_ratio(&self) -> f64 {
        self.overtrust_ratio
            .unwrap_or(constants::DEFAULT_OVERTRUST_RATIO)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_in_range(
            "voting_rights.privacy_penalty",
            self.effective_privacy_penalty(),
            0.0,
            1.0,
        )?;
        check_non_negative("voting_rights.min_overtrust", self.effective_min_overtrust())?;
        check_non_negative(
            "voting_rights.overtrust_ratio",
            self.effective_overtrust_ratio(),
        )
    }

    pub(crate) fn merge(&mut self, other: &VotingRightsConfig) {
        merge_fields!(self, other, method, privacy_penalty, min_overtrust, overtrust_ratio);
    }
}
