//! Preference learning configuration.

use serde::{Deserialize, Serialize};

use crate::constants;
use crate::errors::config_error::{check_in_range, check_positive};
use crate::errors::ConfigError;

/// Configuration for the generalized Bradley-Terry preference learning.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct LearningConfig {
    /// Standard deviation of the Gaussian prior on scores. Default: 7.0.
    pub prior_std: Option<f64>,
    /// Loss increase defining the uncertainty interval. Default: 1.0.
    pub uncertainty_nll_increase: Option<f64>,
    /// Cap on uncertainties. Default: 1e3.
    pub max_uncertainty: Option<f64>,
    /// Coordinate descent tolerance. Default: 1e-5.
    pub convergence_error: Option<f64>,
    /// Maximal number of coordinate updates per user. Default: 10000.
    pub max_iterations: Option<usize>,
}

impl LearningConfig {
    pub fn effective_prior_std(&self) -> f64 {
        self.prior_std.unwrap_or(constants::DEFAULT_PRIOR_STD)
    }

    pub fn effective_uncertainty_nll_increase(&self) -> f64 {
        self.uncertainty_nll_increase
            .unwrap_or(constants::DEFAULT_UNCERTAINTY_NLL_INCREASE)
    }

    pub fn effective_max_uncertainty(&self) -> f64 {
        self.max_uncertainty
            .unwrap_or(constants::DEFAULT_MAX_UNCERTAINTY)
    }

    pub fn effective_convergence_error(&self) -> f64 {
        self.convergence_error
            .unwrap_or(constants::DEFAULT_CONVERGENCE_ERROR)
    }

    pub fn effective_max_iterations(&self) -> usize {
        self.max_iterations
            .unwrap_or(constants::DEFAULT_MAX_COORDINATE_UPDATES)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_positive("learning.prior_std", self.effective_prior_std())?;
        check_positive(
            "learning.uncertainty_nll_increase",
            self.effective_uncertainty_nll_increase(),
        )?;
        check_positive("learning.max_uncertainty", self.effective_max_uncertainty())?;
        check_in_range(
            "learning.convergence_error",
            self.effective_convergence_error(),
            f64::MIN_POSITIVE,
            1.0,
        )?;
        if self.effective_max_iterations() == 0 {
            return Err(ConfigError::invalid(
                "learning.max_iterations",
                "must be greater than 0",
            ));
        }
        Ok(())
    }

    pub(crate) fn merge(&mut self, other: &LearningConfig) {
        merge_fields!(
            self,
            other,
            prior_std,
            uncertainty_nll_increase,
            max_uncertainty,
            convergence_error,
            max_iterations
        );
    }
}
