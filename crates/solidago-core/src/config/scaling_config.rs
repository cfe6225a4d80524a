//! Scaling configuration.

use serde::{Deserialize, Serialize};

use crate::constants;
use crate::errors::config_error::{check_in_range, check_non_negative, check_open_unit, check_positive};
use crate::errors::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalingStep {
    Mehestan,
    QuantileShift,
    Standardize,
}

/// Configuration for the cross-user scaling phase.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct ScalingConfig {
    /// Scaling steps, applied in order. Default: mehestan, quantile_shift.
    pub steps: Option<Vec<ScalingStep>>,
    /// Lipschitz resilience of Mehestan. Default: 0.1.
    pub lipschitz: Option<f64>,
    /// Lipschitz resilience of the pairwise user ratio estimate. Default: 10.0.
    pub user_comparison_lipschitz: Option<f64>,
    /// Activity required to become a scaler. Default: 10.0.
    pub min_scaler_activity: Option<f64>,
    /// Maximal number of scalers. Default: 100.
    pub n_scalers_max: Option<usize>,
    /// Exponent of the model norm used for multiplicative resilience. Default: 4.0.
    pub p_norm_for_multiplicative_resilience: Option<f64>,
    /// Above this many common entities, score differences are sampled. Default: 100.
    pub n_entity_to_fully_compare_max: Option<usize>,
    /// Number of sampled score differences. Default: 1000.
    pub n_diffs_sample_max: Option<usize>,
    /// Tolerance of the QR primitives. Default: 1e-5.
    pub error: Option<f64>,
    /// Quantile anchored by the quantile shift. Default: 0.15.
    pub quantile_shift: Option<f64>,
    /// Target of the anchored quantile. Default: 0.0.
    pub quantile_shift_target: Option<f64>,
    /// Quantile of absolute deviations used by standardization. Default: 0.9.
    pub dev_quantile: Option<f64>,
}

impl ScalingConfig {
    pub fn effective_steps(&self) -> Vec<ScalingStep> {
        self.steps
            .clone()
            .unwrap_or_else(|| vec![ScalingStep::Mehestan, ScalingStep::QuantileShift])
    }

    pub fn effective_lipschitz(&self) -> f64 {
        self.lipschitz
            .unwrap_or(constants::DEFAULT_SCALING_LIPSCHITZ)
    }

    pub fn effective_user_comparison_lipschitz(&self) -> f64 {
        self.user_comparison_lipschitz
            .unwrap_or(constants::DEFAULT_USER_COMPARISON_LIPSCHITZ)
    }

    pub fn effective_min_scaler_activity(&self) -> f64 {
        self.min_scaler_activity
            .unwrap_or(constants::DEFAULT_MIN_SCALER_ACTIVITY)
    }

    pub fn effective_n_scalers_max(&self) -> usize {
        self.n_scalers_max
            .unwrap_or(constants::DEFAULT_N_SCALERS_MAX)
    }

    pub fn effective_p_norm(&self) -> f64 {
        self.p_norm_for_multiplicative_resilience
            .unwrap_or(constants::DEFAULT_P_NORM)
    }

    pub fn effective_n_entity_to_fully_compare_max(&self) -> usize {
        self.n_entity_to_fully_compare_max
            .unwrap_or(constants::DEFAULT_N_ENTITY_TO_FULLY_COMPARE_MAX)
    }

    pub fn effective_n_diffs_sample_max(&self) -> usize {
        self.n_diffs_sample_max
            .unwrap_or(constants::DEFAULT_N_DIFFS_SAMPLE_MAX)
    }

    pub fn effective_error(&self) -> f64 {
        self.error.unwrap_or(constants::DEFAULT_SCALING_ERROR)
    }

    pub fn effective_quantile_shift(&self) -> f64 {
        self.quantile_shift
            .unwrap_or(constants::DEFAULT_QUANTILE_SHIFT)
    }

    pub fn effective_quantile_shift_target(&self) -> f64 {
        self.quantile_shift_target
            .unwrap_or(constants::DEFAULT_QUANTILE_SHIFT_TARGET)
    }

    pub fn effective_dev_quantile(&self) -> f64 {
        self.dev_quantile
            .unwrap_or(constants::DEFAULT_DEV_QUANTILE)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_positive("scaling.lipschitz", self.effective_lipschitz())?;
        check_positive(
            "scaling.user_comparison_lipschitz",
            self.effective_user_comparison_lipschitz(),
        )?;
        check_non_negative(
            "scaling.min_scaler_activity",
            self.effective_min_scaler_activity(),
        )?;
        if self.effective_n_scalers_max() == 0 {
            return Err(ConfigError::invalid(
                "scaling.n_scalers_max",
                "must be greater than 0",
            ));
        }
        let p = self.effective_p_norm();
        if !p.is_finite() || p < 1.0 {
            return Err(ConfigError::invalid(
                "scaling.p_norm_for_multiplicative_resilience",
                format!("must be a finite value >= 1, got {p}"),
            ));
        }
        if self.effective_n_diffs_sample_max() == 0 {
            return Err(ConfigError::invalid(
                "scaling.n_diffs_sample_max",
                "must be greater than 0",
            ));
        }
        check_in_range("scaling.error", self.effective_error(), f64::MIN_POSITIVE, 1.0)?;
        check_open_unit("scaling.quantile_shift", self.effective_quantile_shift())?;
        let target = self.effective_quantile_shift_target();
        if !target.is_finite() {
            return Err(ConfigError::invalid(
                "scaling.quantile_shift_target",
                "must be finite",
            ));
        }
        check_open_unit("scaling.dev_quantile", self.effective_dev_quantile())
    }

    pub(crate) fn merge(&mut self, other: &ScalingConfig) {
        if other.steps.is_some() {
            self.steps = other.steps.clone();
        }
        merge_fields!(
            self,
            other,
            lipschitz,
            user_comparison_lipschitz,
            min_scaler_activity,
            n_scalers_max,
            p_norm_for_multiplicative_resilience,
            n_entity_to_fully_compare_max,
            n_diffs_sample_max,
            error,
            quantile_shift,
            quantile_shift_target,
            dev_quantile
        );
    }
}
