//! Translation anchoring a quantile of all user scores.

use solidago_core::config::ScalingConfig;
use solidago_core::errors::config_error::{check_open_unit, check_positive};
use solidago_core::errors::{ConfigError, ScalingError};
use solidago_core::model::CriterionScores;
use solidago_core::{Scale, Score};
use solidago_primitives::qr_quantile;

use crate::{user_balanced_sample, Scales, Scaling, ScalingContext};

/// Shifts every user by the same amount so that the `quantile` of all
/// scores lands on `target`. Each user weighs the same in the quantile,
/// however many entities they scored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuantileShift {
    quantile: f64,
    target: f64,
    lipschitz: f64,
    error: f64,
}

impl QuantileShift {
    pub fn new(quantile: f64, target: f64, lipschitz: f64, error: f64) -> Result<Self, ConfigError> {
        check_open_unit("scaling.quantile_shift", quantile)?;
        if !target.is_finite() {
            return Err(ConfigError::invalid(
                "scaling.quantile_shift_target",
                format!("must be finite, got {target}"),
            ));
        }
        check_positive("scaling.lipschitz", lipschitz)?;
        check_positive("scaling.error", error)?;
        Ok(Self {
            quantile,
            target,
            lipschitz,
            error,
        })
    }

    pub fn from_config(config: &ScalingConfig) -> Result<Self, ConfigError> {
        Self::new(
            config.effective_quantile_shift(),
            config.effective_quantile_shift_target(),
            config.effective_lipschitz(),
            config.effective_error(),
        )
    }
}

impl Scaling for QuantileShift {
    fn scale(
        &self,
        scores: &CriterionScores,
        context: &ScalingContext<'_>,
    ) -> Result<Scales, ScalingError> {
        let sample = user_balanced_sample(scores, context);
        let quantile = qr_quantile(self.lipschitz, self.quantile, &sample, 0.0, self.error)
            .map_err(|source| ScalingError::Solver {
                step: self.name(),
                criterion: context.criterion.to_string(),
                source,
            })?;
        let scale = Scale::translation(Score::exact(self.target - quantile));
        Ok(scores.keys().map(|user| (user.clone(), scale)).collect())
    }

    fn name(&self) -> &'static str {
        "quantile_shift"
    }
}
