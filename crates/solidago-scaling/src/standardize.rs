//! Multiplicative normalization of the spread of all user scores.

use solidago_core::config::ScalingConfig;
use solidago_core::errors::config_error::{check_open_unit, check_positive};
use solidago_core::errors::{ConfigError, ScalingError};
use solidago_core::model::CriterionScores;
use solidago_core::{Scale, Score};
use solidago_primitives::qr_standard_deviation;

use crate::{user_balanced_sample, Scales, Scaling, ScalingContext};

/// Divides every score by a Lipschitz-resilient standard deviation: the
/// `dev_quantile` of absolute deviations from the QR median.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Standardize {
    dev_quantile: f64,
    lipschitz: f64,
    error: f64,
}

impl Standardize {
    pub fn new(dev_quantile: f64, lipschitz: f64, error: f64) -> Result<Self, ConfigError> {
        check_open_unit("scaling.dev_quantile", dev_quantile)?;
        check_positive("scaling.lipschitz", lipschitz)?;
        check_positive("scaling.error", error)?;
        Ok(Self {
            dev_quantile,
            lipschitz,
            error,
        })
    }

    pub fn from_config(config: &ScalingConfig) -> Result<Self, ConfigError> {
        Self::new(
            config.effective_dev_quantile(),
            config.effective_lipschitz(),
            config.effective_error(),
        )
    }
}

impl Scaling for Standardize {
    fn scale(
        &self,
        scores: &CriterionScores,
        context: &ScalingContext<'_>,
    ) -> Result<Scales, ScalingError> {
        let sample = user_balanced_sample(scores, context);
        let std_dev = qr_standard_deviation(
            self.lipschitz,
            self.dev_quantile,
            &sample,
            1.0,
            self.error,
            None,
        )
        .map_err(|source| ScalingError::Solver {
            step: self.name(),
            criterion: context.criterion.to_string(),
            source,
        })?;
        if std_dev <= 0.0 {
            return Ok(Scales::new());
        }
        let scale = Scale::multiplication(Score::exact(1.0 / std_dev));
        Ok(scores.keys().map(|user| (user.clone(), scale)).collect())
    }

    fn name(&self) -> &'static str {
        "standardize"
    }
}
