//! Mehestan: Lipschitz-resilient collaborative scaling.
//!
//! Users rate different subsets of entities on their own scales. Mehestan
//! picks the most active trusted users as scalers, scales them against one
//! another, then scales everyone else against the scaled scalers. Each
//! scalee gets a multiplier, from ratios of score differences, then a
//! translation, from score differences on shared entities. Both are
//! QR medians over scalers weighted by trust, so no single scaler can move
//! a scalee's scale by more than a Lipschitz bound.

mod activity;
mod diffs;
mod ratios;

use std::collections::BTreeMap;

use solidago_core::config::ScalingConfig;
use solidago_core::constants;
use solidago_core::errors::config_error::check_positive;
use solidago_core::errors::{ConfigError, NumericError, ScalingError};
use solidago_core::model::CriterionScores;
use solidago_core::{Scale, Score};
use solidago_primitives::{qr_median, qr_uncertainty, QrSample};
use tracing::{debug, info, instrument, warn};

pub use activity::{activities, select_scalers};
pub use ratios::model_norm;

use crate::{Scales, Scaling, ScalingContext};

const DEFAULT_MULTIPLIER_DEV: f64 = 0.8;
const DEFAULT_TRANSLATION_DEV: f64 = 1.0;
const DEFAULT_PAIR_DEV: f64 = 1.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Mehestan {
    lipschitz: f64,
    user_comparison_lipschitz: f64,
    min_scaler_activity: f64,
    n_scalers_max: usize,
    p_norm: f64,
    n_entity_to_fully_compare_max: usize,
    n_diffs_sample_max: usize,
    error: f64,
}

impl Default for Mehestan {
    fn default() -> Self {
        Self {
            lipschitz: constants::DEFAULT_SCALING_LIPSCHITZ,
            user_comparison_lipschitz: constants::DEFAULT_USER_COMPARISON_LIPSCHITZ,
            min_scaler_activity: constants::DEFAULT_MIN_SCALER_ACTIVITY,
            n_scalers_max: constants::DEFAULT_N_SCALERS_MAX,
            p_norm: constants::DEFAULT_P_NORM,
            n_entity_to_fully_compare_max: constants::DEFAULT_N_ENTITY_TO_FULLY_COMPARE_MAX,
            n_diffs_sample_max: constants::DEFAULT_N_DIFFS_SAMPLE_MAX,
            error: constants::DEFAULT_SCALING_ERROR,
        }
    }
}

impl Mehestan {
    pub fn from_config(config: &ScalingConfig) -> Result<Self, ConfigError> {
        let mehestan = Self {
            lipschitz: config.effective_lipschitz(),
            user_comparison_lipschitz: config.effective_user_comparison_lipschitz(),
            min_scaler_activity: config.effective_min_scaler_activity(),
            n_scalers_max: config.effective_n_scalers_max(),
            p_norm: config.effective_p_norm(),
            n_entity_to_fully_compare_max: config.effective_n_entity_to_fully_compare_max(),
            n_diffs_sample_max: config.effective_n_diffs_sample_max(),
            error: config.effective_error(),
        };
        mehestan.validate()?;
        Ok(mehestan)
    }

    pub fn with_lipschitz(mut self, lipschitz: f64) -> Result<Self, ConfigError> {
        self.lipschitz = lipschitz;
        self.validate()?;
        Ok(self)
    }

    pub fn with_min_scaler_activity(mut self, min_scaler_activity: f64) -> Self {
        self.min_scaler_activity = min_scaler_activity;
        self
    }

    fn validate(&self) -> Result<(), ConfigError> {
        check_positive("scaling.lipschitz", self.lipschitz)?;
        check_positive(
            "scaling.user_comparison_lipschitz",
            self.user_comparison_lipschitz,
        )?;
        check_positive("scaling.p_norm_for_multiplicative_resilience", self.p_norm)?;
        check_positive("scaling.error", self.error)?;
        if self.n_diffs_sample_max == 0 {
            return Err(ConfigError::invalid(
                "scaling.n_diffs_sample_max",
                "must be greater than 0",
            ));
        }
        Ok(())
    }

    /// QR median of one scalee-scaler list, with a symmetric uncertainty.
    fn aggregate_pair(&self, observations: &[(Score, f64)]) -> Result<Score, NumericError> {
        let sample: QrSample = observations.iter().copied().collect();
        let value = qr_median(self.user_comparison_lipschitz, &sample, 0.0, self.error)?;
        let uncertainty = qr_uncertainty(
            self.user_comparison_lipschitz,
            &sample,
            DEFAULT_PAIR_DEV,
            self.error,
            Some(value),
        )?;
        Ok(Score::symmetric(value, uncertainty))
    }

    /// QR median over scalers, each weighted by its trust.
    fn aggregate_scalers(
        &self,
        per_scaler: &[(Score, f64)],
        lipschitz: f64,
        default_value: f64,
        default_dev: f64,
    ) -> Result<Score, NumericError> {
        let sample: QrSample = per_scaler.iter().copied().collect();
        let value = qr_median(lipschitz, &sample, default_value, self.error)?;
        let uncertainty = qr_uncertainty(lipschitz, &sample, default_dev, self.error, Some(value))?;
        Ok(Score::symmetric(value, uncertainty))
    }

    /// Scales each scalee against `scaler_scores`. When the scalees are the
    /// scalers themselves, translations are estimated against the
    /// multiplied scalee scores.
    fn scale_to_scalers(
        &self,
        scaler_scores: &CriterionScores,
        scalee_scores: &CriterionScores,
        scalees_are_scalers: bool,
        context: &ScalingContext<'_>,
    ) -> Result<(Scales, CriterionScores), NumericError> {
        let mut multipliers = BTreeMap::new();
        let mut multiplied = CriterionScores::new();
        for (scalee, scores) in scalee_scores {
            let multiplier = self.multiplier(scalee, scores, scaler_scores, context)?;
            multiplied.insert(
                scalee.clone(),
                scores
                    .iter()
                    .map(|(entity, score)| (entity.clone(), multiplier * *score))
                    .collect(),
            );
            multipliers.insert(scalee.as_str(), multiplier);
        }
        let references = if scalees_are_scalers {
            &multiplied
        } else {
            scaler_scores
        };

        let mut scales = Scales::new();
        let mut scaled = CriterionScores::new();
        for (scalee, scores) in &multiplied {
            let Some(translation) = self.translation(scalee, scores, references, context)? else {
                continue;
            };
            scaled.insert(
                scalee.clone(),
                scores
                    .iter()
                    .map(|(entity, score)| (entity.clone(), *score + translation))
                    .collect(),
            );
            let multiplier = multipliers
                .get(scalee.as_str())
                .copied()
                .unwrap_or(Score::exact(1.0));
            scales.insert(scalee.clone(), Scale::new(multiplier, translation));
        }
        Ok((scales, scaled))
    }
}

impl Scaling for Mehestan {
    #[instrument(skip_all, fields(criterion = context.criterion, n_users = scores.len()))]
    fn scale(
        &self,
        scores: &CriterionScores,
        context: &ScalingContext<'_>,
    ) -> Result<Scales, ScalingError> {
        let activities = activities(scores, context);
        let scalers = select_scalers(&activities, self.min_scaler_activity, self.n_scalers_max);
        if scalers.is_empty() {
            warn!(criterion = context.criterion, "no user qualifies as a scaler, scaling skipped");
            return Ok(Scales::new());
        }
        info!(n_scalers = scalers.len(), "scalers selected");

        let to_error = |source: NumericError| ScalingError::Solver {
            step: "mehestan",
            criterion: context.criterion.to_string(),
            source,
        };
        let (scaler_scores, nonscaler_scores): (CriterionScores, CriterionScores) = scores
            .iter()
            .map(|(user, entity_scores)| (user.clone(), entity_scores.clone()))
            .partition(|(user, _)| scalers.contains(user));

        let (mut scales, scaled_scalers) = self
            .scale_to_scalers(&scaler_scores, &scaler_scores, true, context)
            .map_err(to_error)?;
        debug!(n_scaled = scales.len(), "scalers scaled");

        let (nonscaler_scales, _) = self
            .scale_to_scalers(&scaled_scalers, &nonscaler_scores, false, context)
            .map_err(to_error)?;
        debug!(n_scaled = nonscaler_scales.len(), "non-scalers scaled");
        scales.extend(nonscaler_scales);
        Ok(scales)
    }

    fn name(&self) -> &'static str {
        "mehestan"
    }
}
