//! Entity-wise Lipschitz-resilient quantile.

use solidago_core::config::AggregationConfig;
use solidago_core::constants;
use solidago_core::errors::config_error::{check_open_unit, check_positive};
use solidago_core::errors::{AggregationError, ConfigError};
use solidago_core::model::{CriterionScores, DirectScoring, VotingRights};
use solidago_core::Score;
use solidago_primitives::{qr_quantile, qr_uncertainty};
use tracing::{debug, instrument};

use crate::{entity_samples, Aggregation};

/// For each entity, the QR `quantile` of user scores weighted by voting
/// rights, with the QR uncertainty on both sides.
///
/// A quantile below the median makes the global score conservative: an
/// entity scores high only if most of its evaluators agree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntitywiseQrQuantile {
    quantile: f64,
    lipschitz: f64,
    error: f64,
}

impl Default for EntitywiseQrQuantile {
    fn default() -> Self {
        Self {
            quantile: constants::DEFAULT_AGGREGATION_QUANTILE,
            lipschitz: constants::DEFAULT_AGGREGATION_LIPSCHITZ,
            error: constants::DEFAULT_AGGREGATION_ERROR,
        }
    }
}

impl EntitywiseQrQuantile {
    pub fn new(quantile: f64, lipschitz: f64, error: f64) -> Result<Self, ConfigError> {
        check_open_unit("aggregation.quantile", quantile)?;
        check_positive("aggregation.lipschitz", lipschitz)?;
        check_positive("aggregation.error", error)?;
        Ok(Self {
            quantile,
            lipschitz,
            error,
        })
    }

    pub fn median(lipschitz: f64, error: f64) -> Result<Self, ConfigError> {
        Self::new(0.5, lipschitz, error)
    }

    pub fn from_config(config: &AggregationConfig) -> Result<Self, ConfigError> {
        Self::new(
            config.effective_quantile(),
            config.effective_lipschitz(),
            config.effective_error(),
        )
    }
}

impl Aggregation for EntitywiseQrQuantile {
    #[instrument(skip(self, scores, voting_rights), fields(n_users = scores.len()))]
    fn aggregate(
        &self,
        criterion: &str,
        scores: &CriterionScores,
        voting_rights: &VotingRights,
    ) -> Result<DirectScoring, AggregationError> {
        let mut global = DirectScoring::new();
        for (entity, sample) in entity_samples(criterion, scores, voting_rights) {
            let to_error = |source| AggregationError::Solver {
                entity: entity.clone(),
                criterion: criterion.to_string(),
                source,
            };
            let value = qr_quantile(self.lipschitz, self.quantile, &sample, 0.0, self.error)
                .map_err(to_error)?;
            let median = (self.quantile == 0.5).then_some(value);
            let uncertainty = qr_uncertainty(self.lipschitz, &sample, 1.0, self.error, median)
                .map_err(to_error)?;
            global.set(&entity, criterion, Score::symmetric(value, uncertainty));
        }
        debug!(n_entities = global.len(), "global scores computed");
        Ok(global)
    }

    fn name(&self) -> &'static str {
        if self.quantile == 0.5 {
            "qr_median"
        } else {
            "qr_quantile"
        }
    }
}
