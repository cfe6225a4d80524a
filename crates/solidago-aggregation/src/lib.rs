//! # solidago-aggregation
//!
//! Combines the scaled scores of all users into one global score per
//! `(entity, criterion)`, weighting each user by their voting right.

pub mod average;
pub mod qr_quantile;

use std::collections::BTreeMap;

use solidago_core::config::{AggregationConfig, AggregationMethod};
use solidago_core::errors::{AggregationError, ConfigError};
use solidago_core::model::{CriterionScores, DirectScoring, VotingRights};
use solidago_primitives::QrSample;

pub use average::Average;
pub use qr_quantile::EntitywiseQrQuantile;

// TODO: assessments are counted for voting rights but not yet aggregated
// alongside comparison-based scores.
pub trait Aggregation: Send + Sync {
    /// Global scores on `criterion` from user scores (user -> entity -> score).
    fn aggregate(
        &self,
        criterion: &str,
        scores: &CriterionScores,
        voting_rights: &VotingRights,
    ) -> Result<DirectScoring, AggregationError>;

    fn name(&self) -> &'static str;
}

/// Per entity, the user scores weighted by voting right. Entities nobody
/// holds a voting right on are left out.
pub(crate) fn entity_samples(
    criterion: &str,
    scores: &CriterionScores,
    voting_rights: &VotingRights,
) -> BTreeMap<String, QrSample> {
    let mut samples: BTreeMap<String, QrSample> = BTreeMap::new();
    for (user, entity_scores) in scores {
        for (entity, score) in entity_scores {
            if score.is_nan() {
                continue;
            }
            let voting_right = voting_rights.get(user, entity, criterion);
            samples
                .entry(entity.clone())
                .or_default()
                .push_score(*score, voting_right);
        }
    }
    samples.retain(|_, sample| sample.total_voting_rights() > 0.0);
    samples
}

/// Builds the aggregator selected by `config.method`.
pub fn from_config(config: &AggregationConfig) -> Result<Box<dyn Aggregation>, ConfigError> {
    Ok(match config.effective_method() {
        AggregationMethod::QrQuantile => Box::new(EntitywiseQrQuantile::from_config(config)?),
        AggregationMethod::QrMedian => Box::new(EntitywiseQrQuantile::median(
            config.effective_lipschitz(),
            config.effective_error(),
        )?),
        AggregationMethod::Average => Box::new(Average),
    })
}
