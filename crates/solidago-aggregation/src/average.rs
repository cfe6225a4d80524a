//! Voting-right weighted mean. Not resilient: one user can move it
//! arbitrarily far.

use solidago_core::errors::AggregationError;
use solidago_core::model::{CriterionScores, DirectScoring, VotingRights};
use solidago_core::Score;

use crate::{entity_samples, Aggregation};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Average;

impl Aggregation for Average {
    fn aggregate(
        &self,
        criterion: &str,
        scores: &CriterionScores,
        voting_rights: &VotingRights,
    ) -> Result<DirectScoring, AggregationError> {
        let mut global = DirectScoring::new();
        for (entity, sample) in entity_samples(criterion, scores, voting_rights) {
            let total = sample.total_voting_rights();
            let (mut value, mut left, mut right) = (0.0, 0.0, 0.0);
            for (v, w, l, r) in sample.iter() {
                value += w * v;
                left += w * l;
                right += w * r;
            }
            global.set(&entity, criterion, Score::new(value / total, left / total, right / total));
        }
        Ok(global)
    }

    fn name(&self) -> &'static str {
        "average"
    }
}
