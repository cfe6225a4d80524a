//! Translation estimation from score differences on common entities.

use std::collections::BTreeMap;

use solidago_core::errors::NumericError;
use solidago_core::Score;

use super::ratios::common_entities;
use super::Mehestan;
use crate::ScalingContext;

impl Mehestan {
    /// Differences `s_v(e) - s_u(e)` between `scaler` v and `scalee` u,
    /// weighted by the scaler's privacy penalty on `e`.
    pub(super) fn pair_diffs(
        &self,
        scalee: &str,
        scalee_scores: &BTreeMap<String, Score>,
        scaler: &str,
        scaler_scores: &BTreeMap<String, Score>,
        context: &ScalingContext<'_>,
    ) -> Vec<(Score, f64)> {
        if scalee == scaler {
            return vec![(Score::exact(0.0), 1.0)];
        }
        common_entities(scalee_scores, scaler_scores)
            .into_iter()
            .map(|entity| {
                (
                    scaler_scores[entity] - scalee_scores[entity],
                    context.penalty(scaler, entity),
                )
            })
            .collect()
    }

    /// Translation of `scalee`, whose scores are already multiplied.
    pub(super) fn translation(
        &self,
        scalee: &str,
        scalee_scores: &BTreeMap<String, Score>,
        scaler_scores: &BTreeMap<String, BTreeMap<String, Score>>,
        context: &ScalingContext<'_>,
    ) -> Result<Option<Score>, NumericError> {
        let mut per_scaler = Vec::new();
        for (scaler, scores) in scaler_scores {
            let diffs = self.pair_diffs(scalee, scalee_scores, scaler, scores, context);
            if diffs.is_empty() {
                continue;
            }
            per_scaler.push((self.aggregate_pair(&diffs)?, context.trust(scaler)));
        }
        if per_scaler.is_empty() {
            return Ok(None);
        }
        self.aggregate_scalers(
            &per_scaler,
            self.lipschitz / 8.0,
            0.0,
            super::DEFAULT_TRANSLATION_DEV,
        )
        .map(Some)
    }
}
