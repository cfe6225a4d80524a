//! Multiplier estimation from ratios of score differences.
//!
//! For a scalee `u` and a scaler `v` sharing entities `e` and `f`, the
//! ratio `|(s_v(e) - s_v(f)) / (s_u(e) - s_u(f))|` estimates how much `u`
//! must be stretched to match `v`. Only pairs whose differences are
//! significant for both users, `|Δ| >= 2 (lu + ru)`, are kept.

use std::collections::{BTreeMap, BTreeSet};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use solidago_core::errors::NumericError;
use solidago_core::Score;
use xxhash_rust::xxh3::xxh3_64;

use super::Mehestan;
use crate::ScalingContext;

/// Weighted norm `(Σ w |s|^p / Σ w)^(1/p)` of a user's scores, with
/// privacy penalties as weights. 1 when nothing is weighted.
pub fn model_norm(
    user: &str,
    scores: &BTreeMap<String, Score>,
    p: f64,
    context: &ScalingContext<'_>,
) -> f64 {
    let mut weight_sum = 0.0;
    let mut weighted_sum = 0.0;
    for (entity, score) in scores {
        let weight = context.penalty(user, entity);
        weight_sum += weight;
        weighted_sum += weight * score.value.abs().powf(p);
    }
    if weight_sum == 0.0 {
        return 1.0;
    }
    (weighted_sum / weight_sum).powf(1.0 / p)
}

impl Mehestan {
    /// Entity pairs to compare, all of them or a seeded sample.
    pub(super) fn entity_pairs<'a>(
        &self,
        common: &[&'a str],
        seed_key: &str,
    ) -> Vec<(&'a str, &'a str)> {
        let n = common.len();
        if n <= self.n_entity_to_fully_compare_max {
            let mut pairs = Vec::with_capacity(n * n.saturating_sub(1) / 2);
            for (i, e) in common.iter().enumerate() {
                for f in &common[i + 1..] {
                    pairs.push((*e, *f));
                }
            }
            return pairs;
        }
        let mut rng = StdRng::seed_from_u64(xxh3_64(seed_key.as_bytes()));
        (0..self.n_diffs_sample_max)
            .map(|_| {
                let i = rng.gen_range(0..n);
                let mut j = rng.gen_range(0..n - 1);
                if j >= i {
                    j += 1;
                }
                (common[i], common[j])
            })
            .collect()
    }

    /// Ratios between `scalee` and `scaler` with their weights. Empty when
    /// they share fewer than two entities.
    pub(super) fn pair_ratios(
        &self,
        scalee: &str,
        scalee_scores: &BTreeMap<String, Score>,
        scaler: &str,
        scaler_scores: &BTreeMap<String, Score>,
        context: &ScalingContext<'_>,
    ) -> Vec<(Score, f64)> {
        if scalee == scaler {
            return vec![(Score::exact(1.0), 1.0)];
        }
        let common: Vec<&str> = common_entities(scalee_scores, scaler_scores)
            .into_iter()
            .collect();
        if common.len() < 2 {
            return Vec::new();
        }
        let seed_key = format!("{}/{scalee}/{scaler}", context.criterion);
        let mut ratios = Vec::new();
        for (e, f) in self.entity_pairs(&common, &seed_key) {
            let scalee_diff = scalee_scores[e] - scalee_scores[f];
            let scaler_diff = scaler_scores[e] - scaler_scores[f];
            if !is_significant(&scalee_diff)
                || !is_significant(&scaler_diff)
                || scalee_diff.contains_zero()
            {
                continue;
            }
            let ratio = (scaler_diff / scalee_diff).abs();
            if ratio.is_nan() || !ratio.value.is_finite() || !ratio.max().is_finite() {
                continue;
            }
            ratios.push((ratio, context.penalty(scaler, e) * context.penalty(scaler, f)));
        }
        ratios
    }

    /// Multiplier of `scalee` from its aggregated ratios to each scaler.
    pub(super) fn multiplier(
        &self,
        scalee: &str,
        scalee_scores: &BTreeMap<String, Score>,
        scaler_scores: &BTreeMap<String, BTreeMap<String, Score>>,
        context: &ScalingContext<'_>,
    ) -> Result<Score, NumericError> {
        let mut per_scaler = Vec::new();
        for (scaler, scores) in scaler_scores {
            let ratios = self.pair_ratios(scalee, scalee_scores, scaler, scores, context);
            if ratios.is_empty() {
                continue;
            }
            per_scaler.push((self.aggregate_pair(&ratios)?, context.trust(scaler)));
        }
        let norm = model_norm(scalee, scalee_scores, self.p_norm, context);
        self.aggregate_scalers(
            &per_scaler,
            self.lipschitz / (8.0 * (1e-9 + norm)),
            1.0,
            super::DEFAULT_MULTIPLIER_DEV,
        )
    }
}

/// A difference clearly away from 0 relative to its uncertainty.
fn is_significant(diff: &Score) -> bool {
    diff.value.abs() >= 2.0 * (diff.left_unc + diff.right_unc)
}

pub(super) fn common_entities<'a>(
    a: &'a BTreeMap<String, Score>,
    b: &BTreeMap<String, Score>,
) -> BTreeSet<&'a str> {
    a.iter()
        .filter(|(entity, score)| !score.is_nan() && b.get(*entity).is_some_and(|s| !s.is_nan()))
        .map(|(entity, _)| entity.as_str())
        .collect()
}
