//! Scaler selection.

use std::collections::BTreeMap;

use solidago_core::model::CriterionScores;

use crate::ScalingContext;

/// Trust-weighted count of the entities a user scored clearly away from 0.
/// Private scores count for `privacy_penalty`.
pub fn activities(scores: &CriterionScores, context: &ScalingContext<'_>) -> BTreeMap<String, f64> {
    scores
        .iter()
        .map(|(user, entity_scores)| {
            let trust = context.trust(user);
            let activity = if trust <= 0.0 {
                0.0
            } else {
                trust
                    * entity_scores
                        .iter()
                        .filter(|(_, score)| !score.is_nan() && !score.contains_zero())
                        .map(|(entity, _)| context.penalty(user, entity))
                        .sum::<f64>()
            };
            (user.clone(), activity)
        })
        .collect()
}

/// The `n_scalers_max` most active users with activity at least
/// `min_activity`, by decreasing activity then by name.
pub fn select_scalers(
    activities: &BTreeMap<String, f64>,
    min_activity: f64,
    n_scalers_max: usize,
) -> Vec<String> {
    let mut candidates: Vec<(&String, f64)> = activities
        .iter()
        .filter(|(_, &activity)| activity >= min_activity)
        .map(|(user, &activity)| (user, activity))
        .collect();
    candidates.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    candidates
        .into_iter()
        .take(n_scalers_max)
        .map(|(user, _)| user.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalers_are_capped_and_ordered() {
        let activities: BTreeMap<String, f64> = [("a", 12.0), ("b", 30.0), ("c", 12.0), ("d", 3.0)]
            .into_iter()
            .map(|(u, a)| (u.to_string(), a))
            .collect();
        assert_eq!(select_scalers(&activities, 10.0, 2), vec!["b", "a"]);
        assert_eq!(select_scalers(&activities, 10.0, 10), vec!["b", "a", "c"]);
        assert!(select_scalers(&activities, 50.0, 10).is_empty());
    }
}
