//! Affine overtrust voting rights.
//!
//! For an entity evaluated by users with trust `t_u` and privacy penalty
//! `p_u`, the cumulative trust is `C = Σ p_u t_u`. Users below a common
//! floor `m` are lifted to it, which grants the overtrust
//!
//! ```text
//! overtrust(m) = Σ_{t_u < m} p_u (m - t_u)
//! ```
//!
//! The floor is the largest `m <= 1` with `overtrust(m) <= min_overtrust +
//! overtrust_ratio * C`. Each voting right is then `p_u * max(t_u, m)`.
//! `overtrust` is piecewise linear and non-decreasing in `m`, so the floor
//! is found exactly by walking the users sorted by trust.

use solidago_core::config::VotingRightsConfig;
use solidago_core::constants;
use solidago_core::errors::config_error::{check_in_range, check_non_negative};
use solidago_core::errors::ConfigError;
use solidago_core::model::{MadePublic, Users, VotingStatistic};
use tracing::{debug, instrument};

use crate::{Evaluators, VotingRightsAssignment, VotingRightsOutcome};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffineOvertrust {
    privacy_penalty: f64,
    min_overtrust: f64,
    overtrust_ratio: f64,
}

impl Default for AffineOvertrust {
    fn default() -> Self {
        Self {
            privacy_penalty: constants::DEFAULT_PRIVACY_PENALTY,
            min_overtrust: constants::DEFAULT_MIN_OVERTRUST,
            overtrust_ratio: constants::DEFAULT_OVERTRUST_RATIO,
        }
    }
}

impl AffineOvertrust {
    pub fn new(
        privacy_penalty: f64,
        min_overtrust: f64,
        overtrust_ratio: f64,
    ) -> Result<Self, ConfigError> {
        check_in_range("voting_rights.privacy_penalty", privacy_penalty, 0.0, 1.0)?;
        check_non_negative("voting_rights.min_overtrust", min_overtrust)?;
        check_non_negative("voting_rights.overtrust_ratio", overtrust_ratio)?;
        Ok(Self {
            privacy_penalty,
            min_overtrust,
            overtrust_ratio,
        })
    }

    pub fn from_config(config: &VotingRightsConfig) -> Result<Self, ConfigError> {
        Self::new(
            config.effective_privacy_penalty(),
            config.effective_min_overtrust(),
            config.effective_overtrust_ratio(),
        )
    }

    pub fn privacy_penalty(&self) -> f64 {
        self.privacy_penalty
    }

    /// Voting rights of one entity's evaluators, given as
    /// `(trust, penalty)` pairs, in input order.
    pub fn entity_voting_rights(&self, evaluators: &[(f64, f64)]) -> (Vec<f64>, VotingStatistic) {
        let cumulative_trust: f64 = evaluators.iter().map(|&(t, p)| p * t).sum();
        let budget = self.min_overtrust + self.overtrust_ratio * cumulative_trust;
        let floor = min_voting_right(evaluators, budget);
        let rights: Vec<f64> = evaluators
            .iter()
            .map(|&(t, p)| p * t.max(floor).min(1.0))
            .collect();
        let overtrust = rights.iter().sum::<f64>() - cumulative_trust;
        (
            rights,
            VotingStatistic {
                cumulative_trust,
                min_voting_right: floor,
                overtrust: overtrust.max(0.0),
            },
        )
    }
}

/// Overtrust granted by lifting every `(trust, penalty)` below `floor`.
pub fn overtrust(evaluators: &[(f64, f64)], floor: f64) -> f64 {
    evaluators
        .iter()
        .filter(|&&(t, _)| t < floor)
        .map(|&(t, p)| p * (floor - t))
        .sum()
}

/// Largest floor in `[0, 1]` whose overtrust stays within `budget`.
pub fn min_voting_right(evaluators: &[(f64, f64)], budget: f64) -> f64 {
    if overtrust(evaluators, 1.0) <= budget {
        return 1.0;
    }
    let mut sorted: Vec<(f64, f64)> = evaluators.to_vec();
    sorted.sort_by(|a, b| a.0.total_cmp(&b.0));

    // On [t_k, t_{k+1}], overtrust(m) = P_k m - T_k.
    let mut penalties = 0.0;
    let mut weighted_trusts = 0.0;
    for (k, &(trust, penalty)) in sorted.iter().enumerate() {
        penalties += penalty;
        weighted_trusts += penalty * trust;
        if penalties <= 0.0 {
            continue;
        }
        let floor = (weighted_trusts + budget) / penalties;
        let next = sorted.get(k + 1).map_or(1.0, |&(t, _)| t);
        if floor <= next {
            return floor.clamp(0.0, 1.0);
        }
    }
    1.0
}

impl VotingRightsAssignment for AffineOvertrust {
    #[instrument(skip_all, fields(criterion = criterion, n_entities = evaluators.len()))]
    fn assign_criterion(
        &self,
        criterion: &str,
        evaluators: &Evaluators<'_>,
        users: &Users,
        made_public: &MadePublic,
    ) -> VotingRightsOutcome {
        let mut outcome = VotingRightsOutcome::default();
        for (entity, entity_evaluators) in evaluators {
            let inputs: Vec<(f64, f64)> = entity_evaluators
                .iter()
                .map(|user| {
                    (
                        users.trust(user).clamp(0.0, 1.0),
                        made_public.penalty(self.privacy_penalty, user, entity),
                    )
                })
                .collect();
            let (rights, statistic) = self.entity_voting_rights(&inputs);
            for (user, right) in entity_evaluators.iter().zip(rights) {
                outcome.voting_rights.set(user, entity, criterion, right);
            }
            outcome.statistics.set(entity, criterion, statistic);
        }
        debug!(n_rights = outcome.voting_rights.len(), "voting rights assigned");
        outcome
    }

    fn name(&self) -> &'static str {
        "affine_overtrust"
    }
}
