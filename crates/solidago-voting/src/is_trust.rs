//! Voting rights equal to (penalized) trust.

use solidago_core::config::VotingRightsConfig;
use solidago_core::errors::config_error::check_in_range;
use solidago_core::errors::ConfigError;
use solidago_core::model::{MadePublic, Users, VotingStatistic};

use crate::{Evaluators, VotingRightsAssignment, VotingRightsOutcome};

/// `voting_right = penalty * trust`, without any overtrust.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IsTrust {
    privacy_penalty: f64,
}

impl IsTrust {
    pub fn new(privacy_penalty: f64) -> Result<Self, ConfigError> {
        check_in_range("voting_rights.privacy_penalty", privacy_penalty, 0.0, 1.0)?;
        Ok(Self { privacy_penalty })
    }

    pub fn from_config(config: &VotingRightsConfig) -> Result<Self, ConfigError> {
        Self::new(config.effective_privacy_penalty())
    }
}

impl VotingRightsAssignment for IsTrust {
    fn assign_criterion(
        &self,
        criterion: &str,
        evaluators: &Evaluators<'_>,
        users: &Users,
        made_public: &MadePublic,
    ) -> VotingRightsOutcome {
        let mut outcome = VotingRightsOutcome::default();
        for (entity, entity_evaluators) in evaluators {
            let mut cumulative_trust = 0.0;
            for user in entity_evaluators {
                let right = made_public.penalty(self.privacy_penalty, user, entity)
                    * users.trust(user).clamp(0.0, 1.0);
                cumulative_trust += right;
                outcome.voting_rights.set(user, entity, criterion, right);
            }
            outcome.statistics.set(
                entity,
                criterion,
                VotingStatistic {
                    cumulative_trust,
                    min_voting_right: 0.0,
                    overtrust: 0.0,
                },
            );
        }
        outcome
    }

    fn name(&self) -> &'static str {
        "is_trust"
    }
}
