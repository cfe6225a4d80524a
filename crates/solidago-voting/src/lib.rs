//! # solidago-voting
//!
//! Turns trust, privacy and participation into voting rights per
//! `(user, entity, criterion)`.

pub mod affine_overtrust;
pub mod is_trust;

use std::collections::{BTreeMap, BTreeSet};

use solidago_core::config::{VotingRightsConfig, VotingRightsMethod};
use solidago_core::errors::ConfigError;
use solidago_core::model::{
    Assessments, Comparisons, MadePublic, Users, VotingRights, VotingStatistics,
};

pub use affine_overtrust::AffineOvertrust;
pub use is_trust::IsTrust;

/// Users who judged each entity, keyed by entity.
pub type Evaluators<'a> = BTreeMap<&'a str, BTreeSet<&'a str>>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct VotingRightsOutcome {
    pub voting_rights: VotingRights,
    pub statistics: VotingStatistics,
}

impl VotingRightsOutcome {
    pub fn extend(&mut self, other: VotingRightsOutcome) {
        self.voting_rights.extend(other.voting_rights);
        self.statistics.extend(other.statistics);
    }
}

pub trait VotingRightsAssignment: Send + Sync {
    /// Voting rights on one criterion, for the given evaluators.
    fn assign_criterion(
        &self,
        criterion: &str,
        evaluators: &Evaluators<'_>,
        users: &Users,
        made_public: &MadePublic,
    ) -> VotingRightsOutcome;

    fn name(&self) -> &'static str;

    /// Voting rights on every criterion carrying a judgment.
    fn assign(
        &self,
        users: &Users,
        made_public: &MadePublic,
        comparisons: &Comparisons,
        assessments: &Assessments,
    ) -> VotingRightsOutcome {
        let criteria: BTreeSet<&str> = comparisons
            .criteria()
            .into_iter()
            .chain(assessments.criteria())
            .collect();
        let mut outcome = VotingRightsOutcome::default();
        for criterion in criteria {
            let evaluators = evaluators(comparisons, assessments, criterion);
            outcome.extend(self.assign_criterion(criterion, &evaluators, users, made_public));
        }
        outcome
    }
}

/// Users who compared or assessed each entity on `criterion`.
pub fn evaluators<'a>(
    comparisons: &'a Comparisons,
    assessments: &'a Assessments,
    criterion: &'a str,
) -> Evaluators<'a> {
    let mut evaluators = comparisons.evaluators(criterion);
    for (entity, users) in assessments.evaluators(criterion) {
        evaluators.entry(entity).or_default().extend(users);
    }
    evaluators
}

/// Builds the allocation selected by `config.method`.
pub fn from_config(
    config: &VotingRightsConfig,
) -> Result<Box<dyn VotingRightsAssignment>, ConfigError> {
    Ok(match config.effective_method() {
        VotingRightsMethod::AffineOvertrust => Box::new(AffineOvertrust::from_config(config)?),
        VotingRightsMethod::IsTrust => Box::new(IsTrust::from_config(config)?),
    })
}
