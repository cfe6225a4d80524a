//! # solidago-learning
//!
//! Fits each user's scores from their pairwise comparisons, one criterion
//! at a time. Users are independent of one another.

pub mod gbt;
pub mod root_law;

use std::collections::BTreeMap;

use solidago_core::errors::LearningError;
use solidago_core::model::{ComparisonRecord, Comparisons, DirectScoring};
use tracing::debug;

pub use gbt::{GeneralizedBradleyTerry, UniformGbt};
pub use root_law::{RootLaw, UniformRootLaw};

/// Scores learned for one user on one criterion.
#[derive(Debug, Clone, PartialEq)]
pub struct UserLearning {
    pub scores: DirectScoring,
    pub updates: usize,
    pub converged: bool,
}

/// Scores learned for every user on one criterion.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LearningOutcome {
    pub models: BTreeMap<String, DirectScoring>,
    /// Users whose solver stopped at its update cap.
    pub non_converged: Vec<String>,
}

pub trait PreferenceLearning: Send + Sync {
    /// Learns `user`'s scores from their comparisons on `criterion`.
    fn learn_user(
        &self,
        user: &str,
        criterion: &str,
        comparisons: &[ComparisonRecord<'_>],
    ) -> Result<UserLearning, LearningError>;

    fn name(&self) -> &'static str;

    /// Learns the scores of every user who compared on `criterion`.
    fn learn_criterion(
        &self,
        comparisons: &Comparisons,
        criterion: &str,
    ) -> Result<LearningOutcome, LearningError> {
        let mut outcome = LearningOutcome::default();
        for (user, records) in comparisons.by_user(criterion) {
            let learned = self.learn_user(user, criterion, &records)?;
            if !learned.converged {
                outcome.non_converged.push(user.to_string());
            }
            outcome.models.insert(user.to_string(), learned.scores);
        }
        debug!(
            criterion,
            n_users = outcome.models.len(),
            n_non_converged = outcome.non_converged.len(),
            "criterion learned"
        );
        Ok(outcome)
    }
}
