//! Per-criterion status of a run.

use std::collections::BTreeMap;
use std::fmt;

use solidago_core::errors::PipelineError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CriterionStatus {
    Succeeded,
    /// No comparison on this criterion: nothing was learned.
    Empty,
    Failed(String),
}

impl fmt::Display for CriterionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Succeeded => write!(f, "succeeded"),
            Self::Empty => write!(f, "empty"),
            Self::Failed(message) => write!(f, "failed: {message}"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunReport {
    pub criteria: BTreeMap<String, CriterionStatus>,
    /// Users whose preference learning hit its update cap, per criterion.
    pub non_converged_users: BTreeMap<String, Vec<String>>,
    pub trust_iterations: Option<usize>,
    pub trust_converged: Option<bool>,
}

impl RunReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `status` for `criterion`. A failure is never overwritten.
    pub fn record(&mut self, criterion: &str, status: CriterionStatus) {
        let entry = self
            .criteria
            .entry(criterion.to_string())
            .or_insert(CriterionStatus::Succeeded);
        if !matches!(entry, CriterionStatus::Failed(_)) {
            *entry = status;
        }
    }

    pub fn record_non_converged(&mut self, criterion: &str, users: Vec<String>) {
        if !users.is_empty() {
            self.non_converged_users
                .entry(criterion.to_string())
                .or_default()
                .extend(users);
        }
    }

    pub fn merge(&mut self, other: RunReport) {
        for (criterion, status) in other.criteria {
            self.record(&criterion, status);
        }
        for (criterion, users) in other.non_converged_users {
            self.record_non_converged(&criterion, users);
        }
        if other.trust_iterations.is_some() {
            self.trust_iterations = other.trust_iterations;
            self.trust_converged = other.trust_converged;
        }
    }

    pub fn failed_criteria(&self) -> Vec<String> {
        self.criteria
            .iter()
            .filter(|(_, status)| matches!(status, CriterionStatus::Failed(_)))
            .map(|(criterion, _)| criterion.clone())
            .collect()
    }

    pub fn n_non_converged(&self) -> usize {
        self.non_converged_users.values().map(Vec::len).sum()
    }

    /// `Err(FailedCriteria)` when any criterion failed.
    pub fn check(&self) -> Result<(), PipelineError> {
        let failed = self.failed_criteria();
        if failed.is_empty() {
            Ok(())
        } else {
            Err(PipelineError::FailedCriteria(failed))
        }
    }
}
