//! Tables produced by a full run.

use std::collections::BTreeMap;

use solidago_core::model::{DirectScoring, UserModels, UserScales, Users, VotingRights, VotingStatistics};

use crate::report::RunReport;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineOutput {
    /// Input users with their propagated trust.
    pub users: Users,
    pub voting_rights: VotingRights,
    pub voting_statistics: VotingStatistics,
    /// Learned scores, before scaling.
    pub user_direct_scores: UserModels,
    pub user_scales: UserScales,
    pub scaled_user_scores: BTreeMap<String, DirectScoring>,
    pub global_scores: DirectScoring,
    /// Equal to the scaled scores when squashing is disabled.
    pub squashed_user_scores: BTreeMap<String, DirectScoring>,
    pub squashed_global_scores: DirectScoring,
    pub report: RunReport,
}
