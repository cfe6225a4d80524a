//! Writers and readers of the output tables.

use std::collections::BTreeMap;
use std::path::Path;

use solidago_core::errors::DataError;
use solidago_core::model::{
    DirectScoring, UserScales, Users, VotingRights, VotingStatistic, VotingStatistics,
};
use solidago_pipeline::PipelineOutput;
use tracing::{info, instrument};

use crate::rows::{
    GlobalScoreRow, TrustRow, UserScaleRow, UserScoreRow, VotingRightRow, VotingStatisticRow,
};
use crate::table::{read_table, write_table};
use crate::{
    GLOBAL_SCORES_FILE, SQUASHED_GLOBAL_SCORES_FILE, TRUST_FILE, USER_DIRECT_SCORES_FILE,
    USER_SCALES_FILE, USER_SCORES_FILE, VOTING_RIGHTS_FILE, VOTING_RIGHTS_STATS_FILE,
};

pub fn write_trust(path: &Path, users: &Users) -> Result<(), DataError> {
    write_table(
        path,
        users.trusts().into_iter().map(|(username, trust_score)| TrustRow {
            username,
            trust_score,
        }),
    )
}

/// Trust per username.
pub fn read_trust(path: &Path) -> Result<BTreeMap<String, f64>, DataError> {
    Ok(read_table::<TrustRow>(path)?
        .into_iter()
        .map(|row| (row.username, row.trust_score))
        .collect())
}

pub fn write_voting_rights(path: &Path, voting_rights: &VotingRights) -> Result<(), DataError> {
    write_table(
        path,
        voting_rights.iter().map(|record| VotingRightRow {
            username: record.user.to_string(),
            entity_name: record.entity.to_string(),
            criterion: record.criterion.to_string(),
            voting_right: record.voting_right,
        }),
    )
}

pub fn read_voting_rights(path: &Path) -> Result<VotingRights, DataError> {
    let mut voting_rights = VotingRights::new();
    for row in read_table::<VotingRightRow>(path)? {
        voting_rights.set(&row.username, &row.entity_name, &row.criterion, row.voting_right);
    }
    Ok(voting_rights)
}

pub fn write_voting_statistics(
    path: &Path,
    statistics: &VotingStatistics,
) -> Result<(), DataError> {
    write_table(
        path,
        statistics
            .iter()
            .map(|(entity, criterion, s)| VotingStatisticRow {
                entity_name: entity.to_string(),
                criterion: criterion.to_string(),
                cumulative_trust: s.cumulative_trust,
                min_voting_right: s.min_voting_right,
                overtrust: s.overtrust,
            }),
    )
}

pub fn read_voting_statistics(path: &Path) -> Result<VotingStatistics, DataError> {
    let mut statistics = VotingStatistics::new();
    for row in read_table::<VotingStatisticRow>(path)? {
        statistics.set(
            &row.entity_name,
            &row.criterion,
            VotingStatistic {
                cumulative_trust: row.cumulative_trust,
                min_voting_right: row.min_voting_right,
                overtrust: row.overtrust,
            },
        );
    }
    Ok(statistics)
}

/// Per-user scores, as in `user_direct_scores.csv` and `user_scores.csv`.
pub fn write_user_scores(
    path: &Path,
    scores: &BTreeMap<String, DirectScoring>,
) -> Result<(), DataError> {
    write_table(
        path,
        scores.iter().flat_map(|(user, direct)| {
            direct.iter().map(move |(entity, criterion, score)| UserScoreRow {
                username: user.clone(),
                entity_name: entity.to_string(),
                criterion: criterion.to_string(),
                value: score.value,
                left_unc: score.left_unc,
                right_unc: score.right_unc,
            })
        }),
    )
}

pub fn read_user_scores(path: &Path) -> Result<BTreeMap<String, DirectScoring>, DataError> {
    let mut scores: BTreeMap<String, DirectScoring> = BTreeMap::new();
    for row in read_table::<UserScoreRow>(path)? {
        scores
            .entry(row.username.clone())
            .or_default()
            .set(&row.entity_name, &row.criterion, row.score());
    }
    Ok(scores)
}

pub fn write_user_scales(path: &Path, scales: &UserScales) -> Result<(), DataError> {
    write_table(
        path,
        scales
            .iter()
            .map(|(user, criterion, scale)| UserScaleRow::new(user, criterion, scale)),
    )
}

pub fn read_user_scales(path: &Path) -> Result<UserScales, DataError> {
    let mut scales = UserScales::new();
    for row in read_table::<UserScaleRow>(path)? {
        scales.set(&row.username, &row.criterion, row.scale());
    }
    Ok(scales)
}

/// Global scores, as in `global_scores.csv` and `squashed_global_scores.csv`.
pub fn write_global_scores(path: &Path, scores: &DirectScoring) -> Result<(), DataError> {
    write_table(
        path,
        scores.iter().map(|(entity, criterion, score)| GlobalScoreRow {
            entity_name: entity.to_string(),
            criterion: criterion.to_string(),
            value: score.value,
            left_unc: score.left_unc,
            right_unc: score.right_unc,
        }),
    )
}

pub fn read_global_scores(path: &Path) -> Result<DirectScoring, DataError> {
    let mut scores = DirectScoring::new();
    for row in read_table::<GlobalScoreRow>(path)? {
        scores.set(&row.entity_name, &row.criterion, row.score());
    }
    Ok(scores)
}

/// Writes every table of `output` into `dir`, creating it if needed.
#[instrument(skip(dir, output), fields(dir = %dir.display()))]
pub fn write_output(dir: &Path, output: &PipelineOutput) -> Result<(), DataError> {
    std::fs::create_dir_all(dir).map_err(|e| DataError::Io {
        path: dir.display().to_string(),
        message: e.to_string(),
    })?;
    write_trust(&dir.join(TRUST_FILE), &output.users)?;
    write_voting_rights(&dir.join(VOTING_RIGHTS_FILE), &output.voting_rights)?;
    write_voting_statistics(&dir.join(VOTING_RIGHTS_STATS_FILE), &output.voting_statistics)?;
    write_user_scores(
        &dir.join(USER_DIRECT_SCORES_FILE),
        &output.user_direct_scores.evaluate(),
    )?;
    write_user_scales(&dir.join(USER_SCALES_FILE), &output.user_scales)?;
    write_global_scores(&dir.join(GLOBAL_SCORES_FILE), &output.global_scores)?;
    write_user_scores(&dir.join(USER_SCORES_FILE), &output.squashed_user_scores)?;
    write_global_scores(
        &dir.join(SQUASHED_GLOBAL_SCORES_FILE),
        &output.squashed_global_scores,
    )?;
    info!("output tables written");
    Ok(())
}
