//! The pipeline driver.
//!
//! Trust and voting rights are computed once for the whole population.
//! Every criterion is then learned, scaled and aggregated independently on
//! a rayon pool of `max_workers` threads. Workers only read shared tables
//! and return fresh per-criterion results, which are merged in criterion
//! order, so outputs do not depend on the number of workers.
//!
//! A criterion whose solver fails is reported as failed; the others still
//! run to completion.

use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::time::Instant;

use rayon::prelude::*;
use solidago_aggregation::Aggregation;
use solidago_core::config::PipelineConfig;
use solidago_core::errors::{ConfigError, PipelineError};
use solidago_core::model::{
    Assessments, Comparisons, CriterionScores, DirectScoring, MadePublic, PipelineInput,
    UserModels, UserScales, Users, VotingRights, Vouches,
};
use solidago_learning::{LearningOutcome, PreferenceLearning, UniformGbt};
use solidago_scaling::{apply_scales, Scales, Scaling, ScalingContext};
use solidago_trust::{TrustOutcome, TrustPropagation};
use solidago_voting::{VotingRightsAssignment, VotingRightsOutcome};
use tracing::{info, info_span, instrument, warn};

use crate::output::PipelineOutput;
use crate::report::{CriterionStatus, RunReport};
use crate::squash::Squash;

/// Scaled and squashed tables derived from learned scores.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostProcessed {
    pub scaled_user_scores: BTreeMap<String, DirectScoring>,
    pub squashed_user_scores: BTreeMap<String, DirectScoring>,
    pub squashed_global_scores: DirectScoring,
}

/// Everything one criterion produces.
struct CriterionRun {
    learning: LearningOutcome,
    scales: Scales,
    global: DirectScoring,
}

pub struct Pipeline {
    trust: Box<dyn TrustPropagation>,
    voting_rights: Box<dyn VotingRightsAssignment>,
    learning: Box<dyn PreferenceLearning>,
    scaling: Box<dyn Scaling>,
    aggregation: Box<dyn Aggregation>,
    squash: Option<Squash>,
    privacy_penalty: f64,
    max_workers: usize,
    criteria: Vec<String>,
    all_public: bool,
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("trust", &self.trust.name())
            .field("voting_rights", &self.voting_rights.name())
            .field("learning", &self.learning.name())
            .field("scaling", &self.scaling.name())
            .field("aggregation", &self.aggregation.name())
            .field("squash", &self.squash)
            .field("max_workers", &self.max_workers)
            .field("criteria", &self.criteria)
            .field("all_public", &self.all_public)
            .finish()
    }
}

impl Pipeline {
    /// Builds every component from `config`, validating it first.
    pub fn from_config(config: &PipelineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            trust: solidago_trust::from_config(&config.trust)?,
            voting_rights: solidago_voting::from_config(&config.voting_rights)?,
            learning: Box::new(UniformGbt::from_config(&config.learning)?),
            scaling: solidago_scaling::from_config(&config.scaling)?,
            aggregation: solidago_aggregation::from_config(&config.aggregation)?,
            squash: Squash::from_config(&config.post_process)?,
            privacy_penalty: config.voting_rights.effective_privacy_penalty(),
            max_workers: config.run.effective_max_workers(),
            criteria: config.run.criteria.clone(),
            all_public: config.run.effective_all_public(),
        })
    }

    pub fn with_max_workers(mut self, max_workers: usize) -> Self {
        self.max_workers = max_workers.max(1);
        self
    }

    pub fn with_learning(mut self, learning: Box<dyn PreferenceLearning>) -> Self {
        self.learning = learning;
        self
    }

    pub fn with_scaling(mut self, scaling: Box<dyn Scaling>) -> Self {
        self.scaling = scaling;
        self
    }

    pub fn with_aggregation(mut self, aggregation: Box<dyn Aggregation>) -> Self {
        self.aggregation = aggregation;
        self
    }

    pub fn max_workers(&self) -> usize {
        self.max_workers
    }

    /// The public/private table the run uses: everything is public in
    /// all-public mode.
    pub fn made_public<'a>(&self, made_public: &'a MadePublic) -> Cow<'a, MadePublic> {
        if self.all_public {
            Cow::Owned(MadePublic::all_public())
        } else {
            Cow::Borrowed(made_public)
        }
    }

    /// `available` restricted to the configured criteria, if any.
    pub fn select_criteria<I>(&self, available: I) -> Vec<String>
    where
        I: IntoIterator<Item = String>,
    {
        let available: BTreeSet<String> = available.into_iter().collect();
        if self.criteria.is_empty() {
            return available.into_iter().collect();
        }
        let selected: BTreeSet<String> = self.criteria.iter().cloned().collect();
        for criterion in selected.difference(&available) {
            warn!(criterion = criterion.as_str(), "requested criterion has no judgment");
        }
        selected.into_iter().collect()
    }

    /// Runs every phase on `input`.
    #[instrument(skip(self, input), fields(n_users = input.users.len(), max_workers = self.max_workers))]
    pub fn run(&self, mut input: PipelineInput) -> Result<PipelineOutput, PipelineError> {
        let start = Instant::now();
        input.register_referenced();
        let made_public = self.made_public(&input.made_public);
        let criteria = self.select_criteria(input.criteria());

        let trust = self.propagate_trust(&input.users, &input.vouches);
        let users = trust.users;
        let voting = self.assign_voting_rights(
            &users,
            &made_public,
            &input.comparisons,
            &input.assessments,
            &criteria,
        );

        let mut report = RunReport::new();
        report.trust_iterations = Some(trust.iterations);
        report.trust_converged = Some(trust.converged);

        let results = self.per_criterion(&criteria, |criterion| {
            self.run_criterion(
                criterion,
                &input.comparisons,
                &users,
                &made_public,
                &voting.voting_rights,
            )
        })?;

        let mut direct: BTreeMap<String, DirectScoring> = BTreeMap::new();
        let mut user_scales = UserScales::new();
        let mut global_scores = DirectScoring::new();
        for (criterion, run) in collect_results(results, &mut report) {
            report.record_non_converged(&criterion, run.learning.non_converged);
            for (user, scores) in run.learning.models {
                direct.entry(user).or_default().extend(scores);
            }
            for (user, scale) in run.scales {
                user_scales.set(&user, &criterion, scale);
            }
            global_scores.extend(run.global);
        }

        let user_direct_scores = UserModels::from(direct);
        let post = self.post_process(&user_direct_scores, &user_scales, &global_scores);
        info!(
            n_criteria = criteria.len(),
            n_failed = report.failed_criteria().len(),
            n_non_converged = report.n_non_converged(),
            phase_duration_ms = start.elapsed().as_millis() as u64,
            "pipeline run complete"
        );

        Ok(PipelineOutput {
            users,
            voting_rights: voting.voting_rights,
            voting_statistics: voting.statistics,
            user_direct_scores,
            user_scales,
            scaled_user_scores: post.scaled_user_scores,
            global_scores,
            squashed_user_scores: post.squashed_user_scores,
            squashed_global_scores: post.squashed_global_scores,
            report,
        })
    }

    /// Propagates trust. Users with a stored trust score keep it; the others
    /// get the propagated value.
    pub fn propagate_trust(&self, users: &Users, vouches: &Vouches) -> TrustOutcome {
        let start = Instant::now();
        let mut outcome = self.trust.propagate(users, vouches);
        outcome.users = users.keeping_stored_trusts(outcome.users);
        if !outcome.converged {
            warn!(iterations = outcome.iterations, "trust propagation did not converge");
        }
        info!(
            method = self.trust.name(),
            iterations = outcome.iterations,
            phase_duration_ms = start.elapsed().as_millis() as u64,
            "trust propagated"
        );
        outcome
    }

    /// Voting rights on `criteria`.
    pub fn assign_voting_rights(
        &self,
        users: &Users,
        made_public: &MadePublic,
        comparisons: &Comparisons,
        assessments: &Assessments,
        criteria: &[String],
    ) -> VotingRightsOutcome {
        let selected: BTreeSet<String> = criteria.iter().cloned().collect();
        let outcome = self.voting_rights.assign(
            users,
            made_public,
            &comparisons.restricted_to(&selected),
            &assessments.restricted_to(&selected),
        );
        info!(
            method = self.voting_rights.name(),
            n_voting_rights = outcome.voting_rights.len(),
            "voting rights assigned"
        );
        outcome
    }

    /// Learns every user's scores on every selected criterion.
    pub fn learn(&self, comparisons: &Comparisons) -> Result<(UserModels, RunReport), PipelineError> {
        let criteria = self.select_criteria(comparisons.criteria().into_iter().map(str::to_string));
        let results = self.per_criterion(&criteria, |criterion| {
            self.learn_criterion(criterion, comparisons)
        })?;

        let mut report = RunReport::new();
        let mut direct: BTreeMap<String, DirectScoring> = BTreeMap::new();
        for (criterion, learning) in collect_results(results, &mut report) {
            report.record_non_converged(&criterion, learning.non_converged);
            for (user, scores) in learning.models {
                direct.entry(user).or_default().extend(scores);
            }
        }
        Ok((UserModels::from(direct), report))
    }

    /// Scales of every user on every selected criterion of `user_scores`.
    pub fn scale(
        &self,
        user_scores: &UserModels,
        users: &Users,
        made_public: &MadePublic,
    ) -> Result<(UserScales, RunReport), PipelineError> {
        let criteria = self.select_criteria(model_criteria(user_scores));
        let results = self.per_criterion(&criteria, |criterion| {
            let scores = user_scores.criterion_scores(criterion);
            if scores.is_empty() {
                return Ok(None);
            }
            self.scale_criterion(criterion, &scores, users, made_public)
                .map(Some)
        })?;

        let mut report = RunReport::new();
        let mut user_scales = UserScales::new();
        for (criterion, scales) in collect_results(results, &mut report) {
            for (user, scale) in scales {
                user_scales.set(&user, &criterion, scale);
            }
        }
        Ok((user_scales, report))
    }

    /// Global scores from scaled user scores and voting rights.
    pub fn aggregate(
        &self,
        user_scores: &UserModels,
        user_scales: &UserScales,
        voting_rights: &VotingRights,
    ) -> Result<(DirectScoring, RunReport), PipelineError> {
        let criteria = self.select_criteria(model_criteria(user_scores));
        let results = self.per_criterion(&criteria, |criterion| {
            let scores = user_scores.criterion_scores(criterion);
            if scores.is_empty() {
                return Ok(None);
            }
            let scaled = apply_scales(&scores, &criterion_scales(user_scales, criterion));
            self.aggregate_criterion(criterion, &scaled, voting_rights)
                .map(Some)
        })?;

        let mut report = RunReport::new();
        let mut global = DirectScoring::new();
        for (_, scores) in collect_results(results, &mut report) {
            global.extend(scores);
        }
        Ok((global, report))
    }

    /// Applies the scales, then the squash when enabled.
    pub fn post_process(
        &self,
        user_scores: &UserModels,
        user_scales: &UserScales,
        global_scores: &DirectScoring,
    ) -> PostProcessed {
        let scaled = user_scores.clone().scaled(user_scales);
        let scaled_user_scores = scaled.evaluate();
        match self.squash {
            Some(squash) => PostProcessed {
                squashed_user_scores: squash.user_scores(scaled),
                squashed_global_scores: squash.global_scores(global_scores),
                scaled_user_scores,
            },
            None => PostProcessed {
                squashed_user_scores: scaled_user_scores.clone(),
                squashed_global_scores: global_scores.clone(),
                scaled_user_scores,
            },
        }
    }

    /// Learning, scaling and aggregation of one criterion. `None` when
    /// nobody compared anything on it.
    fn run_criterion(
        &self,
        criterion: &str,
        comparisons: &Comparisons,
        users: &Users,
        made_public: &MadePublic,
        voting_rights: &VotingRights,
    ) -> Result<Option<CriterionRun>, PipelineError> {
        let Some(learning) = self.learn_criterion(criterion, comparisons)? else {
            return Ok(None);
        };
        let scores: CriterionScores = learning
            .models
            .iter()
            .map(|(user, model)| (user.clone(), model.criterion_scores(criterion)))
            .collect();
        let scales = self.scale_criterion(criterion, &scores, users, made_public)?;
        let scaled = apply_scales(&scores, &scales);
        let global = self.aggregate_criterion(criterion, &scaled, voting_rights)?;
        Ok(Some(CriterionRun {
            learning,
            scales,
            global,
        }))
    }

    fn learn_criterion(
        &self,
        criterion: &str,
        comparisons: &Comparisons,
    ) -> Result<Option<LearningOutcome>, PipelineError> {
        let outcome = self.learning.learn_criterion(comparisons, criterion)?;
        if outcome.models.is_empty() {
            return Ok(None);
        }
        if !outcome.non_converged.is_empty() {
            warn!(
                criterion,
                n_non_converged = outcome.non_converged.len(),
                "preference learning hit its update cap"
            );
        }
        Ok(Some(outcome))
    }

    fn scale_criterion(
        &self,
        criterion: &str,
        scores: &CriterionScores,
        users: &Users,
        made_public: &MadePublic,
    ) -> Result<Scales, PipelineError> {
        let context = ScalingContext {
            criterion,
            users,
            made_public,
            privacy_penalty: self.privacy_penalty,
        };
        Ok(self.scaling.scale(scores, &context)?)
    }

    fn aggregate_criterion(
        &self,
        criterion: &str,
        scaled: &CriterionScores,
        voting_rights: &VotingRights,
    ) -> Result<DirectScoring, PipelineError> {
        Ok(self.aggregation.aggregate(criterion, scaled, voting_rights)?)
    }

    /// Runs `work` once per criterion on the worker pool. Results come back
    /// in the order of `criteria`.
    fn per_criterion<T, F>(
        &self,
        criteria: &[String],
        work: F,
    ) -> Result<Vec<(String, Result<T, PipelineError>)>, PipelineError>
    where
        T: Send,
        F: Fn(&str) -> Result<T, PipelineError> + Sync,
    {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.max_workers)
            .thread_name(|i| format!("solidago-worker-{i}"))
            .build()
            .map_err(|e| PipelineError::WorkerPool(e.to_string()))?;
        Ok(pool.install(|| {
            criteria
                .par_iter()
                .map(|criterion| {
                    let _span = info_span!("criterion", criterion = criterion.as_str()).entered();
                    (criterion.clone(), work(criterion))
                })
                .collect()
        }))
    }
}

/// Records a status per criterion and keeps the successful results.
fn collect_results<T>(
    results: Vec<(String, Result<Option<T>, PipelineError>)>,
    report: &mut RunReport,
) -> Vec<(String, T)> {
    let mut succeeded = Vec::with_capacity(results.len());
    for (criterion, result) in results {
        match result {
            Ok(Some(value)) => {
                report.record(&criterion, CriterionStatus::Succeeded);
                succeeded.push((criterion, value));
            }
            Ok(None) => {
                warn!(criterion = criterion.as_str(), "criterion is empty");
                report.record(&criterion, CriterionStatus::Empty);
            }
            Err(e) => {
                warn!(criterion = criterion.as_str(), error = %e, "criterion failed");
                report.record(&criterion, CriterionStatus::Failed(e.to_string()));
            }
        }
    }
    succeeded
}

fn model_criteria(models: &UserModels) -> BTreeSet<String> {
    models
        .iter()
        .flat_map(|(_, model)| model.criteria().into_iter().map(str::to_string))
        .collect()
}

fn criterion_scales(user_scales: &UserScales, criterion: &str) -> Scales {
    user_scales
        .iter()
        .filter(|(_, c, _)| *c == criterion)
        .map(|(user, _, scale)| (user.to_string(), scale))
        .collect()
}
