//! # solidago-scaling
//!
//! Puts the scores of different users on a common scale, one criterion at
//! a time. Every step returns one affine [`Scale`] per user; steps compose.

pub mod compose;
pub mod mehestan;
pub mod quantile_shift;
pub mod standardize;

use std::collections::BTreeMap;

use solidago_core::config::{ScalingConfig, ScalingStep};
use solidago_core::errors::{ConfigError, ScalingError};
use solidago_core::model::{CriterionScores, MadePublic, Users};
use solidago_core::Scale;
use solidago_primitives::QrSample;

pub use compose::{NoScaling, ScalingCompose};
pub use mehestan::Mehestan;
pub use quantile_shift::QuantileShift;
pub use standardize::Standardize;

/// Scales of every scaled user, keyed by user.
pub type Scales = BTreeMap<String, Scale>;

/// Read-only inputs shared by the scaling steps of one criterion.
#[derive(Debug, Clone, Copy)]
pub struct ScalingContext<'a> {
    pub criterion: &'a str,
    pub users: &'a Users,
    pub made_public: &'a MadePublic,
    pub privacy_penalty: f64,
}

impl ScalingContext<'_> {
    pub fn penalty(&self, user: &str, entity: &str) -> f64 {
        self.made_public.penalty(self.privacy_penalty, user, entity)
    }

    pub fn trust(&self, user: &str) -> f64 {
        self.users.trust(user).clamp(0.0, 1.0)
    }
}

pub trait Scaling: Send + Sync {
    /// Scales for the users of `scores` (user -> entity -> score).
    /// Users missing from the result keep the identity scale.
    fn scale(&self, scores: &CriterionScores, context: &ScalingContext<'_>)
        -> Result<Scales, ScalingError>;

    fn name(&self) -> &'static str;
}

/// Applies `scales` to `scores`; users without a scale are left as is.
pub fn apply_scales(scores: &CriterionScores, scales: &Scales) -> CriterionScores {
    scores
        .iter()
        .map(|(user, entity_scores)| {
            let scaled = match scales.get(user) {
                Some(scale) => entity_scores
                    .iter()
                    .map(|(entity, score)| (entity.clone(), scale.apply(*score)))
                    .collect(),
                None => entity_scores.clone(),
            };
            (user.clone(), scaled)
        })
        .collect()
}

/// Every `(user, entity)` score, weighted so that each user carries a total
/// weight equal to their average privacy penalty.
pub(crate) fn user_balanced_sample(
    scores: &CriterionScores,
    context: &ScalingContext<'_>,
) -> QrSample {
    let mut sample = QrSample::new();
    for (user, entity_scores) in scores {
        let n_scores = entity_scores.len() as f64;
        for (entity, score) in entity_scores {
            if score.is_nan() {
                continue;
            }
            sample.push_score(*score, context.penalty(user, entity) / n_scores);
        }
    }
    sample
}

/// Builds the scaling chain listed in `config.steps`.
pub fn from_config(config: &ScalingConfig) -> Result<Box<dyn Scaling>, ConfigError> {
    let steps = config.effective_steps();
    if steps.is_empty() {
        return Ok(Box::new(NoScaling));
    }
    let mut chain: Vec<Box<dyn Scaling>> = Vec::with_capacity(steps.len());
    for step in steps {
        chain.push(match step {
            ScalingStep::Mehestan => Box::new(Mehestan::from_config(config)?),
            ScalingStep::QuantileShift => Box::new(QuantileShift::from_config(config)?),
            ScalingStep::Standardize => Box::new(Standardize::from_config(config)?),
        });
    }
    Ok(Box::new(ScalingCompose::new(chain)))
}
