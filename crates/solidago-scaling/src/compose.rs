//! Scaling chains.

use solidago_core::errors::ScalingError;
use solidago_core::model::CriterionScores;
use tracing::debug;

use crate::{apply_scales, Scales, Scaling, ScalingContext};

/// Leaves every score unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoScaling;

impl Scaling for NoScaling {
    fn scale(
        &self,
        _scores: &CriterionScores,
        _context: &ScalingContext<'_>,
    ) -> Result<Scales, ScalingError> {
        Ok(Scales::new())
    }

    fn name(&self) -> &'static str {
        "no_scaling"
    }
}

/// Runs steps in order, each on the output of the previous one, and
/// composes their scales.
pub struct ScalingCompose {
    steps: Vec<Box<dyn Scaling>>,
}

impl ScalingCompose {
    pub fn new(steps: Vec<Box<dyn Scaling>>) -> Self {
        Self { steps }
    }

    pub fn steps(&self) -> impl Iterator<Item = &dyn Scaling> {
        self.steps.iter().map(|step| step.as_ref())
    }
}

impl Scaling for ScalingCompose {
    fn scale(
        &self,
        scores: &CriterionScores,
        context: &ScalingContext<'_>,
    ) -> Result<Scales, ScalingError> {
        let mut current = scores.clone();
        let mut composed = Scales::new();
        for step in &self.steps {
            let scales = step.scale(&current, context)?;
            current = apply_scales(&current, &scales);
            for (user, scale) in scales {
                let entry = composed.entry(user).or_default();
                *entry = entry.then(&scale);
            }
            debug!(criterion = context.criterion, step = step.name(), "scaling step applied");
        }
        Ok(composed)
    }

    fn name(&self) -> &'static str {
        "compose"
    }
}
