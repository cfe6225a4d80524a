//! Generalized Bradley-Terry preference learning.
//!
//! For one user and one criterion, with `r = value / max` for each
//! comparison and `Δ = θ_right - θ_left`, the scores minimize
//!
//! ```text
//! Σ_comparisons (Φ(Δ) - r Δ)  +  Σ_e θ_e² / (2 prior_std²)
//! ```
//!
//! where `Φ` is the cumulant of the root law. The loss is strictly convex,
//! so it is minimized by coordinate descent: each coordinate update is the
//! root of a strictly increasing partial derivative, found with Brent.
//!
//! The uncertainty of `θ_e` is the displacement of `θ_e` alone, to the left
//! and to the right, that raises the comparison loss by
//! `uncertainty_nll_increase`, capped at `max_uncertainty`.

use solidago_core::config::LearningConfig;
use solidago_core::constants;
use solidago_core::errors::config_error::{check_in_range, check_positive};
use solidago_core::errors::{ConfigError, LearningError, NumericError};
use solidago_core::model::{ComparisonRecord, DirectScoring};
use solidago_core::types::NameIndex;
use solidago_core::Score;
use solidago_primitives::{brent_root_expanding, dichotomy_solve, CoordinateDescent};
use tracing::{debug, instrument};
use xxhash_rust::xxh3::xxh3_64;

use crate::root_law::{RootLaw, UniformRootLaw};
use crate::{PreferenceLearning, UserLearning};

/// Half-width of the initial Brent bracket around the current coordinate.
const BRACKET_HALF_WIDTH: f64 = 5.0;

#[derive(Debug, Clone, PartialEq)]
pub struct GeneralizedBradleyTerry<L: RootLaw> {
    root_law: L,
    prior_std: f64,
    uncertainty_nll_increase: f64,
    max_uncertainty: f64,
    convergence_error: f64,
    max_iterations: usize,
}

/// Generalized Bradley-Terry with the uniform root law.
pub type UniformGbt = GeneralizedBradleyTerry<UniformRootLaw>;

impl Default for UniformGbt {
    fn default() -> Self {
        Self {
            root_law: UniformRootLaw,
            prior_std: constants::DEFAULT_PRIOR_STD,
            uncertainty_nll_increase: constants::DEFAULT_UNCERTAINTY_NLL_INCREASE,
            max_uncertainty: constants::DEFAULT_MAX_UNCERTAINTY,
            convergence_error: constants::DEFAULT_CONVERGENCE_ERROR,
            max_iterations: constants::DEFAULT_MAX_COORDINATE_UPDATES,
        }
    }
}

impl UniformGbt {
    pub fn from_config(config: &LearningConfig) -> Result<Self, ConfigError> {
        GeneralizedBradleyTerry::with_root_law(UniformRootLaw, config)
    }
}

impl<L: RootLaw> GeneralizedBradleyTerry<L> {
    pub fn new(
        root_law: L,
        prior_std: f64,
        uncertainty_nll_increase: f64,
        max_uncertainty: f64,
        convergence_error: f64,
        max_iterations: usize,
    ) -> Result<Self, ConfigError> {
        check_positive("learning.prior_std", prior_std)?;
        check_positive("learning.uncertainty_nll_increase", uncertainty_nll_increase)?;
        check_positive("learning.max_uncertainty", max_uncertainty)?;
        check_in_range(
            "learning.convergence_error",
            convergence_error,
            f64::MIN_POSITIVE,
            1.0,
        )?;
        if max_iterations == 0 {
            return Err(ConfigError::invalid(
                "learning.max_iterations",
                "must be greater than 0",
            ));
        }
        Ok(Self {
            root_law,
            prior_std,
            uncertainty_nll_increase,
            max_uncertainty,
            convergence_error,
            max_iterations,
        })
    }

    pub fn with_root_law(root_law: L, config: &LearningConfig) -> Result<Self, ConfigError> {
        Self::new(
            root_law,
            config.effective_prior_std(),
            config.effective_uncertainty_nll_increase(),
            config.effective_max_uncertainty(),
            config.effective_convergence_error(),
            config.effective_max_iterations(),
        )
    }

    pub fn root_law(&self) -> &L {
        &self.root_law
    }

    fn solve(&self, problem: &Problem<'_, L>, seed: u64) -> Result<(Vec<f64>, usize, bool), NumericError> {
        let prior_variance = self.prior_std * self.prior_std;
        let xtol = self.convergence_error / 10.0;
        let descent = CoordinateDescent::new(self.convergence_error, self.max_iterations, seed);
        let outcome = descent.minimize(vec![0.0; problem.len()], |e, theta| {
            let start = theta[e];
            brent_root_expanding(
                |x| problem.derivative(e, theta, x, prior_variance),
                start - BRACKET_HALF_WIDTH,
                start + BRACKET_HALF_WIDTH,
                xtol,
            )
        })?;
        Ok((outcome.solution, outcome.updates, outcome.converged))
    }

    /// Left and right uncertainty of coordinate `e` at the optimum.
    fn uncertainty(&self, problem: &Problem<'_, L>, e: usize, theta: &[f64]) -> (f64, f64) {
        let base = problem.loss(e, theta, theta[e]);
        let increase = |delta: f64| problem.loss(e, theta, theta[e] + delta) - base;
        let target = self.uncertainty_nll_increase;
        let cap = self.max_uncertainty;
        let error = self.convergence_error;

        let right = if increase(cap) < target {
            cap
        } else {
            dichotomy_solve(increase, target, 0.0, cap, error)
        };
        let left = if increase(-cap) < target {
            cap
        } else {
            dichotomy_solve(|d| increase(-d), target, 0.0, cap, error)
        };
        (left, right)
    }
}

impl<L: RootLaw> PreferenceLearning for GeneralizedBradleyTerry<L> {
    #[instrument(level = "debug", skip(self, comparisons), fields(n_comparisons = comparisons.len()))]
    fn learn_user(
        &self,
        user: &str,
        criterion: &str,
        comparisons: &[ComparisonRecord<'_>],
    ) -> Result<UserLearning, LearningError> {
        let problem = Problem::build(&self.root_law, comparisons);
        let seed = xxh3_64(format!("{criterion}/{user}").as_bytes());
        let (theta, updates, converged) =
            self.solve(&problem, seed)
                .map_err(|source| LearningError::Solver {
                    user: user.to_string(),
                    criterion: criterion.to_string(),
                    source,
                })?;

        let mut scores = DirectScoring::new();
        for (e, &value) in theta.iter().enumerate() {
            let (left_unc, right_unc) = self.uncertainty(&problem, e, &theta);
            scores.set(problem.name(e), criterion, Score::new(value, left_unc, right_unc));
        }
        debug!(n_entities = problem.len(), updates, converged, "user scores learned");
        Ok(UserLearning {
            scores,
            updates,
            converged,
        })
    }

    fn name(&self) -> &'static str {
        "generalized_bradley_terry"
    }
}

/// One user's comparisons on one criterion, indexed by entity.
struct Problem<'a, L> {
    law: &'a L,
    entities: NameIndex<'a>,
    /// For each entity `e`, pairs `(o, r)` such that the comparison term is
    /// `Φ(θ_e - θ_o) - r (θ_e - θ_o)`.
    neighbors: Vec<Vec<(usize, f64)>>,
}

impl<'a, L: RootLaw> Problem<'a, L> {
    fn build(law: &'a L, comparisons: &[ComparisonRecord<'a>]) -> Self {
        let mut entities = NameIndex::new();
        let mut neighbors: Vec<Vec<(usize, f64)>> = Vec::new();
        for record in comparisons {
            let left = entities.intern(record.left);
            let right = entities.intern(record.right);
            neighbors.resize_with(entities.len(), Vec::new);
            let r = record.comparison.normalized();
            neighbors[right].push((left, r));
            neighbors[left].push((right, -r));
        }
        Self {
            law,
            entities,
            neighbors,
        }
    }

    fn len(&self) -> usize {
        self.entities.len()
    }

    fn name(&self, e: usize) -> &'a str {
        self.entities.name(e)
    }

    /// Comparison loss involving `e`, with `θ_e` replaced by `x`.
    fn loss(&self, e: usize, theta: &[f64], x: f64) -> f64 {
        self.neighbors[e]
            .iter()
            .map(|&(o, r)| {
                let delta = x - theta[o];
                self.law.cumulant(delta) - r * delta
            })
            .sum()
    }

    /// Partial derivative of the regularized loss in `θ_e`, at `θ_e = x`.
    fn derivative(&self, e: usize, theta: &[f64], x: f64, prior_variance: f64) -> f64 {
        x / prior_variance
            + self.neighbors[e]
                .iter()
                .map(|&(o, r)| self.law.cumulant_derivative(x - theta[o]) - r)
                .sum::<f64>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use solidago_core::model::Comparison;

    fn record<'a>(left: &'a str, right: &'a str, value: f64) -> ComparisonRecord<'a> {
        ComparisonRecord {
            user: "user",
            criterion: "default",
            left,
            right,
            comparison: Comparison { value, max: 10.0 },
        }
    }

    #[test]
    fn preferred_entity_scores_higher() {
        let gbt = UniformGbt::default();
        let learned = gbt
            .learn_user("user", "default", &[record("a", "b", 10.0)])
            .unwrap();
        assert!(learned.converged);
        let a = learned.scores.get("a", "default").unwrap();
        let b = learned.scores.get("b", "default").unwrap();
        assert!(b.value > 0.0);
        assert!((a.value + b.value).abs() < 1e-4);
    }

    #[test]
    fn no_comparisons_means_no_scores() {
        let gbt = UniformGbt::default();
        let learned = gbt.learn_user("user", "default", &[]).unwrap();
        assert!(learned.scores.is_empty());
        assert!(learned.converged);
    }

    #[test]
    fn invalid_parameters_are_rejected() {
        assert!(GeneralizedBradleyTerry::new(UniformRootLaw, 0.0, 1.0, 1e3, 1e-5, 10).is_err());
        assert!(GeneralizedBradleyTerry::new(UniformRootLaw, 7.0, 1.0, 1e3, 1e-5, 0).is_err());
    }
}
