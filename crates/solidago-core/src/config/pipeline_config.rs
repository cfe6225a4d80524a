//! Top-level pipeline configuration with layered resolution.

use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{
    AggregationConfig, LearningConfig, PostProcessConfig, RunConfig, ScalingConfig, TrustConfig,
    VotingRightsConfig,
};
use crate::errors::ConfigError;

/// Name of the config file looked up in the input directory.
pub const CONFIG_FILE_NAME: &str = "solidago.toml";

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. CLI flags (applied via `apply_cli_overrides`)
/// 2. Environment variables (`SOLIDAGO_*`)
/// 3. Config file (`--config`, or `solidago.toml` in the input directory)
/// 4. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct PipelineConfig {
    pub trust: TrustConfig,
    pub voting_rights: VotingRightsConfig,
    pub learning: LearningConfig,
    pub scaling: ScalingConfig,
    pub aggregation: AggregationConfig,
    pub post_process: PostProcessConfig,
    pub run: RunConfig,
}

/// CLI override arguments that can be applied to a config.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub max_workers: Option<usize>,
    pub criteria: Option<Vec<String>>,
    pub all_public: Option<bool>,
}

impl PipelineConfig {
    /// Load configuration with layered resolution, then validate it.
    ///
    /// A `config_file` that is given but missing is an error.
    pub fn load(
        config_file: Option<&Path>,
        cli_overrides: Option<&CliOverrides>,
    ) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        // Layer 3: config file
        if let Some(path) = config_file {
            Self::merge_toml_file(&mut config, path)?;
        }

        // Layer 2: environment variables
        Self::apply_env_overrides(&mut config);

        // Layer 1 (highest priority): CLI flags
        if let Some(cli) = cli_overrides {
            Self::apply_cli_overrides(&mut config, cli);
        }

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML string, without env or CLI layers.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: PipelineConfig = toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Validate every section.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.trust.validate()?;
        self.voting_rights.validate()?;
        self.learning.validate()?;
        self.scaling.validate()?;
        self.aggregation.validate()?;
        self.post_process.validate()?;
        self.run.validate()
    }

    fn merge_toml_file(config: &mut PipelineConfig, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        let file_config: PipelineConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        config.merge(&file_config);
        Ok(())
    }

    /// Merge `other` into `self`, where `other` values override only when set.
    pub fn merge(&mut self, other: &PipelineConfig) {
        self.trust.merge(&other.trust);
        self.voting_rights.merge(&other.voting_rights);
        self.learning.merge(&other.learning);
        self.scaling.merge(&other.scaling);
        self.aggregation.merge(&other.aggregation);
        self.post_process.merge(&other.post_process);
        self.run.merge(&other.run);
    }

    /// Apply environment variable overrides.
    /// Pattern: `SOLIDAGO_<SECTION>_<FIELD>`, e.g. `SOLIDAGO_TRUST_DECAY`.
    /// Values that fail to parse are ignored.
    fn apply_env_overrides(config: &mut PipelineConfig) {
        let trust = &mut config.trust;
        env_override("SOLIDAGO_TRUST_PRETRUST_VALUE", &mut trust.pretrust_value);
        env_override("SOLIDAGO_TRUST_DECAY", &mut trust.decay);
        env_override("SOLIDAGO_TRUST_SINK_VOUCH", &mut trust.sink_vouch);
        env_override("SOLIDAGO_TRUST_ERROR", &mut trust.error);

        let voting = &mut config.voting_rights;
        env_override(
            "SOLIDAGO_VOTING_RIGHTS_PRIVACY_PENALTY",
            &mut voting.privacy_penalty,
        );
        env_override(
            "SOLIDAGO_VOTING_RIGHTS_MIN_OVERTRUST",
            &mut voting.min_overtrust,
        );
        env_override(
            "SOLIDAGO_VOTING_RIGHTS_OVERTRUST_RATIO",
            &mut voting.overtrust_ratio,
        );

        let learning = &mut config.learning;
        env_override("SOLIDAGO_LEARNING_PRIOR_STD", &mut learning.prior_std);
        env_override(
            "SOLIDAGO_LEARNING_UNCERTAINTY_NLL_INCREASE",
            &mut learning.uncertainty_nll_increase,
        );
        env_override(
            "SOLIDAGO_LEARNING_MAX_UNCERTAINTY",
            &mut learning.max_uncertainty,
        );
        env_override(
            "SOLIDAGO_LEARNING_CONVERGENCE_ERROR",
            &mut learning.convergence_error,
        );

        let scaling = &mut config.scaling;
        env_override("SOLIDAGO_SCALING_LIPSCHITZ", &mut scaling.lipschitz);
        env_override(
            "SOLIDAGO_SCALING_MIN_SCALER_ACTIVITY",
            &mut scaling.min_scaler_activity,
        );
        env_override("SOLIDAGO_SCALING_N_SCALERS_MAX", &mut scaling.n_scalers_max);
        env_override(
            "SOLIDAGO_SCALING_QUANTILE_SHIFT",
            &mut scaling.quantile_shift,
        );
        env_override("SOLIDAGO_SCALING_DEV_QUANTILE", &mut scaling.dev_quantile);

        let aggregation = &mut config.aggregation;
        env_override("SOLIDAGO_AGGREGATION_QUANTILE", &mut aggregation.quantile);
        env_override("SOLIDAGO_AGGREGATION_LIPSCHITZ", &mut aggregation.lipschitz);

        env_override(
            "SOLIDAGO_POST_PROCESS_SCORE_MAX",
            &mut config.post_process.score_max,
        );

        env_override("SOLIDAGO_RUN_MAX_WORKERS", &mut config.run.max_workers);
        env_override("SOLIDAGO_RUN_ALL_PUBLIC", &mut config.run.all_public);
    }

    /// Apply CLI overrides (highest priority).
    pub fn apply_cli_overrides(config: &mut PipelineConfig, cli: &CliOverrides) {
        if let Some(v) = cli.max_workers {
            config.run.max_workers = Some(v);
        }
        if let Some(ref v) = cli.criteria {
            config.run.criteria = v.clone();
        }
        if let Some(v) = cli.all_public {
            config.run.all_public = Some(v);
        }
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }
}

fn env_override<T: FromStr>(key: &str, slot: &mut Option<T>) {
    if let Ok(val) = std::env::var(key) {
        if let Ok(v) = val.parse::<T>() {
            *slot = Some(v);
        }
    }
}
