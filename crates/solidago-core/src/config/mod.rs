//! Configuration system for Solidago.
//! TOML-based, layered resolution: CLI > env > config file > defaults.

/// Copies every `Some` field of `$other` into `$self`.
macro_rules! merge_fields {
    ($self:ident, $other:ident, $($field:ident),+ $(,)?) => {
        $(
            if $other.$field.is_some() {
                $self.$field = $other.$field;
            }
        )+
    };
}

pub mod aggregation_config;
pub mod learning_config;
pub mod pipeline_config;
pub mod post_process_config;
pub mod run_config;
pub mod scaling_config;
pub mod trust_config;
pub mod voting_config;

pub use aggregation_config::{AggregationConfig, AggregationMethod};
pub use learning_config::LearningConfig;
pub use pipeline_config::{CliOverrides, PipelineConfig, CONFIG_FILE_NAME};
pub use post_process_config::PostProcessConfig;
pub use run_config::RunConfig;
pub use scaling_config::{ScalingConfig, ScalingStep};
pub use trust_config::{TrustConfig, TrustMethod};
pub use voting_config::{VotingRightsConfig, VotingRightsMethod};
