//! Tests for the Solidago configuration system.

use std::sync::Mutex;

use solidago_core::config::{
    AggregationMethod, CliOverrides, PipelineConfig, ScalingStep, TrustMethod,
};
use solidago_core::errors::{ConfigError, SolidagoErrorCode};

/// Global mutex to serialize tests that modify environment variables.
static ENV_MUTEX: Mutex<()> = Mutex::new(());

fn tempdir() -> tempfile::TempDir {
    tempfile::TempDir::new().unwrap()
}

/// Clear the SOLIDAGO_ env vars touched by these tests.
fn clear_solidago_env_vars() {
    for key in [
        "SOLIDAGO_TRUST_DECAY",
        "SOLIDAGO_TRUST_PRETRUST_VALUE",
        "SOLIDAGO_VOTING_RIGHTS_PRIVACY_PENALTY",
        "SOLIDAGO_RUN_MAX_WORKERS",
        "SOLIDAGO_AGGREGATION_QUANTILE",
    ] {
        std::env::remove_var(key);
    }
}

#[test]
fn test_layered_resolution() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_solidago_env_vars();

    let dir = tempdir();
    let path = dir.path().join("solidago.toml");
    std::fs::write(
        &path,
        r#"
[trust]
decay = 0.5
pretrust_value = 0.9

[run]
max_workers = 3
"#,
    )
    .unwrap();

    std::env::set_var("SOLIDAGO_TRUST_DECAY", "0.6");
    let cli = CliOverrides {
        max_workers: Some(8),
        ..Default::default()
    };

    let config = PipelineConfig::load(Some(&path), Some(&cli)).unwrap();
    // env beats file
    assert_eq!(config.trust.effective_decay(), 0.6);
    // file beats defaults
    assert_eq!(config.trust.effective_pretrust_value(), 0.9);
    // CLI beats file
    assert_eq!(config.run.effective_max_workers(), 8);
    // untouched defaults
    assert_eq!(config.trust.effective_sink_vouch(), 5.0);

    clear_solidago_env_vars();
}

#[test]
fn test_defaults() {
    let config = PipelineConfig::default();
    assert_eq!(config.trust.effective_method(), TrustMethod::Lipschitrust);
    assert_eq!(config.trust.effective_pretrust_value(), 0.8);
    assert_eq!(config.trust.effective_decay(), 0.8);
    assert_eq!(config.trust.effective_error(), 1e-8);
    assert_eq!(config.trust.effective_vouch_kind(), "ProofOfPersonhood");
    assert_eq!(config.voting_rights.effective_privacy_penalty(), 0.5);
    assert_eq!(config.learning.effective_prior_std(), 7.0);
    assert_eq!(config.learning.effective_max_uncertainty(), 1e3);
    assert_eq!(
        config.scaling.effective_steps(),
        vec![ScalingStep::Mehestan, ScalingStep::QuantileShift]
    );
    assert_eq!(config.scaling.effective_quantile_shift(), 0.15);
    assert_eq!(config.aggregation.effective_method(), AggregationMethod::QrQuantile);
    assert_eq!(config.aggregation.effective_quantile(), 0.2);
    assert_eq!(config.post_process.effective_score_max(), 100.0);
    assert!(config.run.effective_max_workers() >= 1);
    config.validate().unwrap();
}

#[test]
fn test_privacy_penalty_out_of_range_is_config_error() {
    let err = PipelineConfig::from_toml("[voting_rights]\nprivacy_penalty = 1.5\n").unwrap_err();
    match &err {
        ConfigError::ValidationFailed { field, .. } => {
            assert_eq!(field, "voting_rights.privacy_penalty")
        }
        other => panic!("unexpected error {other:?}"),
    }
    assert_eq!(err.exit_code(), 2);
    assert_eq!(err.error_code(), "CONFIG_ERROR");
}

#[test]
fn test_decay_must_be_in_open_unit_interval() {
    assert!(PipelineConfig::from_toml("[trust]\ndecay = 1.0\n").is_err());
    assert!(PipelineConfig::from_toml("[trust]\ndecay = 0.0\n").is_err());
    assert!(PipelineConfig::from_toml("[trust]\ndecay = 0.3\n").is_ok());
}

#[test]
fn test_zero_workers_rejected() {
    let err = PipelineConfig::from_toml("[run]\nmax_workers = 0\n").unwrap_err();
    assert!(matches!(err, ConfigError::ValidationFailed { .. }));
}

#[test]
fn test_missing_config_file() {
    let _lock = ENV_MUTEX.lock().unwrap();
    let dir = tempdir();
    let err = PipelineConfig::load(Some(&dir.path().join("nope.toml")), None).unwrap_err();
    assert!(matches!(err, ConfigError::FileNotFound { .. }));
}

#[test]
fn test_malformed_toml() {
    let err = PipelineConfig::from_toml("[trust\ndecay = ").unwrap_err();
    assert!(matches!(err, ConfigError::ParseError { .. }));
}

#[test]
fn test_method_selectors_parse() {
    let config = PipelineConfig::from_toml(
        r#"
[trust]
method = "trust_all"

[scaling]
steps = ["mehestan", "quantile_shift", "standardize"]

[aggregation]
method = "average"
"#,
    )
    .unwrap();
    assert_eq!(config.trust.effective_method(), TrustMethod::TrustAll);
    assert_eq!(config.scaling.effective_steps().len(), 3);
    assert_eq!(config.aggregation.effective_method(), AggregationMethod::Average);
}

#[test]
fn test_toml_round_trip() {
    let config = PipelineConfig::from_toml(
        r#"
[trust]
decay = 0.7

[scaling]
lipschitz = 0.2
steps = ["quantile_shift"]

[run]
criteria = ["importance"]
"#,
    )
    .unwrap();
    let serialized = config.to_toml().unwrap();
    let reloaded = PipelineConfig::from_toml(&serialized).unwrap();
    assert_eq!(config, reloaded);
}
