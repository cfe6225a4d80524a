//! Default parameters of the scoring pipeline.

/// Vouch kind used when a vouch row does not name one.
pub const DEFAULT_VOUCH_KIND: &str = "ProofOfPersonhood";

// Trust propagation.
pub const DEFAULT_PRETRUST_VALUE: f64 = 0.8;
pub const DEFAULT_DECAY: f64 = 0.8;
pub const DEFAULT_SINK_VOUCH: f64 = 5.0;
pub const DEFAULT_TRUST_ERROR: f64 = 1e-8;

// Voting rights.
pub const DEFAULT_PRIVACY_PENALTY: f64 = 0.5;
pub const DEFAULT_MIN_OVERTRUST: f64 = 2.0;
pub const DEFAULT_OVERTRUST_RATIO: f64 = 0.1;

// Preference learning.
pub const DEFAULT_PRIOR_STD: f64 = 7.0;
pub const DEFAULT_UNCERTAINTY_NLL_INCREASE: f64 = 1.0;
pub const DEFAULT_MAX_UNCERTAINTY: f64 = 1e3;
pub const DEFAULT_CONVERGENCE_ERROR: f64 = 1e-5;
pub const DEFAULT_MAX_COORDINATE_UPDATES: usize = 10_000;

// Scaling.
pub const DEFAULT_SCALING_LIPSCHITZ: f64 = 0.1;
pub const DEFAULT_USER_COMPARISON_LIPSCHITZ: f64 = 10.0;
pub const DEFAULT_MIN_SCALER_ACTIVITY: f64 = 10.0;
pub const DEFAULT_N_SCALERS_MAX: usize = 100;
pub const DEFAULT_P_NORM: f64 = 4.0;
pub const DEFAULT_N_ENTITY_TO_FULLY_COMPARE_MAX: usize = 100;
pub const DEFAULT_N_DIFFS_SAMPLE_MAX: usize = 1000;
pub const DEFAULT_SCALING_ERROR: f64 = 1e-5;
pub const DEFAULT_QUANTILE_SHIFT: f64 = 0.15;
pub const DEFAULT_QUANTILE_SHIFT_TARGET: f64 = 0.0;
pub const DEFAULT_DEV_QUANTILE: f64 = 0.9;

// Aggregation.
pub const DEFAULT_AGGREGATION_QUANTILE: f64 = 0.2;
pub const DEFAULT_AGGREGATION_LIPSCHITZ: f64 = 0.1;
pub const DEFAULT_AGGREGATION_ERROR: f64 = 1e-5;

// Post-processing.
pub const DEFAULT_SCORE_MAX: f64 = 100.0;
