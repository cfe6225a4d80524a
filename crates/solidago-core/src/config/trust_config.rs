//! Trust propagation configuration.

use serde::{Deserialize, Serialize};

use crate::constants;
use crate::errors::config_error::{check_in_range, check_open_unit, check_positive};
use crate::errors::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TrustMethod {
    #[default]
    Lipschitrust,
    TrustAll,
}

/// Configuration for the trust propagation phase.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct TrustConfig {
    /// Propagation algorithm. Default: lipschitrust.
    pub method: Option<TrustMethod>,
    /// Trust granted to pretrusted users. Default: 0.8.
    pub pretrust_value: Option<f64>,
    /// Decay applied at each vouch hop. Default: 0.8.
    pub decay: Option<f64>,
    /// Implicit vouch weight absorbing part of every voucher's mass. Default: 5.0.
    pub sink_vouch: Option<f64>,
    /// L1 tolerance of the fixed-point iteration. Default: 1e-8.
    pub error: Option<f64>,
    /// Vouch kind that propagates trust. Default: ProofOfPersonhood.
    pub vouch_kind: Option<String>,
}

impl TrustConfig {
    pub fn effective_method(&self) -> TrustMethod {
        self.method.unwrap_or_default()
    }

    pub fn effective_pretrust_value(&self) -> f64 {
        self.pretrust_value
            .unwrap_or(constants::DEFAULT_PRETRUST_VALUE)
    }

    pub fn effective_decay(&self) -> f64 {
        self.decay.unwrap_or(constants::DEFAULT_DECAY)
    }

    pub fn effective_sink_vouch(&self) -> f64 {
        self.sink_vouch.unwrap_or(constants::DEFAULT_SINK_VOUCH)
    }

    pub fn effective_error(&self) -> f64 {
        self.error.unwrap_or(constants::DEFAULT_TRUST_ERROR)
    }

    pub fn effective_vouch_kind(&self) -> &str {
        self.vouch_kind
            .as_deref()
            .unwrap_or(constants::DEFAULT_VOUCH_KIND)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let pretrust = self.effective_pretrust_value();
        if pretrust.is_nan() || pretrust <= 0.0 || pretrust > 1.0 {
            return Err(ConfigError::invalid(
                "trust.pretrust_value",
                format!("must be in (0, 1], got {pretrust}"),
            ));
        }
        check_open_unit("trust.decay", self.effective_decay())?;
        check_positive("trust.sink_vouch", self.effective_sink_vouch())?;
        check_in_range("trust.error", self.effective_error(), f64::MIN_POSITIVE, 1.0)
    }

    pub(crate) fn merge(&mut self, other: &TrustConfig) {
        merge_fields!(self, other, method, pretrust_value, decay, sink_vouch, error);
        if other.vouch_kind.is_some() {
            self.vouch_kind = other.vouch_kind.clone();
        }
    }
}
