//! Aggregation configuration.

use serde::{Deserialize, Serialize};

use crate::constants;
use crate::errors::config_error::{check_in_range, check_open_unit, check_positive};
use crate::errors::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AggregationMethod {
    #[default]
    QrQuantile,
    QrMedian,
    Average,
}

/// Configuration for the global aggregation phase.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct AggregationConfig {
    /// Aggregation algorithm. Default: qr_quantile.
    pub method: Option<AggregationMethod>,
    /// Quantile of the qr_quantile aggregator. Default: 0.2.
    pub quantile: Option<f64>,
    /// Lipschitz resilience. Default: 0.1.
    pub lipschitz: Option<f64>,
    /// Tolerance of the QR primitives. Default: 1e-5.
    pub error: Option<f64>,
}

impl AggregationConfig {
    pub fn effective_method(&self) -> AggregationMethod {
        self.method.unwrap_or_default()
    }

    pub fn effective_quantile(&self) -> f64 {
        self.quantile
            .unwrap_or(constants::DEFAULT_AGGREGATION_QUANTILE)
    }

    pub fn effective_lipschitz(&self) -> f64 {
        self.lipschitz
            .unwrap_or(constants::DEFAULT_AGGREGATION_LIPSCHITZ)
    }

    pub fn effective_error(&self) -> f64 {
        self.error.unwrap_or(constants::DEFAULT_AGGREGATION_ERROR)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_open_unit("aggregation.quantile", self.effective_quantile())?;
        check_positive("aggregation.lipschitz", self.effective_lipschitz())?;
        check_in_range(
            "aggregation.error",
            self.effective_error(),
            f64::MIN_POSITIVE,
            1.0,
        )
    }

    pub(crate) fn merge(&mut self, other: &AggregationConfig) {
        merge_fields!(self, other, method, quantile, lipschitz, error);
    }
}
