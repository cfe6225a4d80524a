//! LipschiTrust: Lipschitz-resilient trust propagation.
//!
//! Every user starts from a pretrust (`pretrust_value` if pretrusted, else
//! 0). Each round, user `v` receives from each voucher `u` the share
//! `decay * w(u -> v) / (Σ_x w(u -> x) + sink_vouch) * t_u`, and trust is
//! capped at 1:
//!
//! ```text
//! t_v <- min(1, p_v + Σ_u decay * w(u -> v) / (W_u + sink_vouch) * t_u)
//! ```
//!
//! Since `decay < 1` and normalized outgoing weights sum to less than 1,
//! the map is a contraction and the iteration converges geometrically to
//! its unique fixed point. The sink vouch bounds how much trust a single
//! voucher can hand out, whatever the weights it declares.

use std::collections::BTreeMap;

use petgraph::graph::NodeIndex;
use solidago_core::config::TrustConfig;
use solidago_core::constants;
use solidago_core::errors::config_error::{check_in_range, check_open_unit, check_positive};
use solidago_core::errors::ConfigError;
use solidago_core::model::{Users, Vouches};
use tracing::{debug, instrument, warn};

use crate::graph::VouchGraph;
use crate::{TrustOutcome, TrustPropagation};

#[derive(Debug, Clone, PartialEq)]
pub struct LipschiTrust {
    pretrust_value: f64,
    decay: f64,
    sink_vouch: f64,
    error: f64,
    vouch_kind: String,
}

impl Default for LipschiTrust {
    fn default() -> Self {
        Self {
            pretrust_value: constants::DEFAULT_PRETRUST_VALUE,
            decay: constants::DEFAULT_DECAY,
            sink_vouch: constants::DEFAULT_SINK_VOUCH,
            error: constants::DEFAULT_TRUST_ERROR,
            vouch_kind: constants::DEFAULT_VOUCH_KIND.to_string(),
        }
    }
}

impl LipschiTrust {
    pub fn new(
        pretrust_value: f64,
        decay: f64,
        sink_vouch: f64,
        error: f64,
    ) -> Result<Self, ConfigError> {
        if pretrust_value.is_nan() || pretrust_value <= 0.0 || pretrust_value > 1.0 {
            return Err(ConfigError::invalid(
                "trust.pretrust_value",
                format!("must be in (0, 1], got {pretrust_value}"),
            ));
        }
        check_open_unit("trust.decay", decay)?;
        check_positive("trust.sink_vouch", sink_vouch)?;
        check_in_range("trust.error", error, f64::MIN_POSITIVE, 1.0)?;
        Ok(Self {
            pretrust_value,
            decay,
            sink_vouch,
            error,
            vouch_kind: constants::DEFAULT_VOUCH_KIND.to_string(),
        })
    }

    pub fn from_config(config: &TrustConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(
            config.effective_pretrust_value(),
            config.effective_decay(),
            config.effective_sink_vouch(),
            config.effective_error(),
        )?
        .with_vouch_kind(config.effective_vouch_kind()))
    }

    /// Only vouches of this kind propagate trust.
    pub fn with_vouch_kind(mut self, kind: &str) -> Self {
        self.vouch_kind = kind.to_string();
        self
    }

    pub fn pretrust_value(&self) -> f64 {
        self.pretrust_value
    }

    /// Rounds needed for the contraction to reach `error` on `n_users`.
    pub fn max_iterations(&self, n_users: usize) -> usize {
        let n = n_users.max(1) as f64;
        let rounds = ((n / self.error).ln() / -self.decay.ln()).ceil();
        rounds.max(1.0) as usize + 1
    }
}

impl TrustPropagation for LipschiTrust {
    #[instrument(skip(self, users, vouches), fields(n_users = users.len()))]
    fn propagate(&self, users: &Users, vouches: &Vouches) -> TrustOutcome {
        let graph = VouchGraph::build(users, vouches, &self.vouch_kind);
        let n = graph.node_count();

        let pretrusts: Vec<f64> = graph
            .nodes()
            .map(|node| {
                if users.is_pretrusted(graph.name(node)) {
                    self.pretrust_value
                } else {
                    0.0
                }
            })
            .collect();
        let normalizers: Vec<f64> = graph
            .nodes()
            .map(|node| graph.out_weight(node) + self.sink_vouch)
            .collect();
        // in-coefficients per vouchee: (voucher, decay * w / normalizer)
        let incoming: Vec<Vec<(NodeIndex, f64)>> = graph
            .nodes()
            .map(|node| {
                graph
                    .vouchers(node)
                    .map(|(voucher, weight)| {
                        (voucher, self.decay * weight / normalizers[voucher.index()])
                    })
                    .collect()
            })
            .collect();

        let max_iterations = self.max_iterations(n);
        let mut trusts = pretrusts.clone();
        let mut iterations = 0;
        let mut converged = n == 0;
        while !converged && iterations < max_iterations {
            let next: Vec<f64> = (0..n)
                .map(|v| {
                    let received: f64 = incoming[v]
                        .iter()
                        .map(|(voucher, coefficient)| coefficient * trusts[voucher.index()])
                        .sum();
                    (pretrusts[v] + received).clamp(0.0, 1.0)
                })
                .collect();
            let change: f64 = next
                .iter()
                .zip(&trusts)
                .map(|(a, b)| (a - b).abs())
                .sum();
            trusts = next;
            iterations += 1;
            converged = change < self.error;
        }

        if converged {
            debug!(iterations, n_edges = graph.edge_count(), "lipschitrust converged");
        } else {
            warn!(iterations, "lipschitrust reached its iteration cap");
        }

        let trusts: BTreeMap<String, f64> = graph
            .nodes()
            .map(|node| (graph.name(node).to_string(), trusts[node.index()]))
            .collect();
        TrustOutcome {
            users: users.with_trusts(&trusts),
            iterations,
            converged,
        }
    }

    fn name(&self) -> &'static str {
        "lipschitrust"
    }
}
