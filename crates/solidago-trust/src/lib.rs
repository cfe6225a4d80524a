//! # solidago-trust
//!
//! Trust propagation: pretrusted seeds plus the vouch graph give every
//! user a trust score in `[0, 1]`.

pub mod graph;
pub mod lipschitrust;
pub mod trust_all;

use solidago_core::config::{TrustConfig, TrustMethod};
use solidago_core::errors::ConfigError;
use solidago_core::model::{Users, Vouches};

pub use graph::VouchGraph;
pub use lipschitrust::LipschiTrust;
pub use trust_all::TrustAll;

/// Result of a trust propagation.
#[derive(Debug, Clone, PartialEq)]
pub struct TrustOutcome {
    /// The input users with their `trust` filled in.
    pub users: Users,
    pub iterations: usize,
    pub converged: bool,
}

/// Assigns a trust score to every user.
pub trait TrustPropagation: Send + Sync {
    fn propagate(&self, users: &Users, vouches: &Vouches) -> TrustOutcome;

    fn name(&self) -> &'static str;
}

/// Builds the propagation selected by `config.method`.
pub fn from_config(config: &TrustConfig) -> Result<Box<dyn TrustPropagation>, ConfigError> {
    Ok(match config.effective_method() {
        TrustMethod::Lipschitrust => Box::new(LipschiTrust::from_config(config)?),
        TrustMethod::TrustAll => Box::new(TrustAll),
    })
}
