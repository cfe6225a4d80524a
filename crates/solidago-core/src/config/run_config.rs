//! Run-level configuration: workers, criteria, privacy mode.

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct RunConfig {
    /// Number of per-criterion workers. Default: available parallelism.
    pub max_workers: Option<usize>,
    /// Restrict the run to these criteria. Empty means all criteria.
    pub criteria: Vec<String>,
    /// Treat every judgment as public. Default: false.
    pub all_public: Option<bool>,
}

impl RunConfig {
    pub fn effective_max_workers(&self) -> usize {
        self.max_workers.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        })
    }

    pub fn effective_all_public(&self) -> bool {
        self.all_public.unwrap_or(false)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_workers == Some(0) {
            return Err(ConfigError::invalid(
                "run.max_workers",
                "must be greater than 0",
            ));
        }
        Ok(())
    }

    pub(crate) fn merge(&mut self, other: &RunConfig) {
        merge_fields!(self, other, max_workers, all_public);
        if !other.criteria.is_empty() {
            self.criteria = other.criteria.clone();
        }
    }
}
