//! # solidago-pipeline
//!
//! Runs the scoring phases in order: trust propagation, voting rights,
//! then learning, scaling and aggregation once per criterion on a worker
//! pool, and finally the squash post-process.

pub mod driver;
pub mod output;
pub mod report;
pub mod squash;

pub use driver::Pipeline;
pub use output::PipelineOutput;
pub use report::{CriterionStatus, RunReport};
pub use squash::Squash;
