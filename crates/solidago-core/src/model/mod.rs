//! Typed tables of the scoring pipeline.
//!
//! Each table is a sorted-key map so that iteration, and therefore every
//! floating-point reduction built on it, happens in a deterministic order.

pub mod assessments;
pub mod comparisons;
pub mod entities;
pub mod input;
pub mod made_public;
pub mod scoring_model;
pub mod user_models;
pub mod users;
pub mod voting_rights;
pub mod vouches;

pub use assessments::{Assessment, AssessmentRecord, Assessments};
pub use comparisons::{Comparison, ComparisonRecord, Comparisons};
pub use entities::{Entities, Entity};
pub use input::PipelineInput;
pub use made_public::MadePublic;
pub use scoring_model::{DirectScoring, ScoringModel};
pub use user_models::{CriterionScores, UserModels, UserScales};
pub use users::{User, Users};
pub use voting_rights::{VotingRightRecord, VotingRights, VotingStatistic, VotingStatistics};
pub use vouches::{Vouch, VouchRecord, Vouches};
