//! # solidago-io
//!
//! CSV tables in and out of the pipeline. Every output table has a reader,
//! so the CLI steps can be chained through a directory.

pub mod input;
pub mod output;
pub mod rows;
pub mod table;

pub use input::{
    load_assessments, load_input, load_made_public, load_population, read_assessments,
    read_comparisons, read_entities, read_made_public, read_users, read_vouches,
};
pub use output::{
    read_global_scores, read_trust, read_user_scales, read_user_scores, read_voting_rights,
    read_voting_statistics, write_global_scores, write_output, write_trust, write_user_scales,
    write_user_scores, write_voting_rights, write_voting_statistics,
};
pub use table::TableRow;

// Input tables.
pub const USERS_FILE: &str = "users.csv";
pub const VOUCHES_FILE: &str = "vouches.csv";
pub const ENTITIES_FILE: &str = "entities.csv";
pub const MADE_PUBLIC_FILE: &str = "made_public.csv";
pub const COMPARISONS_FILE: &str = "comparisons.csv";
pub const ASSESSMENTS_FILE: &str = "assessments.csv";

// Output tables.
pub const TRUST_FILE: &str = "trust.csv";
pub const VOTING_RIGHTS_FILE: &str = "voting_rights.csv";
pub const VOTING_RIGHTS_STATS_FILE: &str = "voting_rights_stats.csv";
pub const USER_DIRECT_SCORES_FILE: &str = "user_direct_scores.csv";
pub const USER_SCALES_FILE: &str = "user_scales.csv";
pub const GLOBAL_SCORES_FILE: &str = "global_scores.csv";
pub const USER_SCORES_FILE: &str = "user_scores.csv";
pub const SQUASHED_GLOBAL_SCORES_FILE: &str = "squashed_global_scores.csv";
