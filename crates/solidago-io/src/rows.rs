//! Row layouts of every CSV table.

use serde::{Deserialize, Serialize};
use solidago_core::{Scale, Score};

use crate::table::{flexible_bool, TableRow};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRow {
    pub username: String,
    #[serde(deserialize_with = "flexible_bool")]
    pub is_pretrusted: bool,
    #[serde(default)]
    pub trust_score: Option<f64>,
}

impl TableRow for UserRow {
    const TABLE: &'static str = "users";
    const COLUMNS: &'static [&'static str] = &["username", "is_pretrusted", "trust_score"];
    const REQUIRED: &'static [&'static str] = &["username", "is_pretrusted"];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VouchRow {
    pub by: String,
    pub to: String,
    pub kind: String,
    pub weight: f64,
    #[serde(default)]
    pub priority: f64,
}

impl TableRow for VouchRow {
    const TABLE: &'static str = "vouches";
    const COLUMNS: &'static [&'static str] = &["by", "to", "kind", "weight", "priority"];
    const REQUIRED: &'static [&'static str] = &["by", "to", "kind", "weight"];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MadePublicRow {
    pub username: String,
    pub entity_name: String,
    #[serde(deserialize_with = "flexible_bool")]
    pub public: bool,
}

impl TableRow for MadePublicRow {
    const TABLE: &'static str = "made_public";
    const COLUMNS: &'static [&'static str] = &["username", "entity_name", "public"];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRow {
    pub username: String,
    pub criterion: String,
    pub left_name: String,
    pub right_name: String,
    pub value: f64,
    pub max: f64,
}

impl TableRow for ComparisonRow {
    const TABLE: &'static str = "comparisons";
    const COLUMNS: &'static [&'static str] = &[
        "username",
        "criterion",
        "left_name",
        "right_name",
        "value",
        "max",
    ];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentRow {
    pub username: String,
    pub criterion: String,
    pub entity_name: String,
    pub value: f64,
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
}

impl TableRow for AssessmentRow {
    const TABLE: &'static str = "assessments";
    const COLUMNS: &'static [&'static str] =
        &["username", "criterion", "entity_name", "value", "min", "max"];
    const REQUIRED: &'static [&'static str] = &["username", "criterion", "entity_name", "value"];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrustRow {
    pub username: String,
    pub trust_score: f64,
}

impl TableRow for TrustRow {
    const TABLE: &'static str = "trust";
    const COLUMNS: &'static [&'static str] = &["username", "trust_score"];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VotingRightRow {
    pub username: String,
    pub entity_name: String,
    pub criterion: String,
    pub voting_right: f64,
}

impl TableRow for VotingRightRow {
    const TABLE: &'static str = "voting_rights";
    const COLUMNS: &'static [&'static str] =
        &["username", "entity_name", "criterion", "voting_right"];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VotingStatisticRow {
    pub entity_name: String,
    pub criterion: String,
    pub cumulative_trust: f64,
    pub min_voting_right: f64,
    pub overtrust: f64,
}

impl TableRow for VotingStatisticRow {
    const TABLE: &'static str = "voting_rights_stats";
    const COLUMNS: &'static [&'static str] = &[
        "entity_name",
        "criterion",
        "cumulative_trust",
        "min_voting_right",
        "overtrust",
    ];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserScoreRow {
    pub username: String,
    pub entity_name: String,
    pub criterion: String,
    pub value: f64,
    pub left_unc: f64,
    pub right_unc: f64,
}

impl UserScoreRow {
    pub fn score(&self) -> Score {
        Score::new(self.value, self.left_unc, self.right_unc)
    }
}

impl TableRow for UserScoreRow {
    const TABLE: &'static str = "user_scores";
    const COLUMNS: &'static [&'static str] = &[
        "username",
        "entity_name",
        "criterion",
        "value",
        "left_unc",
        "right_unc",
    ];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserScaleRow {
    pub username: String,
    pub criterion: String,
    pub multiplier_value: f64,
    pub multiplier_lu: f64,
    pub multiplier_ru: f64,
    pub translation_value: f64,
    pub translation_lu: f64,
    pub translation_ru: f64,
}

impl UserScaleRow {
    pub fn new(username: &str, criterion: &str, scale: Scale) -> Self {
        let Scale {
            multiplier: m,
            translation: t,
        } = scale;
        Self {
            username: username.to_string(),
            criterion: criterion.to_string(),
            multiplier_value: m.value,
            multiplier_lu: m.left_unc,
            multiplier_ru: m.right_unc,
            translation_value: t.value,
            translation_lu: t.left_unc,
            translation_ru: t.right_unc,
        }
    }

    pub fn scale(&self) -> Scale {
        Scale::new(
            Score::new(self.multiplier_value, self.multiplier_lu, self.multiplier_ru),
            Score::new(self.translation_value, self.translation_lu, self.translation_ru),
        )
    }
}

impl TableRow for UserScaleRow {
    const TABLE: &'static str = "user_scales";
    const COLUMNS: &'static [&'static str] = &[
        "username",
        "criterion",
        "multiplier_value",
        "multiplier_lu",
        "multiplier_ru",
        "translation_value",
        "translation_lu",
        "translation_ru",
    ];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalScoreRow {
    pub entity_name: String,
    pub criterion: String,
    pub value: f64,
    pub left_unc: f64,
    pub right_unc: f64,
}

impl GlobalScoreRow {
    pub fn score(&self) -> Score {
        Score::new(self.value, self.left_unc, self.right_unc)
    }
}

impl TableRow for GlobalScoreRow {
    const TABLE: &'static str = "global_scores";
    const COLUMNS: &'static [&'static str] =
        &["entity_name", "criterion", "value", "left_unc", "right_unc"];
}
